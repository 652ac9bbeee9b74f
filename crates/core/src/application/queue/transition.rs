// Status transition use cases (promote, complete, complete-by-position, cancel)

use crate::application::reconciler::reconcile_in;
use crate::application::retry::{conflict_as_not_found, with_conflict_retry};
use crate::domain::{Customer, CustomerTarget, DomainError, Transition};
use crate::error::{AppError, Result};
use crate::port::{TimeProvider, TransactionalCustomerRepository};
use tracing::{debug, info};

/// Reject non-positive ids and positions before any store access
pub fn validate_target(target: CustomerTarget) -> Result<()> {
    match target {
        CustomerTarget::Id(id) if id < 1 => Err(AppError::Validation(format!(
            "customer_id must be a positive integer, got {}",
            id
        ))),
        CustomerTarget::Position(pos) if pos < 1 => Err(AppError::Validation(format!(
            "queue position must be a positive integer, got {}",
            pos
        ))),
        _ => Ok(()),
    }
}

/// Apply `transition` to the row at `target` as one atomic unit
///
/// The conditional update and, when the pending set shrinks, the position
/// reconciliation commit together or not at all.
pub async fn execute(
    customer_repo: &dyn TransactionalCustomerRepository,
    time_provider: &dyn TimeProvider,
    target: CustomerTarget,
    transition: Transition,
) -> Result<Customer> {
    validate_target(target)?;
    if !transition.from.can_transition_to(transition.to) {
        return Err(DomainError::InvalidStatusTransition {
            from: transition.from.to_string(),
            to: transition.to.to_string(),
        }
        .into());
    }

    let customer = with_conflict_retry("transition", || {
        let now = time_provider.now_millis();
        attempt(customer_repo, target, transition, now)
    })
    .await
    .map_err(conflict_as_not_found)?;

    info!(
        customer_id = %customer.customer_id,
        from = %transition.from,
        to = %transition.to,
        "Customer status changed"
    );
    Ok(customer)
}

async fn attempt(
    customer_repo: &dyn TransactionalCustomerRepository,
    target: CustomerTarget,
    transition: Transition,
    now: i64,
) -> Result<Customer> {
    let mut tx = customer_repo.begin_transaction().await?;

    let customer = match tx.transition(target, transition, now).await? {
        Some(customer) => customer,
        None => {
            tx.rollback().await?;
            return Err(AppError::NotFound(format!(
                "No {} customer found for {}",
                transition.from, target
            )));
        }
    };

    if transition.leaves_pending() {
        let moved = reconcile_in(&mut *tx).await?;
        debug!(customer_id = %customer.customer_id, moved = %moved, "Queue compacted");
    }

    tx.commit().await?;
    Ok(customer)
}
