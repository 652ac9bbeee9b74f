// Enqueue Use Case

use crate::application::retry::with_conflict_retry;
use crate::domain::{LocationSet, NewCustomer};
use crate::error::{AppError, Result};
use crate::port::{TimeProvider, TransactionalCustomerRepository};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Enqueue request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnqueueRequest {
    pub first_name: String,
    pub location: String,
}

/// Id and slot handed back to the new customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnqueueReceipt {
    pub customer_id: i64,
    pub queue_position: i64,
}

/// Validate the request without touching the store
pub fn validate_request(
    locations: &LocationSet,
    req: &EnqueueRequest,
    add_time: i64,
) -> Result<NewCustomer> {
    let location = locations
        .resolve(&req.location)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    NewCustomer::new(&req.first_name, location, add_time)
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// Execute enqueue use case (with transaction for atomicity)
///
/// # Arguments
///
/// * `customer_repo` - Transactional queue store
/// * `locations` - Configured location vocabulary
/// * `time_provider` - Time provider (injected for determinism)
/// * `req` - Enqueue request
pub async fn execute(
    customer_repo: &dyn TransactionalCustomerRepository,
    locations: &LocationSet,
    time_provider: &dyn TimeProvider,
    req: EnqueueRequest,
) -> Result<EnqueueReceipt> {
    let new_customer = validate_request(locations, &req, time_provider.now_millis())?;
    let new_customer = &new_customer;

    // Appending at max+1 keeps the queue compact, no reconcile needed
    let customer = with_conflict_retry("enqueue", || async move {
        let mut tx = customer_repo.begin_transaction().await?;
        let customer = tx.insert_pending(new_customer).await?;
        tx.commit().await?;
        Ok(customer)
    })
    .await?;

    info!(
        customer_id = %customer.customer_id,
        location = %customer.location,
        position = %customer.queue_position,
        "Customer joined queue"
    );

    Ok(EnqueueReceipt {
        customer_id: customer.customer_id,
        queue_position: customer.queue_position,
    })
}
