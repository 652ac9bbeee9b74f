// Position Reconciler
use crate::application::retry::with_conflict_retry;
use crate::domain::reconcile;
use crate::error::Result;
use crate::port::{CustomerRepositoryTransaction, TransactionalCustomerRepository};
use std::sync::Arc;
use tracing::{debug, info};

/// Compact the pending queue inside an open transaction
///
/// Must run after the write that shrank the pending set and before commit.
/// Returns the number of rows whose position was rewritten.
pub async fn reconcile_in(tx: &mut dyn CustomerRepositoryTransaction) -> Result<u64> {
    let slots = tx.pending_slots().await?;
    let updates = reconcile::plan(&slots);
    if updates.is_empty() {
        return Ok(0);
    }

    debug!(
        pending = slots.len(),
        moved = updates.len(),
        "Reconciling queue positions"
    );
    tx.apply_positions(&updates).await
}

/// Standalone reconciliation in its own transaction
///
/// Used once at startup to repair any gap left in the store (for instance by a
/// manual edit), and by tests to check idempotence.
pub struct PositionReconciler {
    tx_repo: Arc<dyn TransactionalCustomerRepository>,
}

impl PositionReconciler {
    pub fn new(tx_repo: Arc<dyn TransactionalCustomerRepository>) -> Self {
        Self { tx_repo }
    }

    pub async fn reconcile(&self) -> Result<u64> {
        let repo = self.tx_repo.as_ref();
        let moved = with_conflict_retry("reconcile", || async move {
            let mut tx = repo.begin_transaction().await?;
            let moved = reconcile_in(&mut *tx).await?;
            tx.commit().await?;
            Ok(moved)
        })
        .await?;

        if moved > 0 {
            info!(moved = %moved, "Queue positions repaired");
        }
        Ok(moved)
    }
}
