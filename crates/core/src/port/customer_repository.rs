// Customer Repository Port (read side)

use crate::domain::{Customer, CustomerId, CustomerStatus, QueuePosition};
use crate::error::Result;
use async_trait::async_trait;

/// Read access to the queue store
///
/// Reads run outside any write transaction and observe the last committed
/// snapshot, so they never see a half-reconciled queue.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Find customer by ID
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>>;

    /// Find the pending customer currently holding `position`
    async fn find_by_position(&self, position: QueuePosition) -> Result<Option<Customer>>;

    /// All pending customers ordered by queue_position
    async fn list_pending(&self) -> Result<Vec<Customer>>;

    /// Count customers by status
    async fn count_by_status(&self, status: CustomerStatus) -> Result<i64>;
}
