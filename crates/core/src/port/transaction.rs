// Transaction port for atomic operations

use crate::domain::{Customer, CustomerTarget, NewCustomer, PendingSlot, PositionUpdate, Transition};
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Transactional queue store
#[async_trait]
pub trait TransactionalCustomerRepository: Send + Sync {
    /// Begin a write transaction
    ///
    /// Implementations must take the store's write lock up front so that two
    /// transactions touching the pending set are serialized.
    async fn begin_transaction(&self) -> Result<Box<dyn CustomerRepositoryTransaction>>;
}

/// Queue store operations within a transaction
#[async_trait]
pub trait CustomerRepositoryTransaction: Transaction {
    /// Insert a pending row at `max(pending position) + 1` (or 1)
    async fn insert_pending(&mut self, customer: &NewCustomer) -> Result<Customer>;

    /// Conditional status update
    ///
    /// Matches only a row that is currently in `transition.from` (and, for
    /// position targets, pending at that position). Returns `None` when no row
    /// matched; missing row and wrong status are not distinguished.
    async fn transition(
        &mut self,
        target: CustomerTarget,
        transition: Transition,
        now_millis: i64,
    ) -> Result<Option<Customer>>;

    /// Current slots of all pending rows
    async fn pending_slots(&mut self) -> Result<Vec<PendingSlot>>;

    /// Write a batch of new positions
    async fn apply_positions(&mut self, updates: &[PositionUpdate]) -> Result<u64>;
}
