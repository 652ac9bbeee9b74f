// Queue Operations Service - Core use cases for the walk-in queue

pub mod enqueue;
pub mod query;
pub mod transition;

#[cfg(test)]
pub(crate) mod test_support;

pub use enqueue::{EnqueueReceipt, EnqueueRequest};

use crate::domain::{
    Customer, CustomerId, CustomerStatus, CustomerTarget, LocationSet, QueuePosition, Transition,
};
use crate::error::Result;
use crate::port::{CustomerRepository, TimeProvider, TransactionalCustomerRepository};
use serde::Serialize;
use std::sync::Arc;

/// Customers per status, for health reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueCounts {
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub cancelled: i64,
}

/// Queue Operations Service
///
/// Every mutation runs as one store transaction: the conditional status
/// update plus, when the pending set shrinks, the position reconciliation.
pub struct QueueService {
    tx_repo: Arc<dyn TransactionalCustomerRepository>,
    repo: Arc<dyn CustomerRepository>,
    locations: Arc<LocationSet>,
    time_provider: Arc<dyn TimeProvider>,
}

impl QueueService {
    pub fn new(
        tx_repo: Arc<dyn TransactionalCustomerRepository>,
        repo: Arc<dyn CustomerRepository>,
        locations: Arc<LocationSet>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            tx_repo,
            repo,
            locations,
            time_provider,
        }
    }

    /// Add a customer at the end of the queue
    pub async fn enqueue(&self, req: EnqueueRequest) -> Result<EnqueueReceipt> {
        enqueue::execute(
            self.tx_repo.as_ref(),
            &self.locations,
            self.time_provider.as_ref(),
            req,
        )
        .await
    }

    /// Move a pending customer into service
    pub async fn promote(&self, id: CustomerId) -> Result<Customer> {
        self.transition(CustomerTarget::Id(id), Transition::PROMOTE)
            .await
    }

    /// Finish service for an in-progress customer (queue untouched)
    pub async fn complete(&self, id: CustomerId) -> Result<Customer> {
        self.transition(CustomerTarget::Id(id), Transition::COMPLETE)
            .await
    }

    /// Take whoever is pending at `position` off the queue as completed
    pub async fn complete_by_position(&self, position: QueuePosition) -> Result<Customer> {
        self.transition(CustomerTarget::Position(position), Transition::REMOVE)
            .await
    }

    /// A pending customer leaves the queue on their own
    pub async fn cancel(&self, id: CustomerId) -> Result<Customer> {
        self.transition(CustomerTarget::Id(id), Transition::CANCEL)
            .await
    }

    pub async fn get_status(&self, id: CustomerId) -> Result<Customer> {
        query::get_status(self.repo.as_ref(), id).await
    }

    pub async fn get_by_position(&self, position: QueuePosition) -> Result<Customer> {
        query::get_by_position(self.repo.as_ref(), position).await
    }

    /// Pending customers ordered by queue position
    pub async fn list_queue(&self) -> Result<Vec<Customer>> {
        query::list_queue(self.repo.as_ref()).await
    }

    pub fn locations(&self) -> &LocationSet {
        &self.locations
    }

    pub async fn counts(&self) -> Result<QueueCounts> {
        Ok(QueueCounts {
            pending: self.repo.count_by_status(CustomerStatus::Pending).await?,
            in_progress: self.repo.count_by_status(CustomerStatus::InProgress).await?,
            completed: self.repo.count_by_status(CustomerStatus::Completed).await?,
            cancelled: self.repo.count_by_status(CustomerStatus::Cancelled).await?,
        })
    }

    async fn transition(&self, target: CustomerTarget, transition: Transition) -> Result<Customer> {
        transition::execute(
            self.tx_repo.as_ref(),
            self.time_provider.as_ref(),
            target,
            transition,
        )
        .await
    }
}
