//! In-memory queue store for service tests
//!
//! Writers are serialized by an owned mutex guard held for the life of the
//! transaction; changes go to a working copy that only replaces the stored
//! rows on commit, mirroring BEGIN IMMEDIATE + rollback-on-drop.

use crate::application::queue::QueueService;
use crate::domain::{
    Customer, CustomerId, CustomerStatus, CustomerTarget, LocationSet, NewCustomer, PendingSlot,
    PositionUpdate, QueuePosition, Transition,
};
use crate::error::{AppError, Result};
use crate::port::time_provider::SteppingTimeProvider;
use crate::port::{
    CustomerRepository, CustomerRepositoryTransaction, Transaction, TransactionalCustomerRepository,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone, Default)]
pub(crate) struct StoreState {
    rows: Vec<Customer>,
    last_id: CustomerId,
}

#[derive(Default)]
pub(crate) struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
    conflicts_remaining: AtomicU32,
    fail_apply_positions: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn rows(&self) -> Vec<Customer> {
        self.state.lock().await.rows.clone()
    }

    /// Overwrite a position directly, bypassing the service (manufactures gaps)
    pub async fn force_position(&self, id: CustomerId, position: QueuePosition) {
        let mut state = self.state.lock().await;
        if let Some(row) = state.rows.iter_mut().find(|c| c.customer_id == id) {
            row.queue_position = position;
        }
    }

    /// Make the next `n` calls to begin_transaction fail with Conflict
    pub fn inject_conflicts(&self, n: u32) {
        self.conflicts_remaining.store(n, Ordering::SeqCst);
    }

    /// Make the next position batch write fail with a store error
    pub fn fail_next_reconcile(&self) {
        self.fail_apply_positions.store(true, Ordering::SeqCst);
    }
}

pub(crate) fn test_locations() -> Arc<LocationSet> {
    Arc::new(LocationSet::new(["downtown", "uptown"]).unwrap())
}

pub(crate) fn test_service(store: &Arc<InMemoryStore>) -> QueueService {
    QueueService::new(
        store.clone(),
        store.clone(),
        test_locations(),
        Arc::new(SteppingTimeProvider::new(1_000, 1_000)),
    )
}

#[async_trait]
impl CustomerRepository for InMemoryStore {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>> {
        let state = self.state.lock().await;
        Ok(state.rows.iter().find(|c| c.customer_id == id).cloned())
    }

    async fn find_by_position(&self, position: QueuePosition) -> Result<Option<Customer>> {
        let state = self.state.lock().await;
        Ok(state
            .rows
            .iter()
            .find(|c| c.is_pending() && c.queue_position == position)
            .cloned())
    }

    async fn list_pending(&self) -> Result<Vec<Customer>> {
        let state = self.state.lock().await;
        let mut pending: Vec<Customer> = state.rows.iter().filter(|c| c.is_pending()).cloned().collect();
        pending.sort_by_key(|c| (c.queue_position, c.customer_id));
        Ok(pending)
    }

    async fn count_by_status(&self, status: CustomerStatus) -> Result<i64> {
        let state = self.state.lock().await;
        Ok(state.rows.iter().filter(|c| c.status == status).count() as i64)
    }
}

#[async_trait]
impl TransactionalCustomerRepository for InMemoryStore {
    async fn begin_transaction(&self) -> Result<Box<dyn CustomerRepositoryTransaction>> {
        let injected = self
            .conflicts_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(AppError::Conflict("database is locked".to_string()));
        }

        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemoryTransaction {
            guard,
            working,
            fail_apply_positions: self.fail_apply_positions.clone(),
        }))
    }
}

struct InMemoryTransaction {
    guard: OwnedMutexGuard<StoreState>,
    working: StoreState,
    fail_apply_positions: Arc<AtomicBool>,
}

#[async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        let InMemoryTransaction {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl CustomerRepositoryTransaction for InMemoryTransaction {
    async fn insert_pending(&mut self, customer: &NewCustomer) -> Result<Customer> {
        let position = self
            .working
            .rows
            .iter()
            .filter(|c| c.is_pending())
            .map(|c| c.queue_position)
            .max()
            .unwrap_or(0)
            + 1;

        self.working.last_id += 1;
        let row = Customer::pending(self.working.last_id, customer.clone(), position);
        self.working.rows.push(row.clone());
        Ok(row)
    }

    async fn transition(
        &mut self,
        target: CustomerTarget,
        transition: Transition,
        now_millis: i64,
    ) -> Result<Option<Customer>> {
        let row = self.working.rows.iter_mut().find(|c| {
            c.status == transition.from
                && match target {
                    CustomerTarget::Id(id) => c.customer_id == id,
                    CustomerTarget::Position(pos) => c.is_pending() && c.queue_position == pos,
                }
        });

        match row {
            Some(row) => {
                row.apply(transition, now_millis)?;
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn pending_slots(&mut self) -> Result<Vec<PendingSlot>> {
        Ok(self
            .working
            .rows
            .iter()
            .filter(|c| c.is_pending())
            .map(|c| PendingSlot {
                customer_id: c.customer_id,
                queue_position: c.queue_position,
            })
            .collect())
    }

    async fn apply_positions(&mut self, updates: &[PositionUpdate]) -> Result<u64> {
        if self.fail_apply_positions.swap(false, Ordering::SeqCst) {
            return Err(AppError::Database("injected write failure".to_string()));
        }

        let mut written = 0;
        for update in updates {
            if let Some(row) = self
                .working
                .rows
                .iter_mut()
                .find(|c| c.customer_id == update.customer_id && c.is_pending())
            {
                row.queue_position = update.queue_position;
                written += 1;
            }
        }
        Ok(written)
    }
}
