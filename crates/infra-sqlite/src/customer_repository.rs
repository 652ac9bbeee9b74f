// SQLite CustomerRepository Implementation

use crate::error::map_sqlx_error;
use crate::SqliteCustomerTransaction;
use async_trait::async_trait;
use sqlx::SqlitePool;
use walkin_core::domain::{Customer, CustomerId, CustomerStatus, QueuePosition};
use walkin_core::error::{AppError, Result};
use walkin_core::port::{
    CustomerRepository, CustomerRepositoryTransaction, TransactionalCustomerRepository,
};

/// Takes the write lock at BEGIN so concurrent writers queue on busy_timeout
/// instead of failing when they later upgrade from a read lock
const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

#[derive(Clone)]
pub struct SqliteCustomerRepository {
    pool: SqlitePool,
}

impl SqliteCustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for SqliteCustomerRepository {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>("SELECT * FROM customers WHERE customer_id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(CustomerRow::into_customer).transpose()
    }

    async fn find_by_position(&self, position: QueuePosition) -> Result<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "SELECT * FROM customers WHERE queue_position = ? AND status = ?",
        )
        .bind(position)
        .bind(CustomerStatus::Pending.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(CustomerRow::into_customer).transpose()
    }

    async fn list_pending(&self) -> Result<Vec<Customer>> {
        let rows: Vec<CustomerRow> = sqlx::query_as(
            r#"
            SELECT * FROM customers
            WHERE status = ?
            ORDER BY queue_position ASC, customer_id ASC
            "#,
        )
        .bind(CustomerStatus::Pending.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(CustomerRow::into_customer).collect()
    }

    async fn count_by_status(&self, status: CustomerStatus) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count)
    }
}

#[async_trait]
impl TransactionalCustomerRepository for SqliteCustomerRepository {
    async fn begin_transaction(&self) -> Result<Box<dyn CustomerRepositoryTransaction>> {
        let tx = self
            .pool
            .begin_with(BEGIN_WRITE)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteCustomerTransaction::new(tx)))
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CustomerRow {
    customer_id: i64,
    first_name: String,
    location: String,
    status: String,
    queue_position: i64,
    add_time: i64,
    start_time: Option<i64>,
    complete_time: Option<i64>,
    remove_time: Option<i64>,
}

impl CustomerRow {
    pub(crate) fn into_customer(self) -> Result<Customer> {
        let status: CustomerStatus = self.status.parse().map_err(|e| {
            AppError::Internal(format!("customer {}: {}", self.customer_id, e))
        })?;

        Ok(Customer {
            customer_id: self.customer_id,
            first_name: self.first_name,
            location: self.location,
            status,
            queue_position: self.queue_position,
            add_time: self.add_time,
            start_time: self.start_time,
            complete_time: self.complete_time,
            remove_time: self.remove_time,
        })
    }
}
