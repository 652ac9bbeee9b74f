// SQLite Transaction Implementation

use crate::customer_repository::CustomerRow;
use crate::error::map_sqlx_error;
use async_trait::async_trait;
use sqlx::{Sqlite, Transaction as SqlxTransaction};
use walkin_core::domain::{
    Customer, CustomerStatus, CustomerTarget, NewCustomer, PendingSlot, PositionUpdate,
    Transition,
};
use walkin_core::error::Result;
use walkin_core::port::{CustomerRepositoryTransaction, Transaction};

/// Write transaction opened with BEGIN IMMEDIATE
///
/// Dropping it without commit rolls back.
pub struct SqliteCustomerTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
}

impl<'a> SqliteCustomerTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>) -> Self {
        Self { tx }
    }

    async fn set_position(&mut self, customer_id: i64, queue_position: i64) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE customers SET queue_position = ? WHERE customer_id = ? AND status = ?",
        )
        .bind(queue_position)
        .bind(customer_id)
        .bind(CustomerStatus::Pending.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl Transaction for SqliteCustomerTransaction<'_> {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl CustomerRepositoryTransaction for SqliteCustomerTransaction<'_> {
    async fn insert_pending(&mut self, customer: &NewCustomer) -> Result<Customer> {
        let pending = CustomerStatus::Pending.as_str();

        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            INSERT INTO customers (first_name, location, status, queue_position, add_time)
            VALUES (
                ?, ?, ?,
                (SELECT COALESCE(MAX(queue_position), 0) + 1 FROM customers WHERE status = ?),
                ?
            )
            RETURNING *
            "#,
        )
        .bind(&customer.first_name)
        .bind(customer.location.as_str())
        .bind(pending)
        .bind(pending)
        .bind(customer.add_time)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        row.into_customer()
    }

    async fn transition(
        &mut self,
        target: CustomerTarget,
        transition: Transition,
        now_millis: i64,
    ) -> Result<Option<Customer>> {
        // Every transition ends outside pending, so the slot is always released
        let (key_column, key) = match target {
            CustomerTarget::Id(id) => ("customer_id", id),
            CustomerTarget::Position(_) if transition.from != CustomerStatus::Pending => {
                return Ok(None);
            }
            CustomerTarget::Position(pos) => ("queue_position", pos),
        };

        let sql = format!(
            r#"
            UPDATE customers
            SET status = ?, queue_position = 0, {} = ?
            WHERE {} = ? AND status = ?
            RETURNING *
            "#,
            transition.stamp.column(),
            key_column
        );

        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(transition.to.as_str())
            .bind(now_millis)
            .bind(key)
            .bind(transition.from.as_str())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        row.map(CustomerRow::into_customer).transpose()
    }

    async fn pending_slots(&mut self) -> Result<Vec<PendingSlot>> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT customer_id, queue_position FROM customers
            WHERE status = ?
            ORDER BY queue_position ASC, customer_id ASC
            "#,
        )
        .bind(CustomerStatus::Pending.as_str())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|(customer_id, queue_position)| PendingSlot {
                customer_id,
                queue_position,
            })
            .collect())
    }

    async fn apply_positions(&mut self, updates: &[PositionUpdate]) -> Result<u64> {
        if updates.is_empty() {
            return Ok(0);
        }
        let pending = CustomerStatus::Pending.as_str();

        // Park every moved row above the highest occupied slot first, so the
        // final writes never land on a slot another moved row still holds.
        let top: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(queue_position), 0) FROM customers WHERE status = ?",
        )
        .bind(pending)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        for (parked, update) in (top + 1..).zip(updates) {
            self.set_position(update.customer_id, parked).await?;
        }

        let mut written = 0;
        for update in updates {
            written += self
                .set_position(update.customer_id, update.queue_position)
                .await?;
        }
        Ok(written)
    }
}
