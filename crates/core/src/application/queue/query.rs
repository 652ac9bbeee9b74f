// Read-only use cases

use crate::application::queue::transition::validate_target;
use crate::domain::{Customer, CustomerId, CustomerTarget, QueuePosition};
use crate::error::{AppError, Result};
use crate::port::CustomerRepository;

pub async fn get_status(customer_repo: &dyn CustomerRepository, id: CustomerId) -> Result<Customer> {
    validate_target(CustomerTarget::Id(id))?;
    customer_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))
}

pub async fn get_by_position(
    customer_repo: &dyn CustomerRepository,
    position: QueuePosition,
) -> Result<Customer> {
    validate_target(CustomerTarget::Position(position))?;
    customer_repo
        .find_by_position(position)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No pending customer at queue position {}", position))
        })
}

pub async fn list_queue(customer_repo: &dyn CustomerRepository) -> Result<Vec<Customer>> {
    customer_repo.list_pending().await
}
