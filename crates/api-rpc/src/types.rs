//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use serde::{Deserialize, Serialize};
use walkin_core::domain::{Customer, CustomerStatus};

/// queue.enqueue.v1 - Join the queue
#[derive(Debug, Deserialize)]
pub struct EnqueueRequest {
    pub first_name: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnqueueResponse {
    pub customer_id: i64,
    pub queue_position: i64,
}

/// queue.get.v1 / queue.promote.v1 / queue.complete.v1 / queue.cancel.v1
#[derive(Debug, Deserialize)]
pub struct CustomerIdRequest {
    pub customer_id: i64,
}

/// queue.at_position.v1 / queue.remove.v1
#[derive(Debug, Deserialize)]
pub struct PositionRequest {
    pub position: i64,
}

/// One row of queue.list.v1
#[derive(Debug, Clone, Serialize)]
pub struct QueueEntry {
    pub customer_id: i64,
    pub first_name: String,
    pub location: String,
    pub queue_position: i64,
    pub add_time: i64,
}

impl From<Customer> for QueueEntry {
    fn from(c: Customer) -> Self {
        Self {
            customer_id: c.customer_id,
            first_name: c.first_name,
            location: c.location,
            queue_position: c.queue_position,
            add_time: c.add_time,
        }
    }
}

/// Full customer view (status, position, timestamps)
#[derive(Debug, Clone, Serialize)]
pub struct CustomerResponse {
    pub customer_id: i64,
    pub first_name: String,
    pub location: String,
    pub status: CustomerStatus,
    pub queue_position: i64,
    pub add_time: i64,
    pub start_time: Option<i64>,
    pub complete_time: Option<i64>,
    pub remove_time: Option<i64>,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        Self {
            customer_id: c.customer_id,
            first_name: c.first_name,
            location: c.location,
            status: c.status,
            queue_position: c.queue_position,
            add_time: c.add_time,
            start_time: c.start_time,
            complete_time: c.complete_time,
            remove_time: c.remove_time,
        }
    }
}

/// Acknowledgement for complete / remove / cancel
#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse {
    pub customer_id: i64,
    pub message: String,
}

/// admin.health.v1
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub cancelled: i64,
    pub uptime_seconds: i64,
}
