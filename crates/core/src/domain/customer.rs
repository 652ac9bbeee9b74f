// Customer Domain Model

use crate::domain::error::{DomainError, Result};
use crate::domain::location::Location;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Customer ID (store-assigned, never reused)
pub type CustomerId = i64;

/// 1-based slot in the pending queue, 0 once the customer left pending
pub type QueuePosition = i64;

/// Customer status (state-machine field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl CustomerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Pending => "pending",
            CustomerStatus::InProgress => "in_progress",
            CustomerStatus::Completed => "completed",
            CustomerStatus::Cancelled => "cancelled",
        }
    }

    /// Allowed edges of the lifecycle:
    /// pending -> in_progress -> completed, or pending -> completed/cancelled
    pub fn can_transition_to(&self, next: CustomerStatus) -> bool {
        use CustomerStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress) | (Pending, Completed) | (Pending, Cancelled) | (InProgress, Completed)
        )
    }
}

impl std::fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(CustomerStatus::Pending),
            "in_progress" => Ok(CustomerStatus::InProgress),
            "completed" => Ok(CustomerStatus::Completed),
            "cancelled" => Ok(CustomerStatus::Cancelled),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

/// Timestamp column stamped by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampField {
    StartTime,
    CompleteTime,
    RemoveTime,
}

impl TimestampField {
    pub fn column(&self) -> &'static str {
        match self {
            TimestampField::StartTime => "start_time",
            TimestampField::CompleteTime => "complete_time",
            TimestampField::RemoveTime => "remove_time",
        }
    }
}

/// How a conditional update locates its row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerTarget {
    Id(CustomerId),
    Position(QueuePosition),
}

impl std::fmt::Display for CustomerTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomerTarget::Id(id) => write!(f, "customer {}", id),
            CustomerTarget::Position(pos) => write!(f, "queue position {}", pos),
        }
    }
}

/// A conditional status change: applies only while the row is in `from`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: CustomerStatus,
    pub to: CustomerStatus,
    pub stamp: TimestampField,
}

impl Transition {
    /// pending -> in_progress
    pub const PROMOTE: Transition = Transition {
        from: CustomerStatus::Pending,
        to: CustomerStatus::InProgress,
        stamp: TimestampField::StartTime,
    };

    /// in_progress -> completed
    pub const COMPLETE: Transition = Transition {
        from: CustomerStatus::InProgress,
        to: CustomerStatus::Completed,
        stamp: TimestampField::CompleteTime,
    };

    /// pending -> completed, served straight from the queue
    pub const REMOVE: Transition = Transition {
        from: CustomerStatus::Pending,
        to: CustomerStatus::Completed,
        stamp: TimestampField::RemoveTime,
    };

    /// pending -> cancelled
    pub const CANCEL: Transition = Transition {
        from: CustomerStatus::Pending,
        to: CustomerStatus::Cancelled,
        stamp: TimestampField::RemoveTime,
    };

    /// True when the transition shrinks the pending set (positions must be reconciled)
    pub fn leaves_pending(&self) -> bool {
        self.from == CustomerStatus::Pending && self.to != CustomerStatus::Pending
    }
}

/// Validated input for a new pending customer
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub first_name: String,
    pub location: Location,
    pub add_time: i64,
}

/// Maximum accepted length of `first_name` (characters)
pub const MAX_FIRST_NAME_LEN: usize = 100;

impl NewCustomer {
    pub fn new(first_name: &str, location: Location, add_time: i64) -> Result<Self> {
        let first_name = first_name.trim();
        if first_name.is_empty() {
            return Err(DomainError::ValidationError(
                "first_name cannot be empty".to_string(),
            ));
        }
        if first_name.chars().count() > MAX_FIRST_NAME_LEN {
            return Err(DomainError::ValidationError(format!(
                "first_name too long (max {} characters)",
                MAX_FIRST_NAME_LEN
            )));
        }

        Ok(Self {
            first_name: first_name.to_string(),
            location,
            add_time,
        })
    }
}

/// Customer Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub first_name: String,
    pub location: String,
    pub status: CustomerStatus,
    pub queue_position: QueuePosition,

    pub add_time: i64, // epoch ms
    pub start_time: Option<i64>,
    pub complete_time: Option<i64>,
    pub remove_time: Option<i64>,
}

impl Customer {
    /// Build the pending row for a freshly assigned id and position
    #[cfg(test)]
    pub fn pending(customer_id: CustomerId, new: NewCustomer, queue_position: QueuePosition) -> Self {
        Self {
            customer_id,
            first_name: new.first_name,
            location: new.location.as_str().to_string(),
            status: CustomerStatus::Pending,
            queue_position,
            add_time: new.add_time,
            start_time: None,
            complete_time: None,
            remove_time: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == CustomerStatus::Pending
    }

    /// Apply a transition with an explicit timestamp
    ///
    /// Leaving pending always zeroes `queue_position`.
    #[cfg(test)]
    pub fn apply(&mut self, transition: Transition, now_millis: i64) -> Result<()> {
        if self.status != transition.from || !transition.from.can_transition_to(transition.to) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: transition.to.to_string(),
            });
        }

        self.status = transition.to;
        if transition.leaves_pending() {
            self.queue_position = 0;
        }
        match transition.stamp {
            TimestampField::StartTime => self.start_time = Some(now_millis),
            TimestampField::CompleteTime => self.complete_time = Some(now_millis),
            TimestampField::RemoveTime => self.remove_time = Some(now_millis),
        }
        Ok(())
    }
}
