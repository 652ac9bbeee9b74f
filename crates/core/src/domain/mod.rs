// Domain Layer - Pure business logic and entities

pub mod customer;
pub mod error;
pub mod location;
pub mod reconcile;

// Re-exports
pub use customer::{
    Customer, CustomerId, CustomerStatus, CustomerTarget, NewCustomer, QueuePosition,
    TimestampField, Transition,
};
pub use error::DomainError;
pub use location::{Location, LocationSet};
pub use reconcile::{PendingSlot, PositionUpdate};
