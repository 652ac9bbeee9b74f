// Port Layer - Interfaces for external dependencies

pub mod customer_repository;
pub mod time_provider; // For deterministic testing
pub mod transaction;

// Re-exports
pub use customer_repository::CustomerRepository;
pub use time_provider::TimeProvider;
pub use transaction::{CustomerRepositoryTransaction, Transaction, TransactionalCustomerRepository};
