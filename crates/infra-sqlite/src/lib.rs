// Walk-in Queue Infrastructure - SQLite Adapter
// Implements: CustomerRepository, TransactionalCustomerRepository

mod connection;
mod customer_repository;
mod error;
mod migration;
mod transaction;

pub use connection::{create_pool, ping};
pub use customer_repository::SqliteCustomerRepository;
pub use migration::run_migrations;
pub use transaction::SqliteCustomerTransaction;
