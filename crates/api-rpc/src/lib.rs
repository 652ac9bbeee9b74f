//! JSON-RPC API Layer
//!
//! Thin JSON-RPC 2.0 adapter in front of the queue service. Holds no queue
//! logic of its own.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig};
