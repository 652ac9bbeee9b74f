// Application Layer - Use Cases and Business Logic

pub mod queue;
pub mod reconciler;
pub mod retry;

// Re-exports
pub use queue::{EnqueueReceipt, EnqueueRequest, QueueCounts, QueueService};
pub use reconciler::PositionReconciler;
