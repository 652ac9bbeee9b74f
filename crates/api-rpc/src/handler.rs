//! RPC Method Handlers
//!
//! Translate each JSON-RPC method into one queue service call.

use crate::error::to_rpc_error;
use crate::types::{
    ActionResponse, CustomerIdRequest, CustomerResponse, EnqueueRequest, EnqueueResponse,
    HealthResponse, PositionRequest, QueueEntry,
};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use walkin_core::application::queue::{self, QueueService};

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<QueueService>,
    start_time: std::time::Instant,
}

impl RpcHandler {
    pub fn new(service: Arc<QueueService>) -> Self {
        Self {
            service,
            start_time: std::time::Instant::now(),
        }
    }

    /// queue.enqueue.v1
    pub async fn enqueue(
        &self,
        params: EnqueueRequest,
    ) -> Result<EnqueueResponse, ErrorObjectOwned> {
        let receipt = self
            .service
            .enqueue(queue::EnqueueRequest {
                first_name: params.first_name,
                location: params.location,
            })
            .await
            .map_err(to_rpc_error)?;

        Ok(EnqueueResponse {
            customer_id: receipt.customer_id,
            queue_position: receipt.queue_position,
        })
    }

    /// queue.list.v1
    pub async fn list(&self) -> Result<Vec<QueueEntry>, ErrorObjectOwned> {
        let pending = self.service.list_queue().await.map_err(to_rpc_error)?;
        Ok(pending.into_iter().map(QueueEntry::from).collect())
    }

    /// queue.at_position.v1
    pub async fn at_position(
        &self,
        params: PositionRequest,
    ) -> Result<CustomerResponse, ErrorObjectOwned> {
        self.service
            .get_by_position(params.position)
            .await
            .map(CustomerResponse::from)
            .map_err(to_rpc_error)
    }

    /// queue.get.v1
    pub async fn get(
        &self,
        params: CustomerIdRequest,
    ) -> Result<CustomerResponse, ErrorObjectOwned> {
        self.service
            .get_status(params.customer_id)
            .await
            .map(CustomerResponse::from)
            .map_err(to_rpc_error)
    }

    /// queue.promote.v1
    pub async fn promote(
        &self,
        params: CustomerIdRequest,
    ) -> Result<CustomerResponse, ErrorObjectOwned> {
        self.service
            .promote(params.customer_id)
            .await
            .map(CustomerResponse::from)
            .map_err(to_rpc_error)
    }

    /// queue.complete.v1
    pub async fn complete(
        &self,
        params: CustomerIdRequest,
    ) -> Result<ActionResponse, ErrorObjectOwned> {
        let customer = self
            .service
            .complete(params.customer_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(ActionResponse {
            customer_id: customer.customer_id,
            message: "Customer completed".to_string(),
        })
    }

    /// queue.remove.v1
    pub async fn remove(
        &self,
        params: PositionRequest,
    ) -> Result<ActionResponse, ErrorObjectOwned> {
        let customer = self
            .service
            .complete_by_position(params.position)
            .await
            .map_err(to_rpc_error)?;

        Ok(ActionResponse {
            customer_id: customer.customer_id,
            message: "Removed and reordered successfully".to_string(),
        })
    }

    /// queue.cancel.v1
    pub async fn cancel(
        &self,
        params: CustomerIdRequest,
    ) -> Result<ActionResponse, ErrorObjectOwned> {
        let customer = self
            .service
            .cancel(params.customer_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(ActionResponse {
            customer_id: customer.customer_id,
            message: "Customer left the queue".to_string(),
        })
    }

    /// meta.locations.v1
    pub fn locations(&self) -> Vec<String> {
        self.service.locations().iter().map(str::to_string).collect()
    }

    /// admin.health.v1
    pub async fn health(&self) -> Result<HealthResponse, ErrorObjectOwned> {
        let counts = self.service.counts().await.map_err(to_rpc_error)?;

        Ok(HealthResponse {
            status: "ok".to_string(),
            pending: counts.pending,
            in_progress: counts.in_progress,
            completed: counts.completed,
            cancelled: counts.cancelled,
            uptime_seconds: self.start_time.elapsed().as_secs() as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::code;
    use walkin_core::domain::{CustomerStatus, LocationSet};
    use walkin_core::port::time_provider::SystemTimeProvider;
    use walkin_infra_sqlite::{create_pool, run_migrations, SqliteCustomerRepository};

    async fn setup_handler() -> RpcHandler {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        let repo = Arc::new(SqliteCustomerRepository::new(pool));
        let service = QueueService::new(
            repo.clone(),
            repo,
            Arc::new(LocationSet::new(["north", "south"]).unwrap()),
            Arc::new(SystemTimeProvider),
        );
        RpcHandler::new(Arc::new(service))
    }

    fn join(name: &str) -> EnqueueRequest {
        EnqueueRequest {
            first_name: name.to_string(),
            location: "north".to_string(),
        }
    }

    #[tokio::test]
    async fn test_enqueue_and_list() {
        let handler = setup_handler().await;

        let first = handler.enqueue(join("Ada")).await.unwrap();
        let second = handler.enqueue(join("Grace")).await.unwrap();
        assert_eq!(first.queue_position, 1);
        assert_eq!(second.queue_position, 2);

        let list = handler.list().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].first_name, "Grace");
    }

    #[tokio::test]
    async fn test_unknown_location_is_validation_error() {
        let handler = setup_handler().await;
        let err = handler
            .enqueue(EnqueueRequest {
                first_name: "Ada".to_string(),
                location: "west".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::VALIDATION_ERROR);
    }

    #[tokio::test]
    async fn test_remove_then_lookup_missing_position() {
        let handler = setup_handler().await;
        handler.enqueue(join("Ada")).await.unwrap();
        handler.enqueue(join("Grace")).await.unwrap();

        let removed = handler.remove(PositionRequest { position: 1 }).await.unwrap();
        let removed = handler
            .get(CustomerIdRequest {
                customer_id: removed.customer_id,
            })
            .await
            .unwrap();
        assert_eq!(removed.status, CustomerStatus::Completed);

        let err = handler
            .at_position(PositionRequest { position: 2 })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::NOT_FOUND);

        let grace = handler.at_position(PositionRequest { position: 1 }).await.unwrap();
        assert_eq!(grace.first_name, "Grace");
    }

    #[tokio::test]
    async fn test_promote_complete_and_health() {
        let handler = setup_handler().await;
        let ada = handler.enqueue(join("Ada")).await.unwrap();
        let id = CustomerIdRequest {
            customer_id: ada.customer_id,
        };

        let promoted = handler.promote(id).await.unwrap();
        assert_eq!(promoted.status, CustomerStatus::InProgress);

        handler
            .complete(CustomerIdRequest {
                customer_id: ada.customer_id,
            })
            .await
            .unwrap();

        let health = handler.health().await.unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.completed, 1);
        assert_eq!(health.pending, 0);
    }

    #[tokio::test]
    async fn test_locations_in_configured_order() {
        let handler = setup_handler().await;
        assert_eq!(handler.locations(), vec!["north", "south"]);
    }
}
