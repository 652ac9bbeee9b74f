//! JSON-RPC Server
//!
//! Serves the queue methods over HTTP JSON-RPC 2.0.

use crate::error::invalid_params;
use crate::handler::RpcHandler;
use crate::types::{CustomerIdRequest, EnqueueRequest, PositionRequest};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::types::ErrorObjectOwned;
use jsonrpsee::RpcModule;
use std::sync::Arc;
use tracing::info;
use walkin_core::application::QueueService;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9530;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

/// Register a method whose params deserialize into `$req`
macro_rules! register {
    ($module:expr, $handler:expr, $name:literal, $req:ty, $method:ident) => {{
        let handler = $handler.clone();
        $module
            .register_async_method($name, move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: $req = params.parse().map_err(invalid_params)?;
                    handler.$method(req).await
                }
            })
            .map_err(|e| e.to_string())?;
    }};
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, service: Arc<QueueService>) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(service)),
        }
    }

    /// Build the method table
    pub fn module(&self) -> Result<RpcModule<()>, String> {
        let mut module = RpcModule::new(());

        register!(module, self.handler, "queue.enqueue.v1", EnqueueRequest, enqueue);
        register!(module, self.handler, "queue.get.v1", CustomerIdRequest, get);
        register!(module, self.handler, "queue.at_position.v1", PositionRequest, at_position);
        register!(module, self.handler, "queue.promote.v1", CustomerIdRequest, promote);
        register!(module, self.handler, "queue.complete.v1", CustomerIdRequest, complete);
        register!(module, self.handler, "queue.remove.v1", PositionRequest, remove);
        register!(module, self.handler, "queue.cancel.v1", CustomerIdRequest, cancel);

        let handler = self.handler.clone();
        module
            .register_async_method("queue.list.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.list().await }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_method("meta.locations.v1", move |_, _, _| {
                Ok::<_, ErrorObjectOwned>(handler.locations())
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("admin.health.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.health().await }
            })
            .map_err(|e| e.to_string())?;

        Ok(module)
    }

    /// Start the JSON-RPC server
    pub async fn start(self) -> Result<ServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let module = self.module()?;
        let handle = server.start(module);

        info!("JSON-RPC server started successfully");
        Ok(handle)
    }
}
