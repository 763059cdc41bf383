//! Gateway state
//!
//! Application state for the gateway server.

use crate::connection::ConnectionRegistry;
use crate::dispatch::PushDispatcher;
use forum_common::{AppConfig, TokenVerifier};
use forum_service::ServiceContext;
use std::sync::Arc;
use tokio::sync::watch;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// Service context with repositories and services
    service_context: Arc<ServiceContext>,
    /// Connection registry for WebSocket connections
    registry: Arc<ConnectionRegistry>,
    /// Dispatcher draining the fan-out push queue
    dispatcher: Arc<PushDispatcher>,
    /// Bearer-token verifier for the handshake
    verifier: TokenVerifier,
    /// Shutdown signal; connection tasks exit when it fires
    shutdown: Arc<watch::Sender<bool>>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(
        service_context: ServiceContext,
        registry: Arc<ConnectionRegistry>,
        dispatcher: Arc<PushDispatcher>,
        verifier: TokenVerifier,
        config: AppConfig,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            service_context: Arc::new(service_context),
            registry,
            dispatcher,
            verifier,
            shutdown: Arc::new(shutdown),
            config: Arc::new(config),
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the connection registry
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Get the push dispatcher
    pub fn dispatcher(&self) -> &PushDispatcher {
        &self.dispatcher
    }

    /// Get the token verifier
    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Subscribe to the shutdown signal
    pub fn shutdown_rx(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    /// Signal every connection task to drain and exit
    pub fn begin_shutdown(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("registry", &self.registry)
            .field("dispatcher", &self.dispatcher)
            .field("config", &"AppConfig")
            .finish()
    }
}
