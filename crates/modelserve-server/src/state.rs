//! Shared application state

use crate::config::ServerConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use modelserve_models::{Dispatcher, ModelRegistry, SharedRegistry};
use std::sync::Arc;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// Dispatcher over the read-only model registry
    pub dispatcher: Dispatcher,

    /// Prometheus handle for rendering `/metrics`; absent when no
    /// recorder was installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state over an already loaded registry
    pub fn new(config: ServerConfig, registry: SharedRegistry) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher: Dispatcher::new(registry),
            metrics_handle: None,
        }
    }

    /// Attach the installed Prometheus recorder
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }

    /// Get reference to the registry
    pub fn registry(&self) -> &ModelRegistry {
        self.dispatcher.registry()
    }
}
