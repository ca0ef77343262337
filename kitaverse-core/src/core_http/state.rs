//! Server state shared across requests

use crate::core_space::SpaceService;
use crate::health::{checks, HealthCheck, HealthChecker};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Server state shared across requests
#[derive(Clone)]
pub struct AppState {
    /// Membership registry
    pub spaces: SpaceService,

    /// Component health, refreshed on every health request
    pub health: Arc<HealthChecker>,

    /// Prometheus renderer, when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new server state
    pub fn new(spaces: SpaceService) -> Self {
        Self {
            spaces,
            health: Arc::new(HealthChecker::new(env!("CARGO_PKG_VERSION"))),
            metrics: None,
        }
    }

    /// Serve metrics through the given Prometheus handle
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Re-check the registry and return the overall report
    pub async fn refresh_health(&self) -> HealthCheck {
        let stats = self.spaces.stats().await;
        self.health.report(checks::check_registry(&stats)).await;
        self.health.check_health().await
    }

    /// Re-check the registry and report whether traffic can be served
    pub async fn refresh_readiness(&self) -> bool {
        let stats = self.spaces.stats().await;
        self.health.report(checks::check_registry(&stats)).await;
        self.health.readiness_check().await
    }
}
