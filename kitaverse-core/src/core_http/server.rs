//! HTTP server implementation

use super::api::build_router;
use super::state::AppState;
use crate::config::Config;
use crate::core_space::SpaceService;
use crate::metrics::install_prometheus;
use crate::shutdown::{install_signal_handlers, ShutdownCoordinator, ShutdownSignal};
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

/// HTTP membership server
pub struct ApiServer {
    router: Router,
    shutdown: Arc<ShutdownCoordinator>,
}

impl ApiServer {
    /// Create a new server over the given state
    pub fn new(state: AppState, config: &Config, shutdown: Arc<ShutdownCoordinator>) -> Self {
        let router = build_router(Arc::new(state), config.server.enable_cors);
        Self { router, shutdown }
    }

    /// Serve on an already bound listener until a shutdown signal arrives
    ///
    /// After a graceful signal, in-flight requests get the coordinator's drain
    /// timeout to finish before the server gives up on them. An immediate
    /// signal cuts the drain short.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let addr = listener.local_addr()?;
        info!("Kitaverse API listening on {}", addr);

        let shutdown = self.shutdown.clone();
        let server = axum::serve(listener, self.router).with_graceful_shutdown({
            let shutdown = shutdown.clone();
            async move {
                shutdown.wait_for_shutdown().await;
            }
        });

        tokio::select! {
            result = server => {
                result.context("Unexpected error happened in server")?;
            }
            _ = drain_deadline(shutdown.clone()) => {
                warn!("Abandoning in-flight requests");
            }
        }

        shutdown.complete().await;
        Ok(())
    }

    /// Bind the address and serve until shutdown
    pub async fn run(self, addr: std::net::SocketAddr) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        self.serve(listener).await
    }
}

/// Resolves once in-flight requests should be abandoned
async fn drain_deadline(shutdown: Arc<ShutdownCoordinator>) {
    let mut signals = shutdown.subscribe();
    if shutdown.wait_for_shutdown().await == ShutdownSignal::Immediate {
        return;
    }

    let escalated = async {
        loop {
            match signals.recv().await {
                Ok(ShutdownSignal::Immediate) | Err(RecvError::Closed) => break,
                Ok(ShutdownSignal::Graceful) | Err(RecvError::Lagged(_)) => {}
            }
        }
    };

    tokio::select! {
        _ = tokio::time::sleep(shutdown.drain_timeout()) => {
            warn!("Drain timeout of {:?} elapsed", shutdown.drain_timeout());
        }
        _ = escalated => {
            warn!("Immediate shutdown requested during drain");
        }
    }
}

/// Build the registry, metrics and shutdown wiring from `config` and serve
pub async fn start_server(config: Config) -> Result<()> {
    let spaces = SpaceService::seeded(config.registry.entry_policy);
    info!(entry_policy = %config.registry.entry_policy, "Registry seeded");

    let mut state = AppState::new(spaces.clone());
    if config.metrics.enabled {
        let handle = install_prometheus()?;
        state = state.with_metrics(handle);
    }
    spaces.publish_occupancy().await;

    let shutdown = Arc::new(ShutdownCoordinator::new(config.server.shutdown_timeout));
    install_signal_handlers(shutdown.clone()).context("Failed to install signal handlers")?;

    let server = ApiServer::new(state, &config, shutdown);
    server.run(config.server.bind_address).await
}
