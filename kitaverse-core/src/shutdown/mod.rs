//! Graceful shutdown coordinator

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::{error, info, warn};

/// Shutdown signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// Stop accepting work and drain in-flight requests
    Graceful,
    /// Stop now
    Immediate,
}

/// Shutdown state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownState {
    Running,
    ShuttingDown,
    Shutdown,
}

/// Graceful shutdown coordinator
pub struct ShutdownCoordinator {
    state: Arc<RwLock<ShutdownState>>,
    shutdown_tx: broadcast::Sender<ShutdownSignal>,
    drain_timeout: Duration,
}

impl ShutdownCoordinator {
    /// Create a new shutdown coordinator
    pub fn new(drain_timeout: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(16);

        Self {
            state: Arc::new(RwLock::new(ShutdownState::Running)),
            shutdown_tx,
            drain_timeout,
        }
    }

    /// How long in-flight work may run after a graceful signal
    pub fn drain_timeout(&self) -> Duration {
        self.drain_timeout
    }

    /// Subscribe to shutdown notifications
    pub fn subscribe(&self) -> broadcast::Receiver<ShutdownSignal> {
        self.shutdown_tx.subscribe()
    }

    /// Initiate graceful shutdown
    pub async fn shutdown(&self) {
        let mut state = self.state.write().await;
        if *state != ShutdownState::Running {
            warn!("Shutdown already in progress");
            return;
        }

        info!("Initiating graceful shutdown");
        *state = ShutdownState::ShuttingDown;
        drop(state);

        if let Err(e) = self.shutdown_tx.send(ShutdownSignal::Graceful) {
            // No subscribers is fine; nothing is running
            warn!("No component received the shutdown signal: {}", e);
        }
    }

    /// Initiate immediate shutdown
    pub async fn shutdown_immediately(&self) {
        warn!("Initiating immediate shutdown");

        let mut state = self.state.write().await;
        *state = ShutdownState::Shutdown;
        drop(state);

        if let Err(e) = self.shutdown_tx.send(ShutdownSignal::Immediate) {
            warn!("No component received the immediate shutdown signal: {}", e);
        }
    }

    /// React to an operator stop request
    ///
    /// Starts a graceful shutdown, or escalates to an immediate one when a
    /// shutdown is already under way. Returns the signal that was sent.
    pub async fn request_shutdown(&self) -> ShutdownSignal {
        if self.is_shutting_down().await {
            self.shutdown_immediately().await;
            ShutdownSignal::Immediate
        } else {
            self.shutdown().await;
            ShutdownSignal::Graceful
        }
    }

    /// Mark shutdown as finished
    pub async fn complete(&self) {
        *self.state.write().await = ShutdownState::Shutdown;
        info!("Shutdown complete");
    }

    /// Check if shutdown is in progress
    pub async fn is_shutting_down(&self) -> bool {
        let state = self.state.read().await;
        *state == ShutdownState::ShuttingDown || *state == ShutdownState::Shutdown
    }

    /// Get current state
    pub async fn state(&self) -> ShutdownState {
        *self.state.read().await
    }

    /// Wait for a shutdown signal, returning at once if one was already sent
    pub async fn wait_for_shutdown(&self) -> ShutdownSignal {
        let mut rx = self.subscribe();

        match self.state().await {
            ShutdownState::Running => {}
            ShutdownState::ShuttingDown => return ShutdownSignal::Graceful,
            ShutdownState::Shutdown => return ShutdownSignal::Immediate,
        }

        match rx.recv().await {
            Ok(signal) => signal,
            Err(e) => {
                error!("Shutdown channel error: {}", e);
                ShutdownSignal::Immediate
            }
        }
    }
}

/// Install signal handlers for graceful shutdown
///
/// The first SIGINT/SIGTERM starts a graceful shutdown, a second one forces
/// an immediate shutdown.
#[cfg(unix)]
pub fn install_signal_handlers(coordinator: Arc<ShutdownCoordinator>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM");
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT");
                }
            }
            if coordinator.request_shutdown().await == ShutdownSignal::Immediate {
                break;
            }
        }
    });

    Ok(())
}

/// Install signal handlers for graceful shutdown (Windows)
///
/// A second Ctrl+C forces an immediate shutdown.
#[cfg(windows)]
pub fn install_signal_handlers(coordinator: Arc<ShutdownCoordinator>) -> std::io::Result<()> {
    tokio::spawn(async move {
        loop {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C");
                    if coordinator.request_shutdown().await == ShutdownSignal::Immediate {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to listen for Ctrl+C: {}", e);
                    break;
                }
            }
        }
    });

    Ok(())
}
