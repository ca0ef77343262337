//! Metrics collection and export for observability

use crate::core_space::{ErrorKind, Space, SpaceId};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

pub const ENTER_TOTAL: &str = "kitaverse.space.enter.total";
pub const ENTER_REJECTED: &str = "kitaverse.space.enter.rejected";
pub const LEAVE_TOTAL: &str = "kitaverse.space.leave.total";
pub const LEAVE_REJECTED: &str = "kitaverse.space.leave.rejected";
pub const OCCUPANTS: &str = "kitaverse.space.occupants";
pub const LOCK_WAIT_MS: &str = "kitaverse.registry.lock_wait_ms";

/// Initialize metrics with descriptions
pub fn init_metrics() {
    describe_counter!(ENTER_TOTAL, "Number of successful space entries");
    describe_counter!(ENTER_REJECTED, "Number of rejected space entries, by reason");
    describe_counter!(LEAVE_TOTAL, "Number of successful space exits");
    describe_counter!(LEAVE_REJECTED, "Number of rejected space exits, by reason");
    describe_gauge!(OCCUPANTS, "Current occupant count per space");
    describe_histogram!(LOCK_WAIT_MS, "Time spent waiting for the registry write lock in milliseconds");
}

/// Install the global Prometheus recorder and return a handle for rendering
///
/// Fails if another recorder is already installed.
pub fn install_prometheus() -> Result<PrometheusHandle, MetricsError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;
    init_metrics();
    Ok(handle)
}

/// Record a successful entry and the resulting occupancy
pub fn record_enter(space: &Space) {
    counter!(ENTER_TOTAL, "space_id" => space.id.to_string()).increment(1);
    record_occupancy(space.id, space.occupant_count);
}

/// Record a rejected entry
pub fn record_enter_rejected(kind: ErrorKind) {
    counter!(ENTER_REJECTED, "reason" => kind.as_str()).increment(1);
}

/// Record a successful exit and the resulting occupancy
pub fn record_leave(space: &Space) {
    counter!(LEAVE_TOTAL, "space_id" => space.id.to_string()).increment(1);
    record_occupancy(space.id, space.occupant_count);
}

/// Record a rejected exit
pub fn record_leave_rejected(kind: ErrorKind) {
    counter!(LEAVE_REJECTED, "reason" => kind.as_str()).increment(1);
}

/// Set the occupancy gauge of one space
pub fn record_occupancy(space_id: SpaceId, occupants: u32) {
    gauge!(OCCUPANTS, "space_id" => space_id.to_string()).set(f64::from(occupants));
}

/// Record how long a mutation waited for the registry lock
pub fn record_lock_wait(waited: Duration) {
    histogram!(LOCK_WAIT_MS).record(waited.as_secs_f64() * 1000.0);
}

/// Metrics subsystem errors
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Failed to install metrics recorder: {0}")]
    InstallFailed(String),
}
