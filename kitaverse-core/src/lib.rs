//! Kitaverse core: the Space membership registry and its HTTP surface.

pub mod config;
pub mod core_http;
pub mod core_space;
pub mod health;
pub mod logging;
pub mod metrics;
pub mod shutdown;

pub use config::Config;
pub use core_http::{build_router, start_server, ApiServer, AppState};
pub use core_space::{EntryPolicy, MembershipError, SpaceRegistry, SpaceService};
pub use logging::{init_logging, init_logging_with_config, LogConfig, LogLevel};
