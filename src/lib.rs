//! Operations state of a flight-control dashboard: seeded domain stores, a
//! simulated live feed and a console front-end over them.

pub mod config;
pub mod console;
pub mod dashboard;
pub mod errors;

pub use config::DashboardConfig;
pub use dashboard::{Dashboard, UpdaterState};
pub use errors::{ConfigError, DashboardError};
