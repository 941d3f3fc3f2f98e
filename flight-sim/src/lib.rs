//! Simulated live feed of the flight-control dashboard: periodic telemetry
//! for in-progress flights and synthesized operational alerts.

pub mod types;

pub use types::alerts::{AlertGenerator, AlertTemplate, DEFAULT_TEMPLATES};
pub use types::sim_error::SimError;
pub use types::telemetry::{RandomWalk, TelemetryStrategy, WalkLimits};
pub use types::ticker::Ticker;
pub use types::updater::{
    LiveUpdater, UpdaterHandle, UpdaterIntervals, ALERT_INTERVAL_MILLIS, TELEMETRY_INTERVAL_MILLIS,
};
