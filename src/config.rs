use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use logger::LogLevel;
use operations::session::SESSION_KEY;
use serde::{Deserialize, Serialize};
use simulator::{UpdaterIntervals, WalkLimits, ALERT_INTERVAL_MILLIS, TELEMETRY_INTERVAL_MILLIS};

use crate::errors::ConfigError;

/// Environment variable read when no configuration path is given on the
/// command line.
pub const CONFIG_ENV_VAR: &str = "FLIGHT_CONTROL_CONFIG";

/// Runtime configuration of the dashboard. Every field is optional in the
/// JSON document and falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    pub log_dir: PathBuf,
    pub log_level: String,
    pub log_to_console: bool,
    pub session_file: PathBuf,
    pub telemetry_interval_ms: u64,
    pub alert_interval_ms: u64,
    pub alert_probability: f64,
    pub fuel_floor: f64,
    pub max_progress_step: f64,
    /// Artificial latency of the mock sign-in and profile calls.
    pub simulated_delay_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            log_dir: PathBuf::from("logs"),
            log_level: "info".to_string(),
            log_to_console: false,
            session_file: PathBuf::from(format!("{}.json", SESSION_KEY)),
            telemetry_interval_ms: TELEMETRY_INTERVAL_MILLIS,
            alert_interval_ms: ALERT_INTERVAL_MILLIS,
            alert_probability: 0.1,
            fuel_floor: 10.0,
            max_progress_step: 2.0,
            simulated_delay_ms: 1000,
        }
    }
}

impl DashboardConfig {
    /// Resolves the configuration for a run.
    ///
    /// # Parameters
    /// - `args`: command line arguments, program name first. `args[1]`, when
    ///   present, is the configuration path.
    ///
    /// # Returns
    /// The configuration read from the command line path, else from the path
    /// in `FLIGHT_CONTROL_CONFIG`, else the defaults.
    pub fn load(args: &[String]) -> Result<Self, ConfigError> {
        if let Some(path) = args.get(1) {
            return Self::from_file(Path::new(path));
        }
        match env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(path.trim())),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level()?;
        if self.telemetry_interval_ms == 0 || self.alert_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "update intervals must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.alert_probability) {
            return Err(ConfigError::InvalidValue(format!(
                "alert probability {} is not within [0, 1]",
                self.alert_probability
            )));
        }
        if !(0.0..=100.0).contains(&self.fuel_floor) {
            return Err(ConfigError::InvalidValue(format!(
                "fuel floor {} is not a percentage",
                self.fuel_floor
            )));
        }
        if self.max_progress_step.is_nan() || self.max_progress_step < 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "progress step {} is negative",
                self.max_progress_step
            )));
        }
        Ok(())
    }

    pub fn level(&self) -> Result<LogLevel, ConfigError> {
        LogLevel::from_str(&self.log_level).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }

    pub fn intervals(&self) -> UpdaterIntervals {
        UpdaterIntervals {
            telemetry_millis: self.telemetry_interval_ms,
            alert_millis: self.alert_interval_ms,
        }
    }

    pub fn walk_limits(&self) -> WalkLimits {
        WalkLimits {
            max_progress_step: self.max_progress_step,
            fuel_floor: self.fuel_floor,
            ..WalkLimits::default()
        }
    }
}
