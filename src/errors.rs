use std::fmt::{self, Display};
use std::io;

use logger::LoggerError;
use operations::errors::{ProfileError, SessionError, SettingsError};
use simulator::SimError;

/// Errors raised while loading the dashboard configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    IoError(io::Error),
    /// The configuration file is not a valid configuration document.
    Json(serde_json::Error),
    /// A value is outside of its accepted range.
    InvalidValue(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "I/O Error: {}", e),
            ConfigError::Json(e) => write!(f, "Invalid configuration file: {}", e),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::InvalidValue(_) => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(error: io::Error) -> Self {
        ConfigError::IoError(error)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::Json(error)
    }
}

/// Any failure surfaced by the dashboard to its front-end.
#[derive(Debug)]
pub enum DashboardError {
    /// A shared store lock was poisoned by a panicking thread.
    LockError(String),
    ConfigError(ConfigError),
    LoggerError(LoggerError),
    SimError(SimError),
    SettingsError(SettingsError),
    SessionError(SessionError),
    ProfileError(ProfileError),
    /// A console command was malformed.
    InvalidInput(String),
}

impl Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::LockError(store) => write!(f, "Failed to acquire lock on {}", store),
            DashboardError::ConfigError(e) => write!(f, "{}", e),
            DashboardError::LoggerError(e) => write!(f, "Logger Error: {}", e),
            DashboardError::SimError(e) => write!(f, "Simulation Error: {}", e),
            DashboardError::SettingsError(e) => write!(f, "{}", e),
            DashboardError::SessionError(e) => write!(f, "{}", e),
            DashboardError::ProfileError(e) => write!(f, "{}", e),
            DashboardError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DashboardError::ConfigError(e) => Some(e),
            DashboardError::LoggerError(e) => Some(e),
            DashboardError::SimError(e) => Some(e),
            DashboardError::SettingsError(e) => Some(e),
            DashboardError::SessionError(e) => Some(e),
            DashboardError::ProfileError(e) => Some(e),
            DashboardError::LockError(_) | DashboardError::InvalidInput(_) => None,
        }
    }
}

impl From<ConfigError> for DashboardError {
    fn from(error: ConfigError) -> Self {
        DashboardError::ConfigError(error)
    }
}

impl From<LoggerError> for DashboardError {
    fn from(error: LoggerError) -> Self {
        DashboardError::LoggerError(error)
    }
}

impl From<SimError> for DashboardError {
    fn from(error: SimError) -> Self {
        DashboardError::SimError(error)
    }
}

impl From<SettingsError> for DashboardError {
    fn from(error: SettingsError) -> Self {
        DashboardError::SettingsError(error)
    }
}

impl From<SessionError> for DashboardError {
    fn from(error: SessionError) -> Self {
        DashboardError::SessionError(error)
    }
}

impl From<ProfileError> for DashboardError {
    fn from(error: ProfileError) -> Self {
        DashboardError::ProfileError(error)
    }
}
