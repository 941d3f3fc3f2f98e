use std::fmt;

/// Represents errors that can occur while running the live updater.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    InvalidInterval(u64),     // Tick intervals must be positive
    InvalidProbability(f64),  // Alert probability outside [0, 1]
    LockError(String),        // A shared store lock was poisoned
    TickerStartError(String), // The ticker thread could not be spawned
}

/// Implement the Display trait for user-friendly error messages
impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidInterval(millis) => {
                write!(f, "Invalid tick interval: {} ms", millis)
            }
            SimError::InvalidProbability(probability) => {
                write!(f, "Invalid alert probability: {}", probability)
            }
            SimError::LockError(msg) => write!(f, "Lock error: {}", msg),
            SimError::TickerStartError(msg) => write!(f, "Ticker start error: {}", msg),
        }
    }
}

impl std::error::Error for SimError {}
