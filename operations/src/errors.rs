use std::fmt::{self, Display};
use std::io;

/// A label that does not name any variant of a closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: &str) -> Self {
        UnknownVariant {
            kind,
            value: value.to_string(),
        }
    }
}

impl Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

/// Errors raised while exporting or importing the system settings.
#[derive(Debug)]
pub enum SettingsError {
    /// The JSON text could not be produced or parsed.
    Json(serde_json::Error),
    /// The export file could not be written.
    IoError(io::Error),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Json(e) => write!(f, "Invalid settings document: {}", e),
            SettingsError::IoError(e) => write!(f, "I/O Error: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Json(e) => Some(e),
            SettingsError::IoError(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(error: serde_json::Error) -> Self {
        SettingsError::Json(error)
    }
}

impl From<io::Error> for SettingsError {
    fn from(error: io::Error) -> Self {
        SettingsError::IoError(error)
    }
}

/// Expected failures of the profile forms. The `Display` text is the message
/// shown next to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    PasswordMismatch,
    PasswordTooShort(usize),
    IncorrectCurrentPassword,
    IncorrectPassword,
    FileTooLarge(u64),
}

impl Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::PasswordMismatch => write!(f, "New passwords do not match"),
            ProfileError::PasswordTooShort(min) => {
                write!(f, "Password must be at least {} characters long", min)
            }
            ProfileError::IncorrectCurrentPassword => write!(f, "Current password is incorrect"),
            ProfileError::IncorrectPassword => write!(f, "Password is incorrect"),
            ProfileError::FileTooLarge(limit) => {
                write!(f, "File size must be less than {}MB", limit / (1024 * 1024))
            }
        }
    }
}

impl std::error::Error for ProfileError {}

/// Errors of the login flow and of the session-token slot.
#[derive(Debug)]
pub enum SessionError {
    InvalidCredentials,
    UserExists(String),
    /// The slot could not be read or written.
    IoError(io::Error),
    /// The stored token is not a valid session document.
    Corrupt(serde_json::Error),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidCredentials => write!(f, "Invalid email or password"),
            SessionError::UserExists(email) => {
                write!(f, "User with this email already exists: {}", email)
            }
            SessionError::IoError(e) => write!(f, "I/O Error: {}", e),
            SessionError::Corrupt(e) => write!(f, "Corrupt session token: {}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::IoError(e) => Some(e),
            SessionError::Corrupt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(error: io::Error) -> Self {
        SessionError::IoError(error)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(error: serde_json::Error) -> Self {
        SessionError::Corrupt(error)
    }
}
