use chrono::Utc;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Severity of a log line. Lines below the logger's minimum level are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn label(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(level: &str) -> Result<Self, Self::Err> {
        match level.trim().to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(LoggerError::InvalidLevel(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    White,
}

impl Color {
    fn to_ansi_code(self) -> &'static str {
        match self {
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Blue => "\x1b[34m",
            Color::Yellow => "\x1b[33m",
            Color::Cyan => "\x1b[36m",
            Color::Magenta => "\x1b[35m",
            Color::White => "\x1b[37m",
        }
    }
}

/// Appends timestamped lines to `<dir>/<name>.log`, optionally echoing them
/// to the console.
///
/// The logger holds no open handle, so clones can be moved freely into the
/// updater threads.
#[derive(Debug, Clone)]
pub struct Logger {
    log_file: PathBuf,
    min_level: LogLevel,
    echo: bool,
}

impl Logger {
    /// Creates a new `Logger` writing to `log_dir/<name>.log`.
    ///
    /// # Parameters
    /// - `log_dir`: Directory for the log file. Created when missing.
    /// - `name`: Component name used for the file name (`dashboard`, `updater`, ...).
    ///
    /// # Returns
    /// A new `Logger` with `Info` as minimum level and console echo disabled.
    pub fn new(log_dir: &Path, name: &str) -> Result<Self, LoggerError> {
        if log_dir.exists() && !log_dir.is_dir() {
            return Err(LoggerError::InvalidPath(format!(
                "{} is not a directory",
                log_dir.display()
            )));
        }
        fs::create_dir_all(log_dir)?;

        let sanitized = name.replace([':', '/', ' '], "_");
        let log_file = log_dir.join(format!("{}.log", sanitized));

        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&log_file)?;

        Ok(Logger {
            log_file,
            min_level: LogLevel::Info,
            echo: false,
        })
    }

    pub fn with_level(mut self, min_level: LogLevel) -> Self {
        self.min_level = min_level;
        self
    }

    pub fn with_console(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn path(&self) -> &Path {
        &self.log_file
    }

    fn log(&self, level: LogLevel, color: Option<Color>, message: &str) -> Result<(), LoggerError> {
        if level < self.min_level {
            return Ok(());
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("[{}] [{}]: {}\n", level.label(), timestamp, message);

        if self.echo {
            let colored = match (level, color) {
                (LogLevel::Warn, _) => format!("\x1b[93m{}\x1b[0m", line),
                (LogLevel::Error, _) => format!("\x1b[91m{}\x1b[0m", line),
                (_, Some(color)) => format!("{}{}\x1b[0m", color.to_ansi_code(), line),
                (_, None) => line.clone(),
            };
            print!("{}", colored);
            io::stdout().flush()?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    pub fn debug(&self, message: &str) -> Result<(), LoggerError> {
        self.log(LogLevel::Debug, None, message)
    }

    /// Logs an informational message.
    pub fn info(&self, message: &str) -> Result<(), LoggerError> {
        self.log(LogLevel::Info, None, message)
    }

    /// Logs an informational message, coloured when echoed to the console.
    pub fn info_colored(&self, message: &str, color: Color) -> Result<(), LoggerError> {
        self.log(LogLevel::Info, Some(color), message)
    }

    /// Logs a warning message.
    pub fn warn(&self, message: &str) -> Result<(), LoggerError> {
        self.log(LogLevel::Warn, None, message)
    }

    /// Logs an error message.
    pub fn error(&self, message: &str) -> Result<(), LoggerError> {
        self.log(LogLevel::Error, None, message)
    }
}

#[derive(Debug)]
pub enum LoggerError {
    IoError(io::Error),
    InvalidPath(String),
    InvalidLevel(String),
}

impl fmt::Display for LoggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggerError::IoError(e) => write!(f, "I/O Error: {}", e),
            LoggerError::InvalidPath(msg) => write!(f, "Invalid Path: {}", msg),
            LoggerError::InvalidLevel(level) => write!(f, "Invalid log level: {}", level),
        }
    }
}

impl std::error::Error for LoggerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggerError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LoggerError {
    fn from(err: io::Error) -> Self {
        LoggerError::IoError(err)
    }
}
