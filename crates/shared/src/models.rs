//! Shared data models for the live-log stream.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FrameError;

// --- Levels ---

/// Severity of a log record, ordered from least to most severe.
///
/// Serialized in upper case. Deserialization goes through [`FromStr`], so
/// any letter case and the `WARN` shorthand are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" | "WARN" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            _ => Err(FrameError::UnknownLevel(s.trim().to_string())),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = FrameError;

    fn try_from(value: String) -> Result<Self, FrameError> {
        value.parse()
    }
}

// --- Events ---

/// One log record as emitted by the runtime.
///
/// `id` is assigned by the producer and is the only identity used for
/// deduplication; two records with the same message text are still
/// distinct events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub id: String,
    /// Server-assigned, sortable both lexically and chronologically.
    pub timestamp: String,
    pub level: LogLevel,
    pub module: String,
    pub message: String,
}

impl LogEvent {
    pub fn new(
        id: impl Into<String>,
        timestamp: impl Into<String>,
        level: LogLevel,
        module: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp: timestamp.into(),
            level,
            module: module.into(),
            message: message.into(),
        }
    }
}

impl AsRef<LogEvent> for LogEvent {
    fn as_ref(&self) -> &LogEvent {
        self
    }
}
