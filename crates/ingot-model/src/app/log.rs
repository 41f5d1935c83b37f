//! Log module configuration.

use ingot_macros::Message;
use serde::{Deserialize, Serialize};

/// Where a log stream is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogType {
    #[default]
    None,
    Console,
    File,
    Event,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    #[default]
    Unknown,
    Error,
    Warning,
    Info,
    Debug,
}

impl Severity {
    /// Parses a level name; `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warning" | "warn" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSpecification {
    pub kind: LogType,
    pub level: Severity,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Message)]
#[message(name = "ingot.app.log.Config")]
pub struct Config {
    pub error: Option<LogSpecification>,
    pub access: Option<LogSpecification>,
}
