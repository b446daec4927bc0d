//! Console message values.

use serde::{Deserialize, Serialize};

/// Severity of a console message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    /// `console.debug`.
    Debug,
    /// `console.error`.
    Error,
    /// `console.log`.
    Log,
    /// Engine hint.
    Tip,
    /// `console.warn`.
    Warning,
}

/// A message written to the page console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleMessage {
    /// Message text.
    pub message: String,
    /// Severity.
    pub level: ConsoleLevel,
    /// Script that emitted the message.
    pub source_id: String,
    /// Line in `source_id`.
    pub line_number: u32,
}

impl ConsoleMessage {
    /// Creates a `log` level message with no source.
    #[must_use]
    pub fn log(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: ConsoleLevel::Log,
            source_id: String::new(),
            line_number: 0,
        }
    }
}
