//! Reply message types.
//!
//! Replies answer both directions: the remote side replies to outbound
//! notifications sent with `expectsReply`, and the bridge replies to every
//! host call.
//!
//! # Format
//!
//! Success:
//! ```json
//! { "id": "uuid", "type": "success", "result": { ... } }
//! ```
//!
//! Error:
//! ```json
//! { "id": "uuid", "type": "error", "error": "not found", "message": "Instance not found: 4" }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::MessageId;

// ============================================================================
// Reply
// ============================================================================

/// Answer to a message, correlated by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    /// Matches the answered message's `id`.
    pub id: MessageId,

    /// Reply type.
    #[serde(rename = "type")]
    pub reply_type: ReplyType,

    /// Result data (if success).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error code (if error).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Error message (if error).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Reply {
    /// Creates a success reply.
    #[inline]
    #[must_use]
    pub fn success(id: MessageId, result: Value) -> Self {
        Self {
            id,
            reply_type: ReplyType::Success,
            result: Some(result),
            error: None,
            message: None,
        }
    }

    /// Creates an error reply describing `err`.
    #[inline]
    #[must_use]
    pub fn failure(id: MessageId, err: &Error) -> Self {
        Self {
            id,
            reply_type: ReplyType::Error,
            result: None,
            error: Some(err.code().to_string()),
            message: Some(err.to_string()),
        }
    }

    /// Returns `true` if this is a success reply.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.reply_type == ReplyType::Success
    }

    /// Returns `true` if this is an error reply.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.reply_type == ReplyType::Error
    }

    /// Extracts the result value, returning error if the reply was an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RemoteError`] if the reply was an error.
    pub fn into_result(self) -> Result<Value> {
        match self.reply_type {
            ReplyType::Success => Ok(self.result.unwrap_or(Value::Null)),
            ReplyType::Error => {
                let code = self.error.unwrap_or_else(|| "unknown error".to_string());
                let message = self.message.unwrap_or_else(|| code.clone());
                Err(Error::remote(code, message))
            }
        }
    }

    /// Gets a boolean value from the result.
    ///
    /// Returns `None` if key not found or not a boolean.
    #[inline]
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.result
            .as_ref()
            .and_then(|v| v.get(key))
            .and_then(Value::as_bool)
    }

    /// Gets a string value from the result.
    ///
    /// Returns empty string if key not found or not a string.
    #[inline]
    #[must_use]
    pub fn get_string(&self, key: &str) -> String {
        self.result
            .as_ref()
            .and_then(|v| v.get(key))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

// ============================================================================
// ReplyType
// ============================================================================

/// Reply type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyType {
    /// Successful reply.
    Success,
    /// Error reply.
    Error,
}

// ============================================================================
// Tests
// ============================================================================
