//! Error types for the web view bridge.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```no_run
//! use webview_bridge::{Bridge, InstanceId, Result};
//!
//! fn lookup(bridge: &Bridge, id: InstanceId) -> Result<()> {
//!     let view = bridge.registry().get_web_view(id)?;
//!     view.load_url("https://example.com");
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Registry | [`Error::DuplicateId`], [`Error::DuplicateObject`], [`Error::NotFound`], [`Error::TypeMismatch`] |
//! | Chooser | [`Error::PermissionDenied`], [`Error::ExternalActorAbandoned`] |
//! | Transport | [`Error::Connection`], [`Error::ConnectionClosed`], [`Error::ReplyTimeout`] |
//! | Protocol | [`Error::Protocol`], [`Error::UnknownMethod`], [`Error::RemoteError`] |
//! | Configuration | [`Error::Config`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::WebSocket`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::identifiers::{ChooserRequestId, InstanceId, MessageId};

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Registry Errors
    // ========================================================================
    /// Identifier already names a live instance.
    ///
    /// Returned by registry insertion; existing mappings are untouched.
    #[error("Instance id already in use: {instance_id}")]
    DuplicateId {
        /// The identifier that is already taken.
        instance_id: InstanceId,
    },

    /// Object is already registered under another identifier.
    #[error("Object already registered as {existing}, cannot add as {requested}")]
    DuplicateObject {
        /// Identifier the object is currently registered under.
        existing: InstanceId,
        /// Identifier the caller tried to register it under.
        requested: InstanceId,
    },

    /// Identifier is unknown or its object was released.
    #[error("Instance not found: {instance_id}")]
    NotFound {
        /// The missing identifier.
        instance_id: InstanceId,
    },

    /// Identifier names an instance of a different kind.
    #[error("Instance {instance_id} is a {actual}, expected {expected}")]
    TypeMismatch {
        /// The identifier that was looked up.
        instance_id: InstanceId,
        /// Kind the caller expected.
        expected: &'static str,
        /// Kind actually registered.
        actual: &'static str,
    },

    // ========================================================================
    // Chooser Errors
    // ========================================================================
    /// Runtime permission was not granted.
    ///
    /// Recoverable: the chooser continues without capture options.
    #[error("Permission denied: {permission}")]
    PermissionDenied {
        /// Name of the denied permission.
        permission: String,
    },

    /// External picker went away without delivering a result.
    ///
    /// Recovered by completing the request with an empty selection.
    #[error("External picker abandoned request {request_id}")]
    ExternalActorAbandoned {
        /// The abandoned chooser request.
        request_id: ChooserRequestId,
    },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// Message channel could not be established.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Message channel closed.
    #[error("Connection closed")]
    ConnectionClosed,

    /// No reply arrived in time.
    #[error("Reply to {message_id} timed out after {timeout_ms}ms")]
    ReplyTimeout {
        /// The outbound message that went unanswered.
        message_id: MessageId,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Malformed or unexpected message.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// Host call names a method this bridge does not implement.
    #[error("Unknown method: {method}")]
    UnknownMethod {
        /// The unrecognized method.
        method: String,
    },

    /// Remote side answered with an error reply.
    #[error("Remote error ({code}): {message}")]
    RemoteError {
        /// Error code from the reply.
        code: String,
        /// Error message from the reply.
        message: String,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Bridge configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a duplicate id error.
    #[inline]
    pub fn duplicate_id(instance_id: InstanceId) -> Self {
        Self::DuplicateId { instance_id }
    }

    /// Creates a duplicate object error.
    #[inline]
    pub fn duplicate_object(existing: InstanceId, requested: InstanceId) -> Self {
        Self::DuplicateObject {
            existing,
            requested,
        }
    }

    /// Creates a not found error.
    #[inline]
    pub fn not_found(instance_id: InstanceId) -> Self {
        Self::NotFound { instance_id }
    }

    /// Creates a type mismatch error.
    #[inline]
    pub fn type_mismatch(
        instance_id: InstanceId,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            instance_id,
            expected,
            actual,
        }
    }

    /// Creates a permission denied error.
    #[inline]
    pub fn permission_denied(permission: impl Into<String>) -> Self {
        Self::PermissionDenied {
            permission: permission.into(),
        }
    }

    /// Creates an abandoned external actor error.
    #[inline]
    pub fn external_actor_abandoned(request_id: ChooserRequestId) -> Self {
        Self::ExternalActorAbandoned { request_id }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a reply timeout error.
    #[inline]
    pub fn reply_timeout(message_id: MessageId, timeout_ms: u64) -> Self {
        Self::ReplyTimeout {
            message_id,
            timeout_ms,
        }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an unknown method error.
    #[inline]
    pub fn unknown_method(method: impl Into<String>) -> Self {
        Self::UnknownMethod {
            method: method.into(),
        }
    }

    /// Creates a remote error.
    #[inline]
    pub fn remote(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RemoteError {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is registry misuse.
    ///
    /// These are programming errors on one side of the bridge.
    #[inline]
    #[must_use]
    pub fn is_registry_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateId { .. }
                | Self::DuplicateObject { .. }
                | Self::NotFound { .. }
                | Self::TypeMismatch { .. }
        )
    }

    /// Returns `true` if this is a transport error.
    #[inline]
    #[must_use]
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionClosed
                | Self::ReplyTimeout { .. }
                | Self::WebSocket(_)
        )
    }

    /// Returns `true` if the bridge can continue after this error.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied { .. }
                | Self::ExternalActorAbandoned { .. }
                | Self::ReplyTimeout { .. }
        )
    }

    /// Short machine-readable code used in error replies.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateId { .. } => "duplicate id",
            Self::DuplicateObject { .. } => "duplicate object",
            Self::NotFound { .. } => "not found",
            Self::TypeMismatch { .. } => "type mismatch",
            Self::PermissionDenied { .. } => "permission denied",
            Self::ExternalActorAbandoned { .. } => "abandoned",
            Self::UnknownMethod { .. } => "unknown method",
            Self::Protocol { .. } | Self::Json(_) => "invalid argument",
            Self::RemoteError { .. } => "remote error",
            Self::Config { .. } => "configuration",
            Self::Connection { .. }
            | Self::ConnectionClosed
            | Self::ReplyTimeout { .. }
            | Self::WebSocket(_)
            | Self::Io(_) => "transport",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::ErrorKind;

    fn id(value: i64) -> InstanceId {
        InstanceId::new(value).expect("valid instance id")
    }

    #[test]
    fn test_error_display() {
        let err = Error::duplicate_id(id(7));
        assert_eq!(err.to_string(), "Instance id already in use: 7");

        let err = Error::duplicate_object(id(1), id(2));
        assert_eq!(
            err.to_string(),
            "Object already registered as 1, cannot add as 2"
        );
    }

    #[test]
    fn test_is_registry_error() {
        assert!(Error::not_found(id(3)).is_registry_error());
        assert!(Error::type_mismatch(id(3), "web view", "object").is_registry_error());
        assert!(!Error::ConnectionClosed.is_registry_error());
    }

    #[test]
    fn test_is_transport_error() {
        assert!(Error::ConnectionClosed.is_transport_error());
        assert!(Error::connection("refused").is_transport_error());
        assert!(Error::reply_timeout(MessageId::generate(), 10).is_transport_error());
        assert!(!Error::config("missing picker").is_transport_error());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(Error::permission_denied("camera").is_recoverable());
        assert!(Error::external_actor_abandoned(ChooserRequestId::next()).is_recoverable());
        assert!(!Error::duplicate_id(id(1)).is_recoverable());
    }

    #[test]
    fn test_codes() {
        assert_eq!(Error::not_found(id(1)).code(), "not found");
        assert_eq!(Error::unknown_method("x.y").code(), "unknown method");
        assert_eq!(Error::ConnectionClosed.code(), "transport");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = IoError::new(ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
