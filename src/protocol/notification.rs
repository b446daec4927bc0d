//! Outbound notifications.
//!
//! Each notification carries the registry identifier of the object that
//! emitted it.
//!
//! # Format
//!
//! ```json
//! {
//!   "id": "uuid",
//!   "expectsReply": false,
//!   "method": "webChromeClient.onProgressChanged",
//!   "params": { "instanceId": 3, "webViewInstanceId": 1, "progress": 42 }
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::engine::{ConsoleMessage, NavigationRequest};
use crate::identifiers::{InstanceId, MessageId};

// ============================================================================
// Notification
// ============================================================================

/// Native callback translated for the remote side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all_fields = "camelCase")]
pub enum Notification {
    /// Page load progress changed.
    #[serde(rename = "webChromeClient.onProgressChanged")]
    ProgressChanged {
        /// Emitting chrome client.
        instance_id: InstanceId,
        /// View whose progress changed.
        web_view_instance_id: InstanceId,
        /// Progress, 0-100.
        progress: i64,
    },

    /// Page wrote to the console.
    #[serde(rename = "webChromeClient.onConsoleMessage")]
    ConsoleMessage {
        /// Emitting chrome client.
        instance_id: InstanceId,
        /// The console message.
        message: ConsoleMessage,
    },

    /// Page asked for a new window.
    #[serde(rename = "webChromeClient.onCreateWindow")]
    CreateWindow {
        /// Emitting chrome client.
        instance_id: InstanceId,
        /// Originating view, when registered.
        web_view_instance_id: Option<InstanceId>,
        /// Whether a dialog window was requested.
        is_dialog: bool,
        /// Whether a user gesture triggered the request.
        is_user_gesture: bool,
    },

    /// Native object released; the remote counterpart may be dropped.
    #[serde(rename = "webChromeClient.dispose")]
    Dispose {
        /// Released chrome client.
        instance_id: InstanceId,
    },

    /// A view is about to navigate.
    #[serde(rename = "webViewClient.requestLoading")]
    RequestLoading {
        /// Emitting navigation client.
        instance_id: InstanceId,
        /// Navigating view, when registered.
        web_view_instance_id: Option<InstanceId>,
        /// The navigation.
        request: NavigationRequest,
    },
}

impl Notification {
    /// Returns the wire method name.
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            Self::ProgressChanged { .. } => "webChromeClient.onProgressChanged",
            Self::ConsoleMessage { .. } => "webChromeClient.onConsoleMessage",
            Self::CreateWindow { .. } => "webChromeClient.onCreateWindow",
            Self::Dispose { .. } => "webChromeClient.dispose",
            Self::RequestLoading { .. } => "webViewClient.requestLoading",
        }
    }

    /// Returns the identifier of the emitting object.
    #[must_use]
    pub fn instance_id(&self) -> InstanceId {
        match self {
            Self::ProgressChanged { instance_id, .. }
            | Self::ConsoleMessage { instance_id, .. }
            | Self::CreateWindow { instance_id, .. }
            | Self::Dispose { instance_id }
            | Self::RequestLoading { instance_id, .. } => *instance_id,
        }
    }
}

// ============================================================================
// OutboundMessage
// ============================================================================

/// Framed notification as written to the channel.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMessage {
    /// Unique identifier for reply correlation.
    pub id: MessageId,

    /// Whether the sender waits for a reply.
    #[serde(rename = "expectsReply")]
    pub expects_reply: bool,

    /// Method and params.
    #[serde(flatten)]
    pub notification: Notification,
}

impl OutboundMessage {
    /// Frames a fire-and-forget notification.
    #[inline]
    #[must_use]
    pub fn notify(notification: Notification) -> Self {
        Self {
            id: MessageId::generate(),
            expects_reply: false,
            notification,
        }
    }

    /// Frames a notification that awaits a reply.
    #[inline]
    #[must_use]
    pub fn request(notification: Notification) -> Self {
        Self {
            id: MessageId::generate(),
            expects_reply: true,
            notification,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: i64) -> InstanceId {
        InstanceId::new(value).expect("valid instance id")
    }

    #[test]
    fn test_progress_serialization() {
        let message = OutboundMessage::notify(Notification::ProgressChanged {
            instance_id: id(3),
            web_view_instance_id: id(1),
            progress: 42,
        });
        let json = serde_json::to_value(&message).expect("serialize");

        assert_eq!(json["method"], "webChromeClient.onProgressChanged");
        assert_eq!(json["expectsReply"], false);
        assert_eq!(json["params"]["instanceId"], 3);
        assert_eq!(json["params"]["webViewInstanceId"], 1);
        assert_eq!(json["params"]["progress"], 42);
    }

    #[test]
    fn test_request_loading_expects_reply() {
        let message = OutboundMessage::request(Notification::RequestLoading {
            instance_id: id(2),
            web_view_instance_id: None,
            request: NavigationRequest::new("https://example.com"),
        });
        let json = serde_json::to_value(&message).expect("serialize");

        assert_eq!(json["expectsReply"], true);
        assert_eq!(json["method"], "webViewClient.requestLoading");
        assert_eq!(json["params"]["request"]["url"], "https://example.com");
        assert!(json["params"]["webViewInstanceId"].is_null());
    }

    #[test]
    fn test_method_matches_serialized_tag() {
        let notification = Notification::Dispose { instance_id: id(9) };
        let json = serde_json::to_value(&notification).expect("serialize");
        assert_eq!(json["method"], notification.method());
        assert_eq!(notification.instance_id(), id(9));
    }
}
