//! Inbound host calls.
//!
//! The remote side creates, rewires and disposes native objects through host
//! calls. Every call is answered with a [`Reply`](super::Reply) carrying the
//! call's id.
//!
//! # Format
//!
//! ```json
//! {
//!   "id": "uuid",
//!   "type": "call",
//!   "method": "webChromeClient.create",
//!   "params": { "instanceId": 3, "webViewClientInstanceId": 2 }
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::identifiers::{InstanceId, MessageId};

// ============================================================================
// HostCall
// ============================================================================

/// A command from the remote side, as framed on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostCall {
    /// Identifier echoed in the reply.
    pub id: MessageId,

    /// Frame type marker (always "call").
    #[serde(rename = "type")]
    pub call_type: CallType,

    /// Method in `object.methodName` format.
    pub method: String,

    /// Method-specific params.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub params: Value,
}

impl HostCall {
    /// Frames a typed method with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the method cannot be serialized.
    pub fn new(method: &HostMethod) -> Result<Self> {
        let mut value = serde_json::to_value(method)?;
        let params = value.get_mut("params").map(Value::take).unwrap_or(Value::Null);

        Ok(Self {
            id: MessageId::generate(),
            call_type: CallType::Call,
            method: method.name().to_string(),
            params,
        })
    }

    /// Parses the call into a typed method.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownMethod`] if the method is not implemented
    /// - [`Error::Protocol`] if the params do not match the method
    pub fn parse(&self) -> Result<HostMethod> {
        if !HostMethod::NAMES.contains(&self.method.as_str()) {
            return Err(Error::unknown_method(&self.method));
        }

        let tagged = if self.params.is_null() {
            json!({ "method": self.method })
        } else {
            json!({ "method": self.method, "params": self.params })
        };

        serde_json::from_value(tagged)
            .map_err(|e| Error::protocol(format!("invalid params for {}: {e}", self.method)))
    }
}

// ============================================================================
// CallType
// ============================================================================

/// Host call frame marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallType {
    /// A host call.
    Call,
}

// ============================================================================
// HostMethod
// ============================================================================

/// Typed host call methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all_fields = "camelCase")]
pub enum HostMethod {
    /// Create a chrome client wired to a registered navigation client.
    #[serde(rename = "webChromeClient.create")]
    CreateChromeClient {
        /// Identifier for the new chrome client.
        instance_id: InstanceId,
        /// Navigation client used for window creation.
        web_view_client_instance_id: InstanceId,
    },

    /// Rewire a chrome client to another navigation client.
    #[serde(rename = "webChromeClient.setWebViewClient")]
    SetWebViewClient {
        /// The chrome client.
        instance_id: InstanceId,
        /// The new navigation client.
        web_view_client_instance_id: InstanceId,
    },

    /// Create a navigation client.
    #[serde(rename = "webViewClient.create")]
    CreateWebViewClient {
        /// Identifier for the new navigation client.
        instance_id: InstanceId,
        /// Synchronous answer to "should override".
        #[serde(default)]
        override_url_loading: bool,
        /// Ask the remote side for each decision instead.
        #[serde(default)]
        ask_remote: bool,
    },

    /// Change a navigation client's synchronous answer.
    #[serde(rename = "webViewClient.setOverrideUrlLoading")]
    SetOverrideUrlLoading {
        /// The navigation client.
        instance_id: InstanceId,
        /// New answer.
        value: bool,
    },

    /// Remote counterpart disposed; release the native object.
    #[serde(rename = "instanceManager.remove")]
    RemoveInstance {
        /// The released instance.
        instance_id: InstanceId,
    },

    /// Release every instance.
    #[serde(rename = "instanceManager.clear")]
    Clear,
}

impl HostMethod {
    /// Every implemented method name.
    pub const NAMES: &'static [&'static str] = &[
        "webChromeClient.create",
        "webChromeClient.setWebViewClient",
        "webViewClient.create",
        "webViewClient.setOverrideUrlLoading",
        "instanceManager.remove",
        "instanceManager.clear",
    ];

    /// Returns the wire method name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateChromeClient { .. } => "webChromeClient.create",
            Self::SetWebViewClient { .. } => "webChromeClient.setWebViewClient",
            Self::CreateWebViewClient { .. } => "webViewClient.create",
            Self::SetOverrideUrlLoading { .. } => "webViewClient.setOverrideUrlLoading",
            Self::RemoveInstance { .. } => "instanceManager.remove",
            Self::Clear => "instanceManager.clear",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
