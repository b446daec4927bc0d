//! Navigation requests and policies.

// ============================================================================
// Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::WebView;

// ============================================================================
// NavigationRequest
// ============================================================================

/// A navigation attempt reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationRequest {
    /// Target URL.
    pub url: String,
    /// Whether the navigation targets the main frame.
    pub is_for_main_frame: bool,
    /// Whether the navigation is a server redirect.
    pub is_redirect: bool,
    /// Whether a user gesture triggered the navigation.
    pub has_gesture: bool,
    /// HTTP method.
    pub method: String,
    /// Request headers.
    #[serde(default)]
    pub request_headers: BTreeMap<String, String>,
}

impl NavigationRequest {
    /// Creates a main-frame `GET` request for `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            is_for_main_frame: true,
            is_redirect: false,
            has_gesture: false,
            method: "GET".to_string(),
            request_headers: BTreeMap::new(),
        }
    }

    /// Marks the request as user-initiated.
    #[inline]
    #[must_use]
    pub fn with_gesture(mut self) -> Self {
        self.has_gesture = true;
        self
    }

    /// Adds a request header.
    #[inline]
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_headers.insert(name.into(), value.into());
        self
    }
}

// ============================================================================
// NavigationPolicy
// ============================================================================

/// Decides whether a navigation is taken over by the host.
///
/// `true` means the policy owns the navigation and the view must not load it.
/// The decision may complete asynchronously.
#[async_trait]
pub trait NavigationPolicy: Send + Sync {
    /// Returns `true` to take over the navigation.
    async fn should_override(&self, view: &Arc<dyn WebView>, request: &NavigationRequest) -> bool;

    /// Changes the answer given without consulting the remote side.
    ///
    /// Returns `false` if this policy has no such setting.
    fn set_override_url_loading(&self, _value: bool) -> bool {
        false
    }
}

// ============================================================================
// Tests
// ============================================================================
