//! Registry-resident navigation policy.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::engine::{NavigationPolicy, NavigationRequest, WebView};

use super::Notifier;

// ============================================================================
// Constants
// ============================================================================

/// Reply field carrying the remote decision.
const OVERRIDE_KEY: &str = "override";

// ============================================================================
// NavigationClient
// ============================================================================

/// Navigation policy created by the remote side.
///
/// Every navigation is reported with `webViewClient.requestLoading`. The
/// answer is the configured flag, or with `ask_remote` the `override` field
/// of the remote reply. A failed or malformed reply means "do not override".
#[derive(Debug)]
pub struct NavigationClient {
    notifier: Notifier,
    override_url_loading: AtomicBool,
    ask_remote: bool,
}

impl NavigationClient {
    /// Creates a client.
    #[must_use]
    pub fn new(notifier: Notifier, override_url_loading: bool, ask_remote: bool) -> Self {
        Self {
            notifier,
            override_url_loading: AtomicBool::new(override_url_loading),
            ask_remote,
        }
    }

    /// Returns the synchronous answer.
    #[inline]
    #[must_use]
    pub fn override_url_loading(&self) -> bool {
        self.override_url_loading.load(Ordering::Acquire)
    }

    /// Returns `true` if decisions wait for the remote side.
    #[inline]
    #[must_use]
    pub const fn asks_remote(&self) -> bool {
        self.ask_remote
    }
}

#[async_trait]
impl NavigationPolicy for NavigationClient {
    async fn should_override(&self, view: &Arc<dyn WebView>, request: &NavigationRequest) -> bool {
        let Some(instance_id) = self.notifier.registry().identifier_for_ref(self) else {
            debug!(url = %request.url, "Navigation client not registered, using local answer");
            return self.override_url_loading();
        };

        if !self.ask_remote {
            self.notifier.request_loading(instance_id, view, request);
            return self.override_url_loading();
        }

        let reply = match self
            .notifier
            .request_loading_reply(instance_id, view, request)
            .await
            .and_then(|reply| reply.into_result())
        {
            Ok(value) => value,
            Err(e) => {
                warn!(%instance_id, url = %request.url, error = %e, "Remote navigation decision failed");
                return false;
            }
        };

        reply.get(OVERRIDE_KEY).and_then(|v| v.as_bool()).unwrap_or_else(|| {
            warn!(%instance_id, result = %reply, "Reply without override flag");
            false
        })
    }

    fn set_override_url_loading(&self, value: bool) -> bool {
        self.override_url_loading.store(value, Ordering::Release);
        true
    }
}

// ============================================================================
// Tests
// ============================================================================
