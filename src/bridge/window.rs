//! Window-creation interception.
//!
//! The engine does not run its navigation policy for windows opened by
//! script. A new window is therefore handed a probe view whose policy
//! re-dispatches every navigation through the origin view's policy:
//!
//! ```text
//! probe navigates to URL
//!        │
//!        ▼
//! origin policy.should_override(origin, request)
//!        │ true                        │ false
//!        ▼                             ▼
//!   Overridden                  origin.load_url(URL)
//!                               ForwardedToOrigin
//! ```
//!
//! Either way the probe reports the navigation as taken over, so it never
//! renders anything itself.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::engine::{NavigationPolicy, NavigationRequest, WebView, WindowTransport};

// ============================================================================
// NavigationOutcome
// ============================================================================

/// What happened to a navigation attempted on a probe view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The origin's policy took the navigation over.
    Overridden,
    /// The URL was loaded in the origin view.
    ForwardedToOrigin,
}

// ============================================================================
// ProbeNavigationClient
// ============================================================================

/// Navigation policy installed on probe views.
pub struct ProbeNavigationClient {
    origin: Arc<dyn WebView>,
    policy: Option<Arc<dyn NavigationPolicy>>,
}

impl ProbeNavigationClient {
    /// Creates a probe client forwarding to `origin`.
    ///
    /// Without a policy every navigation is forwarded.
    #[must_use]
    pub fn new(origin: Arc<dyn WebView>, policy: Option<Arc<dyn NavigationPolicy>>) -> Self {
        Self { origin, policy }
    }

    /// Runs the origin's policy and forwards the URL if it does not override.
    pub async fn decide(&self, request: &NavigationRequest) -> NavigationOutcome {
        let overridden = match self.policy {
            Some(ref policy) => policy.should_override(&self.origin, request).await,
            None => false,
        };

        if overridden {
            debug!(url = %request.url, "Probe navigation overridden by policy");
            return NavigationOutcome::Overridden;
        }

        debug!(url = %request.url, "Forwarding probe navigation to origin view");
        self.origin.load_url(&request.url);
        NavigationOutcome::ForwardedToOrigin
    }
}

impl fmt::Debug for ProbeNavigationClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeNavigationClient")
            .field("has_policy", &self.policy.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl NavigationPolicy for ProbeNavigationClient {
    async fn should_override(&self, _probe: &Arc<dyn WebView>, request: &NavigationRequest) -> bool {
        self.decide(request).await;
        true
    }
}

// ============================================================================
// PendingWindowRequest
// ============================================================================

/// A create-window event being answered.
pub struct PendingWindowRequest {
    origin: Arc<dyn WebView>,
    probe: Arc<dyn WebView>,
    policy: Option<Arc<dyn NavigationPolicy>>,
}

impl PendingWindowRequest {
    /// Captures the event.
    ///
    /// `probe` becomes the new window; `policy` is the origin's navigation
    /// policy at the time of the event.
    #[must_use]
    pub fn new(
        origin: Arc<dyn WebView>,
        probe: Arc<dyn WebView>,
        policy: Option<Arc<dyn NavigationPolicy>>,
    ) -> Self {
        Self {
            origin,
            probe,
            policy,
        }
    }

    /// Wires the probe, sends the transport and reports the event handled.
    ///
    /// Always returns `true`: the transport has been sent by then.
    pub fn install(self, mut transport: Box<dyn WindowTransport>) -> bool {
        let Self {
            origin,
            probe,
            policy,
        } = self;

        let client: Arc<dyn NavigationPolicy> = Arc::new(ProbeNavigationClient::new(origin, policy));
        probe.set_navigation_policy(client);

        transport.set_view(probe);
        transport.send_to_target();

        debug!("Window transport sent with probe view");
        true
    }
}

impl fmt::Debug for PendingWindowRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingWindowRequest")
            .field("has_policy", &self.policy.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use parking_lot::Mutex;

    use crate::engine::OneshotWindowTransport;

    #[derive(Default)]
    struct RecordingView {
        loaded: Mutex<Vec<String>>,
        policy: Mutex<Option<Arc<dyn NavigationPolicy>>>,
    }

    impl WebView for RecordingView {
        fn load_url(&self, url: &str) {
            self.loaded.lock().push(url.to_owned());
        }

        fn set_navigation_policy(&self, policy: Arc<dyn NavigationPolicy>) {
            *self.policy.lock() = Some(policy);
        }
    }

    struct FixedPolicy(bool);

    #[async_trait]
    impl NavigationPolicy for FixedPolicy {
        async fn should_override(&self, _view: &Arc<dyn WebView>, _request: &NavigationRequest) -> bool {
            self.0
        }
    }

    fn probe_client(origin: &Arc<RecordingView>, overrides: bool) -> ProbeNavigationClient {
        ProbeNavigationClient::new(
            Arc::clone(origin) as Arc<dyn WebView>,
            Some(Arc::new(FixedPolicy(overrides))),
        )
    }

    #[tokio::test]
    async fn test_override_keeps_origin_untouched() {
        let origin = Arc::new(RecordingView::default());
        let client = probe_client(&origin, true);

        let outcome = client.decide(&NavigationRequest::new("https://ads.example")).await;

        assert_eq!(outcome, NavigationOutcome::Overridden);
        assert!(origin.loaded.lock().is_empty());
    }

    #[tokio::test]
    async fn test_no_override_forwards_to_origin() {
        let origin = Arc::new(RecordingView::default());
        let client = probe_client(&origin, false);

        let outcome = client.decide(&NavigationRequest::new("https://example.com")).await;

        assert_eq!(outcome, NavigationOutcome::ForwardedToOrigin);
        assert_eq!(*origin.loaded.lock(), vec!["https://example.com"]);
    }

    #[tokio::test]
    async fn test_probe_always_reports_handled() {
        let origin = Arc::new(RecordingView::default());
        let probe: Arc<dyn WebView> = Arc::new(RecordingView::default());

        for overrides in [true, false] {
            let client = probe_client(&origin, overrides);
            assert!(client.should_override(&probe, &NavigationRequest::new("https://a.example")).await);
        }
    }

    #[tokio::test]
    async fn test_install_sends_probe() {
        let origin = Arc::new(RecordingView::default());
        let probe = Arc::new(RecordingView::default());
        let (transport, rx) = OneshotWindowTransport::channel();

        let request = PendingWindowRequest::new(
            Arc::clone(&origin) as Arc<dyn WebView>,
            Arc::clone(&probe) as Arc<dyn WebView>,
            None,
        );
        assert!(request.install(Box::new(transport)));

        let sent = rx.await.expect("transport sent").expect("view installed");
        assert_eq!(
            Arc::as_ptr(&sent).cast::<()>(),
            Arc::as_ptr(&probe).cast::<()>()
        );

        // Navigating the probe lands in the origin.
        let policy = probe.policy.lock().clone().expect("probe policy");
        let probe_view: Arc<dyn WebView> = probe.clone();
        assert!(policy.should_override(&probe_view, &NavigationRequest::new("https://x.example")).await);
        assert_eq!(*origin.loaded.lock(), vec!["https://x.example"]);
        assert!(probe.loaded.lock().is_empty());
    }
}
