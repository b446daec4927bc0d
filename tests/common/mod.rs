//! Shared fakes for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use webview_bridge::{
    Bridge, ChooserRequestId, ExternalPicker, HostMethod, MessageId, NavigationPolicy,
    NavigationRequest, PickerLaunch, RemoteEnd, Reply, ViewFactory, WebView,
};

// ============================================================================
// Constants
// ============================================================================

pub const FRAME_TIMEOUT: Duration = Duration::from_secs(2);

// ============================================================================
// Tracing
// ============================================================================

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// FakeView
// ============================================================================

/// View that behaves like an engine view: navigations consult the
/// installed policy and load only if it does not override.
#[derive(Default)]
pub struct FakeView {
    loaded: Mutex<Vec<String>>,
    policy: Mutex<Option<Arc<dyn NavigationPolicy>>>,
}

impl FakeView {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn loaded(&self) -> Vec<String> {
        self.loaded.lock().clone()
    }

    pub fn has_policy(&self) -> bool {
        self.policy.lock().is_some()
    }

    /// Simulates the engine starting a navigation. Returns `true` if the
    /// policy took it over.
    pub async fn navigate(self: &Arc<Self>, url: &str) -> bool {
        let policy = self.policy.lock().clone();
        let view: Arc<dyn WebView> = self.clone();

        let overridden = match policy {
            Some(policy) => policy.should_override(&view, &NavigationRequest::new(url)).await,
            None => false,
        };

        if !overridden {
            self.loaded.lock().push(url.to_owned());
        }
        overridden
    }

    pub fn as_view(self: &Arc<Self>) -> Arc<dyn WebView> {
        self.clone()
    }
}

impl WebView for FakeView {
    fn load_url(&self, url: &str) {
        self.loaded.lock().push(url.to_owned());
    }

    fn set_navigation_policy(&self, policy: Arc<dyn NavigationPolicy>) {
        *self.policy.lock() = Some(policy);
    }
}

// ============================================================================
// FakeViewFactory
// ============================================================================

#[derive(Default)]
pub struct FakeViewFactory {
    created: Mutex<Vec<Arc<FakeView>>>,
}

impl FakeViewFactory {
    pub fn created(&self) -> Vec<Arc<FakeView>> {
        self.created.lock().clone()
    }
}

impl ViewFactory for FakeViewFactory {
    fn create_view(&self, _origin: &Arc<dyn WebView>) -> Arc<dyn WebView> {
        let view = FakeView::new();
        self.created.lock().push(Arc::clone(&view));
        view
    }
}

// ============================================================================
// ScriptedPicker
// ============================================================================

#[derive(Default)]
pub struct ScriptedPicker {
    permitted: AtomicBool,
    permission_requests: Mutex<Vec<ChooserRequestId>>,
    launches: Mutex<Vec<PickerLaunch>>,
}

impl ScriptedPicker {
    pub fn set_permitted(&self, permitted: bool) {
        self.permitted.store(permitted, Ordering::SeqCst);
    }

    pub fn permission_requests(&self) -> Vec<ChooserRequestId> {
        self.permission_requests.lock().clone()
    }

    pub fn launches(&self) -> Vec<PickerLaunch> {
        self.launches.lock().clone()
    }
}

impl ExternalPicker for ScriptedPicker {
    fn camera_permission_granted(&self) -> bool {
        self.permitted.load(Ordering::SeqCst)
    }

    fn request_camera_permission(&self, request_id: ChooserRequestId) {
        self.permission_requests.lock().push(request_id);
    }

    fn launch(&self, launch: PickerLaunch) {
        self.launches.lock().push(launch);
    }
}

// ============================================================================
// Session Fixture
// ============================================================================

pub struct Session {
    pub bridge: Bridge,
    pub remote: RemoteEnd,
    pub views: Arc<FakeViewFactory>,
    pub picker: Arc<ScriptedPicker>,
}

pub fn session() -> Session {
    init_tracing();

    let views = Arc::new(FakeViewFactory::default());
    let picker = Arc::new(ScriptedPicker::default());

    let (bridge, remote) = Bridge::builder()
        .picker(Arc::clone(&picker) as Arc<dyn ExternalPicker>)
        .view_factory(Arc::clone(&views) as Arc<dyn ViewFactory>)
        .reply_timeout(Duration::from_secs(2))
        .build_in_memory()
        .expect("build bridge");

    Session {
        bridge,
        remote,
        views,
        picker,
    }
}

// ============================================================================
// Remote Helpers
// ============================================================================

/// Sends a host call and waits for its reply, skipping notifications.
pub async fn call(remote: &mut RemoteEnd, method: &HostMethod) -> Reply {
    let call_id = remote.call(method).expect("send call");
    let expected = serde_json::to_value(call_id).expect("id");

    loop {
        let frame = remote.recv_timeout(FRAME_TIMEOUT).await.expect("reply frame");
        if frame.get("expectsReply").is_none() && frame["id"] == expected {
            return serde_json::from_value(frame).expect("reply");
        }
    }
}

/// Waits for the next notification with `method`, skipping others.
pub async fn notification(remote: &mut RemoteEnd, method: &str) -> Value {
    loop {
        let frame = remote
            .recv_timeout(FRAME_TIMEOUT)
            .await
            .unwrap_or_else(|| panic!("no {method} notification"));
        if frame["method"] == method {
            return frame;
        }
    }
}

/// Returns the message id of a request frame.
pub fn message_id(frame: &Value) -> MessageId {
    serde_json::from_value(frame["id"].clone()).expect("message id")
}
