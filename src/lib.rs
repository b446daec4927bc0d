//! Web view bridge - native web view callbacks for a remote object model.
//!
//! This library exposes a native browser engine's callback surface to a
//! remote object model over a structured message channel.
//!
//! # Architecture
//!
//! The bridge sits between two sides:
//!
//! - **Native side (Rust)**: the engine calls [`ChromeClient`] and
//!   [`NavigationPolicy`] callbacks on objects the bridge created
//! - **Remote side**: creates those objects through host calls and receives
//!   notifications about every callback, tagged with object identifiers
//!
//! Key design principles:
//!
//! - One [`InstanceRegistry`] per session maps live objects to identifiers
//! - Notifications are best-effort and never block a native callback
//! - Window creation goes through a probe view so new windows obey the
//!   origin's navigation policy
//! - File chooser callbacks complete exactly once, whatever happens
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use webview_bridge::{
//!     Bridge, ChooserRequestId, ExternalPicker, NavigationPolicy, PickerLaunch, Result,
//!     ViewFactory, WebView,
//! };
//!
//! struct Picker;
//!
//! impl ExternalPicker for Picker {
//!     fn camera_permission_granted(&self) -> bool {
//!         false
//!     }
//!     fn request_camera_permission(&self, _request_id: ChooserRequestId) {}
//!     fn launch(&self, launch: PickerLaunch) {
//!         println!("show picker: {}", launch.title);
//!     }
//! }
//!
//! struct View;
//!
//! impl WebView for View {
//!     fn load_url(&self, url: &str) {
//!         println!("load {url}");
//!     }
//!     fn set_navigation_policy(&self, _policy: Arc<dyn NavigationPolicy>) {}
//! }
//!
//! struct Views;
//!
//! impl ViewFactory for Views {
//!     fn create_view(&self, _origin: &Arc<dyn WebView>) -> Arc<dyn WebView> {
//!         Arc::new(View)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let (bridge, _remote) = Bridge::builder()
//!         .picker(Arc::new(Picker))
//!         .view_factory(Arc::new(Views))
//!         .build_in_memory()?;
//!
//!     let view: Arc<dyn WebView> = Arc::new(View);
//!     let _view_id = bridge.attach_web_view(view)?;
//!
//!     // The remote side now creates clients with host calls and
//!     // receives notifications through `_remote`.
//!
//!     bridge.shutdown();
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bridge`] | Notifier, chrome client, navigation client, window interception, host API |
//! | [`chooser`] | File chooser state machine and picker routing |
//! | [`engine`] | Native engine boundary traits |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Wire message types |
//! | [`registry`] | Instance registry |
//! | [`session`] | [`Bridge`] session and its builder |
//! | [`transport`] | Message channel, in-memory and WebSocket peers |

// ============================================================================
// Modules
// ============================================================================

/// Native callbacks bridged to the remote side.
///
/// - [`Notifier`] - outbound notifications
/// - [`BridgeChromeClient`] - chrome client paired with a remote object
/// - [`HostApi`] - host call dispatcher
pub mod bridge;

/// File chooser delegation to an external picker.
pub mod chooser;

/// Native engine boundary.
///
/// Traits the embedding implements for its engine's views and callbacks.
pub mod engine;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// Wire message types.
///
/// Notifications, host calls and replies as JSON frames.
pub mod protocol;

/// Bidirectional map between live objects and identifiers.
pub mod registry;

/// Session entry point.
///
/// Use [`Bridge::builder()`] to create a configured session.
pub mod session;

/// Message channel transport.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Bridge types
pub use bridge::{
    BridgeChromeClient, ChromeClientFactory, DefaultChromeClientFactory, HostApi,
    NavigationClient, NavigationOutcome, Notifier, PendingWindowRequest, ProbeNavigationClient,
};

// Chooser types
pub use chooser::{
    AcceptedKinds, CaptureStorage, ChooserRouter, ChooserState, ExternalPicker,
    FileChooserLauncher, PickerAction, PickerBroadcast, PickerLaunch,
};

// Engine types
pub use engine::{
    ChromeClient, ConsoleLevel, ConsoleMessage, ContentLocation, FileChooserMode,
    FileChooserParams, FilePathCallback, NavigationPolicy, NavigationRequest,
    OneshotWindowTransport, ViewFactory, WebView, WindowTransport,
};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{ChooserRequestId, InstanceId, MessageId};

// Protocol types
pub use protocol::{HostCall, HostMethod, Notification, Reply, ReplyType};

// Registry types
pub use registry::{Instance, InstanceRegistry, MIN_HOST_CREATED_IDENTIFIER};

// Session types
pub use session::{Bridge, BridgeBuilder, BridgeOptions};

// Transport types
pub use transport::{BridgeServer, Channel, RemoteEnd};
