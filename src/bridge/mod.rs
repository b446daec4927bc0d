//! Native callbacks bridged to the remote object model.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `notifier` | Outbound notifications tagged with registry ids |
//! | `chrome_client` | [`BridgeChromeClient`] and its factory |
//! | `navigation` | [`NavigationClient`], the remote-created navigation policy |
//! | `window` | Window-creation interception with probe views |
//! | `host_api` | Dispatcher for host calls |
//!
//! # Lifetimes
//!
//! Objects created by host calls hold a [`Notifier`], which holds the
//! registry they are stored in. The cycle is broken when the entry is
//! removed, or when the session drains the registry on shutdown.

// ============================================================================
// Submodules
// ============================================================================

pub mod chrome_client;
pub mod host_api;
pub mod navigation;
pub mod notifier;
pub mod window;

// ============================================================================
// Re-exports
// ============================================================================

pub use chrome_client::{
    BridgeChromeClient, CONSOLE_LOG_TARGET, ChromeClientFactory, DefaultChromeClientFactory,
};
pub use host_api::HostApi;
pub use navigation::NavigationClient;
pub use notifier::Notifier;
pub use window::{NavigationOutcome, PendingWindowRequest, ProbeNavigationClient};
