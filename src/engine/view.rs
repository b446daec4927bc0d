//! Views and view factories.

use std::sync::Arc;

use super::NavigationPolicy;

/// A native rendering surface.
///
/// Implementations wrap the engine's view object. Identity matters: the
/// registry keys views by the address of their shared handle, so the same
/// `Arc` must be passed around for the same view.
pub trait WebView: Send + Sync {
    /// Starts loading `url` in this view.
    fn load_url(&self, url: &str);

    /// Installs the policy consulted before this view navigates.
    fn set_navigation_policy(&self, policy: Arc<dyn NavigationPolicy>);
}

/// Creates throwaway views on behalf of window creation.
pub trait ViewFactory: Send + Sync {
    /// Creates a fresh view sharing `origin`'s context.
    fn create_view(&self, origin: &Arc<dyn WebView>) -> Arc<dyn WebView>;
}
