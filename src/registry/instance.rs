//! Tagged registry entries.

// ============================================================================
// Imports
// ============================================================================

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::engine::{ChromeClient, NavigationPolicy, WebView};
use crate::identifiers::InstanceId;

// ============================================================================
// ObjectKey
// ============================================================================

/// Identity of a shared object: the address of its `Arc` allocation.
///
/// Stable for as long as the registry holds the `Arc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ObjectKey(usize);

impl ObjectKey {
    /// Key of the object behind `ptr`, ignoring any vtable metadata.
    #[inline]
    pub(crate) fn of<T: ?Sized>(ptr: *const T) -> Self {
        Self(ptr.cast::<()>().addr())
    }
}

// ============================================================================
// Instance
// ============================================================================

/// A native object held by the registry.
#[derive(Clone)]
pub enum Instance {
    /// A rendering surface.
    WebView(Arc<dyn WebView>),
    /// A navigation policy (the remote side's "web view client").
    NavigationPolicy(Arc<dyn NavigationPolicy>),
    /// A chrome client.
    ChromeClient(Arc<dyn ChromeClient>),
    /// Any other host object.
    Object(Arc<dyn Any + Send + Sync>),
}

impl Instance {
    /// Wraps an arbitrary host object.
    #[inline]
    pub fn object<T: Any + Send + Sync>(object: Arc<T>) -> Self {
        Self::Object(object)
    }

    /// Human-readable kind, used in errors and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::WebView(_) => "web view",
            Self::NavigationPolicy(_) => "navigation policy",
            Self::ChromeClient(_) => "chrome client",
            Self::Object(_) => "object",
        }
    }

    /// Releases native resources tied to the remote counterpart.
    ///
    /// `instance_id` is the identifier the entry was registered under.
    pub fn release(&self, instance_id: InstanceId) {
        if let Self::ChromeClient(client) = self {
            client.release(instance_id);
        }
    }

    /// Returns the web view, if this is one.
    #[inline]
    #[must_use]
    pub fn as_web_view(&self) -> Option<&Arc<dyn WebView>> {
        match self {
            Self::WebView(view) => Some(view),
            _ => None,
        }
    }

    /// Returns the navigation policy, if this is one.
    #[inline]
    #[must_use]
    pub fn as_navigation_policy(&self) -> Option<&Arc<dyn NavigationPolicy>> {
        match self {
            Self::NavigationPolicy(policy) => Some(policy),
            _ => None,
        }
    }

    /// Returns the chrome client, if this is one.
    #[inline]
    #[must_use]
    pub fn as_chrome_client(&self) -> Option<&Arc<dyn ChromeClient>> {
        match self {
            Self::ChromeClient(client) => Some(client),
            _ => None,
        }
    }

    /// Identity key of the wrapped object.
    pub(crate) fn key(&self) -> ObjectKey {
        match self {
            Self::WebView(view) => ObjectKey::of(Arc::as_ptr(view)),
            Self::NavigationPolicy(policy) => ObjectKey::of(Arc::as_ptr(policy)),
            Self::ChromeClient(client) => ObjectKey::of(Arc::as_ptr(client)),
            Self::Object(object) => ObjectKey::of(Arc::as_ptr(object)),
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("kind", &self.kind())
            .field("key", &self.key())
            .finish()
    }
}

impl From<Arc<dyn WebView>> for Instance {
    fn from(view: Arc<dyn WebView>) -> Self {
        Self::WebView(view)
    }
}

impl From<Arc<dyn NavigationPolicy>> for Instance {
    fn from(policy: Arc<dyn NavigationPolicy>) -> Self {
        Self::NavigationPolicy(policy)
    }
}

impl From<Arc<dyn ChromeClient>> for Instance {
    fn from(client: Arc<dyn ChromeClient>) -> Self {
        Self::ChromeClient(client)
    }
}

// ============================================================================
// Tests
// ============================================================================
