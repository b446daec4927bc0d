//! Builder pattern for bridge sessions.
//!
//! # Example
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use webview_bridge::{
//! #     ChooserRequestId, ExternalPicker, NavigationPolicy, PickerLaunch, ViewFactory, WebView,
//! # };
//! # struct Picker;
//! # impl ExternalPicker for Picker {
//! #     fn camera_permission_granted(&self) -> bool { false }
//! #     fn request_camera_permission(&self, _: ChooserRequestId) {}
//! #     fn launch(&self, _: PickerLaunch) {}
//! # }
//! # struct View;
//! # impl WebView for View {
//! #     fn load_url(&self, _: &str) {}
//! #     fn set_navigation_policy(&self, _: Arc<dyn NavigationPolicy>) {}
//! # }
//! # struct Views;
//! # impl ViewFactory for Views {
//! #     fn create_view(&self, _: &Arc<dyn WebView>) -> Arc<dyn WebView> { Arc::new(View) }
//! # }
//! use std::time::Duration;
//! use webview_bridge::Bridge;
//!
//! # #[tokio::main]
//! # async fn main() -> webview_bridge::Result<()> {
//! let (bridge, remote) = Bridge::builder()
//!     .picker(Arc::new(Picker))
//!     .view_factory(Arc::new(Views))
//!     .reply_timeout(Duration::from_secs(5))
//!     .build_in_memory()?;
//! # drop((bridge, remote));
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::bridge::ChromeClientFactory;
use crate::chooser::ExternalPicker;
use crate::engine::ViewFactory;
use crate::error::{Error, Result};
use crate::transport::{Channel, RemoteEnd, memory};

use super::core::Bridge;
use super::options::BridgeOptions;

// ============================================================================
// BridgeBuilder
// ============================================================================

/// Builder for configuring a [`Bridge`].
///
/// Use [`Bridge::builder()`] to create a new builder.
#[derive(Default, Clone)]
pub struct BridgeBuilder {
    /// Session tunables.
    options: BridgeOptions,
    /// Picker surface for file choosers.
    picker: Option<Arc<dyn ExternalPicker>>,
    /// Factory for probe views.
    view_factory: Option<Arc<dyn ViewFactory>>,
    /// Replacement chrome client factory.
    chrome_client_factory: Option<Arc<dyn ChromeClientFactory>>,
}

impl fmt::Debug for BridgeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeBuilder")
            .field("options", &self.options)
            .field("has_picker", &self.picker.is_some())
            .field("has_view_factory", &self.view_factory.is_some())
            .field(
                "has_chrome_client_factory",
                &self.chrome_client_factory.is_some(),
            )
            .finish()
    }
}

// ============================================================================
// BridgeBuilder Implementation
// ============================================================================

impl BridgeBuilder {
    /// Creates a new builder with default options and no collaborators.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all options.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: BridgeOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the reply timeout.
    #[inline]
    #[must_use]
    pub fn reply_timeout(mut self, reply_timeout: Duration) -> Self {
        self.options.reply_timeout = reply_timeout;
        self
    }

    /// Sets whether console messages are forwarded.
    #[inline]
    #[must_use]
    pub fn forward_console_messages(mut self, forward: bool) -> Self {
        self.options.forward_console_messages = forward;
        self
    }

    /// Sets the picker surface used for file choosers.
    #[inline]
    #[must_use]
    pub fn picker(mut self, picker: Arc<dyn ExternalPicker>) -> Self {
        self.picker = Some(picker);
        self
    }

    /// Sets the factory creating probe views for new windows.
    #[inline]
    #[must_use]
    pub fn view_factory(mut self, view_factory: Arc<dyn ViewFactory>) -> Self {
        self.view_factory = Some(view_factory);
        self
    }

    /// Replaces the factory used by `webChromeClient.create`.
    ///
    /// When set, no view factory is required.
    #[inline]
    #[must_use]
    pub fn chrome_client_factory(mut self, factory: Arc<dyn ChromeClientFactory>) -> Self {
        self.chrome_client_factory = Some(factory);
        self
    }

    /// Builds a bridge over `channel`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the picker is not set
    /// - [`Error::Config`] if neither a view factory nor a chrome client
    ///   factory is set
    /// - [`Error::Config`] if the options are invalid
    pub fn build(self, channel: Channel) -> Result<Bridge> {
        self.options.validate()?;
        let picker = self.validate_picker()?;
        let factory = self.validate_factories()?;

        Ok(Bridge::new(channel, self.options, picker, factory))
    }

    /// Builds a bridge over an in-memory channel.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build).
    pub fn build_in_memory(self) -> Result<(Bridge, RemoteEnd)> {
        let (channel, remote) = memory::pair();
        let bridge = self.build(channel)?;
        Ok((bridge, remote))
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Collaborator that builds chrome clients, as chosen by the builder.
pub(crate) enum FactoryChoice {
    /// Default clients using this view factory.
    Views(Arc<dyn ViewFactory>),
    /// Caller-provided factory.
    Custom(Arc<dyn ChromeClientFactory>),
}

impl BridgeBuilder {
    /// Validates the picker configuration.
    fn validate_picker(&self) -> Result<Arc<dyn ExternalPicker>> {
        self.picker.clone().ok_or_else(|| {
            Error::config(
                "A file picker is required. Use .picker() to set it.\n\
                 Example: Bridge::builder().picker(Arc::new(MyPicker))",
            )
        })
    }

    /// Validates the chrome client factory configuration.
    fn validate_factories(&self) -> Result<FactoryChoice> {
        if let Some(ref factory) = self.chrome_client_factory {
            return Ok(FactoryChoice::Custom(Arc::clone(factory)));
        }

        self.view_factory
            .clone()
            .map(FactoryChoice::Views)
            .ok_or_else(|| {
                Error::config(
                    "A view factory is required. Use .view_factory() to set it.\n\
                     Example: Bridge::builder().view_factory(Arc::new(MyViews))",
                )
            })
    }
}

// ============================================================================
// Tests
// ============================================================================
