//! Bridge session.
//!
//! A [`Bridge`] is one session between a native engine and a remote object
//! model. It owns the registry for that session and tears everything down
//! on [`shutdown`](Bridge::shutdown).
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
//! use webview_bridge::{Bridge, InstanceId};
//!
//! # #[tokio::main]
//! # async fn main() -> webview_bridge::Result<()> {
//! let (bridge, _remote) = Bridge::builder()
//!     .picker(Arc::new(Picker))
//!     .view_factory(Arc::new(Views))
//!     .build_in_memory()?;
//!
//! let view: Arc<dyn WebView> = Arc::new(View);
//! let _view_id = bridge.attach_web_view(view)?;
//!
//! // remote side: webViewClient.create, webChromeClient.create ...
//! let client_id = InstanceId::new(2).expect("non-negative");
//! let _client = bridge.chrome_client(client_id)?;
//!
//! bridge.shutdown();
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::bridge::{ChromeClientFactory, DefaultChromeClientFactory, HostApi, Notifier};
use crate::chooser::{ChooserRouter, ExternalPicker, PickerBroadcast};
use crate::engine::{ChromeClient, WebView};
use crate::error::Result;
use crate::identifiers::InstanceId;
use crate::protocol::HostCall;
use crate::registry::InstanceRegistry;
use crate::transport::Channel;

use super::builder::{BridgeBuilder, FactoryChoice};
use super::options::BridgeOptions;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for the bridge.
struct BridgeInner {
    /// Session options.
    options: BridgeOptions,
    /// Instance registry for this session.
    registry: Arc<InstanceRegistry>,
    /// Channel to the remote side.
    channel: Channel,
    /// Outbound notifier.
    notifier: Notifier,
    /// Pending file chooser requests.
    chooser: ChooserRouter,
    /// Host call dispatcher.
    host_api: HostApi,
    /// Set once teardown has run.
    shut_down: AtomicBool,
}

impl BridgeInner {
    /// Tears the session down. Runs at most once.
    ///
    /// The host call handler owns a [`HostApi`] whose notifier owns the
    /// channel holding that handler, so clearing it is what breaks the cycle.
    fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }

        self.channel.clear_call_handler();
        self.chooser.shutdown();
        self.host_api.clear();
        self.channel.shutdown();

        info!("Bridge session shut down");
    }
}

impl Drop for BridgeInner {
    fn drop(&mut self) {
        if !self.shut_down.load(Ordering::Acquire) {
            debug!("Bridge dropped without shutdown, tearing down");
            self.shutdown();
        }
    }
}

// ============================================================================
// Bridge
// ============================================================================

/// One bridge session.
///
/// Cloning shares the session.
#[derive(Clone)]
pub struct Bridge {
    inner: Arc<BridgeInner>,
}

// ============================================================================
// Bridge - Display
// ============================================================================

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("instances", &self.inner.registry.len())
            .field("pending_choosers", &self.inner.chooser.pending_count())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Bridge - Construction
// ============================================================================

impl Bridge {
    /// Creates a configuration builder for the bridge.
    #[inline]
    #[must_use]
    pub fn builder() -> BridgeBuilder {
        BridgeBuilder::new()
    }

    /// Wires a session over `channel` and installs the host call handler.
    pub(crate) fn new(
        channel: Channel,
        options: BridgeOptions,
        picker: Arc<dyn ExternalPicker>,
        factory: FactoryChoice,
    ) -> Self {
        let channel = channel
            .with_reply_timeout(options.reply_timeout)
            .with_max_pending(options.max_pending_replies);

        let registry = Arc::new(InstanceRegistry::with_min_host_identifier(
            options.min_host_identifier,
        ));
        let notifier = Notifier::new(channel.clone(), Arc::clone(&registry));
        let chooser = ChooserRouter::new(picker);

        let chrome_client_factory: Arc<dyn ChromeClientFactory> = match factory {
            FactoryChoice::Custom(factory) => factory,
            FactoryChoice::Views(view_factory) => Arc::new(DefaultChromeClientFactory::new(
                view_factory,
                chooser.clone(),
                options.forward_console_messages,
            )),
        };

        let host_api = HostApi::new(
            Arc::clone(&registry),
            notifier.clone(),
            chrome_client_factory,
        );

        let handler_api = host_api.clone();
        channel.set_call_handler(Box::new(move |call: HostCall| handler_api.dispatch(call)));

        info!(
            reply_timeout_ms = options.reply_timeout.as_millis() as u64,
            min_host_identifier = options.min_host_identifier,
            "Bridge session started"
        );

        Self {
            inner: Arc::new(BridgeInner {
                options,
                registry,
                channel,
                notifier,
                chooser,
                host_api,
                shut_down: AtomicBool::new(false),
            }),
        }
    }
}

// ============================================================================
// Bridge - Accessors
// ============================================================================

impl Bridge {
    /// Returns the session options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &BridgeOptions {
        &self.inner.options
    }

    /// Returns the instance registry.
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<InstanceRegistry> {
        &self.inner.registry
    }

    /// Returns the channel to the remote side.
    #[inline]
    #[must_use]
    pub fn channel(&self) -> &Channel {
        &self.inner.channel
    }

    /// Returns the outbound notifier.
    #[inline]
    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    /// Returns the file chooser router.
    #[inline]
    #[must_use]
    pub fn chooser(&self) -> &ChooserRouter {
        &self.inner.chooser
    }

    /// Returns the host call dispatcher.
    #[inline]
    #[must_use]
    pub fn host_api(&self) -> &HostApi {
        &self.inner.host_api
    }

    /// Returns a sender for picker broadcasts.
    #[inline]
    #[must_use]
    pub fn picker_broadcaster(&self) -> mpsc::UnboundedSender<PickerBroadcast> {
        self.inner.chooser.broadcaster()
    }

    /// Returns `true` once the channel has stopped.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.channel.is_closed()
    }
}

// ============================================================================
// Bridge - Public API
// ============================================================================

impl Bridge {
    /// Registers a native view so notifications can name it.
    ///
    /// Returns the view's identifier; a view already registered keeps its
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns a registry error if no host identifier is left.
    pub fn attach_web_view(&self, view: Arc<dyn WebView>) -> Result<InstanceId> {
        let instance_id = self.inner.registry.get_or_add_host_created(view)?;
        debug!(%instance_id, "Web view attached");
        Ok(instance_id)
    }

    /// Looks up a chrome client created by the remote side.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`](crate::Error::NotFound) if `instance_id` is unknown
    /// - [`Error::TypeMismatch`](crate::Error::TypeMismatch) if it names
    ///   something else
    pub fn chrome_client(&self, instance_id: InstanceId) -> Result<Arc<dyn ChromeClient>> {
        self.inner.registry.get_chrome_client(instance_id)
    }

    /// Ends the session.
    ///
    /// Host calls are refused from here on, pending file choosers complete
    /// empty, every instance is released and the channel stops. Dropping the
    /// last handle to the session does the same. Calling it again is a no-op.
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }
}
