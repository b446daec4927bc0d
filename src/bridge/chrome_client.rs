//! Chrome client forwarding to the remote side.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error, info, trace, warn};

use crate::chooser::ChooserRouter;
use crate::engine::{
    ChromeClient, ConsoleLevel, ConsoleMessage, FileChooserParams, FilePathCallback,
    NavigationPolicy, ViewFactory, WebView, WindowTransport,
};
use crate::identifiers::InstanceId;

use super::Notifier;
use super::window::PendingWindowRequest;

// ============================================================================
// Constants
// ============================================================================

/// Log target for page console output.
pub const CONSOLE_LOG_TARGET: &str = "webview_console";

// ============================================================================
// BridgeChromeClient
// ============================================================================

/// [`ChromeClient`] paired with a remote object.
///
/// Resolves its own identifier through the registry on every event, so it
/// only reports while registered. After [`release`](ChromeClient::release)
/// it stops reporting altogether.
pub struct BridgeChromeClient {
    notifier: RwLock<Option<Notifier>>,
    navigation_policy: RwLock<Option<Arc<dyn NavigationPolicy>>>,
    view_factory: Arc<dyn ViewFactory>,
    chooser: ChooserRouter,
    forward_console_messages: bool,
}

impl BridgeChromeClient {
    /// Creates a client.
    #[must_use]
    pub fn new(
        notifier: Notifier,
        navigation_policy: Option<Arc<dyn NavigationPolicy>>,
        view_factory: Arc<dyn ViewFactory>,
        chooser: ChooserRouter,
        forward_console_messages: bool,
    ) -> Self {
        Self {
            notifier: RwLock::new(Some(notifier)),
            navigation_policy: RwLock::new(navigation_policy),
            view_factory,
            chooser,
            forward_console_messages,
        }
    }

    /// Returns `true` once released.
    #[inline]
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.notifier.read().is_none()
    }

    /// Returns the notifier and this client's identifier, if both are live.
    fn reporter(&self) -> Option<(Notifier, InstanceId)> {
        let notifier = self.notifier.read().clone()?;
        let instance_id = notifier.registry().identifier_for_ref(self)?;
        Some((notifier, instance_id))
    }
}

impl fmt::Debug for BridgeChromeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeChromeClient")
            .field("released", &self.is_released())
            .field("has_policy", &self.navigation_policy.read().is_some())
            .field("forward_console_messages", &self.forward_console_messages)
            .finish_non_exhaustive()
    }
}

impl ChromeClient for BridgeChromeClient {
    fn on_progress_changed(&self, view: &Arc<dyn WebView>, progress: i32) {
        if let Some((notifier, instance_id)) = self.reporter() {
            notifier.progress_changed(instance_id, view, progress);
        }
    }

    fn on_console_message(&self, message: &ConsoleMessage) -> bool {
        let text = message.message.as_str();
        let source = message.source_id.as_str();
        let line = message.line_number;

        match message.level {
            ConsoleLevel::Error => error!(target: CONSOLE_LOG_TARGET, source, line, "{text}"),
            ConsoleLevel::Warning => warn!(target: CONSOLE_LOG_TARGET, source, line, "{text}"),
            ConsoleLevel::Log | ConsoleLevel::Tip => {
                info!(target: CONSOLE_LOG_TARGET, source, line, "{text}");
            }
            ConsoleLevel::Debug => debug!(target: CONSOLE_LOG_TARGET, source, line, "{text}"),
        }

        if self.forward_console_messages
            && let Some((notifier, instance_id)) = self.reporter()
        {
            notifier.console_message(instance_id, message);
        }

        true
    }

    fn on_show_file_chooser(
        &self,
        _view: &Arc<dyn WebView>,
        callback: FilePathCallback,
        params: FileChooserParams,
    ) -> bool {
        self.chooser.open(callback, &params);
        true
    }

    fn on_create_window(
        &self,
        view: &Arc<dyn WebView>,
        is_dialog: bool,
        is_user_gesture: bool,
        transport: Box<dyn WindowTransport>,
    ) -> bool {
        if let Some((notifier, instance_id)) = self.reporter() {
            notifier.create_window(instance_id, view, is_dialog, is_user_gesture);
        }

        let policy = self.navigation_policy.read().clone();
        if policy.is_none() {
            debug!("No navigation policy, probe navigations go straight to the origin");
        }

        let probe = self.view_factory.create_view(view);
        PendingWindowRequest::new(Arc::clone(view), probe, policy).install(transport)
    }

    fn set_navigation_policy(&self, policy: Arc<dyn NavigationPolicy>) {
        *self.navigation_policy.write() = Some(policy);
    }

    fn release(&self, instance_id: InstanceId) {
        let Some(notifier) = self.notifier.write().take() else {
            return;
        };

        trace!(%instance_id, "Releasing chrome client");
        notifier.dispose(instance_id);
    }
}

// ============================================================================
// ChromeClientFactory
// ============================================================================

/// Creates chrome clients for `webChromeClient.create`.
pub trait ChromeClientFactory: Send + Sync {
    /// Creates a client reporting through `notifier` and consulting `policy`
    /// on window creation.
    fn create_chrome_client(
        &self,
        notifier: Notifier,
        policy: Arc<dyn NavigationPolicy>,
    ) -> Arc<dyn ChromeClient>;
}

/// Factory producing [`BridgeChromeClient`]s.
#[derive(Clone)]
pub struct DefaultChromeClientFactory {
    view_factory: Arc<dyn ViewFactory>,
    chooser: ChooserRouter,
    forward_console_messages: bool,
}

impl DefaultChromeClientFactory {
    /// Creates a factory.
    #[must_use]
    pub fn new(
        view_factory: Arc<dyn ViewFactory>,
        chooser: ChooserRouter,
        forward_console_messages: bool,
    ) -> Self {
        Self {
            view_factory,
            chooser,
            forward_console_messages,
        }
    }
}

impl fmt::Debug for DefaultChromeClientFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultChromeClientFactory")
            .field("forward_console_messages", &self.forward_console_messages)
            .finish_non_exhaustive()
    }
}

impl ChromeClientFactory for DefaultChromeClientFactory {
    fn create_chrome_client(
        &self,
        notifier: Notifier,
        policy: Arc<dyn NavigationPolicy>,
    ) -> Arc<dyn ChromeClient> {
        Arc::new(BridgeChromeClient::new(
            notifier,
            Some(policy),
            Arc::clone(&self.view_factory),
            self.chooser.clone(),
            self.forward_console_messages,
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================
