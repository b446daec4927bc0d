//! Outbound notifier.
//!
//! Turns native callbacks into notifications tagged with the emitter's
//! registry identifier. Sending is best-effort: failures are logged and
//! never reach the native caller.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use tracing::{debug, warn};

use crate::engine::{ConsoleMessage, NavigationRequest, WebView};
use crate::error::Result;
use crate::identifiers::InstanceId;
use crate::protocol::{Notification, Reply};
use crate::registry::InstanceRegistry;
use crate::transport::Channel;

// ============================================================================
// Notifier
// ============================================================================

/// Sends native events to the remote side.
///
/// Cheap to clone; clones share the channel and registry.
#[derive(Debug, Clone)]
pub struct Notifier {
    channel: Channel,
    registry: Arc<InstanceRegistry>,
}

impl Notifier {
    /// Creates a notifier.
    #[must_use]
    pub fn new(channel: Channel, registry: Arc<InstanceRegistry>) -> Self {
        Self { channel, registry }
    }

    /// Returns the channel.
    #[inline]
    #[must_use]
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Returns the registry used to resolve identifiers.
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<InstanceRegistry> {
        &self.registry
    }

    /// Sends a notification, logging failures.
    ///
    /// Returns `true` if it was queued.
    pub fn send(&self, notification: Notification) -> bool {
        let method = notification.method();
        let instance_id = notification.instance_id();

        match self.channel.notify(notification) {
            Ok(()) => true,
            Err(e) => {
                warn!(method, %instance_id, error = %e, "Dropping notification");
                false
            }
        }
    }

    /// Load progress of `view` changed.
    ///
    /// Skipped if `view` is not registered.
    pub fn progress_changed(&self, instance_id: InstanceId, view: &Arc<dyn WebView>, progress: i32) {
        let Some(web_view_instance_id) = self.registry.identifier_for(view) else {
            debug!(%instance_id, progress, "Progress for unregistered view, skipping");
            return;
        };

        self.send(Notification::ProgressChanged {
            instance_id,
            web_view_instance_id,
            progress: i64::from(progress),
        });
    }

    /// A page console message.
    pub fn console_message(&self, instance_id: InstanceId, message: &ConsoleMessage) {
        self.send(Notification::ConsoleMessage {
            instance_id,
            message: message.clone(),
        });
    }

    /// `view` asked for a new window.
    pub fn create_window(
        &self,
        instance_id: InstanceId,
        view: &Arc<dyn WebView>,
        is_dialog: bool,
        is_user_gesture: bool,
    ) {
        self.send(Notification::CreateWindow {
            instance_id,
            web_view_instance_id: self.registry.identifier_for(view),
            is_dialog,
            is_user_gesture,
        });
    }

    /// The native object registered as `instance_id` was released.
    pub fn dispose(&self, instance_id: InstanceId) {
        self.send(Notification::Dispose { instance_id });
    }

    /// `view` is about to navigate.
    pub fn request_loading(
        &self,
        instance_id: InstanceId,
        view: &Arc<dyn WebView>,
        request: &NavigationRequest,
    ) {
        self.send(self.request_loading_notification(instance_id, view, request));
    }

    /// `view` is about to navigate; waits for the remote side's reply.
    ///
    /// # Errors
    ///
    /// Any channel error: closed, timed out or over the pending limit.
    pub async fn request_loading_reply(
        &self,
        instance_id: InstanceId,
        view: &Arc<dyn WebView>,
        request: &NavigationRequest,
    ) -> Result<Reply> {
        let notification = self.request_loading_notification(instance_id, view, request);
        self.channel.request(notification).await
    }

    fn request_loading_notification(
        &self,
        instance_id: InstanceId,
        view: &Arc<dyn WebView>,
        request: &NavigationRequest,
    ) -> Notification {
        Notification::RequestLoading {
            instance_id,
            web_view_instance_id: self.registry.identifier_for(view),
            request: request.clone(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
