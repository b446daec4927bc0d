//! Chrome client capability set.

use std::sync::Arc;

use crate::identifiers::InstanceId;

use super::{
    ConsoleMessage, FileChooserParams, FilePathCallback, NavigationPolicy, WebView,
    WindowTransport,
};

/// Callbacks the engine invokes on a view's chrome client.
///
/// Methods are called on the engine's UI thread and must not block on the
/// remote side. Methods returning `bool` report whether the callback was
/// handled, following the engine's contract for each event.
pub trait ChromeClient: Send + Sync {
    /// Page load progress changed (0-100).
    fn on_progress_changed(&self, view: &Arc<dyn WebView>, progress: i32);

    /// Page wrote to the console. Returns `true` when consumed.
    fn on_console_message(&self, message: &ConsoleMessage) -> bool;

    /// Page asked for files.
    ///
    /// Returning `true` takes ownership of `callback`, which must then be
    /// invoked exactly once.
    fn on_show_file_chooser(
        &self,
        view: &Arc<dyn WebView>,
        callback: FilePathCallback,
        params: FileChooserParams,
    ) -> bool;

    /// Page asked for a new window.
    ///
    /// Returning `true` means `transport` is sent to its target; returning
    /// `false` after sending it is invalid.
    fn on_create_window(
        &self,
        view: &Arc<dyn WebView>,
        is_dialog: bool,
        is_user_gesture: bool,
        transport: Box<dyn WindowTransport>,
    ) -> bool;

    /// Replaces the policy consulted for windows this client creates.
    fn set_navigation_policy(&self, policy: Arc<dyn NavigationPolicy>);

    /// Releases resources tied to the remote counterpart registered as
    /// `instance_id`. The entry is already out of the registry.
    fn release(&self, _instance_id: InstanceId) {}
}
