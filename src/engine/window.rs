//! Window transport for created windows.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use tokio::sync::oneshot;

use super::WebView;

// ============================================================================
// WindowTransport
// ============================================================================

/// The engine's one-shot carrier for a newly created window.
///
/// `send_to_target` consumes the transport, so it can be sent at most once.
pub trait WindowTransport: Send {
    /// Sets the view that becomes the new window.
    fn set_view(&mut self, view: Arc<dyn WebView>);

    /// Delivers the transport to the engine.
    fn send_to_target(self: Box<Self>);
}

// ============================================================================
// OneshotWindowTransport
// ============================================================================

/// [`WindowTransport`] backed by a tokio oneshot channel.
///
/// The receiver yields the installed view (or `None` if no view was set).
/// Dropping the transport unsent closes the receiver with an error.
pub struct OneshotWindowTransport {
    view: Option<Arc<dyn WebView>>,
    tx: oneshot::Sender<Option<Arc<dyn WebView>>>,
}

impl OneshotWindowTransport {
    /// Creates a transport and the receiver observing it.
    #[must_use]
    pub fn channel() -> (Self, oneshot::Receiver<Option<Arc<dyn WebView>>>) {
        let (tx, rx) = oneshot::channel();
        (Self { view: None, tx }, rx)
    }
}

impl fmt::Debug for OneshotWindowTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneshotWindowTransport")
            .field("has_view", &self.view.is_some())
            .finish_non_exhaustive()
    }
}

impl WindowTransport for OneshotWindowTransport {
    fn set_view(&mut self, view: Arc<dyn WebView>) {
        self.view = Some(view);
    }

    fn send_to_target(self: Box<Self>) {
        let Self { view, tx } = *self;
        let _ = tx.send(view);
    }
}
