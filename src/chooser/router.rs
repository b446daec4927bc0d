//! Routes picker broadcasts to pending chooser requests.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::{FileChooserParams, FilePathCallback};
use crate::error::Error;
use crate::identifiers::ChooserRequestId;

use super::constants::CAMERA_PERMISSION;
use super::launcher::{FileChooserLauncher, LauncherCommand};
use super::picker::{ExternalPicker, PickerAction, PickerBroadcast};

// ============================================================================
// Types
// ============================================================================

type PendingMap = FxHashMap<ChooserRequestId, FileChooserLauncher>;

struct RouterInner {
    picker: Arc<dyn ExternalPicker>,
    pending: Mutex<PendingMap>,
    broadcast_tx: mpsc::UnboundedSender<PickerBroadcast>,
}

// ============================================================================
// ChooserRouter
// ============================================================================

/// Owns every pending file chooser request.
///
/// Broadcasts from the picker are received on a queue (see
/// [`broadcaster`](Self::broadcaster)) or handed over directly with
/// [`deliver`](Self::deliver). The picker is always called with no lock held,
/// so it may answer synchronously.
///
/// Cloning shares the same pending set.
#[derive(Clone)]
pub struct ChooserRouter {
    inner: Arc<RouterInner>,
}

impl fmt::Debug for ChooserRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChooserRouter")
            .field("pending", &self.pending_count())
            .finish_non_exhaustive()
    }
}

impl ChooserRouter {
    /// Creates a router over `picker`.
    ///
    /// Spawns the broadcast loop, so this must be called from within a tokio
    /// runtime. The loop ends once the router is dropped.
    pub fn new(picker: Arc<dyn ExternalPicker>) -> Self {
        let (broadcast_tx, broadcast_rx) = mpsc::unbounded_channel();

        let inner = Arc::new(RouterInner {
            picker,
            pending: Mutex::new(PendingMap::default()),
            broadcast_tx,
        });

        tokio::spawn(Self::run_broadcast_loop(Arc::downgrade(&inner), broadcast_rx));

        Self { inner }
    }

    /// Returns a sender the picker can post broadcasts to.
    #[inline]
    #[must_use]
    pub fn broadcaster(&self) -> mpsc::UnboundedSender<PickerBroadcast> {
        self.inner.broadcast_tx.clone()
    }

    /// Starts a chooser request.
    ///
    /// The callback is invoked exactly once: with the selection, or empty on
    /// cancellation, abandonment or shutdown.
    pub fn open(&self, callback: FilePathCallback, params: &FileChooserParams) -> ChooserRequestId {
        let request_id = ChooserRequestId::next();
        let mut launcher = FileChooserLauncher::new(request_id, callback, params);

        let camera_permitted = self.inner.picker.camera_permission_granted();
        let command = launcher.start(camera_permitted);

        info!(
            %request_id,
            accept = ?params.accept_types,
            multiple = params.allows_multiple(),
            "File chooser opened"
        );

        self.inner.pending.lock().insert(request_id, launcher);

        if let Some(command) = command {
            self.execute(command);
        }

        request_id
    }

    /// Handles one picker broadcast.
    pub fn deliver(&self, broadcast: PickerBroadcast) {
        self.inner.deliver(broadcast);
    }

    /// Cancels a request whose picker went away without answering.
    ///
    /// Returns `false` if the request is not pending.
    pub fn abandon(&self, request_id: ChooserRequestId) -> bool {
        let Some(mut launcher) = self.inner.pending.lock().remove(&request_id) else {
            return false;
        };

        let err = Error::external_actor_abandoned(request_id);
        warn!(%request_id, error = %err, "Delivering cancellation");
        launcher.cancel();
        true
    }

    /// Returns the number of pending requests.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.pending.lock().len()
    }

    /// Returns `true` if `request_id` is pending.
    #[inline]
    #[must_use]
    pub fn is_pending(&self, request_id: ChooserRequestId) -> bool {
        self.inner.pending.lock().contains_key(&request_id)
    }

    /// Cancels every pending request.
    pub fn shutdown(&self) {
        let pending: Vec<_> = self.inner.pending.lock().drain().collect();
        let count = pending.len();

        for (_, mut launcher) in pending {
            launcher.cancel();
        }

        if count > 0 {
            debug!(count, "Cancelled pending choosers on shutdown");
        }
    }

    fn execute(&self, command: LauncherCommand) {
        self.inner.execute(command);
    }

    /// Forwards queued broadcasts while the router is alive.
    async fn run_broadcast_loop(
        inner: Weak<RouterInner>,
        mut broadcast_rx: mpsc::UnboundedReceiver<PickerBroadcast>,
    ) {
        while let Some(broadcast) = broadcast_rx.recv().await {
            let Some(inner) = inner.upgrade() else {
                break;
            };
            inner.deliver(broadcast);
        }

        debug!("Picker broadcast loop terminated");
    }
}

impl RouterInner {
    fn deliver(&self, broadcast: PickerBroadcast) {
        let request_id = broadcast.request_id;
        debug!(%request_id, action = broadcast.action.as_str(), "Picker broadcast");

        match broadcast.action {
            PickerAction::PermissionsGranted => self.permission_result(request_id, true),

            PickerAction::PermissionsDenied => {
                let err = Error::permission_denied(CAMERA_PERMISSION);
                debug!(%request_id, error = %err, "Continuing without capture options");
                self.permission_result(request_id, false);
            }

            PickerAction::PermissionFlowFinished => {
                let granted = self.picker.camera_permission_granted();
                self.permission_result(request_id, granted);
            }

            PickerAction::FileChooserFinished => {
                let Some(mut launcher) = self.pending.lock().remove(&request_id) else {
                    warn!(%request_id, "Selection for unknown chooser request");
                    return;
                };
                launcher.on_file_chooser_finished(&broadcast.file_uris);
            }
        }
    }

    fn permission_result(&self, request_id: ChooserRequestId, granted: bool) {
        let command = {
            let mut pending = self.pending.lock();
            let Some(launcher) = pending.get_mut(&request_id) else {
                warn!(%request_id, "Permission result for unknown chooser request");
                return;
            };
            launcher.on_permission_result(granted)
        };

        if let Some(command) = command {
            self.execute(command);
        }
    }

    fn execute(&self, command: LauncherCommand) {
        match command {
            LauncherCommand::RequestPermission(request_id) => {
                self.picker.request_camera_permission(request_id);
            }
            LauncherCommand::Launch(launch) => {
                debug!(request_id = %launch.request_id, title = %launch.title, "Launching picker");
                self.picker.launch(launch);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
