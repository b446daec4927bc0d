//! Per-request file chooser state machine.
//!
//! # States
//!
//! ```text
//! Created ──► AwaitingPermission ──► AwaitingUserChoice ──► Completed
//!    │                │                                        ▲
//!    └────────────────┴──────────── cancel ────────────────────┘
//! ```
//!
//! The launcher never talks to the picker itself. Transitions return a
//! [`LauncherCommand`] for the owner to carry out, so the owner can do so
//! without holding its own locks.
//!
//! The completion callback is consumed by the first transition into
//! `Completed`. A launcher dropped before that delivers an empty selection.

// ============================================================================
// Imports
// ============================================================================

use tracing::{debug, warn};

use crate::engine::{ContentLocation, FileChooserParams, FilePathCallback};
use crate::identifiers::ChooserRequestId;

use super::kinds::{AcceptedKinds, split_accept_types};
use super::picker::PickerLaunch;

// ============================================================================
// ChooserState
// ============================================================================

/// Lifecycle of one chooser request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChooserState {
    /// Captured, nothing launched yet.
    Created,
    /// Waiting for the camera permission flow.
    AwaitingPermission,
    /// Picker is showing.
    AwaitingUserChoice,
    /// Callback has been invoked. Terminal.
    Completed,
}

// ============================================================================
// LauncherCommand
// ============================================================================

/// Work for the launcher's owner to perform on the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LauncherCommand {
    /// Ask for the camera permission.
    RequestPermission(ChooserRequestId),
    /// Show the picker.
    Launch(PickerLaunch),
}

// ============================================================================
// FileChooserLauncher
// ============================================================================

/// One in-flight file chooser request.
#[derive(Debug)]
pub struct FileChooserLauncher {
    request_id: ChooserRequestId,
    callback: Option<FilePathCallback>,
    accept_types: Vec<String>,
    allow_multiple: bool,
    kinds: AcceptedKinds,
    state: ChooserState,
}

impl FileChooserLauncher {
    /// Captures a request.
    #[must_use]
    pub fn new(
        request_id: ChooserRequestId,
        callback: FilePathCallback,
        params: &FileChooserParams,
    ) -> Self {
        let accept_types = split_accept_types(&params.accept_types);
        let kinds = AcceptedKinds::from_accept_types(&accept_types);

        Self {
            request_id,
            callback: Some(callback),
            accept_types,
            allow_multiple: params.allows_multiple(),
            kinds,
            state: ChooserState::Created,
        }
    }

    /// Returns the request id.
    #[inline]
    #[must_use]
    pub const fn request_id(&self) -> ChooserRequestId {
        self.request_id
    }

    /// Returns the current state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> ChooserState {
        self.state
    }

    /// Returns the accepted kinds.
    #[inline]
    #[must_use]
    pub const fn kinds(&self) -> AcceptedKinds {
        self.kinds
    }

    /// Returns `true` once the callback has been invoked.
    #[inline]
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state == ChooserState::Completed
    }

    /// Leaves `Created`.
    ///
    /// Asks for the permission only when a capture kind is acceptable and
    /// `camera_permitted` is `false`; otherwise launches directly. Returns
    /// `None` if the launcher already started.
    pub fn start(&mut self, camera_permitted: bool) -> Option<LauncherCommand> {
        if self.state != ChooserState::Created {
            debug!(request_id = %self.request_id, state = ?self.state, "Chooser already started");
            return None;
        }

        let capture = self.kinds.any_capture();
        if capture && !camera_permitted {
            self.state = ChooserState::AwaitingPermission;
            debug!(request_id = %self.request_id, "Requesting camera permission");
            return Some(LauncherCommand::RequestPermission(self.request_id));
        }

        Some(self.launch(capture))
    }

    /// Handles the outcome of the permission flow.
    ///
    /// A denial launches the picker without the camera option. Returns
    /// `None` outside `AwaitingPermission`.
    pub fn on_permission_result(&mut self, granted: bool) -> Option<LauncherCommand> {
        if self.state != ChooserState::AwaitingPermission {
            debug!(request_id = %self.request_id, state = ?self.state, "Unexpected permission result");
            return None;
        }

        if !granted {
            debug!(request_id = %self.request_id, "Camera permission denied, continuing without capture");
        }

        Some(self.launch(granted))
    }

    /// Completes with the picker's selection.
    ///
    /// Unparsable entries are dropped. Without multiple selection only the
    /// first location is kept.
    pub fn on_file_chooser_finished<S: AsRef<str>>(&mut self, file_uris: &[S]) {
        let mut locations: Vec<ContentLocation> = file_uris
            .iter()
            .filter_map(|uri| match ContentLocation::parse(uri.as_ref()) {
                Ok(location) => Some(location),
                Err(e) => {
                    warn!(request_id = %self.request_id, error = %e, "Dropping invalid selection");
                    None
                }
            })
            .collect();

        if !self.allow_multiple && locations.len() > 1 {
            debug!(
                request_id = %self.request_id,
                selected = locations.len(),
                "Single selection, keeping the first location"
            );
            locations.truncate(1);
        }

        self.complete(locations);
    }

    /// Completes with an empty selection.
    pub fn cancel(&mut self) {
        self.complete(Vec::new());
    }

    fn launch(&mut self, show_camera: bool) -> LauncherCommand {
        self.state = ChooserState::AwaitingUserChoice;

        LauncherCommand::Launch(PickerLaunch {
            request_id: self.request_id,
            title: self.kinds.title().to_owned(),
            accept_types: self.accept_types.clone(),
            allow_multiple: self.allow_multiple,
            show_camera,
            show_image: self.kinds.image,
            show_video: self.kinds.video,
        })
    }

    fn complete(&mut self, locations: Vec<ContentLocation>) {
        let Some(callback) = self.callback.take() else {
            debug!(request_id = %self.request_id, "Chooser already completed");
            return;
        };

        self.state = ChooserState::Completed;
        debug!(request_id = %self.request_id, selected = locations.len(), "Chooser completed");
        callback.on_receive_value(locations);
    }
}

impl Drop for FileChooserLauncher {
    fn drop(&mut self) {
        if self.callback.is_some() {
            warn!(request_id = %self.request_id, state = ?self.state, "Chooser dropped while pending, cancelling");
            self.cancel();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::oneshot;

    use crate::chooser::constants::{TITLE_FILE, TITLE_IMAGE};

    fn launcher(params: &FileChooserParams) -> (FileChooserLauncher, oneshot::Receiver<Vec<ContentLocation>>) {
        let (callback, rx) = FilePathCallback::channel();
        (FileChooserLauncher::new(ChooserRequestId::next(), callback, params), rx)
    }

    fn uris(rx: &mut oneshot::Receiver<Vec<ContentLocation>>) -> Vec<String> {
        rx.try_recv()
            .expect("callback invoked")
            .iter()
            .map(|location| location.as_str().to_owned())
            .collect()
    }

    #[test]
    fn test_capture_without_permission_asks_first() {
        let (mut launcher, _rx) = launcher(&FileChooserParams::new(["image/*"]));

        let command = launcher.start(false);
        assert_eq!(
            command,
            Some(LauncherCommand::RequestPermission(launcher.request_id()))
        );
        assert_eq!(launcher.state(), ChooserState::AwaitingPermission);
    }

    #[test]
    fn test_capture_with_permission_launches() {
        let (mut launcher, _rx) = launcher(&FileChooserParams::new(["image/*"]));

        let Some(LauncherCommand::Launch(launch)) = launcher.start(true) else {
            panic!("expected launch");
        };
        assert!(launch.show_camera);
        assert!(launch.show_image);
        assert!(!launch.show_video);
        assert_eq!(launch.title, TITLE_IMAGE);
        assert_eq!(launcher.state(), ChooserState::AwaitingUserChoice);
    }

    #[test]
    fn test_documents_skip_permission() {
        let (mut launcher, _rx) = launcher(&FileChooserParams::new(["application/pdf"]));

        let Some(LauncherCommand::Launch(launch)) = launcher.start(false) else {
            panic!("expected launch");
        };
        assert!(!launch.show_camera);
        assert_eq!(launch.title, TITLE_FILE);
    }

    #[test]
    fn test_start_twice_is_ignored() {
        let (mut launcher, _rx) = launcher(&FileChooserParams::default());
        assert!(launcher.start(true).is_some());
        assert!(launcher.start(true).is_none());
    }

    #[test]
    fn test_permission_denied_launches_without_camera() {
        let (mut launcher, _rx) = launcher(&FileChooserParams::new(["video/*"]));
        launcher.start(false);

        let Some(LauncherCommand::Launch(launch)) = launcher.on_permission_result(false) else {
            panic!("expected launch");
        };
        assert!(!launch.show_camera);
        assert!(launch.show_video);
        assert_eq!(launcher.state(), ChooserState::AwaitingUserChoice);
    }

    #[test]
    fn test_permission_result_outside_permission_state_is_ignored() {
        let (mut launcher, _rx) = launcher(&FileChooserParams::default());
        assert!(launcher.on_permission_result(true).is_none());
    }

    #[test]
    fn test_empty_result_completes_once() {
        let (mut launcher, mut rx) = launcher(&FileChooserParams::default());
        launcher.start(true);

        launcher.on_file_chooser_finished::<&str>(&[]);
        assert!(launcher.is_completed());
        assert!(uris(&mut rx).is_empty());
    }

    #[test]
    fn test_single_selection_keeps_first() {
        let (mut launcher, mut rx) = launcher(&FileChooserParams::default());
        launcher.start(true);

        launcher.on_file_chooser_finished(&["content://media/1", "content://media/2"]);
        assert_eq!(uris(&mut rx), vec!["content://media/1"]);
    }

    #[test]
    fn test_multiple_selection_keeps_all() {
        let (mut launcher, mut rx) = launcher(&FileChooserParams::default().with_multiple());
        launcher.start(true);

        launcher.on_file_chooser_finished(&["content://media/1", "content://media/2"]);
        assert_eq!(uris(&mut rx).len(), 2);
    }

    #[test]
    fn test_invalid_locations_dropped() {
        let (mut launcher, mut rx) = launcher(&FileChooserParams::default());
        launcher.start(true);

        launcher.on_file_chooser_finished(&["not a uri", "file:///tmp/a.png"]);
        assert_eq!(uris(&mut rx), vec!["file:///tmp/a.png"]);
    }

    #[test]
    fn test_callback_invoked_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let callback = FilePathCallback::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut launcher =
            FileChooserLauncher::new(ChooserRequestId::next(), callback, &FileChooserParams::default());
        launcher.start(true);
        launcher.on_file_chooser_finished(&["file:///tmp/a"]);
        launcher.cancel();
        launcher.on_file_chooser_finished(&["file:///tmp/b"]);
        drop(launcher);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_while_pending_cancels() {
        let (mut launcher, mut rx) = launcher(&FileChooserParams::new(["image/*"]));
        launcher.start(false);
        drop(launcher);

        assert!(uris(&mut rx).is_empty());
    }
}
