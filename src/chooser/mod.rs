//! File chooser delegation.
//!
//! A page's "choose files" request must be answered exactly once, but the
//! answer comes from an external picker that may first need a camera
//! permission. This module bridges the two.
//!
//! ```text
//! on_show_file_chooser ──► ChooserRouter::open ──► FileChooserLauncher
//!                                │                       │ LauncherCommand
//!                                │                       ▼
//!        PickerBroadcast ◄── ExternalPicker ◄── request_camera_permission / launch
//!                │
//!                └──► ChooserRouter::deliver ──► FilePathCallback (once)
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `constants` | Action, extra and directory names |
//! | `kinds` | Accept-type analysis and titles |
//! | `launcher` | Per-request state machine |
//! | `picker` | External picker collaborator and its messages |
//! | `router` | Pending request ownership and broadcast routing |
//! | `storage` | Capture file layout |

// ============================================================================
// Submodules
// ============================================================================

pub mod constants;
pub mod kinds;
pub mod launcher;
pub mod picker;
pub mod router;
pub mod storage;

// ============================================================================
// Re-exports
// ============================================================================

pub use kinds::AcceptedKinds;
pub use launcher::{ChooserState, FileChooserLauncher, LauncherCommand};
pub use picker::{ExternalPicker, PickerAction, PickerBroadcast, PickerLaunch};
pub use router::ChooserRouter;
pub use storage::CaptureStorage;
