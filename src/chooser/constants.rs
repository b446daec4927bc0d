//! Well-known names shared with the external picker.
//!
//! Action names identify broadcasts coming back from the picker; extra names
//! key the fields of a launch request and of a broadcast payload.

// ============================================================================
// Actions
// ============================================================================

/// Camera permission was granted.
pub const ACTION_PERMISSIONS_GRANTED: &str = "action_permission_granted";

/// Camera permission was denied.
pub const ACTION_PERMISSIONS_DENIED: &str = "action_permission_denied";

/// Legacy end of the permission flow; the outcome must be re-checked.
pub const ACTION_REQUEST_CAMERA_PERMISSION_FINISHED: &str =
    "action_request_camera_permission_denied";

/// The picker finished, with or without a selection.
pub const ACTION_FILE_CHOOSER_FINISHED: &str = "action_file_chooser_completed";

// ============================================================================
// Extras
// ============================================================================

/// Title shown by the picker.
pub const EXTRA_TITLE: &str = "extra_title";

/// Accepted MIME types.
pub const EXTRA_ACCEPT_TYPES: &str = "extra_types";

/// Whether the camera option is offered.
pub const EXTRA_SHOW_CAMERA_OPTION: &str = "extra_show_camera_option";

/// Whether the image option is offered.
pub const EXTRA_SHOW_IMAGE_OPTION: &str = "extra_show_image_option";

/// Whether the video option is offered.
pub const EXTRA_SHOW_VIDEO_OPTION: &str = "extra_show_video_option";

/// Whether more than one file may be chosen.
pub const EXTRA_ALLOW_MULTIPLE_FILES: &str = "extra_allow_multiple_files";

/// Selected content locations.
pub const EXTRA_FILE_URIS: &str = "extra_file_uris";

// ============================================================================
// Storage
// ============================================================================

/// Subdirectory for camera captures.
pub const CAMERA_IMAGE_DIRECTORY: &str = "camera_images";

/// File name of a camera capture.
pub const CAMERA_IMAGE_FILE_NAME: &str = "image.jpg";

/// Subdirectory for copied selections.
pub const STORAGE_DIRECTORY: &str = "images";

// ============================================================================
// Titles
// ============================================================================

/// Title when only images are accepted.
pub const TITLE_IMAGE: &str = "Choose an image";

/// Title when only videos are accepted.
pub const TITLE_VIDEO: &str = "Choose a video";

/// Title for anything else.
pub const TITLE_FILE: &str = "Choose a file";

/// Permission needed for capture options.
pub const CAMERA_PERMISSION: &str = "camera";
