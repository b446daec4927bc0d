//! External picker collaborator.
//!
//! The picker is the user-facing surface (system file chooser, camera,
//! gallery). It is launched with a [`PickerLaunch`] and answers later with
//! [`PickerBroadcast`]s sent to the router's broadcast queue.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::identifiers::ChooserRequestId;

// ============================================================================
// ExternalPicker
// ============================================================================

/// The picker surface the chooser delegates to.
///
/// Methods must return promptly; outcomes arrive as broadcasts.
pub trait ExternalPicker: Send + Sync {
    /// Returns `true` if the camera permission is currently granted.
    fn camera_permission_granted(&self) -> bool;

    /// Starts the permission flow for `request_id`.
    ///
    /// Answered with [`PickerAction::PermissionsGranted`],
    /// [`PickerAction::PermissionsDenied`] or
    /// [`PickerAction::PermissionFlowFinished`].
    fn request_camera_permission(&self, request_id: ChooserRequestId);

    /// Shows the picker.
    ///
    /// Answered with [`PickerAction::FileChooserFinished`].
    fn launch(&self, launch: PickerLaunch);
}

// ============================================================================
// PickerLaunch
// ============================================================================

/// Everything the picker needs to show itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerLaunch {
    /// Request the eventual broadcast must carry.
    pub request_id: ChooserRequestId,
    /// Title to show.
    #[serde(rename = "extra_title")]
    pub title: String,
    /// Accepted MIME types, split and trimmed.
    #[serde(rename = "extra_types")]
    pub accept_types: Vec<String>,
    /// Whether more than one file may be chosen.
    #[serde(rename = "extra_allow_multiple_files")]
    pub allow_multiple: bool,
    /// Offer camera capture.
    #[serde(rename = "extra_show_camera_option")]
    pub show_camera: bool,
    /// Offer image capture.
    #[serde(rename = "extra_show_image_option")]
    pub show_image: bool,
    /// Offer video capture.
    #[serde(rename = "extra_show_video_option")]
    pub show_video: bool,
}

// ============================================================================
// PickerBroadcast
// ============================================================================

/// Broadcast action names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickerAction {
    /// Camera permission granted.
    #[serde(rename = "action_permission_granted")]
    PermissionsGranted,
    /// Camera permission denied.
    #[serde(rename = "action_permission_denied")]
    PermissionsDenied,
    /// Permission flow ended without saying how; re-check the permission.
    #[serde(rename = "action_request_camera_permission_denied")]
    PermissionFlowFinished,
    /// Picker closed; carries the selection.
    #[serde(rename = "action_file_chooser_completed")]
    FileChooserFinished,
}

impl PickerAction {
    /// Returns the wire action name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        use super::constants::{
            ACTION_FILE_CHOOSER_FINISHED, ACTION_PERMISSIONS_DENIED, ACTION_PERMISSIONS_GRANTED,
            ACTION_REQUEST_CAMERA_PERMISSION_FINISHED,
        };

        match self {
            Self::PermissionsGranted => ACTION_PERMISSIONS_GRANTED,
            Self::PermissionsDenied => ACTION_PERMISSIONS_DENIED,
            Self::PermissionFlowFinished => ACTION_REQUEST_CAMERA_PERMISSION_FINISHED,
            Self::FileChooserFinished => ACTION_FILE_CHOOSER_FINISHED,
        }
    }
}

/// A message from the picker about one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerBroadcast {
    /// Request this broadcast answers.
    pub request_id: ChooserRequestId,
    /// What happened.
    pub action: PickerAction,
    /// Selected locations, for [`PickerAction::FileChooserFinished`].
    #[serde(rename = "extra_file_uris", default, skip_serializing_if = "Vec::is_empty")]
    pub file_uris: Vec<String>,
}

impl PickerBroadcast {
    /// Permission granted for `request_id`.
    #[inline]
    #[must_use]
    pub fn permission_granted(request_id: ChooserRequestId) -> Self {
        Self::action(request_id, PickerAction::PermissionsGranted)
    }

    /// Permission denied for `request_id`.
    #[inline]
    #[must_use]
    pub fn permission_denied(request_id: ChooserRequestId) -> Self {
        Self::action(request_id, PickerAction::PermissionsDenied)
    }

    /// Permission flow over, outcome unknown.
    #[inline]
    #[must_use]
    pub fn permission_flow_finished(request_id: ChooserRequestId) -> Self {
        Self::action(request_id, PickerAction::PermissionFlowFinished)
    }

    /// Picker finished with `file_uris` (empty when cancelled).
    #[must_use]
    pub fn finished<I, S>(request_id: ChooserRequestId, file_uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            request_id,
            action: PickerAction::FileChooserFinished,
            file_uris: file_uris.into_iter().map(Into::into).collect(),
        }
    }

    fn action(request_id: ChooserRequestId, action: PickerAction) -> Self {
        Self {
            request_id,
            action,
            file_uris: Vec::new(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::chooser::constants::{
        EXTRA_ACCEPT_TYPES, EXTRA_ALLOW_MULTIPLE_FILES, EXTRA_FILE_URIS, EXTRA_SHOW_CAMERA_OPTION,
        EXTRA_SHOW_IMAGE_OPTION, EXTRA_SHOW_VIDEO_OPTION, EXTRA_TITLE,
    };

    #[test]
    fn test_action_names() {
        let value = serde_json::to_value(PickerAction::FileChooserFinished).expect("serialize");
        assert_eq!(value, json!("action_file_chooser_completed"));
        assert_eq!(
            PickerAction::PermissionFlowFinished.as_str(),
            "action_request_camera_permission_denied"
        );
    }

    #[test]
    fn test_broadcast_wire_format() {
        let id = ChooserRequestId::next();
        let value = serde_json::to_value(PickerBroadcast::finished(id, ["content://a/1"]))
            .expect("serialize");

        assert_eq!(value["action"], "action_file_chooser_completed");
        assert_eq!(value["extra_file_uris"], json!(["content://a/1"]));
        assert_eq!(value["request_id"], id.get());
    }

    #[test]
    fn test_launch_keys_match_extras() {
        let launch = PickerLaunch {
            request_id: ChooserRequestId::next(),
            title: "Choose a file".to_string(),
            accept_types: vec!["image/*".to_string()],
            allow_multiple: true,
            show_camera: false,
            show_image: true,
            show_video: false,
        };
        let value = serde_json::to_value(&launch).expect("serialize");

        assert_eq!(value[EXTRA_TITLE], "Choose a file");
        assert_eq!(value[EXTRA_ACCEPT_TYPES], json!(["image/*"]));
        assert_eq!(value[EXTRA_ALLOW_MULTIPLE_FILES], true);
        assert_eq!(value[EXTRA_SHOW_CAMERA_OPTION], false);
        assert_eq!(value[EXTRA_SHOW_IMAGE_OPTION], true);
        assert_eq!(value[EXTRA_SHOW_VIDEO_OPTION], false);
    }

    #[test]
    fn test_serialized_actions_match_names() {
        for action in [
            PickerAction::PermissionsGranted,
            PickerAction::PermissionsDenied,
            PickerAction::PermissionFlowFinished,
            PickerAction::FileChooserFinished,
        ] {
            let value = serde_json::to_value(action).expect("serialize");
            assert_eq!(value, json!(action.as_str()));
        }

        let value = serde_json::to_value(PickerBroadcast::finished(
            ChooserRequestId::next(),
            ["content://a/1"],
        ))
        .expect("serialize");
        assert_eq!(value[EXTRA_FILE_URIS], json!(["content://a/1"]));
    }

    #[test]
    fn test_broadcast_without_uris_parses() {
        let parsed: PickerBroadcast = serde_json::from_value(json!({
            "request_id": 9,
            "action": "action_permission_denied"
        }))
        .expect("parse");

        assert_eq!(parsed.action, PickerAction::PermissionsDenied);
        assert!(parsed.file_uris.is_empty());
    }
}
