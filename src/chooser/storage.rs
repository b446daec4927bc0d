//! On-disk layout for picker captures.
//!
//! ```text
//! <root>/
//! ├── camera_images/
//! │   └── image.jpg      # latest camera capture
//! └── images/            # copies of selected files
//! ```
//!
//! Files live for a single request; [`CaptureStorage::clear`] removes them.

// ============================================================================
// Imports
// ============================================================================

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

use crate::engine::ContentLocation;
use crate::error::{Error, Result};

use super::constants::{CAMERA_IMAGE_DIRECTORY, CAMERA_IMAGE_FILE_NAME, STORAGE_DIRECTORY};

// ============================================================================
// CaptureStorage
// ============================================================================

/// Directory layout used by picker implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureStorage {
    root: PathBuf,
}

impl CaptureStorage {
    /// Creates a layout rooted at `root`. Nothing is created yet.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for camera captures.
    #[must_use]
    pub fn camera_image_dir(&self) -> PathBuf {
        self.root.join(CAMERA_IMAGE_DIRECTORY)
    }

    /// Path of the camera capture file.
    #[must_use]
    pub fn camera_image_path(&self) -> PathBuf {
        self.camera_image_dir().join(CAMERA_IMAGE_FILE_NAME)
    }

    /// Directory for copied selections.
    #[must_use]
    pub fn storage_dir(&self) -> PathBuf {
        self.root.join(STORAGE_DIRECTORY)
    }

    /// Creates the capture directory and returns the capture path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directory cannot be created.
    pub fn prepare_camera_image(&self) -> Result<PathBuf> {
        fs::create_dir_all(self.camera_image_dir())?;
        Ok(self.camera_image_path())
    }

    /// Creates the storage directory and returns the path for `file_name`.
    ///
    /// Only the final component of `file_name` is used.
    ///
    /// # Errors
    ///
    /// - [`Error::Protocol`] if `file_name` has no file name component
    /// - [`Error::Io`] if the directory cannot be created
    pub fn prepare_stored_file(&self, file_name: &str) -> Result<PathBuf> {
        let name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| Error::protocol(format!("invalid file name: {file_name:?}")))?;

        let dir = self.storage_dir();
        fs::create_dir_all(&dir)?;
        Ok(dir.join(name))
    }

    /// Content location of a file inside this layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if `path` is not absolute.
    pub fn location_of(&self, path: &Path) -> Result<ContentLocation> {
        let url = Url::from_file_path(path)
            .map_err(|()| Error::protocol(format!("not an absolute path: {}", path.display())))?;
        ContentLocation::parse(url.as_str())
    }

    /// Removes all captured and copied files.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if a directory exists but cannot be removed.
    pub fn clear(&self) -> Result<()> {
        for dir in [self.camera_image_dir(), self.storage_dir()] {
            match fs::remove_dir_all(&dir) {
                Ok(()) => debug!(dir = %dir.display(), "Removed capture directory"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
