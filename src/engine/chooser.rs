//! File chooser parameters and completion callback.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// FileChooserMode
// ============================================================================

/// Selection mode requested by the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileChooserMode {
    /// Pick a single existing file.
    #[default]
    Open,
    /// Pick one or more existing files.
    OpenMultiple,
    /// Pick a destination to save to.
    Save,
}

// ============================================================================
// FileChooserParams
// ============================================================================

/// Parameters of a file chooser request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChooserParams {
    /// Selection mode.
    pub mode: FileChooserMode,
    /// Accepted MIME types, as written in the page's `accept` attribute.
    #[serde(default)]
    pub accept_types: Vec<String>,
}

impl FileChooserParams {
    /// Creates single-selection params with the given accept types.
    #[must_use]
    pub fn new(accept_types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            mode: FileChooserMode::Open,
            accept_types: accept_types.into_iter().map(Into::into).collect(),
        }
    }

    /// Switches to multiple selection.
    #[inline]
    #[must_use]
    pub fn with_multiple(mut self) -> Self {
        self.mode = FileChooserMode::OpenMultiple;
        self
    }

    /// Returns `true` if more than one file may be chosen.
    #[inline]
    #[must_use]
    pub fn allows_multiple(&self) -> bool {
        self.mode == FileChooserMode::OpenMultiple
    }
}

// ============================================================================
// ContentLocation
// ============================================================================

/// Opaque reference to a user-selected file (`content://…`, `file://…`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentLocation(Url);

impl ContentLocation {
    /// Parses a location string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if `value` is not an absolute URI.
    pub fn parse(value: &str) -> Result<Self> {
        Url::parse(value)
            .map(Self)
            .map_err(|e| Error::protocol(format!("invalid content location {value:?}: {e}")))
    }

    /// Returns the location as a string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the URI scheme.
    #[inline]
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }
}

impl TryFrom<String> for ContentLocation {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ContentLocation> for String {
    fn from(location: ContentLocation) -> Self {
        location.0.into()
    }
}

impl fmt::Display for ContentLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

// ============================================================================
// FilePathCallback
// ============================================================================

/// The engine's completion for a file chooser request.
///
/// Consumed on use. An empty selection means the request was cancelled.
pub struct FilePathCallback {
    inner: Box<dyn FnOnce(Vec<ContentLocation>) + Send>,
}

impl FilePathCallback {
    /// Wraps a closure.
    pub fn new(callback: impl FnOnce(Vec<ContentLocation>) + Send + 'static) -> Self {
        Self {
            inner: Box::new(callback),
        }
    }

    /// Creates a callback that forwards its value to a oneshot receiver.
    #[must_use]
    pub fn channel() -> (Self, oneshot::Receiver<Vec<ContentLocation>>) {
        let (tx, rx) = oneshot::channel();
        let callback = Self::new(move |locations| {
            let _ = tx.send(locations);
        });
        (callback, rx)
    }

    /// Delivers the selection.
    pub fn on_receive_value(self, locations: Vec<ContentLocation>) {
        (self.inner)(locations);
    }
}

impl fmt::Debug for FilePathCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePathCallback").finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
