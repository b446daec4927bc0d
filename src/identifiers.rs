//! Type-safe identifiers for bridged entities.
//!
//! Newtype wrappers prevent mixing incompatible IDs at compile time.
//!
//! | Type | Wraps | Assigned by |
//! |------|-------|-------------|
//! | [`InstanceId`] | `i64` | Remote side, or the registry for host-created objects |
//! | [`MessageId`] | UUID v4 | Sender of a frame, for reply correlation |
//! | [`ChooserRequestId`] | `u64` | Process-wide counter, one per file chooser request |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// InstanceId
// ============================================================================

/// Identifier of an object shared between the native and remote sides.
///
/// Identifiers are non-negative. Values below the registry's host threshold
/// are assigned by the remote side; values at or above it are generated
/// locally for host-created objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct InstanceId(i64);

impl InstanceId {
    /// Creates an identifier, rejecting negative values.
    #[inline]
    #[must_use]
    pub const fn new(value: i64) -> Option<Self> {
        if value < 0 { None } else { Some(Self(value)) }
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for InstanceId {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("instance id must be non-negative, got {value}"))
    }
}

impl From<InstanceId> for i64 {
    fn from(id: InstanceId) -> Self {
        id.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// MessageId
// ============================================================================

/// Identifier of a frame on the message channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Generates a random message id.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[inline]
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ChooserRequestId
// ============================================================================

static NEXT_CHOOSER_REQUEST: AtomicU64 = AtomicU64::new(1);

/// Identifier of one in-flight file chooser request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChooserRequestId(u64);

impl ChooserRequestId {
    /// Allocates the next request id.
    #[inline]
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_CHOOSER_REQUEST.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChooserRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_id_rejects_negative() {
        assert!(InstanceId::new(-1).is_none());
        assert_eq!(InstanceId::new(0).map(InstanceId::get), Some(0));
    }

    #[test]
    fn test_instance_id_serializes_as_number() {
        let id = InstanceId::new(42).expect("valid id");
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "42");
        let parsed: InstanceId = serde_json::from_str("42").expect("parse");
        assert_eq!(parsed, id);
        assert!(serde_json::from_str::<InstanceId>("-1").is_err());
    }

    #[test]
    fn test_message_ids_are_unique() {
        assert_ne!(MessageId::generate(), MessageId::generate());
    }

    #[test]
    fn test_chooser_request_ids_increase() {
        let first = ChooserRequestId::next();
        let second = ChooserRequestId::next();
        assert!(second.get() > first.get());
    }
}
