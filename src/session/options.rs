//! Bridge session options.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use webview_bridge::BridgeOptions;
//!
//! let options = BridgeOptions::new()
//!     .with_reply_timeout(Duration::from_secs(5))
//!     .with_forward_console_messages(false);
//!
//! assert!(options.validate().is_ok());
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::error::{Error, Result};
use crate::registry::MIN_HOST_CREATED_IDENTIFIER;
use crate::transport::{DEFAULT_MAX_PENDING_REPLIES, DEFAULT_REPLY_TIMEOUT};

// ============================================================================
// BridgeOptions
// ============================================================================

/// Tunables of a bridge session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeOptions {
    /// Time to wait for each remote reply.
    pub reply_timeout: Duration,

    /// Maximum number of remote replies awaited at once.
    pub max_pending_replies: usize,

    /// First identifier for host-created instances.
    pub min_host_identifier: i64,

    /// Forward page console messages to the remote side.
    pub forward_console_messages: bool,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl BridgeOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
            max_pending_replies: DEFAULT_MAX_PENDING_REPLIES,
            min_host_identifier: MIN_HOST_CREATED_IDENTIFIER,
            forward_console_messages: true,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl BridgeOptions {
    /// Sets the reply timeout.
    #[inline]
    #[must_use]
    pub const fn with_reply_timeout(mut self, reply_timeout: Duration) -> Self {
        self.reply_timeout = reply_timeout;
        self
    }

    /// Sets the maximum number of outstanding replies.
    #[inline]
    #[must_use]
    pub const fn with_max_pending_replies(mut self, max_pending_replies: usize) -> Self {
        self.max_pending_replies = max_pending_replies;
        self
    }

    /// Sets the first host-created identifier.
    #[inline]
    #[must_use]
    pub const fn with_min_host_identifier(mut self, min_host_identifier: i64) -> Self {
        self.min_host_identifier = min_host_identifier;
        self
    }

    /// Enables or disables console forwarding.
    #[inline]
    #[must_use]
    pub const fn with_forward_console_messages(mut self, forward: bool) -> Self {
        self.forward_console_messages = forward;
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

impl BridgeOptions {
    /// Checks the options for values a session cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero timeout, a zero pending limit or
    /// a negative host identifier.
    pub fn validate(&self) -> Result<()> {
        if self.reply_timeout.is_zero() {
            return Err(Error::config("reply_timeout must be greater than zero"));
        }

        if self.max_pending_replies == 0 {
            return Err(Error::config("max_pending_replies must be at least 1"));
        }

        if self.min_host_identifier < 0 {
            return Err(Error::config(format!(
                "min_host_identifier must be non-negative, got {}",
                self.min_host_identifier
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
