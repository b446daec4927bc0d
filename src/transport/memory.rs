//! In-process transport.
//!
//! [`pair`] wires a [`Channel`] to a [`RemoteEnd`] through in-memory queues.
//! The remote end speaks the same JSON frames a WebSocket peer would, which
//! makes it the natural harness for embedding the bridge in one process and
//! for driving it in tests.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::warn;

use crate::error::{Error, Result};
use crate::identifiers::MessageId;
use crate::protocol::{HostCall, HostMethod, Reply};

use super::Channel;

// ============================================================================
// pair
// ============================================================================

/// Creates a channel and the remote end connected to it.
///
/// Must be called from within a tokio runtime.
#[must_use]
pub fn pair() -> (Channel, RemoteEnd) {
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (in_tx, in_rx) = mpsc::unbounded_channel();

    let channel = Channel::new(out_tx, in_rx);
    let remote = RemoteEnd {
        frames_rx: out_rx,
        frames_tx: in_tx,
    };

    (channel, remote)
}

// ============================================================================
// RemoteEnd
// ============================================================================

/// The remote side of an in-memory channel.
#[derive(Debug)]
pub struct RemoteEnd {
    /// Frames written by the bridge.
    frames_rx: mpsc::UnboundedReceiver<String>,
    /// Frames delivered to the bridge.
    frames_tx: mpsc::UnboundedSender<String>,
}

impl RemoteEnd {
    /// Receives the next frame as JSON.
    ///
    /// Returns `None` once the bridge side is gone.
    pub async fn recv(&mut self) -> Option<Value> {
        loop {
            let text = self.frames_rx.recv().await?;
            match serde_json::from_str(&text) {
                Ok(value) => return Some(value),
                Err(e) => warn!(error = %e, "Skipping unparsable frame"),
            }
        }
    }

    /// Receives the next frame, giving up after `wait`.
    pub async fn recv_timeout(&mut self, wait: Duration) -> Option<Value> {
        timeout(wait, self.recv()).await.ok().flatten()
    }

    /// Returns the next frame if one is already queued.
    pub fn try_recv(&mut self) -> Option<Value> {
        let text = self.frames_rx.try_recv().ok()?;
        serde_json::from_str(&text).ok()
    }

    /// Sends a host call and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the bridge side is gone.
    pub fn call(&self, method: &HostMethod) -> Result<MessageId> {
        let call = HostCall::new(method)?;
        let id = call.id;
        self.send(&call)?;
        Ok(id)
    }

    /// Answers a bridge request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the bridge side is gone.
    pub fn reply(&self, reply: &Reply) -> Result<()> {
        self.send(reply)
    }

    /// Sends any serializable frame.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if serialization fails
    /// - [`Error::ConnectionClosed`] if the bridge side is gone
    pub fn send<T: Serialize>(&self, frame: &T) -> Result<()> {
        let json = serde_json::to_string(frame)?;
        self.send_raw(json)
    }

    /// Sends a raw text frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the bridge side is gone.
    pub fn send_raw(&self, text: impl Into<String>) -> Result<()> {
        self.frames_tx
            .send(text.into())
            .map_err(|_| Error::ConnectionClosed)
    }
}
