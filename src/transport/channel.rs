//! Message channel and event loop.
//!
//! This module carries frames between the bridge and the remote side,
//! including reply correlation and host-call dispatch.
//!
//! # Event Loop
//!
//! The channel spawns a tokio task that handles:
//!
//! - Incoming frames from the remote side (replies, host calls)
//! - Outgoing notifications from the bridge
//! - Reply correlation by message id
//! - Host call handler invocation
//!
//! The loop reads and writes plain text frames through a pair of mpsc
//! channels, so any transport that can move strings (in-memory, WebSocket)
//! can sit underneath.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::{from_str, to_string};
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::identifiers::MessageId;
use crate::protocol::{HostCall, Notification, OutboundMessage, Reply};

// ============================================================================
// Constants
// ============================================================================

/// Default time to wait for a reply.
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(30);

/// Default maximum of outstanding replies.
pub const DEFAULT_MAX_PENDING_REPLIES: usize = 100;

// ============================================================================
// Types
// ============================================================================

/// Map of message IDs to reply channels.
type CorrelationMap = FxHashMap<MessageId, oneshot::Sender<Result<Reply>>>;

/// Host call handler callback type.
///
/// Called for each host call received from the remote side. The returned
/// reply is written back on the channel.
pub type CallHandler = Box<dyn Fn(HostCall) -> Reply + Send + Sync>;

// ============================================================================
// ChannelCommand
// ============================================================================

/// Internal commands for the event loop.
enum ChannelCommand {
    /// Write a fire-and-forget notification.
    Notify(OutboundMessage),
    /// Write a notification and route its reply.
    Request {
        message: OutboundMessage,
        reply_tx: oneshot::Sender<Result<Reply>>,
    },
    /// Remove a timed-out correlation entry.
    RemoveCorrelation(MessageId),
    /// Shutdown the channel.
    Shutdown,
}

// ============================================================================
// Channel
// ============================================================================

/// Message channel to the remote side.
///
/// Handles reply correlation and host-call routing. The channel spawns an
/// internal event loop task; cloning shares the same loop.
///
/// # Thread Safety
///
/// `Channel` is `Send + Sync` and can be shared across tasks. Sending never
/// waits on the remote side; only [`request`](Self::request) awaits a reply.
pub struct Channel {
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<ChannelCommand>,
    /// Correlation map (shared with event loop).
    correlation: Arc<Mutex<CorrelationMap>>,
    /// Host call handler (shared with event loop).
    call_handler: Arc<Mutex<Option<CallHandler>>>,
    /// Time to wait for each reply.
    reply_timeout: Duration,
    /// Maximum outstanding replies.
    max_pending: usize,
}

impl Clone for Channel {
    fn clone(&self) -> Self {
        Self {
            command_tx: self.command_tx.clone(),
            correlation: Arc::clone(&self.correlation),
            call_handler: Arc::clone(&self.call_handler),
            reply_timeout: self.reply_timeout,
            max_pending: self.max_pending,
        }
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("pending", &self.pending_count())
            .field("reply_timeout", &self.reply_timeout)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl Channel {
    /// Creates a channel over a pair of text-frame queues.
    ///
    /// Spawns the event loop task internally, so this must be called from
    /// within a tokio runtime.
    pub fn new(
        frames_out: mpsc::UnboundedSender<String>,
        frames_in: mpsc::UnboundedReceiver<String>,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let correlation = Arc::new(Mutex::new(CorrelationMap::default()));
        let call_handler: Arc<Mutex<Option<CallHandler>>> = Arc::new(Mutex::new(None));

        tokio::spawn(Self::run_event_loop(
            frames_out,
            frames_in,
            command_rx,
            Arc::clone(&correlation),
            Arc::clone(&call_handler),
        ));

        Self {
            command_tx,
            correlation,
            call_handler,
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
            max_pending: DEFAULT_MAX_PENDING_REPLIES,
        }
    }

    /// Sets the reply timeout used by [`request`](Self::request).
    #[inline]
    #[must_use]
    pub fn with_reply_timeout(mut self, reply_timeout: Duration) -> Self {
        self.reply_timeout = reply_timeout;
        self
    }

    /// Sets the maximum number of outstanding replies.
    #[inline]
    #[must_use]
    pub fn with_max_pending(mut self, max_pending: usize) -> Self {
        self.max_pending = max_pending;
        self
    }

    /// Sets the host call handler.
    pub fn set_call_handler(&self, handler: CallHandler) {
        let mut guard = self.call_handler.lock();
        *guard = Some(handler);
    }

    /// Clears the host call handler.
    ///
    /// Host calls arriving afterwards are answered with an error.
    pub fn clear_call_handler(&self) {
        let mut guard = self.call_handler.lock();
        *guard = None;
    }

    /// Sends a notification without waiting for a reply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the event loop has stopped.
    pub fn notify(&self, notification: Notification) -> Result<()> {
        let message = OutboundMessage::notify(notification);
        trace!(id = %message.id, method = message.notification.method(), "Queueing notification");

        self.command_tx
            .send(ChannelCommand::Notify(message))
            .map_err(|_| Error::ConnectionClosed)
    }

    /// Sends a notification and waits for its reply with the channel timeout.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the channel is closed
    /// - [`Error::ReplyTimeout`] if no reply arrives in time
    /// - [`Error::Protocol`] if too many replies are outstanding
    pub async fn request(&self, notification: Notification) -> Result<Reply> {
        self.request_with_timeout(notification, self.reply_timeout)
            .await
    }

    /// Sends a notification and waits for its reply with a custom timeout.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the channel is closed
    /// - [`Error::ReplyTimeout`] if no reply arrives in time
    /// - [`Error::Protocol`] if too many replies are outstanding
    pub async fn request_with_timeout(
        &self,
        notification: Notification,
        reply_timeout: Duration,
    ) -> Result<Reply> {
        {
            let correlation = self.correlation.lock();
            if correlation.len() >= self.max_pending {
                warn!(
                    pending = correlation.len(),
                    max = self.max_pending,
                    "Too many pending replies"
                );
                return Err(Error::protocol(format!(
                    "Too many pending replies: {}/{}",
                    correlation.len(),
                    self.max_pending
                )));
            }
        }

        let message = OutboundMessage::request(notification);
        let message_id = message.id;
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(ChannelCommand::Request { message, reply_tx })
            .map_err(|_| Error::ConnectionClosed)?;

        match timeout(reply_timeout, reply_rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(Error::ConnectionClosed),
            Err(_) => {
                let _ = self
                    .command_tx
                    .send(ChannelCommand::RemoveCorrelation(message_id));

                Err(Error::reply_timeout(
                    message_id,
                    reply_timeout.as_millis() as u64,
                ))
            }
        }
    }

    /// Returns the number of outstanding replies.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.correlation.lock().len()
    }

    /// Returns `true` once the event loop has stopped.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }

    /// Stops the event loop.
    ///
    /// Outstanding requests fail with [`Error::ConnectionClosed`].
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ChannelCommand::Shutdown);
    }

    /// Event loop that moves frames.
    async fn run_event_loop(
        frames_out: mpsc::UnboundedSender<String>,
        mut frames_in: mpsc::UnboundedReceiver<String>,
        mut command_rx: mpsc::UnboundedReceiver<ChannelCommand>,
        correlation: Arc<Mutex<CorrelationMap>>,
        call_handler: Arc<Mutex<Option<CallHandler>>>,
    ) {
        loop {
            tokio::select! {
                // Incoming frames from the remote side
                frame = frames_in.recv() => {
                    match frame {
                        Some(text) => {
                            let reply = Self::handle_incoming_frame(
                                &text,
                                &correlation,
                                &call_handler,
                            );

                            if let Some(reply) = reply
                                && let Ok(json) = to_string(&reply)
                                && frames_out.send(json).is_err()
                            {
                                debug!("Outbound frame queue closed");
                                break;
                            }
                        }

                        None => {
                            debug!("Remote side closed the channel");
                            break;
                        }
                    }
                }

                // Commands from the bridge
                command = command_rx.recv() => {
                    match command {
                        Some(ChannelCommand::Notify(message)) => {
                            if !Self::write_message(&message, &frames_out) {
                                break;
                            }
                        }

                        Some(ChannelCommand::Request { message, reply_tx }) => {
                            let message_id = message.id;
                            correlation.lock().insert(message_id, reply_tx);

                            if !Self::write_message(&message, &frames_out) {
                                if let Some(tx) = correlation.lock().remove(&message_id) {
                                    let _ = tx.send(Err(Error::ConnectionClosed));
                                }
                                break;
                            }
                        }

                        Some(ChannelCommand::RemoveCorrelation(message_id)) => {
                            correlation.lock().remove(&message_id);
                            debug!(%message_id, "Removed timed-out correlation");
                        }

                        Some(ChannelCommand::Shutdown) => {
                            debug!("Shutdown command received");
                            break;
                        }

                        None => {
                            debug!("Command channel closed");
                            break;
                        }
                    }
                }
            }
        }

        // Fail all pending requests on shutdown
        Self::fail_pending_requests(&correlation);

        debug!("Channel event loop terminated");
    }

    /// Handles an incoming text frame.
    ///
    /// Returns the reply to write back for host calls.
    fn handle_incoming_frame(
        text: &str,
        correlation: &Arc<Mutex<CorrelationMap>>,
        call_handler: &Arc<Mutex<Option<CallHandler>>>,
    ) -> Option<Reply> {
        // Try to parse as Reply first
        if let Ok(reply) = from_str::<Reply>(text) {
            let tx = correlation.lock().remove(&reply.id);

            if let Some(tx) = tx {
                let _ = tx.send(Ok(reply));
            } else {
                warn!(id = %reply.id, "Reply for unknown message");
            }

            return None;
        }

        // Try to parse as HostCall
        if let Ok(call) = from_str::<HostCall>(text) {
            let call_id = call.id;
            let handler = call_handler.lock();
            return Some(match *handler {
                Some(ref handler) => handler(call),
                None => {
                    warn!(id = %call_id, method = %call.method, "Host call with no handler");
                    Reply::failure(call_id, &Error::ConnectionClosed)
                }
            });
        }

        warn!(text = %text, "Failed to parse incoming frame");
        None
    }

    /// Serializes and writes one message. Returns `false` if the queue closed.
    fn write_message(message: &OutboundMessage, frames_out: &mpsc::UnboundedSender<String>) -> bool {
        let json = match to_string(message) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, id = %message.id, "Failed to serialize message");
                return true;
            }
        };

        if frames_out.send(json).is_err() {
            debug!(id = %message.id, "Outbound frame queue closed");
            return false;
        }

        trace!(id = %message.id, "Message written");
        true
    }

    /// Fails all pending requests with ConnectionClosed error.
    fn fail_pending_requests(correlation: &Arc<Mutex<CorrelationMap>>) {
        let pending: Vec<_> = correlation.lock().drain().collect();
        let count = pending.len();

        for (_, tx) in pending {
            let _ = tx.send(Err(Error::ConnectionClosed));
        }

        if count > 0 {
            debug!(count, "Failed pending requests on shutdown");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::{Value, json};

    use crate::identifiers::InstanceId;
    use crate::protocol::{HostMethod, ReplyType};
    use crate::transport::memory;

    fn id(value: i64) -> InstanceId {
        InstanceId::new(value).expect("valid instance id")
    }

    fn dispose(value: i64) -> Notification {
        Notification::Dispose {
            instance_id: id(value),
        }
    }

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_REPLY_TIMEOUT.as_secs(), 30);
        assert_eq!(DEFAULT_MAX_PENDING_REPLIES, 100);
    }

    #[tokio::test]
    async fn test_notify_writes_frame() {
        let (channel, mut remote) = memory::pair();

        channel.notify(dispose(4)).expect("notify");

        let frame = remote
            .recv_timeout(Duration::from_secs(1))
            .await
            .expect("frame");
        assert_eq!(frame["method"], "webChromeClient.dispose");
        assert_eq!(frame["params"]["instanceId"], 4);
        assert_eq!(frame["expectsReply"], false);
    }

    #[tokio::test]
    async fn test_request_receives_reply() {
        let (channel, mut remote) = memory::pair();

        let requester = channel.clone();
        let pending = tokio::spawn(async move { requester.request(dispose(1)).await });

        let frame = remote
            .recv_timeout(Duration::from_secs(1))
            .await
            .expect("frame");
        assert_eq!(frame["expectsReply"], true);

        let message_id: MessageId =
            serde_json::from_value(frame["id"].clone()).expect("message id");
        remote
            .reply(&Reply::success(message_id, json!({"override": true})))
            .expect("reply");

        let reply = pending.await.expect("join").expect("reply");
        assert_eq!(reply.reply_type, ReplyType::Success);
        assert_eq!(reply.get_bool("override"), Some(true));
        assert_eq!(channel.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let (channel, _remote) = memory::pair();

        let result = channel
            .request_with_timeout(dispose(1), Duration::from_millis(20))
            .await;

        assert!(matches!(result, Err(Error::ReplyTimeout { .. })));
    }

    #[tokio::test]
    async fn test_pending_limit() {
        let (channel, _remote) = memory::pair();
        let channel = channel.with_max_pending(0);

        let result = channel.request(dispose(1)).await;
        assert!(matches!(result, Err(Error::Protocol { .. })));
    }

    #[tokio::test]
    async fn test_host_call_dispatched_to_handler() {
        let (channel, mut remote) = memory::pair();
        channel.set_call_handler(Box::new(|call: HostCall| {
            Reply::success(call.id, json!({ "method": call.method }))
        }));

        let call_id = remote.call(&HostMethod::Clear).expect("call");

        let frame = remote
            .recv_timeout(Duration::from_secs(1))
            .await
            .expect("reply frame");
        let reply: Reply = serde_json::from_value(frame).expect("reply");
        assert_eq!(reply.id, call_id);
        assert_eq!(reply.get_string("method"), "instanceManager.clear");
    }

    #[tokio::test]
    async fn test_host_call_without_handler_gets_error() {
        let (_channel, mut remote) = memory::pair();

        remote.call(&HostMethod::Clear).expect("call");

        let frame = remote
            .recv_timeout(Duration::from_secs(1))
            .await
            .expect("reply frame");
        assert_eq!(frame["type"], "error");
    }

    #[tokio::test]
    async fn test_shutdown_fails_pending_requests() {
        let (channel, mut remote) = memory::pair();

        let requester = channel.clone();
        let pending = tokio::spawn(async move { requester.request(dispose(1)).await });

        // Wait until the request is on the wire before shutting down.
        let _ = remote.recv_timeout(Duration::from_secs(1)).await;
        channel.shutdown();

        let result = pending.await.expect("join");
        assert!(matches!(result, Err(Error::ConnectionClosed)));
    }

    #[tokio::test]
    async fn test_remote_close_stops_loop() {
        let (channel, remote) = memory::pair();
        drop(remote);

        for _ in 0..50 {
            if channel.is_closed() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert!(channel.is_closed());
        assert!(matches!(channel.notify(dispose(1)), Err(Error::ConnectionClosed)));
    }

    #[tokio::test]
    async fn test_garbage_frame_ignored() {
        let (channel, mut remote) = memory::pair();

        remote.send_raw("not json").expect("send");
        channel.notify(dispose(2)).expect("notify");

        let frame: Value = remote
            .recv_timeout(Duration::from_secs(1))
            .await
            .expect("frame");
        assert_eq!(frame["params"]["instanceId"], 2);
    }
}
