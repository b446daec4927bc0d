//! WebSocket server for the remote side.
//!
//! # Connection Flow
//!
//! 1. Bind a WebSocket server to `localhost:0` (random port)
//! 2. Hand [`BridgeServer::ws_url`] to the remote runtime
//! 3. The remote side connects
//! 4. [`BridgeServer::accept`] upgrades the socket and returns a [`Channel`]
//!
//! A pump task moves text frames between the socket and the channel's
//! queues; closing either side tears the other down.

// ============================================================================
// Imports
// ============================================================================

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};

use super::Channel;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for waiting for the remote side to connect.
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// BridgeServer
// ============================================================================

/// A WebSocket server that is bound but not yet connected.
///
/// # Example
///
/// ```no_run
/// use std::net::{IpAddr, Ipv4Addr};
/// use webview_bridge::transport::BridgeServer;
///
/// # async fn run() -> webview_bridge::Result<()> {
/// let server = BridgeServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).await?;
/// let ws_url = server.ws_url();
///
/// // Start the remote runtime with ws_url...
/// # let _ = ws_url;
///
/// let channel = server.accept().await?;
/// # drop(channel);
/// # Ok(())
/// # }
/// ```
pub struct BridgeServer {
    /// TCP listener for incoming connections.
    listener: TcpListener,
    /// Port the server is bound to.
    port: u16,
}

impl BridgeServer {
    /// Binds a WebSocket server to the specified address and port.
    ///
    /// Use port 0 to let the OS assign a random available port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if binding fails.
    pub async fn bind(ip: IpAddr, port: u16) -> Result<Self> {
        let addr = SocketAddr::new(ip, port);
        let listener = TcpListener::bind(addr).await?;
        let actual_port = listener.local_addr()?.port();

        debug!(port = actual_port, "WebSocket server bound");

        Ok(Self {
            listener,
            port: actual_port,
        })
    }

    /// Binds to `127.0.0.1` on a random port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if binding fails.
    pub async fn bind_localhost() -> Result<Self> {
        Self::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).await
    }

    /// Returns the port the server is bound to.
    #[inline]
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the WebSocket URL for this server.
    ///
    /// Format: `ws://127.0.0.1:{port}`
    #[inline]
    #[must_use]
    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}", self.port)
    }

    /// Accepts the remote side's connection.
    ///
    /// # Errors
    ///
    /// - [`Error::Connection`] if nobody connects within 30s
    /// - [`Error::WebSocket`] if the WebSocket upgrade fails
    pub async fn accept(self) -> Result<Channel> {
        let (stream, addr) = timeout(CONNECTION_TIMEOUT, self.listener.accept())
            .await
            .map_err(|_| {
                Error::connection(format!(
                    "remote side did not connect within {}ms",
                    CONNECTION_TIMEOUT.as_millis()
                ))
            })??;

        debug!(?addr, "TCP connection accepted");

        let ws_stream = tokio_tungstenite::accept_async(stream).await?;

        info!(port = self.port, "WebSocket connection established");

        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();

        tokio::spawn(run_pump(ws_stream, out_rx, in_tx));

        Ok(Channel::new(out_tx, in_rx))
    }
}

// ============================================================================
// Pump
// ============================================================================

/// Moves text frames between the socket and the channel queues.
async fn run_pump(
    ws_stream: WebSocketStream<TcpStream>,
    mut frames_out: mpsc::UnboundedReceiver<String>,
    frames_in: mpsc::UnboundedSender<String>,
) {
    let (mut ws_write, mut ws_read) = ws_stream.split();

    loop {
        tokio::select! {
            message = ws_read.next() => {
                match message {
                    Some(Ok(Message::Text(text))) => {
                        if frames_in.send(text.to_string()).is_err() {
                            debug!("Channel dropped, closing socket");
                            let _ = ws_write.close().await;
                            break;
                        }
                    }

                    Some(Ok(Message::Close(_))) => {
                        debug!("WebSocket closed by remote");
                        break;
                    }

                    Some(Err(e)) => {
                        error!(error = %e, "WebSocket error");
                        break;
                    }

                    None => {
                        debug!("WebSocket stream ended");
                        break;
                    }

                    // Ignore Binary, Ping, Pong
                    _ => {}
                }
            }

            frame = frames_out.recv() => {
                match frame {
                    Some(json) => {
                        if let Err(e) = ws_write.send(Message::Text(json.into())).await {
                            warn!(error = %e, "Failed to write frame");
                            break;
                        }
                    }

                    None => {
                        debug!("Channel closed, closing socket");
                        let _ = ws_write.close().await;
                        break;
                    }
                }
            }
        }
    }

    debug!("WebSocket pump terminated");
}

// ============================================================================
// Tests
// ============================================================================
