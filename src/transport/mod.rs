//! Message channel transport.
//!
//! The channel is the bridge's only way to reach the remote side. It is
//! transport-agnostic: frames are JSON text moved through queues, and the
//! submodules attach those queues to an actual peer.
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Bridge (Rust)  │        text frames           │  Remote object  │
//! │                 │◄────────────────────────────►│  model          │
//! │  Channel        │   in-memory  │  WebSocket    │                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `channel` | Event loop, reply correlation, host-call dispatch |
//! | `memory` | In-process peer ([`RemoteEnd`]) |
//! | `server` | WebSocket server ([`BridgeServer`]) |

// ============================================================================
// Submodules
// ============================================================================

/// Message channel and event loop.
pub mod channel;

/// In-process transport.
pub mod memory;

/// WebSocket server for the remote side.
pub mod server;

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::{CallHandler, Channel, DEFAULT_MAX_PENDING_REPLIES, DEFAULT_REPLY_TIMEOUT};
pub use memory::{RemoteEnd, pair};
pub use server::BridgeServer;
