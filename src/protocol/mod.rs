//! Message channel protocol types.
//!
//! This module defines the frames exchanged between the native side (this
//! crate) and the remote object model.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `OutboundMessage` | Native → Remote | Callback notification, optionally awaiting a reply |
//! | `HostCall` | Remote → Native | Command on a registered instance |
//! | `Reply` | Both | Answer correlated by message id |
//!
//! # Method Naming
//!
//! Methods follow `object.methodName` format:
//!
//! - `webChromeClient.onProgressChanged`
//! - `webViewClient.create`
//! - `instanceManager.remove`
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `call` | Inbound host calls |
//! | `notification` | Outbound notifications |
//! | `reply` | Replies in both directions |

// ============================================================================
// Submodules
// ============================================================================

/// Inbound host calls.
pub mod call;

/// Outbound notifications.
pub mod notification;

/// Reply message types.
pub mod reply;

// ============================================================================
// Re-exports
// ============================================================================

pub use call::{CallType, HostCall, HostMethod};
pub use notification::{Notification, OutboundMessage};
pub use reply::{Reply, ReplyType};
