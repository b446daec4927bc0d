//! Instance registry.
//!
//! Keeps native objects and the identifiers the remote side knows them by in
//! a bijection: every live object has exactly one identifier and every live
//! identifier names exactly one object.
//!
//! ```text
//! ┌──────────────── InstanceRegistry ────────────────┐
//! │  InstanceId ──► Instance (owns the Arc)          │
//! │  ObjectKey  ──► InstanceId (identity reverse map)│
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! # Threading
//!
//! The registry is the only shared mutable structure of a bridge session.
//! The engine drives it from its UI thread, but callbacks may also arrive on
//! runtime worker threads, so every operation runs under one exclusive lock
//! and never calls out while holding it.

// ============================================================================
// Submodules
// ============================================================================

/// Registry storage and operations.
pub mod core;

/// Tagged registry entries.
pub mod instance;

// ============================================================================
// Re-exports
// ============================================================================

pub use core::{InstanceRegistry, MIN_HOST_CREATED_IDENTIFIER};
pub use instance::Instance;
