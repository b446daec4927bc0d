//! Bridge session entry point.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Bridge`] | One session: registry, channel, notifier, choosers |
//! | [`BridgeBuilder`] | Fluent configuration builder |
//! | [`BridgeOptions`] | Session tunables |

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for session configuration.
pub mod builder;

/// Core session implementation.
pub mod core;

/// Session tunables.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::BridgeBuilder;
pub use core::Bridge;
pub use options::BridgeOptions;
