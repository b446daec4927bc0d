//! Native engine boundary.
//!
//! The bridge never talks to a concrete browser engine. Everything it needs
//! from one is expressed as a trait or a plain value type in this module, and
//! the host application supplies implementations.
//!
//! | Item | Role |
//! |------|------|
//! | [`WebView`] | A rendering surface that can load URLs |
//! | [`ViewFactory`] | Creates probe views for window creation |
//! | [`NavigationPolicy`] | Decides whether a navigation is taken over |
//! | [`ChromeClient`] | Callback capability set the engine invokes |
//! | [`WindowTransport`] | One-shot hand-off of a newly created window |
//! | [`FilePathCallback`] | One-shot answer to a file chooser request |

// ============================================================================
// Submodules
// ============================================================================

/// File chooser parameters and completion callback.
pub mod chooser;

/// Chrome client capability set.
pub mod chrome;

/// Console message values.
pub mod console;

/// Navigation requests and policies.
pub mod navigation;

/// Views and view factories.
pub mod view;

/// Window transport for created windows.
pub mod window;

// ============================================================================
// Re-exports
// ============================================================================

pub use chooser::{ContentLocation, FileChooserMode, FileChooserParams, FilePathCallback};
pub use chrome::ChromeClient;
pub use console::{ConsoleLevel, ConsoleMessage};
pub use navigation::{NavigationPolicy, NavigationRequest};
pub use view::{ViewFactory, WebView};
pub use window::{OneshotWindowTransport, WindowTransport};
