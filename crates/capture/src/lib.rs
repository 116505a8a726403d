//! Instrumented-context capture.
//!
//! The [`Interceptor`] wraps the page's console warning/error entry points,
//! the global uncaught-exception hook, and the history API. Every capture is
//! recorded in a bounded capture buffer and forwarded to the display context
//! as a [`common::Message`].

pub mod caller;
pub mod interceptor;
pub mod navigation;
pub mod stringify;

pub use caller::{NoStack, StackSource};
pub use interceptor::{Interceptor, PlatformHooks, UncaughtException};
pub use navigation::{NavigationDetector, NavigationKind};
pub use stringify::{ConsoleArg, ErrorValue, Inspect};
