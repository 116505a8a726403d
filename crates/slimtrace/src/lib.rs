//! SlimTrace - token-efficient diagnostic capture for AI coding assistants.
//!
//! This crate wires the pipeline together:
//! - capture (console/exception/history interception)
//! - normalization and buffering in the display context
//! - payload generation and clipboard copy
//! - replay of recorded captures

pub mod config;
pub mod replay;
pub mod session;

pub use config::SlimTraceConfig;
pub use replay::{RecordedEvent, Replayer};
pub use session::Session;

pub use capture::{ConsoleArg, ErrorValue, PlatformHooks, UncaughtException};
pub use common::{LogContent, LogEntry, LogKind, TraceError, TraceResult};
pub use display::{Clipboard, IndicatorState, MemoryClipboard};

/// SlimTrace version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
