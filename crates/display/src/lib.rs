//! Display-context processing.
//!
//! This crate owns the display buffer and everything that reads it:
//! - stack trace normalization
//! - error locality matching for the page indicator
//! - payload generation
//! - the copy-to-clipboard action

pub mod clipboard;
pub mod context;
pub mod locality;
pub mod normalize;
pub mod payload;

pub use clipboard::{Clipboard, MemoryClipboard};
pub use context::{DisplayBuffer, DisplayContext, DisplaySettings, IndicatorState};
pub use locality::has_issue_on_path;
pub use normalize::normalize;
pub use payload::generate;
