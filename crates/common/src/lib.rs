//! Common types shared by the capture and display contexts.

pub mod entry;
pub mod error;
pub mod location;
pub mod message;
pub mod paths;
pub mod ring;

pub use entry::{ExceptionRecord, LogContent, LogEntry, LogKind};
pub use error::{TraceError, TraceResult};
pub use location::PageLocation;
pub use message::{channel, Message, MessageReceiver, MessageSender};
pub use ring::RingBuffer;
