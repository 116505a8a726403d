//! Clipboard collaborator.

use async_trait::async_trait;
use common::TraceResult;
use parking_lot::Mutex;
use std::sync::Arc;

/// Destination for copied payloads.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> TraceResult<()>;
}

/// In-memory clipboard for headless hosts and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last text written, if any.
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> TraceResult<()> {
        *self.contents.lock() = Some(text.to_string());
        Ok(())
    }
}
