//! Messages passed from the instrumented context to the display context.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::entry::LogEntry;

/// A cross-context message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// One accepted capture.
    Log(LogEntry),
    /// A same-document navigation changed the path.
    Reset,
}

/// Sending half, owned by the instrumented context.
#[derive(Clone, Debug)]
pub struct MessageSender {
    inner: mpsc::UnboundedSender<Message>,
}

impl MessageSender {
    /// Fire-and-forget send. Returns `false` if the display context is gone.
    pub fn send(&self, message: Message) -> bool {
        match self.inner.send(message) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(dropped = ?err.0, "display context closed, dropping message");
                false
            }
        }
    }
}

/// Receiving half, owned by the display context.
#[derive(Debug)]
pub struct MessageReceiver {
    inner: mpsc::UnboundedReceiver<Message>,
}

impl MessageReceiver {
    /// Wait for the next message. `None` once every sender is dropped.
    pub async fn recv(&mut self) -> Option<Message> {
        self.inner.recv().await
    }

    /// Take the next queued message without waiting.
    pub fn try_recv(&mut self) -> Option<Message> {
        self.inner.try_recv().ok()
    }
}

/// Create a FIFO channel between the two contexts.
pub fn channel() -> (MessageSender, MessageReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (MessageSender { inner: tx }, MessageReceiver { inner: rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::LogContent;

    #[test]
    fn test_delivery_order() {
        let (tx, mut rx) = channel();
        let entry = LogEntry::new(LogContent::Error("boom".to_string()), "http://localhost/", "");

        assert!(tx.send(Message::Log(entry.clone())));
        assert!(tx.send(Message::Reset));

        assert_eq!(rx.try_recv(), Some(Message::Log(entry)));
        assert_eq!(rx.try_recv(), Some(Message::Reset));
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (tx, rx) = channel();
        drop(rx);
        assert!(!tx.send(Message::Reset));
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(Message::Reset).unwrap();
        assert_eq!(json["type"], "RESET");
    }
}
