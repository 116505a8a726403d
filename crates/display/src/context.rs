//! The display context: owner of the display buffer and indicator state.

use common::{LogEntry, Message, MessageReceiver, PageLocation, RingBuffer, TraceResult};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::clipboard::Clipboard;
use crate::locality::has_issue_on_path;
use crate::normalize::normalize;
use crate::payload::generate;

/// Normalized warnings and errors, oldest first.
pub type DisplayBuffer = RingBuffer<LogEntry>;

/// Display context settings.
#[derive(Clone, Debug)]
pub struct DisplaySettings {
    /// Display buffer capacity.
    pub max_logs: usize,
    /// Whether the issue indicator pulses.
    pub pulse_on_error: bool,
    /// How long the copied state stays visible.
    pub revert_after: Duration,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            max_logs: 20,
            pulse_on_error: true,
            revert_after: Duration::from_millis(2000),
        }
    }
}

/// What the page indicator should show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndicatorState {
    /// Monitoring, nothing on this page.
    Idle,
    /// Errors or warnings were captured on the current path.
    Issue { path: String, pulse: bool },
    /// A payload was just copied.
    Copied,
}

#[derive(Debug, Default)]
struct Indicator {
    has_issue: bool,
    copied: bool,
    path: String,
}

/// Processes messages from the instrumented context, strictly in arrival order.
pub struct DisplayContext {
    buffer: DisplayBuffer,
    location: PageLocation,
    settings: DisplaySettings,
    indicator: Arc<Mutex<Indicator>>,
    revert: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl DisplayContext {
    pub fn new(settings: DisplaySettings, location: PageLocation) -> Self {
        let mut context = Self {
            buffer: DisplayBuffer::new(settings.max_logs),
            location,
            settings,
            indicator: Arc::new(Mutex::new(Indicator::default())),
            revert: Arc::new(Mutex::new(None)),
        };
        context.refresh();
        context
    }

    /// Apply one message.
    pub fn handle(&mut self, message: Message) {
        match message {
            Message::Log(entry) => self.accept(entry),
            Message::Reset => self.refresh(),
        }
    }

    /// Handle every queued message without waiting. Returns how many ran.
    pub fn drain(&mut self, receiver: &mut MessageReceiver) -> usize {
        let mut handled = 0;
        while let Some(message) = receiver.try_recv() {
            self.handle(message);
            handled += 1;
        }
        handled
    }

    /// Handle messages until the instrumented context goes away.
    pub async fn run(mut self, mut receiver: MessageReceiver) -> Self {
        while let Some(message) = receiver.recv().await {
            self.handle(message);
        }
        tracing::debug!(buffered = self.buffer.len(), "capture channel closed");
        self
    }

    /// Classify, normalize and buffer a capture.
    pub fn accept(&mut self, entry: LogEntry) {
        if !entry.kind().is_issue() {
            return;
        }

        let entry = entry.map_text(normalize);
        if let Some(evicted) = self.buffer.push(entry) {
            tracing::trace!(kind = %evicted.kind(), "evicted oldest display entry");
        }
        self.refresh();
    }

    /// Recompute the indicator for the current path. Never touches the buffer.
    pub fn refresh(&mut self) {
        let path = self.location.pathname();
        let has_issue = has_issue_on_path(&self.buffer, &path);

        let mut indicator = self.indicator.lock();
        indicator.has_issue = has_issue;
        indicator.copied = false;
        indicator.path = path;
    }

    pub fn indicator(&self) -> IndicatorState {
        let indicator = self.indicator.lock();
        if indicator.copied {
            IndicatorState::Copied
        } else if indicator.has_issue {
            IndicatorState::Issue {
                path: indicator.path.clone(),
                pulse: self.settings.pulse_on_error,
            }
        } else {
            IndicatorState::Idle
        }
    }

    pub fn buffer(&self) -> &DisplayBuffer {
        &self.buffer
    }

    pub fn location(&self) -> &PageLocation {
        &self.location
    }

    pub fn generate_payload(&self) -> String {
        generate(&self.buffer, &self.location.href())
    }

    /// Copy the current payload.
    ///
    /// The payload is taken now; the returned future only performs the write,
    /// so message handling can continue while it is pending. On success the
    /// indicator shows [`IndicatorState::Copied`] until `revert_after` elapses.
    /// Outside a Tokio runtime the copy still succeeds but the revert is
    /// skipped; the next refresh clears the copied state.
    pub fn copy_to_clipboard(
        &self,
        clipboard: Arc<dyn Clipboard>,
    ) -> impl Future<Output = TraceResult<()>> + Send + 'static {
        let payload = self.generate_payload();
        let indicator = self.indicator.clone();
        let revert = self.revert.clone();
        let delay = self.settings.revert_after;

        async move {
            if let Err(err) = clipboard.write_text(&payload).await {
                tracing::warn!(error = %err, "clipboard write failed");
                return Err(err);
            }

            let path = {
                let mut indicator = indicator.lock();
                indicator.copied = true;
                indicator.path.clone()
            };

            match Handle::try_current() {
                Ok(handle) => {
                    let task = handle.spawn(revert_copied(indicator, path, delay));
                    if let Some(previous) = revert.lock().replace(task) {
                        previous.abort();
                    }
                }
                Err(err) => {
                    tracing::debug!(error = %err, "no runtime, copied state will not revert");
                }
            }
            tracing::debug!(bytes = payload.len(), "payload copied");
            Ok(())
        }
    }
}

impl Drop for DisplayContext {
    fn drop(&mut self) {
        if let Some(task) = self.revert.lock().take() {
            task.abort();
        }
    }
}

async fn revert_copied(indicator: Arc<Mutex<Indicator>>, path: String, delay: Duration) {
    tokio::time::sleep(delay).await;

    let mut indicator = indicator.lock();
    // A navigation since the copy already replaced the state.
    if indicator.path == path {
        indicator.copied = false;
    }
}
