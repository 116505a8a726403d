//! A capture session: both execution contexts for one observed page.

use capture::{Interceptor, PlatformHooks, StackSource};
use common::{channel, MessageReceiver, PageLocation, TraceError, TraceResult};
use display::{Clipboard, DisplayContext, IndicatorState};
use std::sync::Arc;

use crate::config::SlimTraceConfig;

/// Wires an [`Interceptor`] to a [`DisplayContext`] over a message channel.
///
/// Buffers live exactly as long as the session; a page reload means a new
/// session.
pub struct Session {
    interceptor: Interceptor,
    display: DisplayContext,
    receiver: MessageReceiver,
}

impl Session {
    /// Start capturing on `page_url`. Fails if the host is not allowed.
    pub fn attach(config: &SlimTraceConfig, hooks: PlatformHooks, page_url: &str) -> TraceResult<Self> {
        config.validate()?;
        if !config.is_allowed(page_url) {
            return Err(TraceError::not_allowed(page_url));
        }

        let location = PageLocation::new(page_url);
        let (sender, receiver) = channel();
        let interceptor = Interceptor::install(hooks, location.clone(), sender);
        let display = DisplayContext::new(config.display_settings(), location);

        tracing::info!(url = %page_url, max_logs = config.max_display_logs, "session started");

        Ok(Self {
            interceptor,
            display,
            receiver,
        })
    }

    /// Resolve caller locations from `source`.
    pub fn with_stack_source(self, source: impl StackSource + 'static) -> Self {
        Self {
            interceptor: self.interceptor.with_stack_source(source),
            ..self
        }
    }

    pub fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }

    pub fn display(&self) -> &DisplayContext {
        &self.display
    }

    /// Deliver every pending message to the display context.
    pub fn pump(&mut self) -> usize {
        self.display.drain(&mut self.receiver)
    }

    pub fn indicator(&mut self) -> IndicatorState {
        self.pump();
        self.display.indicator()
    }

    pub fn payload(&mut self) -> String {
        self.pump();
        self.display.generate_payload()
    }

    /// Copy the payload. Failure leaves the buffers intact and the action
    /// can be retried.
    pub async fn copy_to_clipboard(&mut self, clipboard: Arc<dyn Clipboard>) -> TraceResult<()> {
        self.pump();
        self.display.copy_to_clipboard(clipboard).await
    }

    /// End the session, returning the original platform hooks.
    pub fn detach(mut self) -> PlatformHooks {
        self.pump();
        tracing::info!(buffered = self.display.buffer().len(), "session ended");
        self.interceptor.teardown()
    }
}
