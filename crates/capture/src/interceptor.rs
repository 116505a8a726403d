//! Interception of the page's warning/error reporting surface.

use common::{ExceptionRecord, LogContent, LogEntry, Message, MessageSender, PageLocation, RingBuffer};
use parking_lot::Mutex;
use std::fmt;

use crate::caller::{resolve_caller, NoStack, StackSource};
use crate::navigation::{NavigationDetector, NavigationKind};
use crate::stringify::{format_args, ConsoleArg};

/// Capacity of the raw capture buffer.
pub const CAPTURE_BUFFER_CAPACITY: usize = 20;

/// Name of the injected script, used to skip the interceptor's own frames.
pub const DEFAULT_SCRIPT_MARKER: &str = "inject.js";

pub type ConsoleHook = Box<dyn Fn(&[ConsoleArg]) + Send + Sync>;
pub type ExceptionHook = Box<dyn Fn(&UncaughtException) + Send + Sync>;
pub type HistoryHook = Box<dyn Fn(&str) + Send + Sync>;

/// The platform's original reporting and history entry points.
pub struct PlatformHooks {
    warn: ConsoleHook,
    error: ConsoleHook,
    uncaught: Option<ExceptionHook>,
    push_state: HistoryHook,
    replace_state: HistoryHook,
}

impl PlatformHooks {
    /// Hooks that do nothing.
    pub fn new() -> Self {
        Self {
            warn: Box::new(|_| {}),
            error: Box::new(|_| {}),
            uncaught: None,
            push_state: Box::new(|_| {}),
            replace_state: Box::new(|_| {}),
        }
    }

    pub fn with_warn(mut self, hook: impl Fn(&[ConsoleArg]) + Send + Sync + 'static) -> Self {
        self.warn = Box::new(hook);
        self
    }

    pub fn with_error(mut self, hook: impl Fn(&[ConsoleArg]) + Send + Sync + 'static) -> Self {
        self.error = Box::new(hook);
        self
    }

    pub fn with_uncaught(mut self, hook: impl Fn(&UncaughtException) + Send + Sync + 'static) -> Self {
        self.uncaught = Some(Box::new(hook));
        self
    }

    pub fn with_push_state(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.push_state = Box::new(hook);
        self
    }

    pub fn with_replace_state(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.replace_state = Box::new(hook);
        self
    }

    pub fn warn(&self, args: &[ConsoleArg]) {
        (self.warn)(args)
    }

    pub fn error(&self, args: &[ConsoleArg]) {
        (self.error)(args)
    }

    pub fn uncaught(&self, exception: &UncaughtException) {
        if let Some(hook) = &self.uncaught {
            hook(exception)
        }
    }

    pub fn push_state(&self, href: &str) {
        (self.push_state)(href)
    }

    pub fn replace_state(&self, href: &str) {
        (self.replace_state)(href)
    }
}

impl Default for PlatformHooks {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PlatformHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformHooks")
            .field("uncaught", &self.uncaught.is_some())
            .finish_non_exhaustive()
    }
}

/// Arguments of the global uncaught-exception hook.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UncaughtException {
    pub message: String,
    pub source_file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub stack: Option<String>,
}

impl UncaughtException {
    /// `file:line` as reported by the hook, empty without a source file.
    fn source_location(&self) -> String {
        match &self.source_file {
            Some(file) => format!(
                "{}:{}",
                file,
                self.line.map(|line| line.to_string()).unwrap_or_default()
            ),
            None => String::new(),
        }
    }
}

impl From<&UncaughtException> for ExceptionRecord {
    fn from(exception: &UncaughtException) -> Self {
        Self {
            message: exception.message.clone(),
            stack: exception.stack.clone(),
            source_file: exception.source_file.clone(),
            line: exception.line,
            column: exception.column,
        }
    }
}

/// Wraps the platform hooks for the lifetime of an instrumented page.
///
/// Each wrapper records a [`LogEntry`] in the capture buffer, sends it to the
/// display context, then calls the original hook. None of them fail.
pub struct Interceptor {
    hooks: PlatformHooks,
    location: PageLocation,
    sender: MessageSender,
    stack_source: Box<dyn StackSource>,
    script_marker: String,
    captures: Mutex<RingBuffer<LogEntry>>,
    navigation: Mutex<NavigationDetector>,
}

impl Interceptor {
    /// Take ownership of the original hooks and start intercepting.
    pub fn install(hooks: PlatformHooks, location: PageLocation, sender: MessageSender) -> Self {
        let navigation = NavigationDetector::new(&location.href());
        tracing::info!(url = %location.href(), "interceptor active");

        Self {
            hooks,
            location,
            sender,
            stack_source: Box::new(NoStack),
            script_marker: DEFAULT_SCRIPT_MARKER.to_string(),
            captures: Mutex::new(RingBuffer::new(CAPTURE_BUFFER_CAPACITY)),
            navigation: Mutex::new(navigation),
        }
    }

    pub fn with_stack_source(mut self, source: impl StackSource + 'static) -> Self {
        self.stack_source = Box::new(source);
        self
    }

    pub fn with_script_marker(mut self, marker: impl Into<String>) -> Self {
        self.script_marker = marker.into();
        self
    }

    /// Wrapped `console.warn`.
    pub fn warn(&self, args: &[ConsoleArg]) {
        let caller = resolve_caller(self.stack_source.as_ref(), &self.script_marker);
        self.record(LogContent::Warn(format_args(args)), caller);
        self.hooks.warn(args);
    }

    /// Wrapped `console.error`.
    pub fn error(&self, args: &[ConsoleArg]) {
        let caller = resolve_caller(self.stack_source.as_ref(), &self.script_marker);
        self.record(LogContent::Error(format_args(args)), caller);
        self.hooks.error(args);
    }

    /// Wrapped global uncaught-exception hook.
    pub fn uncaught_exception(&self, exception: &UncaughtException) {
        self.record(
            LogContent::UnhandledException(ExceptionRecord::from(exception)),
            exception.source_location(),
        );
        self.hooks.uncaught(exception);
    }

    /// Wrapped `history.pushState`.
    pub fn push_state(&self, href: &str) {
        self.hooks.push_state(href);
        self.location.set_href(href);
        self.notify_navigation(NavigationKind::PushState);
    }

    /// Wrapped `history.replaceState`.
    pub fn replace_state(&self, href: &str) {
        self.hooks.replace_state(href);
        self.location.set_href(href);
        self.notify_navigation(NavigationKind::ReplaceState);
    }

    /// Back/forward navigation; the platform has already moved to `href`.
    pub fn pop_state(&self, href: &str) {
        self.location.set_href(href);
        self.notify_navigation(NavigationKind::PopState);
    }

    /// Snapshot of the raw capture buffer, oldest first.
    pub fn captures(&self) -> Vec<LogEntry> {
        self.captures.lock().to_vec()
    }

    pub fn location(&self) -> &PageLocation {
        &self.location
    }

    /// Stop intercepting and hand the original hooks back to the platform.
    pub fn teardown(self) -> PlatformHooks {
        tracing::info!(
            captured = self.captures.lock().len(),
            "interceptor removed"
        );
        self.hooks
    }

    fn record(&self, content: LogContent, caller_location: String) {
        let entry = LogEntry::new(content, self.location.href(), caller_location);
        tracing::debug!(kind = %entry.kind(), url = %entry.page_url(), "captured diagnostic");

        self.captures.lock().push(entry.clone());
        self.sender.send(Message::Log(entry));
    }

    fn notify_navigation(&self, kind: NavigationKind) {
        let href = self.location.href();
        let changed = self.navigation.lock().observe(&href);

        if changed {
            tracing::debug!(%kind, url = %href, "navigation detected");
            self.sender.send(Message::Reset);
        }
    }
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("location", &self.location)
            .field("script_marker", &self.script_marker)
            .field("captured", &self.captures.lock().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{channel, LogKind, MessageReceiver, TraceResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn setup(url: &str) -> (Interceptor, MessageReceiver) {
        let (tx, rx) = channel();
        let interceptor = Interceptor::install(PlatformHooks::new(), PageLocation::new(url), tx);
        (interceptor, rx)
    }

    fn drain(rx: &mut MessageReceiver) -> Vec<Message> {
        std::iter::from_fn(|| rx.try_recv()).collect()
    }

    #[test]
    fn test_warn_records_and_forwards() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let hooks = PlatformHooks::new().with_warn(move |args| {
            assert_eq!(args.len(), 2);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let (tx, mut rx) = channel();
        let interceptor = Interceptor::install(hooks, PageLocation::new("http://localhost:3000/cart"), tx);
        interceptor.warn(&["low stock".into(), ConsoleArg::Primitive("3".to_string())]);

        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let captures = interceptor.captures();
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].kind(), LogKind::Warn);
        assert_eq!(captures[0].content(), &LogContent::Warn("low stock 3".to_string()));
        assert_eq!(captures[0].page_url(), "http://localhost:3000/cart");

        assert_eq!(drain(&mut rx), vec![Message::Log(captures[0].clone())]);
    }

    #[test]
    fn test_caller_location_from_stack_source() {
        let (interceptor, _rx) = setup("http://localhost:3000/");
        let interceptor = interceptor.with_stack_source(|| -> TraceResult<String> {
            Ok("Error\n    at console.error (http://localhost:3000/inject.js:1:1)\n    at save (http://localhost:3000/src/api.js:9:3)".to_string())
        });

        interceptor.error(&["failed".into()]);
        assert_eq!(
            interceptor.captures()[0].caller_location(),
            "save (http://localhost:3000/src/api.js:9:3)"
        );
    }

    #[test]
    fn test_uncaught_exception_record() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        let hooks = PlatformHooks::new().with_uncaught(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let (tx, _rx) = channel();
        let interceptor = Interceptor::install(hooks, PageLocation::new("http://localhost:3000/"), tx);

        interceptor.uncaught_exception(&UncaughtException {
            message: "Uncaught TypeError: x is undefined".to_string(),
            source_file: Some("http://localhost:3000/src/App.jsx?t=1".to_string()),
            line: Some(42),
            column: Some(7),
            stack: Some("TypeError: x is undefined\n    at App".to_string()),
        });

        let entry = &interceptor.captures()[0];
        assert_eq!(entry.kind(), LogKind::UnhandledException);
        assert_eq!(entry.caller_location(), "http://localhost:3000/src/App.jsx?t=1:42");
        match entry.content() {
            LogContent::UnhandledException(record) => {
                assert_eq!(record.line, Some(42));
                assert_eq!(record.column, Some(7));
            }
            other => panic!("unexpected content: {:?}", other),
        }
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_capture_buffer_is_bounded() {
        let (interceptor, _rx) = setup("http://localhost:3000/");
        for i in 0..25 {
            interceptor.warn(&[format!("warning {}", i).into()]);
        }

        let captures = interceptor.captures();
        assert_eq!(captures.len(), CAPTURE_BUFFER_CAPACITY);
        assert_eq!(captures[0].content(), &LogContent::Warn("warning 5".to_string()));
    }

    #[test]
    fn test_navigation_emits_single_reset() {
        let (interceptor, mut rx) = setup("http://localhost:3000/");
        interceptor.warn(&["before".into()]);

        interceptor.push_state("http://localhost:3000/cart");
        interceptor.replace_state("http://localhost:3000/cart?tab=2");
        interceptor.pop_state("http://localhost:3000/cart");

        let messages = drain(&mut rx);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1], Message::Reset);

        // Navigation never clears the capture buffer.
        assert_eq!(interceptor.captures().len(), 1);
        assert_eq!(interceptor.location().pathname(), "/cart");
    }

    #[test]
    fn test_capture_after_display_closed() {
        let (interceptor, rx) = setup("http://localhost:3000/");
        drop(rx);
        interceptor.error(&["still captured".into()]);
        assert_eq!(interceptor.captures().len(), 1);
    }

    #[test]
    fn test_teardown_returns_hooks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let hooks = PlatformHooks::new().with_error(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let (tx, _rx) = channel();
        let interceptor = Interceptor::install(hooks, PageLocation::new("http://localhost/"), tx);

        let hooks = interceptor.teardown();
        hooks.error(&["direct".into()]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
