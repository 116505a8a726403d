//! Best-effort caller location resolution.

use common::{TraceError, TraceResult};

/// Frames containing any of these are dependency or extension internals.
const NOISE_MARKERS: &[&str] = &["chrome-extension://", "node_modules", ".vite/deps"];

/// Source of synthetic stack traces, captured at the interception point.
pub trait StackSource: Send + Sync {
    fn capture(&self) -> TraceResult<String>;
}

impl<F> StackSource for F
where
    F: Fn() -> TraceResult<String> + Send + Sync,
{
    fn capture(&self) -> TraceResult<String> {
        self()
    }
}

/// Stack source for platforms without stack traces.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoStack;

impl StackSource for NoStack {
    fn capture(&self) -> TraceResult<String> {
        Err(TraceError::caller_resolution("stack traces unavailable"))
    }
}

/// Resolve the `file:line` of the code that called into the interceptor.
///
/// Returns an empty string when no stack is available or every frame is noise.
pub fn resolve_caller(source: &dyn StackSource, script_marker: &str) -> String {
    match source.capture() {
        Ok(stack) => first_application_frame(&stack, script_marker).unwrap_or_default(),
        Err(err) => {
            tracing::debug!(error = %err, "caller location unavailable");
            String::new()
        }
    }
}

/// First frame after the header line that belongs to neither the
/// interceptor script nor a dependency, without its leading `at`.
pub fn first_application_frame(stack: &str, script_marker: &str) -> Option<String> {
    stack
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .find(|line| {
            let own_frame = !script_marker.is_empty() && line.contains(script_marker);
            !own_frame && !NOISE_MARKERS.iter().any(|marker| line.contains(marker))
        })
        .map(strip_at)
}

fn strip_at(line: &str) -> String {
    match line.strip_prefix("at") {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim().to_string(),
        _ => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STACK: &str = "Error\n    at console.warn (http://localhost:3000/inject.js:40:15)\n    at http://localhost:3000/node_modules/.vite/deps/react-dom.js?v=1:100:3\n    at Cart (http://localhost:3000/src/Cart.jsx:12:9)\n    at App (http://localhost:3000/src/App.jsx:5:1)";

    #[test]
    fn test_skips_own_and_dependency_frames() {
        assert_eq!(
            first_application_frame(STACK, "inject.js").as_deref(),
            Some("Cart (http://localhost:3000/src/Cart.jsx:12:9)")
        );
    }

    #[test]
    fn test_header_line_is_skipped() {
        assert_eq!(first_application_frame("Error", "inject.js"), None);
        assert_eq!(first_application_frame("", "inject.js"), None);
    }

    #[test]
    fn test_all_noise_yields_empty() {
        let stack = "Error\n    at chrome-extension://abc/inject.js:1:1\n    at node_modules/x.js:1:1";
        let source = move || -> TraceResult<String> { Ok(stack.to_string()) };
        assert_eq!(resolve_caller(&source, "inject.js"), "");
    }

    #[test]
    fn test_capture_failure_yields_empty() {
        assert_eq!(resolve_caller(&NoStack, "inject.js"), "");
    }

    #[test]
    fn test_frame_without_at_token() {
        let stack = "Error\nwarn@http://localhost:3000/inject.js:4\nhandleClick@http://localhost:3000/src/Button.jsx:8";
        assert_eq!(
            first_application_frame(stack, "inject.js").as_deref(),
            Some("handleClick@http://localhost:3000/src/Button.jsx:8")
        );
    }
}
