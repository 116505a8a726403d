//! Replay of recorded captures.
//!
//! Input is JSON lines, one event per line:
//!
//! ```text
//! {"event":"warn","args":["Each child in a list should have a unique \"key\" prop."]}
//! {"event":"error","args":[{"componentStack":"\n    at Cart"}],"stack":"Error\n    at Cart (http://localhost:3000/src/Cart.jsx:4:1)"}
//! {"event":"uncaught","message":"x is undefined","source":"http://localhost:3000/src/App.jsx","line":12}
//! {"event":"navigate","url":"http://localhost:3000/checkout"}
//! {"event":"back","url":"http://localhost:3000/cart"}
//! ```

use capture::{ConsoleArg, StackSource, UncaughtException};
use common::{TraceError, TraceResult};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::Value;
use std::io::BufRead;
use std::sync::Arc;

use crate::session::Session;

/// One recorded platform event.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RecordedEvent {
    Warn {
        #[serde(default)]
        args: Vec<Value>,
        /// Stack captured at the call site.
        #[serde(default)]
        stack: Option<String>,
    },
    Error {
        #[serde(default)]
        args: Vec<Value>,
        #[serde(default)]
        stack: Option<String>,
    },
    Uncaught {
        message: String,
        #[serde(default)]
        source: Option<String>,
        #[serde(default)]
        line: Option<u32>,
        #[serde(default)]
        column: Option<u32>,
        #[serde(default)]
        stack: Option<String>,
    },
    Navigate {
        url: String,
        #[serde(default)]
        replace: bool,
    },
    Back {
        url: String,
    },
}

/// Stack source fed from the recording, one stack per console call.
#[derive(Clone, Debug, Default)]
struct RecordedStack {
    pending: Arc<Mutex<Option<String>>>,
}

impl StackSource for RecordedStack {
    fn capture(&self) -> TraceResult<String> {
        self.pending
            .lock()
            .take()
            .ok_or_else(|| TraceError::caller_resolution("no stack recorded for this call"))
    }
}

/// Drives a [`Session`] from recorded events.
pub struct Replayer {
    session: Session,
    stack: RecordedStack,
}

impl Replayer {
    pub fn new(session: Session) -> Self {
        let stack = RecordedStack::default();
        Self {
            session: session.with_stack_source(stack.clone()),
            stack,
        }
    }

    pub fn apply(&mut self, event: RecordedEvent) {
        let interceptor = self.session.interceptor();
        match event {
            RecordedEvent::Warn { args, stack } => {
                *self.stack.pending.lock() = stack;
                interceptor.warn(&to_console_args(args));
            }
            RecordedEvent::Error { args, stack } => {
                *self.stack.pending.lock() = stack;
                interceptor.error(&to_console_args(args));
            }
            RecordedEvent::Uncaught {
                message,
                source,
                line,
                column,
                stack,
            } => interceptor.uncaught_exception(&UncaughtException {
                message,
                source_file: source,
                line,
                column,
                stack,
            }),
            RecordedEvent::Navigate { url, replace: false } => interceptor.push_state(&url),
            RecordedEvent::Navigate { url, replace: true } => interceptor.replace_state(&url),
            RecordedEvent::Back { url } => interceptor.pop_state(&url),
        }
        self.session.pump();
    }

    /// Apply every event in `reader`. Malformed lines are skipped.
    /// Returns the number of events applied.
    pub fn replay<R: BufRead>(&mut self, reader: R) -> TraceResult<usize> {
        let mut applied = 0;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<RecordedEvent>(&line) {
                Ok(event) => {
                    self.apply(event);
                    applied += 1;
                }
                Err(err) => {
                    tracing::warn!(line = index + 1, error = %err, "skipping malformed event");
                }
            }
        }

        Ok(applied)
    }

    pub fn session(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }
}

fn to_console_args(args: Vec<Value>) -> Vec<ConsoleArg> {
    args.into_iter().map(ConsoleArg::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SlimTraceConfig;
    use capture::PlatformHooks;

    fn replayer() -> Replayer {
        let session = Session::attach(
            &SlimTraceConfig::default(),
            PlatformHooks::new(),
            "http://localhost:3000/cart",
        )
        .unwrap();
        Replayer::new(session)
    }

    #[test]
    fn test_parse_events() {
        let event: RecordedEvent =
            serde_json::from_str(r#"{"event":"navigate","url":"http://localhost:3000/a"}"#).unwrap();
        assert_eq!(
            event,
            RecordedEvent::Navigate {
                url: "http://localhost:3000/a".to_string(),
                replace: false
            }
        );
    }

    #[test]
    fn test_recorded_stack_resolves_caller() {
        let mut replayer = replayer();
        replayer.apply(RecordedEvent::Warn {
            args: vec![Value::from("careful")],
            stack: Some("Error\n    at warn (inject.js:1:1)\n    at Cart (http://localhost:3000/src/Cart.jsx:4:1)".to_string()),
        });
        replayer.apply(RecordedEvent::Warn {
            args: vec![Value::from("again")],
            stack: None,
        });

        let captures = replayer.session().interceptor().captures();
        assert_eq!(captures[0].caller_location(), "Cart (http://localhost:3000/src/Cart.jsx:4:1)");
        assert_eq!(captures[1].caller_location(), "");
    }

    #[test]
    fn test_replay_skips_malformed_lines() {
        let input = "{\"event\":\"error\",\"args\":[\"boom\"]}\n\nnot json\n{\"event\":\"back\",\"url\":\"http://localhost:3000/\"}\n";
        let mut replayer = replayer();

        assert_eq!(replayer.replay(input.as_bytes()).unwrap(), 2);
        assert_eq!(replayer.session().display().buffer().len(), 1);
    }
}
