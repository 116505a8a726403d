//! The record type flowing through the capture pipeline.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a captured diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogKind {
    Warn,
    Error,
    UnhandledException,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Warn => "WARN",
            LogKind::Error => "ERROR",
            LogKind::UnhandledException => "UNHANDLED_EXCEPTION",
        }
    }

    /// Whether this kind carries error-level severity.
    pub fn is_error(&self) -> bool {
        match self {
            LogKind::Error | LogKind::UnhandledException => true,
            LogKind::Warn => false,
        }
    }

    /// Whether this kind belongs in the display buffer.
    pub fn is_issue(&self) -> bool {
        match self {
            LogKind::Warn | LogKind::Error | LogKind::UnhandledException => true,
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Details reported by the global uncaught-exception hook.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionRecord {
    pub message: String,
    pub stack: Option<String>,
    pub source_file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

/// Captured content, tagged by kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogContent {
    Warn(String),
    Error(String),
    UnhandledException(ExceptionRecord),
}

impl LogContent {
    pub fn kind(&self) -> LogKind {
        match self {
            LogContent::Warn(_) => LogKind::Warn,
            LogContent::Error(_) => LogKind::Error,
            LogContent::UnhandledException(_) => LogKind::UnhandledException,
        }
    }

    /// Rewrite the text fields: the message string for console captures,
    /// the stack for exceptions. Exception messages are left alone.
    pub fn map_text(self, f: impl Fn(&str) -> String) -> Self {
        match self {
            LogContent::Warn(text) => LogContent::Warn(f(&text)),
            LogContent::Error(text) => LogContent::Error(f(&text)),
            LogContent::UnhandledException(mut record) => {
                record.stack = record.stack.as_deref().map(&f);
                LogContent::UnhandledException(record)
            }
        }
    }
}

/// A single captured diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(flatten)]
    content: LogContent,
    timestamp: DateTime<Utc>,
    page_url: String,
    caller_location: String,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    pub fn new(
        content: LogContent,
        page_url: impl Into<String>,
        caller_location: impl Into<String>,
    ) -> Self {
        Self {
            content,
            timestamp: Utc::now(),
            page_url: page_url.into(),
            caller_location: caller_location.into(),
        }
    }

    pub fn kind(&self) -> LogKind {
        self.content.kind()
    }

    pub fn content(&self) -> &LogContent {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Capture time as an ISO-8601 string.
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    pub fn caller_location(&self) -> &str {
        &self.caller_location
    }

    /// Consume the entry, rewriting its text fields.
    pub fn map_text(self, f: impl Fn(&str) -> String) -> Self {
        Self {
            content: self.content.map_text(f),
            ..self
        }
    }
}
