//! Payload generation.
//!
//! Output format:
//!
//! ```text
//! Log @ localhost:3000/checkout
//! @ /checkout
//! E: (Checkout.jsx:14:9) Payment failed
//!
//! @ /cart
//! W: Each child in a list should have a unique "key" prop.
//! ```

use common::paths::{host_with_port, page_path, parse_page_url};
use common::{LogContent, LogEntry};

use crate::context::DisplayBuffer;
use crate::normalize::strip_dev_noise;

/// Number of most recent entries included in a payload.
pub const PAYLOAD_WINDOW: usize = 15;

/// Payload returned when nothing was captured.
pub const EMPTY_PAYLOAD: &str = "OK";

/// Path token for entries whose URL does not parse.
pub const GLOBAL_PATH: &str = "[Global]";

/// Serialize the most recent entries into the grouped payload text.
pub fn generate(buffer: &DisplayBuffer, current_page_url: &str) -> String {
    if buffer.is_empty() {
        return EMPTY_PAYLOAD.to_string();
    }

    let mut out = format!("Log @ {}", header_location(current_page_url));
    let mut last_path: Option<String> = None;

    for entry in buffer.last_n(PAYLOAD_WINDOW) {
        let path = page_path(entry.page_url()).unwrap_or_else(|_| GLOBAL_PATH.to_string());
        if last_path.as_deref() != Some(path.as_str()) {
            out.push_str(&format!("\n@ {}\n", path));
            last_path = Some(path);
        }

        let prefix = if entry.kind().is_error() { "E:" } else { "W:" };
        let location = location_suffix(entry);
        let body = message_body(entry);
        let body = body.trim();

        if body.contains('\n') {
            out.push_str(&format!("{}{}\n{}\n", prefix, location, body));
        } else {
            out.push_str(&format!("{}{} {}\n", prefix, location, body));
        }
    }

    out.trim().to_string()
}

fn header_location(page_url: &str) -> String {
    match parse_page_url(page_url) {
        Ok(url) => format!("{}{}", host_with_port(&url), url.path()),
        Err(_) => page_url.to_string(),
    }
}

fn message_body(entry: &LogEntry) -> String {
    match entry.content() {
        LogContent::Warn(text) | LogContent::Error(text) => text.clone(),
        LogContent::UnhandledException(record) => {
            let stack = record.stack.as_deref().unwrap_or("");
            if stack.is_empty() {
                record.message.clone()
            } else if stack.contains(&record.message) {
                stack.to_string()
            } else {
                format!("{}\n{}", record.message, stack)
            }
        }
    }
}

fn location_suffix(entry: &LogEntry) -> String {
    let mut source = entry.caller_location().to_string();
    if source.is_empty() {
        if let LogContent::UnhandledException(record) = entry.content() {
            if let Some(file) = &record.source_file {
                source = format!(
                    "{}:{}",
                    file,
                    record.line.map(|line| line.to_string()).unwrap_or_default()
                );
            }
        }
    }

    let cleaned = strip_dev_noise(&source);
    let cleaned = cleaned
        .strip_prefix('/')
        .or_else(|| cleaned.strip_prefix("src/"))
        .unwrap_or(cleaned.as_str());

    if cleaned.is_empty() {
        String::new()
    } else {
        format!(" ({})", cleaned)
    }
}
