//! Error locality: does the current page have an open issue?

use common::paths::{normalize_path, page_path};
use common::LogEntry;

use crate::context::DisplayBuffer;

/// True iff some error or warning in the buffer was captured on
/// `current_path`, ignoring trailing slashes.
///
/// Entries whose URL does not parse fall back to a raw substring check.
pub fn has_issue_on_path(buffer: &DisplayBuffer, current_path: &str) -> bool {
    let normalized_current = normalize_path(current_path);
    buffer
        .iter()
        .any(|entry| is_issue_on(entry, current_path, &normalized_current))
}

fn is_issue_on(entry: &LogEntry, current_path: &str, normalized_current: &str) -> bool {
    if !entry.kind().is_issue() || entry.page_url().is_empty() {
        return false;
    }

    match page_path(entry.page_url()) {
        Ok(path) => normalize_path(&path) == normalized_current,
        Err(_) => entry.page_url().contains(current_path),
    }
}
