//! Stack trace normalization.
//!
//! Strips dependency frames, rendering-library wrapper frames, console
//! format artifacts, local dev-server prefixes and cache busters, so the
//! payload spends its tokens on application frames.

use once_cell::sync::Lazy;
use regex::Regex;

/// Traces longer than this are truncated.
pub const MAX_LINES: usize = 10;

/// Lines kept when truncating.
pub const TRUNCATED_LINES: usize = 8;

/// Marker appended after truncation.
pub const ELLIPSIS: &str = "...";

/// Substrings marking dependency, dev-server cache, and extension frames.
const NOISE_MARKERS: &[&str] = &["node_modules", ".vite/deps", "chrome-extension://"];

static LOCAL_DEV_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://localhost:\d+/src/").unwrap());

static CACHE_BUSTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\?t=\d+").unwrap());

static LEADING_AT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(at\s+)+").unwrap());

static WRAPPER_ELEMENT_FRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^at (div|span|p|a|li|ul|ol|h[1-6]|button|input|section|header|footer|nav|main|article|aside|select|option|br|strong|em)\b",
    )
    .unwrap()
});

static FORMAT_ARTIFACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%[os]$|^%s %s$|^%o\s*%s\s*%s$").unwrap());

/// Clean a raw stack trace or message.
///
/// Deterministic and idempotent. Cleaning passes repeat until the lines
/// stop changing, since a rewrite can expose new noise (`at %o` becomes
/// `%o`). Every change shortens the text, which bounds the loop.
/// Truncation applies once, to the settled lines.
pub fn normalize(raw: &str) -> String {
    let mut lines = clean_pass(raw);
    loop {
        let next = clean_pass(&lines.join("\n"));
        if next == lines {
            break;
        }
        lines = next;
    }

    if lines.len() > MAX_LINES {
        lines.truncate(TRUNCATED_LINES);
        if lines.last().map(String::as_str) != Some(ELLIPSIS) {
            lines.push(ELLIPSIS.to_string());
        }
    }

    lines.join("\n")
}

fn clean_pass(raw: &str) -> Vec<String> {
    let unescaped = raw.replace("\\n", "\n");
    let mut lines: Vec<String> = Vec::new();

    for line in unescaped.split('\n') {
        let line = line.trim();
        if line.is_empty() || is_noise(line) {
            continue;
        }

        let cleaned = LEADING_AT
            .replace(&strip_dev_noise(line), "")
            .trim()
            .to_string();
        if cleaned.is_empty() || is_noise(&cleaned) {
            continue;
        }

        // Compare against the immediate predecessor only.
        if lines.last() == Some(&cleaned) {
            continue;
        }
        lines.push(cleaned);
    }

    lines
}

/// Remove local dev-server URL prefixes and `?t=<digits>` cache busters.
pub fn strip_dev_noise(text: &str) -> String {
    let without_prefix = LOCAL_DEV_PREFIX.replace_all(text, "");
    CACHE_BUSTER.replace_all(&without_prefix, "").into_owned()
}

fn is_noise(line: &str) -> bool {
    NOISE_MARKERS.iter().any(|marker| line.contains(marker))
        || WRAPPER_ELEMENT_FRAME.is_match(line)
        || FORMAT_ARTIFACT.is_match(line)
}
