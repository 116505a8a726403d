//! URL and path helpers shared by locality matching and payload generation.

use url::Url;

use crate::error::TraceResult;

/// Parse a stored page URL.
pub fn parse_page_url(href: &str) -> TraceResult<Url> {
    Ok(Url::parse(href)?)
}

/// Extract the path component of a page URL.
pub fn page_path(href: &str) -> TraceResult<String> {
    Ok(parse_page_url(href)?.path().to_string())
}

/// Host with port, e.g. `localhost:3000`.
pub fn host_with_port(url: &Url) -> String {
    match url.port() {
        Some(port) => format!("{}:{}", url.host_str().unwrap_or(""), port),
        None => url.host_str().unwrap_or("").to_string(),
    }
}

/// Strip trailing slashes; an empty result becomes `/`.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
