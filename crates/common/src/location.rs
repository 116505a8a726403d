//! The observed page location, shared by both execution contexts.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::paths::{host_with_port, parse_page_url};

/// Handle to the current page URL.
///
/// Clones share the same location, so a navigation recorded by the
/// instrumented context is visible to the display context.
#[derive(Clone, Debug, Default)]
pub struct PageLocation {
    href: Arc<RwLock<String>>,
}

impl PageLocation {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Arc::new(RwLock::new(href.into())),
        }
    }

    /// Get the full URL as a string.
    pub fn href(&self) -> String {
        self.href.read().clone()
    }

    /// Set the URL after a navigation.
    pub fn set_href(&self, href: impl Into<String>) {
        *self.href.write() = href.into();
    }

    /// Get the pathname. Falls back to the raw href if it does not parse.
    pub fn pathname(&self) -> String {
        let href = self.href();
        match parse_page_url(&href) {
            Ok(url) => url.path().to_string(),
            Err(_) => href,
        }
    }

    /// Get the hostname (no port).
    pub fn hostname(&self) -> String {
        parse_page_url(&self.href())
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_default()
    }

    /// Get the host and pathname, e.g. `localhost:3000/cart`.
    pub fn host_and_path(&self) -> String {
        let href = self.href();
        match parse_page_url(&href) {
            Ok(url) => format!("{}{}", host_with_port(&url), url.path()),
            Err(_) => href,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_parts() {
        let location = PageLocation::new("http://localhost:3000/cart?x=1");
        assert_eq!(location.pathname(), "/cart");
        assert_eq!(location.hostname(), "localhost");
        assert_eq!(location.host_and_path(), "localhost:3000/cart");
    }

    #[test]
    fn test_clones_share_state() {
        let location = PageLocation::new("http://localhost/a");
        let other = location.clone();
        other.set_href("http://localhost/b");
        assert_eq!(location.pathname(), "/b");
    }

    #[test]
    fn test_unparseable_location() {
        let location = PageLocation::new("example.com/checkout");
        assert_eq!(location.host_and_path(), "example.com/checkout");
        assert_eq!(location.hostname(), "");
    }
}
