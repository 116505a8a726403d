//! Same-document navigation detection.

use common::paths::page_path;
use std::fmt;

/// How the history changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationKind {
    PushState,
    ReplaceState,
    PopState,
}

impl fmt::Display for NavigationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationKind::PushState => f.write_str("pushState"),
            NavigationKind::ReplaceState => f.write_str("replaceState"),
            NavigationKind::PopState => f.write_str("popstate"),
        }
    }
}

/// Tracks the last observed path and reports actual path changes.
#[derive(Clone, Debug)]
pub struct NavigationDetector {
    current_path: String,
}

impl NavigationDetector {
    pub fn new(href: &str) -> Self {
        Self {
            current_path: path_of(href),
        }
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// Record the location after a history change. Returns `true` exactly
    /// once per change of path; query and hash changes are ignored.
    pub fn observe(&mut self, href: &str) -> bool {
        let path = path_of(href);
        if path == self.current_path {
            return false;
        }
        self.current_path = path;
        true
    }
}

fn path_of(href: &str) -> String {
    page_path(href).unwrap_or_else(|_| href.to_string())
}
