//! SlimTrace configuration.

use common::{TraceError, TraceResult};
use display::DisplaySettings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// SlimTrace configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SlimTraceConfig {
    /// Hostnames where capture is active.
    #[serde(alias = "allowedDomains")]
    pub allowed_origins: Vec<String>,
    /// Display buffer capacity.
    #[serde(alias = "maxLogs")]
    pub max_display_logs: usize,
    /// Whether the issue indicator pulses.
    pub pulse_on_error: bool,
    /// Milliseconds the copied state stays visible.
    pub revert_after_ms: u64,
}

impl SlimTraceConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> TraceResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> TraceResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> TraceResult<()> {
        if self.max_display_logs == 0 {
            return Err(TraceError::config("maxDisplayLogs must be positive"));
        }
        Ok(())
    }

    /// Whether capture should activate on `page_url`.
    pub fn is_allowed(&self, page_url: &str) -> bool {
        let Ok(url) = Url::parse(page_url) else {
            return false;
        };
        let Some(host) = url.host_str() else {
            return false;
        };
        self.allowed_origins
            .iter()
            .any(|origin| origin.eq_ignore_ascii_case(host))
    }

    pub fn display_settings(&self) -> DisplaySettings {
        DisplaySettings {
            max_logs: self.max_display_logs,
            pulse_on_error: self.pulse_on_error,
            revert_after: Duration::from_millis(self.revert_after_ms),
        }
    }

    /// Allow capture on another hostname.
    pub fn with_allowed_origin(mut self, origin: &str) -> Self {
        self.allowed_origins.push(origin.to_string());
        self
    }

    /// Set display buffer capacity.
    pub fn with_max_display_logs(mut self, max: usize) -> Self {
        self.max_display_logs = max;
        self
    }

    /// Set whether the indicator pulses.
    pub fn with_pulse_on_error(mut self, enabled: bool) -> Self {
        self.pulse_on_error = enabled;
        self
    }
}

impl Default for SlimTraceConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "localhost".to_string(),
                "127.0.0.1".to_string(),
                "0.0.0.0".to_string(),
            ],
            max_display_logs: 20,
            pulse_on_error: true,
            revert_after_ms: 2000,
        }
    }
}
