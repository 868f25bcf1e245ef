//! Runtime configuration for an [`Events`](crate::context::Events) context

use serde::{Deserialize, Serialize};

use crate::Error;

/// Delegation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Event types delegated in capture mode. Their handlers only run when
    /// the matched element is the event target itself.
    #[serde(default = "default_capture_types")]
    pub capture_types: Vec<String>,
    /// Log at debug level whenever a selector can only be filed under the
    /// universal index
    #[serde(default = "default_log_universal_fallback")]
    pub log_universal_fallback: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capture_types: default_capture_types(),
            log_universal_fallback: default_log_universal_fallback(),
        }
    }
}

fn default_capture_types() -> Vec<String> {
    [
        "mouseenter",
        "mouseleave",
        "pointerenter",
        "pointerleave",
        "blur",
        "focus",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_log_universal_fallback() -> bool {
    true
}

impl Config {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether `event_type` is delegated in capture mode
    pub fn is_capture_type(&self, event_type: &str) -> bool {
        self.capture_types.iter().any(|t| t == event_type)
    }
}
