//! User preferences the engines read. Passed in explicitly; the core keeps no global
//! settings store.

use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEZONE: &str = "America/Chicago";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// When off, assignment lists keep their incoming order.
    #[serde(default = "default_true")]
    pub smart_prioritization: bool,

    /// IANA zone used to read due dates/times.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_true() -> bool {
    true
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            smart_prioritization: true,
            timezone: default_timezone(),
        }
    }
}

impl Settings {
    pub fn with_smart_prioritization(mut self, enabled: bool) -> Self {
        self.smart_prioritization = enabled;
        self
    }

    pub fn with_timezone(mut self, tz: impl Into<String>) -> Self {
        self.timezone = tz.into();
        self
    }
}
