//! General application configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Append log output to this file in addition to stderr. Empty disables it.
    #[serde(default)]
    pub log_file: String,
}

impl GeneralConfig {
    /// Log file path, if file logging is enabled.
    #[must_use]
    pub fn log_file(&self) -> Option<&str> {
        Some(self.log_file.as_str()).filter(|path| !path.is_empty())
    }
}
