//! Webhook server configuration.

use serde::{Deserialize, Serialize};

fn default_bind() -> String {
    String::from("0.0.0.0:3000")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address the webhook server listens on.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}
