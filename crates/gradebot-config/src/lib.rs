//! # gradebot-config
//!
//! Layered configuration loading for gradebot using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`GRADEBOT_*` prefix, `__` as separator)
//! 2. Plain `GITHUB_TOKEN` (mapped to `github.token`)
//! 3. An explicit `--config` file, or `./gradebot.toml`
//! 4. User-level `~/.config/gradebot/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `GRADEBOT_GITHUB__ORGANIZATION` -> `github.organization`,
//! `GRADEBOT_GRADING__MAX_CONCURRENT_REQUESTS` -> `grading.max_concurrent_requests`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use gradebot_config::GradebotConfig;
//!
//! let config = GradebotConfig::load_with_dotenv(None).expect("config");
//! if config.github.is_configured() {
//!     println!("grading {}", config.github.organization);
//! }
//! ```

mod error;
mod general;
mod github;
mod grading;
mod server;
mod tracker;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use github::GithubConfig;
pub use grading::GradingConfig;
pub use server::ServerConfig;
pub use tracker::TrackerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GradebotConfig {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub grading: GradingConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl GradebotConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source cannot be parsed or the merged
    /// values fail validation.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the working directory.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        // A missing .env is the normal case in deployment.
        let _ = dotenvy::dotenv();
        Self::load(config_file)
    }

    /// Build the figment provider chain.
    ///
    /// `config_file` replaces the project-local `./gradebot.toml` when given.
    #[must_use]
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Explicit or project-local config
        let local_path = config_file.map_or_else(|| PathBuf::from("gradebot.toml"), Path::to_path_buf);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: the token name every GitHub tool understands
        figment = figment.merge(
            Env::raw()
                .only(&["GITHUB_TOKEN"])
                .map(|_| "github.token".into()),
        );

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed("GRADEBOT_").split("__"))
    }

    /// Reject values no run can work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero concurrency limit or
    /// an out-of-range page size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grading.max_concurrent_requests == 0 {
            return Err(ConfigError::InvalidValue {
                field: "grading.max_concurrent_requests".into(),
                reason: "must be at least 1".into(),
            });
        }
        if !(1..=100).contains(&self.github.page_size) {
            return Err(ConfigError::InvalidValue {
                field: "github.page_size".into(),
                reason: format!("must be between 1 and 100, got {}", self.github.page_size),
            });
        }
        Ok(())
    }

    /// Fail unless a GitHub token is available.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when `github.token` is empty.
    pub fn require_github(&self) -> Result<&GithubConfig, ConfigError> {
        if self.github.is_configured() {
            Ok(&self.github)
        } else {
            Err(ConfigError::NotConfigured {
                section: "github".into(),
            })
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gradebot").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GradebotConfig::default();
        assert!(!config.github.is_configured());
        assert!(config.validate().is_ok());
        assert!(config.general.log_file().is_none());
    }

    #[test]
    fn zero_concurrency_rejected() {
        let mut config = GradebotConfig::default();
        config.grading.max_concurrent_requests = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "grading.max_concurrent_requests"));
    }

    #[test]
    fn oversized_page_rejected() {
        let mut config = GradebotConfig::default();
        config.github.page_size = 500;
        assert!(config.validate().is_err());
    }

    #[test]
    fn require_github_without_token() {
        let config = GradebotConfig::default();
        assert!(matches!(
            config.require_github(),
            Err(ConfigError::NotConfigured { .. })
        ));
    }
}
