//! GitHub API configuration.

use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    String::from("https://api.github.com")
}

const fn default_page_size() -> u32 {
    50
}

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GithubConfig {
    /// Personal access token or app token with `contents: write` on the
    /// classroom repositories. Also read from plain `GITHUB_TOKEN`.
    #[serde(default)]
    pub token: String,

    /// REST base URL; GraphQL is served from `{api_url}/graphql`.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Classroom organization graded by `gradebot run`.
    #[serde(default)]
    pub organization: String,

    /// Repositories per GraphQL discovery page (GitHub caps this at 100).
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: default_api_url(),
            organization: String::new(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GithubConfig {
    /// A token is the only thing we cannot default.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty()
    }
}
