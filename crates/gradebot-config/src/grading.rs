//! Grading rules and run-time limits.

use gradebot_core::GradingRules;
use serde::{Deserialize, Serialize};

fn default_target_branch() -> String {
    String::from("task_01")
}

fn default_identifier_path() -> String {
    String::from("task_01_git/gitexercises.email")
}

fn default_report_path() -> String {
    String::from("report.json")
}

fn default_cache_file() -> String {
    String::from("completed_repos.json")
}

const fn default_max_concurrent_requests() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GradingConfig {
    /// Branch students submit the identifier file on.
    #[serde(default = "default_target_branch")]
    pub target_branch: String,

    /// Identifier file path on `target_branch`.
    #[serde(default = "default_identifier_path")]
    pub identifier_path: String,

    /// Report file path in each repository.
    #[serde(default = "default_report_path")]
    pub report_path: String,

    /// Local file holding the names of fully graded repositories.
    #[serde(default = "default_cache_file")]
    pub cache_file: String,

    /// Concurrent gitexercises requests allowed during a batch.
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            target_branch: default_target_branch(),
            identifier_path: default_identifier_path(),
            report_path: default_report_path(),
            cache_file: default_cache_file(),
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

impl GradingConfig {
    /// Branch and path rules used by signal extraction.
    #[must_use]
    pub fn rules(&self) -> GradingRules {
        GradingRules {
            target_branch: self.target_branch.clone(),
            identifier_path: self.identifier_path.clone(),
        }
    }
}
