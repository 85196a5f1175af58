//! Pipeline settings.

use gradebot_core::GradingRules;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub rules: GradingRules,
    /// Report file path inside each repository.
    pub report_path: String,
    /// Permits in the gitexercises admission gate.
    pub max_concurrent_requests: usize,
    /// Branch reports are committed to when a repository has no default branch.
    pub fallback_branch: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            rules: GradingRules::default(),
            report_path: "report.json".into(),
            max_concurrent_requests: 5,
            fallback_branch: "main".into(),
        }
    }
}
