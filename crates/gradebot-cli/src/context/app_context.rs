use std::time::Duration;

use anyhow::Context;
use gradebot_config::{GradebotConfig, GradingConfig};
use gradebot_github::GithubClient;
use gradebot_pipeline::{Pipeline, PipelineSettings};
use gradebot_tracker::GitExercisesClient;

/// The pipeline wired to the live GitHub and gitexercises clients.
pub type GradingPipeline = Pipeline<GithubClient, GitExercisesClient>;

/// Configuration plus the clients built from it, shared by every command.
pub struct AppContext {
    pub config: GradebotConfig,
    pub pipeline: GradingPipeline,
}

impl AppContext {
    /// Build the GitHub and gitexercises clients from `config`.
    ///
    /// # Errors
    ///
    /// Fails when no GitHub token is configured or an HTTP client cannot be
    /// built.
    pub fn init(config: GradebotConfig) -> anyhow::Result<Self> {
        let github = config
            .require_github()
            .context("set GITHUB_TOKEN or github.token")?;
        let hosting = GithubClient::new(
            &github.api_url,
            &github.token,
            Duration::from_secs(github.timeout_secs),
        )
        .context("failed to build GitHub client")?
        .with_page_size(github.page_size)
        .with_paths(&config.grading.rules(), &config.grading.report_path);

        let tracker = GitExercisesClient::new(
            &config.tracker.base_url,
            Duration::from_secs(config.tracker.timeout_secs),
        )
        .context("failed to build gitexercises client")?;

        let pipeline = Pipeline::new(hosting, tracker, pipeline_settings(&config.grading));
        Ok(Self { config, pipeline })
    }
}

fn pipeline_settings(grading: &GradingConfig) -> PipelineSettings {
    PipelineSettings {
        rules: grading.rules(),
        report_path: grading.report_path.clone(),
        max_concurrent_requests: grading.max_concurrent_requests,
        ..PipelineSettings::default()
    }
}
