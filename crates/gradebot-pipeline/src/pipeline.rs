//! Grading orchestration.
//!
//! A batch run lists every repository once, evaluates all repositories that
//! are not in the completion cache concurrently, then writes reports back one
//! repository at a time. Only gitexercises requests pass through the
//! admission gate; GitHub calls are limited by GitHub itself.

use futures::future::join_all;
use gradebot_core::{
    ExerciseTracker, FileWrite, HostingPlatform, RepositoryMetadata, Report, TrackerError,
    compute_grade, extract_facts, is_complete,
};
use tokio::sync::Semaphore;

use crate::cache::CompletionCache;
use crate::error::PipelineError;
use crate::outcome::{Evaluation, RepositoryOutcome, RunSummary, Status};
use crate::settings::PipelineSettings;

const CREATE_MESSAGE: &str = "GRADE BOT: Create report";
const UPDATE_MESSAGE: &str = "GRADE BOT: Update report";

/// The grading pipeline, shared by the batch and webhook triggers.
pub struct Pipeline<H, T> {
    hosting: H,
    tracker: T,
    settings: PipelineSettings,
    gate: Semaphore,
}

impl<H, T> Pipeline<H, T>
where
    H: HostingPlatform,
    T: ExerciseTracker,
{
    #[must_use]
    pub fn new(hosting: H, tracker: T, settings: PipelineSettings) -> Self {
        let gate = Semaphore::new(settings.max_concurrent_requests.max(1));
        Self {
            hosting,
            tracker,
            settings,
            gate,
        }
    }

    #[must_use]
    pub const fn hosting(&self) -> &H {
        &self.hosting
    }

    #[must_use]
    pub const fn tracker(&self) -> &T {
        &self.tracker
    }

    #[must_use]
    pub const fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Grade every repository of `org` not yet in `cache`.
    ///
    /// With `force`, cached repositories are re-evaluated as well. Per
    /// repository failures are recorded in the summary; only discovery
    /// failure aborts the run. `cache` is updated in memory once every
    /// repository has settled; saving it is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Discovery`] if the repositories cannot be
    /// listed.
    pub async fn run_batch(
        &self,
        org: &str,
        cache: &mut CompletionCache,
        force: bool,
    ) -> Result<RunSummary, PipelineError> {
        let repositories = self
            .hosting
            .list_repositories(org)
            .await
            .map_err(|source| PipelineError::Discovery {
                org: org.to_string(),
                source,
            })?;

        let mut summary = RunSummary {
            discovered: repositories.len(),
            ..RunSummary::default()
        };

        let (pending, cached): (Vec<_>, Vec<_>) = repositories
            .into_iter()
            .partition(|meta| force || !cache.contains(&meta.name));
        for meta in &cached {
            tracing::info!(repo = %meta.name, "skipping (already completed)");
        }
        summary.cached = cached.len();

        let evaluations = join_all(pending.iter().map(|meta| self.evaluate(meta))).await;

        // Writes are sequential to stay under GitHub's secondary rate limits.
        let mut completed = Vec::new();
        for (meta, evaluation) in pending.iter().zip(evaluations) {
            let outcome = self.settle(meta, &evaluation).await;
            if outcome.status.is_synchronized() && is_complete(evaluation.facts.grade()) {
                completed.push(meta.name.clone());
            }
            summary.record(outcome);
        }

        for name in completed {
            if cache.insert(name) {
                summary.newly_completed += 1;
            }
        }

        tracing::info!(
            org,
            discovered = summary.discovered,
            cached = summary.cached,
            created = summary.created,
            updated = summary.updated,
            unchanged = summary.unchanged,
            failed = summary.failed,
            newly_completed = summary.newly_completed,
            "batch finished"
        );
        Ok(summary)
    }

    /// Grade a single repository and synchronize its report.
    ///
    /// The completion cache is not consulted: an event for a repository
    /// means it changed.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Hosting`] if the repository cannot be read.
    pub async fn grade_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<RepositoryOutcome, PipelineError> {
        let meta = self
            .hosting
            .get_repository(owner, name)
            .await
            .map_err(|source| PipelineError::Hosting {
                repo: format!("{owner}/{name}"),
                source,
            })?;
        let evaluation = self.evaluate(&meta).await;
        Ok(self.settle(&meta, &evaluation).await)
    }

    /// Extract facts and compute the grade for one repository.
    ///
    /// Never fails: a tracker error yields a zero grade with
    /// [`Evaluation::tracker_error`] set.
    pub async fn evaluate(&self, meta: &RepositoryMetadata) -> Evaluation {
        let draft = extract_facts(meta, &self.settings.rules);

        if !draft.prerequisites_met() {
            tracing::debug!(repo = %meta.name, "prerequisites missing, grade 0");
            return Evaluation::graded(draft.finalize_zero());
        }
        let Some(hash) = draft.identifier.as_ref().map(|id| id.hash.clone()) else {
            tracing::debug!(repo = %meta.name, "no identifier submitted, grade 0");
            return Evaluation::graded(draft.finalize_zero());
        };

        match self.passed_exercises(&hash).await {
            Ok(passed) => {
                let grade = compute_grade(&passed);
                tracing::debug!(repo = %meta.name, grade, passed = passed.len(), "graded");
                Evaluation::graded(draft.finalize(grade))
            }
            Err(error) => {
                tracing::warn!(repo = %meta.name, %error, "gitexercises lookup failed, grade 0");
                Evaluation {
                    facts: draft.finalize_zero(),
                    tracker_error: Some(error.to_string()),
                }
            }
        }
    }

    async fn passed_exercises(&self, hash: &str) -> Result<Vec<String>, TrackerError> {
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| TrackerError::Transport(format!("admission gate closed: {e}")))?;
        self.tracker.fetch_passed_exercises(hash).await
    }

    /// Turn an evaluation into a final outcome, writing the report if needed.
    async fn settle(&self, meta: &RepositoryMetadata, evaluation: &Evaluation) -> RepositoryOutcome {
        let report = evaluation.facts.to_report();
        let status = if let Some(error) = &evaluation.tracker_error {
            Status::TrackerFailed {
                error: error.clone(),
            }
        } else {
            match self.synchronize(meta, &report).await {
                Ok(status) => status,
                Err(error) => {
                    tracing::error!(repo = %meta.name, %error, "error updating report");
                    Status::Failed {
                        error: error.to_string(),
                    }
                }
            }
        };
        RepositoryOutcome { report, status }
    }

    /// Create, update, or leave alone the stored report.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Hosting`] for any hosting failure other than
    /// a missing report, including write conflicts.
    pub async fn synchronize(
        &self,
        meta: &RepositoryMetadata,
        report: &Report,
    ) -> Result<Status, PipelineError> {
        if meta
            .existing_report
            .as_deref()
            .is_some_and(|stored| report.matches_stored(stored))
        {
            tracing::info!(repo = %meta.name, "no changes, skipping");
            return Ok(Status::Unchanged);
        }

        let hosting_error = |source| PipelineError::Hosting {
            repo: meta.name.clone(),
            source,
        };
        let branch = meta
            .default_branch
            .clone()
            .unwrap_or_else(|| self.settings.fallback_branch.clone());
        let path = &self.settings.report_path;

        let current = match self
            .hosting
            .get_file(&meta.owner, &meta.name, path, &branch)
            .await
        {
            Ok(file) => Some(file),
            Err(error) if error.is_not_found() => None,
            Err(error) => return Err(hosting_error(error)),
        };

        if let Some(file) = &current {
            if report.matches_stored(&file.text) {
                tracing::info!(repo = %meta.name, "no changes, skipping");
                return Ok(Status::Unchanged);
            }
        }

        let content = report.to_pretty_json()?;
        match current {
            Some(file) => {
                let write = file_write(path, content, UPDATE_MESSAGE, branch);
                self.hosting
                    .update_file(&meta.owner, &meta.name, &write, &file.sha)
                    .await
                    .map_err(hosting_error)?;
                tracing::info!(repo = %meta.name, grade = report.grade, "updated report");
                Ok(Status::Updated)
            }
            None => {
                let write = file_write(path, content, CREATE_MESSAGE, branch);
                self.hosting
                    .create_file(&meta.owner, &meta.name, &write)
                    .await
                    .map_err(hosting_error)?;
                tracing::info!(repo = %meta.name, grade = report.grade, "created report");
                Ok(Status::Created)
            }
        }
    }
}

fn file_write(path: &str, content: String, message: &str, branch: String) -> FileWrite {
    FileWrite {
        path: path.to_string(),
        content,
        message: message.to_string(),
        branch,
    }
}
