//! Per-repository results and batch summaries.

use gradebot_core::{RepositoryFacts, Report};
use serde::Serialize;

/// How grading one repository ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Status {
    /// No stored report existed; one was committed.
    Created,
    /// The stored report differed and was overwritten.
    Updated,
    /// The stored report already matched; nothing was written.
    Unchanged,
    /// The tracker could not be queried; the zero grade was not written.
    TrackerFailed { error: String },
    /// Writing the report failed.
    Failed { error: String },
}

impl Status {
    /// Whether the stored report now reflects the computed one.
    #[must_use]
    pub const fn is_synchronized(&self) -> bool {
        matches!(self, Self::Created | Self::Updated | Self::Unchanged)
    }
}

/// Result of grading one repository.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryOutcome {
    pub report: Report,
    #[serde(flatten)]
    pub status: Status,
}

/// Facts computed for one repository plus whether the tracker answered.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub facts: RepositoryFacts,
    /// Tracker failure message; the grade is zero when set.
    pub tracker_error: Option<String>,
}

impl Evaluation {
    #[must_use]
    pub const fn graded(facts: RepositoryFacts) -> Self {
        Self {
            facts,
            tracker_error: None,
        }
    }
}

/// Aggregate counts for a batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Repositories returned by discovery.
    pub discovered: usize,
    /// Repositories skipped because they are in the completion cache.
    pub cached: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
    /// Repositories added to the completion cache by this run.
    pub newly_completed: usize,
    pub outcomes: Vec<RepositoryOutcome>,
}

impl RunSummary {
    pub(crate) fn record(&mut self, outcome: RepositoryOutcome) {
        match outcome.status {
            Status::Created => self.created += 1,
            Status::Updated => self.updated += 1,
            Status::Unchanged => self.unchanged += 1,
            Status::TrackerFailed { .. } | Status::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }

    /// Number of report commits this run issued.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.created + self.updated
    }
}
