//! Exercise tracker collaborator.

use async_trait::async_trait;

use crate::errors::TrackerError;

/// Source of the exercises a committer has passed.
#[async_trait]
pub trait ExerciseTracker: Send + Sync {
    /// Passed exercise ids for the committer keyed by `identifier_hash`.
    async fn fetch_passed_exercises(
        &self,
        identifier_hash: &str,
    ) -> Result<Vec<String>, TrackerError>;
}
