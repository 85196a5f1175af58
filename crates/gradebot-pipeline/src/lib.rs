//! # gradebot-pipeline
//!
//! Applies the grading rules across repositories and keeps each
//! repository's `report.json` in sync with its computed grade.
//!
//! - [`Pipeline`] drives evaluation and report synchronization for both the
//!   batch trigger (whole organization) and the event trigger (one repository)
//! - [`CompletionCache`] remembers repositories that already hold the maximum
//!   grade so batch runs can skip them

mod cache;
mod error;
mod outcome;
mod pipeline;
mod settings;

pub use cache::CompletionCache;
pub use error::PipelineError;
pub use outcome::{Evaluation, RepositoryOutcome, RunSummary, Status};
pub use pipeline::Pipeline;
pub use settings::PipelineSettings;
