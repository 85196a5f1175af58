//! # gradebot-core
//!
//! Core types and grading rules for gradebot.
//!
//! This crate provides the pieces every other gradebot crate shares:
//! - The fixed exercise point table and grade calculation
//! - Repository facts, the draft builder that produces them, and the
//!   `report.json` shape written back into student repositories
//! - The signal extractor that turns raw hosting metadata into facts
//! - Collaborator traits for the hosting platform and the exercise tracker
//! - Cross-cutting error types

pub mod errors;
pub mod facts;
pub mod grade;
pub mod hosting;
pub mod report;
pub mod signals;
pub mod tracker;

pub use errors::{HostingError, TrackerError};
pub use facts::{FactsDraft, Identifier, RepositoryFacts};
pub use grade::{MAX_GRADE, compute_grade, is_complete};
pub use hosting::{FileWrite, HostingPlatform, RemoteFile};
pub use report::Report;
pub use signals::{GradingRules, IdentifierLookup, RepositoryMetadata, TreeEntry, extract_facts};
pub use tracker::ExerciseTracker;
