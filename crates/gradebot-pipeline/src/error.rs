//! Pipeline error types.

use std::path::PathBuf;

use gradebot_core::HostingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Repository discovery failed, so there is nothing to grade.
    #[error("failed to list repositories of '{org}': {source}")]
    Discovery {
        org: String,
        #[source]
        source: HostingError,
    },

    /// A hosting call for one repository failed.
    #[error("{repo}: {source}")]
    Hosting {
        repo: String,
        #[source]
        source: HostingError,
    },

    /// A report could not be serialized.
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The completion cache file could not be read or written.
    #[error("completion cache {path}: {source}")]
    CacheIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The completion cache file is not a JSON array of names.
    #[error("completion cache {path} is malformed: {source}")]
    CacheFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
