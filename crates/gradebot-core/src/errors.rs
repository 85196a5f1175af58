//! Collaborator error types.
//!
//! These are defined here rather than in the client crates so the pipeline can
//! branch on them (not-found routes to "create", conflicts are reported) without
//! depending on any particular HTTP stack.

use thiserror::Error;

/// Errors returned by a [`HostingPlatform`](crate::HostingPlatform).
#[derive(Debug, Error)]
pub enum HostingError {
    /// The requested repository, file, or ref does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A write was rejected because the supplied content sha is stale.
    #[error("write conflict: {0}")]
    Conflict(String),

    /// The platform answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The platform is throttling us.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Network or TLS failure below the API layer.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

impl HostingError {
    /// `true` for [`HostingError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Errors returned by an [`ExerciseTracker`](crate::ExerciseTracker).
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Network or TLS failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The tracker answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The body did not have the expected line-oriented JSON shape.
    #[error("protocol error: {0}")]
    Protocol(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_distinguishable() {
        assert!(HostingError::NotFound("report.json".into()).is_not_found());
        assert!(!HostingError::Conflict("stale sha".into()).is_not_found());
        assert!(
            !HostingError::Api {
                status: 500,
                message: String::new()
            }
            .is_not_found()
        );
    }

    #[test]
    fn display_includes_status() {
        let err = TrackerError::Api {
            status: 502,
            message: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "API error (502): bad gateway");
    }
}
