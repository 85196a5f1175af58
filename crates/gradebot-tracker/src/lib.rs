//! # gradebot-tracker
//!
//! HTTP client for the gitexercises committer API.
//!
//! `GET {base_url}/api/committer/{sha1}` answers with a line-oriented body
//! whose second line is a JSON object listing the committer's passed
//! exercises. Anything else is reported as [`TrackerError::Protocol`].

use std::time::Duration;

use async_trait::async_trait;
use gradebot_core::{ExerciseTracker, TrackerError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitterData {
    passed_exercises: Vec<String>,
}

/// gitexercises API client.
#[derive(Debug, Clone)]
pub struct GitExercisesClient {
    http: reqwest::Client,
    base_url: String,
}

impl GitExercisesClient {
    /// Create a client for `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Transport`] if the HTTP client cannot be built
    /// (for example when no TLS backend is available).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TrackerError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gradebot/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| TrackerError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn committer_url(&self, identifier_hash: &str) -> String {
        format!(
            "{}/api/committer/{}",
            self.base_url,
            urlencoding::encode(identifier_hash)
        )
    }
}

#[async_trait]
impl ExerciseTracker for GitExercisesClient {
    async fn fetch_passed_exercises(
        &self,
        identifier_hash: &str,
    ) -> Result<Vec<String>, TrackerError> {
        let url = self.committer_url(identifier_hash);
        tracing::debug!(%url, "querying gitexercises");
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| TrackerError::Transport(e.to_string()))?;
        parse_committer_body(&committer_body(resp).await?)
    }
}

/// Read a committer response, rejecting anything but a 2xx.
///
/// gitexercises has no error envelope; the raw body (often an HTML page)
/// becomes the message.
async fn committer_body(resp: reqwest::Response) -> Result<String, TrackerError> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| TrackerError::Transport(e.to_string()))?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(TrackerError::Api {
            status: status.as_u16(),
            message: body.trim().to_string(),
        })
    }
}

/// Extract `passedExercises` from the second line of a committer response.
///
/// # Errors
///
/// Returns [`TrackerError::Protocol`] if the body has fewer than two lines or
/// the second line is not the expected JSON object.
pub fn parse_committer_body(body: &str) -> Result<Vec<String>, TrackerError> {
    let line = body.lines().nth(1).ok_or_else(|| {
        TrackerError::Protocol(format!(
            "expected at least 2 lines, got {}",
            body.lines().count()
        ))
    })?;
    let data: CommitterData = serde_json::from_str(line)
        .map_err(|e| TrackerError::Protocol(format!("second line is not committer JSON: {e}")))?;
    Ok(data.passed_exercises)
}
