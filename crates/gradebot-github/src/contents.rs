//! REST contents API payloads.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use gradebot_core::{FileWrite, HostingError, RemoteFile};
use serde::{Deserialize, Serialize};

/// `GET /repos/{owner}/{repo}/contents/{path}` for a single file.
#[derive(Debug, Deserialize)]
pub struct ContentFile {
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

impl ContentFile {
    /// Decode the base64 payload GitHub wraps at 60 columns.
    pub fn into_remote_file(self, path: &str) -> Result<RemoteFile, HostingError> {
        if self.encoding != "base64" {
            return Err(HostingError::Parse(format!(
                "{path}: unsupported content encoding '{}'",
                self.encoding
            )));
        }
        let compact: String = self.content.split_whitespace().collect();
        let bytes = STANDARD
            .decode(compact)
            .map_err(|e| HostingError::Parse(format!("{path}: invalid base64: {e}")))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| HostingError::Parse(format!("{path}: not UTF-8: {e}")))?;
        Ok(RemoteFile {
            text,
            sha: self.sha,
        })
    }
}

/// `PUT /repos/{owner}/{repo}/contents/{path}` body.
#[derive(Debug, Serialize)]
pub struct PutContents<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

impl<'a> PutContents<'a> {
    /// Body for a create (`sha = None`) or update.
    pub fn new(write: &'a FileWrite, sha: Option<&'a str>) -> Self {
        Self {
            message: &write.message,
            content: STANDARD.encode(write.content.as_bytes()),
            branch: &write.branch,
            sha,
        }
    }
}

/// Response of `GET /user`.
#[derive(Debug, Deserialize)]
pub struct AuthenticatedUser {
    pub login: String,
}
