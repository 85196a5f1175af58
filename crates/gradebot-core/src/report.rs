//! The `report.json` document committed into each graded repository.

use serde::{Deserialize, Serialize};

/// Grading report as stored in the repository.
///
/// Field names match the reports already committed by earlier gradebot
/// versions, so an unchanged result compares equal and is not rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Report {
    pub grade: f64,
    pub repo: String,
    pub branch_exists: bool,
    pub pull_request_exists: bool,
    pub license_exists: bool,
    pub gitignore_exists: bool,
    pub readme_exists: bool,
    pub email_exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "SHA1", default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
}

impl Report {
    /// Pretty-print with four-space indentation.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        // serde_json only ever emits valid UTF-8.
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Whether `stored` (the current file contents) holds exactly this report.
    ///
    /// Unparseable or differently-shaped content, including extra keys, never
    /// matches, which makes the caller overwrite it.
    #[must_use]
    pub fn matches_stored(&self, stored: &str) -> bool {
        serde_json::from_str::<Self>(stored).is_ok_and(|existing| existing == *self)
    }
}
