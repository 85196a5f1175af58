//! Repository signal extraction.
//!
//! Turns the raw metadata a [`HostingPlatform`](crate::HostingPlatform)
//! returns for one repository into a [`FactsDraft`]. Extraction is total:
//! missing branches, files, or lookups become `false` signals, never errors.

use serde::{Deserialize, Serialize};

use crate::facts::{FactsDraft, Identifier};

/// One entry of a repository's root tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub name: String,
    /// Git object type: `blob`, `tree`, or `commit`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl TreeEntry {
    #[must_use]
    pub fn blob(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: "blob".into(),
        }
    }

    /// Uppercased name truncated before the first `.` (`Readme.txt` → `README`).
    fn stem_upper(&self) -> String {
        self.name
            .split('.')
            .next()
            .unwrap_or_default()
            .to_uppercase()
    }
}

/// Outcome of looking up the submitted identifier file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IdentifierLookup {
    /// The file exists; holds its raw text.
    Found(String),
    /// Missing file, missing directory, or a failed lookup.
    #[default]
    Absent,
}

impl IdentifierLookup {
    /// Convert an optional blob text into a lookup result.
    #[must_use]
    pub fn from_blob(text: Option<String>) -> Self {
        text.map_or(Self::Absent, Self::Found)
    }
}

/// Everything the hosting platform reports about one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryMetadata {
    pub owner: String,
    pub name: String,
    /// Default branch name, `None` for an empty repository.
    pub default_branch: Option<String>,
    /// License detected by the platform, if any.
    pub license_name: Option<String>,
    /// Whether `HEAD:.gitignore` resolved to an object.
    pub has_gitignore_blob: bool,
    pub root_entries: Vec<TreeEntry>,
    pub branches: Vec<String>,
    pub open_pull_requests: u64,
    /// Identifier file on the target branch.
    pub identifier: IdentifierLookup,
    /// Current `report.json` text on the default branch, when pre-fetched.
    pub existing_report: Option<String>,
}

/// Names and paths that define what a graded repository must contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradingRules {
    /// Branch the identifier file is read from.
    pub target_branch: String,
    /// Path of the identifier file on `target_branch`.
    pub identifier_path: String,
}

impl Default for GradingRules {
    fn default() -> Self {
        Self {
            target_branch: "task_01".into(),
            identifier_path: "task_01_git/gitexercises.email".into(),
        }
    }
}

/// Derive the grading signals for one repository.
#[must_use]
pub fn extract_facts(meta: &RepositoryMetadata, rules: &GradingRules) -> FactsDraft {
    let has_stem = |stem: &str| meta.root_entries.iter().any(|e| e.stem_upper() == stem);

    let branch_exists = meta.branches.iter().any(|b| *b == rules.target_branch);
    let identifier = match (&meta.identifier, branch_exists) {
        (IdentifierLookup::Found(text), true) => Some(Identifier::from_file_text(text)),
        _ => None,
    };

    FactsDraft {
        name: meta.name.clone(),
        branch_exists,
        pull_request_exists: meta.open_pull_requests > 0,
        license_exists: meta.license_name.is_some() || has_stem("LICENSE"),
        gitignore_exists: meta.has_gitignore_blob
            || meta.root_entries.iter().any(|e| e.name == ".gitignore"),
        readme_exists: has_stem("README"),
        identifier,
    }
}
