//! Repository facts and the draft they are built from.
//!
//! Facts are accumulated in a [`FactsDraft`] while signals are extracted and
//! only become a [`RepositoryFacts`] once a grade has been decided. The
//! finalized value is read-only.

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::report::Report;

/// The email a student submitted, together with its tracker key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    /// Email with surrounding whitespace removed.
    pub email: String,
    /// Lowercase hex SHA-1 of `email`, the key gitexercises indexes committers by.
    pub hash: String,
}

impl Identifier {
    /// Build an identifier from the raw contents of the submitted email file.
    #[must_use]
    pub fn from_file_text(text: &str) -> Self {
        let email = text.trim().to_string();
        let hash = hex::encode(Sha1::digest(email.as_bytes()));
        Self { email, hash }
    }
}

/// Mutable accumulator for facts about one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactsDraft {
    pub name: String,
    pub branch_exists: bool,
    pub pull_request_exists: bool,
    pub license_exists: bool,
    pub gitignore_exists: bool,
    pub readme_exists: bool,
    pub identifier: Option<Identifier>,
}

impl FactsDraft {
    /// Empty draft for `name`; every signal starts out `false`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// All four structural checks that gate a non-zero grade.
    #[must_use]
    pub const fn prerequisites_met(&self) -> bool {
        self.gitignore_exists && self.pull_request_exists && self.license_exists && self.readme_exists
    }

    /// Finalize with a grade obtained from the tracker.
    ///
    /// The grade is forced to zero when the prerequisites are not met or no
    /// identifier was submitted, so a finalized value can never carry a grade
    /// it was not entitled to.
    #[must_use]
    pub fn finalize(self, grade: f64) -> RepositoryFacts {
        let grade = if self.prerequisites_met() && self.identifier.is_some() {
            grade
        } else {
            0.0
        };
        RepositoryFacts { draft: self, grade }
    }

    /// Finalize with a zero grade without consulting the tracker.
    #[must_use]
    pub fn finalize_zero(self) -> RepositoryFacts {
        RepositoryFacts {
            draft: self,
            grade: 0.0,
        }
    }
}

/// Finalized, read-only facts about one repository.
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryFacts {
    draft: FactsDraft,
    grade: f64,
}

impl RepositoryFacts {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.draft.name
    }

    #[must_use]
    pub const fn grade(&self) -> f64 {
        self.grade
    }

    #[must_use]
    pub const fn branch_exists(&self) -> bool {
        self.draft.branch_exists
    }

    #[must_use]
    pub const fn pull_request_exists(&self) -> bool {
        self.draft.pull_request_exists
    }

    #[must_use]
    pub const fn license_exists(&self) -> bool {
        self.draft.license_exists
    }

    #[must_use]
    pub const fn gitignore_exists(&self) -> bool {
        self.draft.gitignore_exists
    }

    #[must_use]
    pub const fn readme_exists(&self) -> bool {
        self.draft.readme_exists
    }

    #[must_use]
    pub const fn identifier(&self) -> Option<&Identifier> {
        self.draft.identifier.as_ref()
    }

    /// Render the facts as the `report.json` document.
    #[must_use]
    pub fn to_report(&self) -> Report {
        Report {
            grade: self.grade,
            repo: self.draft.name.clone(),
            branch_exists: self.draft.branch_exists,
            pull_request_exists: self.draft.pull_request_exists,
            license_exists: self.draft.license_exists,
            gitignore_exists: self.draft.gitignore_exists,
            readme_exists: self.draft.readme_exists,
            email_exists: self.draft.identifier.is_some(),
            email: self.draft.identifier.as_ref().map(|id| id.email.clone()),
            sha1: self.draft.identifier.as_ref().map(|id| id.hash.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn eligible_draft() -> FactsDraft {
        FactsDraft {
            name: "pro-1-git-student".into(),
            branch_exists: true,
            pull_request_exists: true,
            license_exists: true,
            gitignore_exists: true,
            readme_exists: true,
            identifier: Some(Identifier::from_file_text("student@example.com")),
        }
    }

    #[test]
    fn identifier_trims_and_hashes() {
        let id = Identifier::from_file_text(" student@example.com \n");
        assert_eq!(id.email, "student@example.com");
        assert_eq!(id.hash.len(), 40);
        assert_eq!(id, Identifier::from_file_text("student@example.com"));
    }

    #[test]
    fn identifier_hash_is_sha1_hex() {
        // sha1("abc")
        let id = Identifier::from_file_text("abc");
        assert_eq!(id.hash, "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn new_draft_has_no_signals() {
        let draft = FactsDraft::new("repo");
        assert_eq!(draft.name, "repo");
        assert!(!draft.prerequisites_met());
        assert!(draft.identifier.is_none());
    }

    #[test]
    fn finalize_keeps_grade_when_eligible() {
        let facts = eligible_draft().finalize(2.5);
        assert!((facts.grade() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn finalize_forces_zero_without_prerequisite() {
        for strip in 0..4 {
            let mut draft = eligible_draft();
            match strip {
                0 => draft.gitignore_exists = false,
                1 => draft.pull_request_exists = false,
                2 => draft.license_exists = false,
                _ => draft.readme_exists = false,
            }
            let facts = draft.finalize(7.0);
            assert!(facts.grade().abs() < f64::EPSILON, "case {strip}");
        }
    }

    #[test]
    fn finalize_forces_zero_without_identifier() {
        let mut draft = eligible_draft();
        draft.identifier = None;
        assert!(draft.finalize(4.0).grade().abs() < f64::EPSILON);
    }

    #[test]
    fn report_mirrors_facts() {
        let report = eligible_draft().finalize(3.0).to_report();
        assert_eq!(report.repo, "pro-1-git-student");
        assert!(report.email_exists);
        assert_eq!(report.email.as_deref(), Some("student@example.com"));
        assert_eq!(report.sha1.as_ref().map(String::len), Some(40));
        assert!((report.grade - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn report_without_identifier_has_no_email() {
        let report = FactsDraft::new("empty").finalize_zero().to_report();
        assert!(!report.email_exists);
        assert!(report.email.is_none());
        assert!(report.sha1.is_none());
    }
}
