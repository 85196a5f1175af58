//! In-memory hosting platform and tracker used by the pipeline tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use gradebot_core::{
    ExerciseTracker, FileWrite, HostingError, HostingPlatform, Identifier, IdentifierLookup,
    RemoteFile, RepositoryMetadata, TrackerError, TreeEntry,
};

pub const ORG: &str = "classroom";

pub const ALL_EXERCISES: &[&str] = &[
    "commit-one-file",
    "commit-one-file-staged",
    "ignore-them",
    "chase-branch",
    "merge-conflict",
    "save-your-work",
    "change-branch-history",
    "remove-ignored",
    "case-sensitive-filename",
    "fix-typo",
    "forge-date",
];

/// A repository that satisfies every prerequisite and submitted `email`.
pub fn eligible_repo(name: &str, email: &str) -> RepositoryMetadata {
    RepositoryMetadata {
        owner: ORG.into(),
        name: name.into(),
        default_branch: Some("main".into()),
        license_name: None,
        has_gitignore_blob: false,
        root_entries: vec![
            TreeEntry::blob(".gitignore"),
            TreeEntry::blob("LICENSE.md"),
            TreeEntry::blob("Readme.txt"),
        ],
        branches: vec!["main".into(), "task_01".into()],
        open_pull_requests: 1,
        identifier: IdentifierLookup::Found(format!(" {email} \n")),
        existing_report: None,
    }
}

pub fn hash_of(email: &str) -> String {
    Identifier::from_file_text(email).hash
}

#[derive(Default)]
pub struct FakeHosting {
    repos: Vec<RepositoryMetadata>,
    files: Mutex<HashMap<String, RemoteFile>>,
    next_sha: AtomicUsize,
    last_branch: Mutex<Option<String>>,
    pub creates: AtomicUsize,
    pub updates: AtomicUsize,
    pub fail_listing: bool,
    /// Repositories whose report updates are rejected as stale.
    pub conflicting: Vec<String>,
}

impl FakeHosting {
    pub fn new(repos: Vec<RepositoryMetadata>) -> Self {
        Self {
            repos,
            ..Self::default()
        }
    }

    pub fn with_report(self, repo: &str, text: &str) -> Self {
        self.files.lock().unwrap().insert(
            repo.to_string(),
            RemoteFile {
                text: text.to_string(),
                sha: format!("seed-{repo}"),
            },
        );
        self
    }

    pub fn writes(&self) -> usize {
        self.creates.load(Ordering::SeqCst) + self.updates.load(Ordering::SeqCst)
    }

    pub fn report_of(&self, repo: &str) -> Option<serde_json::Value> {
        self.files
            .lock()
            .unwrap()
            .get(repo)
            .map(|f| serde_json::from_str(&f.text).unwrap())
    }

    /// Branch the most recent write was committed to.
    pub fn last_branch(&self) -> Option<String> {
        self.last_branch.lock().unwrap().clone()
    }

    fn snapshot(&self, meta: &RepositoryMetadata) -> RepositoryMetadata {
        let mut meta = meta.clone();
        meta.existing_report = self
            .files
            .lock()
            .unwrap()
            .get(&meta.name)
            .map(|f| f.text.clone());
        meta
    }

    fn store(&self, repo: &str, write: &FileWrite) {
        let n = self.next_sha.fetch_add(1, Ordering::SeqCst);
        *self.last_branch.lock().unwrap() = Some(write.branch.clone());
        self.files.lock().unwrap().insert(
            repo.to_string(),
            RemoteFile {
                text: write.content.clone(),
                sha: format!("sha-{n}"),
            },
        );
    }
}

#[async_trait]
impl HostingPlatform for FakeHosting {
    async fn list_repositories(&self, org: &str) -> Result<Vec<RepositoryMetadata>, HostingError> {
        if self.fail_listing {
            return Err(HostingError::Api {
                status: 502,
                message: "bad gateway".into(),
            });
        }
        if org != ORG {
            return Err(HostingError::NotFound(format!("organization {org}")));
        }
        Ok(self.repos.iter().map(|m| self.snapshot(m)).collect())
    }

    async fn get_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<RepositoryMetadata, HostingError> {
        self.repos
            .iter()
            .find(|m| m.owner == owner && m.name == name)
            .map(|m| self.snapshot(m))
            .ok_or_else(|| HostingError::NotFound(format!("{owner}/{name}")))
    }

    async fn get_file(
        &self,
        _owner: &str,
        repo: &str,
        path: &str,
        _git_ref: &str,
    ) -> Result<RemoteFile, HostingError> {
        assert_eq!(path, "report.json");
        self.files
            .lock()
            .unwrap()
            .get(repo)
            .cloned()
            .ok_or_else(|| HostingError::NotFound(path.to_string()))
    }

    async fn create_file(
        &self,
        _owner: &str,
        repo: &str,
        write: &FileWrite,
    ) -> Result<(), HostingError> {
        assert_eq!(write.message, "GRADE BOT: Create report");
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.store(repo, write);
        Ok(())
    }

    async fn update_file(
        &self,
        _owner: &str,
        repo: &str,
        write: &FileWrite,
        sha: &str,
    ) -> Result<(), HostingError> {
        assert_eq!(write.message, "GRADE BOT: Update report");
        let current = self.files.lock().unwrap().get(repo).map(|f| f.sha.clone());
        if self.conflicting.iter().any(|r| r == repo) || current.as_deref() != Some(sha) {
            return Err(HostingError::Conflict(format!("{repo}: stale sha {sha}")));
        }
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.store(repo, write);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeTracker {
    /// Passed exercises by identifier hash; unknown hashes pass nothing.
    passed: HashMap<String, Vec<String>>,
    /// Hashes whose response is a malformed single-line body.
    malformed: Vec<String>,
    delay: Duration,
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn passing(mut self, email: &str, exercises: &[&str]) -> Self {
        self.passed.insert(
            hash_of(email),
            exercises.iter().map(ToString::to_string).collect(),
        );
        self
    }

    pub fn malformed_for(mut self, email: &str) -> Self {
        self.malformed.push(hash_of(email));
        self
    }

    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExerciseTracker for FakeTracker {
    async fn fetch_passed_exercises(
        &self,
        identifier_hash: &str,
    ) -> Result<Vec<String>, TrackerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.malformed.iter().any(|h| h == identifier_hash) {
            return Err(TrackerError::Protocol("expected at least 2 lines, got 1".into()));
        }
        Ok(self
            .passed
            .get(identifier_hash)
            .cloned()
            .unwrap_or_default())
    }
}
