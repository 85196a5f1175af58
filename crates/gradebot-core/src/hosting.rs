//! Hosting platform collaborator.

use async_trait::async_trait;

use crate::errors::HostingError;
use crate::signals::RepositoryMetadata;

/// A file read from a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Decoded file contents.
    pub text: String,
    /// Blob sha, required to update the file.
    pub sha: String,
}

/// A commit that writes a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWrite {
    pub path: String,
    pub content: String,
    pub message: String,
    pub branch: String,
}

/// Repository discovery, reads, and single-file commits on the hosting platform.
#[async_trait]
pub trait HostingPlatform: Send + Sync {
    /// Every repository in `org`, all pages.
    async fn list_repositories(&self, org: &str) -> Result<Vec<RepositoryMetadata>, HostingError>;

    /// One repository, in the same shape as [`list_repositories`](Self::list_repositories).
    async fn get_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<RepositoryMetadata, HostingError>;

    /// Read `path` at `git_ref`. Missing files are [`HostingError::NotFound`].
    async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<RemoteFile, HostingError>;

    /// Commit a new file.
    async fn create_file(
        &self,
        owner: &str,
        repo: &str,
        write: &FileWrite,
    ) -> Result<(), HostingError>;

    /// Overwrite an existing file whose current blob sha is `sha`.
    ///
    /// A stale `sha` is reported as [`HostingError::Conflict`].
    async fn update_file(
        &self,
        owner: &str,
        repo: &str,
        write: &FileWrite,
        sha: &str,
    ) -> Result<(), HostingError>;
}
