//! Completion cache.
//!
//! A flat, sorted JSON array of repository names whose last computed grade
//! was the maximum. Repositories listed here are not re-evaluated by batch
//! runs. Deleting the file only makes the next run slower.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::PipelineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCache {
    path: PathBuf,
    names: BTreeSet<String>,
}

impl CompletionCache {
    /// Read the cache at `path`; a missing file is an empty cache.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::CacheIo`] if the file exists but cannot be
    /// read, or [`PipelineError::CacheFormat`] if it is not a JSON array of
    /// strings.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let path = path.into();
        let names = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str::<Vec<String>>(&text)
                .map_err(|source| PipelineError::CacheFormat {
                    path: path.clone(),
                    source,
                })?
                .into_iter()
                .collect(),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => BTreeSet::new(),
            Err(source) => return Err(PipelineError::CacheIo { path, source }),
        };
        tracing::debug!(path = %path.display(), entries = names.len(), "loaded completion cache");
        Ok(Self { path, names })
    }

    /// Write the cache back to the file it was loaded from.
    ///
    /// The file is replaced atomically through a sibling temporary file.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::CacheIo`] if the file cannot be written.
    pub fn save(&self) -> Result<(), PipelineError> {
        let io_error = |source| PipelineError::CacheIo {
            path: self.path.clone(),
            source,
        };

        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.names.serialize(&mut serializer)?;

        let staging = self.path.with_extension("json.tmp");
        std::fs::write(&staging, &out).map_err(io_error)?;
        std::fs::rename(&staging, &self.path).map_err(io_error)?;
        tracing::debug!(path = %self.path.display(), entries = self.names.len(), "saved completion cache");
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn contains(&self, repo: &str) -> bool {
        self.names.contains(repo)
    }

    /// Record `repo` as fully graded. Returns `false` if it already was.
    pub fn insert(&mut self, repo: impl Into<String>) -> bool {
        self.names.insert(repo.into())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
