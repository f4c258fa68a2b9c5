use crate::models::{JobPosting, ScoredMatch};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when persisting history
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Urls of postings already presented in earlier runs
///
/// Stored as a JSON array of strings. The store never decides what gets
/// recorded; callers record the urls they actually presented.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    seen: HashSet<String>,
}

impl HistoryStore {
    /// Open the history file, starting empty if it is missing or unreadable
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let seen = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Vec<String>>(&bytes) {
                Ok(urls) => urls.into_iter().collect(),
                Err(e) => {
                    tracing::warn!("Ignoring corrupt history file {}: {}", path.display(), e);
                    HashSet::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No history file at {}, starting fresh", path.display());
                HashSet::new()
            }
            Err(e) => {
                tracing::warn!("Could not read history file {}: {}", path.display(), e);
                HashSet::new()
            }
        };

        tracing::debug!("Loaded {} seen urls from {}", seen.len(), path.display());
        Self { path, seen }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// Drop postings whose url has been presented before
    pub fn filter_unseen(&self, postings: Vec<JobPosting>) -> Vec<JobPosting> {
        postings
            .into_iter()
            .filter(|job| !self.seen.contains(&job.url))
            .collect()
    }

    /// Mark matches as presented, returning how many were new
    pub fn record<'a, I>(&mut self, matches: I) -> usize
    where
        I: IntoIterator<Item = &'a ScoredMatch>,
    {
        matches
            .into_iter()
            .filter(|m| self.seen.insert(m.url.clone()))
            .count()
    }

    /// Write the history back to disk, sorted for stable diffs
    pub fn save(&self) -> Result<(), HistoryError> {
        let sorted: BTreeSet<&String> = self.seen.iter().collect();
        let json = serde_json::to_vec_pretty(&sorted)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        // Write then rename so a crash never leaves a truncated file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| self.io_error(source))?;
        fs::rename(&tmp, &self.path).map_err(|source| self.io_error(source))?;

        tracing::debug!("Saved {} seen urls to {}", self.seen.len(), self.path.display());
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> HistoryError {
        HistoryError::Io { path: self.path.clone(), source }
    }
}
