// src/store.rs

//! Persistence gateway for user progress snapshots.
//!
//! One serialized [`UserProgress`] record lives at a single file location.
//! Reads never fail loudly: missing or corrupt state is reported as "no
//! prior state" and the caller proceeds with defaults. Writes replace the
//! file atomically so a crash can never leave a half-written snapshot.

use crate::models::UserProgress;
use log::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("progress I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("progress serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Where progress snapshots live. Implementations decide the backend; the
/// ledger only ever loads once and saves after each mutation.
pub trait ProgressStore {
    /// Loads the persisted snapshot, or `None` when there is no usable
    /// prior state. Never propagates read errors.
    fn load(&self) -> Option<UserProgress>;

    /// Replaces the persisted snapshot with `progress` as a single unit.
    fn save(&mut self, progress: &UserProgress) -> Result<(), StoreError>;
}

// --- File-backed store ---

/// JSON file store with atomic replace-on-write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for FileStore {
    fn load(&self) -> Option<UserProgress> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("No saved progress at {}", self.path.display());
                return None;
            }
            Err(err) => {
                warn!(
                    "Failed to read progress file {}: {}",
                    self.path.display(),
                    err
                );
                return None;
            }
        };

        match serde_json::from_slice(&data) {
            Ok(progress) => Some(progress),
            Err(err) => {
                warn!(
                    "Corrupt progress file {}: {}; starting fresh",
                    self.path.display(),
                    err
                );
                None
            }
        }
    }

    fn save(&mut self, progress: &UserProgress) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_vec_pretty(progress)?;
        // Write beside the target so the rename stays on one filesystem.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &data)?;
        fs::rename(&tmp, &self.path)?;
        debug!(
            "Progress saved to {} ({} bytes)",
            self.path.display(),
            data.len()
        );
        Ok(())
    }
}

// --- In-memory store ---

/// Store backed by memory, for tests and ephemeral use.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    snapshot: Option<UserProgress>,
    saves: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(progress: UserProgress) -> Self {
        InMemoryStore {
            snapshot: Some(progress),
            saves: 0,
        }
    }

    /// How many times `save` has been called; lets tests assert one save
    /// per logical mutation.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    pub fn snapshot(&self) -> Option<&UserProgress> {
        self.snapshot.as_ref()
    }
}

impl ProgressStore for InMemoryStore {
    fn load(&self) -> Option<UserProgress> {
        self.snapshot.clone()
    }

    fn save(&mut self, progress: &UserProgress) -> Result<(), StoreError> {
        self.snapshot = Some(progress.clone());
        self.saves += 1;
        Ok(())
    }
}
