//! Local snapshot of the account's collections.
//!
//! Written after every successful fetch so the tool still works when the API
//! is unreachable. The file looks like:
//!
//! ```json
//! {
//!   "user_id": "UWlQXVVZ",
//!   "collections": [ ...raw API records... ],
//!   "synced_at": "2025-11-07T15:24:09.123456+00:00"
//! }
//! ```
//!
//! Missing or corrupt files load as "no state". Writes go through a temp file
//! in the same directory and are renamed over the target.

use fs_err as fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalState {
    pub user_id: String,
    #[serde(default)]
    pub collections: Vec<Value>,
    pub synced_at: DateTime<Utc>,
    /// Keys we don't own; kept as-is on rewrite.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LocalState {
    pub fn new(user_id: &str, collections: Vec<Value>) -> Self {
        LocalState {
            user_id: user_id.to_owned(),
            collections,
            synced_at: Utc::now(),
            extra: Map::new(),
        }
    }
}

/// Where the snapshot lives. Read at most once and written at most once per run.
pub trait StateStore {
    fn load(&self) -> Option<LocalState>;
    fn save(&mut self, state: &LocalState) -> Result<()>;
}

pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStateStore { path: path.into() }
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Option<LocalState> {
        if !self.path.is_file() {
            return None;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                tracing::info!(error = %e, "could not read state file, ignoring it");
                return None;
            }
        };

        if content.trim().is_empty() {
            return None;
        }

        match serde_json::from_str::<LocalState>(&content) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::info!(
                    path = %self.path.display(),
                    error = %e,
                    "state file is corrupt, treating as empty"
                );
                None
            }
        }
    }

    fn save(&mut self, state: &LocalState) -> Result<()> {
        let content = serde_json::to_string_pretty(state).context("failed to serialize state")?;

        let parent_dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut temp_file = NamedTempFile::new_in(parent_dir)
            .with_context(|| format!("failed to create temp file in {}", parent_dir.display()))?;
        temp_file
            .write_all(content.as_bytes())
            .context("failed to write temp state file")?;
        temp_file.flush().context("failed to flush temp state file")?;
        temp_file
            .persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("failed to write {}", self.path.display()))?;

        Ok(())
    }
}

/// In-memory stand-in for tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStateStore {
    pub state: Option<LocalState>,
    pub saves: usize,
}

#[cfg(test)]
impl StateStore for MemoryStateStore {
    fn load(&self) -> Option<LocalState> {
        self.state.clone()
    }

    fn save(&mut self, state: &LocalState) -> Result<()> {
        self.state = Some(state.clone());
        self.saves += 1;
        Ok(())
    }
}
