#![deny(warnings)]

//! File-backed collaborators for Corporate Chaos: save slots, the high-score
//! table, run history, the YAML config file and compact binary snapshots.
//!
//! Everything lives under one data directory. JSON is written through a
//! temporary file and renamed into place so a crash never leaves a torn file.

pub mod config;
pub mod runs;
pub mod saves;
pub mod scores;
pub mod snapshot;

pub use config::{load_or_init_config, store_config};
pub use runs::{RunArchive, MAX_RUN_HISTORY};
pub use saves::{SaveEntry, SaveStore};
pub use scores::{HighScoreData, HighScoreTable};
pub use snapshot::{decode_snapshot, encode_snapshot, read_snapshot, write_snapshot, SNAPSHOT_VERSION};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] Box<bincode::ErrorKind>),
    #[error("snapshot version {found} is not supported (expected {expected})")]
    SnapshotVersion { found: u32, expected: u32 },
    #[error("not found: {0}")]
    NotFound(String),
}

/// Write `bytes` to `path` via a sibling temp file and an atomic rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let temp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    fs::rename(&temp_path, path)?;
    debug!(bytes = bytes.len(), path = %path.display(), "file written");
    Ok(())
}

pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let json = serde_json::to_vec_pretty(value)?;
    write_atomic(path, &json)
}

/// Read JSON from `path`; `None` when the file does not exist.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistenceError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// File names handed in by callers must not escape their directory.
pub(crate) fn plain_file_name(name: &str) -> Result<&str, PersistenceError> {
    let ok = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(|c: char| matches!(c, '/' | '\\' | '\0'));
    if ok {
        Ok(name)
    } else {
        Err(PersistenceError::NotFound(name.to_string()))
    }
}
