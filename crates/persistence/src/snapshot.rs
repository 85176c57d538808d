//! Compact binary snapshots of a [`GameSave`] for autosave.

use chaos_core::GameSave;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::{write_atomic, PersistenceError};

/// Bumped whenever the snapshot layout changes.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    save: &'a GameSave,
}

#[derive(Deserialize)]
struct Snapshot {
    #[allow(dead_code)]
    version: u32,
    save: GameSave,
}

/// Versioned bincode encoding of a save.
pub fn encode_snapshot(save: &GameSave) -> Result<Vec<u8>, PersistenceError> {
    let bytes = bincode::serialize(&SnapshotRef {
        version: SNAPSHOT_VERSION,
        save,
    })?;
    debug!(bytes = bytes.len(), quarter = save.current_quarter, "snapshot encoded");
    Ok(bytes)
}

pub fn decode_snapshot(bytes: &[u8]) -> Result<GameSave, PersistenceError> {
    let version: u32 = bincode::deserialize(bytes)?;
    if version != SNAPSHOT_VERSION {
        return Err(PersistenceError::SnapshotVersion {
            found: version,
            expected: SNAPSHOT_VERSION,
        });
    }
    let snapshot: Snapshot = bincode::deserialize(bytes)?;
    Ok(snapshot.save)
}

/// Encode and atomically write a snapshot to `path`.
pub fn write_snapshot(path: &Path, save: &GameSave) -> Result<(), PersistenceError> {
    write_atomic(path, &encode_snapshot(save)?)
}

pub fn read_snapshot(path: &Path) -> Result<GameSave, PersistenceError> {
    match std::fs::read(path) {
        Ok(bytes) => decode_snapshot(&bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(PersistenceError::NotFound(path.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::saves::tests::sample_save;
    use tempfile::TempDir;

    #[test]
    fn snapshot_is_lossless() {
        let save = sample_save("auto", 14);
        let bytes = encode_snapshot(&save).unwrap();
        assert_eq!(decode_snapshot(&bytes).unwrap(), save);
    }

    #[test]
    fn wrong_version_is_rejected() {
        let mut bytes = encode_snapshot(&sample_save("auto", 14)).unwrap();
        bytes[..4].copy_from_slice(&7u32.to_le_bytes());
        assert!(matches!(
            decode_snapshot(&bytes),
            Err(PersistenceError::SnapshotVersion { found: 7, expected: 1 })
        ));
    }

    #[test]
    fn truncated_bytes_fail_to_decode() {
        let bytes = encode_snapshot(&sample_save("auto", 14)).unwrap();
        assert!(matches!(
            decode_snapshot(&bytes[..bytes.len() / 2]),
            Err(PersistenceError::Snapshot(_))
        ));
    }

    #[test]
    fn snapshot_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("autosave.bin");
        let save = sample_save("auto", 15);
        write_snapshot(&path, &save).unwrap();
        assert_eq!(read_snapshot(&path).unwrap(), save);
        assert!(matches!(
            read_snapshot(&dir.path().join("none.bin")),
            Err(PersistenceError::NotFound(_))
        ));
    }
}
