//! Named save slots stored as pretty JSON.

use chaos_core::GameSave;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::{plain_file_name, read_json, write_json, PersistenceError};

/// A save file on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveEntry {
    pub file_name: String,
    pub modified: DateTime<Utc>,
}

/// Save directory handle.
#[derive(Clone, Debug)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the save as `{save_name}_{YYYYMMDD_HHMMSS}.json`; returns the file name.
    pub fn save(&self, save: &GameSave) -> Result<String, PersistenceError> {
        let file_name = save.file_name();
        let path = self.dir.join(plain_file_name(&file_name)?);
        write_json(&path, save)?;
        info!(file = %file_name, quarter = save.current_quarter, "game saved");
        Ok(file_name)
    }

    /// Save files, most recently modified first.
    pub fn list(&self) -> Result<Vec<SaveEntry>, PersistenceError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut saves = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let modified = entry.metadata()?.modified()?;
            saves.push(SaveEntry {
                file_name: file_name.to_string(),
                modified: DateTime::<Utc>::from(modified),
            });
        }
        saves.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| b.file_name.cmp(&a.file_name))
        });
        Ok(saves)
    }

    pub fn load(&self, file_name: &str) -> Result<GameSave, PersistenceError> {
        let path = self.dir.join(plain_file_name(file_name)?);
        read_json(&path)?.ok_or_else(|| PersistenceError::NotFound(file_name.to_string()))
    }

    /// Remove a save; `Ok(false)` when it did not exist.
    pub fn delete(&self, file_name: &str) -> Result<bool, PersistenceError> {
        let path = self.dir.join(plain_file_name(file_name)?);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(file = %file_name, "save deleted");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chaos_core::{Company, DepartmentRegistry, Employee, GameScore};
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;
    use uuid::Uuid;

    pub(crate) fn sample_save(name: &str, hour: u32) -> GameSave {
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let mut departments = DepartmentRegistry::new();
        departments.assign(
            Employee::generate_random(1, &mut rng),
            chaos_core::Department::Research,
        );
        let mut company = Company::default();
        company.employee_count = 1;
        GameSave {
            save_name: name.to_string(),
            player_nickname: "Ada".to_string(),
            save_date: Utc.with_ymd_and_hms(2024, 5, 1, hour, 30, 0).unwrap(),
            current_quarter: 3,
            company,
            departments,
            available_employees: vec![Employee::generate_random(2, &mut rng)],
            game_events: vec!["Quarter 3 begins!".to_string()],
            quarterly_reports: Vec::new(),
            candidates: Vec::new(),
            active_crises: Vec::new(),
            quarters_since_last_major_event: 2,
            score: GameScore::default(),
            run_id: Uuid::nil(),
            run_started: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            rng: Some(rng),
        }
    }

    #[test]
    fn save_then_load_is_lossless() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path().join("sv_game"));
        let save = sample_save("alpha", 10);
        let file = store.save(&save).unwrap();
        assert_eq!(file, "alpha_20240501_103000.json");
        assert_eq!(store.load(&file).unwrap(), save);
    }

    #[test]
    fn list_is_newest_first() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path());
        let older = store.save(&sample_save("older", 8)).unwrap();
        let newer = store.save(&sample_save("newer", 9)).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let now = SystemTime::now();
        let stamp = |name: &str, at: SystemTime| {
            let file = fs::File::options().write(true).open(dir.path().join(name)).unwrap();
            file.set_modified(at).unwrap();
        };
        stamp(&older, now - Duration::from_secs(3600));
        stamp(&newer, now);

        let names: Vec<_> = store.list().unwrap().into_iter().map(|e| e.file_name).collect();
        assert_eq!(names, vec![newer, older]);
    }

    #[test]
    fn missing_directory_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path().join("never-created"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn delete_and_missing_load() {
        let dir = TempDir::new().unwrap();
        let store = SaveStore::new(dir.path());
        let file = store.save(&sample_save("gone", 11)).unwrap();
        assert!(store.delete(&file).unwrap());
        assert!(!store.delete(&file).unwrap());
        assert!(matches!(store.load(&file), Err(PersistenceError::NotFound(_))));
        assert!(matches!(store.load("../escape.json"), Err(PersistenceError::NotFound(_))));
    }
}
