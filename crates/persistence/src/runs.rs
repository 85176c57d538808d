//! Archive of finished runs: one file per run plus a capped history list.

use chaos_core::GameRunRecord;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use crate::{read_json, write_json, PersistenceError};

/// Runs kept in the history file.
pub const MAX_RUN_HISTORY: usize = 50;

#[derive(Clone, Debug)]
pub struct RunArchive {
    runs_dir: PathBuf,
    history_path: PathBuf,
}

impl RunArchive {
    /// Archive rooted at `root`: `root/game_runs/run_{id}.json` and
    /// `root/runs_history.json`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            runs_dir: root.join("game_runs"),
            history_path: root.join("runs_history.json"),
        }
    }

    fn run_path(&self, run_id: Uuid) -> PathBuf {
        self.runs_dir.join(format!("run_{run_id}.json"))
    }

    /// Write the run file and fold the run into the history.
    pub fn record(&self, run: &GameRunRecord) -> Result<(), PersistenceError> {
        write_json(&self.run_path(run.run_id), run)?;

        let mut history = self.history()?;
        history.retain(|r| r.run_id != run.run_id);
        history.push(run.clone());
        history.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        history.truncate(MAX_RUN_HISTORY);
        write_json(&self.history_path, &history)?;

        info!(run_id = %run.run_id, score = run.final_score, "run archived");
        Ok(())
    }

    /// Archived runs, most recently started first.
    pub fn history(&self) -> Result<Vec<GameRunRecord>, PersistenceError> {
        Ok(read_json(&self.history_path)?.unwrap_or_default())
    }

    pub fn load(&self, run_id: Uuid) -> Result<GameRunRecord, PersistenceError> {
        read_json(&self.run_path(run_id))?
            .ok_or_else(|| PersistenceError::NotFound(format!("run {run_id}")))
    }
}
