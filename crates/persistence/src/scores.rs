//! The persistent leaderboard.

use chaos_core::GameScore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::{read_json, write_json, PersistenceError};

/// On-disk shape of the leaderboard file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HighScoreData {
    #[serde(default)]
    pub scores: Vec<GameScore>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Top-N table of finished runs, sorted by score descending. Equal scores keep
/// the order they were added in.
#[derive(Clone, Debug)]
pub struct HighScoreTable {
    path: PathBuf,
    max_entries: usize,
    data: HighScoreData,
}

impl HighScoreTable {
    /// Load the table at `path`, or start an empty one if the file is missing.
    pub fn open<P: AsRef<Path>>(path: P, max_entries: usize) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        let mut data: HighScoreData = read_json(&path)?.unwrap_or_default();
        data.scores.sort_by(|a, b| b.score.cmp(&a.score));
        data.scores.truncate(max_entries);
        Ok(Self {
            path,
            max_entries,
            data,
        })
    }

    pub fn scores(&self) -> &[GameScore] {
        &self.data.scores
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.data.last_updated
    }

    /// Score the run, stamp it with `now`, insert it and persist the table.
    ///
    /// Returns the 1-based rank of the new entry, or `None` if it did not make
    /// the cut.
    pub fn add(
        &mut self,
        mut score: GameScore,
        now: DateTime<Utc>,
    ) -> Result<Option<usize>, PersistenceError> {
        let points = score.calculate_score();
        score.date_achieved = Some(now);
        let nickname = score.nickname.clone();
        self.data.scores.push(score);
        self.data.scores.sort_by(|a, b| b.score.cmp(&a.score));
        // Stable sort: the new entry sits after every earlier entry with the same score.
        let index = self.data.scores.iter().filter(|s| s.score >= points).count() - 1;
        self.data.scores.truncate(self.max_entries);
        self.data.last_updated = Some(now);
        write_json(&self.path, &self.data)?;

        let rank = (index < self.max_entries).then_some(index + 1);
        info!(%nickname, score = points, ?rank, "high score recorded");
        Ok(rank)
    }

    /// Whether `score` would enter the table right now.
    pub fn qualifies(&self, score: u64) -> bool {
        if self.data.scores.len() < self.max_entries {
            return true;
        }
        self.data
            .scores
            .iter()
            .map(|s| s.score)
            .min()
            .is_some_and(|lowest| score > lowest)
    }

    /// 1-based rank of the player's best score, matching nicknames case-insensitively.
    pub fn rank_of(&self, nickname: &str) -> Option<usize> {
        let wanted = nickname.to_lowercase();
        let best = self
            .data
            .scores
            .iter()
            .filter(|s| s.nickname.to_lowercase() == wanted)
            .map(|s| s.score)
            .max()?;
        Some(self.data.scores.iter().filter(|s| s.score > best).count() + 1)
    }

    pub fn top(&self, n: usize) -> &[GameScore] {
        &self.data.scores[..n.min(self.data.scores.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaos_core::EndReason;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    /// A run scoring `capital / 500`; bonus tiers stay out of reach below 1M.
    fn run(nickname: &str, capital: i64) -> GameScore {
        GameScore {
            nickname: nickname.to_string(),
            peak_capital: Decimal::from(capital),
            end_reason: EndReason::Bankruptcy,
            ..GameScore::default()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn keeps_top_n_descending() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("highscores.json");
        let mut table = HighScoreTable::open(&path, 3).unwrap();
        for (name, capital) in [("a", 100_000), ("b", 300_000), ("c", 200_000), ("d", 50_000)] {
            table.add(run(name, capital), now()).unwrap();
        }
        let names: Vec<_> = table.scores().iter().map(|s| s.nickname.as_str()).collect();
        assert_eq!(names, ["b", "c", "a"]);
        assert!(table.scores().iter().all(|s| s.date_achieved == Some(now())));

        let reopened = HighScoreTable::open(&path, 3).unwrap();
        assert_eq!(reopened.scores(), table.scores());
        assert_eq!(reopened.last_updated(), Some(now()));
    }

    #[test]
    fn ties_keep_insertion_order() {
        let dir = TempDir::new().unwrap();
        let mut table = HighScoreTable::open(dir.path().join("hs.json"), 10).unwrap();
        assert_eq!(table.add(run("first", 100_000), now()).unwrap(), Some(1));
        assert_eq!(table.add(run("second", 100_000), now()).unwrap(), Some(2));
        assert_eq!(table.add(run("top", 900_000), now()).unwrap(), Some(1));
        let names: Vec<_> = table.scores().iter().map(|s| s.nickname.as_str()).collect();
        assert_eq!(names, ["top", "first", "second"]);
    }

    #[test]
    fn entry_that_misses_the_cut_has_no_rank() {
        let dir = TempDir::new().unwrap();
        let mut table = HighScoreTable::open(dir.path().join("hs.json"), 1).unwrap();
        table.add(run("champ", 500_000), now()).unwrap();
        assert_eq!(table.add(run("late", 500_000), now()).unwrap(), None);
        assert_eq!(table.scores().len(), 1);
        assert_eq!(table.scores()[0].nickname, "champ");
    }

    #[test]
    fn qualification_rules() {
        let dir = TempDir::new().unwrap();
        let mut table = HighScoreTable::open(dir.path().join("hs.json"), 2).unwrap();
        assert!(table.qualifies(0));
        table.add(run("a", 100_000), now()).unwrap();
        assert!(table.qualifies(0));
        table.add(run("b", 200_000), now()).unwrap();
        assert!(!table.qualifies(200));
        assert!(table.qualifies(201));
    }

    #[test]
    fn rank_uses_best_score_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let mut table = HighScoreTable::open(dir.path().join("hs.json"), 10).unwrap();
        table.add(run("Zed", 900_000), now()).unwrap();
        table.add(run("ada", 100_000), now()).unwrap();
        table.add(run("ADA", 400_000), now()).unwrap();
        assert_eq!(table.rank_of("Ada"), Some(2));
        assert_eq!(table.rank_of("zed"), Some(1));
        assert_eq!(table.rank_of("nobody"), None);
        assert_eq!(table.top(2).len(), 2);
        assert_eq!(table.top(50).len(), 3);
    }

    proptest! {
        #[test]
        fn table_stays_sorted_and_bounded(
            capitals in prop::collection::vec(0i64..900_000, 1..30),
            max in 1usize..12,
        ) {
            let dir = TempDir::new().unwrap();
            let mut table = HighScoreTable::open(dir.path().join("hs.json"), max).unwrap();
            for (i, capital) in capitals.iter().enumerate() {
                table.add(run(&format!("p{i}"), *capital), now()).unwrap();
            }
            prop_assert!(table.scores().len() <= max);
            prop_assert!(table.scores().windows(2).all(|w| w[0].score >= w[1].score));
        }
    }
}
