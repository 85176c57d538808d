//! YAML game configuration file.

use chaos_core::GameConfig;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::{write_atomic, PersistenceError};

/// Read the config at `path`. A missing file yields the defaults, which are
/// written back so the player has a file to edit.
pub fn load_or_init_config(path: &Path) -> Result<GameConfig, PersistenceError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(serde_yaml::from_str(&text)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let config = GameConfig::default();
            store_config(path, &config)?;
            info!(path = %path.display(), "default config written");
            Ok(config)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn store_config(path: &Path, config: &GameConfig) -> Result<(), PersistenceError> {
    let text = serde_yaml::to_string(config)?;
    write_atomic(path, text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let config = load_or_init_config(&path).unwrap();
        assert_eq!(config, GameConfig::default());
        assert!(path.exists());
        assert_eq!(load_or_init_config(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "max_high_scores: 25\nauto_save_enabled: false\n").unwrap();
        let config = load_or_init_config(&path).unwrap();
        assert_eq!(config.max_high_scores, 25);
        assert!(!config.auto_save_enabled);
        assert_eq!(config.default_starting_employees, 5);
    }

    #[test]
    fn stored_changes_survive() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let config = GameConfig {
            default_starting_capital: 750_000.0,
            ..GameConfig::default()
        };
        store_config(&path, &config).unwrap();
        assert_eq!(load_or_init_config(&path).unwrap(), config);
    }

    #[test]
    fn malformed_yaml_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "max_high_scores: [not, a, number]\n").unwrap();
        assert!(matches!(
            load_or_init_config(&path),
            Err(PersistenceError::Yaml(_))
        ));
    }
}
