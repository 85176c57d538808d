//! Player-facing game configuration and nickname rules.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Options read at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Leaderboard length.
    pub max_high_scores: usize,
    pub default_starting_capital: f64,
    /// Staff the host should hire before the first quarter closes.
    pub default_starting_employees: usize,
    /// Carried for hosts; the score formula does not apply it.
    pub score_multiplier: f64,
    pub auto_save_enabled: bool,
    pub show_score_calculation: bool,
    pub minimum_nickname_length: usize,
    pub maximum_nickname_length: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_high_scores: 10,
            default_starting_capital: 500_000.0,
            default_starting_employees: 5,
            score_multiplier: 1.0,
            auto_save_enabled: true,
            show_score_calculation: true,
            minimum_nickname_length: 2,
            maximum_nickname_length: 20,
        }
    }
}

/// Reasons a nickname is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NicknameError {
    #[error("nickname cannot be empty")]
    Empty,
    #[error("nickname must be at least {0} characters long")]
    TooShort(usize),
    #[error("nickname cannot be longer than {0} characters")]
    TooLong(usize),
    #[error("nickname may only contain letters, numbers, spaces, hyphens, and underscores")]
    InvalidCharacter(char),
}

impl GameConfig {
    /// Trim and check a nickname against the configured bounds, returning the trimmed form.
    pub fn validate_nickname(&self, raw: &str) -> Result<String, NicknameError> {
        let nickname = raw.trim();
        if nickname.is_empty() {
            return Err(NicknameError::Empty);
        }
        let len = nickname.chars().count();
        if len < self.minimum_nickname_length {
            return Err(NicknameError::TooShort(self.minimum_nickname_length));
        }
        if len > self.maximum_nickname_length {
            return Err(NicknameError::TooLong(self.maximum_nickname_length));
        }
        if let Some(bad) = nickname
            .chars()
            .find(|c| !(c.is_alphanumeric() || matches!(c, ' ' | '-' | '_')))
        {
            return Err(NicknameError::InvalidCharacter(bad));
        }
        Ok(nickname.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = GameConfig::default();
        assert_eq!(c.max_high_scores, 10);
        assert_eq!(c.default_starting_capital, 500_000.0);
        assert!(c.auto_save_enabled);
    }

    #[test]
    fn nickname_rules() {
        let c = GameConfig::default();
        assert_eq!(c.validate_nickname("  Ada_99 "), Ok("Ada_99".to_string()));
        assert_eq!(c.validate_nickname("   "), Err(NicknameError::Empty));
        assert_eq!(c.validate_nickname("A"), Err(NicknameError::TooShort(2)));
        assert_eq!(
            c.validate_nickname("abcdefghijklmnopqrstu"),
            Err(NicknameError::TooLong(20))
        );
        assert_eq!(
            c.validate_nickname("bob!"),
            Err(NicknameError::InvalidCharacter('!'))
        );
    }

    #[test]
    fn partial_config_fills_defaults() {
        let c: GameConfig = serde_json::from_str(r#"{"max_high_scores": 3}"#).unwrap();
        assert_eq!(c.max_high_scores, 3);
        assert_eq!(c.maximum_nickname_length, 20);
    }
}
