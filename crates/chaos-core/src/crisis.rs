//! Multi-quarter crises announced ahead of their climax.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a crisis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CrisisLevel {
    #[default]
    None,
    Warning,
    Critical,
    Catastrophic,
}

impl CrisisLevel {
    /// Fraction of capital lost when a crisis of this level resolves.
    pub fn resolution_impact(self) -> f64 {
        match self {
            CrisisLevel::None | CrisisLevel::Warning => 0.05,
            CrisisLevel::Critical => 0.15,
            CrisisLevel::Catastrophic => 0.30,
        }
    }

    /// Per-quarter morale drain and risk gain while the crisis looms.
    pub fn stress(self) -> i32 {
        match self {
            CrisisLevel::None | CrisisLevel::Warning => 1,
            CrisisLevel::Critical => 3,
            CrisisLevel::Catastrophic => 5,
        }
    }

    /// Short status marker used in summaries.
    pub fn marker(self) -> &'static str {
        match self {
            CrisisLevel::None => "[ ]",
            CrisisLevel::Warning => "[!]",
            CrisisLevel::Critical => "[!!]",
            CrisisLevel::Catastrophic => "[!!!]",
        }
    }
}

impl fmt::Display for CrisisLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A looming crisis and its countdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisEvent {
    pub title: String,
    pub description: String,
    pub level: CrisisLevel,
    /// Quarters until the crisis resolves.
    pub quarters_remaining: u32,
    pub is_active: bool,
}

impl CrisisEvent {
    pub fn new(title: &str, description: &str, quarters: u32, level: CrisisLevel) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            level,
            quarters_remaining: quarters,
            is_active: true,
        }
    }

    /// Count one quarter down; true when the crisis has reached its climax.
    pub fn tick(&mut self) -> bool {
        self.quarters_remaining = self.quarters_remaining.saturating_sub(1);
        self.quarters_remaining == 0
    }
}
