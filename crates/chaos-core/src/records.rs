//! Quarterly reports, finished-run records and the save-game shape.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::company::Company;
use crate::crisis::CrisisEvent;
use crate::department::DepartmentRegistry;
use crate::employee::{Department, Employee};
use crate::score::{EndReason, GameScore};
use crate::ValidationError;

/// Summary of one closed quarter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyReport {
    pub quarter: u32,
    pub starting_capital: Decimal,
    pub ending_capital: Decimal,
    pub revenue: Decimal,
    pub expenses: Decimal,
    /// Percentage points gained (positive) or lost over the quarter.
    pub market_share_change: f64,
    pub employee_count: usize,
    pub major_events: Vec<String>,
    /// Total effective productivity per department at quarter end.
    pub department_performance: BTreeMap<Department, f64>,
}

impl QuarterlyReport {
    pub fn net_profit(&self) -> Decimal {
        self.revenue - self.expenses
    }
}

/// Archive entry for a finished run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRunRecord {
    pub run_id: Uuid,
    pub player_nickname: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub final_score: u64,
    pub quarters_played: u32,
    pub end_reason: EndReason,
    pub final_stats: Company,
    pub quarterly_reports: Vec<QuarterlyReport>,
    pub peak_market_share: f64,
    pub max_employees: usize,
    /// Revenue summed over every closed quarter.
    pub total_revenue: Decimal,
}

/// Everything needed to resume a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSave {
    pub save_name: String,
    pub player_nickname: String,
    pub save_date: DateTime<Utc>,
    pub current_quarter: u32,
    pub company: Company,
    pub departments: DepartmentRegistry,
    /// Hired but unassigned staff.
    pub available_employees: Vec<Employee>,
    pub game_events: Vec<String>,
    pub quarterly_reports: Vec<QuarterlyReport>,
    /// Candidates currently on offer in the hiring pool.
    #[serde(default)]
    pub candidates: Vec<Employee>,
    #[serde(default)]
    pub active_crises: Vec<CrisisEvent>,
    #[serde(default)]
    pub quarters_since_last_major_event: u32,
    #[serde(default)]
    pub score: GameScore,
    #[serde(default)]
    pub run_id: Uuid,
    #[serde(default)]
    pub run_started: DateTime<Utc>,
    /// RNG position, so a resumed run continues the same random stream.
    #[serde(default)]
    pub rng: Option<ChaCha8Rng>,
}

impl GameSave {
    /// `{save_name}_{YYYYMMDD_HHMMSS}.json`.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}.json",
            self.save_name,
            self.save_date.format("%Y%m%d_%H%M%S")
        )
    }

    /// Check every invariant a resumable state must hold.
    ///
    /// Bench staff and candidates must be unassigned, and no employee may
    /// appear twice anywhere in the save.
    pub fn validate(&self) -> Result<(), ValidationError> {
        crate::validate_company(&self.company)?;
        self.departments.validate()?;
        let mut ids: std::collections::HashSet<_> =
            self.departments.employees().map(|e| e.id).collect();
        for e in self.available_employees.iter().chain(&self.candidates) {
            if e.is_assigned || e.assigned_department.is_some() {
                return Err(ValidationError::BenchedButAssigned(e.id));
            }
            if !ids.insert(e.id) {
                return Err(ValidationError::DuplicateEmployee(e.id));
            }
            crate::validate_employee(e)?;
        }
        Ok(())
    }
}
