#![deny(warnings)]

//! Core domain models and invariants for Corporate Chaos.
//!
//! This crate defines the serializable company, workforce, crisis and scoring
//! types shared across the simulation, with validation helpers that guard the
//! invariants a freshly loaded or hand-built state must satisfy.

pub mod company;
pub mod config;
pub mod crisis;
pub mod department;
pub mod employee;
pub mod records;
pub mod score;

pub use company::{
    Budget, Company, Controls, CrisisResponse, EmployeeManagement, InvestmentLevel,
    MarketStrategy, RiskAppetite, WorkforceFocus,
};
pub use config::{GameConfig, NicknameError};
pub use crisis::{CrisisEvent, CrisisLevel};
pub use department::{DepartmentRegistry, DepartmentStats};
pub use employee::{Department, Employee, EmployeeId, HiringEra, RiskLevel, SkillLevel};
pub use records::{GameRunRecord, GameSave, QuarterlyReport};
pub use score::{EndReason, GameScore};

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Simulation configuration parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimConfig {
    /// Seed for deterministic RNG.
    pub rng_seed: u64,
    /// Last playable quarter before retirement (default: 120, i.e. 30 years).
    pub max_quarters: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rng_seed: 42,
            max_quarters: 120,
        }
    }
}

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Reputation, morale or risk outside [-100, 100].
    #[error("{0} value {1} is outside [-100, 100]")]
    StatOutOfRange(&'static str, i32),
    /// Market share outside [0, 100].
    #[error("market share {0} is outside [0, 100]")]
    MarketShareOutOfRange(f64),
    /// Numeric field must be finite.
    #[error("non-finite numeric value encountered")]
    NonFinite,
    /// Salaries and budget shares must be non-negative.
    #[error("negative value where a non-negative one is required")]
    Negative,
    /// Department budget shares must sum to 100 (within 0.1).
    #[error("department budgets total {0:.1}%, expected 100%")]
    BudgetTotal(f64),
    /// Registry slots must hold the six departments in declaration order.
    #[error("registry slot for {expected} holds {found}")]
    DepartmentOrder {
        /// Department the slot is reserved for.
        expected: Department,
        /// Department actually found there.
        found: Department,
    },
    /// An employee's recorded assignment disagrees with where it is stored.
    #[error("employee {0} is stored in {1} but not assigned there")]
    DepartmentMismatch(EmployeeId, Department),
    /// A benched or candidate employee still carries an assignment.
    #[error("employee {0} is off the roster but marked as assigned")]
    BenchedButAssigned(EmployeeId),
    /// The same employee appears more than once.
    #[error("employee {0} appears more than once")]
    DuplicateEmployee(EmployeeId),
}

/// Convert a floating amount into money, rounded to cents.
///
/// Non-finite input maps to zero; callers only feed finite products of
/// bounded factors.
pub fn usd(amount: f64) -> Decimal {
    Decimal::from_f64(amount)
        .map(|d| d.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

/// Lossy floating view of a money amount, for ratio arithmetic.
pub fn as_f64(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or(0.0)
}

/// Scale a money amount by a floating factor, rounding to cents.
pub fn scale(amount: Decimal, factor: f64) -> Decimal {
    usd(as_f64(amount) * factor)
}

/// Render money with thousands separators and no cents, e.g. `-12,345`.
pub fn thousands(amount: Decimal) -> String {
    let whole = amount.round().abs().to_string();
    let digits: Vec<char> = whole.chars().collect();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount.round().is_sign_negative() && !amount.round().is_zero() {
        out.push('-');
    }
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*c);
    }
    out
}

/// Validate company-wide stats against their legal ranges.
pub fn validate_company(company: &Company) -> Result<(), ValidationError> {
    for (name, value) in [
        ("reputation", company.reputation),
        ("morale", company.morale),
        ("risk", company.risk),
    ] {
        if !(company::STAT_MIN..=company::STAT_MAX).contains(&value) {
            return Err(ValidationError::StatOutOfRange(name, value));
        }
    }
    if !company.market_share.is_finite() {
        return Err(ValidationError::NonFinite);
    }
    if !(0.0..=100.0).contains(&company.market_share) {
        return Err(ValidationError::MarketShareOutOfRange(company.market_share));
    }
    company.budget.validate()
}

/// Validate a single employee record.
pub fn validate_employee(employee: &Employee) -> Result<(), ValidationError> {
    if employee.salary < Decimal::ZERO {
        return Err(ValidationError::Negative);
    }
    if employee.productivity > 100 || employee.morale > 100 {
        return Err(ValidationError::StatOutOfRange(
            "employee",
            i32::from(employee.productivity.max(employee.morale)),
        ));
    }
    Ok(())
}
