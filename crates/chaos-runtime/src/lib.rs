#![deny(warnings)]

//! Turn loop and player actions for Corporate Chaos.
//!
//! A [`Game`] owns the whole run: company, departments, bench, hiring pool,
//! chaos engine, score and a seeded RNG. Each call to
//! [`Game::process_quarter`] closes the books, rolls the quarter's chaos,
//! tracks peaks and checks the end conditions.

pub mod decisions;
pub mod game;
pub mod hiring;

pub use decisions::{
    apply_decision, apply_initiative, BonusTier, Campaign, CostCut, ExecutiveDecision,
    QuarterlyInitiative, Retreat,
};
pub use game::{check_end_condition, FinishedRun, Game, QuarterOutcome};
pub use hiring::{
    candidate_count, generate_candidates, hiring_quality, quality_candidate,
    MAX_REFRESHES_PER_QUARTER,
};

use chaos_core::{Department, EmployeeId, ValidationError};
use rust_decimal::Decimal;
use thiserror::Error;

/// Rejected player actions. State is untouched whenever one is returned.
#[derive(Debug, Error, PartialEq)]
pub enum DecisionError {
    #[error("insufficient capital: need ${required}, have ${available}")]
    InsufficientCapital {
        required: Decimal,
        available: Decimal,
    },
    /// Budget shares must be finite, non-negative and total 100%.
    #[error("invalid budget: {0}")]
    InvalidBudget(#[from] ValidationError),
    #[error("the run has ended")]
    GameOver,
}

/// Failed hiring or staffing operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("no candidate {0} in the hiring pool")]
    UnknownCandidate(EmployeeId),
    #[error("no unassigned employee {0}")]
    NotOnBench(EmployeeId),
    #[error("employee {0} is not in any department")]
    NotInDepartment(EmployeeId),
    #[error("employee {0} already works in {1}")]
    SameDepartment(EmployeeId, Department),
    #[error("candidate refresh limit of {0} per quarter reached")]
    RefreshLimit(u32),
}
