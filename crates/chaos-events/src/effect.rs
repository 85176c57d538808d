//! Structured event outcomes.
//!
//! Every event first computes an [`Effect`], applies it, and only then renders
//! its message from the same numbers, so text and state cannot drift apart.

use std::fmt;

use chaos_core::{Company, Department};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Company-level state delta of one event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub capital: Decimal,
    pub reputation: i32,
    pub morale: i32,
    pub risk: i32,
    /// Percentage points.
    pub market_share: f64,
}

impl Effect {
    /// Add the delta to the company. Clamping is left to the caller.
    pub fn apply(&self, company: &mut Company) {
        company.capital += self.capital;
        company.reputation += self.reputation;
        company.morale += self.morale;
        company.risk += self.risk;
        company.market_share += self.market_share;
    }
}

/// Category of a generated event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    CrisisResolved,
    CrisisOngoing,
    CrisisWarning,
    TalentPoached,
    RetentionRaise,
    EmployeeFumble,
    Retirement,
    Breakthrough,
    MarketDisruption,
    MarketOpportunity,
    CompetitorAttack,
    Scandal,
    Mismanagement,
    PositivePr,
    Miscommunication,
    TeamSuccess,
    MassRecall,
    ProductDefect,
    QualitySuccess,
    Catastrophe,
    RandomWindfall,
    RandomSetback,
    EmployeeQuit,
}

impl EventKind {
    /// Events that reset the quiet-period counter.
    pub fn is_major(self) -> bool {
        matches!(
            self,
            EventKind::CrisisResolved | EventKind::Catastrophe | EventKind::MassRecall
        )
    }
}

/// One event produced by a quarter of chaos.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChaosEvent {
    pub kind: EventKind,
    /// Department the event originated in, for workforce events.
    pub department: Option<Department>,
    pub effect: Effect,
    pub message: String,
}

impl ChaosEvent {
    pub(crate) fn company(kind: EventKind, effect: Effect, message: String) -> Self {
        Self {
            kind,
            department: None,
            effect,
            message,
        }
    }

    pub(crate) fn in_department(
        kind: EventKind,
        department: Department,
        effect: Effect,
        message: String,
    ) -> Self {
        Self {
            kind,
            department: Some(department),
            effect,
            message,
        }
    }
}

impl fmt::Display for ChaosEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_adds_every_field() {
        let mut c = Company::default();
        Effect {
            capital: Decimal::from(-10_000),
            reputation: -3,
            morale: 4,
            risk: 5,
            market_share: -1.5,
        }
        .apply(&mut c);
        assert_eq!(c.capital, Decimal::from(490_000));
        assert_eq!((c.reputation, c.morale, c.risk), (-3, 4, 5));
        assert!((c.market_share - 3.5).abs() < 1e-12);
    }
}
