//! Company state, control knobs and department budget shares.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::employee::Department;
use crate::ValidationError;

/// Lower bound of reputation, morale and risk.
pub const STAT_MIN: i32 = -100;
/// Upper bound of reputation, morale and risk.
pub const STAT_MAX: i32 = 100;
/// Capital a new company starts with.
pub const STARTING_CAPITAL: i64 = 500_000;
/// Market share (percent) a new company starts with.
pub const STARTING_MARKET_SHARE: f64 = 5.0;
/// Allowed deviation of the budget total from 100%.
pub const BUDGET_TOLERANCE: f64 = 0.1;

/// How much chaos leadership is willing to court.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskAppetite {
    Conservative,
    #[default]
    Balanced,
    Aggressive,
}

impl RiskAppetite {
    pub fn risk_multiplier(self) -> f64 {
        match self {
            RiskAppetite::Conservative => 0.7,
            RiskAppetite::Balanced => 1.0,
            RiskAppetite::Aggressive => 1.5,
        }
    }

    /// Scale applied to the probability of market events.
    pub fn chaos_multiplier(self) -> f64 {
        match self {
            RiskAppetite::Conservative => 0.7,
            RiskAppetite::Balanced => 1.0,
            RiskAppetite::Aggressive => 1.8,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvestmentLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl InvestmentLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            InvestmentLevel::Low => 0.5,
            InvestmentLevel::Medium => 1.0,
            InvestmentLevel::High => 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkforceFocus {
    Wellbeing,
    #[default]
    Efficiency,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketStrategy {
    Cost,
    #[default]
    Quality,
    Innovation,
}

/// Posture when a crisis lands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrisisResponse {
    Immediate,
    #[default]
    Control,
    Absorb,
}

impl CrisisResponse {
    /// Scale applied to the cost of a resolving crisis.
    pub fn impact_multiplier(self) -> f64 {
        match self {
            CrisisResponse::Immediate => 0.6,
            CrisisResponse::Control => 0.8,
            CrisisResponse::Absorb => 1.2,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeManagement {
    Low,
    #[default]
    Standard,
    High,
}

impl EmployeeManagement {
    pub fn multiplier(self) -> f64 {
        match self {
            EmployeeManagement::Low => 0.8,
            EmployeeManagement::Standard => 1.0,
            EmployeeManagement::High => 1.3,
        }
    }
}

/// The six strategic control knobs, set together by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub risk_appetite: RiskAppetite,
    pub budget_allocation: InvestmentLevel,
    pub workforce_focus: WorkforceFocus,
    pub market_strategy: MarketStrategy,
    pub crisis_response: CrisisResponse,
    pub employee_management: EmployeeManagement,
}

/// Percentage of discretionary spend assigned to each department.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub marketing: f64,
    pub operations: f64,
    pub finance: f64,
    pub hr: f64,
    pub it: f64,
    pub research: f64,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            marketing: 15.0,
            operations: 20.0,
            finance: 15.0,
            hr: 10.0,
            it: 20.0,
            research: 20.0,
        }
    }
}

impl Budget {
    pub fn total(&self) -> f64 {
        self.marketing + self.operations + self.finance + self.hr + self.it + self.research
    }

    /// Share of the given department.
    pub fn share(&self, department: Department) -> f64 {
        match department {
            Department::Marketing => self.marketing,
            Department::Operations => self.operations,
            Department::Finance => self.finance,
            Department::Hr => self.hr,
            Department::It => self.it,
            Department::Research => self.research,
        }
    }

    /// Shares must be finite, non-negative, and total 100 within [`BUDGET_TOLERANCE`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        for d in Department::ALL {
            let share = self.share(d);
            if !share.is_finite() {
                return Err(ValidationError::NonFinite);
            }
            if share < 0.0 {
                return Err(ValidationError::Negative);
            }
        }
        let total = self.total();
        if (total - 100.0).abs() > BUDGET_TOLERANCE {
            return Err(ValidationError::BudgetTotal(total));
        }
        Ok(())
    }
}

/// Company-wide financial and soft-metric state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub capital: Decimal,
    /// -100..=100.
    pub reputation: i32,
    /// -100..=100.
    pub morale: i32,
    /// -100..=100.
    pub risk: i32,
    /// Percent, 0..=100.
    pub market_share: f64,
    /// Mirror of the registry headcount, refreshed at quarter end.
    pub employee_count: usize,
    pub quarterly_revenue: Decimal,
    pub quarterly_expenses: Decimal,
    pub risk_appetite: RiskAppetite,
    pub budget_allocation: InvestmentLevel,
    pub workforce_focus: WorkforceFocus,
    pub market_strategy: MarketStrategy,
    pub crisis_response: CrisisResponse,
    pub employee_management: EmployeeManagement,
    pub budget: Budget,
    /// Candidate-pool refreshes used in `last_refresh_quarter`.
    pub current_quarter_refreshes: u32,
    pub last_refresh_quarter: u32,
}

impl Default for Company {
    fn default() -> Self {
        Self::with_capital(Decimal::from(STARTING_CAPITAL))
    }
}

impl Company {
    /// Fresh company with neutral stats and default knobs.
    pub fn with_capital(capital: Decimal) -> Self {
        let controls = Controls::default();
        Self {
            capital,
            reputation: 0,
            morale: 0,
            risk: 0,
            market_share: STARTING_MARKET_SHARE,
            employee_count: 0,
            quarterly_revenue: Decimal::ZERO,
            quarterly_expenses: Decimal::ZERO,
            risk_appetite: controls.risk_appetite,
            budget_allocation: controls.budget_allocation,
            workforce_focus: controls.workforce_focus,
            market_strategy: controls.market_strategy,
            crisis_response: controls.crisis_response,
            employee_management: controls.employee_management,
            budget: Budget::default(),
            current_quarter_refreshes: 0,
            last_refresh_quarter: 0,
        }
    }

    pub fn controls(&self) -> Controls {
        Controls {
            risk_appetite: self.risk_appetite,
            budget_allocation: self.budget_allocation,
            workforce_focus: self.workforce_focus,
            market_strategy: self.market_strategy,
            crisis_response: self.crisis_response,
            employee_management: self.employee_management,
        }
    }

    pub fn set_controls(&mut self, controls: Controls) {
        self.risk_appetite = controls.risk_appetite;
        self.budget_allocation = controls.budget_allocation;
        self.workforce_focus = controls.workforce_focus;
        self.market_strategy = controls.market_strategy;
        self.crisis_response = controls.crisis_response;
        self.employee_management = controls.employee_management;
    }

    pub fn risk_multiplier(&self) -> f64 {
        self.risk_appetite.risk_multiplier()
    }

    pub fn investment_multiplier(&self) -> f64 {
        self.budget_allocation.multiplier()
    }

    pub fn employee_multiplier(&self) -> f64 {
        self.employee_management.multiplier()
    }

    /// Revenue minus expenses of the last closed quarter.
    pub fn quarterly_profit(&self) -> Decimal {
        self.quarterly_revenue - self.quarterly_expenses
    }

    /// Clamp reputation, morale and risk to [-100, 100] and market share to [0, 100].
    ///
    /// A non-finite market share collapses to zero.
    pub fn clamp_values(&mut self) {
        self.reputation = self.reputation.clamp(STAT_MIN, STAT_MAX);
        self.morale = self.morale.clamp(STAT_MIN, STAT_MAX);
        self.risk = self.risk.clamp(STAT_MIN, STAT_MAX);
        self.market_share = if self.market_share.is_finite() {
            self.market_share.clamp(0.0, 100.0)
        } else {
            0.0
        };
    }

    pub fn reputation_label(&self) -> &'static str {
        band_label(
            self.reputation,
            [
                "Excellent",
                "Very Good",
                "Good",
                "Fair",
                "Neutral",
                "Poor",
                "Bad",
                "Very Bad",
                "Terrible",
                "Disastrous",
            ],
        )
    }

    pub fn morale_label(&self) -> &'static str {
        band_label(
            self.morale,
            [
                "Excellent",
                "High",
                "Good",
                "Fair",
                "Neutral",
                "Low",
                "Poor",
                "Very Low",
                "Critical",
                "Catastrophic",
            ],
        )
    }

    pub fn risk_label(&self) -> &'static str {
        band_label(
            self.risk,
            [
                "Extreme",
                "Very High",
                "High",
                "Elevated",
                "Moderate",
                "Low",
                "Very Low",
                "Minimal",
                "Negligible",
                "Ultra Safe",
            ],
        )
    }
}

/// Map a stat to one of ten labels: `>= 80` first, then every 20 points down.
fn band_label(value: i32, labels: [&'static str; 10]) -> &'static str {
    const FLOORS: [i32; 9] = [80, 60, 40, 20, 0, -20, -40, -60, -80];
    FLOORS
        .iter()
        .position(|floor| value >= *floor)
        .map_or(labels[9], |i| labels[i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fresh_company_defaults() {
        let c = Company::default();
        assert_eq!(c.capital, Decimal::from(500_000));
        assert_eq!(c.market_share, 5.0);
        assert_eq!((c.reputation, c.morale, c.risk), (0, 0, 0));
        assert_eq!(c.risk_appetite, RiskAppetite::Balanced);
        assert_eq!(c.budget_allocation, InvestmentLevel::Medium);
        assert_eq!(c.workforce_focus, WorkforceFocus::Efficiency);
        assert_eq!(c.market_strategy, MarketStrategy::Quality);
        assert_eq!(c.crisis_response, CrisisResponse::Control);
        assert_eq!(c.employee_management, EmployeeManagement::Standard);
        assert_eq!(c.budget.total(), 100.0);
    }

    #[test]
    fn knob_multipliers() {
        assert_eq!(RiskAppetite::Aggressive.risk_multiplier(), 1.5);
        assert_eq!(RiskAppetite::Aggressive.chaos_multiplier(), 1.8);
        assert_eq!(InvestmentLevel::High.multiplier(), 2.0);
        assert_eq!(EmployeeManagement::Low.multiplier(), 0.8);
        assert_eq!(CrisisResponse::Absorb.impact_multiplier(), 1.2);
    }

    #[test]
    fn budget_validation_tolerates_rounding_only() {
        let mut b = Budget::default();
        b.marketing += 0.05;
        assert!(b.validate().is_ok());
        b.marketing += 1.0;
        assert!(matches!(b.validate(), Err(ValidationError::BudgetTotal(_))));
        let mut b = Budget::default();
        b.hr = -5.0;
        b.it = 35.0;
        assert_eq!(b.validate(), Err(ValidationError::Negative));
    }

    #[test]
    fn labels_follow_twenty_point_bands() {
        let mut c = Company::default();
        assert_eq!(c.reputation_label(), "Neutral");
        c.reputation = 80;
        assert_eq!(c.reputation_label(), "Excellent");
        c.reputation = -81;
        assert_eq!(c.reputation_label(), "Disastrous");
        c.morale = -20;
        assert_eq!(c.morale_label(), "Low");
        c.risk = 19;
        assert_eq!(c.risk_label(), "Moderate");
        c.risk = -100;
        assert_eq!(c.risk_label(), "Ultra Safe");
    }

    #[test]
    fn controls_round_trip_through_company() {
        let mut c = Company::default();
        let knobs = Controls {
            risk_appetite: RiskAppetite::Aggressive,
            crisis_response: CrisisResponse::Immediate,
            ..Controls::default()
        };
        c.set_controls(knobs);
        assert_eq!(c.controls(), knobs);
        assert_eq!(c.risk_multiplier(), 1.5);
    }

    proptest! {
        #[test]
        fn clamp_bounds_every_stat(
            rep in -1000i32..1000,
            morale in -1000i32..1000,
            risk in -1000i32..1000,
            share in -500.0f64..500.0,
        ) {
            let mut c = Company::default();
            c.reputation = rep;
            c.morale = morale;
            c.risk = risk;
            c.market_share = share;
            c.clamp_values();
            prop_assert!(crate::validate_company(&c).is_ok());
        }
    }
}
