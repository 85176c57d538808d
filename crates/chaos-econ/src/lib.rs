#![deny(warnings)]

//! Company ledger for Corporate Chaos.
//!
//! Pure quarterly accounting over the core models:
//! - Recurring department-budget effects
//! - Diminishing-returns market-share gains and leader-biased losses
//! - Natural market dynamics and the quarterly financial close
//! - Chance formulas consumed by the chaos engine

use chaos_core::{as_f64, usd, Company, Department, DepartmentRegistry};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fixed operating cost added to every quarter's expenses.
pub const BASE_OPERATING_COST: i64 = 50_000;
/// Revenue per market-share point before productivity and reputation scaling.
pub const REVENUE_PER_SHARE_POINT: f64 = 10_000.0;

/// Multiplier that throttles gains for market leaders.
///
/// The most restrictive tier whose threshold is met applies.
pub fn competitive_pressure(market_share: f64) -> f64 {
    if market_share >= 65.0 {
        0.2
    } else if market_share >= 60.0 {
        0.3
    } else if market_share >= 50.0 {
        0.5
    } else {
        1.0
    }
}

/// Market-share gain with diminishing returns: `base × (1 − share/100) × pressure`.
///
/// Example:
/// assert_eq!(market_share_gain(0.0, 1.0), 1.0);
/// assert!(market_share_gain(60.0, 1.0) < market_share_gain(10.0, 1.0));
pub fn market_share_gain(market_share: f64, base: f64) -> f64 {
    base * (1.0 - market_share / 100.0) * competitive_pressure(market_share)
}

/// Market-share loss that grows mildly with share: `base × (1 + share/200)`.
pub fn market_share_loss(market_share: f64, base: f64) -> f64 {
    base * (1.0 + market_share / 200.0)
}

/// Baseline quarterly share decay before randomization, tiered by share.
pub fn natural_decay(market_share: f64) -> f64 {
    if market_share >= 60.0 {
        0.15
    } else if market_share >= 50.0 {
        0.12
    } else if market_share >= 30.0 {
        0.08
    } else {
        0.05
    }
}

/// Revenue multiplier from reputation, 0.5 at -100 through 1.5 at +100.
pub fn reputation_revenue_modifier(reputation: i32) -> f64 {
    1.0 + f64::from(reputation) / 200.0
}

/// Probability of a catastrophic event: 5% base plus up to 20% from positive risk, capped at 25%.
pub fn catastrophic_event_chance(risk: i32) -> f64 {
    (0.05 + f64::from(risk.max(0)) / 100.0 * 0.20).min(0.25)
}

/// Per-employee baseline turnover probability, 2%..=30%, rising as morale falls.
pub fn turnover_chance(morale: i32) -> f64 {
    (0.10 - f64::from(morale) / 100.0 * 0.20).clamp(0.02, 0.30)
}

/// Apply the recurring threshold effects of the department budget split.
///
/// Finance at or above 20% trims the stored expense figure by 2%; the
/// quarterly close recomputes expenses afterwards, so inside
/// [`process_quarterly_financials`] that trim does not reach capital.
pub fn apply_budget_allocations(company: &mut Company, departments: &mut DepartmentRegistry) {
    let budget = company.budget;

    if budget.marketing >= 25.0 {
        company.reputation += 2;
        company.market_share += market_share_gain(company.market_share, 0.15);
    } else if budget.marketing <= 5.0 {
        company.reputation -= 1;
        company.market_share -= market_share_loss(company.market_share, 0.1);
    }

    if budget.operations >= 25.0 {
        company.risk -= 2;
        departments.get_mut(Department::Operations).raise_efficiency(3.0);
    } else if budget.operations <= 10.0 {
        company.risk += 3;
    }

    if budget.finance >= 20.0 {
        company.quarterly_expenses = usd(as_f64(company.quarterly_expenses) * 0.98);
    }

    if budget.hr >= 20.0 {
        company.morale += 3;
        departments.get_mut(Department::Hr).raise_efficiency(5.0);
    } else if budget.hr <= 5.0 {
        company.morale -= 2;
    }

    if budget.it >= 25.0 {
        company.risk -= 3;
        for stats in departments.iter_mut() {
            stats.raise_efficiency(2.0);
        }
    } else if budget.it <= 10.0 {
        company.risk += 5;
    }

    if budget.research >= 25.0 {
        company.market_share += market_share_gain(company.market_share, 0.25);
        company.reputation += 1;
        departments.get_mut(Department::Research).raise_efficiency(4.0);
    }
}

/// Apply natural decay and soft-metric pressure to market share.
///
/// Returns the change in market share (negative for a loss).
pub fn apply_market_dynamics<R: Rng + ?Sized>(company: &mut Company, rng: &mut R) -> f64 {
    let before = company.market_share;
    let decay = natural_decay(company.market_share) * (0.8 + rng.gen::<f64>() * 0.4);
    company.market_share -= decay;

    if company.reputation < -20 {
        company.market_share -= 0.1;
    } else if company.reputation > 50 {
        company.market_share += 0.05;
    }
    if company.morale < -20 {
        company.market_share -= 0.08;
    }
    if company.risk > 50 {
        company.market_share -= 0.06;
    }
    company.market_share - before
}

/// Salary cost of every department plus the fixed operating cost.
pub fn quarterly_expenses(departments: &DepartmentRegistry) -> Decimal {
    departments.quarterly_cost() + Decimal::from(BASE_OPERATING_COST)
}

/// `share × 10000 × (1 + total productivity / 100) × reputation modifier`.
pub fn quarterly_revenue(company: &Company, departments: &DepartmentRegistry) -> Decimal {
    let base = company.market_share * REVENUE_PER_SHARE_POINT;
    let department_bonus = departments.total_productivity() / 100.0;
    usd(base * (1.0 + department_bonus) * reputation_revenue_modifier(company.reputation))
}

/// Figures of one closed quarter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyClose {
    pub revenue: Decimal,
    pub expenses: Decimal,
    /// Market-share change from budget effects and market dynamics, before clamping.
    pub market_share_change: f64,
}

impl QuarterlyClose {
    pub fn net(&self) -> Decimal {
        self.revenue - self.expenses
    }
}

/// Close the quarter: budget effects, market dynamics, expenses, revenue, capital, clamp.
pub fn process_quarterly_financials<R: Rng + ?Sized>(
    company: &mut Company,
    departments: &mut DepartmentRegistry,
    rng: &mut R,
) -> QuarterlyClose {
    let share_before = company.market_share;
    apply_budget_allocations(company, departments);
    apply_market_dynamics(company, rng);

    company.quarterly_expenses = quarterly_expenses(departments);
    company.quarterly_revenue = quarterly_revenue(company, departments);
    company.capital += company.quarterly_revenue - company.quarterly_expenses;

    let close = QuarterlyClose {
        revenue: company.quarterly_revenue,
        expenses: company.quarterly_expenses,
        market_share_change: company.market_share - share_before,
    };
    company.clamp_values();
    debug!(
        revenue = %close.revenue,
        expenses = %close.expenses,
        capital = %company.capital,
        market_share = company.market_share,
        "quarter closed"
    );
    close
}
