//! Player actions outside the quarterly tick.
//!
//! Every action checks its capital requirement before touching any state, so
//! a rejected action leaves the company and its staff exactly as they were.

use chaos_core::{
    scale, thousands, usd, Budget, Company, Department, DepartmentRegistry, MarketStrategy,
};
use chaos_econ::market_share_gain;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::DecisionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostCut {
    Light,
    Medium,
    Heavy,
}

impl CostCut {
    /// Capital that must be on hand to push the cut through.
    pub fn required_capital(self) -> Decimal {
        Decimal::from(match self {
            CostCut::Light => 10_000,
            CostCut::Medium => 25_000,
            CostCut::Heavy => 50_000,
        })
    }

    /// Fraction of last quarter's expenses recovered.
    pub fn savings_rate(self) -> f64 {
        match self {
            CostCut::Light => 0.05,
            CostCut::Medium => 0.15,
            CostCut::Heavy => 0.25,
        }
    }

    fn morale_loss(self) -> i32 {
        match self {
            CostCut::Light => 5,
            CostCut::Medium => 12,
            CostCut::Heavy => 20,
        }
    }

    fn risk_gain(self) -> i32 {
        match self {
            CostCut::Light => 3,
            CostCut::Medium => 8,
            CostCut::Heavy => 15,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusTier {
    Small,
    Large,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Campaign {
    Local,
    National,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Retreat {
    Weekend,
    Week,
}

/// One-shot executive action.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ExecutiveDecision {
    CostCut(CostCut),
    Bonus(BonusTier),
    EmergencyLoan,
    Marketing(Campaign),
    Retreat(Retreat),
    RdInvestment,
    CrisisManagement,
    ReallocateBudget(Budget),
}

pub const EMERGENCY_LOAN: i64 = 200_000;
pub const RD_INVESTMENT_COST: i64 = 120_000;
pub const CRISIS_MANAGEMENT_COST: i64 = 100_000;

impl ExecutiveDecision {
    /// Capital the decision needs on hand, if any.
    pub fn required_capital(&self) -> Option<Decimal> {
        let amount = match self {
            ExecutiveDecision::CostCut(cut) => return Some(cut.required_capital()),
            ExecutiveDecision::Bonus(BonusTier::Small) => 50_000,
            ExecutiveDecision::Bonus(BonusTier::Large) => 150_000,
            ExecutiveDecision::Marketing(Campaign::Local) => 75_000,
            ExecutiveDecision::Marketing(Campaign::National) => 200_000,
            ExecutiveDecision::Retreat(Retreat::Weekend) => 30_000,
            ExecutiveDecision::Retreat(Retreat::Week) => 80_000,
            ExecutiveDecision::RdInvestment => RD_INVESTMENT_COST,
            ExecutiveDecision::CrisisManagement => CRISIS_MANAGEMENT_COST,
            ExecutiveDecision::EmergencyLoan | ExecutiveDecision::ReallocateBudget(_) => {
                return None
            }
        };
        Some(Decimal::from(amount))
    }
}

fn require(company: &Company, required: Decimal) -> Result<(), DecisionError> {
    if company.capital < required {
        return Err(DecisionError::InsufficientCapital {
            required,
            available: company.capital,
        });
    }
    Ok(())
}

fn boost_staff(departments: &mut DepartmentRegistry, morale: i32, productivity: i32) {
    for employee in departments.employees_mut() {
        employee.adjust_morale(morale);
        employee.adjust_productivity(productivity);
    }
}

/// Apply an executive decision and describe what happened.
pub fn apply_decision<R: Rng + ?Sized>(
    decision: &ExecutiveDecision,
    company: &mut Company,
    departments: &mut DepartmentRegistry,
    rng: &mut R,
) -> Result<String, DecisionError> {
    if let ExecutiveDecision::ReallocateBudget(budget) = decision {
        budget.validate()?;
    }
    if let Some(required) = decision.required_capital() {
        require(company, required)?;
    }

    let message = match *decision {
        ExecutiveDecision::CostCut(cut) => {
            let savings = scale(company.quarterly_expenses, cut.savings_rate());
            company.capital += savings;
            company.morale -= cut.morale_loss();
            company.risk += cut.risk_gain();
            let label = match cut {
                CostCut::Light => "Light",
                CostCut::Medium => "Medium",
                CostCut::Heavy => "Heavy",
            };
            if cut == CostCut::Heavy && rng.gen::<f64>() < 0.3 {
                format!(
                    "Heavy cost cutting implemented! Saved ${}, but caused major employee dissatisfaction. Some employees may quit!",
                    thousands(savings)
                )
            } else {
                format!(
                    "{} cost cutting implemented! Saved ${}, but morale decreased by {} and risk increased by {}.",
                    label,
                    thousands(savings),
                    cut.morale_loss(),
                    cut.risk_gain()
                )
            }
        }
        ExecutiveDecision::Bonus(tier) => {
            let (cost, morale, staff_morale, staff_productivity) = match tier {
                BonusTier::Small => (50_000, 15, 10, 3),
                BonusTier::Large => (150_000, 25, 20, 8),
            };
            company.capital -= Decimal::from(cost);
            company.morale += morale;
            boost_staff(departments, staff_morale, staff_productivity);
            format!(
                "Employee bonuses distributed! Cost ${}, morale increased by {}, staff productivity +{}.",
                thousands(Decimal::from(cost)),
                morale,
                staff_productivity
            )
        }
        ExecutiveDecision::EmergencyLoan => {
            company.capital += Decimal::from(EMERGENCY_LOAN);
            company.risk += 20;
            company.reputation -= 10;
            format!(
                "Emergency loan of ${} secured! Risk increased by 20, reputation decreased by 10.",
                thousands(Decimal::from(EMERGENCY_LOAN))
            )
        }
        ExecutiveDecision::Marketing(campaign) => {
            let (cost, reputation, base_gain, risk) = match campaign {
                Campaign::Local => (75_000, rng.gen_range(8..15), rng.gen::<f64>() + 0.5, 5),
                Campaign::National => {
                    (200_000, rng.gen_range(15..25), rng.gen::<f64>() * 2.0 + 1.0, 12)
                }
            };
            let gain = market_share_gain(company.market_share, base_gain);
            company.capital -= Decimal::from(cost);
            company.reputation += reputation;
            company.market_share += gain;
            company.risk += risk;
            format!(
                "Marketing campaign launched for ${}! Reputation +{}, Market share +{:.2}%, Risk +{}.",
                thousands(Decimal::from(cost)),
                reputation,
                gain,
                risk
            )
        }
        ExecutiveDecision::Retreat(retreat) => {
            let (cost, morale, risk_drop, staff_morale, staff_productivity) = match retreat {
                Retreat::Weekend => (30_000, 12, 5, 15, 5),
                Retreat::Week => (80_000, 20, 10, 25, 10),
            };
            company.capital -= Decimal::from(cost);
            company.morale += morale;
            company.risk -= risk_drop;
            boost_staff(departments, staff_morale, staff_productivity);
            format!(
                "Company retreat held for ${}! Morale +{}, Risk -{}, staff morale +{}.",
                thousands(Decimal::from(cost)),
                morale,
                risk_drop,
                staff_morale
            )
        }
        ExecutiveDecision::RdInvestment => {
            let gain = market_share_gain(company.market_share, rng.gen::<f64>() * 1.5 + 1.0);
            let reputation = rng.gen_range(10..18);
            company.capital -= Decimal::from(RD_INVESTMENT_COST);
            company.market_share += gain;
            company.reputation += reputation;
            company.risk += 8;
            format!(
                "R&D investment of ${} made! Market share +{:.2}%, Reputation +{}, Risk +8.",
                thousands(Decimal::from(RD_INVESTMENT_COST)),
                gain,
                reputation
            )
        }
        ExecutiveDecision::CrisisManagement => {
            let reputation = rng.gen_range(5..12);
            company.capital -= Decimal::from(CRISIS_MANAGEMENT_COST);
            company.risk -= 15;
            company.reputation += reputation;
            format!(
                "Crisis management team hired for ${}! Risk -15, Reputation +{}.",
                thousands(Decimal::from(CRISIS_MANAGEMENT_COST)),
                reputation
            )
        }
        ExecutiveDecision::ReallocateBudget(budget) => {
            company.budget = budget;
            apply_budget_reallocation(company, departments);
            "Department budget allocation updated! New focus areas will affect department performance next quarter.".to_string()
        }
    };
    company.clamp_values();
    Ok(message)
}

/// One-time effects of adopting the current budget split.
///
/// Same thresholds as the recurring quarterly effects, with their own magnitudes.
fn apply_budget_reallocation(company: &mut Company, departments: &mut DepartmentRegistry) {
    let budget = company.budget;

    if budget.marketing >= 25.0 {
        company.reputation += 3;
        company.market_share += 0.5;
    } else if budget.marketing <= 5.0 {
        company.reputation -= 2;
    }

    if budget.operations >= 25.0 {
        company.risk -= 3;
        departments.get_mut(Department::Operations).raise_efficiency(5.0);
    } else if budget.operations <= 10.0 {
        company.risk += 5;
    }

    if budget.finance >= 20.0 {
        company.quarterly_expenses = scale(company.quarterly_expenses, 0.95);
    }

    if budget.hr >= 20.0 {
        company.morale += 5;
        departments.get_mut(Department::Hr).raise_efficiency(10.0);
    } else if budget.hr <= 5.0 {
        company.morale -= 3;
    }

    if budget.it >= 25.0 {
        company.risk -= 5;
        for employee in departments.employees_mut() {
            employee.adjust_productivity(2);
        }
    } else if budget.it <= 10.0 {
        company.risk += 8;
    }

    if budget.research >= 25.0 {
        company.market_share += 1.0;
        company.reputation += 2;
    }
}

/// Departmental initiative run once per quarter at the player's request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuarterlyInitiative {
    Marketing,
    Operations,
    Finance,
}

/// Apply a quarterly initiative, scaled by the company's control knobs and
/// the productivity of the department running it.
pub fn apply_initiative<R: Rng + ?Sized>(
    initiative: QuarterlyInitiative,
    company: &mut Company,
    departments: &DepartmentRegistry,
    rng: &mut R,
) -> Result<String, DecisionError> {
    let risk_multiplier = company.risk_multiplier();
    let investment = company.investment_multiplier();

    let message = match initiative {
        QuarterlyInitiative::Marketing => {
            let effectiveness = departments.get(Department::Marketing).total_productivity() / 100.0;
            let mut cost = 50_000.0 * investment * (0.8 + effectiveness * 0.2);
            let mut gain = 2.0 * investment * risk_multiplier * (1.0 + effectiveness);
            let mut risk = (3.0 * risk_multiplier) as i32;
            match company.market_strategy {
                MarketStrategy::Innovation => {
                    gain *= 1.3;
                    risk += 2;
                }
                MarketStrategy::Cost => {
                    gain *= 0.8;
                    cost *= 0.7;
                }
                MarketStrategy::Quality => {}
            }
            let cost = usd(cost);
            require(company, cost)?;
            company.capital -= cost;
            company.market_share += gain;
            company.risk += risk;
            if rng.gen::<f64>() < 0.3 {
                company.reputation += rng.gen_range(1..4);
            }
            format!(
                "Quarterly marketing campaign executed! Cost: ${}, Market Share +{:.1}%, Risk +{}",
                thousands(cost),
                gain,
                risk
            )
        }
        QuarterlyInitiative::Operations => {
            let effectiveness =
                departments.get(Department::Operations).total_productivity() / 100.0;
            let cost = usd(30_000.0 * investment);
            let morale = ((10.0 * investment) as i32 as f64 * (1.0 + effectiveness)) as i32;
            let risk_drop = ((5.0 * risk_multiplier) as i32 as f64 * (1.0 + effectiveness)) as i32;
            require(company, cost)?;
            company.capital -= cost;
            company.morale += morale;
            company.risk = (company.risk - risk_drop).max(0);
            format!(
                "Operations optimized for the quarter! Cost: ${}, Morale +{}, Risk -{}",
                thousands(cost),
                morale,
                risk_drop
            )
        }
        QuarterlyInitiative::Finance => {
            let effectiveness = departments.get(Department::Finance).total_productivity() / 100.0;
            let gain = usd(25_000.0 * investment * (1.0 + effectiveness));
            let morale_loss =
                ((8.0 * risk_multiplier) as i32 as f64 * (1.0 - effectiveness * 0.3)) as i32;
            let reputation_loss = (5.0 * risk_multiplier) as i32;
            company.capital += gain;
            company.morale -= morale_loss;
            company.reputation -= reputation_loss;
            format!(
                "Financial optimization completed! Gained: ${}, Morale -{}, Reputation -{}",
                thousands(gain),
                morale_loss,
                reputation_loss
            )
        }
    };
    company.clamp_values();
    Ok(message)
}
