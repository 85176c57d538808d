//! Peak-performance tracking and the final score formula.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::as_f64;
use crate::company::Company;

/// Why a run ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    #[default]
    InProgress,
    Bankruptcy,
    MarketDominance,
    BusinessFailure,
    Retirement,
}

impl EndReason {
    pub fn is_terminal(self) -> bool {
        self != EndReason::InProgress
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EndReason::InProgress => "In Progress",
            EndReason::Bankruptcy => "Bankruptcy - Ran out of capital",
            EndReason::MarketDominance => "Victory - Market Dominance Achieved (70% Market Share)",
            EndReason::BusinessFailure => "Business Failure - No employees left",
            EndReason::Retirement => "Retirement - You've reached the end of your 30-year career!",
        })
    }
}

/// Best-ever metrics of a run plus its final outcome.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameScore {
    pub nickname: String,
    pub score: u64,
    pub peak_capital: Decimal,
    pub peak_revenue: Decimal,
    pub peak_profit: Decimal,
    pub peak_market_share: f64,
    pub peak_employees: usize,
    pub peak_reputation: i32,
    pub final_capital: Decimal,
    pub final_market_share: f64,
    pub final_employees: usize,
    pub quarters_played: u32,
    pub end_reason: EndReason,
    pub date_achieved: Option<DateTime<Utc>>,
    /// Quarter in which peak capital was reached.
    pub peak_quarter: u32,
}

impl GameScore {
    /// Raise every peak the company currently exceeds.
    pub fn update_peak_metrics(&mut self, company: &Company, current_quarter: u32) {
        if company.capital > self.peak_capital {
            self.peak_capital = company.capital;
            self.peak_quarter = current_quarter;
        }
        self.peak_revenue = self.peak_revenue.max(company.quarterly_revenue);
        self.peak_profit = self.peak_profit.max(company.quarterly_profit());
        if company.market_share > self.peak_market_share {
            self.peak_market_share = company.market_share;
        }
        self.peak_employees = self.peak_employees.max(company.employee_count);
        self.peak_reputation = self.peak_reputation.max(company.reputation);
    }

    /// Score implied by the current peaks, without storing it.
    ///
    /// Linear in the peaks, then boosted by each bonus tier reached
    /// (share >= 50: x2.0, profit >= 100k: x1.5, capital >= 1M: x1.3,
    /// 20+ quarters: x1.2), floored at zero and truncated.
    pub fn compute_score(&self) -> u64 {
        let mut score = as_f64(self.peak_capital) / 1000.0 * 2.0
            + as_f64(self.peak_revenue) / 1000.0 * 3.0
            + as_f64(self.peak_profit) / 1000.0 * 5.0
            + self.peak_market_share * 50.0
            + self.peak_employees as f64 * 20.0
            + f64::from(self.peak_reputation) * 10.0
            + f64::from(self.quarters_played) * 100.0;

        if self.peak_market_share >= 50.0 {
            score *= 2.0;
        }
        if self.peak_profit >= Decimal::from(100_000) {
            score *= 1.5;
        }
        if self.peak_capital >= Decimal::from(1_000_000) {
            score *= 1.3;
        }
        if self.quarters_played >= 20 {
            score *= 1.2;
        }
        // `as` saturates, so NaN maps to zero and huge values to u64::MAX.
        score.max(0.0) as u64
    }

    /// Compute and store the score.
    pub fn calculate_score(&mut self) -> u64 {
        self.score = self.compute_score();
        self.score
    }

    /// Record the terminal state of the run and compute the final score.
    pub fn finalize(&mut self, reason: EndReason, quarters_played: u32, company: &Company) -> u64 {
        self.end_reason = reason;
        self.quarters_played = quarters_played;
        self.final_capital = company.capital.max(Decimal::ZERO);
        self.final_market_share = company.market_share;
        self.final_employees = company.employee_count;
        self.calculate_score()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fresh_company_score_components() {
        let mut s = GameScore::default();
        s.update_peak_metrics(&Company::default(), 1);
        assert_eq!(s.peak_capital, Decimal::from(500_000));
        assert_eq!(s.peak_quarter, 1);
        // 500 * 2 + 5% share * 50 = 1250
        assert_eq!(s.compute_score(), 1250);
    }

    #[test]
    fn bonuses_stack_multiplicatively() {
        let s = GameScore {
            peak_capital: Decimal::from(1_000_000),
            peak_profit: Decimal::from(100_000),
            peak_market_share: 50.0,
            quarters_played: 20,
            ..GameScore::default()
        };
        let base = 2000.0 + 500.0 + 2500.0 + 2000.0;
        let expected = (base * 2.0 * 1.5 * 1.3 * 1.2) as u64;
        assert_eq!(s.compute_score(), expected);
    }

    #[test]
    fn negative_totals_floor_at_zero() {
        let s = GameScore {
            peak_reputation: -100,
            ..GameScore::default()
        };
        assert_eq!(s.compute_score(), 0);
    }

    #[test]
    fn peaks_never_decrease() {
        let mut s = GameScore::default();
        let mut c = Company::default();
        c.reputation = 40;
        s.update_peak_metrics(&c, 1);
        c.reputation = -10;
        c.capital = Decimal::from(10);
        s.update_peak_metrics(&c, 2);
        assert_eq!(s.peak_reputation, 40);
        assert_eq!(s.peak_capital, Decimal::from(500_000));
        assert_eq!(s.peak_quarter, 1);
    }

    #[test]
    fn finalize_floors_capital() {
        let mut s = GameScore::default();
        let mut c = Company::default();
        c.capital = Decimal::from(-2500);
        s.finalize(EndReason::Bankruptcy, 7, &c);
        assert_eq!(s.final_capital, Decimal::ZERO);
        assert_eq!(s.quarters_played, 7);
        assert_eq!(s.end_reason, EndReason::Bankruptcy);
        assert_eq!(s.score, s.compute_score());
    }

    #[test]
    fn end_reason_text() {
        assert_eq!(
            EndReason::Bankruptcy.to_string(),
            "Bankruptcy - Ran out of capital"
        );
        assert!(!EndReason::InProgress.is_terminal());
        assert!(EndReason::Retirement.is_terminal());
    }

    proptest! {
        #[test]
        fn doubling_peaks_never_lowers_score(
            capital in 0i64..5_000_000,
            revenue in 0i64..2_000_000,
            profit in 0i64..1_000_000,
            share in 0.0f64..50.0,
            employees in 0usize..200,
            reputation in 0i32..50,
            quarters in 0u32..60,
        ) {
            let s = GameScore {
                peak_capital: Decimal::from(capital),
                peak_revenue: Decimal::from(revenue),
                peak_profit: Decimal::from(profit),
                peak_market_share: share,
                peak_employees: employees,
                peak_reputation: reputation,
                quarters_played: quarters,
                ..GameScore::default()
            };
            let doubled = GameScore {
                peak_capital: s.peak_capital * Decimal::from(2),
                peak_revenue: s.peak_revenue * Decimal::from(2),
                peak_profit: s.peak_profit * Decimal::from(2),
                peak_market_share: s.peak_market_share * 2.0,
                peak_employees: s.peak_employees * 2,
                peak_reputation: s.peak_reputation * 2,
                quarters_played: s.quarters_played * 2,
                ..GameScore::default()
            };
            prop_assert!(doubled.compute_score() >= s.compute_score());
        }
    }
}
