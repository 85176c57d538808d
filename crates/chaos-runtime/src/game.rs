//! The game orchestrator: one run from the first quarter to its end.

use std::collections::BTreeMap;

use chaos_core::{
    usd, Company, Controls, Department, DepartmentRegistry, Employee, EmployeeId, EndReason,
    GameConfig, GameRunRecord, GameSave, GameScore, QuarterlyReport, SimConfig, ValidationError,
};
use chaos_econ::{process_quarterly_financials, QuarterlyClose};
use chaos_events::{ChaosEngine, ChaosEvent};
use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::decisions::{self, ExecutiveDecision, QuarterlyInitiative};
use crate::hiring::{self, MAX_REFRESHES_PER_QUARTER};
use crate::{DecisionError, RosterError};

/// Market share that ends the run in victory.
pub const DOMINANCE_SHARE: f64 = 70.0;

/// First matching end condition, in priority order: bankruptcy, market
/// dominance, business failure, retirement.
///
/// `quarter` is the number of the quarter about to begin.
pub fn check_end_condition(company: &Company, quarter: u32, max_quarters: u32) -> Option<EndReason> {
    if company.capital <= Decimal::ZERO {
        Some(EndReason::Bankruptcy)
    } else if company.market_share >= DOMINANCE_SHARE {
        Some(EndReason::MarketDominance)
    } else if company.employee_count == 0 {
        Some(EndReason::BusinessFailure)
    } else if quarter > max_quarters {
        Some(EndReason::Retirement)
    } else {
        None
    }
}

/// Staff mood after the books close: +5 on a profitable quarter, -10 otherwise.
fn settle_staff_morale(departments: &mut DepartmentRegistry, profitable: bool) {
    let delta = if profitable { 5 } else { -10 };
    for employee in departments.employees_mut() {
        employee.adjust_morale(delta);
    }
}

/// A finalized run, ready for the leaderboard and the run archive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinishedRun {
    pub reason: EndReason,
    pub score: GameScore,
    pub record: GameRunRecord,
}

/// Everything one call to [`Game::process_quarter`] produced.
#[derive(Clone, Debug, PartialEq)]
pub struct QuarterOutcome {
    pub quarter: u32,
    pub close: QuarterlyClose,
    pub events: Vec<ChaosEvent>,
    pub report: QuarterlyReport,
    pub finished: Option<FinishedRun>,
}

/// State of one run.
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    sim: SimConfig,
    quarter: u32,
    company: Company,
    departments: DepartmentRegistry,
    bench: Vec<Employee>,
    candidates: Vec<Employee>,
    chaos: ChaosEngine,
    score: GameScore,
    log: Vec<String>,
    reports: Vec<QuarterlyReport>,
    run_id: Uuid,
    run_started: DateTime<Utc>,
    status: EndReason,
    rng: ChaCha8Rng,
}

impl Game {
    /// Start a fresh run with no staff and a hiring pool for quarter 1.
    pub fn new(config: GameConfig, sim: SimConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(sim.rng_seed);
        let mut game = Self {
            company: Company::default(),
            config,
            sim,
            quarter: 1,
            departments: DepartmentRegistry::new(),
            bench: Vec::new(),
            candidates: Vec::new(),
            chaos: ChaosEngine::new(),
            score: GameScore::default(),
            log: Vec::new(),
            reports: Vec::new(),
            run_id: Uuid::nil(),
            run_started: Utc::now(),
            status: EndReason::InProgress,
            rng,
        };
        game.reset_run();
        game
    }

    /// Discard the current run and begin a new one, continuing the RNG stream.
    pub fn new_run(&mut self) {
        self.reset_run();
    }

    fn reset_run(&mut self) {
        self.quarter = 1;
        self.company = Company::with_capital(usd(self.config.default_starting_capital));
        self.company.last_refresh_quarter = 1;
        self.departments = DepartmentRegistry::new();
        self.bench.clear();
        self.chaos = ChaosEngine::new();
        self.score = GameScore::default();
        self.score.update_peak_metrics(&self.company, self.quarter);
        self.log.clear();
        self.reports.clear();
        let bytes: [u8; 16] = self.rng.gen();
        self.run_id = uuid::Builder::from_random_bytes(bytes).into_uuid();
        self.run_started = Utc::now();
        self.status = EndReason::InProgress;
        self.candidates = hiring::generate_candidates(
            &self.company,
            &self.departments,
            self.quarter,
            &mut self.rng,
        );
        self.log
            .push("Quarter 1 begins! Use the hiring pool to recruit new talent.".to_string());
        info!(run_id = %self.run_id, seed = self.sim.rng_seed, "new run started");
    }

    /// Resume a run from a save. The save is validated first.
    pub fn restore(save: GameSave, config: GameConfig, sim: SimConfig) -> Result<Self, ValidationError> {
        save.validate()?;
        let rng = match save.rng {
            Some(rng) => rng,
            None => {
                warn!(save = %save.save_name, "save carries no RNG state; reseeding");
                ChaCha8Rng::seed_from_u64(sim.rng_seed ^ u64::from(save.current_quarter))
            }
        };
        let status = if save.score.end_reason.is_terminal() {
            save.score.end_reason
        } else {
            EndReason::InProgress
        };
        Ok(Self {
            config,
            sim,
            quarter: save.current_quarter,
            company: save.company,
            departments: save.departments,
            bench: save.available_employees,
            candidates: save.candidates,
            chaos: ChaosEngine::from_parts(save.active_crises, save.quarters_since_last_major_event),
            score: save.score,
            log: save.game_events,
            reports: save.quarterly_reports,
            run_id: save.run_id,
            run_started: save.run_started,
            status,
            rng,
        })
    }

    /// Capture the full run state, including the RNG position.
    pub fn snapshot(&self, save_name: &str, nickname: &str) -> GameSave {
        GameSave {
            save_name: save_name.to_string(),
            player_nickname: nickname.to_string(),
            save_date: Utc::now(),
            current_quarter: self.quarter,
            company: self.company.clone(),
            departments: self.departments.clone(),
            available_employees: self.bench.clone(),
            game_events: self.log.clone(),
            quarterly_reports: self.reports.clone(),
            candidates: self.candidates.clone(),
            active_crises: self.chaos.active_crises().to_vec(),
            quarters_since_last_major_event: self.chaos.quarters_since_last_major_event(),
            score: self.score.clone(),
            run_id: self.run_id,
            run_started: self.run_started,
            rng: Some(self.rng.clone()),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Number of the quarter currently being played.
    pub fn quarter(&self) -> u32 {
        self.quarter
    }

    pub fn company(&self) -> &Company {
        &self.company
    }

    pub fn departments(&self) -> &DepartmentRegistry {
        &self.departments
    }

    /// Hired staff not yet assigned to a department.
    pub fn bench(&self) -> &[Employee] {
        &self.bench
    }

    pub fn candidates(&self) -> &[Employee] {
        &self.candidates
    }

    pub fn chaos(&self) -> &ChaosEngine {
        &self.chaos
    }

    pub fn score(&self) -> &GameScore {
        &self.score
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn reports(&self) -> &[QuarterlyReport] {
        &self.reports
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// `InProgress` while the run is live, otherwise the reason it ended.
    pub fn status(&self) -> EndReason {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn hiring_quality(&self) -> f64 {
        hiring::hiring_quality(&self.company, &self.departments)
    }

    /// Refreshes still available this quarter.
    pub fn refreshes_left(&self) -> u32 {
        if self.company.last_refresh_quarter != self.quarter {
            return MAX_REFRESHES_PER_QUARTER;
        }
        MAX_REFRESHES_PER_QUARTER.saturating_sub(self.company.current_quarter_refreshes)
    }

    pub fn set_controls(&mut self, controls: Controls) {
        self.company.set_controls(controls);
        self.log.push(format!("Strategy updated: {controls:?}"));
    }

    /// Replace the hiring pool, at most [`MAX_REFRESHES_PER_QUARTER`] times a quarter.
    pub fn refresh_candidates(&mut self) -> Result<(), RosterError> {
        if self.company.last_refresh_quarter != self.quarter {
            self.company.current_quarter_refreshes = 0;
            self.company.last_refresh_quarter = self.quarter;
        }
        if self.company.current_quarter_refreshes >= MAX_REFRESHES_PER_QUARTER {
            return Err(RosterError::RefreshLimit(MAX_REFRESHES_PER_QUARTER));
        }
        self.company.current_quarter_refreshes += 1;
        self.candidates = hiring::generate_candidates(
            &self.company,
            &self.departments,
            self.quarter,
            &mut self.rng,
        );
        Ok(())
    }

    fn take_candidate(&mut self, id: EmployeeId) -> Result<Employee, RosterError> {
        let index = self
            .candidates
            .iter()
            .position(|e| e.id == id)
            .ok_or(RosterError::UnknownCandidate(id))?;
        Ok(self.candidates.remove(index))
    }

    /// Move a candidate onto the bench.
    pub fn hire(&mut self, id: EmployeeId) -> Result<(), RosterError> {
        let mut employee = self.take_candidate(id)?;
        employee.quarter_hired = self.quarter;
        employee.is_assigned = false;
        employee.assigned_department = None;
        self.log.push(format!(
            "{} hired! Assign them to a department for maximum efficiency.",
            employee.name
        ));
        self.bench.push(employee);
        Ok(())
    }

    /// Drop a candidate from the pool.
    pub fn pass(&mut self, id: EmployeeId) -> Result<(), RosterError> {
        let employee = self.take_candidate(id)?;
        self.log.push(format!("Passed on hiring {}", employee.name));
        Ok(())
    }

    /// Move a bench employee into a department.
    pub fn assign(&mut self, id: EmployeeId, department: Department) -> Result<(), RosterError> {
        let index = self
            .bench
            .iter()
            .position(|e| e.id == id)
            .ok_or(RosterError::NotOnBench(id))?;
        let employee = self.bench.remove(index);
        self.log
            .push(format!("{} assigned to {}.", employee.name, department));
        self.departments.assign(employee, department);
        self.company.employee_count = self.departments.employee_count();
        Ok(())
    }

    /// Move an employee between two departments; returns the one they left.
    pub fn transfer(&mut self, id: EmployeeId, to: Department) -> Result<Department, RosterError> {
        let from = self
            .departments
            .locate(id)
            .ok_or(RosterError::NotInDepartment(id))?;
        if from == to {
            return Err(RosterError::SameDepartment(id, to));
        }
        self.departments
            .transfer(id, to)
            .ok_or(RosterError::NotInDepartment(id))?;
        self.log.push(format!("Employee transferred from {from} to {to}."));
        Ok(from)
    }

    /// Apply an executive decision; a rejected one changes nothing.
    pub fn apply_decision(&mut self, decision: &ExecutiveDecision) -> Result<String, DecisionError> {
        if self.is_over() {
            return Err(DecisionError::GameOver);
        }
        let message =
            decisions::apply_decision(decision, &mut self.company, &mut self.departments, &mut self.rng)?;
        self.log.push(format!("EXECUTIVE DECISION: {message}"));
        info!(?decision, "executive decision applied");
        Ok(message)
    }

    pub fn apply_initiative(
        &mut self,
        initiative: QuarterlyInitiative,
    ) -> Result<String, DecisionError> {
        if self.is_over() {
            return Err(DecisionError::GameOver);
        }
        let message =
            decisions::apply_initiative(initiative, &mut self.company, &self.departments, &mut self.rng)?;
        self.log.push(format!("INITIATIVE: {message}"));
        info!(?initiative, "quarterly initiative applied");
        Ok(message)
    }

    /// Close the current quarter.
    ///
    /// Order: financials, chaos, peak tracking, staff morale, advance the
    /// quarter, end-condition check. A finished run is finalized and returned
    /// in [`QuarterOutcome::finished`]. The game does not reset itself: every
    /// further quarter, decision or initiative fails with
    /// [`DecisionError::GameOver`] until the caller starts a fresh run with
    /// [`Game::new_run`].
    pub fn process_quarter(&mut self) -> Result<QuarterOutcome, DecisionError> {
        if self.is_over() {
            return Err(DecisionError::GameOver);
        }
        let quarter = self.quarter;
        let starting_capital = self.company.capital;
        let starting_share = self.company.market_share;

        let close =
            process_quarterly_financials(&mut self.company, &mut self.departments, &mut self.rng);
        let events =
            self.chaos
                .apply_quarterly_chaos(&mut self.company, &mut self.departments, &mut self.rng);
        self.log.push(format!("=== Quarter {quarter} results ==="));
        self.log.extend(events.iter().map(|e| e.message.clone()));

        self.score.update_peak_metrics(&self.company, quarter);
        self.score.quarters_played = quarter;

        let profitable = self.company.quarterly_revenue > self.company.quarterly_expenses;
        settle_staff_morale(&mut self.departments, profitable);

        let report = QuarterlyReport {
            quarter,
            starting_capital,
            ending_capital: self.company.capital,
            revenue: close.revenue,
            expenses: close.expenses,
            market_share_change: self.company.market_share - starting_share,
            employee_count: self.departments.employee_count(),
            major_events: events.iter().map(|e| e.message.clone()).collect(),
            department_performance: self
                .departments
                .iter()
                .map(|d| (d.department, d.total_productivity()))
                .collect::<BTreeMap<_, _>>(),
        };
        self.reports.push(report.clone());

        self.quarter += 1;
        self.company.current_quarter_refreshes = 0;
        self.company.last_refresh_quarter = self.quarter;

        info!(
            quarter,
            capital = %self.company.capital,
            market_share = self.company.market_share,
            employees = self.company.employee_count,
            events = events.len(),
            "quarter processed"
        );

        let finished = match check_end_condition(&self.company, self.quarter, self.sim.max_quarters) {
            Some(reason) => Some(self.finish(reason)),
            None => {
                self.candidates = hiring::generate_candidates(
                    &self.company,
                    &self.departments,
                    self.quarter,
                    &mut self.rng,
                );
                self.log.push(format!(
                    "Quarter {} begins! Use the hiring pool to recruit new talent.",
                    self.quarter
                ));
                None
            }
        };

        Ok(QuarterOutcome {
            quarter,
            close,
            events,
            report,
            finished,
        })
    }

    fn finish(&mut self, reason: EndReason) -> FinishedRun {
        let quarters_played = self.quarter - 1;
        let score = self.score.finalize(reason, quarters_played, &self.company);
        self.status = reason;
        self.candidates.clear();
        self.log.push(format!("GAME OVER: {reason}"));
        info!(%reason, score, quarters_played, "run finished");

        let record = GameRunRecord {
            run_id: self.run_id,
            player_nickname: String::new(),
            start_date: self.run_started,
            end_date: Some(Utc::now()),
            final_score: score,
            quarters_played,
            end_reason: reason,
            final_stats: self.company.clone(),
            quarterly_reports: self.reports.clone(),
            peak_market_share: self.score.peak_market_share,
            max_employees: self.score.peak_employees,
            total_revenue: self.reports.iter().map(|r| r.revenue).sum(),
        };
        FinishedRun {
            reason,
            score: self.score.clone(),
            record,
        }
    }
}
