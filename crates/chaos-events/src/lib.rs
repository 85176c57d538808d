#![deny(warnings)]

//! Stochastic event generation for Corporate Chaos.
//!
//! [`ChaosEngine`] rolls every quarterly event in a fixed order against a
//! caller-supplied RNG, so a seeded generator reproduces a quarter exactly.
//! Each event is returned as a structured [`ChaosEvent`] carrying both the
//! applied [`Effect`] and the rendered log line.

mod catalog;
mod crisis;
mod effect;
mod market;
mod workforce;

pub use crisis::{status_summary, CRISIS_CHANCE, MAX_ACTIVE_CRISES};
pub use effect::{ChaosEvent, Effect, EventKind};

use chaos_core::{Company, CrisisEvent, DepartmentRegistry};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Crisis bookkeeping carried from one quarter to the next.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChaosEngine {
    active_crises: Vec<CrisisEvent>,
    quarters_since_last_major_event: u32,
}

impl ChaosEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the engine from saved state. Crises beyond the cap are dropped.
    pub fn from_parts(
        mut active_crises: Vec<CrisisEvent>,
        quarters_since_last_major_event: u32,
    ) -> Self {
        active_crises.truncate(MAX_ACTIVE_CRISES);
        Self {
            active_crises,
            quarters_since_last_major_event,
        }
    }

    pub fn active_crises(&self) -> &[CrisisEvent] {
        &self.active_crises
    }

    pub fn quarters_since_last_major_event(&self) -> u32 {
        self.quarters_since_last_major_event
    }

    pub fn crisis_status_summary(&self) -> String {
        status_summary(&self.active_crises)
    }

    /// Run one quarter of chaos against the company and its departments.
    ///
    /// Order: crises, employee events, market events, crisis genesis,
    /// reputation, morale, risk, catastrophe, random flavor, turnover.
    /// Company stats are clamped once at the end.
    pub fn apply_quarterly_chaos<R: Rng + ?Sized>(
        &mut self,
        company: &mut Company,
        departments: &mut DepartmentRegistry,
        rng: &mut R,
    ) -> Vec<ChaosEvent> {
        self.quarters_since_last_major_event += 1;
        let mut events = Vec::new();

        crisis::advance(&mut self.active_crises, company, departments, &mut events);
        events.extend(workforce::employee_events(company, departments, rng));
        events.extend(market::market_events(company, rng));
        events.extend(crisis::maybe_spawn(&mut self.active_crises, rng));
        events.extend(market::reputation_events(company, rng));
        events.extend(market::morale_events(company, rng));
        events.extend(market::risk_events(company, rng));
        events.extend(market::catastrophic_event(company, rng));
        events.extend(market::random_chaos(company, rng));
        events.extend(workforce::morale_turnover(company, departments, rng));

        if events.iter().any(|e| e.kind.is_major()) {
            self.quarters_since_last_major_event = 0;
        }
        company.employee_count = departments.employee_count();
        company.clamp_values();

        for event in &events {
            debug!(kind = ?event.kind, department = ?event.department, "{}", event.message);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaos_core::{CrisisLevel, Department, Employee};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn staffed_company(rng: &mut ChaCha8Rng) -> (Company, DepartmentRegistry) {
        let mut departments = DepartmentRegistry::new();
        for d in Department::ALL {
            for _ in 0..2 {
                departments.assign(Employee::generate_random(12, rng), d);
            }
        }
        let mut company = Company::default();
        company.employee_count = departments.employee_count();
        (company, departments)
    }

    #[test]
    fn same_seed_same_quarter() {
        let run = || {
            let mut rng = ChaCha8Rng::seed_from_u64(2024);
            let (mut company, mut departments) = staffed_company(&mut rng);
            let mut engine = ChaosEngine::new();
            let mut log = Vec::new();
            for _ in 0..12 {
                log.extend(engine.apply_quarterly_chaos(&mut company, &mut departments, &mut rng));
            }
            (log, company.capital, departments.employee_count())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn crisis_resolution_resets_quiet_counter() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut company = Company::default();
        let mut departments = DepartmentRegistry::new();
        let crisis = CrisisEvent::new("Cybersecurity Threat", "", 1, CrisisLevel::Catastrophic);
        let mut engine = ChaosEngine::from_parts(vec![crisis], 7);
        let events = engine.apply_quarterly_chaos(&mut company, &mut departments, &mut rng);
        assert_eq!(events[0].kind, EventKind::CrisisResolved);
        assert_eq!(engine.quarters_since_last_major_event(), 0);
    }

    #[test]
    fn from_parts_enforces_cap() {
        let crises = (1..=4)
            .map(|q| CrisisEvent::new("X", "", q, CrisisLevel::Warning))
            .collect();
        let engine = ChaosEngine::from_parts(crises, 0);
        assert_eq!(engine.active_crises().len(), MAX_ACTIVE_CRISES);
        assert!(engine.crisis_status_summary().starts_with("[!] X"));
    }

    #[test]
    fn engine_serializes() {
        let engine = ChaosEngine::from_parts(
            vec![CrisisEvent::new("Supply Chain Crisis", "d", 3, CrisisLevel::Critical)],
            4,
        );
        let json = serde_json::to_string(&engine).unwrap();
        let back: ChaosEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(engine, back);
    }

    proptest! {
        #[test]
        fn stats_stay_in_bounds(seed in any::<u64>(), quarters in 1usize..20) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (mut company, mut departments) = staffed_company(&mut rng);
            let mut engine = ChaosEngine::new();
            for _ in 0..quarters {
                engine.apply_quarterly_chaos(&mut company, &mut departments, &mut rng);
                prop_assert!((-100..=100).contains(&company.reputation));
                prop_assert!((-100..=100).contains(&company.morale));
                prop_assert!((-100..=100).contains(&company.risk));
                prop_assert!((0.0..=100.0).contains(&company.market_share));
                prop_assert!(engine.active_crises().len() <= MAX_ACTIVE_CRISES);
                prop_assert_eq!(company.employee_count, departments.employee_count());
                prop_assert!(departments.validate().is_ok());
            }
        }
    }
}
