//! Crisis lifecycle: genesis, ongoing stress and resolution.

use chaos_core::{scale, thousands, Company, CrisisEvent, DepartmentRegistry};
use rand::Rng;
use rust_decimal::Decimal;

use crate::catalog::random_crisis;
use crate::effect::{ChaosEvent, Effect, EventKind};

/// Maximum number of simultaneously active crises.
pub const MAX_ACTIVE_CRISES: usize = 2;
/// Per-quarter chance of a new crisis warning.
pub const CRISIS_CHANCE: f64 = 0.15;

/// Count every crisis down, newest first; resolve those reaching zero and
/// apply ongoing stress for the rest.
pub(crate) fn advance(
    crises: &mut Vec<CrisisEvent>,
    company: &mut Company,
    departments: &mut DepartmentRegistry,
    events: &mut Vec<ChaosEvent>,
) {
    for i in (0..crises.len()).rev() {
        if crises[i].tick() {
            let crisis = crises.remove(i);
            events.push(resolve(&crisis, company));
        } else {
            events.push(ongoing(&crises[i], company, departments));
        }
    }
}

fn resolve(crisis: &CrisisEvent, company: &mut Company) -> ChaosEvent {
    let impact = crisis.level.resolution_impact() * company.crisis_response.impact_multiplier();
    let capital_loss = scale(company.capital.max(Decimal::ZERO), impact);
    let morale_loss = (20.0 * impact) as i32;
    let reputation_loss = (15.0 * impact) as i32;
    let effect = Effect {
        capital: -capital_loss,
        morale: -morale_loss,
        reputation: -reputation_loss,
        ..Effect::default()
    };
    effect.apply(company);
    ChaosEvent::company(
        EventKind::CrisisResolved,
        effect,
        format!(
            "CRISIS RESOLVED: {}! Impact: Capital -${}, Morale -{}, Reputation -{}",
            crisis.title,
            thousands(capital_loss),
            morale_loss,
            reputation_loss
        ),
    )
}

fn ongoing(
    crisis: &CrisisEvent,
    company: &mut Company,
    departments: &mut DepartmentRegistry,
) -> ChaosEvent {
    let stress = crisis.level.stress();
    let effect = Effect {
        morale: -stress,
        risk: stress,
        ..Effect::default()
    };
    effect.apply(company);
    for employee in departments.employees_mut() {
        employee.adjust_morale(-stress);
    }
    ChaosEvent::company(
        EventKind::CrisisOngoing,
        effect,
        format!(
            "ONGOING CRISIS: {} - {} quarters remaining!",
            crisis.title, crisis.quarters_remaining
        ),
    )
}

/// Roll for a new crisis warning; the roll is drawn even when the cap is reached.
pub(crate) fn maybe_spawn<R: Rng + ?Sized>(
    crises: &mut Vec<CrisisEvent>,
    rng: &mut R,
) -> Option<ChaosEvent> {
    if rng.gen::<f64>() < CRISIS_CHANCE && crises.len() < MAX_ACTIVE_CRISES {
        let crisis = random_crisis(rng);
        let message = format!(
            "CRISIS WARNING: {} - {} ({} quarters to prepare!)",
            crisis.title, crisis.description, crisis.quarters_remaining
        );
        crises.push(crisis);
        return Some(ChaosEvent::company(
            EventKind::CrisisWarning,
            Effect::default(),
            message,
        ));
    }
    None
}

/// One line per active crisis, or a single all-clear line.
pub fn status_summary(crises: &[CrisisEvent]) -> String {
    if crises.is_empty() {
        return "No active crises".to_string();
    }
    crises
        .iter()
        .map(|c| format!("{} {} ({}Q)", c.level.marker(), c.title, c.quarters_remaining))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaos_core::{CrisisLevel, CrisisResponse, Department, Employee};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn critical_crisis_resolves_with_response_scaling() {
        let mut company = Company::default();
        company.crisis_response = CrisisResponse::Absorb;
        let mut departments = DepartmentRegistry::new();
        let mut crises = vec![CrisisEvent::new("Supply Chain Crisis", "", 1, CrisisLevel::Critical)];
        let mut events = Vec::new();
        advance(&mut crises, &mut company, &mut departments, &mut events);
        assert!(crises.is_empty());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::CrisisResolved);
        // 15% * 1.2 of 500k
        assert_eq!(company.capital, Decimal::from(410_000));
        assert_eq!(company.morale, -3);
        assert_eq!(company.reputation, -2);
    }

    #[test]
    fn ongoing_crisis_drains_every_employee() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut company = Company::default();
        let mut departments = DepartmentRegistry::new();
        let mut e = Employee::generate_random(1, &mut rng);
        e.morale = 2;
        let id = e.id;
        departments.assign(e, Department::Finance);
        let mut crises = vec![CrisisEvent::new("Cybersecurity Threat", "", 3, CrisisLevel::Catastrophic)];
        let mut events = Vec::new();
        advance(&mut crises, &mut company, &mut departments, &mut events);
        assert_eq!(crises[0].quarters_remaining, 2);
        assert_eq!(company.morale, -5);
        assert_eq!(company.risk, 5);
        assert_eq!(departments.find(id).map(|e| e.morale), Some(0));
        assert!(events[0].message.contains("2 quarters remaining"));
    }

    #[test]
    fn spawn_respects_cap() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut crises = Vec::new();
        for _ in 0..500 {
            maybe_spawn(&mut crises, &mut rng);
        }
        assert_eq!(crises.len(), MAX_ACTIVE_CRISES);
    }

    #[test]
    fn summary_lists_each_crisis() {
        assert_eq!(status_summary(&[]), "No active crises");
        let crises = vec![
            CrisisEvent::new("A", "", 2, CrisisLevel::Warning),
            CrisisEvent::new("B", "", 1, CrisisLevel::Catastrophic),
        ];
        assert_eq!(status_summary(&crises), "[!] A (2Q)\n[!!!] B (1Q)");
    }
}
