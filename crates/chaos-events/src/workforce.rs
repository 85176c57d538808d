//! Per-department employee events and morale-driven turnover.

use chaos_core::{
    scale, thousands, Company, Department, DepartmentRegistry, DepartmentStats, SkillLevel,
};
use chaos_econ::turnover_chance;
use rand::Rng;
use rust_decimal::Decimal;

use crate::catalog::{pick, BREAKTHROUGHS, FUMBLES};
use crate::effect::{ChaosEvent, Effect, EventKind};

pub const SCOUTING_CHANCE: f64 = 0.15;
pub const POACH_CHANCE: f64 = 0.6;
pub const FUMBLE_CHANCE: f64 = 0.12;
pub const RETIREMENT_CHANCE: f64 = 0.08;
pub const BREAKTHROUGH_CHANCE: f64 = 0.10;
/// Fraction of monthly salary granted as a retention raise.
pub const RETENTION_RAISE: f64 = 0.3;
/// Capital charged per unit of monthly raise when retaining a scouted employee.
pub const RETENTION_COST_MONTHS: i64 = 4;

/// Roll scouting, fumble, retirement and breakthrough in every staffed department.
pub(crate) fn employee_events<R: Rng + ?Sized>(
    company: &mut Company,
    departments: &mut DepartmentRegistry,
    rng: &mut R,
) -> Vec<ChaosEvent> {
    let mut events = Vec::new();
    for department in Department::ALL {
        let stats = departments.get_mut(department);
        if stats.employees.is_empty() {
            continue;
        }

        if rng.gen::<f64>() < SCOUTING_CHANCE {
            let index = rng.gen_range(0..stats.employees.len());
            if stats.employees[index].overall_skill >= SkillLevel::Senior {
                events.push(scouting(stats, index, company, rng));
            }
        }

        if rng.gen::<f64>() < FUMBLE_CHANCE && !stats.employees.is_empty() {
            let index = rng.gen_range(0..stats.employees.len());
            events.push(fumble(stats, index, company, rng));
        }

        if rng.gen::<f64>() < RETIREMENT_CHANCE {
            if let Some(index) = stats.employees.iter().position(|e| e.experience > 10) {
                events.push(retirement(stats, index, company, rng));
            }
        }

        if rng.gen::<f64>() < BREAKTHROUGH_CHANCE {
            if let Some(index) = stats
                .employees
                .iter()
                .position(|e| e.overall_skill >= SkillLevel::Mid)
            {
                events.push(breakthrough(stats, index, company, rng));
            }
        }
    }
    events
}

fn scouting<R: Rng + ?Sized>(
    stats: &mut DepartmentStats,
    index: usize,
    company: &mut Company,
    rng: &mut R,
) -> ChaosEvent {
    let department = stats.department;
    let offer = scale(stats.employees[index].salary, rng.gen::<f64>() + 1.5);
    if rng.gen::<f64>() < POACH_CHANCE {
        let employee = stats.release(index);
        let effect = Effect {
            morale: -5,
            reputation: -2,
            ..Effect::default()
        };
        effect.apply(company);
        ChaosEvent::in_department(
            EventKind::TalentPoached,
            department,
            effect,
            format!(
                "TALENT POACHED! {} from {} was scouted by competitors for ${}! Morale -5, Reputation -2",
                employee.name,
                department,
                thousands(offer)
            ),
        )
    } else {
        let employee = &mut stats.employees[index];
        let raise = scale(employee.salary, RETENTION_RAISE);
        employee.salary += raise;
        let effect = Effect {
            capital: -(raise * Decimal::from(RETENTION_COST_MONTHS)),
            ..Effect::default()
        };
        effect.apply(company);
        ChaosEvent::in_department(
            EventKind::RetentionRaise,
            department,
            effect.clone(),
            format!(
                "RETENTION BONUS! {} received a ${}/month raise to stay. Immediate cost: ${}",
                employee.name,
                thousands(raise),
                thousands(-effect.capital)
            ),
        )
    }
}

fn fumble<R: Rng + ?Sized>(
    stats: &mut DepartmentStats,
    index: usize,
    company: &mut Company,
    rng: &mut R,
) -> ChaosEvent {
    let department = stats.department;
    let mishap = pick(rng, FUMBLES);
    let mut cost = Decimal::from(rng.gen_range(5_000..25_000));
    let mut reputation_loss = rng.gen_range(3..8);
    let morale_loss = rng.gen_range(2..6);

    let employee = &mut stats.employees[index];
    if employee.overall_skill >= SkillLevel::Senior {
        cost *= Decimal::from(2);
        reputation_loss += 3;
    }
    employee.adjust_morale(-15);

    let effect = Effect {
        capital: -cost,
        reputation: -reputation_loss,
        morale: -morale_loss,
        ..Effect::default()
    };
    effect.apply(company);
    ChaosEvent::in_department(
        EventKind::EmployeeFumble,
        department,
        effect,
        format!(
            "EMPLOYEE FUMBLE! {} ({}) {}! Cost: ${}, Reputation -{}, Morale -{}",
            employee.name,
            department,
            mishap,
            thousands(cost),
            reputation_loss,
            morale_loss
        ),
    )
}

fn retirement<R: Rng + ?Sized>(
    stats: &mut DepartmentStats,
    index: usize,
    company: &mut Company,
    rng: &mut R,
) -> ChaosEvent {
    let department = stats.department;
    // Measured while still assigned, so the specialization bonus counts.
    let knowledge_loss = stats.employees[index].effective_productivity() * 0.5;
    let employee = stats.release(index);
    let party_cost = Decimal::from(rng.gen_range(2_000..8_000));
    let effect = Effect {
        capital: -party_cost,
        morale: 3 - (knowledge_loss / 10.0) as i32,
        ..Effect::default()
    };
    effect.apply(company);
    ChaosEvent::in_department(
        EventKind::Retirement,
        department,
        effect,
        format!(
            "RETIREMENT! {} from {} retired after {} years. Knowledge loss: {:.1}, Party cost: ${}",
            employee.name,
            department,
            employee.experience,
            knowledge_loss,
            thousands(party_cost)
        ),
    )
}

fn breakthrough<R: Rng + ?Sized>(
    stats: &mut DepartmentStats,
    index: usize,
    company: &mut Company,
    rng: &mut R,
) -> ChaosEvent {
    let department = stats.department;
    let idea = pick(rng, BREAKTHROUGHS);
    let benefit = Decimal::from(rng.gen_range(15_000..50_000));
    let reputation_gain = rng.gen_range(2..6);
    let morale_gain = rng.gen_range(3..8);

    let employee = &mut stats.employees[index];
    employee.adjust_morale(20);
    employee.adjust_productivity(5);

    let effect = Effect {
        capital: benefit,
        reputation: reputation_gain,
        morale: morale_gain,
        ..Effect::default()
    };
    effect.apply(company);
    ChaosEvent::in_department(
        EventKind::Breakthrough,
        department,
        effect,
        format!(
            "BREAKTHROUGH! {} ({}) {}! Benefit: ${}, Reputation +{}, Morale +{}",
            employee.name,
            department,
            idea,
            thousands(benefit),
            reputation_gain,
            morale_gain
        ),
    )
}

/// Roll every employee against the company turnover chance, boosted for
/// personally unhappy staff (x1.5 below 30 morale, a further x2 below 10).
pub(crate) fn morale_turnover<R: Rng + ?Sized>(
    company: &mut Company,
    departments: &mut DepartmentRegistry,
    rng: &mut R,
) -> Vec<ChaosEvent> {
    let base = turnover_chance(company.morale);
    let mut events = Vec::new();
    for stats in departments.iter_mut() {
        let department = stats.department;
        let roster = std::mem::take(&mut stats.employees);
        let mut leaving = Vec::new();
        for employee in roster {
            let mut chance = base;
            if employee.morale < 30 {
                chance *= 1.5;
            }
            if employee.morale < 10 {
                chance *= 2.0;
            }
            if rng.gen::<f64>() < chance {
                leaving.push(employee);
            } else {
                stats.employees.push(employee);
            }
        }
        for employee in leaving {
            let effect = Effect {
                morale: -2,
                ..Effect::default()
            };
            effect.apply(company);
            events.push(ChaosEvent::in_department(
                EventKind::EmployeeQuit,
                department,
                effect,
                format!(
                    "EMPLOYEE QUIT! {} from {} left due to low morale. Company morale -2",
                    employee.name, department
                ),
            ));
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaos_core::Employee;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn staffed(rng: &mut ChaCha8Rng, per_department: usize, quarter: u32) -> DepartmentRegistry {
        let mut departments = DepartmentRegistry::new();
        for d in Department::ALL {
            for _ in 0..per_department {
                departments.assign(Employee::generate_random(quarter, rng), d);
            }
        }
        departments
    }

    #[test]
    fn retirement_removes_veteran_and_nets_morale() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut departments = DepartmentRegistry::new();
        let mut vet = Employee::generate_random(30, &mut rng);
        vet.experience = 15;
        vet.productivity = 80;
        vet.morale = 100;
        vet.specialization = Department::Finance;
        departments.assign(vet, Department::Finance);
        let mut company = Company::default();
        let stats = departments.get_mut(Department::Finance);
        let event = retirement(stats, 0, &mut company, &mut rng);
        // knowledge loss 80 * 1.0 * 1.2 * 0.5 = 48 -> morale -4, party +3
        assert_eq!(company.morale, -1);
        assert_eq!(event.kind, EventKind::Retirement);
        assert_eq!(departments.employee_count(), 0);
        assert!(company.capital < Decimal::from(500_000));
    }

    #[test]
    fn senior_fumble_costs_double_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut departments = DepartmentRegistry::new();
        let mut senior = Employee::generate_random(1, &mut rng);
        senior.overall_skill = SkillLevel::Senior;
        senior.morale = 10;
        departments.assign(senior, Department::It);
        let mut company = Company::default();
        let event = fumble(departments.get_mut(Department::It), 0, &mut company, &mut rng);
        assert!(event.effect.capital <= Decimal::from(-10_000));
        assert!(event.effect.reputation <= -6);
        assert_eq!(departments.get(Department::It).employees[0].morale, 0);
    }

    #[test]
    fn breakthrough_caps_personal_stats() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let mut departments = DepartmentRegistry::new();
        let mut star = Employee::generate_random(1, &mut rng);
        star.productivity = 98;
        star.morale = 90;
        departments.assign(star, Department::Research);
        let mut company = Company::default();
        breakthrough(departments.get_mut(Department::Research), 0, &mut company, &mut rng);
        let e = &departments.get(Department::Research).employees[0];
        assert_eq!(e.productivity, 100);
        assert_eq!(e.morale, 100);
        assert!(company.capital >= Decimal::from(515_000));
    }

    #[test]
    fn miserable_staff_leave_more_often() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut happy = staffed(&mut rng, 20, 10);
        let mut sad = happy.clone();
        for e in sad.employees_mut() {
            e.morale = 5;
        }
        let mut company = Company::default();
        let happy_quits = morale_turnover(&mut company, &mut happy, &mut ChaCha8Rng::seed_from_u64(4)).len();
        let mut company = Company::default();
        let sad_quits = morale_turnover(&mut company, &mut sad, &mut ChaCha8Rng::seed_from_u64(4)).len();
        assert!(sad_quits > happy_quits);
        assert_eq!(company.morale, -2 * sad_quits as i32);
        assert_eq!(sad.employee_count(), 120 - sad_quits);
    }

    proptest! {
        #[test]
        fn employee_events_keep_roster_consistent(seed in any::<u64>()) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut departments = staffed(&mut rng, 3, 30);
            let before = departments.employee_count();
            let mut company = Company::default();
            let events = employee_events(&mut company, &mut departments, &mut rng);
            let departures = events
                .iter()
                .filter(|e| matches!(e.kind, EventKind::TalentPoached | EventKind::Retirement))
                .count();
            prop_assert_eq!(departments.employee_count(), before - departures);
            prop_assert!(departments.validate().is_ok());
        }
    }
}
