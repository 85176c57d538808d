//! Candidate pool generation.
//!
//! Candidate quality follows HR strength, reputation and morale; better
//! hiring conditions yield more, stronger and safer candidates.

use chaos_core::employee::{salary_for, NAMES};
use chaos_core::{
    Company, Department, DepartmentRegistry, Employee, EmployeeId, HiringEra, RiskLevel,
    SkillLevel,
};
use rand::Rng;
use rust_decimal::Decimal;

/// Candidate refreshes allowed per quarter.
pub const MAX_REFRESHES_PER_QUARTER: u32 = 5;
pub const MIN_CANDIDATES: usize = 3;
pub const MAX_CANDIDATES: usize = 8;

/// Hiring quality in `[0, 1]`.
///
/// `0.3 + 0.4·hr + 0.3·reputation + 0.3·morale`, capped at 1, where `hr` is
/// the average HR productivity over 100 (0 with no HR staff) and the other two
/// terms map `[-100, 100]` onto `[0, 1]`.
pub fn hiring_quality(company: &Company, departments: &DepartmentRegistry) -> f64 {
    let hr = departments.get(Department::Hr);
    let hr_quality = if hr.employees.is_empty() {
        0.0
    } else {
        (hr.total_productivity() / hr.employee_count() as f64 / 100.0).min(1.0)
    };
    let reputation_quality = (f64::from(company.reputation + 100) / 200.0).max(0.0);
    let morale_quality = (f64::from(company.morale + 100) / 200.0).max(0.0);
    (0.3 + hr_quality * 0.4 + reputation_quality * 0.3 + morale_quality * 0.3).min(1.0)
}

/// Number of candidates offered at a given quality.
pub fn candidate_count(quality: f64) -> usize {
    ((3.0 + quality * 5.0) as usize).clamp(MIN_CANDIDATES, MAX_CANDIDATES)
}

/// A fresh candidate list for `quarter`.
pub fn generate_candidates<R: Rng + ?Sized>(
    company: &Company,
    departments: &DepartmentRegistry,
    quarter: u32,
    rng: &mut R,
) -> Vec<Employee> {
    let quality = hiring_quality(company, departments);
    (0..candidate_count(quality))
        .map(|_| quality_candidate(quality, quarter, rng))
        .collect()
}

/// One candidate shaped by the era of `quarter` and the hiring quality.
pub fn quality_candidate<R: Rng + ?Sized>(quality: f64, quarter: u32, rng: &mut R) -> Employee {
    let id = EmployeeId::random(rng);
    let name = NAMES[rng.gen_range(0..NAMES.len())].to_string();
    let specialization = Department::random(rng);

    let (mut skill, mut experience, mut productivity) =
        era_profile(HiringEra::for_quarter(quarter), rng);
    let morale;
    if quality >= 0.8 {
        productivity = (productivity + rng.gen_range(5..15)).min(100);
        morale = rng.gen_range(75..95);
        if rng.gen::<f64>() < 0.3 && skill < SkillLevel::Expert {
            skill = skill.promoted();
            experience += rng.gen_range(1..3);
        }
    } else if quality >= 0.6 {
        productivity = (productivity + rng.gen_range(0..10)).min(100);
        morale = rng.gen_range(65..85);
    } else if quality >= 0.4 {
        morale = rng.gen_range(55..80);
    } else {
        productivity = (productivity - rng.gen_range(5..15)).max(20);
        morale = rng.gen_range(40..70);
        if rng.gen::<f64>() < 0.2 && skill > SkillLevel::Trainee {
            skill = skill.demoted();
            experience = experience.saturating_sub(rng.gen_range(1..3));
        }
    }

    let mut employee = Employee {
        id,
        name,
        assigned_department: None,
        productivity: productivity.clamp(0, 100) as u8,
        salary: Decimal::ZERO,
        risk_level: RiskLevel::Medium,
        overall_skill: skill,
        specialization,
        experience,
        morale,
        is_assigned: false,
        quarter_hired: 0,
        position_description: String::new(),
        skill_keywords: Vec::new(),
    };
    employee.fill_position_details(rng);
    employee.risk_level = candidate_risk(quality, rng);
    employee.salary = salary_for(
        employee.overall_skill,
        employee.experience,
        employee.productivity,
    );
    employee
}

/// Seniority, experience and base productivity for the era's tier roll.
fn era_profile<R: Rng + ?Sized>(era: HiringEra, rng: &mut R) -> (SkillLevel, u32, i32) {
    let roll: f64 = rng.gen();
    match era {
        HiringEra::Early => {
            if roll < 0.70 {
                let skill = trainee_or_junior(rng, 0.6);
                (skill, rng.gen_range(0..3), rng.gen_range(30..70))
            } else if roll < 0.95 {
                (SkillLevel::Mid, rng.gen_range(2..6), rng.gen_range(50..80))
            } else {
                (SkillLevel::Senior, rng.gen_range(5..10), rng.gen_range(70..90))
            }
        }
        HiringEra::Mid => {
            if roll < 0.40 {
                let skill = trainee_or_junior(rng, 0.5);
                (skill, rng.gen_range(0..4), rng.gen_range(35..75))
            } else if roll < 0.75 {
                (SkillLevel::Mid, rng.gen_range(2..8), rng.gen_range(55..85))
            } else if roll < 0.95 {
                (SkillLevel::Senior, rng.gen_range(5..12), rng.gen_range(70..95))
            } else {
                (SkillLevel::Expert, rng.gen_range(8..15), rng.gen_range(80..98))
            }
        }
        HiringEra::Late => {
            if roll < 0.20 {
                let skill = trainee_or_junior(rng, 0.4);
                (skill, rng.gen_range(0..5), rng.gen_range(40..80))
            } else if roll < 0.50 {
                (SkillLevel::Mid, rng.gen_range(3..10), rng.gen_range(60..90))
            } else if roll < 0.85 {
                (SkillLevel::Senior, rng.gen_range(6..15), rng.gen_range(75..98))
            } else {
                (SkillLevel::Expert, rng.gen_range(10..20), rng.gen_range(85..100))
            }
        }
    }
}

fn trainee_or_junior<R: Rng + ?Sized>(rng: &mut R, trainee_chance: f64) -> SkillLevel {
    if rng.gen::<f64>() < trainee_chance {
        SkillLevel::Trainee
    } else {
        SkillLevel::Junior
    }
}

/// Better hiring screens out risky candidates.
fn candidate_risk<R: Rng + ?Sized>(quality: f64, rng: &mut R) -> RiskLevel {
    let range = if quality >= 0.7 {
        0..2
    } else if quality >= 0.5 {
        0..3
    } else {
        1..5
    };
    RiskLevel::ALL[rng.gen_range(range)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn neutral_company_without_hr() {
        let quality = hiring_quality(&Company::default(), &DepartmentRegistry::new());
        // 0.3 + 0.3 * 0.5 + 0.3 * 0.5
        assert!((quality - 0.6).abs() < 1e-12);
        assert_eq!(candidate_count(quality), 6);
    }

    #[test]
    fn count_bounds() {
        assert_eq!(candidate_count(0.0), 3);
        assert_eq!(candidate_count(0.39), 4);
        assert_eq!(candidate_count(1.0), 8);
    }

    #[test]
    fn strong_hr_caps_quality() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut departments = DepartmentRegistry::new();
        let mut recruiter = Employee::generate_random(1, &mut rng);
        recruiter.productivity = 100;
        recruiter.morale = 100;
        recruiter.specialization = Department::Hr;
        departments.assign(recruiter, Department::Hr);
        let mut company = Company::default();
        company.reputation = 100;
        company.morale = 100;
        assert_eq!(hiring_quality(&company, &departments), 1.0);
    }

    #[test]
    fn early_candidates_are_never_experts() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..500 {
            let c = quality_candidate(0.6, 3, &mut rng);
            assert_ne!(c.overall_skill, SkillLevel::Expert);
            assert!(!c.is_assigned);
            assert_eq!(c.salary, salary_for(c.overall_skill, c.experience, c.productivity));
        }
    }

    #[test]
    fn good_hiring_only_offers_low_risk() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        for _ in 0..200 {
            let c = quality_candidate(0.75, 40, &mut rng);
            assert!(c.risk_level <= RiskLevel::Low);
            assert!((65..85).contains(&c.morale));
        }
    }

    proptest! {
        #[test]
        fn candidates_stay_in_range(
            seed in any::<u64>(),
            quality in 0.0f64..=1.0,
            quarter in 1u32..=120,
        ) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let c = quality_candidate(quality, quarter, &mut rng);
            prop_assert!(c.productivity >= 20 && c.productivity <= 100);
            prop_assert!(c.morale >= 40 && c.morale < 95);
            prop_assert!((2..=4).contains(&c.skill_keywords.len()));
        }
    }
}
