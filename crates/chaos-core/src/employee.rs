//! Employees, departments and the quarter-gated random employee generator.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Productivity multiplier for an employee working in their specialization.
pub const SPECIALIZATION_BONUS: f64 = 1.2;

/// Monthly salary before skill, experience and productivity scaling.
pub const BASE_MONTHLY_SALARY: i64 = 3000;

/// Names drawn for generated employees; the hiring pool uses all of them,
/// the plain generator only the first [`BASE_NAME_POOL`].
pub const NAMES: [&str; 30] = [
    "Alex Johnson",
    "Sarah Chen",
    "Michael Brown",
    "Emma Davis",
    "James Wilson",
    "Lisa Garcia",
    "David Miller",
    "Anna Rodriguez",
    "Chris Taylor",
    "Maria Lopez",
    "Robert Anderson",
    "Jennifer White",
    "Kevin Lee",
    "Amanda Clark",
    "Daniel Hall",
    "Jessica Martinez",
    "Ryan Thompson",
    "Ashley Lewis",
    "Brandon Walker",
    "Nicole Young",
    "Thomas Moore",
    "Rachel Kim",
    "Steven Wright",
    "Michelle Turner",
    "Jason Scott",
    "Laura Adams",
    "Mark Phillips",
    "Stephanie Hill",
    "Andrew Green",
    "Samantha Baker",
];

/// Size of the name pool used by [`Employee::generate_random`].
pub const BASE_NAME_POOL: usize = 20;

/// Functional departments of the company.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Department {
    Marketing,
    Operations,
    Finance,
    #[serde(rename = "HR")]
    Hr,
    #[serde(rename = "IT")]
    It,
    Research,
}

impl Department {
    /// All departments in declaration order.
    pub const ALL: [Department; 6] = [
        Department::Marketing,
        Department::Operations,
        Department::Finance,
        Department::Hr,
        Department::It,
        Department::Research,
    ];

    /// Stable slot index of the department.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Department::Marketing => "Marketing",
            Department::Operations => "Operations",
            Department::Finance => "Finance",
            Department::Hr => "HR",
            Department::It => "IT",
            Department::Research => "Research",
        }
    }

    /// Uniformly random department.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Seniority of an employee, ordinal 1..=5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkillLevel {
    Trainee = 1,
    Junior = 2,
    Mid = 3,
    Senior = 4,
    Expert = 5,
}

impl SkillLevel {
    /// Numeric ordinal used by salary scaling.
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// One step up, saturating at Expert.
    pub fn promoted(self) -> Self {
        match self {
            SkillLevel::Trainee => SkillLevel::Junior,
            SkillLevel::Junior => SkillLevel::Mid,
            SkillLevel::Mid => SkillLevel::Senior,
            SkillLevel::Senior | SkillLevel::Expert => SkillLevel::Expert,
        }
    }

    /// One step down, saturating at Trainee.
    pub fn demoted(self) -> Self {
        match self {
            SkillLevel::Trainee | SkillLevel::Junior => SkillLevel::Trainee,
            SkillLevel::Mid => SkillLevel::Junior,
            SkillLevel::Senior => SkillLevel::Mid,
            SkillLevel::Expert => SkillLevel::Senior,
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Personal risk profile of an employee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    VeryLow = 1,
    Low = 2,
    Medium = 3,
    High = 4,
    VeryHigh = 5,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::VeryLow,
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::VeryHigh,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Opaque employee identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub Uuid);

impl EmployeeId {
    /// Version-4 style id drawn from the simulation RNG so seeded runs stay reproducible.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let bytes: [u8; 16] = rng.gen();
        Self(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Hiring era, gating which seniority levels show up in the labor market.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HiringEra {
    /// Quarters 1..=5.
    Early,
    /// Quarters 6..=20.
    Mid,
    /// Quarter 21 onward.
    Late,
}

impl HiringEra {
    pub fn for_quarter(quarter: u32) -> Self {
        match quarter {
            0..=5 => HiringEra::Early,
            6..=20 => HiringEra::Mid,
            _ => HiringEra::Late,
        }
    }
}

/// A staff member, either on the bench or assigned to exactly one department.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    /// Department the employee currently works in, if any.
    pub assigned_department: Option<Department>,
    /// Base productivity, 0..=100.
    pub productivity: u8,
    /// Monthly salary.
    pub salary: Decimal,
    pub risk_level: RiskLevel,
    pub overall_skill: SkillLevel,
    pub specialization: Department,
    /// Years of experience.
    pub experience: u32,
    /// Personal morale, 0..=100.
    pub morale: u8,
    pub is_assigned: bool,
    pub quarter_hired: u32,
    pub position_description: String,
    pub skill_keywords: Vec<String>,
}

impl Employee {
    /// Productivity after morale scaling and the specialization bonus.
    pub fn effective_productivity(&self) -> f64 {
        let morale = f64::from(self.morale) / 100.0;
        let bonus = if self.assigned_department == Some(self.specialization) {
            SPECIALIZATION_BONUS
        } else {
            1.0
        };
        f64::from(self.productivity) * morale * bonus
    }

    /// Salary cost of one quarter (three months).
    pub fn quarterly_cost(&self) -> Decimal {
        self.salary * Decimal::from(3)
    }

    /// Shift personal morale, saturating at 0 and 100.
    pub fn adjust_morale(&mut self, delta: i32) {
        self.morale = (i32::from(self.morale) + delta).clamp(0, 100) as u8;
    }

    /// Shift base productivity, saturating at 0 and 100.
    pub fn adjust_productivity(&mut self, delta: i32) {
        self.productivity = (i32::from(self.productivity) + delta).clamp(0, 100) as u8;
    }

    /// Generate a random unassigned employee appropriate for `current_quarter`.
    ///
    /// Early quarters yield mostly Trainee/Junior staff; Experts only appear
    /// from quarter 6 on. Salary follows [`salary_for`].
    pub fn generate_random<R: Rng + ?Sized>(current_quarter: u32, rng: &mut R) -> Self {
        let id = EmployeeId::random(rng);
        let name = NAMES[rng.gen_range(0..BASE_NAME_POOL)].to_string();
        let mut employee = Employee {
            id,
            name,
            assigned_department: None,
            productivity: rng.gen_range(40..96),
            salary: Decimal::ZERO,
            risk_level: RiskLevel::random(rng),
            overall_skill: SkillLevel::Trainee,
            specialization: Department::random(rng),
            experience: rng.gen_range(0..15),
            morale: rng.gen_range(60..91),
            is_assigned: false,
            quarter_hired: current_quarter,
            position_description: String::new(),
            skill_keywords: Vec::new(),
        };
        employee.apply_era_restrictions(HiringEra::for_quarter(current_quarter), rng);
        employee.fill_position_details(rng);
        employee.salary = salary_for(
            employee.overall_skill,
            employee.experience,
            employee.productivity,
        );
        employee
    }

    /// Roll seniority, experience and productivity adjustments for the era.
    fn apply_era_restrictions<R: Rng + ?Sized>(&mut self, era: HiringEra, rng: &mut R) {
        let base = i32::from(self.productivity);
        let roll: f64 = rng.gen();
        let productivity = match era {
            HiringEra::Early => {
                if roll < 0.70 {
                    self.overall_skill = junior_or_trainee(rng, 0.6);
                    self.experience = rng.gen_range(0..3);
                    (base - rng.gen_range(0..20)).max(30)
                } else if roll < 0.95 {
                    self.overall_skill = SkillLevel::Mid;
                    self.experience = rng.gen_range(2..6);
                    base
                } else {
                    self.overall_skill = SkillLevel::Senior;
                    self.experience = rng.gen_range(5..10);
                    (base + rng.gen_range(0..15)).min(95)
                }
            }
            HiringEra::Mid => {
                if roll < 0.40 {
                    self.overall_skill = junior_or_trainee(rng, 0.5);
                    self.experience = rng.gen_range(0..4);
                    base
                } else if roll < 0.75 {
                    self.overall_skill = SkillLevel::Mid;
                    self.experience = rng.gen_range(2..8);
                    base
                } else if roll < 0.95 {
                    self.overall_skill = SkillLevel::Senior;
                    self.experience = rng.gen_range(5..12);
                    (base + rng.gen_range(0..10)).min(95)
                } else {
                    self.overall_skill = SkillLevel::Expert;
                    self.experience = rng.gen_range(8..15);
                    (base + rng.gen_range(5..20)).min(98)
                }
            }
            HiringEra::Late => {
                if roll < 0.20 {
                    self.overall_skill = junior_or_trainee(rng, 0.4);
                    self.experience = rng.gen_range(0..5);
                    base
                } else if roll < 0.50 {
                    self.overall_skill = SkillLevel::Mid;
                    self.experience = rng.gen_range(3..10);
                    base
                } else if roll < 0.85 {
                    self.overall_skill = SkillLevel::Senior;
                    self.experience = rng.gen_range(6..15);
                    (base + rng.gen_range(0..10)).min(95)
                } else {
                    self.overall_skill = SkillLevel::Expert;
                    self.experience = rng.gen_range(10..20);
                    (base + rng.gen_range(10..25)).min(100)
                }
            }
        };
        self.productivity = productivity.clamp(0, 100) as u8;
    }

    /// Pick a position blurb and 2..=4 skill keywords for the specialization.
    pub fn fill_position_details<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let template = position_template(self.specialization);
        let descriptions = template.descriptions;
        self.position_description = descriptions[rng.gen_range(0..descriptions.len())].to_string();
        let count = rng.gen_range(2..5);
        self.skill_keywords = template
            .keywords
            .choose_multiple(rng, count)
            .map(|k| k.to_string())
            .collect();
    }
}

fn junior_or_trainee<R: Rng + ?Sized>(rng: &mut R, trainee_chance: f64) -> SkillLevel {
    if rng.gen::<f64>() < trainee_chance {
        SkillLevel::Trainee
    } else {
        SkillLevel::Junior
    }
}

/// Monthly salary: `3000 × (1 + 0.3·skill + 0.1·experience) × productivity/100`,
/// rounded to whole dollars (ties to even).
pub fn salary_for(skill: SkillLevel, experience: u32, productivity: u8) -> Decimal {
    let skill = Decimal::new(3, 1) * Decimal::from(skill.ordinal());
    let experience = Decimal::new(1, 1) * Decimal::from(experience);
    let raw = Decimal::from(BASE_MONTHLY_SALARY)
        * (Decimal::ONE + skill + experience)
        * Decimal::from(productivity)
        / Decimal::ONE_HUNDRED;
    raw.round()
}

struct PositionTemplate {
    descriptions: &'static [&'static str],
    keywords: &'static [&'static str],
}

fn position_template(department: Department) -> PositionTemplate {
    match department {
        Department::Marketing => PositionTemplate {
            descriptions: &[
                "Brand strategist with creative campaign experience",
                "Digital marketing specialist focused on social media growth",
                "Market research analyst with consumer behavior expertise",
                "Content creator with strong storytelling abilities",
                "SEO/SEM specialist with data-driven approach",
                "Public relations coordinator with media connections",
            ],
            keywords: &[
                "campaigns",
                "branding",
                "social media",
                "analytics",
                "content",
                "SEO",
                "PR",
                "creative",
            ],
        },
        Department::Operations => PositionTemplate {
            descriptions: &[
                "Process optimization expert with lean methodology background",
                "Supply chain coordinator with vendor management skills",
                "Quality assurance specialist focused on continuous improvement",
                "Project manager with cross-functional team experience",
                "Operations analyst with efficiency optimization focus",
                "Logistics coordinator with distribution expertise",
            ],
            keywords: &[
                "processes",
                "supply chain",
                "quality",
                "logistics",
                "efficiency",
                "lean",
                "coordination",
            ],
        },
        Department::Finance => PositionTemplate {
            descriptions: &[
                "Financial analyst with budgeting and forecasting expertise",
                "Accounting specialist with regulatory compliance knowledge",
                "Investment advisor with portfolio management experience",
                "Cost analyst focused on expense optimization",
                "Tax specialist with corporate finance background",
                "Risk management analyst with audit experience",
            ],
            keywords: &[
                "budgeting",
                "forecasting",
                "compliance",
                "investments",
                "analysis",
                "auditing",
                "taxation",
            ],
        },
        Department::Hr => PositionTemplate {
            descriptions: &[
                "Talent acquisition specialist with recruitment expertise",
                "Employee relations coordinator focused on workplace culture",
                "Training and development specialist with learning programs",
                "Compensation analyst with benefits administration skills",
                "HR generalist with policy development experience",
                "Organizational development consultant with change management",
            ],
            keywords: &[
                "recruitment",
                "culture",
                "training",
                "benefits",
                "policies",
                "development",
                "relations",
            ],
        },
        Department::It => PositionTemplate {
            descriptions: &[
                "Software developer with full-stack development skills",
                "Systems administrator with network infrastructure expertise",
                "Cybersecurity specialist focused on threat prevention",
                "Database administrator with data management experience",
                "IT support technician with troubleshooting abilities",
                "DevOps engineer with automation and deployment skills",
            ],
            keywords: &[
                "programming",
                "systems",
                "security",
                "databases",
                "support",
                "automation",
                "networks",
            ],
        },
        Department::Research => PositionTemplate {
            descriptions: &[
                "Research scientist with experimental design expertise",
                "Data scientist with machine learning and analytics skills",
                "Product development specialist with innovation focus",
                "Market research analyst with statistical analysis background",
                "R&D engineer with prototype development experience",
                "Innovation consultant with emerging technology knowledge",
            ],
            keywords: &[
                "research",
                "data science",
                "innovation",
                "analysis",
                "development",
                "experimentation",
                "technology",
            ],
        },
    }
}
