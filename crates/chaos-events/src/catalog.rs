//! Flavor text and crisis templates.

use chaos_core::{CrisisEvent, CrisisLevel};
use rand::Rng;

pub(crate) const FUMBLES: &[&str] = &[
    "accidentally deleted critical files",
    "sent confidential data to wrong client",
    "made a costly calculation error",
    "missed an important deadline",
    "caused a system outage",
    "leaked sensitive information",
    "made a public relations blunder",
];

pub(crate) const BREAKTHROUGHS: &[&str] = &[
    "developed a cost-saving process",
    "discovered a new market opportunity",
    "created an innovative solution",
    "improved operational efficiency",
    "secured a major client",
    "solved a long-standing problem",
    "invented a game-changing feature",
];

pub(crate) const DISRUPTIONS: &[&str] = &[
    "New technology disrupts your market segment.",
    "Consumer preferences shift dramatically.",
    "Government regulations change overnight.",
    "Currency fluctuations affect international business.",
    "E-commerce platform changes algorithms.",
    "Viral social media trend impacts brand perception.",
    "Scientific breakthrough makes products obsolete.",
];

pub(crate) const COMPETITOR_MOVES: &[&str] = &[
    "launches aggressive price war",
    "poaches your key clients",
    "copies your business model",
    "spreads negative publicity",
    "files patent lawsuit",
    "undercuts your pricing by 30%",
    "releases competing product early",
];

pub(crate) const SCANDALS: &[&str] = &[
    "leaked internal emails reveal questionable practices",
    "former employee whistleblower goes public",
    "social media backlash over company policies",
    "executive caught in personal scandal",
    "data privacy violation discovered",
    "discriminatory hiring practices exposed",
    "environmental damage cover-up revealed",
    "tax avoidance scheme becomes public",
    "insider trading allegations surface",
];

pub(crate) const MISMANAGEMENT: &[&str] = &[
    "budget allocated to wrong department",
    "critical project deadline missed due to poor planning",
    "resources wasted on failed initiative",
    "communication breakdown between departments",
    "strategic decision backfires spectacularly",
    "vendor contract negotiated poorly",
    "talent acquisition strategy fails",
    "operational efficiency drops due to poor processes",
];

pub(crate) const POSITIVE_PR: &[&str] = &[
    "wins industry excellence award",
    "featured in major business magazine",
    "CEO gives inspiring keynote speech",
    "company's charity work gets recognition",
    "innovative product receives media praise",
    "workplace culture highlighted as exemplary",
    "sustainability efforts gain public attention",
    "employee volunteer program makes headlines",
];

pub(crate) const MISCOMMUNICATIONS: &[&str] = &[
    "critical information not shared between teams",
    "project requirements misunderstood",
    "client expectations not properly communicated",
    "deadline changes not relayed to all stakeholders",
    "budget constraints not communicated clearly",
    "policy changes cause confusion across departments",
    "meeting outcomes not documented or shared",
    "technical specifications lost in translation",
];

pub(crate) const TEAM_WINS: &[&str] = &[
    "successful company retreat boosts collaboration",
    "cross-department project exceeds expectations",
    "employee recognition program shows results",
    "mentorship program creates strong bonds",
    "innovation workshop generates breakthrough ideas",
    "company culture initiative improves satisfaction",
    "team lunch tradition strengthens relationships",
];

pub(crate) const DEFECTS: &[&str] = &[
    "manufacturing defect discovered in latest batch",
    "software bug causes customer data loss",
    "safety issue identified in product design",
    "quality control failure leads to recalls",
    "supplier provides substandard materials",
    "packaging defect damages product reputation",
    "performance issues reported by multiple customers",
    "compatibility problems with existing systems",
];

pub(crate) const QUALITY_WINS: &[&str] = &[
    "receives industry quality certification",
    "zero-defect milestone achieved",
    "customer satisfaction scores reach new high",
    "quality improvement process shows results",
    "supplier partnership enhances product quality",
    "rigorous testing prevents potential issues",
    "quality assurance team prevents major defect",
];

pub(crate) const CATASTROPHES: &[&str] = &[
    "major data breach exposes customer information",
    "factory fire destroys primary production facility",
    "class-action lawsuit filed against company",
    "regulatory investigation launched",
    "key patent invalidated by court ruling",
    "major client cancels all contracts",
    "cyber attack cripples company operations",
    "environmental disaster linked to company operations",
];

pub(crate) const RANDOM_CHAOS: &[&str] = &[
    "A TikTok about your company goes viral.",
    "Your office building gets featured in a reality TV show.",
    "A unicorn startup tries to acquire you with cryptocurrency.",
    "Your employees start a company-wide gaming tournament during work hours.",
    "Free pizza delivery mix-up leads to unexpected client meeting.",
    "CEO gets stuck in elevator with major investor.",
    "Company phone system gets hacked to only play elevator music.",
    "Intern accidentally redesigns company logo, everyone loves it.",
    "Office therapy dog becomes internet famous.",
    "Coffee machine breaks, productivity drops 50%.",
];

struct CrisisTemplate {
    title: &'static str,
    description: &'static str,
    quarters: u32,
    level: CrisisLevel,
}

const CRISES: &[CrisisTemplate] = &[
    CrisisTemplate {
        title: "Economic Recession Looming",
        description: "Market indicators suggest major downturn approaching",
        quarters: 3,
        level: CrisisLevel::Critical,
    },
    CrisisTemplate {
        title: "Industry Regulation Changes",
        description: "New compliance requirements will be mandatory",
        quarters: 2,
        level: CrisisLevel::Warning,
    },
    CrisisTemplate {
        title: "Technology Obsolescence",
        description: "Your core technology may become outdated",
        quarters: 4,
        level: CrisisLevel::Critical,
    },
    CrisisTemplate {
        title: "Major Competitor Merger",
        description: "Two rivals are planning to merge and dominate market",
        quarters: 2,
        level: CrisisLevel::Warning,
    },
    CrisisTemplate {
        title: "Supply Chain Crisis",
        description: "Critical suppliers facing major disruptions",
        quarters: 3,
        level: CrisisLevel::Critical,
    },
    CrisisTemplate {
        title: "Cybersecurity Threat",
        description: "Industry-wide security vulnerabilities discovered",
        quarters: 1,
        level: CrisisLevel::Catastrophic,
    },
    CrisisTemplate {
        title: "Environmental Regulations",
        description: "New green policies will affect operations",
        quarters: 4,
        level: CrisisLevel::Warning,
    },
];

/// Uniformly pick one entry of a non-empty table.
pub(crate) fn pick<R: Rng + ?Sized>(rng: &mut R, table: &[&'static str]) -> &'static str {
    table[rng.gen_range(0..table.len())]
}

/// Draw a fresh crisis from the template catalog.
pub(crate) fn random_crisis<R: Rng + ?Sized>(rng: &mut R) -> CrisisEvent {
    let t = &CRISES[rng.gen_range(0..CRISES.len())];
    CrisisEvent::new(t.title, t.description, t.quarters, t.level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn catalog_sizes() {
        assert_eq!(FUMBLES.len(), 7);
        assert_eq!(SCANDALS.len(), 9);
        assert_eq!(CATASTROPHES.len(), 8);
        assert_eq!(RANDOM_CHAOS.len(), 10);
        assert_eq!(CRISES.len(), 7);
    }

    #[test]
    fn crisis_templates_last_one_to_four_quarters() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let c = random_crisis(&mut rng);
            assert!((1..=4).contains(&c.quarters_remaining));
            assert!(c.is_active);
            assert_ne!(c.level, CrisisLevel::None);
        }
    }
}
