//! Company-wide events: market swings, reputation, morale, risk and pure chaos.

use chaos_core::{scale, thousands, Company};
use chaos_econ::catastrophic_event_chance;
use rand::Rng;
use rust_decimal::Decimal;

use crate::catalog::{
    pick, CATASTROPHES, COMPETITOR_MOVES, DEFECTS, DISRUPTIONS, MISCOMMUNICATIONS,
    MISMANAGEMENT, POSITIVE_PR, QUALITY_WINS, RANDOM_CHAOS, SCANDALS, TEAM_WINS,
};
use crate::effect::{ChaosEvent, Effect, EventKind};

pub const DISRUPTION_CHANCE: f64 = 0.25;
pub const COMPETITOR_CHANCE: f64 = 0.20;
pub const SCANDAL_CHANCE: f64 = 0.15;
pub const MISMANAGEMENT_CHANCE: f64 = 0.12;
pub const POSITIVE_PR_CHANCE: f64 = 0.08;
pub const MISCOMMUNICATION_CHANCE: f64 = 0.18;
pub const TEAM_SUCCESS_CHANCE: f64 = 0.10;
pub const DEFECT_CHANCE: f64 = 0.12;
pub const RECALL_CHANCE: f64 = 0.3;
pub const QUALITY_CHANCE: f64 = 0.08;
pub const RANDOM_CHAOS_CHANCE: f64 = 0.20;

fn money<R: Rng + ?Sized>(rng: &mut R, low: i64, high: i64) -> Decimal {
    Decimal::from(rng.gen_range(low..high))
}

/// Capital base for percentage losses; a company already in debt loses nothing more.
fn exposed(company: &Company) -> Decimal {
    company.capital.max(Decimal::ZERO)
}

fn emit(company: &mut Company, kind: EventKind, effect: Effect, message: String) -> ChaosEvent {
    effect.apply(company);
    ChaosEvent::company(kind, effect, message)
}

/// Market disruption and competitor action, both scaled by risk appetite.
pub(crate) fn market_events<R: Rng + ?Sized>(
    company: &mut Company,
    rng: &mut R,
) -> Vec<ChaosEvent> {
    let multiplier = company.risk_appetite.chaos_multiplier();
    let mut events = Vec::new();

    if rng.gen::<f64>() < DISRUPTION_CHANCE * multiplier {
        let headline = pick(rng, DISRUPTIONS);
        if rng.gen_bool(0.5) {
            let loss = scale(exposed(company), rng.gen::<f64>() * 0.10 + 0.05);
            let share_loss = rng.gen_range(2.0..6.0);
            let effect = Effect {
                capital: -loss,
                market_share: -share_loss,
                ..Effect::default()
            };
            let message = format!(
                "MARKET DISRUPTION! {} Capital -${}, Market share -{:.1}%",
                headline,
                thousands(loss),
                share_loss
            );
            events.push(emit(company, EventKind::MarketDisruption, effect, message));
        } else {
            let gain = money(rng, 20_000, 60_000);
            let share_gain = rng.gen::<f64>() + 0.5;
            let effect = Effect {
                capital: gain,
                market_share: share_gain,
                ..Effect::default()
            };
            let message = format!(
                "MARKET OPPORTUNITY! {} Capital +${}, Market share +{:.1}%",
                headline,
                thousands(gain),
                share_gain
            );
            events.push(emit(company, EventKind::MarketOpportunity, effect, message));
        }
    }

    if rng.gen::<f64>() < COMPETITOR_CHANCE * multiplier {
        let action = pick(rng, COMPETITOR_MOVES);
        let impact = money(rng, 10_000, 40_000);
        let reputation_loss = rng.gen_range(2..7);
        let mut share_loss = 0.5 + rng.gen::<f64>();
        if company.market_share >= 30.0 {
            share_loss *= 1.5;
        }
        if company.market_share >= 50.0 {
            share_loss *= 2.0;
        }
        if company.market_share >= 60.0 {
            share_loss *= 2.5;
        }
        let effect = Effect {
            capital: -impact,
            reputation: -reputation_loss,
            market_share: -share_loss,
            risk: 5,
            ..Effect::default()
        };
        let message = format!(
            "COMPETITOR ATTACK! A rival {}! Capital -${}, Reputation -{}, Market share -{:.1}%, Risk +{}",
            action,
            thousands(impact),
            reputation_loss,
            share_loss,
            effect.risk
        );
        events.push(emit(company, EventKind::CompetitorAttack, effect, message));
    }

    events
}

/// Scandal, mismanagement and positive press.
pub(crate) fn reputation_events<R: Rng + ?Sized>(
    company: &mut Company,
    rng: &mut R,
) -> Vec<ChaosEvent> {
    let mut events = Vec::new();

    if rng.gen::<f64>() < SCANDAL_CHANCE {
        let what = pick(rng, SCANDALS);
        let reputation_loss = rng.gen_range(15..35);
        let morale_loss = rng.gen_range(10..20);
        let cost = money(rng, 50_000, 150_000);
        let effect = Effect {
            capital: -cost,
            reputation: -reputation_loss,
            morale: -morale_loss,
            risk: 10,
            ..Effect::default()
        };
        let message = format!(
            "SCANDAL! News breaks that {}. Reputation -{}, Morale -{}, Damage control -${}",
            what,
            reputation_loss,
            morale_loss,
            thousands(cost)
        );
        events.push(emit(company, EventKind::Scandal, effect, message));
    }

    if rng.gen::<f64>() < MISMANAGEMENT_CHANCE {
        let what = pick(rng, MISMANAGEMENT);
        let morale_loss = rng.gen_range(8..18);
        let reputation_loss = rng.gen_range(5..12);
        let cost = money(rng, 25_000, 75_000);
        let effect = Effect {
            capital: -cost,
            reputation: -reputation_loss,
            morale: -morale_loss,
            risk: 5,
            ..Effect::default()
        };
        let message = format!(
            "MISMANAGEMENT! {}. Morale -{}, Reputation -{}, Cost -${}",
            capitalize(what),
            morale_loss,
            reputation_loss,
            thousands(cost)
        );
        events.push(emit(company, EventKind::Mismanagement, effect, message));
    }

    if company.reputation > 20 && rng.gen::<f64>() < POSITIVE_PR_CHANCE {
        let what = pick(rng, POSITIVE_PR);
        let reputation_gain = rng.gen_range(8..20);
        let morale_gain = rng.gen_range(5..15);
        let benefit = money(rng, 15_000, 45_000);
        let effect = Effect {
            capital: benefit,
            reputation: reputation_gain,
            morale: morale_gain,
            ..Effect::default()
        };
        let message = format!(
            "POSITIVE PR! Your company {}. Reputation +{}, Morale +{}, Capital +${}",
            what,
            reputation_gain,
            morale_gain,
            thousands(benefit)
        );
        events.push(emit(company, EventKind::PositivePr, effect, message));
    }

    events
}

/// Miscommunication when morale is poor, team success when it is good.
pub(crate) fn morale_events<R: Rng + ?Sized>(
    company: &mut Company,
    rng: &mut R,
) -> Vec<ChaosEvent> {
    let mut events = Vec::new();

    if company.morale < -20 && rng.gen::<f64>() < MISCOMMUNICATION_CHANCE {
        let what = pick(rng, MISCOMMUNICATIONS);
        let morale_loss = rng.gen_range(10..20);
        let cost = money(rng, 15_000, 40_000);
        let reputation_loss = rng.gen_range(3..8);
        let effect = Effect {
            capital: -cost,
            reputation: -reputation_loss,
            morale: -morale_loss,
            risk: 3,
            ..Effect::default()
        };
        let message = format!(
            "MISCOMMUNICATION! {}. Morale -{}, Cost -${}, Reputation -{}",
            capitalize(what),
            morale_loss,
            thousands(cost),
            reputation_loss
        );
        events.push(emit(company, EventKind::Miscommunication, effect, message));
    }

    if company.morale > 10 && rng.gen::<f64>() < TEAM_SUCCESS_CHANCE {
        let what = pick(rng, TEAM_WINS);
        let morale_gain = rng.gen_range(8..18);
        let reputation_gain = rng.gen_range(2..6);
        let effect = Effect {
            reputation: reputation_gain,
            morale: morale_gain,
            ..Effect::default()
        };
        let message = format!(
            "TEAM SUCCESS! {}. Morale +{}, Reputation +{}",
            capitalize(what),
            morale_gain,
            reputation_gain
        );
        events.push(emit(company, EventKind::TeamSuccess, effect, message));
    }

    events
}

/// Product defects, possibly escalating to a recall, and quality wins for low-risk companies.
pub(crate) fn risk_events<R: Rng + ?Sized>(
    company: &mut Company,
    rng: &mut R,
) -> Vec<ChaosEvent> {
    let mut events = Vec::new();

    if rng.gen::<f64>() < DEFECT_CHANCE {
        let what = pick(rng, DEFECTS);
        if rng.gen::<f64>() < RECALL_CHANCE {
            let reputation_loss = rng.gen_range(25..45);
            let cost = money(rng, 100_000, 300_000);
            let morale_loss = rng.gen_range(15..25);
            let effect = Effect {
                capital: -cost,
                reputation: -reputation_loss,
                morale: -morale_loss,
                risk: 15,
                ..Effect::default()
            };
            let message = format!(
                "MASS RECALL! {}. Reputation -{}, Recall cost -${}, Morale -{}",
                capitalize(what),
                reputation_loss,
                thousands(cost),
                morale_loss
            );
            events.push(emit(company, EventKind::MassRecall, effect, message));
        } else {
            let reputation_loss = rng.gen_range(8..18);
            let cost = money(rng, 20_000, 60_000);
            let morale_loss = rng.gen_range(5..12);
            let effect = Effect {
                capital: -cost,
                reputation: -reputation_loss,
                morale: -morale_loss,
                risk: 5,
                ..Effect::default()
            };
            let message = format!(
                "PRODUCT DEFECT! {}. Reputation -{}, Fix cost -${}, Morale -{}",
                capitalize(what),
                reputation_loss,
                thousands(cost),
                morale_loss
            );
            events.push(emit(company, EventKind::ProductDefect, effect, message));
        }
    }

    if company.risk < -10 && rng.gen::<f64>() < QUALITY_CHANCE {
        let what = pick(rng, QUALITY_WINS);
        let reputation_gain = rng.gen_range(10..20);
        let morale_gain = rng.gen_range(8..15);
        let benefit = money(rng, 25_000, 60_000);
        let effect = Effect {
            capital: benefit,
            reputation: reputation_gain,
            morale: morale_gain,
            risk: -8,
            ..Effect::default()
        };
        let message = format!(
            "QUALITY SUCCESS! Company {}. Reputation +{}, Morale +{}, Capital +${}",
            what,
            reputation_gain,
            morale_gain,
            thousands(benefit)
        );
        events.push(emit(company, EventKind::QualitySuccess, effect, message));
    }

    events
}

/// Roll against [`catastrophic_event_chance`] for the current risk.
pub(crate) fn catastrophic_event<R: Rng + ?Sized>(
    company: &mut Company,
    rng: &mut R,
) -> Option<ChaosEvent> {
    if rng.gen::<f64>() >= catastrophic_event_chance(company.risk) {
        return None;
    }
    let what = pick(rng, CATASTROPHES);
    let reputation_loss = rng.gen_range(30..60);
    let loss = scale(exposed(company), rng.gen::<f64>() * 0.15 + 0.10);
    let morale_loss = rng.gen_range(20..40);
    let effect = Effect {
        capital: -loss,
        reputation: -reputation_loss,
        morale: -morale_loss,
        risk: 20,
        ..Effect::default()
    };
    let message = format!(
        "CATASTROPHE! {}! Reputation -{}, Capital -${}, Morale -{}",
        capitalize(what),
        reputation_loss,
        thousands(loss),
        morale_loss
    );
    Some(emit(company, EventKind::Catastrophe, effect, message))
}

/// Flavor event with a small coin-flip payoff.
pub(crate) fn random_chaos<R: Rng + ?Sized>(
    company: &mut Company,
    rng: &mut R,
) -> Option<ChaosEvent> {
    if rng.gen::<f64>() >= RANDOM_CHAOS_CHANCE {
        return None;
    }
    let what = pick(rng, RANDOM_CHAOS);
    if rng.gen_bool(0.5) {
        let bonus = money(rng, 5_000, 25_000);
        let morale_gain = rng.gen_range(5..15);
        let effect = Effect {
            capital: bonus,
            morale: morale_gain,
            ..Effect::default()
        };
        let message = format!(
            "RANDOM CHAOS: {} Unexpected bonus: ${}, Morale +{}",
            what,
            thousands(bonus),
            morale_gain
        );
        Some(emit(company, EventKind::RandomWindfall, effect, message))
    } else {
        let cost = money(rng, 3_000, 15_000);
        let morale_loss = rng.gen_range(2..8);
        let effect = Effect {
            capital: -cost,
            morale: -morale_loss,
            ..Effect::default()
        };
        let message = format!(
            "RANDOM CHAOS: {} Unexpected cost: ${}, Morale -{}",
            what,
            thousands(cost),
            morale_loss
        );
        Some(emit(company, EventKind::RandomSetback, effect, message))
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
