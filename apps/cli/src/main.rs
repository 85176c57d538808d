#![deny(warnings)]

//! Headless host for Corporate Chaos.
//!
//! Runs a seeded autopilot company from the first quarter to game over,
//! printing per-quarter KPIs, autosaving along the way and recording the
//! finished run on the leaderboard.

use anyhow::{bail, Context, Result};
use chaos_core::{thousands, Department, GameScore, SimConfig};
use chaos_runtime::decisions::CRISIS_MANAGEMENT_COST;
use chaos_runtime::{
    BonusTier, ExecutiveDecision, FinishedRun, Game, QuarterOutcome, QuarterlyInitiative,
};
use persistence::{load_or_init_config, write_snapshot, HighScoreTable, RunArchive, SaveStore};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Quarters between JSON checkpoints.
const CHECKPOINT_EVERY: u32 = 10;

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    seed: Option<u64>,
    quarters: Option<u32>,
    nickname: Option<String>,
    data_dir: Option<PathBuf>,
    config: Option<PathBuf>,
    resume: Option<String>,
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> CliArgs {
    let mut cli = CliArgs::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => cli.seed = args.next().and_then(|s| s.parse().ok()),
            "--quarters" => cli.quarters = args.next().and_then(|s| s.parse().ok()),
            "--nickname" => cli.nickname = args.next(),
            "--data-dir" => cli.data_dir = args.next().map(PathBuf::from),
            "--config" => cli.config = args.next().map(PathBuf::from),
            "--resume" => cli.resume = args.next(),
            _ => {}
        }
    }
    cli
}

/// Department for a new hire: their specialization unless it is already
/// noticeably larger than the smallest department.
fn placement(game: &Game, specialization: Department) -> Department {
    let count = |d: Department| game.departments().get(d).employee_count();
    let emptiest = Department::ALL
        .into_iter()
        .min_by_key(|&d| count(d))
        .unwrap_or(specialization);
    if count(specialization) <= count(emptiest) + 1 {
        specialization
    } else {
        emptiest
    }
}

/// Hire the most productive candidates until headcount reaches `target`.
fn staff_up(game: &mut Game, target: usize) {
    while game.company().employee_count < target {
        let best = game
            .candidates()
            .iter()
            .max_by_key(|c| c.productivity)
            .map(|c| (c.id, c.specialization));
        let Some((id, specialization)) = best else {
            if game.refresh_candidates().is_err() {
                break;
            }
            continue;
        };
        let department = placement(game, specialization);
        if let Err(e) = game.hire(id).and_then(|()| game.assign(id, department)) {
            warn!(error = %e, "autopilot hiring stopped");
            break;
        }
    }
}

/// Simple corrective play: borrow when cash runs low, buy down crises,
/// pay a bonus when morale sinks and spend surplus on marketing.
fn corrective_actions(game: &mut Game) {
    let company = game.company();
    let capital = company.capital;
    let mut plan = Vec::new();
    if capital < Decimal::from(75_000) {
        plan.push(ExecutiveDecision::EmergencyLoan);
    }
    if !game.chaos().active_crises().is_empty()
        && capital > Decimal::from(CRISIS_MANAGEMENT_COST * 3)
    {
        plan.push(ExecutiveDecision::CrisisManagement);
    }
    if company.morale < -30 {
        plan.push(ExecutiveDecision::Bonus(BonusTier::Small));
    }
    for decision in plan {
        match game.apply_decision(&decision) {
            Ok(message) => println!("  > {message}"),
            Err(e) => debug!(?decision, error = %e, "decision skipped"),
        }
    }
    if game.company().capital > Decimal::from(400_000) {
        match game.apply_initiative(QuarterlyInitiative::Marketing) {
            Ok(message) => println!("  > {message}"),
            Err(e) => debug!(error = %e, "initiative skipped"),
        }
    }
}

fn print_quarter(outcome: &QuarterOutcome, game: &Game) {
    let c = game.company();
    println!(
        "Q{:>3} | capital: ${} | revenue: ${} | expenses: ${} | share: {:.1}% | staff: {} | rep: {} ({}) | morale: {} ({}) | risk: {} ({}) | events: {}",
        outcome.quarter,
        thousands(c.capital),
        thousands(outcome.close.revenue),
        thousands(outcome.close.expenses),
        c.market_share,
        c.employee_count,
        c.reputation,
        c.reputation_label(),
        c.morale,
        c.morale_label(),
        c.risk,
        c.risk_label(),
        outcome.events.len()
    );
    for event in &outcome.events {
        println!("      {}", event.message);
    }
}

fn print_score(score: &GameScore) {
    println!("Score breakdown:");
    println!("  peak capital:      ${}", thousands(score.peak_capital));
    println!("  peak revenue:      ${}", thousands(score.peak_revenue));
    println!("  peak profit:       ${}", thousands(score.peak_profit));
    println!("  peak market share: {:.1}%", score.peak_market_share);
    println!("  peak employees:    {}", score.peak_employees);
    println!("  peak reputation:   {}", score.peak_reputation);
    println!("  quarters played:   {}", score.quarters_played);
    println!("  final score:       {}", score.score);
}

fn autosave(data_dir: &Path, game: &Game, nickname: &str) {
    let save = game.snapshot("autosave", nickname);
    if let Err(e) = write_snapshot(&data_dir.join("autosave.bin"), &save) {
        warn!(error = %e, "autosave failed");
    }
    if game.quarter() % CHECKPOINT_EVERY == 0 {
        let store = SaveStore::new(data_dir.join("sv_game"));
        if let Err(e) = store.save(&game.snapshot("checkpoint", nickname)) {
            warn!(error = %e, "checkpoint save failed");
        }
    }
}

/// Archive the run and offer it to the leaderboard. Failures are logged only.
fn record_run(data_dir: &Path, max_high_scores: usize, finished: &FinishedRun, nickname: &str) {
    let mut record = finished.record.clone();
    record.player_nickname = nickname.to_string();
    if let Err(e) = RunArchive::new(data_dir).record(&record) {
        warn!(error = %e, "run history not updated");
    }

    let mut table = match HighScoreTable::open(data_dir.join("highscores.json"), max_high_scores) {
        Ok(table) => table,
        Err(e) => {
            warn!(error = %e, "leaderboard unavailable");
            return;
        }
    };
    let mut score = finished.score.clone();
    score.nickname = nickname.to_string();
    if table.qualifies(score.score) {
        match table.add(score, chrono::Utc::now()) {
            Ok(Some(rank)) => println!("New high score! Rank #{rank}"),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "leaderboard not saved"),
        }
    }
    if let Some(rank) = table.rank_of(nickname) {
        println!("{nickname}'s best rank: #{rank}");
    }
    println!("Leaderboard:");
    for (i, entry) in table.top(5).iter().enumerate() {
        println!(
            "  {:>2}. {:<20} {:>10}  ({}, {} quarters)",
            i + 1,
            entry.nickname,
            entry.score,
            entry.end_reason,
            entry.quarters_played
        );
    }
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args(std::env::args().skip(1));
    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_sha = env!("GIT_SHA"),
        built = env!("BUILD_DATE"),
        ?args,
        "starting CLI"
    );

    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("chaos-data"));
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| data_dir.join("config.yaml"));
    let config = load_or_init_config(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    let nickname = config.validate_nickname(args.nickname.as_deref().unwrap_or("Autopilot"))?;
    let sim = SimConfig {
        rng_seed: args.seed.unwrap_or(42),
        max_quarters: args.quarters.unwrap_or(SimConfig::default().max_quarters),
    };

    let mut game = match &args.resume {
        Some(file) => {
            let save = SaveStore::new(data_dir.join("sv_game"))
                .load(file)
                .with_context(|| format!("loading save {file}"))?;
            Game::restore(save, config.clone(), sim.clone())?
        }
        None => Game::new(config.clone(), sim.clone()),
    };
    if game.is_over() {
        bail!("this save belongs to a finished run ({})", game.status());
    }
    info!(run_id = %game.run_id(), quarter = game.quarter(), %nickname, "autopilot engaged");

    let target = config.default_starting_employees.max(1);
    let finished = loop {
        staff_up(&mut game, target);
        corrective_actions(&mut game);
        let outcome = game.process_quarter()?;
        print_quarter(&outcome, &game);
        if let Some(finished) = outcome.finished {
            break finished;
        }
        if config.auto_save_enabled {
            autosave(&data_dir, &game, &nickname);
        }
    };

    println!(
        "GAME OVER: {} after {} quarters | score: {}",
        finished.reason, finished.record.quarters_played, finished.score.score
    );
    if config.show_score_calculation {
        print_score(&finished.score);
    }
    record_run(&data_dir, config.max_high_scores, &finished, &nickname);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaos_core::GameConfig;

    fn args(list: &[&str]) -> CliArgs {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_known_flags() {
        let cli = args(&[
            "--seed", "7", "--quarters", "40", "--nickname", "Ada", "--data-dir", "/tmp/x",
        ]);
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.quarters, Some(40));
        assert_eq!(cli.nickname.as_deref(), Some("Ada"));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert_eq!(cli.config, None);
    }

    #[test]
    fn ignores_unknown_and_malformed_flags() {
        let cli = args(&["--verbose", "--seed", "lots"]);
        assert_eq!(cli, CliArgs::default());
    }

    #[test]
    fn autopilot_reaches_target_headcount() {
        let mut game = Game::new(GameConfig::default(), SimConfig::default());
        staff_up(&mut game, 5);
        assert_eq!(game.company().employee_count, 5);
        assert!(game.bench().is_empty());
        assert_eq!(game.departments().employee_count(), 5);
    }

    #[test]
    fn placement_spreads_staff() {
        let mut game = Game::new(GameConfig::default(), SimConfig::default());
        staff_up(&mut game, 12);
        let counts: Vec<_> = game
            .departments()
            .iter()
            .map(|d| d.employee_count())
            .collect();
        let max = counts.iter().max().copied().unwrap_or(0);
        let min = counts.iter().min().copied().unwrap_or(0);
        assert!(max - min <= 2, "{counts:?}");
    }
}
