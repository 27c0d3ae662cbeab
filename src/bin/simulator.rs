//! Flappy headless population simulator
//!
//! Runs populations of randomly initialised networks through the exact same
//! `Session::tick` the interactive game uses, and reports how far they got.
//!
//! Usage:
//!   cargo run --bin simulator -- [OPTIONS]

use anyhow::{Context, Result};
use clap::Parser;
use flappy::session::{DeathCause, OverReason, TickEvent, TickResult};
use flappy::{
    FeedForwardNet, FitnessLedger, GameConfig, JsonFileExport, NoExport, Session, SpriteSet,
    TrainedDecision,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ── CLI Configuration ────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless Flappy Bird population simulator", long_about = None)]
struct Args {
    /// Agents per run
    #[arg(short, long, default_value_t = 50)]
    population: usize,

    /// Runs with incrementing seeds
    #[arg(short, long, default_value_t = 1)]
    runs: u32,

    /// RNG seed of the first run
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Stop a run after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// JSON game config; missing keys keep the population defaults
    #[arg(short, long)]
    config: Option<String>,

    /// Hidden layer width of the random networks
    #[arg(long, default_value_t = 4)]
    hidden: usize,

    /// Write the agent that reaches the score ceiling here
    #[arg(long)]
    export: Option<String>,

    /// Per-tick event logging
    #[arg(short, long)]
    verbose: bool,

    /// Only the final summary line
    #[arg(short, long)]
    quiet: bool,
}

// ── Run Statistics ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct RunStats {
    seed: u64,
    ticks: u64,
    score: u32,
    flaps: u64,
    collisions: u64,
    floor_deaths: u64,
    ceiling_deaths: u64,
    decision_errors: u64,
    best_agent: Option<usize>,
    best_fitness: f64,
    mean_fitness: f64,
    reason: Option<OverReason>,
}

impl RunStats {
    fn process_tick(&mut self, result: &TickResult) {
        for event in &result.events {
            match event {
                TickEvent::Flapped { .. } => self.flaps += 1,
                TickEvent::Died { cause, .. } => match cause {
                    DeathCause::Collision => self.collisions += 1,
                    DeathCause::Floor => self.floor_deaths += 1,
                    DeathCause::Ceiling => self.ceiling_deaths += 1,
                },
                TickEvent::DecisionFailed { .. } => self.decision_errors += 1,
                TickEvent::Scored { score, .. } => self.score = *score,
                TickEvent::SessionOver { reason } => self.reason = Some(*reason),
                _ => {}
            }
        }
    }
}

// ── Core Simulation Loop ─────────────────────────────────────────────

fn run_simulation(args: &Args, config: &GameConfig, seed: u64) -> Result<RunStats> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let nets: Vec<FeedForwardNet> = (0..args.population)
        .map(|_| FeedForwardNet::random(&[3, args.hidden, 1], &mut rng))
        .collect();
    let mut source = TrainedDecision::new(nets);

    let mut session = Session::new(config.clone(), SpriteSet::default(), args.population, &mut rng)
        .context("failed to create session")?;
    session = match &args.export {
        Some(path) => session.with_export(Box::new(JsonFileExport::new(path))),
        None => session.with_export(Box::new(NoExport)),
    };

    let mut ledger = FitnessLedger::new(args.population);
    let mut stats = RunStats {
        seed,
        ..RunStats::default()
    };

    let ticks = session.run(&mut source, &mut rng, args.max_ticks, |result| {
        ledger.apply(result);
        stats.process_tick(result);
        if args.verbose {
            print_tick_events(result);
        }
    });
    stats.ticks = ticks;

    if let Some((agent, fitness)) = ledger.best() {
        stats.best_agent = Some(agent);
        stats.best_fitness = fitness;
    }
    stats.mean_fitness = ledger.mean();
    Ok(stats)
}

// ── Output ───────────────────────────────────────────────────────────

fn print_tick_events(result: &TickResult) {
    for event in &result.events {
        let label = match event {
            TickEvent::Flapped { .. } | TickEvent::PipeRetired => continue,
            TickEvent::Crashed { agent } => format!("agent {agent} crashed"),
            TickEvent::Died { agent, cause } => format!("agent {agent} died ({cause:?})"),
            TickEvent::Scored { score, credited } => {
                format!("score {score} ({} agents credited)", credited.len())
            }
            TickEvent::PipeSpawned { x, gap_center } => {
                format!("pipe spawned at x={x:.0}, gap {gap_center:.0}")
            }
            TickEvent::DecisionFailed { agent, error } => format!("agent {agent}: {error}"),
            TickEvent::ScoreCeilingReached { score, exported } => {
                format!("score ceiling {score} reached, exported {exported:?}")
            }
            TickEvent::SessionOver { reason } => format!("session over: {reason:?}"),
        };
        println!("[{:>6}] {}", result.frame, label);
    }
}

fn print_run(stats: &RunStats) {
    println!("── Run (seed {}) ──", stats.seed);
    println!("  Ticks:           {}", stats.ticks);
    println!("  Score:           {}", stats.score);
    println!("  Ended by:        {:?}", stats.reason);
    println!("  Flaps:           {}", stats.flaps);
    println!(
        "  Deaths:          {} pipe / {} floor / {} ceiling",
        stats.collisions, stats.floor_deaths, stats.ceiling_deaths
    );
    if stats.decision_errors > 0 {
        println!("  Decision errors: {}", stats.decision_errors);
    }
    if let Some(agent) = stats.best_agent {
        println!("  Best agent:      {} (fitness {:.1})", agent, stats.best_fitness);
    }
    println!("  Mean fitness:    {:.2}", stats.mean_fitness);
}

fn print_summary(all: &[RunStats]) {
    if all.is_empty() {
        return;
    }
    let n = all.len() as f64;
    let avg_score = all.iter().map(|s| s.score as f64).sum::<f64>() / n;
    let avg_ticks = all.iter().map(|s| s.ticks as f64).sum::<f64>() / n;
    let best = all.iter().map(|s| s.score).max().unwrap_or(0);
    let ceilings = all
        .iter()
        .filter(|s| s.reason == Some(OverReason::ScoreCeiling))
        .count();
    println!(
        "runs={} avg_score={:.2} best_score={} avg_ticks={:.0} ceiling_reached={}",
        all.len(),
        avg_score,
        best,
        avg_ticks,
        ceilings
    );
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &args.config {
        Some(path) => GameConfig::load_over(path, GameConfig::population())
            .with_context(|| format!("failed to load config {path}"))?,
        None => GameConfig::population(),
    };

    let mut all = Vec::with_capacity(args.runs as usize);
    for run in 0..args.runs {
        let seed = args.seed + run as u64;
        tracing::info!("Starting run {} with seed {}", run + 1, seed);
        let stats = run_simulation(&args, &config, seed)?;
        if !args.quiet {
            print_run(&stats);
        }
        all.push(stats);
    }

    print_summary(&all);
    Ok(())
}
