#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the micromouse simulator headlessly.

mod layout;
mod summary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use micromouse_core::{Command, KnowledgeMode, RunStatus, TripPlan};
use micromouse_world::{self as world, query, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    layout::{scatter_walls, LayoutFile, Overrides},
    summary::RunSummary,
};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_DIRECTIVES: &str = "micromouse=info,micromouse_world=info";

/// Runs a micromouse trip over a maze and prints a summary.
#[derive(Debug, Parser)]
#[command(name = "micromouse", version, about, long_about = None)]
struct CliArgs {
    /// TOML file holding simulation settings and an optional `[[walls]]` layout.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Side length of the square maze.
    #[arg(long)]
    size: Option<u32>,

    /// Trip preset executed by the run.
    #[arg(long, value_enum)]
    plan: Option<PlanPreset>,

    /// Initial knowledge granted to the robot.
    #[arg(long, value_enum)]
    knowledge: Option<KnowledgeArg>,

    /// Number of random interior walls added on top of the layout.
    #[arg(long, default_value_t = 0)]
    random_walls: usize,

    /// Seed for the random wall generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Upper bound on simulated control cycles.
    #[arg(long, default_value_t = 10_000)]
    max_ticks: u32,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PlanPreset {
    SingleRun,
    RoundTrip,
    ScanRoundTrip,
    SpeedRun,
}

impl PlanPreset {
    fn into_plan(self) -> TripPlan {
        match self {
            Self::SingleRun => TripPlan::single_run(),
            Self::RoundTrip => TripPlan::round_trip(),
            Self::ScanRoundTrip => TripPlan::scan_round_trip(),
            Self::SpeedRun => TripPlan::speed_run(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum KnowledgeArg {
    Discover,
    Omniscient,
}

impl From<KnowledgeArg> for KnowledgeMode {
    fn from(value: KnowledgeArg) -> Self {
        match value {
            KnowledgeArg::Discover => KnowledgeMode::Discover,
            KnowledgeArg::Omniscient => KnowledgeMode::Omniscient,
        }
    }
}

/// Entry point for the micromouse command-line interface.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let summary = run(&args)?;

    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("failed to encode summary")?;
        println!("{json}");
    } else {
        print!("{summary}");
    }
    Ok(())
}

fn run(args: &CliArgs) -> Result<RunSummary> {
    let file = match &args.config {
        Some(path) => LayoutFile::load(path)?,
        None => LayoutFile::default(),
    };
    let overrides = Overrides {
        size: args.size,
        trip: args.plan.map(PlanPreset::into_plan),
        knowledge: args.knowledge.map(KnowledgeMode::from),
    };
    let config = file.resolve(&overrides);

    let mut walls = file.walls.clone();
    walls.extend(scatter_walls(config.size, args.random_walls, args.seed));
    info!(size = config.size, walls = walls.len(), "building maze");

    let mut world =
        World::with_layout(config, &walls).context("failed to build the simulation world")?;

    let mut events = Vec::new();
    world::apply(&mut world, Command::StartRun, &mut events);

    let mut ticks = 0;
    while ticks < args.max_ticks
        && !matches!(query::status(&world), RunStatus::Done | RunStatus::Stalled)
    {
        events.clear();
        world::apply(&mut world, Command::Tick, &mut events);
        ticks += 1;
    }

    Ok(RunSummary::capture(&world, ticks))
}
