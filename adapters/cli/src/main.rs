#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays both PinPin stages headlessly.

mod autoplay;
mod config;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pinpin_catalog::{LabelTable, RegionCatalog};
use pinpin_core::Difficulty;
use pinpin_placement::{query, PlacementSession};
use pinpin_system_matching::MatchEngine;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pinpin", version, about = "Plays the PinPin puzzle and matching stages headlessly")]
struct Cli {
    /// Map data produced by the projection pipeline.
    #[arg(long, default_value = "assets/demo_map.json")]
    map: PathBuf,
    /// Region identifier to capital-name table.
    #[arg(long, default_value = "assets/labels.json")]
    labels: PathBuf,
    /// Optional TOML file with `[board]` and `[match]` sections.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the placement difficulty.
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,
    /// Overrides both the scatter and the matching seeds.
    #[arg(long)]
    seed: Option<u64>,
    /// Overrides how long the matching stage runs.
    #[arg(long)]
    match_seconds: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DifficultyArg {
    Easy,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

/// Entry point for the PinPin command-line interface.
fn main() -> Result<()> {
    init_tracing();
    run(Cli::parse())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = config::load(cli.config.as_deref())?;
    if let Some(difficulty) = cli.difficulty {
        settings.board.difficulty = difficulty.into();
    }
    if let Some(seed) = cli.seed {
        settings.board.seed = seed;
        settings.matching.seed = seed;
    }
    if let Some(seconds) = cli.match_seconds {
        settings.matching.duration_secs = seconds;
    }

    let map_json = fs::read_to_string(&cli.map)
        .with_context(|| format!("failed to read map data at {}", cli.map.display()))?;
    let catalog = RegionCatalog::from_json_str(&map_json)
        .with_context(|| format!("failed to load regions from {}", cli.map.display()))?;
    let labels_json = fs::read_to_string(&cli.labels)
        .with_context(|| format!("failed to read label table at {}", cli.labels.display()))?;
    let labels = LabelTable::from_json_str(&labels_json)
        .with_context(|| format!("failed to load labels from {}", cli.labels.display()))?;
    info!(
        regions = catalog.len(),
        labels = labels.len(),
        difficulty = ?settings.board.difficulty,
        "map loaded"
    );

    let screen = settings.board.screen();
    let mut session = PlacementSession::for_difficulty(
        &catalog,
        settings.board.difficulty,
        screen,
        settings.board.seed,
    );
    let placement = autoplay::solve_placement(&mut session, &settings.board);
    info!(
        placed = query::placed_count(&session),
        pieces = query::piece_count(&session),
        attempts = placement.attempts,
        rejections = placement.rejections,
        forced = placement.forced,
        "placement stage finished"
    );

    let mut engine = MatchEngine::new(
        &catalog,
        labels,
        settings.matching.engine_config(screen),
    );
    let report = autoplay::play_match(&mut engine, &settings.matching);
    info!(
        score = report.score,
        lives = report.lives,
        matches = report.matches,
        misses = report.misses,
        phase = ?report.phase,
        "matching stage finished"
    );
    Ok(())
}
