//! Loading simulation settings from TOML and generating random layouts.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use micromouse_core::{
    center_goals, CellCoord, Direction, KnowledgeMode, SimulationConfig, TripPlan, WallPlacement,
    DEFAULT_MAZE_SIZE, DEFAULT_STALL_THRESHOLD,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

/// Attempts made per requested wall before scattering gives up.
const SCATTER_ATTEMPTS_PER_WALL: usize = 8;

/// Contents of a simulation file.
///
/// Every setting is optional; missing ones fall back to command-line
/// overrides and then to the simulator defaults. Goals default to the
/// center of the configured size rather than of the default size.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LayoutFile {
    pub(crate) size: Option<u32>,
    pub(crate) goals: Option<Vec<CellCoord>>,
    pub(crate) trip: Option<TripPlan>,
    pub(crate) knowledge: Option<KnowledgeMode>,
    pub(crate) stall_threshold: Option<u32>,
    #[serde(default)]
    pub(crate) walls: Vec<WallPlacement>,
}

impl LayoutFile {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read simulation file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid simulation file at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse simulation toml contents")
    }

    /// Resolves the final configuration, letting `overrides` win over the file.
    pub(crate) fn resolve(&self, overrides: &Overrides) -> SimulationConfig {
        let size = overrides
            .size
            .or(self.size)
            .unwrap_or(DEFAULT_MAZE_SIZE);
        SimulationConfig {
            size,
            goals: self.goals.clone().unwrap_or_else(|| center_goals(size)),
            trip: overrides
                .trip
                .clone()
                .or_else(|| self.trip.clone())
                .unwrap_or_default(),
            knowledge: overrides
                .knowledge
                .or(self.knowledge)
                .unwrap_or_default(),
            stall_threshold: self.stall_threshold.unwrap_or(DEFAULT_STALL_THRESHOLD),
        }
    }
}

/// Settings supplied on the command line.
#[derive(Clone, Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) size: Option<u32>,
    pub(crate) trip: Option<TripPlan>,
    pub(crate) knowledge: Option<KnowledgeMode>,
}

/// Generates up to `count` interior walls from a seeded generator.
///
/// Placements on the outer boundary are skipped, as are repeats. The same
/// seed and size always yield the same layout.
pub(crate) fn scatter_walls(size: u32, count: usize, seed: u64) -> Vec<WallPlacement> {
    let mut walls: Vec<WallPlacement> = Vec::with_capacity(count);
    if size < 2 {
        return walls;
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let attempts = count.saturating_mul(SCATTER_ATTEMPTS_PER_WALL);
    for _ in 0..attempts {
        if walls.len() == count {
            break;
        }

        let cell = CellCoord::new(rng.gen_range(0..size), rng.gen_range(0..size));
        let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        let Some(neighbor) = cell.neighbor(direction, size) else {
            continue;
        };

        let placement = WallPlacement::new(cell.x(), cell.y(), direction);
        let mirrored = WallPlacement::new(neighbor.x(), neighbor.y(), direction.opposite());
        if walls.contains(&placement) || walls.contains(&mirrored) {
            continue;
        }
        walls.push(placement);
    }
    walls
}
