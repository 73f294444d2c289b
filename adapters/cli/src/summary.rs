//! End-of-run report printed by the command-line adapter.

use std::fmt;

use micromouse_core::{Phase, Pose, RunStatus};
use micromouse_world::{query, World};
use serde::Serialize;

/// Snapshot of a finished or abandoned run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct RunSummary {
    pub(crate) size: u32,
    pub(crate) phase: Phase,
    pub(crate) status: RunStatus,
    pub(crate) ticks: u32,
    pub(crate) moves: u32,
    pub(crate) pose: Pose,
    pub(crate) visited_cells: usize,
    pub(crate) known_walls: usize,
    pub(crate) true_walls: usize,
    pub(crate) recomputes: u32,
}

impl RunSummary {
    pub(crate) fn capture(world: &World, ticks: u32) -> Self {
        Self {
            size: query::config(world).size,
            phase: query::phase(world),
            status: query::status(world),
            ticks,
            moves: query::move_count(world),
            pose: query::pose(world),
            visited_cells: query::visited(world).count(),
            known_walls: query::known_wall_count(world),
            true_walls: query::truth_maze(world).wall_count(),
            recomputes: query::recompute_count(world),
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "maze:        {0}x{0}", self.size)?;
        writeln!(f, "status:      {:?} ({})", self.status, self.phase)?;
        writeln!(f, "ticks:       {}", self.ticks)?;
        writeln!(f, "moves:       {}", self.moves)?;
        writeln!(
            f,
            "robot:       {} facing {}",
            self.pose.cell, self.pose.facing
        )?;
        writeln!(f, "visited:     {} cells", self.visited_cells)?;
        writeln!(f, "walls known: {} of {}", self.known_walls, self.true_walls)?;
        writeln!(f, "recomputes:  {}", self.recomputes)
    }
}
