//! Robot-owned belief about the maze, refined by sensing.

use micromouse_core::{dense_index, CellCoord, KnowledgeMode, MazeError, VisitedView, WallMask};
use tracing::trace;

use crate::maze::Maze;

/// Walls the robot has sensed so far plus the cells it has entered.
///
/// The map starts from what the robot may assume before moving and only ever
/// gains walls that the true maze confirms, so it stays a subset of the true
/// maze for as long as the true maze is left untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KnowledgeMap {
    maze: Maze,
    visited: Vec<bool>,
}

impl KnowledgeMap {
    /// Seeds a knowledge map for a run over `truth`.
    ///
    /// [`KnowledgeMode::Discover`] starts from the competition boundary and
    /// start box, restricted to the walls `truth` actually has.
    /// [`KnowledgeMode::Omniscient`] copies every wall of `truth`.
    #[must_use]
    pub fn new(truth: &Maze, mode: KnowledgeMode) -> Self {
        let maze = match mode {
            KnowledgeMode::Discover => {
                let mut assumed = Maze::new(truth.size());
                assumed.retain_shared(truth);
                assumed
            }
            KnowledgeMode::Omniscient => truth.clone(),
        };
        let cell_count = maze.cells().count();
        Self {
            maze,
            visited: vec![false; cell_count],
        }
    }

    /// Copies walls around `cell` that `truth` holds and the map lacks.
    ///
    /// Returns the sides of `cell` whose walls were newly discovered. An empty
    /// mask means the map did not change.
    pub fn sense(&mut self, truth: &Maze, cell: CellCoord) -> Result<WallMask, MazeError> {
        if !truth.contains(cell) || !self.maze.contains(cell) {
            return Err(MazeError::OutOfBounds {
                cell,
                size: self.maze.size(),
            });
        }

        let discovered = truth.walls(cell).difference(self.maze.walls(cell));
        for direction in discovered.iter() {
            self.maze.set_wall(cell, direction, true)?;
            trace!(%cell, %direction, "wall sensed");
        }
        Ok(discovered)
    }

    /// Walls known to the robot.
    #[must_use]
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Number of distinct walls known to the robot.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.maze.wall_count()
    }

    /// Records that the robot entered `cell`. Returns `true` on the first visit.
    pub fn mark_visited(&mut self, cell: CellCoord) -> bool {
        let Some(slot) = self.slot_mut(cell) else {
            return false;
        };
        let first_visit = !*slot;
        *slot = true;
        first_visit
    }

    /// Reports whether the robot has entered `cell` during this run.
    #[must_use]
    pub fn is_visited(&self, cell: CellCoord) -> bool {
        self.visited_view().is_visited(cell)
    }

    /// Number of cells entered during this run.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited_view().count()
    }

    /// Borrowed view of the visited flags.
    #[must_use]
    pub fn visited_view(&self) -> VisitedView<'_> {
        VisitedView::new(&self.visited, self.maze.size())
    }

    fn slot_mut(&mut self, cell: CellCoord) -> Option<&mut bool> {
        let index = dense_index(self.maze.size(), cell)?;
        self.visited.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use micromouse_core::Direction;

    use super::*;

    fn truth_with_interior_walls() -> Maze {
        let mut truth = Maze::new(4);
        truth
            .set_wall(CellCoord::new(1, 1), Direction::North, true)
            .expect("in bounds");
        truth
            .set_wall(CellCoord::new(1, 1), Direction::East, true)
            .expect("in bounds");
        truth
    }

    #[test]
    fn discover_mode_starts_with_boundary_only() {
        let truth = truth_with_interior_walls();
        let knowledge = KnowledgeMap::new(&truth, KnowledgeMode::Discover);

        assert_eq!(knowledge.maze(), &Maze::new(4));
        assert!(knowledge.maze().is_subset_of(&truth));
        assert_eq!(knowledge.visited_count(), 0);
    }

    #[test]
    fn omniscient_mode_copies_truth() {
        let truth = truth_with_interior_walls();
        let knowledge = KnowledgeMap::new(&truth, KnowledgeMode::Omniscient);

        assert_eq!(knowledge.maze(), &truth);
    }

    #[test]
    fn discover_mode_skips_assumed_walls_missing_from_truth() {
        let mut truth = Maze::new(4);
        truth
            .set_wall(CellCoord::new(3, 3), Direction::North, false)
            .expect("in bounds");

        let knowledge = KnowledgeMap::new(&truth, KnowledgeMode::Discover);

        assert!(!knowledge.maze().has_wall(CellCoord::new(3, 3), Direction::North));
        assert!(knowledge.maze().is_subset_of(&truth));
    }

    #[test]
    fn sense_copies_new_walls_with_mirrors() {
        let truth = truth_with_interior_walls();
        let mut knowledge = KnowledgeMap::new(&truth, KnowledgeMode::Discover);
        let before = knowledge.wall_count();

        let discovered = knowledge
            .sense(&truth, CellCoord::new(1, 1))
            .expect("in bounds");

        assert_eq!(
            discovered.iter().collect::<Vec<_>>(),
            vec![Direction::North, Direction::East]
        );
        assert_eq!(knowledge.wall_count(), before + 2);
        assert!(knowledge
            .maze()
            .has_wall(CellCoord::new(1, 2), Direction::South));
        assert!(knowledge
            .maze()
            .has_wall(CellCoord::new(2, 1), Direction::West));
        assert!(knowledge.maze().is_consistent());
    }

    #[test]
    fn sensing_twice_reports_nothing_new() {
        let truth = truth_with_interior_walls();
        let mut knowledge = KnowledgeMap::new(&truth, KnowledgeMode::Discover);
        let cell = CellCoord::new(1, 1);

        let _ = knowledge.sense(&truth, cell).expect("in bounds");
        let snapshot = knowledge.clone();
        let second = knowledge.sense(&truth, cell).expect("in bounds");

        assert!(second.is_empty());
        assert_eq!(knowledge, snapshot);
    }

    #[test]
    fn neighbor_sensing_sees_mirrored_wall_as_known() {
        let truth = truth_with_interior_walls();
        let mut knowledge = KnowledgeMap::new(&truth, KnowledgeMode::Discover);

        let _ = knowledge
            .sense(&truth, CellCoord::new(1, 1))
            .expect("in bounds");
        let from_above = knowledge
            .sense(&truth, CellCoord::new(1, 2))
            .expect("in bounds");

        assert!(from_above.is_empty());
    }

    #[test]
    fn sense_rejects_cells_outside_the_maze() {
        let truth = Maze::new(3);
        let mut knowledge = KnowledgeMap::new(&truth, KnowledgeMode::Discover);

        assert_eq!(
            knowledge.sense(&truth, CellCoord::new(0, 3)),
            Err(MazeError::OutOfBounds {
                cell: CellCoord::new(0, 3),
                size: 3,
            })
        );
    }

    #[test]
    fn visited_flags_are_sticky() {
        let truth = Maze::new(3);
        let mut knowledge = KnowledgeMap::new(&truth, KnowledgeMode::Discover);
        let cell = CellCoord::new(2, 1);

        assert!(knowledge.mark_visited(cell));
        assert!(!knowledge.mark_visited(cell));
        assert!(knowledge.is_visited(cell));
        assert!(!knowledge.mark_visited(CellCoord::new(9, 9)));
        assert_eq!(knowledge.visited_count(), 1);
    }
}
