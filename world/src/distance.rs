//! Flood-fill distance field used to steer the robot.

use std::collections::VecDeque;

use micromouse_core::{dense_index, CellCoord, Direction, DistanceView, UNREACHABLE};

use crate::maze::Maze;

/// Dense move-count grid seeded from a set of goal cells.
///
/// Distances are a pure function of the maze walls and the goal set. The
/// field is always rebuilt in full; cells with no open path to any goal hold
/// [`UNREACHABLE`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistanceField {
    size: u32,
    distances: Vec<u16>,
}

impl DistanceField {
    /// Computes a fresh field over `maze` toward the nearest of `goals`.
    #[must_use]
    pub fn compute(maze: &Maze, goals: &[CellCoord]) -> Self {
        let mut field = Self::default();
        field.rebuild(maze, goals);
        field
    }

    /// Rebuilds the distances in place using a multi-source breadth-first relaxation.
    ///
    /// Goal cells outside the maze are ignored. A neighbor is relaxed only
    /// through a side without a wall, and only when the new distance is
    /// strictly smaller, so repeated rebuilds over the same input are
    /// idempotent.
    pub fn rebuild(&mut self, maze: &Maze, goals: &[CellCoord]) {
        let size = maze.size();
        let width = usize::try_from(size).unwrap_or(0);
        let cell_count = width.checked_mul(width).unwrap_or(0);

        self.size = size;
        if self.distances.len() != cell_count {
            self.distances = vec![UNREACHABLE; cell_count];
        } else {
            self.distances.fill(UNREACHABLE);
        }

        let mut queue = VecDeque::new();

        for &goal in goals {
            let Some(index) = dense_index(size, goal) else {
                continue;
            };

            if self.distances[index] == 0 {
                continue;
            }

            self.distances[index] = 0;
            queue.push_back(goal);
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = dense_index(size, cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            if next_distance >= UNREACHABLE {
                continue;
            }

            for direction in Direction::ALL {
                if maze.has_wall(cell, direction) {
                    continue;
                }

                let Some(neighbor) = cell.neighbor(direction, size) else {
                    continue;
                };
                let Some(neighbor_index) = dense_index(size, neighbor) else {
                    continue;
                };

                if self.distances[neighbor_index] <= next_distance {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Side length of the field in cells.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Dense distances stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[u16] {
        &self.distances
    }

    /// Distance captured for the provided cell, if it lies within the field.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u16> {
        dense_index(self.size, cell).and_then(|offset| self.distances.get(offset).copied())
    }

    /// Reports whether the cell has a known open path to a goal.
    #[must_use]
    pub fn is_reachable(&self, cell: CellCoord) -> bool {
        self.distance(cell)
            .map_or(false, |distance| distance != UNREACHABLE)
    }

    /// Borrowed view handed to systems.
    #[must_use]
    pub fn view(&self) -> DistanceView<'_> {
        DistanceView::new(&self.distances, self.size)
    }
}
