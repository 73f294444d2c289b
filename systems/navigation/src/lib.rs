#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure navigation policy that picks the robot's next move from a distance field.

use micromouse_core::{
    BiasMode, CellCoord, Direction, DistanceView, MazeView, VisitedView, UNREACHABLE,
};

/// Stateless move selector configured with a tie-break policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavigationPolicy {
    bias: BiasMode,
}

impl NavigationPolicy {
    /// Creates a policy applying the provided tie-break mode.
    #[must_use]
    pub const fn new(bias: BiasMode) -> Self {
        Self { bias }
    }

    /// Tie-break mode applied by the policy.
    #[must_use]
    pub const fn bias(&self) -> BiasMode {
        self.bias
    }

    /// Chooses the direction of the next move out of `position`.
    ///
    /// Only sides without a known wall are considered. Returns `None` when the
    /// robot already stands on a goal (distance 0), or when no open neighbor is
    /// strictly closer to a goal than `position`. The latter is a stall: the
    /// caller keeps sensing and may find a way on a later cycle.
    ///
    /// Greedy and unvisited-first modes only step downhill. Score-biased mode
    /// compares every open, reachable neighbor after crediting unvisited ones
    /// with the configured bonus, so it can step uphill into unexplored cells.
    #[must_use]
    pub fn choose_move(
        &self,
        position: CellCoord,
        walls: MazeView<'_>,
        distances: DistanceView<'_>,
        visited: VisitedView<'_>,
    ) -> Option<Direction> {
        let current_distance = distances.distance(position)?;
        if current_distance == 0 {
            return None;
        }

        let mut best: Option<Candidate> = None;
        let mut downhill_available = false;

        for direction in Direction::ALL {
            if walls.has_wall(position, direction) {
                continue;
            }

            let Some(neighbor) = position.neighbor(direction, walls.size()) else {
                continue;
            };
            let Some(distance) = distances.distance(neighbor) else {
                continue;
            };
            if distance == UNREACHABLE {
                continue;
            }

            let downhill = distance < current_distance;
            downhill_available |= downhill;
            if !downhill && !self.considers_uphill() {
                continue;
            }

            let candidate = Candidate {
                direction,
                rank: self.rank(distance, visited.is_visited(neighbor)),
            };
            best = Some(match best {
                None => candidate,
                Some(existing) => {
                    if candidate.is_better_than(existing) {
                        candidate
                    } else {
                        existing
                    }
                }
            });
        }

        if !downhill_available {
            return None;
        }

        best.map(|candidate| candidate.direction)
    }

    fn considers_uphill(&self) -> bool {
        matches!(self.bias, BiasMode::ScoreBiased { .. })
    }

    fn rank(&self, distance: u16, visited: bool) -> (i32, bool) {
        let distance = i32::from(distance);
        match self.bias {
            BiasMode::PureGreedy => (distance, false),
            BiasMode::UnvisitedFirst => (distance, visited),
            BiasMode::ScoreBiased { bonus } => {
                if visited {
                    (distance, false)
                } else {
                    (distance - i32::from(bonus), false)
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    direction: Direction,
    rank: (i32, bool),
}

impl Candidate {
    /// Strict comparison keeps the earlier direction on ties.
    fn is_better_than(self, other: Candidate) -> bool {
        self.rank < other.rank
    }
}

#[cfg(test)]
mod tests {
    use micromouse_core::WallMask;

    use super::*;

    struct Grid {
        size: u32,
        walls: Vec<WallMask>,
        distances: Vec<u16>,
        visited: Vec<bool>,
    }

    impl Grid {
        fn open(size: u32, distances: Vec<u16>) -> Self {
            let cells = usize::try_from(size * size).expect("fits usize");
            assert_eq!(distances.len(), cells);
            Self {
                size,
                walls: vec![WallMask::EMPTY; cells],
                distances,
                visited: vec![false; cells],
            }
        }

        fn index(&self, cell: CellCoord) -> usize {
            usize::try_from(cell.y() * self.size + cell.x()).expect("fits usize")
        }

        fn visit(&mut self, cell: CellCoord) {
            let index = self.index(cell);
            self.visited[index] = true;
        }

        fn wall(&mut self, cell: CellCoord, direction: Direction) {
            let index = self.index(cell);
            self.walls[index] = self.walls[index].with(direction, true);
            if let Some(neighbor) = cell.neighbor(direction, self.size) {
                let index = self.index(neighbor);
                self.walls[index] = self.walls[index].with(direction.opposite(), true);
            }
        }

        fn choose(&self, bias: BiasMode, position: CellCoord) -> Option<Direction> {
            NavigationPolicy::new(bias).choose_move(
                position,
                MazeView::new(&self.walls, self.size),
                DistanceView::new(&self.distances, self.size),
                VisitedView::new(&self.visited, self.size),
            )
        }
    }

    // Rows are listed bottom (y = 0) first.
    fn tie_at_center() -> Grid {
        Grid::open(
            3,
            vec![
                5, 5, 5, //
                4, 4, 3, //
                5, 3, 5, //
            ],
        )
    }

    #[test]
    fn goal_cell_yields_no_move() {
        let grid = Grid::open(2, vec![0, 1, 1, 2]);
        assert_eq!(grid.choose(BiasMode::PureGreedy, CellCoord::new(0, 0)), None);
    }

    #[test]
    fn greedy_breaks_ties_by_enumeration_order() {
        let grid = tie_at_center();
        assert_eq!(
            grid.choose(BiasMode::PureGreedy, CellCoord::new(1, 1)),
            Some(Direction::North)
        );
    }

    #[test]
    fn unvisited_first_prefers_unvisited_neighbor_later_in_order() {
        let mut grid = tie_at_center();
        grid.visit(CellCoord::new(1, 2));

        assert_eq!(
            grid.choose(BiasMode::UnvisitedFirst, CellCoord::new(1, 1)),
            Some(Direction::East)
        );
        assert_eq!(
            grid.choose(BiasMode::PureGreedy, CellCoord::new(1, 1)),
            Some(Direction::North)
        );
    }

    #[test]
    fn unvisited_first_falls_back_to_visited_neighbors() {
        let mut grid = tie_at_center();
        grid.visit(CellCoord::new(1, 2));
        grid.visit(CellCoord::new(2, 1));

        assert_eq!(
            grid.choose(BiasMode::UnvisitedFirst, CellCoord::new(1, 1)),
            Some(Direction::North)
        );
    }

    #[test]
    fn unvisited_first_never_climbs() {
        let mut grid = Grid::open(
            3,
            vec![
                5, 5, 5, //
                4, 4, 5, //
                5, 3, 5, //
            ],
        );
        grid.visit(CellCoord::new(1, 2));

        assert_eq!(
            grid.choose(BiasMode::UnvisitedFirst, CellCoord::new(1, 1)),
            Some(Direction::North)
        );
    }

    #[test]
    fn score_bias_trades_distance_for_exploration() {
        let mut grid = Grid::open(
            3,
            vec![
                5, 5, 5, //
                4, 4, 5, //
                5, 3, 5, //
            ],
        );
        grid.visit(CellCoord::new(1, 2));
        grid.visit(CellCoord::new(0, 1));
        grid.visit(CellCoord::new(1, 0));

        assert_eq!(
            grid.choose(BiasMode::score_biased(), CellCoord::new(1, 1)),
            Some(Direction::East)
        );
        assert_eq!(
            grid.choose(BiasMode::ScoreBiased { bonus: 1 }, CellCoord::new(1, 1)),
            Some(Direction::North)
        );
    }

    #[test]
    fn score_bias_still_stalls_without_a_downhill_exit() {
        let grid = Grid::open(
            3,
            vec![
                5, 5, 5, //
                5, 4, 5, //
                5, 5, 5, //
            ],
        );

        assert_eq!(grid.choose(BiasMode::score_biased(), CellCoord::new(1, 1)), None);
    }

    #[test]
    fn known_walls_block_candidates() {
        let mut grid = tie_at_center();
        grid.wall(CellCoord::new(1, 1), Direction::North);

        assert_eq!(
            grid.choose(BiasMode::PureGreedy, CellCoord::new(1, 1)),
            Some(Direction::East)
        );

        grid.wall(CellCoord::new(1, 1), Direction::East);
        assert_eq!(grid.choose(BiasMode::PureGreedy, CellCoord::new(1, 1)), None);
    }

    #[test]
    fn unreachable_neighbors_are_ignored() {
        let grid = Grid::open(
            2,
            vec![
                UNREACHABLE,
                UNREACHABLE, //
                UNREACHABLE,
                UNREACHABLE, //
            ],
        );

        assert_eq!(grid.choose(BiasMode::score_biased(), CellCoord::new(0, 0)), None);
    }

    #[test]
    fn positions_outside_the_field_yield_no_move() {
        let grid = tie_at_center();
        assert_eq!(grid.choose(BiasMode::PureGreedy, CellCoord::new(5, 5)), None);
    }
}
