//! Wall grid shared by the true maze and the robot's knowledge map.

use micromouse_core::{
    dense_index, CellCoord, Direction, MazeError, MazeView, WallMask, WallPlacement, START_CELL,
};

/// Square grid of per-cell wall masks with mirrored edges.
///
/// Every mutation keeps both sides of a shared edge in agreement: a wall
/// recorded on the east side of one cell is also recorded on the west side of
/// its neighbor. Sides facing out of the grid have no mirror.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    size: u32,
    masks: Vec<WallMask>,
}

impl Maze {
    /// Creates a maze following the competition rule.
    ///
    /// Every boundary cell gets its outward wall and the start cell is closed
    /// on the west, south and east so that only north leads out of it.
    #[must_use]
    pub fn new(size: u32) -> Self {
        let mut maze = Self::open(size);
        for index in 0..size {
            maze.put(CellCoord::new(index, size - 1), Direction::North, true);
            maze.put(CellCoord::new(size - 1, index), Direction::East, true);
            maze.put(CellCoord::new(index, 0), Direction::South, true);
            maze.put(CellCoord::new(0, index), Direction::West, true);
        }

        if size > 0 {
            for direction in [Direction::West, Direction::South, Direction::East] {
                maze.put(START_CELL, direction, true);
            }
        }
        maze
    }

    fn open(size: u32) -> Self {
        let cell_count = u64::from(size) * u64::from(size);
        let cell_count = usize::try_from(cell_count).unwrap_or(0);
        Self {
            size,
            masks: vec![WallMask::EMPTY; cell_count],
        }
    }

    /// Side length of the maze in cells.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.within(self.size)
    }

    /// Wall mask of `cell`. Cells outside the grid are reported fully walled.
    #[must_use]
    pub fn walls(&self, cell: CellCoord) -> WallMask {
        self.index(cell)
            .and_then(|index| self.masks.get(index).copied())
            .unwrap_or(WallMask::ALL)
    }

    /// Reports whether a wall blocks `direction` out of `cell`.
    #[must_use]
    pub fn has_wall(&self, cell: CellCoord, direction: Direction) -> bool {
        self.walls(cell).contains(direction)
    }

    /// Sets or clears one wall together with the neighbor's mirrored side.
    pub fn set_wall(
        &mut self,
        cell: CellCoord,
        direction: Direction,
        present: bool,
    ) -> Result<(), MazeError> {
        if !self.contains(cell) {
            return Err(MazeError::OutOfBounds {
                cell,
                size: self.size,
            });
        }
        self.put(cell, direction, present);
        Ok(())
    }

    /// Flips one wall and returns its new state.
    pub fn toggle_wall(
        &mut self,
        cell: CellCoord,
        direction: Direction,
    ) -> Result<bool, MazeError> {
        let present = !self.has_wall(cell, direction);
        self.set_wall(cell, direction, present)?;
        Ok(present)
    }

    /// Adds every wall of a layout. Stops at the first placement outside the grid.
    pub fn apply_layout(&mut self, walls: &[WallPlacement]) -> Result<(), MazeError> {
        for wall in walls {
            self.set_wall(wall.cell(), wall.direction, true)?;
        }
        Ok(())
    }

    /// Number of distinct wall edges, counting each shared edge once.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.cells()
            .map(|cell| {
                let mask = self.walls(cell);
                let mut count = 0;
                // North and east sides own the shared edges; south and west
                // only count where they face out of the grid.
                if mask.contains(Direction::North) {
                    count += 1;
                }
                if mask.contains(Direction::East) {
                    count += 1;
                }
                if cell.y() == 0 && mask.contains(Direction::South) {
                    count += 1;
                }
                if cell.x() == 0 && mask.contains(Direction::West) {
                    count += 1;
                }
                count
            })
            .sum()
    }

    /// Reports whether every shared edge is recorded identically on both sides.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.cells().all(|cell| {
            Direction::ALL.into_iter().all(|direction| {
                cell.neighbor(direction, self.size).map_or(true, |neighbor| {
                    self.has_wall(cell, direction)
                        == self.has_wall(neighbor, direction.opposite())
                })
            })
        })
    }

    /// Reports whether every wall of `self` is also present in `other`.
    #[must_use]
    pub fn is_subset_of(&self, other: &Maze) -> bool {
        self.size == other.size
            && self
                .masks
                .iter()
                .zip(&other.masks)
                .all(|(mine, theirs)| mine.difference(*theirs).is_empty())
    }

    /// Drops every wall that `other` does not also hold.
    ///
    /// Both grids are mirror-consistent, so their intersection is as well.
    pub(crate) fn retain_shared(&mut self, other: &Maze) {
        for (mine, theirs) in self.masks.iter_mut().zip(&other.masks) {
            *mine = mine.difference(mine.difference(*theirs));
        }
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let size = self.size;
        (0..size).flat_map(move |y| (0..size).map(move |x| CellCoord::new(x, y)))
    }

    /// Borrowed view handed to systems.
    #[must_use]
    pub fn view(&self) -> MazeView<'_> {
        MazeView::new(&self.masks, self.size)
    }

    fn put(&mut self, cell: CellCoord, direction: Direction, present: bool) {
        if let Some(index) = self.index(cell) {
            self.masks[index] = self.masks[index].with(direction, present);
        }
        if let Some(neighbor) = cell.neighbor(direction, self.size) {
            if let Some(index) = self.index(neighbor) {
                let mirrored = direction.opposite();
                self.masks[index] = self.masks[index].with(mirrored, present);
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        dense_index(self.size, cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_boundary_and_start_box() {
        let maze = Maze::new(4);

        for index in 0..4 {
            assert!(maze.has_wall(CellCoord::new(index, 3), Direction::North));
            assert!(maze.has_wall(CellCoord::new(3, index), Direction::East));
            assert!(maze.has_wall(CellCoord::new(index, 0), Direction::South));
            assert!(maze.has_wall(CellCoord::new(0, index), Direction::West));
        }

        assert!(maze.has_wall(START_CELL, Direction::East));
        assert!(!maze.has_wall(START_CELL, Direction::North));
        assert!(maze.has_wall(CellCoord::new(1, 0), Direction::West));
        assert!(!maze.has_wall(CellCoord::new(1, 1), Direction::South));
        assert!(maze.is_consistent());
    }

    #[test]
    fn set_wall_mirrors_onto_neighbor() {
        let mut maze = Maze::new(4);
        let cell = CellCoord::new(1, 1);

        maze.set_wall(cell, Direction::North, true).expect("in bounds");
        assert!(maze.has_wall(CellCoord::new(1, 2), Direction::South));

        maze.set_wall(CellCoord::new(1, 2), Direction::South, false)
            .expect("in bounds");
        assert!(!maze.has_wall(cell, Direction::North));
        assert!(maze.is_consistent());
    }

    #[test]
    fn set_wall_out_of_bounds_leaves_maze_untouched() {
        let mut maze = Maze::new(3);
        let before = maze.clone();

        let result = maze.set_wall(CellCoord::new(3, 0), Direction::West, true);

        assert_eq!(
            result,
            Err(MazeError::OutOfBounds {
                cell: CellCoord::new(3, 0),
                size: 3,
            })
        );
        assert_eq!(maze, before);
    }

    #[test]
    fn toggle_wall_flips_both_sides_and_reports_state() {
        let mut maze = Maze::new(4);
        let cell = CellCoord::new(1, 1);
        let walls = maze.wall_count();

        assert_eq!(maze.toggle_wall(cell, Direction::East), Ok(true));
        assert!(maze.has_wall(CellCoord::new(2, 1), Direction::West));
        assert_eq!(maze.wall_count(), walls + 1);

        assert_eq!(maze.toggle_wall(CellCoord::new(2, 1), Direction::West), Ok(false));
        assert!(!maze.has_wall(cell, Direction::East));
        assert_eq!(maze.wall_count(), walls);
    }

    #[test]
    fn boundary_walls_can_be_cleared_without_mirror() {
        let mut maze = Maze::new(3);
        let corner = CellCoord::new(2, 2);

        assert_eq!(maze.toggle_wall(corner, Direction::North), Ok(false));
        assert!(!maze.has_wall(corner, Direction::North));
        assert!(maze.is_consistent());
    }

    #[test]
    fn wall_count_counts_shared_edges_once() {
        let mut maze = Maze::new(4);
        // 16 boundary edges plus the start cell's east side.
        assert_eq!(maze.wall_count(), 17);

        maze.set_wall(CellCoord::new(2, 2), Direction::West, true)
            .expect("in bounds");
        assert_eq!(maze.wall_count(), 18);

        maze.set_wall(CellCoord::new(1, 2), Direction::East, true)
            .expect("in bounds");
        assert_eq!(maze.wall_count(), 18);
    }

    #[test]
    fn retain_shared_keeps_only_common_walls() {
        let mut truth = Maze::new(3);
        truth
            .set_wall(CellCoord::new(2, 1), Direction::East, false)
            .expect("in bounds");
        let mut knowledge = Maze::new(3);
        knowledge
            .set_wall(CellCoord::new(1, 1), Direction::North, true)
            .expect("in bounds");

        knowledge.retain_shared(&truth);

        assert!(!knowledge.has_wall(CellCoord::new(2, 1), Direction::East));
        assert!(!knowledge.has_wall(CellCoord::new(1, 1), Direction::North));
        assert!(knowledge.has_wall(CellCoord::new(2, 2), Direction::East));
        assert!(knowledge.is_subset_of(&truth));
        assert!(knowledge.is_consistent());
    }

    #[test]
    fn apply_layout_reports_stray_placements() {
        let mut maze = Maze::new(3);
        let layout = [
            WallPlacement::new(1, 1, Direction::East),
            WallPlacement::new(5, 1, Direction::East),
        ];

        let result = maze.apply_layout(&layout);

        assert!(matches!(result, Err(MazeError::OutOfBounds { .. })));
        assert!(maze.has_wall(CellCoord::new(2, 1), Direction::West));
    }
}
