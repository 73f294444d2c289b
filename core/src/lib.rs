#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the micromouse simulator.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! changed. Systems read the world through the borrowed views defined here
//! ([`MazeView`], [`DistanceView`], [`VisitedView`]) and never mutate it.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel distance meaning "no currently known open path to any goal".
pub const UNREACHABLE: u16 = u16::MAX;

/// Side length used when no explicit maze size is configured.
pub const DEFAULT_MAZE_SIZE: u32 = 10;

/// Largest supported side length. Keeps every finite distance below [`UNREACHABLE`].
pub const MAX_MAZE_SIZE: u32 = 255;

/// Score bonus granted to unvisited neighbors by [`BiasMode::ScoreBiased`] by default.
pub const DEFAULT_UNVISITED_BONUS: u16 = 3;

/// Consecutive move-less cycles after which a running robot is reported as stalled.
pub const DEFAULT_STALL_THRESHOLD: u32 = 3;

/// Cell every run starts from.
pub const START_CELL: CellCoord = CellCoord::new(0, 0);

/// Cardinal directions, enumerated in tie-break order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward increasing `y`.
    North,
    /// Toward increasing `x`.
    East,
    /// Toward decreasing `y`.
    South,
    /// Toward decreasing `x`.
    West,
}

impl Direction {
    /// All directions in deterministic enumeration order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Direction pointing the other way across the same wall edge.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Unit vector `(dx, dy)` of the direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::North => 0b0001,
            Self::East => 0b0010,
            Self::South => 0b0100,
            Self::West => 0b1000,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        };
        f.write_str(name)
    }
}

/// Location of a single maze cell. `(0, 0)` is the south-west corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: u32,
    y: u32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the cell, growing eastward.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row of the cell, growing northward.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Reports whether the cell lies inside a square maze of the given side.
    #[must_use]
    pub const fn within(&self, size: u32) -> bool {
        self.x < size && self.y < size
    }

    /// Adjacent cell in `direction`, or `None` when it would leave the maze.
    #[must_use]
    pub fn neighbor(self, direction: Direction, size: u32) -> Option<CellCoord> {
        let (dx, dy) = direction.delta();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        let cell = CellCoord::new(x, y);
        cell.within(size).then_some(cell)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Four-bit set of wall flags, one per [`Direction`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallMask(u8);

impl WallMask {
    /// Mask without any walls.
    pub const EMPTY: WallMask = WallMask(0);

    /// Mask with a wall on every side.
    pub const ALL: WallMask = WallMask(0b1111);

    /// Mask holding a single wall.
    #[must_use]
    pub const fn single(direction: Direction) -> Self {
        Self(direction.bit())
    }

    /// Reports whether the wall on `direction` is present.
    #[must_use]
    pub const fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    /// Returns a copy with the wall on `direction` set to `present`.
    #[must_use]
    pub const fn with(self, direction: Direction, present: bool) -> Self {
        if present {
            Self(self.0 | direction.bit())
        } else {
            Self(self.0 & !direction.bit())
        }
    }

    /// Reports whether no wall is present.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of walls present.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Walls present in `self` but absent from `other`.
    #[must_use]
    pub const fn difference(self, other: WallMask) -> Self {
        Self(self.0 & !other.0)
    }

    /// Iterates the directions holding a wall, in enumeration order.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |direction| self.contains(*direction))
    }
}

/// Row-major slot of `cell` in a dense grid of side `size`.
///
/// Returns `None` for cells outside the grid. Every per-cell buffer in the
/// simulator is laid out with this function.
#[must_use]
pub fn dense_index(size: u32, cell: CellCoord) -> Option<usize> {
    if !cell.within(size) {
        return None;
    }
    let x = usize::try_from(cell.x()).ok()?;
    let y = usize::try_from(cell.y()).ok()?;
    let width = usize::try_from(size).ok()?;
    y.checked_mul(width)?.checked_add(x)
}

/// Read-only view into a dense grid of wall masks.
#[derive(Clone, Copy, Debug)]
pub struct MazeView<'a> {
    masks: &'a [WallMask],
    size: u32,
}

impl<'a> MazeView<'a> {
    /// Captures a new maze view backed by row-major wall masks.
    #[must_use]
    pub fn new(masks: &'a [WallMask], size: u32) -> Self {
        Self { masks, size }
    }

    /// Side length of the maze in cells.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Wall mask of the provided cell. Cells outside the maze are fully walled.
    #[must_use]
    pub fn walls(&self, cell: CellCoord) -> WallMask {
        dense_index(self.size, cell)
            .and_then(|index| self.masks.get(index).copied())
            .unwrap_or(WallMask::ALL)
    }

    /// Reports whether a wall blocks `direction` out of `cell`.
    #[must_use]
    pub fn has_wall(&self, cell: CellCoord, direction: Direction) -> bool {
        self.walls(cell).contains(direction)
    }
}

/// Read-only view into a dense distance field.
#[derive(Clone, Copy, Debug)]
pub struct DistanceView<'a> {
    cells: &'a [u16],
    size: u32,
}

impl<'a> DistanceView<'a> {
    /// Captures a new distance view backed by row-major distances.
    #[must_use]
    pub fn new(cells: &'a [u16], size: u32) -> Self {
        Self { cells, size }
    }

    /// Distance recorded for `cell`, or `None` outside the field.
    ///
    /// Cells without a known path report [`UNREACHABLE`].
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u16> {
        dense_index(self.size, cell).and_then(|index| self.cells.get(index).copied())
    }
}

/// Read-only view into the per-cell visited flags.
#[derive(Clone, Copy, Debug)]
pub struct VisitedView<'a> {
    cells: &'a [bool],
    size: u32,
}

impl<'a> VisitedView<'a> {
    /// Captures a new visited view backed by row-major flags.
    #[must_use]
    pub fn new(cells: &'a [bool], size: u32) -> Self {
        Self { cells, size }
    }

    /// Reports whether the robot has entered `cell` during the current run.
    #[must_use]
    pub fn is_visited(&self, cell: CellCoord) -> bool {
        dense_index(self.size, cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Number of visited cells.
    #[must_use]
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|visited| **visited).count()
    }
}

/// Phases of the trip state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No run is active; the maze may be edited.
    Idle,
    /// First run from the start cell to the goal region.
    Outbound,
    /// Visits every goal-region cell once.
    GoalScan,
    /// Run from the goal region back to the start cell.
    Return,
    /// Repeated start-to-goal run using all accumulated knowledge.
    OutboundFinal,
    /// Repeated goal-to-start run closing the second round trip.
    ReturnFinal,
    /// The trip plan finished; no further moves are accepted.
    Done,
}

impl Phase {
    /// Reports whether the phase is one of the robot's travelling legs.
    #[must_use]
    pub const fn is_leg(self) -> bool {
        !matches!(self, Self::Idle | Self::Done)
    }

    /// Reports whether the leg heads back to the start cell.
    #[must_use]
    pub const fn targets_start(self) -> bool {
        matches!(self, Self::Return | Self::ReturnFinal)
    }

    /// Reports whether `next` may directly follow `self` within a trip plan.
    #[must_use]
    pub const fn may_precede(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Self::Outbound, Self::GoalScan)
                | (Self::Outbound, Self::Return)
                | (Self::GoalScan, Self::Return)
                | (Self::Return, Self::OutboundFinal)
                | (Self::OutboundFinal, Self::ReturnFinal)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Outbound => "outbound",
            Self::GoalScan => "goal scan",
            Self::Return => "return",
            Self::OutboundFinal => "final outbound",
            Self::ReturnFinal => "final return",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Tie-break policy applied when choosing among neighboring cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasMode {
    /// Lowest neighbor distance wins; ties follow direction enumeration order.
    #[default]
    PureGreedy,
    /// Lowest distance wins; unvisited neighbors beat visited ones on ties.
    UnvisitedFirst,
    /// Unvisited neighbors have `bonus` subtracted from their distance before comparison.
    ScoreBiased {
        /// Distance credit granted to unvisited neighbors.
        bonus: u16,
    },
}

impl BiasMode {
    /// Score-biased mode using [`DEFAULT_UNVISITED_BONUS`].
    #[must_use]
    pub const fn score_biased() -> Self {
        Self::ScoreBiased {
            bonus: DEFAULT_UNVISITED_BONUS,
        }
    }
}

/// Single leg of a trip plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Leg {
    /// Phase executed by the leg.
    pub phase: Phase,
    /// Tie-break policy used while the leg is active.
    #[serde(default)]
    pub bias: BiasMode,
}

impl Leg {
    /// Creates a new leg descriptor.
    #[must_use]
    pub const fn new(phase: Phase, bias: BiasMode) -> Self {
        Self { phase, bias }
    }
}

/// Ordered sequence of legs executed by the trip controller.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TripPlan {
    legs: Vec<Leg>,
}

impl TripPlan {
    /// Builds a plan from explicit legs, rejecting illegal successions.
    pub fn new(legs: Vec<Leg>) -> Result<Self, MazeError> {
        let plan = Self { legs };
        plan.validate()?;
        Ok(plan)
    }

    /// One greedy outbound run.
    #[must_use]
    pub fn single_run() -> Self {
        Self {
            legs: vec![Leg::new(Phase::Outbound, BiasMode::PureGreedy)],
        }
    }

    /// Greedy outbound run followed by an exploring return.
    #[must_use]
    pub fn round_trip() -> Self {
        Self {
            legs: vec![
                Leg::new(Phase::Outbound, BiasMode::PureGreedy),
                Leg::new(Phase::Return, BiasMode::UnvisitedFirst),
            ],
        }
    }

    /// Outbound run, a sweep over every goal cell, then an exploring return.
    #[must_use]
    pub fn scan_round_trip() -> Self {
        Self {
            legs: vec![
                Leg::new(Phase::Outbound, BiasMode::PureGreedy),
                Leg::new(Phase::GoalScan, BiasMode::PureGreedy),
                Leg::new(Phase::Return, BiasMode::UnvisitedFirst),
            ],
        }
    }

    /// Exploring round trip followed by a straight repeat of both legs.
    #[must_use]
    pub fn speed_run() -> Self {
        Self {
            legs: vec![
                Leg::new(Phase::Outbound, BiasMode::score_biased()),
                Leg::new(Phase::Return, BiasMode::score_biased()),
                Leg::new(Phase::OutboundFinal, BiasMode::PureGreedy),
                Leg::new(Phase::ReturnFinal, BiasMode::PureGreedy),
            ],
        }
    }

    /// Legs in execution order.
    #[must_use]
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Leg at `index`, if the plan is that long.
    #[must_use]
    pub fn leg(&self, index: usize) -> Option<Leg> {
        self.legs.get(index).copied()
    }

    /// Checks that the plan starts outbound and only uses legal successions.
    pub fn validate(&self) -> Result<(), MazeError> {
        let Some(first) = self.legs.first() else {
            return Err(MazeError::InvalidTripPlan(TripPlanError::Empty));
        };
        if first.phase != Phase::Outbound {
            return Err(MazeError::InvalidTripPlan(
                TripPlanError::MustStartOutbound { found: first.phase },
            ));
        }
        for pair in self.legs.windows(2) {
            let (from, to) = (pair[0].phase, pair[1].phase);
            if !from.may_precede(to) {
                return Err(MazeError::InvalidTripPlan(
                    TripPlanError::IllegalSuccession { from, to },
                ));
            }
        }
        Ok(())
    }
}

impl Default for TripPlan {
    fn default() -> Self {
        Self::round_trip()
    }
}

/// How much of the true maze the robot knows when a run starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeMode {
    /// Only the boundary and start box are known; interior walls are sensed.
    #[default]
    Discover,
    /// Every wall of the true maze is known up front.
    Omniscient,
}

/// Immutable configuration passed to the world at construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Side length of the square maze.
    pub size: u32,
    /// Cells forming the goal region.
    pub goals: Vec<CellCoord>,
    /// Legs executed by each run.
    pub trip: TripPlan,
    /// Initial knowledge granted to the robot.
    pub knowledge: KnowledgeMode,
    /// Consecutive move-less cycles before a stall is reported.
    pub stall_threshold: u32,
}

impl SimulationConfig {
    /// Default configuration for a maze of the provided side length.
    #[must_use]
    pub fn with_size(size: u32) -> Self {
        Self {
            size,
            goals: center_goals(size),
            ..Self::default()
        }
    }

    /// Checks the maze dimensions, goal cells and trip plan.
    pub fn validate(&self) -> Result<(), MazeError> {
        if self.size == 0 {
            return Err(MazeError::InvalidConfig(ConfigError::ZeroSize));
        }
        if self.size > MAX_MAZE_SIZE {
            return Err(MazeError::InvalidConfig(ConfigError::SizeTooLarge {
                size: self.size,
            }));
        }
        if self.goals.is_empty() {
            return Err(MazeError::InvalidConfig(ConfigError::NoGoals));
        }
        if let Some(cell) = self.goals.iter().find(|cell| !cell.within(self.size)) {
            return Err(MazeError::InvalidConfig(ConfigError::GoalOutOfBounds {
                cell: *cell,
            }));
        }
        self.trip.validate()
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_MAZE_SIZE,
            goals: center_goals(DEFAULT_MAZE_SIZE),
            trip: TripPlan::default(),
            knowledge: KnowledgeMode::default(),
            stall_threshold: DEFAULT_STALL_THRESHOLD,
        }
    }
}

/// Center goal region: the 2x2 block for even sides, the middle cell for odd ones.
#[must_use]
pub fn center_goals(size: u32) -> Vec<CellCoord> {
    if size == 0 {
        return Vec::new();
    }

    let high = size / 2;
    if size % 2 == 1 {
        return vec![CellCoord::new(high, high)];
    }

    let low = high - 1;
    vec![
        CellCoord::new(low, low),
        CellCoord::new(low, high),
        CellCoord::new(high, low),
        CellCoord::new(high, high),
    ]
}

/// Robot position and heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    /// Cell the robot occupies.
    pub cell: CellCoord,
    /// Direction of the robot's last move, or north before the first one.
    pub facing: Direction,
}

impl Pose {
    /// Pose every run begins with: the start cell, facing out of the start box.
    pub const START: Pose = Pose {
        cell: START_CELL,
        facing: Direction::North,
    };
}

/// Wall triple used to describe a maze layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallPlacement {
    /// Column of the cell owning the wall.
    pub x: u32,
    /// Row of the cell owning the wall.
    pub y: u32,
    /// Side of the cell the wall sits on.
    pub direction: Direction,
}

impl WallPlacement {
    /// Creates a new wall triple.
    #[must_use]
    pub const fn new(x: u32, y: u32, direction: Direction) -> Self {
        Self { x, y, direction }
    }

    /// Cell owning the wall.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        CellCoord::new(self.x, self.y)
    }
}

/// Observable state of the current run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// No run is active.
    Idle,
    /// The robot is travelling and the last cycle made progress.
    Running,
    /// Ticks are suspended until the run is resumed.
    Paused,
    /// The robot chose no move for at least the configured number of cycles.
    Stalled,
    /// Every leg of the trip plan completed.
    Done,
}

/// Requests that may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Request {
    /// Editing a wall of the true maze.
    ToggleWall,
    /// Starting a run.
    StartRun,
    /// Pausing or resuming a run.
    SetPaused,
    /// Advancing one control cycle.
    Tick,
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ToggleWall => "toggle a wall",
            Self::StartRun => "start a run",
            Self::SetPaused => "change the pause state",
            Self::Tick => "advance a cycle",
        };
        f.write_str(name)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Flips one wall of the true maze. Only accepted while idle.
    ToggleWall {
        /// Cell owning the wall.
        cell: CellCoord,
        /// Side of the cell the wall sits on.
        direction: Direction,
    },
    /// Starts a run at the beginning of the trip plan.
    StartRun,
    /// Abandons the active run and returns the robot to the start cell.
    ResetRun,
    /// Suspends or resumes control cycles of the active run.
    SetPaused {
        /// Whether ticks should be suspended.
        paused: bool,
    },
    /// Advances the active run by one control cycle.
    Tick,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that a wall of the true maze changed.
    WallToggled {
        /// Cell owning the wall.
        cell: CellCoord,
        /// Side of the cell the wall sits on.
        direction: Direction,
        /// Wall state after the toggle.
        present: bool,
    },
    /// Reports that a wall edit was refused.
    WallToggleRejected {
        /// Cell named by the request.
        cell: CellCoord,
        /// Side named by the request.
        direction: Direction,
        /// Specific reason the edit failed.
        reason: MazeError,
    },
    /// Announces that the distance field was rebuilt.
    DistanceFieldRecomputed {
        /// Phase whose goal set seeded the flood fill.
        phase: Phase,
        /// Number of goal cells seeding the flood fill.
        goal_count: u32,
    },
    /// Announces that a run began.
    RunStarted {
        /// First leg of the run.
        phase: Phase,
    },
    /// Reports that a run could not be started.
    RunStartRejected {
        /// Specific reason the start failed.
        reason: MazeError,
    },
    /// Confirms that the run state was discarded.
    RunReset,
    /// Confirms a pause state change.
    PauseChanged {
        /// Pause state after the command.
        paused: bool,
    },
    /// Reports that a pause request was refused.
    PauseRejected {
        /// Specific reason the request failed.
        reason: MazeError,
    },
    /// Reports walls sensed for the first time.
    WallsDiscovered {
        /// Cell the robot sensed from.
        cell: CellCoord,
        /// Sides of the cell holding newly discovered walls.
        walls: WallMask,
    },
    /// Announces a transition between trip phases.
    PhaseChanged {
        /// Phase that finished.
        from: Phase,
        /// Phase that became active.
        to: Phase,
    },
    /// Confirms that the robot moved between two cells.
    RobotMoved {
        /// Cell the robot occupied before moving.
        from: CellCoord,
        /// Cell the robot occupies after moving.
        to: CellCoord,
        /// Direction of travel.
        direction: Direction,
    },
    /// Reports that the robot chose no move for the configured number of cycles.
    RobotStalled {
        /// Cell the robot is stuck in.
        cell: CellCoord,
        /// Consecutive move-less cycles observed.
        cycles: u32,
    },
    /// Announces that every leg of the trip plan completed.
    RunCompleted {
        /// Total moves made during the run.
        moves: u32,
    },
    /// Reports that a tick was refused.
    TickRejected {
        /// Specific reason the tick failed.
        reason: MazeError,
    },
}

/// Errors reported by maze operations and refused commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum MazeError {
    /// The coordinate lies outside the grid.
    #[error("cell {cell} lies outside the {size}x{size} maze")]
    OutOfBounds {
        /// Offending coordinate.
        cell: CellCoord,
        /// Side length of the maze.
        size: u32,
    },
    /// The request is not valid in the current phase.
    #[error("cannot {request} while the trip is {phase}")]
    InvalidPhaseTransition {
        /// Phase active when the request arrived.
        phase: Phase,
        /// Request that was refused.
        request: Request,
    },
    /// Control cycles are suspended.
    #[error("the run is paused")]
    RunPaused,
    /// The trip plan violates the phase transition table.
    #[error("invalid trip plan: {0}")]
    InvalidTripPlan(TripPlanError),
    /// The simulation configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(ConfigError),
}

/// Reasons a trip plan is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum TripPlanError {
    /// The plan holds no legs.
    #[error("the plan has no legs")]
    Empty,
    /// The first leg is not an outbound run.
    #[error("the first leg must be outbound, found {found}")]
    MustStartOutbound {
        /// Phase of the first leg.
        found: Phase,
    },
    /// Two consecutive legs are not connected in the transition table.
    #[error("{to} cannot follow {from}")]
    IllegalSuccession {
        /// Earlier leg.
        from: Phase,
        /// Later leg.
        to: Phase,
    },
}

/// Reasons a simulation configuration is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum ConfigError {
    /// The maze has no cells.
    #[error("maze size must be positive")]
    ZeroSize,
    /// The maze is too large for 16-bit distances.
    #[error("maze size {size} exceeds the supported maximum of {}", MAX_MAZE_SIZE)]
    SizeTooLarge {
        /// Requested side length.
        size: u32,
    },
    /// No goal cell was configured.
    #[error("at least one goal cell is required")]
    NoGoals,
    /// A goal cell lies outside the maze.
    #[error("goal cell {cell} lies outside the maze")]
    GoalOutOfBounds {
        /// Offending goal cell.
        cell: CellCoord,
    },
}
