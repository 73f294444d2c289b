#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the micromouse simulator.
//!
//! The world owns the true maze, the robot's knowledge map, the active
//! distance field and the trip controller. Adapters mutate it exclusively
//! through [`apply`] and observe it through the [`query`] module.

mod distance;
mod knowledge;
mod maze;
mod trip;

use micromouse_core::{
    CellCoord, Command, Event, MazeError, Phase, Pose, Request, SimulationConfig, WallPlacement,
};
use micromouse_system_navigation::NavigationPolicy;
use tracing::{debug, info, warn};

pub use distance::DistanceField;
pub use knowledge::KnowledgeMap;
pub use maze::Maze;

use trip::TripController;

/// Represents the authoritative simulator state.
#[derive(Clone, Debug)]
pub struct World {
    config: SimulationConfig,
    truth: Maze,
    knowledge: KnowledgeMap,
    field: DistanceField,
    active_goals: Vec<CellCoord>,
    trip: TripController,
    pose: Pose,
    paused: bool,
    stalled_cycles: u32,
    moves: u32,
    recomputes: u32,
}

impl World {
    /// Creates an idle world whose true maze holds only the competition walls.
    pub fn new(config: SimulationConfig) -> Result<Self, MazeError> {
        config.validate()?;

        let truth = Maze::new(config.size);
        let knowledge = KnowledgeMap::new(&truth, config.knowledge);
        let trip = TripController::new(config.trip.clone());
        let mut world = Self {
            config,
            truth,
            knowledge,
            field: DistanceField::default(),
            active_goals: Vec::new(),
            trip,
            pose: Pose::START,
            paused: false,
            stalled_cycles: 0,
            moves: 0,
            recomputes: 0,
        };
        let _ = world.refresh_preview();
        Ok(world)
    }

    /// Creates an idle world and adds every wall of `layout` to the true maze.
    pub fn with_layout(
        config: SimulationConfig,
        layout: &[WallPlacement],
    ) -> Result<Self, MazeError> {
        let mut world = Self::new(config)?;
        world.truth.apply_layout(layout)?;
        let _ = world.refresh_preview();
        Ok(world)
    }

    /// Re-seeds the knowledge map and rebuilds the preview field over the true maze.
    fn refresh_preview(&mut self) -> Event {
        self.knowledge = KnowledgeMap::new(&self.truth, self.config.knowledge);
        let goals = self
            .trip
            .goal_set(&self.config.goals, self.knowledge.visited_view());
        self.rebuild_field(goals)
    }

    fn rebuild_field(&mut self, goals: Vec<CellCoord>) -> Event {
        let phase = self.trip.phase();
        let maze = if phase == Phase::Idle {
            &self.truth
        } else {
            self.knowledge.maze()
        };
        self.field.rebuild(maze, &goals);
        self.recomputes = self.recomputes.saturating_add(1);
        debug!(%phase, goals = goals.len(), "distance field recomputed");

        let goal_count = u32::try_from(goals.len()).unwrap_or(u32::MAX);
        self.active_goals = goals;
        Event::DistanceFieldRecomputed { phase, goal_count }
    }

    fn reset_run_state(&mut self) {
        self.pose = Pose::START;
        self.paused = false;
        self.stalled_cycles = 0;
        self.moves = 0;
    }

    fn stall_threshold(&self) -> u32 {
        self.config.stall_threshold.max(1)
    }

    fn is_stalled(&self) -> bool {
        self.stalled_cycles >= self.stall_threshold()
    }

    fn start_run(&mut self, out_events: &mut Vec<Event>) {
        let phase = self.trip.phase();
        if phase != Phase::Idle {
            let reason = MazeError::InvalidPhaseTransition {
                phase,
                request: Request::StartRun,
            };
            warn!(%reason, "run start rejected");
            out_events.push(Event::RunStartRejected { reason });
            return;
        }

        self.reset_run_state();
        self.knowledge = KnowledgeMap::new(&self.truth, self.config.knowledge);
        let _ = self.knowledge.mark_visited(self.pose.cell);

        let phase = self.trip.begin();
        info!(%phase, "run started");
        out_events.push(Event::RunStarted { phase });

        let goals = self
            .trip
            .goal_set(&self.config.goals, self.knowledge.visited_view());
        out_events.push(self.rebuild_field(goals));
    }

    fn set_paused(&mut self, paused: bool, out_events: &mut Vec<Event>) {
        let phase = self.trip.phase();
        if !phase.is_leg() {
            let reason = MazeError::InvalidPhaseTransition {
                phase,
                request: Request::SetPaused,
            };
            warn!(%reason, "pause rejected");
            out_events.push(Event::PauseRejected { reason });
            return;
        }

        self.paused = paused;
        info!(paused, "pause state changed");
        out_events.push(Event::PauseChanged { paused });
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        let phase = self.trip.phase();
        let rejection = if !phase.is_leg() {
            Some(MazeError::InvalidPhaseTransition {
                phase,
                request: Request::Tick,
            })
        } else if self.paused {
            Some(MazeError::RunPaused)
        } else {
            None
        };

        if let Some(reason) = rejection {
            warn!(%reason, "tick rejected");
            out_events.push(Event::TickRejected { reason });
            return;
        }

        self.run_cycle(out_events);
    }

    /// Executes one sense, re-plan, phase check and move cycle.
    fn run_cycle(&mut self, out_events: &mut Vec<Event>) {
        let cell = self.pose.cell;

        match self.knowledge.sense(&self.truth, cell) {
            Ok(walls) if !walls.is_empty() => {
                debug!(%cell, walls = walls.len(), "walls discovered");
                out_events.push(Event::WallsDiscovered { cell, walls });
                let goals = self
                    .trip
                    .goal_set(&self.config.goals, self.knowledge.visited_view());
                out_events.push(self.rebuild_field(goals));
            }
            Ok(_) => {}
            Err(reason) => {
                warn!(%reason, "sensing failed");
                out_events.push(Event::TickRejected { reason });
                return;
            }
        }

        while self.leg_finished(out_events) {
            let from = self.trip.phase();
            let to = self.trip.advance();
            info!(%from, %to, "phase changed");
            out_events.push(Event::PhaseChanged { from, to });

            if to == Phase::Done {
                info!(moves = self.moves, "run completed");
                out_events.push(Event::RunCompleted { moves: self.moves });
                return;
            }
        }

        let bias = self.trip.leg().map(|leg| leg.bias).unwrap_or_default();
        let choice = NavigationPolicy::new(bias).choose_move(
            cell,
            self.knowledge.maze().view(),
            self.field.view(),
            self.knowledge.visited_view(),
        );
        let next = choice.and_then(|direction| {
            cell.neighbor(direction, self.truth.size())
                .map(|next| (direction, next))
        });

        match next {
            Some((direction, to)) => {
                self.pose = Pose {
                    cell: to,
                    facing: direction,
                };
                let _ = self.knowledge.mark_visited(to);
                self.moves = self.moves.saturating_add(1);
                self.stalled_cycles = 0;
                out_events.push(Event::RobotMoved {
                    from: cell,
                    to,
                    direction,
                });
            }
            None => {
                self.stalled_cycles = self.stalled_cycles.saturating_add(1);
                if self.stalled_cycles == self.stall_threshold() {
                    warn!(%cell, cycles = self.stalled_cycles, "robot stalled");
                    out_events.push(Event::RobotStalled {
                        cell,
                        cycles: self.stalled_cycles,
                    });
                }
            }
        }
    }

    /// Syncs the field with the active leg's goals and reports whether the leg is over.
    fn leg_finished(&mut self, out_events: &mut Vec<Event>) -> bool {
        let goals = self
            .trip
            .goal_set(&self.config.goals, self.knowledge.visited_view());

        if self.trip.phase() == Phase::GoalScan && goals.is_empty() {
            return true;
        }

        if goals != self.active_goals {
            out_events.push(self.rebuild_field(goals));
        }
        self.field.distance(self.pose.cell) == Some(0)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ToggleWall { cell, direction } => {
            let phase = world.trip.phase();
            if phase != Phase::Idle {
                let reason = MazeError::InvalidPhaseTransition {
                    phase,
                    request: Request::ToggleWall,
                };
                warn!(%cell, %direction, %reason, "wall edit rejected");
                out_events.push(Event::WallToggleRejected {
                    cell,
                    direction,
                    reason,
                });
                return;
            }

            match world.truth.toggle_wall(cell, direction) {
                Ok(present) => {
                    out_events.push(Event::WallToggled {
                        cell,
                        direction,
                        present,
                    });
                    out_events.push(world.refresh_preview());
                }
                Err(reason) => {
                    warn!(%cell, %direction, %reason, "wall edit rejected");
                    out_events.push(Event::WallToggleRejected {
                        cell,
                        direction,
                        reason,
                    });
                }
            }
        }
        Command::StartRun => world.start_run(out_events),
        Command::ResetRun => {
            world.trip.reset();
            world.reset_run_state();
            info!("run reset");
            out_events.push(Event::RunReset);
            out_events.push(world.refresh_preview());
        }
        Command::SetPaused { paused } => world.set_paused(paused, out_events),
        Command::Tick => world.tick(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use micromouse_core::{
        CellCoord, DistanceView, Leg, Phase, Pose, RunStatus, SimulationConfig, TripPlan,
        VisitedView,
    };

    use super::{DistanceField, KnowledgeMap, Maze, World};

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &SimulationConfig {
        &world.config
    }

    /// Walls of the true maze.
    #[must_use]
    pub fn truth_maze(world: &World) -> &Maze {
        &world.truth
    }

    /// Walls the robot currently knows about.
    #[must_use]
    pub fn knowledge_maze(world: &World) -> &Maze {
        world.knowledge.maze()
    }

    /// Full knowledge map including visited flags.
    #[must_use]
    pub fn knowledge(world: &World) -> &KnowledgeMap {
        &world.knowledge
    }

    /// Number of distinct walls known to the robot.
    #[must_use]
    pub fn known_wall_count(world: &World) -> usize {
        world.knowledge.wall_count()
    }

    /// Active distance field.
    ///
    /// While idle the field previews the first leg over the true maze; during
    /// a run it covers the knowledge map for the active leg's goals.
    #[must_use]
    pub fn distance_field(world: &World) -> &DistanceField {
        &world.field
    }

    /// Borrowed view of the active distance field.
    #[must_use]
    pub fn distance_view(world: &World) -> DistanceView<'_> {
        world.field.view()
    }

    /// Goal cells that seeded the active distance field.
    #[must_use]
    pub fn active_goals(world: &World) -> &[CellCoord] {
        &world.active_goals
    }

    /// Cells entered during the current run.
    #[must_use]
    pub fn visited(world: &World) -> VisitedView<'_> {
        world.knowledge.visited_view()
    }

    /// Robot position and heading.
    #[must_use]
    pub fn pose(world: &World) -> Pose {
        world.pose
    }

    /// Active trip phase.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.trip.phase()
    }

    /// Leg being travelled, if a run is active.
    #[must_use]
    pub fn leg(world: &World) -> Option<Leg> {
        world.trip.leg()
    }

    /// Trip plan executed by each run.
    #[must_use]
    pub fn trip_plan(world: &World) -> &TripPlan {
        world.trip.plan()
    }

    /// Observable status of the current run.
    #[must_use]
    pub fn status(world: &World) -> RunStatus {
        match world.trip.phase() {
            Phase::Idle => RunStatus::Idle,
            Phase::Done => RunStatus::Done,
            _ if world.paused => RunStatus::Paused,
            _ if world.is_stalled() => RunStatus::Stalled,
            _ => RunStatus::Running,
        }
    }

    /// Moves made since the run started.
    #[must_use]
    pub fn move_count(world: &World) -> u32 {
        world.moves
    }

    /// Number of distance field rebuilds since the world was created.
    #[must_use]
    pub fn recompute_count(world: &World) -> u32 {
        world.recomputes
    }
}
