//! Phase sequencing for multi-leg trips.

use micromouse_core::{CellCoord, Leg, Phase, TripPlan, VisitedView, START_CELL};

/// Walks the legs of a [`TripPlan`] in order.
///
/// The controller starts idle, enters the first leg when a run begins, and
/// reaches [`Phase::Done`] after the last leg finishes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TripController {
    plan: TripPlan,
    leg_index: Option<usize>,
    phase: Phase,
}

impl TripController {
    pub(crate) fn new(plan: TripPlan) -> Self {
        Self {
            plan,
            leg_index: None,
            phase: Phase::Idle,
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn plan(&self) -> &TripPlan {
        &self.plan
    }

    /// Leg currently being travelled, if any.
    pub(crate) fn leg(&self) -> Option<Leg> {
        if !self.phase.is_leg() {
            return None;
        }
        self.leg_index.and_then(|index| self.plan.leg(index))
    }

    /// Enters the first leg. Returns the new phase.
    pub(crate) fn begin(&mut self) -> Phase {
        self.enter(0)
    }

    /// Moves past the current leg. Returns the new phase.
    pub(crate) fn advance(&mut self) -> Phase {
        let next = self.leg_index.map_or(0, |index| index + 1);
        self.enter(next)
    }

    pub(crate) fn reset(&mut self) {
        self.leg_index = None;
        self.phase = Phase::Idle;
    }

    /// Cells the flood fill should target while `self.phase` is active.
    ///
    /// While idle the preview targets the first leg's goals.
    pub(crate) fn goal_set(
        &self,
        goals: &[CellCoord],
        visited: VisitedView<'_>,
    ) -> Vec<CellCoord> {
        let phase = match self.phase {
            Phase::Idle => self.plan.leg(0).map_or(Phase::Outbound, |leg| leg.phase),
            phase => phase,
        };

        match phase {
            phase if phase.targets_start() => vec![START_CELL],
            Phase::GoalScan => goals
                .iter()
                .copied()
                .filter(|cell| !visited.is_visited(*cell))
                .collect(),
            Phase::Done => Vec::new(),
            _ => goals.to_vec(),
        }
    }

    fn enter(&mut self, index: usize) -> Phase {
        match self.plan.leg(index) {
            Some(leg) => {
                self.leg_index = Some(index);
                self.phase = leg.phase;
            }
            None => {
                self.leg_index = None;
                self.phase = Phase::Done;
            }
        }
        self.phase
    }
}
