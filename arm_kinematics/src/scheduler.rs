//! Target grid scheduling and the per-target solve lifecycle.
//!
//! The scheduler owns the ordered target sequence, the grid cursor and the
//! last-known pose. One external tick drives one bounded unit of work: a
//! single solver step, or the settle-and-refine sequence on the tick a
//! target comes within tolerance. The render loop calls `tick` once per
//! frame and reads the pose accessors; it never mutates anything.

use nalgebra::Point3;
use tracing::{debug, info, warn};

use crate::errors::ArmError;
use crate::grid::GridConfig;
use crate::kinematics::ArmKinematics;
use crate::refine::WholeAngleRefiner;
use crate::solver::IkSolver;
use crate::table::LookupTable;
use crate::JointAngles;

/// Solve lifecycle of a single target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    /// The solver is still iterating toward the goal.
    Solving,
    /// Within tolerance; settle steps have run.
    Converged,
    /// Whole-degree refinement applied. Terminal.
    Refined,
    /// Hit the iteration cap without reaching tolerance. Terminal.
    Unsolved,
}

impl TargetState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TargetState::Refined | TargetState::Unsolved)
    }
}

/// One grid cell being solved.
#[derive(Debug, Clone)]
pub struct TargetPoint {
    /// Immutable goal assigned at creation.
    pub initial_pos: Point3<f64>,
    /// The goal while solving; the reached position once solving ends.
    pub pos: Point3<f64>,
    pub state: TargetState,
    /// Continuous angles while solving, whole degrees after refinement.
    pub rots: JointAngles,
    /// Solver steps spent on this target.
    pub iterations: u32,
}

impl TargetPoint {
    pub fn new(goal: Point3<f64>, seed: JointAngles) -> Self {
        Self {
            initial_pos: goal,
            pos: goal,
            state: TargetState::Solving,
            rots: seed,
            iterations: 0,
        }
    }

    /// Whether the solver reached the convergence tolerance.
    pub fn found(&self) -> bool {
        matches!(self.state, TargetState::Converged | TargetState::Refined)
    }
}

/// Result of one scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// A unit of work was done; call again.
    Working,
    /// The last grid cell just reached a terminal state. Reported once.
    Completed,
    /// Everything was already done; the tick was a no-op.
    Idle,
}

/// Pose the very first target is seeded from; later targets warm-start from
/// the previous target's final angles.
const REST_POSE: JointAngles = JointAngles::new(0.0, -22.0, -65.0, -80.0);

/// Owns the target sequence and drives each target through
/// solve, settle and refinement, one unit of work per tick.
pub struct GridScheduler {
    kinematics: ArmKinematics,
    solver: IkSolver,
    refiner: WholeAngleRefiner,
    grid: GridConfig,
    targets: Vec<TargetPoint>,
    next_cell: usize,
    last_pose: JointAngles,
    completion_reported: bool,
}

impl GridScheduler {
    pub fn new(
        kinematics: ArmKinematics,
        solver: IkSolver,
        refiner: WholeAngleRefiner,
        grid: GridConfig,
    ) -> Result<Self, ArmError> {
        grid.validate().map_err(ArmError::Configuration)?;
        let capacity = grid.cell_count();
        Ok(Self {
            kinematics,
            solver,
            refiner,
            grid,
            targets: Vec::with_capacity(capacity),
            next_cell: 0,
            last_pose: REST_POSE,
            completion_reported: false,
        })
    }

    /// Drive one unit of work.
    ///
    /// Creates the next target when the current one is finished, otherwise
    /// advances the current solve by one step. Returns `Completed` exactly
    /// once, on the tick after the final target reaches a terminal state.
    pub fn tick(&mut self) -> TickStatus {
        if self.is_complete() {
            if self.completion_reported {
                return TickStatus::Idle;
            }
            self.completion_reported = true;
            info!(targets = self.targets.len(), "grid solve complete");
            return TickStatus::Completed;
        }

        if self.targets.last().map_or(true, |t| t.state.is_terminal()) {
            let goal = self.grid.cell(self.next_cell);
            self.next_cell += 1;
            debug!(x = goal.x, y = goal.y, z = goal.z, "starting target");
            self.targets.push(TargetPoint::new(goal, self.last_pose));
        }

        if let Some(target) = self.targets.last_mut() {
            let dist = self.solver.step(&self.kinematics, target);

            if dist <= self.solver.tolerance() {
                let settled = self.solver.settle(&self.kinematics, target);
                target.pos = self.kinematics.forward(&target.rots);
                target.state = TargetState::Converged;
                debug!(
                    distance = settled,
                    iterations = target.iterations,
                    angles = %target.rots,
                    "found"
                );
                self.refiner.refine(&self.kinematics, target);
                target.state = TargetState::Refined;
            } else if target.iterations >= self.solver.max_iterations() {
                warn!(
                    x = target.initial_pos.x,
                    z = target.initial_pos.z,
                    iterations = target.iterations,
                    distance = dist,
                    "iteration cap hit; keeping nearest whole-degree pose"
                );
                // Its table row gets the nearest whole-degree pose anyway.
                self.refiner.refine(&self.kinematics, target);
                target.state = TargetState::Unsolved;
            }

            self.last_pose = target.rots;
        }

        TickStatus::Working
    }

    /// True once every grid cell has a target in a terminal state.
    pub fn is_complete(&self) -> bool {
        self.next_cell >= self.grid.cell_count()
            && self.targets.last().map_or(false, |t| t.state.is_terminal())
    }

    /// Angles the display collaborator poses the arm mesh with.
    pub fn current_pose(&self) -> &JointAngles {
        &self.last_pose
    }

    /// Live end-effector position for the current pose.
    pub fn effector_position(&self) -> Point3<f64> {
        self.kinematics.forward(&self.last_pose)
    }

    pub fn targets(&self) -> &[TargetPoint] {
        &self.targets
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    pub fn kinematics(&self) -> &ArmKinematics {
        &self.kinematics
    }

    /// The logical angle table; meaningful once `is_complete` returns true.
    pub fn lookup_table(&self) -> LookupTable {
        LookupTable::build(&self.grid, &self.targets)
    }
}
