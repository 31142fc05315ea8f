//! Whole-degree refinement of a converged solution.
//!
//! The embedded consumer stores joint angles as whole degrees. Truncating
//! the continuous solution can land millimeters off the goal because the
//! chain is nonlinear in angle, so the refiner instead searches every
//! whole-degree combination in a small window around the converged angles
//! and keeps the one closest to the original goal.

use nalgebra::distance_squared;

use crate::kinematics::ArmKinematics;
use crate::scheduler::TargetPoint;
use crate::{Joint, JointAngles};

/// Bounded exhaustive search for the best whole-degree angle combination.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeAngleRefiner;

impl WholeAngleRefiner {
    /// Offsets tried per joint. The window spans floor(angle) - 1 through
    /// floor(angle) + 2, which covers both truncation and rounding of a
    /// continuous solution that landed within a degree or so of the optimum.
    const WINDOW: usize = 4;

    /// Replace `target.rots` with the best whole-degree combination in the
    /// search window, scored by squared distance to `target.initial_pos`,
    /// and `target.pos` with the position that combination reaches.
    ///
    /// The result is the best combination within the window; outside it no
    /// claim is made. Called once per target after solving ends.
    pub fn refine(&self, kinematics: &ArmKinematics, target: &mut TargetPoint) {
        let mut base = [0.0; Joint::COUNT];
        for joint in Joint::ALL {
            base[joint.index()] = target.rots[joint].floor() - 1.0;
        }

        // The all-zero offset combination doubles as the fallback: `best`
        // starts valid and every other candidate has to beat it.
        let mut offsets = [0usize; Joint::COUNT];
        let mut best_rots = candidate(&base, &offsets);
        let mut best_pos = kinematics.forward(&best_rots);
        let mut best_sq = distance_squared(&best_pos, &target.initial_pos);

        while bump(&mut offsets) {
            let rots = candidate(&base, &offsets);
            let pos = kinematics.forward(&rots);
            let sq = distance_squared(&pos, &target.initial_pos);
            if sq < best_sq {
                best_sq = sq;
                best_rots = rots;
                best_pos = pos;
            }
        }

        target.rots = best_rots;
        target.pos = best_pos;
    }
}

fn candidate(base: &[f64; Joint::COUNT], offsets: &[usize; Joint::COUNT]) -> JointAngles {
    let mut angles = [0.0; Joint::COUNT];
    for i in 0..Joint::COUNT {
        angles[i] = base[i] + offsets[i] as f64;
    }
    JointAngles::from(angles)
}

/// Advance the offset odometer; false once every combination has been seen.
fn bump(offsets: &mut [usize; Joint::COUNT]) -> bool {
    for slot in offsets.iter_mut() {
        *slot += 1;
        if *slot < WholeAngleRefiner::WINDOW {
            return true;
        }
        *slot = 0;
    }
    false
}
