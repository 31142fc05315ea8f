use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

pub mod arm_config;
pub mod errors;
pub mod grid;
pub mod kinematics;
pub mod refine;
pub mod scheduler;
pub mod solver;
pub mod table;

pub use arm_config::ArmConfig;
pub use errors::*;
pub use grid::{AxisRange, GridConfig};
pub use kinematics::ArmKinematics;
pub use refine::WholeAngleRefiner;
pub use scheduler::{GridScheduler, TargetPoint, TargetState, TickStatus};
pub use solver::IkSolver;
pub use table::{AxisSummary, LookupTable, TableRow};

/// Joints of the arm, in chain order from the base.
#[repr(u8)]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joint {
    BaseRotation = 0,
    Shoulder = 1,
    Elbow = 2,
    Wrist = 3,
}

impl Joint {
    /// Number of joints in the chain.
    pub const COUNT: usize = 4;

    /// All joints, base first.
    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::BaseRotation,
        Joint::Shoulder,
        Joint::Elbow,
        Joint::Wrist,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One angle per joint, in degrees, in chain order.
///
/// Values are free real numbers: the solver may push an angle past 360 and
/// nothing wraps it back.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct JointAngles([f64; Joint::COUNT]);

impl JointAngles {
    pub const fn new(base: f64, shoulder: f64, elbow: f64, wrist: f64) -> Self {
        Self([base, shoulder, elbow, wrist])
    }

    pub const fn to_array(self) -> [f64; Joint::COUNT] {
        self.0
    }
}

impl From<[f64; Joint::COUNT]> for JointAngles {
    fn from(angles: [f64; Joint::COUNT]) -> Self {
        Self(angles)
    }
}

impl Index<Joint> for JointAngles {
    type Output = f64;

    fn index(&self, joint: Joint) -> &f64 {
        &self.0[joint.index()]
    }
}

impl IndexMut<Joint> for JointAngles {
    fn index_mut(&mut self, joint: Joint) -> &mut f64 {
        &mut self.0[joint.index()]
    }
}

impl fmt::Display for JointAngles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, angle) in self.0.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", angle)?;
        }
        Ok(())
    }
}
