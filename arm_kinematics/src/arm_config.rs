/// Geometry configuration for the 4-joint desktop arm.
///
/// All dimensions are fixed at startup and never change during a run. The
/// rotation-axis pattern is structural (base about the vertical axis, the
/// three pitch joints about the horizontal axis) and lives in the kinematics
/// module; only lengths are configurable.
use serde::{Deserialize, Serialize};

use crate::Joint;

/// Physical dimensions of the arm, in millimeters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArmConfig {
    /// Height of the base housing; the base rotation joint sits on top of it.
    pub base_height: f64,

    /// Vertical offset from the base rotation joint to the shoulder joint.
    pub shoulder_height: f64,

    /// Shoulder-to-elbow link length.
    pub upper_arm: f64,

    /// Elbow-to-wrist link length.
    pub forearm: f64,

    /// Wrist-to-fingertip length.
    pub hand: f64,
}

impl ArmConfig {
    /// Dimensions of the desktop servo arm the lookup table is generated for.
    pub fn desktop_arm() -> Self {
        Self {
            base_height: 108.0,
            shoulder_height: 72.0,
            upper_arm: 124.0,
            forearm: 124.0,
            hand: 192.0,
        }
    }

    /// Link length per joint, in chain order.
    pub fn link_lengths(&self) -> [f64; Joint::COUNT] {
        [self.shoulder_height, self.upper_arm, self.forearm, self.hand]
    }

    /// Fingertip height with every joint at zero: straight up from the floor.
    pub fn full_extension(&self) -> f64 {
        self.base_height + self.shoulder_height + self.upper_arm + self.forearm + self.hand
    }

    pub fn validate(&self) -> Result<(), String> {
        let dims = [
            ("base_height", self.base_height),
            ("shoulder_height", self.shoulder_height),
            ("upper_arm", self.upper_arm),
            ("forearm", self.forearm),
            ("hand", self.hand),
        ];
        for (name, value) in dims {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be a positive length, got {}", name, value));
            }
        }
        Ok(())
    }
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self::desktop_arm()
    }
}
