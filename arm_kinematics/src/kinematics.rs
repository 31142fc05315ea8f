//! Forward kinematics for the 4-joint serial arm.
//!
//! The chain is fixed: the base joint turns about the vertical axis, and the
//! shoulder, elbow and wrist pitch about the horizontal axis perpendicular to
//! the arm's vertical plane. Each link extends along the local Y axis, so the
//! zero pose points straight up.
//!
//! Coordinate system:
//! +X = right of the base
//! +Y = up (vertical)
//! +Z = forward (the reach direction at zero base rotation)

use nalgebra::{Isometry3, Point3, Translation3, Unit, UnitQuaternion, Vector3};

use crate::arm_config::ArmConfig;
use crate::errors::ArmError;
use crate::{Joint, JointAngles};

/// Rotation axis for a joint. The base turns about -Y and the pitch joints
/// about -X; the signs match the servo orientation of the physical arm, so a
/// negative pitch angle bends the arm toward +Z.
fn joint_axis(joint: Joint) -> Unit<Vector3<f64>> {
    match joint {
        Joint::BaseRotation => Unit::new_unchecked(Vector3::new(0.0, -1.0, 0.0)),
        _ => Unit::new_unchecked(Vector3::new(-1.0, 0.0, 0.0)),
    }
}

/// Kinematic model of the arm.
///
/// Construction validates the configured geometry once; afterwards every
/// operation is a pure function of its inputs.
#[derive(Debug, Clone)]
pub struct ArmKinematics {
    config: ArmConfig,
    links: [f64; Joint::COUNT],
}

impl ArmKinematics {
    /// Build the kinematic model, rejecting degenerate geometry.
    pub fn from_config(config: ArmConfig) -> Result<Self, ArmError> {
        config.validate().map_err(ArmError::Configuration)?;
        let links = config.link_lengths();
        Ok(Self { config, links })
    }

    pub fn config(&self) -> &ArmConfig {
        &self.config
    }

    /// End-effector position for a set of joint angles.
    ///
    /// Composes, per joint in chain order, the rotation about that joint's
    /// fixed axis followed by the translation along its link, starting from
    /// the base offset above the floor. The result is the translation
    /// component of the accumulated transform.
    pub fn forward(&self, angles: &JointAngles) -> Point3<f64> {
        let mut transform: Isometry3<f64> =
            Translation3::new(0.0, self.config.base_height, 0.0).into();

        for joint in Joint::ALL {
            let rotation =
                UnitQuaternion::from_axis_angle(&joint_axis(joint), angles[joint].to_radians());
            transform = transform * rotation;
            transform = transform * Translation3::new(0.0, self.links[joint.index()], 0.0);
        }

        Point3::from(transform.translation.vector)
    }

    /// Distance from the end effector at `angles` to `goal`.
    pub fn distance(&self, angles: &JointAngles, goal: &Point3<f64>) -> f64 {
        nalgebra::distance(&self.forward(angles), goal)
    }
}

impl Default for ArmKinematics {
    fn default() -> Self {
        // The built-in configuration is always valid.
        let config = ArmConfig::desktop_arm();
        let links = config.link_lengths();
        Self { config, links }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_pose_points_straight_up() {
        let kin = ArmKinematics::default();
        let pos = kin.forward(&JointAngles::new(0.0, 0.0, 0.0, 0.0));

        // base 108 + shoulder 72 + upper arm 124 + forearm 124 + hand 192
        assert!(pos.x.abs() < 1e-9);
        assert!((pos.y - 620.0).abs() < 1e-9);
        assert!(pos.z.abs() < 1e-9);
    }

    #[test]
    fn test_forward_is_deterministic() {
        let kin = ArmKinematics::default();
        let angles = JointAngles::new(13.7, -41.2, 88.05, -3.33);

        let a = kin.forward(&angles);
        let b = kin.forward(&angles);
        assert_eq!(a, b);
    }

    #[test]
    fn test_shoulder_fold_reaches_forward() {
        let kin = ArmKinematics::default();

        // Shoulder at -90 lays the rest of the arm flat along +Z, pivoting
        // at base_height + shoulder_height.
        let pos = kin.forward(&JointAngles::new(0.0, -90.0, 0.0, 0.0));
        assert!(pos.x.abs() < 1e-9);
        assert!((pos.y - 180.0).abs() < 1e-9);
        assert!((pos.z - 440.0).abs() < 1e-9);
    }

    #[test]
    fn test_base_rotation_swings_the_fold() {
        let kin = ArmKinematics::default();

        // Same fold as above, base turned 90: the arm now points along -X.
        let pos = kin.forward(&JointAngles::new(90.0, -90.0, 0.0, 0.0));
        assert!((pos.x + 440.0).abs() < 1e-6);
        assert!((pos.y - 180.0).abs() < 1e-6);
        assert!(pos.z.abs() < 1e-6);
    }

    #[test]
    fn test_base_rotation_preserves_height_and_radius() {
        let kin = ArmKinematics::default();
        let folded = JointAngles::new(0.0, -35.0, -40.0, -20.0);
        let swung = JointAngles::new(57.0, -35.0, -40.0, -20.0);

        let a = kin.forward(&folded);
        let b = kin.forward(&swung);

        assert!((a.y - b.y).abs() < 1e-9);
        let radius_a = (a.x * a.x + a.z * a.z).sqrt();
        let radius_b = (b.x * b.x + b.z * b.z).sqrt();
        assert!((radius_a - radius_b).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_degenerate_config() {
        let mut config = ArmConfig::desktop_arm();
        config.upper_arm = -1.0;
        assert!(ArmKinematics::from_config(config).is_err());
    }

    #[test]
    fn test_distance_to_reached_point_is_zero() {
        let kin = ArmKinematics::default();
        let angles = JointAngles::new(10.0, -30.0, -50.0, -70.0);
        let reached = kin.forward(&angles);
        assert!(kin.distance(&angles, &reached) < 1e-12);
    }
}
