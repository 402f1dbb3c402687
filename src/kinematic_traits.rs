//! Defines the traits and types providing the kinematic interface of the arm.

use nalgebra::{Isometry3, Point3};
use std::fmt;

/// Pose of the arm end effector: Cartesian position in millimeters, in the
/// base frame of the arm (x forward, y left, z up, origin under the riser).
/// This arm does not command end-effector orientation; the forearm roll is a
/// free joint from the position solver's point of view.
pub type Pose = Point3<f64>;

/// Joint angles in degrees, in the fixed joint order of the arm. Use the
/// `J_*` constants to index.
pub type Joints = [f64; 5];

/// Shoulder flexion/extension (sagittal plane, positive raises the arm).
pub const J_SHOULDER_FLEX: usize = 0;
/// Shoulder abduction/adduction (lateral). Always 0 in inverse solutions.
pub const J_SHOULDER_ABDUCT: usize = 1;
/// Shoulder rotation about the base vertical axis (yaw).
pub const J_SHOULDER_ROT: usize = 2;
/// Elbow flexion/extension.
pub const J_ELBOW_FLEX: usize = 3;
/// Forearm pronation/supination (roll about the forearm axis). Carries the
/// configurable wrist bias; does not move the end-effector position.
pub const J_FOREARM_ROLL: usize = 4;

/// All joints at zero. With zero offsets this is the fully stretched
/// horizontal configuration.
pub const JOINTS_AT_ZERO: Joints = [0.0; 5];

/// Which geometric bound made the target unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnreachableReason {
    /// Planar distance from the shoulder exceeds l3 + l4.
    TooFar,
    /// Planar distance from the shoulder is below |l3 - l4| (inside the
    /// inner sphere the elbow cannot fold into).
    TooClose,
    /// Horizontal radius is below the lateral shoulder offset l2, so no
    /// base rotation can put the target into the working plane.
    InsideShoulderOffset,
}

/// Errors reported by the solvers. Unreachability is not transient: retrying
/// with the same target cannot succeed, so the library never retries
/// internally.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// The target lies outside the reachable workspace. Recoverable; the
    /// caller should pick another target or report upstream.
    UnreachableTarget {
        reason: UnreachableReason,
        /// The offending geometric quantity (mm).
        value: f64,
        /// The bound it violated (mm).
        limit: f64,
    },
    /// NaN or infinity showed up in intermediate arithmetic. This indicates
    /// a modeling or input validation bug upstream and is surfaced rather
    /// than clamped.
    Computation(String),
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KinematicsError::UnreachableTarget { reason, value, limit } => match reason {
                UnreachableReason::TooFar => write!(
                    f,
                    "Target unreachable: planar distance {:.3} mm exceeds full reach {:.3} mm",
                    value, limit
                ),
                UnreachableReason::TooClose => write!(
                    f,
                    "Target unreachable: planar distance {:.3} mm is below minimal reach {:.3} mm",
                    value, limit
                ),
                UnreachableReason::InsideShoulderOffset => write!(
                    f,
                    "Target unreachable: horizontal radius {:.3} mm is inside the shoulder offset {:.3} mm",
                    value, limit
                ),
            },
            KinematicsError::Computation(msg) => write!(f, "Computation error: {}", msg),
        }
    }
}

impl std::error::Error for KinematicsError {}

pub trait Kinematics {
    /// Find the joint angles (degrees) reaching the given Cartesian target,
    /// or report why the target is not reachable. The solution is
    /// deterministic (always the elbow-down branch).
    fn inverse(&self, target: &Pose) -> Result<Joints, KinematicsError>;

    /// Find the Cartesian pose of the end effector for the given joint
    /// angles (degrees). The angles are not range-checked; any real values
    /// are accepted.
    fn forward(&self, joints: &Joints) -> Result<Pose, KinematicsError>;

    /// Compute the pose of every link, base to tip, the last entry being the
    /// end-effector transform. Useful for rendering or collision layers
    /// built on top of this crate.
    fn forward_with_joint_poses(&self, joints: &Joints)
        -> Result<[Isometry3<f64>; 5], KinematicsError>;
}
