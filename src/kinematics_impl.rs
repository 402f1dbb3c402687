//! Closed-form forward and inverse kinematics of the 5 axis arm.

use crate::chain::LinkChain;
use crate::kinematic_traits::{
    J_ELBOW_FLEX, J_SHOULDER_FLEX, J_SHOULDER_ROT, Joints, Kinematics, KinematicsError, Pose,
    UnreachableReason,
};
use crate::parameters::arm5_kinematics::Parameters;
use nalgebra::{Isometry3, Point3};

/// Tolerance for targets sitting numerically on the workspace boundary.
/// Targets within this margin of l3 + l4 (or |l3 - l4|) are still solved;
/// anything beyond is reported unreachable.
const REACH_EPSILON: f64 = 1e-9;

pub struct Arm5Kinematics {
    parameters: Parameters,
    chain: LinkChain,
}

impl Arm5Kinematics {
    /// Creates a new `Arm5Kinematics` instance with the given parameters.
    pub fn new(parameters: Parameters) -> Self {
        Arm5Kinematics {
            chain: LinkChain::new(&parameters),
            parameters,
        }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Map user-facing joint angles (degrees, with sign corrections and
    /// offsets applied) back to physical angles in radians.
    fn physical_radians(&self, joints: &Joints) -> Result<[f64; 5], KinematicsError> {
        let p = &self.parameters;
        let mut physical = [0.0; 5];
        for i in 0..5 {
            if !joints[i].is_finite() {
                return Err(KinematicsError::Computation(format!(
                    "joint {} is not finite: {}",
                    i, joints[i]
                )));
            }
            physical[i] = (p.sign_corrections[i] as f64 * (joints[i] - p.offsets[i])).to_radians();
        }
        Ok(physical)
    }

    /// Map physical angles in radians to user-facing joint angles.
    fn user_degrees(&self, physical: &[f64; 5]) -> Result<Joints, KinematicsError> {
        let p = &self.parameters;
        let mut joints = [0.0; 5];
        for i in 0..5 {
            joints[i] = p.sign_corrections[i] as f64 * physical[i].to_degrees() + p.offsets[i];
            if !joints[i].is_finite() {
                return Err(KinematicsError::Computation(format!(
                    "solved joint {} is not finite",
                    i
                )));
            }
        }
        Ok(joints)
    }
}

impl Kinematics for Arm5Kinematics {
    fn inverse(&self, target: &Pose) -> Result<Joints, KinematicsError> {
        let p = &self.parameters;
        if !(target.x.is_finite() && target.y.is_finite() && target.z.is_finite()) {
            return Err(KinematicsError::Computation(format!(
                "target is not finite: {:?}",
                target
            )));
        }

        // Base yaw from the horizontal projection. The working plane passes
        // at distance l2 from the base axis, so the projection first has to
        // clear that offset.
        let r = target.x.hypot(target.y);
        let rp_squared = r * r - p.l2 * p.l2;
        if rp_squared < -REACH_EPSILON {
            return Err(KinematicsError::UnreachableTarget {
                reason: UnreachableReason::InsideShoulderOffset,
                value: r,
                limit: p.l2,
            });
        }
        let rp = rp_squared.max(0.0).sqrt();
        let yaw = target.y.atan2(target.x) + p.l2.atan2(rp);

        // Planar distance from the shoulder to the target in the working
        // plane of the arm.
        let dz = target.z - p.l1;
        let d = rp.hypot(dz);
        if d > p.max_reach() + REACH_EPSILON {
            return Err(KinematicsError::UnreachableTarget {
                reason: UnreachableReason::TooFar,
                value: d,
                limit: p.max_reach(),
            });
        }
        if d < p.min_reach() - REACH_EPSILON {
            return Err(KinematicsError::UnreachableTarget {
                reason: UnreachableReason::TooClose,
                value: d,
                limit: p.min_reach(),
            });
        }

        // Elbow from the law of cosines. The argument is within [-1, 1] by
        // the reach checks above, up to rounding on the exact boundary.
        let cos_elbow = ((d * d - p.l3 * p.l3 - p.l4 * p.l4) / (2.0 * p.l3 * p.l4))
            .clamp(-1.0, 1.0);
        // Always the non-negative ("elbow-down") branch; the mirrored
        // configuration would be -elbow with the flexion adjusted.
        let elbow = cos_elbow.acos();

        // Shoulder flexion: elevation towards the target, minus the angle
        // the upper arm makes with the shoulder-to-target line.
        let flex =
            dz.atan2(rp) - (p.l4 * elbow.sin()).atan2(p.l3 + p.l4 * elbow.cos());

        let mut physical = [0.0; 5];
        physical[J_SHOULDER_FLEX] = flex;
        physical[J_SHOULDER_ROT] = yaw;
        physical[J_ELBOW_FLEX] = elbow;
        // Abduction and forearm roll are not constrained by a positional
        // target and stay at their zero (the roll still receives its
        // configured offset in user_degrees).

        self.user_degrees(&physical)
    }

    fn forward(&self, joints: &Joints) -> Result<Pose, KinematicsError> {
        let poses = self.forward_with_joint_poses(joints)?;
        Ok(Point3::from(poses[4].translation.vector))
    }

    fn forward_with_joint_poses(
        &self,
        joints: &Joints,
    ) -> Result<[Isometry3<f64>; 5], KinematicsError> {
        let physical = self.physical_radians(joints)?;
        let poses = self.chain.poses(&physical);
        let tip = poses[4].translation.vector;
        if !(tip.x.is_finite() && tip.y.is_finite() && tip.z.is_finite()) {
            return Err(KinematicsError::Computation(
                "end-effector position is not finite".to_string(),
            ));
        }
        Ok(poses)
    }
}
