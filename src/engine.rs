//! Orchestrates the inverse solver and the forward-kinematics verification.
//!
//! The engine is the single entry point callers are expected to use: it runs
//! the inverse solver, immediately recomputes the reachable pose from the
//! solved angles, and hands both back. It deliberately does not compare the
//! verified pose against the target; a discrepancy there indicates a modeling
//! bug, not a runtime fault, and is for the caller (or the test suite) to
//! judge. When a joint limit table is configured, compliance is reported in
//! the solution but never enforced.

use crate::constraints::Constraints;
use crate::kinematic_traits::{Joints, Kinematics, KinematicsError, Pose};
use crate::kinematics_impl::Arm5Kinematics;
use crate::parameters::arm5_kinematics::Parameters;
use nalgebra::Point3;

/// A solved configuration: the joint vector and the pose recomputed from it.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Joint angles in degrees, fixed joint order.
    pub joints: Joints,
    /// End-effector pose recomputed from `joints` by forward kinematics.
    pub verified: Pose,
    /// `true` when all joints respect the configured limit table (always
    /// `true` when no table was supplied). Rejecting non-compliant
    /// solutions is the caller's decision.
    pub within_limits: bool,
}

pub struct KinematicsEngine {
    kinematics: Arm5Kinematics,
    constraints: Option<Constraints>,
    rest_target: Pose,
}

impl KinematicsEngine {
    /// Engine with the default rest target of the given geometry: the home
    /// point `(l4, -l2, l1 - l3)` the arm settles into with the forearm
    /// level and the upper arm down.
    pub fn new(parameters: Parameters) -> Self {
        let rest_target = Point3::new(
            parameters.l4,
            -parameters.l2,
            parameters.l1 - parameters.l3,
        );
        KinematicsEngine {
            kinematics: Arm5Kinematics::new(parameters),
            constraints: None,
            rest_target,
        }
    }

    /// Engine that reports joint-limit compliance in its solutions.
    pub fn new_with_constraints(parameters: Parameters, constraints: Constraints) -> Self {
        KinematicsEngine {
            constraints: Some(constraints),
            ..Self::new(parameters)
        }
    }

    /// Engine with a caller-chosen rest target.
    pub fn with_rest_target(mut self, rest_target: Pose) -> Self {
        self.rest_target = rest_target;
        self
    }

    pub fn rest_target(&self) -> &Pose {
        &self.rest_target
    }

    pub fn kinematics(&self) -> &Arm5Kinematics {
        &self.kinematics
    }

    /// Solve the target and verify the solution with forward kinematics.
    /// Unreachability is not transient, so there is no internal retry.
    pub fn solve(&self, target: &Pose) -> Result<Solution, KinematicsError> {
        let joints = self.kinematics.inverse(target)?;
        let verified = self.kinematics.forward(&joints)?;
        let within_limits = self
            .constraints
            .as_ref()
            .map_or(true, |c| c.compliant(&joints));
        Ok(Solution {
            joints,
            verified,
            within_limits,
        })
    }

    /// Solve the rest target, giving the arm a deterministic home
    /// configuration when no explicit target is supplied.
    pub fn solve_rest(&self) -> Result<Solution, KinematicsError> {
        self.solve(&self.rest_target)
    }
}
