//! The ordered rigid-link geometry of the arm and the homogeneous transform
//! of each link. The chain is built once from [Parameters] and never mutated;
//! forward kinematics is a fold of the per-link transforms over the base frame.

use crate::kinematic_traits::{
    J_ELBOW_FLEX, J_FOREARM_ROLL, J_SHOULDER_ABDUCT, J_SHOULDER_FLEX, J_SHOULDER_ROT,
};
use crate::parameters::arm5_kinematics::Parameters;
use nalgebra::{Isometry3, Translation3, Unit, UnitQuaternion, Vector3};

/// Rotation axis of a link, in the frame of its parent link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationAxis {
    X,
    Y,
    Z,
}

impl RotationAxis {
    pub fn unit(&self) -> Unit<Vector3<f64>> {
        match self {
            RotationAxis::X => Vector3::x_axis(),
            RotationAxis::Y => Vector3::y_axis(),
            RotationAxis::Z => Vector3::z_axis(),
        }
    }
}

/// One rigid link: a rotation about `axis` driven by joint slot `joint`,
/// followed by the fixed translation `offset` to the next link frame.
#[derive(Debug, Clone, Copy)]
pub struct Link {
    pub axis: RotationAxis,
    /// +1.0 or -1.0; fixes the direction the physical joint considers
    /// positive relative to the right-hand rotation about `axis`.
    pub direction: f64,
    /// Translation to the child frame, applied after the rotation (mm).
    pub offset: Vector3<f64>,
    /// Index into the joint vector that drives this link.
    pub joint: usize,
}

impl Link {
    /// The homogeneous transform of this link for the given physical joint
    /// angle (radians).
    pub fn transform(&self, angle: f64) -> Isometry3<f64> {
        let rotation = UnitQuaternion::from_axis_angle(&self.axis.unit(), self.direction * angle);
        Isometry3::from_parts(Translation3::identity(), rotation)
            * Isometry3::from_parts(Translation3::from(self.offset), UnitQuaternion::identity())
    }
}

/// The five links of the arm, base to tip. Chain order is kinematic order
/// (base yaw first), which differs from the joint vector order; each link
/// knows its joint slot.
#[derive(Debug, Clone)]
pub struct LinkChain {
    links: [Link; 5],
}

impl LinkChain {
    pub fn new(parameters: &Parameters) -> Self {
        let p = parameters;
        LinkChain {
            links: [
                // Base yaw, then up the riser and out by the depth offset.
                Link {
                    axis: RotationAxis::Z,
                    direction: 1.0,
                    offset: Vector3::new(0.0, -p.l2, p.l1),
                    joint: J_SHOULDER_ROT,
                },
                Link {
                    axis: RotationAxis::X,
                    direction: 1.0,
                    offset: Vector3::zeros(),
                    joint: J_SHOULDER_ABDUCT,
                },
                // Positive flexion raises the arm, hence the reversed sense
                // about Y.
                Link {
                    axis: RotationAxis::Y,
                    direction: -1.0,
                    offset: Vector3::new(p.l3, 0.0, 0.0),
                    joint: J_SHOULDER_FLEX,
                },
                Link {
                    axis: RotationAxis::Y,
                    direction: -1.0,
                    offset: Vector3::new(p.l4, 0.0, 0.0),
                    joint: J_ELBOW_FLEX,
                },
                // Roll about the forearm axis; leaves the position untouched.
                Link {
                    axis: RotationAxis::X,
                    direction: 1.0,
                    offset: Vector3::zeros(),
                    joint: J_FOREARM_ROLL,
                },
            ],
        }
    }

    pub fn links(&self) -> &[Link; 5] {
        &self.links
    }

    /// Cumulative pose after each link, base to tip, for physical joint
    /// angles in radians (indexed by joint slot). The last entry is the
    /// end-effector transform.
    pub fn poses(&self, physical: &[f64; 5]) -> [Isometry3<f64>; 5] {
        let mut current = Isometry3::identity();
        let mut poses = [Isometry3::identity(); 5];
        for (i, link) in self.links.iter().enumerate() {
            current *= link.transform(physical[link.joint]);
            poses[i] = current;
        }
        poses
    }
}
