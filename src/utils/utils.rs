//! Helper functions

use crate::kinematic_traits::{Joints, Pose};

/// Checks the solution for validity. This is only internally needed as all returned
/// solutions are already checked.
pub(crate) mod arm5_kinematics {
    use crate::kinematic_traits::Joints;

    /// Checks if all elements in the array are finite
    pub fn is_valid(qs: &Joints) -> bool {
        qs.iter().all(|&q| q.is_finite())
    }
}

/// Print joint values in degrees, one row per joint vector.
#[allow(dead_code)]
pub fn dump_joints(joints: &Joints) {
    let mut row_str = String::new();
    for joint_idx in 0..5 {
        row_str.push_str(&format!("{:7.2} ", joints[joint_idx]));
    }
    println!("[{}]", row_str.trim_end());
}

/// Print a Cartesian pose in millimeters.
#[allow(dead_code)]
pub fn dump_pose(pose: &Pose) {
    println!("({:8.3}, {:8.3}, {:8.3})", pose.x, pose.y, pose.z);
}

/// formatting for YAML output
pub(crate) fn fmt_deg(x: &f64) -> String {
    if *x == 0.0 {
        return "0".to_string();
    }
    format!("{:.4}", x)
}
