use anyhow::Context;
use nalgebra::Point3;
use rs_arm5_kinematics::constraints::Constraints;
use rs_arm5_kinematics::engine::KinematicsEngine;
use rs_arm5_kinematics::kinematic_traits::{Kinematics, Pose};
use rs_arm5_kinematics::parameters::arm5_kinematics::Parameters;
use rs_arm5_kinematics::utils::{dump_joints, dump_pose};

/// Usage example.
fn main() -> anyhow::Result<()> {
    let engine = KinematicsEngine::new(Parameters::dynamixel_5dof());

    println!("Rest target (home configuration):");
    dump_pose(engine.rest_target());
    let rest = engine.solve_rest().context("solving the rest target")?;
    dump_joints(&rest.joints);
    print!("verified: ");
    dump_pose(&rest.verified);

    println!("Explicit target:");
    let target: Pose = Point3::new(385.0, -70.0, 300.0);
    dump_pose(&target);
    let solution = engine.solve(&target).context("solving the target")?;
    dump_joints(&solution.joints);
    print!("verified: ");
    dump_pose(&solution.verified);

    println!("Forward kinematics of the solved joints directly:");
    let pose = engine.kinematics().forward(&solution.joints)?;
    dump_pose(&pose);

    // The same solve with a joint limit table: compliance is reported,
    // rejecting remains the caller's decision.
    let engine = KinematicsEngine::new_with_constraints(
        Parameters::dynamixel_5dof(),
        Constraints::new(
            [-90.0, -45.0, -180.0, -10.0, -90.0],
            [90.0, 45.0, 180.0, 120.0, 180.0],
        ),
    );
    let solution = engine.solve(&target)?;
    println!("within limits: {}", solution.within_limits);

    // A target beyond the full reach is reported, not clamped.
    let too_far = Point3::new(600.0, 0.0, 375.0);
    match engine.solve(&too_far) {
        Err(e) => println!("{}", e),
        Ok(_) => println!("unexpectedly reachable"),
    }

    #[cfg(feature = "allow_filesystem")]
    {
        let parameters = Parameters::dynamixel_5dof();
        println!("Geometry:\n{}", &parameters.to_yaml());
    }
    Ok(())
}
