#[cfg(test)]
mod tests {
    use crate::constraints::Constraints;
    use crate::engine::KinematicsEngine;
    use crate::kinematic_traits::{
        J_ELBOW_FLEX, J_FOREARM_ROLL, J_SHOULDER_ABDUCT, J_SHOULDER_FLEX, J_SHOULDER_ROT,
        KinematicsError,
    };
    use crate::parameters::arm5_kinematics::Parameters;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn test_solve_returns_joints_and_verified_pose() {
        let engine = KinematicsEngine::new(Parameters::dynamixel_5dof());
        let target = Point3::new(385.0, -70.0, 300.0);
        let solution = engine.solve(&target).expect("reachable");

        assert_relative_eq!(solution.verified.x, target.x, epsilon = 1e-3);
        assert_relative_eq!(solution.verified.y, target.y, epsilon = 1e-3);
        assert_relative_eq!(solution.verified.z, target.z, epsilon = 1e-3);
        assert!(solution.within_limits, "no limit table was configured");
    }

    #[test]
    fn test_rest_target_gives_the_home_configuration() {
        let p = Parameters::dynamixel_5dof();
        let engine = KinematicsEngine::new(p);

        let rest = engine.rest_target();
        assert_relative_eq!(rest.x, p.l4, epsilon = 1e-9);
        assert_relative_eq!(rest.y, -p.l2, epsilon = 1e-9);
        assert_relative_eq!(rest.z, p.l1 - p.l3, epsilon = 1e-9);

        // At home the upper arm hangs straight down and the forearm is
        // level: flexion -90, elbow 90, everything else at zero (plus the
        // wrist bias).
        let solution = engine.solve_rest().expect("rest target must be reachable");
        assert_relative_eq!(solution.joints[J_SHOULDER_FLEX], -90.0, epsilon = 1e-6);
        assert_relative_eq!(solution.joints[J_SHOULDER_ABDUCT], 0.0, epsilon = 1e-9);
        assert_relative_eq!(solution.joints[J_SHOULDER_ROT], 0.0, epsilon = 1e-6);
        assert_relative_eq!(solution.joints[J_ELBOW_FLEX], 90.0, epsilon = 1e-6);
        assert_relative_eq!(solution.joints[J_FOREARM_ROLL], 90.0, epsilon = 1e-9);

        let verified = solution.verified;
        assert_relative_eq!(verified.x, rest.x, epsilon = 1e-3);
        assert_relative_eq!(verified.y, rest.y, epsilon = 1e-3);
        assert_relative_eq!(verified.z, rest.z, epsilon = 1e-3);
    }

    #[test]
    fn test_rest_target_can_be_overridden() {
        let engine = KinematicsEngine::new(Parameters::dynamixel_5dof())
            .with_rest_target(Point3::new(300.0, 0.0, 400.0));
        let solution = engine.solve_rest().expect("reachable");
        assert_relative_eq!(solution.verified.x, 300.0, epsilon = 1e-3);
        assert_relative_eq!(solution.verified.y, 0.0, epsilon = 1e-3);
        assert_relative_eq!(solution.verified.z, 400.0, epsilon = 1e-3);
    }

    #[test]
    fn test_limit_violations_are_surfaced_not_enforced() {
        // The reference pose needs about -47 degrees of shoulder flexion;
        // a table forbidding that must flag the solution but still return it.
        let engine = KinematicsEngine::new_with_constraints(
            Parameters::dynamixel_5dof(),
            Constraints::new(
                [-10.0, -45.0, -180.0, -10.0, -90.0],
                [90.0, 45.0, 180.0, 120.0, 180.0],
            ),
        );
        let solution = engine
            .solve(&Point3::new(385.0, -70.0, 300.0))
            .expect("reachable regardless of limits");
        assert!(!solution.within_limits);
        assert_relative_eq!(solution.joints[J_SHOULDER_FLEX], -46.708, epsilon = 1e-2);
    }

    #[test]
    fn test_compliant_solution_passes_the_table() {
        let engine = KinematicsEngine::new_with_constraints(
            Parameters::dynamixel_5dof(),
            Constraints::new(
                [-90.0, -45.0, -180.0, -10.0, -90.0],
                [90.0, 45.0, 180.0, 120.0, 180.0],
            ),
        );
        let solution = engine
            .solve(&Point3::new(385.0, -70.0, 300.0))
            .expect("reachable");
        assert!(solution.within_limits);
    }

    #[test]
    fn test_unreachable_target_propagates_from_the_engine() {
        let engine = KinematicsEngine::new(Parameters::dynamixel_5dof());
        let result = engine.solve(&Point3::new(900.0, 0.0, 375.0));
        assert!(matches!(
            result,
            Err(KinematicsError::UnreachableTarget { .. })
        ));
    }
}
