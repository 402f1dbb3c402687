//! Hardcoded geometric parameters for concrete arm assemblies

pub mod arm5_kinematics {
    use crate::parameters::arm5_kinematics::Parameters;

    #[allow(dead_code)]
    impl Parameters {
        // Provides default values
        pub fn new() -> Self {
            Parameters {
                l1: 0.0,
                l2: 0.0,
                l3: 0.0,
                l4: 0.0,
                offsets: [0.0; 5],
                sign_corrections: [1; 5],
            }
        }

        /// The reference 5-DOF trainer arm driven by protocol 2.0 servos.
        /// The +90 degree offset on the forearm roll aligns the solver zero
        /// with the physical zero of this specific assembly; it is a
        /// property of the rigid-body build, not of the kinematics.
        pub fn dynamixel_5dof() -> Self {
            Parameters {
                l1: 375.0, // riser height
                l2: 70.0,  // shoulder depth offset
                l3: 265.0, // shoulder to elbow
                l4: 235.0, // elbow to end-effector mount
                offsets: [0.0, 0.0, 0.0, 0.0, 90.0],
                ..Self::new()
            }
        }
    }
}
