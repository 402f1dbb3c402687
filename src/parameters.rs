//! Defines the geometric parameter data structure of the arm

pub mod arm5_kinematics {
    use crate::utils::fmt_deg;

    /// Parameters for the kinematic model of the arm. See
    /// [parameters_robots.rs](parameters_robots.rs) for concrete arm models.
    /// All lengths are millimeters, all angles degrees.
    #[derive(Debug, Clone, Copy)]
    pub struct Parameters {
        /// Height of the riser column carrying the shoulder (base to the
        /// shoulder rotation plane along z).
        pub l1: f64,

        /// Lateral (depth) offset of the shoulder from the base vertical
        /// axis. The working plane of the arm passes at this distance from
        /// the axis; it rotates together with the base yaw.
        pub l2: f64,

        /// Length of the upper arm (shoulder to elbow).
        pub l3: f64,

        /// Length of the forearm (elbow to the end-effector mount).
        pub l4: f64,

        /// Offsets in degrees added to each solved joint angle to adjust the
        /// reference zero position. Slot 4 is the wrist pronation bias that
        /// aligns the solver's zero with the physical zero of the forearm
        /// roll; +90 for the reference arm. Forward kinematics subtracts the
        /// same offsets, so the bias never disturbs the verified pose.
        pub offsets: [f64; 5],

        /// Direction of positive rotation from the zero angle for each
        /// joint. A value of `-1` reverses the default direction.
        pub sign_corrections: [i8; 5],
    }

    impl Parameters {
        /// Full reach of the planar two-link chain, l3 + l4.
        pub fn max_reach(&self) -> f64 {
            self.l3 + self.l4
        }

        /// Minimal planar distance the elbow can fold the end effector to,
        /// |l3 - l4|.
        pub fn min_reach(&self) -> f64 {
            (self.l3 - self.l4).abs()
        }

        /// Convert to string yaml representation (quick viewing, etc).
        pub fn to_yaml(&self) -> String {
            format!(
                "arm5_kinematics_geometric_parameters:\n  \
              l1: {}\n  \
              l2: {}\n  \
              l3: {}\n  \
              l4: {}\n\
            arm5_kinematics_joint_offsets: [{}]\n\
            arm5_kinematics_joint_sign_corrections: [{}]\n",
                self.l1,
                self.l2,
                self.l3,
                self.l4,
                self.offsets.iter().map(|x| fmt_deg(x))
                    .collect::<Vec<_>>().join(","),
                self.sign_corrections.iter().map(|x| x.to_string())
                    .collect::<Vec<_>>().join(","),
            )
        }
    }
}
