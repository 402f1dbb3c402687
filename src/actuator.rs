//! Maps solved joint angles to actuator-native commands.
//!
//! The arm is driven by position servos speaking a register-based protocol.
//! This module owns the pure half of that job: converting degrees to encoder
//! ticks, checking the per-joint limit table, keeping the torque status, and
//! sequencing the register writes. The physical transaction itself happens
//! behind the [RegisterBus] trait, so the vendor SDK (and its serial port
//! handling) stays outside this crate; tests drive the mapper with a
//! recording mock.
//!
//! All configuration is an explicit [ActuatorConfig] passed to the
//! constructor; there is no shared process-wide handler instance.

use crate::constraints::Constraints;
use crate::kinematic_traits::Joints;
use crate::utils::arm5_kinematics::is_valid;
use log::{debug, info, warn};
use std::fmt;

/// Control table addresses of protocol 2.0 position servos.
pub const ADDR_MODEL_NUMBER: u16 = 0;
pub const ADDR_MAX_POSITION_LIMIT: u16 = 48;
pub const ADDR_MIN_POSITION_LIMIT: u16 = 52;
pub const ADDR_TORQUE_ENABLE: u16 = 64;
pub const ADDR_PROFILE_ACCELERATION: u16 = 108;
pub const ADDR_PROFILE_VELOCITY: u16 = 112;
pub const ADDR_GOAL_POSITION: u16 = 116;
pub const ADDR_PRESENT_POSITION: u16 = 132;

/// How many times port-level operations are attempted before giving up.
const CONNECT_ATTEMPTS: u32 = 3;

/// Error reported by a [RegisterBus] implementation.
#[derive(Debug, Clone)]
pub struct BusError(pub String);

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Bus error: {}", self.0)
    }
}

impl std::error::Error for BusError {}

/// The transport to the servos: open/close, baud rate and per-register
/// read/write transactions. Implementations wrap the vendor SDK (or a
/// simulator); this crate only ships a test mock.
pub trait RegisterBus {
    fn open(&mut self) -> Result<(), BusError>;
    fn set_baud_rate(&mut self, baud: u32) -> Result<(), BusError>;
    fn close(&mut self);
    fn write_u8(&mut self, id: u8, address: u16, value: u8) -> Result<(), BusError>;
    fn write_u32(&mut self, id: u8, address: u16, value: u32) -> Result<(), BusError>;
    fn read_u16(&mut self, id: u8, address: u16) -> Result<u16, BusError>;
    fn read_u32(&mut self, id: u8, address: u16) -> Result<u32, BusError>;
}

/// A bounded retry loop ran out of attempts. Returned to the caller so it
/// can decide on fallback behavior; this layer never terminates the process.
#[derive(Debug)]
pub struct RetriesExhausted {
    pub operation: &'static str,
    pub attempts: u32,
    pub last_error: BusError,
}

impl fmt::Display for RetriesExhausted {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} failed after {} attempts: {}",
            self.operation, self.attempts, self.last_error
        )
    }
}

impl std::error::Error for RetriesExhausted {}

/// Run `op` up to `attempts` times, returning the first success.
pub fn with_retries<T>(
    operation: &'static str,
    attempts: u32,
    mut op: impl FnMut() -> Result<T, BusError>,
) -> Result<T, RetriesExhausted> {
    let mut last_error = BusError("no attempts were made".to_string());
    for attempt in 1..=attempts {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!("{} failed (attempt {}/{}): {}", operation, attempt, attempts, e);
                last_error = e;
            }
        }
    }
    Err(RetriesExhausted {
        operation,
        attempts,
        last_error,
    })
}

/// Errors of the command mapper.
#[derive(Debug)]
pub enum DispatchError {
    /// The angle violates the configured limit table. The command is
    /// rejected, never clamped.
    OutOfLimit { joint: usize, angle: f64 },
    /// The angle converts to a tick count outside the encoder range.
    EncoderRange { joint: usize, ticks: i64 },
    /// The angle is NaN or infinite.
    NotFinite { joint: usize },
    /// There is no such joint on this arm.
    NoSuchJoint(usize),
    /// The transport failed mid-transaction.
    Bus(BusError),
    /// Port-level setup ran out of retries.
    RetriesExhausted(RetriesExhausted),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DispatchError::OutOfLimit { joint, angle } => {
                write!(f, "Joint {} angle {:.2} deg violates its limits", joint, angle)
            }
            DispatchError::EncoderRange { joint, ticks } => {
                write!(f, "Joint {} maps to tick {} outside the encoder range", joint, ticks)
            }
            DispatchError::NotFinite { joint } => {
                write!(f, "Joint {} angle is not finite", joint)
            }
            DispatchError::NoSuchJoint(joint) => {
                write!(f, "No joint {} on a 5 axis arm", joint)
            }
            DispatchError::Bus(e) => write!(f, "{}", e),
            DispatchError::RetriesExhausted(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DispatchError {}

impl From<BusError> for DispatchError {
    fn from(e: BusError) -> Self {
        DispatchError::Bus(e)
    }
}

impl From<RetriesExhausted> for DispatchError {
    fn from(e: RetriesExhausted) -> Self {
        DispatchError::RetriesExhausted(e)
    }
}

/// Explicit configuration of the actuator bus and the encoder geometry.
#[derive(Debug, Clone)]
pub struct ActuatorConfig {
    /// Servo bus ids in joint order.
    pub ids: [u8; 5],
    pub baud_rate: u32,
    /// Encoder ticks per full revolution (4096 for protocol 2.0 X series).
    pub ticks_per_rev: u32,
    /// Encoder value of the joint zero position (2048: mid-range).
    pub zero_tick: u32,
    /// Max speed, 0-32767 servo units.
    pub profile_velocity: u32,
    /// Max acceleration, 0-32767 servo units.
    pub profile_acceleration: u32,
    /// Per-joint position limits in degrees, pushed to the servo registers
    /// on connect and checked before every goal dispatch.
    pub limits: Constraints,
}

impl ActuatorConfig {
    /// Defaults for the reference arm: ids 1..5, 57600 baud, 4096-tick
    /// encoders centered at 2048, conservative motion profile.
    pub fn protocol2_defaults(limits: Constraints) -> Self {
        ActuatorConfig {
            ids: [1, 2, 3, 4, 5],
            baud_rate: 57_600,
            ticks_per_rev: 4096,
            zero_tick: 2048,
            profile_velocity: 50,
            profile_acceleration: 50,
            limits,
        }
    }
}

/// Converts joint angles to actuator-native units, limit-checks, and
/// dispatches register transactions over the supplied bus.
pub struct MotorCommandMapper<B: RegisterBus> {
    bus: B,
    config: ActuatorConfig,
    // Fixed-size, initialized up front; one slot per joint.
    torque: [bool; 5],
}

impl<B: RegisterBus> MotorCommandMapper<B> {
    pub fn new(bus: B, config: ActuatorConfig) -> Self {
        MotorCommandMapper {
            bus,
            config,
            torque: [false; 5],
        }
    }

    pub fn config(&self) -> &ActuatorConfig {
        &self.config
    }

    pub fn torque_status(&self) -> &[bool; 5] {
        &self.torque
    }

    /// Open the port and configure the servos: baud rate, torque off,
    /// position limits and motion profile. Port-level operations are
    /// retried a bounded number of times.
    pub fn connect(&mut self) -> Result<(), DispatchError> {
        let bus = &mut self.bus;
        with_retries("opening the port", CONNECT_ATTEMPTS, || bus.open())?;
        let baud = self.config.baud_rate;
        let bus = &mut self.bus;
        with_retries("setting the baud rate", CONNECT_ATTEMPTS, || {
            bus.set_baud_rate(baud)
        })?;
        info!("port open at {} baud", self.config.baud_rate);

        self.torque_enable_all(false)?;
        self.write_limits()?;
        self.set_profile(
            self.config.profile_velocity,
            self.config.profile_acceleration,
        )?;
        Ok(())
    }

    /// Torque off and close the port.
    pub fn disconnect(&mut self) -> Result<(), DispatchError> {
        self.torque_enable_all(false)?;
        self.bus.close();
        info!("port closed");
        Ok(())
    }

    /// Read the model number register of every servo.
    pub fn model_numbers(&mut self) -> Result<[u16; 5], DispatchError> {
        let mut models = [0u16; 5];
        for joint in 0..5 {
            models[joint] = self
                .bus
                .read_u16(self.config.ids[joint], ADDR_MODEL_NUMBER)?;
        }
        Ok(models)
    }

    /// Command one joint to the given angle (degrees).
    pub fn set_goal_single(&mut self, joint: usize, angle: f64) -> Result<(), DispatchError> {
        if joint >= 5 {
            return Err(DispatchError::NoSuchJoint(joint));
        }
        if !self.config.limits.joint_compliant(joint, angle) {
            return Err(DispatchError::OutOfLimit { joint, angle });
        }
        let ticks = self.angle_to_ticks(joint, angle)?;
        debug!("joint {} goal {:.2} deg -> tick {}", joint, angle, ticks);
        self.bus
            .write_u32(self.config.ids[joint], ADDR_GOAL_POSITION, ticks)?;
        Ok(())
    }

    /// Command all joints at once. The whole vector is validated before any
    /// register is written, so a rejected command leaves the arm untouched.
    pub fn set_goal_all(&mut self, joints: &Joints) -> Result<(), DispatchError> {
        if !is_valid(joints) {
            let joint = joints.iter().position(|q| !q.is_finite()).unwrap_or(0);
            return Err(DispatchError::NotFinite { joint });
        }
        if let Some(&joint) = self.config.limits.violations(joints).first() {
            return Err(DispatchError::OutOfLimit {
                joint,
                angle: joints[joint],
            });
        }
        let mut ticks = [0u32; 5];
        for joint in 0..5 {
            ticks[joint] = self.angle_to_ticks(joint, joints[joint])?;
        }
        for joint in 0..5 {
            self.bus
                .write_u32(self.config.ids[joint], ADDR_GOAL_POSITION, ticks[joint])?;
        }
        debug!("goal dispatched: {:?}", joints);
        Ok(())
    }

    /// Enable or disable torque on all joints.
    pub fn torque_enable_all(&mut self, on: bool) -> Result<(), DispatchError> {
        for joint in 0..5 {
            self.bus
                .write_u8(self.config.ids[joint], ADDR_TORQUE_ENABLE, on as u8)?;
            self.torque[joint] = on;
        }
        Ok(())
    }

    /// Flip the torque state of one joint, returning the new state.
    pub fn torque_toggle(&mut self, joint: usize) -> Result<bool, DispatchError> {
        if joint >= 5 {
            return Err(DispatchError::NoSuchJoint(joint));
        }
        let on = !self.torque[joint];
        self.bus
            .write_u8(self.config.ids[joint], ADDR_TORQUE_ENABLE, on as u8)?;
        self.torque[joint] = on;
        Ok(on)
    }

    /// Write the motion profile registers of every servo.
    pub fn set_profile(&mut self, velocity: u32, acceleration: u32) -> Result<(), DispatchError> {
        for joint in 0..5 {
            let id = self.config.ids[joint];
            self.bus.write_u32(id, ADDR_PROFILE_VELOCITY, velocity)?;
            self.bus
                .write_u32(id, ADDR_PROFILE_ACCELERATION, acceleration)?;
        }
        Ok(())
    }

    /// Push the configured position limits to the servo limit registers.
    pub fn write_limits(&mut self) -> Result<(), DispatchError> {
        for joint in 0..5 {
            let (min_deg, max_deg) = self.limit_range_degrees(joint);
            let min_ticks = self.angle_to_ticks(joint, min_deg)?;
            let max_ticks = self.angle_to_ticks(joint, max_deg)?;
            let id = self.config.ids[joint];
            self.bus.write_u32(id, ADDR_MIN_POSITION_LIMIT, min_ticks)?;
            self.bus.write_u32(id, ADDR_MAX_POSITION_LIMIT, max_ticks)?;
        }
        Ok(())
    }

    /// Read back the present position of one joint, in degrees.
    pub fn present_position(&mut self, joint: usize) -> Result<f64, DispatchError> {
        if joint >= 5 {
            return Err(DispatchError::NoSuchJoint(joint));
        }
        let ticks = self
            .bus
            .read_u32(self.config.ids[joint], ADDR_PRESENT_POSITION)?;
        Ok(self.ticks_to_angle(ticks))
    }

    /// Read back the present position of all joints, in degrees.
    pub fn present_positions(&mut self) -> Result<Joints, DispatchError> {
        let mut joints = [0.0; 5];
        for joint in 0..5 {
            joints[joint] = self.present_position(joint)?;
        }
        Ok(joints)
    }

    /// Convert degrees to an encoder tick count for the given joint.
    pub fn angle_to_ticks(&self, joint: usize, angle: f64) -> Result<u32, DispatchError> {
        if !angle.is_finite() {
            return Err(DispatchError::NotFinite { joint });
        }
        let per_degree = self.config.ticks_per_rev as f64 / 360.0;
        let ticks = self.config.zero_tick as i64 + (angle * per_degree).round() as i64;
        if ticks < 0 || ticks >= self.config.ticks_per_rev as i64 {
            return Err(DispatchError::EncoderRange { joint, ticks });
        }
        Ok(ticks as u32)
    }

    /// Convert an encoder tick count back to degrees.
    pub fn ticks_to_angle(&self, ticks: u32) -> f64 {
        let per_degree = self.config.ticks_per_rev as f64 / 360.0;
        (ticks as f64 - self.config.zero_tick as f64) / per_degree
    }

    /// The limit range of a joint in plain degrees, the wrap-around ranges
    /// of [Constraints] unfolded back to a negative lower bound.
    fn limit_range_degrees(&self, joint: usize) -> (f64, f64) {
        let from = self.config.limits.from[joint];
        let to = self.config.limits.to[joint];
        if from > to { (from - 360.0, to) } else { (from, to) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every transaction; can be told to fail the first open calls.
    struct MockBus {
        open_failures_left: u32,
        opened: bool,
        baud: Option<u32>,
        writes: Vec<(u8, u16, u32)>,
        read_u32_value: u32,
    }

    impl MockBus {
        fn new() -> Self {
            MockBus {
                open_failures_left: 0,
                opened: false,
                baud: None,
                writes: Vec::new(),
                read_u32_value: 2048,
            }
        }

        fn failing_open(failures: u32) -> Self {
            MockBus {
                open_failures_left: failures,
                ..Self::new()
            }
        }

        fn writes_to(&self, address: u16) -> Vec<(u8, u32)> {
            self.writes
                .iter()
                .filter(|(_, a, _)| *a == address)
                .map(|(id, _, v)| (*id, *v))
                .collect()
        }
    }

    impl RegisterBus for MockBus {
        fn open(&mut self) -> Result<(), BusError> {
            if self.open_failures_left > 0 {
                self.open_failures_left -= 1;
                return Err(BusError("device busy".to_string()));
            }
            self.opened = true;
            Ok(())
        }

        fn set_baud_rate(&mut self, baud: u32) -> Result<(), BusError> {
            self.baud = Some(baud);
            Ok(())
        }

        fn close(&mut self) {
            self.opened = false;
        }

        fn write_u8(&mut self, id: u8, address: u16, value: u8) -> Result<(), BusError> {
            self.writes.push((id, address, value as u32));
            Ok(())
        }

        fn write_u32(&mut self, id: u8, address: u16, value: u32) -> Result<(), BusError> {
            self.writes.push((id, address, value));
            Ok(())
        }

        fn read_u16(&mut self, _id: u8, _address: u16) -> Result<u16, BusError> {
            Ok(1020)
        }

        fn read_u32(&mut self, _id: u8, _address: u16) -> Result<u32, BusError> {
            Ok(self.read_u32_value)
        }
    }

    fn wide_limits() -> Constraints {
        Constraints::new([-170.0; 5], [170.0; 5])
    }

    fn mapper(bus: MockBus) -> MotorCommandMapper<MockBus> {
        MotorCommandMapper::new(bus, ActuatorConfig::protocol2_defaults(wide_limits()))
    }

    #[test]
    fn test_connect_retries_then_succeeds() {
        let mut mapper = mapper(MockBus::failing_open(2));
        assert!(mapper.connect().is_ok());
    }

    #[test]
    fn test_connect_gives_up_after_bounded_retries() {
        let mut mapper = mapper(MockBus::failing_open(3));
        match mapper.connect() {
            Err(DispatchError::RetriesExhausted(e)) => {
                assert_eq!(e.attempts, 3);
                assert_eq!(e.operation, "opening the port");
            }
            other => panic!("expected RetriesExhausted, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_angle_tick_conversion() {
        let mapper = mapper(MockBus::new());
        assert_eq!(mapper.angle_to_ticks(0, 0.0).unwrap(), 2048);
        assert_eq!(mapper.angle_to_ticks(0, 90.0).unwrap(), 3072);
        assert_eq!(mapper.angle_to_ticks(0, -90.0).unwrap(), 1024);
        let ticks = mapper.angle_to_ticks(2, 47.3).unwrap();
        assert!((mapper.ticks_to_angle(ticks) - 47.3).abs() < 0.05);
    }

    #[test]
    fn test_set_goal_all_converts_and_writes_each_servo() {
        let mut mapper = mapper(MockBus::new());
        mapper
            .set_goal_all(&[0.0, 45.0, -45.0, 90.0, 90.0])
            .unwrap();
        let goals = mapper.bus.writes_to(ADDR_GOAL_POSITION);
        assert_eq!(
            goals,
            vec![(1, 2048), (2, 2560), (3, 1536), (4, 3072), (5, 3072)]
        );
    }

    #[test]
    fn test_set_goal_all_rejects_without_partial_dispatch() {
        let mut mapper = mapper(MockBus::new());
        let result = mapper.set_goal_all(&[0.0, 0.0, 0.0, 175.0, 0.0]);
        match result {
            Err(DispatchError::OutOfLimit { joint, .. }) => assert_eq!(joint, 3),
            other => panic!("expected OutOfLimit, got {:?}", other.err()),
        }
        // Nothing reached the bus.
        assert!(mapper.bus.writes_to(ADDR_GOAL_POSITION).is_empty());
    }

    #[test]
    fn test_set_goal_single_is_limit_checked() {
        let mut mapper = mapper(MockBus::new());
        assert!(mapper.set_goal_single(1, 30.0).is_ok());
        assert!(matches!(
            mapper.set_goal_single(1, -171.0),
            Err(DispatchError::OutOfLimit { joint: 1, .. })
        ));
        assert!(matches!(
            mapper.set_goal_single(7, 0.0),
            Err(DispatchError::NoSuchJoint(7))
        ));
    }

    #[test]
    fn test_torque_table_is_fixed_size_and_tracked() {
        let mut mapper = mapper(MockBus::new());
        assert_eq!(mapper.torque_status(), &[false; 5]);
        mapper.torque_enable_all(true).unwrap();
        assert_eq!(mapper.torque_status(), &[true; 5]);
        assert!(!mapper.torque_toggle(2).unwrap());
        assert_eq!(mapper.torque_status(), &[true, true, false, true, true]);
    }

    #[test]
    fn test_present_position_converts_back_to_degrees() {
        let mut bus = MockBus::new();
        bus.read_u32_value = 3072;
        let mut mapper = mapper(bus);
        let angle = mapper.present_position(0).unwrap();
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_write_limits_unfolds_wrapped_ranges() {
        let mut mapper = MotorCommandMapper::new(
            MockBus::new(),
            ActuatorConfig::protocol2_defaults(Constraints::new([-90.0; 5], [90.0; 5])),
        );
        mapper.write_limits().unwrap();
        let mins = mapper.bus.writes_to(ADDR_MIN_POSITION_LIMIT);
        let maxes = mapper.bus.writes_to(ADDR_MAX_POSITION_LIMIT);
        assert_eq!(mins[0], (1, 1024));
        assert_eq!(maxes[0], (1, 3072));
    }
}
