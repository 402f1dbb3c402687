//! Rust implementation of closed-form inverse and forward kinematic solutions for a
//! 5 axis articulated robotic arm whose shoulder sits on top of a riser column with
//! a lateral (depth) offset.
//!
//! The arm is treated as a riser of height _l1_ carrying the shoulder, displaced
//! sideways by _l2_, followed by an upper arm of length _l3_ and a forearm of
//! length _l4_. The shoulder provides three rotations (flexion/extension,
//! abduction/adduction and rotation about the base axis), the elbow one, and the
//! forearm a pronation/supination roll. Only the base rotation, shoulder flexion
//! and elbow influence the Cartesian position of the end effector, so the inverse
//! solver decomposes the target geometrically: base yaw from the horizontal
//! projection (offset-corrected, quadrant preserving), then the elbow from the law
//! of cosines, then the shoulder flexion from the elevation and triangle angles.
//!
//! # Features
//!
//! - The inverse solution is deterministic: the solver always returns the
//!   elbow-down branch, so identical targets produce identical joint vectors.
//! - Every inverse solution can be cross-checked with forward kinematics through
//!   [engine::KinematicsEngine], which returns both the joint vector and the
//!   recomputed pose.
//! - Unreachable targets are reported as typed errors carrying the violated
//!   geometric bound; nothing is ever silently clamped.
//! - Joint angles can be checked against per-joint limits ([constraints::Constraints]),
//!   which are surfaced to the caller rather than enforced by the solver.
//! - Solved angles can be mapped to actuator-native encoder commands
//!   ([actuator::MotorCommandMapper]) behind a transport trait, keeping the
//!   vendor protocol out of this crate.
//!
//! # Parameters
//!
//! This library uses four geometric parameters (_l1, l2, l3, l4_, millimeters)
//! plus per-joint offsets and sign corrections. Joint angles are degrees
//! throughout the public API. To use the library, fill out a
//! `parameters::arm5_kinematics::Parameters` data structure, or start from
//! one of the models in [parameters_robots].

pub mod parameters;
pub mod parameters_robots;

#[cfg(feature = "allow_filesystem")]
pub mod parameters_from_file;

#[path = "utils/utils.rs"]
pub mod utils;
pub mod kinematic_traits;
pub mod chain;
pub mod kinematics_impl;

pub mod engine;

pub mod constraints;

pub mod actuator;

#[cfg(feature = "allow_filesystem")]
pub mod parameter_error;

#[cfg(test)]
mod tests;
