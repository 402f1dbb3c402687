//! Supports extracting arm parameters from YAML file (optional)

use serde::Deserialize;
use std::path::Path;

use crate::parameter_error::ParameterError;
use crate::parameters::arm5_kinematics::Parameters;

fn default_offsets() -> Vec<f64> {
    vec![0.0; 5]
}
fn default_sign_corrections() -> Vec<i8> {
    vec![1; 5]
}

#[derive(Deserialize)]
struct GeometricParameters {
    pub l1: f64,
    pub l2: f64,
    pub l3: f64,
    pub l4: f64,
}

#[derive(Deserialize)]
struct Root {
    #[serde(rename = "arm5_kinematics_geometric_parameters")]
    pub gp: GeometricParameters,
    #[serde(default = "default_offsets", rename = "arm5_kinematics_joint_offsets")]
    pub offsets: Vec<f64>,
    #[serde(
        default = "default_sign_corrections",
        rename = "arm5_kinematics_joint_sign_corrections"
    )]
    pub sign_corrections: Vec<i8>,
}

impl Parameters {
    /// Read the arm configuration from YAML file. YAML file like this is supported:
    /// ```yaml
    /// # 5-DOF trainer arm
    /// arm5_kinematics_geometric_parameters:
    ///   l1: 375.0
    ///   l2: 70.0
    ///   l3: 265.0
    ///   l4: 235.0
    /// arm5_kinematics_joint_offsets: [0.0, 0.0, 0.0, 0.0, 90.0]
    /// arm5_kinematics_joint_sign_corrections: [1, 1, 1, 1, 1]
    /// ```
    /// Offsets and sign corrections are optional. Lengths are millimeters,
    /// offsets degrees.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse the arm configuration from a YAML string (same format as
    /// [Parameters::from_yaml_file]).
    pub fn from_yaml(contents: &str) -> Result<Self, ParameterError> {
        let root: Root = serde_saphyr::from_str(contents)
            .map_err(|e| ParameterError::ParseError(format!("{}", e)))?;

        let sign_corrections = vec_to_five(root.sign_corrections)?;
        for (i, &sc) in sign_corrections.iter().enumerate() {
            if sc != -1 && sc != 1 {
                return Err(ParameterError::ParseError(format!(
                    "sign_corrections[{}] must be -1 or 1 (got {})",
                    i, sc
                )));
            }
        }

        let offsets = vec_to_five(root.offsets)?;
        for (i, &ofs) in offsets.iter().enumerate() {
            if !ofs.is_finite() {
                return Err(ParameterError::ParseError(format!(
                    "offsets[{}] must be finite (got {})",
                    i, ofs
                )));
            }
        }

        // Geometric parameter sanity: finite, lengths non-negative
        let gp = &root.gp;
        for (name, val) in [("l1", gp.l1), ("l2", gp.l2), ("l3", gp.l3), ("l4", gp.l4)] {
            if !val.is_finite() {
                return Err(ParameterError::ParseError(format!(
                    "geometric parameter '{}' must be finite (got {})",
                    name, val
                )));
            }
            if val < 0.0 {
                return Err(ParameterError::ParseError(format!(
                    "geometric parameter '{}' must not be negative (got {})",
                    name, val
                )));
            }
        }
        if gp.l3 + gp.l4 <= 0.0 {
            return Err(ParameterError::ParseError(
                "l3 + l4 must be positive, the arm would have no reach".to_string(),
            ));
        }

        Ok(Parameters {
            l1: gp.l1,
            l2: gp.l2,
            l3: gp.l3,
            l4: gp.l4,
            offsets,
            sign_corrections,
        })
    }
}

/// Convert a vector to a 5-element array, erroring with the actual length
/// for context.
fn vec_to_five<T: Copy + Default>(v: Vec<T>) -> Result<[T; 5], ParameterError> {
    if v.len() != 5 {
        return Err(ParameterError::InvalidLength {
            expected: 5,
            found: v.len(),
        });
    }
    let mut out: [T; 5] = [T::default(); 5];
    out.copy_from_slice(&v);
    Ok(out)
}
