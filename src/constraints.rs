//! Per-joint angle limits of the arm, in degrees. The solvers never enforce
//! these; they are surfaced to the caller (and to the actuator mapper, which
//! rejects non-compliant commands before dispatch).

#[derive(Clone, Debug)]
pub struct Constraints {
    /// Normalized lower limit. If more than upper limit, the range wraps-around through 0
    pub from: [f64; 5],

    /// Normalized upper limit. If less than lower limit, the range wraps-around through 0
    pub to: [f64; 5],
}

const FULL_TURN: f64 = 360.0;

impl Constraints {
    pub fn new(from: [f64; 5], to: [f64; 5]) -> Self {
        let from_normalized: [f64; 5] = from.map(|f| ((f % FULL_TURN) + FULL_TURN) % FULL_TURN);
        let to_normalized: [f64; 5] = to.map(|t| ((t % FULL_TURN) + FULL_TURN) % FULL_TURN);

        Constraints {
            from: from_normalized,
            to: to_normalized,
        }
    }

    pub fn compliant(&self, angles: &[f64; 5]) -> bool {
        (0..5).all(|i| self.joint_compliant(i, angles[i]))
    }

    /// Indices of the joints violating their limits, empty when compliant.
    pub fn violations(&self, angles: &[f64; 5]) -> Vec<usize> {
        (0..5)
            .filter(|&i| !self.joint_compliant(i, angles[i]))
            .collect()
    }

    /// Check a single joint against its limit range.
    pub fn joint_compliant(&self, i: usize, angle: f64) -> bool {
        if self.from[i] == self.to[i] {
            return true;
        }
        let angle = ((angle % FULL_TURN) + FULL_TURN) % FULL_TURN;
        if self.from[i] <= self.to[i] {
            angle >= self.from[i] && angle <= self.to[i]
        } else {
            angle >= self.from[i] || angle <= self.to[i]
        }
    }

    pub fn filter(&self, angles: &Vec<[f64; 5]>) -> Vec<[f64; 5]> {
        angles
            .into_iter()
            .filter(|angle_array| self.compliant(&angle_array))
            .cloned()
            .collect()
    }
}
