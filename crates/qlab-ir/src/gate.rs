//! The gate set.

use serde::{Deserialize, Serialize};

/// Every gate the simulator, transpiler and QASM emitter understand.
///
/// Angles are bound values in radians; there are no symbolic parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gate", content = "angle", rename_all = "lowercase")]
pub enum StandardGate {
    I,
    X,
    Z,
    H,
    /// Square root of X, native on IBM devices.
    SX,
    Ry(f64),
    Rz(f64),
    /// Control first, target second.
    CX,
    /// Symmetric in its operands.
    CZ,
}

impl StandardGate {
    /// OpenQASM 3 name.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::I => "id",
            Self::X => "x",
            Self::Z => "z",
            Self::H => "h",
            Self::SX => "sx",
            Self::Ry(_) => "ry",
            Self::Rz(_) => "rz",
            Self::CX => "cx",
            Self::CZ => "cz",
        }
    }

    #[inline]
    pub fn num_qubits(&self) -> u32 {
        if matches!(self, StandardGate::CX | StandardGate::CZ) {
            2
        } else {
            1
        }
    }

    #[inline]
    pub fn angle(&self) -> Option<f64> {
        match *self {
            StandardGate::Ry(theta) | StandardGate::Rz(theta) => Some(theta),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity() {
        assert_eq!(StandardGate::SX.num_qubits(), 1);
        assert_eq!(StandardGate::Ry(1.0).num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::CZ.num_qubits(), 2);
    }

    #[test]
    fn test_qasm_names() {
        assert_eq!(StandardGate::I.name(), "id");
        assert_eq!(StandardGate::Rz(0.0).name(), "rz");
    }

    #[test]
    fn test_only_rotations_have_angles() {
        assert_eq!(StandardGate::Rz(1.25).angle(), Some(1.25));
        assert_eq!(StandardGate::H.angle(), None);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&StandardGate::Ry(0.5)).unwrap();
        assert_eq!(json, r#"{"gate":"ry","angle":0.5}"#);
        let back: StandardGate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StandardGate::Ry(0.5));
        assert_eq!(serde_json::to_string(&StandardGate::H).unwrap(), r#"{"gate":"h"}"#);
    }
}
