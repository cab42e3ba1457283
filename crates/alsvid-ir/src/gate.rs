//! Quantum gate types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem;

use crate::error::{IrError, IrResult};
use crate::qubit::QubitId;

/// The closed set of gate kinds understood by the compiler.
///
/// Rotation kinds carry their angle (in radians) directly, so a rotation
/// without an angle or a Pauli with one is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around the X axis.
    Rx(f64),
    /// Rotation around the Y axis.
    Ry(f64),
    /// Rotation around the Z axis.
    Rz(f64),
    /// Controlled-NOT gate (control first, target second).
    Cnot,
    /// Controlled-Z gate.
    Cz,
    /// SWAP gate.
    Swap,
}

impl GateKind {
    /// Get the name of this gate kind.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::H => "h",
            GateKind::X => "x",
            GateKind::Y => "y",
            GateKind::Z => "z",
            GateKind::S => "s",
            GateKind::Sdg => "sdg",
            GateKind::T => "t",
            GateKind::Tdg => "tdg",
            GateKind::Rx(_) => "rx",
            GateKind::Ry(_) => "ry",
            GateKind::Rz(_) => "rz",
            GateKind::Cnot => "cnot",
            GateKind::Cz => "cz",
            GateKind::Swap => "swap",
        }
    }

    /// Get the number of qubits this gate kind operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateKind::H
            | GateKind::X
            | GateKind::Y
            | GateKind::Z
            | GateKind::S
            | GateKind::Sdg
            | GateKind::T
            | GateKind::Tdg
            | GateKind::Rx(_)
            | GateKind::Ry(_)
            | GateKind::Rz(_) => 1,

            GateKind::Cnot | GateKind::Cz | GateKind::Swap => 2,
        }
    }

    /// Check if this is a rotation kind (Rx, Ry, Rz).
    #[inline]
    pub fn is_rotation(&self) -> bool {
        matches!(self, GateKind::Rx(_) | GateKind::Ry(_) | GateKind::Rz(_))
    }

    /// Check if this kind squares to the identity on its operands.
    #[inline]
    pub fn is_hermitian(&self) -> bool {
        matches!(
            self,
            GateKind::H
                | GateKind::X
                | GateKind::Y
                | GateKind::Z
                | GateKind::Cnot
                | GateKind::Cz
                | GateKind::Swap
        )
    }

    /// Get the rotation angle, if this is a rotation kind.
    #[inline]
    pub fn angle(&self) -> Option<f64> {
        match self {
            GateKind::Rx(theta) | GateKind::Ry(theta) | GateKind::Rz(theta) => Some(*theta),
            _ => None,
        }
    }

    /// Check whether two kinds are the same variant, ignoring any angle.
    #[inline]
    pub fn same_kind(&self, other: &GateKind) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }

    /// Check whether composing this kind with `other` yields the identity
    /// via an adjoint pair (S·Sdg or T·Tdg, in either order).
    #[inline]
    pub fn adjoint_of(&self, other: &GateKind) -> bool {
        matches!(
            (self, other),
            (GateKind::S, GateKind::Sdg)
                | (GateKind::Sdg, GateKind::S)
                | (GateKind::T, GateKind::Tdg)
                | (GateKind::Tdg, GateKind::T)
        )
    }

    /// Rebuild this kind with a different angle. Returns `None` for
    /// non-rotation kinds.
    #[inline]
    pub fn with_angle(&self, theta: f64) -> Option<GateKind> {
        match self {
            GateKind::Rx(_) => Some(GateKind::Rx(theta)),
            GateKind::Ry(_) => Some(GateKind::Ry(theta)),
            GateKind::Rz(_) => Some(GateKind::Rz(theta)),
            _ => None,
        }
    }
}

/// A single operation: a gate kind applied to an ordered list of qubits.
///
/// For two-qubit kinds the first qubit is the control (where the kind has
/// one) and the second the target. Equality is structural over
/// `(kind, qubits, angle)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    kind: GateKind,
    qubits: Vec<QubitId>,
}

impl Gate {
    /// Create a gate, validating arity and operand distinctness.
    ///
    /// Qubit range checks are performed when the gate is added to a
    /// [`Circuit`](crate::Circuit) or [`CircuitDag`](crate::CircuitDag),
    /// which know the register size.
    pub fn new(kind: GateKind, qubits: Vec<QubitId>) -> IrResult<Self> {
        let expected = kind.num_qubits();
        let got = qubits.len() as u32;
        if expected != got {
            return Err(IrError::ArityMismatch {
                gate: kind.name(),
                expected,
                got,
            });
        }
        if qubits.len() == 2 && qubits[0] == qubits[1] {
            return Err(IrError::DuplicateOperand {
                gate: kind.name(),
                qubit: qubits[0],
            });
        }
        Ok(Self { kind, qubits })
    }

    /// Hadamard gate.
    pub fn h(qubit: QubitId) -> Self {
        Self {
            kind: GateKind::H,
            qubits: vec![qubit],
        }
    }

    /// Pauli-X gate.
    pub fn x(qubit: QubitId) -> Self {
        Self {
            kind: GateKind::X,
            qubits: vec![qubit],
        }
    }

    /// Pauli-Y gate.
    pub fn y(qubit: QubitId) -> Self {
        Self {
            kind: GateKind::Y,
            qubits: vec![qubit],
        }
    }

    /// Pauli-Z gate.
    pub fn z(qubit: QubitId) -> Self {
        Self {
            kind: GateKind::Z,
            qubits: vec![qubit],
        }
    }

    /// S gate.
    pub fn s(qubit: QubitId) -> Self {
        Self {
            kind: GateKind::S,
            qubits: vec![qubit],
        }
    }

    /// S-dagger gate.
    pub fn sdg(qubit: QubitId) -> Self {
        Self {
            kind: GateKind::Sdg,
            qubits: vec![qubit],
        }
    }

    /// T gate.
    pub fn t(qubit: QubitId) -> Self {
        Self {
            kind: GateKind::T,
            qubits: vec![qubit],
        }
    }

    /// T-dagger gate.
    pub fn tdg(qubit: QubitId) -> Self {
        Self {
            kind: GateKind::Tdg,
            qubits: vec![qubit],
        }
    }

    /// Rotation around the X axis by `theta` radians.
    pub fn rx(theta: f64, qubit: QubitId) -> Self {
        Self {
            kind: GateKind::Rx(theta),
            qubits: vec![qubit],
        }
    }

    /// Rotation around the Y axis by `theta` radians.
    pub fn ry(theta: f64, qubit: QubitId) -> Self {
        Self {
            kind: GateKind::Ry(theta),
            qubits: vec![qubit],
        }
    }

    /// Rotation around the Z axis by `theta` radians.
    pub fn rz(theta: f64, qubit: QubitId) -> Self {
        Self {
            kind: GateKind::Rz(theta),
            qubits: vec![qubit],
        }
    }

    /// Controlled-NOT gate. Fails if control and target coincide.
    pub fn cnot(control: QubitId, target: QubitId) -> IrResult<Self> {
        Self::new(GateKind::Cnot, vec![control, target])
    }

    /// Controlled-Z gate. Fails if the operands coincide.
    pub fn cz(a: QubitId, b: QubitId) -> IrResult<Self> {
        Self::new(GateKind::Cz, vec![a, b])
    }

    /// SWAP gate. Fails if the operands coincide.
    pub fn swap(a: QubitId, b: QubitId) -> IrResult<Self> {
        Self::new(GateKind::Swap, vec![a, b])
    }

    /// The kind of this gate.
    #[inline]
    pub fn kind(&self) -> &GateKind {
        &self.kind
    }

    /// The ordered operand list.
    #[inline]
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// The gate name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// The number of operands.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }

    /// The rotation angle, if any.
    #[inline]
    pub fn angle(&self) -> Option<f64> {
        self.kind.angle()
    }

    /// Check whether this gate acts on the given qubit.
    #[inline]
    pub fn touches(&self, qubit: QubitId) -> bool {
        self.qubits.contains(&qubit)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        if let Some(theta) = self.angle() {
            write!(f, "({theta})")?;
        }
        let mut sep = " ";
        for q in &self.qubits {
            write!(f, "{sep}{q}")?;
            sep = ", ";
        }
        Ok(())
    }
}
