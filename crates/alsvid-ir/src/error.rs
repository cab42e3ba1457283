//! Error types for the IR crate.

use crate::dag::NodeId;
use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum IrError {
    /// Circuit or DAG constructed without any qubits.
    #[error("circuit must have at least one qubit")]
    EmptyRegister,

    /// Gate constructed with the wrong number of operands.
    #[error("gate '{gate}' requires {expected} qubits, got {got}")]
    ArityMismatch {
        /// Name of the gate.
        gate: &'static str,
        /// Number of operands the gate kind requires.
        expected: u32,
        /// Number of operands provided.
        got: u32,
    },

    /// Two-qubit gate constructed with the same qubit twice.
    #[error("gate '{gate}' lists qubit {qubit} more than once")]
    DuplicateOperand {
        /// Name of the gate.
        gate: &'static str,
        /// The repeated qubit.
        qubit: QubitId,
    },

    /// Gate references a qubit outside the register.
    #[error("gate '{gate}' references qubit {qubit} but the register has {num_qubits} qubits")]
    QubitOutOfRange {
        /// Name of the gate.
        gate: &'static str,
        /// The offending qubit.
        qubit: QubitId,
        /// Size of the register.
        num_qubits: u32,
    },

    /// Operation referenced a node id that is not present in the DAG.
    #[error("node {0} not found in DAG")]
    NodeNotFound(NodeId),

    /// The dependency graph contains a cycle. The construction rules make
    /// this unreachable, so hitting it indicates a bug in a DAG rewrite.
    #[error("dependency graph contains a cycle (internal error)")]
    CyclicDependency,
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
