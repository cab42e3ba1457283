//! Error types for the compile crate.

use alsvid_ir::IrError;
use thiserror::Error;

/// Errors that can occur during optimization or routing.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompileError {
    /// An underlying IR operation failed.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// A topology factory was given invalid parameters.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// A physical qubit index is outside the topology.
    #[error("physical qubit {qubit} is out of range for a topology of {num_qubits} qubits")]
    QubitOutOfBounds {
        /// The offending physical qubit.
        qubit: u32,
        /// Number of physical qubits in the topology.
        num_qubits: u32,
    },

    /// Attempted to connect a physical qubit to itself.
    #[error("cannot add a self-loop edge on physical qubit {0}")]
    SelfLoop(u32),

    /// The circuit needs more qubits than the topology provides.
    #[error("circuit has {circuit} qubits but the topology only has {topology}")]
    TooManyQubits {
        /// Logical qubits in the circuit.
        circuit: u32,
        /// Physical qubits in the topology.
        topology: u32,
    },

    /// Routing needed a path between two mutually unreachable qubits.
    #[error("no path between physical qubits {from} and {to}")]
    Disconnected {
        /// Source physical qubit.
        from: u32,
        /// Destination physical qubit.
        to: u32,
    },

    /// A pipeline referenced a pass name outside the known set.
    #[error("unknown pass '{0}'")]
    UnknownPass(String),
}

/// Result type for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;
