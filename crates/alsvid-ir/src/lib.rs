//! Alsvid Circuit Intermediate Representation
//!
//! This crate provides the core data structures for representing quantum
//! circuits in Alsvid. It forms the foundation of the compilation stack.
//!
//! # Overview
//!
//! A program enters the compiler as a [`Circuit`]: a qubit register plus a
//! gate sequence in program order. For analysis and rewriting, the circuit
//! is lowered to a [`CircuitDag`], where nodes are gates and edges encode
//! the per-qubit wire ordering. Optimization passes operate on the DAG and
//! flatten it back to a circuit when done.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] for addressing the quantum register
//! - **Gates**: [`GateKind`] and [`Gate`] for the closed set of operations
//! - **Circuit**: [`Circuit`] linear program-order representation
//! - **DAG**: [`CircuitDag`] dependency-graph representation
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use alsvid_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new(2).unwrap();
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cnot(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 2);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg` | 1 | S and S-dagger gates |
//! | `T`, `Tdg` | 1 | T and T-dagger gates |
//! | `Rx`, `Ry`, `Rz` | 1 | Rotation gates |
//! | `CNOT` | 2 | Controlled-NOT |
//! | `CZ` | 2 | Controlled-Z |
//! | `SWAP` | 2 | SWAP gate |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, DagNode, NodeId};
pub use error::{IrError, IrResult};
pub use gate::{Gate, GateKind};
pub use qubit::QubitId;
