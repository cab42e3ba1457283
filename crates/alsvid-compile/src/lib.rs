//! Alsvid Compilation Framework
//!
//! This crate turns logical circuits from [`alsvid_ir`] into circuits a
//! constrained device can execute: a pass pipeline rewrites the circuit
//! DAG to shrink gate count, and a router maps the result onto the
//! device's connectivity graph, inserting SWAP gates where two-qubit
//! gates fall on non-adjacent physical qubits.
//!
//! # Architecture
//!
//! ```text
//! Input Circuit
//!       |
//!       v
//! +-------------+
//! | PassManager |  Commutation -> Cancellation -> RotationMerge
//! +-------------+  -> IdentityElimination   (to a fixed point)
//!       |
//!       v
//! +-------------+
//! | SabreRouter |  <-- Topology (linear / ring / grid / heavy-hex)
//! +-------------+
//!       |
//!       v
//! Routed Circuit + mappings + statistics
//! ```
//!
//! # Example
//!
//! ```rust
//! use alsvid_compile::{transpile, CompileOptions, Topology};
//! use alsvid_ir::{Circuit, QubitId};
//!
//! // A GHZ ladder: every CNOT lands on a ring edge.
//! let mut circuit = Circuit::new(4).unwrap();
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cnot(QubitId(0), QubitId(1)).unwrap();
//! circuit.cnot(QubitId(1), QubitId(2)).unwrap();
//! circuit.cnot(QubitId(2), QubitId(3)).unwrap();
//!
//! let topology = Topology::ring(4).unwrap();
//! let result = transpile(&circuit, &topology, &CompileOptions::default()).unwrap();
//! assert_eq!(result.routing.swaps_inserted, 0);
//! ```
//!
//! # Custom Passes
//!
//! Implement the [`Pass`] trait to plug into the pipeline:
//!
//! ```rust
//! use alsvid_compile::{CompileResult, Pass, PassStats};
//! use alsvid_ir::CircuitDag;
//!
//! struct CountingPass;
//!
//! impl Pass for CountingPass {
//!     fn name(&self) -> &str {
//!         "Counting"
//!     }
//!
//!     fn run(&self, dag: &mut CircuitDag) -> CompileResult<PassStats> {
//!         // Inspect or rewrite the DAG here.
//!         let _gates = dag.num_nodes();
//!         Ok(PassStats::default())
//!     }
//! }
//! ```

pub mod error;
pub mod manager;
pub mod options;
pub mod pass;
pub mod passes;
pub mod routing;
pub mod topology;
pub mod transpile;

pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassRecord, PipelineStatistics};
pub use options::{CompileOptions, PassManagerBuilder};
pub use pass::{Pass, PassStats};
pub use routing::{Router, RoutingResult, SabreRouter, TrivialRouter};
pub use topology::Topology;
pub use transpile::{transpile, TranspileResult};
