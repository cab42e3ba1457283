//! Qubit routing: mapping logical circuits onto device connectivity.
//!
//! A router turns a logical circuit, written as if every qubit pair could
//! interact, into a physical circuit whose two-qubit gates all fall on
//! topology edges, inserting SWAP gates to move qubit states around.

mod sabre;

pub use sabre::SabreRouter;

use std::fmt;

use alsvid_ir::Circuit;
use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult};
use crate::topology::Topology;

/// Outcome of routing a circuit onto a topology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingResult {
    /// The routed circuit over the topology's physical qubits.
    pub routed_circuit: Circuit,
    /// Logical-to-physical mapping before routing.
    pub initial_mapping: Vec<u32>,
    /// Logical-to-physical mapping after routing.
    pub final_mapping: Vec<u32>,
    /// Number of SWAP gates inserted.
    pub swaps_inserted: usize,
    /// Depth of the input circuit.
    pub original_depth: usize,
    /// Depth of the routed circuit.
    pub final_depth: usize,
    /// Gate count of the input circuit.
    pub original_gate_count: usize,
    /// Gate count of the routed circuit.
    pub final_gate_count: usize,
}

impl RoutingResult {
    /// Depth added by routing, saturating at zero.
    pub fn depth_overhead(&self) -> usize {
        self.final_depth.saturating_sub(self.original_depth)
    }

    /// Gate-count overhead assuming each SWAP decomposes into 3 CNOTs.
    pub fn gate_overhead(&self) -> usize {
        self.swaps_inserted * 3
    }
}

impl fmt::Display for RoutingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Routing result:")?;
        writeln!(f, "  SWAPs inserted: {}", self.swaps_inserted)?;
        writeln!(f, "  Original depth: {}", self.original_depth)?;
        writeln!(f, "  Final depth:    {}", self.final_depth)?;
        writeln!(f, "  Depth overhead: {}", self.depth_overhead())?;
        write!(f, "  Final mapping:  [")?;
        for (logical, physical) in self.final_mapping.iter().enumerate() {
            if logical > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{logical}->{physical}")?;
        }
        write!(f, "]")
    }
}

/// A qubit routing algorithm.
pub trait Router {
    /// The router name, for logging.
    fn name(&self) -> &str;

    /// Route `circuit` onto `topology`.
    ///
    /// Fails with [`CompileError::TooManyQubits`] before any work when
    /// the circuit needs more qubits than the topology has.
    fn route(&self, circuit: &Circuit, topology: &Topology) -> CompileResult<RoutingResult>;
}

/// Identity mapping over `n` logical qubits.
pub(crate) fn identity_mapping(n: u32) -> Vec<u32> {
    (0..n).collect()
}

/// Reject circuits wider than the topology.
pub(crate) fn validate_route_inputs(
    circuit: &Circuit,
    topology: &Topology,
) -> CompileResult<()> {
    if circuit.num_qubits() > topology.num_qubits() {
        return Err(CompileError::TooManyQubits {
            circuit: circuit.num_qubits(),
            topology: topology.num_qubits(),
        });
    }
    Ok(())
}

/// Baseline router that keeps the identity mapping and inserts nothing.
///
/// It assumes the circuit already respects the topology (or that the
/// topology is all-to-all); useful as a baseline and in tests.
pub struct TrivialRouter;

impl TrivialRouter {
    /// Create a new trivial router.
    pub fn new() -> Self {
        Self
    }
}

impl Default for TrivialRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl Router for TrivialRouter {
    fn name(&self) -> &str {
        "TrivialRouter"
    }

    fn route(&self, circuit: &Circuit, topology: &Topology) -> CompileResult<RoutingResult> {
        validate_route_inputs(circuit, topology)?;

        let mapping = identity_mapping(circuit.num_qubits());
        let depth = circuit.depth();
        Ok(RoutingResult {
            routed_circuit: circuit.clone(),
            initial_mapping: mapping.clone(),
            final_mapping: mapping,
            swaps_inserted: 0,
            original_depth: depth,
            final_depth: depth,
            original_gate_count: circuit.len(),
            final_gate_count: circuit.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_ir::QubitId;

    #[test]
    fn test_trivial_router_preserves_circuit() {
        let mut circuit = Circuit::new(2).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.cnot(QubitId(0), QubitId(1)).unwrap();
        let topology = Topology::linear(2).unwrap();

        let result = TrivialRouter::new().route(&circuit, &topology).unwrap();
        assert_eq!(result.routed_circuit.len(), 2);
        assert_eq!(result.swaps_inserted, 0);
        assert_eq!(result.initial_mapping, vec![0, 1]);
        assert_eq!(result.final_mapping, vec![0, 1]);
    }

    #[test]
    fn test_trivial_router_rejects_wide_circuit() {
        let circuit = Circuit::new(5).unwrap();
        let topology = Topology::linear(3).unwrap();
        assert_eq!(
            TrivialRouter::new()
                .route(&circuit, &topology)
                .unwrap_err(),
            CompileError::TooManyQubits {
                circuit: 5,
                topology: 3,
            }
        );
    }

    #[test]
    fn test_routing_result_overheads() {
        let circuit = Circuit::new(1).unwrap();
        let result = RoutingResult {
            routed_circuit: circuit,
            initial_mapping: vec![0],
            final_mapping: vec![0],
            swaps_inserted: 2,
            original_depth: 3,
            final_depth: 5,
            original_gate_count: 4,
            final_gate_count: 6,
        };
        assert_eq!(result.depth_overhead(), 2);
        assert_eq!(result.gate_overhead(), 6);

        let rendered = format!("{result}");
        assert!(rendered.contains("SWAPs inserted: 2"));
        assert!(rendered.contains("0->0"));
    }
}
