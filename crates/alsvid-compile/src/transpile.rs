//! End-to-end compilation: optimize, then route.

use alsvid_ir::{Circuit, CircuitDag};
use tracing::info;

use crate::error::CompileResult;
use crate::manager::PipelineStatistics;
use crate::options::{CompileOptions, PassManagerBuilder};
use crate::routing::{Router, RoutingResult, SabreRouter};
use crate::topology::Topology;

/// Outcome of a full compilation run.
#[derive(Debug, Clone)]
pub struct TranspileResult {
    /// Statistics from the rewrite pipeline.
    pub optimization: PipelineStatistics,
    /// The routed circuit with its mappings and counters.
    pub routing: RoutingResult,
}

/// Optimize a circuit to a fixed point and route it onto a topology.
///
/// ```rust
/// use alsvid_compile::{transpile, CompileOptions, Topology};
/// use alsvid_ir::{Circuit, QubitId};
///
/// let mut circuit = Circuit::new(2).unwrap();
/// circuit.h(QubitId(0)).unwrap();
/// circuit.h(QubitId(0)).unwrap();
/// circuit.cnot(QubitId(0), QubitId(1)).unwrap();
///
/// let topology = Topology::linear(2).unwrap();
/// let result = transpile(&circuit, &topology, &CompileOptions::default()).unwrap();
///
/// // The Hadamard pair cancelled and the CNOT was already executable.
/// assert_eq!(result.routing.routed_circuit.len(), 1);
/// assert_eq!(result.routing.swaps_inserted, 0);
/// ```
pub fn transpile(
    circuit: &Circuit,
    topology: &Topology,
    options: &CompileOptions,
) -> CompileResult<TranspileResult> {
    let pm = PassManagerBuilder::new()
        .with_options(options.clone())
        .build()?;

    let mut dag = CircuitDag::from_circuit(circuit);
    let optimization = pm.run_until_stable(&mut dag, options.max_iterations)?;
    let optimized = dag.to_circuit()?;
    info!(
        before = optimization.initial_gate_count,
        after = optimization.final_gate_count,
        "optimization finished"
    );

    let router = SabreRouter::new()
        .with_lookahead(options.lookahead)
        .with_extended_set_weight(options.extended_set_weight)
        .with_decay(options.decay);
    let routing = router.route(&optimized, topology)?;

    Ok(TranspileResult {
        optimization,
        routing,
    })
}
