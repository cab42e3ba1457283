//! Pass pipeline orchestration.

use std::fmt;

use alsvid_ir::{Circuit, CircuitDag};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::CompileResult;
use crate::pass::Pass;

/// One pipeline entry: a pass name with its gate-count deltas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassRecord {
    /// The pass name.
    pub name: String,
    /// Gates removed by this execution.
    pub removed: usize,
    /// Gates added by this execution.
    pub added: usize,
}

/// Aggregated statistics from running a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStatistics {
    /// Gate count before the first pass.
    pub initial_gate_count: usize,
    /// Gate count after the last pass.
    pub final_gate_count: usize,
    /// Total gates removed across all passes.
    pub total_removed: usize,
    /// Total gates added across all passes.
    pub total_added: usize,
    /// Per-execution records, in run order.
    pub per_pass: Vec<PassRecord>,
}

impl PipelineStatistics {
    /// Net change in gate count; negative means a reduction.
    pub fn net_change(&self) -> isize {
        self.total_added as isize - self.total_removed as isize
    }

    /// Percentage reduction in gate count, 0 when the input was empty.
    pub fn reduction_percent(&self) -> f64 {
        if self.initial_gate_count == 0 {
            return 0.0;
        }
        100.0 * (self.initial_gate_count as f64 - self.final_gate_count as f64)
            / self.initial_gate_count as f64
    }
}

impl fmt::Display for PipelineStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline statistics:")?;
        writeln!(f, "  Initial gates: {}", self.initial_gate_count)?;
        writeln!(f, "  Final gates:   {}", self.final_gate_count)?;
        writeln!(f, "  Reduction:     {:.1}%", self.reduction_percent())?;
        writeln!(f, "  Per-pass:")?;
        for record in &self.per_pass {
            writeln!(
                f,
                "    {}: -{} / +{}",
                record.name, record.removed, record.added
            )?;
        }
        Ok(())
    }
}

/// Runs a sequence of passes over a DAG and aggregates their statistics.
///
/// ```rust
/// use alsvid_compile::{PassManager, passes::CancellationPass};
/// use alsvid_ir::{Circuit, CircuitDag, QubitId};
///
/// let mut pm = PassManager::new();
/// pm.add_pass(CancellationPass::new());
///
/// let mut circuit = Circuit::new(1).unwrap();
/// circuit.h(QubitId(0)).unwrap();
/// circuit.h(QubitId(0)).unwrap();
///
/// let mut dag = CircuitDag::from_circuit(&circuit);
/// let stats = pm.run(&mut dag).unwrap();
/// assert_eq!(stats.final_gate_count, 0);
/// ```
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl std::fmt::Debug for PassManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassManager")
            .field("passes", &self.passes.iter().map(|p| p.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl PassManager {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Append a pass to the pipeline.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// The number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the pipeline has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Drop all passes.
    pub fn clear(&mut self) {
        self.passes.clear();
    }

    /// Run every pass once, in order.
    #[instrument(skip(self, dag))]
    pub fn run(&self, dag: &mut CircuitDag) -> CompileResult<PipelineStatistics> {
        let mut stats = PipelineStatistics {
            initial_gate_count: dag.num_nodes(),
            ..Default::default()
        };
        info!(
            passes = self.passes.len(),
            gates = stats.initial_gate_count,
            "running pipeline"
        );

        for pass in &self.passes {
            let pass_stats = pass.run(dag)?;
            debug!(
                pass = pass.name(),
                removed = pass_stats.removed,
                added = pass_stats.added,
                "pass completed"
            );
            stats.total_removed += pass_stats.removed;
            stats.total_added += pass_stats.added;
            stats.per_pass.push(PassRecord {
                name: pass.name().to_string(),
                removed: pass_stats.removed,
                added: pass_stats.added,
            });
        }

        stats.final_gate_count = dag.num_nodes();
        info!(gates = stats.final_gate_count, "pipeline completed");
        Ok(stats)
    }

    /// Run the pipeline repeatedly until a full sweep changes nothing, up
    /// to `max_iterations` sweeps. Statistics accumulate across sweeps.
    pub fn run_until_stable(
        &self,
        dag: &mut CircuitDag,
        max_iterations: usize,
    ) -> CompileResult<PipelineStatistics> {
        let mut stats = PipelineStatistics {
            initial_gate_count: dag.num_nodes(),
            ..Default::default()
        };

        for iteration in 0..max_iterations {
            let sweep = self.run(dag)?;
            stats.total_removed += sweep.total_removed;
            stats.total_added += sweep.total_added;
            stats.per_pass.extend(sweep.per_pass);

            if sweep.total_removed == 0 && sweep.total_added == 0 {
                debug!(iteration, "pipeline reached fixed point");
                break;
            }
        }

        stats.final_gate_count = dag.num_nodes();
        Ok(stats)
    }

    /// Lower a circuit to a DAG, run the pipeline once, and flatten back.
    pub fn run_circuit(
        &self,
        circuit: &Circuit,
    ) -> CompileResult<(Circuit, PipelineStatistics)> {
        let mut dag = CircuitDag::from_circuit(circuit);
        let stats = self.run(&mut dag)?;
        Ok((dag.to_circuit()?, stats))
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::{
        CancellationPass, IdentityEliminationPass, RotationMergePass,
    };
    use alsvid_ir::QubitId;
    use std::f64::consts::PI;

    #[test]
    fn test_empty_pipeline() {
        let pm = PassManager::new();
        assert!(pm.is_empty());
        assert_eq!(pm.len(), 0);

        let mut dag = CircuitDag::new(1).unwrap();
        let stats = pm.run(&mut dag).unwrap();
        assert_eq!(stats.initial_gate_count, 0);
        assert_eq!(stats.final_gate_count, 0);
        assert!(stats.per_pass.is_empty());
    }

    #[test]
    fn test_passes_run_in_order() {
        let mut pm = PassManager::new();
        pm.add_pass(CancellationPass::new());
        pm.add_pass(RotationMergePass::new());

        let mut circuit = Circuit::new(1).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.rz(0.3, QubitId(0)).unwrap();

        let mut dag = CircuitDag::from_circuit(&circuit);
        let stats = pm.run(&mut dag).unwrap();

        assert_eq!(stats.initial_gate_count, 3);
        assert_eq!(stats.final_gate_count, 1);
        assert_eq!(stats.per_pass.len(), 2);
        assert_eq!(stats.per_pass[0].name, "Cancellation");
        assert_eq!(stats.per_pass[0].removed, 2);
        assert_eq!(stats.per_pass[1].name, "RotationMerge");
        assert_eq!(stats.per_pass[1].removed, 0);
    }

    #[test]
    fn test_run_circuit_round_trip() {
        let mut pm = PassManager::new();
        pm.add_pass(CancellationPass::new());

        let mut circuit = Circuit::new(1).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.x(QubitId(0)).unwrap();

        let (optimized, stats) = pm.run_circuit(&circuit).unwrap();
        assert_eq!(optimized.len(), 1);
        assert_eq!(stats.net_change(), -2);
        // The input is untouched.
        assert_eq!(circuit.len(), 3);
    }

    #[test]
    fn test_run_until_stable_converges() {
        // X H H X needs two cancellation sweeps to empty out.
        let mut pm = PassManager::new();
        pm.add_pass(CancellationPass::new());

        let mut circuit = Circuit::new(1).unwrap();
        circuit.x(QubitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.x(QubitId(0)).unwrap();

        let mut dag = CircuitDag::from_circuit(&circuit);
        let stats = pm.run_until_stable(&mut dag, 10).unwrap();

        assert!(dag.is_empty());
        assert_eq!(stats.initial_gate_count, 4);
        assert_eq!(stats.final_gate_count, 0);
        assert_eq!(stats.total_removed, 4);
    }

    #[test]
    fn test_run_until_stable_respects_bound() {
        let mut pm = PassManager::new();
        pm.add_pass(CancellationPass::new());

        let mut circuit = Circuit::new(1).unwrap();
        circuit.x(QubitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.x(QubitId(0)).unwrap();

        let mut dag = CircuitDag::from_circuit(&circuit);
        pm.run_until_stable(&mut dag, 1).unwrap();
        // One sweep only removes the inner pair.
        assert_eq!(dag.num_nodes(), 2);
    }

    #[test]
    fn test_reduction_percent() {
        let mut pm = PassManager::new();
        pm.add_pass(RotationMergePass::new());
        pm.add_pass(IdentityEliminationPass::new());

        let mut circuit = Circuit::new(1).unwrap();
        circuit.rz(PI / 4.0, QubitId(0)).unwrap();
        circuit.rz(-PI / 4.0, QubitId(0)).unwrap();

        let (optimized, stats) = pm.run_circuit(&circuit).unwrap();
        assert!(optimized.is_empty());
        assert_eq!(stats.reduction_percent(), 100.0);
        assert_eq!(stats.net_change(), -2);
    }

    #[test]
    fn test_display_lists_passes() {
        let mut pm = PassManager::new();
        pm.add_pass(CancellationPass::new());

        let mut circuit = Circuit::new(1).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();

        let mut dag = CircuitDag::from_circuit(&circuit);
        let stats = pm.run(&mut dag).unwrap();
        let rendered = format!("{stats}");
        assert!(rendered.contains("Cancellation"));
        assert!(rendered.contains("Initial gates: 2"));
    }
}
