//! Merging of adjacent same-axis rotations.

use alsvid_ir::{CircuitDag, Gate};

use crate::error::CompileResult;
use crate::pass::{Pass, PassStats};
use crate::passes::{merges_with, normalize_angle};

/// Fuses consecutive rotations of the same axis on the same qubit.
///
/// Rx, Ry and Rz each form an abelian one-parameter group, so two
/// rotations joined by a direct edge on the same wire combine into one
/// with the summed angle, normalized into `(-π, π]`. The pass iterates to
/// a fixed point, so chains of rotations collapse into a single gate.
///
/// A merge can leave a full-turn rotation behind;
/// [`IdentityEliminationPass`](crate::passes::IdentityEliminationPass)
/// removes those.
pub struct RotationMergePass;

impl RotationMergePass {
    /// Create a new rotation-merge pass.
    pub fn new() -> Self {
        Self
    }
}

impl Default for RotationMergePass {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for RotationMergePass {
    fn name(&self) -> &str {
        "RotationMerge"
    }

    fn run(&self, dag: &mut CircuitDag) -> CompileResult<PassStats> {
        let mut stats = PassStats::default();

        loop {
            let mut changed = false;
            let order = dag.topological_order()?;

            for &id in &order {
                if !dag.has_node(id) {
                    continue;
                }
                let node = dag.node(id)?;
                if !node.gate().kind().is_rotation() {
                    continue;
                }
                let gate = node.gate().clone();
                let successors = node.successors().to_vec();

                for succ_id in successors {
                    let succ_gate = dag.node(succ_id)?.gate().clone();
                    if !merges_with(&gate, &succ_gate) {
                        continue;
                    }
                    let (Some(a), Some(b)) = (gate.angle(), succ_gate.angle()) else {
                        continue;
                    };
                    let Some(merged_kind) = gate.kind().with_angle(normalize_angle(a + b))
                    else {
                        continue;
                    };

                    dag.remove(succ_id)?;
                    if let Some(slot) = dag.gate_mut(id) {
                        *slot = Gate::new(merged_kind, gate.qubits().to_vec())?;
                    }
                    stats.removed += 1;
                    changed = true;
                    break;
                }
            }

            if !changed {
                break;
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_ir::{Circuit, QubitId};
    use std::f64::consts::PI;

    fn run(circuit: &Circuit) -> (CircuitDag, PassStats) {
        let mut dag = CircuitDag::from_circuit(circuit);
        let stats = RotationMergePass::new().run(&mut dag).unwrap();
        (dag, stats)
    }

    fn single_angle(dag: &CircuitDag) -> f64 {
        assert_eq!(dag.num_nodes(), 1);
        let id = dag.node_ids()[0];
        dag.node(id).unwrap().gate().angle().unwrap()
    }

    #[test]
    fn test_merges_same_axis_pair() {
        let mut circuit = Circuit::new(1).unwrap();
        circuit.rx(PI / 4.0, QubitId(0)).unwrap();
        circuit.rx(PI / 4.0, QubitId(0)).unwrap();

        let (dag, stats) = run(&circuit);
        assert_eq!(stats.removed, 1);
        assert!((single_angle(&dag) - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_merges_chain_to_one_gate() {
        let mut circuit = Circuit::new(1).unwrap();
        for _ in 0..4 {
            circuit.rz(PI / 8.0, QubitId(0)).unwrap();
        }

        let (dag, stats) = run(&circuit);
        assert_eq!(stats.removed, 3);
        assert!((single_angle(&dag) - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_merged_angle_is_normalized() {
        let mut circuit = Circuit::new(1).unwrap();
        circuit.rz(1.5 * PI, QubitId(0)).unwrap();
        circuit.rz(PI, QubitId(0)).unwrap();

        let (dag, _) = run(&circuit);
        // 2.5π reduces to π/2.
        assert!((single_angle(&dag) - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_opposite_angles_merge_to_zero() {
        let mut circuit = Circuit::new(1).unwrap();
        circuit.rz(PI / 4.0, QubitId(0)).unwrap();
        circuit.rz(-PI / 4.0, QubitId(0)).unwrap();

        let (dag, stats) = run(&circuit);
        assert_eq!(stats.removed, 1);
        assert_eq!(single_angle(&dag), 0.0);
    }

    #[test]
    fn test_different_axes_do_not_merge() {
        let mut circuit = Circuit::new(1).unwrap();
        circuit.rx(0.5, QubitId(0)).unwrap();
        circuit.rz(0.5, QubitId(0)).unwrap();

        let (dag, stats) = run(&circuit);
        assert_eq!(dag.num_nodes(), 2);
        assert_eq!(stats.removed, 0);
    }

    #[test]
    fn test_different_qubits_do_not_merge() {
        let mut circuit = Circuit::new(2).unwrap();
        circuit.rz(0.5, QubitId(0)).unwrap();
        circuit.rz(0.5, QubitId(1)).unwrap();

        let (dag, stats) = run(&circuit);
        assert_eq!(dag.num_nodes(), 2);
        assert_eq!(stats.removed, 0);
    }

    #[test]
    fn test_intervening_gate_blocks_merge() {
        let mut circuit = Circuit::new(1).unwrap();
        circuit.rz(0.5, QubitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.rz(0.5, QubitId(0)).unwrap();

        let (dag, stats) = run(&circuit);
        assert_eq!(dag.num_nodes(), 3);
        assert_eq!(stats.removed, 0);
    }

    #[test]
    fn test_non_rotations_untouched() {
        let mut circuit = Circuit::new(1).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.h(QubitId(0)).unwrap();

        let (dag, stats) = run(&circuit);
        assert_eq!(dag.num_nodes(), 2);
        assert_eq!(stats.removed, 0);
    }
}
