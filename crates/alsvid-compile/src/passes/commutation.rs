//! Reordering of commuting gates.

use alsvid_ir::{CircuitDag, Gate, GateKind};
use tracing::debug;

use crate::error::CompileResult;
use crate::pass::{Pass, PassStats};
use crate::passes::{cancels_with, merges_with};

/// Upper bound on reordering sweeps for pathological inputs.
const MAX_SWEEPS: usize = 100;

/// Reorders commuting gates to expose cancellation and merge
/// opportunities for the other passes.
///
/// The DAG is linearized to a topological gate sequence, adjacent
/// commuting gates are transposed when doing so moves a gate next to an
/// earlier partner it can cancel with or merge into, and the DAG is then
/// rebuilt from the reordered sequence. Rebuilding re-derives every wire
/// chain, so the per-qubit ordering invariant holds by construction.
///
/// Commutation rules:
/// - gates on disjoint qubit sets;
/// - two gates of the same kind on the same operand list;
/// - any two of Z, S, Sdg, T, Tdg, Rz, CZ (diagonal);
/// - a Z-like gate (Z, S, Sdg, T, Tdg, Rz) and a CNOT whose control is
///   the Z-like gate's qubit;
/// - X and a CNOT whose target is the X's qubit.
///
/// No gate is added or removed, so the reported statistics stay zero;
/// reorder counts are logged instead.
pub struct CommutationPass;

impl CommutationPass {
    /// Create a new commutation pass.
    pub fn new() -> Self {
        Self
    }
}

impl Default for CommutationPass {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for CommutationPass {
    fn name(&self) -> &str {
        "Commutation"
    }

    fn run(&self, dag: &mut CircuitDag) -> CompileResult<PassStats> {
        let order = dag.topological_order()?;
        let mut gates: Vec<Gate> = Vec::with_capacity(order.len());
        for id in order {
            gates.push(dag.node(id)?.gate().clone());
        }

        let mut reorders = 0usize;
        for _ in 0..MAX_SWEEPS {
            let mut changed = false;
            for i in 1..gates.len() {
                if commute(&gates[i - 1], &gates[i]) && beneficial(&gates, i) {
                    gates.swap(i - 1, i);
                    reorders += 1;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        if reorders > 0 {
            debug!(reorders, "reordered commuting gates");
            let mut rebuilt = CircuitDag::new(dag.num_qubits())?;
            for gate in gates {
                rebuilt.add(gate)?;
            }
            *dag = rebuilt;
        }

        Ok(PassStats::default())
    }
}

/// Check whether two gates share any qubit.
fn overlaps(a: &Gate, b: &Gate) -> bool {
    a.qubits().iter().any(|q| b.touches(*q))
}

/// Check whether a kind is diagonal in the computational basis.
fn is_diagonal(kind: &GateKind) -> bool {
    matches!(
        kind,
        GateKind::Z
            | GateKind::S
            | GateKind::Sdg
            | GateKind::T
            | GateKind::Tdg
            | GateKind::Rz(_)
            | GateKind::Cz
    )
}

/// Check whether a kind is a diagonal single-qubit gate.
fn is_z_like(kind: &GateKind) -> bool {
    matches!(
        kind,
        GateKind::Z
            | GateKind::S
            | GateKind::Sdg
            | GateKind::T
            | GateKind::Tdg
            | GateKind::Rz(_)
    )
}

/// Check whether two gates commute. Only the listed rules are assumed.
fn commute(a: &Gate, b: &Gate) -> bool {
    if !overlaps(a, b) {
        return true;
    }
    if a.kind().same_kind(b.kind()) && a.qubits() == b.qubits() {
        return true;
    }
    if is_diagonal(a.kind()) && is_diagonal(b.kind()) {
        return true;
    }

    // Z-like gate through the control of a CNOT.
    if is_z_like(a.kind()) && *b.kind() == GateKind::Cnot && a.qubits()[0] == b.qubits()[0] {
        return true;
    }
    if is_z_like(b.kind()) && *a.kind() == GateKind::Cnot && b.qubits()[0] == a.qubits()[0] {
        return true;
    }

    // X through the target of a CNOT.
    if *a.kind() == GateKind::X && *b.kind() == GateKind::Cnot && a.qubits()[0] == b.qubits()[1]
    {
        return true;
    }
    if *b.kind() == GateKind::X && *a.kind() == GateKind::Cnot && b.qubits()[0] == a.qubits()[1]
    {
        return true;
    }

    false
}

/// Check whether moving `gates[i]` one position earlier would put it next
/// to a partner: the nearest earlier gate sharing one of its qubits
/// (skipping the gate it moves past) must be cancellable or mergeable
/// with it.
fn beneficial(gates: &[Gate], i: usize) -> bool {
    let moving = &gates[i];
    for j in (0..i.saturating_sub(1)).rev() {
        if overlaps(&gates[j], moving) {
            return cancels_with(&gates[j], moving) || merges_with(&gates[j], moving);
        }
    }
    false
}
