//! Cancellation of adjacent inverse gate pairs.

use alsvid_ir::{CircuitDag, NodeId};
use rustc_hash::FxHashSet;

use crate::error::CompileResult;
use crate::pass::{Pass, PassStats};
use crate::passes::cancels_with;

/// Removes pairs of adjacent gates that compose to the identity.
///
/// Self-inverse kinds cancel with themselves (H, X, Y, Z, CNOT, CZ, SWAP);
/// S/Sdg and T/Tdg cancel as adjoint pairs. Two gates qualify when they
/// act on the same ordered operand list and are joined by a direct edge,
/// meaning no other gate sits between them on those wires.
///
/// Rotations are not cancelled here: merging reduces them to a full turn,
/// which identity elimination then drops.
///
/// Each node participates in at most one cancellation per run; the first
/// qualifying successor wins. Run the pass again (or under a fixed-point
/// pipeline) to catch pairs exposed by earlier removals.
pub struct CancellationPass;

impl CancellationPass {
    /// Create a new cancellation pass.
    pub fn new() -> Self {
        Self
    }
}

impl Default for CancellationPass {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for CancellationPass {
    fn name(&self) -> &str {
        "Cancellation"
    }

    fn run(&self, dag: &mut CircuitDag) -> CompileResult<PassStats> {
        let mut stats = PassStats::default();
        let mut to_remove: FxHashSet<NodeId> = FxHashSet::default();

        let order = dag.topological_order()?;
        for &id in &order {
            if to_remove.contains(&id) {
                continue;
            }
            let node = dag.node(id)?;
            for &succ_id in node.successors() {
                if to_remove.contains(&succ_id) {
                    continue;
                }
                let succ = dag.node(succ_id)?;
                if cancels_with(node.gate(), succ.gate()) {
                    to_remove.insert(id);
                    to_remove.insert(succ_id);
                    stats.removed += 2;
                    break;
                }
            }
        }

        // Remove in reverse topological order so reconnection only ever
        // bridges still-present neighbors.
        for &id in order.iter().rev() {
            if to_remove.contains(&id) {
                dag.remove(id)?;
            }
        }

        Ok(stats)
    }
}
