//! Pass trait and statistics.

use alsvid_ir::CircuitDag;
use serde::{Deserialize, Serialize};

use crate::error::CompileResult;

/// Gate-count deltas reported by one pass execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassStats {
    /// Gates removed from the DAG.
    pub removed: usize,
    /// Gates added to the DAG.
    pub added: usize,
}

impl PassStats {
    /// Net change in gate count; negative means a reduction.
    pub fn net_change(&self) -> isize {
        self.added as isize - self.removed as isize
    }
}

/// An optimization pass over the circuit DAG.
///
/// A pass may rewrite the DAG in any way that preserves circuit
/// equivalence under the gate-algebra rules; it reports how many gates it
/// removed and added. Passes hold no per-run state and can be reused
/// across circuits.
pub trait Pass: Send + Sync {
    /// The stable name of this pass.
    fn name(&self) -> &str;

    /// Run the pass, transforming the DAG in place.
    fn run(&self, dag: &mut CircuitDag) -> CompileResult<PassStats>;
}
