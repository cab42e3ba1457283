//! Removal of rotations that amount to the identity.

use alsvid_ir::CircuitDag;

use crate::error::CompileResult;
use crate::pass::{Pass, PassStats};
use crate::passes::{is_full_turn, DEFAULT_TOLERANCE};

/// Drops rotation gates whose angle is an integer multiple of 2π within a
/// tolerance. Other kinds are never affected.
pub struct IdentityEliminationPass {
    tolerance: f64,
}

impl IdentityEliminationPass {
    /// Create the pass with the default tolerance.
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Override the angle tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl Default for IdentityEliminationPass {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for IdentityEliminationPass {
    fn name(&self) -> &str {
        "IdentityElimination"
    }

    fn run(&self, dag: &mut CircuitDag) -> CompileResult<PassStats> {
        let mut stats = PassStats::default();

        let mut to_remove = Vec::new();
        for id in dag.topological_order()? {
            let gate = dag.node(id)?.gate();
            if let Some(angle) = gate.angle() {
                if is_full_turn(angle, self.tolerance) {
                    to_remove.push(id);
                }
            }
        }

        for id in to_remove {
            dag.remove(id)?;
            stats.removed += 1;
        }

        Ok(stats)
    }
}
