//! Compilation options and pipeline assembly.

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult};
use crate::manager::PassManager;
use crate::passes::{
    CancellationPass, CommutationPass, IdentityEliminationPass, RotationMergePass,
    DEFAULT_TOLERANCE,
};

/// Default bound on outer fixed-point sweeps of the rewrite pipeline.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// The recognized pass names, in the default pipeline order.
pub const KNOWN_PASSES: [&str; 4] = [
    "Commutation",
    "Cancellation",
    "RotationMerge",
    "IdentityElimination",
];

/// Tunable knobs for optimization and routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Ordered pass names to run, from [`KNOWN_PASSES`].
    pub pass_pipeline: Vec<String>,
    /// Bound on outer fixed-point sweeps across the rewrite passes.
    pub max_iterations: usize,
    /// Tolerance for treating an angle as zero mod 2π.
    pub identity_tol: f64,
    /// Size bound on the router's lookahead set.
    pub lookahead: usize,
    /// Weight of the lookahead term in the router's SWAP score.
    pub extended_set_weight: f64,
    /// Decay factor applied uniformly to lookahead contributions.
    pub decay: f64,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pass_pipeline: KNOWN_PASSES.iter().map(|s| s.to_string()).collect(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            identity_tol: DEFAULT_TOLERANCE,
            lookahead: 20,
            extended_set_weight: 0.5,
            decay: 0.5,
        }
    }
}

/// Builds a [`PassManager`] from a pass-name pipeline.
///
/// ```rust
/// use alsvid_compile::PassManagerBuilder;
///
/// let pm = PassManagerBuilder::new()
///     .with_pipeline(["Cancellation", "RotationMerge"])
///     .build()
///     .unwrap();
/// assert_eq!(pm.len(), 2);
/// ```
pub struct PassManagerBuilder {
    options: CompileOptions,
}

impl PassManagerBuilder {
    /// Start from the default options.
    pub fn new() -> Self {
        Self {
            options: CompileOptions::default(),
        }
    }

    /// Replace the whole option set.
    #[must_use]
    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the pass pipeline.
    #[must_use]
    pub fn with_pipeline<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.pass_pipeline = names.into_iter().map(Into::into).collect();
        self
    }

    /// Override the identity-elimination tolerance.
    #[must_use]
    pub fn with_identity_tolerance(mut self, tolerance: f64) -> Self {
        self.options.identity_tol = tolerance;
        self
    }

    /// Assemble the pipeline. Fails on a name outside [`KNOWN_PASSES`].
    pub fn build(self) -> CompileResult<PassManager> {
        let mut pm = PassManager::new();
        for name in &self.options.pass_pipeline {
            match name.as_str() {
                "Commutation" => pm.add_pass(CommutationPass::new()),
                "Cancellation" => pm.add_pass(CancellationPass::new()),
                "RotationMerge" => pm.add_pass(RotationMergePass::new()),
                "IdentityElimination" => pm.add_pass(
                    IdentityEliminationPass::new().with_tolerance(self.options.identity_tol),
                ),
                unknown => return Err(CompileError::UnknownPass(unknown.to_string())),
            }
        }
        Ok(pm)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = CompileOptions::default();
        assert_eq!(options.pass_pipeline.len(), 4);
        assert_eq!(options.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert_eq!(options.lookahead, 20);
        assert_eq!(options.extended_set_weight, 0.5);
        assert_eq!(options.decay, 0.5);
    }

    #[test]
    fn test_default_pipeline_builds() {
        let pm = PassManagerBuilder::new().build().unwrap();
        assert_eq!(pm.len(), KNOWN_PASSES.len());
    }

    #[test]
    fn test_unknown_pass_rejected() {
        let err = PassManagerBuilder::new()
            .with_pipeline(["Cancellation", "FuseEverything"])
            .build()
            .unwrap_err();
        assert_eq!(err, CompileError::UnknownPass("FuseEverything".to_string()));
    }

    #[test]
    fn test_custom_pipeline_order() {
        let pm = PassManagerBuilder::new()
            .with_pipeline(["IdentityElimination", "Cancellation"])
            .build()
            .unwrap();
        assert_eq!(pm.len(), 2);
    }
}
