//! Built-in optimization passes.
//!
//! The passes cooperate: [`CommutationPass`] reorders commuting gates to
//! expose pairs, [`CancellationPass`] removes adjacent inverse pairs,
//! [`RotationMergePass`] fuses same-axis rotations, and
//! [`IdentityEliminationPass`] drops the full-turn rotations that merging
//! leaves behind.

pub mod cancellation;
pub mod commutation;
pub mod identity_elimination;
pub mod rotation_merge;

pub use cancellation::CancellationPass;
pub use commutation::CommutationPass;
pub use identity_elimination::IdentityEliminationPass;
pub use rotation_merge::RotationMergePass;

use alsvid_ir::Gate;
use std::f64::consts::PI;

/// Default tolerance for treating an angle as zero mod 2π.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

const TWO_PI: f64 = 2.0 * PI;

/// Reduce an angle modulo 2π into the half-open interval `(-π, π]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let mut reduced = angle % TWO_PI;
    if reduced > PI {
        reduced -= TWO_PI;
    } else if reduced <= -PI {
        reduced += TWO_PI;
    }
    reduced
}

/// Check whether an angle is an integer multiple of 2π within `tolerance`.
pub(crate) fn is_full_turn(angle: f64, tolerance: f64) -> bool {
    let reduced = angle.abs() % TWO_PI;
    reduced < tolerance || TWO_PI - reduced < tolerance
}

/// Check whether two gates compose to the identity: a self-inverse kind
/// repeated, or an adjoint pair, on identical operand lists.
pub(crate) fn cancels_with(a: &Gate, b: &Gate) -> bool {
    if a.qubits() != b.qubits() {
        return false;
    }
    if a.kind().is_hermitian() {
        return a.kind() == b.kind();
    }
    a.kind().adjoint_of(b.kind())
}

/// Check whether two gates are same-axis rotations on identical operand
/// lists, i.e. candidates for angle merging.
pub(crate) fn merges_with(a: &Gate, b: &Gate) -> bool {
    a.kind().is_rotation() && a.kind().same_kind(b.kind()) && a.qubits() == b.qubits()
}
