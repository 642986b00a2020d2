//! Opt-in structural checks for the patch and its octant index.
//!
//! Checks always run through [`DebugInvariants::validate_invariants`]; the
//! [`debug_invariants!`](crate::debug_invariants) macro turns a failed check
//! into a panic when invariant checking is compiled in (debug builds or the
//! `check-invariants` / `strict-invariants` features).

use crate::mesh_error::MeshError;

/// Structures whose consistency can be verified after a mutation.
pub trait DebugInvariants {
    /// Validate invariants and return the first violation found.
    fn validate_invariants(&self) -> Result<(), MeshError>;

    /// Panic on a violation when invariant checking is enabled; no-op otherwise.
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self, "debug_assert_invariants");
    }
}

/// Validate `$target` and panic with `$ctx` on error when checks are enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($target:expr, $ctx:literal) => {
        #[cfg(any(
            debug_assertions,
            feature = "strict-invariants",
            feature = "check-invariants"
        ))]
        if let Err(e) = $crate::debug_invariants::DebugInvariants::validate_invariants($target) {
            panic!(concat!("[invariants] ", $ctx, ": {}"), e);
        }
    };
}
