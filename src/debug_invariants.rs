//! Conservation checks for the Louvain bookkeeping.
//!
//! Every merge of pending community deltas must preserve two totals: the number of vertices
//! spread over all communities and the summed weighted degree. Types holding such aggregates
//! implement [`DebugInvariants`]; the controller calls
//! [`DebugInvariants::debug_assert_invariants`] after each merge, which only does work in debug
//! builds or with the `strict-invariants` / `check-invariants` features.

use crate::partitioning::error::PartitionError;

/// Relative tolerance for conserved floating-point totals.
pub const DEGREE_TOLERANCE: f64 = 1e-9;

/// Aggregates whose totals must survive every pass unchanged.
pub trait DebugInvariants {
    /// Panic on the first violated invariant, when invariant checking is compiled in.
    fn debug_assert_invariants(&self);
    /// Check every invariant and report the first violation.
    fn validate_invariants(&self) -> Result<(), PartitionError>;
}

/// Compare an integer total against the value it must keep.
pub fn ensure_count_conserved(
    quantity: &'static str,
    expected: usize,
    found: usize,
) -> Result<(), PartitionError> {
    if expected == found {
        Ok(())
    } else {
        Err(PartitionError::ConservationViolated {
            quantity,
            expected: expected as f64,
            found: found as f64,
        })
    }
}

/// Compare a weight total against the value it must keep, within [`DEGREE_TOLERANCE`] relative
/// to `max(|expected|, 1)`.
pub fn ensure_weight_conserved(
    quantity: &'static str,
    expected: f64,
    found: f64,
) -> Result<(), PartitionError> {
    let tol = DEGREE_TOLERANCE * expected.abs().max(1.0);
    if (found - expected).abs() <= tol {
        Ok(())
    } else {
        Err(PartitionError::ConservationViolated {
            quantity,
            expected,
            found,
        })
    }
}

/// Panic with `context` when `$expr` yields an error and invariant checking is compiled in.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[louvain invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_must_match_exactly() {
        assert!(ensure_count_conserved("community size", 5, 5).is_ok());
        let err = ensure_count_conserved("community size", 5, 4).unwrap_err();
        assert!(matches!(
            err,
            PartitionError::ConservationViolated { quantity: "community size", .. }
        ));
    }

    #[test]
    fn weights_tolerate_rounding_only() {
        assert!(ensure_weight_conserved("community degree", 1.0e6, 1.0e6 + 1.0e-4).is_ok());
        assert!(ensure_weight_conserved("community degree", 0.0, 1.0e-12).is_ok());
        assert!(ensure_weight_conserved("community degree", 10.0, 10.5).is_err());
    }
}
