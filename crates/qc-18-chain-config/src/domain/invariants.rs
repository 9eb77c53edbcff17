//! # Domain Invariants
//!
//! The activation predicate and the comparisons built on it. Every "is fork X
//! active" question in this crate is answered here and nowhere else.

/// The only height at which legacy forks may be scheduled.
pub const GENESIS_HEIGHT: u64 = 0;

/// Returns whether a fork scheduled at `fork` is active at `head`.
///
/// An absent fork or an unknown reference point is never active.
pub fn is_forked(fork: Option<u64>, head: Option<u64>) -> bool {
    match (fork, head) {
        (Some(fork), Some(head)) => fork <= head,
        _ => false,
    }
}

/// Compares two activation points; two absent points are equal.
pub fn config_num_equal(x: Option<u64>, y: Option<u64>) -> bool {
    x == y
}

/// Returns true if a fork scheduled at `stored` cannot be rescheduled to
/// `new` because `head` is already past one of them.
///
/// A fork neither schedule has reached yet is never incompatible.
pub fn is_fork_incompatible(stored: Option<u64>, new: Option<u64>, head: Option<u64>) -> bool {
    (is_forked(stored, head) || is_forked(new, head)) && !config_num_equal(stored, new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_forked_absent() {
        assert!(!is_forked(None, Some(10)));
        assert!(!is_forked(Some(0), None));
        assert!(!is_forked(None, None));
    }

    #[test]
    fn test_is_forked_boundary() {
        assert!(is_forked(Some(5), Some(5)));
        assert!(is_forked(Some(5), Some(6)));
        assert!(!is_forked(Some(5), Some(4)));
        assert!(is_forked(Some(GENESIS_HEIGHT), Some(0)));
    }

    #[test]
    fn test_config_num_equal() {
        assert!(config_num_equal(None, None));
        assert!(!config_num_equal(None, Some(0)));
        assert!(!config_num_equal(Some(0), None));
        assert!(config_num_equal(Some(3), Some(3)));
    }

    #[test]
    fn test_fork_incompatible_only_once_reached() {
        // Rescheduling a fork neither side has reached is fine
        assert!(!is_fork_incompatible(Some(100), Some(200), Some(50)));
        // Stored side already active
        assert!(is_fork_incompatible(Some(10), Some(200), Some(50)));
        // New side already active
        assert!(is_fork_incompatible(None, Some(20), Some(50)));
        // Equal schedules never conflict
        assert!(!is_fork_incompatible(Some(10), Some(10), Some(50)));
        // Unknown head reaches nothing
        assert!(!is_fork_incompatible(Some(0), Some(1), None));
    }
}
