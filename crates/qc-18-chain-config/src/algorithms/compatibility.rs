//! # Configuration Compatibility
//!
//! Detects when blocks already imported under a stored schedule would be
//! processed differently under a new one, and computes how far the local
//! chain must be rewound.
//!
//! A single pass returns the first mismatch in canonical fork order. That is
//! not necessarily the lowest one, so each axis is searched separately,
//! re-running the pass from each rewind target until the answer stops
//! moving. The two axes meet only once a timestamp can be mapped to a block
//! height.

use crate::domain::{
    config_num_equal, is_fork_incompatible, ChainConfig, ConfigCompatError, ForkAxis,
};

/// Lowest conflict found on each fork axis.
///
/// A height and a timestamp cannot be compared directly; use
/// [`AxisConflicts::lowest`] with a timestamp-to-height lookup to pick the
/// conflict that needs the deeper rewind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AxisConflicts {
    /// Lowest conflict among the height-indexed forks.
    pub height: Option<ConfigCompatError>,
    /// Lowest conflict among the upgrade timestamps.
    pub timestamp: Option<ConfigCompatError>,
}

impl AxisConflicts {
    /// Returns true if neither axis conflicts.
    pub fn is_empty(&self) -> bool {
        self.height.is_none() && self.timestamp.is_none()
    }

    /// Resolve both axes to block heights and return the conflict with the
    /// lower rewind height, together with that height. Ties go to the
    /// height axis.
    pub fn lowest<E>(
        self,
        height_at_timestamp: impl FnOnce(u64) -> Result<u64, E>,
    ) -> Result<Option<(ConfigCompatError, u64)>, E> {
        let by_height = self.height.map(|err| {
            let height = err.rewind_to;
            (err, height)
        });
        let by_timestamp = match self.timestamp {
            Some(err) => {
                let height = height_at_timestamp(err.rewind_to)?;
                Some((err, height))
            }
            None => None,
        };

        Ok(match (by_height, by_timestamp) {
            (Some(h), Some(t)) if t.1 < h.1 => Some(t),
            (Some(h), _) => Some(h),
            (None, t) => t,
        })
    }
}

/// Check whether the chain stored under `stored` up to `height` was imported
/// with rules `new` would change. Only height-indexed forks are compared.
pub fn check_compatible(
    stored: &ChainConfig,
    new: &ChainConfig,
    height: u64,
) -> Option<ConfigCompatError> {
    check_compatible_axes(stored, new, height, None).height
}

/// Check compatibility at a head with the given height and, if known,
/// timestamp. A known timestamp also compares the upgrade timestamps.
///
/// Returns the lowest height conflict if there is one, otherwise the lowest
/// upgrade timestamp conflict. Callers that can map timestamps to heights
/// should use [`check_compatible_axes`] and [`AxisConflicts::lowest`].
pub fn check_compatible_at(
    stored: &ChainConfig,
    new: &ChainConfig,
    height: u64,
    timestamp: Option<u64>,
) -> Option<ConfigCompatError> {
    let conflicts = check_compatible_axes(stored, new, height, timestamp);
    conflicts.height.or(conflicts.timestamp)
}

/// Search each axis independently for its lowest conflict.
///
/// Height forks are searched from `height`, upgrade timestamps from
/// `timestamp`; without a timestamp the upgrades are not compared.
pub fn check_compatible_axes(
    stored: &ChainConfig,
    new: &ChainConfig,
    height: u64,
    timestamp: Option<u64>,
) -> AxisConflicts {
    AxisConflicts {
        height: search_lowest(ForkAxis::Height, height, |h| check_height_forks(stored, new, h)),
        timestamp: timestamp.and_then(|ts| {
            search_lowest(ForkAxis::Timestamp, ts, |t| {
                check_upgrade_timestamps(stored, new, Some(t))
            })
        }),
    }
}

/// Re-run `pass` from each rewind target until it finds nothing or the
/// target stops moving.
fn search_lowest(
    axis: ForkAxis,
    start: u64,
    pass: impl Fn(u64) -> Option<ConfigCompatError>,
) -> Option<ConfigCompatError> {
    let mut point = start;
    let mut last_err: Option<ConfigCompatError> = None;

    while let Some(err) = pass(point) {
        if last_err.as_ref().is_some_and(|last| last.rewind_to == err.rewind_to) {
            break;
        }

        tracing::debug!(
            %axis,
            point,
            what = %err.what,
            rewind_to = err.rewind_to,
            "Compatibility mismatch, searching lower"
        );

        point = err.rewind_to;
        last_err = Some(err);
    }

    last_err
}

/// Single compatibility pass at one head. Returns the first mismatch in
/// canonical order, height forks before upgrade timestamps.
pub fn check_compatible_once(
    stored: &ChainConfig,
    new: &ChainConfig,
    height: u64,
    timestamp: Option<u64>,
) -> Option<ConfigCompatError> {
    check_height_forks(stored, new, height)
        .or_else(|| check_upgrade_timestamps(stored, new, timestamp))
}

/// Compare the height-indexed forks at `height`.
fn check_height_forks(
    stored: &ChainConfig,
    new: &ChainConfig,
    height: u64,
) -> Option<ConfigCompatError> {
    let head = Some(height);
    let height_err = |what: &str, s: Option<u64>, n: Option<u64>| {
        Some(ConfigCompatError::new(what, ForkAxis::Height, s, n))
    };

    if is_fork_incompatible(stored.homestead_block, new.homestead_block, head) {
        return height_err("Homestead fork block", stored.homestead_block, new.homestead_block);
    }
    if is_fork_incompatible(stored.dao_fork_block, new.dao_fork_block, head) {
        return height_err("DAO fork block", stored.dao_fork_block, new.dao_fork_block);
    }
    if stored.is_dao_fork(height) && stored.dao_fork_support != new.dao_fork_support {
        return height_err("DAO fork support flag", stored.dao_fork_block, new.dao_fork_block);
    }
    if is_fork_incompatible(stored.eip150_block, new.eip150_block, head) {
        return height_err("EIP150 fork block", stored.eip150_block, new.eip150_block);
    }
    if is_fork_incompatible(stored.eip155_block, new.eip155_block, head) {
        return height_err("EIP155 fork block", stored.eip155_block, new.eip155_block);
    }
    if is_fork_incompatible(stored.eip158_block, new.eip158_block, head) {
        return height_err("EIP158 fork block", stored.eip158_block, new.eip158_block);
    }
    // EIP158 couples the chain ID into transaction signing
    if stored.is_eip158(height) && !config_num_equal(stored.chain_id, new.chain_id) {
        return height_err("EIP158 chain ID", stored.eip158_block, new.eip158_block);
    }
    if is_fork_incompatible(stored.byzantium_block, new.byzantium_block, head) {
        return height_err("Byzantium fork block", stored.byzantium_block, new.byzantium_block);
    }
    if is_fork_incompatible(stored.constantinople_block, new.constantinople_block, head) {
        return height_err(
            "Constantinople fork block",
            stored.constantinople_block,
            new.constantinople_block,
        );
    }
    // Petersburg may be moved onto the stored Constantinople block, since an
    // unset Petersburg always meant "same as Constantinople"
    if is_fork_incompatible(stored.petersburg_block, new.petersburg_block, head)
        && is_fork_incompatible(stored.constantinople_block, new.petersburg_block, head)
    {
        return height_err("Petersburg fork block", stored.petersburg_block, new.petersburg_block);
    }
    if is_fork_incompatible(stored.istanbul_block, new.istanbul_block, head) {
        return height_err("Istanbul fork block", stored.istanbul_block, new.istanbul_block);
    }
    if is_fork_incompatible(stored.muir_glacier_block, new.muir_glacier_block, head) {
        return height_err("Muir Glacier fork block", stored.muir_glacier_block, new.muir_glacier_block);
    }

    None
}

/// Compare the upgrade timestamps against the head block timestamp.
fn check_upgrade_timestamps(
    stored: &ChainConfig,
    new: &ChainConfig,
    timestamp: Option<u64>,
) -> Option<ConfigCompatError> {
    let names = [
        "Apricot Phase 1 fork block timestamp",
        "Apricot Phase 2 fork block timestamp",
        "Apricot Phase 3 fork block timestamp",
        "Apricot Phase 4 fork block timestamp",
    ];

    names
        .into_iter()
        .zip(stored.timestamp_forks().into_iter().zip(new.timestamp_forks()))
        .find(|(_, (s, n))| is_fork_incompatible(s.value, n.value, timestamp))
        .map(|(what, (s, n))| ConfigCompatError::new(what, ForkAxis::Timestamp, s.value, n.value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        FLARE_CHAIN_CONFIG, SONGBIRD_CHAIN_CONFIG, TEST_CHAIN_CONFIG, TEST_LAUNCH_CONFIG,
    };

    #[test]
    fn test_self_compatible() {
        for height in [0, 1, 100, u64::MAX] {
            assert!(check_compatible(&TEST_CHAIN_CONFIG, &TEST_CHAIN_CONFIG, height).is_none());
            assert!(check_compatible_at(&FLARE_CHAIN_CONFIG, &FLARE_CHAIN_CONFIG, height, Some(height)).is_none());
        }
    }

    #[test]
    fn test_homestead_moved_later() {
        let stored = ChainConfig {
            homestead_block: Some(0),
            ..Default::default()
        };
        let new = ChainConfig {
            homestead_block: Some(5),
            ..Default::default()
        };
        let err = check_compatible(&stored, &new, 10).unwrap();
        assert_eq!(err.what, "Homestead fork block");
        assert_eq!(err.rewind_to, 0);
    }

    #[test]
    fn test_homestead_moved_earlier() {
        let stored = ChainConfig {
            homestead_block: Some(10),
            ..Default::default()
        };
        let new = ChainConfig {
            homestead_block: Some(5),
            ..Default::default()
        };
        let err = check_compatible(&stored, &new, 20).unwrap();
        assert_eq!(err.stored_config, Some(10));
        assert_eq!(err.new_config, Some(5));
        assert_eq!(err.rewind_to, 4);
    }

    #[test]
    fn test_unreached_fork_may_move() {
        let stored = ChainConfig {
            istanbul_block: Some(100),
            ..Default::default()
        };
        let new = ChainConfig {
            istanbul_block: Some(200),
            ..Default::default()
        };
        assert!(check_compatible(&stored, &new, 50).is_none());
        assert!(check_compatible(&stored, &new, 150).is_some());
    }

    #[test]
    fn test_chain_id_change_after_eip158() {
        let stored = ChainConfig {
            chain_id: Some(1),
            eip158_block: Some(0),
            ..Default::default()
        };
        let new = ChainConfig {
            chain_id: Some(2),
            ..stored.clone()
        };
        let err = check_compatible(&stored, &new, 100).unwrap();
        assert_eq!(err.what, "EIP158 chain ID");
        assert_eq!(err.rewind_to, 0);
    }

    #[test]
    fn test_chain_id_change_before_eip158() {
        let stored = ChainConfig {
            chain_id: Some(1),
            eip158_block: Some(500),
            ..Default::default()
        };
        let new = ChainConfig {
            chain_id: Some(2),
            ..stored.clone()
        };
        assert!(check_compatible(&stored, &new, 100).is_none());
    }

    #[test]
    fn test_dao_support_flag_flip() {
        let stored = ChainConfig {
            dao_fork_block: Some(0),
            dao_fork_support: true,
            ..Default::default()
        };
        let new = ChainConfig {
            dao_fork_support: false,
            ..stored.clone()
        };
        let err = check_compatible(&stored, &new, 10).unwrap();
        assert_eq!(err.what, "DAO fork support flag");
    }

    #[test]
    fn test_dao_support_flag_ignored_without_dao_fork() {
        let stored = ChainConfig {
            dao_fork_support: true,
            ..Default::default()
        };
        let new = ChainConfig::default();
        assert!(check_compatible(&stored, &new, 10).is_none());
    }

    #[test]
    fn test_petersburg_matches_constantinople() {
        let stored = ChainConfig {
            constantinople_block: Some(0),
            petersburg_block: None,
            ..Default::default()
        };
        let new = ChainConfig {
            constantinople_block: Some(0),
            petersburg_block: Some(0),
            ..Default::default()
        };
        assert!(check_compatible(&stored, &new, 10).is_none());
    }

    #[test]
    fn test_petersburg_mismatch() {
        let stored = ChainConfig {
            constantinople_block: Some(0),
            petersburg_block: Some(0),
            ..Default::default()
        };
        let new = ChainConfig {
            constantinople_block: Some(0),
            petersburg_block: None,
            ..Default::default()
        };
        let err = check_compatible(&stored, &new, 10).unwrap();
        assert_eq!(err.what, "Petersburg fork block");
    }

    #[test]
    fn test_iteration_finds_lowest_conflict() {
        // Homestead is checked first but Istanbul diverges lower
        let stored = ChainConfig {
            homestead_block: Some(30),
            istanbul_block: Some(10),
            ..Default::default()
        };
        let new = ChainConfig {
            homestead_block: Some(31),
            istanbul_block: Some(11),
            ..Default::default()
        };

        let first = check_compatible_once(&stored, &new, 40, None).unwrap();
        assert_eq!(first.what, "Homestead fork block");
        assert_eq!(first.rewind_to, 29);

        let lowest = check_compatible(&stored, &new, 40).unwrap();
        assert_eq!(lowest.what, "Istanbul fork block");
        assert_eq!(lowest.rewind_to, 9);
    }

    #[test]
    fn test_height_check_ignores_upgrades() {
        let new = ChainConfig {
            apricot_phase4_block_timestamp: Some(1),
            ..TEST_CHAIN_CONFIG
        };
        assert!(check_compatible(&TEST_CHAIN_CONFIG, &new, 100).is_none());
    }

    #[test]
    fn test_upgrade_timestamp_moved_after_activation() {
        let stored = FLARE_CHAIN_CONFIG;
        let new = ChainConfig {
            apricot_phase3_block_timestamp: Some(1_000_000_000),
            ..FLARE_CHAIN_CONFIG
        };
        // Head is past both candidate timestamps
        let err = check_compatible_at(&stored, &new, 500, Some(1_500_000_000)).unwrap();
        assert_eq!(err.axis, ForkAxis::Timestamp);
        assert_eq!(err.what, "Apricot Phase 3 fork block timestamp");
        assert_eq!(err.rewind_to, 946_684_799);

        // Before either activation the upgrade may still move
        assert!(check_compatible_at(&stored, &new, 500, Some(900_000_000)).is_none());
    }

    #[test]
    fn test_upgrade_newly_scheduled_in_past() {
        let new = ChainConfig {
            apricot_phase1_block_timestamp: Some(50),
            ..TEST_LAUNCH_CONFIG
        };
        let err = check_compatible_at(&TEST_LAUNCH_CONFIG, &new, 10, Some(100)).unwrap();
        assert_eq!(err.stored_config, None);
        assert_eq!(err.new_config, Some(50));
        assert_eq!(err.rewind_to, 49);
    }

    #[test]
    fn test_height_conflict_survives_timestamp_conflict() {
        let stored = ChainConfig {
            homestead_block: Some(10),
            apricot_phase1_block_timestamp: Some(1_000),
            ..Default::default()
        };
        let new = ChainConfig {
            homestead_block: Some(5),
            apricot_phase1_block_timestamp: Some(2_000),
            ..Default::default()
        };

        let conflicts = check_compatible_axes(&stored, &new, 20, Some(5_000));
        let height = conflicts.height.clone().unwrap();
        assert_eq!(height.what, "Homestead fork block");
        assert_eq!(height.rewind_to, 4);
        let timestamp = conflicts.timestamp.clone().unwrap();
        assert_eq!(timestamp.axis, ForkAxis::Timestamp);
        assert_eq!(timestamp.rewind_to, 999);

        let err = check_compatible_at(&stored, &new, 20, Some(5_000)).unwrap();
        assert_eq!(err, height);

        // Blocks are stamped 100 apart: timestamp 999 maps to height 9
        let lowest = conflicts.clone().lowest(|ts| Ok::<_, ()>(ts / 100)).unwrap();
        assert_eq!(lowest, Some((height, 4)));

        // With sparser blocks the upgrade conflict is the deeper one
        let lowest = conflicts.lowest(|ts| Ok::<_, ()>(ts / 1_000)).unwrap();
        assert_eq!(lowest, Some((timestamp, 0)));
    }

    #[test]
    fn test_axis_conflicts_empty() {
        let conflicts = check_compatible_axes(&FLARE_CHAIN_CONFIG, &FLARE_CHAIN_CONFIG, 10, Some(u64::MAX));
        assert!(conflicts.is_empty());
        assert_eq!(conflicts.lowest(|_| Err("unused")), Ok(None));
    }

    #[test]
    fn test_height_conflict_reported_before_timestamp() {
        let new = ChainConfig {
            chain_id: Some(99),
            apricot_phase1_block_timestamp: Some(5),
            ..SONGBIRD_CHAIN_CONFIG
        };
        let err = check_compatible_at(&SONGBIRD_CHAIN_CONFIG, &new, 10, Some(u64::MAX)).unwrap();
        assert_eq!(err.axis, ForkAxis::Height);
        assert_eq!(err.what, "EIP158 chain ID");
    }
}
