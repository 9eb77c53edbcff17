//! # Rules Snapshot Builder
//!
//! Produces the per-block [`Rules`] handed to the execution engine.
//!
//! Legacy forks are evaluated against the block height and network upgrades
//! against the block timestamp. Blocks are produced asynchronously, so only a
//! timestamp can make an upgrade activate at the same moment on every
//! validator.

use crate::domain::{ChainConfig, Rules};

/// Build the rules snapshot for a block at `(height, timestamp)`.
pub fn build_rules(config: &ChainConfig, height: u64, timestamp: u64) -> Rules {
    Rules {
        height,
        timestamp,
        chain_id: config.chain_id.unwrap_or_default(),

        is_homestead: config.is_homestead(height),
        is_dao_fork: config.is_dao_fork(height),
        is_eip150: config.is_eip150(height),
        is_eip155: config.is_eip155(height),
        is_eip158: config.is_eip158(height),
        is_byzantium: config.is_byzantium(height),
        is_constantinople: config.is_constantinople(height),
        is_petersburg: config.is_petersburg(height),
        is_istanbul: config.is_istanbul(height),
        is_muir_glacier: config.is_muir_glacier(height),

        is_apricot_phase1: config.is_apricot_phase1(timestamp),
        is_apricot_phase2: config.is_apricot_phase2(timestamp),
        is_apricot_phase3: config.is_apricot_phase3(timestamp),
        is_apricot_phase4: config.is_apricot_phase4(timestamp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FLARE_CHAIN_CONFIG, TEST_CHAIN_CONFIG, TEST_LAUNCH_CONFIG, Y2000_TIMESTAMP};

    #[test]
    fn test_rules_at_genesis() {
        let rules = build_rules(&TEST_CHAIN_CONFIG, 0, 0);
        assert_eq!(rules.chain_id(), 1);
        assert!(rules.is_apricot_phase1());
        assert!(rules.is_apricot_phase2());
        assert!(rules.is_apricot_phase3());
        assert!(rules.is_apricot_phase4());
        assert!(rules.is_homestead());
        assert!(rules.is_istanbul());
        assert!(rules.is_muir_glacier());
        // DAO fork is unset in the test schedule
        assert!(!rules.is_dao_fork());
    }

    #[test]
    fn test_missing_chain_id_defaults_to_zero() {
        let rules = build_rules(&ChainConfig::default(), 10, 10);
        assert_eq!(rules.chain_id(), 0);
        assert!(!rules.is_homestead());
        assert!(!rules.is_petersburg());
    }

    #[test]
    fn test_axis_split() {
        // Height far past every fork, timestamp before every upgrade
        let rules = build_rules(&FLARE_CHAIN_CONFIG, 1_000_000, Y2000_TIMESTAMP - 1);
        assert!(rules.is_istanbul());
        assert!(!rules.is_apricot_phase1());

        let rules = build_rules(&FLARE_CHAIN_CONFIG, 0, Y2000_TIMESTAMP);
        assert!(rules.is_apricot_phase1());
        assert!(rules.is_apricot_phase3());
        assert!(!rules.is_apricot_phase4());
    }

    #[test]
    fn test_petersburg_derived_from_constantinople() {
        let config = ChainConfig {
            petersburg_block: None,
            ..TEST_LAUNCH_CONFIG
        };
        let rules = build_rules(&config, 0, 0);
        assert!(rules.is_constantinople());
        assert!(rules.is_petersburg());
    }

    #[test]
    fn test_snapshot_records_reference_point() {
        let rules = TEST_LAUNCH_CONFIG.rules(42, 1_700_000_000);
        assert_eq!(rules.height(), 42);
        assert_eq!(rules.timestamp(), 1_700_000_000);
        assert!(!rules.is_apricot_phase1());
    }
}
