//! # Fork Order Validation
//!
//! Checks that a schedule never "skips" a fork: the execution engine cannot
//! run forks in a different order than the official networks did.
//!
//! The two axes are walked independently. Height forks may only activate at
//! genesis; upgrade timestamps may be anything as long as they are ordered.
//! The axes are never compared with each other, since a timestamp and a
//! height are not comparable.

use crate::domain::{ChainConfig, ForkOrderError, ForkPoint, GENESIS_HEIGHT};

/// Validate both fork axes of a schedule.
///
/// Run once whenever a schedule is constructed, not per block.
pub fn check_config_fork_order(config: &ChainConfig) -> Result<(), ForkOrderError> {
    let result = check_height_fork_order(&config.height_forks())
        .and_then(|()| check_timestamp_fork_order(&config.timestamp_forks()));

    if let Err(ref e) = result {
        tracing::warn!(chain_id = ?config.chain_id, "[qc-18] Rejected fork schedule: {}", e);
    }
    result
}

/// Validate height-indexed forks: genesis-only and ordered.
pub fn check_height_fork_order(forks: &[ForkPoint]) -> Result<(), ForkOrderError> {
    check_ordering(forks, true)
}

/// Validate timestamp-indexed upgrades: enabled in order.
pub fn check_timestamp_fork_order(forks: &[ForkPoint]) -> Result<(), ForkOrderError> {
    check_ordering(forks, false)
}

/// Walk forks in canonical order tracking the last fork that must precede
/// the next one. With `genesis_only` each fork is also checked for a
/// non-genesis value before it is compared with its predecessor.
fn check_ordering(forks: &[ForkPoint], genesis_only: bool) -> Result<(), ForkOrderError> {
    let mut last: Option<&ForkPoint> = None;

    for cur in forks {
        if let Some(value) = cur.value.filter(|v| genesis_only && *v != GENESIS_HEIGHT) {
            return Err(ForkOrderError::NonGenesisForkByHeight {
                name: cur.name,
                value,
            });
        }
        if let Some(last) = last {
            match (last.value, cur.value) {
                (None, Some(cur_value)) => {
                    return Err(ForkOrderError::ForkNotEnabled {
                        last: last.name,
                        cur: cur.name,
                        cur_value,
                    });
                }
                (Some(last_value), Some(cur_value)) if last_value > cur_value => {
                    return Err(ForkOrderError::ForkOutOfOrder {
                        last: last.name,
                        last_value,
                        cur: cur.name,
                        cur_value,
                    });
                }
                _ => {}
            }
        }

        // An unset optional fork does not break the chain
        if !cur.optional || cur.value.is_some() {
            last = Some(cur);
        }
    }

    Ok(())
}
