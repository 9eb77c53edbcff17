//! # Domain Entities
//!
//! The fork schedule ([`ChainConfig`]) and the per-block capability snapshot
//! derived from it ([`Rules`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{ConfigCompatError, DisplayPoint, ForkOrderError, Hash};
use super::invariants::is_forked;
use super::value_objects::{hex_hash, ForkAxis, ForkPoint};
use crate::algorithms::{check_compatible, check_compatible_at, check_config_fork_order, build_rules};

// =============================================================================
// CHAIN CONFIG
// =============================================================================

/// The core config which determines the blockchain settings.
///
/// A config is stored alongside the chain it produced, so any network,
/// identified by its genesis block, can carry its own schedule. It is
/// read-only once validated.
///
/// Height forks: `None` = no fork, `Some(0)` = active from genesis.
/// Upgrade timestamps: `None` = no fork, `Some(t)` = active for blocks with
/// timestamp `>= t`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    /// Identifies the chain; used for replay protection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,

    /// Homestead switch block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homestead_block: Option<u64>,

    /// TheDAO hard-fork switch block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dao_fork_block: Option<u64>,
    /// Whether the node supports or opposes the DAO hard-fork.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dao_fork_support: bool,

    /// EIP150 (gas price changes) switch block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eip150_block: Option<u64>,
    /// EIP150 fork block hash, for header-only clients.
    #[serde(default, with = "hex_hash", skip_serializing_if = "Option::is_none")]
    pub eip150_hash: Option<Hash>,

    /// EIP155 (replay protection) switch block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eip155_block: Option<u64>,
    /// EIP158 (state clearing) switch block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eip158_block: Option<u64>,

    /// Byzantium switch block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byzantium_block: Option<u64>,
    /// Constantinople switch block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constantinople_block: Option<u64>,
    /// Petersburg switch block (`None` = same as Constantinople).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub petersburg_block: Option<u64>,
    /// Istanbul switch block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub istanbul_block: Option<u64>,
    /// EIP-2384 (bomb delay) switch block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muir_glacier_block: Option<u64>,

    /// Apricot Phase 1 block timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apricot_phase1_block_timestamp: Option<u64>,
    /// Apricot Phase 2 block timestamp. Includes a modified Berlin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apricot_phase2_block_timestamp: Option<u64>,
    /// Apricot Phase 3 block timestamp. Dynamic fees and a modified London.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apricot_phase3_block_timestamp: Option<u64>,
    /// Apricot Phase 4 block timestamp. Adds the block fee to dynamic fees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apricot_phase4_block_timestamp: Option<u64>,
}

impl ChainConfig {
    /// Returns whether `height` is at or past the Homestead block.
    pub fn is_homestead(&self, height: u64) -> bool {
        is_forked(self.homestead_block, Some(height))
    }

    /// Returns whether `height` is at or past the DAO fork block.
    pub fn is_dao_fork(&self, height: u64) -> bool {
        is_forked(self.dao_fork_block, Some(height))
    }

    /// Returns whether `height` is at or past the EIP150 block.
    pub fn is_eip150(&self, height: u64) -> bool {
        is_forked(self.eip150_block, Some(height))
    }

    /// Returns whether `height` is at or past the EIP155 block.
    pub fn is_eip155(&self, height: u64) -> bool {
        is_forked(self.eip155_block, Some(height))
    }

    /// Returns whether `height` is at or past the EIP158 block.
    pub fn is_eip158(&self, height: u64) -> bool {
        is_forked(self.eip158_block, Some(height))
    }

    /// Returns whether `height` is at or past the Byzantium block.
    pub fn is_byzantium(&self, height: u64) -> bool {
        is_forked(self.byzantium_block, Some(height))
    }

    /// Returns whether `height` is at or past the Constantinople block.
    pub fn is_constantinople(&self, height: u64) -> bool {
        is_forked(self.constantinople_block, Some(height))
    }

    /// Returns whether Petersburg is active at `height`.
    ///
    /// Active if the Petersburg block is reached, or if it is unset and
    /// Constantinople is active.
    pub fn is_petersburg(&self, height: u64) -> bool {
        is_forked(self.petersburg_block, Some(height))
            || (self.petersburg_block.is_none() && self.is_constantinople(height))
    }

    /// Returns whether `height` is at or past the Istanbul block.
    pub fn is_istanbul(&self, height: u64) -> bool {
        is_forked(self.istanbul_block, Some(height))
    }

    /// Returns whether `height` is at or past the Muir Glacier block.
    pub fn is_muir_glacier(&self, height: u64) -> bool {
        is_forked(self.muir_glacier_block, Some(height))
    }

    /// Returns whether a block with `timestamp` is past Apricot Phase 1.
    pub fn is_apricot_phase1(&self, timestamp: u64) -> bool {
        is_forked(self.apricot_phase1_block_timestamp, Some(timestamp))
    }

    /// Returns whether a block with `timestamp` is past Apricot Phase 2.
    pub fn is_apricot_phase2(&self, timestamp: u64) -> bool {
        is_forked(self.apricot_phase2_block_timestamp, Some(timestamp))
    }

    /// Returns whether a block with `timestamp` is past Apricot Phase 3.
    pub fn is_apricot_phase3(&self, timestamp: u64) -> bool {
        is_forked(self.apricot_phase3_block_timestamp, Some(timestamp))
    }

    /// Returns whether a block with `timestamp` is past Apricot Phase 4.
    pub fn is_apricot_phase4(&self, timestamp: u64) -> bool {
        is_forked(self.apricot_phase4_block_timestamp, Some(timestamp))
    }

    /// Height-indexed forks in canonical order.
    pub fn height_forks(&self) -> [ForkPoint; 10] {
        use ForkAxis::Height;
        [
            ForkPoint::new("homesteadBlock", Height, self.homestead_block),
            ForkPoint::optional("daoForkBlock", Height, self.dao_fork_block),
            ForkPoint::new("eip150Block", Height, self.eip150_block),
            ForkPoint::new("eip155Block", Height, self.eip155_block),
            ForkPoint::new("eip158Block", Height, self.eip158_block),
            ForkPoint::new("byzantiumBlock", Height, self.byzantium_block),
            ForkPoint::new("constantinopleBlock", Height, self.constantinople_block),
            ForkPoint::new("petersburgBlock", Height, self.petersburg_block),
            ForkPoint::new("istanbulBlock", Height, self.istanbul_block),
            ForkPoint::optional("muirGlacierBlock", Height, self.muir_glacier_block),
        ]
    }

    /// Timestamp-indexed upgrades in canonical order.
    pub fn timestamp_forks(&self) -> [ForkPoint; 4] {
        use ForkAxis::Timestamp;
        [
            ForkPoint::new("apricotPhase1BlockTimestamp", Timestamp, self.apricot_phase1_block_timestamp),
            ForkPoint::new("apricotPhase2BlockTimestamp", Timestamp, self.apricot_phase2_block_timestamp),
            ForkPoint::new("apricotPhase3BlockTimestamp", Timestamp, self.apricot_phase3_block_timestamp),
            ForkPoint::new("apricotPhase4BlockTimestamp", Timestamp, self.apricot_phase4_block_timestamp),
        ]
    }

    /// Checks that no fork is skipped and every fork is scheduled in order.
    pub fn check_config_fork_order(&self) -> Result<(), ForkOrderError> {
        check_config_fork_order(self)
    }

    /// Checks whether the chain stored under `self` up to `height` was built
    /// with rules `new` would change.
    pub fn check_compatible(&self, new: &ChainConfig, height: u64) -> Option<ConfigCompatError> {
        check_compatible(self, new, height)
    }

    /// Like [`ChainConfig::check_compatible`], also comparing the upgrade
    /// timestamps against the head block `timestamp`.
    pub fn check_compatible_at(
        &self,
        new: &ChainConfig,
        height: u64,
        timestamp: u64,
    ) -> Option<ConfigCompatError> {
        check_compatible_at(self, new, height, Some(timestamp))
    }

    /// Builds the rules snapshot for a block at `(height, timestamp)`.
    pub fn rules(&self, height: u64, timestamp: u64) -> Rules {
        build_rules(self, height, timestamp)
    }
}

impl fmt::Display for ChainConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ChainID: {} Homestead: {} DAO: {} DAOSupport: {} EIP150: {} EIP155: {} EIP158: {} \
             Byzantium: {} Constantinople: {} Petersburg: {} Istanbul: {}, Muir Glacier: {}, \
             Apricot Phase 1: {}, Apricot Phase 2: {}, Apricot Phase 3: {}, Apricot Phase 4: {}, \
             Engine: Dummy Consensus Engine}}",
            DisplayPoint(self.chain_id),
            DisplayPoint(self.homestead_block),
            DisplayPoint(self.dao_fork_block),
            self.dao_fork_support,
            DisplayPoint(self.eip150_block),
            DisplayPoint(self.eip155_block),
            DisplayPoint(self.eip158_block),
            DisplayPoint(self.byzantium_block),
            DisplayPoint(self.constantinople_block),
            DisplayPoint(self.petersburg_block),
            DisplayPoint(self.istanbul_block),
            DisplayPoint(self.muir_glacier_block),
            DisplayPoint(self.apricot_phase1_block_timestamp),
            DisplayPoint(self.apricot_phase2_block_timestamp),
            DisplayPoint(self.apricot_phase3_block_timestamp),
            DisplayPoint(self.apricot_phase4_block_timestamp),
        )
    }
}

// =============================================================================
// RULES
// =============================================================================

/// Which forks are active for one block.
///
/// Built fresh for a single `(height, timestamp)` pair and never updated;
/// a block at a different point needs its own snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Rules {
    pub(crate) height: u64,
    pub(crate) timestamp: u64,
    pub(crate) chain_id: u64,

    pub(crate) is_homestead: bool,
    pub(crate) is_dao_fork: bool,
    pub(crate) is_eip150: bool,
    pub(crate) is_eip155: bool,
    pub(crate) is_eip158: bool,
    pub(crate) is_byzantium: bool,
    pub(crate) is_constantinople: bool,
    pub(crate) is_petersburg: bool,
    pub(crate) is_istanbul: bool,
    pub(crate) is_muir_glacier: bool,

    pub(crate) is_apricot_phase1: bool,
    pub(crate) is_apricot_phase2: bool,
    pub(crate) is_apricot_phase3: bool,
    pub(crate) is_apricot_phase4: bool,
}

impl Rules {
    /// Block height this snapshot was built for.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Block timestamp this snapshot was built for.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Chain ID (0 if the schedule has none).
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Homestead active.
    pub fn is_homestead(&self) -> bool {
        self.is_homestead
    }

    /// DAO fork active.
    pub fn is_dao_fork(&self) -> bool {
        self.is_dao_fork
    }

    /// EIP150 active.
    pub fn is_eip150(&self) -> bool {
        self.is_eip150
    }

    /// EIP155 active.
    pub fn is_eip155(&self) -> bool {
        self.is_eip155
    }

    /// EIP158 active.
    pub fn is_eip158(&self) -> bool {
        self.is_eip158
    }

    /// Byzantium active.
    pub fn is_byzantium(&self) -> bool {
        self.is_byzantium
    }

    /// Constantinople active.
    pub fn is_constantinople(&self) -> bool {
        self.is_constantinople
    }

    /// Petersburg active (explicitly, or folded into Constantinople).
    pub fn is_petersburg(&self) -> bool {
        self.is_petersburg
    }

    /// Istanbul active.
    pub fn is_istanbul(&self) -> bool {
        self.is_istanbul
    }

    /// Muir Glacier active.
    pub fn is_muir_glacier(&self) -> bool {
        self.is_muir_glacier
    }

    /// Apricot Phase 1 active.
    pub fn is_apricot_phase1(&self) -> bool {
        self.is_apricot_phase1
    }

    /// Apricot Phase 2 active.
    pub fn is_apricot_phase2(&self) -> bool {
        self.is_apricot_phase2
    }

    /// Apricot Phase 3 active.
    pub fn is_apricot_phase3(&self) -> bool {
        self.is_apricot_phase3
    }

    /// Apricot Phase 4 active.
    pub fn is_apricot_phase4(&self) -> bool {
        self.is_apricot_phase4
    }
}
