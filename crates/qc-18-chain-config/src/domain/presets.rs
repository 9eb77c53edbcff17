//! # Network Presets
//!
//! Fixed fork schedules for the known networks. These are plain constants;
//! nothing may alter a preset at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::entities::ChainConfig;
use super::errors::{ChainConfigError, Hash};

/// Flare mainnet chain ID.
pub const FLARE_CHAIN_ID: u64 = 14;
/// Songbird canary network chain ID.
pub const SONGBIRD_CHAIN_ID: u64 = 19;
/// Coston test network chain ID.
pub const COSTON_CHAIN_ID: u64 = 16;
/// Local network chain ID, the largest value allowed by EIP-2294.
pub const LOCAL_CHAIN_ID: u64 = 9_223_372_036_854_775_771;

/// 2000-01-01T00:00:00Z
pub const Y2000_TIMESTAMP: u64 = 946_684_800;
/// 2100-01-01T00:00:00Z
pub const Y2100_TIMESTAMP: u64 = 4_102_444_800;

/// EIP150 fork block hash shared by the public networks.
pub const EIP150_HASH: Hash = [
    0x20, 0x86, 0x79, 0x9a, 0xee, 0xbe, 0xae, 0x13, 0x5c, 0x24, 0x6c, 0x65, 0x02, 0x1c, 0x82, 0xb4,
    0xe1, 0x5a, 0x2c, 0x45, 0x13, 0x40, 0x99, 0x3a, 0xac, 0xfd, 0x27, 0x51, 0x88, 0x65, 0x14, 0xf0,
];

const fn public_network(chain_id: u64) -> ChainConfig {
    ChainConfig {
        chain_id: Some(chain_id),
        homestead_block: Some(0),
        dao_fork_block: Some(0),
        dao_fork_support: true,
        eip150_block: Some(0),
        eip150_hash: Some(EIP150_HASH),
        eip155_block: Some(0),
        eip158_block: Some(0),
        byzantium_block: Some(0),
        constantinople_block: Some(0),
        petersburg_block: Some(0),
        istanbul_block: Some(0),
        muir_glacier_block: Some(0),
        apricot_phase1_block_timestamp: Some(Y2000_TIMESTAMP),
        apricot_phase2_block_timestamp: Some(Y2000_TIMESTAMP),
        apricot_phase3_block_timestamp: Some(Y2000_TIMESTAMP),
        apricot_phase4_block_timestamp: Some(Y2100_TIMESTAMP),
    }
}

/// Flare mainnet schedule.
pub const FLARE_CHAIN_CONFIG: ChainConfig = public_network(FLARE_CHAIN_ID);

/// Songbird canary network schedule.
pub const SONGBIRD_CHAIN_CONFIG: ChainConfig = public_network(SONGBIRD_CHAIN_ID);

/// Coston test network schedule.
pub const COSTON_CHAIN_CONFIG: ChainConfig = public_network(COSTON_CHAIN_ID);

/// Local network schedule: every upgrade active from genesis.
pub const FLARE_LOCAL_CHAIN_CONFIG: ChainConfig = ChainConfig {
    chain_id: Some(LOCAL_CHAIN_ID),
    apricot_phase1_block_timestamp: Some(0),
    apricot_phase2_block_timestamp: Some(0),
    apricot_phase3_block_timestamp: Some(0),
    apricot_phase4_block_timestamp: Some(0),
    ..public_network(LOCAL_CHAIN_ID)
};

/// Test schedule with every fork at genesis except the DAO fork.
pub const TEST_CHAIN_CONFIG: ChainConfig = ChainConfig {
    chain_id: Some(1),
    homestead_block: Some(0),
    dao_fork_block: None,
    dao_fork_support: false,
    eip150_block: Some(0),
    eip150_hash: None,
    eip155_block: Some(0),
    eip158_block: Some(0),
    byzantium_block: Some(0),
    constantinople_block: Some(0),
    petersburg_block: Some(0),
    istanbul_block: Some(0),
    muir_glacier_block: Some(0),
    apricot_phase1_block_timestamp: Some(0),
    apricot_phase2_block_timestamp: Some(0),
    apricot_phase3_block_timestamp: Some(0),
    apricot_phase4_block_timestamp: Some(0),
};

/// Test schedule without any Apricot phase.
pub const TEST_LAUNCH_CONFIG: ChainConfig = ChainConfig {
    apricot_phase1_block_timestamp: None,
    apricot_phase2_block_timestamp: None,
    apricot_phase3_block_timestamp: None,
    apricot_phase4_block_timestamp: None,
    ..TEST_CHAIN_CONFIG
};

/// Test schedule up to Apricot Phase 1.
pub const TEST_APRICOT_PHASE1_CONFIG: ChainConfig = ChainConfig {
    apricot_phase1_block_timestamp: Some(0),
    ..TEST_LAUNCH_CONFIG
};

/// Test schedule up to Apricot Phase 2.
pub const TEST_APRICOT_PHASE2_CONFIG: ChainConfig = ChainConfig {
    apricot_phase2_block_timestamp: Some(0),
    ..TEST_APRICOT_PHASE1_CONFIG
};

/// Test schedule up to Apricot Phase 3.
pub const TEST_APRICOT_PHASE3_CONFIG: ChainConfig = ChainConfig {
    apricot_phase3_block_timestamp: Some(0),
    ..TEST_APRICOT_PHASE2_CONFIG
};

/// Test schedule up to Apricot Phase 4.
pub const TEST_APRICOT_PHASE4_CONFIG: ChainConfig = ChainConfig {
    apricot_phase4_block_timestamp: Some(0),
    ..TEST_APRICOT_PHASE3_CONFIG
};

/// Known networks with a preset schedule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Flare mainnet.
    #[default]
    Flare,
    /// Songbird canary network.
    Songbird,
    /// Coston test network.
    Coston,
    /// Local development network.
    Local,
}

impl Network {
    /// All known networks.
    pub const ALL: [Network; 4] = [Self::Flare, Self::Songbird, Self::Coston, Self::Local];

    /// Preset schedule for this network.
    pub fn chain_config(self) -> ChainConfig {
        match self {
            Self::Flare => FLARE_CHAIN_CONFIG,
            Self::Songbird => SONGBIRD_CHAIN_CONFIG,
            Self::Coston => COSTON_CHAIN_CONFIG,
            Self::Local => FLARE_LOCAL_CHAIN_CONFIG,
        }
    }

    /// Chain ID of this network.
    pub fn chain_id(self) -> u64 {
        match self {
            Self::Flare => FLARE_CHAIN_ID,
            Self::Songbird => SONGBIRD_CHAIN_ID,
            Self::Coston => COSTON_CHAIN_ID,
            Self::Local => LOCAL_CHAIN_ID,
        }
    }

    /// Look up a network by chain ID.
    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.chain_id() == chain_id)
    }

    /// Lowercase network name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flare => "flare",
            Self::Songbird => "songbird",
            Self::Coston => "coston",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ChainConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|n| n.as_str() == lower)
            .ok_or_else(|| ChainConfigError::UnknownNetwork(s.to_string()))
    }
}
