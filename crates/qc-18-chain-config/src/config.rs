//! # Chain Config Service Configuration
//!
//! Configuration for the Chain Config service.

use serde::{Deserialize, Serialize};

use crate::domain::Network;

/// Chain config service configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfigServiceConfig {
    /// Network whose preset schedule is used when none is supplied.
    pub network: Network,

    /// Rewind storage automatically when a new schedule rewrites history.
    /// When disabled the mismatch is returned to the caller.
    pub auto_rewind: bool,

    /// Also compare upgrade timestamps against the head block timestamp.
    pub check_upgrade_timestamps: bool,
}

impl Default for ChainConfigServiceConfig {
    fn default() -> Self {
        Self {
            network: Network::Flare,
            auto_rewind: true,
            check_upgrade_timestamps: true,
        }
    }
}

impl ChainConfigServiceConfig {
    /// Create a config for testing (local network, no automatic rewind).
    pub fn for_testing() -> Self {
        Self {
            network: Network::Local,
            auto_rewind: false,
            check_upgrade_timestamps: true,
        }
    }
}
