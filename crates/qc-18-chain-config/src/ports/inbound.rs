//! # Inbound Ports
//!
//! API trait defining what the chain config subsystem offers to the node.

use crate::domain::{ChainConfig, ChainConfigError, ConfigCompatError, ForkOrderError, Rules};

/// Outcome of applying a new schedule to the local chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetupOutcome {
    /// No schedule was stored; the new one was written.
    Initialized,
    /// The stored schedule equals the new one.
    Unchanged,
    /// The new schedule is compatible with the local chain and was written.
    Updated,
    /// The local chain was rewound before the new schedule was written.
    Rewound {
        /// Mismatch that forced the rewind.
        cause: ConfigCompatError,
        /// Height the chain was rewound to.
        height: u64,
    },
}

/// Chain config API - inbound port.
pub trait ChainConfigApi: Send + Sync {
    /// Validate the fork order of a candidate schedule.
    fn validate(&self, config: &ChainConfig) -> Result<(), ForkOrderError>;

    /// Compare the active schedule with `new` at the current head.
    fn check_compatible(&self, new: &ChainConfig) -> Result<Option<ConfigCompatError>, ChainConfigError>;

    /// Rules snapshot for a block under the active schedule.
    fn rules_at(&self, height: u64, timestamp: u64) -> Rules;

    /// Validate `new`, reconcile it with storage and make it active.
    fn setup(&mut self, new: ChainConfig) -> Result<SetupOutcome, ChainConfigError>;

    /// Currently active schedule.
    fn active_config(&self) -> &ChainConfig;
}
