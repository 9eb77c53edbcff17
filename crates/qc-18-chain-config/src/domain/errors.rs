//! # Domain Errors
//!
//! Error types for fork scheduling and configuration compatibility.
//!
//! Two kinds matter to callers:
//! - [`ForkOrderError`] is fatal: the schedule must not be activated.
//! - [`ConfigCompatError`] is actionable: storage must rewind before the
//!   new schedule can be applied.

use std::fmt;

use thiserror::Error;

use super::value_objects::ForkAxis;

/// Hash type alias (32-byte block hash)
pub type Hash = [u8; 32];

/// Schedule ordering/domain error raised by the fork order validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForkOrderError {
    /// A height-indexed fork is scheduled somewhere other than genesis.
    #[error("only forking by height at the genesis block is supported: {name} enabled at {value}")]
    NonGenesisForkByHeight {
        /// Fork field name
        name: &'static str,
        /// Offending activation height
        value: u64,
    },

    /// A fork is enabled while an earlier mandatory fork is not.
    #[error("unsupported fork ordering: {last} not enabled, but {cur} enabled at {cur_value}")]
    ForkNotEnabled {
        /// Earlier fork that is missing
        last: &'static str,
        /// Later fork that is enabled
        cur: &'static str,
        /// Activation point of the later fork
        cur_value: u64,
    },

    /// A fork activates before an earlier fork in canonical order.
    #[error("unsupported fork ordering: {last} enabled at {last_value}, but {cur} enabled at {cur_value}")]
    ForkOutOfOrder {
        /// Earlier fork
        last: &'static str,
        /// Activation point of the earlier fork
        last_value: u64,
        /// Later fork
        cur: &'static str,
        /// Activation point of the later fork
        cur_value: u64,
    },
}

/// Raised when the locally stored chain was built with a schedule that the
/// new schedule would rewrite.
///
/// `rewind_to` is a block height for [`ForkAxis::Height`] mismatches and a
/// block timestamp for [`ForkAxis::Timestamp`] mismatches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigCompatError {
    /// Human readable name of the diverging rule
    pub what: String,
    /// Axis the diverging rule is scheduled on
    pub axis: ForkAxis,
    /// Activation point in the stored schedule
    pub stored_config: Option<u64>,
    /// Activation point in the new schedule
    pub new_config: Option<u64>,
    /// Point the local chain must be rewound to
    pub rewind_to: u64,
}

impl ConfigCompatError {
    /// Build a mismatch error and compute its rewind target.
    ///
    /// The rewind target is one before the lower of the two activation
    /// points, where an absent point never wins. A target of genesis stays at
    /// genesis.
    pub fn new(
        what: impl Into<String>,
        axis: ForkAxis,
        stored: Option<u64>,
        new: Option<u64>,
    ) -> Self {
        let rewind = match (stored, new) {
            (None, new) => new,
            (Some(s), Some(n)) if n <= s => Some(n),
            (Some(s), _) => Some(s),
        };
        Self {
            what: what.into(),
            axis,
            stored_config: stored,
            new_config: new,
            rewind_to: rewind.map_or(0, |r| r.saturating_sub(1)),
        }
    }

    /// Returns true when the rewind target is a block height.
    pub fn is_height_rewind(&self) -> bool {
        self.axis == ForkAxis::Height
    }
}

impl fmt::Display for ConfigCompatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mismatching {} in database (have {}, want {}, rewindto {})",
            self.what,
            DisplayPoint(self.stored_config),
            DisplayPoint(self.new_config),
            self.rewind_to
        )
    }
}

impl std::error::Error for ConfigCompatError {}

/// Top-level error for loading and applying a chain configuration.
#[derive(Debug, Error)]
pub enum ChainConfigError {
    /// Fork schedule rejected by the order validator.
    #[error("invalid fork schedule: {0}")]
    InvalidSchedule(#[from] ForkOrderError),

    /// Stored chain is incompatible and rewinding is disabled.
    #[error("incompatible chain configuration: {0}")]
    Incompatible(#[from] ConfigCompatError),

    /// Configuration document could not be parsed.
    #[error("Failed to parse chain config: {0}")]
    Parse(String),

    /// Configuration document could not be read.
    #[error("Failed to read {path}: {error}")]
    Io {
        /// Path that failed
        path: String,
        /// Underlying error text
        error: String,
    },

    /// Unknown network name or chain id.
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    /// Chain storage failure.
    #[error("Chain store error: {0}")]
    Store(String),
}

/// Renders an optional activation point the way stored configs print it.
pub(crate) struct DisplayPoint(pub Option<u64>);

impl fmt::Display for DisplayPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("nil"),
        }
    }
}
