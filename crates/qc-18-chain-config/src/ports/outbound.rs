//! # Outbound Ports
//!
//! Traits for the collaborators this subsystem drives but does not own:
//! chain storage and the atomic (cross-chain) transaction hooks.

use thiserror::Error;

use crate::domain::{ChainConfig, ChainConfigError, Rules};

/// Asset identifier (32 bytes).
pub type AssetId = [u8; 32];

/// Head of the locally stored chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChainHead {
    /// Height of the head block.
    pub height: u64,
    /// Timestamp of the head block.
    pub timestamp: u64,
}

/// Chain storage - outbound port.
///
/// A non-`None` compatibility result obliges storage to truncate to the
/// reported point before blocks are reprocessed under the new schedule.
pub trait ChainStore: Send + Sync {
    /// Schedule the local chain was built with, if any.
    fn stored_config(&self) -> Result<Option<ChainConfig>, ChainConfigError>;

    /// Current head of the local chain.
    fn head(&self) -> Result<ChainHead, ChainConfigError>;

    /// Persist the schedule.
    fn write_config(&self, config: &ChainConfig) -> Result<(), ChainConfigError>;

    /// Truncate the chain so that `height` becomes the head.
    fn rewind_to(&self, height: u64) -> Result<(), ChainConfigError>;

    /// Height of the last stored block with timestamp `<= timestamp`.
    fn height_at_timestamp(&self, timestamp: u64) -> Result<u64, ChainConfigError>;
}

/// Kind of atomic transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AtomicTxKind {
    /// Funds imported from another chain.
    Import,
    /// Funds exported to another chain.
    Export,
}

impl AtomicTxKind {
    /// Name used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Import => "importTx",
            Self::Export => "exportTx",
        }
    }
}

/// Atomic transaction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtomicTxError {
    /// The transaction names the wrong chain.
    #[error("tx has wrong chain ID")]
    WrongChainId,

    /// The transaction type is switched off on this network.
    #[error("{} transactions disabled", .0.as_str())]
    Disabled(AtomicTxKind),

    /// The state transfer would overdraw an account.
    #[error("insufficient funds")]
    InsufficientFunds,
}

/// Atomic transaction hooks - outbound port.
///
/// Any activation-dependent branch inside these hooks must read it from
/// the [`Rules`] snapshot passed in.
pub trait AtomicTxHooks: Send + Sync {
    /// Check the transaction is well formed.
    fn verify(&self, rules: &Rules) -> Result<(), AtomicTxError>;

    /// Gas consumed by the transaction.
    fn gas_used(&self) -> Result<u64, AtomicTxError>;

    /// Amount of `asset` burned by the transaction.
    fn burned(&self, asset: &AssetId) -> Result<u64, AtomicTxError>;

    /// Check the transaction against chain state.
    fn semantic_verify(&self, rules: &Rules, base_fee: Option<u64>) -> Result<(), AtomicTxError>;

    /// Accept the transaction.
    fn accept(&self) -> Result<(), AtomicTxError>;

    /// Apply the transfer to EVM state.
    fn evm_state_transfer(&self) -> Result<(), AtomicTxError>;
}
