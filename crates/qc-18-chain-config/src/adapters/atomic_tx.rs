//! Disabled Atomic Transaction Adapter
//!
//! Implements `AtomicTxHooks` for networks where cross-chain import and
//! export transactions are switched off. Every hook rejects.

use crate::domain::Rules;
use crate::ports::outbound::{AssetId, AtomicTxError, AtomicTxHooks, AtomicTxKind};

/// Atomic transaction that is rejected at every stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisabledAtomicTx {
    kind: AtomicTxKind,
}

impl DisabledAtomicTx {
    /// Disabled import transaction.
    pub fn import() -> Self {
        Self {
            kind: AtomicTxKind::Import,
        }
    }

    /// Disabled export transaction.
    pub fn export() -> Self {
        Self {
            kind: AtomicTxKind::Export,
        }
    }

    /// Kind of transaction this hook handles.
    pub fn kind(&self) -> AtomicTxKind {
        self.kind
    }
}

impl AtomicTxHooks for DisabledAtomicTx {
    fn verify(&self, _rules: &Rules) -> Result<(), AtomicTxError> {
        Err(AtomicTxError::WrongChainId)
    }

    fn gas_used(&self) -> Result<u64, AtomicTxError> {
        Err(AtomicTxError::Disabled(self.kind))
    }

    fn burned(&self, _asset: &AssetId) -> Result<u64, AtomicTxError> {
        Err(AtomicTxError::Disabled(self.kind))
    }

    fn semantic_verify(&self, _rules: &Rules, _base_fee: Option<u64>) -> Result<(), AtomicTxError> {
        Err(AtomicTxError::Disabled(self.kind))
    }

    fn accept(&self) -> Result<(), AtomicTxError> {
        Err(AtomicTxError::Disabled(self.kind))
    }

    fn evm_state_transfer(&self) -> Result<(), AtomicTxError> {
        Err(AtomicTxError::InsufficientFunds)
    }
}
