//! In-Memory Chain Store Adapter
//!
//! Implements `ChainStore` over a list of block timestamps.
//! In production, this is backed by block storage.

use parking_lot::RwLock;
use tracing::debug;

use crate::domain::{ChainConfig, ChainConfigError};
use crate::ports::outbound::{ChainHead, ChainStore};

/// In-memory chain store for testing and tooling.
///
/// Block `i` has timestamp `timestamps[i]`; index 0 is genesis.
pub struct InMemoryChainStore {
    config: RwLock<Option<ChainConfig>>,
    timestamps: RwLock<Vec<u64>>,
}

impl InMemoryChainStore {
    /// Create a store holding only a genesis block at `genesis_timestamp`.
    pub fn new(genesis_timestamp: u64) -> Self {
        Self {
            config: RwLock::new(None),
            timestamps: RwLock::new(vec![genesis_timestamp]),
        }
    }

    /// Create a store with `stored` already written.
    pub fn with_config(stored: ChainConfig, genesis_timestamp: u64) -> Self {
        let store = Self::new(genesis_timestamp);
        *store.config.write() = Some(stored);
        store
    }

    /// Append `count` blocks spaced `interval` seconds apart.
    pub fn extend(&self, count: u64, interval: u64) {
        let mut timestamps = self.timestamps.write();
        for _ in 0..count {
            let next = timestamps.last().copied().unwrap_or_default().saturating_add(interval);
            timestamps.push(next);
        }
    }

    /// Number of stored blocks including genesis.
    pub fn len(&self) -> usize {
        self.timestamps.read().len()
    }

    /// Returns true if the store holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.timestamps.read().is_empty()
    }
}

impl Default for InMemoryChainStore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ChainStore for InMemoryChainStore {
    fn stored_config(&self) -> Result<Option<ChainConfig>, ChainConfigError> {
        Ok(self.config.read().clone())
    }

    fn head(&self) -> Result<ChainHead, ChainConfigError> {
        let timestamps = self.timestamps.read();
        let timestamp = timestamps
            .last()
            .copied()
            .ok_or_else(|| ChainConfigError::Store("no genesis block".to_string()))?;
        Ok(ChainHead {
            height: (timestamps.len() - 1) as u64,
            timestamp,
        })
    }

    fn write_config(&self, config: &ChainConfig) -> Result<(), ChainConfigError> {
        *self.config.write() = Some(config.clone());
        Ok(())
    }

    fn rewind_to(&self, height: u64) -> Result<(), ChainConfigError> {
        let mut timestamps = self.timestamps.write();
        let keep = usize::try_from(height)
            .map_err(|_| ChainConfigError::Store(format!("height {height} out of range")))?
            .saturating_add(1);
        if keep < timestamps.len() {
            debug!("[qc-18] Truncating {} blocks", timestamps.len() - keep);
            timestamps.truncate(keep);
        }
        Ok(())
    }

    fn height_at_timestamp(&self, timestamp: u64) -> Result<u64, ChainConfigError> {
        let timestamps = self.timestamps.read();
        // Timestamps are non-decreasing
        let count = timestamps.partition_point(|t| *t <= timestamp);
        Ok(count.saturating_sub(1) as u64)
    }
}
