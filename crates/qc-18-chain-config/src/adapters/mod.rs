//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits and loads schedule documents.

mod atomic_tx;
pub mod document;
mod memory_store;

pub use atomic_tx::DisabledAtomicTx;
pub use document::{load_chain_config, parse_json, parse_toml};
pub use memory_store::InMemoryChainStore;
