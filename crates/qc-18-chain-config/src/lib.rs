//! # QC-18 Chain Config
//!
//! Fork activation rules and chain configuration compatibility.
//!
//! **Subsystem ID:** 18  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)  
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Decide which protocol upgrades are active for a block and whether a
//! replacement schedule can be applied to an existing chain:
//! - Legacy forks activate by block height and must sit at genesis
//! - Apricot upgrades activate by block timestamp, in order
//! - A schedule that would rewrite history reports the point to rewind to
//!
//! ## Fork Axes
//!
//! | Axis | Forks | Constraint |
//! |------|-------|------------|
//! | Height | Homestead .. Muir Glacier | Scheduled at genesis (0) |
//! | Timestamp | Apricot Phase 1-4 | Non-decreasing, no gaps |
//!
//! ## Module Structure
//!
//! ```text
//! qc-18-chain-config/
//! ├── domain/          # ChainConfig, Rules, presets, errors, activation predicate
//! ├── algorithms/      # Fork order, compatibility, rules snapshots
//! ├── ports/           # API traits (inbound) + storage/atomic tx traits (outbound)
//! ├── adapters/        # JSON/TOML loader, in-memory store, disabled atomic tx
//! ├── application/     # ChainConfigService reconciling schedules with storage
//! └── config.rs        # ChainConfigServiceConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{load_chain_config, parse_json, parse_toml, DisabledAtomicTx, InMemoryChainStore};
pub use algorithms::{
    build_rules, check_compatible, check_compatible_at, check_compatible_axes, check_compatible_once,
    check_config_fork_order, check_height_fork_order, check_timestamp_fork_order, AxisConflicts,
};
pub use application::ChainConfigService;
pub use config::ChainConfigServiceConfig;
pub use domain::{
    ChainConfig, ChainConfigError, ConfigCompatError, ForkAxis, ForkOrderError, ForkPoint, Hash,
    Network, Rules,
    config_num_equal, is_fork_incompatible, is_forked, GENESIS_HEIGHT,
    COSTON_CHAIN_CONFIG, FLARE_CHAIN_CONFIG, FLARE_LOCAL_CHAIN_CONFIG, SONGBIRD_CHAIN_CONFIG,
    TEST_APRICOT_PHASE1_CONFIG, TEST_APRICOT_PHASE2_CONFIG, TEST_APRICOT_PHASE3_CONFIG,
    TEST_APRICOT_PHASE4_CONFIG, TEST_CHAIN_CONFIG, TEST_LAUNCH_CONFIG,
};
pub use ports::{
    AssetId, AtomicTxError, AtomicTxHooks, AtomicTxKind, ChainConfigApi, ChainHead, ChainStore,
    SetupOutcome,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
