//! Chain Config Document Loader
//!
//! Reads a persisted or hand-written schedule. Absent fields stay absent:
//! a missing `istanbulBlock` means Istanbul never activates, not that it
//! activates at genesis.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "chainId": 14,
//!   "homesteadBlock": 0,
//!   "eip150Block": 0,
//!   "apricotPhase1BlockTimestamp": 946684800
//! }
//! ```
//!
//! # TOML Format
//!
//! ```toml
//! chainId = 14
//! homesteadBlock = 0
//! eip150Block = 0
//! apricotPhase1BlockTimestamp = 946684800
//! ```

use std::fs;
use std::path::Path;

use crate::domain::{ChainConfig, ChainConfigError};

/// Parse a schedule from a JSON document.
pub fn parse_json(content: &str) -> Result<ChainConfig, ChainConfigError> {
    serde_json::from_str(content).map_err(|e| ChainConfigError::Parse(e.to_string()))
}

/// Parse a schedule from a TOML document.
pub fn parse_toml(content: &str) -> Result<ChainConfig, ChainConfigError> {
    toml::from_str(content).map_err(|e| ChainConfigError::Parse(e.to_string()))
}

/// Load a schedule from a file; `.toml` files are read as TOML, anything
/// else as JSON.
///
/// The schedule is also checked for fork order, so a loaded config is
/// always safe to activate.
pub fn load_chain_config<P: AsRef<Path>>(path: P) -> Result<ChainConfig, ChainConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| ChainConfigError::Io {
        path: path.display().to_string(),
        error: e.to_string(),
    })?;

    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => parse_toml(&content)?,
        _ => parse_json(&content)?,
    };
    config.check_config_fork_order()?;

    tracing::info!("[qc-18] Loaded chain config from {}: {}", path.display(), config);
    Ok(config)
}
