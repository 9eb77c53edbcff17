//! # Domain Value Objects
//!
//! Immutable value types describing single fork activation markers.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::DisplayPoint;
use super::invariants::is_forked;

/// Axis a fork is scheduled on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForkAxis {
    /// Legacy forks, gated on block height.
    Height,
    /// Network upgrades, gated on block timestamp.
    Timestamp,
}

impl fmt::Display for ForkAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Height => f.write_str("height"),
            Self::Timestamp => f.write_str("timestamp"),
        }
    }
}

/// A single optional activation marker.
///
/// `optional` forks may be absent without breaking the ordering of later
/// forks on the same axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForkPoint {
    /// Config field name of the fork (e.g. `homesteadBlock`).
    pub name: &'static str,
    /// Axis the fork is scheduled on.
    pub axis: ForkAxis,
    /// Activation point, `None` if the fork never activates.
    pub value: Option<u64>,
    /// Whether the fork may be skipped.
    pub optional: bool,
}

impl ForkPoint {
    /// Create a mandatory fork point.
    pub const fn new(name: &'static str, axis: ForkAxis, value: Option<u64>) -> Self {
        Self {
            name,
            axis,
            value,
            optional: false,
        }
    }

    /// Create an optional fork point.
    pub const fn optional(name: &'static str, axis: ForkAxis, value: Option<u64>) -> Self {
        Self {
            name,
            axis,
            value,
            optional: true,
        }
    }

    /// Returns true if the fork is scheduled at all.
    pub fn is_scheduled(&self) -> bool {
        self.value.is_some()
    }

    /// Returns true if the fork is active at `reference`.
    pub fn is_active_at(&self, reference: u64) -> bool {
        is_forked(self.value, Some(reference))
    }
}

impl fmt::Display for ForkPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, DisplayPoint(self.value))
    }
}

/// Serde helper for `Option<Hash>` as a `0x`-prefixed hex string.
pub(crate) mod hex_hash {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use crate::domain::errors::Hash;

    pub fn serialize<S: Serializer>(hash: &Option<Hash>, serializer: S) -> Result<S::Ok, S::Error> {
        match hash {
            Some(h) => serializer.serialize_str(&format!("0x{}", hex::encode(h))),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Hash>, D::Error> {
        let Some(s) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let digits = s.strip_prefix("0x").unwrap_or(&s);
        let bytes = hex::decode(digits).map_err(D::Error::custom)?;
        let hash: Hash = bytes
            .try_into()
            .map_err(|b: Vec<u8>| D::Error::custom(format!("expected 32 bytes, got {}", b.len())))?;
        Ok(Some(hash))
    }
}
