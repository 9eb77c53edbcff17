//! # Algorithms Module
//!
//! Schedule validation, compatibility checking and rules snapshots.

pub mod compatibility;
pub mod fork_order;
pub mod rules;

pub use compatibility::{
    check_compatible, check_compatible_at, check_compatible_axes, check_compatible_once,
    AxisConflicts,
};
pub use fork_order::{check_config_fork_order, check_height_fork_order, check_timestamp_fork_order};
pub use rules::build_rules;
