//! # Domain Module
//!
//! Core domain types for fork scheduling: the schedule, the rules snapshot,
//! the activation predicate and the network presets.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod presets;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use presets::*;
pub use value_objects::*;
