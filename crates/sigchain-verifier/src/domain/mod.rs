//! # Domain Module
//!
//! Core types: identifiers, link records, bodies, chain state and errors.

pub mod body;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod state;
pub mod value_objects;

pub use body::*;
pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use state::*;
pub use value_objects::*;
