//! # Louhos Common
//!
//! Common types, utilities, and shared abstractions for Louhos.
//!
//! This crate provides foundational types used across all Louhos crates:
//! - World-space vectors and tile-cell snapping
//! - Physics layer masks
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod layers;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::layers::*;
}

pub use prelude::*;
