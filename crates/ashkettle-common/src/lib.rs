//! # Ashkettle Common
//!
//! Common types, utilities, and shared abstractions for Ashkettle.
//!
//! This crate provides foundational types used across all Ashkettle
//! subsystems:
//! - ID types (`EntityId`, `ItemId`, `WeaponId`)
//! - Common error types
//! - Math helpers for the combat simulation (built on `glam`)
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod math;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::math::*;
}

pub use prelude::*;
