//! # Ashkettle Gameplay
//!
//! Combat simulation systems for Ashkettle.
//!
//! This crate provides the engine-agnostic gameplay layer:
//! - Enemy archetypes (melee chasers, bombers, the boss) and shared enemy
//!   state
//! - Ballistic throw solving and landing prediction
//! - Bomb projectiles with impact indicators
//! - Timed spawn waves scaled by completed cycles
//! - Task timers for windups, cooldowns and repeating effects
//! - Player state, kill quotas and cycle scaling
//! - Economy (wallet, shop stock, item effects)
//! - Weapon definitions loaded from JSON
//! - Event bus for host-facing notifications
//! - The [`session::Session`] context that ties a run together behind an
//!   [`session::EngineBridge`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ballistics;
pub mod bomb;
pub mod bomber;
pub mod boss;
pub mod contacts;
pub mod economy;
pub mod enemy;
pub mod events;
pub mod melee;
pub mod player;
pub mod prediction;
pub mod rng;
pub mod services;
pub mod session;
pub mod spawn;
pub mod tasks;
pub mod weapons;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::ballistics::*;
    pub use crate::bomb::*;
    pub use crate::bomber::*;
    pub use crate::boss::*;
    pub use crate::contacts::*;
    pub use crate::economy::*;
    pub use crate::enemy::*;
    pub use crate::events::*;
    pub use crate::melee::*;
    pub use crate::player::*;
    pub use crate::prediction::*;
    pub use crate::rng::*;
    pub use crate::services::*;
    pub use crate::session::*;
    pub use crate::spawn::*;
    pub use crate::tasks::*;
    pub use crate::weapons::*;
}

pub use prelude::*;
