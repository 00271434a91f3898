//! Weapon definitions loaded from JSON.
//!
//! Weapon stats live in designer-editable JSON files, one weapon per file,
//! with camelCase keys. The [`WeaponDatabase`] collects every definition for
//! a session and answers lookups by name.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while loading or validating weapon definitions.
#[derive(Debug, Error)]
pub enum WeaponError {
    /// A definition file could not be read.
    #[error("failed to read weapon file: {0}")]
    Io(#[from] std::io::Error),
    /// A definition failed to parse as JSON.
    #[error("failed to parse weapon JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// A parsed definition carries invalid stats.
    #[error("invalid weapon '{name}': {reason}")]
    Invalid {
        /// Name of the offending weapon.
        name: String,
        /// What was wrong with it.
        reason: String,
    },
    /// Two definitions share a name.
    #[error("duplicate weapon name '{0}'")]
    Duplicate(String),
}

/// Every tunable stat for a single weapon.
///
/// Field names match the JSON keys exactly. Values are in game units:
/// `fire_rate` is rounds per minute, `reload_time` is seconds, `spread` is a
/// cone half-angle in degrees, `pellets_per_shot` is above 1 only for
/// shotguns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponData {
    /// Unique human-readable name.
    pub weapon_name: String,
    /// Raw damage removed per bullet.
    pub damage: f32,
    /// Fire rate in rounds per minute.
    pub fire_rate: f32,
    /// Seconds to reload a full magazine.
    pub reload_time: f32,
    /// Rounds per magazine.
    pub magazine_size: u32,
    /// Projectile speed in units/second.
    pub bullet_speed: f32,
    /// Maximum effective distance.
    pub range: f32,
    /// Spread cone half-angle in degrees, applied per shot.
    pub spread: f32,
    /// Pellets per trigger pull; 0 or 1 for single-projectile weapons.
    pub pellets_per_shot: u32,
    /// Recoil multiplier for the camera kick.
    pub recoil: f32,
    /// Icon asset path.
    pub icon_path: String,
}

impl WeaponData {
    /// Checks stats for values the simulation cannot work with.
    pub fn validate(&self) -> Result<(), WeaponError> {
        let fail = |reason: &str| {
            Err(WeaponError::Invalid {
                name: self.weapon_name.clone(),
                reason: reason.to_string(),
            })
        };
        if self.weapon_name.is_empty() {
            return fail("empty weapon name");
        }
        if self.damage <= 0.0 {
            return fail("damage must be positive");
        }
        if self.fire_rate <= 0.0 {
            return fail("fire rate must be positive");
        }
        if self.reload_time < 0.0 {
            return fail("reload time must not be negative");
        }
        if self.magazine_size == 0 {
            return fail("magazine size must be positive");
        }
        Ok(())
    }

    /// Seconds between shots at this weapon's fire rate.
    #[must_use]
    pub fn shot_interval(&self) -> f32 {
        60.0 / self.fire_rate
    }

    /// Projectiles produced per trigger pull.
    #[must_use]
    pub fn projectiles_per_shot(&self) -> u32 {
        self.pellets_per_shot.max(1)
    }
}

/// All weapon definitions available in a session, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct WeaponDatabase {
    weapons: HashMap<String, WeaponData>,
}

impl WeaponDatabase {
    /// Builds a database from already-parsed definitions, validating each
    /// and rejecting duplicates.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = WeaponData>,
    ) -> Result<Self, WeaponError> {
        let mut weapons = HashMap::new();
        for data in definitions {
            data.validate()?;
            debug!(weapon = %data.weapon_name, "loaded weapon");
            let name = data.weapon_name.clone();
            if weapons.insert(name.clone(), data).is_some() {
                warn!(weapon = %name, "duplicate weapon definition");
                return Err(WeaponError::Duplicate(name));
            }
        }
        Ok(Self { weapons })
    }

    /// Parses one JSON definition.
    pub fn parse_definition(json: &str) -> Result<WeaponData, WeaponError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads every `*.json` file in a directory into a database.
    pub fn load_dir(dir: &Path) -> Result<Self, WeaponError> {
        let mut definitions = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let text = std::fs::read_to_string(&path)?;
                definitions.push(Self::parse_definition(&text)?);
            }
        }
        Self::from_definitions(definitions)
    }

    /// Looks a weapon up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&WeaponData> {
        self.weapons.get(name)
    }

    /// Number of loaded weapons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    /// Whether the database is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    /// Iterates over all weapons in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &WeaponData> {
        self.weapons.values()
    }

    /// Mutable iteration, for item effects that retune every weapon.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut WeaponData> {
        self.weapons.values_mut()
    }
}
