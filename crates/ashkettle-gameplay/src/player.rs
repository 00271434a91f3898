//! Player state: health, stats, progression.
//!
//! The player is the target every enemy hunts. Besides health and death,
//! this tracks run progression (kills against a per-scene quota, completed
//! cycles) and the stat multipliers items stack up, with the hard caps on
//! speed and fire rate.

use ashkettle_common::Vec3;
use tracing::{debug, info};

use crate::economy::{ItemEffect, Wallet};
use crate::services::TargetProvider;
use crate::weapons::WeaponDatabase;

/// Starting and default maximum health.
pub const PLAYER_MAX_HEALTH: f32 = 100.0;
/// Hard cap on the stacked movement-speed multiplier.
pub const SPEED_STAT_CAP: f32 = 1.25;
/// Hard cap on the stacked fire-rate multiplier.
pub const FIRE_RATE_STAT_CAP: f32 = 100.0;
/// Extra kills required per completed cycle.
pub const KILLS_PER_CYCLE: u32 = 5;

/// Base kill quota per scene, before cycle scaling.
const SCENE_KILL_QUOTAS: [u32; 5] = [5, 10, 15, 20, 25];

/// The player's simulation state.
#[derive(Debug, Clone)]
pub struct Player {
    /// World position (mirrored from the host each tick).
    pub position: Vec3,
    /// Current health.
    pub health: f32,
    /// Maximum health, grown by items.
    pub max_health: f32,
    /// Set once health reaches zero.
    pub dead: bool,
    /// Run currency.
    pub wallet: Wallet,
    /// Stacked damage multiplier.
    pub damage_stat: f32,
    /// Stacked fire-rate multiplier, capped.
    pub fire_rate_stat: f32,
    /// Stacked movement-speed multiplier, capped.
    pub speed_stat: f32,
    /// Stacked reload-time multiplier (below 1 is faster).
    pub reload_stat: f32,
    /// Kills in the current scene.
    pub enemies_killed: u32,
    /// Cycles of the full scene loop completed.
    pub cycles_completed: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            dead: false,
            wallet: Wallet::default(),
            damage_stat: 1.0,
            fire_rate_stat: 1.0,
            speed_stat: 1.0,
            reload_stat: 1.0,
            enemies_killed: 0,
            cycles_completed: 0,
        }
    }
}

impl Player {
    /// Creates a player at a spawn position.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Applies damage. Returns true when this hit was lethal.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if self.dead {
            return false;
        }
        self.health -= amount;
        debug!(
            damage = f64::from(amount),
            remaining = f64::from(self.health),
            "player took damage"
        );
        if self.health <= 0.0 {
            self.health = 0.0;
            self.dead = true;
            info!("player died");
            return true;
        }
        false
    }

    /// Restores health to the current maximum.
    pub fn heal_full(&mut self) {
        self.health = self.max_health;
    }

    /// Records an enemy kill in the current scene.
    pub fn record_kill(&mut self) {
        self.enemies_killed += 1;
    }

    /// Kills required to clear a scene (1-based), grown per cycle.
    #[must_use]
    pub fn kill_quota(&self, scene: usize) -> u32 {
        let base = SCENE_KILL_QUOTAS
            .get(scene.saturating_sub(1))
            .copied()
            .unwrap_or(SCENE_KILL_QUOTAS[SCENE_KILL_QUOTAS.len() - 1]);
        base + KILLS_PER_CYCLE * self.cycles_completed
    }

    /// Whether the current scene's quota is met.
    #[must_use]
    pub fn quota_met(&self, scene: usize) -> bool {
        self.enemies_killed >= self.kill_quota(scene)
    }

    /// Resets the kill counter on scene change.
    pub fn enter_scene(&mut self) {
        self.enemies_killed = 0;
    }

    /// Completes a full cycle: progression counter up, health restored.
    pub fn complete_cycle(&mut self) {
        self.cycles_completed += 1;
        self.heal_full();
        info!(cycles = self.cycles_completed, "cycle completed");
    }

    /// Applies one item effect to the player and every weapon.
    pub fn apply_effect(&mut self, effect: ItemEffect, weapons: &mut WeaponDatabase) {
        match effect {
            ItemEffect::DamageMultiplier(m) => {
                self.damage_stat *= m;
                for weapon in weapons.iter_mut() {
                    weapon.damage *= m;
                }
            }
            ItemEffect::FireRateMultiplier(m) => {
                self.fire_rate_stat *= m;
                for weapon in weapons.iter_mut() {
                    weapon.fire_rate *= m;
                }
            }
            ItemEffect::SpeedMultiplier(m) => {
                self.speed_stat *= m;
            }
            ItemEffect::ReloadMultiplier(m) => {
                self.reload_stat *= m;
                for weapon in weapons.iter_mut() {
                    weapon.reload_time *= m;
                }
            }
            ItemEffect::AmmoBonus(fraction) => {
                for weapon in weapons.iter_mut() {
                    let add = ((weapon.magazine_size as f32 * fraction).floor() as u32).max(1);
                    weapon.magazine_size += add;
                }
            }
            ItemEffect::MaxHealthBonus(bonus) => {
                self.max_health += bonus;
                self.heal_full();
            }
            ItemEffect::DoublePellets => {
                for weapon in weapons.iter_mut() {
                    weapon.pellets_per_shot = weapon.pellets_per_shot.max(1) * 2;
                }
            }
            ItemEffect::FullHeal => {
                self.heal_full();
            }
        }
        self.clamp_stats();
    }

    /// Enforces the hard stat caps.
    pub fn clamp_stats(&mut self) {
        if self.speed_stat > SPEED_STAT_CAP {
            self.speed_stat = SPEED_STAT_CAP;
        }
        if self.fire_rate_stat > FIRE_RATE_STAT_CAP {
            self.fire_rate_stat = FIRE_RATE_STAT_CAP;
        }
    }
}

impl TargetProvider for Player {
    fn target_position(&self) -> Option<Vec3> {
        if self.dead {
            None
        } else {
            Some(self.position)
        }
    }

    fn apply_damage_to_target(&mut self, amount: f32) {
        self.apply_damage(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_and_death() {
        let mut player = Player::default();
        assert!(!player.apply_damage(60.0));
        assert_eq!(player.health, 40.0);
        assert!(player.apply_damage(60.0));
        assert!(player.dead);
        assert_eq!(player.health, 0.0);

        // Damage after death is a no-op.
        assert!(!player.apply_damage(10.0));
        assert_eq!(player.health, 0.0);
    }

    #[test]
    fn test_dead_player_is_no_target()  {
        let mut player = Player::new(Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(player.target_position(), Some(Vec3::new(1.0, 0.0, 2.0)));
        player.apply_damage(1000.0);
        assert_eq!(player.target_position(), None);
    }

    #[test]
    fn test_kill_quota_scales_with_cycles() {
        let mut player = Player::default();
        assert_eq!(player.kill_quota(1), 5);
        assert_eq!(player.kill_quota(5), 25);

        player.cycles_completed = 2;
        assert_eq!(player.kill_quota(1), 15);
        assert_eq!(player.kill_quota(3), 25);
    }

    #[test]
    fn test_quota_met_and_scene_reset() {
        let mut player = Player::default();
        for _ in 0..5 {
            player.record_kill();
        }
        assert!(player.quota_met(1));
        assert!(!player.quota_met(2));

        player.enter_scene();
        assert_eq!(player.enemies_killed, 0);
        assert!(!player.quota_met(1));
    }

    #[test]
    fn test_cycle_completion_heals() {
        let mut player = Player::default();
        player.apply_damage(70.0);
        player.complete_cycle();
        assert_eq!(player.cycles_completed, 1);
        assert_eq!(player.health, player.max_health);
    }

    #[test]
    fn test_speed_cap() {
        let mut player = Player::default();
        let mut weapons = WeaponDatabase::default();
        for _ in 0..10 {
            player.apply_effect(ItemEffect::SpeedMultiplier(1.05), &mut weapons);
        }
        assert_eq!(player.speed_stat, SPEED_STAT_CAP);
    }

    #[test]
    fn test_fire_rate_cap() {
        let mut player = Player::default();
        let mut weapons = WeaponDatabase::default();
        for _ in 0..20 {
            player.apply_effect(ItemEffect::FireRateMultiplier(2.0), &mut weapons);
        }
        assert_eq!(player.fire_rate_stat, FIRE_RATE_STAT_CAP);
    }

    #[test]
    fn test_damage_effect_retunes_weapons() {
        let mut player = Player::default();
        let ak = crate::weapons::WeaponDatabase::parse_definition(
            r#"{
                "weaponName": "AK-47", "damage": 35, "fireRate": 600,
                "reloadTime": 3.3, "magazineSize": 30, "bulletSpeed": 9999,
                "range": 350, "spread": 2.5, "pelletsPerShot": 0,
                "recoil": 1.5, "iconPath": "WeaponIcons/AK-47"
            }"#,
        )
        .expect("valid");
        let mut weapons = WeaponDatabase::from_definitions([ak]).expect("valid");

        player.apply_effect(ItemEffect::DamageMultiplier(1.4), &mut weapons);
        assert!((player.damage_stat - 1.4).abs() < 1e-6);
        let ak = weapons.get("AK-47").expect("present");
        assert!((ak.damage - 49.0).abs() < 1e-4);
    }

    #[test]
    fn test_ammo_bonus_grows_magazines_at_least_one() {
        let mut player = Player::default();
        let pistol = crate::weapons::WeaponDatabase::parse_definition(
            r#"{
                "weaponName": "Pea Shooter", "damage": 5, "fireRate": 200,
                "reloadTime": 1.0, "magazineSize": 6, "bulletSpeed": 100,
                "range": 50, "spread": 1.0, "pelletsPerShot": 0,
                "recoil": 0.5, "iconPath": "WeaponIcons/PeaShooter"
            }"#,
        )
        .expect("valid");
        let mut weapons = WeaponDatabase::from_definitions([pistol]).expect("valid");

        // 10% of 6 rounds floors to 0; the bonus still adds one.
        player.apply_effect(ItemEffect::AmmoBonus(0.1), &mut weapons);
        assert_eq!(weapons.get("Pea Shooter").expect("present").magazine_size, 7);
    }

    #[test]
    fn test_max_health_bonus_heals_to_new_max() {
        let mut player = Player::default();
        let mut weapons = WeaponDatabase::default();
        player.apply_damage(40.0);
        player.apply_effect(ItemEffect::MaxHealthBonus(25.0), &mut weapons);
        assert_eq!(player.max_health, 125.0);
        assert_eq!(player.health, 125.0);
    }

    #[test]
    fn test_double_pellets_from_zero() {
        let mut player = Player::default();
        let rifle = crate::weapons::WeaponDatabase::parse_definition(
            r#"{
                "weaponName": "Rifle", "damage": 40, "fireRate": 100,
                "reloadTime": 2.0, "magazineSize": 10, "bulletSpeed": 500,
                "range": 300, "spread": 0.5, "pelletsPerShot": 0,
                "recoil": 1.0, "iconPath": "WeaponIcons/Rifle"
            }"#,
        )
        .expect("valid");
        let mut weapons = WeaponDatabase::from_definitions([rifle]).expect("valid");

        player.apply_effect(ItemEffect::DoublePellets, &mut weapons);
        assert_eq!(weapons.get("Rifle").expect("present").pellets_per_shot, 2);
    }
}
