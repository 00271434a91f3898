//! Shared enemy lifecycle: stats, damage, death, loot.
//!
//! Every archetype (melee chasers, the bomber, the boss) runs on the same
//! [`EnemyCore`]: health and damage scaled by completed cycles, a damageable
//! guard for scripted invulnerability, restartable damage-flash and
//! hurt-audio timers, a death transition that fires exactly once, and a
//! single loot roll when the body is cleared.

use ashkettle_common::{EntityId, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rng::GameRng;
use crate::services::{Navigation, Presentation, SpawnKind, WorldMutation};
use crate::tasks::{TaskKind, TaskScheduler};

/// Per-cycle stat growth: +25% health and damage per completed cycle.
pub const CYCLE_STAT_GROWTH: f32 = 0.25;

/// Duration of the red damage flash, in seconds.
const DAMAGE_FLASH_SECS: f32 = 0.1;
/// Cooldown between hurt-sound plays, in seconds. Hits landing inside an
/// active window reuse the playing sound instead of starting another.
const HURT_AUDIO_SECS: f32 = 0.5;
/// Flash tint while recently damaged.
const FLASH_RED: [f32; 3] = [1.0, 0.0, 0.0];

/// Enemy archetypes that can appear in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Common melee chaser.
    Goblin,
    /// Tougher, harder-hitting melee chaser.
    GoblinElite,
    /// Ranged repositioner that throws bombs from a distance.
    Bomber,
    /// The multi-phase arena boss.
    Boss,
}

impl EnemyKind {
    /// Get display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Goblin => "Goblin",
            Self::GoblinElite => "Goblin Elite",
            Self::Bomber => "Bomber",
            Self::Boss => "Boss",
        }
    }

    /// Base health before cycle scaling.
    #[must_use]
    pub fn base_health(self) -> f32 {
        match self {
            Self::Goblin => 100.0,
            Self::GoblinElite => 250.0,
            Self::Bomber => 50.0,
            Self::Boss => 7500.0,
        }
    }

    /// Base contact damage before cycle scaling. Throwers deal damage
    /// through their projectiles instead.
    #[must_use]
    pub fn base_damage(self) -> f32 {
        match self {
            Self::Goblin => 10.0,
            Self::GoblinElite => 25.0,
            Self::Bomber | Self::Boss => 0.0,
        }
    }

    /// Movement speed.
    #[must_use]
    pub fn base_speed(self) -> f32 {
        match self {
            Self::Goblin => 4.0,
            Self::GoblinElite => 5.0,
            Self::Bomber => 10.0,
            Self::Boss => 0.0,
        }
    }

    /// Melee attack range. Non-melee kinds never enter an attack window.
    #[must_use]
    pub fn attack_range(self) -> f32 {
        match self {
            Self::Goblin => 3.0,
            Self::GoblinElite => 3.5,
            Self::Bomber => 0.0,
            Self::Boss => f32::INFINITY,
        }
    }

    /// Probability of dropping a collectible on death.
    #[must_use]
    pub fn drop_chance(self) -> f32 {
        match self {
            Self::Goblin | Self::Bomber => 0.25,
            Self::GoblinElite => 0.5,
            Self::Boss => 0.0,
        }
    }

    /// Relative weight for random spawn selection. Zero never spawns
    /// randomly (the boss is placed by the scene).
    #[must_use]
    pub fn spawn_weight(self) -> u32 {
        match self {
            Self::Goblin => 5,
            Self::GoblinElite => 1,
            Self::Bomber => 3,
            Self::Boss => 0,
        }
    }

    /// Kinds eligible for random spawning.
    #[must_use]
    pub const fn spawnable() -> [Self; 3] {
        [Self::Goblin, Self::GoblinElite, Self::Bomber]
    }
}

/// What a call to [`EnemyCore::take_damage`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Damage was applied and the enemy survived.
    Damaged,
    /// Damage was applied and the enemy died from it.
    Died,
    /// Nothing happened (invulnerable or already dead).
    Ignored,
}

/// Shared mutable state of a live enemy.
#[derive(Debug, Clone)]
pub struct EnemyCore {
    /// Stable entity ID, matching the host engine's handle.
    pub id: EntityId,
    /// Archetype of this enemy.
    pub kind: EnemyKind,
    /// World position (mirrored from the host each tick).
    pub position: Vec3,
    /// Current health.
    pub health: f32,
    /// Health at spawn, after cycle scaling.
    pub max_health: f32,
    /// Contact damage dealt per melee hit, after cycle scaling.
    pub damage: f32,
    /// Movement speed handed to the navigation agent.
    pub speed: f32,
    /// Melee attack range.
    pub range: f32,
    /// Whether damage currently applies.
    pub damageable: bool,
    /// Set once by the death transition.
    pub dead: bool,
    /// Named timers for this entity.
    pub tasks: TaskScheduler,
    hitbox_active: bool,
    body_cleared: bool,
}

impl EnemyCore {
    /// Creates an enemy at `position` with stats scaled for the number of
    /// completed cycles.
    #[must_use]
    pub fn spawn(kind: EnemyKind, position: Vec3, cycles_completed: u32) -> Self {
        let scale = 1.0 + CYCLE_STAT_GROWTH * cycles_completed as f32;
        let max_health = kind.base_health() * scale;
        Self {
            id: EntityId::new(),
            kind,
            position,
            health: max_health,
            max_health,
            damage: kind.base_damage() * scale,
            speed: kind.base_speed(),
            range: kind.attack_range(),
            damageable: true,
            dead: false,
            tasks: TaskScheduler::new(),
            hitbox_active: false,
            body_cleared: false,
        }
    }

    /// Fraction of health remaining, in [0, 1].
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Applies damage, restarting the flash and hurt-audio timers.
    ///
    /// Ignored while invulnerable or dead; once health reaches zero the
    /// death transition runs exactly once.
    pub fn take_damage<P: Presentation, N: Navigation>(
        &mut self,
        dmg: f32,
        presentation: &mut P,
        navigation: &mut N,
    ) -> DamageOutcome {
        if !self.damageable || self.dead {
            return DamageOutcome::Ignored;
        }

        self.health -= dmg;
        debug!(
            enemy = self.kind.display_name(),
            damage = f64::from(dmg),
            remaining = f64::from(self.health),
            "enemy took damage"
        );

        presentation.set_flash_color(Some(FLASH_RED));
        self.tasks.schedule(TaskKind::DamageFlash, DAMAGE_FLASH_SECS);
        if !self.tasks.is_active(TaskKind::HurtAudio) {
            presentation.play_sound("hurt");
        }
        self.tasks.schedule(TaskKind::HurtAudio, HURT_AUDIO_SECS);

        if self.health <= 0.0 {
            self.die(presentation, navigation);
            DamageOutcome::Died
        } else {
            DamageOutcome::Damaged
        }
    }

    /// Death transition: halts navigation, disables the hitbox, plays the
    /// death animation and sound. Idempotent.
    pub fn die<P: Presentation, N: Navigation>(
        &mut self,
        presentation: &mut P,
        navigation: &mut N,
    ) {
        if self.dead {
            return;
        }
        self.dead = true;
        self.hitbox_active = false;
        self.tasks.clear();

        if navigation.is_enabled() {
            navigation.stop();
        }
        presentation.set_animation_bool("dead", true);
        presentation.play_sound("death");
        debug!(enemy = self.kind.display_name(), "enemy died");
    }

    /// Rolls loot and despawns the body. Exactly one roll per death; later
    /// calls do nothing. Returns whether a collectible dropped.
    pub fn clear_body<W: WorldMutation>(
        &mut self,
        rng: &mut GameRng,
        world: &mut W,
    ) -> bool {
        if !self.dead || self.body_cleared {
            return false;
        }
        self.body_cleared = true;

        let dropped = rng.chance(self.kind.drop_chance());
        if dropped {
            world.spawn_entity(SpawnKind::Collectible, self.position);
        }
        world.destroy_entity(self.id);
        dropped
    }

    /// Whether the body has already been cleared.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.body_cleared
    }

    /// Arms the melee hitbox for the current swing.
    pub fn activate_hitbox(&mut self) {
        if !self.dead {
            self.hitbox_active = true;
        }
    }

    /// Disarms the melee hitbox. Called after a landed hit so one swing
    /// cannot damage twice.
    pub fn deactivate_hitbox(&mut self) {
        self.hitbox_active = false;
    }

    /// Whether the melee hitbox can currently land a hit.
    #[must_use]
    pub fn hitbox_active(&self) -> bool {
        self.hitbox_active
    }

    /// Freezes this enemy in place for `duration` seconds: navigation halts,
    /// the hitbox disarms, and archetype AI stands down until the recovery
    /// timer fires. Re-freezing restarts the timer.
    pub fn freeze<P: Presentation, N: Navigation>(
        &mut self,
        duration: f32,
        presentation: &mut P,
        navigation: &mut N,
    ) {
        if self.dead {
            return;
        }
        navigation.stop();
        self.deactivate_hitbox();
        presentation.set_animation_bool("frozen", true);
        self.tasks.schedule(TaskKind::FreezeRecover, duration);
    }

    /// Whether a freeze effect is currently active.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.tasks.is_active(TaskKind::FreezeRecover)
    }

    /// Advances this enemy's timers and applies timer side effects that
    /// belong to the shared lifecycle (flash restore). Returns every fired
    /// kind so archetype logic can react to its own timers.
    pub fn tick_tasks<P: Presentation>(&mut self, dt: f32, presentation: &mut P) -> Vec<TaskKind> {
        let fired = self.tasks.tick(dt);
        for kind in &fired {
            match kind {
                TaskKind::DamageFlash => presentation.set_flash_color(None),
                TaskKind::FreezeRecover => presentation.set_animation_bool("frozen", false),
                _ => {}
            }
        }
        fired
    }
}
