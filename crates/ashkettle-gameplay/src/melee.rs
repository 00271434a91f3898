//! Melee chaser archetype (Goblin, Goblin Elite).
//!
//! Two states: pursue the target, and an attack window that opens when the
//! target is inside attack range. The hitbox is armed only during the attack
//! window and a landed hit disarms it, so one swing never damages twice.

use ashkettle_common::Vec3;

use crate::enemy::EnemyCore;
use crate::services::{Navigation, Presentation, TargetProvider};
use crate::tasks::TaskKind;

/// Speed multiplier applied while actively chasing.
const CHASE_SPEED_BURST: f32 = 1.5;

/// Delay after a landed hit before the next swing can start.
const ATTACK_COOLDOWN_SECS: f32 = 1.0;

/// State of a melee chaser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeleeState {
    /// Closing distance to the target.
    #[default]
    Pursue,
    /// In range: swing active, hitbox armable.
    AttackWindow,
}

/// Per-entity melee chaser behavior.
#[derive(Debug, Clone, Default)]
pub struct MeleeChaser {
    /// Current state.
    pub state: MeleeState,
}

impl MeleeChaser {
    /// Creates a chaser in the pursue state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One AI evaluation. Runs to completion before the next tick (no
    /// re-entrancy). A missing target or disabled navigation idles the
    /// enemy for the tick.
    pub fn update<N, P, T>(
        &mut self,
        core: &mut EnemyCore,
        navigation: &mut N,
        presentation: &mut P,
        target: &T,
    ) where
        N: Navigation,
        P: Presentation,
        T: TargetProvider,
    {
        if core.dead || core.is_frozen() {
            return;
        }

        let Some(target_pos) = target.target_position() else {
            return;
        };

        if !navigation.is_enabled() {
            // Frozen/disabled: stand down mid-swing.
            self.state = MeleeState::Pursue;
            core.deactivate_hitbox();
            presentation.set_animation_bool("attacking", false);
            navigation.set_speed(core.speed);
            return;
        }

        navigation.set_destination(target_pos);
        navigation.set_speed(core.speed * CHASE_SPEED_BURST);

        let in_range = self.in_attack_range(core.position, target_pos, core.range);
        match (self.state, in_range) {
            (MeleeState::Pursue, true) => {
                if !core.tasks.is_active(TaskKind::AttackCooldown) {
                    self.state = MeleeState::AttackWindow;
                    core.activate_hitbox();
                    presentation.set_animation_bool("attacking", true);
                }
            }
            (MeleeState::AttackWindow, true) => {
                // A new swing starts once the cooldown from the last landed
                // hit has expired.
                if !core.hitbox_active() && !core.tasks.is_active(TaskKind::AttackCooldown) {
                    core.activate_hitbox();
                }
            }
            (MeleeState::AttackWindow, false) => {
                self.state = MeleeState::Pursue;
                core.deactivate_hitbox();
                presentation.set_animation_bool("attacking", false);
            }
            _ => {}
        }
    }

    /// Resolves a reported contact with the player. Damages at most once per
    /// hitbox activation. Returns whether damage was applied.
    pub fn resolve_player_contact<T: TargetProvider>(
        core: &mut EnemyCore,
        target: &mut T,
    ) -> bool {
        if !core.hitbox_active() {
            return false;
        }
        target.apply_damage_to_target(core.damage);
        core.deactivate_hitbox();
        core.tasks.schedule(TaskKind::AttackCooldown, ATTACK_COOLDOWN_SECS);
        true
    }

    fn in_attack_range(&self, position: Vec3, target: Vec3, range: f32) -> bool {
        position.distance(target) < range
    }
}
