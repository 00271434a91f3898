//! Three-phase arena boss.
//!
//! The boss is a stationary thrower whose fight escalates twice, at 70% and
//! 30% health. Each escalation runs the same scripted transition: sink below
//! the arena (invulnerable), mutate the arena, relocate, rise back up
//! (vulnerable again). Phase two slides the lava doors open; phase three
//! floods the arena after a warning, clears every other enemy, stops the
//! spawner and switches the boss to a continuous bomb rain. Transitions are
//! latched: each fires at most once and strictly in order, even if health
//! drops straight past both thresholds.

use ashkettle_common::{move_towards, Vec3};
use tracing::info;

use crate::ballistics::{launch_velocity, ThrowProfile};
use crate::enemy::EnemyCore;
use crate::rng::GameRng;
use crate::services::{Presentation, TargetProvider};
use crate::tasks::TaskKind;

/// Health ratio below which the phase-two transition starts.
pub const PHASE_TWO_THRESHOLD: f32 = 0.7;
/// Health ratio below which the phase-three transition starts.
pub const PHASE_THREE_THRESHOLD: f32 = 0.3;

/// Throw profile for phase one and two aimed attacks.
pub const BOSS_THROW: ThrowProfile = ThrowProfile {
    speed: 15.0,
    min_angle_deg: -60.0,
};

const SINK_DEPTH: f32 = 15.0;
const SINK_SPEED: f32 = 5.0;
const RISE_HEIGHT: f32 = 16.0;
const RISE_SPEED: f32 = 2.5;
const DOOR_TARGET_X: f32 = 20.0;
const DOOR_SPEED: f32 = 2.0;
const LAVA_WARNING_SECS: f32 = 8.0;
const LAVA_TARGET_Y: f32 = 10.0;
const COLUMN_TARGET_Y: f32 = 6.5;
const ARENA_RAISE_SPEED: f32 = 1.5;
const PHASE_TWO_RELOCATION: Vec3 = Vec3::new(1.0, -25.0, -2.0);
const PHASE_THREE_RELOCATION: Vec3 = Vec3::new(6.5, -10.0, -8.0);
const RAIN_INTERVAL_SECS: f32 = 0.15;
const AIMED_RAIN_EVERY: u64 = 20;
/// Rain bombs land inside 90% of the zone footprint (0.45 of size as a
/// half-extent around the center).
const ZONE_INNER_HALF: f32 = 0.45;
const WINDUP_MIN_SECS: f32 = 3.0;
const WINDUP_MAX_SECS: f32 = 6.0;
const THROW_POINT_HEIGHT: f32 = 1.5;

/// Fight phase, advanced by health thresholds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, serde::Serialize, serde::Deserialize,
)]
pub enum BossPhase {
    /// Opening phase: aimed throws only.
    #[default]
    One,
    /// Lava doors open; aimed throws continue.
    Two,
    /// Arena flooded; continuous bomb rain.
    Three,
}

/// A sliding arena door.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Door {
    /// Current world position. Doors slide along the X axis away from zero.
    pub position: Vec3,
    /// Deactivated once the door reaches its open position.
    pub active: bool,
}

/// Scripted arena geometry the boss fight mutates.
#[derive(Debug, Clone)]
pub struct Arena {
    /// Lava doors that open during the phase-two transition.
    pub doors: Vec<Door>,
    /// Column positions raised during the phase-three transition.
    pub columns: Vec<Vec3>,
    /// Lava plane position.
    pub lava: Vec3,
    /// Center of the bomb-rain zone.
    pub bomb_zone_center: Vec3,
    /// Full size of the bomb-rain zone box.
    pub bomb_zone_size: Vec3,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            doors: Vec::new(),
            columns: Vec::new(),
            lava: Vec3::new(0.0, -5.0, 0.0),
            bomb_zone_center: Vec3::new(0.0, 12.0, 0.0),
            bomb_zone_size: Vec3::new(20.0, 1.0, 20.0),
        }
    }
}

/// Side effects of a boss evaluation the session must carry out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossAction {
    /// Launch an aimed bomb with an initial velocity.
    ThrowBomb {
        /// Release point.
        origin: Vec3,
        /// Initial bomb velocity.
        velocity: Vec3,
    },
    /// Drop a rain bomb that falls from rest.
    DropBomb {
        /// Spawn position.
        position: Vec3,
    },
    /// A phase transition has begun.
    PhaseChanged(BossPhase),
    /// Toggle the lava warning indicator.
    SetLavaWarning(bool),
    /// Despawn every enemy except the boss.
    ClearOtherEnemies,
    /// Halt random enemy spawning for the rest of the fight.
    StopSpawner,
    /// The boss has died; the run is won.
    Defeated,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TransitionStep {
    Sinking { target_y: f32 },
    SlidingDoors,
    LavaWarning,
    RaisingArena,
    Rising { target_y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Transition {
    to: BossPhase,
    step: TransitionStep,
}

/// Boss behavior state.
#[derive(Debug, Clone, Default)]
pub struct Boss {
    /// Current fight phase.
    pub phase: BossPhase,
    transition: Option<Transition>,
    phase_two_latched: bool,
    phase_three_latched: bool,
    rain_active: bool,
    rain_count: u64,
    defeat_raised: bool,
}

impl Boss {
    /// Creates a boss in phase one.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a scripted transition is currently running.
    #[must_use]
    pub fn in_transition(&self) -> bool {
        self.transition.is_some()
    }

    /// Whether the phase-three bomb rain is running.
    #[must_use]
    pub fn rain_active(&self) -> bool {
        self.rain_active
    }

    /// One boss evaluation.
    ///
    /// `fired` holds the task kinds that elapsed on the boss this tick.
    /// Returned actions must be applied by the caller in order.
    #[allow(clippy::too_many_arguments)]
    pub fn update<P, T>(
        &mut self,
        core: &mut EnemyCore,
        fired: &[TaskKind],
        arena: &mut Arena,
        dt: f32,
        presentation: &mut P,
        target: &T,
        rng: &mut GameRng,
    ) -> Vec<BossAction>
    where
        P: Presentation,
        T: TargetProvider,
    {
        let mut actions = Vec::new();

        if core.dead {
            if !self.defeat_raised {
                self.defeat_raised = true;
                info!("boss defeated");
                actions.push(BossAction::Defeated);
            }
            return actions;
        }

        // Scripted motion runs even with no target present.
        self.advance_transition(core, fired, arena, dt, &mut actions);

        let Some(target_pos) = target.target_position() else {
            return actions;
        };

        // A committed wind-up releases even if a transition started meanwhile.
        if fired.contains(&TaskKind::ThrowWindup) {
            if let Some(solution) = BOSS_THROW.solve(throw_point(core.position), target_pos) {
                actions.push(BossAction::ThrowBomb {
                    origin: throw_point(core.position),
                    velocity: launch_velocity(&solution, BOSS_THROW.speed),
                });
            }
        }

        if self.transition.is_none() {
            self.check_phase_triggers(core, &mut actions);
        }

        if self.transition.is_some() {
            return actions;
        }

        if self.rain_active {
            self.rain(core, fired, arena, target_pos, rng, &mut actions);
        } else if !core.tasks.is_active(TaskKind::ThrowWindup) {
            // Aimed attack: commit only when the target is reachable.
            if BOSS_THROW
                .solve(throw_point(core.position), target_pos)
                .is_some()
            {
                presentation.play_animation_trigger("attack");
                core.tasks
                    .schedule(TaskKind::ThrowWindup, rng.range(WINDUP_MIN_SECS, WINDUP_MAX_SECS));
            }
        }

        actions
    }

    fn check_phase_triggers(&mut self, core: &mut EnemyCore, actions: &mut Vec<BossAction>) {
        let ratio = core.health_ratio();
        // Transitions always run in order: a drop straight past both
        // thresholds runs the phase-two transition first.
        if !self.phase_two_latched && ratio < PHASE_TWO_THRESHOLD {
            self.phase_two_latched = true;
            self.begin_transition(core, BossPhase::Two, actions);
        } else if self.phase_two_latched
            && !self.phase_three_latched
            && ratio < PHASE_THREE_THRESHOLD
        {
            self.phase_three_latched = true;
            self.begin_transition(core, BossPhase::Three, actions);
        }
    }

    fn begin_transition(
        &mut self,
        core: &mut EnemyCore,
        to: BossPhase,
        actions: &mut Vec<BossAction>,
    ) {
        info!(phase = ?to, "boss phase transition starting");
        core.damageable = false;
        self.transition = Some(Transition {
            to,
            step: TransitionStep::Sinking {
                target_y: core.position.y - SINK_DEPTH,
            },
        });
        actions.push(BossAction::PhaseChanged(to));
    }

    fn advance_transition(
        &mut self,
        core: &mut EnemyCore,
        fired: &[TaskKind],
        arena: &mut Arena,
        dt: f32,
        actions: &mut Vec<BossAction>,
    ) {
        let Some(mut transition) = self.transition else {
            return;
        };

        match transition.step {
            TransitionStep::Sinking { target_y } => {
                let target = Vec3::new(core.position.x, target_y, core.position.z);
                core.position = move_towards(core.position, target, SINK_SPEED * dt);
                if core.position.y <= target_y {
                    transition.step = match transition.to {
                        BossPhase::Two => TransitionStep::SlidingDoors,
                        _ => {
                            core.tasks.schedule(TaskKind::LavaWarning, LAVA_WARNING_SECS);
                            actions.push(BossAction::SetLavaWarning(true));
                            TransitionStep::LavaWarning
                        }
                    };
                }
            }
            TransitionStep::SlidingDoors => {
                if slide_doors(arena, dt) {
                    core.position = PHASE_TWO_RELOCATION;
                    self.phase = transition.to;
                    core.damageable = true;
                    transition.step = TransitionStep::Rising {
                        target_y: core.position.y + RISE_HEIGHT,
                    };
                }
            }
            TransitionStep::LavaWarning => {
                if fired.contains(&TaskKind::LavaWarning) {
                    transition.step = TransitionStep::RaisingArena;
                }
            }
            TransitionStep::RaisingArena => {
                if raise_arena(arena, dt) {
                    core.position = PHASE_THREE_RELOCATION;
                    actions.push(BossAction::SetLavaWarning(false));
                    actions.push(BossAction::StopSpawner);
                    actions.push(BossAction::ClearOtherEnemies);
                    self.phase = transition.to;
                    self.rain_active = true;
                    core.tasks
                        .schedule_repeating(TaskKind::RainFire, RAIN_INTERVAL_SECS);
                    core.damageable = true;
                    transition.step = TransitionStep::Rising {
                        target_y: core.position.y + RISE_HEIGHT,
                    };
                }
            }
            TransitionStep::Rising { target_y } => {
                let target = Vec3::new(core.position.x, target_y, core.position.z);
                core.position = move_towards(core.position, target, RISE_SPEED * dt);
                if core.position.y >= target_y {
                    info!(phase = ?transition.to, "boss phase transition complete");
                    self.transition = None;
                    return;
                }
            }
        }

        self.transition = Some(transition);
    }

    /// Phase-three attack: one zone bomb per elapsed interval, with every
    /// twentieth aimed at the target's current position.
    fn rain(
        &mut self,
        _core: &EnemyCore,
        fired: &[TaskKind],
        arena: &Arena,
        target_pos: Vec3,
        rng: &mut GameRng,
        actions: &mut Vec<BossAction>,
    ) {
        for kind in fired {
            if *kind != TaskKind::RainFire {
                continue;
            }
            self.rain_count += 1;

            let half = arena.bomb_zone_size * ZONE_INNER_HALF;
            let offset = Vec3::new(rng.range(-half.x, half.x), 0.0, rng.range(-half.z, half.z));
            actions.push(BossAction::DropBomb {
                position: arena.bomb_zone_center + offset,
            });

            if self.rain_count % AIMED_RAIN_EVERY == 0 {
                actions.push(BossAction::DropBomb {
                    position: Vec3::new(target_pos.x, arena.bomb_zone_center.y, target_pos.z),
                });
            }
        }
    }
}

/// Slides every active door toward |x| = `DOOR_TARGET_X`, deactivating each
/// on arrival. Returns true once all doors are open.
fn slide_doors(arena: &mut Arena, dt: f32) -> bool {
    let mut all_open = true;
    for door in &mut arena.doors {
        if !door.active {
            continue;
        }
        let target_x = DOOR_TARGET_X.copysign(door.position.x);
        let target = Vec3::new(target_x, door.position.y, door.position.z);
        door.position = move_towards(door.position, target, DOOR_SPEED * dt);
        if (door.position.x - target_x).abs() <= f32::EPSILON {
            door.active = false;
        } else {
            all_open = false;
        }
    }
    all_open
}

/// Raises the lava toward its flood height and each column toward its raised
/// height. Returns true once everything has arrived.
fn raise_arena(arena: &mut Arena, dt: f32) -> bool {
    let step = ARENA_RAISE_SPEED * dt;
    let lava_target = Vec3::new(arena.lava.x, LAVA_TARGET_Y, arena.lava.z);
    arena.lava = move_towards(arena.lava, lava_target, step);
    let mut all_raised = arena.lava.y >= LAVA_TARGET_Y;

    for col in &mut arena.columns {
        let target = Vec3::new(col.x, COLUMN_TARGET_Y, col.z);
        *col = move_towards(*col, target, step);
        if col.y < COLUMN_TARGET_Y {
            all_raised = false;
        }
    }
    all_raised
}

fn throw_point(position: Vec3) -> Vec3 {
    position + Vec3::Y * THROW_POINT_HEIGHT
}
