//! Random enemy spawn direction.
//!
//! A [`SpawnDirector`] owns the spawn cadence for a run: it waits a random
//! delay, picks a spawn pad, picks a point on it, picks an enemy kind by
//! weight, and schedules the next spawn. Delays shrink exponentially with
//! completed cycles so later runs get denser waves. Everything is driven by
//! the session's seeded RNG, so a seeded run spawns identically.

use ashkettle_common::Vec3;
use tracing::debug;

use crate::enemy::EnemyKind;
use crate::rng::GameRng;

/// Per-cycle exponential spawn-delay decay factor.
pub const SPAWN_DELAY_DECAY: f32 = 0.25;

/// A rectangular pad enemies can spawn on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPad {
    /// Pad center.
    pub center: Vec3,
    /// Full extents of the pad along each axis. Spawns use X and Z; the pad
    /// height is taken from the center.
    pub size: Vec3,
}

impl SpawnPad {
    /// Picks a uniform random point on the pad.
    #[must_use]
    pub fn select_point(&self, rng: &mut GameRng) -> Vec3 {
        Vec3::new(
            rng.range(self.center.x - self.size.x / 2.0, self.center.x + self.size.x / 2.0),
            self.center.y,
            rng.range(self.center.z - self.size.z / 2.0, self.center.z + self.size.z / 2.0),
        )
    }
}

/// Picks a spawnable enemy kind by weight.
#[must_use]
pub fn select_kind(rng: &mut GameRng) -> EnemyKind {
    let kinds = EnemyKind::spawnable();
    let total: u32 = kinds.iter().map(|k| k.spawn_weight()).sum();
    let idx = rng.range_u32(1, total);

    let mut cumulative = 0;
    for kind in kinds {
        cumulative += kind.spawn_weight();
        if cumulative >= idx {
            return kind;
        }
    }
    kinds[0]
}

/// Schedules and produces random enemy spawns.
#[derive(Debug, Clone)]
pub struct SpawnDirector {
    pads: Vec<SpawnPad>,
    min_delay: f32,
    max_delay: f32,
    active: bool,
    next_spawn_in: Option<f32>,
}

impl SpawnDirector {
    /// Creates a director with delays scaled down for completed cycles and
    /// the first spawn already scheduled.
    #[must_use]
    pub fn new(
        pads: Vec<SpawnPad>,
        min_delay: f32,
        max_delay: f32,
        cycles_completed: u32,
        rng: &mut GameRng,
    ) -> Self {
        let decay = (-SPAWN_DELAY_DECAY * cycles_completed as f32).exp();
        let mut director = Self {
            pads,
            min_delay: min_delay * decay,
            max_delay: max_delay * decay,
            active: true,
            next_spawn_in: None,
        };
        director.schedule(rng);
        director
    }

    /// Whether spawning is currently enabled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Scaled delay bounds, for inspection.
    #[must_use]
    pub fn delay_bounds(&self) -> (f32, f32) {
        (self.min_delay, self.max_delay)
    }

    fn schedule(&mut self, rng: &mut GameRng) {
        self.next_spawn_in = Some(rng.range(self.min_delay, self.max_delay));
    }

    /// Advances the spawn timer. Produces at most one spawn per call; the
    /// next one is scheduled immediately after. A timer that elapses while
    /// the director is stopped is simply discarded.
    pub fn tick(&mut self, dt: f32, rng: &mut GameRng) -> Option<(EnemyKind, Vec3)> {
        let remaining = self.next_spawn_in.as_mut()?;
        *remaining -= dt;
        if *remaining > 0.0 {
            return None;
        }
        self.next_spawn_in = None;

        if !self.active {
            return None;
        }

        let pad = *rng.choose(&self.pads)?;
        let point = pad.select_point(rng);
        let kind = select_kind(rng);
        debug!(kind = kind.display_name(), "spawning enemy");

        self.schedule(rng);
        Some((kind, point))
    }

    /// Halts spawning. A pending timer is allowed to run out harmlessly.
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Resumes spawning and schedules the next spawn.
    pub fn start(&mut self, rng: &mut GameRng) {
        self.active = true;
        if self.next_spawn_in.is_none() {
            self.schedule(rng);
        }
    }
}
