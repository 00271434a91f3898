//! Per-entity cooperative timers.
//!
//! Timed behavior (damage flash, throw wind-up, boss rain-fire cadence) is
//! driven by named task records advanced once per tick instead of engine
//! coroutines. Scheduling a task that is already active cancels and replaces
//! the prior instance, so re-triggers restart the timer rather than stacking.
//! Pausing the simulation simply stops ticking, which freezes every timer.

use serde::{Deserialize, Serialize};

/// Named timer slots an entity can run. One instance per kind at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    /// Red damage flash on the entity's material.
    DamageFlash,
    /// Cooldown between hurt-sound plays.
    HurtAudio,
    /// Wind-up between committing to a throw and releasing it.
    ThrowWindup,
    /// Delay until the next attack may start.
    AttackCooldown,
    /// Cadence of the boss's phase-3 area-denial barrage.
    RainFire,
    /// Warning period before the arena lava starts rising.
    LavaWarning,
    /// Recovery after a freeze effect wears off.
    FreezeRecover,
}

/// A scheduled timer on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Task {
    kind: TaskKind,
    remaining: f32,
    /// Repeating tasks re-arm to `period` when they fire.
    period: Option<f32>,
}

/// Cooperative task list owned by a single entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskScheduler {
    tasks: Vec<Task>,
}

impl TaskScheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a one-shot task, replacing any active task of this kind.
    pub fn schedule(&mut self, kind: TaskKind, delay: f32) {
        self.cancel(kind);
        self.tasks.push(Task {
            kind,
            remaining: delay.max(0.0),
            period: None,
        });
    }

    /// Schedules a repeating task, replacing any active task of this kind.
    pub fn schedule_repeating(&mut self, kind: TaskKind, period: f32) {
        self.cancel(kind);
        self.tasks.push(Task {
            kind,
            remaining: period.max(0.0),
            period: Some(period.max(0.0)),
        });
    }

    /// Cancels any active task of this kind. Cancelling an absent kind is a
    /// no-op.
    pub fn cancel(&mut self, kind: TaskKind) {
        self.tasks.retain(|t| t.kind != kind);
    }

    /// Whether a task of this kind is currently pending.
    #[must_use]
    pub fn is_active(&self, kind: TaskKind) -> bool {
        self.tasks.iter().any(|t| t.kind == kind)
    }

    /// Time left on a task, if pending.
    #[must_use]
    pub fn remaining(&self, kind: TaskKind) -> Option<f32> {
        self.tasks.iter().find(|t| t.kind == kind).map(|t| t.remaining)
    }

    /// Advances every timer by `dt` and returns the kinds that fired, in
    /// scheduling order. Repeating tasks re-arm; one-shots are removed.
    pub fn tick(&mut self, dt: f32) -> Vec<TaskKind> {
        let mut fired = Vec::new();
        for task in &mut self.tasks {
            task.remaining -= dt;
            if let Some(period) = task.period {
                let period = period.max(f32::EPSILON);
                while task.remaining <= 0.0 {
                    fired.push(task.kind);
                    task.remaining += period;
                }
            } else if task.remaining <= 0.0 {
                fired.push(task.kind);
            }
        }
        self.tasks
            .retain(|t| t.period.is_some() || t.remaining > 0.0);
        fired
    }

    /// Drops every pending task.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}
