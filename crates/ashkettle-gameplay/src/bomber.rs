//! Ranged repositioner archetype (Bomber).
//!
//! Keeps its distance: whenever the target closes inside the escape
//! distance it flees to a random patrol anchor far enough from the target,
//! then aims and lobs a bomb. The throw decision (lob vs. clean shot) is
//! made once, at throw initiation, from a line-of-sight check and stays
//! committed through the wind-up even if the line of sight changes.

use ashkettle_common::Vec3;
use tracing::debug;

use crate::ballistics::{launch_velocity, ThrowProfile};
use crate::enemy::EnemyCore;
use crate::rng::GameRng;
use crate::services::{Navigation, Presentation, SpatialQuery, SurfaceTag, TargetProvider};
use crate::tasks::TaskKind;

/// Distance inside which the bomber flees, and outside which patrol anchors
/// are eligible.
pub const ESCAPE_DISTANCE: f32 = 10.0;
/// Seconds between committing to a throw and releasing the bomb.
const WINDUP_SECS: f32 = 2.0;
/// Height of the throw point above the bomber's position.
const THROW_POINT_HEIGHT: f32 = 1.5;
/// Aim at the target's upper body for the line-of-sight check.
const TARGET_CHEST_HEIGHT: f32 = 1.0;

/// State of a bomber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BomberState {
    /// Fleeing to (or travelling towards) a safe patrol anchor.
    #[default]
    Reposition,
    /// Settled: evaluating and starting throws.
    Aim,
    /// Wind-up committed; waiting for the release timer.
    Throw,
}

/// A bomb release produced by a finished wind-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowRelease {
    /// Where the bomb leaves the thrower.
    pub origin: Vec3,
    /// Initial bomb velocity.
    pub velocity: Vec3,
}

/// Per-entity bomber behavior.
#[derive(Debug, Clone, Default)]
pub struct Bomber {
    /// Current state.
    pub state: BomberState,
    committed_profile: Option<ThrowProfile>,
    destination_requested: bool,
}

impl Bomber {
    /// Creates a bomber that starts by looking for a safe spot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The throw profile committed at wind-up start, if mid-throw.
    #[must_use]
    pub fn committed_profile(&self) -> Option<ThrowProfile> {
        self.committed_profile
    }

    /// One AI evaluation.
    ///
    /// `fired` contains the task kinds that elapsed on this entity during
    /// this tick; a fired [`TaskKind::ThrowWindup`] releases the bomb and
    /// the returned [`ThrowRelease`] tells the caller to spawn it.
    #[allow(clippy::too_many_arguments)]
    pub fn update<Q, N, P, T>(
        &mut self,
        core: &mut EnemyCore,
        fired: &[TaskKind],
        anchors: &[Vec3],
        spatial: &Q,
        navigation: &mut N,
        presentation: &mut P,
        target: &T,
        rng: &mut GameRng,
    ) -> Option<ThrowRelease>
    where
        Q: SpatialQuery,
        N: Navigation,
        P: Presentation,
        T: TargetProvider,
    {
        if core.dead || core.is_frozen() {
            return None;
        }
        let Some(target_pos) = target.target_position() else {
            return None;
        };
        if !navigation.is_enabled() {
            return None;
        }

        if self.state == BomberState::Throw {
            // Committed: only the release timer matters.
            if fired.contains(&TaskKind::ThrowWindup) {
                let release = self.release(core, target_pos);
                self.state = BomberState::Aim;
                return release;
            }
            return None;
        }

        // Target closing in overrides whatever we were doing.
        if core.position.distance(target_pos) <= ESCAPE_DISTANCE {
            if self.state != BomberState::Reposition {
                debug!(enemy = core.kind.display_name(), "target too close, repositioning");
            }
            self.state = BomberState::Reposition;
            self.destination_requested = false;
        }

        match self.state {
            BomberState::Reposition => {
                if !navigation.is_path_pending()
                    && navigation.remaining_distance() <= navigation.stopping_distance()
                {
                    if self.destination_requested {
                        // Arrived at the chosen anchor.
                        self.destination_requested = false;
                        self.state = BomberState::Aim;
                    } else {
                        self.choose_anchor(anchors, target_pos, navigation, rng);
                    }
                }
                None
            }
            BomberState::Aim => {
                let profile = self.pick_profile(core.position, target_pos, spatial);
                let launch = throw_point(core.position);
                if profile.solve(launch, target_pos).is_some() {
                    self.committed_profile = Some(profile);
                    self.state = BomberState::Throw;
                    presentation.play_animation_trigger("attack");
                    core.tasks.schedule(TaskKind::ThrowWindup, WINDUP_SECS);
                }
                // No solution: skip this cycle, try again next tick.
                None
            }
            BomberState::Throw => None,
        }
    }

    /// Re-solves with the committed profile and builds the release velocity.
    /// A target that moved out of reach mid-wind-up wastes the throw.
    fn release(&mut self, core: &EnemyCore, target_pos: Vec3) -> Option<ThrowRelease> {
        let profile = self.committed_profile.take()?;
        let launch = throw_point(core.position);
        let solution = profile.solve(launch, target_pos)?;
        Some(ThrowRelease {
            origin: launch,
            velocity: launch_velocity(&solution, profile.speed),
        })
    }

    /// Picks a random patrol anchor farther from the target than the escape
    /// distance. With no eligible anchor the bomber stays put and retries
    /// next tick.
    fn choose_anchor<N: Navigation>(
        &mut self,
        anchors: &[Vec3],
        target_pos: Vec3,
        navigation: &mut N,
        rng: &mut GameRng,
    ) {
        let eligible: Vec<Vec3> = anchors
            .iter()
            .copied()
            .filter(|a| a.distance(target_pos) > ESCAPE_DISTANCE)
            .collect();
        if let Some(anchor) = rng.choose(&eligible) {
            navigation.set_destination(*anchor);
            self.destination_requested = true;
        }
    }

    /// Clear line of sight to the target's upper body means a flat, fast
    /// throw; anything in the way means a high lob.
    fn pick_profile<Q: SpatialQuery>(
        &self,
        position: Vec3,
        target_pos: Vec3,
        spatial: &Q,
    ) -> ThrowProfile {
        let origin = throw_point(position);
        let aim = target_pos + Vec3::Y * TARGET_CHEST_HEIGHT - origin;
        let distance = aim.length();
        if distance <= f32::EPSILON {
            return ThrowProfile::LOB;
        }

        let hits = spatial.raycast_all(origin, aim / distance, distance);
        let nearest = hits.iter().min_by(|a, b| {
            let da = a.point.distance_squared(origin);
            let db = b.point.distance_squared(origin);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });

        match nearest {
            Some(hit) if hit.tag == SurfaceTag::Player => ThrowProfile::CLEAN_SHOT,
            _ => ThrowProfile::LOB,
        }
    }
}

fn throw_point(position: Vec3) -> Vec3 {
    position + Vec3::Y * THROW_POINT_HEIGHT
}
