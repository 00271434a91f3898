//! Thrown bomb projectiles.
//!
//! A bomb forecasts its own landing point the moment it is spawned and
//! places an impact warning indicator there. On its first surface contact
//! it explodes: one overlap query, damage to the target at most once, then
//! both the indicator and the bomb itself are destroyed.

use ashkettle_common::{EntityId, Vec3, GRAVITY};
use tracing::debug;

use crate::enemy::CYCLE_STAT_GROWTH;
use crate::prediction::predict_landing;
use crate::services::{
    Presentation, SpatialQuery, SpawnKind, SurfaceTag, TargetProvider, WorldMutation,
};

/// Explosion radius.
pub const BOMB_RADIUS: f32 = 2.0;
/// Base explosion damage before cycle scaling.
pub const BOMB_DAMAGE: f32 = 25.0;

/// A live bomb in flight.
#[derive(Debug, Clone)]
pub struct Bomb {
    /// Host entity handle for this bomb.
    pub id: EntityId,
    /// Current position.
    pub position: Vec3,
    /// Current velocity. A rain bomb starts from rest and just falls.
    pub velocity: Vec3,
    /// Explosion damage, scaled by completed cycles at spawn.
    pub damage: f32,
    indicator: Option<EntityId>,
    exploded: bool,
}

impl Bomb {
    /// Spawns a bomb, forecasting its landing and placing the warning
    /// indicator there. An unpredictable landing (nothing below within the
    /// simulation horizon) gets no indicator.
    pub fn spawn<Q, W>(
        origin: Vec3,
        velocity: Vec3,
        cycles_completed: u32,
        spatial: &Q,
        world: &mut W,
    ) -> Self
    where
        Q: SpatialQuery,
        W: WorldMutation,
    {
        let id = world.spawn_entity(SpawnKind::Bomb, origin);
        let indicator = predict_landing(origin, velocity, Vec3::Y * -GRAVITY, spatial)
            .map(|landing| world.spawn_entity(SpawnKind::ImpactWarning, landing));
        let damage = BOMB_DAMAGE * (1.0 + CYCLE_STAT_GROWTH * cycles_completed as f32);
        Self {
            id,
            position: origin,
            velocity,
            damage,
            indicator,
            exploded: false,
        }
    }

    /// Advances the bomb one fixed step under gravity. Returns true when the
    /// swept segment for this step hits a surface; the bomb stops at the
    /// contact point and the caller queues the contact.
    pub fn step<Q: SpatialQuery>(&mut self, dt: f32, spatial: &Q) -> bool {
        if self.exploded {
            return false;
        }

        let next_velocity = self.velocity + Vec3::Y * -GRAVITY * dt;
        let next_position = self.position + self.velocity * dt;

        let segment = next_position - self.position;
        let distance = segment.length();
        if distance > f32::EPSILON {
            let hits = spatial.raycast_all(self.position, segment / distance, distance);
            // Hits come back unordered; stop at the first surface along the
            // segment.
            let nearest = hits.iter().min_by(|a, b| {
                let da = a.point.distance_squared(self.position);
                let db = b.point.distance_squared(self.position);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            });
            if let Some(hit) = nearest {
                self.position = hit.point;
                return true;
            }
        }

        self.position = next_position;
        self.velocity = next_velocity;
        false
    }

    /// Detonates: one overlap query, damage delivered to the target at most
    /// once, indicator and bomb destroyed. Later calls do nothing. Returns
    /// whether the target was damaged.
    pub fn explode<Q, W, P, T>(
        &mut self,
        spatial: &Q,
        world: &mut W,
        presentation: &mut P,
        target: &mut T,
    ) -> bool
    where
        Q: SpatialQuery,
        W: WorldMutation,
        P: Presentation,
        T: TargetProvider,
    {
        if self.exploded {
            return false;
        }
        self.exploded = true;

        presentation.play_sound("explosion");

        let mut hit_target = false;
        for (_, tag) in spatial.overlap_sphere(self.position, BOMB_RADIUS) {
            if tag == SurfaceTag::Player {
                target.apply_damage_to_target(self.damage);
                hit_target = true;
                break;
            }
        }
        debug!(damage = f64::from(self.damage), hit_target, "bomb exploded");

        if let Some(indicator) = self.indicator.take() {
            world.destroy_entity(indicator);
        }
        world.destroy_entity(self.id);
        hit_target
    }

    /// Whether this bomb has already detonated.
    #[must_use]
    pub fn is_spent(&self) -> bool {
        self.exploded
    }
}
