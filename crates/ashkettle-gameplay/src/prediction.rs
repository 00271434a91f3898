//! Projectile landing prediction.
//!
//! Forecasts where a ballistic projectile will first strike a ground-like
//! surface by stepping its kinematics at a fixed timestep and raycasting each
//! travelled segment. Used to pre-place an impact warning indicator before a
//! bomb is thrown. Purely kinematic: identical inputs always produce the
//! identical landing point.

use ashkettle_common::Vec3;

use crate::services::SpatialQuery;

/// Simulation timestep for the forecast, in seconds.
const TIMESTEP: f32 = 0.1;
/// Give up after this much simulated flight time.
const MAX_SIM_TIME: f32 = 10.0;
/// Offset along the surface normal so indicators sit on top of the surface.
const SURFACE_OFFSET: f32 = 0.1;

/// Predicts the first ground-like impact of a projectile.
///
/// `gravity` points downward as an acceleration vector (usually
/// `(0, -9.81, 0)`). Returns `None` when the simulation horizon elapses
/// without the trajectory crossing a ground-like surface.
#[must_use]
pub fn predict_landing<W: SpatialQuery>(
    origin: Vec3,
    velocity: Vec3,
    gravity: Vec3,
    world: &W,
) -> Option<Vec3> {
    let mut position = origin;
    let mut current_velocity = velocity;
    let mut sim_time = 0.0;

    while sim_time < MAX_SIM_TIME {
        let next_velocity = current_velocity + gravity * TIMESTEP;
        let next_position = position + current_velocity * TIMESTEP;

        let segment = next_position - position;
        let distance = segment.length();
        if distance > f32::EPSILON {
            let direction = segment / distance;
            for hit in world.raycast_all(position, direction, distance) {
                if hit.tag.is_ground_like() {
                    return Some(hit.point + hit.normal * SURFACE_OFFSET);
                }
            }
        }

        position = next_position;
        current_velocity = next_velocity;
        sim_time += TIMESTEP;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockWorld;
    use ashkettle_common::GRAVITY;

    #[test]
    fn test_straight_drop_lands_below() {
        let world = MockWorld::default();
        let height = 20.0;
        let origin = Vec3::new(3.0, height, -2.0);

        let landing = predict_landing(
            origin,
            Vec3::ZERO,
            Vec3::new(0.0, -GRAVITY, 0.0),
            &world,
        )
        .expect("flat ground must be found");

        assert!((landing.x - origin.x).abs() < 1e-4);
        assert!((landing.z - origin.z).abs() < 1e-4);
        // Landed on the plane, nudged up along the normal.
        assert!(landing.y >= 0.0 && landing.y <= SURFACE_OFFSET + 1e-4);

        // Free-fall from 20 units takes ~2 seconds; well inside the horizon
        // even with the coarse timestep (h/g * safety factor).
        let fall_time = (2.0 * height / GRAVITY).sqrt();
        assert!(fall_time * 2.0 < MAX_SIM_TIME);
    }

    #[test]
    fn test_arc_lands_down_range() {
        let world = MockWorld::default();
        let origin = Vec3::new(0.0, 1.0, 0.0);
        let velocity = Vec3::new(8.0, 6.0, 0.0);

        let landing = predict_landing(
            origin,
            velocity,
            Vec3::new(0.0, -GRAVITY, 0.0),
            &world,
        )
        .expect("arc comes back down");

        assert!(landing.x > 0.0);
        assert!(landing.z.abs() < 1e-4);
    }

    #[test]
    fn test_no_ground_within_horizon() {
        // Ground plane far below anything a 10 second fall can reach from
        // rest is unreachable within the horizon.
        let world = MockWorld {
            ground_height: -10_000.0,
            ..MockWorld::default()
        };
        let landing = predict_landing(
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::new(0.0, -GRAVITY, 0.0),
            &world,
        );
        assert!(landing.is_none());
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let world = MockWorld::default();
        let origin = Vec3::new(1.0, 5.0, 1.0);
        let velocity = Vec3::new(3.0, 2.0, -1.0);
        let gravity = Vec3::new(0.0, -GRAVITY, 0.0);

        let a = predict_landing(origin, velocity, gravity, &world);
        let b = predict_landing(origin, velocity, gravity, &world);
        assert_eq!(a, b);
    }
}
