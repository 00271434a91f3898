//! Math helpers for the combat simulation.
//!
//! Thin additions on top of `glam` for patterns the simulation uses
//! constantly: horizontal (XZ-plane) projections for aiming and distance
//! checks, and clamped constant-speed motion for scripted movement.

pub use glam::Vec3;

/// Default gravity magnitude (units/s²), matching the engine default.
pub const GRAVITY: f32 = 9.81;

/// Projects a vector onto the horizontal (XZ) plane.
#[must_use]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Horizontal (XZ-plane) distance between two points.
#[must_use]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    horizontal(b - a).length()
}

/// Moves `from` towards `to` by at most `max_delta`, never overshooting.
///
/// Scripted arena motion (boss sink/rise, door slides, lava/column rises)
/// advances with this every tick.
#[must_use]
pub fn move_towards(from: Vec3, to: Vec3, max_delta: f32) -> Vec3 {
    let delta = to - from;
    let dist = delta.length();
    if dist <= max_delta || dist <= f32::EPSILON {
        return to;
    }
    from + delta / dist * max_delta
}

/// Unit direction from `from` to `to` projected onto the horizontal plane.
///
/// Returns `None` when the two points share an XZ position (facing would be
/// undefined).
#[must_use]
pub fn flat_look_direction(from: Vec3, to: Vec3) -> Option<Vec3> {
    let flat = horizontal(to - from);
    if flat.length_squared() > 0.001 {
        Some(flat.normalize())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_zeroes_y() {
        let v = Vec3::new(1.0, 5.0, 2.0);
        assert_eq!(horizontal(v), Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn test_horizontal_distance_ignores_height() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 100.0, 4.0);
        assert!((horizontal_distance(a, b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_move_towards_steps_by_delta() {
        let from = Vec3::ZERO;
        let to = Vec3::new(10.0, 0.0, 0.0);
        let stepped = move_towards(from, to, 1.0);
        assert!((stepped.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_move_towards_never_overshoots() {
        let from = Vec3::new(9.9, 0.0, 0.0);
        let to = Vec3::new(10.0, 0.0, 0.0);
        assert_eq!(move_towards(from, to, 5.0), to);
    }

    #[test]
    fn test_flat_look_direction_degenerate() {
        let p = Vec3::new(1.0, 0.0, 1.0);
        let above = Vec3::new(1.0, 10.0, 1.0);
        assert!(flat_look_direction(p, above).is_none());
    }

    #[test]
    fn test_flat_look_direction_unit_length() {
        let dir = flat_look_direction(Vec3::ZERO, Vec3::new(3.0, 2.0, 4.0))
            .expect("direction defined");
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert_eq!(dir.y, 0.0);
    }
}
