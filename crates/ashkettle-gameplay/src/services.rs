//! Engine service interfaces.
//!
//! The simulation never talks to a physics engine, navigation mesh, animator
//! or audio system directly. Everything it needs from the host engine is
//! expressed as one of the traits below, and tests drive the simulation with
//! the mock implementations at the bottom of this module.

use ashkettle_common::{EntityId, Vec3};

/// Classification of a surface hit by a spatial query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceTag {
    /// Walkable ground.
    Ground,
    /// Sliding arena door (counts as ground for landing forecasts).
    LavaDoor,
    /// The player's body.
    Player,
    /// Any other collider.
    Other,
}

impl SurfaceTag {
    /// Whether a projectile landing forecast should stop at this surface.
    #[must_use]
    pub fn is_ground_like(self) -> bool {
        matches!(self, Self::Ground | Self::LavaDoor)
    }
}

/// A single hit returned by a raycast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space impact point.
    pub point: Vec3,
    /// Surface normal at the impact point.
    pub normal: Vec3,
    /// What was hit.
    pub tag: SurfaceTag,
}

/// Spatial queries answered by the host physics engine.
pub trait SpatialQuery {
    /// Casts a ray and returns every hit within `max_distance`, unordered.
    fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RayHit>;

    /// Returns entities whose colliders overlap a sphere.
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<(EntityId, SurfaceTag)>;
}

/// Navigation handled by the host pathfinding system, per-agent.
pub trait Navigation {
    /// Requests a path to `point`.
    fn set_destination(&mut self, point: Vec3);
    /// Remaining distance along the current path.
    fn remaining_distance(&self) -> f32;
    /// Whether a path request is still being computed.
    fn is_path_pending(&self) -> bool;
    /// Distance at which the agent considers itself arrived.
    fn stopping_distance(&self) -> f32;
    /// Whether the agent is enabled at all.
    fn is_enabled(&self) -> bool;
    /// Halts the agent and clears its velocity.
    fn stop(&mut self);
    /// Sets the agent's movement speed.
    fn set_speed(&mut self, speed: f32);
    /// Current movement speed magnitude (drives locomotion blending).
    fn speed(&self) -> f32;
}

/// Presentation sink: animation, audio and material effects.
pub trait Presentation {
    /// Fires a one-shot animation trigger.
    fn play_animation_trigger(&mut self, name: &str);
    /// Sets a boolean animator parameter.
    fn set_animation_bool(&mut self, name: &str, value: bool);
    /// Sets a float animator parameter.
    fn set_animation_float(&mut self, name: &str, value: f32);
    /// Plays a sound clip at the entity.
    fn play_sound(&mut self, clip: &str);
    /// Tints the entity's material (damage flash), `None` restores.
    fn set_flash_color(&mut self, color: Option<[f32; 3]>);
}

/// Read access to the attack target plus damage delivery.
pub trait TargetProvider {
    /// Current target position, if a target exists.
    fn target_position(&self) -> Option<Vec3>;
    /// Applies damage to the target.
    fn apply_damage_to_target(&mut self, amount: f32);
}

/// What kind of entity a world mutation spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpawnKind {
    /// A thrown bomb projectile.
    Bomb,
    /// An impact warning indicator decal.
    ImpactWarning,
    /// A collectible loot drop.
    Collectible,
}

/// World mutation sink: entity lifecycle owned by the host engine.
pub trait WorldMutation {
    /// Spawns an entity of `kind` at `position` and returns its ID.
    fn spawn_entity(&mut self, kind: SpawnKind, position: Vec3) -> EntityId;
    /// Destroys an entity.
    fn destroy_entity(&mut self, entity: EntityId);
    /// Enables or disables an entity without destroying it.
    fn set_entity_active(&mut self, entity: EntityId, active: bool);
}

// ============================================================================
// Mock implementations for tests and headless runs
// ============================================================================

/// Mock spatial query backed by a flat ground plane and optional blockers.
#[derive(Debug, Clone)]
pub struct MockWorld {
    /// Height of the infinite ground plane.
    pub ground_height: f32,
    /// Whether raycasts toward the player connect (line-of-sight).
    pub player_visible: bool,
    /// Entities reported by overlap queries, with their tags.
    pub overlaps: Vec<(EntityId, SurfaceTag)>,
}

impl Default for MockWorld {
    fn default() -> Self {
        Self {
            ground_height: 0.0,
            player_visible: false,
            overlaps: Vec::new(),
        }
    }
}

impl SpatialQuery for MockWorld {
    fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RayHit> {
        let mut hits = Vec::new();

        // Intersect with the ground plane y = ground_height.
        if direction.y.abs() > f32::EPSILON {
            let t = (self.ground_height - origin.y) / direction.y;
            if t >= 0.0 && t <= max_distance {
                hits.push(RayHit {
                    point: origin + direction * t,
                    normal: Vec3::Y,
                    tag: SurfaceTag::Ground,
                });
            }
        }

        if self.player_visible {
            hits.push(RayHit {
                point: origin + direction * max_distance,
                normal: -direction,
                tag: SurfaceTag::Player,
            });
        }

        hits
    }

    fn overlap_sphere(&self, _center: Vec3, _radius: f32) -> Vec<(EntityId, SurfaceTag)> {
        self.overlaps.clone()
    }
}

/// Mock navigation agent that teleports along straight lines.
#[derive(Debug, Clone)]
pub struct MockNavigation {
    /// Current agent position.
    pub position: Vec3,
    /// Requested destination, if any.
    pub destination: Option<Vec3>,
    /// Configured stopping distance.
    pub stopping: f32,
    /// Whether the agent is enabled.
    pub enabled: bool,
    /// Whether the agent has been halted.
    pub stopped: bool,
    /// Current speed setting.
    pub current_speed: f32,
}

impl Default for MockNavigation {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            destination: None,
            stopping: 0.5,
            enabled: true,
            stopped: false,
            current_speed: 0.0,
        }
    }
}

impl Navigation for MockNavigation {
    fn set_destination(&mut self, point: Vec3) {
        self.destination = Some(point);
        self.stopped = false;
    }

    fn remaining_distance(&self) -> f32 {
        self.destination
            .map_or(0.0, |d| (d - self.position).length())
    }

    fn is_path_pending(&self) -> bool {
        false
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.destination = None;
    }

    fn set_speed(&mut self, speed: f32) {
        self.current_speed = speed;
    }

    fn speed(&self) -> f32 {
        self.current_speed
    }
}

/// Presentation sink that records every call for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresentation {
    /// Animation triggers fired, in order.
    pub triggers: Vec<String>,
    /// Animator bools set, in order.
    pub bools: Vec<(String, bool)>,
    /// Animator floats set, in order.
    pub floats: Vec<(String, f32)>,
    /// Sounds played, in order.
    pub sounds: Vec<String>,
    /// Current flash tint, if any.
    pub flash: Option<[f32; 3]>,
}

impl Presentation for RecordingPresentation {
    fn play_animation_trigger(&mut self, name: &str) {
        self.triggers.push(name.to_string());
    }

    fn set_animation_bool(&mut self, name: &str, value: bool) {
        self.bools.push((name.to_string(), value));
    }

    fn set_animation_float(&mut self, name: &str, value: f32) {
        self.floats.push((name.to_string(), value));
    }

    fn play_sound(&mut self, clip: &str) {
        self.sounds.push(clip.to_string());
    }

    fn set_flash_color(&mut self, color: Option<[f32; 3]>) {
        self.flash = color;
    }
}

/// Mock target with a fixed position and a damage tally.
#[derive(Debug, Clone)]
pub struct MockTarget {
    /// Target position reported to AI, `None` simulates a missing target.
    pub position: Option<Vec3>,
    /// Total damage received.
    pub damage_taken: f32,
}

impl MockTarget {
    /// Creates a mock target at `position`.
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position: Some(position),
            damage_taken: 0.0,
        }
    }

    /// Creates a mock with no target present.
    #[must_use]
    pub fn missing() -> Self {
        Self {
            position: None,
            damage_taken: 0.0,
        }
    }
}

impl TargetProvider for MockTarget {
    fn target_position(&self) -> Option<Vec3> {
        self.position
    }

    fn apply_damage_to_target(&mut self, amount: f32) {
        self.damage_taken += amount;
    }
}

/// World mutator that records spawns and despawns.
#[derive(Debug, Clone, Default)]
pub struct MockMutator {
    /// Spawned entities: (id, kind, position).
    pub spawned: Vec<(EntityId, SpawnKind, Vec3)>,
    /// Destroyed entity IDs, in order.
    pub destroyed: Vec<EntityId>,
    /// Activation changes, in order.
    pub activations: Vec<(EntityId, bool)>,
}

impl WorldMutation for MockMutator {
    fn spawn_entity(&mut self, kind: SpawnKind, position: Vec3) -> EntityId {
        let id = EntityId::new();
        self.spawned.push((id, kind, position));
        id
    }

    fn destroy_entity(&mut self, entity: EntityId) {
        self.destroyed.push(entity);
    }

    fn set_entity_active(&mut self, entity: EntityId, active: bool) {
        self.activations.push((entity, active));
    }
}
