//! Combat session: the owning context for one run.
//!
//! A [`Session`] holds everything the simulation needs for a scene: the
//! player, the live enemy table, in-flight bombs, the spawn director, the
//! arena geometry, the event bus, the contact queue and the seeded RNG.
//! `tick` advances the whole simulation one step: spawning, each enemy's AI
//! run to completion, bomb flight, contact resolution, body cleanup.
//! Pausing freezes every timer.
//!
//! The host engine is reached through an [`EngineBridge`], which answers
//! spatial queries, owns entity lifecycle, and hands out per-entity
//! navigation and presentation handles.

use ashkettle_common::{EntityId, Vec3};
use tracing::debug;

use crate::bomb::Bomb;
use crate::bomber::Bomber;
use crate::boss::{Arena, Boss, BossAction};
use crate::contacts::{Contact, ContactQueue};
use crate::economy::COLLECTIBLE_VALUE;
use crate::enemy::{DamageOutcome, EnemyCore, EnemyKind};
use crate::events::{EventBus, GameEvent};
use crate::melee::MeleeChaser;
use crate::player::Player;
use crate::rng::GameRng;
use crate::services::{
    MockMutator, MockNavigation, MockWorld, Navigation, Presentation, RecordingPresentation,
    SpatialQuery, SurfaceTag, WorldMutation,
};
use crate::spawn::{SpawnDirector, SpawnPad};

/// Host-engine integration point for a session.
pub trait EngineBridge {
    /// Spatial query implementation.
    type Spatial: SpatialQuery;
    /// Per-agent navigation handle.
    type Nav: Navigation;
    /// Per-entity presentation sink.
    type Pres: Presentation;
    /// Entity lifecycle sink.
    type Mutator: WorldMutation;

    /// Spatial queries.
    fn spatial(&self) -> &Self::Spatial;
    /// Entity lifecycle.
    fn mutator(&mut self) -> &mut Self::Mutator;
    /// Both at once, for operations that query and mutate in one pass.
    fn split(&mut self) -> (&Self::Spatial, &mut Self::Mutator);
    /// Creates a navigation agent for a newly spawned enemy.
    fn make_navigation(&mut self, entity: EntityId, position: Vec3, speed: f32) -> Self::Nav;
    /// Creates a presentation handle for a newly spawned entity.
    fn make_presentation(&mut self, entity: EntityId) -> Self::Pres;
}

/// In-process bridge backed by the service mocks, for tests and headless
/// runs.
#[derive(Debug, Default)]
pub struct MockBridge {
    /// Flat-ground spatial mock.
    pub world: MockWorld,
    /// Recorded entity lifecycle.
    pub mutator: MockMutator,
}

impl EngineBridge for MockBridge {
    type Spatial = MockWorld;
    type Nav = MockNavigation;
    type Pres = RecordingPresentation;
    type Mutator = MockMutator;

    fn spatial(&self) -> &MockWorld {
        &self.world
    }

    fn mutator(&mut self) -> &mut MockMutator {
        &mut self.mutator
    }

    fn split(&mut self) -> (&MockWorld, &mut MockMutator) {
        (&self.world, &mut self.mutator)
    }

    fn make_navigation(&mut self, _entity: EntityId, position: Vec3, speed: f32) -> MockNavigation {
        MockNavigation {
            position,
            current_speed: speed,
            ..MockNavigation::default()
        }
    }

    fn make_presentation(&mut self, _entity: EntityId) -> RecordingPresentation {
        RecordingPresentation::default()
    }
}

/// Archetype behavior attached to a live enemy.
#[derive(Debug)]
enum Behavior {
    Melee(MeleeChaser),
    Bomber(Bomber),
    Boss(Box<Boss>),
}

/// A live enemy with its per-entity service handles.
struct EnemyEntry<B: EngineBridge> {
    core: EnemyCore,
    behavior: Behavior,
    nav: B::Nav,
    pres: B::Pres,
}

struct BombEntry<B: EngineBridge> {
    bomb: Bomb,
    pres: B::Pres,
}

/// Static setup for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Player spawn position.
    pub player_spawn: Vec3,
    /// Spawn pads for random enemies.
    pub spawn_pads: Vec<SpawnPad>,
    /// Minimum random spawn delay, before cycle scaling.
    pub min_spawn_delay: f32,
    /// Maximum random spawn delay, before cycle scaling.
    pub max_spawn_delay: f32,
    /// Patrol anchors bombers flee to.
    pub patrol_anchors: Vec<Vec3>,
    /// Boss arena geometry.
    pub arena: Arena,
    /// Current scene number, 1-based.
    pub scene: usize,
    /// Cycles completed before this session.
    pub cycles_completed: u32,
    /// RNG seed for the whole session.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player_spawn: Vec3::ZERO,
            spawn_pads: vec![SpawnPad {
                center: Vec3::new(0.0, 0.0, 15.0),
                size: Vec3::new(10.0, 0.0, 4.0),
            }],
            min_spawn_delay: 1.0,
            max_spawn_delay: 3.0,
            patrol_anchors: vec![
                Vec3::new(25.0, 0.0, 0.0),
                Vec3::new(-25.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 25.0),
                Vec3::new(0.0, 0.0, -25.0),
            ],
            arena: Arena::default(),
            scene: 1,
            cycles_completed: 0,
            seed: 0,
        }
    }
}

/// One run's simulation state.
pub struct Session<B: EngineBridge> {
    /// The player.
    pub player: Player,
    /// Boss arena geometry, mutated by boss transitions.
    pub arena: Arena,
    enemies: Vec<EnemyEntry<B>>,
    bombs: Vec<BombEntry<B>>,
    spawner: SpawnDirector,
    patrol_anchors: Vec<Vec3>,
    events: EventBus,
    contacts: ContactQueue,
    rng: GameRng,
    scene: usize,
    elapsed: f32,
    paused: bool,
    lava_warning: bool,
    boss_defeated: bool,
}

impl<B: EngineBridge> Session<B> {
    /// Creates a session from config.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let mut rng = GameRng::new(config.seed);
        let spawner = SpawnDirector::new(
            config.spawn_pads,
            config.min_spawn_delay,
            config.max_spawn_delay,
            config.cycles_completed,
            &mut rng,
        );
        let mut player = Player::new(config.player_spawn);
        player.cycles_completed = config.cycles_completed;
        Self {
            player,
            arena: config.arena,
            enemies: Vec::new(),
            bombs: Vec::new(),
            spawner,
            patrol_anchors: config.patrol_anchors,
            events: EventBus::default(),
            contacts: ContactQueue::new(),
            rng,
            scene: config.scene,
            elapsed: 0.0,
            paused: false,
            lava_warning: false,
            boss_defeated: false,
        }
    }

    /// Total unpaused simulation time.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Whether the simulation is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freezes every timer and all AI.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes the simulation.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether the boss has been defeated this session.
    #[must_use]
    pub fn boss_defeated(&self) -> bool {
        self.boss_defeated
    }

    /// Whether the lava warning indicator should be showing.
    #[must_use]
    pub fn lava_warning_active(&self) -> bool {
        self.lava_warning
    }

    /// Number of live enemies.
    #[must_use]
    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    /// Number of bombs in flight.
    #[must_use]
    pub fn bomb_count(&self) -> usize {
        self.bombs.len()
    }

    /// Whether the current scene's kill quota is met.
    #[must_use]
    pub fn quota_met(&self) -> bool {
        self.player.quota_met(self.scene)
    }

    /// Drains events raised since the last drain.
    pub fn drain_events(&self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// Reports a physics contact. Called by the host's collision layer.
    pub fn report_contact(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    /// The player picked up a dropped collectible.
    pub fn collect_pickup(&mut self) {
        self.player.wallet.earn(COLLECTIBLE_VALUE);
    }

    /// Freezes every live non-boss enemy in place, from the freeze item's
    /// active ability. The boss is too large to freeze.
    pub fn freeze_enemies(&mut self, duration: f32) {
        for entry in &mut self.enemies {
            if !matches!(entry.behavior, Behavior::Boss(_)) {
                entry.core.freeze(duration, &mut entry.pres, &mut entry.nav);
            }
        }
    }

    /// Spawns an enemy of `kind` at `position` and returns its ID. Scene
    /// scripts use this to place the boss; random waves come from the spawn
    /// director during `tick`.
    pub fn spawn_enemy(&mut self, kind: EnemyKind, position: Vec3, bridge: &mut B) -> EntityId {
        let core = EnemyCore::spawn(kind, position, self.player.cycles_completed);
        let id = core.id;
        let behavior = match kind {
            EnemyKind::Goblin | EnemyKind::GoblinElite => Behavior::Melee(MeleeChaser::new()),
            EnemyKind::Bomber => Behavior::Bomber(Bomber::new()),
            EnemyKind::Boss => Behavior::Boss(Box::new(Boss::new())),
        };
        let nav = bridge.make_navigation(id, position, core.speed);
        let pres = bridge.make_presentation(id);
        self.enemies.push(EnemyEntry {
            core,
            behavior,
            nav,
            pres,
        });
        self.events.publish(GameEvent::EnemySpawned {
            entity_id: id,
            kind,
        });
        id
    }

    /// Applies damage to an enemy, from the player's weapons. Raises the
    /// damage and death events and counts the kill.
    pub fn damage_enemy(&mut self, id: EntityId, amount: f32) -> DamageOutcome {
        let Some(entry) = self.enemies.iter_mut().find(|e| e.core.id == id) else {
            return DamageOutcome::Ignored;
        };
        let outcome = entry.core.take_damage(amount, &mut entry.pres, &mut entry.nav);
        match outcome {
            DamageOutcome::Damaged => {
                self.events.publish(GameEvent::EnemyDamaged {
                    entity_id: id,
                    damage: amount,
                });
            }
            DamageOutcome::Died => {
                let kind = entry.core.kind;
                self.events.publish(GameEvent::EnemyDamaged {
                    entity_id: id,
                    damage: amount,
                });
                self.events
                    .publish(GameEvent::EnemyDied { entity_id: id, kind });
                self.player.record_kill();
            }
            DamageOutcome::Ignored => {}
        }
        outcome
    }

    /// Advances the simulation one step. Does nothing while paused.
    pub fn tick(&mut self, dt: f32, bridge: &mut B) {
        if self.paused {
            return;
        }
        self.elapsed += dt;

        if let Some((kind, position)) = self.spawner.tick(dt, &mut self.rng) {
            self.spawn_enemy(kind, position, bridge);
        }

        // Each enemy's timers, then its AI, run to completion before the
        // next enemy is looked at.
        let mut boss_actions = Vec::new();
        let mut throws = Vec::new();
        for entry in &mut self.enemies {
            let fired = entry.core.tick_tasks(dt, &mut entry.pres);
            match &mut entry.behavior {
                Behavior::Melee(chaser) => {
                    chaser.update(&mut entry.core, &mut entry.nav, &mut entry.pres, &self.player);
                }
                Behavior::Bomber(bomber) => {
                    if let Some(release) = bomber.update(
                        &mut entry.core,
                        &fired,
                        &self.patrol_anchors,
                        bridge.spatial(),
                        &mut entry.nav,
                        &mut entry.pres,
                        &self.player,
                        &mut self.rng,
                    ) {
                        throws.push(release);
                    }
                }
                Behavior::Boss(boss) => {
                    boss_actions.extend(boss.update(
                        &mut entry.core,
                        &fired,
                        &mut self.arena,
                        dt,
                        &mut entry.pres,
                        &self.player,
                        &mut self.rng,
                    ));
                }
            }
        }

        for release in throws {
            self.spawn_bomb(release.origin, release.velocity, bridge);
        }
        let mut clear_others = false;
        for action in boss_actions {
            match action {
                BossAction::ThrowBomb { origin, velocity } => {
                    self.spawn_bomb(origin, velocity, bridge);
                }
                BossAction::DropBomb { position } => {
                    self.spawn_bomb(position, Vec3::ZERO, bridge);
                }
                BossAction::PhaseChanged(phase) => {
                    self.events.publish(GameEvent::PhaseChanged { phase });
                }
                BossAction::SetLavaWarning(active) => {
                    self.lava_warning = active;
                }
                BossAction::StopSpawner => {
                    self.spawner.stop();
                }
                BossAction::ClearOtherEnemies => {
                    clear_others = true;
                }
                BossAction::Defeated => {
                    self.boss_defeated = true;
                    self.events.publish(GameEvent::BossDefeated);
                }
            }
        }
        if clear_others {
            self.clear_other_enemies(bridge);
        }

        // Bomb flight; a surface contact goes through the contact queue like
        // any other collision report.
        for entry in &mut self.bombs {
            if entry.bomb.step(dt, bridge.spatial()) {
                self.contacts.push(Contact {
                    entity: entry.bomb.id,
                    other: EntityId::NULL,
                    other_tag: SurfaceTag::Ground,
                });
            }
        }

        self.resolve_contacts(bridge);
        self.cleanup(bridge);
    }

    /// Spawns a bomb in flight. Enemy throws route through this; scene
    /// scripts can use it directly for hazards.
    pub fn spawn_bomb(&mut self, origin: Vec3, velocity: Vec3, bridge: &mut B) {
        let (spatial, mutator) = bridge.split();
        let bomb = Bomb::spawn(
            origin,
            velocity,
            self.player.cycles_completed,
            spatial,
            mutator,
        );
        let pres = bridge.make_presentation(bomb.id);
        self.bombs.push(BombEntry { bomb, pres });
    }

    fn clear_other_enemies(&mut self, bridge: &mut B) {
        let mutator = bridge.mutator();
        self.enemies.retain(|entry| {
            if matches!(entry.behavior, Behavior::Boss(_)) {
                true
            } else {
                mutator.destroy_entity(entry.core.id);
                false
            }
        });
        debug!("cleared non-boss enemies for the final phase");
    }

    fn resolve_contacts(&mut self, bridge: &mut B) {
        for contact in self.contacts.drain() {
            if let Some(entry) = self
                .enemies
                .iter_mut()
                .find(|e| e.core.id == contact.entity)
            {
                // Melee hitbox touch: at most one hit per activation.
                if contact.other_tag == SurfaceTag::Player
                    && matches!(entry.behavior, Behavior::Melee(_))
                {
                    let damage = entry.core.damage;
                    if MeleeChaser::resolve_player_contact(&mut entry.core, &mut self.player) {
                        self.events.publish(GameEvent::TargetDamaged { damage });
                    }
                }
                continue;
            }

            if let Some(entry) = self
                .bombs
                .iter_mut()
                .find(|e| e.bomb.id == contact.entity)
            {
                let damage = entry.bomb.damage;
                let (spatial, mutator) = bridge.split();
                let hit_target =
                    entry
                        .bomb
                        .explode(spatial, mutator, &mut entry.pres, &mut self.player);
                self.events
                    .publish(GameEvent::ProjectileLanded { hit_target });
                if hit_target {
                    self.events.publish(GameEvent::TargetDamaged { damage });
                }
            }
        }
    }

    fn cleanup(&mut self, bridge: &mut B) {
        let mutator = bridge.mutator();
        for entry in &mut self.enemies {
            if entry.core.dead && !entry.core.is_cleared() {
                let dropped = entry.core.clear_body(&mut self.rng, mutator);
                if dropped {
                    self.events.publish(GameEvent::LootDropped {
                        entity_id: entry.core.id,
                    });
                }
            }
        }
        self.enemies.retain(|entry| !entry.core.is_cleared());
        self.bombs.retain(|entry| !entry.bomb.is_spent());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Config with spawn delays long enough that the director stays quiet.
    fn quiet_config() -> SessionConfig {
        SessionConfig {
            min_spawn_delay: 1000.0,
            max_spawn_delay: 1000.0,
            seed: 7,
            ..SessionConfig::default()
        }
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut bridge = MockBridge::default();
        let mut session = Session::new(SessionConfig {
            min_spawn_delay: 1.0,
            max_spawn_delay: 1.0,
            seed: 3,
            ..SessionConfig::default()
        });
        session.pause();
        for _ in 0..10 {
            session.tick(5.0, &mut bridge);
        }
        assert_eq!(session.elapsed(), 0.0);
        assert_eq!(session.enemy_count(), 0);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_director_spawn_raises_event() {
        let mut bridge = MockBridge::default();
        let mut session = Session::new(SessionConfig {
            min_spawn_delay: 1.0,
            max_spawn_delay: 1.0,
            seed: 11,
            ..SessionConfig::default()
        });
        session.tick(1.5, &mut bridge);
        assert_eq!(session.enemy_count(), 1);
        let events = session.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::EnemySpawned { .. })));
    }

    #[test]
    fn test_damage_enemy_to_death_counts_kill() {
        let mut bridge = MockBridge::default();
        let mut session = Session::new(quiet_config());
        let id = session.spawn_enemy(EnemyKind::Goblin, Vec3::new(0.0, 0.0, 8.0), &mut bridge);
        session.drain_events();

        assert_eq!(session.damage_enemy(id, 40.0), DamageOutcome::Damaged);
        assert_eq!(session.damage_enemy(id, 100.0), DamageOutcome::Died);
        assert_eq!(session.player.enemies_killed, 1);

        let events = session.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::EnemyDied { kind: EnemyKind::Goblin, .. })));

        // The next step clears the body out of the table.
        session.tick(0.016, &mut bridge);
        assert_eq!(session.enemy_count(), 0);
    }

    #[test]
    fn test_damage_unknown_enemy_is_ignored() {
        let mut session: Session<MockBridge> = Session::new(quiet_config());
        assert_eq!(
            session.damage_enemy(EntityId::from_raw(999_999), 10.0),
            DamageOutcome::Ignored
        );
    }

    #[test]
    fn test_melee_contact_damages_player_once_per_tick() {
        let mut bridge = MockBridge::default();
        let mut session = Session::new(quiet_config());
        let id = session.spawn_enemy(EnemyKind::Goblin, Vec3::new(1.0, 0.0, 0.0), &mut bridge);

        // One step so the chaser closes in and arms its hitbox, then two
        // identical contact reports; the queue dedups them.
        session.tick(0.016, &mut bridge);
        for _ in 0..2 {
            session.report_contact(Contact {
                entity: id,
                other: EntityId::NULL,
                other_tag: SurfaceTag::Player,
            });
        }
        session.tick(0.016, &mut bridge);

        assert_eq!(session.player.health, 90.0);
        let events = session.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::TargetDamaged { damage } if *damage == 10.0)));
    }

    #[test]
    fn test_dropped_bomb_lands_and_explodes() {
        let mut bridge = MockBridge::default();
        let mut session = Session::new(quiet_config());
        session.spawn_bomb(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, &mut bridge);
        assert_eq!(session.bomb_count(), 1);

        for _ in 0..40 {
            session.tick(0.1, &mut bridge);
        }
        assert_eq!(session.bomb_count(), 0);
        let events = session.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::ProjectileLanded { hit_target: false })));
    }

    #[test]
    fn test_bomb_explosion_damages_player_in_radius() {
        let mut bridge = MockBridge::default();
        bridge.world.overlaps = vec![(EntityId::from_raw(1), SurfaceTag::Player)];
        let mut session = Session::new(quiet_config());
        session.spawn_bomb(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, &mut bridge);

        for _ in 0..40 {
            session.tick(0.1, &mut bridge);
        }
        assert_eq!(session.player.health, 75.0);
        let events = session.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::ProjectileLanded { hit_target: true })));
    }

    #[test]
    fn test_boss_death_raises_defeated() {
        let mut bridge = MockBridge::default();
        let mut session = Session::new(quiet_config());
        let id = session.spawn_enemy(EnemyKind::Boss, Vec3::new(0.0, 0.0, 10.0), &mut bridge);

        assert_eq!(session.damage_enemy(id, 10_000.0), DamageOutcome::Died);
        session.tick(0.016, &mut bridge);

        assert!(session.boss_defeated());
        let events = session.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::BossDefeated)));
    }

    #[test]
    fn test_clearing_keeps_only_the_boss() {
        let mut bridge = MockBridge::default();
        let mut session = Session::new(quiet_config());
        session.spawn_enemy(EnemyKind::Boss, Vec3::ZERO, &mut bridge);
        session.spawn_enemy(EnemyKind::Goblin, Vec3::new(5.0, 0.0, 0.0), &mut bridge);
        session.spawn_enemy(EnemyKind::Bomber, Vec3::new(-5.0, 0.0, 0.0), &mut bridge);

        session.clear_other_enemies(&mut bridge);

        assert_eq!(session.enemy_count(), 1);
        assert_eq!(bridge.mutator.destroyed.len(), 2);
    }

    #[test]
    fn test_freeze_spares_the_boss() {
        let mut bridge = MockBridge::default();
        let mut session = Session::new(quiet_config());
        session.spawn_enemy(EnemyKind::Boss, Vec3::ZERO, &mut bridge);
        session.spawn_enemy(EnemyKind::Goblin, Vec3::new(5.0, 0.0, 0.0), &mut bridge);

        session.freeze_enemies(3.0);

        assert!(!session.enemies[0].core.is_frozen());
        assert!(session.enemies[1].core.is_frozen());
        assert!(session.enemies[1].nav.stopped);
    }

    #[test]
    fn test_collect_pickup_pays_out() {
        let mut session: Session<MockBridge> = Session::new(quiet_config());
        session.collect_pickup();
        session.collect_pickup();
        assert_eq!(session.player.wallet.balance(), 300);
    }

    #[test]
    fn test_quota_tracks_scene_and_kills() {
        let mut session: Session<MockBridge> = Session::new(quiet_config());
        assert!(!session.quota_met());
        for _ in 0..5 {
            session.player.record_kill();
        }
        assert!(session.quota_met());
    }
}
