//! Event bus for combat notifications.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use ashkettle_common::EntityId;

use crate::boss::BossPhase;
use crate::enemy::EnemyKind;

/// Events raised by the combat simulation during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An enemy was spawned.
    EnemySpawned {
        /// Entity ID.
        entity_id: EntityId,
        /// Archetype.
        kind: EnemyKind,
    },
    /// An enemy took damage.
    EnemyDamaged {
        /// Entity ID.
        entity_id: EntityId,
        /// Damage amount.
        damage: f32,
    },
    /// An enemy died.
    EnemyDied {
        /// Entity ID.
        entity_id: EntityId,
        /// Archetype.
        kind: EnemyKind,
    },
    /// A collectible dropped from a cleared body.
    LootDropped {
        /// Entity the loot dropped from.
        entity_id: EntityId,
    },
    /// The boss started a phase transition.
    PhaseChanged {
        /// New phase.
        phase: BossPhase,
    },
    /// The boss died; the run is won.
    BossDefeated,
    /// A bomb landed and detonated.
    ProjectileLanded {
        /// Whether the detonation damaged the target.
        hit_target: bool,
    },
    /// The target took damage.
    TargetDamaged {
        /// Damage amount.
        damage: f32,
    },
}

/// Bounded broadcast channel for [`GameEvent`]s.
#[derive(Debug)]
pub struct EventBus {
    sender: Sender<GameEvent>,
    receiver: Receiver<GameEvent>,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event. Never blocks; a full bus drops the event.
    pub fn publish(&self, event: GameEvent) {
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// A new sender handle for publishing from elsewhere.
    #[must_use]
    pub fn sender(&self) -> Sender<GameEvent> {
        self.sender.clone()
    }
}
