//! Explicit physics contact queue.
//!
//! The host physics engine reports collision and trigger contacts by pushing
//! [`Contact`] records into this queue; the simulation drains it exactly once
//! per tick. A given (entity, other) pair is delivered at most once per
//! drain, preserving the fires-once-per-contact semantics of engine collision
//! callbacks.

use ashkettle_common::EntityId;
use std::collections::HashSet;

use crate::services::SurfaceTag;

/// A single contact between an entity the simulation owns and another
/// collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    /// The simulation-owned entity (hitbox, projectile).
    pub entity: EntityId,
    /// What it touched.
    pub other: EntityId,
    /// Classification of the touched collider.
    pub other_tag: SurfaceTag,
}

/// Queue of contacts reported since the last drain.
#[derive(Debug, Clone, Default)]
pub struct ContactQueue {
    pending: Vec<Contact>,
}

impl ContactQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports a contact. Called by the physics collaborator.
    pub fn push(&mut self, contact: Contact) {
        self.pending.push(contact);
    }

    /// Number of undrained contacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no contacts are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drains all pending contacts, deduplicated per (entity, other) pair.
    pub fn drain(&mut self) -> Vec<Contact> {
        let mut seen = HashSet::new();
        self.pending
            .drain(..)
            .filter(|c| seen.insert((c.entity, c.other)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(entity: u64, other: u64) -> Contact {
        Contact {
            entity: EntityId::from_raw(entity),
            other: EntityId::from_raw(other),
            other_tag: SurfaceTag::Player,
        }
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = ContactQueue::new();
        queue.push(contact(1, 2));
        assert_eq!(queue.len(), 1);

        let drained = queue.drain();
        assert_eq!(drained.len(), 1);
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_duplicate_pairs_delivered_once() {
        let mut queue = ContactQueue::new();
        queue.push(contact(1, 2));
        queue.push(contact(1, 2));
        queue.push(contact(1, 3));

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
    }

    #[test]
    fn test_pairs_are_directional() {
        let mut queue = ContactQueue::new();
        queue.push(contact(1, 2));
        queue.push(contact(2, 1));
        assert_eq!(queue.drain().len(), 2);
    }
}
