//! Contact begin/end reporting
//!
//! After every tick the set of entity pairs in contact is compared with the
//! previous tick's set. New pairs produce [`ContactKind::Enter`] events and
//! vanished pairs produce [`ContactKind::Exit`] events.
//!
//! Blocking contacts are found by the moves bodies attempt, not by resting
//! overlap: a body is in contact with whatever stopped it this tick. A body
//! that stays asleep attempts no move, so its contacts from the previous tick
//! are carried over for as long as neither side moves.

use super::collision::broad_phase::{brute_force_pairs, sweep_and_prune, BroadPhaseEntry};
use super::collision::narrow_phase;
use super::rigidbody::TickScene;
use glam::Vec3;
use hecs::Entity;
use std::collections::HashSet;
use tracing::debug;

/// Below this many colliders the broad phase just tests every pair
const BRUTE_FORCE_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Enter,
    Exit,
}

/// Two entities in contact, the lower entity id first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContactPair {
    pub entity_a: Entity,
    pub entity_b: Entity,
    /// At least one side is a trigger collider
    pub is_trigger: bool,
}

impl ContactPair {
    pub fn new(a: Entity, b: Entity, is_trigger: bool) -> Self {
        let (entity_a, entity_b) = if a.id() <= b.id() { (a, b) } else { (b, a) };
        Self {
            entity_a,
            entity_b,
            is_trigger,
        }
    }

    /// Does this pair involve `entity`?
    pub fn involves(&self, entity: Entity) -> bool {
        self.entity_a == entity || self.entity_b == entity
    }

    fn key(&self) -> (Entity, Entity) {
        (self.entity_a, self.entity_b)
    }
}

/// A pair starting or ending contact
///
/// For blocking pairs, `Exit` means the pair stopped pressing into each
/// other: a body that was pushed back and no longer moves toward the other
/// side leaves contact even when the two still share an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub kind: ContactKind,
    pub entity_a: Entity,
    pub entity_b: Entity,
    pub is_trigger: bool,
}

impl ContactEvent {
    fn new(kind: ContactKind, pair: &ContactPair) -> Self {
        Self {
            kind,
            entity_a: pair.entity_a,
            entity_b: pair.entity_b,
            is_trigger: pair.is_trigger,
        }
    }
}

/// Remembers which pairs touched last tick
#[derive(Debug, Default)]
pub struct ContactTracker {
    active: Vec<ContactPair>,
    events: Vec<ContactEvent>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs in contact as of the last recorded tick
    pub fn active(&self) -> &[ContactPair] {
        &self.active
    }

    /// Events recorded since the last [`ContactTracker::clear_events`]
    pub fn events(&self) -> &[ContactEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Compare this tick's pairs with the previous tick's
    pub fn record_tick(&mut self, mut current: Vec<ContactPair>) {
        current.sort_by_key(|pair| (pair.entity_a.id(), pair.entity_b.id()));
        current.dedup_by_key(|pair| pair.key());

        let previous: HashSet<(Entity, Entity)> = self.active.iter().map(ContactPair::key).collect();
        let now: HashSet<(Entity, Entity)> = current.iter().map(ContactPair::key).collect();

        for pair in current.iter().filter(|pair| !previous.contains(&pair.key())) {
            debug!(a = ?pair.entity_a, b = ?pair.entity_b, trigger = pair.is_trigger, "Contact enter");
            self.events.push(ContactEvent::new(ContactKind::Enter, pair));
        }
        for pair in self.active.iter().filter(|pair| !now.contains(&pair.key())) {
            debug!(a = ?pair.entity_a, b = ?pair.entity_b, trigger = pair.is_trigger, "Contact exit");
            self.events.push(ContactEvent::new(ContactKind::Exit, pair));
        }

        self.active = current;
    }
}

/// Blocking contacts of bodies that slept through this tick
///
/// `start` holds every collider position from before the bodies were
/// integrated. A previous pair is kept while one side is in `asleep` and
/// neither collider moved.
pub(crate) fn resting_contacts(
    scene: &TickScene,
    start: &[Vec3],
    asleep: &HashSet<Entity>,
    previous: &[ContactPair],
) -> Vec<ContactPair> {
    let unmoved = |entity: Entity| {
        scene.collider_of(entity).is_some_and(|index| {
            let entry = &scene.colliders[index];
            !entry.collider.is_trigger && entry.position == start[index]
        })
    };

    previous
        .iter()
        .filter(|pair| !pair.is_trigger)
        .filter(|pair| asleep.contains(&pair.entity_a) || asleep.contains(&pair.entity_b))
        .filter(|pair| unmoved(pair.entity_a) && unmoved(pair.entity_b))
        .copied()
        .collect()
}

/// Pairs overlapping at the end of a tick where at least one side is a trigger
pub(crate) fn trigger_overlaps(scene: &TickScene) -> Vec<ContactPair> {
    if !scene.colliders.iter().any(|entry| entry.collider.is_trigger) {
        return Vec::new();
    }

    let placed: Vec<_> = scene.colliders.iter().map(|entry| entry.placed()).collect();
    let entries: Vec<BroadPhaseEntry> = scene
        .colliders
        .iter()
        .zip(&placed)
        .map(|(entry, placed)| BroadPhaseEntry {
            entity: entry.entity,
            bounds: placed.bounds(),
        })
        .collect();

    let candidates = if entries.len() < BRUTE_FORCE_LIMIT {
        brute_force_pairs(&entries)
    } else {
        sweep_and_prune(&entries)
    };

    candidates
        .into_iter()
        .filter(|&(i, j)| {
            (placed[i].collider.is_trigger || placed[j].collider.is_trigger)
                && narrow_phase::is_touching(&placed[i], &placed[j])
        })
        .map(|(i, j)| ContactPair::new(entries[i].entity, entries[j].entity, true))
        .collect()
}
