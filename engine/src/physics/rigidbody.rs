//! Rigidbody integration for a single physics tick
//!
//! A tick works on a [`TickScene`]: a snapshot of every active collider and
//! rigidbody taken in entity order. Bodies are integrated one after another
//! against that snapshot, so a body sees the moves, velocity transfers and
//! wake-ups of every body integrated before it in the same tick.
//!
//! Each awake body moves in two passes. The gravity pass moves it along the
//! gravity axis and rolls back on contact, marking the body grounded and
//! asleep and registering it as held by what it landed on. The orthogonal
//! pass moves it across the gravity axis; a contact there rolls the move back
//! and hands the blocked velocity to the body in the way.

use super::collision::narrow_phase;
use super::collision::shapes::PlacedCollider;
use super::components::{Collider, Rigidbody};
use glam::{Vec2, Vec3};
use hecs::Entity;
use std::collections::HashMap;
use tracing::trace;

/// A collider as seen by one tick
#[derive(Debug, Clone)]
pub(crate) struct ColliderEntry {
    pub entity: Entity,
    pub collider: Collider,
    pub position: Vec3,
    pub rotation: f32,
    /// Index into [`TickScene::bodies`] when the owner has a rigidbody
    pub body: Option<usize>,
}

impl ColliderEntry {
    pub fn placed(&self) -> PlacedCollider {
        PlacedCollider::new(self.collider, self.position.truncate(), self.rotation)
    }
}

/// A rigidbody as seen by one tick
#[derive(Debug, Clone)]
pub(crate) struct BodyState {
    pub entity: Entity,
    pub rigidbody: Rigidbody,
    /// Index into [`TickScene::colliders`]
    pub collider: usize,
}

/// Snapshot of the simulated part of the world for one tick
#[derive(Debug, Default)]
pub(crate) struct TickScene {
    pub colliders: Vec<ColliderEntry>,
    pub bodies: Vec<BodyState>,
    body_lookup: HashMap<Entity, usize>,
    /// Blocking contacts found this tick, each pair ordered by entity id
    pub contacts: Vec<(Entity, Entity)>,
}

impl TickScene {
    /// Add a collider; returns its index
    pub fn push_collider(
        &mut self,
        entity: Entity,
        collider: Collider,
        position: Vec3,
        rotation: f32,
    ) -> usize {
        self.colliders.push(ColliderEntry {
            entity,
            collider,
            position,
            rotation,
            body: None,
        });
        self.colliders.len() - 1
    }

    /// Attach a rigidbody to the collider at `collider`; returns the body index
    pub fn push_body(&mut self, collider: usize, rigidbody: Rigidbody) -> usize {
        let entity = self.colliders[collider].entity;
        let index = self.bodies.len();
        self.bodies.push(BodyState {
            entity,
            rigidbody,
            collider,
        });
        self.colliders[collider].body = Some(index);
        self.body_lookup.insert(entity, index);
        index
    }

    pub fn body_of(&self, entity: Entity) -> Option<usize> {
        self.body_lookup.get(&entity).copied()
    }

    pub fn collider_of(&self, entity: Entity) -> Option<usize> {
        self.colliders.iter().position(|entry| entry.entity == entity)
    }

    /// Can these two colliders stop each other?
    fn blocks(&self, a: usize, b: usize) -> bool {
        a != b && !self.colliders[a].collider.is_trigger && !self.colliders[b].collider.is_trigger
    }

    fn touching(&self, a: usize, b: usize) -> bool {
        narrow_phase::is_touching(&self.colliders[a].placed(), &self.colliders[b].placed())
    }

    fn touches_anything(&self, collider: usize) -> bool {
        (0..self.colliders.len())
            .any(|other| self.blocks(collider, other) && self.touching(collider, other))
    }

    fn record_contact(&mut self, a: usize, b: usize) {
        let (a, b) = (self.colliders[a].entity, self.colliders[b].entity);
        let pair = if a.id() <= b.id() { (a, b) } else { (b, a) };
        if !self.contacts.contains(&pair) {
            self.contacts.push(pair);
        }
    }
}

/// Settings shared by every body integrated in one tick
#[derive(Debug, Clone, Copy)]
pub(crate) struct StepParams {
    pub gravity: Vec2,
    pub dt: f32,
    pub settle_iterations: u32,
}

/// Split a displacement into its parts along and across the gravity axis
///
/// Zero gravity has no axis, so the whole displacement is orthogonal. The
/// same goes for a gravity too short to square without underflow.
pub fn split_displacement(displacement: Vec2, gravity: Vec2) -> (Vec2, Vec2) {
    let length_squared = gravity.length_squared();
    if !length_squared.is_normal() {
        return (Vec2::ZERO, displacement);
    }
    let across = gravity.perp();
    (
        gravity * (displacement.dot(gravity) / length_squared),
        across * (displacement.dot(across) / length_squared),
    )
}

/// Run one tick of the body at `body`; returns false when it stayed asleep
pub(crate) fn integrate_body(scene: &mut TickScene, body: usize, params: &StepParams) -> bool {
    {
        let rb = &mut scene.bodies[body].rigidbody;
        if rb.velocity.length_squared() >= rb.awake_threshold * rb.awake_threshold {
            rb.awake = true;
        }
        if !rb.awake {
            return false;
        }
        if !rb.is_on_ground {
            rb.velocity += params.gravity * rb.gravity_scale;
        }
    }

    let displacement = scene.bodies[body].rigidbody.velocity * params.dt;
    let (gravity_projection, orthogonal_projection) =
        split_displacement(displacement, params.gravity);

    gravity_pass(scene, body, gravity_projection, params.settle_iterations);
    if orthogonal_pass(scene, body, orthogonal_projection, params.dt) {
        carry_held_bodies(scene, body);
    }
    true
}

fn gravity_pass(scene: &mut TickScene, body: usize, displacement: Vec2, settle_iterations: u32) {
    let own = scene.bodies[body].collider;
    let entity = scene.bodies[body].entity;
    let start = scene.colliders[own].position;

    scene.colliders[own].position += displacement.extend(0.0);
    scene.bodies[body].rigidbody.is_on_ground = false;

    let mut rolled_back = false;
    for other in 0..scene.colliders.len() {
        if !scene.blocks(own, other) || !scene.touching(own, other) {
            continue;
        }

        scene.record_contact(own, other);
        scene.colliders[own].position = start;
        rolled_back = true;

        let rb = &mut scene.bodies[body].rigidbody;
        rb.is_on_ground = true;
        rb.sleep();

        if let Some(holder) = scene.colliders[other].body {
            scene.bodies[holder].rigidbody.hold(entity);
        }
    }

    if rolled_back {
        trace!(entity = ?entity, "Gravity move blocked");
        if settle_iterations > 0 {
            settle(scene, own, start, displacement, settle_iterations);
        }
    }
}

/// Bisect the blocked displacement, keeping every part that touches nothing
fn settle(scene: &mut TickScene, own: usize, start: Vec3, displacement: Vec2, iterations: u32) {
    let mut accepted = Vec2::ZERO;
    let mut step = displacement * 0.5;

    for _ in 0..iterations {
        scene.colliders[own].position = start + (accepted + step).extend(0.0);
        if !scene.touches_anything(own) {
            accepted += step;
        }
        step *= 0.5;
    }

    scene.colliders[own].position = start + accepted.extend(0.0);
}

/// Returns whether the body kept its move
fn orthogonal_pass(scene: &mut TickScene, body: usize, displacement: Vec2, dt: f32) -> bool {
    let own = scene.bodies[body].collider;
    let start = scene.colliders[own].position;
    let transfer = displacement / dt;

    scene.colliders[own].position += displacement.extend(0.0);

    let mut did_move = true;
    for other in 0..scene.colliders.len() {
        if !scene.blocks(own, other) || !scene.touching(own, other) {
            continue;
        }

        scene.record_contact(own, other);
        did_move = false;

        if let Some(target) = scene.colliders[other].body {
            let rb = &mut scene.bodies[target].rigidbody;
            rb.wake_up();
            rb.velocity += transfer;
            trace!(
                from = ?scene.bodies[body].entity,
                to = ?scene.bodies[target].entity,
                ?transfer,
                "Momentum transfer"
            );
        }
        scene.bodies[body].rigidbody.velocity -= transfer;
        scene.colliders[own].position = start;
    }

    did_move
}

/// Give every held body this body's velocity and let go of the airborne ones
fn carry_held_bodies(scene: &mut TickScene, body: usize) {
    let velocity = scene.bodies[body].rigidbody.velocity;
    let held = std::mem::take(&mut scene.bodies[body].rigidbody.holding);

    let mut kept = Vec::with_capacity(held.len());
    for rider in held {
        // Despawned or inactive riders fall out of the list
        let Some(index) = scene.body_of(rider) else {
            continue;
        };

        let rb = &mut scene.bodies[index].rigidbody;
        rb.velocity = velocity;
        if rb.is_on_ground {
            kept.push(rider);
        } else {
            rb.wake_up();
        }
    }

    scene.bodies[body].rigidbody.holding = kept;
}
