//! Physics world driving the fixed-tick simulation
//!
//! The [`PhysicsWorld`] owns the simulation settings, the fixed timestep
//! accumulator and the contact bookkeeping. Scene state lives in the entity
//! [`World`]: every tick copies the active colliders and rigidbodies out in
//! entity id order, integrates the bodies, then writes positions and body
//! state back.

use super::accumulator::PhysicsAccumulator;
use super::components::{Collider, Rigidbody};
use super::events::{resting_contacts, trigger_overlaps, ContactEvent, ContactPair, ContactTracker};
use super::query::PhysicsQuery;
use super::rigidbody::{integrate_body, StepParams, TickScene};
use super::PhysicsError;
use crate::config::PhysicsConfig;
use crate::core::entity::{Inactive, Transform, World};
use glam::{Vec2, Vec3};
use hecs::Entity;
use std::collections::HashSet;
use tracing::{debug, info, trace};

/// Simulation driver for the colliders and rigidbodies of a [`World`]
#[derive(Debug)]
pub struct PhysicsWorld {
    config: PhysicsConfig,
    accumulator: PhysicsAccumulator,
    contacts: ContactTracker,
    tick_count: u64,
}

impl PhysicsWorld {
    /// Create a physics world running with `config`
    pub fn new(config: PhysicsConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        info!(
            gravity = ?config.gravity,
            fixed_timestep = config.fixed_timestep,
            "Initializing physics world"
        );

        Ok(Self {
            accumulator: PhysicsAccumulator::new(config.fixed_timestep, config.max_steps_per_frame),
            config,
            contacts: ContactTracker::new(),
            tick_count: 0,
        })
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Replace the settings; time already accumulated is kept
    pub fn set_config(&mut self, config: PhysicsConfig) -> Result<(), PhysicsError> {
        config.validate()?;
        self.accumulator.fixed_timestep = config.fixed_timestep;
        self.accumulator.max_steps = config.max_steps_per_frame;
        self.config = config;
        debug!(config = ?self.config, "Physics config updated");
        Ok(())
    }

    pub fn set_gravity(&mut self, gravity: Vec2) -> Result<(), PhysicsError> {
        let config = PhysicsConfig {
            gravity,
            ..self.config.clone()
        };
        self.set_config(config)
    }

    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    /// Number of ticks run since creation
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// How far the accumulator is into the next tick, in `[0, 1)`
    pub fn interpolation_alpha(&self) -> f32 {
        self.accumulator.interpolation_alpha()
    }

    /// Run exactly one tick
    pub fn step(&mut self, world: &mut World) -> Result<(), PhysicsError> {
        self.contacts.clear_events();
        self.tick(world)
    }

    /// Advance by a frame of `frame_dt` seconds, running every tick that is due
    ///
    /// Returns the number of ticks run.
    pub fn update(&mut self, world: &mut World, frame_dt: f32) -> Result<u32, PhysicsError> {
        self.contacts.clear_events();

        let steps = self.accumulator.accumulate(frame_dt);
        for _ in 0..steps {
            self.tick(world)?;
        }

        Ok(steps)
    }

    /// Contact changes seen during the last [`step`](Self::step) or
    /// [`update`](Self::update) call
    pub fn contact_events(&self) -> &[ContactEvent] {
        self.contacts.events()
    }

    /// Pairs in contact as of the last tick
    pub fn active_contacts(&self) -> &[ContactPair] {
        self.contacts.active()
    }

    /// Snapshot the colliders of `world` for raycasts and overlap tests
    pub fn query(&self, world: &World) -> Result<PhysicsQuery, PhysicsError> {
        PhysicsQuery::new(world, &self.config)
    }

    fn tick(&mut self, world: &mut World) -> Result<(), PhysicsError> {
        let mut scene = capture(world)?;

        let params = StepParams {
            gravity: self.config.gravity,
            dt: self.config.fixed_timestep,
            settle_iterations: self.config.contact_settle_iterations,
        };
        let start: Vec<Vec3> = scene.colliders.iter().map(|entry| entry.position).collect();
        let mut asleep = HashSet::new();
        for body in 0..scene.bodies.len() {
            if !integrate_body(&mut scene, body, &params) {
                asleep.insert(scene.bodies[body].entity);
            }
        }

        write_back(world, &scene);

        let mut pairs: Vec<ContactPair> = scene
            .contacts
            .iter()
            .map(|&(a, b)| ContactPair::new(a, b, false))
            .collect();
        pairs.extend(resting_contacts(&scene, &start, &asleep, self.contacts.active()));
        pairs.extend(trigger_overlaps(&scene));
        self.contacts.record_tick(pairs);

        self.tick_count += 1;
        trace!(
            tick = self.tick_count,
            colliders = scene.colliders.len(),
            bodies = scene.bodies.len(),
            contacts = self.contacts.active().len(),
            "Physics tick"
        );

        Ok(())
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        let config = PhysicsConfig::default();
        Self {
            accumulator: PhysicsAccumulator::new(config.fixed_timestep, config.max_steps_per_frame),
            config,
            contacts: ContactTracker::new(),
            tick_count: 0,
        }
    }
}

/// Copy the active colliders and rigidbodies out of the world, in entity id order
fn capture(world: &World) -> Result<TickScene, PhysicsError> {
    let orphan = world
        .query::<&Rigidbody>()
        .without::<&Collider>()
        .without::<&Inactive>()
        .iter()
        .map(|(entity, _)| entity)
        .min_by_key(|entity| entity.id());
    if let Some(entity) = orphan {
        return Err(PhysicsError::MissingCollider(entity));
    }

    let mut entries: Vec<(Entity, Collider, Transform, Option<Rigidbody>)> = world
        .query::<(&Collider, &Transform, Option<&Rigidbody>)>()
        .without::<&Inactive>()
        .iter()
        .map(|(entity, (collider, transform, rigidbody))| {
            (entity, *collider, *transform, rigidbody.cloned())
        })
        .collect();
    entries.sort_by_key(|(entity, ..)| entity.id());

    let mut scene = TickScene::default();
    for (entity, collider, transform, rigidbody) in entries {
        collider
            .validate()
            .map_err(|reason| PhysicsError::InvalidShape { entity, reason })?;

        let index = scene.push_collider(entity, collider, transform.position, transform.rotation);
        if let Some(rigidbody) = rigidbody {
            scene.push_body(index, rigidbody);
        }
    }

    Ok(scene)
}

fn write_back(world: &mut World, scene: &TickScene) {
    for body in &scene.bodies {
        let position = scene.colliders[body.collider].position;
        if let Ok((transform, rigidbody)) =
            world.query_one_mut::<(&mut Transform, &mut Rigidbody)>(body.entity)
        {
            transform.position = position;
            *rigidbody = body.rigidbody.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{ContactKind, ForceMode};

    fn config() -> PhysicsConfig {
        PhysicsConfig {
            gravity: Vec2::new(0.0, -10.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = PhysicsConfig {
            fixed_timestep: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            PhysicsWorld::new(config),
            Err(PhysicsError::Config(_))
        ));

        let mut physics = PhysicsWorld::default();
        assert!(physics.set_gravity(Vec2::new(f32::NAN, 0.0)).is_err());
        assert_eq!(physics.gravity(), Vec2::new(0.0, -50.0));
    }

    #[test]
    fn test_missing_collider_aborts_tick() {
        let mut world = World::new();
        let body = world.spawn((Transform::from_xy(0.0, 5.0), Rigidbody::default()));
        let mut physics = PhysicsWorld::new(config()).unwrap();

        let result = physics.step(&mut world);
        assert!(matches!(result, Err(PhysicsError::MissingCollider(e)) if e == body));
        assert_eq!(physics.tick_count(), 0);
    }

    #[test]
    fn test_invalid_shape_leaves_world_untouched() {
        let mut world = World::new();
        let body = world.spawn((
            Transform::from_xy(0.0, 5.0),
            Collider::default(),
            Rigidbody::default(),
        ));
        let bad = world.spawn((Transform::default(), Collider::circle(0.0)));
        let mut physics = PhysicsWorld::new(config()).unwrap();

        let result = physics.step(&mut world);
        assert!(matches!(result, Err(PhysicsError::InvalidShape { entity, .. }) if entity == bad));
        assert_eq!(world.get::<Transform>(body).unwrap().position.y, 5.0);
    }

    #[test]
    fn test_step_moves_bodies_and_keeps_depth() {
        let mut world = World::new();
        let body = world.spawn((
            Transform::from_position(glam::Vec3::new(0.0, 5.0, 2.0)),
            Collider::default(),
            Rigidbody::default(),
        ));
        let mut physics = PhysicsWorld::new(config()).unwrap();

        physics.step(&mut world).unwrap();

        let transform = *world.get::<Transform>(body).unwrap();
        assert!((transform.position.y - 4.8).abs() < 1e-5);
        assert_eq!(transform.position.z, 2.0);
        assert_eq!(world.get::<Rigidbody>(body).unwrap().velocity, Vec2::new(0.0, -10.0));
        assert_eq!(physics.tick_count(), 1);
    }

    #[test]
    fn test_inactive_bodies_are_skipped() {
        let mut world = World::new();
        let body = world.spawn((
            Transform::from_xy(0.0, 5.0),
            Collider::default(),
            Rigidbody::default(),
        ));
        world.set_active(body, false).unwrap();
        let mut physics = PhysicsWorld::new(config()).unwrap();

        physics.step(&mut world).unwrap();
        assert_eq!(world.get::<Transform>(body).unwrap().position.y, 5.0);
    }

    #[test]
    fn test_update_runs_due_ticks() {
        let mut world = World::new();
        let mut physics = PhysicsWorld::new(PhysicsConfig {
            fixed_timestep: 0.25,
            ..config()
        })
        .unwrap();

        assert_eq!(physics.update(&mut world, 0.6).unwrap(), 2);
        assert!((physics.interpolation_alpha() - 0.4).abs() < 1e-4);
        assert_eq!(physics.tick_count(), 2);
    }

    #[test]
    fn test_landing_reports_contact_enter() {
        let mut world = World::new();
        let floor = world.spawn((
            Transform::from_xy(0.0, 0.0),
            Collider::box_collider(Vec2::new(10.0, 2.0)),
        ));
        let body = world.spawn((
            Transform::from_xy(0.0, 1.6),
            Collider::default(),
            Rigidbody::default(),
        ));
        let mut physics = PhysicsWorld::new(config()).unwrap();

        physics.step(&mut world).unwrap();

        let events = physics.contact_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ContactKind::Enter);
        assert_eq!((events[0].entity_a, events[0].entity_b), (floor, body));
        assert!(!events[0].is_trigger);
    }

    #[test]
    fn test_sleeping_body_keeps_its_contact() {
        let mut world = World::new();
        let floor = world.spawn((
            Transform::from_xy(0.0, 0.0),
            Collider::box_collider(Vec2::new(10.0, 2.0)),
        ));
        let body = world.spawn((
            Transform::from_xy(0.0, 1.6),
            Collider::default(),
            Rigidbody::default(),
        ));
        let mut physics = PhysicsWorld::new(config()).unwrap();

        physics.step(&mut world).unwrap();
        assert_eq!(physics.contact_events().len(), 1);

        // Landed and asleep with nothing left to wake it
        world.query_one_mut::<&mut Rigidbody>(body).unwrap().velocity = Vec2::ZERO;
        for _ in 0..5 {
            physics.step(&mut world).unwrap();
            assert!(physics.contact_events().is_empty());
        }
        assert!(!world.get::<Rigidbody>(body).unwrap().is_awake());
        assert_eq!(physics.active_contacts().len(), 1);

        world
            .query_one_mut::<&mut Rigidbody>(body)
            .unwrap()
            .apply_force(Vec2::new(0.0, 20.0), ForceMode::Impulse, 0.02);
        physics.step(&mut world).unwrap();

        let events = physics.contact_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ContactKind::Exit);
        assert_eq!((events[0].entity_a, events[0].entity_b), (floor, body));
    }
}
