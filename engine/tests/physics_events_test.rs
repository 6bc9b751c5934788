//! Contact enter/exit reporting

use engine2d::config::PhysicsConfig;
use engine2d::core::entity::{Transform, World};
use engine2d::physics::{Collider, ContactKind, PhysicsWorld, Rigidbody};
use glam::Vec2;

fn physics() -> PhysicsWorld {
    PhysicsWorld::new(PhysicsConfig {
        gravity: Vec2::new(0.0, -10.0),
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn test_falling_through_trigger_enters_and_exits() {
    let mut world = World::new();
    let sensor = world.spawn((
        Transform::from_xy(0.0, 5.0),
        Collider::box_collider(Vec2::new(4.0, 1.0)).as_trigger(),
    ));
    let body = world.spawn((
        Transform::from_xy(0.0, 8.0),
        Collider::default(),
        Rigidbody::default(),
    ));

    let mut physics = physics();
    let mut entered = None;
    let mut exited = None;

    for tick in 0..20 {
        physics.step(&mut world).unwrap();
        for event in physics.contact_events() {
            assert_eq!((event.entity_a, event.entity_b), (sensor, body));
            assert!(event.is_trigger);
            match event.kind {
                ContactKind::Enter => entered = entered.or(Some(tick)),
                ContactKind::Exit => exited = exited.or(Some(tick)),
            }
        }
    }

    let entered = entered.expect("body never entered the sensor");
    let exited = exited.expect("body never left the sensor");
    assert!(entered < exited);
    // The sensor never stopped the fall
    assert!(world.get::<Transform>(body).unwrap().position.y < 4.0);
}

#[test]
fn test_resting_contact_persists() {
    let mut world = World::new();
    let floor = world.spawn((
        Transform::from_xy(0.0, 0.0),
        Collider::box_collider(Vec2::new(10.0, 2.0)),
    ));
    let body = world.spawn((
        Transform::from_xy(0.0, 3.0),
        Collider::default(),
        Rigidbody::default(),
    ));

    let mut physics = physics();
    let mut enters = 0;
    for _ in 0..50 {
        physics.step(&mut world).unwrap();
        for event in physics.contact_events() {
            assert_eq!(event.kind, ContactKind::Enter, "resting contact should not exit");
            enters += 1;
        }
    }

    assert_eq!(enters, 1);
    let active = physics.active_contacts();
    assert_eq!(active.len(), 1);
    assert_eq!((active[0].entity_a, active[0].entity_b), (floor, body));
}

#[test]
fn test_update_collects_events_from_every_tick() {
    let mut world = World::new();
    world.spawn((
        Transform::from_xy(0.0, 0.0),
        Collider::box_collider(Vec2::new(10.0, 2.0)),
    ));
    world.spawn((
        Transform::from_xy(0.0, 1.6),
        Collider::default(),
        Rigidbody::default(),
    ));

    let mut physics = physics();
    let steps = physics.update(&mut world, 0.1).unwrap();
    assert!(steps >= 4);
    assert_eq!(physics.contact_events().len(), 1);

    // A frame too short for a tick reports nothing
    assert_eq!(physics.update(&mut world, 0.001).unwrap(), 0);
    assert!(physics.contact_events().is_empty());
}

#[test]
fn test_trigger_overlaps_in_crowded_scene() {
    let mut world = World::new();
    let crates: Vec<_> = (0..12)
        .map(|i| {
            world.spawn((
                Transform::from_xy(i as f32 * 3.0, 0.0),
                Collider::default(),
            ))
        })
        .collect();
    let sensor = world.spawn((
        Transform::from_xy(15.0, 0.5),
        Collider::circle(0.75).as_trigger(),
    ));

    let mut physics = physics();
    physics.step(&mut world).unwrap();

    let active = physics.active_contacts();
    assert_eq!(active.len(), 1);
    assert_eq!((active[0].entity_a, active[0].entity_b), (crates[5], sensor));
    assert!(active[0].is_trigger);
}
