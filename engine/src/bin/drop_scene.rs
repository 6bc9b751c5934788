//! Drop a unit box onto a floor and log where it comes to rest
//!
//! Usage: `drop_scene [config.json]`. Without an argument the scene runs with
//! gravity `(0, -10)` and the default timestep.

use engine2d::config::PhysicsConfig;
use engine2d::core::entity::{Name, Transform, World};
use engine2d::physics::{Collider, PhysicsWorld, Rigidbody};
use glam::Vec2;
use tracing::{debug, info};

const TICKS: u32 = 100;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    engine2d::init_logging();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading config from {}", path);
            PhysicsConfig::load_from_file(path)?
        }
        None => PhysicsConfig {
            gravity: Vec2::new(0.0, -10.0),
            ..Default::default()
        },
    };

    let mut world = World::new();
    world.spawn((
        Name::new("Floor"),
        Transform::from_xy(0.0, 0.0),
        Collider::box_collider(Vec2::new(10.0, 2.0)),
    ));
    let body = world.spawn((
        Name::new("Box"),
        Transform::from_xy(0.0, 10.0),
        Collider::default(),
    ));
    world.attach_rigidbody(body, Rigidbody::default())?;

    let mut physics = PhysicsWorld::new(config)?;
    info!("=== Drop Scene ===");

    for tick in 0..TICKS {
        physics.step(&mut world)?;

        let position = world.get::<Transform>(body)?.position_2d();
        let rigidbody = world.get::<Rigidbody>(body)?;
        debug!(
            "Tick {}: pos={:?} vel={:?} grounded={} awake={}",
            tick,
            position,
            rigidbody.velocity,
            rigidbody.is_on_ground(),
            rigidbody.is_awake()
        );

        for event in physics.contact_events() {
            info!(
                "Tick {}: {:?} {:?} <-> {:?}",
                tick, event.kind, event.entity_a, event.entity_b
            );
        }
    }

    let position = world.get::<Transform>(body)?.position_2d();
    let rigidbody = world.get::<Rigidbody>(body)?;
    info!(
        "Rest position {:?} after {} ticks (grounded={}, awake={})",
        position,
        physics.tick_count(),
        rigidbody.is_on_ground(),
        rigidbody.is_awake()
    );

    Ok(())
}
