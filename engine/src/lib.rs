//! 2D collision and contact resolution engine
//!
//! This crate provides an entity world of game objects carrying transforms,
//! colliders and rigidbodies, a fixed-tick physics world that moves them, and
//! scene queries over their collision shapes.

pub mod config;
pub mod core;
pub mod physics;

// Re-export commonly used types
pub mod prelude {
    // Entity system types
    pub use crate::core::entity::{Entity, Inactive, Name, Transform, World};

    // Math types
    pub use glam::{Vec2, Vec3};

    // Config types
    pub use crate::config::{ConfigError, PhysicsConfig};

    // Physics types
    pub use crate::physics::{
        Bounds, Collider, ColliderShape, ContactEvent, ContactKind, ForceMode, LayerMask,
        LayerRegistry, PhysicsError, PhysicsQuery, PhysicsWorld, RaycastHit, Rigidbody, SleepMode,
    };
}

/// Initialize logging for the engine
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
