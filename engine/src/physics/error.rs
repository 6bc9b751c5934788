//! Error type for the physics subsystem

use crate::config::ConfigError;
use hecs::Entity;

/// Errors that can occur while setting up or stepping the simulation
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    #[error("Entity {0:?} has a Rigidbody but no Collider")]
    MissingCollider(Entity),

    #[error("Entity {0:?} does not exist")]
    NoSuchEntity(Entity),

    #[error("Invalid collider on entity {entity:?}: {reason}")]
    InvalidShape { entity: Entity, reason: String },

    #[error("Invalid query shape: {0}")]
    InvalidQueryShape(String),

    #[error("Ray direction must be non-zero and finite")]
    DegenerateRay,

    #[error("All {0} physics layers are already in use")]
    LayerLimit(usize),

    #[error("Layer '{0}' is already registered")]
    DuplicateLayer(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
