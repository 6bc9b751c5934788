//! 2D collision detection and contact resolution
//!
//! Game objects take part in physics by carrying a [`Collider`] and,
//! if they should move, a [`Rigidbody`]. A [`PhysicsWorld`] advances them in
//! fixed ticks and answers scene queries through [`PhysicsQuery`].

pub mod accumulator;
pub mod collision;
pub mod components;
pub mod error;
pub mod events;
pub mod layers;
pub mod query;
pub mod rigidbody;
pub mod world;

// Re-export commonly used types
pub use accumulator::PhysicsAccumulator;
pub use collision::shapes::PlacedCollider;
pub use collision::Bounds;
pub use components::{Collider, ColliderShape, ForceMode, Rigidbody, SleepMode};
pub use error::PhysicsError;
pub use events::{ContactEvent, ContactKind, ContactPair};
pub use layers::{LayerMask, LayerRegistry};
pub use query::{PhysicsQuery, RaycastHit};
pub use world::PhysicsWorld;
