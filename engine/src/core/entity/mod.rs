//! Entity-Component System (ECS) functionality
//!
//! Game objects are hecs entities. This module provides the transform and
//! bookkeeping components plus a thin wrapper around `hecs::World`.

pub mod components;
pub mod world;

// Re-export commonly used types
pub use components::{Inactive, Name, Transform};
pub use world::{ComponentRequirements, World};

// Re-export hecs types that users will need
pub use hecs::Entity;
