//! World wrapper providing helper methods for entity management

use super::components::{Inactive, Transform};
use crate::physics::{Collider, PhysicsError, Rigidbody};
use hecs::Entity;
use tracing::debug;

/// Wrapper around hecs::World providing additional helper methods
pub struct World {
    inner: hecs::World,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
        }
    }

    /// Spawn a new entity with the given components
    pub fn spawn(&mut self, components: impl hecs::DynamicBundle) -> Entity {
        self.inner.spawn(components)
    }

    /// Get a reference to a component on an entity
    pub fn get<T: hecs::Component>(
        &self,
        entity: Entity,
    ) -> Result<hecs::Ref<'_, T>, hecs::ComponentError> {
        self.inner.get::<&T>(entity)
    }

    /// Query a single entity for a mutable component reference
    pub fn query_one_mut<Q: hecs::Query>(
        &mut self,
        entity: Entity,
    ) -> Result<Q::Item<'_>, hecs::QueryOneError> {
        self.inner.query_one_mut::<Q>(entity)
    }

    /// Insert a component into an entity
    pub fn insert_one(
        &mut self,
        entity: Entity,
        component: impl hecs::Component,
    ) -> Result<(), hecs::NoSuchEntity> {
        self.inner.insert_one(entity, component)
    }

    /// Remove a component from an entity
    pub fn remove_one<T: hecs::Component>(
        &mut self,
        entity: Entity,
    ) -> Result<T, hecs::ComponentError> {
        self.inner.remove_one::<T>(entity)
    }

    /// Query entities with specific components
    pub fn query<Q: hecs::Query>(&self) -> hecs::QueryBorrow<'_, Q> {
        self.inner.query()
    }

    /// Query entities with specific components (mutable)
    pub fn query_mut<Q: hecs::Query>(&mut self) -> hecs::QueryMut<'_, Q> {
        self.inner.query_mut()
    }

    /// Despawn an entity and all its components
    pub fn despawn(&mut self, entity: Entity) -> Result<(), hecs::NoSuchEntity> {
        self.inner.despawn(entity)
    }

    /// Check if an entity exists
    pub fn contains(&self, entity: Entity) -> bool {
        self.inner.contains(entity)
    }

    /// Whether the entity exists and is not marked [`Inactive`]
    pub fn is_active(&self, entity: Entity) -> bool {
        self.contains(entity) && self.get::<Inactive>(entity).is_err()
    }

    /// Enable or disable a game object
    pub fn set_active(&mut self, entity: Entity, active: bool) -> Result<(), hecs::NoSuchEntity> {
        if !self.contains(entity) {
            return Err(hecs::NoSuchEntity);
        }
        if active {
            let _ = self.remove_one::<Inactive>(entity);
        } else {
            self.insert_one(entity, Inactive)?;
        }
        Ok(())
    }

    /// Helper method to spawn an entity that is guaranteed to carry a Transform
    pub fn spawn_with_transform(&mut self, components: impl hecs::DynamicBundle) -> Entity {
        let entity = self.spawn(components);

        if self.get::<Transform>(entity).is_err() {
            let _ = self.insert_one(entity, Transform::default());
            debug!(entity = ?entity, "Auto-added Transform component");
        }

        entity
    }

    /// Spawn an entity holding `component` plus everything it requires
    pub fn add_with_requirements<T: hecs::Component + ComponentRequirements>(
        &mut self,
        component: T,
    ) -> Entity {
        let mut builder = hecs::EntityBuilder::new();
        builder.add(component);

        T::add_requirements(&mut builder);

        let entity = self.inner.spawn(builder.build());
        debug!(entity = ?entity, component_type = std::any::type_name::<T>(), "Spawned entity with requirements");

        entity
    }

    /// Attach a rigidbody to an existing game object
    ///
    /// A dynamic body cannot exist without a shape: when the entity has no
    /// [`Collider`] a default unit box collider is attached alongside it, and a
    /// missing [`Transform`] is filled in the same way.
    pub fn attach_rigidbody(
        &mut self,
        entity: Entity,
        rigidbody: Rigidbody,
    ) -> Result<(), PhysicsError> {
        if !self.contains(entity) {
            return Err(PhysicsError::NoSuchEntity(entity));
        }

        if self.get::<Collider>(entity).is_err() {
            self.insert_one(entity, Collider::default())
                .map_err(|_| PhysicsError::NoSuchEntity(entity))?;
            debug!(entity = ?entity, "Auto-added box Collider for Rigidbody");
        }
        if self.get::<Transform>(entity).is_err() {
            self.insert_one(entity, Transform::default())
                .map_err(|_| PhysicsError::NoSuchEntity(entity))?;
            debug!(entity = ?entity, "Auto-added Transform component");
        }

        self.insert_one(entity, rigidbody)
            .map_err(|_| PhysicsError::NoSuchEntity(entity))
    }

    /// Get access to the inner hecs::World for advanced operations
    pub fn inner(&self) -> &hecs::World {
        &self.inner
    }

    /// Get mutable access to the inner hecs::World for advanced operations
    pub fn inner_mut(&mut self) -> &mut hecs::World {
        &mut self.inner
    }
}

/// Trait for components that pull other components in with them
pub trait ComponentRequirements: hecs::Component {
    /// Add required components to the entity builder
    fn add_requirements(builder: &mut hecs::EntityBuilder) {
        builder.add(Transform::default());
    }
}

impl ComponentRequirements for Collider {}

impl ComponentRequirements for Rigidbody {
    fn add_requirements(builder: &mut hecs::EntityBuilder) {
        builder.add(Transform::default());
        builder.add(Collider::default());
    }
}
