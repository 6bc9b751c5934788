//! Physics components for the entity system

use super::layers::LayerMask;
use glam::Vec2;
use hecs::Entity;
use serde::{Deserialize, Serialize};

/// Collision shape types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum ColliderShape {
    /// Rectangle with full width and height
    Box { size: Vec2 },
    /// Circle with radius
    Circle { radius: f32 },
}

impl Default for ColliderShape {
    fn default() -> Self {
        ColliderShape::Box { size: Vec2::ONE }
    }
}

impl ColliderShape {
    /// Check that the shape has a finite, strictly positive extent
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ColliderShape::Box { size } => {
                if !size.is_finite() || size.x <= 0.0 || size.y <= 0.0 {
                    return Err(format!("box size must be positive and finite, got {size:?}"));
                }
            }
            ColliderShape::Circle { radius } => {
                if !radius.is_finite() || *radius <= 0.0 {
                    return Err(format!(
                        "circle radius must be positive and finite, got {radius}"
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Collider component for collision detection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Collider {
    /// Collision shape type
    pub shape: ColliderShape,

    /// Local displacement of the shape from the owning transform
    pub offset: Vec2,

    /// Is this a trigger (reported, but never blocks movement)
    pub is_trigger: bool,

    /// Layers this collider lives on
    pub layer: LayerMask,
}

impl Collider {
    /// Create a box collider
    pub fn box_collider(size: Vec2) -> Self {
        Self {
            shape: ColliderShape::Box { size },
            ..Default::default()
        }
    }

    /// Create a circle collider
    pub fn circle(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Circle { radius },
            ..Default::default()
        }
    }

    /// Shift the shape away from the transform origin
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Set this collider as a trigger
    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// Move this collider onto the given layers
    pub fn on_layer(mut self, layer: LayerMask) -> Self {
        self.layer = layer;
        self
    }

    /// Reject shapes no collision test can give a meaningful answer for
    pub fn validate(&self) -> Result<(), String> {
        if !self.offset.is_finite() {
            return Err(format!("offset must be finite, got {:?}", self.offset));
        }
        self.shape.validate()
    }
}

/// Initial sleep behaviour of a rigidbody
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SleepMode {
    /// Never falls asleep on landing
    NeverSleep,
    /// Starts awake
    #[default]
    StartAwake,
    /// Starts asleep until disturbed
    StartAsleep,
}

/// How [`Rigidbody::apply_force`] interprets its argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ForceMode {
    /// Continuous force, scaled by the timestep
    #[default]
    Force,
    /// Instant change in velocity
    Impulse,
}

/// Rigidbody component for physics simulation
///
/// Every body has unit mass. Bodies are moved by the tick integrator in
/// [`crate::physics::rigidbody`]; the awake and grounded flags and the set of
/// bodies resting on this one are maintained there.
#[derive(Debug, Clone, PartialEq)]
pub struct Rigidbody {
    /// Linear velocity in world units per second
    pub velocity: Vec2,

    /// Speed at or above which an asleep body wakes up
    pub awake_threshold: f32,

    /// Multiplier applied to world gravity
    pub gravity_scale: f32,

    pub sleep_mode: SleepMode,

    pub(crate) awake: bool,
    pub(crate) is_on_ground: bool,
    pub(crate) holding: Vec<Entity>,
}

impl Default for Rigidbody {
    fn default() -> Self {
        Self::with_sleep_mode(SleepMode::StartAwake)
    }
}

impl Rigidbody {
    /// Create a rigidbody whose initial state follows `sleep_mode`
    pub fn with_sleep_mode(sleep_mode: SleepMode) -> Self {
        Self {
            velocity: Vec2::ZERO,
            awake_threshold: 0.1,
            gravity_scale: 1.0,
            sleep_mode,
            awake: sleep_mode != SleepMode::StartAsleep,
            is_on_ground: false,
            holding: Vec::new(),
        }
    }

    /// Create a rigidbody already moving with `velocity`
    pub fn with_velocity(velocity: Vec2) -> Self {
        Self {
            velocity,
            ..Default::default()
        }
    }

    /// Set the gravity multiplier
    pub fn with_gravity_scale(mut self, gravity_scale: f32) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }

    pub fn is_awake(&self) -> bool {
        self.awake
    }

    /// Did the last gravity-axis move of this body end on something?
    pub fn is_on_ground(&self) -> bool {
        self.is_on_ground
    }

    /// Bodies currently resting on top of this one
    pub fn holding(&self) -> &[Entity] {
        &self.holding
    }

    pub fn wake_up(&mut self) {
        self.awake = true;
    }

    /// Put the body to sleep; `NeverSleep` bodies ignore this
    pub fn sleep(&mut self) {
        if self.sleep_mode != SleepMode::NeverSleep {
            self.awake = false;
        }
    }

    /// Change the velocity of this unit-mass body and wake it
    pub fn apply_force(&mut self, force: Vec2, mode: ForceMode, dt: f32) {
        match mode {
            ForceMode::Force => self.velocity += force * dt,
            ForceMode::Impulse => self.velocity += force,
        }
        self.awake = true;
    }

    /// Record that `body` rests on this one, ignoring repeats
    pub(crate) fn hold(&mut self, body: Entity) {
        if !self.holding.contains(&body) {
            self.holding.push(body);
        }
    }
}
