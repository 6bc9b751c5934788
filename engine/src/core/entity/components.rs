//! Core components for the entity system

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Transform component holding the global placement of a game object
///
/// Physics reads and writes `position` every tick. Only the `x` and `y`
/// components take part in collision; `z` is carried through untouched so
/// render layering survives a physics update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,
    /// Rotation around the Z axis in radians
    pub rotation: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: 0.0,
        }
    }
}

impl Transform {
    /// Create a new transform with the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform from a 2D position on the `z = 0` plane
    pub fn from_xy(x: f32, y: f32) -> Self {
        Self::from_position(Vec3::new(x, y, 0.0))
    }

    /// Set the rotation of the transform
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// The planar part of the position
    pub fn position_2d(&self) -> Vec2 {
        self.position.truncate()
    }

    /// Replace the planar part of the position, keeping depth
    pub fn set_position_2d(&mut self, position: Vec2) {
        self.position.x = position.x;
        self.position.y = position.y;
    }
}

/// Marker for game objects that are disabled
///
/// Inactive entities are skipped by the physics world and by queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inactive;

/// Name component for user-friendly entity identification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    /// Create a new name component
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_default() {
        let transform = Transform::default();
        assert_eq!(transform.position, Vec3::ZERO);
        assert_eq!(transform.rotation, 0.0);
    }

    #[test]
    fn test_set_position_2d_keeps_depth() {
        let mut transform = Transform::from_position(Vec3::new(1.0, 2.0, 7.0));
        transform.set_position_2d(Vec2::new(-3.0, 4.0));
        assert_eq!(transform.position, Vec3::new(-3.0, 4.0, 7.0));
        assert_eq!(transform.position_2d(), Vec2::new(-3.0, 4.0));
    }

    #[test]
    fn test_name_component() {
        let name = Name::new("Crate");
        assert_eq!(name.0, "Crate");

        let json = serde_json::to_string(&name).unwrap();
        let deserialized: Name = serde_json::from_str(&json).unwrap();
        assert_eq!(name.0, deserialized.0);
    }
}
