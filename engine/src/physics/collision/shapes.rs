//! Collider shapes placed in world space
//!
//! A [`PlacedCollider`] pairs a collider with the global position and
//! rotation of its owner for the duration of one test. Everything here is
//! plain geometry: bounds, corners, face normals, point containment and
//! ray intersection.

use super::Bounds;
use crate::core::entity::Transform;
use crate::physics::components::{Collider, ColliderShape};
use glam::Vec2;

/// Squared length below which an axis is considered degenerate
pub const AXIS_EPSILON: f32 = 1e-12;

/// A collider together with the world placement of its owner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedCollider {
    pub collider: Collider,
    /// Global position of the owning transform
    pub position: Vec2,
    /// Global rotation of the owning transform in radians
    pub rotation: f32,
}

impl PlacedCollider {
    pub fn new(collider: Collider, position: Vec2, rotation: f32) -> Self {
        Self {
            collider,
            position,
            rotation,
        }
    }

    /// Place a collider on the given transform
    pub fn from_transform(collider: Collider, transform: &Transform) -> Self {
        Self::new(collider, transform.position_2d(), transform.rotation)
    }

    pub fn shape(&self) -> ColliderShape {
        self.collider.shape
    }

    /// World-space center of the shape (offset turns with the owner)
    pub fn center(&self) -> Vec2 {
        self.position + Vec2::from_angle(self.rotation).rotate(self.collider.offset)
    }

    /// World-space corners of a box in order top-left, top-right,
    /// bottom-right, bottom-left (before rotation). `None` for circles.
    pub fn corners(&self) -> Option<[Vec2; 4]> {
        match self.collider.shape {
            ColliderShape::Box { size } => {
                let half = size * 0.5;
                let rotation = Vec2::from_angle(self.rotation);
                let center = self.center();
                Some([
                    Vec2::new(-half.x, half.y),
                    Vec2::new(half.x, half.y),
                    Vec2::new(half.x, -half.y),
                    Vec2::new(-half.x, -half.y),
                ]
                .map(|corner| center + rotation.rotate(corner)))
            }
            ColliderShape::Circle { .. } => None,
        }
    }

    /// The two unique face normals of a box, derived from its edges.
    /// Not normalised; degenerate edges give zero-length axes.
    pub fn face_normals(&self) -> Option<[Vec2; 2]> {
        self.corners().map(|[top_left, _, bottom_right, bottom_left]| {
            [
                (top_left - bottom_left).perp(),
                (bottom_left - bottom_right).perp(),
            ]
        })
    }

    /// World-space axis-aligned box enclosing the shape
    pub fn bounds(&self) -> Bounds {
        match self.collider.shape {
            ColliderShape::Box { .. } => match self.corners() {
                Some(corners) => Bounds::enclosing(&corners),
                None => Bounds::new(self.center(), Vec2::ZERO),
            },
            ColliderShape::Circle { radius } => {
                Bounds::new(self.center(), Vec2::splat(radius * 2.0))
            }
        }
    }

    /// Does the shape cover `point`?
    pub fn overlap_point(&self, point: Vec2) -> bool {
        if !self.bounds().contains_point(point) {
            return false;
        }

        match self.collider.shape {
            ColliderShape::Box { .. } => {
                let (Some(corners), Some(axes)) = (self.corners(), self.face_normals()) else {
                    return false;
                };
                axes.iter()
                    .filter(|axis| axis.length_squared() > AXIS_EPSILON)
                    .all(|axis| {
                        let (min, max) = project(&corners, *axis);
                        let proj = point.dot(*axis);
                        !(proj < min || max < proj)
                    })
            }
            ColliderShape::Circle { radius } => {
                self.center().distance_squared(point) < radius * radius
            }
        }
    }

    /// Intersect a ray with the shape
    ///
    /// `direction` must be normalised. A ray starting inside the shape hits
    /// at distance zero with a normal facing back along the ray.
    pub fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<ShapeHit> {
        if self.overlap_point(origin) {
            return Some(ShapeHit {
                distance: 0.0,
                point: origin,
                normal: -direction,
            });
        }

        match self.collider.shape {
            ColliderShape::Box { size } => {
                self.raycast_box(size * 0.5, origin, direction, max_distance)
            }
            ColliderShape::Circle { radius } => {
                self.raycast_circle(radius, origin, direction, max_distance)
            }
        }
    }

    /// Slab test in the box's local frame
    fn raycast_box(
        &self,
        half: Vec2,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
    ) -> Option<ShapeHit> {
        let rotation = Vec2::from_angle(self.rotation);
        let inverse = Vec2::new(rotation.x, -rotation.y);
        let local_origin = inverse.rotate(origin - self.center());
        let local_direction = inverse.rotate(direction);

        let mut t_enter = 0.0f32;
        let mut t_exit = max_distance;
        let mut local_normal = Vec2::ZERO;

        for axis in 0..2 {
            let o = local_origin[axis];
            let d = local_direction[axis];
            let h = half[axis];

            if d.abs() < 1e-8 {
                // Parallel to this slab: must already be between its faces
                if o < -h || o > h {
                    return None;
                }
                continue;
            }

            let mut near = (-h - o) / d;
            let mut far = (h - o) / d;
            let mut face = Vec2::ZERO;
            face[axis] = -d.signum();
            if near > far {
                std::mem::swap(&mut near, &mut far);
            }

            if near > t_enter {
                t_enter = near;
                local_normal = face;
            }
            t_exit = t_exit.min(far);
            if t_enter > t_exit {
                return None;
            }
        }

        if local_normal == Vec2::ZERO {
            return None;
        }

        Some(ShapeHit {
            distance: t_enter,
            point: origin + direction * t_enter,
            normal: rotation.rotate(local_normal),
        })
    }

    fn raycast_circle(
        &self,
        radius: f32,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
    ) -> Option<ShapeHit> {
        let center = self.center();
        let oc = origin - center;
        let b = oc.dot(direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let t = -b - discriminant.sqrt();
        if t < 0.0 || t > max_distance {
            return None;
        }

        let point = origin + direction * t;
        Some(ShapeHit {
            distance: t,
            point,
            normal: (point - center).normalize_or_zero(),
        })
    }
}

/// Where a ray meets a single shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeHit {
    /// Distance along the ray
    pub distance: f32,
    /// World space hit point
    pub point: Vec2,
    /// Outward surface normal at the hit point
    pub normal: Vec2,
}

/// Project points onto an axis, returning the covered `(min, max)` interval
pub fn project(points: &[Vec2], axis: Vec2) -> (f32, f32) {
    points.iter().fold((f32::MAX, f32::MIN), |(min, max), point| {
        let proj = point.dot(axis);
        (min.min(proj), max.max(proj))
    })
}
