//! Narrow phase overlap tests between placed colliders
//!
//! Every test answers a yes/no question. Touching boxes (shared edge)
//! overlap; circles that merely touch do not.

use super::shapes::{project, PlacedCollider, AXIS_EPSILON};
use super::Bounds;
use crate::physics::components::ColliderShape;
use glam::Vec2;

/// Do the two placed colliders overlap?
pub fn is_touching(a: &PlacedCollider, b: &PlacedCollider) -> bool {
    if !Bounds::collides(&a.bounds(), &b.bounds()) {
        return false;
    }

    match (a.shape(), b.shape()) {
        (ColliderShape::Box { .. }, ColliderShape::Box { .. }) => box_box(a, b),
        (ColliderShape::Circle { radius: radius_a }, ColliderShape::Circle { radius: radius_b }) => {
            circle_circle(a.center(), radius_a, b.center(), radius_b)
        }
        (ColliderShape::Box { size }, ColliderShape::Circle { radius }) => {
            box_circle(a, size * 0.5, b.center(), radius)
        }
        (ColliderShape::Circle { radius }, ColliderShape::Box { size }) => {
            box_circle(b, size * 0.5, a.center(), radius)
        }
    }
}

/// Separating axis test over the face normals of both boxes
fn box_box(a: &PlacedCollider, b: &PlacedCollider) -> bool {
    let (Some(corners_a), Some(corners_b)) = (a.corners(), b.corners()) else {
        return false;
    };
    let (Some(axes_a), Some(axes_b)) = (a.face_normals(), b.face_normals()) else {
        return false;
    };

    for axis in axes_a.iter().chain(axes_b.iter()) {
        if axis.length_squared() <= AXIS_EPSILON {
            continue;
        }

        let (min_a, max_a) = project(&corners_a, *axis);
        let (min_b, max_b) = project(&corners_b, *axis);
        if max_a < min_b || max_b < min_a {
            return false;
        }
    }

    true
}

fn circle_circle(center_a: Vec2, radius_a: f32, center_b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    center_a.distance_squared(center_b) < reach * reach
}

/// Closest point on the box to the circle center, found in box space
fn box_circle(placed_box: &PlacedCollider, half: Vec2, circle_center: Vec2, radius: f32) -> bool {
    let rotation = Vec2::from_angle(-placed_box.rotation);
    let local = rotation.rotate(circle_center - placed_box.center());
    let closest = local.clamp(-half, half);
    local.distance_squared(closest) < radius * radius
}
