//! Collision detection subsystem

pub mod broad_phase;
pub mod narrow_phase;
pub mod shapes;

use glam::Vec2;

/// Axis-aligned bounding box used by the broad phase
///
/// Stored as center and full size; `min`, `max` and the extents are derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub center: Vec2,
    pub size: Vec2,
}

impl Bounds {
    /// Create bounds from a center point and full size
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    /// Create bounds from the four edge coordinates
    ///
    /// Swapped edges (e.g. `top < bottom`) describe the same box.
    pub fn from_edges(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            center: Vec2::new((left + right) * 0.5, (top + bottom) * 0.5),
            size: Vec2::new((right - left).abs(), (top - bottom).abs()),
        }
    }

    /// Create bounds from min and max points
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self::from_edges(max.y, min.x, min.y, max.x)
    }

    /// Tightest bounds containing every point
    pub fn enclosing(points: &[Vec2]) -> Self {
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        for point in points {
            min = min.min(*point);
            max = max.max(*point);
        }
        Self::from_min_max(min, max)
    }

    /// Half of the size
    pub fn extents(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.extents()
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.extents()
    }

    pub fn left(&self) -> f32 {
        self.min().x
    }

    pub fn right(&self) -> f32 {
        self.max().x
    }

    pub fn top(&self) -> f32 {
        self.max().y
    }

    pub fn bottom(&self) -> f32 {
        self.min().y
    }

    /// Overlap test between two boxes; boxes sharing an edge collide
    pub fn collides(lhs: &Bounds, rhs: &Bounds) -> bool {
        let (lmin, lmax) = (lhs.min(), lhs.max());
        let (rmin, rmax) = (rhs.min(), rhs.max());
        !(lmin.x > rmax.x || rmin.x > lmax.x || lmin.y > rmax.y || rmin.y > lmax.y)
    }

    pub fn collides_with(&self, other: &Bounds) -> bool {
        Bounds::collides(self, other)
    }

    /// Is `point` inside or on the boundary?
    pub fn contains_point(&self, point: Vec2) -> bool {
        !(self.left() > point.x
            || self.right() < point.x
            || self.top() < point.y
            || self.bottom() > point.y)
    }

    /// Grow the size by `amount` along both axes
    pub fn expand(&self, amount: f32) -> Bounds {
        Bounds::new(self.center, self.size + Vec2::splat(amount))
    }
}
