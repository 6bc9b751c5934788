//! Scene queries: raycasts, overlap tests and touching checks
//!
//! A [`PhysicsQuery`] is a read-only snapshot of every active collider,
//! taken by [`crate::physics::PhysicsWorld::query`]. Results come back in
//! entity id order unless noted otherwise.

use super::collision::narrow_phase;
use super::collision::shapes::PlacedCollider;
use super::components::{Collider, Rigidbody};
use super::layers::LayerMask;
use super::PhysicsError;
use crate::config::PhysicsConfig;
use crate::core::entity::{Inactive, Transform, World};
use glam::Vec2;
use hecs::Entity;

/// Result of a successful raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// The entity owning the collider that was hit
    pub entity: Entity,
    /// World space point where the ray meets the collider
    pub point: Vec2,
    /// Surface normal at `point`; faces back along the ray for hits that
    /// start inside the collider
    pub normal: Vec2,
    /// Distance from the ray origin
    pub distance: f32,
    /// `distance` as a fraction of the maximum distance (zero for unbounded rays)
    pub fraction: f32,
    /// Does the hit entity carry a rigidbody?
    pub rigidbody: bool,
}

#[derive(Debug, Clone)]
struct QueryCollider {
    entity: Entity,
    placed: PlacedCollider,
    rigidbody: bool,
}

/// Read-only view of the colliders in a world
#[derive(Debug, Clone)]
pub struct PhysicsQuery {
    colliders: Vec<QueryCollider>,
    hit_triggers: bool,
    start_in_colliders: bool,
}

impl PhysicsQuery {
    /// Snapshot the active colliders of `world`
    ///
    /// Fails with [`PhysicsError::InvalidShape`] on the first malformed
    /// collider in entity id order, like a physics tick would.
    pub fn new(world: &World, config: &PhysicsConfig) -> Result<Self, PhysicsError> {
        let mut colliders: Vec<QueryCollider> = world
            .query::<(&Collider, &Transform, Option<&Rigidbody>)>()
            .without::<&Inactive>()
            .iter()
            .map(|(entity, (collider, transform, rigidbody))| QueryCollider {
                entity,
                placed: PlacedCollider::from_transform(*collider, transform),
                rigidbody: rigidbody.is_some(),
            })
            .collect();
        colliders.sort_by_key(|entry| entry.entity.id());

        for entry in &colliders {
            entry
                .placed
                .collider
                .validate()
                .map_err(|reason| PhysicsError::InvalidShape {
                    entity: entry.entity,
                    reason,
                })?;
        }

        Ok(Self {
            colliders,
            hit_triggers: config.queries_hit_triggers,
            start_in_colliders: config.queries_start_in_colliders,
        })
    }

    /// Number of colliders visible to this query
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    fn candidates(&self, mask: LayerMask) -> impl Iterator<Item = &QueryCollider> + '_ {
        let hit_triggers = self.hit_triggers;
        self.colliders.iter().filter(move |entry| {
            entry.placed.collider.layer.intersects(mask)
                && (hit_triggers || !entry.placed.collider.is_trigger)
        })
    }

    fn find(&self, entity: Entity) -> Option<&QueryCollider> {
        self.colliders.iter().find(|entry| entry.entity == entity)
    }

    /// Nearest collider hit by the ray, if any
    pub fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Result<Option<RaycastHit>, PhysicsError> {
        let hits = self.raycast_all(origin, direction, max_distance, mask)?;
        Ok(hits.into_iter().next())
    }

    /// Every collider hit by the ray, nearest first
    pub fn raycast_all(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Result<Vec<RaycastHit>, PhysicsError> {
        if !origin.is_finite() || !direction.is_finite() || direction.length_squared() <= f32::EPSILON
        {
            return Err(PhysicsError::DegenerateRay);
        }
        let direction = direction.normalize();
        let max_distance = if max_distance.is_nan() {
            f32::INFINITY
        } else {
            max_distance.max(0.0)
        };

        let mut hits: Vec<RaycastHit> = self
            .candidates(mask)
            .filter(|entry| self.start_in_colliders || !entry.placed.overlap_point(origin))
            .filter_map(|entry| {
                let hit = entry.placed.raycast(origin, direction, max_distance)?;
                let fraction = if max_distance.is_finite() && max_distance > 0.0 {
                    hit.distance / max_distance
                } else {
                    0.0
                };
                Some(RaycastHit {
                    entity: entry.entity,
                    point: hit.point,
                    normal: hit.normal,
                    distance: hit.distance,
                    fraction,
                    rigidbody: entry.rigidbody,
                })
            })
            .collect();

        // Stable sort keeps entity order between equally distant hits
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        Ok(hits)
    }

    /// Colliders covering `point`
    pub fn overlap_point(&self, point: Vec2, mask: LayerMask) -> Vec<Entity> {
        self.candidates(mask)
            .filter(|entry| entry.placed.overlap_point(point))
            .map(|entry| entry.entity)
            .collect()
    }

    /// Colliders overlapping a box of full `size` turned by `angle` radians
    pub fn overlap_box(
        &self,
        center: Vec2,
        size: Vec2,
        angle: f32,
        mask: LayerMask,
    ) -> Result<Vec<Entity>, PhysicsError> {
        let area = PlacedCollider::new(Collider::box_collider(size), center, angle);
        self.overlapping(&area, mask)
    }

    /// Colliders overlapping a circle
    pub fn overlap_circle(
        &self,
        center: Vec2,
        radius: f32,
        mask: LayerMask,
    ) -> Result<Vec<Entity>, PhysicsError> {
        let area = PlacedCollider::new(Collider::circle(radius), center, 0.0);
        self.overlapping(&area, mask)
    }

    fn overlapping(&self, area: &PlacedCollider, mask: LayerMask) -> Result<Vec<Entity>, PhysicsError> {
        area.collider.validate().map_err(PhysicsError::InvalidQueryShape)?;
        if !area.position.is_finite() || !area.rotation.is_finite() {
            return Err(PhysicsError::InvalidQueryShape(format!(
                "placement must be finite, got {:?} at {} rad",
                area.position, area.rotation
            )));
        }

        Ok(self
            .candidates(mask)
            .filter(|entry| narrow_phase::is_touching(area, &entry.placed))
            .map(|entry| entry.entity)
            .collect())
    }

    /// Do the colliders of `a` and `b` overlap?
    ///
    /// False when either entity has no active collider.
    pub fn is_touching(&self, a: Entity, b: Entity) -> bool {
        match (self.find(a), self.find(b)) {
            (Some(a), Some(b)) if a.entity != b.entity => {
                narrow_phase::is_touching(&a.placed, &b.placed)
            }
            _ => false,
        }
    }

    /// Does the collider of `entity` overlap any other collider in `mask`?
    pub fn is_touching_layers(&self, entity: Entity, mask: LayerMask) -> bool {
        let Some(own) = self.find(entity) else {
            return false;
        };
        self.candidates(mask)
            .filter(|entry| entry.entity != entity)
            .any(|entry| narrow_phase::is_touching(&own.placed, &entry.placed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> (World, Entity, Entity, Entity) {
        let mut world = World::new();
        let floor = world.spawn((
            Transform::from_xy(0.0, 0.0),
            Collider::box_collider(Vec2::new(10.0, 2.0)),
        ));
        let ball = world.spawn((
            Transform::from_xy(0.0, 5.0),
            Collider::circle(1.0).on_layer(LayerMask::layer(1)),
            Rigidbody::default(),
        ));
        let sensor = world.spawn((
            Transform::from_xy(4.0, 3.0),
            Collider::box_collider(Vec2::splat(2.0)).as_trigger(),
        ));
        (world, floor, ball, sensor)
    }

    #[test]
    fn test_raycast_hits_nearest() {
        let (world, floor, ball, _) = scene();
        let query = PhysicsQuery::new(&world, &PhysicsConfig::default()).unwrap();

        let hit = query
            .raycast(Vec2::new(0.0, 10.0), Vec2::new(0.0, -2.0), 100.0, LayerMask::ALL)
            .unwrap()
            .unwrap();
        assert_eq!(hit.entity, ball);
        assert!(hit.rigidbody);
        assert!((hit.distance - 4.0).abs() < 1e-4);
        assert!((hit.fraction - 0.04).abs() < 1e-5);
        assert!((hit.normal - Vec2::Y).length() < 1e-4);

        let all = query
            .raycast_all(Vec2::new(0.0, 10.0), Vec2::NEG_Y, 100.0, LayerMask::ALL)
            .unwrap();
        let order: Vec<_> = all.iter().map(|hit| hit.entity).collect();
        assert_eq!(order, vec![ball, floor]);
    }

    #[test]
    fn test_raycast_layer_filter() {
        let (world, floor, _, _) = scene();
        let query = PhysicsQuery::new(&world, &PhysicsConfig::default()).unwrap();

        let hit = query
            .raycast(Vec2::new(0.0, 10.0), Vec2::NEG_Y, 100.0, LayerMask::DEFAULT)
            .unwrap()
            .unwrap();
        assert_eq!(hit.entity, floor);
        assert!(!hit.rigidbody);
    }

    #[test]
    fn test_degenerate_ray() {
        let (world, _, _, _) = scene();
        let query = PhysicsQuery::new(&world, &PhysicsConfig::default()).unwrap();
        assert!(matches!(
            query.raycast(Vec2::ZERO, Vec2::ZERO, 10.0, LayerMask::ALL),
            Err(PhysicsError::DegenerateRay)
        ));
    }

    #[test]
    fn test_start_inside_collider_setting() {
        let (world, floor, _, _) = scene();
        let inside = Vec2::new(0.0, 0.5);

        let query = PhysicsQuery::new(&world, &PhysicsConfig::default()).unwrap();
        let hit = query
            .raycast(inside, Vec2::X, 100.0, LayerMask::DEFAULT)
            .unwrap()
            .unwrap();
        assert_eq!(hit.entity, floor);
        assert_eq!(hit.distance, 0.0);
        assert_eq!(hit.normal, Vec2::NEG_X);

        let config = PhysicsConfig {
            queries_start_in_colliders: false,
            ..Default::default()
        };
        let query = PhysicsQuery::new(&world, &config).unwrap();
        assert!(query
            .raycast(inside, Vec2::X, 100.0, LayerMask::DEFAULT)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_trigger_visibility_setting() {
        let (world, _, _, sensor) = scene();
        let point = Vec2::new(4.0, 3.0);

        let query = PhysicsQuery::new(&world, &PhysicsConfig::default()).unwrap();
        assert_eq!(query.overlap_point(point, LayerMask::ALL), vec![sensor]);

        let config = PhysicsConfig {
            queries_hit_triggers: false,
            ..Default::default()
        };
        let query = PhysicsQuery::new(&world, &config).unwrap();
        assert!(query.overlap_point(point, LayerMask::ALL).is_empty());
    }

    #[test]
    fn test_overlap_shapes() {
        let (world, floor, ball, sensor) = scene();
        let query = PhysicsQuery::new(&world, &PhysicsConfig::default()).unwrap();

        assert_eq!(
            query
                .overlap_box(Vec2::new(0.0, 3.0), Vec2::new(20.0, 6.0), 0.0, LayerMask::ALL)
                .unwrap(),
            vec![floor, ball, sensor]
        );
        assert_eq!(
            query.overlap_circle(Vec2::new(0.0, 5.0), 0.5, LayerMask::ALL).unwrap(),
            vec![ball]
        );
        assert!(query
            .overlap_circle(Vec2::new(0.0, 5.0), 0.5, LayerMask::DEFAULT)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_malformed_collider_fails_snapshot() {
        let (mut world, _, _, _) = scene();
        let bad = world.spawn((
            Transform::from_xy(0.0, 0.0),
            Collider::box_collider(Vec2::splat(-2.0)),
        ));

        let result = PhysicsQuery::new(&world, &PhysicsConfig::default());
        assert!(matches!(result, Err(PhysicsError::InvalidShape { entity, .. }) if entity == bad));
    }

    #[test]
    fn test_malformed_overlap_area_is_rejected() {
        let (world, _, _, _) = scene();
        let query = PhysicsQuery::new(&world, &PhysicsConfig::default()).unwrap();

        assert!(matches!(
            query.overlap_circle(Vec2::ZERO, 0.0, LayerMask::ALL),
            Err(PhysicsError::InvalidQueryShape(_))
        ));
        assert!(matches!(
            query.overlap_circle(Vec2::ZERO, f32::NAN, LayerMask::ALL),
            Err(PhysicsError::InvalidQueryShape(_))
        ));
        assert!(matches!(
            query.overlap_box(Vec2::ZERO, Vec2::new(-1.0, 1.0), 0.0, LayerMask::ALL),
            Err(PhysicsError::InvalidQueryShape(_))
        ));
        assert!(matches!(
            query.overlap_box(Vec2::new(f32::INFINITY, 0.0), Vec2::ONE, 0.0, LayerMask::ALL),
            Err(PhysicsError::InvalidQueryShape(_))
        ));
    }

    #[test]
    fn test_inactive_colliders_are_invisible() {
        let (mut world, floor, _, _) = scene();
        world.set_active(floor, false).unwrap();
        let query = PhysicsQuery::new(&world, &PhysicsConfig::default()).unwrap();
        assert_eq!(query.len(), 2);
        assert!(query.overlap_point(Vec2::ZERO, LayerMask::ALL).is_empty());
    }

    #[test]
    fn test_touching_checks() {
        let mut world = World::new();
        let a = world.spawn((Transform::from_xy(0.0, 0.0), Collider::default()));
        let b = world.spawn((
            Transform::from_xy(0.9, 0.0),
            Collider::default().on_layer(LayerMask::layer(2)),
        ));
        let far = world.spawn((Transform::from_xy(5.0, 0.0), Collider::default()));

        let query = PhysicsQuery::new(&world, &PhysicsConfig::default()).unwrap();
        assert!(query.is_touching(a, b));
        assert!(!query.is_touching(a, far));
        assert!(!query.is_touching(a, a));

        assert!(query.is_touching_layers(a, LayerMask::layer(2)));
        assert!(!query.is_touching_layers(a, LayerMask::DEFAULT));
        assert!(!query.is_touching_layers(far, LayerMask::ALL));
    }
}
