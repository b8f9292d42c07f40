//! Raycasting for hover picking.

use crate::PickingWorld;
use glam::Vec3;
use rapier3d::prelude::*;

/// A ray in world space. `direction` need not be normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl PickRay {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }
}

/// Result of a pick query.
#[derive(Debug, Clone, Copy)]
pub struct PickHit {
    /// Pick index of the sphere that was hit.
    pub index: usize,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
}

impl PickingWorld {
    /// Cast a ray and return the nearest sphere it hits within `max_distance`.
    pub fn pick(&mut self, ray: PickRay, max_distance: f32) -> Option<PickHit> {
        let direction = ray.direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        self.refresh();

        let rapier_ray = Ray::new(
            point![ray.origin.x, ray.origin.y, ray.origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        let (collider, time_of_impact) = self.query_pipeline.cast_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &rapier_ray,
            max_distance,
            true,
            QueryFilter::default(),
        )?;

        let index = self.index_of(collider)?;
        Some(PickHit {
            index,
            distance: time_of_impact,
            point: ray.origin + direction * time_of_impact,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_of_spheres() -> PickingWorld {
        let mut world = PickingWorld::new();
        world.add_sphere(Vec3::new(0.0, 0.0, -10.0), 1.0);
        world.add_sphere(Vec3::new(0.0, 0.0, -20.0), 3.0);
        world.add_sphere(Vec3::new(5.0, 0.0, -10.0), 1.0);
        world
    }

    #[test]
    fn indices_are_sequential() {
        let world = row_of_spheres();
        assert_eq!(world.len(), 3);
    }

    #[test]
    fn nearest_sphere_wins() {
        let mut world = row_of_spheres();
        let hit = world
            .pick(PickRay::new(Vec3::ZERO, -Vec3::Z), 1000.0)
            .expect("ray passes through two spheres");
        assert_eq!(hit.index, 0);
        assert!((hit.distance - 9.0).abs() < 1e-3);
        assert!(hit.point.distance(Vec3::new(0.0, 0.0, -9.0)) < 1e-3);
    }

    #[test]
    fn miss_returns_none() {
        let mut world = row_of_spheres();
        assert!(world.pick(PickRay::new(Vec3::ZERO, Vec3::Y), 1000.0).is_none());
        assert!(world.pick(PickRay::new(Vec3::ZERO, -Vec3::Z), 5.0).is_none());
    }

    #[test]
    fn zero_direction_is_a_miss() {
        let mut world = row_of_spheres();
        assert!(world.pick(PickRay::new(Vec3::ZERO, Vec3::ZERO), 1000.0).is_none());
    }

    #[test]
    fn moved_sphere_is_picked_at_new_position() {
        let mut world = row_of_spheres();
        world.set_position(0, Vec3::new(0.0, 50.0, 0.0));
        let hit = world
            .pick(PickRay::new(Vec3::ZERO, -Vec3::Z), 1000.0)
            .expect("second sphere is still on the ray");
        assert_eq!(hit.index, 1);

        let hit = world
            .pick(PickRay::new(Vec3::ZERO, Vec3::Y), 1000.0)
            .expect("moved sphere is above the origin");
        assert_eq!(hit.index, 0);
        assert!((hit.distance - 49.0).abs() < 1e-3);
    }
}
