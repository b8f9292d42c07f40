//! Orbit guide rings.

use glam::Vec3;
use std::f32::consts::TAU;

/// Points per orbit guide ring.
pub const ORBIT_RING_SEGMENTS: usize = 100;

/// Closed ring of `segments` points on a horizontal circle of `radius` at
/// `height`. The first point is not repeated; draw it as a line loop.
///
/// Point `i` sits at angle `i / segments * TAU`, measured the same way as
/// `engine_core::Orbit`, so a planet at angle 0 sits on point 0.
pub fn orbit_ring(radius: f32, height: f32, segments: usize) -> Vec<Vec3> {
    (0..segments)
        .map(|i| {
            let theta = i as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            Vec3::new(radius * cos, height, radius * sin)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_points_lie_on_circle() {
        let ring = orbit_ring(35.0, 20.0, ORBIT_RING_SEGMENTS);
        assert_eq!(ring.len(), ORBIT_RING_SEGMENTS);
        for p in &ring {
            assert!((p.y - 20.0).abs() < 1e-6);
            let r = (p.x * p.x + p.z * p.z).sqrt();
            assert!((r - 35.0).abs() < 1e-3);
        }
    }

    #[test]
    fn ring_is_not_explicitly_closed() {
        let ring = orbit_ring(10.0, 0.0, ORBIT_RING_SEGMENTS);
        let first = ring[0];
        let last = ring[ORBIT_RING_SEGMENTS - 1];
        assert!(first.distance(Vec3::new(10.0, 0.0, 0.0)) < 1e-5);
        assert!(first.distance(last) > 0.1);
    }
}
