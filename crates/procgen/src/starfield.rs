//! Starfield backdrop: points scattered uniformly through a cube.

use glam::Vec3;
use rand::prelude::*;

/// Number of stars in the default backdrop.
pub const DEFAULT_STAR_COUNT: usize = 10_000;
/// Side length of the cube the stars are scattered in, centered on the origin.
pub const STARFIELD_EXTENT: f32 = 2000.0;

/// Generate `count` star positions with each coordinate drawn independently and
/// uniformly from `[-extent / 2, extent / 2)`.
pub fn generate_starfield<R: Rng + ?Sized>(rng: &mut R, count: usize, extent: f32) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            Vec3::new(
                (rng.gen::<f32>() - 0.5) * extent,
                (rng.gen::<f32>() - 0.5) * extent,
                (rng.gen::<f32>() - 0.5) * extent,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starfield_count_and_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let stars = generate_starfield(&mut rng, DEFAULT_STAR_COUNT, STARFIELD_EXTENT);
        assert_eq!(stars.len(), DEFAULT_STAR_COUNT);
        let half = STARFIELD_EXTENT / 2.0;
        for s in &stars {
            assert!(s.x >= -half && s.x < half);
            assert!(s.y >= -half && s.y < half);
            assert!(s.z >= -half && s.z < half);
        }
    }

    #[test]
    fn starfield_fills_the_cube() {
        let mut rng = StdRng::seed_from_u64(11);
        let stars = generate_starfield(&mut rng, DEFAULT_STAR_COUNT, STARFIELD_EXTENT);
        // Every octant of the cube should get roughly an eighth of the stars.
        let mut octants = [0usize; 8];
        for s in &stars {
            let i = (s.x >= 0.0) as usize | ((s.y >= 0.0) as usize) << 1 | ((s.z >= 0.0) as usize) << 2;
            octants[i] += 1;
        }
        for count in octants {
            assert!(count > 1000 && count < 1500, "octant count {}", count);
        }
    }

    #[test]
    fn same_seed_same_stars() {
        let a = generate_starfield(&mut StdRng::seed_from_u64(3), 16, STARFIELD_EXTENT);
        let b = generate_starfield(&mut StdRng::seed_from_u64(3), 16, STARFIELD_EXTENT);
        assert_eq!(a, b);
    }
}
