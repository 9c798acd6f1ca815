//! Random point-cloud starfield scattered in a slab behind the system.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::light::Color;

/// Default number of stars.
pub const DEFAULT_STAR_COUNT: u32 = 8000;

/// Side length of the slab the stars are scattered in.
pub const FIELD_EXTENT: f32 = 3000.0;

/// Static cloud of white points. Generated once, never mutated.
#[derive(Debug, Clone)]
pub struct Starfield {
    points: Vec<Vec3>,
    seed: u64,
    /// Point size in pixels at unit view distance.
    pub size: f32,
    /// Shrink points with distance from the camera.
    pub size_attenuation: bool,
    pub color: Color,
}

impl Starfield {
    /// Scatter `count` points. x and y lie in `[-1500, 1500)`, z in `(-3000, 0]`.
    ///
    /// The same seed always yields the same field. Without a seed one is
    /// drawn from the thread RNG and logged so a field can be reproduced.
    pub fn generate(count: u32, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        log::debug!("Generating {count} stars with seed {seed}");

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let points = (0..count)
            .map(|_| {
                let x = (rng.random::<f32>() - 0.5) * FIELD_EXTENT;
                let y = (rng.random::<f32>() - 0.5) * FIELD_EXTENT;
                let z = -rng.random::<f32>() * FIELD_EXTENT;
                Vec3::new(x, y, z)
            })
            .collect();

        Self {
            points,
            seed,
            size: 6.0,
            size_attenuation: true,
            color: Color::WHITE,
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Seed the field was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_count() {
        let field = Starfield::generate(DEFAULT_STAR_COUNT, Some(1));
        assert_eq!(field.len(), 8000);
    }

    #[test]
    fn test_points_within_slab() {
        let field = Starfield::generate(DEFAULT_STAR_COUNT, Some(99));
        for p in field.points() {
            assert!(p.x >= -1500.0 && p.x <= 1500.0, "x out of range: {}", p.x);
            assert!(p.y >= -1500.0 && p.y <= 1500.0, "y out of range: {}", p.y);
            assert!(p.z >= -3000.0 && p.z <= 0.0, "z out of range: {}", p.z);
        }
    }

    #[test]
    fn test_deterministic_with_same_seed() {
        let a = Starfield::generate(500, Some(12345));
        let b = Starfield::generate(500, Some(12345));
        assert_eq!(a.points(), b.points());
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = Starfield::generate(100, Some(1));
        let b = Starfield::generate(100, Some(2));
        assert_ne!(a.points(), b.points());
    }

    #[test]
    fn test_unseeded_field_records_its_seed() {
        let a = Starfield::generate(64, None);
        let b = Starfield::generate(64, Some(a.seed()));
        assert_eq!(a.points(), b.points());
    }

    #[test]
    fn test_points_spread_across_both_halves() {
        let field = Starfield::generate(DEFAULT_STAR_COUNT, Some(7));
        let left = field.points().iter().filter(|p| p.x < 0.0).count();
        let below = field.points().iter().filter(|p| p.y < 0.0).count();
        // Uniform sampling: each half should get roughly 4000 points.
        assert!((3500..4500).contains(&left));
        assert!((3500..4500).contains(&below));
    }

    #[test]
    fn test_zero_stars() {
        assert!(Starfield::generate(0, Some(0)).is_empty());
    }

    #[test]
    fn test_point_material_defaults() {
        let field = Starfield::generate(1, Some(0));
        assert_eq!(field.size, 6.0);
        assert!(field.size_attenuation);
        assert_eq!(field.color, Color::WHITE);
    }
}
