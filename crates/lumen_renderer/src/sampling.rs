//! Random sampling helpers.
//!
//! Everything takes an explicit `&mut dyn RngCore` so each sample can own
//! its generator and renders stay reproducible under parallel execution.

use lumen_math::Vec3;
use rand::{Rng, RngCore};

/// Uniform `f64` in `[0, 1)`.
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Uniform `f64` in `[min, max)`.
#[inline]
pub fn gen_range(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    min + (max - min) * gen_f64(rng)
}

/// Vector with each component uniform in `[min, max)`.
pub fn random_vec(rng: &mut dyn RngCore, min: f64, max: f64) -> Vec3 {
    Vec3::new(
        gen_range(rng, min, max),
        gen_range(rng, min, max),
        gen_range(rng, min, max),
    )
}

/// Uniformly distributed unit vector (rejection sampled from the unit ball).
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_vec(rng, -1.0, 1.0);
        let len_sq = p.length_squared();
        if 1e-160 < len_sq && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
}

/// Uniform point in the unit disk on the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_range(rng, -1.0, 1.0), gen_range(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Derive the seed of one pixel sample from the render seed.
///
/// The base seed is scrambled on its own, then row, column and index are
/// each folded in with one more SplitMix64 round, so no coordinate can
/// cancel out a change in another.
pub fn sample_seed(base: u64, row: u32, col: u32, index: u32) -> u64 {
    [row, col, index]
        .into_iter()
        .fold(splitmix64(base), |acc, part| splitmix64(acc ^ u64::from(part)))
}

/// One SplitMix64 step: a bijective scramble of `z`.
fn splitmix64(z: u64) -> u64 {
    let mut z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_unit_vector_length() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_unit_disk_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..1000 {
            let p = random_in_unit_disk(&mut rng);
            assert!(p.length_squared() < 1.0);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn test_gen_range_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let x = gen_range(&mut rng, -2.0, 5.0);
            assert!((-2.0..5.0).contains(&x));
        }
    }

    #[test]
    fn test_sample_seed_distinct() {
        let a = sample_seed(7, 0, 0, 0);
        let b = sample_seed(7, 0, 0, 1);
        let c = sample_seed(7, 0, 1, 0);
        let d = sample_seed(7, 1, 0, 0);
        let e = sample_seed(8, 0, 0, 0);

        let seeds = [a, b, c, d, e];
        for i in 0..seeds.len() {
            for j in i + 1..seeds.len() {
                assert_ne!(seeds[i], seeds[j]);
            }
        }
        assert_eq!(sample_seed(7, 3, 4, 5), sample_seed(7, 3, 4, 5));
    }

    #[test]
    fn test_neighbouring_seeds_share_no_streams() {
        use std::collections::HashSet;

        let streams = |base: u64| -> HashSet<u64> {
            (0..64).map(|index| sample_seed(base, 2, 3, index)).collect()
        };

        for (a, b) in [(42, 43), (0, 1), (1 << 20, 0), (1 << 40, 0)] {
            assert!(streams(a).is_disjoint(&streams(b)), "seeds {a} and {b} overlap");
        }
    }

    #[test]
    fn test_large_index_does_not_alias_column() {
        assert_ne!(sample_seed(5, 0, 0, 1 << 20), sample_seed(5, 0, 1, 0));
        assert_ne!(sample_seed(5, 0, 1, 0), sample_seed(5, 1, 0, 0));
        assert_ne!(sample_seed(5, 0, 1, 2), sample_seed(5, 0, 2, 1));
    }
}
