//! Gradient (Perlin) noise.

use crate::sampling::random_vec;
use lumen_math::{Point3, Vec3};
use rand::{Rng, RngCore};

const POINT_COUNT: usize = 256;

/// Lattice of random gradient vectors addressed through three permutations.
#[derive(Clone)]
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let gradients = (0..POINT_COUNT).map(|_| random_vec(rng, -1.0, 1.0)).collect();

        Self {
            gradients,
            perm_x: Self::generate_perm(rng),
            perm_y: Self::generate_perm(rng),
            perm_z: Self::generate_perm(rng),
        }
    }

    /// Smoothed noise in roughly `[-1, 1]`.
    pub fn noise(&self, p: Point3) -> f64 {
        let floor = p.floor();
        let frac = p - floor;

        let i = floor.x as i64;
        let j = floor.y as i64;
        let k = floor.z as i64;

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let index = self.perm_x[Self::wrap(i + di as i64)]
                        ^ self.perm_y[Self::wrap(j + dj as i64)]
                        ^ self.perm_z[Self::wrap(k + dk as i64)];
                    *cell = self.gradients[index];
                }
            }
        }

        Self::interpolate(&c, frac)
    }

    #[inline]
    fn wrap(index: i64) -> usize {
        (index & (POINT_COUNT as i64 - 1)) as usize
    }

    fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..POINT_COUNT).collect();

        // Fisher-Yates
        for i in (1..POINT_COUNT).rev() {
            let target = rng.gen_range(0..=i);
            perm.swap(i, target);
        }

        perm
    }

    fn interpolate(c: &[[[Vec3; 2]; 2]; 2], frac: Vec3) -> f64 {
        // Hermite smoothing
        let smooth = frac * frac * (Vec3::splat(3.0) - 2.0 * frac);

        let mut accum = 0.0;
        for (i, plane) in c.iter().enumerate() {
            let fi = i as f64;
            for (j, row) in plane.iter().enumerate() {
                let fj = j as f64;
                for (k, gradient) in row.iter().enumerate() {
                    let fk = k as f64;
                    let weight = frac - Vec3::new(fi, fj, fk);
                    accum += (fi * smooth.x + (1.0 - fi) * (1.0 - smooth.x))
                        * (fj * smooth.y + (1.0 - fj) * (1.0 - smooth.y))
                        * (fk * smooth.z + (1.0 - fk) * (1.0 - smooth.z))
                        * gradient.dot(weight);
                }
            }
        }

        accum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_permutations_are_permutations() {
        let mut rng = StdRng::seed_from_u64(5);
        let perlin = Perlin::new(&mut rng);

        for perm in [&perlin.perm_x, &perlin.perm_y, &perlin.perm_z] {
            let mut sorted = perm.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..POINT_COUNT).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_noise_is_zero_on_lattice() {
        let mut rng = StdRng::seed_from_u64(6);
        let perlin = Perlin::new(&mut rng);

        for p in [Vec3::ZERO, Vec3::new(3.0, -2.0, 7.0), Vec3::new(-100.0, 5.0, 255.0)] {
            assert!(perlin.noise(p).abs() < 1e-12);
        }
    }

    #[test]
    fn test_noise_bounded_and_deterministic() {
        let a = Perlin::new(&mut StdRng::seed_from_u64(7));
        let b = Perlin::new(&mut StdRng::seed_from_u64(7));
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..1000 {
            let p = random_vec(&mut rng, -50.0, 50.0);
            let n = a.noise(p);
            assert!(n.is_finite() && n.abs() <= 3.0, "noise {n} out of range");
            assert_eq!(n, b.noise(p));
        }
    }

    #[test]
    fn test_noise_is_continuous() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(9));
        let p = Vec3::new(1.3, 2.7, -0.4);
        let q = p + Vec3::splat(1e-7);
        assert!((perlin.noise(p) - perlin.noise(q)).abs() < 1e-5);
    }
}
