//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Grid or jittered anti-aliasing
//! - Per-sample seeded random streams, so a seed reproduces an image exactly
//! - Gamma correction and 8-bit quantization

use crate::sampling::sample_seed;
use crate::{AntiAlias, Camera, Color, Hittable, ImageBuffer, RenderError};
use lumen_math::{Interval, Ray};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

/// Top color of the sky gradient.
pub const SKY_BLUE: Color = Color::new(0.5, 0.7, 1.0);

/// Closest accepted hit distance, keeps scattered rays off their own surface.
const SHADOW_EPSILON: f64 = 0.001;

/// Radiance for rays that escape the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Solid(Color),
    /// Vertical white to blue gradient.
    Sky,
}

impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match *self {
            Background::Solid(color) => color,
            Background::Sky => {
                let unit_direction = ray.direction().normalize();
                let a = 0.5 * (unit_direction.y + 1.0);
                Color::ONE.lerp(SKY_BLUE, a)
            }
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Sky
    }
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Sub-pixel sample pattern
    pub anti_alias: AntiAlias,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Color of rays that hit nothing
    pub background: Background,
    /// Base seed; a random one is chosen and logged when unset
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            anti_alias: AntiAlias::default(),
            max_depth: 10,
            background: Background::default(),
            seed: None,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), RenderError> {
        self.anti_alias.validate()
    }
}

/// Compute the color seen by a ray.
///
/// Traces the ray through the scene, bouncing off surfaces and
/// accumulating emitted light filtered by each bounce's attenuation.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    // Bounce budget exhausted
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(SHADOW_EPSILON, f64::INFINITY)) else {
        return background.color(ray);
    };

    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, world, depth - 1, background, rng);
            emission + result.attenuation * scattered_color
        }
        // Absorbed
        None => emission,
    }
}

/// Average radiance over all samples of pixel (x, y).
///
/// Each sample runs on the rayon pool with its own generator derived from
/// `seed` and the sample's position, then samples are summed in order.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    seed: u64,
) -> Color {
    let count = config.anti_alias.sample_count();

    let samples: Vec<Color> = (0..count)
        .into_par_iter()
        .map(|index| {
            let mut rng = StdRng::seed_from_u64(sample_seed(seed, y, x, index));
            let offset = config.anti_alias.offset(index, &mut rng);
            let ray = camera.get_ray(x, y, offset, &mut rng);
            ray_color(&ray, world, config.max_depth, &config.background, &mut rng)
        })
        .collect();

    let sum = samples.iter().fold(Color::ZERO, |acc, c| acc + *c);
    sum / count as f64
}

/// Render the entire scene to an 8-bit image.
///
/// The camera is initialized on a copy, so the caller's camera is untouched.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
) -> Result<ImageBuffer, RenderError> {
    config.validate()?;
    let mut camera = camera.clone();
    camera.initialize()?;

    let seed = config.seed.unwrap_or_else(rand::random);
    let width = camera.image_width();
    let height = camera.image_height();

    log::info!(
        "Rendering {}x{} @ {} spp, depth {}, seed {} on {} threads",
        width,
        height,
        config.anti_alias.sample_count(),
        config.max_depth,
        seed,
        rayon::current_num_threads()
    );

    let mut image = ImageBuffer::new(width, height);
    let progress = progress_bar(height);

    for y in row_order(height) {
        let row: Vec<Color> = (0..width)
            .into_par_iter()
            .map(|x| render_pixel(&camera, world, x, y, config, seed))
            .collect();

        for (x, color) in row.into_iter().enumerate() {
            image.set(x as u32, y, color);
        }

        log::debug!("Row {} done", y);
        progress.inc(1);
    }

    progress.finish_and_clear();
    log::info!("Done in {:.2?}", progress.elapsed());
    Ok(image)
}

/// Rows in a fixed scrambled order.
///
/// Sky-heavy rows finish fast, so a mixed order gives steadier time
/// estimates. Falls back to top-down when the stride is not coprime.
fn row_order(height: u32) -> Vec<u32> {
    const STRIDE: u64 = 65537;

    if height == 0 {
        return Vec::new();
    }
    if gcd(STRIDE, height as u64) != 1 {
        return (0..height).collect();
    }
    (0..height as u64)
        .map(|y| ((y * STRIDE) % height as u64) as u32)
        .collect()
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Row progress with an ETA, drawn only when info logging is on.
fn progress_bar(rows: u32) -> ProgressBar {
    if !log::log_enabled!(log::Level::Info) {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(u64::from(rows));
    let style = ProgressStyle::with_template("{bar:40} {percent}% rows {pos}/{len} ETA: {eta}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HittableList, Lambertian, Material, Point3, Sphere, Vec3};
    use std::sync::Arc;

    fn two_spheres() -> HittableList {
        let r = std::f64::consts::FRAC_PI_4.cos();
        let blue: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.0, 0.0, 1.0)));
        let red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(1.0, 0.0, 0.0)));

        HittableList::new()
            .with(Arc::new(Sphere::new(Point3::new(-r, 0.0, -1.0), r, blue)))
            .with(Arc::new(Sphere::new(Point3::new(r, 0.0, -1.0), r, red)))
    }

    fn seeded(samples: u32, seed: u64) -> RenderConfig {
        RenderConfig {
            anti_alias: AntiAlias::Random(samples),
            seed: Some(seed),
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_sky_gradient() {
        let sky = Background::Sky;

        let up = sky.color(&Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0)));
        let down = sky.color(&Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0)));
        let level = sky.color(&Ray::new_simple(Vec3::ZERO, Vec3::X));

        assert!((up - SKY_BLUE).length() < 1e-12);
        assert!((down - Color::ONE).length() < 1e-12);
        assert!((level - Color::new(0.75, 0.85, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_solid_background() {
        let bg = Background::Solid(Color::new(0.1, 0.2, 0.3));
        let color = bg.color(&Ray::new_simple(Vec3::ZERO, Vec3::Y));
        assert_eq!(color, Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_depth_zero_is_black() {
        let world = two_spheres();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));

        let color = ray_color(&ray, &world, 0, &Background::Sky, &mut rng);
        assert_eq!(color, Color::ZERO);

        // Same ray with budget left sees the sky
        let color = ray_color(&ray, &world, 1, &Background::Sky, &mut rng);
        assert!((color - SKY_BLUE).length() < 1e-12);
    }

    #[test]
    fn test_emission_only_for_lights() {
        let light: Arc<dyn Material> = Arc::new(crate::DiffuseLight::new(Color::splat(3.0)));
        let world = HittableList::new().with(Arc::new(Sphere::new(
            Point3::new(0.0, 0.0, -3.0),
            1.0,
            light,
        )));
        let mut rng = StdRng::seed_from_u64(2);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let color = ray_color(&ray, &world, 5, &Background::Solid(Color::ZERO), &mut rng);
        assert_eq!(color, Color::splat(3.0));
    }

    #[test]
    fn test_two_spheres_blue_left_red_right() {
        let camera = Camera::new().with_resolution(40, 2.0);
        let config = RenderConfig {
            anti_alias: AntiAlias::Grid { x: 2, y: 2 },
            max_depth: 5,
            background: Background::Sky,
            seed: Some(7),
        };

        let image = render(&camera, &two_spheres(), &config).unwrap();
        assert_eq!((image.width, image.height), (40, 20));
        assert_eq!(image.data.len(), 40 * 20 * 3);

        for (x, y) in [(8, 10), (12, 9), (14, 11)] {
            let [r, g, b] = image.get(x, y);
            assert!(b > r && b > g, "pixel ({x},{y}) = {:?} should be blue", [r, g, b]);
        }
        for (x, y) in [(31, 10), (27, 9), (25, 11)] {
            let [r, g, b] = image.get(x, y);
            assert!(r > g && r > b, "pixel ({x},{y}) = {:?} should be red", [r, g, b]);
        }
    }

    #[test]
    fn test_render_is_reproducible_with_seed() {
        let camera = Camera::new().with_resolution(16, 1.0);
        let world = two_spheres();

        let a = render(&camera, &world, &seeded(8, 42)).unwrap();
        let b = render(&camera, &world, &seeded(8, 42)).unwrap();
        assert_eq!(a, b);

        let c = render(&camera, &world, &seeded(8, 43)).unwrap();
        assert_ne!(a.data, c.data);
    }

    #[test]
    fn test_render_pixel_matches_render() {
        let camera = Camera::new().with_resolution(8, 1.0);
        let world = two_spheres();
        let config = seeded(4, 9);

        let image = render(&camera, &world, &config).unwrap();

        let mut initialized = camera.clone();
        initialized.initialize().unwrap();
        let color = render_pixel(&initialized, &world, 3, 5, &config, 9);
        assert_eq!(image.get(3, 5), crate::color_to_rgb(color));
    }

    #[test]
    fn test_render_rejects_bad_config() {
        let world = two_spheres();
        let config = RenderConfig {
            anti_alias: AntiAlias::Random(0),
            ..RenderConfig::default()
        };
        assert!(matches!(
            render(&Camera::new(), &world, &config),
            Err(RenderError::InvalidConfig(_))
        ));
        assert!(matches!(
            render(&Camera::new().with_image_width(0), &world, &RenderConfig::default()),
            Err(RenderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_row_order_is_permutation() {
        for height in [1, 2, 7, 100, 450] {
            let mut order = row_order(height);
            assert_eq!(order.len(), height as usize);
            order.sort_unstable();
            assert_eq!(order, (0..height).collect::<Vec<_>>());
        }
        assert_eq!(row_order(5), vec![0, 2, 4, 1, 3]);
        assert!(row_order(0).is_empty());
    }

    #[test]
    fn test_progress_bar_counts_rows() {
        let bar = progress_bar(12);
        for _ in row_order(12).into_iter().take(5) {
            bar.inc(1);
        }
        assert_eq!(bar.position(), 5);
        bar.finish_and_clear();
        assert!(bar.is_finished());
    }
}
