//! Demo scenes that ship with the renderer.

use std::f64::consts::FRAC_PI_4;
use std::sync::Arc;

use lumen_math::{Affine, Color, Point3, Vec3};
use lumen_renderer::sampling::{gen_f64, gen_range, random_vec};
use lumen_renderer::{
    Background, BvhNode, Camera, CheckerTexture, Dielectric, DiffuseLight, Hittable, ImageData,
    ImageTexture, Lambertian, Material, Metal, NoiseTexture, Perlin, Quad, RenderConfig, Sphere,
    Texture, Transform,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::description::DEFAULT_NOISE_SEED;
use crate::error::{SceneError, SceneResult};
use crate::texture::TextureCache;
use crate::Scene;

/// Names accepted by [`builtin`], in presentation order.
pub const BUILTIN_SCENES: &[&str] = &[
    "two-spheres",
    "materials",
    "random-spheres",
    "checker-spheres",
    "earth",
    "perlin-spheres",
    "quads",
    "simple-light",
    "cornell-box",
];

/// Seed for the placement of the small spheres in `random-spheres`.
const RANDOM_SPHERES_SEED: u64 = 42;

/// Image wrapped around the `earth` globe, looked up from the working directory.
pub const EARTH_MAP: &str = "earthmap.jpg";

const PALE_SKY: Color = Color::new(0.7, 0.8, 1.0);

/// Build a built-in scene by name.
pub fn builtin(name: &str) -> SceneResult<Scene> {
    let scene = match name {
        "two-spheres" => two_spheres(),
        "materials" => materials(),
        "random-spheres" => random_spheres(),
        "checker-spheres" => checker_spheres(),
        "earth" => earth(&mut TextureCache::new()),
        "perlin-spheres" => perlin_spheres(),
        "quads" => quads(),
        "simple-light" => simple_light(),
        "cornell-box" => cornell_box(),
        _ => return Err(SceneError::UnknownScene(name.to_string())),
    }?;
    log::debug!("Built scene '{name}'");
    Ok(scene)
}

fn with_background(background: Background) -> RenderConfig {
    RenderConfig {
        background,
        ..RenderConfig::default()
    }
}

fn finish(
    camera: Camera,
    config: RenderConfig,
    objects: Vec<Arc<dyn Hittable>>,
) -> SceneResult<Scene> {
    Ok(Scene {
        camera,
        config,
        world: BvhNode::new(objects)?,
    })
}

fn sphere(center: Point3, radius: f64, material: &Arc<dyn Material>) -> Arc<dyn Hittable> {
    Arc::new(Sphere::new(center, radius, material.clone()))
}

fn quad(q: Point3, u: Vec3, v: Vec3, material: &Arc<dyn Material>) -> Arc<dyn Hittable> {
    Arc::new(Quad::new(q, u, v, material.clone()))
}

fn lambertian(r: f64, g: f64, b: f64) -> Arc<dyn Material> {
    Arc::new(Lambertian::new(Color::new(r, g, b)))
}

fn noise_texture(scale: f64) -> Arc<dyn Texture> {
    let mut rng = StdRng::seed_from_u64(DEFAULT_NOISE_SEED);
    Arc::new(NoiseTexture::new(Perlin::new(&mut rng), scale))
}

fn tiles() -> Arc<dyn Texture> {
    Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ))
}

/// A blue and a red sphere touching in front of the default camera.
fn two_spheres() -> SceneResult<Scene> {
    let r = FRAC_PI_4.cos();
    let blue = lambertian(0.0, 0.0, 1.0);
    let red = lambertian(1.0, 0.0, 0.0);

    finish(
        Camera::new(),
        RenderConfig::default(),
        vec![
            sphere(Point3::new(-r, 0.0, -1.0), r, &blue),
            sphere(Point3::new(r, 0.0, -1.0), r, &red),
        ],
    )
}

/// Diffuse, hollow glass and fuzzy metal spheres on a yellow ground.
fn materials() -> SceneResult<Scene> {
    let camera = Camera::new()
        .with_position(Point3::new(-2.0, 2.0, 1.0), Point3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(20.0, 0.0, 1.0);

    let ground = lambertian(0.8, 0.8, 0.0);
    let center = lambertian(0.1, 0.2, 0.5);
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    let bubble: Arc<dyn Material> = Arc::new(Dielectric::new(1.0 / 1.5));
    let gold: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 1.0));

    finish(
        camera,
        with_background(Background::Solid(PALE_SKY)),
        vec![
            sphere(Point3::new(0.0, -100.5, -1.0), 100.0, &ground),
            sphere(Point3::new(0.0, 0.0, -1.2), 0.5, &center),
            sphere(Point3::new(-1.0, 0.0, -1.0), 0.5, &glass),
            sphere(Point3::new(-1.0, 0.0, -1.0), 0.4, &bubble),
            sphere(Point3::new(1.0, 0.0, -1.0), 0.5, &gold),
        ],
    )
}

/// The cover scene: a field of small random spheres around three large ones.
///
/// Diffuse spheres move upwards during the exposure.
fn random_spheres() -> SceneResult<Scene> {
    let camera = Camera::new()
        .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0);

    let ground: Arc<dyn Material> = Arc::new(Lambertian::from_texture(tiles()));
    let mut objects = vec![sphere(Point3::new(0.0, -1000.0, 0.0), 1000.0, &ground)];

    let mut rng = StdRng::seed_from_u64(RANDOM_SPHERES_SEED);
    for a in -11..11 {
        for b in -11..11 {
            let selection = gen_f64(&mut rng);
            let center = Point3::new(
                a as f64 + 0.9 * gen_f64(&mut rng),
                0.2,
                b as f64 + 0.9 * gen_f64(&mut rng),
            );

            if (center - Point3::new(4.0, 0.2, 0.0)).length() < 0.9 {
                continue;
            }

            let small: Arc<dyn Hittable> = if selection < 0.8 {
                let albedo = random_vec(&mut rng, 0.0, 1.0) * random_vec(&mut rng, 0.0, 1.0);
                let center2 = center + Vec3::new(0.0, gen_range(&mut rng, 0.0, 0.5), 0.0);
                Arc::new(Sphere::moving(
                    center,
                    center2,
                    0.2,
                    Arc::new(Lambertian::new(albedo)),
                ))
            } else if selection < 0.95 {
                let albedo = random_vec(&mut rng, 0.5, 1.0);
                let fuzz = gen_range(&mut rng, 0.0, 0.5);
                Arc::new(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz))))
            } else {
                Arc::new(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5))))
            };
            objects.push(small);
        }
    }

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    let brown = lambertian(0.4, 0.2, 0.1);
    let steel: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0));
    objects.push(sphere(Point3::new(0.0, 1.0, 0.0), 1.0, &glass));
    objects.push(sphere(Point3::new(-4.0, 1.0, 0.0), 1.0, &brown));
    objects.push(sphere(Point3::new(4.0, 1.0, 0.0), 1.0, &steel));

    finish(camera, with_background(Background::Solid(PALE_SKY)), objects)
}

fn checker_spheres() -> SceneResult<Scene> {
    let camera = Camera::new()
        .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    let checker: Arc<dyn Material> = Arc::new(Lambertian::from_texture(tiles()));

    finish(
        camera,
        RenderConfig::default(),
        vec![
            sphere(Point3::new(0.0, -10.0, 0.0), 10.0, &checker),
            sphere(Point3::new(0.0, 10.0, 0.0), 10.0, &checker),
        ],
    )
}

/// A globe wrapped in [`EARTH_MAP`]. Without the image it shows up cyan.
fn earth(textures: &mut TextureCache) -> SceneResult<Scene> {
    let camera = Camera::new()
        .with_position(Point3::new(0.0, 0.0, 12.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    let image = match textures.load(EARTH_MAP) {
        Ok(image) => image,
        Err(err) => {
            log::warn!("{err}, the globe renders cyan");
            Arc::new(ImageData::new(0, 0, Vec::new())?)
        }
    };
    let surface: Arc<dyn Material> =
        Arc::new(Lambertian::from_texture(Arc::new(ImageTexture::new(image))));

    finish(
        camera,
        with_background(Background::Solid(PALE_SKY)),
        vec![sphere(Point3::ZERO, 2.0, &surface)],
    )
}

fn perlin_spheres() -> SceneResult<Scene> {
    let camera = Camera::new()
        .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    let marble: Arc<dyn Material> = Arc::new(Lambertian::from_texture(noise_texture(4.0)));

    finish(
        camera,
        with_background(Background::Solid(PALE_SKY)),
        vec![
            sphere(Point3::new(0.0, -1000.0, 0.0), 1000.0, &marble),
            sphere(Point3::new(0.0, 2.0, 0.0), 2.0, &marble),
        ],
    )
}

/// Five colored quads boxing in the camera's view.
fn quads() -> SceneResult<Scene> {
    let camera = Camera::new()
        .with_position(Point3::new(0.0, 0.0, 9.0), Point3::ZERO, Vec3::Y)
        .with_lens(80.0, 0.0, 10.0);

    let left_red = lambertian(1.0, 0.2, 0.2);
    let back_green = lambertian(0.2, 1.0, 0.2);
    let right_blue = lambertian(0.2, 0.2, 1.0);
    let upper_orange = lambertian(1.0, 0.5, 0.0);
    let lower_teal = lambertian(0.2, 0.8, 0.8);

    finish(
        camera,
        with_background(Background::Solid(PALE_SKY)),
        vec![
            quad(
                Point3::new(-3.0, -2.0, 5.0),
                Vec3::new(0.0, 0.0, -4.0),
                Vec3::new(0.0, 4.0, 0.0),
                &left_red,
            ),
            quad(
                Point3::new(-2.0, -2.0, 0.0),
                Vec3::new(4.0, 0.0, 0.0),
                Vec3::new(0.0, 4.0, 0.0),
                &back_green,
            ),
            quad(
                Point3::new(3.0, -2.0, 1.0),
                Vec3::new(0.0, 0.0, 4.0),
                Vec3::new(0.0, 4.0, 0.0),
                &right_blue,
            ),
            quad(
                Point3::new(-2.0, 3.0, 1.0),
                Vec3::new(4.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 4.0),
                &upper_orange,
            ),
            quad(
                Point3::new(-2.0, -3.0, 5.0),
                Vec3::new(4.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, -4.0),
                &lower_teal,
            ),
        ],
    )
}

/// Noise-textured spheres lit only by a spherical and a rectangular lamp.
fn simple_light() -> SceneResult<Scene> {
    let camera = Camera::new()
        .with_position(Point3::new(26.0, 3.0, 6.0), Point3::new(0.0, 2.0, 0.0), Vec3::Y)
        .with_lens(20.0, 0.0, 10.0);

    let marble: Arc<dyn Material> = Arc::new(Lambertian::from_texture(noise_texture(4.0)));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(4.0)));

    finish(
        camera,
        with_background(Background::Solid(Color::ZERO)),
        vec![
            sphere(Point3::new(0.0, -1000.0, 0.0), 1000.0, &marble),
            sphere(Point3::new(0.0, 2.0, 0.0), 2.0, &marble),
            sphere(Point3::new(0.0, 7.0, 0.0), 2.0, &light),
            quad(
                Point3::new(3.0, 1.0, -2.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(0.0, 2.0, 0.0),
                &light,
            ),
        ],
    )
}

/// The Cornell box with two rotated white blocks.
fn cornell_box() -> SceneResult<Scene> {
    let camera = Camera::new()
        .with_position(
            Point3::new(278.0, 278.0, -800.0),
            Point3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0);

    let red = lambertian(0.65, 0.05, 0.05);
    let white = lambertian(0.73, 0.73, 0.73);
    let green = lambertian(0.12, 0.45, 0.15);
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(15.0)));

    let side = Vec3::splat(555.0);
    let (vx, vy, vz) = (
        Vec3::new(side.x, 0.0, 0.0),
        Vec3::new(0.0, side.y, 0.0),
        Vec3::new(0.0, 0.0, side.z),
    );

    let tall = Quad::make_box(Point3::ZERO, Point3::new(165.0, 330.0, 165.0), white.clone());
    let tall = Transform::new(
        Arc::new(tall),
        Affine::new()
            .rotate_y(15.0)
            .translate(Vec3::new(265.0, 0.0, 295.0)),
    );

    let short = Quad::make_box(Point3::ZERO, Point3::splat(165.0), white.clone());
    let short = Transform::new(
        Arc::new(short),
        Affine::new()
            .rotate_y(-18.0)
            .translate(Vec3::new(130.0, 0.0, 65.0)),
    );

    finish(
        camera,
        with_background(Background::Solid(Color::ZERO)),
        vec![
            quad(vx, vy, vz, &green),
            quad(Point3::ZERO, vy, vz, &red),
            quad(
                Point3::new(343.0, 554.0, 332.0),
                Vec3::new(-130.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, -105.0),
                &light,
            ),
            quad(Point3::ZERO, vx, vz, &white),
            quad(side, -vx, -vz, &white),
            quad(vz, vx, vy, &white),
            Arc::new(tall),
            Arc::new(short),
        ],
    )
}
