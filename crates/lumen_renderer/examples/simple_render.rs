//! Simple path tracer example.
//!
//! Renders a basic scene with spheres and saves it as a binary PPM.

use lumen_renderer::{
    render, AntiAlias, Background, BvhNode, Camera, Color, Dielectric, Hittable, Lambertian,
    Material, Metal, Point3, RenderConfig, Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Build the scene
    let start = std::time::Instant::now();
    let world = build_scene()?;
    log::info!("Scene built in {:?}", start.elapsed());

    // Set up camera
    let camera = Camera::new()
        .with_resolution(400, 16.0 / 9.0)
        .with_position(
            Point3::new(13.0, 2.0, 3.0), // look_from
            Point3::new(0.0, 0.0, 0.0),  // look_at
            Vec3::new(0.0, 1.0, 0.0),    // vup
        )
        .with_lens(20.0, 0.6, 10.0);

    // Render configuration
    let config = RenderConfig {
        anti_alias: AntiAlias::Random(32),
        max_depth: 10,
        background: Background::Sky,
        seed: Some(2024),
    };

    let image = render(&camera, &world, &config)?;

    // Save as PPM
    image.save("output.ppm")?;
    Ok(())
}

fn build_scene() -> Result<BvhNode, lumen_renderer::RenderError> {
    let mut objects: Vec<Arc<dyn Hittable>> = Vec::new();
    let mut sphere = |center: Point3, radius: f64, material: Arc<dyn Material>| {
        objects.push(Arc::new(Sphere::new(center, radius, material)));
    };

    // Ground
    sphere(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
    );

    // Three main spheres
    sphere(Point3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Dielectric::new(1.5)));
    sphere(
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    );
    sphere(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    );

    // Small random spheres
    let mut rng = StdRng::seed_from_u64(7);

    for a in -5..5 {
        for b in -5..5 {
            let center = Point3::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );

            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f64 = rng.gen();
            let material: Arc<dyn Material> = if choose_mat < 0.8 {
                // Diffuse
                let albedo = Color::new(
                    rng.gen::<f64>() * rng.gen::<f64>(),
                    rng.gen::<f64>() * rng.gen::<f64>(),
                    rng.gen::<f64>() * rng.gen::<f64>(),
                );
                Arc::new(Lambertian::new(albedo))
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = Color::new(
                    0.5 + 0.5 * rng.gen::<f64>(),
                    0.5 + 0.5 * rng.gen::<f64>(),
                    0.5 + 0.5 * rng.gen::<f64>(),
                );
                Arc::new(Metal::new(albedo, 0.5 * rng.gen::<f64>()))
            } else {
                // Glass
                Arc::new(Dielectric::new(1.5))
            };
            sphere(center, 0.2, material);
        }
    }

    log::info!("Created {} objects", objects.len());
    BvhNode::new(objects)
}
