//! Lumen renderer - CPU path tracing.
//!
//! A Monte Carlo path tracer for offline still images: surfaces and a BVH
//! for intersection, materials and textures for light transport, a thin-lens
//! camera, and a rayon-driven per-pixel sampling loop.

mod antialias;
mod bvh;
mod camera;
mod error;
mod hittable;
mod image_buffer;
mod material;
mod perlin;
mod quad;
mod renderer;
pub mod sampling;
mod sphere;
mod texture;
mod transform;

pub use antialias::AntiAlias;
pub use bvh::{BvhChild, BvhNode};
pub use camera::Camera;
pub use error::RenderError;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use image_buffer::{color_to_rgb, ImageBuffer};
pub use material::{Dielectric, DiffuseLight, Lambertian, Material, Metal, ScatterResult};
pub use perlin::Perlin;
pub use quad::Quad;
pub use renderer::{ray_color, render, render_pixel, Background, RenderConfig, SKY_BLUE};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageData, ImageTexture, NoiseTexture, SolidColor, Texture};
pub use transform::Transform;

/// Re-export the math types used throughout the public API.
pub use lumen_math::{Aabb, Affine, Axis, Color, Interval, Point3, Ray, Vec3, Vec3Ext};
