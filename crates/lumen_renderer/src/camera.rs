//! Camera for ray generation.

use crate::sampling::{gen_f64, random_in_unit_disk};
use crate::RenderError;
use lumen_math::{Point3, Ray, Vec3};
use rand::RngCore;

/// Largest image width or height accepted by `initialize`.
pub const MAX_IMAGE_DIMENSION: u32 = 32_768;

/// Thin-lens camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    image_width: u32,
    aspect_ratio: f64,

    // Camera positioning
    look_from: Point3,
    look_at: Point3,
    vup: Vec3,

    // Lens settings
    vfov: f64,          // Vertical field of view in degrees
    defocus_angle: f64, // Variation angle of rays through each pixel
    focus_dist: f64,    // Distance from camera to plane of perfect focus

    // Cached computed values (set by initialize())
    image_height: u32,
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 100,
            aspect_ratio: 1.0,
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 1.0,
            // Cached values (initialized to defaults)
            image_height: 100,
            center: Point3::ZERO,
            pixel00_loc: Point3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        }
    }

    /// Set image width and aspect ratio (width over height).
    pub fn with_resolution(mut self, image_width: u32, aspect_ratio: f64) -> Self {
        self.image_width = image_width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_image_width(mut self, image_width: u32) -> Self {
        self.image_width = image_width;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    /// Image height, valid after `initialize`.
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn look_from(&self) -> Point3 {
        self.look_from
    }

    pub fn look_at(&self) -> Point3 {
        self.look_at
    }

    pub fn vup(&self) -> Vec3 {
        self.vup
    }

    /// Vertical field of view in degrees.
    pub fn vfov(&self) -> f64 {
        self.vfov
    }

    pub fn defocus_angle(&self) -> f64 {
        self.defocus_angle
    }

    pub fn focus_dist(&self) -> f64 {
        self.focus_dist
    }

    fn validate(&self) -> Result<(), RenderError> {
        let invalid = |msg: String| Err(RenderError::InvalidConfig(msg));

        if self.image_width == 0 {
            return invalid("image width must be positive".into());
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return invalid(format!("aspect ratio {} must be positive", self.aspect_ratio));
        }
        let height = self.image_width as f64 / self.aspect_ratio;
        if self.image_width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION as f64 {
            return invalid(format!(
                "image {}x{} exceeds {MAX_IMAGE_DIMENSION} pixels per side",
                self.image_width,
                height.floor()
            ));
        }
        if !(self.vfov.is_finite() && self.vfov > 0.0 && self.vfov < 180.0) {
            return invalid(format!("field of view {} must be in (0, 180)", self.vfov));
        }
        if !(self.focus_dist.is_finite() && self.focus_dist > 0.0) {
            return invalid(format!("focus distance {} must be positive", self.focus_dist));
        }
        if !(self.defocus_angle.is_finite() && self.defocus_angle >= 0.0) {
            return invalid(format!(
                "defocus angle {} must not be negative",
                self.defocus_angle
            ));
        }
        if self.look_from == self.look_at {
            return invalid("look-from and look-at must differ".into());
        }
        if self.vup.cross(self.look_from - self.look_at).length_squared() == 0.0 {
            return invalid("view-up must not be parallel to the view direction".into());
        }
        Ok(())
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) -> Result<(), RenderError> {
        self.validate()?;

        self.image_height = ((self.image_width as f64 / self.aspect_ratio) as u32).max(1);
        self.center = self.look_from;

        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f64 / self.image_height as f64);

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Calculate viewport vectors
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        // Calculate pixel delta vectors
        self.pixel_delta_u = viewport_u / self.image_width as f64;
        self.pixel_delta_v = viewport_v / self.image_height as f64;

        // Calculate upper left pixel location
        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;

        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;

        log::debug!(
            "Camera initialized: {}x{}, center {}, w {}",
            self.image_width,
            self.image_height,
            self.center,
            self.w
        );
        Ok(())
    }

    /// Point on the focus plane for pixel (i, j) shifted by a sub-pixel offset.
    pub fn pixel_sample(&self, i: u32, j: u32, (dx, dy): (f64, f64)) -> Point3 {
        self.pixel00_loc
            + (i as f64 + dx) * self.pixel_delta_u
            + (j as f64 + dy) * self.pixel_delta_v
    }

    /// Ray from the lens towards a point on the focus plane, at a random time.
    pub fn ray_through(&self, target: Point3, rng: &mut dyn RngCore) -> Ray {
        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = target - ray_origin;
        let ray_time = gen_f64(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Generate a ray for pixel (i, j) at the given sub-pixel offset.
    pub fn get_ray(&self, i: u32, j: u32, offset: (f64, f64), rng: &mut dyn RngCore) -> Ray {
        self.ray_through(self.pixel_sample(i, j, offset), rng)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
