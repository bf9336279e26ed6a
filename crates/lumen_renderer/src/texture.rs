//! Textures: spatially varying colour lookups.

use crate::{Perlin, RenderError};
use lumen_math::{Color, Interval, Point3};
use std::sync::Arc;

/// Trait for colour lookups by texture coordinates and hit point.
pub trait Texture: Send + Sync {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color;
}

/// A single constant colour.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        self.albedo
    }
}

/// 3D checkerboard alternating between two textures in world space.
pub struct CheckerTexture {
    inv_scale: f64,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f64, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f64, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let sum = cell.x as i64 + cell.y as i64 + cell.z as i64;

        if sum.rem_euclid(2) == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Grey Perlin noise.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f64,
}

impl NoiseTexture {
    pub fn new(noise: Perlin, scale: f64) -> Self {
        Self { noise, scale }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f64, _v: f64, p: Point3) -> Color {
        Color::ONE * 0.5 * (1.0 + self.noise.noise(self.scale * p))
    }
}

/// Decoded 8-bit RGB pixels, row-major from the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ImageData {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RenderError> {
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(RenderError::ImageDataSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// RGB bytes of the pixel at (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let index = (y as usize * self.width as usize + x as usize) * 3;
        [self.pixels[index], self.pixels[index + 1], self.pixels[index + 2]]
    }
}

/// Texture looked up from a decoded image by (u, v).
#[derive(Clone)]
pub struct ImageTexture {
    image: Arc<ImageData>,
}

impl ImageTexture {
    /// Solid cyan is returned for images without pixels.
    const MISSING: Color = Color::new(0.0, 1.0, 1.0);

    pub fn new(image: Arc<ImageData>) -> Self {
        Self { image }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: Point3) -> Color {
        if self.image.is_empty() {
            return Self::MISSING;
        }

        // Flip v to image row order
        let u = Interval::UNIT.clamp(u);
        let v = 1.0 - Interval::UNIT.clamp(v);

        let width = self.image.width();
        let height = self.image.height();
        let x = ((u * width as f64) as u32).min(width - 1);
        let y = ((v * height as f64) as u32).min(height - 1);

        let [r, g, b] = self.image.pixel(x, y);
        Color::new(r as f64, g as f64, b as f64) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_solid_color() {
        let texture = SolidColor::new(Color::new(0.2, 0.4, 0.6));
        assert_eq!(texture.value(0.3, 0.9, Point3::splat(5.0)), Color::new(0.2, 0.4, 0.6));
    }

    #[test]
    fn test_checker_alternates() {
        let white = Color::ONE;
        let black = Color::ZERO;
        let checker = CheckerTexture::from_colors(1.0, white, black);

        assert_eq!(checker.value(0.0, 0.0, Point3::new(0.5, 0.5, 0.5)), white);
        assert_eq!(checker.value(0.0, 0.0, Point3::new(1.5, 0.5, 0.5)), black);
        assert_eq!(checker.value(0.0, 0.0, Point3::new(1.5, 1.5, 0.5)), white);

        // Negative cells continue the pattern across the origin
        assert_eq!(checker.value(0.0, 0.0, Point3::new(-0.5, 0.5, 0.5)), black);
        assert_eq!(checker.value(0.0, 0.0, Point3::new(-0.5, -0.5, 0.5)), white);
        assert_eq!(checker.value(0.0, 0.0, Point3::new(-0.5, -0.5, -0.5)), black);
    }

    #[test]
    fn test_checker_scale() {
        let checker = CheckerTexture::from_colors(0.5, Color::ONE, Color::ZERO);
        assert_eq!(checker.value(0.0, 0.0, Point3::new(0.25, 0.1, 0.1)), Color::ONE);
        assert_eq!(checker.value(0.0, 0.0, Point3::new(0.75, 0.1, 0.1)), Color::ZERO);
    }

    #[test]
    fn test_noise_texture_is_grey_and_bounded() {
        let mut rng = StdRng::seed_from_u64(1);
        let texture = NoiseTexture::new(Perlin::new(&mut rng), 4.0);

        for i in 0..200 {
            let p = Point3::new(i as f64 * 0.37, i as f64 * -0.11, 2.5);
            let c = texture.value(0.0, 0.0, p);
            assert_eq!(c.x, c.y);
            assert_eq!(c.y, c.z);
            assert!(c.x.is_finite());
        }

        // Lattice points have zero noise
        assert_eq!(texture.value(0.0, 0.0, Point3::ZERO), Color::splat(0.5));
    }

    #[test]
    fn test_image_data_size_checked() {
        assert!(ImageData::new(2, 2, vec![0; 12]).is_ok());
        let err = ImageData::new(2, 2, vec![0; 11]).unwrap_err();
        assert!(matches!(
            err,
            RenderError::ImageDataSize {
                expected: 12,
                actual: 11,
                ..
            }
        ));
    }

    #[test]
    fn test_image_texture_lookup() {
        // 2x2: red, green on top; blue, white on bottom
        let pixels = vec![
            255, 0, 0, 0, 255, 0, //
            0, 0, 255, 255, 255, 255,
        ];
        let image = Arc::new(ImageData::new(2, 2, pixels).unwrap());
        let texture = ImageTexture::new(image);
        let p = Point3::ZERO;

        assert_eq!(texture.value(0.1, 0.9, p), Color::new(1.0, 0.0, 0.0));
        assert_eq!(texture.value(0.9, 0.9, p), Color::new(0.0, 1.0, 0.0));
        assert_eq!(texture.value(0.1, 0.1, p), Color::new(0.0, 0.0, 1.0));

        // Edges and out-of-range coordinates clamp to the border pixels
        assert_eq!(texture.value(1.0, 0.0, p), Color::ONE);
        assert_eq!(texture.value(7.0, -3.0, p), Color::ONE);
        assert_eq!(texture.value(-1.0, 2.0, p), Color::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_empty_image_is_cyan() {
        let image = Arc::new(ImageData::new(0, 0, Vec::new()).unwrap());
        let texture = ImageTexture::new(image);
        assert_eq!(texture.value(0.5, 0.5, Point3::ZERO), Color::new(0.0, 1.0, 1.0));
    }
}
