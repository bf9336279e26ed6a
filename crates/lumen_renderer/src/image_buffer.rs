//! 8-bit RGB render output and file writers.

use crate::RenderError;
use lumen_math::Color;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Largest channel value before quantization, so 1.0 maps to 255 not 256.
const MAX_CHANNEL: f64 = 0.999999;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma-corrected 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let quantize = |c: f64| (255.999 * linear_to_gamma(c).clamp(0.0, MAX_CHANNEL)) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Row-major 8-bit RGB image, `width * height * 3` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.index(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Set the pixel at (x, y) from a linear color.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.data[i..i + 3].copy_from_slice(&color_to_rgb(color));
    }

    /// Write a binary PPM (P6).
    pub fn write_ppm<W: Write>(&self, writer: &mut W) -> Result<(), RenderError> {
        write!(writer, "P6\n{} {} 255\n", self.width, self.height)?;
        writer.write_all(&self.data)?;
        Ok(())
    }

    /// Save to disk, choosing the format from the file extension.
    ///
    /// `.ppm` is written directly; everything else goes through `image`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        let is_ppm = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

        if is_ppm {
            let mut writer = BufWriter::new(File::create(path)?);
            self.write_ppm(&mut writer)?;
            writer.flush()?;
        } else {
            image::save_buffer(
                path,
                &self.data,
                self.width,
                self.height,
                image::ColorType::Rgb8,
            )?;
        }

        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-0.3), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-12);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_rgb(Color::splat(7.5)), [255, 255, 255]);
        assert_eq!(color_to_rgb(Color::new(-1.0, 0.25, 1.0)), [0, 127, 255]);
    }

    #[test]
    fn test_buffer_layout() {
        let mut image = ImageBuffer::new(3, 2);
        assert_eq!(image.data.len(), 18);

        image.set(2, 1, Color::new(1.0, 0.0, 0.0));
        assert_eq!(image.get(2, 1), [255, 0, 0]);
        assert_eq!(&image.data[15..18], &[255, 0, 0]);
        assert_eq!(image.get(0, 0), [0, 0, 0]);
    }

    #[test]
    fn test_write_ppm() {
        let mut image = ImageBuffer::new(2, 1);
        image.set(0, 0, Color::ONE);

        let mut bytes = Vec::new();
        image.write_ppm(&mut bytes).unwrap();

        let header = b"P6\n2 1 255\n";
        assert_eq!(&bytes[..header.len()], header);
        assert_eq!(&bytes[header.len()..], &[255, 255, 255, 0, 0, 0]);
    }

    #[test]
    fn test_save_ppm_and_png() {
        let dir = std::env::temp_dir().join(format!("lumen-image-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut image = ImageBuffer::new(4, 3);
        image.set(1, 1, Color::new(0.0, 1.0, 0.0));

        let ppm = dir.join("out.ppm");
        image.save(&ppm).unwrap();
        let bytes = std::fs::read(&ppm).unwrap();
        assert!(bytes.starts_with(b"P6\n4 3 255\n"));
        assert_eq!(bytes.len(), b"P6\n4 3 255\n".len() + 36);

        let png = dir.join("out.png");
        image.save(&png).unwrap();
        let decoded = image::open(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.into_raw(), image.data);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
