//! Image texture loading and caching.
//!
//! Scene files refer to images by path; each distinct path is decoded once
//! and shared between every texture that uses it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lumen_renderer::{ImageData, RenderError};
use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to load texture {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture {path} has invalid pixel data: {source}")]
    InvalidData {
        path: PathBuf,
        #[source]
        source: RenderError,
    },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Cache for decoded images, keyed by the path as written in the scene.
#[derive(Debug, Default)]
pub struct TextureCache {
    images: HashMap<String, Arc<ImageData>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a texture cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            images: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load an image from file, using the cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<ImageData>> {
        if let Some(image) = self.images.get(path) {
            return Ok(image.clone());
        }

        let full_path = self.resolve_path(path);
        let image = Arc::new(load_image_file(&full_path)?);
        self.images.insert(path.to_string(), image.clone());

        log::debug!(
            "Loaded texture: {} ({}x{})",
            full_path.display(),
            image.width(),
            image.height()
        );

        Ok(image)
    }

    /// Check if an image is cached.
    pub fn is_cached(&self, path: &str) -> bool {
        self.images.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Decode an image file to 8-bit RGB.
fn load_image_file(path: &Path) -> TextureResult<ImageData> {
    let rgb = image::open(path)
        .map_err(|source| TextureError::Load {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();
    let (width, height) = rgb.dimensions();

    ImageData::new(width, height, rgb.into_raw()).map_err(|source| TextureError::InvalidData {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lumen-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_texture_cache_empty() {
        let cache = TextureCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_load_relative_and_cache() {
        let dir = temp_dir("texture-cache");
        let pixels = vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 10, 20, 30];
        image::save_buffer(dir.join("tile.png"), &pixels, 2, 2, image::ColorType::Rgb8).unwrap();

        let mut cache = TextureCache::with_base_dir(&dir);
        let first = cache.load("tile.png").unwrap();
        assert_eq!((first.width(), first.height()), (2, 2));
        assert_eq!(first.pixel(1, 0), [0, 255, 0]);
        assert_eq!(first.pixel(1, 1), [10, 20, 30]);

        let second = cache.load("tile.png").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.is_cached("tile.png"));
        assert_eq!(cache.len(), 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let mut cache = TextureCache::with_base_dir(std::env::temp_dir());
        let err = cache.load("lumen-does-not-exist.png").unwrap_err();
        assert!(matches!(err, TextureError::Load { .. }));
        assert!(cache.is_empty());
    }
}
