//! Lumen scenes.
//!
//! Loads JSON scene documents and provides the built-in demo scenes, both
//! producing a [`Scene`] ready to hand to the renderer.

mod builtin;
pub mod description;
mod error;
mod texture;

use std::path::Path;

use lumen_renderer::{BvhNode, Camera, RenderConfig};

pub use builtin::{builtin, BUILTIN_SCENES};
pub use description::SceneDescription;
pub use error::{SceneError, SceneResult};
pub use texture::{TextureCache, TextureError};

/// Everything needed to render one image.
pub struct Scene {
    pub camera: Camera,
    pub config: RenderConfig,
    pub world: BvhNode,
}

impl Scene {
    /// Parse and build a scene from JSON, resolving image paths against `base_dir`.
    pub fn from_json(json: &str, base_dir: impl AsRef<Path>) -> SceneResult<Self> {
        SceneDescription::from_json(json)?.build(base_dir)
    }
}

/// Load a scene file. Image textures are looked up next to the file.
pub fn load_scene(path: impl AsRef<Path>) -> SceneResult<Scene> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    let scene = Scene::from_json(&json, base_dir)?;
    log::info!("Loaded scene {}", path.display());
    Ok(scene)
}

/// Resolve a built-in scene name or a path to a scene file.
///
/// Built-in names take precedence over files of the same name.
pub fn resolve(name_or_path: &str) -> SceneResult<Scene> {
    if BUILTIN_SCENES.contains(&name_or_path) {
        return builtin(name_or_path);
    }

    let path = Path::new(name_or_path);
    if path.is_file() {
        load_scene(path)
    } else {
        Err(SceneError::UnknownScene(name_or_path.to_string()))
    }
}
