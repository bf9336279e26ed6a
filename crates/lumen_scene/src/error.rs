use std::path::PathBuf;

use lumen_math::MathError;
use lumen_renderer::RenderError;
use thiserror::Error;

use crate::texture::TextureError;

/// Errors that can occur while loading or building a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{kind} with name '{name}' not found")]
    UnknownReference { kind: &'static str, name: String },

    #[error("{kind} '{name}' refers back to itself")]
    CyclicReference { kind: &'static str, name: String },

    #[error("invalid scene: {0}")]
    Invalid(String),

    #[error("unknown scene '{0}': not a built-in scene or an existing file")]
    UnknownScene(String),

    #[error("texture error: {0}")]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("invalid transform: {0}")]
    Math(#[from] MathError),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
