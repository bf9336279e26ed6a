use thiserror::Error;

/// Errors raised while setting up or finishing a render.
///
/// Misses and absorbed rays are not errors; they are `None` on the hot path.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot build a BVH over an empty scene")]
    EmptyScene,

    #[error("image data has {actual} bytes, expected {expected} for {width}x{height} RGB")]
    ImageDataSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}
