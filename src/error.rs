use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading, preprocessing or decoding an image.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to open image {}: {source}", path.display())]
    ImageOpen {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("region {x},{y} {width}x{height} does not intersect a {image_width}x{image_height} image")]
    EmptyRegion {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },

    #[error("debug directory is not empty: {}", .0.display())]
    DebugDirNotEmpty(PathBuf),

    #[error("failed to write debug image: {0}")]
    DebugOutput(#[source] image::ImageError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;
