//! Error types.
//!
//! Asset failures are reported and then ignored by the loaders; render failures are returned
//! to the frame loop, which decides whether to reconfigure the surface or skip the frame.

use std::path::PathBuf;
use thiserror::Error;

/// A font or image could not be loaded.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("problem loading image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("problem loading font {}: {source}", path.display())]
    Font {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font {} contains no usable faces", path.display())]
    EmptyFont { path: PathBuf },
}

/// A frame could not be drawn.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("surface lost or outdated")]
    SurfaceLost,

    #[error("failed to acquire next swap chain texture: {0}")]
    Surface(wgpu::SurfaceError),

    #[error("text preparation failed: {0}")]
    TextPrepare(#[from] glyphon::PrepareError),

    #[error("text rendering failed: {0}")]
    TextRender(#[from] glyphon::RenderError),
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(err: wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => RenderError::SurfaceLost,
            other => RenderError::Surface(other),
        }
    }
}
