//! Main renderer module.
//!
//! The scene description is GPU-free; the remaining modules turn it into draw calls.

/// Per-screen draw lists.
pub mod scene;
/// Textured sprite quads.
pub mod sprite;
/// Text rendering system.
pub mod text;
/// Core WGPU setup and frame submission.
pub mod wgpu_lib;
