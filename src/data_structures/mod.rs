//! Demo data structures: geometry, uniforms and textures.
//!
//! - `cube` contains the textured cube vertices, indices and vertex layout
//! - `settings` holds the constant buffer block and the model transform math
//! - `texture` contains the GPU texture wrapper and creation utilities

pub mod cube;
pub mod settings;
pub mod texture;
