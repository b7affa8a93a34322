//! Render pipelines used by the demo.
//!
//! - `scene` draws the textured cube, into the render target and onto the screen
//! - `mipmap` regenerates the mip chain of a texture after it was rendered to

pub mod mipmap;
pub mod scene;
