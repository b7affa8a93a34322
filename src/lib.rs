//! offscreen-cube
//!
//! Render-to-texture demo on wgpu and winit. A rotating cube is drawn into a
//! multisampled off-screen render target, the mip chain of that texture is
//! regenerated, and a second cube on screen uses it as its surface. Mouse
//! buttons rotate the two cubes and the return key saves the render target
//! texture as a PNG.
//!
//! High-level modules
//! - `args` / `config`: command line and the demo configuration it produces
//! - `camera`: left-handed perspective projections
//! - `context`: window surface, adapter, device and queue
//! - `data_structures`: cube geometry, constant buffer layout, textures
//! - `flow`: winit event loop
//! - `input`: per-frame mouse and keyboard state
//! - `pipelines`: cube pipeline and mip generation
//! - `render_target`: off-screen color, multisample and depth attachments
//! - `resources`: texture loading and PNG snapshots
//! - `tutorial`: the demo itself
//!

pub mod args;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod input;
pub mod logging;
pub mod pipelines;
pub mod render_target;
pub mod resources;
pub mod tutorial;

// Re-exports commonly used types for convenience in downstream code.
pub use config::{DemoConfig, FlipY};
pub use render_target::{RenderTarget, SamplingMode};
pub use tutorial::{CubeRotation, Tutorial};
