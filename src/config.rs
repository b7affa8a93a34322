//! Demo configuration.
//!
//! [`DemoConfig`] carries every knob of the demo with the defaults of the
//! walkthrough. The binary fills it from the command line (see
//! [`crate::args`]); tests and embedders construct it directly.

use std::path::PathBuf;

use crate::render_target::SamplingMode;

/// Whether the projection used inside the render target is flipped vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlipY {
    /// Flip only on backends whose render textures have a bottom-left origin.
    #[default]
    Auto,
    Always,
    Never,
}

impl FlipY {
    /// Decides the flip for the backend the device runs on.
    ///
    /// wgpu exposes a top-left texture origin on every backend, including GL
    /// where it flips internally, so `Auto` never flips.
    pub fn resolve(self, backend: wgpu::Backend) -> bool {
        match self {
            FlipY::Always => true,
            FlipY::Never => false,
            FlipY::Auto => {
                log::debug!("{backend:?} renders textures with a top-left origin, no flip needed");
                false
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub title: String,
    pub window_size: (u32, u32),
    /// Render target sample count; 0 or 1 disables multisampling.
    pub samples: u32,
    pub sampling: SamplingMode,
    pub flip_y: FlipY,
    pub asset_dir: PathBuf,
    pub color_map: String,
    pub snapshot_path: PathBuf,
    pub backends: wgpu::Backends,
    /// Exit after this many frames.
    pub max_frames: Option<u64>,
    pub clear_colour: wgpu::Color,
    pub target_clear_colour: wgpu::Color,
    /// Radians per pixel of horizontal mouse motion.
    pub rotation_speed: f32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "offscreen-cube: render target".to_string(),
            window_size: (800, 600),
            samples: 8,
            sampling: SamplingMode::Resolve,
            flip_y: FlipY::Auto,
            asset_dir: PathBuf::from("assets"),
            color_map: "colorMap.jpg".to_string(),
            snapshot_path: PathBuf::from("RenderTargetTexture.png"),
            backends: wgpu::Backends::PRIMARY,
            max_frames: None,
            clear_colour: wgpu::Color {
                r: 0.1,
                g: 0.1,
                b: 0.4,
                a: 1.0,
            },
            target_clear_colour: wgpu::Color {
                r: 0.2,
                g: 0.7,
                b: 0.1,
                a: 1.0,
            },
            rotation_speed: 0.005,
        }
    }
}

impl DemoConfig {
    /// Edge length of the square render target.
    ///
    /// Custom multisampling reads every sample per fragment, so its target is
    /// kept small.
    pub fn render_target_size(&self) -> u32 {
        match self.sampling {
            SamplingMode::Resolve => 512,
            SamplingMode::Custom => 64,
        }
    }
}
