//! Command line arguments.
//!
//! Parsed with clap and converted into a [`DemoConfig`]; every flag defaults
//! to the value of [`DemoConfig::default`].

use std::path::PathBuf;

use clap::Parser;

use crate::{
    config::{DemoConfig, FlipY},
    render_target::SamplingMode,
};

/// GPU API selection for wgpu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CliGpuApi {
    /// Vulkan, Metal, DX12 or browser WebGPU, whichever the platform offers.
    #[default]
    Auto,
    Vulkan,
    Metal,
    Dx12,
    /// OpenGL / GLES.
    Gl,
}

impl From<CliGpuApi> for wgpu::Backends {
    fn from(api: CliGpuApi) -> Self {
        match api {
            CliGpuApi::Auto => wgpu::Backends::PRIMARY,
            CliGpuApi::Vulkan => wgpu::Backends::VULKAN,
            CliGpuApi::Metal => wgpu::Backends::METAL,
            CliGpuApi::Dx12 => wgpu::Backends::DX12,
            CliGpuApi::Gl => wgpu::Backends::GL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CliFlipY {
    #[default]
    Auto,
    Always,
    Never,
}

impl From<CliFlipY> for FlipY {
    fn from(flip: CliFlipY) -> Self {
        match flip {
            CliFlipY::Auto => FlipY::Auto,
            CliFlipY::Always => FlipY::Always,
            CliFlipY::Never => FlipY::Never,
        }
    }
}

/// Renders a rotating cube into an off-screen target and shows it on a second cube.
#[derive(Parser, Debug)]
#[command(
    name = "offscreen-cube",
    version,
    after_help = "Controls:\n  \
        left mouse button + move on X    rotate the outer cube\n  \
        right mouse button + move on X   rotate the inner cube\n  \
        return                           save the render target texture as PNG"
)]
pub struct Args {
    /// Initial window width in pixels.
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Initial window height in pixels.
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Render target sample count (1 disables multisampling).
    #[arg(long, default_value_t = 8)]
    pub samples: u32,

    /// Render straight into a multisample texture and average its samples in
    /// the fragment shader instead of resolving.
    #[arg(long)]
    pub custom_multisampling: bool,

    /// Flip the render target projection vertically.
    #[arg(long, value_enum, default_value = "auto")]
    pub flip_y: CliFlipY,

    /// Directory holding colorMap.jpg.
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,

    /// Where the render target texture is saved when return is pressed.
    #[arg(long, default_value = "RenderTargetTexture.png")]
    pub snapshot: PathBuf,

    /// GPU API used by wgpu.
    #[arg(long, value_enum, default_value = "auto")]
    pub gpu_api: CliGpuApi,

    /// Exit after rendering N frames.
    #[arg(long)]
    pub max_frames: Option<u64>,

    /// Log filter in env_logger syntax, e.g. "debug" or "offscreen_cube=debug,wgpu=warn".
    #[arg(long)]
    pub log: Option<String>,
}

impl From<Args> for DemoConfig {
    fn from(args: Args) -> Self {
        Self {
            window_size: (args.width, args.height),
            samples: args.samples,
            sampling: if args.custom_multisampling {
                SamplingMode::Custom
            } else {
                SamplingMode::Resolve
            },
            flip_y: args.flip_y.into(),
            asset_dir: args.assets,
            snapshot_path: args.snapshot,
            backends: args.gpu_api.into(),
            max_frames: args.max_frames,
            ..Default::default()
        }
    }
}
