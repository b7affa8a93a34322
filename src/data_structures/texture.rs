//! GPU textures and texture creation utilities.
//!
//! This module provides [`Texture`], a wrapper around WGPU texture resources,
//! and helpers for the three kinds of texture the demo needs: depth buffers,
//! render textures (render-attachment capable, optionally mip-mapped or
//! multisampled) and color maps uploaded from decoded images.

use anyhow::*;
use image::GenericImageView;

/// A GPU texture with its default view.
///
/// The `view` always covers every mip level of the texture, which is what a
/// shader binding wants. Render passes that write a single level create their
/// own view via [`Texture::mip_view`].
#[derive(Clone, Debug)]
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl Texture {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Color format of the off-screen render target and of uploaded color maps.
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Create a depth texture for depth-testing during rendering.
    ///
    /// # Arguments
    ///
    /// * `size` is [width, height] of the texture in pixels
    /// * `sample_count` has to match the color attachment it is paired with
    /// * `label` is used as a debug label for the GPU resource
    pub fn create_depth_texture(
        device: &wgpu::Device,
        size: [u32; 2],
        sample_count: u32,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
        }
    }

    /// Create an empty texture that can be rendered into and sampled afterwards.
    ///
    /// Multisampled textures must have exactly one mip level; callers pass
    /// `mip_level_count = 1` whenever `sample_count > 1`.
    pub fn create_render_texture(
        device: &wgpu::Device,
        size: [u32; 2],
        format: wgpu::TextureFormat,
        mip_level_count: u32,
        sample_count: u32,
        label: &str,
    ) -> Self {
        debug_assert!(sample_count == 1 || mip_level_count == 1);
        let mut usage =
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        if sample_count == 1 {
            // Only single sample textures can be read back for snapshots.
            usage |= wgpu::TextureUsages::COPY_SRC;
        }
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size[0].max(1),
                height: size[1].max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
        }
    }

    /// Create a transient multisample color buffer that is only rendered into
    /// and resolved, never bound to a shader.
    ///
    /// The usage is `RENDER_ATTACHMENT` alone: on the GL backend a resolve from
    /// a multisample texture that is also `TEXTURE_BINDING` leaves the resolve
    /// target untouched.
    pub fn create_msaa_buffer(
        device: &wgpu::Device,
        size: [u32; 2],
        format: wgpu::TextureFormat,
        sample_count: u32,
        label: &str,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size[0].max(1),
                height: size[1].max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { texture, view }
    }

    /// Upload a decoded image as an sRGB color map with a full mip chain.
    ///
    /// Only level 0 is written here. The remaining levels are filled by
    /// [`crate::pipelines::mipmap::MipGenerator`], which is why the texture is
    /// also a render attachment.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: Option<&str>,
    ) -> Result<Self> {
        let dimensions = img.dimensions();
        ensure!(
            dimensions.0 > 0 && dimensions.1 > 0,
            "image {:?} has no pixels",
            label
        );
        let rgba = img.to_rgba8();

        let size = wgpu::Extent3d {
            width: dimensions.0,
            height: dimensions.1,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: mip_level_count(dimensions.0, dimensions.1),
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            &rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * dimensions.0),
                rows_per_image: Some(dimensions.1),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            texture,
            view,
        })
    }

    /// A view of exactly one mip level, suitable as a render attachment.
    pub fn mip_view(&self, level: u32) -> wgpu::TextureView {
        self.texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("mip level view"),
            base_mip_level: level,
            mip_level_count: Some(1),
            ..Default::default()
        })
    }

    pub fn size(&self) -> [u32; 2] {
        [self.texture.width(), self.texture.height()]
    }

    pub fn is_multisampled(&self) -> bool {
        self.texture.sample_count() > 1
    }
}

/// Number of levels in a full mip chain for a `width` x `height` texture.
///
/// Every level halves the larger dimension (rounding down) until it reaches one
/// pixel, i.e. `floor(log2(max(width, height))) + 1`.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    let largest = width.max(height).max(1);
    u32::BITS - largest.leading_zeros()
}

/// Sampler used for every texture the cubes display.
///
/// Outside of [0, 1] the sampler returns an opaque black border so the slightly
/// enlarged texture coordinates of the cube show a frame around each face.
/// Border addressing is an optional device feature; without it the edge texels
/// are repeated instead.
pub fn create_border_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    let border = device
        .features()
        .contains(wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER);
    if !border {
        log::warn!("ADDRESS_MODE_CLAMP_TO_BORDER is unavailable, falling back to clamp-to-edge");
    }
    let address_mode = if border {
        wgpu::AddressMode::ClampToBorder
    } else {
        wgpu::AddressMode::ClampToEdge
    };
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("border sampler"),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Linear,
        anisotropy_clamp: 8,
        border_color: border.then_some(wgpu::SamplerBorderColor::OpaqueBlack),
        ..Default::default()
    })
}
