//! Off-screen render target.
//!
//! A [`RenderTarget`] bundles what a render pass into a texture needs: the
//! texture that is sampled afterwards, an optional multisample color buffer
//! that resolves into it, and a depth buffer. Two sampling modes exist:
//!
//! - [`SamplingMode::Resolve`]: the texture is single sample with a full mip
//!   chain. With more than one sample the pass renders into a transient
//!   multisample attachment that is resolved into mip level 0.
//! - [`SamplingMode::Custom`]: the texture itself is multisampled and the
//!   fragment shader averages its samples when the second cube is drawn.

use crate::data_structures::texture::{Texture, mip_level_count};

/// How the multisampled scene reaches the texture shown on the second cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingMode {
    #[default]
    Resolve,
    Custom,
}

/// Picks the highest supported sample count that does not exceed `requested`.
///
/// A request of 0 is treated as 1 (multisampling disabled). One sample is
/// always valid, so the result is never 0.
pub fn resolve_sample_count(requested: u32, is_supported: impl Fn(u32) -> bool) -> u32 {
    [16, 8, 4, 2]
        .into_iter()
        .filter(|&count| count <= requested)
        .find(|&count| is_supported(count))
        .unwrap_or(1)
}

/// Format features as the device sees them.
///
/// Adapter specific features are only valid when the device was created with
/// `TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES`; otherwise only the guaranteed
/// set may be used.
pub fn format_features(
    adapter: &wgpu::Adapter,
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
) -> wgpu::TextureFormatFeatures {
    if device
        .features()
        .contains(wgpu::Features::TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES)
    {
        adapter.get_texture_format_features(format)
    } else {
        format.guaranteed_format_features(device.features())
    }
}

#[derive(Debug)]
pub struct RenderTarget {
    size: [u32; 2],
    sample_count: u32,
    mode: SamplingMode,
    texture: Texture,
    /// Mip level 0 of `texture`, the level the scene is drawn into.
    attachment_view: wgpu::TextureView,
    msaa: Option<Texture>,
    depth: Texture,
}

impl RenderTarget {
    /// Creates a render target with a color texture, a depth buffer and, when
    /// needed, a multisample color buffer.
    ///
    /// `requested_samples` is clamped to what the adapter supports for both the
    /// color and the depth format. Custom sampling needs at least two samples
    /// and falls back to [`SamplingMode::Resolve`] otherwise.
    pub fn new(
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        size: [u32; 2],
        requested_samples: u32,
        mode: SamplingMode,
        format: wgpu::TextureFormat,
    ) -> Self {
        let color_features = format_features(adapter, device, format);
        let depth_features = format_features(adapter, device, Texture::DEPTH_FORMAT);
        let sample_count = resolve_sample_count(requested_samples, |count| {
            color_features.flags.sample_count_supported(count)
                && depth_features.flags.sample_count_supported(count)
        });
        if sample_count != requested_samples.max(1) {
            log::warn!(
                "{} samples requested for the render target, using {}",
                requested_samples,
                sample_count
            );
        }

        let mode = if mode == SamplingMode::Custom && sample_count == 1 {
            log::warn!("custom multisampling needs more than one sample, resolving instead");
            SamplingMode::Resolve
        } else {
            mode
        };

        let (texture, msaa) = match mode {
            SamplingMode::Resolve => {
                let texture = Texture::create_render_texture(
                    device,
                    size,
                    format,
                    mip_level_count(size[0], size[1]),
                    1,
                    "render target texture",
                );
                let msaa = (sample_count > 1).then(|| {
                    Texture::create_msaa_buffer(
                        device,
                        size,
                        format,
                        sample_count,
                        "render target multisample buffer",
                    )
                });
                (texture, msaa)
            }
            SamplingMode::Custom => {
                let texture = Texture::create_render_texture(
                    device,
                    size,
                    format,
                    1,
                    sample_count,
                    "render target multisample texture",
                );
                (texture, None)
            }
        };
        let attachment_view = texture.mip_view(0);
        let depth =
            Texture::create_depth_texture(device, size, sample_count, "render target depth");

        log::debug!(
            "render target {}x{}, {} samples, {:?}, {} mip levels",
            size[0],
            size[1],
            sample_count,
            mode,
            texture.texture.mip_level_count()
        );

        Self {
            size,
            sample_count,
            mode,
            texture,
            attachment_view,
            msaa,
            depth,
        }
    }

    pub fn size(&self) -> [u32; 2] {
        self.size
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn mode(&self) -> SamplingMode {
        self.mode
    }

    /// The texture the scene ends up in; bind this onto the second cube.
    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// The transient multisample buffer that resolves into [`RenderTarget::texture`].
    pub fn multisample_buffer(&self) -> Option<&Texture> {
        self.msaa.as_ref()
    }

    /// Color attachment that clears to `clear`; resolves into the texture when
    /// a separate multisample buffer is used.
    pub fn color_attachment(&self, clear: wgpu::Color) -> wgpu::RenderPassColorAttachment<'_> {
        let (view, resolve_target, store) = match &self.msaa {
            Some(msaa) => (
                &msaa.view,
                Some(&self.attachment_view),
                wgpu::StoreOp::Discard,
            ),
            None => (&self.attachment_view, None, wgpu::StoreOp::Store),
        };
        wgpu::RenderPassColorAttachment {
            view,
            depth_slice: None,
            resolve_target,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store,
            },
        }
    }

    pub fn depth_attachment(&self) -> wgpu::RenderPassDepthStencilAttachment<'_> {
        wgpu::RenderPassDepthStencilAttachment {
            view: &self.depth.view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Discard,
            }),
            stencil_ops: None,
        }
    }
}
