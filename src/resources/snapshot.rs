//! Reading a texture back from the GPU and writing it as a PNG.
//!
//! Texture-to-buffer copies need every row aligned to
//! [`wgpu::COPY_BYTES_PER_ROW_ALIGNMENT`], so the readback buffer is padded
//! and the padding is stripped again before the image is encoded.

use std::{path::Path, time::Duration};

use anyhow::{Context as _, bail, ensure};

const BYTES_PER_PIXEL: u32 = 4;

/// Row pitch of a `width` pixel wide RGBA8 row, rounded up to the copy alignment.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Removes the per-row padding of a readback buffer.
pub fn unpad_rows(data: &[u8], width: u32, height: u32, padded_bytes_per_row: u32) -> Vec<u8> {
    let row = (width * BYTES_PER_PIXEL) as usize;
    let pitch = padded_bytes_per_row as usize;
    data.chunks(pitch)
        .take(height as usize)
        .flat_map(|chunk| &chunk[..row])
        .copied()
        .collect()
}

/// Copies mip level 0 of `texture` into host memory as tightly packed RGBA8.
pub async fn read_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
) -> anyhow::Result<image::RgbaImage> {
    if texture.sample_count() > 1 {
        bail!("multisampled textures cannot be copied to a buffer");
    }
    ensure!(
        texture.format().block_copy_size(None) == Some(BYTES_PER_PIXEL),
        "unsupported texture format {:?} for readback",
        texture.format()
    );
    let (width, height) = (texture.width(), texture.height());
    let padded = padded_bytes_per_row(width);

    let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Texture Readback Buffer"),
        size: (padded * height) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Readback Encoder"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            aspect: wgpu::TextureAspect::All,
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &output_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
    let buffer_slice = output_buffer.slice(..);
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        // The receiver only goes away if the caller stopped waiting.
        let _ = tx.send(result);
    });
    device.poll(wgpu::PollType::Wait {
        submission_index: None,
        timeout: Some(Duration::from_secs(3)),
    })?;
    rx.receive()
        .await
        .context("readback channel closed before the buffer was mapped")??;

    let pixels = {
        let data = buffer_slice.get_mapped_range();
        unpad_rows(&data, width, height, padded)
    };
    output_buffer.unmap();

    image::RgbaImage::from_raw(width, height, pixels)
        .context("readback produced fewer bytes than the texture holds")
}

/// Writes mip level 0 of `texture` to `path` as PNG.
pub async fn save_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    path: &Path,
) -> anyhow::Result<()> {
    let img = read_texture(device, queue, texture).await?;
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::info!(
        "saved {}x{} texture to {}",
        img.width(),
        img.height(),
        path.display()
    );
    Ok(())
}
