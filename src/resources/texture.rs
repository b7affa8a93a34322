use std::path::Path;

use anyhow::Context as _;

use crate::data_structures::texture::Texture;

pub async fn load_binary(asset_dir: &Path, file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = asset_dir.join(file_name);
    let data = tokio::fs::read(&path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(data)
}

pub async fn load_texture(
    asset_dir: &Path,
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    let data = load_binary(asset_dir, file_name).await?;
    let img = image::load_from_memory(&data)
        .with_context(|| format!("failed to decode {file_name}"))?;
    Texture::from_image(device, queue, &img, Some(file_name))
}

/// Loads the color map, or generates a checker pattern when the file is
/// missing or unreadable so the demo still has something to show.
pub async fn load_color_map(
    asset_dir: &Path,
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    match load_texture(asset_dir, file_name, device, queue).await {
        Ok(texture) => {
            log::info!("loaded color map {}", asset_dir.join(file_name).display());
            Ok(texture)
        }
        Err(e) => {
            log::warn!("{e:#}; using a generated checker pattern instead");
            let img = image::DynamicImage::ImageRgba8(checker_pattern(256, 32));
            Texture::from_image(device, queue, &img, Some("checker color map"))
        }
    }
}

/// A `size` x `size` image of alternating tiles with a color gradient, so the
/// orientation of each cube face stays recognizable.
pub fn checker_pattern(size: u32, tile: u32) -> image::RgbaImage {
    let tile = tile.max(1);
    image::RgbaImage::from_fn(size, size, |x, y| {
        let light = ((x / tile) + (y / tile)) % 2 == 0;
        let r = (x * 255 / size.max(1)) as u8;
        let g = (y * 255 / size.max(1)) as u8;
        if light {
            image::Rgba([r, g, 230, 255])
        } else {
            image::Rgba([r / 3, g / 3, 60, 255])
        }
    })
}
