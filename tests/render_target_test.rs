#[cfg(feature = "integration-tests")]
mod common;

#[cfg(feature = "integration-tests")]
fn demo_config(sampling: offscreen_cube::SamplingMode) -> offscreen_cube::DemoConfig {
    offscreen_cube::DemoConfig {
        sampling,
        // Missing on purpose, the generated checker pattern is used instead.
        asset_dir: std::env::temp_dir().join("offscreen-cube-no-assets"),
        ..Default::default()
    }
}

#[cfg(feature = "integration-tests")]
fn render_once(gpu: &common::Headless, tutorial: &offscreen_cube::Tutorial) {
    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Test Encoder"),
        });
    tutorial.render_to_target(&mut encoder, &gpu.queue);
    gpu.queue.submit(std::iter::once(encoder.finish()));
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_clear_render_target_around_the_cube() {
    use common::{Headless, assert_pixel_near, srgb_byte};
    use offscreen_cube::{SamplingMode, Tutorial, data_structures::texture::Texture};
    use offscreen_cube::resources::snapshot::read_texture;

    let gpu = Headless::new();
    let config = demo_config(SamplingMode::Resolve);
    let tutorial = gpu
        .runtime
        .block_on(Tutorial::new(
            &gpu.adapter,
            &gpu.device,
            &gpu.queue,
            Texture::COLOR_FORMAT,
            &config,
        ))
        .unwrap();
    assert_eq!(tutorial.render_target().size(), [512, 512]);
    assert_eq!(tutorial.render_target().mode(), SamplingMode::Resolve);
    assert_eq!(tutorial.render_target().texture().texture.mip_level_count(), 10);

    render_once(&gpu, &tutorial);
    let img = gpu
        .runtime
        .block_on(read_texture(
            &gpu.device,
            &gpu.queue,
            &tutorial.render_target().texture().texture,
        ))
        .unwrap();

    let clear = config.target_clear_colour;
    let expected = [srgb_byte(clear.r), srgb_byte(clear.g), srgb_byte(clear.b)];
    for (x, y) in [(0, 0), (511, 0), (0, 511), (511, 511)] {
        assert_pixel_near(*img.get_pixel(x, y), expected);
    }
    let center = *img.get_pixel(256, 256);
    assert_ne!([center[0], center[1], center[2]], expected);
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_keep_resolve_buffer_out_of_shaders() {
    use common::Headless;
    use offscreen_cube::{RenderTarget, SamplingMode, data_structures::texture::Texture};

    let gpu = Headless::new();
    let target = RenderTarget::new(
        &gpu.adapter,
        &gpu.device,
        [64, 64],
        4,
        SamplingMode::Resolve,
        Texture::COLOR_FORMAT,
    );
    // Binding the multisample buffer breaks the resolve on GL.
    let msaa = target.multisample_buffer().unwrap();
    assert_eq!(msaa.texture.usage(), wgpu::TextureUsages::RENDER_ATTACHMENT);
    assert!(msaa.texture.sample_count() > 1);
    assert!(
        target
            .texture()
            .texture
            .usage()
            .contains(wgpu::TextureUsages::TEXTURE_BINDING)
    );
    assert_eq!(target.texture().texture.sample_count(), 1);

    let single = RenderTarget::new(
        &gpu.adapter,
        &gpu.device,
        [64, 64],
        1,
        SamplingMode::Resolve,
        Texture::COLOR_FORMAT,
    );
    assert!(single.multisample_buffer().is_none());
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_mirror_render_target_when_flipping_y() {
    use common::Headless;
    use offscreen_cube::{FlipY, SamplingMode, Tutorial, data_structures::texture::Texture};
    use offscreen_cube::resources::snapshot::read_texture;

    let gpu = Headless::new();
    let render = |flip_y: FlipY| {
        let config = offscreen_cube::DemoConfig {
            flip_y,
            ..demo_config(SamplingMode::Resolve)
        };
        let tutorial = gpu
            .runtime
            .block_on(Tutorial::new(
                &gpu.adapter,
                &gpu.device,
                &gpu.queue,
                Texture::COLOR_FORMAT,
                &config,
            ))
            .unwrap();
        assert_eq!(tutorial.flip_y(), flip_y == FlipY::Always);
        render_once(&gpu, &tutorial);
        gpu.runtime
            .block_on(read_texture(
                &gpu.device,
                &gpu.queue,
                &tutorial.render_target().texture().texture,
            ))
            .unwrap()
    };
    let flipped = render(FlipY::Always);
    let upright = render(FlipY::Never);
    assert_eq!(flipped.dimensions(), upright.dimensions());

    let (width, height) = upright.dimensions();
    let near = |a: &image::Rgba<u8>, b: &image::Rgba<u8>| {
        a.0.iter().zip(b.0.iter()).all(|(x, y)| x.abs_diff(*y) <= 2)
    };
    let mut unmirrored = 0;
    let mut unchanged = 0;
    for y in 0..height {
        for x in 0..width {
            let pixel = flipped.get_pixel(x, y);
            if !near(pixel, upright.get_pixel(x, height - 1 - y)) {
                unmirrored += 1;
            }
            if near(pixel, upright.get_pixel(x, y)) {
                unchanged += 1;
            }
        }
    }
    assert_eq!(unmirrored, 0);
    // The cube is not symmetric about the horizontal axis.
    assert!(unchanged < width * height);
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_texture_screen_cube_from_multisample_target() {
    use cgmath::Deg;
    use common::Headless;
    use offscreen_cube::{
        SamplingMode, Tutorial,
        camera::{Projection, Z_FAR, Z_NEAR},
        data_structures::texture::Texture,
        resources::snapshot::read_texture,
    };

    let gpu = Headless::new();
    let config = demo_config(SamplingMode::Custom);
    let tutorial = gpu
        .runtime
        .block_on(Tutorial::new(
            &gpu.adapter,
            &gpu.device,
            &gpu.queue,
            Texture::COLOR_FORMAT,
            &config,
        ))
        .unwrap();
    assert!(tutorial.render_target().texture().is_multisampled());
    assert!(tutorial.screen_settings(&cgmath::Matrix4::from_scale(1.0)).use_texture_2d_ms != 0);
    render_once(&gpu, &tutorial);

    let size = [256, 256];
    let screen = Texture::create_render_texture(
        &gpu.device,
        size,
        Texture::COLOR_FORMAT,
        1,
        1,
        "test screen",
    );
    let depth = Texture::create_depth_texture(&gpu.device, size, 1, "test screen depth");
    let projection = Projection::new(size[0], size[1], Deg(45.0), Z_NEAR, Z_FAR);
    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Test Screen Encoder"),
        });
    tutorial.render_to_screen(
        &mut encoder,
        &gpu.queue,
        &screen.view,
        &depth.view,
        size,
        &projection.calc_matrix(),
        config.clear_colour,
    );
    gpu.queue.submit(std::iter::once(encoder.finish()));

    let img = gpu
        .runtime
        .block_on(read_texture(&gpu.device, &gpu.queue, &screen.texture))
        .unwrap();
    let clear = config.clear_colour;
    let background = [
        common::srgb_byte(clear.r),
        common::srgb_byte(clear.g),
        common::srgb_byte(clear.b),
    ];
    common::assert_pixel_near(*img.get_pixel(0, 0), background);
    let center = *img.get_pixel(128, 128);
    let rgb = [center[0], center[1], center[2]];
    assert!(rgb.iter().any(|&c| c > 8), "screen cube is black: {rgb:?}");
    assert!(
        rgb.iter().zip(background).any(|(&c, b)| c.abs_diff(b) > 2),
        "screen cube is missing: {rgb:?}"
    );
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_save_render_target_as_png() {
    use common::Headless;
    use offscreen_cube::{SamplingMode, Tutorial, data_structures::texture::Texture};

    let gpu = Headless::new();
    let config = demo_config(SamplingMode::Resolve);
    let tutorial = gpu
        .runtime
        .block_on(Tutorial::new(
            &gpu.adapter,
            &gpu.device,
            &gpu.queue,
            Texture::COLOR_FORMAT,
            &config,
        ))
        .unwrap();
    render_once(&gpu, &tutorial);

    let path = std::env::temp_dir().join(format!(
        "offscreen-cube-snapshot-{}.png",
        std::process::id()
    ));
    gpu.runtime
        .block_on(tutorial.save_render_target(&gpu.device, &gpu.queue, &path))
        .unwrap();
    let saved = image::open(&path).unwrap();
    assert_eq!((saved.width(), saved.height()), (512, 512));
    std::fs::remove_file(&path).unwrap();
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_refuse_to_save_multisampled_target() {
    use common::Headless;
    use offscreen_cube::{SamplingMode, Tutorial, data_structures::texture::Texture};

    let gpu = Headless::new();
    let config = demo_config(SamplingMode::Custom);
    let tutorial = gpu
        .runtime
        .block_on(Tutorial::new(
            &gpu.adapter,
            &gpu.device,
            &gpu.queue,
            Texture::COLOR_FORMAT,
            &config,
        ))
        .unwrap();
    assert_eq!(tutorial.render_target().size(), [64, 64]);
    assert_eq!(tutorial.render_target().mode(), SamplingMode::Custom);
    assert!(tutorial.render_target().sample_count() > 1);
    render_once(&gpu, &tutorial);

    let path = std::env::temp_dir().join("offscreen-cube-never-written.png");
    let result = gpu
        .runtime
        .block_on(tutorial.save_render_target(&gpu.device, &gpu.queue, &path));
    let err = result.unwrap_err();
    assert!(err.to_string().contains("multisampled"), "{err}");
    assert!(!path.exists());
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_fill_color_map_mips_from_checker_fallback() {
    use common::Headless;
    use offscreen_cube::{SamplingMode, Tutorial, data_structures::texture::Texture};

    let gpu = Headless::new();
    let config = demo_config(SamplingMode::Resolve);
    let tutorial = gpu
        .runtime
        .block_on(Tutorial::new(
            &gpu.adapter,
            &gpu.device,
            &gpu.queue,
            Texture::COLOR_FORMAT,
            &config,
        ))
        .unwrap();
    let color_map = tutorial.color_map();
    assert_eq!(color_map.size(), [256, 256]);
    assert_eq!(color_map.texture.mip_level_count(), 9);
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_only_blit_mips_of_single_sample_targets() {
    use common::Headless;
    use offscreen_cube::{
        SamplingMode, Tutorial, data_structures::texture::Texture, pipelines::mipmap::MipGenerator,
    };

    let gpu = Headless::new();
    for (sampling, levels) in [(SamplingMode::Resolve, 9), (SamplingMode::Custom, 0)] {
        let tutorial = gpu
            .runtime
            .block_on(Tutorial::new(
                &gpu.adapter,
                &gpu.device,
                &gpu.queue,
                Texture::COLOR_FORMAT,
                &demo_config(sampling),
            ))
            .unwrap();
        let mips = MipGenerator::new(&gpu.device, tutorial.render_target().texture(), "test mips");
        assert_eq!(mips.level_count(), levels);
    }
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_rotate_cubes_from_held_buttons() {
    use common::Headless;
    use offscreen_cube::{
        CubeRotation, SamplingMode, Tutorial, data_structures::texture::Texture,
        input::InputState,
    };
    use winit::{dpi::PhysicalPosition, event::MouseButton};

    let gpu = Headless::new();
    let config = demo_config(SamplingMode::Resolve);
    let mut tutorial = gpu
        .runtime
        .block_on(Tutorial::new(
            &gpu.adapter,
            &gpu.device,
            &gpu.queue,
            Texture::COLOR_FORMAT,
            &config,
        ))
        .unwrap();
    assert_eq!(tutorial.rotation(), CubeRotation::default());

    let mut input = InputState::default();
    input.cursor_moved(PhysicalPosition::new(0.0, 0.0));
    input.cursor_moved(PhysicalPosition::new(100.0, 0.0));
    tutorial.update_rotation(&input);
    assert_eq!(tutorial.rotation(), CubeRotation::default());

    input.end_frame();
    input.press_button(MouseButton::Right);
    input.cursor_moved(PhysicalPosition::new(200.0, 0.0));
    tutorial.update_rotation(&input);
    let rotation = tutorial.rotation();
    assert_eq!(rotation.outer, 0.0);
    assert!((rotation.inner - 100.0 * config.rotation_speed).abs() < 1e-6);
}
