use clap::Parser;
use offscreen_cube::{
    DemoConfig, FlipY, SamplingMode,
    args::Args,
    render_target::resolve_sample_count,
};

fn parse(args: &[&str]) -> DemoConfig {
    let args = Args::try_parse_from(std::iter::once("offscreen-cube").chain(args.iter().copied()))
        .expect("arguments should parse");
    DemoConfig::from(args)
}

#[test]
fn defaults_match_the_walkthrough() {
    let config = parse(&[]);
    assert_eq!(config.window_size, (800, 600));
    assert_eq!(config.samples, 8);
    assert_eq!(config.sampling, SamplingMode::Resolve);
    assert_eq!(config.flip_y, FlipY::Auto);
    assert_eq!(config.snapshot_path.to_str(), Some("RenderTargetTexture.png"));
    assert_eq!(config.color_map, "colorMap.jpg");
    assert_eq!(config.backends, wgpu::Backends::PRIMARY);
    assert_eq!(config.max_frames, None);
    assert_eq!(config.render_target_size(), 512);
    assert_eq!(config.target_clear_colour.g, 0.7);
    assert_eq!(config.rotation_speed, 0.005);
}

#[test]
fn flags_override_defaults() {
    let config = parse(&[
        "--width",
        "1024",
        "--height",
        "768",
        "--samples",
        "4",
        "--custom-multisampling",
        "--flip-y",
        "always",
        "--assets",
        "media",
        "--snapshot",
        "out.png",
        "--gpu-api",
        "vulkan",
        "--max-frames",
        "3",
    ]);
    assert_eq!(config.window_size, (1024, 768));
    assert_eq!(config.samples, 4);
    assert_eq!(config.sampling, SamplingMode::Custom);
    assert_eq!(config.render_target_size(), 64);
    assert_eq!(config.flip_y, FlipY::Always);
    assert_eq!(config.asset_dir.to_str(), Some("media"));
    assert_eq!(config.snapshot_path.to_str(), Some("out.png"));
    assert_eq!(config.backends, wgpu::Backends::VULKAN);
    assert_eq!(config.max_frames, Some(3));
}

#[test]
fn unknown_values_are_rejected() {
    assert!(Args::try_parse_from(["offscreen-cube", "--flip-y", "sometimes"]).is_err());
    assert!(Args::try_parse_from(["offscreen-cube", "--gpu-api", "glide"]).is_err());
    assert!(Args::try_parse_from(["offscreen-cube", "--samples", "-1"]).is_err());
}

#[test]
fn log_filter_is_passed_through() {
    let args = Args::try_parse_from(["offscreen-cube", "--log", "offscreen_cube=debug"]).unwrap();
    assert_eq!(args.log.as_deref(), Some("offscreen_cube=debug"));
}

#[test]
fn auto_flip_never_flips_on_wgpu() {
    for backend in [
        wgpu::Backend::Vulkan,
        wgpu::Backend::Metal,
        wgpu::Backend::Dx12,
        wgpu::Backend::Gl,
    ] {
        assert!(!FlipY::Auto.resolve(backend));
        assert!(FlipY::Always.resolve(backend));
        assert!(!FlipY::Never.resolve(backend));
    }
}

#[test]
fn sample_count_falls_back_to_supported() {
    let guaranteed = |count: u32| count == 1 || count == 4;
    assert_eq!(resolve_sample_count(8, guaranteed), 4);
    assert_eq!(resolve_sample_count(4, guaranteed), 4);
    assert_eq!(resolve_sample_count(2, guaranteed), 1);
    assert_eq!(resolve_sample_count(1, guaranteed), 1);
    assert_eq!(resolve_sample_count(0, guaranteed), 1);

    let everything = |_: u32| true;
    assert_eq!(resolve_sample_count(8, everything), 8);
    assert_eq!(resolve_sample_count(16, everything), 16);
    assert_eq!(resolve_sample_count(5, everything), 4);
    assert_eq!(resolve_sample_count(64, everything), 16);
}
