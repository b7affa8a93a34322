use offscreen_cube::context::request_device;

/// A device without a window, for rendering into textures only.
pub struct Headless {
    pub runtime: tokio::runtime::Runtime,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl Headless {
    pub fn new() -> Self {
        let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
        let (adapter, device, queue) = runtime.block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await
                .expect("integration tests need a GPU adapter");
            let (device, queue) = request_device(&adapter).await.expect("device");
            (adapter, device, queue)
        });
        Self {
            runtime,
            adapter,
            device,
            queue,
        }
    }
}

/// Linear color channel to the byte an sRGB texture stores.
pub fn srgb_byte(linear: f64) -> u8 {
    let encoded = if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    (encoded.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub fn assert_pixel_near(actual: image::Rgba<u8>, expected: [u8; 3]) {
    for k in 0..3 {
        let diff = (actual[k] as i16 - expected[k] as i16).abs();
        assert!(diff <= 2, "pixel {:?} is not close to {:?}", actual, expected);
    }
}
