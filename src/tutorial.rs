//! The render target demo.
//!
//! A cube textured with the color map is drawn into an off-screen
//! [`RenderTarget`]. Its mip chain is regenerated and the result is used as
//! the texture of a second cube that is drawn on screen.
//!
//! Each frame is split into two submissions because both passes share one
//! constant buffer and `queue.write_buffer` only takes effect at the next
//! submit: the render target settings are written and submitted first, then
//! the screen settings.

use std::{iter, path::Path};

use anyhow::bail;
use cgmath::{Matrix4, Vector3};
use wgpu::util::DeviceExt;
use winit::{event::MouseButton, keyboard::KeyCode};

use crate::{
    camera,
    config::DemoConfig,
    context::Context,
    data_structures::{
        cube::{bordered_cube_vertices, textured_cube_indices},
        settings::{Settings, flip_axis, update_model_transform},
        texture::{self, Texture},
    },
    input::InputState,
    pipelines::{
        mipmap::MipGenerator,
        scene::{
            mk_scene_pipeline, mk_scene_pipeline_layout, placeholder_multisample_texture,
            scene_bind_group, scene_bind_group_layout,
        },
    },
    render_target::{RenderTarget, SamplingMode},
    resources,
};

pub const INSTRUCTIONS: [&str; 3] = [
    "press LEFT MOUSE BUTTON and move the mouse on the X-axis to rotate the OUTER cube",
    "press RIGHT MOUSE BUTTON and move the mouse on the X-axis to rotate the INNER cube",
    "press RETURN KEY to save the render target texture to a PNG file",
];

/// Rotation of the inner cube, the one inside the render target.
fn inner_axis() -> Vector3<f32> {
    Vector3::new(1.0, 1.0, 1.0)
}

/// Rotation of the outer cube, the one on screen.
fn outer_axis() -> Vector3<f32> {
    Vector3::new(0.0, 1.0, 0.0)
}

/// Angles in radians of the two cubes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CubeRotation {
    pub outer: f32,
    pub inner: f32,
}

impl CubeRotation {
    /// Left button turns the outer cube, right button the inner one, both by
    /// the horizontal mouse motion of this frame times `speed`.
    pub fn update(&mut self, input: &InputState, speed: f32) {
        let delta = input.mouse_motion().0 as f32 * speed;
        if input.button_down(MouseButton::Left) {
            self.outer += delta;
        }
        if input.button_down(MouseButton::Right) {
            self.inner += delta;
        }
    }
}

struct SceneBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    num_indices: u32,
    constant: wgpu::Buffer,
}

struct Pipelines {
    layout: wgpu::BindGroupLayout,
    target: wgpu::RenderPipeline,
    screen: wgpu::RenderPipeline,
}

pub struct Tutorial {
    buffers: SceneBuffers,
    pipelines: Pipelines,
    color_map: Texture,
    render_target: RenderTarget,
    mips: MipGenerator,
    target_bind_group: wgpu::BindGroup,
    screen_bind_group: wgpu::BindGroup,
    target_projection: Matrix4<f32>,
    flip_y: bool,
    rotation: CubeRotation,
    rotation_speed: f32,
    target_clear_colour: wgpu::Color,
    snapshot_path: std::path::PathBuf,
}

impl Tutorial {
    /// Creates every GPU resource of the demo.
    ///
    /// `surface_format` is the format of the final color target, the window
    /// surface when running interactively.
    pub async fn new(
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        demo: &DemoConfig,
    ) -> anyhow::Result<Self> {
        let buffers = Self::create_buffers(device);

        let render_target = Self::create_render_target(adapter, device, demo);
        let flip_y = demo.flip_y.resolve(adapter.get_info().backend);
        let pipelines = Self::create_pipelines(device, surface_format, &render_target, flip_y);

        let (color_map, sampler) = Self::create_color_map(device, queue, demo).await?;
        let mips = MipGenerator::new(device, render_target.texture(), "render target mips");

        let placeholder = placeholder_multisample_texture(device);
        let target_bind_group = scene_bind_group(
            device,
            &pipelines.layout,
            &buffers.constant,
            &color_map.view,
            &sampler,
            &placeholder.view,
            "target_bind_group",
        );
        let screen_bind_group = match render_target.mode() {
            SamplingMode::Resolve => scene_bind_group(
                device,
                &pipelines.layout,
                &buffers.constant,
                &render_target.texture().view,
                &sampler,
                &placeholder.view,
                "screen_bind_group",
            ),
            // The single sample slot is unused, any 2D texture fits there.
            SamplingMode::Custom => scene_bind_group(
                device,
                &pipelines.layout,
                &buffers.constant,
                &color_map.view,
                &sampler,
                &render_target.texture().view,
                "screen_bind_group",
            ),
        };

        for line in INSTRUCTIONS {
            println!("{line}");
        }

        Ok(Self {
            buffers,
            pipelines,
            color_map,
            render_target,
            mips,
            target_bind_group,
            screen_bind_group,
            target_projection: camera::render_target_projection(),
            flip_y,
            rotation: CubeRotation::default(),
            rotation_speed: demo.rotation_speed,
            target_clear_colour: demo.target_clear_colour,
            snapshot_path: demo.snapshot_path.clone(),
        })
    }

    fn create_buffers(device: &wgpu::Device) -> SceneBuffers {
        let vertices = bordered_cube_vertices();
        let indices = textured_cube_indices();
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let constant = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Settings Buffer"),
            contents: bytemuck::cast_slice(&[Settings::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        log::debug!(
            "cube buffers: {} vertices, {} indices",
            vertices.len(),
            indices.len()
        );
        SceneBuffers {
            vertex,
            index,
            num_indices: indices.len() as u32,
            constant,
        }
    }

    fn create_pipelines(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        render_target: &RenderTarget,
        flip_y: bool,
    ) -> Pipelines {
        let layout = scene_bind_group_layout(device);
        let pipeline_layout = mk_scene_pipeline_layout(device, &layout);
        // Flipping Y mirrors the image, which turns the winding around.
        let target_front_face = if flip_y {
            wgpu::FrontFace::Ccw
        } else {
            wgpu::FrontFace::Cw
        };
        let target = mk_scene_pipeline(
            device,
            &pipeline_layout,
            render_target.texture().texture.format(),
            render_target.sample_count(),
            target_front_face,
        );
        let screen = mk_scene_pipeline(
            device,
            &pipeline_layout,
            surface_format,
            1,
            wgpu::FrontFace::Cw,
        );
        Pipelines {
            layout,
            target,
            screen,
        }
    }

    /// Loads the color map, fills its mip chain and creates the border sampler.
    async fn create_color_map(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        demo: &DemoConfig,
    ) -> anyhow::Result<(Texture, wgpu::Sampler)> {
        let color_map =
            resources::load_color_map(&demo.asset_dir, &demo.color_map, device, queue).await?;
        let mips = MipGenerator::new(device, &color_map, "color map mips");
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Color Map Mip Encoder"),
        });
        mips.generate(&mut encoder);
        queue.submit(iter::once(encoder.finish()));

        let sampler = texture::create_border_sampler(device);
        Ok((color_map, sampler))
    }

    fn create_render_target(
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        demo: &DemoConfig,
    ) -> RenderTarget {
        let size = demo.render_target_size();
        RenderTarget::new(
            adapter,
            device,
            [size, size],
            demo.samples,
            demo.sampling,
            Texture::COLOR_FORMAT,
        )
    }

    pub fn rotation(&self) -> CubeRotation {
        self.rotation
    }

    pub fn render_target(&self) -> &RenderTarget {
        &self.render_target
    }

    pub fn color_map(&self) -> &Texture {
        &self.color_map
    }

    pub fn flip_y(&self) -> bool {
        self.flip_y
    }

    pub fn update_rotation(&mut self, input: &InputState) {
        self.rotation.update(input, self.rotation_speed);
    }

    /// Constants for the inner cube, drawn into the render target.
    pub fn target_settings(&self) -> Settings {
        let mut wvp =
            update_model_transform(&self.target_projection, self.rotation.inner, inner_axis());
        if self.flip_y {
            wvp = flip_axis(&wvp, 1);
        }
        let mut settings = Settings::default();
        settings.set_wvp(wvp);
        settings
    }

    /// Constants for the outer cube, drawn on screen with the render target
    /// as its texture.
    pub fn screen_settings(&self, projection: &Matrix4<f32>) -> Settings {
        let mut settings = Settings::default();
        settings.set_wvp(update_model_transform(
            projection,
            self.rotation.outer,
            outer_axis(),
        ));
        settings.use_texture_2d_ms = i32::from(self.render_target.mode() == SamplingMode::Custom);
        settings
    }

    /// Records the off-screen pass and the mip regeneration into `encoder`.
    ///
    /// The constant buffer is written through `queue`, so `encoder` has to be
    /// submitted before the buffer is written again.
    pub fn render_to_target(&self, encoder: &mut wgpu::CommandEncoder, queue: &wgpu::Queue) {
        queue.write_buffer(
            &self.buffers.constant,
            0,
            bytemuck::cast_slice(&[self.target_settings()]),
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Target Pass"),
                color_attachments: &[Some(
                    self.render_target
                        .color_attachment(self.target_clear_colour),
                )],
                depth_stencil_attachment: Some(self.render_target.depth_attachment()),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });
            let [width, height] = self.render_target.size();
            render_pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
            render_pass.set_pipeline(&self.pipelines.target);
            self.draw_cube(&mut render_pass, &self.target_bind_group);
        }
        self.mips.generate(encoder);
    }

    /// Records the pass that draws the outer cube, textured with the render
    /// target, into `view`.
    ///
    /// `view` and `depth_view` are single sample and `size` pixels large. Like
    /// [`Tutorial::render_to_target`] this writes the constant buffer, so the
    /// render target work has to be submitted before.
    #[allow(clippy::too_many_arguments)]
    pub fn render_to_screen(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        size: [u32; 2],
        projection: &Matrix4<f32>,
        clear: wgpu::Color,
    ) {
        queue.write_buffer(
            &self.buffers.constant,
            0,
            bytemuck::cast_slice(&[self.screen_settings(projection)]),
        );
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
            multiview_mask: None,
        });
        render_pass.set_viewport(0.0, 0.0, size[0] as f32, size[1] as f32, 0.0, 1.0);
        render_pass.set_pipeline(&self.pipelines.screen);
        self.draw_cube(&mut render_pass, &self.screen_bind_group);
    }

    fn draw_cube(&self, render_pass: &mut wgpu::RenderPass<'_>, bind_group: &wgpu::BindGroup) {
        render_pass.set_bind_group(0, bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.buffers.vertex.slice(..));
        render_pass.set_index_buffer(self.buffers.index.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.buffers.num_indices, 0, 0..1);
    }

    /// Renders one frame: input, render target, screen, present and the
    /// optional snapshot.
    pub fn draw_frame(
        &mut self,
        ctx: &Context,
        input: &InputState,
        async_runtime: &tokio::runtime::Runtime,
    ) -> Result<(), wgpu::SurfaceError> {
        self.update_rotation(input);

        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Target Encoder"),
            });
        self.render_to_target(&mut encoder, &ctx.queue);
        ctx.queue.submit(iter::once(encoder.finish()));

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        self.render_to_screen(
            &mut encoder,
            &ctx.queue,
            &view,
            &ctx.depth_texture.view,
            [ctx.config.width, ctx.config.height],
            &ctx.projection.calc_matrix(),
            ctx.clear_colour,
        );
        ctx.queue.submit(iter::once(encoder.finish()));
        ctx.window.pre_present_notify();
        output.present();

        if input.key_pressed(KeyCode::Enter) || input.key_pressed(KeyCode::NumpadEnter) {
            let path = self.snapshot_path.clone();
            if let Err(e) =
                async_runtime.block_on(self.save_render_target(&ctx.device, &ctx.queue, &path))
            {
                log::error!("could not save the render target texture: {e:#}");
            }
        }
        Ok(())
    }

    /// Writes mip level 0 of the render target texture to `path` as PNG.
    ///
    /// Fails for a multisampled render target, which cannot be copied.
    pub async fn save_render_target(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> anyhow::Result<()> {
        if self.render_target.texture().is_multisampled() {
            bail!("the render target is multisampled and cannot be saved");
        }
        resources::save_texture(device, queue, &self.render_target.texture().texture, path).await
    }
}
