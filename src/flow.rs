//! Application event loop.
//!
//! [`run`] creates the winit event loop and drives an [`App`]. The window,
//! the GPU [`Context`] and the [`Tutorial`] are created on the first
//! `resumed` call. Every `RedrawRequested` renders one frame and requests the
//! next one, so the demo renders continuously.
//!
//! # Lifecycle
//!
//! Each frame:
//! 1. window events are folded into the [`InputState`]
//! 2. the tutorial reads the input, renders the render target and the screen
//! 3. the per-frame input state is reset
//! 4. surface errors are handled: lost or outdated surfaces are reconfigured,
//!    out of memory stops the loop, anything else skips the frame

use std::sync::Arc;

use anyhow::Context as _;
use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{config::DemoConfig, context::Context, input::InputState, tutorial::Tutorial};

const FPS_REPORT_INTERVAL: Duration = Duration::from_secs(2);

/// GPU context plus the demo, alive while the window exists.
struct AppState {
    ctx: Context,
    tutorial: Tutorial,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, config: &DemoConfig) -> anyhow::Result<Self> {
        let ctx = Context::new(window, config)
            .await
            .context("cannot create the main context")?;
        let tutorial = Tutorial::new(
            &ctx.adapter,
            &ctx.device,
            &ctx.queue,
            ctx.config.format,
            config,
        )
        .await?;
        let mut state = Self {
            ctx,
            tutorial,
            is_surface_configured: false,
        };
        let size = state.ctx.window().inner_size();
        state.resize(size.width, size.height);
        Ok(state)
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.ctx.resize(width, height) {
            self.is_surface_configured = true;
        }
    }

    fn render(
        &mut self,
        input: &InputState,
        async_runtime: &tokio::runtime::Runtime,
    ) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window().request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }
        self.tutorial.draw_frame(&self.ctx, input, async_runtime)
    }
}

/// Frame counter with a periodic fps log line.
#[derive(Debug)]
struct FrameStats {
    frames: u64,
    since_report: u32,
    last_report: Instant,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            frames: 0,
            since_report: 0,
            last_report: Instant::now(),
        }
    }

    fn frame_done(&mut self) {
        self.frames += 1;
        self.since_report += 1;
        let elapsed = self.last_report.elapsed();
        if elapsed >= FPS_REPORT_INTERVAL {
            log::debug!(
                "{:.1} fps",
                self.since_report as f64 / elapsed.as_secs_f64()
            );
            self.since_report = 0;
            self.last_report = Instant::now();
        }
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    config: DemoConfig,
    state: Option<AppState>,
    input: InputState,
    stats: FrameStats,
    error: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: DemoConfig) -> anyhow::Result<Self> {
        let async_runtime =
            tokio::runtime::Runtime::new().context("failed to start the async runtime")?;
        Ok(Self {
            async_runtime,
            config,
            state: None,
            input: InputState::default(),
            stats: FrameStats::new(),
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let (width, height) = self.config.window_size;
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(width, height));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let init_future = AppState::new(window, &self.config);
        match self.async_runtime.block_on(init_future) {
            Ok(app_state) => {
                app_state.ctx.window().request_redraw();
                self.state = Some(app_state);
            }
            Err(e) => self.fail(event_loop, e.context("App initialization failed")),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        self.input.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let result = state.render(&self.input, &self.async_runtime);
                self.input.end_frame();
                match result {
                    Ok(()) => {
                        self.stats.frame_done();
                        if self
                            .config
                            .max_frames
                            .is_some_and(|max| self.stats.frames >= max)
                        {
                            log::info!("rendered {} frames, exiting", self.stats.frames);
                            event_loop.exit();
                        }
                    }
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window().inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        self.fail(
                            event_loop,
                            anyhow::anyhow!("the surface ran out of memory"),
                        );
                    }
                    Err(e) => {
                        log::warn!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Opens the window and renders until it is closed, `max_frames` is reached
/// or a fatal error occurs.
pub fn run(config: DemoConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config)?;

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
