use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use spindle_engine::core::{App as EngineApp, AppControl, FrameCtx, SetupCtx};
use spindle_engine::device::GpuInit;
use spindle_engine::render::wgpu_backend::{WgpuBackend, WgpuStore};
use spindle_engine::time::FrameRate;
use spindle_engine::window::{Runtime, RuntimeConfig};

use crate::config::LinesConfig;
use crate::driver::{FrameDriver, FrameOutcome};

/// Windowed host for a [`FrameDriver`].
///
/// ```rust,ignore
/// LinesApp::new(LinesConfig::default().count(500))
///     .title("lines")
///     .run()?;
/// ```
pub struct LinesApp {
    title:  String,
    width:  f64,
    height: f64,
    vsync:  bool,
    config: LinesConfig,
}

impl LinesApp {
    pub fn new(config: LinesConfig) -> Self {
        Self {
            title:  "spindle lines".to_string(),
            width:  800.0,
            height: 800.0,
            vsync:  true,
            config,
        }
    }

    /// Set the window title. The frame rate is appended while running.
    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width  = width;
        self.height = height;
        self
    }

    /// With vsync off, frames are presented as fast as the surface allows.
    pub fn vsync(mut self, on: bool) -> Self {
        self.vsync = on;
        self
    }

    /// Opens the window and runs until it closes or Escape is pressed.
    pub fn run(self) -> anyhow::Result<()> {
        let config = RuntimeConfig {
            title:        self.title.clone(),
            initial_size: LogicalSize::new(self.width, self.height),
        };
        let gpu_init = if self.vsync {
            GpuInit::default()
        } else {
            GpuInit::default().uncapped()
        };

        log::info!(
            "starting {} line actors (vsync {})",
            self.config.count,
            if self.vsync { "on" } else { "off" }
        );
        Runtime::run(config, gpu_init, LinesState::new(self.title, self.config))
    }
}

// ── LinesState ────────────────────────────────────────────────────────────

/// Engine-facing state: the driver plus the wgpu objects it created.
struct LinesState {
    title:      String,
    driver:     FrameDriver,
    store:      WgpuStore,
    frame_rate: FrameRate,
}

impl LinesState {
    fn new(title: String, config: LinesConfig) -> Self {
        Self {
            title,
            driver:     FrameDriver::new(config),
            store:      WgpuStore::new(),
            frame_rate: FrameRate::default(),
        }
    }
}

impl EngineApp for LinesState {
    fn on_init(&mut self, ctx: &mut SetupCtx<'_, '_>) {
        let rctx = ctx.render_ctx();
        let mut backend = WgpuBackend::new(&rctx, &mut self.store);
        self.driver.on_init(&mut backend);
    }

    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if event.state == ElementState::Pressed
                && event.logical_key == Key::Named(NamedKey::Escape)
            {
                return AppControl::Exit;
            }
        }
        AppControl::Continue
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        self.driver.on_resize(width, height);
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let delta_ms = ctx.time.dt_millis();

        // ── Draw + advance ────────────────────────────────────────────────
        let driver = &mut self.driver;
        let store  = &mut self.store;
        let mut outcome = FrameOutcome::Skipped;

        let control = ctx.render(|rctx, target| {
            let mut backend = WgpuBackend::with_target(rctx, store, target);
            outcome = driver.on_frame(&mut backend, delta_ms);
        });

        // ── Readout ───────────────────────────────────────────────────────
        if let FrameOutcome::Rendered(report) = outcome {
            log::trace!(
                "frame: drew {} skipped {} in {:.2} ms",
                report.drawn,
                report.skipped,
                report.stats.delta_ms
            );
            if let Some(fps) = self.frame_rate.record(report.stats.delta_ms) {
                ctx.window.set_title(&format!("{} | {fps:.1} fps", self.title));
            }
        }

        control
    }

    fn on_teardown(&mut self, ctx: &mut SetupCtx<'_, '_>) {
        let rctx = ctx.render_ctx();
        {
            let mut backend = WgpuBackend::new(&rctx, &mut self.store);
            self.driver.teardown(&mut backend);
        }

        let stats = self.store.stats();
        if stats.programs + stats.buffers + stats.arrays + stats.shaders > 0 {
            log::warn!("objects still alive after teardown: {stats:?}");
        } else {
            log::debug!("teardown released all backend objects");
        }

        // The next window gets a fresh device.
        self.store = WgpuStore::new();
    }
}
