use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, SetupCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::time::{FrameClock, FrameTime};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "spindle".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Entry point for the runtime.
///
/// Drives a single render window: redraws continuously, paced by the
/// surface present mode, until the window closes or the app asks to exit.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(initial, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    initial: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            initial,
            gpu_init,
            app,
            window: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.initial.title.clone())
            .with_inner_size(self.initial.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        let mut entry = WindowEntryTryBuilder {
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
            .try_build()
            .context("GPU initialization failed for window")?;

        let app = &mut self.app;
        entry.with_mut(|fields| {
            let mut ctx = SetupCtx {
                window: WindowCtx {
                    id: fields.window.id(),
                    window: fields.window,
                },
                gpu: fields.gpu,
            };
            app.on_init(&mut ctx);

            // Setup may take a while; do not hand that time to the first frame.
            fields.clock.reset();
        });

        entry.with_window(|w| w.request_redraw());
        self.window = Some(entry);
        Ok(())
    }

    fn destroy_window_entry(&mut self) {
        let Some(mut entry) = self.window.take() else { return };

        let app = &mut self.app;
        entry.with_mut(|fields| {
            let mut ctx = SetupCtx {
                window: WindowCtx {
                    id: fields.window.id(),
                    window: fields.window,
                },
                gpu: fields.gpu,
            };
            app.on_teardown(&mut ctx);
        });

        log::debug!("window destroyed");
    }

    fn redraw(&mut self, window_id: WindowId) -> AppControl {
        let Some(entry) = self.window.as_mut() else {
            return AppControl::Continue;
        };

        let app = &mut self.app;
        entry.with_mut(|fields| {
            let ft: FrameTime = fields.clock.tick();

            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: window_id,
                    window: fields.window,
                },
                gpu: fields.gpu,
                time: ft,
            };

            app.on_frame(&mut ctx)
        })
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            log::error!("failed to create render window: {e:#}");
            self.request_exit(event_loop);
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        // The surface is invalid while suspended; release GPU objects and
        // rebuild them on the next `resumed`.
        self.destroy_window_entry();
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Continuous animation: redraw every frame, paced by the present mode.
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(entry) = self.window.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.app.on_window_event(window_id, &event) == AppControl::Exit {
            self.destroy_window_entry();
            self.request_exit(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.destroy_window_entry();
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.window.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
                self.app.on_resize(new_size.width, new_size.height);
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.window.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                    self.app.on_resize(new_size.width, new_size.height);
                }
            }

            WindowEvent::RedrawRequested => {
                if self.redraw(window_id) == AppControl::Exit {
                    self.destroy_window_entry();
                    self.request_exit(event_loop);
                }
            }

            _ => {}
        }
    }
}
