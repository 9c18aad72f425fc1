use winit::window::{Window, WindowId};

use crate::device::{Gpu, SurfaceErrorAction};
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;

use super::app::AppControl;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id:     WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Context for GPU setup and teardown callbacks (no frame in flight).
pub struct SetupCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu:    &'a mut Gpu<'w>,
}

impl<'a, 'w> SetupCtx<'a, 'w> {
    /// Renderer-facing view of the device for resource creation.
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(self.gpu.device(), self.gpu.queue(), self.gpu.surface_format())
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu:    &'a mut Gpu<'w>,
    pub time:   FrameTime,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Acquires the next surface texture, calls `draw` with a ready
    /// [`RenderCtx`] and [`RenderTarget`], then submits and presents.
    ///
    /// Clearing is left to `draw`: the first pass it opens decides the load op.
    /// A surface error skips the frame; only a fatal one asks for exit.
    pub fn render<F>(&mut self, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = self.gpu.handle_surface_error(err);
                if action == SurfaceErrorAction::Fatal {
                    return AppControl::Exit;
                }
                return AppControl::Continue;
            }
        };

        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
        );

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            draw(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}
