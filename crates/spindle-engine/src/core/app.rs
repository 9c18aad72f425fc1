use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::{FrameCtx, SetupCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// Call order for a window: `on_init` once the GPU is ready, then
/// `on_frame` once per redraw (interleaved with `on_resize` and
/// `on_window_event`), then `on_teardown` before the GPU is dropped.
pub trait App {
    /// Called once after the window and its GPU context exist.
    fn on_init(&mut self, ctx: &mut SetupCtx<'_, '_>) {
        let _ = ctx;
    }

    /// Called for window events, before the runtime handles them.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called after the surface has been reconfigured to a new physical size.
    fn on_resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called before the window's GPU context is destroyed.
    fn on_teardown(&mut self, ctx: &mut SetupCtx<'_, '_>) {
        let _ = ctx;
    }
}
