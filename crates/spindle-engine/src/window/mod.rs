//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the render window, and wires them to the
//! GPU layer and the application callbacks.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
