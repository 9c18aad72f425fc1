//! Independently animated line actors.
//!
//! Each [`LineActor`] owns one program, one vertex buffer and one vertex
//! array on the graphics backend. The [`FrameDriver`] draws every actor once
//! per frame, re-uploading its two endpoints, then advances every actor's
//! phase by the frame's elapsed time.
//!
//! The core only talks to [`GraphicsBackend`]; [`LinesApp`] binds it to the
//! engine runtime and the wgpu backend.
//!
//! [`GraphicsBackend`]: spindle_engine::render::GraphicsBackend

mod actor;
mod app;
mod config;
mod driver;
mod error;
mod motion;
mod registry;
pub mod shader;

#[cfg(test)]
mod testing;

pub use actor::LineActor;
pub use app::LinesApp;
pub use config::{FailurePolicy, LinesConfig};
pub use driver::{DriverState, FrameDriver, FrameOutcome, FrameReport, FrameStats};
pub use error::ShaderError;
pub use motion::{advance, Motion};
pub use registry::LineRegistry;
