//! GPU rendering subsystem.
//!
//! Scene code does not talk to wgpu directly. It issues GL-style commands
//! (compile, link, bind, upload, draw) through [`GraphicsBackend`], and each
//! backend maps them onto its API. [`wgpu_backend`] is the production
//! implementation; tests substitute a recording double.

mod backend;
mod ctx;
pub mod wgpu_backend;

pub use backend::{
    BufferHandle, BufferUsage, GraphicsBackend, Primitive, ProgramHandle, ShaderHandle,
    ShaderStage, VertexArrayHandle,
};
pub use ctx::{RenderCtx, RenderTarget};
