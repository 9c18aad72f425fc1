//! Graphics backend contract.
//!
//! Handles are opaque `u32` ids assigned by the backend. `0` is the null
//! handle: never returned for a live object, and binding it unbinds.
//! A backend never reuses an id within one context.

use std::fmt;

use crate::coords::ColorRgba;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            pub const NULL: Self = Self(0);

            #[inline]
            pub const fn is_null(self) -> bool {
                self.0 == 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

handle!(
    /// A compiled (or failed) shader stage.
    ShaderHandle
);
handle!(
    /// A linked (or failed) program: vertex + fragment stage pair.
    ProgramHandle
);
handle!(
    /// Vertex data storage.
    BufferHandle
);
handle!(
    /// Vertex input binding: which buffer feeds which attribute.
    VertexArrayHandle
);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Upload frequency hint.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferUsage {
    /// Written once, drawn many times.
    Static,
    /// Contents change every frame.
    Dynamic,
    /// Written once, drawn once or a few times.
    Stream,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Primitive {
    Points,
    Lines,
}

/// Commands a scene issues against a graphics API.
///
/// The contract follows the shape of a GL-style immediate API: state is bound,
/// then consumed by later calls. Failures are never returned from the
/// creating call; they are read back through [`shader_status`] and
/// [`program_status`], and a failed object still gets a handle.
///
/// Shader source text is in the backend's shading language.
///
/// [`shader_status`]: GraphicsBackend::shader_status
/// [`program_status`]: GraphicsBackend::program_status
pub trait GraphicsBackend {
    fn create_shader(&mut self, stage: ShaderStage, source: &str) -> ShaderHandle;

    /// Compile status; `Err` carries the diagnostic log.
    fn shader_status(&mut self, shader: ShaderHandle) -> Result<(), String>;

    /// Attaches both stages and links them.
    fn create_program(&mut self, vertex: ShaderHandle, fragment: ShaderHandle) -> ProgramHandle;

    /// Link status; `Err` carries the diagnostic log.
    fn program_status(&mut self, program: ProgramHandle) -> Result<(), String>;

    /// Releases a shader object. Programs linked from it stay valid.
    fn delete_shader(&mut self, shader: ShaderHandle);

    fn delete_program(&mut self, program: ProgramHandle);

    fn create_buffers(&mut self, count: usize) -> Vec<BufferHandle>;

    fn delete_buffer(&mut self, buffer: BufferHandle);

    fn create_vertex_arrays(&mut self, count: usize) -> Vec<VertexArrayHandle>;

    fn delete_vertex_array(&mut self, array: VertexArrayHandle);

    /// Clears color and depth of the current target.
    fn clear(&mut self, color: ColorRgba);

    fn set_point_size(&mut self, size: f32);

    /// Binds the vertex buffer target; `None` unbinds.
    fn bind_buffer(&mut self, buffer: Option<BufferHandle>);

    /// Replaces the contents of the bound buffer.
    fn upload_vertices(&mut self, data: &[f32], usage: BufferUsage);

    /// Describes attribute `location` as `components` tightly packed `f32`s
    /// read from the bound buffer, recorded into the bound vertex array.
    fn vertex_attrib(&mut self, location: u32, components: u32);

    fn enable_attrib(&mut self, location: u32);

    fn use_program(&mut self, program: ProgramHandle);

    fn bind_vertex_array(&mut self, array: Option<VertexArrayHandle>);

    /// Draws `count` vertices starting at `first` with the bound program and vertex array.
    fn draw_arrays(&mut self, primitive: Primitive, first: u32, count: u32);

    fn create_buffer(&mut self) -> BufferHandle {
        self.create_buffers(1).pop().unwrap_or_default()
    }

    fn create_vertex_array(&mut self) -> VertexArrayHandle {
        self.create_vertex_arrays(1).pop().unwrap_or_default()
    }
}
