//! Recording [`GraphicsBackend`] double for unit tests.

use std::collections::{HashMap, HashSet};

use spindle_engine::coords::ColorRgba;
use spindle_engine::render::{
    BufferHandle, BufferUsage, GraphicsBackend, Primitive, ProgramHandle, ShaderHandle,
    ShaderStage, VertexArrayHandle,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Clear,
    PointSize(f32),
    BindArray(Option<VertexArrayHandle>),
    BindBuffer(Option<BufferHandle>),
    Upload(usize, BufferUsage),
    VertexAttrib(u32, u32),
    EnableAttrib(u32),
    UseProgram(ProgramHandle),
    Draw(Primitive, u32, u32),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DrawRecord {
    pub program: Option<ProgramHandle>,
    pub array: Option<VertexArrayHandle>,
    pub primitive: Primitive,
    pub first: u32,
    pub count: u32,
    /// Contents of the array's attribute buffer at draw time.
    pub vertices: Vec<f32>,
}

#[derive(Debug, Clone)]
pub(crate) struct ShaderEntry {
    pub stage: ShaderStage,
    pub ok: bool,
}

#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    next_id: u32,

    /// Fragment shaders (by creation order) that report a compile error.
    pub fail_fragments: HashSet<usize>,
    /// Every link reports an error.
    pub fail_links: bool,

    pub shaders: HashMap<ShaderHandle, ShaderEntry>,
    pub deleted_shaders: Vec<ShaderHandle>,
    pub fragment_sources: Vec<String>,
    pub programs: HashMap<ProgramHandle, Result<(), String>>,
    pub buffers: HashMap<BufferHandle, Vec<f32>>,
    /// Vertex array -> buffer recorded by `vertex_attrib`.
    pub arrays: HashMap<VertexArrayHandle, Option<BufferHandle>>,

    pub bound_buffer: Option<BufferHandle>,
    pub bound_array: Option<VertexArrayHandle>,
    pub current_program: Option<ProgramHandle>,
    pub point_size: Option<f32>,

    pub calls: Vec<Call>,
    pub uploads: Vec<(BufferHandle, Vec<f32>)>,
    pub draws: Vec<DrawRecord>,
    pub clears: Vec<ColorRgba>,
}

impl RecordingBackend {
    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn live_shaders(&self) -> Vec<ShaderHandle> {
        self.shaders.keys().copied().collect()
    }

    pub fn draws_since(&self, start: usize) -> &[DrawRecord] {
        &self.draws[start..]
    }
}

impl GraphicsBackend for RecordingBackend {
    fn create_shader(&mut self, stage: ShaderStage, source: &str) -> ShaderHandle {
        let ok = match stage {
            ShaderStage::Vertex => true,
            ShaderStage::Fragment => {
                let index = self.fragment_sources.len();
                self.fragment_sources.push(source.to_owned());
                !self.fail_fragments.contains(&index)
            }
        };
        let handle = ShaderHandle(self.next());
        self.shaders.insert(handle, ShaderEntry { stage, ok });
        handle
    }

    fn shader_status(&mut self, shader: ShaderHandle) -> Result<(), String> {
        match self.shaders.get(&shader) {
            Some(entry) if entry.ok => Ok(()),
            Some(entry) => Err(format!("injected {} compile failure", entry.stage)),
            None => Err(format!("unknown {shader}")),
        }
    }

    fn create_program(&mut self, vertex: ShaderHandle, fragment: ShaderHandle) -> ProgramHandle {
        let attached_ok = [vertex, fragment]
            .iter()
            .all(|s| self.shaders.get(s).is_some_and(|e| e.ok));
        let status = if self.fail_links {
            Err("injected link failure".to_owned())
        } else if !attached_ok {
            Err("attached shader failed to compile".to_owned())
        } else {
            Ok(())
        };
        let handle = ProgramHandle(self.next());
        self.programs.insert(handle, status);
        handle
    }

    fn program_status(&mut self, program: ProgramHandle) -> Result<(), String> {
        self.programs
            .get(&program)
            .cloned()
            .unwrap_or_else(|| Err(format!("unknown {program}")))
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        if self.shaders.remove(&shader).is_some() {
            self.deleted_shaders.push(shader);
        }
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        self.programs.remove(&program);
    }

    fn create_buffers(&mut self, count: usize) -> Vec<BufferHandle> {
        (0..count)
            .map(|_| {
                let handle = BufferHandle(self.next());
                self.buffers.insert(handle, Vec::new());
                handle
            })
            .collect()
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        self.buffers.remove(&buffer);
    }

    fn create_vertex_arrays(&mut self, count: usize) -> Vec<VertexArrayHandle> {
        (0..count)
            .map(|_| {
                let handle = VertexArrayHandle(self.next());
                self.arrays.insert(handle, None);
                handle
            })
            .collect()
    }

    fn delete_vertex_array(&mut self, array: VertexArrayHandle) {
        self.arrays.remove(&array);
    }

    fn clear(&mut self, color: ColorRgba) {
        self.calls.push(Call::Clear);
        self.clears.push(color);
    }

    fn set_point_size(&mut self, size: f32) {
        self.calls.push(Call::PointSize(size));
        self.point_size = Some(size);
    }

    fn bind_buffer(&mut self, buffer: Option<BufferHandle>) {
        self.calls.push(Call::BindBuffer(buffer));
        self.bound_buffer = buffer;
    }

    fn upload_vertices(&mut self, data: &[f32], usage: BufferUsage) {
        self.calls.push(Call::Upload(data.len(), usage));
        if let Some(buffer) = self.bound_buffer {
            if let Some(slot) = self.buffers.get_mut(&buffer) {
                *slot = data.to_vec();
                self.uploads.push((buffer, data.to_vec()));
            }
        }
    }

    fn vertex_attrib(&mut self, location: u32, components: u32) {
        self.calls.push(Call::VertexAttrib(location, components));
        if let Some(array) = self.bound_array {
            if let Some(source) = self.arrays.get_mut(&array) {
                *source = self.bound_buffer;
            }
        }
    }

    fn enable_attrib(&mut self, location: u32) {
        self.calls.push(Call::EnableAttrib(location));
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.calls.push(Call::UseProgram(program));
        self.current_program = Some(program);
    }

    fn bind_vertex_array(&mut self, array: Option<VertexArrayHandle>) {
        self.calls.push(Call::BindArray(array));
        self.bound_array = array;
    }

    fn draw_arrays(&mut self, primitive: Primitive, first: u32, count: u32) {
        self.calls.push(Call::Draw(primitive, first, count));
        let vertices = self
            .bound_array
            .and_then(|a| self.arrays.get(&a).copied().flatten())
            .and_then(|b| self.buffers.get(&b).cloned())
            .unwrap_or_default();
        self.draws.push(DrawRecord {
            program: self.current_program,
            array: self.bound_array,
            primitive,
            first,
            count,
            vertices,
        });
    }
}
