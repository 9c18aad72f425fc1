//! wgpu implementation of [`GraphicsBackend`].
//!
//! GL-style objects map onto wgpu like this:
//! - shader: WGSL validated by naga; a `ShaderModule` exists only if it passed
//! - program: a `LineList` render pipeline built from a vertex + fragment pair
//! - buffer: a `VERTEX | COPY_DST` buffer, allocated on first upload
//! - vertex array: which buffer feeds attribute 0 when drawing
//!
//! [`WgpuStore`] owns all of it across frames. [`WgpuBackend`] is a short-lived
//! view over the store, the device, and (during a frame) the render target.
//! `clear` opens the frame's render pass; it closes when the backend drops.

mod slots;
mod validate;

use crate::coords::ColorRgba;
use crate::render::{
    BufferHandle, BufferUsage, GraphicsBackend, Primitive, ProgramHandle, RenderCtx,
    RenderTarget, ShaderHandle, ShaderStage, VertexArrayHandle,
};

use slots::Slots;
pub use validate::{validate_wgsl, FRAGMENT_ENTRY, VERTEX_ENTRY};

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const POSITION_COMPONENTS: u32 = 3;

struct ShaderEntry {
    stage: ShaderStage,
    module: Option<wgpu::ShaderModule>,
    status: Result<(), String>,
}

struct ProgramEntry {
    pipeline: Option<wgpu::RenderPipeline>,
    status: Result<(), String>,
}

#[derive(Default)]
struct BufferEntry {
    buffer: Option<wgpu::Buffer>,
    len: u64,
}

#[derive(Default)]
struct ArrayEntry {
    source: Option<BufferHandle>,
    components: u32,
    enabled: bool,
}

/// Live object counts, for teardown diagnostics.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct StoreStats {
    pub shaders: usize,
    pub programs: usize,
    pub buffers: usize,
    pub arrays: usize,
}

/// Backend objects and bind state that persist across frames.
#[derive(Default)]
pub struct WgpuStore {
    shaders: Slots<ShaderEntry>,
    programs: Slots<ProgramEntry>,
    buffers: Slots<BufferEntry>,
    arrays: Slots<ArrayEntry>,

    bound_buffer: Option<BufferHandle>,
    bound_array: Option<VertexArrayHandle>,
    bound_program: Option<ProgramHandle>,

    point_size: f32,

    warned_points: bool,
    warned_no_target: bool,
}

impl WgpuStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            shaders: self.shaders.live(),
            programs: self.programs.live(),
            buffers: self.buffers.live(),
            arrays: self.arrays.live(),
        }
    }
}

struct FrameTarget<'a> {
    encoder: &'a mut wgpu::CommandEncoder,
    view: &'a wgpu::TextureView,
    pass: Option<wgpu::RenderPass<'static>>,
}

/// [`GraphicsBackend`] over a wgpu device.
pub struct WgpuBackend<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    surface_format: wgpu::TextureFormat,
    store: &'a mut WgpuStore,
    frame: Option<FrameTarget<'a>>,
}

impl<'a> WgpuBackend<'a> {
    /// Backend for resource setup and teardown. Clears and draws are ignored.
    pub fn new(ctx: &'a RenderCtx<'_>, store: &'a mut WgpuStore) -> Self {
        Self {
            device: ctx.device,
            queue: ctx.queue,
            surface_format: ctx.surface_format,
            store,
            frame: None,
        }
    }

    /// Backend recording into `target` for the current frame.
    pub fn with_target(
        ctx: &'a RenderCtx<'_>,
        store: &'a mut WgpuStore,
        target: &'a mut RenderTarget<'_>,
    ) -> Self {
        let mut backend = Self::new(ctx, store);
        backend.frame = Some(FrameTarget {
            encoder: &mut *target.encoder,
            view: target.color_view,
            pass: None,
        });
        backend
    }

    fn warn_no_target(&mut self, what: &str) {
        if !self.store.warned_no_target {
            log::warn!("{what} issued without an open render pass; ignored");
            self.store.warned_no_target = true;
        }
    }

    fn build_pipeline(
        &self,
        vertex: &wgpu::ShaderModule,
        fragment: &wgpu::ShaderModule,
        label: &str,
    ) -> wgpu::RenderPipeline {
        self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: None,
            vertex: wgpu::VertexState {
                module: vertex,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: (POSITION_COMPONENTS as usize * std::mem::size_of::<f32>())
                        as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &POSITION_ATTRS,
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: fragment,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    }

    /// Resolves the module of a shader that compiled for `stage`.
    fn linkable_module(
        &self,
        shader: ShaderHandle,
        stage: ShaderStage,
    ) -> Result<&wgpu::ShaderModule, String> {
        let entry = self
            .store
            .shaders
            .get(shader.0)
            .ok_or_else(|| format!("{shader} does not exist"))?;

        if entry.stage != stage {
            return Err(format!("{shader} is a {} shader, expected {stage}", entry.stage));
        }

        match (&entry.module, &entry.status) {
            (Some(module), Ok(())) => Ok(module),
            _ => Err(format!("{stage} shader {shader} did not compile")),
        }
    }
}

impl GraphicsBackend for WgpuBackend<'_> {
    fn create_shader(&mut self, stage: ShaderStage, source: &str) -> ShaderHandle {
        let status = validate_wgsl(stage, source);

        let module = status.is_ok().then(|| {
            self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(match stage {
                    ShaderStage::Vertex => "spindle vertex shader",
                    ShaderStage::Fragment => "spindle fragment shader",
                }),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            })
        });

        ShaderHandle(self.store.shaders.insert(ShaderEntry { stage, module, status }))
    }

    fn shader_status(&mut self, shader: ShaderHandle) -> Result<(), String> {
        match self.store.shaders.get(shader.0) {
            Some(entry) => entry.status.clone(),
            None => Err(format!("{shader} does not exist")),
        }
    }

    fn create_program(&mut self, vertex: ShaderHandle, fragment: ShaderHandle) -> ProgramHandle {
        let linked = self
            .linkable_module(vertex, ShaderStage::Vertex)
            .and_then(|vs| {
                let fs = self.linkable_module(fragment, ShaderStage::Fragment)?;
                Ok(self.build_pipeline(vs, fs, "spindle line pipeline"))
            });

        let entry = match linked {
            Ok(pipeline) => ProgramEntry {
                pipeline: Some(pipeline),
                status: Ok(()),
            },
            Err(log) => ProgramEntry {
                pipeline: None,
                status: Err(log),
            },
        };

        ProgramHandle(self.store.programs.insert(entry))
    }

    fn program_status(&mut self, program: ProgramHandle) -> Result<(), String> {
        match self.store.programs.get(program.0) {
            Some(entry) => entry.status.clone(),
            None => Err(format!("{program} does not exist")),
        }
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        // Pipelines hold their own reference to the module.
        self.store.shaders.remove(shader.0);
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        self.store.programs.remove(program.0);
        if self.store.bound_program == Some(program) {
            self.store.bound_program = None;
        }
    }

    fn create_buffers(&mut self, count: usize) -> Vec<BufferHandle> {
        (0..count)
            .map(|_| BufferHandle(self.store.buffers.insert(BufferEntry::default())))
            .collect()
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        if let Some(entry) = self.store.buffers.remove(buffer.0) {
            if let Some(b) = entry.buffer {
                b.destroy();
            }
        }
        if self.store.bound_buffer == Some(buffer) {
            self.store.bound_buffer = None;
        }
    }

    fn create_vertex_arrays(&mut self, count: usize) -> Vec<VertexArrayHandle> {
        (0..count)
            .map(|_| VertexArrayHandle(self.store.arrays.insert(ArrayEntry::default())))
            .collect()
    }

    fn delete_vertex_array(&mut self, array: VertexArrayHandle) {
        self.store.arrays.remove(array.0);
        if self.store.bound_array == Some(array) {
            self.store.bound_array = None;
        }
    }

    fn clear(&mut self, color: ColorRgba) {
        let Some(frame) = self.frame.as_mut() else {
            self.warn_no_target("clear");
            return;
        };

        // A second clear restarts the pass; end the previous one first.
        frame.pass = None;

        // No depth attachment: lines are drawn in submission order, so only
        // the color target is cleared.
        let pass = frame
            .encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("spindle lines pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            })
            .forget_lifetime();

        frame.pass = Some(pass);
    }

    fn set_point_size(&mut self, size: f32) {
        // wgpu rasterizes points at one pixel; the size is recorded only.
        if self.store.point_size != size {
            log::debug!("point size set to {size}");
            self.store.point_size = size;
        }
    }

    fn bind_buffer(&mut self, buffer: Option<BufferHandle>) {
        self.store.bound_buffer = buffer.filter(|b| !b.is_null());
    }

    fn upload_vertices(&mut self, data: &[f32], usage: BufferUsage) {
        let Some(handle) = self.store.bound_buffer else {
            log::warn!("upload_vertices with no buffer bound");
            return;
        };
        let Some(entry) = self.store.buffers.get_mut(handle.0) else {
            log::warn!("upload_vertices into deleted {handle}");
            return;
        };

        let bytes: &[u8] = bytemuck::cast_slice(data);
        let size = bytes.len() as u64;

        let fits = entry.buffer.as_ref().is_some_and(|b| b.size() >= size);
        if !fits && size > 0 {
            entry.buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("spindle vertex buffer"),
                size,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            log::trace!("{handle}: allocated {size} bytes ({usage:?})");
        }

        if let Some(buffer) = entry.buffer.as_ref().filter(|_| size > 0) {
            self.queue.write_buffer(buffer, 0, bytes);
        }

        entry.len = size;
    }

    fn vertex_attrib(&mut self, location: u32, components: u32) {
        if location != 0 || components != POSITION_COMPONENTS {
            log::warn!(
                "vertex_attrib({location}, {components}) unsupported; pipelines read one vec3 at location 0"
            );
            return;
        }

        let source = self.store.bound_buffer;
        let Some(array) = self.store.bound_array else {
            log::warn!("vertex_attrib with no vertex array bound");
            return;
        };
        if let Some(entry) = self.store.arrays.get_mut(array.0) {
            entry.source = source;
            entry.components = components;
        }
    }

    fn enable_attrib(&mut self, location: u32) {
        if location != 0 {
            return;
        }
        let Some(array) = self.store.bound_array else { return };
        if let Some(entry) = self.store.arrays.get_mut(array.0) {
            entry.enabled = true;
        }
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.store.bound_program = (!program.is_null()).then_some(program);
    }

    fn bind_vertex_array(&mut self, array: Option<VertexArrayHandle>) {
        self.store.bound_array = array.filter(|a| !a.is_null());
    }

    fn draw_arrays(&mut self, primitive: Primitive, first: u32, count: u32) {
        if primitive != Primitive::Lines {
            if !self.store.warned_points {
                log::warn!("{primitive:?} draws are not supported by the line pipeline");
                self.store.warned_points = true;
            }
            return;
        }

        if self.frame.as_ref().is_none_or(|f| f.pass.is_none()) {
            self.warn_no_target("draw");
            return;
        }

        let store = &*self.store;

        let Some(pipeline) = store
            .bound_program
            .and_then(|p| store.programs.get(p.0))
            .and_then(|p| p.pipeline.as_ref())
        else {
            log::trace!("draw skipped: no valid program bound");
            return;
        };

        let Some(array) = store
            .bound_array
            .and_then(|a| store.arrays.get(a.0))
            .filter(|a| a.enabled)
        else {
            log::trace!("draw skipped: no enabled vertex array bound");
            return;
        };

        let Some((buffer, len)) = array
            .source
            .and_then(|b| store.buffers.get(b.0))
            .and_then(|b| b.buffer.as_ref().map(|buf| (buf, b.len)))
        else {
            log::trace!("draw skipped: vertex array has no data");
            return;
        };

        let needed = (first as u64 + count as u64) * array.components as u64 * 4;
        if needed > len {
            log::warn!("draw of {count} vertices reads past the {len}-byte buffer");
            return;
        }

        let Some(pass) = self.frame.as_mut().and_then(|f| f.pass.as_mut()) else { return };
        pass.set_pipeline(pipeline);
        pass.set_vertex_buffer(0, buffer.slice(..len));
        pass.draw(first..first + count, 0..1);
    }
}
