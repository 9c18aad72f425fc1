use spindle_engine::coords::{ColorRgba, Vec3};
use spindle_engine::render::{BufferHandle, ProgramHandle, VertexArrayHandle};

/// One animated segment and the backend objects it owns.
///
/// `start` is fixed at construction. `end` starts at the origin; from the
/// first advance on it is the point at angle `phase` on the end circle.
#[derive(Debug, Clone, PartialEq)]
pub struct LineActor {
    pub(crate) index: usize,
    pub(crate) start: Vec3,
    pub(crate) end: Vec3,
    pub(crate) phase: f64,
    pub(crate) color: ColorRgba,

    pub(crate) program: ProgramHandle,
    pub(crate) vertex_buffer: BufferHandle,
    pub(crate) vertex_array: VertexArrayHandle,

    /// False when shader setup failed and the policy skips such actors.
    pub(crate) enabled: bool,
}

impl LineActor {
    /// Position in the registry (draw and update order).
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn start(&self) -> Vec3 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Vec3 {
        self.end
    }

    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    #[inline]
    pub fn color(&self) -> ColorRgba {
        self.color
    }

    #[inline]
    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    #[inline]
    pub fn vertex_buffer(&self) -> BufferHandle {
        self.vertex_buffer
    }

    #[inline]
    pub fn vertex_array(&self) -> VertexArrayHandle {
        self.vertex_array
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Interleaved position-only vertex data: `start` then `end`.
    #[inline]
    pub fn vertices(&self) -> [f32; 6] {
        let [sx, sy, sz] = self.start.to_array();
        let [ex, ey, ez] = self.end.to_array();
        [sx, sy, sz, ex, ey, ez]
    }

    pub(crate) fn set_phase(&mut self, phase: f64, end: Vec3) {
        self.phase = phase;
        self.end = end;
    }
}
