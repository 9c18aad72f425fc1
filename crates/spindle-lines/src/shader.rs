//! WGSL sources for line actors and program construction.
//!
//! Every actor gets its own program whose fragment stage returns the actor's
//! color as a literal. Numbers are written with Rust formatting, which is
//! locale-independent, so the sources always use `.` as the decimal mark.

use std::fmt::Write as _;

use spindle_engine::coords::ColorRgba;
use spindle_engine::render::wgpu_backend::{FRAGMENT_ENTRY, VERTEX_ENTRY};
use spindle_engine::render::{GraphicsBackend, ProgramHandle, ShaderStage};

use crate::error::ShaderError;

/// Fixed view volume: `[-1, 1] × [-1, 1] × [-10, 10]`.
pub const VIEW_VOLUME: [f32; 6] = [-1.0, 1.0, -1.0, 1.0, -10.0, 10.0];

/// Column-major orthographic projection into clip space with depth in `[0, 1]`.
pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> [[f32; 4]; 4] {
    let rl = right - left;
    let tb = top - bottom;
    let nf = near - far;
    [
        [2.0 / rl, 0.0, 0.0, 0.0],
        [0.0, 2.0 / tb, 0.0, 0.0],
        [0.0, 0.0, 1.0 / nf, 0.0],
        [-(right + left) / rl, -(top + bottom) / tb, near / nf, 1.0],
    ]
}

/// Float literal WGSL accepts (`1.0`, `-0.05`, `1e-7`).
fn wgsl_float(v: f32) -> String {
    format!("{v:?}")
}

/// Pass-through vertex stage with the fixed orthographic projection applied.
pub fn vertex_source() -> String {
    let [l, r, b, t, n, f] = VIEW_VOLUME;
    let m = ortho(l, r, b, t, n, f);

    let mut columns = String::new();
    for (i, col) in m.iter().enumerate() {
        let sep = if i + 1 < m.len() { "," } else { "" };
        let _ = writeln!(
            columns,
            "        vec4<f32>({}, {}, {}, {}){sep}",
            wgsl_float(col[0]),
            wgsl_float(col[1]),
            wgsl_float(col[2]),
            wgsl_float(col[3]),
        );
    }

    format!(
        "@vertex
fn {VERTEX_ENTRY}(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {{
    let projection = mat4x4<f32>(
{columns}    );
    return projection * vec4<f32>(position, 1.0);
}}
"
    )
}

/// Fragment stage returning `color` for every fragment.
pub fn fragment_source(color: ColorRgba) -> String {
    let ColorRgba { r, g, b, a } = color;
    format!(
        "@fragment
fn {FRAGMENT_ENTRY}() -> @location(0) vec4<f32> {{
    return vec4<f32>({r:.4}, {g:.4}, {b:.4}, {a:.4});
}}
"
    )
}

/// Result of compiling and linking one program.
///
/// `handle` is whatever the backend produced, valid or not.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramBuild {
    pub handle: ProgramHandle,
    pub errors: Vec<ShaderError>,
}

impl ProgramBuild {
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Compiles both stages, links them, and releases the stage objects.
///
/// Each failed status check is logged with its stage and diagnostic and
/// collected; nothing here aborts or retries.
pub fn build_program<B>(backend: &mut B, color: ColorRgba) -> ProgramBuild
where
    B: GraphicsBackend + ?Sized,
{
    let mut errors = Vec::new();

    let vertex = backend.create_shader(ShaderStage::Vertex, &vertex_source());
    if let Err(log) = backend.shader_status(vertex) {
        errors.push(ShaderError::Compile { stage: ShaderStage::Vertex, log });
    }

    let fragment = backend.create_shader(ShaderStage::Fragment, &fragment_source(color));
    if let Err(log) = backend.shader_status(fragment) {
        errors.push(ShaderError::Compile { stage: ShaderStage::Fragment, log });
    }

    let handle = backend.create_program(vertex, fragment);
    if let Err(log) = backend.program_status(handle) {
        errors.push(ShaderError::Link { log });
    }

    backend.delete_shader(vertex);
    backend.delete_shader(fragment);

    for err in &errors {
        log::error!("{err}");
    }

    ProgramBuild { handle, errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindle_engine::render::wgpu_backend::validate_wgsl;

    use crate::testing::RecordingBackend;

    fn apply(m: &[[f32; 4]; 4], p: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (col, v) in m.iter().zip(p) {
            for row in 0..4 {
                out[row] += col[row] * v;
            }
        }
        out
    }

    #[test]
    fn ortho_unit_square_keeps_xy() {
        let m = ortho(-1.0, 1.0, -1.0, 1.0, -10.0, 10.0);
        let p = apply(&m, [0.25, -0.5, 0.0, 1.0]);
        assert!((p[0] - 0.25).abs() < 1e-6);
        assert!((p[1] + 0.5).abs() < 1e-6);
        assert!((p[2] - 0.5).abs() < 1e-6);
        assert_eq!(p[3], 1.0);
    }

    #[test]
    fn ortho_maps_depth_range_to_unit_interval() {
        let m = ortho(-1.0, 1.0, -1.0, 1.0, -10.0, 10.0);
        assert!((apply(&m, [0.0, 0.0, -10.0, 1.0])[2] - 1.0).abs() < 1e-6);
        assert!(apply(&m, [0.0, 0.0, 10.0, 1.0])[2].abs() < 1e-6);
    }

    #[test]
    fn generated_sources_validate() {
        assert_eq!(validate_wgsl(ShaderStage::Vertex, &vertex_source()), Ok(()));
        let color = ColorRgba::opaque(0.123456, 0.5, 0.999);
        assert_eq!(validate_wgsl(ShaderStage::Fragment, &fragment_source(color)), Ok(()));
    }

    #[test]
    fn fragment_source_uses_point_decimal_mark() {
        let src = fragment_source(ColorRgba::opaque(0.5, 0.25, 0.125));
        assert!(src.contains("vec4<f32>(0.5000, 0.2500, 0.1250, 1.0000)"), "{src}");
    }

    #[test]
    fn build_program_deletes_stage_objects() {
        let mut backend = RecordingBackend::default();
        let build = build_program(&mut backend, ColorRgba::white());
        assert!(build.is_ok());
        assert!(!build.handle.is_null());
        assert_eq!(backend.deleted_shaders.len(), 2);
        assert!(backend.live_shaders().is_empty());
    }

    #[test]
    fn build_program_reports_each_failure() {
        let mut backend = RecordingBackend::default();
        backend.fail_fragments.insert(0);

        let build = build_program(&mut backend, ColorRgba::white());

        assert!(!build.handle.is_null(), "a failed build still yields a handle");
        assert_eq!(build.errors.len(), 2);
        assert!(matches!(
            &build.errors[0],
            ShaderError::Compile { stage: ShaderStage::Fragment, .. }
        ));
        assert!(matches!(&build.errors[1], ShaderError::Link { .. }));
    }
}
