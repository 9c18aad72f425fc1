use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::render::ShaderStage;

/// Entry point every vertex stage must export.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Entry point every fragment stage must export.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Compiles `source` with naga and checks it fits the line pipeline.
///
/// This is the backend's compile status: `Err` carries a human-readable
/// diagnostic. Only sources that pass are handed to the wgpu device.
pub fn validate_wgsl(stage: ShaderStage, source: &str) -> Result<(), String> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| e.emit_to_string(source))?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|e| e.emit_to_string(source))?;

    let (naga_stage, entry) = match stage {
        ShaderStage::Vertex => (naga::ShaderStage::Vertex, VERTEX_ENTRY),
        ShaderStage::Fragment => (naga::ShaderStage::Fragment, FRAGMENT_ENTRY),
    };

    let ep = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == naga_stage && ep.name == entry)
        .ok_or_else(|| format!("no {stage} entry point named `{entry}`"))?;

    if stage == ShaderStage::Vertex {
        check_vertex_inputs(&module, &ep.function)?;
    }

    Ok(())
}

/// The line pipeline feeds exactly one input: `@location(0)` as `vec3<f32>`.
fn check_vertex_inputs(module: &naga::Module, function: &naga::Function) -> Result<(), String> {
    let position = naga::TypeInner::Vector {
        size: naga::VectorSize::Tri,
        scalar: naga::Scalar::F32,
    };

    let check = |binding: &Option<naga::Binding>, ty: naga::Handle<naga::Type>| {
        let Some(naga::Binding::Location { location, .. }) = binding else {
            return Ok(());
        };
        if *location != 0 {
            return Err(format!("vertex input @location({location}) has no buffer attribute"));
        }
        if module.types[ty].inner != position {
            return Err("vertex input @location(0) must be vec3<f32>".to_string());
        }
        Ok(())
    };

    for arg in &function.arguments {
        if let naga::TypeInner::Struct { members, .. } = &module.types[arg.ty].inner {
            for member in members {
                check(&member.binding, member.ty)?;
            }
        } else {
            check(&arg.binding, arg.ty)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = "
@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position, 1.0);
}
";

    const FS: &str = "
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(0.25, 0.5, 0.75, 1.0);
}
";

    #[test]
    fn accepts_line_shaders() {
        assert_eq!(validate_wgsl(ShaderStage::Vertex, VS), Ok(()));
        assert_eq!(validate_wgsl(ShaderStage::Fragment, FS), Ok(()));
    }

    #[test]
    fn rejects_syntax_errors() {
        let err = validate_wgsl(ShaderStage::Fragment, "fn fs_main( {").unwrap_err();
        assert!(!err.is_empty());
    }

    #[test]
    fn rejects_wrong_stage() {
        let err = validate_wgsl(ShaderStage::Vertex, FS).unwrap_err();
        assert!(err.contains("vs_main"), "{err}");
    }

    #[test]
    fn rejects_mismatched_vertex_input() {
        let vs = "
@vertex
fn vs_main(@location(0) position: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position, 0.0, 1.0);
}
";
        let err = validate_wgsl(ShaderStage::Vertex, vs).unwrap_err();
        assert!(err.contains("vec3<f32>"), "{err}");
    }

    #[test]
    fn rejects_extra_vertex_input() {
        let vs = "
struct In {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
}

@vertex
fn vs_main(input: In) -> @builtin(position) vec4<f32> {
    return vec4<f32>(input.position, 1.0);
}
";
        let err = validate_wgsl(ShaderStage::Vertex, vs).unwrap_err();
        assert!(err.contains("@location(1)"), "{err}");
    }
}
