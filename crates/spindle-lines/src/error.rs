use spindle_engine::render::ShaderStage;

/// Shader setup failures, read back from backend status queries.
///
/// These never abort initialization; see [`FailurePolicy`](crate::FailurePolicy).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShaderError {
    #[error("{stage} shader compilation failed: {log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("program linking failed: {log}")]
    Link { log: String },
}
