/// A single acquired frame.
///
/// Short-lived: holding the surface texture blocks acquisition of the next
/// one, so hand it back to `Gpu::submit` within the same callback.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
