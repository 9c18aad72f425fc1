use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::{GpuFrame, GpuInit, SurfaceErrorAction};
use super::surface;

/// Device, queue and configured surface for one window.
///
/// Borrows the window for `'w`; the runtime stores both in one
/// self-referencing entry.
pub struct Gpu<'w> {
    _instance: wgpu::Instance,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    /// Physical pixels; may be zero while minimized, unlike `config`.
    size: PhysicalSize<u32>,
}

impl<'w> Gpu<'w> {
    /// Picks a high-performance adapter that can present to `window` and
    /// configures its surface.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = Self::open_device(&adapter, &init).await?;
        let config = Self::surface_config(&surface, &adapter, &init, size)?;

        surface.configure(&device, &config);
        log::debug!(
            "surface configured: {}x{} {:?} {:?}",
            config.width,
            config.height,
            config.format,
            config.present_mode
        );

        Ok(Self {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            size,
        })
    }

    async fn open_device(
        adapter: &wgpu::Adapter,
        init: &GpuInit,
    ) -> Result<(wgpu::Device, wgpu::Queue)> {
        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("spindle device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")
    }

    fn surface_config(
        surface: &wgpu::Surface<'w>,
        adapter: &wgpu::Adapter,
        init: &GpuInit,
        size: PhysicalSize<u32>,
    ) -> Result<wgpu::SurfaceConfiguration> {
        let caps = surface.get_capabilities(adapter);
        let format = surface::choose_surface_format(&caps, init.prefer_srgb)
            .context("no supported surface formats")?;

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: init.present_mode,
            alpha_mode: surface::choose_alpha_mode(&caps, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        surface::apply_resize(
            &self.surface,
            &self.device,
            &mut self.config,
            &mut self.size,
            new_size,
        );
    }

    /// Next swapchain texture, its view, and a fresh encoder.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("spindle frame encoder"),
            });

        Ok(GpuFrame { surface_texture, view, encoder })
    }

    /// Submits the frame's commands, then presents its texture.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame { surface_texture, view, encoder } = frame;

        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        surface::map_surface_error(&self.surface, &self.device, &self.config, self.size, err)
    }
}
