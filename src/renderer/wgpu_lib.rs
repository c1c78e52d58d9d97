//! WGPU-based renderer for Altered Strains.
//!
//! [`WgpuRenderer`] owns the surface, the device and the sprite pipeline. Each frame it clears
//! the surface, draws the scene's sprites back to front and overlays the visible text.
//!
//! # Usage
//! Create a [`WgpuRenderer`] via [`WgpuRenderer::new`], load textures through
//! [`WgpuRenderer::texture_loader`] and call [`WgpuRenderer::render_frame`] once per loop
//! iteration.

use crate::assets::SpriteSet;
use crate::error::RenderError;
use crate::renderer::scene::Scene;
use crate::renderer::sprite::{GpuTextureLoader, SpriteRenderer};
use crate::renderer::text::{TITLE_ID, TextRenderer};
use anyhow::{Context, anyhow};
use log::info;

pub struct WgpuRenderer {
    /// The WGPU surface for presenting rendered frames.
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub sprite_renderer: SpriteRenderer,
    clear_color: wgpu::Color,
}

impl WgpuRenderer {
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
        clear_color: [f64; 4],
    ) -> anyhow::Result<Self> {
        let adapter = Self::create_adapter(instance, &surface).await?;
        let (device, queue) = Self::create_device(&adapter).await?;
        let surface_config = Self::create_surface_config(&surface, &adapter, width, height)?;

        surface.configure(&device, &surface_config);

        let sprite_renderer = SpriteRenderer::new(&device, surface_config.format, width, height);
        let [r, g, b, a] = clear_color;

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            sprite_renderer,
            clear_color: wgpu::Color { r, g, b, a },
        })
    }

    /// Texture loader uploading into the sprite renderer's cache.
    pub fn texture_loader(&mut self) -> GpuTextureLoader<'_> {
        self.sprite_renderer.loader(&self.device, &self.queue)
    }

    /// Draws one frame: clear, sprites in scene order, then text.
    pub fn render_frame(
        &mut self,
        scene: &Scene,
        sprites: &SpriteSet,
        text_renderer: &mut TextRenderer,
    ) -> Result<(), RenderError> {
        let surface_texture = self.surface.get_current_texture()?;
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.sprite_renderer
            .prepare(&self.device, scene.quads(sprites));
        text_renderer.set_visible(TITLE_ID, scene.show_title);
        text_renderer.prepare(&self.device, &self.queue)?;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.sprite_renderer.render(&mut render_pass);
            text_renderer.render(&mut render_pass)?;
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        text_renderer.trim();

        Ok(())
    }

    /// Reapplies the current configuration after the surface was lost or outdated.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.surface_config);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.reconfigure();
        self.sprite_renderer.resize(width, height);
    }

    // Private helper methods

    async fn create_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'static>,
    ) -> anyhow::Result<wgpu::Adapter> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(surface),
            })
            .await
            .ok_or_else(|| anyhow!("failed to find an appropriate adapter"))?;

        let adapter_info = adapter.get_info();
        info!("Using {} ({:?})", adapter_info.name, adapter_info.backend);
        Ok(adapter)
    }

    async fn create_device(adapter: &wgpu::Adapter) -> anyhow::Result<(wgpu::Device, wgpu::Queue)> {
        adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: Default::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .context("failed to create device")
    }

    fn create_surface_config(
        surface: &wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> anyhow::Result<wgpu::SurfaceConfiguration> {
        let capabilities = surface.get_capabilities(adapter);
        let format = capabilities
            .formats
            .iter()
            .find(|format| format.is_srgb())
            .or(capabilities.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no supported texture formats"))?;
        let alpha_mode = capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        })
    }
}
