//! AppState module for Altered Strains.
//!
//! This module defines the [`AppState`] struct, which holds the rendering backends and the game
//! core of a running session.

use crate::assets::{SPRITE_MANIFEST, load_sprites};
use crate::config::GameConfig;
use crate::error::RenderError;
use crate::game::Game;
use crate::renderer::scene::build_scene;
use crate::renderer::text::TextRenderer;
use crate::renderer::wgpu_lib::WgpuRenderer;
use log::info;

pub struct AppState {
    /// The WGPU renderer for the sprites.
    pub wgpu_renderer: WgpuRenderer,
    /// The text renderer for the title.
    pub text_renderer: TextRenderer,
    /// Game state, sprites and clock.
    pub game: Game,
}

impl AppState {
    /// Asynchronously creates the renderers, loads every sprite and starts the game.
    ///
    /// Missing images and fonts are logged and skipped; only GPU setup failures are errors.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        config: &GameConfig,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self> {
        let mut wgpu_renderer =
            WgpuRenderer::new(instance, surface, width, height, config.clear_color).await?;

        let text_renderer = TextRenderer::new(
            &wgpu_renderer.device,
            &wgpu_renderer.queue,
            wgpu_renderer.surface_config.format,
            width,
            height,
            &config.fonts_dir(),
        );

        let sprites = load_sprites(&config.images_dir(), &mut wgpu_renderer.texture_loader());
        let loaded = SPRITE_MANIFEST
            .iter()
            .filter(|spec| !sprites.bounds(spec.id).is_empty())
            .count();
        info!("Loaded {} of {} sprites", loaded, SPRITE_MANIFEST.len());

        Ok(Self {
            wgpu_renderer,
            text_renderer,
            game: Game::new(config.clone(), sprites),
        })
    }

    pub fn resize_surface(&mut self, width: u32, height: u32) {
        self.wgpu_renderer.resize(width, height);
        self.text_renderer.resize(width, height);
    }

    /// Builds the scene for the current state and draws it.
    pub fn render(&mut self) -> Result<(), RenderError> {
        let scene = build_scene(&self.game.state, self.game.config.draw_wipe_transition);
        self.wgpu_renderer
            .render_frame(&scene, &self.game.sprites, &mut self.text_renderer)
    }
}
