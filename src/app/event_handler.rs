//! Event handler module for Altered Strains.
//!
//! Contains the App struct and its event handling logic.

use crate::app::app_state::AppState;
use crate::config::GameConfig;
use crate::game::keys::input_from_window_event;
use anyhow::Context;
use log::{error, info};
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

/// Main application struct that manages the game lifecycle and event handling.
///
/// # Lifecycle
/// 1. Created with `App::new()`, which initializes the WGPU instance
/// 2. On `resumed` the window is created and `set_window()` builds the [`AppState`]
/// 3. Window events feed the game's input dispatcher; `about_to_wait` runs the fixed
///    updates and requests a redraw
/// 4. The event loop exits once an update sees the exit flag or startup fails
pub struct App {
    /// The WGPU instance for graphics operations.
    pub instance: wgpu::Instance,
    pub config: GameConfig,
    /// The current application state, None until initialized.
    pub state: Option<AppState>,
    /// The application window, None until set.
    pub window: Option<Arc<Window>>,
    startup_error: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: GameConfig) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        Self {
            instance,
            config,
            state: None,
            window: None,
            startup_error: None,
        }
    }

    /// Creates the surface for `window` and initializes the renderers, sprites and game.
    pub async fn set_window(&mut self, window: Window) -> anyhow::Result<()> {
        let window = Arc::new(window);
        let size = window.inner_size();

        let surface = self
            .instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let state = AppState::new(
            &self.instance,
            surface,
            &self.config,
            size.width.max(1),
            size.height.max(1),
        )
        .await?;

        self.window.get_or_insert(window);
        self.state.get_or_insert(state);
        Ok(())
    }

    pub fn handle_resized(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            if let Some(state) = self.state.as_mut() {
                state.resize_surface(width, height);
            }
        }
    }

    /// Consumes the app, returning the startup failure that stopped the loop, if any.
    pub fn finish(self) -> anyhow::Result<()> {
        match self.startup_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.config.window_title.as_str())
            .with_inner_size(PhysicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ))
            .with_resizable(false);

        let result = event_loop
            .create_window(attributes)
            .context("failed to create window")
            .and_then(|window| pollster::block_on(self.set_window(window)));

        if let Err(err) = result {
            error!("Startup failed: {:#}", err);
            self.startup_error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        if let Some(input) = input_from_window_event(&event) {
            state.game.handle_input(input);
        }

        match event {
            WindowEvent::Resized(size) => self.handle_resized(size.width, size.height),
            WindowEvent::RedrawRequested => self.handle_redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            return;
        }

        if self.handle_frame_timing(Instant::now()) {
            info!("Exiting");
            event_loop.exit();
            return;
        }

        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
