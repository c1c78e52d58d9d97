//! Update logic for the Altered Strains App.
//!
//! Contains the per-iteration timing and rendering methods for the App struct.

use crate::error::RenderError;
use log::{error, trace, warn};
use std::time::Instant;
use winit::event_loop::ActiveEventLoop;

use super::event_handler::App;

impl App {
    /// Runs the fixed logic updates owed since the previous iteration.
    ///
    /// Returns `true` once an update has seen the exit flag.
    pub fn handle_frame_timing(&mut self, current_time: Instant) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };

        let outcome = state.game.tick(current_time);
        if outcome.updates > 0 {
            trace!("Ran {} updates", outcome.updates);
        }
        outcome.exit
    }

    /// Draws the current screen once.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped. Running out of GPU
    /// memory stops the event loop.
    pub fn handle_redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self
            .window
            .as_ref()
            .is_some_and(|window| window.is_minimized().unwrap_or(false))
        {
            return;
        }

        let Some(state) = self.state.as_mut() else {
            return;
        };

        match state.render() {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => {
                warn!("Surface lost or outdated; reconfiguring");
                state.wgpu_renderer.reconfigure();
            }
            Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                error!("Out of GPU memory; exiting");
                event_loop.exit();
            }
            Err(err) => warn!("Skipping frame: {}", err),
        }
    }
}
