//! Application module for Altered Strains.
//!
//! This module ties the game core to the window and the GPU.
//!
//! # Module Structure
//!
//! - [`app_state`]: Contains the [`AppState`] struct which holds the renderers and the game
//! - [`event_handler`]: Contains the [`App`] struct and event handling logic
//! - [`update`]: Contains the per-iteration update and redraw logic
//!
//! # Event Flow
//!
//! 1. **Input Events**: window events are classified and fed to the game's dispatcher
//! 2. **State Updates**: once the queue is drained, the owed fixed updates run
//! 3. **Rendering**: a redraw is requested and the current screen is drawn once
//!
//! Everything runs on the event loop thread.

pub mod app_state;
pub mod event_handler;
pub mod update;

pub use app_state::AppState;
pub use event_handler::App;
