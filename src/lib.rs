//! Altered Strains - a point-and-click serum mixing game
//!
//! The player starts on a main menu, presses Play to reach the lab, picks serums from the
//! shelf and presses Select to move on to mixing.
//!
//! # Architecture
//! - `game/`: screens, input dispatch, the wipe transition and the fixed-timestep clock
//! - `assets`: the sprite manifest and texture loading
//! - `renderer/`: scene building, sprite and text rendering on WGPU
//! - `app/`: the winit application driving the loop
//! - `config`, `error`, `math`: shared settings, error types and rectangles

pub mod app;
pub mod assets;
pub mod config;
pub mod error;
pub mod game;
pub mod math;
pub mod renderer;
