//! Altered Strains entry point.
//!
//! Initializes logging, creates the event loop and runs the game until the window closes or
//! Escape is pressed. Set `RUST_LOG` to change the log filter (default `info`).

use altered_strains::app::App;
use altered_strains::config::GameConfig;
use anyhow::Context;
use winit::event_loop::{ControlFlow, EventLoop};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(GameConfig::default());
    event_loop
        .run_app(&mut app)
        .context("event loop terminated with an error")?;

    app.finish()
}
