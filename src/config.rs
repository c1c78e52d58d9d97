//! Game configuration.
//!
//! [`GameConfig`] gathers the window properties, the asset location, the loop cadence and the
//! behavior toggles in one place. The [`Default`] implementation is the shipped game.

use std::path::PathBuf;
use std::time::Duration;

/// Window width in pixels.
pub const WINDOW_WIDTH: u32 = 800;
/// Window height in pixels.
pub const WINDOW_HEIGHT: u32 = 600;
/// Static window title.
pub const WINDOW_TITLE: &str = "Altered Strains";
/// Root directory of the asset tree, relative to the working directory.
pub const ASSET_ROOT: &str = "ASSETS";

/// Settings for a game session.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub window_title: String,
    /// Directory holding `FONTS/` and `IMAGES/`.
    pub asset_root: PathBuf,
    /// Fixed logic update rate.
    pub updates_per_second: u32,
    /// Upper bound on catch-up updates run before a single render. Lag beyond this is dropped.
    pub max_catch_up_updates: u32,
    /// Clear the pending click target and serum after every mouse release.
    ///
    /// When `false` the last pressed target stays recorded until another region is pressed,
    /// so a later release re-commits it.
    pub reset_click_on_release: bool,
    /// Hit-test only the regions of the current screen on mouse-down.
    ///
    /// When `false` every button and serum region is checked on every press, whatever screen
    /// is showing; the screen only matters once the release commits the click.
    pub scope_hits_to_screen: bool,
    /// Draw the wipe sprite sheet while the screen transition is running.
    pub draw_wipe_transition: bool,
    /// Background color cleared before every frame.
    pub clear_color: [f64; 4],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            window_title: WINDOW_TITLE.to_string(),
            asset_root: PathBuf::from(ASSET_ROOT),
            updates_per_second: 60,
            max_catch_up_updates: 30,
            reset_click_on_release: true,
            scope_hits_to_screen: false,
            draw_wipe_transition: false,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl GameConfig {
    /// Duration of one logic update.
    pub fn frame_period(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.updates_per_second.max(1)))
    }

    /// Directory the sprite images are read from.
    pub fn images_dir(&self) -> PathBuf {
        self.asset_root.join("IMAGES")
    }

    /// Directory the fonts are read from.
    pub fn fonts_dir(&self) -> PathBuf {
        self.asset_root.join("FONTS")
    }
}
