//! Game state management module.
//!
//! [`GameState`] holds everything the game mutates: the active screen, the click recorded on
//! mouse-down, the committed serum selection, the wipe transition and the exit flag. It reacts
//! to [`InputEvent`]s and advances in fixed logic updates.
//!
//! [`Game`] bundles the state with its configuration, the loaded sprites (which supply the hit
//! regions) and the fixed-timestep clock. It is the GPU-free core the application drives.

pub mod keys;
pub mod screen;
pub mod timestep;
pub mod transition;

use self::keys::{GameKey, InputEvent};
use self::screen::{ClickTarget, Outcome, Screen, SerumChoice, Trigger, transition};
use self::timestep::FixedTimestep;
use self::transition::WipeTransition;
use crate::assets::SpriteSet;
use crate::config::GameConfig;
use log::info;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Result of one logic update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Continue,
    Exit,
}

/// Mutable state of the game.
#[derive(Debug, Default, Clone)]
pub struct GameState {
    pub current_screen: Screen,
    /// Button recorded on the last mouse-down.
    pub pending_click: ClickTarget,
    /// Serum icon recorded on the last mouse-down.
    pub pending_serum: SerumChoice,
    /// Last serum committed on a mouse-up.
    pub selected_serum: SerumChoice,
    /// Serums already picked; their icons are drawn blacked out.
    pub used_serums: HashSet<SerumChoice>,
    pub mouse_held: bool,
    /// Last cursor position in window pixels.
    pub cursor: (f32, f32),
    pub wipe: WipeTransition,
    pub exit_requested: bool,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatches one input event.
    pub fn handle_input(&mut self, event: InputEvent, sprites: &SpriteSet, config: &GameConfig) {
        match event {
            InputEvent::WindowClosed => {
                info!("The close button was pressed; stopping");
                self.exit_requested = true;
            }
            InputEvent::KeyPressed(GameKey::Escape) => {
                info!("Escape pressed; stopping");
                self.exit_requested = true;
            }
            InputEvent::CursorMoved { x, y } => self.cursor = (x, y),
            InputEvent::MouseButtonPressed => {
                self.handle_mouse_down(sprites, config.scope_hits_to_screen)
            }
            InputEvent::MouseButtonReleased => self.handle_mouse_up(config.reset_click_on_release),
        }
    }

    /// Records the button and the serum under the cursor. A press outside every checked region
    /// keeps whatever was recorded before.
    fn handle_mouse_down(&mut self, sprites: &SpriteSet, scoped: bool) {
        self.mouse_held = true;
        let (x, y) = self.cursor;

        if let Some(target) = self.hit_target(sprites, x, y, scoped) {
            self.pending_click = target;
        }
        if let Some(serum) = self.hit_serum(sprites, x, y, scoped) {
            self.pending_serum = serum;
        }
    }

    fn handle_mouse_up(&mut self, reset_on_release: bool) {
        self.mouse_held = false;

        let screen = self.current_screen;
        let click = transition(screen, Trigger::Click(self.pending_click));
        let serum = transition(screen, Trigger::Serum(self.pending_serum));
        self.apply(click);
        self.apply(serum);

        if reset_on_release {
            self.pending_click = ClickTarget::None;
            self.pending_serum = SerumChoice::None;
        }
    }

    fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Unchanged => {}
            Outcome::Enter { screen, begin_wipe } => {
                info!("Screen {:?} -> {:?}", self.current_screen, screen);
                self.current_screen = screen;
                if begin_wipe {
                    self.wipe.begin();
                }
            }
            Outcome::SerumSelected(serum) => {
                info!("Selected serum {:?}", serum);
                self.selected_serum = serum;
                self.used_serums.insert(serum);
            }
        }
    }

    /// First button containing the point, in [`ClickTarget::CHECK_ORDER`]. With `scoped` only
    /// the buttons of the current screen are checked.
    pub fn hit_target(
        &self,
        sprites: &SpriteSet,
        x: f32,
        y: f32,
        scoped: bool,
    ) -> Option<ClickTarget> {
        let candidates: &[ClickTarget] = if scoped {
            self.current_screen.live_targets()
        } else {
            &ClickTarget::CHECK_ORDER
        };
        candidates.iter().copied().find(|target| {
            target
                .sprite()
                .is_some_and(|sprite| sprites.bounds(sprite).contains(x, y))
        })
    }

    /// First serum icon containing the point, in [`SerumChoice::ALL`] order. With `scoped` only
    /// the icons of the current screen are checked.
    pub fn hit_serum(
        &self,
        sprites: &SpriteSet,
        x: f32,
        y: f32,
        scoped: bool,
    ) -> Option<SerumChoice> {
        let candidates: &[SerumChoice] = if scoped {
            self.current_screen.live_serums()
        } else {
            &SerumChoice::ALL
        };
        candidates.iter().copied().find(|serum| {
            serum
                .sprite()
                .is_some_and(|sprite| sprites.bounds(sprite).contains(x, y))
        })
    }

    /// One fixed logic update.
    pub fn update(&mut self) -> UpdateOutcome {
        if self.current_screen == Screen::SerumSelect {
            self.wipe.tick();
        }
        if self.exit_requested {
            UpdateOutcome::Exit
        } else {
            UpdateOutcome::Continue
        }
    }
}

/// What happened during one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Logic updates run.
    pub updates: u32,
    /// An update saw the exit flag.
    pub exit: bool,
}

/// The game core: state, configuration, sprites and clock.
pub struct Game {
    pub config: GameConfig,
    pub state: GameState,
    pub sprites: SpriteSet,
    timestep: FixedTimestep,
}

impl Game {
    pub fn new(config: GameConfig, sprites: SpriteSet) -> Self {
        let timestep = FixedTimestep::new(config.frame_period(), config.max_catch_up_updates);
        Self {
            config,
            state: GameState::new(),
            sprites,
            timestep,
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        self.state
            .handle_input(event, &self.sprites, &self.config);
    }

    /// Runs the logic updates paid for by the wall time since the previous call.
    pub fn tick(&mut self, now: Instant) -> FrameOutcome {
        let updates = self.timestep.tick(now);
        self.run_updates(updates)
    }

    /// Runs the logic updates paid for by `elapsed`.
    pub fn advance(&mut self, elapsed: Duration) -> FrameOutcome {
        let updates = self.timestep.advance(elapsed);
        self.run_updates(updates)
    }

    fn run_updates(&mut self, updates: u32) -> FrameOutcome {
        for done in 1..=updates {
            if self.state.update() == UpdateOutcome::Exit {
                return FrameOutcome {
                    updates: done,
                    exit: true,
                };
            }
        }
        FrameOutcome {
            updates,
            exit: false,
        }
    }

    /// Time carried into the next iteration.
    pub fn lag(&self) -> Duration {
        self.timestep.remainder()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteId;
    use crate::assets::tests::test_sprites;

    fn game() -> Game {
        Game::new(GameConfig::default(), test_sprites())
    }

    fn click_at(game: &mut Game, (x, y): (f32, f32)) {
        game.handle_input(InputEvent::CursorMoved { x, y });
        game.handle_input(InputEvent::MouseButtonPressed);
        game.handle_input(InputEvent::MouseButtonReleased);
    }

    fn center_of(game: &Game, sprite: SpriteId) -> (f32, f32) {
        game.sprites.bounds(sprite).center()
    }

    #[test]
    fn test_starts_on_main_menu() {
        let game = game();
        assert_eq!(game.state.current_screen, Screen::MainMenu);
        assert_eq!(game.state.pending_click, ClickTarget::None);
        assert_eq!(game.state.selected_serum, SerumChoice::None);
        assert!(!game.state.exit_requested);
    }

    #[test]
    fn test_play_click_enters_serum_select_once() {
        let mut game = game();
        let play = center_of(&game, SpriteId::PlayButton);

        game.handle_input(InputEvent::CursorMoved { x: play.0, y: play.1 });
        for _ in 0..5 {
            game.handle_input(InputEvent::MouseButtonPressed);
        }
        assert!(game.state.mouse_held);
        assert_eq!(game.state.pending_click, ClickTarget::PlayButton);
        assert_eq!(game.state.current_screen, Screen::MainMenu);

        game.handle_input(InputEvent::MouseButtonReleased);
        assert!(!game.state.mouse_held);
        assert_eq!(game.state.current_screen, Screen::SerumSelect);
        assert!(game.state.wipe.is_active());

        // The wipe is not restarted by clicking the same spot again.
        game.state.update();
        let frame_state = game.state.wipe.clone();
        click_at(&mut game, play);
        assert_eq!(game.state.current_screen, Screen::SerumSelect);
        assert_eq!(game.state.wipe, frame_state);
    }

    #[test]
    fn test_each_serum_click_selects_it() {
        for serum in SerumChoice::ALL {
            let mut game = game();
            game.state.current_screen = Screen::SerumSelect;
            let spot = center_of(&game, serum.sprite().unwrap());

            click_at(&mut game, spot);

            assert_eq!(game.state.selected_serum, serum);
            assert!(game.state.used_serums.contains(&serum));
            assert_eq!(game.state.used_serums.len(), 1, "only {:?} is used", serum);
            assert_eq!(game.state.current_screen, Screen::SerumSelect);
        }
    }

    #[test]
    fn test_select_button_enters_mixing() {
        let mut game = game();
        game.state.current_screen = Screen::SerumSelect;
        let select = center_of(&game, SpriteId::SelectButton);
        click_at(&mut game, select);
        assert_eq!(game.state.current_screen, Screen::MixingSerums);

        // Nothing is clickable on the mixing screen.
        let play = center_of(&game, SpriteId::PlayButton);
        click_at(&mut game, play);
        click_at(&mut game, select);
        assert_eq!(game.state.current_screen, Screen::MixingSerums);
    }

    #[test]
    fn test_serum_icons_are_inactive_on_main_menu() {
        let mut game = game();
        let green = center_of(&game, SpriteId::GreenSerum);
        click_at(&mut game, green);
        assert_eq!(game.state.selected_serum, SerumChoice::None);
        assert!(game.state.used_serums.is_empty());
    }

    #[test]
    fn test_press_checks_regions_of_every_screen() {
        let mut game = game();
        game.state.current_screen = Screen::SerumSelect;
        let play = center_of(&game, SpriteId::PlayButton);
        game.handle_input(InputEvent::CursorMoved { x: play.0, y: play.1 });
        game.handle_input(InputEvent::MouseButtonPressed);
        assert_eq!(game.state.pending_click, ClickTarget::PlayButton);
        game.handle_input(InputEvent::MouseButtonReleased);
        assert_eq!(game.state.current_screen, Screen::SerumSelect);

        let mut game = self::game();
        let green = center_of(&game, SpriteId::GreenSerum);
        game.handle_input(InputEvent::CursorMoved { x: green.0, y: green.1 });
        game.handle_input(InputEvent::MouseButtonPressed);
        assert_eq!(game.state.pending_serum, SerumChoice::Green);
        game.handle_input(InputEvent::MouseButtonReleased);
        assert_eq!(game.state.selected_serum, SerumChoice::None);
    }

    #[test]
    fn test_scoped_press_ignores_other_screens() {
        let config = GameConfig {
            scope_hits_to_screen: true,
            ..GameConfig::default()
        };
        let mut game = Game::new(config, test_sprites());
        game.state.current_screen = Screen::SerumSelect;
        let play = center_of(&game, SpriteId::PlayButton);
        game.handle_input(InputEvent::CursorMoved { x: play.0, y: play.1 });
        game.handle_input(InputEvent::MouseButtonPressed);
        assert_eq!(game.state.pending_click, ClickTarget::None);

        game.state.current_screen = Screen::MainMenu;
        let green = center_of(&game, SpriteId::GreenSerum);
        game.handle_input(InputEvent::CursorMoved { x: green.0, y: green.1 });
        game.handle_input(InputEvent::MouseButtonPressed);
        assert_eq!(game.state.pending_serum, SerumChoice::None);
    }

    #[test]
    fn test_overlapping_serums_resolve_in_check_order() {
        use crate::assets::load_sprites;
        use crate::assets::tests::FixedSizeLoader;
        use std::path::Path;

        let sprites = load_sprites(Path::new("IMAGES"), &mut FixedSizeLoader::new([120, 120]));
        let mut game = Game::new(GameConfig::default(), sprites);
        game.state.current_screen = Screen::SerumSelect;

        // Inside both GreenSerum and BlackBlood.
        let (x, y) = (320.0, 135.0);
        assert!(game.sprites.bounds(SpriteId::GreenSerum).contains(x, y));
        assert!(game.sprites.bounds(SpriteId::BlackBlood).contains(x, y));
        game.handle_input(InputEvent::CursorMoved { x, y });
        game.handle_input(InputEvent::MouseButtonPressed);
        assert_eq!(game.state.pending_serum, SerumChoice::Green);

        // Inside both RedBlood and BlackBlood, outside GreenSerum.
        let (x, y) = (470.0, 135.0);
        assert!(!game.sprites.bounds(SpriteId::GreenSerum).contains(x, y));
        assert!(game.sprites.bounds(SpriteId::RedBlood).contains(x, y));
        assert!(game.sprites.bounds(SpriteId::BlackBlood).contains(x, y));
        game.handle_input(InputEvent::CursorMoved { x, y });
        game.handle_input(InputEvent::MouseButtonPressed);
        assert_eq!(game.state.pending_serum, SerumChoice::RedBlood);

        game.handle_input(InputEvent::MouseButtonReleased);
        assert_eq!(game.state.selected_serum, SerumChoice::RedBlood);
        assert_eq!(game.state.used_serums.len(), 1);
    }

    #[test]
    fn test_press_outside_keeps_recorded_click() {
        let mut game = game();
        let play = center_of(&game, SpriteId::PlayButton);

        game.handle_input(InputEvent::CursorMoved { x: play.0, y: play.1 });
        game.handle_input(InputEvent::MouseButtonPressed);
        game.handle_input(InputEvent::CursorMoved { x: 790.0, y: 590.0 });
        game.handle_input(InputEvent::MouseButtonPressed);
        assert_eq!(game.state.pending_click, ClickTarget::PlayButton);
    }

    #[test]
    fn test_release_resets_pending_click_by_default() {
        let mut game = game();
        game.state.current_screen = Screen::SerumSelect;
        let yellow = center_of(&game, SpriteId::YellowSerum);
        click_at(&mut game, yellow);
        assert_eq!(game.state.pending_serum, SerumChoice::None);
        assert_eq!(game.state.pending_click, ClickTarget::None);

        // A later click on empty space commits nothing new.
        game.state.used_serums.clear();
        click_at(&mut game, (790.0, 590.0));
        assert!(game.state.used_serums.is_empty());
        assert_eq!(game.state.selected_serum, SerumChoice::Yellow);
    }

    #[test]
    fn test_stale_click_is_recommitted_without_reset() {
        let config = GameConfig {
            reset_click_on_release: false,
            ..GameConfig::default()
        };
        let mut game = Game::new(config, test_sprites());
        game.state.current_screen = Screen::SerumSelect;
        let blue = center_of(&game, SpriteId::BlueSerum);
        click_at(&mut game, blue);

        game.state.used_serums.clear();
        click_at(&mut game, (790.0, 590.0));
        assert_eq!(game.state.pending_serum, SerumChoice::Blue);
        assert!(game.state.used_serums.contains(&SerumChoice::Blue));
    }

    #[test]
    fn test_missing_texture_is_not_clickable() {
        use crate::assets::load_sprites;
        use crate::assets::tests::FixedSizeLoader;
        use std::path::Path;

        let mut loader = FixedSizeLoader::new([32, 32]);
        loader.missing.push("AS ButtonOne.png");
        let sprites = load_sprites(Path::new("IMAGES"), &mut loader);
        let mut game = Game::new(GameConfig::default(), sprites);

        click_at(&mut game, (248.0, 328.0));
        assert_eq!(game.state.current_screen, Screen::MainMenu);
    }

    #[test]
    fn test_escape_exits_within_one_update() {
        for screen in [Screen::MainMenu, Screen::SerumSelect, Screen::MixingSerums] {
            let mut game = game();
            game.state.current_screen = screen;
            game.handle_input(InputEvent::KeyPressed(GameKey::Escape));
            assert!(game.state.exit_requested);

            let outcome = game.advance(game.config.frame_period() + Duration::from_nanos(1));
            assert_eq!(
                outcome,
                FrameOutcome {
                    updates: 1,
                    exit: true
                }
            );
        }
    }

    #[test]
    fn test_window_close_sets_flag_without_time_passing() {
        let mut game = game();
        game.handle_input(InputEvent::WindowClosed);
        assert!(game.state.exit_requested);
        assert_eq!(game.lag(), Duration::ZERO);
    }

    #[test]
    fn test_exit_stops_remaining_catch_up_updates() {
        let mut game = game();
        game.handle_input(InputEvent::WindowClosed);
        let outcome = game.advance(Duration::from_millis(250));
        assert_eq!(outcome.updates, 1);
        assert!(outcome.exit);
    }

    #[test]
    fn test_quarter_second_runs_fifteen_updates() {
        let mut game = game();
        let outcome = game.advance(Duration::from_millis(250));
        assert_eq!(
            outcome,
            FrameOutcome {
                updates: 15,
                exit: false
            }
        );
        assert!(game.lag() < Duration::from_micros(1));
    }

    #[test]
    fn test_wipe_advances_only_on_serum_select() {
        let mut game = game();
        game.state.wipe.begin();
        game.advance(Duration::from_millis(100));
        assert_eq!(game.state.wipe.frame(), 0);

        game.state.current_screen = Screen::SerumSelect;
        // 6 updates * 0.3 = 1.8
        game.advance(Duration::from_millis(100));
        assert_eq!(game.state.wipe.frame(), 1);
    }
}
