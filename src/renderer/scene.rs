//! Per-screen draw lists.
//!
//! [`screen_layers`] fixes the back-to-front order of sprites for each screen. [`build_scene`]
//! turns it into draw commands for the current state: used serums are blacked out and the wipe
//! frame is appended when the wipe is both running and enabled.

use crate::assets::{SpriteId, SpriteQuad, SpriteSet, TINT_BLACK, Tint};
use crate::game::GameState;
use crate::game::screen::{Screen, SerumChoice};
use crate::math::Rect;
use std::path::Path;

/// One sprite to draw, with optional overrides of its manifest tint and source rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub sprite: SpriteId,
    pub tint: Option<Tint>,
    pub source: Option<Rect>,
}

impl DrawCommand {
    fn plain(sprite: SpriteId) -> Self {
        Self {
            sprite,
            tint: None,
            source: None,
        }
    }
}

/// Everything drawn in one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    /// Sprites in back-to-front order.
    pub commands: Vec<DrawCommand>,
    pub show_title: bool,
}

impl Scene {
    /// Resolves the commands against the loaded sprites, skipping sprites without a texture.
    pub fn quads<'a>(
        &'a self,
        sprites: &'a SpriteSet,
    ) -> impl Iterator<Item = (&'a Path, SpriteQuad)> + 'a {
        self.commands.iter().filter_map(move |command| {
            let drawable = sprites.get(command.sprite)?;
            let quad = drawable.quad(command.source, command.tint)?;
            Some((drawable.texture.as_path(), quad))
        })
    }
}

/// Sprites of a screen, back to front.
pub fn screen_layers(screen: Screen) -> &'static [SpriteId] {
    match screen {
        Screen::MainMenu => &[SpriteId::PlayButton],
        Screen::SerumSelect => &[
            SpriteId::LabBackground,
            SpriteId::BlackBlood,
            SpriteId::BlueBlood,
            SpriteId::RedBlood,
            SpriteId::BlueSerum,
            SpriteId::DarkBlueSerum,
            SpriteId::GreenSerum,
            SpriteId::YellowSerum,
            SpriteId::LabShade,
            SpriteId::Frame,
            SpriteId::SelectButton,
        ],
        Screen::MixingSerums => &[SpriteId::Vial, SpriteId::Frame],
        Screen::CutHand | Screen::ShakeVial | Screen::UseSyringe => &[],
    }
}

pub fn build_scene(state: &GameState, draw_wipe: bool) -> Scene {
    let screen = state.current_screen;
    let mut commands: Vec<DrawCommand> = screen_layers(screen)
        .iter()
        .map(|&sprite| {
            let mut command = DrawCommand::plain(sprite);
            if SerumChoice::from_sprite(sprite).is_some_and(|s| state.used_serums.contains(&s)) {
                command.tint = Some(TINT_BLACK);
            }
            command
        })
        .collect();

    if draw_wipe && screen == Screen::SerumSelect && state.wipe.is_active() {
        commands.push(DrawCommand {
            sprite: SpriteId::FadeBlack,
            tint: None,
            source: Some(state.wipe.source_rect()),
        });
    }

    Scene {
        commands,
        show_title: screen == Screen::MainMenu,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::test_sprites;

    fn sprites_of(scene: &Scene) -> Vec<SpriteId> {
        scene.commands.iter().map(|c| c.sprite).collect()
    }

    #[test]
    fn test_main_menu_shows_title_and_play() {
        let scene = build_scene(&GameState::new(), true);
        assert!(scene.show_title);
        assert_eq!(sprites_of(&scene), vec![SpriteId::PlayButton]);
    }

    #[test]
    fn test_serum_select_order() {
        let mut state = GameState::new();
        state.current_screen = Screen::SerumSelect;
        let scene = build_scene(&state, false);
        assert!(!scene.show_title);
        assert_eq!(scene.commands.first().unwrap().sprite, SpriteId::LabBackground);
        assert_eq!(scene.commands.last().unwrap().sprite, SpriteId::SelectButton);
        assert_eq!(scene.commands.len(), 11);
    }

    #[test]
    fn test_mixing_and_unused_screens() {
        let mut state = GameState::new();
        state.current_screen = Screen::MixingSerums;
        assert_eq!(
            sprites_of(&build_scene(&state, true)),
            vec![SpriteId::Vial, SpriteId::Frame]
        );
        state.current_screen = Screen::ShakeVial;
        assert!(build_scene(&state, true).commands.is_empty());
    }

    #[test]
    fn test_used_serum_is_blacked_out() {
        let mut state = GameState::new();
        state.current_screen = Screen::SerumSelect;
        state.used_serums.insert(SerumChoice::RedBlood);
        let scene = build_scene(&state, false);

        for command in &scene.commands {
            if command.sprite == SpriteId::RedBlood {
                assert_eq!(command.tint, Some(TINT_BLACK));
            } else {
                assert_eq!(command.tint, None, "{:?}", command.sprite);
            }
        }
    }

    #[test]
    fn test_wipe_drawn_only_when_enabled_and_running() {
        let mut state = GameState::new();
        state.current_screen = Screen::SerumSelect;
        state.wipe.begin();
        for _ in 0..7 {
            state.wipe.tick();
        }

        let disabled = build_scene(&state, false);
        assert!(!sprites_of(&disabled).contains(&SpriteId::FadeBlack));

        let enabled = build_scene(&state, true);
        let last = enabled.commands.last().unwrap();
        assert_eq!(last.sprite, SpriteId::FadeBlack);
        assert_eq!(last.source, Some(Rect::new(288.0, 0.0, 144.0, 144.0)));

        for _ in 0..40 {
            state.wipe.tick();
        }
        assert!(!sprites_of(&build_scene(&state, true)).contains(&SpriteId::FadeBlack));
    }

    #[test]
    fn test_quads_follow_draw_order() {
        let mut state = GameState::new();
        state.current_screen = Screen::MixingSerums;
        let sprites = test_sprites();
        let scene = build_scene(&state, false);
        let quads: Vec<_> = scene.quads(&sprites).collect();

        assert_eq!(quads.len(), 2);
        assert!(quads[0].0.ends_with("AS Beaker.png"));
        assert_eq!(quads[0].1.dest, Rect::new(350.0, 120.0, 160.0, 160.0));
        assert!(quads[1].0.ends_with("AS Frame.png"));
    }
}
