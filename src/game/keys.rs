//! Keyboard and mouse input.
//!
//! Window events are reduced to the handful of [`InputEvent`]s the game reacts to, so the
//! dispatcher in [`GameState`](crate::game::GameState) never touches winit types.

use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{self, NamedKey};

/// Keys with a meaning in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    /// Quits the game.
    Escape,
}

/// Input the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    WindowClosed,
    KeyPressed(GameKey),
    CursorMoved { x: f32, y: f32 },
    MouseButtonPressed,
    MouseButtonReleased,
}

/// Maps a logical key to a [`GameKey`].
pub fn winit_key_to_game_key(key: &keyboard::Key) -> Option<GameKey> {
    match key {
        keyboard::Key::Named(NamedKey::Escape) => Some(GameKey::Escape),
        _ => None,
    }
}

/// Classifies a window event. Events the game ignores map to `None`.
///
/// Every mouse button counts as a click. Key repeats are ignored.
pub fn input_from_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::CloseRequested => Some(InputEvent::WindowClosed),
        WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    logical_key,
                    state: ElementState::Pressed,
                    repeat: false,
                    ..
                },
            ..
        } => winit_key_to_game_key(logical_key).map(InputEvent::KeyPressed),
        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::CursorMoved {
            x: position.x as f32,
            y: position.y as f32,
        }),
        WindowEvent::MouseInput { state, .. } => Some(match state {
            ElementState::Pressed => InputEvent::MouseButtonPressed,
            ElementState::Released => InputEvent::MouseButtonReleased,
        }),
        _ => None,
    }
}
