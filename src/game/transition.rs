//! Wipe-to-black screen transition.
//!
//! A sub-frame counter advances by a fixed increment per logic update; its integer part picks
//! a column of the wipe sprite sheet. When the counter reaches the frame count both wrap to
//! zero and the wipe ends.

use crate::assets::WIPE_FRAME_SIZE;
use crate::math::Rect;

/// Number of columns in the wipe sprite sheet.
pub const WIPE_FRAME_COUNT: u32 = 13;
/// Counter advance per logic update.
pub const WIPE_FRAME_INCREMENT: f32 = 0.3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WipeTransition {
    frame: u32,
    counter: f32,
    active: bool,
}

impl WipeTransition {
    /// Restarts the wipe from its first frame.
    pub fn begin(&mut self) {
        self.frame = 0;
        self.counter = 0.0;
        self.active = true;
    }

    pub fn tick(&mut self) {
        if !self.active {
            return;
        }
        self.counter += WIPE_FRAME_INCREMENT;
        let frame = self.counter as u32;
        if frame >= WIPE_FRAME_COUNT {
            self.frame = 0;
            self.counter = 0.0;
            self.active = false;
        } else {
            self.frame = frame;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Sprite-sheet rectangle of the current frame.
    pub fn source_rect(&self) -> Rect {
        Rect::new(
            self.frame as f32 * WIPE_FRAME_SIZE,
            0.0,
            WIPE_FRAME_SIZE,
            WIPE_FRAME_SIZE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_wipe_does_not_advance() {
        let mut wipe = WipeTransition::default();
        wipe.tick();
        assert_eq!(wipe.frame(), 0);
        assert!(!wipe.is_active());
    }

    #[test]
    fn test_frame_follows_counter() {
        let mut wipe = WipeTransition::default();
        wipe.begin();
        for _ in 0..4 {
            wipe.tick();
        }
        // 4 * 0.3 = 1.2
        assert_eq!(wipe.frame(), 1);
        assert_eq!(wipe.source_rect(), Rect::new(144.0, 0.0, 144.0, 144.0));
    }

    #[test]
    fn test_wraps_after_forty_four_ticks() {
        let mut wipe = WipeTransition::default();
        wipe.begin();
        for _ in 0..43 {
            wipe.tick();
        }
        assert_eq!(wipe.frame(), 12);
        assert!(wipe.is_active());

        wipe.tick();
        assert_eq!(wipe.frame(), 0);
        assert!(!wipe.is_active());
        assert_eq!(wipe.source_rect().x, 0.0);
    }

    #[test]
    fn test_begin_restarts() {
        let mut wipe = WipeTransition::default();
        wipe.begin();
        for _ in 0..10 {
            wipe.tick();
        }
        wipe.begin();
        assert_eq!(wipe.frame(), 0);
        assert!(wipe.is_active());
    }
}
