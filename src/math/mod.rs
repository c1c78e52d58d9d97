//! Screen-space geometry.
//!
//! All coordinates are window pixels with the origin in the top-left corner and `y` growing
//! downwards, matching the cursor positions reported by the window.

/// Axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Half-open containment test: the left and top edges are inside, the right and bottom
    /// edges are not. An empty rectangle contains nothing.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        !self.is_empty() && x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert!(rect.contains(10.0, 20.0));
        assert!(rect.contains(39.9, 59.9));
        assert!(!rect.contains(40.0, 30.0));
        assert!(!rect.contains(20.0, 60.0));
        assert!(!rect.contains(9.9, 30.0));
    }

    #[test]
    fn test_empty_rect_contains_nothing() {
        let rect = Rect::new(5.0, 5.0, 0.0, 10.0);
        assert!(rect.is_empty());
        assert!(!rect.contains(5.0, 5.0));
        assert!(!Rect::default().contains(0.0, 0.0));
    }

    #[test]
    fn test_center() {
        assert_eq!(Rect::new(0.0, 0.0, 10.0, 4.0).center(), (5.0, 2.0));
    }
}
