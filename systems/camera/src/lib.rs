#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Camera that keeps the player centred in the viewport.

use glam::Vec2;
use prowl_core::{Position, Viewport};

/// Scroll offset source for a fixed-size viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Camera {
    viewport: Viewport,
}

impl Camera {
    /// Creates a camera for the provided viewport.
    #[must_use]
    pub const fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    /// Viewport the camera frames.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// World-space position drawn at the viewport's upper-left corner.
    ///
    /// The offset is not clamped to the map, so the area beyond the grid edge
    /// scrolls into view near the borders.
    #[must_use]
    pub fn offset(&self, player: Position) -> Vec2 {
        Vec2::new(player.x(), player.y())
            - Vec2::new(self.viewport.width, self.viewport.height) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_centres_player() {
        let camera = Camera::new(Viewport::new(640.0, 480.0));

        assert_eq!(
            camera.offset(Position::new(400.0, 300.0)),
            Vec2::new(80.0, 60.0)
        );
    }

    #[test]
    fn offset_goes_negative_near_origin() {
        let camera = Camera::default();

        assert_eq!(
            camera.offset(Position::new(0.0, 0.0)),
            Vec2::new(-320.0, -240.0)
        );
    }
}
