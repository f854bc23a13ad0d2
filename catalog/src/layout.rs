//! Uniform map-data to screen-space transform.

use pinpin_core::{Bounds, Point, ScreenSize};

/// Share of the screen height the map occupies when fitted.
const DEFAULT_FILL: f32 = 0.85;

/// Maps map-data coordinates onto the screen with one scale and one offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapLayout {
    scale: f32,
    data_anchor: Point,
    screen_anchor: Point,
}

impl MapLayout {
    /// Creates a layout that places `data_anchor` at `screen_anchor`.
    ///
    /// Non-positive or non-finite scales fall back to `1.0`.
    #[must_use]
    pub fn anchored(scale: f32, data_anchor: Point, screen_anchor: Point) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self {
            scale,
            data_anchor,
            screen_anchor,
        }
    }

    /// Identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self::anchored(1.0, Point::default(), Point::default())
    }

    /// Centers `content` on screen, scaled so it spans `fill` of the screen height.
    #[must_use]
    pub fn fit_to_height(content: Bounds, screen: ScreenSize, fill: f32) -> Self {
        let height = content.height();
        let scale = if height > 0.0 {
            screen.height() * fill / height
        } else {
            1.0
        };
        Self::anchored(scale, content.midpoint(), screen.center())
    }

    /// [`MapLayout::fit_to_height`] with the default 85% fill.
    #[must_use]
    pub fn fit_default(content: Bounds, screen: ScreenSize) -> Self {
        Self::fit_to_height(content, screen, DEFAULT_FILL)
    }

    /// Map scale factor applied to every length.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Converts a map-data point to screen space.
    #[must_use]
    pub fn to_screen(&self, point: Point) -> Point {
        let (dx, dy) = point.delta_from(self.data_anchor);
        self.screen_anchor.offset(dx * self.scale, dy * self.scale)
    }
}

impl Default for MapLayout {
    fn default() -> Self {
        Self::identity()
    }
}
