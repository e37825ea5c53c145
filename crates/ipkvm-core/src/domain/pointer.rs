//! Pointer geometry: where on the video element an event happened.
//!
//! Host events report pixel offsets inside the video element.  Absolute mode
//! scales them to the 15-bit protocol range; relative mode scales them into a
//! coarser "resize range" (500 by default) and sends differences between
//! consecutive samples.

use serde::{Deserialize, Serialize};

use crate::protocol::frame::{scale_absolute, scale_into};

/// Default upper bound of a resolved relative-mode coordinate.
pub const DEFAULT_RESIZE_RANGE: u16 = 500;

/// Size of the video element the operator is pointing at, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoBounds {
    pub width: f64,
    pub height: f64,
}

impl Default for VideoBounds {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl VideoBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Scales a pixel offset to absolute protocol coordinates `0..=0x7FFF`.
    pub fn to_absolute(&self, x: f64, y: f64) -> (u16, u16) {
        (scale_absolute(x, self.width), scale_absolute(y, self.height))
    }

    /// Resolves a pixel offset into `0..=range` on both axes.
    pub fn resolve(&self, x: f64, y: f64, range: u16) -> PointerSample {
        PointerSample {
            x: i32::from(scale_into(x, self.width, range)),
            y: i32::from(scale_into(y, self.height, range)),
        }
    }
}

/// A resolved relative-mode position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PointerSample {
    pub x: i32,
    pub y: i32,
}

impl PointerSample {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Movement from `previous` to `self`, each axis clamped to `±limit`.
    pub fn delta_from(self, previous: PointerSample, limit: i32) -> (i32, i32) {
        (
            (self.x - previous.x).clamp(-limit, limit),
            (self.y - previous.y).clamp(-limit, limit),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_scaling_uses_each_axis_extent() {
        let bounds = VideoBounds::new(1000.0, 500.0);
        assert_eq!(bounds.to_absolute(1000.0, 500.0), (0x7FFF, 0x7FFF));
        assert_eq!(bounds.to_absolute(0.0, 0.0), (0, 0));
    }

    #[test]
    fn test_resolve_into_resize_range() {
        let bounds = VideoBounds::new(1000.0, 500.0);
        assert_eq!(
            bounds.resolve(500.0, 500.0, DEFAULT_RESIZE_RANGE),
            PointerSample::new(250, 500)
        );
        assert_eq!(
            bounds.resolve(-20.0, 9999.0, DEFAULT_RESIZE_RANGE),
            PointerSample::new(0, 500)
        );
    }

    #[test]
    fn test_delta_is_clamped_per_axis() {
        let from = PointerSample::new(0, 400);
        let to = PointerSample::new(300, 390);
        assert_eq!(to.delta_from(from, 127), (127, -10));
    }
}
