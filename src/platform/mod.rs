//! Platform abstraction layer
//!
//! Browser-independent pieces of the host:
//! - Viewport size and pointer normalisation
//! - Frame clock (timestamp to clamped delta)

use crate::consts::{FIRST_FRAME_MS, MAX_FRAME_MS};
use crate::sim::PointerState;

/// Drawable area in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        *self = Self::new(width, height);
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Map a client-space position to [-1, 1]², y up
    pub fn pointer(&self, client_x: f32, client_y: f32) -> PointerState {
        let x = -1.0 + (client_x / self.width) * 2.0;
        let y = 1.0 - (client_y / self.height) * 2.0;
        PointerState::new(x, y)
    }
}

/// Turns frame timestamps into simulation deltas
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta in milliseconds since the previous call, clamped to
    /// [0, MAX_FRAME_MS]. The first call returns FIRST_FRAME_MS.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last {
            Some(last) => (now_ms - last) as f32,
            None => FIRST_FRAME_MS,
        };
        self.last = Some(now_ms);
        dt.clamp(0.0, MAX_FRAME_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_normalisation() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.pointer(400.0, 300.0), PointerState::new(0.0, 0.0));
        assert_eq!(vp.pointer(0.0, 0.0), PointerState::new(-1.0, 1.0));
        assert_eq!(vp.pointer(800.0, 600.0), PointerState::new(1.0, -1.0));
        // Outside the window clamps
        assert_eq!(vp.pointer(-50.0, 900.0), PointerState::new(-1.0, -1.0));
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.resize(1000.0, 500.0);
        assert_eq!(vp.aspect(), 2.0);
        vp.resize(0.0, 0.0);
        assert!(vp.aspect().is_finite());
    }

    #[test]
    fn test_frame_clock() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(1000.0), FIRST_FRAME_MS);
        assert_eq!(clock.delta(1016.0), 16.0);
        // Stalled tab
        assert_eq!(clock.delta(9000.0), MAX_FRAME_MS);
        // Clock going backwards
        assert_eq!(clock.delta(8000.0), 0.0);
    }
}
