//! Ring entities (coins and lava enemies)
//!
//! An entity lives at a polar position around the ring center:
//! - angle: where it is along the ring, wrapped to [0, 2π)
//! - distance: radius from the ring center, fixed at spawn
//!
//! Angle π/2 is the top of the ring where the plane flies. Entities rise from
//! angle 0 (the right horizon), pass over the top, and are retired once they
//! go past π. Angles in (π, 2π) are read as "not yet risen" (see
//! [`crate::signed_angle`]).

use glam::Vec2;
use std::f32::consts::PI;

use crate::{ring_to_cartesian, signed_angle, wrap_angle};

/// What kind of ring entity this is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingKind {
    Coin,
    Enemy,
}

/// Deepest pre-roll behind the horizon a spawn may use.
/// Anything past π would alias with the "already passed" half.
pub const MAX_PREROLL: f32 = PI - 0.05;

/// A coin or enemy positioned around the ring
#[derive(Debug, Clone, Default)]
pub struct RingEntity {
    /// Angle along the ring, always in [0, 2π)
    pub angle: f32,
    /// Distance from the ring center
    pub distance: f32,
    /// World-space position derived from angle and distance
    pub pos: Vec2,
    /// Visual spin (y, z) in radians
    pub spin: Vec2,
}

/// Outcome of moving an entity along the ring
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RingStep {
    /// Still on the visible side (or not yet risen)
    Active,
    /// Travelled past π; the entity is now behind the camera
    Passed,
}

impl RingEntity {
    /// Place the entity `preroll` radians behind the horizon at `distance`
    pub fn place(&mut self, preroll: f32, distance: f32, ring_radius: f32) {
        let preroll = preroll.clamp(0.0, MAX_PREROLL);
        self.angle = wrap_angle(-preroll);
        self.distance = distance;
        self.pos = ring_to_cartesian(self.angle, distance, ring_radius);
    }

    /// Advance along the ring by `delta` radians and refresh `pos`.
    ///
    /// Returns [`RingStep::Passed`] when the entity went past π this step.
    /// `pos` is refreshed either way so a collision test can still run
    /// against the final position.
    pub fn advance(&mut self, delta: f32, ring_radius: f32) -> RingStep {
        let unwrapped = signed_angle(self.angle) + delta;
        self.angle = wrap_angle(unwrapped);
        self.pos = ring_to_cartesian(self.angle, self.distance, ring_radius);
        if unwrapped > PI {
            RingStep::Passed
        } else {
            RingStep::Active
        }
    }

    /// Euclidean proximity test against a point
    #[inline]
    pub fn within(&self, point: Vec2, tolerance: f32) -> bool {
        self.pos.distance(point) < tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, TAU};

    #[test]
    fn test_place_behind_horizon() {
        let mut e = RingEntity::default();
        e.place(0.3, 700.0, 600.0);
        assert!((e.angle - (TAU - 0.3)).abs() < 1e-5);
        // Below the horizon line (ring center height)
        assert!(e.pos.y < -600.0);
    }

    #[test]
    fn test_place_clamps_preroll() {
        let mut e = RingEntity::default();
        e.place(10.0, 700.0, 600.0);
        assert!((signed_angle(e.angle) + MAX_PREROLL).abs() < 1e-4);
    }

    #[test]
    fn test_advance_rises_through_zero() {
        let mut e = RingEntity::default();
        e.place(0.1, 700.0, 600.0);
        assert_eq!(e.advance(0.3, 600.0), RingStep::Active);
        assert!((e.angle - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_advance_passes_pi() {
        let mut e = RingEntity::default();
        e.place(0.0, 700.0, 600.0);
        assert_eq!(e.advance(FRAC_PI_2, 600.0), RingStep::Active);
        assert_eq!(e.advance(FRAC_PI_2 + 0.01, 600.0), RingStep::Passed);
        assert!((0.0..TAU).contains(&e.angle));
    }

    #[test]
    fn test_top_of_ring_matches_plane_height() {
        let mut e = RingEntity::default();
        e.place(0.0, 700.0, 600.0);
        e.advance(FRAC_PI_2, 600.0);
        assert!(e.within(Vec2::new(0.0, 100.0), 1.0));
        assert!(!e.within(Vec2::new(0.0, 120.0), 15.0));
    }
}
