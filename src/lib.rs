//! Volador - A low-poly flight game around a ring-shaped lava world
//!
//! Core modules:
//! - `sim`: Simulation (ring entities, pools, particles, player, game clock)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction (viewport, pointer, frame clock)
//! - `tuning`: Data-driven game balance
//! - `hud`: HUD values derived from the game state

pub mod hud;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use hud::HudView;
pub use settings::{QualityPreset, Settings};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Game configuration constants
pub mod consts {
    /// Largest frame delta fed to the simulation (milliseconds).
    /// A stalled tab would otherwise jump the plane and skip spawn thresholds.
    pub const MAX_FRAME_MS: f32 = 100.0;
    /// Delta used for the very first frame (no previous timestamp yet)
    pub const FIRST_FRAME_MS: f32 = 1000.0 / 60.0;

    /// Seed used by the native headless run
    pub const DEFAULT_SEED: u64 = 0x766f_6c61_646f_72;

    /// Camera defaults
    pub const CAMERA_Z: f32 = 200.0;
    pub const CAMERA_FOV: f32 = 50.0;
    pub const CAMERA_NEAR: f32 = 0.1;
    pub const CAMERA_FAR: f32 = 10000.0;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Signed view of a wrapped ring angle, in (-π, π]
///
/// Angles past π are read as "behind the horizon", i.e. not yet risen.
#[inline]
pub fn signed_angle(angle: f32) -> f32 {
    if angle > PI { angle - TAU } else { angle }
}

/// Convert a ring position (angle, distance from ring center) to world space.
///
/// The ring center sits `ring_radius` below the world origin, so an entity at
/// angle π/2 and distance `ring_radius + h` is at height `h`.
#[inline]
pub fn ring_to_cartesian(angle: f32, distance: f32, ring_radius: f32) -> Vec2 {
    Vec2::new(angle.cos() * distance, -ring_radius + angle.sin() * distance)
}

/// Clamp `v` to [vmin, vmax] and map it linearly onto [tmin, tmax]
#[inline]
pub fn remap(v: f32, vmin: f32, vmax: f32, tmin: f32, tmax: f32) -> f32 {
    let nv = v.clamp(vmin, vmax);
    let pc = (nv - vmin) / (vmax - vmin);
    tmin + pc * (tmax - tmin)
}
