//! Player controller
//!
//! The pointer picks a target position and forward speed; the plane glides
//! toward that target with exponential smoothing. Tilt is read off the gap
//! between where the plane is and where it wants to be. Enemy hits add a
//! knockback that decays back to zero.

use glam::Vec2;

use crate::consts::{CAMERA_FAR, CAMERA_FOV, CAMERA_NEAR, CAMERA_Z};
use crate::remap;
use crate::tuning::Tuning;

/// Hair strands on the pilot's head
pub const HAIR_STRANDS: usize = 12;

/// Normalized pointer position, x and y in [-1, 1] (y up)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

impl PointerState {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: x.clamp(-1.0, 1.0),
            y: y.clamp(-1.0, 1.0),
        }
    }
}

/// Plane kinematics
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub pos: Vec2,
    /// Pitch (radians)
    pub rot_x: f32,
    /// Roll (radians)
    pub rot_z: f32,
    /// Forward speed multiplier picked by the pointer
    pub speed: f32,
    /// Knockback offset added to the target position
    pub knockback_displacement: Vec2,
    /// Knockback velocity feeding the displacement each tick
    pub knockback_velocity: Vec2,
    /// Propeller angle (radians, grows unbounded)
    pub propeller: f32,
    /// Pilot hair wave phase
    pub hair_phase: f32,
    /// Vertical speed while falling after game over
    pub fall_speed: f32,
}

impl Plane {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(0.0, tuning.plane_default_height),
            rot_x: 0.0,
            rot_z: 0.0,
            speed: 0.0,
            knockback_displacement: Vec2::ZERO,
            knockback_velocity: Vec2::ZERO,
            propeller: 0.0,
            hair_phase: 0.0,
            fall_speed: tuning.plane_fall_speed,
        }
    }

    /// Push the plane away along `dir` (unit vector)
    pub fn knock(&mut self, dir: Vec2, impulse: f32) {
        self.knockback_velocity = dir * impulse;
    }

    /// Clear knockback and fall state; position and tilt are kept
    pub fn reset_dynamics(&mut self, tuning: &Tuning) {
        self.speed = 0.0;
        self.knockback_displacement = Vec2::ZERO;
        self.knockback_velocity = Vec2::ZERO;
        self.fall_speed = tuning.plane_fall_speed;
    }

    /// Spin the propeller; runs in every phase
    pub fn spin_propeller(&mut self, dt: f32) {
        self.propeller += 0.2 + self.speed * dt * 0.005;
    }

    /// Advance the hair wave by the current game speed
    pub fn wave_hair(&mut self, game_speed: f32, dt: f32) {
        self.hair_phase += game_speed * dt * 40.0;
    }

    /// Vertical scale of hair strand `i`, between 0.75 and 1
    pub fn hair_scale(&self, i: usize) -> f32 {
        0.75 + (self.hair_phase + i as f32 / 3.0).cos() * 0.25
    }
}

/// Camera that trails the plane
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    /// Height of the camera
    pub y: f32,
    /// Distance from the flight plane along z
    pub distance: f32,
    /// Vertical field of view (degrees)
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraRig {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            y: tuning.plane_default_height,
            distance: CAMERA_Z,
            fov: CAMERA_FOV,
            aspect: 1.0,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }
}

/// Fraction of the remaining gap to close this tick, capped at the full gap
#[inline]
fn smoothing(dt: f32, rate: f32) -> f32 {
    (dt * rate).min(1.0)
}

/// Target position and forward speed for a pointer position
pub fn pointer_target(pointer: PointerState, tuning: &Tuning) -> (Vec2, f32) {
    let speed = remap(pointer.x, -0.5, 0.5, tuning.plane_min_speed, tuning.plane_max_speed);
    let target = Vec2::new(
        remap(
            pointer.x,
            -1.0,
            1.0,
            -tuning.plane_amp_width * 0.7,
            -tuning.plane_amp_width,
        ),
        remap(
            pointer.y,
            -0.75,
            0.75,
            tuning.plane_default_height - tuning.plane_amp_height,
            tuning.plane_default_height + tuning.plane_amp_height,
        ),
    );
    (target, speed)
}

/// One tick of the player controller
pub fn update_plane(
    plane: &mut Plane,
    camera: &mut CameraRig,
    pointer: PointerState,
    tuning: &Tuning,
    dt: f32,
) {
    let (mut target, speed) = pointer_target(pointer, tuning);
    plane.speed = speed;

    plane.knockback_displacement += plane.knockback_velocity;
    target += plane.knockback_displacement;

    let follow = smoothing(dt, tuning.plane_move_sensitivity);
    plane.pos += (target - plane.pos) * follow;

    plane.rot_x = (plane.pos.y - target.y) * dt * tuning.plane_rot_x_sensitivity;
    plane.rot_z = (target.y - plane.pos.y) * dt * tuning.plane_rot_z_sensitivity;

    let target_distance = remap(
        plane.speed,
        tuning.plane_min_speed,
        tuning.plane_max_speed,
        tuning.camera_near_pos,
        tuning.camera_far_pos,
    );
    camera.fov = remap(
        plane.speed,
        tuning.plane_min_speed,
        tuning.plane_max_speed,
        tuning.camera_min_fov,
        tuning.camera_max_fov,
    );
    let chase = smoothing(dt, tuning.camera_sensitivity);
    camera.distance += (target_distance - camera.distance) * chase;
    camera.y += (plane.pos.y - camera.y) * chase;

    plane.knockback_velocity -= plane.knockback_velocity * smoothing(dt, tuning.knockback_velocity_decay);
    plane.knockback_displacement -=
        plane.knockback_displacement * smoothing(dt, tuning.knockback_displacement_decay);
}
