//! Scene flattening
//!
//! Turns a [`GameState`] into a back-to-front list of 2D sprites in view
//! space, where the visible area spans [-aspect, aspect] × [-1, 1]. Depth is
//! folded into each sprite's size and into a fog tint, so the shader only
//! has to fill shapes.

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::{GameState, ParticlePhase};
use crate::sim::player::HAIR_STRANDS;

/// Sprites the GPU buffer holds
pub const MAX_SPRITES: usize = 384;

/// Fog color and range (depth from the camera)
pub const FOG_COLOR: u32 = 0xf7d9aa;
pub const FOG_NEAR: f32 = 100.0;
pub const FOG_FAR: f32 = 950.0;

/// Sea disc depth: the far face of the lava cylinder
pub const SEA_DEPTH: f32 = -400.0;
pub const SEA_COLOR: u32 = 0xcf1020;

const COIN_COLOR: u32 = 0xffd700;
const COIN_RADIUS: f32 = 5.0;
const ENEMY_COLOR: u32 = 0xcf1020;
const ENEMY_RADIUS: f32 = 8.0;
const PARTICLE_SIZE: f32 = 3.0;
const CLOUD_COLOR: u32 = 0x68c3c0;
const CLOUD_PUFF_RADIUS: f32 = 20.0;

/// Plane model scale relative to its part sizes
const PLANE_SCALE: f32 = 0.25;

const GREEN: u32 = 0x19ff83;
const WHITE: u32 = 0xd8d0d1;
const BLACK: u32 = 0x000000;
const BROWN_DARK: u32 = 0x23190f;
const PILOT_BODY: u32 = 0xfed700;
const PILOT_FACE: u32 = 0xf5986e;
const PILOT_HAIR: u32 = 0xbf41f1;

/// Filled shape of a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SpriteShape {
    /// Ellipse inscribed in the half-size box
    Circle = 0,
    Box = 1,
    /// Upward-pointing triangle inscribed in the half-size box
    Triangle = 2,
}

/// One filled shape in view space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub center: Vec2,
    pub half_size: Vec2,
    pub rotation: f32,
    pub shape: SpriteShape,
    /// 0xRRGGBB, fog already applied
    pub color: u32,
    pub alpha: f32,
}

/// Perspective camera looking down -z at the flight plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    /// Camera position in the flight plane (x, y)
    pub pos: Vec2,
    /// Distance to the flight plane (z = 0)
    pub distance: f32,
    /// Vertical field of view (degrees)
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraView {
    /// Half the visible height of the plane at depth `z`
    pub fn half_height_at(&self, z: f32) -> f32 {
        let depth = (self.distance - z).max(self.near);
        (self.fov.to_radians() * 0.5).tan() * depth
    }

    /// World point at depth `z` to view space, plus the size factor there
    pub fn project(&self, world: Vec2, z: f32) -> (Vec2, f32) {
        let scale = 1.0 / self.half_height_at(z);
        ((world - self.pos) * scale, scale)
    }

    /// Depth of `z` as seen from the camera
    pub fn depth_of(&self, z: f32) -> f32 {
        self.distance - z
    }
}

/// Everything the renderer draws for one frame
#[derive(Debug, Clone)]
pub struct Scene {
    pub camera: CameraView,
    /// Back to front
    pub sprites: Vec<Sprite>,
    pub sea_center: Vec2,
    pub sea_radius: f32,
    pub sea_rotation: f32,
    pub sea_color: u32,
    /// Light multiplier (rests at 1)
    pub light: f32,
}

/// Blend `color` toward the fog color by depth
pub fn fog(color: u32, depth: f32) -> u32 {
    let t = ((depth - FOG_NEAR) / (FOG_FAR - FOG_NEAR)).clamp(0.0, 1.0);
    mix_rgb(color, FOG_COLOR, t)
}

fn mix_rgb(a: u32, b: u32, t: f32) -> u32 {
    let channel = |shift: u32| {
        let ca = ((a >> shift) & 0xff) as f32;
        let cb = ((b >> shift) & 0xff) as f32;
        ((ca + (cb - ca) * t).round() as u32).min(255) << shift
    };
    channel(16) | channel(8) | channel(0)
}

/// Accumulates sprites for a frame
struct SceneBuilder<'a> {
    camera: &'a CameraView,
    sprites: Vec<Sprite>,
}

impl SceneBuilder<'_> {
    fn push(
        &mut self,
        world: Vec2,
        z: f32,
        half_size: Vec2,
        rotation: f32,
        shape: SpriteShape,
        color: u32,
    ) {
        let (center, scale) = self.camera.project(world, z);
        self.sprites.push(Sprite {
            center,
            half_size: half_size * scale,
            rotation,
            shape,
            color: fog(color, self.camera.depth_of(z)),
            alpha: 1.0,
        });
    }
}

impl Scene {
    pub fn build(state: &GameState, settings: &Settings) -> Self {
        let tuning = &state.tuning;
        let camera = CameraView {
            pos: Vec2::new(0.0, state.camera.y),
            distance: state.camera.distance,
            fov: state.camera.fov,
            aspect: state.camera.aspect,
            near: state.camera.near,
            far: state.camera.far,
        };
        let mut b = SceneBuilder {
            camera: &camera,
            sprites: Vec::with_capacity(MAX_SPRITES),
        };

        // Clouds, farthest first
        let mut clouds: Vec<_> = state.sky.clouds.iter().collect();
        clouds.sort_by(|a, c| a.depth.total_cmp(&c.depth));
        let puff_limit = if settings.quality.full_clouds() { usize::MAX } else { 2 };
        for cloud in clouds {
            let anchor = state.sky.cloud_position(cloud, tuning.ring_radius);
            let tilt = cloud.tilt(state.sky.rotation);
            let (sin, cos) = tilt.sin_cos();
            for puff in cloud.puffs.iter().take(puff_limit) {
                let local = puff.offset * cloud.scale;
                let offset = Vec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos);
                let r = CLOUD_PUFF_RADIUS * puff.scale * cloud.scale;
                b.push(
                    anchor + offset,
                    cloud.depth,
                    Vec2::splat(r),
                    puff.rotation.y,
                    SpriteShape::Circle,
                    CLOUD_COLOR,
                );
            }
        }

        // Sea rim bumps, same depth as the disc
        for wave in &state.sea.waves {
            let pos = state.sea.wave_position(wave, tuning.ring_radius);
            b.push(
                pos,
                SEA_DEPTH,
                Vec2::splat(wave.amp),
                0.0,
                SpriteShape::Circle,
                SEA_COLOR,
            );
        }

        for coin in &state.coins.active {
            let width = (COIN_RADIUS * coin.spin.x.cos().abs()).max(COIN_RADIUS * 0.15);
            b.push(
                coin.pos,
                0.0,
                Vec2::new(width, COIN_RADIUS),
                0.0,
                SpriteShape::Circle,
                COIN_COLOR,
            );
        }

        for enemy in &state.enemies.active {
            b.push(
                enemy.pos,
                0.0,
                Vec2::splat(ENEMY_RADIUS),
                enemy.spin.y,
                SpriteShape::Circle,
                ENEMY_COLOR,
            );
        }

        let mut drawn = 0;
        for particle in &state.particles.active {
            if drawn >= settings.max_particles() {
                break;
            }
            if !particle.attached || particle.phase != ParticlePhase::Animating {
                continue;
            }
            b.push(
                particle.pos,
                0.0,
                Vec2::splat(PARTICLE_SIZE * particle.scale),
                particle.rotation.x,
                SpriteShape::Triangle,
                particle.color,
            );
            drawn += 1;
        }

        push_plane(&mut b, state);

        let mut sprites = b.sprites;
        if sprites.len() > MAX_SPRITES {
            // Drop the farthest first
            let excess = sprites.len() - MAX_SPRITES;
            sprites.drain(..excess);
        }

        let (sea_center, sea_scale) = camera.project(Vec2::new(0.0, -tuning.ring_radius), SEA_DEPTH);
        let ambient = if settings.effective_flash() {
            state.ambient.intensity
        } else {
            state.ambient.intensity.min(tuning.ambient_rest)
        };

        Self {
            camera,
            sprites,
            sea_center,
            sea_radius: tuning.ring_radius * sea_scale,
            sea_rotation: state.sea.rotation,
            sea_color: fog(SEA_COLOR, camera.depth_of(SEA_DEPTH)),
            light: 0.75 + ambient * 0.5,
        }
    }
}

/// Boxes making up the plane and pilot, in model units
fn push_plane(b: &mut SceneBuilder<'_>, state: &GameState) {
    let plane = &state.plane;
    let (sin, cos) = plane.rot_z.sin_cos();
    // Wing and wheel depth foreshortening from the roll about x
    let squash = plane.rot_x.cos().abs().max(0.2);

    let mut part = |offset: Vec2, half: Vec2, color: u32| {
        let local = offset * PLANE_SCALE;
        let rotated = Vec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos);
        b.push(
            plane.pos + rotated,
            0.0,
            half * PLANE_SCALE,
            plane.rot_z,
            SpriteShape::Box,
            color,
        );
    };

    // Wheels and suspension
    part(Vec2::new(25.0, -28.0), Vec2::new(12.0, 12.0), WHITE);
    part(Vec2::new(25.0, -20.0), Vec2::new(15.0, 7.5), GREEN);
    part(Vec2::new(-35.0, -5.0), Vec2::new(2.0, 10.0), GREEN);
    part(Vec2::new(-35.0, -5.0), Vec2::new(6.0, 6.0), WHITE);

    // Body
    part(Vec2::new(-40.0, 20.0), Vec2::new(7.5, 10.0), GREEN);
    part(Vec2::ZERO, Vec2::new(40.0, 25.0), GREEN);
    part(Vec2::new(40.0, 0.0), Vec2::new(10.0, 25.0), WHITE);
    part(Vec2::new(0.0, 15.0), Vec2::new(15.0, 2.5 * squash), BLACK);
    part(Vec2::new(5.0, 27.0), Vec2::new(1.5, 7.5), WHITE);

    // Propeller: the blade is seen edge-on as it turns
    part(Vec2::new(60.0, 0.0), Vec2::new(10.0, 5.0), BLACK);
    let blade = (40.0 * plane.propeller.cos().abs()).max(2.0);
    part(Vec2::new(68.0, 0.0), Vec2::new(1.0, blade), BROWN_DARK);

    // Pilot
    part(Vec2::new(-8.0, 15.0), Vec2::new(7.5, 7.5), PILOT_BODY);
    part(Vec2::new(-10.0, 27.0), Vec2::new(5.0, 5.0), PILOT_FACE);
    for i in 0..HAIR_STRANDS {
        let row = (i / 3) as f32;
        let height = 2.0 * plane.hair_scale(i);
        part(
            Vec2::new(-19.0 + row * 4.0, 32.0 + height),
            Vec2::new(2.0, height),
            PILOT_HAIR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, tick};

    fn camera() -> CameraView {
        CameraView {
            pos: Vec2::new(0.0, 100.0),
            distance: 200.0,
            fov: 50.0,
            aspect: 1.5,
            near: 0.1,
            far: 10000.0,
        }
    }

    #[test]
    fn test_projection_center_and_edge() {
        let cam = camera();
        let (center, _) = cam.project(Vec2::new(0.0, 100.0), 0.0);
        assert_eq!(center, Vec2::ZERO);

        let top = Vec2::new(0.0, 100.0 + cam.half_height_at(0.0));
        let (edge, _) = cam.project(top, 0.0);
        assert!((edge.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_farther_is_smaller() {
        let cam = camera();
        let (_, near) = cam.project(Vec2::ZERO, 0.0);
        let (_, far) = cam.project(Vec2::ZERO, -500.0);
        assert!(far < near);
    }

    #[test]
    fn test_fog_blend() {
        assert_eq!(fog(0x000000, 0.0), 0x000000);
        assert_eq!(fog(0x000000, 5000.0), FOG_COLOR);
        let mid = fog(0x000000, (FOG_NEAR + FOG_FAR) / 2.0);
        assert!(mid != 0 && mid != FOG_COLOR);
    }

    #[test]
    fn test_scene_from_fresh_state() {
        let state = GameState::new(1);
        let scene = Scene::build(&state, &Settings::default());
        assert!(!scene.sprites.is_empty());
        assert!(scene.sprites.len() <= MAX_SPRITES);
        // Sea disc sits below the camera
        assert!(scene.sea_center.y < 0.0);
        assert!((scene.light - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_particles_respect_settings() {
        let mut state = GameState::new(2);
        state
            .particles
            .spawn_burst(Vec2::new(0.0, 100.0), 15, 0xcf1020, 3.0, &mut state.rng);
        tick(&mut state, &TickInput::default(), 16.0);

        let with = Scene::build(&state, &Settings::default()).sprites.len();
        let without = Scene::build(
            &state,
            &Settings {
                particles: false,
                ..Default::default()
            },
        )
        .sprites
        .len();
        assert_eq!(with - without, 15);
    }

    #[test]
    fn test_reduced_motion_suppresses_flash() {
        let mut state = GameState::new(3);
        state.ambient.flash(&state.tuning);
        let flashing = Scene::build(&state, &Settings::default());
        let calm = Scene::build(
            &state,
            &Settings {
                reduced_motion: true,
                ..Default::default()
            },
        );
        assert!(flashing.light > calm.light);
        assert!((calm.light - 1.0).abs() < 1e-6);
    }
}
