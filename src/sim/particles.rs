//! Particle bursts
//!
//! A burst leases particles from a pool, flings each one toward a random
//! offset while it shrinks and tumbles, then returns it to the pool once its
//! transition finishes. Each particle is a tiny state machine polled once per
//! tick:
//!
//! `Idle` (pooled) -> `Animating` (in a holder) -> `PendingRecycle` -> `Idle`

use glam::Vec2;
use rand::Rng;

use super::pool::Pool;
use super::tween::{Ease, Tween, lerp};

/// Max offset of a particle's destination from the burst origin, per axis
pub const BURST_SPREAD: f32 = 50.0;
/// Transition duration range (ms)
pub const BURST_MIN_DURATION: f32 = 600.0;
pub const BURST_MAX_DURATION: f32 = 800.0;
/// Max start delay (ms) for the staggered look
pub const BURST_MAX_DELAY: f32 = 100.0;
/// Final scale of a particle, relative to unit size
pub const BURST_END_SCALE: f32 = 0.1;
/// Upper bound of the random end rotation (radians)
pub const BURST_MAX_ROTATION: f32 = 12.0;

/// Lifecycle of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticlePhase {
    #[default]
    Idle,
    Animating,
    PendingRecycle,
}

/// A single burst fragment
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub color: u32,
    pub scale: f32,
    /// Rotation about x and y
    pub rotation: Vec2,
    pub phase: ParticlePhase,
    /// Whether the particle is part of the drawn scene
    pub attached: bool,
    from_pos: Vec2,
    to_pos: Vec2,
    from_scale: f32,
    from_rotation: Vec2,
    to_rotation: Vec2,
    tween: Tween,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            color: 0x72daa6,
            scale: 1.0,
            rotation: Vec2::ZERO,
            phase: ParticlePhase::Idle,
            attached: false,
            from_pos: Vec2::ZERO,
            to_pos: Vec2::ZERO,
            from_scale: 1.0,
            from_rotation: Vec2::ZERO,
            to_rotation: Vec2::ZERO,
            tween: Tween::default(),
        }
    }
}

impl Particle {
    /// Start the outward transition from `pos`
    pub fn explode<R: Rng + ?Sized>(&mut self, pos: Vec2, color: u32, scale: f32, rng: &mut R) {
        self.pos = pos;
        self.color = color;
        self.scale = scale;
        self.attached = true;

        self.from_pos = pos;
        self.to_pos = pos
            + Vec2::new(
                rng.random_range(-1.0f32..1.0) * BURST_SPREAD,
                rng.random_range(-1.0f32..1.0) * BURST_SPREAD,
            );
        self.from_scale = scale;
        self.from_rotation = self.rotation;
        self.to_rotation = Vec2::new(
            rng.random::<f32>() * BURST_MAX_ROTATION,
            rng.random::<f32>() * BURST_MAX_ROTATION,
        );

        let duration = rng.random_range(BURST_MIN_DURATION..BURST_MAX_DURATION);
        let delay = rng.random::<f32>() * BURST_MAX_DELAY;
        self.tween = Tween::new(duration, delay);
        self.phase = ParticlePhase::Animating;
    }

    /// Advance the transition. Returns true when it just finished.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.phase != ParticlePhase::Animating {
            return false;
        }
        self.tween.advance(dt);

        // Position waits for the delay; scale and spin start right away
        let move_t = Ease::CubicOut.apply(self.tween.progress());
        let shrink_t = Ease::QuadOut.apply(self.tween.progress_undelayed());
        self.pos = self.from_pos.lerp(self.to_pos, move_t);
        self.scale = lerp(self.from_scale, BURST_END_SCALE, shrink_t);
        self.rotation = self.from_rotation.lerp(self.to_rotation, shrink_t);

        if self.tween.is_finished() {
            self.phase = ParticlePhase::PendingRecycle;
            true
        } else {
            false
        }
    }

    /// Remove from the scene; a no-op when already detached
    pub fn detach(&mut self) {
        self.attached = false;
    }

    /// Back to the pooled state
    pub fn reset(&mut self) {
        self.detach();
        self.scale = 1.0;
        self.tween = Tween::default();
        self.phase = ParticlePhase::Idle;
    }

    /// Destination of the current transition
    pub fn target(&self) -> Vec2 {
        self.to_pos
    }
}

/// Owns the particles currently in flight and their pool
#[derive(Debug, Clone)]
pub struct ParticlesHolder {
    pub pool: Pool<Particle>,
    pub active: Vec<Particle>,
}

impl ParticlesHolder {
    pub fn new(prewarm: usize) -> Self {
        Self {
            pool: Pool::with_prewarm(Particle::default, prewarm),
            active: Vec::new(),
        }
    }

    /// Lease `count` particles and explode them from `pos`
    pub fn spawn_burst<R: Rng + ?Sized>(
        &mut self,
        pos: Vec2,
        count: u32,
        color: u32,
        scale: f32,
        rng: &mut R,
    ) {
        let before = self.pool.constructed();
        for _ in 0..count {
            let mut particle = self.pool.acquire();
            particle.explode(pos, color, scale, rng);
            self.active.push(particle);
        }
        let grown = self.pool.constructed() - before;
        if grown > 0 {
            log::debug!(
                "Particle pool grew by {} (total {})",
                grown,
                self.pool.constructed()
            );
        }
    }

    /// Advance every particle; finished ones go back to the pool.
    /// Returns how many were recycled.
    pub fn update(&mut self, dt: f32) -> usize {
        for particle in &mut self.active {
            particle.update(dt);
        }

        let mut recycled = 0;
        let mut i = 0;
        while i < self.active.len() {
            if self.active[i].phase == ParticlePhase::PendingRecycle {
                let mut particle = self.active.remove(i);
                particle.reset();
                self.pool.release(particle);
                recycled += 1;
            } else {
                i += 1;
            }
        }
        recycled
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
