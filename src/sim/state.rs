//! Game state and core simulation types
//!
//! Everything one run needs lives in [`GameState`]: counters, the plane,
//! spawners, particles, the decorative world and the RNG that feeds them.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ambient::{AmbientLight, Sea, Sky};
use super::particles::ParticlesHolder;
use super::player::{CameraRig, Plane};
use super::spawner::Spawner;
use crate::tuning::{Tuning, TuningError};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active flight
    #[default]
    Playing,
    /// Out of energy, plane is going down
    GameOver,
    /// Plane is gone, waiting for a click/tap to restart
    WaitingReplay,
}

/// Fires once each time distance crosses a new multiple of `spacing`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceTrigger {
    pub spacing: u32,
    /// Multiple of `spacing` this trigger last fired at
    pub last: u64,
}

impl DistanceTrigger {
    pub fn new(spacing: u32) -> Self {
        Self { spacing, last: 0 }
    }

    /// Returns true the first time `distance` reaches a multiple it has not fired at.
    ///
    /// A large jump that skips several multiples fires once, for the highest.
    pub fn check(&mut self, distance: f32) -> bool {
        let spacing = u64::from(self.spacing.max(1));
        let floored = distance.max(0.0).floor() as u64;
        let mark = floored / spacing * spacing;
        if mark > self.last {
            self.last = mark;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.last = 0;
    }
}

/// The four distance-driven triggers of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triggers {
    pub coins: DistanceTrigger,
    pub speed: DistanceTrigger,
    pub enemies: DistanceTrigger,
    pub level: DistanceTrigger,
}

impl Triggers {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            coins: DistanceTrigger::new(tuning.distance_for_coins_spawn),
            speed: DistanceTrigger::new(tuning.distance_for_speed_update),
            enemies: DistanceTrigger::new(tuning.distance_for_enemies_spawn),
            level: DistanceTrigger::new(tuning.distance_for_level_update),
        }
    }

    pub fn reset(&mut self) {
        self.coins.reset();
        self.speed.reset();
        self.enemies.reset();
        self.level.reset();
    }
}

/// Things that happened during a tick, for the host to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    CoinCollected { pos: Vec2 },
    EnemyHit { pos: Vec2 },
    LevelUp { level: u32 },
    GameOver { distance: f32, level: u32 },
    /// Plane fell out of view; show the restart prompt
    ShowReplay,
    /// Counters were reset; hide the restart prompt
    Restarted,
}

/// Complete state of a run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,

    /// Ring speed this tick (base speed times plane speed)
    pub speed: f32,
    pub base_speed: f32,
    pub target_base_speed: f32,
    pub distance: f32,
    /// Always within [0, max_energy]
    pub energy: f32,
    pub level: u32,
    pub triggers: Triggers,

    pub plane: Plane,
    pub camera: CameraRig,
    pub coins: Spawner,
    pub enemies: Spawner,
    pub particles: ParticlesHolder,

    pub sea: Sea,
    pub sky: Sky,
    pub ambient: AmbientLight,

    /// Events recorded since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new run with the stock balance
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// Create a new run with a custom balance
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let sea = Sea::new(&mut rng);
        let sky = Sky::new(tuning.ring_radius, &mut rng);

        Self {
            seed,
            rng,
            phase: GamePhase::Playing,
            time_ticks: 0,
            speed: 0.0,
            base_speed: tuning.init_speed,
            target_base_speed: tuning.init_speed,
            distance: 0.0,
            energy: tuning.max_energy,
            level: 1,
            triggers: Triggers::new(&tuning),
            plane: Plane::new(&tuning),
            camera: CameraRig::new(&tuning),
            coins: Spawner::coins(&tuning),
            enemies: Spawner::enemies(&tuning),
            particles: ParticlesHolder::new(tuning.particles_prewarm),
            sea,
            sky,
            ambient: AmbientLight::new(&tuning),
            events: Vec::new(),
            tuning,
        }
    }

    /// Start a new run in place.
    ///
    /// Counters, triggers and plane dynamics go back to their initial
    /// values. The plane keeps its position and glides back to its target;
    /// entities and particles already in flight finish on their own.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Playing;
        self.speed = 0.0;
        self.base_speed = self.tuning.init_speed;
        self.target_base_speed = self.tuning.init_speed;
        self.distance = 0.0;
        self.energy = self.tuning.max_energy;
        self.level = 1;
        self.triggers.reset();
        self.plane.reset_dynamics(&self.tuning);
        self.events.push(GameEvent::Restarted);
        log::info!("Run restarted");
    }

    pub fn add_energy(&mut self, amount: f32) {
        self.energy = (self.energy + amount).min(self.tuning.max_energy);
    }

    pub fn remove_energy(&mut self, amount: f32) {
        self.energy = (self.energy - amount).max(0.0);
    }

    /// Progress toward the next level-up, in [0, 1)
    pub fn level_progress(&self) -> f32 {
        let spacing = self.tuning.distance_for_level_update.max(1) as f32;
        self.distance.rem_euclid(spacing) / spacing
    }

    /// Take the events recorded so far
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.energy, 100.0);
        assert_eq!(state.level, 1);
        assert_eq!(state.distance, 0.0);
        assert_eq!(state.coins.pool.len(), 50);
        assert_eq!(state.enemies.pool.len(), 10);
        assert_eq!(state.particles.pool.len(), 10);
        assert!(state.coins.is_empty());
    }

    #[test]
    fn test_with_tuning_validates() {
        let bad = Tuning {
            ring_radius: -1.0,
            ..Default::default()
        };
        assert!(GameState::with_tuning(1, bad).is_err());
        assert!(GameState::with_tuning(1, Tuning::default()).is_ok());
    }

    #[test]
    fn test_trigger_fires_once_per_multiple() {
        let mut t = DistanceTrigger::new(100);
        assert!(!t.check(0.0));
        assert!(!t.check(99.9));
        assert!(t.check(100.0));
        assert!(!t.check(100.4));
        assert!(!t.check(150.0));
        assert!(t.check(205.0));
        assert_eq!(t.last, 200);
    }

    #[test]
    fn test_trigger_large_jump_fires_once() {
        let mut t = DistanceTrigger::new(50);
        assert!(t.check(260.0));
        assert_eq!(t.last, 250);
        assert!(!t.check(260.0));
        t.reset();
        assert!(t.check(260.0));
    }

    #[test]
    fn test_energy_clamps() {
        let mut state = GameState::new(1);
        state.add_energy(50.0);
        assert_eq!(state.energy, 100.0);
        state.energy = 5.0;
        state.remove_energy(10.0);
        assert_eq!(state.energy, 0.0);
    }

    #[test]
    fn test_reset_restores_counters() {
        let mut state = GameState::new(1);
        state.distance = 1234.0;
        state.energy = 0.0;
        state.level = 3;
        state.phase = GamePhase::WaitingReplay;
        state.triggers.level.check(1234.0);
        state.plane.fall_speed = 3.0;
        let pos = state.plane.pos;

        state.reset();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.distance, 0.0);
        assert_eq!(state.energy, 100.0);
        assert_eq!(state.level, 1);
        assert_eq!(state.triggers.level.last, 0);
        assert_eq!(state.plane.fall_speed, state.tuning.plane_fall_speed);
        assert_eq!(state.plane.pos, pos);
        assert_eq!(state.drain_events(), vec![GameEvent::Restarted]);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_level_progress() {
        let mut state = GameState::new(1);
        state.distance = 1250.0;
        assert!((state.level_progress() - 0.25).abs() < 1e-6);
    }
}
