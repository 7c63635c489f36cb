//! Coin and enemy spawners
//!
//! Each spawner owns a pool of retired entities and the ordered list of
//! entities currently on the ring. Entities move from pool to active list on
//! spawn and back on collision or once they pass behind the camera.

use glam::Vec2;
use rand::Rng;

use super::pool::Pool;
use super::ring::{RingEntity, RingKind, RingStep};
use crate::tuning::Tuning;

/// Coin spin about Y per tick (radians)
const COIN_SPIN: f32 = 0.5;
/// Max enemy tumble about Y and Z per tick (radians)
const ENEMY_TUMBLE: f32 = 0.1;
/// Phase step of the coin formation's wave
const COIN_WAVE_STEP: f32 = 0.5;

/// An entity touched the player this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingHit {
    pub kind: RingKind,
    /// Entity position at the moment of contact
    pub pos: Vec2,
    /// Unit vector from the entity toward the player
    pub toward_player: Vec2,
}

/// Pool + active list for one kind of ring entity
#[derive(Debug, Clone)]
pub struct Spawner {
    pub kind: RingKind,
    pub pool: Pool<RingEntity>,
    pub active: Vec<RingEntity>,
}

impl Spawner {
    pub fn new(kind: RingKind, prewarm: usize) -> Self {
        Self {
            kind,
            pool: Pool::with_prewarm(RingEntity::default, prewarm),
            active: Vec::new(),
        }
    }

    pub fn coins(tuning: &Tuning) -> Self {
        Self::new(RingKind::Coin, tuning.coins_prewarm)
    }

    pub fn enemies(tuning: &Tuning) -> Self {
        Self::new(RingKind::Enemy, tuning.enemies_prewarm)
    }

    /// Angular speed multiplier for this kind
    pub fn speed_scalar(&self, tuning: &Tuning) -> f32 {
        match self.kind {
            RingKind::Coin => tuning.coins_speed,
            RingKind::Enemy => tuning.enemies_speed,
        }
    }

    /// Contact distance for this kind
    pub fn tolerance(&self, tuning: &Tuning) -> f32 {
        match self.kind {
            RingKind::Coin => tuning.coin_distance_tolerance,
            RingKind::Enemy => tuning.enemy_distance_tolerance,
        }
    }

    /// Spawn a formation behind the horizon. Returns how many were spawned.
    ///
    /// Enemies: one per level, each at its own height in the spawn band.
    /// Coins: 1..=max coins strung along a wave around a shared height.
    pub fn spawn<R: Rng + ?Sized>(&mut self, tuning: &Tuning, level: u32, rng: &mut R) -> usize {
        let before = self.pool.constructed();
        let count = match self.kind {
            RingKind::Enemy => {
                for i in 0..level {
                    let distance = band_distance(tuning, rng);
                    self.push_entity(i as f32 * tuning.enemy_angle_step, distance, tuning);
                }
                level as usize
            }
            RingKind::Coin => {
                let n = rng.random_range(1..=tuning.coins_per_spawn_max);
                let base = band_distance(tuning, rng);
                let amplitude = 10.0 + (rng.random::<f32>() * 10.0).round();
                for i in 0..n {
                    let distance = base + (i as f32 * COIN_WAVE_STEP).cos() * amplitude;
                    self.push_entity(i as f32 * tuning.coin_angle_step, distance, tuning);
                }
                n as usize
            }
        };

        let grown = self.pool.constructed() - before;
        if grown > 0 {
            log::debug!(
                "{:?} pool grew by {} (total {})",
                self.kind,
                grown,
                self.pool.constructed()
            );
        }
        count
    }

    fn push_entity(&mut self, preroll: f32, distance: f32, tuning: &Tuning) {
        let mut entity = self.pool.acquire();
        entity.place(preroll, distance, tuning.ring_radius);
        self.active.push(entity);
    }

    /// Move every active entity along the ring and resolve contacts.
    ///
    /// Entities are processed in active-list order. An entity within the
    /// contact tolerance of `player` is recycled and reported as a hit; one
    /// that passed π is recycled silently. Removal keeps the order of the
    /// remaining entities and never skips the one that slides into the
    /// vacated slot.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        game_speed: f32,
        dt: f32,
        player: Vec2,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Vec<RingHit> {
        let delta = game_speed * dt * self.speed_scalar(tuning);
        let tolerance = self.tolerance(tuning);
        let mut hits = Vec::new();

        let mut i = 0;
        while i < self.active.len() {
            let entity = &mut self.active[i];
            let step = entity.advance(delta, tuning.ring_radius);

            match self.kind {
                RingKind::Coin => entity.spin.x += COIN_SPIN,
                RingKind::Enemy => {
                    entity.spin.x += rng.random::<f32>() * ENEMY_TUMBLE;
                    entity.spin.y += rng.random::<f32>() * ENEMY_TUMBLE;
                }
            }

            if entity.within(player, tolerance) {
                hits.push(RingHit {
                    kind: self.kind,
                    pos: entity.pos,
                    toward_player: (player - entity.pos).normalize_or_zero(),
                });
                self.recycle(i);
            } else if step == RingStep::Passed {
                self.recycle(i);
            } else {
                i += 1;
            }
        }

        hits
    }

    fn recycle(&mut self, index: usize) {
        let entity = self.active.remove(index);
        self.pool.release(entity);
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// Random distance from the ring center inside the spawn band
fn band_distance<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> f32 {
    tuning.ring_radius
        + tuning.plane_default_height
        + rng.random_range(-1.0f32..1.0) * tuning.spawn_band()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring_to_cartesian;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_enemy_spawn_count_matches_level() {
        let tuning = Tuning::default();
        let mut rng = rng();
        let mut enemies = Spawner::enemies(&tuning);
        assert_eq!(enemies.spawn(&tuning, 3, &mut rng), 3);
        assert_eq!(enemies.len(), 3);
        assert_eq!(enemies.pool.len(), tuning.enemies_prewarm - 3);

        // Offsets march backwards from the horizon without overlapping
        let signed: Vec<f32> = enemies
            .active
            .iter()
            .map(|e| crate::signed_angle(e.angle))
            .collect();
        assert!(signed[0].abs() < 1e-6);
        assert!(signed[1] < signed[0] && signed[2] < signed[1]);

        let low = tuning.ring_radius + tuning.plane_default_height - tuning.spawn_band();
        let high = tuning.ring_radius + tuning.plane_default_height + tuning.spawn_band();
        for e in &enemies.active {
            assert!(e.distance >= low && e.distance <= high);
        }
    }

    #[test]
    fn test_coin_spawn_count_in_range() {
        let tuning = Tuning::default();
        let mut rng = rng();
        let mut coins = Spawner::coins(&tuning);
        for _ in 0..20 {
            let before = coins.len();
            let n = coins.spawn(&tuning, 1, &mut rng);
            assert!((1..=10).contains(&n));
            assert_eq!(coins.len(), before + n);
        }
    }

    #[test]
    fn test_passed_entities_are_recycled_without_hit() {
        let tuning = Tuning::default();
        let mut rng = rng();
        let mut coins = Spawner::coins(&tuning);
        coins.spawn(&tuning, 1, &mut rng);
        let spawned = coins.len();
        let pooled = coins.pool.len();

        // Player far away; push everything past π in one go
        let player = Vec2::new(10_000.0, 10_000.0);
        let delta = PI + 0.5;
        let speed = delta / (100.0 * tuning.coins_speed);
        let hits = coins.advance(speed, 100.0, player, &tuning, &mut rng);
        assert!(hits.is_empty());
        assert!(coins.is_empty());
        assert_eq!(coins.pool.len(), pooled + spawned);
    }

    #[test]
    fn test_angles_stay_wrapped() {
        let tuning = Tuning::default();
        let mut rng = rng();
        let mut enemies = Spawner::enemies(&tuning);
        enemies.spawn(&tuning, 5, &mut rng);
        let player = Vec2::new(10_000.0, 10_000.0);
        for _ in 0..50 {
            enemies.advance(0.0005, 16.0, player, &tuning, &mut rng);
            for e in &enemies.active {
                assert!((0.0..TAU).contains(&e.angle));
            }
        }
    }

    #[test]
    fn test_collision_reports_hit_once_and_recycles() {
        let tuning = Tuning::default();
        let mut rng = rng();
        let mut enemies = Spawner::enemies(&tuning);
        enemies.spawn(&tuning, 1, &mut rng);
        let distance = enemies.active[0].distance;

        // Player sits where the enemy will be after a quarter turn, a bit above
        let player = ring_to_cartesian(FRAC_PI_2, distance, tuning.ring_radius) + Vec2::new(0.0, 5.0);
        let speed = FRAC_PI_2 / (16.0 * tuning.enemies_speed);
        let hits = enemies.advance(speed, 16.0, player, &tuning, &mut rng);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].kind, RingKind::Enemy);
        assert!((hits[0].toward_player - Vec2::Y).length() < 1e-3);
        assert!(enemies.is_empty());

        // Nothing left to hit
        let hits = enemies.advance(0.0, 16.0, player, &tuning, &mut rng);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_no_hit_at_or_beyond_tolerance() {
        let tuning = Tuning::default();
        let mut rng = rng();
        let mut coins = Spawner::coins(&tuning);
        coins.spawn(&tuning, 1, &mut rng);
        coins.active.truncate(1);
        let e = &coins.active[0];
        let player = e.pos + Vec2::new(0.0, tuning.coin_distance_tolerance + 0.01);
        let hits = coins.advance(0.0, 16.0, player, &tuning, &mut rng);
        assert!(hits.is_empty());
        assert_eq!(coins.len(), 1);
    }

    #[test]
    fn test_removal_does_not_skip_neighbours() {
        let tuning = Tuning::default();
        let mut rng = rng();
        let mut coins = Spawner::new(RingKind::Coin, 0);
        // Three coins stacked on the same spot: all three must be collected
        for _ in 0..3 {
            let mut e = coins.pool.acquire();
            e.place(0.0, 700.0, tuning.ring_radius);
            coins.active.push(e);
        }
        let player = coins.active[0].pos;
        let hits = coins.advance(0.0, 16.0, player, &tuning, &mut rng);
        assert_eq!(hits.len(), 3);
        assert!(coins.is_empty());
        assert_eq!(coins.pool.len(), 3);
    }
}
