//! Decorative world: lava sea, cloud ring, ambient light
//!
//! Nothing here affects gameplay. It still runs off the game RNG so a seeded
//! run looks the same every time.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::tuning::Tuning;
use crate::wrap_angle;

/// Wave points around the sea rim
pub const SEA_WAVES: usize = 40;
const WAVE_MIN_AMP: f32 = 5.0;
const WAVE_MAX_AMP: f32 = 20.0;
const WAVE_MIN_SPEED: f32 = 0.001;
const WAVE_MAX_SPEED: f32 = 0.003;

/// Clouds around the sky ring
pub const SKY_CLOUDS: usize = 20;
const CLOUD_MIN_PUFFS: usize = 5;
const CLOUD_MAX_PUFFS: usize = 7;

/// One bobbing point on the sea rim
#[derive(Debug, Clone, PartialEq)]
pub struct Wave {
    /// Rest angle around the ring, in the sea's own frame
    pub base_angle: f32,
    /// Phase of the bob
    pub phase: f32,
    pub amp: f32,
    /// Phase step per tick
    pub speed: f32,
}

impl Wave {
    /// Current offset from the rest point
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.phase.cos(), self.phase.sin()) * self.amp
    }
}

/// The lava sea: a ring-sized disc that turns with the game speed
#[derive(Debug, Clone)]
pub struct Sea {
    /// Rotation about the ring center, wrapped to [0, 2π)
    pub rotation: f32,
    pub waves: Vec<Wave>,
}

impl Sea {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let step = TAU / SEA_WAVES as f32;
        let waves = (0..SEA_WAVES)
            .map(|i| Wave {
                base_angle: step * i as f32,
                phase: rng.random::<f32>() * TAU,
                amp: rng.random_range(WAVE_MIN_AMP..WAVE_MAX_AMP),
                speed: rng.random_range(WAVE_MIN_SPEED..WAVE_MAX_SPEED),
            })
            .collect();
        Self {
            rotation: 0.0,
            waves,
        }
    }

    pub fn update(&mut self, game_speed: f32, dt: f32) {
        self.rotation = wrap_angle(self.rotation + game_speed * dt);
        for wave in &mut self.waves {
            wave.phase += wave.speed;
        }
    }

    /// World position of a wave point on a sea of radius `ring_radius`
    pub fn wave_position(&self, wave: &Wave, ring_radius: f32) -> Vec2 {
        let angle = wave.base_angle + self.rotation;
        Vec2::new(angle.cos(), angle.sin()) * ring_radius + Vec2::new(0.0, -ring_radius)
            + wave.offset()
    }
}

/// One sphere of a cloud
#[derive(Debug, Clone, PartialEq)]
pub struct Puff {
    /// Offset inside the cloud, before the cloud's own scale
    pub offset: Vec2,
    pub scale: f32,
    /// Tumble about y and z
    pub rotation: Vec2,
}

/// A cloud parked at a fixed spot on the sky ring
#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    /// Angle around the ring center, in the sky's own frame
    pub angle: f32,
    /// Distance from the ring center
    pub height: f32,
    /// Depth behind the flight plane (negative)
    pub depth: f32,
    pub scale: f32,
    pub puffs: Vec<Puff>,
}

impl Cloud {
    fn new<R: Rng + ?Sized>(angle: f32, ring_radius: f32, rng: &mut R) -> Self {
        let count = rng.random_range(CLOUD_MIN_PUFFS..=CLOUD_MAX_PUFFS);
        let puffs = (0..count)
            .map(|i| Puff {
                offset: Vec2::new(i as f32 * 10.0, rng.random::<f32>() * 5.0),
                scale: 0.5 + rng.random::<f32>() * 0.5,
                rotation: Vec2::new(rng.random::<f32>() * TAU, rng.random::<f32>() * TAU),
            })
            .collect();
        Self {
            angle,
            height: ring_radius + 150.0 + rng.random::<f32>() * 200.0,
            depth: -300.0 - rng.random::<f32>() * 500.0,
            scale: 1.0 + rng.random::<f32>() * 2.0,
            puffs,
        }
    }

    fn tumble<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for (i, puff) in self.puffs.iter_mut().enumerate() {
            let k = (i + 1) as f32;
            puff.rotation.x += rng.random::<f32>() * 0.002 * k;
            puff.rotation.y += rng.random::<f32>() * 0.005 * k;
        }
    }

    /// Roll of the cloud so its base faces the ring center
    pub fn tilt(&self, sky_rotation: f32) -> f32 {
        self.angle + sky_rotation + FRAC_PI_2
    }
}

/// Ring of clouds turning with the game speed
#[derive(Debug, Clone)]
pub struct Sky {
    pub rotation: f32,
    pub clouds: Vec<Cloud>,
}

impl Sky {
    pub fn new<R: Rng + ?Sized>(ring_radius: f32, rng: &mut R) -> Self {
        let step = TAU / SKY_CLOUDS as f32;
        let clouds = (0..SKY_CLOUDS)
            .map(|i| Cloud::new(step * i as f32, ring_radius, rng))
            .collect();
        Self {
            rotation: 0.0,
            clouds,
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, game_speed: f32, dt: f32, rng: &mut R) {
        for cloud in &mut self.clouds {
            cloud.tumble(rng);
        }
        self.rotation = wrap_angle(self.rotation + game_speed * dt);
    }

    /// World position of a cloud's anchor
    pub fn cloud_position(&self, cloud: &Cloud, ring_radius: f32) -> Vec2 {
        let angle = cloud.angle + self.rotation;
        Vec2::new(angle.cos(), angle.sin()) * cloud.height + Vec2::new(0.0, -ring_radius)
    }
}

/// Scene-wide light level that flashes on enemy hits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub intensity: f32,
}

impl AmbientLight {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            intensity: tuning.ambient_rest,
        }
    }

    /// Ease back toward the resting level
    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        let k = (dt * tuning.ambient_rate).min(1.0);
        self.intensity += (tuning.ambient_rest - self.intensity) * k;
    }

    pub fn flash(&mut self, tuning: &Tuning) {
        self.intensity = tuning.ambient_flash;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_sea_rotation_wraps() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut sea = Sea::new(&mut rng);
        assert_eq!(sea.waves.len(), SEA_WAVES);
        for _ in 0..1000 {
            sea.update(0.01, 16.0);
            assert!((0.0..TAU).contains(&sea.rotation));
        }
    }

    #[test]
    fn test_waves_stay_near_rim() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut sea = Sea::new(&mut rng);
        sea.update(0.001, 16.0);
        let center = Vec2::new(0.0, -600.0);
        for wave in &sea.waves {
            let r = sea.wave_position(wave, 600.0).distance(center);
            assert!((r - 600.0).abs() <= WAVE_MAX_AMP + 1e-3);
        }
    }

    #[test]
    fn test_sky_layout() {
        let mut rng = Pcg32::seed_from_u64(3);
        let sky = Sky::new(600.0, &mut rng);
        assert_eq!(sky.clouds.len(), SKY_CLOUDS);
        for cloud in &sky.clouds {
            assert!(cloud.height >= 750.0 && cloud.height <= 950.0);
            assert!(cloud.depth <= -300.0 && cloud.depth >= -800.0);
            assert!(cloud.scale >= 1.0 && cloud.scale <= 3.0);
            assert!((CLOUD_MIN_PUFFS..=CLOUD_MAX_PUFFS).contains(&cloud.puffs.len()));
        }
        // Evenly spaced
        let step = sky.clouds[1].angle - sky.clouds[0].angle;
        assert!((step - TAU / SKY_CLOUDS as f32).abs() < 1e-6);
    }

    #[test]
    fn test_ambient_flash_decays_to_rest() {
        let tuning = Tuning::default();
        let mut light = AmbientLight::new(&tuning);
        light.flash(&tuning);
        assert_eq!(light.intensity, 2.0);
        light.update(16.0, &tuning);
        assert!(light.intensity < 2.0 && light.intensity > 0.5);
        for _ in 0..2000 {
            light.update(16.0, &tuning);
        }
        assert!((light.intensity - 0.5).abs() < 1e-3);
    }
}
