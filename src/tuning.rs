//! Data-driven game balance
//!
//! Every rate, threshold and tolerance the simulation uses. Rates are
//! calibrated to a frame delta in milliseconds. `Tuning::default()` is the
//! stock balance; a JSON document can override any subset of fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tunable game constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Speed ===
    /// Base speed at the start of a run (radians of ring per ms)
    pub init_speed: f32,
    /// Added to the target base speed at every speed-ramp threshold (scaled by dt)
    pub increment_speed_by_time: f32,
    /// Target base speed gained per level
    pub increment_speed_by_level: f32,
    /// Rate at which base speed chases its target
    pub base_speed_smoothing: f32,

    // === Distance / energy ===
    pub ratio_speed_distance: f32,
    pub ratio_speed_energy: f32,
    pub max_energy: f32,

    // === Distance triggers ===
    pub distance_for_coins_spawn: u32,
    pub distance_for_speed_update: u32,
    pub distance_for_enemies_spawn: u32,
    pub distance_for_level_update: u32,

    // === Plane ===
    pub plane_default_height: f32,
    pub plane_amp_height: f32,
    pub plane_amp_width: f32,
    pub plane_move_sensitivity: f32,
    pub plane_rot_x_sensitivity: f32,
    pub plane_rot_z_sensitivity: f32,
    pub plane_fall_speed: f32,
    pub plane_min_speed: f32,
    pub plane_max_speed: f32,

    // === Knockback ===
    pub knockback_impulse: f32,
    pub knockback_velocity_decay: f32,
    pub knockback_displacement_decay: f32,

    // === World ===
    pub ring_radius: f32,
    /// Clearance kept between spawn band edges and the plane envelope
    pub spawn_band_margin: f32,

    // === Camera ===
    pub camera_near_pos: f32,
    pub camera_far_pos: f32,
    pub camera_sensitivity: f32,
    pub camera_min_fov: f32,
    pub camera_max_fov: f32,

    // === Coins ===
    pub coin_distance_tolerance: f32,
    pub coin_value: f32,
    pub coins_speed: f32,
    pub coin_angle_step: f32,
    pub coins_per_spawn_max: u32,

    // === Enemies ===
    pub enemy_distance_tolerance: f32,
    pub enemy_value: f32,
    pub enemies_speed: f32,
    pub enemy_angle_step: f32,

    // === Ambient light ===
    pub ambient_rest: f32,
    pub ambient_flash: f32,
    pub ambient_rate: f32,

    // === Game over ===
    pub game_over_speed_decay: f32,
    pub game_over_dive_rate: f32,
    pub game_over_pitch_rate: f32,
    pub game_over_fall_acceleration: f32,
    pub replay_threshold_y: f32,

    // === Particle bursts ===
    pub coin_burst_count: u32,
    pub coin_burst_color: u32,
    pub coin_burst_scale: f32,
    pub enemy_burst_count: u32,
    pub enemy_burst_color: u32,
    pub enemy_burst_scale: f32,

    // === Pools ===
    pub coins_prewarm: usize,
    pub enemies_prewarm: usize,
    pub particles_prewarm: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            init_speed: 0.00035,
            increment_speed_by_time: 0.0000025,
            increment_speed_by_level: 0.000005,
            base_speed_smoothing: 0.02,

            ratio_speed_distance: 50.0,
            ratio_speed_energy: 3.0,
            max_energy: 100.0,

            distance_for_coins_spawn: 100,
            distance_for_speed_update: 100,
            distance_for_enemies_spawn: 50,
            distance_for_level_update: 1000,

            plane_default_height: 100.0,
            plane_amp_height: 80.0,
            plane_amp_width: 75.0,
            plane_move_sensitivity: 0.005,
            plane_rot_x_sensitivity: 0.0004,
            plane_rot_z_sensitivity: 0.0008,
            plane_fall_speed: 0.001,
            plane_min_speed: 1.2,
            plane_max_speed: 1.6,

            knockback_impulse: 100.0,
            knockback_velocity_decay: 0.03,
            knockback_displacement_decay: 0.01,

            ring_radius: 600.0,
            spawn_band_margin: 20.0,

            camera_near_pos: 150.0,
            camera_far_pos: 500.0,
            camera_sensitivity: 0.002,
            camera_min_fov: 40.0,
            camera_max_fov: 80.0,

            coin_distance_tolerance: 15.0,
            coin_value: 3.0,
            coins_speed: 0.5,
            coin_angle_step: 0.02,
            coins_per_spawn_max: 10,

            enemy_distance_tolerance: 10.0,
            enemy_value: 10.0,
            enemies_speed: 0.6,
            enemy_angle_step: 0.1,

            ambient_rest: 0.5,
            ambient_flash: 2.0,
            ambient_rate: 0.005,

            game_over_speed_decay: 0.99,
            game_over_dive_rate: 0.0002,
            game_over_pitch_rate: 0.0003,
            game_over_fall_acceleration: 1.05,
            replay_threshold_y: -200.0,

            coin_burst_count: 5,
            coin_burst_color: 0xffd700,
            coin_burst_scale: 0.8,
            enemy_burst_count: 15,
            enemy_burst_color: 0xcf1020,
            enemy_burst_scale: 3.0,

            coins_prewarm: 50,
            enemies_prewarm: 10,
            particles_prewarm: 10,
        }
    }
}

/// A tuning value outside the range the simulation can work with
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// Value must be strictly positive
    NotPositive { field: &'static str, value: f32 },
    /// Lower bound of a range is not below its upper bound
    InvertedRange { field: &'static str, min: f32, max: f32 },
    /// A distance trigger spacing of zero would fire every tick
    ZeroSpacing { field: &'static str },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::NotPositive { field, value } => {
                write!(f, "{field} must be positive (got {value})")
            }
            TuningError::InvertedRange { field, min, max } => {
                write!(f, "{field} range is inverted ({min} >= {max})")
            }
            TuningError::ZeroSpacing { field } => write!(f, "{field} must be non-zero"),
        }
    }
}

impl std::error::Error for TuningError {}

impl Tuning {
    /// Parse a JSON override; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check the values the simulation divides by or compares against
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("init_speed", self.init_speed),
            ("max_energy", self.max_energy),
            ("ring_radius", self.ring_radius),
            ("coin_distance_tolerance", self.coin_distance_tolerance),
            ("enemy_distance_tolerance", self.enemy_distance_tolerance),
            ("coins_speed", self.coins_speed),
            ("enemies_speed", self.enemies_speed),
            ("plane_move_sensitivity", self.plane_move_sensitivity),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        let ranges = [
            ("plane_speed", self.plane_min_speed, self.plane_max_speed),
            ("camera_pos", self.camera_near_pos, self.camera_far_pos),
            ("camera_fov", self.camera_min_fov, self.camera_max_fov),
        ];
        for (field, min, max) in ranges {
            if min >= max {
                return Err(TuningError::InvertedRange { field, min, max });
            }
        }

        let spacings = [
            ("distance_for_coins_spawn", self.distance_for_coins_spawn),
            ("distance_for_speed_update", self.distance_for_speed_update),
            ("distance_for_enemies_spawn", self.distance_for_enemies_spawn),
            ("distance_for_level_update", self.distance_for_level_update),
        ];
        for (field, spacing) in spacings {
            if spacing == 0 {
                return Err(TuningError::ZeroSpacing { field });
            }
        }

        if self.coins_per_spawn_max == 0 {
            return Err(TuningError::ZeroSpacing { field: "coins_per_spawn_max" });
        }

        Ok(())
    }

    /// Half-width of the band ring entities spawn in, around the plane's default height
    pub fn spawn_band(&self) -> f32 {
        (self.plane_amp_height - self.spawn_band_margin).max(0.0)
    }

    /// Target base speed for a given level
    pub fn target_speed_for_level(&self, level: u32) -> f32 {
        self.init_speed + self.increment_speed_by_level * level as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(Tuning::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "coin_value": 7.5, "ring_radius": 450.0 }"#).unwrap();
        assert_eq!(tuning.coin_value, 7.5);
        assert_eq!(tuning.ring_radius, 450.0);
        assert_eq!(tuning.enemy_value, Tuning::default().enemy_value);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Tuning::from_json("{ coin_value: }").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let tuning = Tuning {
            coin_distance_tolerance: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NotPositive { field: "coin_distance_tolerance", .. })
        ));

        let tuning = Tuning {
            plane_min_speed: 2.0,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(TuningError::InvertedRange { .. })));

        let tuning = Tuning {
            distance_for_level_update: 0,
            ..Default::default()
        };
        let err = tuning.validate().unwrap_err();
        assert_eq!(err.to_string(), "distance_for_level_update must be non-zero");
    }

    #[test]
    fn test_target_speed_for_level() {
        let tuning = Tuning::default();
        let expected = 0.00035 + 0.000005 * 2.0;
        assert!((tuning.target_speed_for_level(2) - expected).abs() < 1e-9);
    }
}
