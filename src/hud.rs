//! HUD values derived from the game state
//!
//! The host writes these straight into the DOM; nothing flows back.

use crate::sim::{GamePhase, GameState};

/// Circumference of the level ring in the HUD's SVG units
pub const LEVEL_RING_LENGTH: f32 = 502.0;
/// Energy below this turns the bar red
pub const ENERGY_LOW: f32 = 50.0;
/// Energy below this makes the bar blink
pub const ENERGY_CRITICAL: f32 = 30.0;

pub const COLOR_ENERGY_OK: &str = "#fed700";
pub const COLOR_ENERGY_LOW: &str = "#f25346";

/// Everything the HUD shows for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct HudView {
    pub level: u32,
    /// Whole distance units travelled
    pub distance: u64,
    /// CSS `right` of the energy bar, in percent
    pub energy_right_pct: f32,
    pub energy_color: &'static str,
    pub energy_blink: bool,
    /// `stroke-dashoffset` of the level ring
    pub level_dashoffset: f32,
    pub show_replay: bool,
}

impl HudView {
    pub fn from_state(state: &GameState) -> Self {
        let energy = state.energy;
        Self {
            level: state.level,
            distance: state.distance.max(0.0).floor() as u64,
            energy_right_pct: 100.0 - energy / state.tuning.max_energy * 100.0,
            energy_color: if energy < ENERGY_LOW {
                COLOR_ENERGY_LOW
            } else {
                COLOR_ENERGY_OK
            },
            energy_blink: energy < ENERGY_CRITICAL,
            level_dashoffset: LEVEL_RING_LENGTH * (1.0 - state.level_progress()),
            show_replay: state.phase == GamePhase::WaitingReplay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_run() {
        let state = GameState::new(1);
        let hud = HudView::from_state(&state);
        assert_eq!(hud.level, 1);
        assert_eq!(hud.distance, 0);
        assert_eq!(hud.energy_right_pct, 0.0);
        assert_eq!(hud.energy_color, COLOR_ENERGY_OK);
        assert!(!hud.energy_blink);
        assert_eq!(hud.level_dashoffset, LEVEL_RING_LENGTH);
        assert!(!hud.show_replay);
    }

    #[test]
    fn test_energy_thresholds() {
        let mut state = GameState::new(1);
        state.energy = 40.0;
        let hud = HudView::from_state(&state);
        assert_eq!(hud.energy_color, COLOR_ENERGY_LOW);
        assert!(!hud.energy_blink);
        assert!((hud.energy_right_pct - 60.0).abs() < 1e-4);

        state.energy = 29.0;
        assert!(HudView::from_state(&state).energy_blink);
    }

    #[test]
    fn test_distance_and_level_ring() {
        let mut state = GameState::new(1);
        state.distance = 1500.7;
        state.phase = GamePhase::WaitingReplay;
        let hud = HudView::from_state(&state);
        assert_eq!(hud.distance, 1500);
        assert!((hud.level_dashoffset - 251.0 * (1.0 - 0.0014)).abs() < 0.5);
        assert!(hud.show_replay);
    }
}
