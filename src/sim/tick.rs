//! One simulation tick
//!
//! Phase-specific work runs first (spawn triggers, player, counters while
//! playing; the dive while game over; the restart edge while waiting). The
//! world then moves in every phase: propeller, sea, light, ring entities,
//! sky, particles.

use std::f32::consts::FRAC_PI_2;

use super::player::{PointerState, update_plane};
use super::ring::RingKind;
use super::spawner::RingHit;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::MAX_FRAME_MS;

/// Input sampled for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Latest pointer position
    pub pointer: PointerState,
    /// Click/tap released since the last tick. Only acted on while waiting
    /// for a replay.
    pub replay: bool,
}

/// Advance the game by `dt` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = dt.clamp(0.0, MAX_FRAME_MS);
    state.time_ticks += 1;

    match state.phase {
        GamePhase::Playing => update_playing(state, input, dt),
        GamePhase::GameOver => update_game_over(state, dt),
        GamePhase::WaitingReplay => {
            if input.replay {
                state.reset();
            }
        }
    }

    state.plane.spin_propeller(dt);
    state.sea.update(state.speed, dt);
    state.ambient.update(dt, &state.tuning);

    let player = state.plane.pos;
    let coin_hits = state
        .coins
        .advance(state.speed, dt, player, &state.tuning, &mut state.rng);
    let enemy_hits = state
        .enemies
        .advance(state.speed, dt, player, &state.tuning, &mut state.rng);
    for hit in coin_hits.into_iter().chain(enemy_hits) {
        apply_hit(state, hit);
    }

    state.sky.update(state.speed, dt, &mut state.rng);
    state.particles.update(dt);
}

fn update_playing(state: &mut GameState, input: &TickInput, dt: f32) {
    let distance = state.distance;

    if state.triggers.coins.check(distance) {
        state.coins.spawn(&state.tuning, state.level, &mut state.rng);
    }

    if state.triggers.speed.check(distance) {
        state.target_base_speed += state.tuning.increment_speed_by_time * dt;
    }

    if state.triggers.enemies.check(distance) {
        state.enemies.spawn(&state.tuning, state.level, &mut state.rng);
    }

    if state.triggers.level.check(distance) {
        state.level += 1;
        state.target_base_speed = state.tuning.target_speed_for_level(state.level);
        state.events.push(GameEvent::LevelUp { level: state.level });
        log::info!("Level {} at distance {}", state.level, distance.floor());
    }

    update_plane(
        &mut state.plane,
        &mut state.camera,
        input.pointer,
        &state.tuning,
        dt,
    );
    state.plane.wave_hair(state.speed, dt);

    state.distance += state.speed * dt * state.tuning.ratio_speed_distance;
    state.remove_energy(state.speed * dt * state.tuning.ratio_speed_energy);

    let k = (dt * state.tuning.base_speed_smoothing).min(1.0);
    state.base_speed += (state.target_base_speed - state.base_speed) * k;
    state.speed = state.base_speed * state.plane.speed;

    if state.energy <= 0.0 {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver {
            distance: state.distance,
            level: state.level,
        });
        log::info!(
            "Game over: distance {}, level {}",
            state.distance.floor(),
            state.level
        );
    }
}

fn update_game_over(state: &mut GameState, dt: f32) {
    let tuning = &state.tuning;
    let plane = &mut state.plane;

    state.speed *= tuning.game_over_speed_decay;
    plane.rot_z += (-FRAC_PI_2 - plane.rot_z) * tuning.game_over_dive_rate * dt;
    plane.rot_x += tuning.game_over_pitch_rate * dt;
    plane.fall_speed *= tuning.game_over_fall_acceleration;
    plane.pos.y -= plane.fall_speed * dt;

    if plane.pos.y < tuning.replay_threshold_y {
        state.phase = GamePhase::WaitingReplay;
        state.events.push(GameEvent::ShowReplay);
        log::info!("Waiting for replay");
    }
}

/// Side effects of a coin or enemy touching the plane
fn apply_hit(state: &mut GameState, hit: RingHit) {
    match hit.kind {
        RingKind::Coin => {
            state.add_energy(state.tuning.coin_value);
            state.particles.spawn_burst(
                hit.pos,
                state.tuning.coin_burst_count,
                state.tuning.coin_burst_color,
                state.tuning.coin_burst_scale,
                &mut state.rng,
            );
            state.events.push(GameEvent::CoinCollected { pos: hit.pos });
        }
        RingKind::Enemy => {
            state.particles.spawn_burst(
                hit.pos,
                state.tuning.enemy_burst_count,
                state.tuning.enemy_burst_color,
                state.tuning.enemy_burst_scale,
                &mut state.rng,
            );
            state
                .plane
                .knock(hit.toward_player, state.tuning.knockback_impulse);
            state.remove_energy(state.tuning.enemy_value);
            state.ambient.flash(&state.tuning);
            state.events.push(GameEvent::EnemyHit { pos: hit.pos });
        }
    }
}
