//! Property tests for simulation invariants

use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use volador::sim::{GamePhase, GameState, PointerState, Pool, RingKind, Spawner, TickInput, tick};
use volador::Tuning;

fn frames() -> impl Strategy<Value = Vec<(f32, f32, f32, bool)>> {
    prop::collection::vec(
        (-1.5f32..1.5, -1.5f32..1.5, 0.0f32..250.0, any::<bool>()),
        1..400,
    )
}

fn input(x: f32, y: f32, replay: bool) -> TickInput {
    TickInput {
        pointer: PointerState::new(x, y),
        replay,
    }
}

proptest! {
    #[test]
    fn energy_stays_in_bounds(seed in any::<u64>(), frames in frames()) {
        let mut state = GameState::new(seed);
        for (x, y, dt, replay) in frames {
            tick(&mut state, &input(x, y, replay), dt);
            prop_assert!(state.energy >= 0.0);
            prop_assert!(state.energy <= state.tuning.max_energy);
        }
    }

    #[test]
    fn distance_never_decreases_while_playing(seed in any::<u64>(), frames in frames()) {
        let mut state = GameState::new(seed);
        let mut last = state.distance;
        for (x, y, dt, _) in frames {
            tick(&mut state, &input(x, y, false), dt);
            if state.phase != GamePhase::Playing {
                break;
            }
            prop_assert!(state.distance >= last);
            last = state.distance;
        }
    }

    #[test]
    fn ring_angles_stay_wrapped(seed in any::<u64>(), frames in frames()) {
        let mut state = GameState::new(seed);
        for (x, y, dt, replay) in frames {
            tick(&mut state, &input(x, y, replay), dt);
            for e in state.coins.active.iter().chain(&state.enemies.active) {
                prop_assert!((0.0..TAU).contains(&e.angle), "angle {}", e.angle);
            }
            prop_assert!((0.0..TAU).contains(&state.sea.rotation));
        }
    }

    #[test]
    fn pool_hands_back_most_recent_first(ids in prop::collection::vec(any::<u32>(), 1..64)) {
        let mut pool: Pool<u32> = Pool::new(|| u32::MAX);
        for &id in &ids {
            pool.release(id);
        }
        for &id in ids.iter().rev() {
            prop_assert_eq!(pool.acquire(), id);
        }
        prop_assert!(pool.is_empty());
        prop_assert_eq!(pool.constructed(), 0);
    }

    #[test]
    fn same_seed_same_run(seed in any::<u64>(), frames in frames()) {
        let mut a = GameState::new(seed);
        let mut b = GameState::new(seed);
        for (x, y, dt, replay) in frames {
            let input = input(x, y, replay);
            tick(&mut a, &input, dt);
            tick(&mut b, &input, dt);
        }
        prop_assert_eq!(a.distance, b.distance);
        prop_assert_eq!(a.energy, b.energy);
        prop_assert_eq!(a.phase, b.phase);
        prop_assert_eq!(a.coins.len(), b.coins.len());
        prop_assert_eq!(a.enemies.len(), b.enemies.len());
    }
}

/// Fifty coins in a row, collected one at a time
#[test]
fn coins_collected_one_by_one() {
    let tuning = Tuning::default();
    let mut rng = Pcg32::seed_from_u64(50);
    let mut coins = Spawner::coins(&tuning);
    assert_eq!(coins.pool.len(), 50);

    for i in 0..50 {
        let mut coin = coins.pool.acquire();
        coin.place(0.0, 700.0 + 40.0 * i as f32, tuning.ring_radius);
        coins.active.push(coin);
    }
    assert!(coins.pool.is_empty());
    let targets: Vec<_> = coins.active.iter().map(|c| c.pos).collect();

    for (i, target) in targets.into_iter().enumerate() {
        let hits = coins.advance(0.0, 16.0, target, &tuning, &mut rng);
        assert_eq!(hits.len(), 1, "coin {}", i);
        assert_eq!(hits[0].kind, RingKind::Coin);
        assert!(hits[0].pos.distance(target) < 1e-3);
        assert_eq!(coins.len(), 49 - i);
        assert_eq!(coins.pool.len(), i + 1);
    }

    // Nothing was constructed past the pre-warm
    assert_eq!(coins.pool.constructed(), 50);
}
