//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (active-list order)
//! - No rendering or platform dependencies

pub mod ambient;
pub mod particles;
pub mod player;
pub mod pool;
pub mod ring;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod tween;

pub use ambient::{AmbientLight, Cloud, Sea, Sky};
pub use particles::{Particle, ParticlePhase, ParticlesHolder};
pub use player::{CameraRig, Plane, PointerState, update_plane};
pub use pool::Pool;
pub use ring::{RingEntity, RingKind, RingStep};
pub use spawner::{RingHit, Spawner};
pub use state::{DistanceTrigger, GameEvent, GamePhase, GameState, Triggers};
pub use tick::{TickInput, tick};
