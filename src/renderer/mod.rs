//! WebGPU rendering module
//!
//! The simulation is flattened into a [`Scene`] of view-space sprites, which
//! the SDF pipeline fills in a single fragment pass.

pub mod scene;
pub mod sdf_pipeline;

pub use scene::{CameraView, Scene, Sprite, SpriteShape};
pub use sdf_pipeline::SdfRenderState;
