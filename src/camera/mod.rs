//! Camera: projection math and the orbit/fly/drift controller.

/// Orbit, fly-to, and auto-drift state machine.
pub mod controller;
/// Camera struct, projection, and pick view offset.
pub mod core;

pub use controller::{CameraController, CameraMotion};
pub use self::core::{Camera, CameraUniform};
