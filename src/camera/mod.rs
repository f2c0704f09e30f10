//! Globe camera: the damped rotation/zoom controller, optional procedural
//! animation, and the projection the renderer consumes.

/// Procedural camera motion driven through the controller.
pub mod animation;
/// Rotation, zoom, momentum, and auto-rotate state machine.
pub mod controller;
/// Perspective projection parameters.
pub mod core;

pub use animation::{AnimationKind, CameraAnimation};
pub use controller::{ViewController, ViewState};
pub use self::core::Projection;
