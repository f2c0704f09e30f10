//! Everything the engine can be asked to do.
//!
//! Key presses, pointer gestures and overlay buttons all end up as a
//! `GlobeCommand` passed to [`GlobeEngine::execute`](super::GlobeEngine::execute).

use glam::Vec2;

/// A single user-facing operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlobeCommand {
    /// Cursor moved (hover tracking, drag rotation).
    PointerMoved {
        /// Physical pixel position.
        position: Vec2,
    },
    /// Primary button pressed: overlay hit test, then drag start.
    PointerPressed {
        /// Physical pixel position.
        position: Vec2,
    },
    /// Primary button released.
    PointerReleased {
        /// Physical pixel position.
        position: Vec2,
    },
    /// Wheel zoom.
    Zoom {
        /// Notches, positive toward the globe.
        delta: f32,
        /// Cursor position at the time of the wheel event.
        cursor: Vec2,
    },
    /// Open or close the side panel (always lands on the root list).
    ToggleMenu,
    /// Activate the next texture layer.
    CycleLayer,
    /// Restore the initial camera pose.
    ResetView,
    /// Advance Normal → Wireframe → Points → Night.
    CycleViewMode,
    /// Toggle procedural camera animation.
    ToggleAnimation,
    /// Advance to the next animation path.
    CycleAnimationKind,
    /// Toggle the stats readout.
    ToggleStats,
    /// Toggle surface lighting.
    ToggleEffects,
    /// Toggle the atmosphere rim.
    ToggleAtmosphere,
    /// Toggle the sound flag.
    ToggleSound,
    /// Toggle idle auto-rotation.
    ToggleAutoRotate,
    /// Save the next frame as a PNG.
    Screenshot,
    /// Write the current state through the config store.
    SaveState,
    /// Restore state from the config store.
    LoadState,
    /// Save and leave the event loop.
    Quit,
}
