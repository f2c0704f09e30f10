//! Input handling: platform-agnostic events and the processor that turns
//! them into [`GlobeCommand`](crate::GlobeCommand)s.

/// Platform-agnostic input events.
pub mod event;
/// Converts raw events into engine commands.
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use processor::{InputProcessor, KeyBindings, KeyCommandTag};
