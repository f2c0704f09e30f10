//! Converts raw platform events into engine commands.
//!
//! The `InputProcessor` owns the transient input state (cursor position,
//! primary button) and the key-binding map. It is the only thing that sits
//! between raw window events and the engine's
//! [`execute`](crate::GlobeEngine::execute) method.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::event::{InputEvent, MouseButton};
use crate::engine::command::GlobeCommand;

/// Maps physical key strings to [`GlobeCommand`] variants.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"KeyM"`, `"Escape"`, etc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    /// Forward map: key string → command tag.
    bindings: HashMap<String, KeyCommandTag>,
}

/// Serializable tag for the key-bindable subset of [`GlobeCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommandTag {
    /// Save and exit.
    Quit,
    /// Open or close the side panel.
    ToggleMenu,
    /// Next texture layer.
    CycleLayer,
    /// Initial camera pose.
    ResetView,
    /// Next view mode.
    CycleViewMode,
    /// Camera animation on/off.
    ToggleAnimation,
    /// Next animation path.
    CycleAnimationKind,
    /// Stats readout on/off.
    ToggleStats,
    /// Lighting on/off.
    ToggleEffects,
    /// Atmosphere on/off.
    ToggleAtmosphere,
    /// Auto-rotate on/off.
    ToggleAutoRotate,
    /// Save a PNG of the next frame.
    Screenshot,
}

impl KeyCommandTag {
    fn to_command(self) -> GlobeCommand {
        match self {
            Self::Quit => GlobeCommand::Quit,
            Self::ToggleMenu => GlobeCommand::ToggleMenu,
            Self::CycleLayer => GlobeCommand::CycleLayer,
            Self::ResetView => GlobeCommand::ResetView,
            Self::CycleViewMode => GlobeCommand::CycleViewMode,
            Self::ToggleAnimation => GlobeCommand::ToggleAnimation,
            Self::CycleAnimationKind => GlobeCommand::CycleAnimationKind,
            Self::ToggleStats => GlobeCommand::ToggleStats,
            Self::ToggleEffects => GlobeCommand::ToggleEffects,
            Self::ToggleAtmosphere => GlobeCommand::ToggleAtmosphere,
            Self::ToggleAutoRotate => GlobeCommand::ToggleAutoRotate,
            Self::Screenshot => GlobeCommand::Screenshot,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("Escape".into(), KeyCommandTag::Quit),
            ("KeyM".into(), KeyCommandTag::ToggleMenu),
            ("KeyL".into(), KeyCommandTag::CycleLayer),
            ("KeyR".into(), KeyCommandTag::ResetView),
            ("KeyV".into(), KeyCommandTag::CycleViewMode),
            ("KeyA".into(), KeyCommandTag::ToggleAnimation),
            ("KeyN".into(), KeyCommandTag::CycleAnimationKind),
            ("KeyS".into(), KeyCommandTag::ToggleStats),
            ("KeyE".into(), KeyCommandTag::ToggleEffects),
            ("KeyT".into(), KeyCommandTag::Screenshot),
            ("Space".into(), KeyCommandTag::ToggleAutoRotate),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the command for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<GlobeCommand> {
        self.bindings.get(key).map(|tag| tag.to_command())
    }

    /// Bind `key` to `tag`, replacing any previous binding for that key.
    pub fn bind(&mut self, key: impl Into<String>, tag: KeyCommandTag) {
        let _ = self.bindings.insert(key.into(), tag);
    }
}

/// Converts raw window events into [`GlobeCommand`]s.
///
/// # Usage
///
/// ```ignore
/// if let Some(cmd) = input.handle_event(event) {
///     engine.execute(cmd);
/// }
/// if let Some(cmd) = input.handle_key_press("KeyM") {
///     engine.execute(cmd);
/// }
/// ```
#[derive(Debug, Default)]
pub struct InputProcessor {
    cursor: Vec2,
    primary_down: bool,
    key_bindings: KeyBindings,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            key_bindings,
            ..Self::new()
        }
    }

    /// Whether the primary button is held.
    #[must_use]
    pub fn primary_down(&self) -> bool {
        self.primary_down
    }

    /// Look up a key press and return the corresponding command, if bound.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<GlobeCommand> {
        self.key_bindings.lookup(key)
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<GlobeCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.cursor = Vec2::new(x, y);
                Some(GlobeCommand::PointerMoved {
                    position: self.cursor,
                })
            }
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed: true,
            } => {
                self.primary_down = true;
                Some(GlobeCommand::PointerPressed {
                    position: self.cursor,
                })
            }
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed: false,
            } => {
                // A release without a matching press (focus change) is
                // dropped.
                std::mem::take(&mut self.primary_down).then_some(
                    GlobeCommand::PointerReleased {
                        position: self.cursor,
                    },
                )
            }
            InputEvent::MouseButton { .. } => None,
            InputEvent::Scroll { delta } => Some(GlobeCommand::Zoom {
                delta,
                cursor: self.cursor,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_keys_are_bound() {
        let bindings = KeyBindings::default();
        for (key, cmd) in [
            ("Escape", GlobeCommand::Quit),
            ("KeyM", GlobeCommand::ToggleMenu),
            ("KeyL", GlobeCommand::CycleLayer),
            ("KeyR", GlobeCommand::ResetView),
            ("KeyV", GlobeCommand::CycleViewMode),
            ("KeyA", GlobeCommand::ToggleAnimation),
            ("KeyS", GlobeCommand::ToggleStats),
            ("KeyE", GlobeCommand::ToggleEffects),
            ("KeyT", GlobeCommand::Screenshot),
        ] {
            assert_eq!(bindings.lookup(key), Some(cmd), "{key}");
        }
        assert_eq!(bindings.lookup("KeyZ"), None);
    }

    #[test]
    fn rebinding_replaces_key() {
        let mut bindings = KeyBindings::default();
        bindings.bind("KeyQ", KeyCommandTag::Quit);
        bindings.bind("KeyM", KeyCommandTag::ToggleAtmosphere);
        let input = InputProcessor::with_key_bindings(bindings);
        assert_eq!(input.handle_key_press("KeyQ"), Some(GlobeCommand::Quit));
        assert_eq!(
            input.handle_key_press("KeyM"),
            Some(GlobeCommand::ToggleAtmosphere)
        );
    }

    #[test]
    fn bindings_deserialize_from_json() {
        let bindings: KeyBindings = serde_json::from_str(
            r#"{ "bindings": { "KeyQ": "quit", "F5": "screenshot" } }"#,
        )
        .unwrap();
        assert_eq!(bindings.lookup("F5"), Some(GlobeCommand::Screenshot));
        assert_eq!(bindings.lookup("Escape"), None);
    }

    #[test]
    fn press_and_release_carry_cursor() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(InputEvent::CursorMoved { x: 10.0, y: 20.0 });
        let press = input.handle_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        assert_eq!(
            press,
            Some(GlobeCommand::PointerPressed {
                position: Vec2::new(10.0, 20.0)
            })
        );
        assert!(input.primary_down());
        let _ = input.handle_event(InputEvent::CursorMoved { x: 15.0, y: 20.0 });
        let release = input.handle_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        });
        assert_eq!(
            release,
            Some(GlobeCommand::PointerReleased {
                position: Vec2::new(15.0, 20.0)
            })
        );
        assert!(!input.primary_down());
    }

    #[test]
    fn unmatched_release_and_other_buttons_ignored() {
        let mut input = InputProcessor::new();
        assert_eq!(
            input.handle_event(InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed: false,
            }),
            None
        );
        assert_eq!(
            input.handle_event(InputEvent::MouseButton {
                button: MouseButton::Right,
                pressed: true,
            }),
            None
        );
    }

    #[test]
    fn side_buttons_never_press() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(InputEvent::CursorMoved { x: 640.0, y: 360.0 });
        for pressed in [true, false, true, false] {
            assert_eq!(
                input.handle_event(InputEvent::MouseButton {
                    button: MouseButton::Other,
                    pressed,
                }),
                None
            );
        }
        assert!(!input.primary_down());
    }

    #[test]
    fn scroll_becomes_zoom_at_cursor() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(InputEvent::CursorMoved { x: 3.0, y: 4.0 });
        assert_eq!(
            input.handle_event(InputEvent::Scroll { delta: -1.0 }),
            Some(GlobeCommand::Zoom {
                delta: -1.0,
                cursor: Vec2::new(3.0, 4.0)
            })
        );
    }
}
