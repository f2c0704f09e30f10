//! Command dispatch: one `match` from [`GlobeCommand`] to its handler, and
//! the mapping from overlay buttons to commands.

use glam::Vec2;
use web_time::Instant;

use super::GlobeEngine;
use crate::engine::command::GlobeCommand;
use crate::overlay::{
    Button, CornerButton, MenuAction, OverlayHit, Section, ToolbarAction,
};

/// What pressing an overlay button does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ButtonAction {
    /// Run a command.
    Command(GlobeCommand),
    /// Open the panel on a content page.
    Open(Section),
    /// Leave a content page.
    Back,
}

/// Total mapping from every button to its action.
pub(crate) fn button_action(button: Button) -> ButtonAction {
    use ButtonAction::{Command, Open};
    match button {
        Button::Toolbar(action) => match action {
            ToolbarAction::ViewMode => Command(GlobeCommand::CycleViewMode),
            ToolbarAction::Animation => Command(GlobeCommand::ToggleAnimation),
            ToolbarAction::Stats => Command(GlobeCommand::ToggleStats),
            ToolbarAction::Effects => Command(GlobeCommand::ToggleEffects),
            ToolbarAction::Atmosphere => Command(GlobeCommand::ToggleAtmosphere),
            ToolbarAction::Screenshot => Command(GlobeCommand::Screenshot),
            ToolbarAction::Sound => Command(GlobeCommand::ToggleSound),
            ToolbarAction::Settings => Open(Section::Settings),
            ToolbarAction::Help => Open(Section::Instructions),
            ToolbarAction::Exit => Command(GlobeCommand::Quit),
        },
        Button::Corner(CornerButton::Menu) => Command(GlobeCommand::ToggleMenu),
        Button::Corner(CornerButton::Layer) => Command(GlobeCommand::CycleLayer),
        Button::Menu(action) => match action {
            MenuAction::About => Open(Section::About),
            MenuAction::Instructions => Open(Section::Instructions),
            MenuAction::Settings => Open(Section::Settings),
            MenuAction::SaveState => Command(GlobeCommand::SaveState),
            MenuAction::LoadState => Command(GlobeCommand::LoadState),
            MenuAction::ResetView => Command(GlobeCommand::ResetView),
            MenuAction::Exit => Command(GlobeCommand::Quit),
        },
        Button::Back => ButtonAction::Back,
    }
}

impl GlobeEngine {
    /// Run `command` as if it happened at `now`.
    ///
    /// Pointer presses go to the overlay first; only a press that misses
    /// all chrome starts a globe drag (or, within the double-click window,
    /// resets the view).
    pub fn execute_at(&mut self, command: GlobeCommand, now: Instant) {
        match command {
            GlobeCommand::PointerMoved { position } => {
                self.overlay.hover(position);
                self.view.drag_to(position);
            }
            GlobeCommand::PointerPressed { position } => self.press(position, now),
            GlobeCommand::PointerReleased { position } => {
                self.view.end_drag(position);
            }
            GlobeCommand::Zoom { delta, cursor } => self.view.zoom(delta, cursor),
            GlobeCommand::ToggleMenu => self.overlay.toggle_menu(),
            GlobeCommand::CycleLayer => {
                if let Some(name) = self.layers.cycle() {
                    log::info!("layer: {name}");
                }
            }
            GlobeCommand::ResetView => self.view.reset_view(),
            GlobeCommand::CycleViewMode => {
                self.toggles.view_mode = self.toggles.view_mode.next();
                log::info!("view mode: {}", self.toggles.view_mode);
            }
            GlobeCommand::ToggleAnimation => {
                let on = self.animation.toggle();
                log::info!("animation {} ({})", on_off(on), self.animation.kind);
            }
            GlobeCommand::CycleAnimationKind => {
                self.animation.kind = self.animation.kind.next();
                log::info!("animation path: {}", self.animation.kind);
            }
            GlobeCommand::ToggleStats => {
                let on = self.overlay.toggle_stats();
                self.refresh_stats();
                log::info!("stats {}", on_off(on));
            }
            GlobeCommand::ToggleEffects => {
                self.toggles.effects = !self.toggles.effects;
                log::info!("effects {}", on_off(self.toggles.effects));
            }
            GlobeCommand::ToggleAtmosphere => {
                self.toggles.atmosphere = !self.toggles.atmosphere;
                log::info!("atmosphere {}", on_off(self.toggles.atmosphere));
            }
            GlobeCommand::ToggleSound => {
                self.toggles.sound = !self.toggles.sound;
                log::info!("sound {}", on_off(self.toggles.sound));
            }
            GlobeCommand::ToggleAutoRotate => {
                self.view.toggle_auto_rotate();
                log::info!("auto rotate {}", on_off(self.view.state().auto_rotate));
            }
            GlobeCommand::Screenshot => self.screenshots.request(),
            GlobeCommand::SaveState => {
                if let Err(e) = self.save_state() {
                    log::error!("failed to save state: {e}");
                }
            }
            GlobeCommand::LoadState => {
                if let Err(e) = self.load_state() {
                    log::warn!("failed to load state: {e}");
                }
            }
            GlobeCommand::Quit => {
                if let Err(e) = self.save_state() {
                    log::error!("failed to save state on exit: {e}");
                }
                self.quit_requested = true;
            }
        }
    }

    fn press(&mut self, position: Vec2, now: Instant) {
        match self.overlay.hit_test(position) {
            Some(OverlayHit::Button(button)) => {
                log::debug!("pressed {button}");
                match button_action(button) {
                    ButtonAction::Command(command) => self.execute_at(command, now),
                    ButtonAction::Open(section) => self.overlay.open_section(section),
                    ButtonAction::Back => self.overlay.back(),
                }
            }
            Some(OverlayHit::Chrome) => {}
            None => self.view.begin_drag(position, now),
        }
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
