//! Fixed chrome geometry and the button vocabulary.

use std::fmt;

use glam::Vec2;

/// Axis-aligned rectangle in physical pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Rect {
    /// Build from position and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Half-open containment: left/top edges inside, right/bottom outside.
    #[must_use]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    /// Same rectangle moved by `offset`.
    #[must_use]
    pub fn translate(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }

    /// Shrink by `by` on every side.
    #[must_use]
    pub fn inset(&self, by: f32) -> Self {
        Self::new(
            self.x + by,
            self.y + by,
            (self.w - 2.0 * by).max(0.0),
            (self.h - 2.0 * by).max(0.0),
        )
    }
}

// ── Constants ────────────────────────────────────────────────────────────

/// Side panel width.
pub const PANEL_WIDTH: f32 = 400.0;
/// Side panel height.
pub const PANEL_HEIGHT: f32 = 600.0;
/// Distance from the window top to the panel top.
pub const PANEL_TOP: f32 = 120.0;
/// Height of the panel title strip.
pub const PANEL_HEADER: f32 = 60.0;
/// Fraction of the remaining distance the panel covers each 60 Hz step.
pub const PANEL_EASING: f32 = 0.3;
/// Height of the top toolbar.
pub const TOOLBAR_HEIGHT: f32 = 40.0;

const TOOLBAR_BUTTON_WIDTH: f32 = 110.0;
const TOOLBAR_SPACING: f32 = 8.0;
const TOOLBAR_LEFT: f32 = 10.0;
const TOOLBAR_BUTTON_MARGIN: f32 = 5.0;

/// Panel-relative Back button.
pub const BACK_BUTTON: Rect = Rect::new(20.0, 80.0, 360.0, 50.0);

/// Panel-relative top of the section text.
pub const SECTION_TEXT_TOP: f32 = 150.0;
/// Line advance for section text.
pub const SECTION_LINE_HEIGHT: f32 = 30.0;

// ── Actions ──────────────────────────────────────────────────────────────

/// Content pages reachable from the root menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Program description.
    About,
    /// Controls reference.
    Instructions,
    /// Current settings readout.
    Settings,
}

impl Section {
    /// Header shown while the section is open.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::About => "About",
            Self::Instructions => "Instructions",
            Self::Settings => "Settings",
        }
    }
}

/// Root menu entries, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Open the About section.
    About,
    /// Open the Instructions section.
    Instructions,
    /// Open the Settings section.
    Settings,
    /// Write the state file.
    SaveState,
    /// Read the state file.
    LoadState,
    /// Initial camera pose.
    ResetView,
    /// Save and quit.
    Exit,
}

impl MenuAction {
    /// Entries in display order.
    pub const ALL: [MenuAction; 7] = [
        Self::About,
        Self::Instructions,
        Self::Settings,
        Self::SaveState,
        Self::LoadState,
        Self::ResetView,
        Self::Exit,
    ];

    /// Button caption.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::About => "About",
            Self::Instructions => "Instructions",
            Self::Settings => "Settings",
            Self::SaveState => "Save state",
            Self::LoadState => "Load state",
            Self::ResetView => "Reset view",
            Self::Exit => "Exit",
        }
    }

    /// Panel-relative button rectangle.
    #[must_use]
    pub fn rect(self) -> Rect {
        let i = Self::ALL.iter().position(|a| *a == self).unwrap_or(0);
        Rect::new(20.0, 140.0 + 60.0 * i as f32, 360.0, 50.0)
    }
}

/// Top toolbar buttons, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    /// Cycle the view mode.
    ViewMode,
    /// Toggle camera animation.
    Animation,
    /// Toggle the stats readout.
    Stats,
    /// Toggle lighting.
    Effects,
    /// Toggle the atmosphere rim.
    Atmosphere,
    /// Save a PNG.
    Screenshot,
    /// Toggle sound.
    Sound,
    /// Open the panel on Settings.
    Settings,
    /// Open the panel on Instructions.
    Help,
    /// Save and quit.
    Exit,
}

impl ToolbarAction {
    /// Buttons in display order.
    pub const ALL: [ToolbarAction; 10] = [
        Self::ViewMode,
        Self::Animation,
        Self::Stats,
        Self::Effects,
        Self::Atmosphere,
        Self::Screenshot,
        Self::Sound,
        Self::Settings,
        Self::Help,
        Self::Exit,
    ];

    /// Button caption.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ViewMode => "View",
            Self::Animation => "Animate",
            Self::Stats => "Stats",
            Self::Effects => "Effects",
            Self::Atmosphere => "Atmos",
            Self::Screenshot => "Shot",
            Self::Sound => "Sound",
            Self::Settings => "Settings",
            Self::Help => "Help",
            Self::Exit => "Exit",
        }
    }

    /// Screen rectangle.
    #[must_use]
    pub fn rect(self) -> Rect {
        let i = Self::ALL.iter().position(|a| *a == self).unwrap_or(0);
        Rect::new(
            TOOLBAR_LEFT + (TOOLBAR_BUTTON_WIDTH + TOOLBAR_SPACING) * i as f32,
            TOOLBAR_BUTTON_MARGIN,
            TOOLBAR_BUTTON_WIDTH,
            TOOLBAR_HEIGHT - 2.0 * TOOLBAR_BUTTON_MARGIN,
        )
    }
}

/// Buttons pinned below the toolbar at the right edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerButton {
    /// Open or close the panel.
    Menu,
    /// Cycle the texture layer.
    Layer,
}

impl CornerButton {
    /// Button caption.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Menu => "Menu",
            Self::Layer => "Layer",
        }
    }

    /// Screen rectangle for a window `screen_width` pixels wide.
    #[must_use]
    pub fn rect(self, screen_width: f32) -> Rect {
        match self {
            Self::Menu => Rect::new(screen_width - 120.0, 50.0, 100.0, 40.0),
            Self::Layer => Rect::new(screen_width - 240.0, 50.0, 100.0, 40.0),
        }
    }
}

/// Any clickable chrome element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Top toolbar.
    Toolbar(ToolbarAction),
    /// Right-edge corner button.
    Corner(CornerButton),
    /// Root menu entry.
    Menu(MenuAction),
    /// Section Back button.
    Back,
}

impl Button {
    /// Button caption.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Toolbar(a) => a.label(),
            Self::Corner(c) => c.label(),
            Self::Menu(a) => a.label(),
            Self::Back => "< Back",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toolbar_fits_default_window() {
        let last = ToolbarAction::Exit.rect();
        assert!(last.x + last.w <= 1280.0);
        assert!(last.y + last.h <= TOOLBAR_HEIGHT);
    }

    #[test]
    fn menu_fits_panel() {
        let last = MenuAction::Exit.rect();
        assert_eq!(last.y, 500.0);
        assert!(last.y + last.h <= PANEL_HEIGHT);
    }

    #[test]
    fn rect_edges_half_open() {
        let r = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(r.contains(Vec2::new(10.0, 10.0)));
        assert!(!r.contains(Vec2::new(15.0, 12.0)));
        assert!(!r.contains(Vec2::new(12.0, 15.0)));
    }
}
