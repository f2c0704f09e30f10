//! 2D chrome drawn over the globe: top toolbar, corner buttons, a sliding
//! side panel with a root menu and content sections, and a stats readout.
//!
//! The overlay only tracks state and produces [`Quad`]s; the engine maps
//! hits to commands and the renderer draws the quads in an orthographic
//! pass.

/// Built-in bitmap font.
pub mod font;
/// Rectangles, constants, and button vocabulary.
pub mod layout;

use glam::Vec2;
pub use layout::{
    Button, CornerButton, MenuAction, Rect, Section, ToolbarAction,
};
use layout::{
    BACK_BUTTON, PANEL_EASING, PANEL_HEADER, PANEL_HEIGHT, PANEL_TOP,
    PANEL_WIDTH, SECTION_LINE_HEIGHT, SECTION_TEXT_TOP, TOOLBAR_HEIGHT,
};

use crate::options::ViewMode;

/// Solid screen-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Pixel rectangle, origin top-left.
    pub rect: Rect,
    /// Straight (non-premultiplied) RGBA.
    pub color: [f32; 4],
}

/// What a press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayHit {
    /// A button.
    Button(Button),
    /// Chrome that is not a button (toolbar strip, panel body). The press
    /// is consumed.
    Chrome,
}

/// Side panel position and page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelState {
    /// Whether the panel is opening (`true`) or closing.
    pub target_open: bool,
    /// Left edge of the panel in screen pixels.
    pub current_offset: f32,
    /// Content page, `None` for the root menu.
    pub active_section: Option<Section>,
}

/// Values shown on the chrome that live elsewhere in the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStatus {
    /// Window size.
    pub resolution: [u32; 2],
    /// Active layer name.
    pub layer: String,
    /// Surface mode.
    pub view_mode: ViewMode,
    /// Auto-rotate flag.
    pub auto_rotate: bool,
    /// Animation flag.
    pub animation: bool,
    /// Lighting flag.
    pub effects: bool,
    /// Atmosphere flag.
    pub atmosphere: bool,
    /// Sound flag.
    pub sound: bool,
    /// Stats lines, drawn when the readout is on.
    pub stats: Vec<String>,
}

impl Default for OverlayStatus {
    fn default() -> Self {
        Self {
            resolution: [1280, 720],
            layer: "Default".to_owned(),
            view_mode: ViewMode::Normal,
            auto_rotate: true,
            animation: false,
            effects: true,
            atmosphere: false,
            sound: true,
            stats: Vec::new(),
        }
    }
}

// ── Palette ──────────────────────────────────────────────────────────────

const BAR_BG: [f32; 4] = [0.05, 0.07, 0.12, 0.85];
const PANEL_BG: [f32; 4] = [0.08, 0.10, 0.16, 0.92];
const PANEL_HEADER_BG: [f32; 4] = [0.12, 0.20, 0.35, 1.0];
const BUTTON_BG: [f32; 4] = [0.20, 0.30, 0.50, 0.90];
const BUTTON_HOVER: [f32; 4] = [0.30, 0.45, 0.75, 0.95];
const BUTTON_ON: [f32; 4] = [0.15, 0.55, 0.35, 0.90];
const BORDER: [f32; 4] = [0.45, 0.60, 0.90, 1.0];
const TEXT: [f32; 4] = [0.95, 0.95, 1.0, 1.0];
const TEXT_ACCENT: [f32; 4] = [1.0, 0.85, 0.30, 1.0];
const STATS_BG: [f32; 4] = [0.0, 0.0, 0.0, 0.55];

const TEXT_SCALE: f32 = 2.0;
const STATS_ORIGIN: Vec2 = Vec2::new(10.0, 50.0);
const STATS_LINE_HEIGHT: f32 = 20.0;

/// Chrome state: panel motion, hover, and stats visibility.
#[derive(Debug, Clone)]
pub struct Overlay {
    screen: Vec2,
    panel: PanelState,
    hovered: Option<Button>,
    show_stats: bool,
}

// ── Construction ─────────────────────────────────────────────────────────

impl Overlay {
    /// Closed panel for a `width` x `height` window.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let screen = Vec2::new(width as f32, height as f32);
        Self {
            screen,
            panel: PanelState {
                target_open: false,
                current_offset: screen.x,
                active_section: None,
            },
            hovered: None,
            show_stats: false,
        }
    }

    /// Track a window resize. A closed panel stays parked off-screen.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.screen = Vec2::new(width as f32, height as f32);
        if !self.panel.target_open {
            self.panel.current_offset = self.screen.x;
        }
    }
}

// ── State ────────────────────────────────────────────────────────────────

impl Overlay {
    /// Panel position and page.
    #[must_use]
    pub fn panel(&self) -> &PanelState {
        &self.panel
    }

    /// Button under the cursor, for highlighting.
    #[must_use]
    pub fn hovered(&self) -> Option<Button> {
        self.hovered
    }

    /// Whether the stats readout is drawn.
    #[must_use]
    pub fn stats_visible(&self) -> bool {
        self.show_stats
    }

    /// Flip the stats readout. Returns the new state.
    pub fn toggle_stats(&mut self) -> bool {
        self.show_stats = !self.show_stats;
        self.show_stats
    }

    /// Open or close the panel. Either way the panel lands on the root
    /// menu.
    pub fn toggle_menu(&mut self) {
        self.panel.target_open = !self.panel.target_open;
        self.panel.active_section = None;
    }

    /// Open the panel on `section`.
    pub fn open_section(&mut self, section: Section) {
        self.panel.target_open = true;
        self.panel.active_section = Some(section);
    }

    /// Return from a section to the root menu.
    pub fn back(&mut self) {
        self.panel.active_section = None;
    }

    /// Offset the panel is easing toward.
    #[must_use]
    pub fn panel_target(&self) -> f32 {
        if self.panel.target_open {
            self.screen.x - PANEL_WIDTH
        } else {
            self.screen.x
        }
    }

    /// Ease the panel toward its target. `dt` is in seconds; the easing
    /// fraction applies per 60 Hz step.
    pub fn update(&mut self, dt: f32) {
        let steps = dt.max(0.0) * 60.0;
        let remaining = (1.0 - PANEL_EASING).powf(steps);
        let target = self.panel_target();
        self.panel.current_offset =
            target + (self.panel.current_offset - target) * remaining;
    }

    /// Whether the panel is on screen: open, or still sliding out.
    #[must_use]
    pub fn panel_visible(&self) -> bool {
        self.panel.target_open
            || (self.screen.x - self.panel.current_offset).abs() > 1.0
    }

    /// Panel rectangle at its current offset.
    #[must_use]
    pub fn panel_rect(&self) -> Rect {
        Rect::new(self.panel.current_offset, PANEL_TOP, PANEL_WIDTH, PANEL_HEIGHT)
    }

    fn panel_origin(&self) -> Vec2 {
        Vec2::new(self.panel.current_offset, PANEL_TOP)
    }
}

// ── Hit testing ──────────────────────────────────────────────────────────

impl Overlay {
    /// What sits under `pos`: toolbar first, then the corner buttons, then
    /// the open panel.
    #[must_use]
    pub fn hit_test(&self, pos: Vec2) -> Option<OverlayHit> {
        if let Some(action) =
            ToolbarAction::ALL.into_iter().find(|a| a.rect().contains(pos))
        {
            return Some(OverlayHit::Button(Button::Toolbar(action)));
        }
        if pos.y >= 0.0 && pos.y < TOOLBAR_HEIGHT {
            return Some(OverlayHit::Chrome);
        }
        for corner in [CornerButton::Layer, CornerButton::Menu] {
            if corner.rect(self.screen.x).contains(pos) {
                return Some(OverlayHit::Button(Button::Corner(corner)));
            }
        }
        if !self.panel.target_open {
            return None;
        }
        let local = pos - self.panel_origin();
        let button = match self.panel.active_section {
            Some(_) => BACK_BUTTON.contains(local).then_some(Button::Back),
            None => MenuAction::ALL
                .into_iter()
                .find(|a| a.rect().contains(local))
                .map(Button::Menu),
        };
        match button {
            Some(b) => Some(OverlayHit::Button(b)),
            None => self.panel_rect().contains(pos).then_some(OverlayHit::Chrome),
        }
    }

    /// Update the hovered button for `pos`.
    pub fn hover(&mut self, pos: Vec2) {
        self.hovered = match self.hit_test(pos) {
            Some(OverlayHit::Button(b)) => Some(b),
            _ => None,
        };
    }
}

// ── Content ──────────────────────────────────────────────────────────────

/// Text lines for `section`, filled from `status`.
#[must_use]
pub fn section_lines(section: Section, status: &OverlayStatus) -> Vec<String> {
    let on_off = |b: bool| if b { "on" } else { "off" };
    match section {
        Section::About => [
            "Terra earth viewer",
            "",
            "Features:",
            "- interactive 3D rotation",
            "- switchable map layers",
            "- save and restore state",
            "- view modes and animation",
            "- atmosphere and lighting",
            "- screenshots",
        ]
        .map(str::to_owned)
        .into(),
        Section::Instructions => [
            "Mouse:",
            "- drag to rotate",
            "- wheel to zoom",
            "- double click to reset",
            "",
            "Keys:",
            "- M menu     L layer",
            "- R reset    V view mode",
            "- A animate  N next path",
            "- S stats    E effects",
            "- T screenshot",
            "- Esc save and exit",
        ]
        .map(str::to_owned)
        .into(),
        Section::Settings => vec![
            "Current settings:".to_owned(),
            format!(
                "Resolution: {}x{}",
                status.resolution[0], status.resolution[1]
            ),
            format!("Layer: {}", status.layer),
            format!("View mode: {}", status.view_mode),
            format!("Auto rotate: {}", on_off(status.auto_rotate)),
            format!("Animation: {}", on_off(status.animation)),
            format!("Effects: {}", on_off(status.effects)),
            format!("Atmosphere: {}", on_off(status.atmosphere)),
            format!("Sound: {}", on_off(status.sound)),
        ],
    }
}

// ── Drawing ──────────────────────────────────────────────────────────────

impl Overlay {
    /// Quads for the whole overlay, back to front.
    #[must_use]
    pub fn quads(&self, status: &OverlayStatus) -> Vec<Quad> {
        let mut out = Vec::new();

        out.push(Quad {
            rect: Rect::new(0.0, 0.0, self.screen.x, TOOLBAR_HEIGHT),
            color: BAR_BG,
        });
        for action in ToolbarAction::ALL {
            let on = match action {
                ToolbarAction::Animation => status.animation,
                ToolbarAction::Stats => self.show_stats,
                ToolbarAction::Effects => status.effects,
                ToolbarAction::Atmosphere => status.atmosphere,
                ToolbarAction::Sound => status.sound,
                ToolbarAction::ViewMode
                | ToolbarAction::Screenshot
                | ToolbarAction::Settings
                | ToolbarAction::Help
                | ToolbarAction::Exit => false,
            };
            self.push_button(&mut out, Button::Toolbar(action), action.rect(), on);
        }
        for corner in [CornerButton::Layer, CornerButton::Menu] {
            let on = corner == CornerButton::Menu && self.panel.target_open;
            self.push_button(
                &mut out,
                Button::Corner(corner),
                corner.rect(self.screen.x),
                on,
            );
        }

        if self.show_stats && !status.stats.is_empty() {
            push_stats(&mut out, &status.stats);
        }
        if self.panel_visible() {
            self.push_panel(&mut out, status);
        }
        out
    }

    fn push_button(&self, out: &mut Vec<Quad>, button: Button, rect: Rect, on: bool) {
        let fill = if self.hovered == Some(button) {
            BUTTON_HOVER
        } else if on {
            BUTTON_ON
        } else {
            BUTTON_BG
        };
        out.push(Quad { rect, color: BORDER });
        out.push(Quad {
            rect: rect.inset(1.0),
            color: fill,
        });
        font::push_text_centered(out, button.label(), rect, TEXT_SCALE, TEXT);
    }

    fn push_panel(&self, out: &mut Vec<Quad>, status: &OverlayStatus) {
        let origin = self.panel_origin();
        let panel = self.panel_rect();
        out.push(Quad {
            rect: panel,
            color: BORDER,
        });
        out.push(Quad {
            rect: panel.inset(3.0),
            color: PANEL_BG,
        });
        let header = Rect::new(panel.x, panel.y, panel.w, PANEL_HEADER);
        out.push(Quad {
            rect: header,
            color: PANEL_HEADER_BG,
        });
        let title = self
            .panel
            .active_section
            .map_or("Main menu", Section::title);
        font::push_text_centered(out, title, header, TEXT_SCALE, TEXT_ACCENT);

        match self.panel.active_section {
            Some(section) => {
                self.push_button(out, Button::Back, BACK_BUTTON.translate(origin), false);
                for (i, line) in section_lines(section, status).iter().enumerate() {
                    let at = origin
                        + Vec2::new(
                            20.0,
                            SECTION_TEXT_TOP + i as f32 * SECTION_LINE_HEIGHT,
                        );
                    font::push_text(out, line, at, TEXT_SCALE, TEXT);
                }
            }
            None => {
                for action in MenuAction::ALL {
                    self.push_button(
                        out,
                        Button::Menu(action),
                        action.rect().translate(origin),
                        false,
                    );
                }
            }
        }
    }
}

fn push_stats(out: &mut Vec<Quad>, lines: &[String]) {
    let width = lines
        .iter()
        .map(|l| font::text_width(l, TEXT_SCALE))
        .fold(0.0, f32::max);
    out.push(Quad {
        rect: Rect::new(
            STATS_ORIGIN.x - 6.0,
            STATS_ORIGIN.y - 6.0,
            width + 12.0,
            lines.len() as f32 * STATS_LINE_HEIGHT + 6.0,
        ),
        color: STATS_BG,
    });
    for (i, line) in lines.iter().enumerate() {
        let origin =
            STATS_ORIGIN + Vec2::new(0.0, i as f32 * STATS_LINE_HEIGHT);
        font::push_text(out, line, origin, TEXT_SCALE, TEXT_ACCENT);
    }
}
