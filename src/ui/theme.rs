//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

use crate::core::gallery::Accent;

/// Central theme. Change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    /// Stage backdrop (warm off-white).
    pub const BACKDROP: Accent = Accent::rgb(0xf7, 0xf5, 0xf3);
    /// Card body visible around the printed face.
    pub const CARD_EDGE: Accent = Accent::rgb(0xf5, 0xf5, 0xf5);
    pub const HOVER_EDGE: Accent = Accent::rgb(0x00, 0xce, 0xc9);
    pub const TEAL: Color = Color::Rgb(0x00, 0xce, 0xc9);
    pub const GREY: Color = Color::Rgb(0x63, 0x6e, 0x72);
    pub const FAINT: Color = Color::Rgb(0xb2, 0xbe, 0xc3);

    pub fn accent(c: Accent) -> Color {
        Color::Rgb(c.r, c.g, c.b)
    }

    // ── stage ──────────────────────────────────────────────────
    pub fn card_label_style() -> Style {
        Style::default()
            .fg(Color::White)
            .bg(Color::Rgb(0x2d, 0x34, 0x36))
            .add_modifier(Modifier::BOLD)
    }

    // ── navigation rail ────────────────────────────────────────
    pub fn pill_style(highlighted: bool, viewing: bool) -> Style {
        let fg = match (highlighted, viewing) {
            (true, true) => Self::TEAL,
            (true, false) => Self::GREY,
            (false, _) => Self::FAINT,
        };
        Style::default().fg(fg)
    }

    pub fn tooltip_style() -> Style {
        Style::default().fg(Color::White).bg(Color::Rgb(0x2d, 0x34, 0x36))
    }

    pub fn tooltip_category_style() -> Style {
        Self::tooltip_style().fg(Self::FAINT)
    }

    // ── detail panel ───────────────────────────────────────────
    pub fn category_style() -> Style {
        Style::default().fg(Self::GREY)
    }

    pub fn item_title_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn section_title_style(accent: Accent) -> Style {
        Style::default()
            .fg(Self::accent(accent))
            .add_modifier(Modifier::BOLD)
    }

    pub fn label_style() -> Style {
        Style::default()
            .fg(Self::FAINT)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn tag_style() -> Style {
        Style::default().fg(Self::TEAL)
    }

    pub fn page_counter_style() -> Style {
        Style::default().fg(Self::GREY)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn spinner_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }
}
