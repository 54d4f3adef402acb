//! Texture loading indicator — a small spinner + label rendered in the
//! top-right corner of a given area.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use super::theme::Theme;

/// Braille-dot spinner frames.  Cycles through these on each tick.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// A small "loading…" indicator with a spinning icon.
///
/// Invisible when nothing is pending.
pub struct LoadingIndicator {
    /// Number of textures still decoding.
    pub pending: usize,
    /// Monotonically increasing tick counter (drives the spinner frame).
    pub tick: u64,
}

impl LoadingIndicator {
    fn label(&self) -> String {
        let frame = SPINNER_FRAMES[(self.tick as usize) % SPINNER_FRAMES.len()];
        format!(" {frame} loading {} ", self.pending)
    }
}

impl Widget for LoadingIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.pending == 0 || area.width < 16 || area.height == 0 {
            return;
        }

        let label = self.label();
        let label_width = label.chars().count() as u16;
        let x = area.x + area.width.saturating_sub(label_width + 1);
        let line = Line::from(Span::styled(label, Theme::spinner_style()));
        buf.set_line(x, area.y, &line, label_width);
    }
}
