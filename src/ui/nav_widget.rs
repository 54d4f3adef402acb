//! Navigation rail — one pill per gallery item along the right edge.
//!
//! The rail reads bottom-up: the last item sits at the top, matching the
//! stack, which grows upward.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    text::{Line, Span},
};

use super::theme::Theme;
use crate::core::gallery::Gallery;

const PILL: &str = "━━";
const PILL_HIGHLIGHTED: &str = "████";

pub struct NavRail<'a> {
    pub gallery: &'a Gallery,
    /// Pill to highlight (open item, or focused card while browsing).
    pub highlighted: usize,
    pub viewing: bool,
    /// Pill under the pointer; shows a tooltip.
    pub hovered: Option<usize>,
}

/// Clickable pill rectangles from the last draw.
#[derive(Debug, Clone, Default)]
pub struct NavHitZones {
    pills: Vec<(usize, Rect)>,
}

impl NavHitZones {
    pub fn pill_at(&self, column: u16, row: u16) -> Option<usize> {
        self.pills
            .iter()
            .find(|(_, r)| r.contains(Position::new(column, row)))
            .map(|(i, _)| *i)
    }
}

/// Row of pill `index` inside a rail of `height` rows, or `None` when the
/// rail is too short to show it.  Pills are spaced one row apart and
/// centred vertically.
pub fn pill_row(index: usize, count: usize, height: u16) -> Option<u16> {
    if index >= count {
        return None;
    }
    let span = count * 2 - 1;
    let height = usize::from(height);
    if span > height {
        return None;
    }
    let top = (height - span) / 2;
    let from_top = count - 1 - index;
    u16::try_from(top + from_top * 2).ok()
}

impl NavRail<'_> {
    /// Render into `rail` and return hit zones.  The tooltip for a hovered
    /// pill is drawn leftward into `canvas`.
    pub fn render_and_hit(self, rail: Rect, canvas: Rect, buf: &mut Buffer) -> NavHitZones {
        let count = self.gallery.len();
        let mut zones = NavHitZones::default();
        if rail.width == 0 || count == 0 {
            return zones;
        }

        for index in 0..count {
            let Some(row) = pill_row(index, count, rail.height) else {
                continue;
            };
            let highlighted = index == self.highlighted;
            let glyph = if highlighted { PILL_HIGHLIGHTED } else { PILL };
            let width = (glyph.chars().count() as u16).min(rail.width);
            let x = rail.x + rail.width.saturating_sub(width + 1);
            let y = rail.y + row;
            buf.set_stringn(x, y, glyph, usize::from(width), Theme::pill_style(highlighted, self.viewing));
            zones.pills.push((index, Rect::new(rail.x, y, rail.width, 1)));

            if self.hovered == Some(index) {
                self.tooltip(index, x, y, canvas, buf);
            }
        }
        zones
    }

    fn tooltip(&self, index: usize, pill_x: u16, y: u16, canvas: Rect, buf: &mut Buffer) {
        let Some(item) = self.gallery.get(index) else {
            return;
        };
        let line = Line::from(vec![
            Span::styled(format!(" {} ", item.title), Theme::tooltip_style()),
            Span::styled(format!("{} ", item.category), Theme::tooltip_category_style()),
        ]);
        let width = line.width() as u16;
        let right = pill_x.saturating_sub(1);
        let x = right.saturating_sub(width).max(canvas.x);
        let max = right.saturating_sub(x);
        buf.set_line(x, y, &line, max);
    }
}
