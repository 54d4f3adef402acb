//! The 3D card stack, rasterised with `▀` half-blocks.

use glam::Vec2;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    text::{Line, Span},
};

use super::projection::{pick, project_cards, Camera, ProjectedQuad};
use super::theme::Theme;
use crate::core::gallery::{Accent, Gallery};
use crate::core::motion::CardState;
use crate::core::stage::FrameOutput;
use crate::core::texture::TextureCache;

/// Border width of the card body around the face, in texture units.
const EDGE_UV: f32 = 0.025;
/// How dark a card seen edge-on gets.
const MAX_SHADE: f32 = 0.35;

pub struct StageWidget<'a> {
    pub frame: &'a FrameOutput,
    pub gallery: &'a Gallery,
    pub textures: &'a TextureCache,
}

/// Projected card faces from the last draw, for mouse hit-testing.
#[derive(Debug, Clone, Default)]
pub struct StageHitZones {
    pub area: Rect,
    quads: Vec<ProjectedQuad>,
}

impl StageHitZones {
    /// Card under terminal cell `(column, row)`, nearest first.
    pub fn card_at(&self, column: u16, row: u16) -> Option<usize> {
        if !self.area.contains(Position::new(column, row)) {
            return None;
        }
        let p = Vec2::new(
            f32::from(column - self.area.x) + 0.5,
            f32::from(row - self.area.y) * 2.0 + 1.0,
        );
        pick(&self.quads, p)
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.area.contains(Position::new(column, row))
    }
}

impl StageWidget<'_> {
    /// Render and return hit zones for mouse interaction.
    pub fn render_and_hit(self, area: Rect, buf: &mut Buffer) -> StageHitZones {
        if area.width == 0 || area.height == 0 {
            return StageHitZones::default();
        }
        let (w, h) = (usize::from(area.width), usize::from(area.height) * 2);
        let camera = Camera::new(w as f32, h as f32);
        let quads = project_cards(&self.frame.cards, &camera);

        let mut canvas = vec![Theme::BACKDROP; w * h];
        for quad in &quads {
            self.paint_quad(quad, &mut canvas, w, h);
        }

        for row in 0..area.height {
            let yt = usize::from(row) * 2;
            for col in 0..area.width {
                let top = canvas[yt * w + usize::from(col)];
                let bottom = canvas[(yt + 1) * w + usize::from(col)];
                if let Some(cell) = buf.cell_mut(Position::new(area.x + col, area.y + row)) {
                    cell.set_char('▀')
                        .set_fg(Theme::accent(top))
                        .set_bg(Theme::accent(bottom));
                }
            }
        }

        self.label_hovered(&quads, area, buf);

        StageHitZones { area, quads }
    }

    fn paint_quad(&self, quad: &ProjectedQuad, canvas: &mut [Accent], w: usize, h: usize) {
        let Some(card) = self.frame.cards.iter().find(|c| c.index == quad.index) else {
            return;
        };
        let (min, max) = quad.bounds();
        let x0 = min.x.floor().max(0.0) as usize;
        let y0 = min.y.floor().max(0.0) as usize;
        let x1 = (max.x.ceil().max(0.0) as usize).min(w);
        let y1 = (max.y.ceil().max(0.0) as usize).min(h);
        let shade = (1.0 - quad.facing) * MAX_SHADE;
        let edge = if card.state == CardState::Hovered {
            Theme::HOVER_EDGE
        } else {
            Theme::CARD_EDGE
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let Some(uv) = quad.uv_at(p) else {
                    continue;
                };
                let on_edge = uv.x < EDGE_UV || uv.x > 1.0 - EDGE_UV || uv.y < EDGE_UV || uv.y > 1.0 - EDGE_UV;
                let colour = if on_edge {
                    edge
                } else {
                    self.textures.sample_blend(&card.material, uv.x, uv.y)
                };
                canvas[y * w + x] = colour.lerp(Accent::rgb(0, 0, 0), shade);
            }
        }
    }

    /// Title pill over the hovered card, at its projected top-left corner.
    fn label_hovered(&self, quads: &[ProjectedQuad], area: Rect, buf: &mut Buffer) {
        let Some(hovered) = self.frame.hovered else {
            return;
        };
        let (Some(quad), Some(item)) = (quads.iter().find(|q| q.index == hovered), self.gallery.get(hovered))
        else {
            return;
        };
        let anchor = quad.points[0];
        if anchor.x < 0.0 || anchor.y < 0.0 {
            return;
        }
        let col = (anchor.x as u16).min(area.width.saturating_sub(1));
        let row = ((anchor.y / 2.0) as u16).min(area.height.saturating_sub(1));
        let label = format!(" {} ", item.title);
        let line = Line::from(Span::styled(label, Theme::card_label_style()));
        buf.set_line(area.x + col, area.y + row, &line, area.width - col);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progress::tests::FakeHost;
    use crate::core::stage::{Stage, StageSettings};
    use std::time::Instant;

    fn render(stage: &mut Stage, host: &mut FakeHost, area: Rect) -> (Buffer, StageHitZones) {
        let out = stage.frame(1.0 / 30.0, Instant::now(), host);
        let textures = TextureCache::default();
        let mut buf = Buffer::empty(area);
        let hits = StageWidget {
            frame: &out,
            gallery: stage.gallery(),
            textures: &textures,
        }
        .render_and_hit(area, &mut buf);
        (buf, hits)
    }

    #[test]
    fn draws_the_focused_card_under_the_centre() {
        let mut stage = Stage::new(Gallery::demo(), StageSettings::default());
        let mut host = FakeHost::mounted(0.0, stage.stack_range());
        let area = Rect::new(0, 0, 120, 40);
        let (buf, hits) = render(&mut stage, &mut host, area);

        // Somewhere near the middle there is a card, not backdrop.
        let hit = (15..25).find_map(|row| hits.card_at(60, row));
        assert!(hit.is_some());
        let backdrop = Theme::accent(Theme::BACKDROP);
        let painted = (0..40).any(|row| buf[(60, row)].fg != backdrop);
        assert!(painted);
        // Corners stay empty.
        assert_eq!(hits.card_at(0, 0), None);
        assert_eq!(buf[(0, 0)].fg, backdrop);
        assert_eq!(hits.card_at(500, 500), None);
    }

    #[test]
    fn zero_area_is_harmless() {
        let mut stage = Stage::new(Gallery::demo(), StageSettings::default());
        let mut host = FakeHost::mounted(0.0, stage.stack_range());
        let (_, hits) = render(&mut stage, &mut host, Rect::new(0, 0, 0, 0));
        assert_eq!(hits.card_at(0, 0), None);
    }
}
