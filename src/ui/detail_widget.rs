//! Detail panel: the open item's sections, one page each, scrolled by the
//! host offset.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::theme::Theme;
use crate::core::gallery::{DetailSection, GalleryItem, SectionBody};

pub struct DetailPanel<'a> {
    pub item: &'a GalleryItem,
    /// Host scroll offset in rows.
    pub offset: f32,
    /// Section currently dominating the slideshow.
    pub dominant: usize,
}

impl Widget for DetailPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::RIGHT)
            .border_style(Theme::border_style());
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width < 4 || inner.height == 0 {
            return;
        }

        let page = usize::from(inner.height);
        let width = usize::from(inner.width);
        let total = self.item.sections.len();
        let mut lines = Vec::with_capacity(page * total);
        for (i, section) in self.item.sections.iter().enumerate() {
            let mut page_lines = page_header(self.item, section, i, total, i == self.dominant);
            page_lines.extend(section_lines(section, width));
            page_lines.resize(page, Line::default());
            lines.extend(page_lines);
        }

        let offset = if self.offset.is_finite() {
            self.offset.max(0.0).round() as u16
        } else {
            0
        };
        Paragraph::new(lines).scroll((offset, 0)).render(inner, buf);
    }
}

fn page_header(
    item: &GalleryItem,
    section: &DetailSection,
    index: usize,
    total: usize,
    dominant: bool,
) -> Vec<Line<'static>> {
    let marker = if dominant { "▍" } else { " " };
    vec![
        Line::from(Span::styled(item.category.to_uppercase(), Theme::category_style())),
        Line::from(Span::styled(item.title.clone(), Theme::item_title_style())),
        Line::default(),
        Line::from(vec![
            Span::styled(marker, Theme::section_title_style(section.accent)),
            Span::styled(section.title.clone(), Theme::section_title_style(section.accent)),
            Span::styled(format!("  {}/{}", index + 1, total), Theme::page_counter_style()),
        ]),
        Line::default(),
    ]
}

/// Body of one section, wrapped to `width`.
pub fn section_lines(section: &DetailSection, width: usize) -> Vec<Line<'static>> {
    let mut lines = match &section.body {
        SectionBody::Overview { text } => overview_lines(text, width),
        SectionBody::ProblemSolution { problem, solution } => problem_solution_lines(problem, solution, width),
        SectionBody::FeatureList { intro, features } => feature_list_lines(intro.as_deref(), features, width),
    };
    if !section.tags.is_empty() {
        lines.push(Line::default());
        let tags: Vec<Span<'static>> = section
            .tags
            .iter()
            .map(|t| Span::styled(format!("#{t} "), Theme::tag_style()))
            .collect();
        lines.push(Line::from(tags));
    }
    lines
}

fn overview_lines(text: &str, width: usize) -> Vec<Line<'static>> {
    plain(wrap(text, width))
}

fn problem_solution_lines(problem: &str, solution: &str, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled("Problem", Theme::label_style()))];
    lines.extend(plain(wrap(problem, width)));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Solution", Theme::label_style())));
    lines.extend(plain(wrap(solution, width)));
    lines
}

fn feature_list_lines(intro: Option<&str>, features: &[String], width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(intro) = intro {
        lines.extend(plain(wrap(intro, width)));
        lines.push(Line::default());
    }
    for feature in features {
        let wrapped = wrap(feature, width.saturating_sub(2).max(1));
        for (i, chunk) in wrapped.into_iter().enumerate() {
            let bullet = if i == 0 { "• " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(bullet, Theme::tag_style()),
                Span::raw(chunk),
            ]));
        }
    }
    lines
}

fn plain(chunks: Vec<String>) -> Vec<Line<'static>> {
    chunks.into_iter().map(Line::from).collect()
}

/// Greedy word wrap.  Words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let mut word = word.to_string();
        while word.chars().count() > width {
            if !line.is_empty() {
                out.push(std::mem::take(&mut line));
            }
            let head: String = word.chars().take(width).collect();
            word = word.chars().skip(width).collect();
            out.push(head);
        }
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !line.is_empty() {
            out.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&word);
    }
    if !line.is_empty() {
        out.push(line);
    }
    out
}
