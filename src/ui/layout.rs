//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the navigation rail, in columns.
const RAIL_WIDTH: u16 = 6;
/// Share of the main area the detail panel takes while an item is open.
const DETAIL_PCT: u16 = 42;

/// Primary screen layout: stage, navigation rail, optional detail panel
/// and a bottom status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub stage_area: Rect,
    pub rail_area: Rect,
    /// Present only while an item is open.
    pub detail_area: Option<Rect>,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect, viewing: bool) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // stage (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let main = rows[0];
        let (detail_area, stage_and_rail) = if viewing {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(DETAIL_PCT), Constraint::Min(1)])
                .split(main);
            (Some(cols[0]), cols[1])
        } else {
            (None, main)
        };

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(RAIL_WIDTH)])
            .split(stage_and_rail);

        Self {
            stage_area: cols[0],
            rail_area: cols[1],
            detail_area,
            status_area: rows[1],
        }
    }

    /// Rows in one detail page (the panel's inner height).
    pub fn page_rows(&self) -> u16 {
        self.detail_area.map_or(self.stage_area.height, |r| r.height)
    }
}
