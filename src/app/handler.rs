//! Input handling — maps key/mouse events to stage commands.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::state::AppState;
use crate::config::Action;
use crate::core::motion::InteractionMode;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent, now: Instant) {
    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    state.status_message = None;
    let step = state.config.motion.scroll_step;

    match action {
        Action::ScrollUp => scroll(state, -step, now),
        Action::ScrollDown => scroll(state, step, now),
        Action::PrevCard => step_card(state, -1, now),
        Action::NextCard => step_card(state, 1, now),
        Action::OpenFocused => {
            if state.stage.mode() == InteractionMode::Browsing {
                let focused = state.frame.focused;
                state.stage.open(focused, now, &mut state.scroll);
            }
        }
        Action::Close => {
            state.stage.close(now, &mut state.scroll);
        }
        Action::Quit => state.should_quit = true,
    }
}

fn scroll(state: &mut AppState, rows: f32, now: Instant) {
    state.scroll.scroll_by(rows);
    state.stage.note_scroll(now);
}

/// Move to the neighbouring card: a jump while browsing, a switch while
/// an item is open.
fn step_card(state: &mut AppState, delta: isize, now: Instant) {
    let count = state.stage.gallery().len();
    if count == 0 {
        return;
    }
    let current = state
        .stage
        .mode()
        .open_index()
        .unwrap_or(state.frame.focused);
    let next = current.saturating_add_signed(delta).min(count - 1);
    if next != current {
        state.stage.select(next, now, &mut state.scroll);
    }
}

/// Process a mouse event against the hit zones from the last draw.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent, now: Instant) {
    let (col, row) = (mouse.column, mouse.row);
    let step = state.config.motion.scroll_step;

    match mouse.kind {
        MouseEventKind::ScrollDown => scroll(state, step, now),
        MouseEventKind::ScrollUp => scroll(state, -step, now),
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            state.nav_hovered = state.nav_hits.pill_at(col, row);
            let card = if state.nav_hovered.is_some() {
                None
            } else {
                state.stage_hits.card_at(col, row)
            };
            state.stage.pointer_over(card);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(pill) = state.nav_hits.pill_at(col, row) {
                state.stage.select(pill, now, &mut state.scroll);
            } else if let Some(card) = state.stage_hits.card_at(col, row) {
                state.stage.click_card(card, now, &mut state.scroll);
            } else if state.stage_hits.contains(col, row) {
                state.stage.click_background(now, &mut state.scroll);
            }
        }
        _ => {}
    }
}
