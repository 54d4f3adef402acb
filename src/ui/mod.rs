//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* frame output and turns it into cells on the
//! terminal.  No file I/O happens here.

pub mod detail_widget;
pub mod layout;
pub mod nav_widget;
pub mod projection;
pub mod spinner;
pub mod stage_widget;
pub mod theme;
