//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use ratatui::layout::Rect;

use super::scroll_host::VirtualScroll;
use crate::config::AppConfig;
use crate::core::gallery::Gallery;
use crate::core::stage::{FrameOutput, Stage};
use crate::core::texture::TextureCache;
use crate::ui::layout::AppLayout;
use crate::ui::nav_widget::NavHitZones;
use crate::ui::stage_widget::StageHitZones;

/// Top-level application state.
pub struct AppState {
    pub config: AppConfig,
    /// Mode authority and motion pipeline.
    pub stage: Stage,
    /// The scroll container the stage reads progress from.
    pub scroll: VirtualScroll,
    pub textures: TextureCache,
    /// Output of the most recent frame; what gets drawn.
    pub frame: FrameOutput,
    /// Full terminal area from the last resize.
    pub terminal_area: Rect,
    /// Card faces from the last draw, for hit-testing.
    pub stage_hits: StageHitZones,
    /// Navigation pills from the last draw.
    pub nav_hits: NavHitZones,
    /// Pill under the pointer.
    pub nav_hovered: Option<usize>,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Frame counter (drives the spinner).
    pub tick: u64,
}

impl AppState {
    pub fn new(gallery: Gallery, config: AppConfig, terminal_area: Rect) -> Self {
        let mut stage = Stage::new(gallery, config.motion.stage_settings());
        let mut scroll = VirtualScroll::new();
        stage.mount_initial(&mut scroll);
        scroll.tick(0.0);
        let frame = stage.frame(0.0, std::time::Instant::now(), &mut scroll);
        Self {
            config,
            stage,
            scroll,
            textures: TextureCache::default(),
            frame,
            terminal_area,
            stage_hits: StageHitZones::default(),
            nav_hits: NavHitZones::default(),
            nav_hovered: None,
            should_quit: false,
            status_message: None,
            tick: 0,
        }
    }

    pub fn layout(&self) -> AppLayout {
        AppLayout::from_area(self.terminal_area, self.stage.mode().is_viewing())
    }

    /// Advance one frame.  Queued remounts land before the stage samples the
    /// container, so no frame ever reads the outgoing range.
    pub fn advance(&mut self, dt: f32, now: std::time::Instant) {
        let page_rows = f32::from(self.layout().page_rows());
        self.stage.set_page_rows(page_rows, &mut self.scroll);
        self.scroll.apply_remount();
        self.frame = self.stage.frame(dt, now, &mut self.scroll);
        self.scroll.tick(dt);
        self.tick = self.tick.wrapping_add(1);
    }
}
