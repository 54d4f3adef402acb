//! The stage, owner of the interaction mode and the per-frame pipeline.
//!
//! Shared state has exactly one writer each:
//!
//! * scroll progress: the [`ProgressBridge`], sampled at the top of
//!   [`Stage::frame`];
//! * interaction mode and hovered card: the input methods on [`Stage`]
//!   (`hover_*`, `click_*`, `select`, `open`, `close`);
//! * card poses: [`Stage::frame`], through the [`PoseArena`].
//!
//! Everything else reads.

use std::time::{Duration, Instant};

use glam::Vec3;

use super::damp::{Damped, DampedPose, Pose, PoseArena};
use super::gallery::{CardDimensions, Gallery, GalleryItem};
use super::guard::TransitionGuard;
use super::motion::{
    rest_pose, smoothing_for, target_pose, CardState, InteractionMode, MotionTuning, TargetContext,
};
use super::navigation::{derive_active_index, jump_to, JumpTarget};
use super::progress::{ProgressBridge, ProgressReader, ScrollHost};
use super::remap::{offset_for_progress, StackGeometry};
use super::slideshow::{SlideBlend, Surface, SurfaceBlend};
use super::snap::SectionSnap;

/// Group smoothing while browsing (follows the scroll closely).
const STACK_SMOOTHING: f32 = 0.2;
/// Group smoothing while an item is open (recentres slowly).
const CENTRE_SMOOTHING: f32 = 0.5;
/// Detail page height until the first layout reports the real one.
const INITIAL_PAGE_ROWS: f32 = 24.0;

// ───────────────────────────────────────── settings ──────────

#[derive(Debug, Clone, PartialEq)]
pub struct StageSettings {
    /// Vertical distance between resting cards.
    pub gap: f32,
    /// Extra group travel past the first and last card.
    pub edge_padding: f32,
    /// Host scroll rows per card while browsing.
    pub rows_per_card: f32,
    /// Length of the mode transition guard window.
    pub guard: Duration,
    /// Delay before snapping to the nearest section; zero disables.
    pub snap: Duration,
    pub tuning: MotionTuning,
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            gap: 1.2,
            edge_padding: 0.6,
            rows_per_card: 8.0,
            guard: Duration::from_millis(100),
            snap: Duration::from_millis(350),
            tuning: MotionTuning::default(),
        }
    }
}

// ───────────────────────────────────────── frame output ──────

/// Everything the renderer needs for one card this frame.
#[derive(Debug, Clone)]
pub struct CardFrame {
    pub index: usize,
    pub state: CardState,
    /// World-space pose (stack group offset applied).
    pub pose: Pose,
    pub dimensions: CardDimensions,
    pub material: SurfaceBlend,
}

#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub mode: InteractionMode,
    /// Progress as consumers should see it (guard applied).
    pub progress: f32,
    /// Card nearest the viewport centre while browsing.
    pub focused: usize,
    pub hovered: Option<usize>,
    /// Slide blend of the open item.
    pub blend: Option<SlideBlend>,
    pub cards: Vec<CardFrame>,
}

impl FrameOutput {
    /// Index the navigation rail should highlight.
    pub fn indicator_index(&self) -> usize {
        self.mode.open_index().unwrap_or(self.focused)
    }
}

// ───────────────────────────────────────── stage ─────────────

pub struct Stage {
    gallery: Gallery,
    geometry: StackGeometry,
    settings: StageSettings,
    bridge: ProgressBridge,
    progress: ProgressReader,
    mode: InteractionMode,
    hovered: Option<usize>,
    guard: TransitionGuard,
    snap: SectionSnap,
    poses: PoseArena,
    group_y: Damped,
    /// Stack progress saved on open, restored on close.
    saved_stack_progress: f32,
    focused: usize,
    elapsed: f32,
    /// Host rows per detail page (one section per page).
    page_rows: f32,
}

impl Stage {
    pub fn new(gallery: Gallery, settings: StageSettings) -> Self {
        let geometry = StackGeometry::new(gallery.len(), settings.gap, settings.edge_padding);
        let poses = PoseArena::from_poses(
            (0..gallery.len())
                .map(|i| rest_pose(i, geometry.stack_offset_for_index(i), &settings.tuning)),
        );
        let bridge = ProgressBridge::new();
        let progress = bridge.reader();
        Self {
            group_y: Damped::new(geometry.group_y_for_progress(0.0)),
            guard: TransitionGuard::new(settings.guard),
            snap: SectionSnap::new(settings.snap),
            gallery,
            geometry,
            settings,
            bridge,
            progress,
            mode: InteractionMode::Browsing,
            hovered: None,
            poses,
            saved_stack_progress: 0.0,
            focused: 0,
            elapsed: 0.0,
            page_rows: INITIAL_PAGE_ROWS,
        }
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    #[cfg(test)]
    pub fn geometry(&self) -> &StackGeometry {
        &self.geometry
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    #[cfg(test)]
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn open_item(&self) -> Option<&GalleryItem> {
        self.mode.open_index().and_then(|i| self.gallery.get(i))
    }

    // ── scroll ranges ──────────────────────────────────────────

    /// Host scroll travel while browsing.
    pub fn stack_range(&self) -> f32 {
        let steps = self.gallery.len().saturating_sub(1).max(1) as f32;
        steps * self.settings.rows_per_card
    }

    /// Host scroll travel while item `index` is open: one page per section.
    pub fn detail_range(&self, index: usize) -> f32 {
        let sections = self.gallery.get(index).map_or(1, |i| i.sections.len());
        sections.saturating_sub(1) as f32 * self.page_rows
    }

    /// The viewport changed height.  An open item's range is remounted at
    /// the same progress.
    pub fn set_page_rows(&mut self, rows: f32, host: &mut dyn ScrollHost) {
        let rows = rows.max(1.0);
        if (rows - self.page_rows).abs() < f32::EPSILON {
            return;
        }
        self.page_rows = rows;
        if let InteractionMode::Viewing(i) = self.mode {
            let range = self.detail_range(i);
            let progress = sanitize(self.progress.get());
            host.remount(range, offset_for_progress(progress, range));
        }
    }

    /// Stack-mode host mount for the initial frame.
    pub fn mount_initial(&self, host: &mut dyn ScrollHost) {
        host.remount(self.stack_range(), 0.0);
    }

    // ── input (mode authority) ─────────────────────────────────

    pub fn hover_enter(&mut self, index: usize) {
        if self.mode == InteractionMode::Browsing && index < self.gallery.len() {
            self.hovered = Some(index);
        }
    }

    pub fn hover_leave(&mut self, index: usize) {
        if self.hovered == Some(index) {
            self.hovered = None;
        }
    }

    /// Report what the pointer is over (from hit testing).  Translates into
    /// leave/enter pairs.
    pub fn pointer_over(&mut self, index: Option<usize>) {
        if index == self.hovered {
            return;
        }
        if let Some(prev) = self.hovered {
            self.hover_leave(prev);
        }
        if let Some(next) = index {
            self.hover_enter(next);
        }
    }

    /// Click on card `index`.  Returns `true` if the mode changed.
    pub fn click_card(&mut self, index: usize, now: Instant, host: &mut dyn ScrollHost) -> bool {
        match self.mode {
            InteractionMode::Browsing => self.open(index, now, host),
            InteractionMode::Viewing(open) if open == index => self.close(now, host),
            InteractionMode::Viewing(_) => false,
        }
    }

    /// Click on empty space.
    pub fn click_background(&mut self, now: Instant, host: &mut dyn ScrollHost) -> bool {
        self.close(now, host)
    }

    /// Navigation rail selection: jump while browsing, switch while viewing.
    pub fn select(&mut self, index: usize, now: Instant, host: &mut dyn ScrollHost) -> Option<JumpTarget> {
        match self.mode {
            InteractionMode::Browsing => jump_to(index, &self.geometry, host),
            InteractionMode::Viewing(open) if open != index => {
                self.open(index, now, host);
                None
            }
            InteractionMode::Viewing(_) => None,
        }
    }

    /// Open item `index`.  Returns `true` if the mode changed.
    pub fn open(&mut self, index: usize, now: Instant, host: &mut dyn ScrollHost) -> bool {
        if index >= self.gallery.len() || self.mode == InteractionMode::Viewing(index) {
            return false;
        }
        if self.mode == InteractionMode::Browsing {
            self.saved_stack_progress = sanitize(self.guard.filter(self.progress.get(), now));
        }
        let id = self.guard.begin(0.0, now);
        self.bridge.reset_to(0.0);
        self.hovered = None;
        self.snap.cancel();
        self.mode = InteractionMode::Viewing(index);
        host.remount(self.detail_range(index), 0.0);
        tracing::info!(index, transition = ?id, saved = self.saved_stack_progress, "open item");
        true
    }

    /// Return to browsing.  Returns `true` if the mode changed.
    pub fn close(&mut self, now: Instant, host: &mut dyn ScrollHost) -> bool {
        let InteractionMode::Viewing(index) = self.mode else {
            return false;
        };
        let restore = self.saved_stack_progress;
        let id = self.guard.begin(restore, now);
        self.bridge.reset_to(restore);
        self.snap.cancel();
        self.mode = InteractionMode::Browsing;
        let range = self.stack_range();
        host.remount(range, offset_for_progress(restore, range));
        tracing::info!(index, transition = ?id, restore, "close item");
        true
    }

    /// Scroll input arrived (wheel, keys).  Arms the section snap while an
    /// item is open.
    pub fn note_scroll(&mut self, now: Instant) {
        if self.mode.is_viewing() {
            self.snap.note_scroll(now);
        }
    }

    // ── per-frame pipeline ─────────────────────────────────────

    /// The pose `index` is currently heading for.
    #[cfg(test)]
    pub fn target_for(&self, index: usize) -> Option<Pose> {
        self.gallery.get(index)?;
        let state = CardState::resolve(self.mode, self.hovered, index);
        Some(target_pose(&self.target_context(index, state), &self.settings.tuning))
    }

    fn target_context(&self, index: usize, state: CardState) -> TargetContext {
        TargetContext {
            index,
            state,
            rest_y: self.geometry.stack_offset_for_index(index),
            hovered: self.hovered,
            elapsed: self.elapsed,
        }
    }

    /// Run one frame: publish, then read, then move everything.
    pub fn frame(&mut self, dt: f32, now: Instant, host: &mut dyn ScrollHost) -> FrameOutput {
        // 1. publish
        self.bridge.sample(host);

        // 2. read (through the guard)
        let settling = self.guard.is_locked(now);
        let progress = sanitize(self.guard.filter(self.progress.get(), now));
        if let Some(id) = self.guard.expire(now) {
            tracing::trace!(transition = ?id, "transition settled");
        }

        // 3. derived values
        let mut blend = None;
        let mut active_material = None;
        let group_target = match self.mode {
            InteractionMode::Browsing => {
                self.focused = derive_active_index(progress, &self.geometry);
                self.geometry.group_y_for_progress(progress)
            }
            InteractionMode::Viewing(open) => {
                if let Some(item) = self.gallery.get(open) {
                    let (material, b) = SurfaceBlend::for_active(item, progress);
                    blend = Some(b);
                    active_material = Some(material);
                    if !settling {
                        self.poll_snap(now, progress, item.sections.len(), host);
                    }
                }
                0.0
            }
        };
        let group_smoothing = if self.mode.is_viewing() {
            CENTRE_SMOOTHING
        } else {
            STACK_SMOOTHING
        };
        self.group_y.step(group_target, group_smoothing, dt);
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }

        // 4. per-card motion
        let group_offset = Vec3::new(0.0, self.group_y.value, 0.0);
        let mut cards = Vec::with_capacity(self.gallery.len());
        for (index, item) in self.gallery.items().iter().enumerate() {
            let state = CardState::resolve(self.mode, self.hovered, index);
            let ctx = self.target_context(index, state);
            let target = target_pose(&ctx, &self.settings.tuning);
            let smoothing = smoothing_for(state, &self.settings.tuning);
            let Some(damped) = self.poses.get_mut(index) else {
                continue;
            };
            damped.step(&target, smoothing, dt);

            let mut pose = damped.current();
            pose.position += group_offset;
            if !pose.is_finite() {
                tracing::warn!(index, "non-finite pose, resetting to target");
                *damped = DampedPose::new(target);
                pose = target;
                pose.position += group_offset;
            }

            let material = match (state, &active_material) {
                (CardState::Active, Some(m)) => m.clone(),
                _ => SurfaceBlend::still(Surface::cover(item)),
            };
            cards.push(CardFrame {
                index,
                state,
                pose,
                dimensions: item.layout.dimensions(),
                material,
            });
        }

        FrameOutput {
            mode: self.mode,
            progress,
            focused: self.focused,
            hovered: self.hovered,
            blend,
            cards,
        }
    }

    fn poll_snap(&mut self, now: Instant, progress: f32, sections: usize, host: &mut dyn ScrollHost) {
        let Some(target) = self.snap.poll(now, progress, sections) else {
            return;
        };
        if let Some(metrics) = host.scroll_metrics() {
            let offset = offset_for_progress(target, metrics.range);
            tracing::debug!(target, offset, "snap to section");
            host.smooth_scroll_to(offset);
        }
    }
}

fn sanitize(progress: f32) -> f32 {
    if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progress::tests::FakeHost;
    use crate::core::progress::ScrollMetrics;

    const DT: f32 = 1.0 / 60.0;

    fn stage() -> Stage {
        Stage::new(Gallery::demo(), StageSettings::default())
    }

    fn run(stage: &mut Stage, host: &mut FakeHost, start: Instant, frames: u32) -> FrameOutput {
        let mut out = stage.frame(DT, start, host);
        for f in 1..frames {
            out = stage.frame(DT, start + Duration::from_secs_f32(DT * f as f32), host);
        }
        out
    }

    #[test]
    fn browsing_follows_the_host() {
        let mut s = stage();
        let range = s.stack_range();
        let mut host = FakeHost::mounted(range, range);
        let out = run(&mut s, &mut host, Instant::now(), 240);
        assert_eq!(out.focused, 5);
        assert!((out.progress - 1.0).abs() < 1e-6);
        // The last card settles just below centre, by the edge padding.
        let last = &out.cards[5];
        let pad = StageSettings::default().edge_padding;
        assert!((last.pose.position.y + pad).abs() < 0.05, "{:?}", last.pose.position);
    }

    #[test]
    fn opening_resets_progress_during_the_guard_window() {
        let mut s = stage();
        let t0 = Instant::now();
        let mut host = FakeHost::mounted(0.8 * s.stack_range(), s.stack_range());
        let out = s.frame(DT, t0, &mut host);
        assert!((out.progress - 0.8).abs() < 1e-4);

        assert!(s.open(2, t0, &mut host));
        assert_eq!(host.last_remount, Some((s.detail_range(2), 0.0)));

        // The host has not remounted yet and still reports the stack offset.
        let inside = s.frame(DT, t0 + Duration::from_millis(16), &mut host);
        assert_eq!(inside.progress, 0.0);
        let sections = s.gallery().get(2).unwrap().sections.len();
        assert_eq!(inside.blend, Some(SlideBlend::for_progress(0.0, sections)));
        assert_eq!(inside.cards[2].state, CardState::Active);
        assert_eq!(inside.cards[0].state, CardState::Receding);
    }

    #[test]
    fn close_restores_the_stack_position() {
        let mut s = stage();
        let t0 = Instant::now();
        let range = s.stack_range();
        let mut host = FakeHost::mounted(0.6 * range, range);
        s.frame(DT, t0, &mut host);

        s.click_card(1, t0, &mut host);
        host.metrics = Some(ScrollMetrics {
            offset: 10.0,
            range: s.detail_range(1),
        });
        let later = t0 + Duration::from_millis(500);
        s.frame(DT, later, &mut host);

        assert!(s.click_background(later, &mut host));
        let (remount_range, remount_offset) = host.last_remount.unwrap();
        assert_eq!(remount_range, range);
        assert!((remount_offset - 0.6 * range).abs() < 1e-3);
        let out = s.frame(DT, later, &mut host);
        assert!((out.progress - 0.6).abs() < 1e-4);
        assert_eq!(out.mode, InteractionMode::Browsing);
    }

    #[test]
    fn reopening_yields_the_same_active_target() {
        let mut s = stage();
        let t0 = Instant::now();
        let mut host = FakeHost::mounted(0.0, s.stack_range());

        s.open(3, t0, &mut host);
        let first = s.target_for(3).unwrap();
        let first_blend = s.frame(DT, t0, &mut host).blend;
        run(&mut s, &mut host, t0, 30);

        s.close(t0 + Duration::from_secs(1), &mut host);
        s.hover_enter(4);
        run(&mut s, &mut host, t0 + Duration::from_secs(1), 30);

        let t1 = t0 + Duration::from_secs(2);
        s.open(3, t1, &mut host);
        assert_eq!(s.target_for(3).unwrap(), first);
        assert_eq!(s.hovered(), None);
        assert_eq!(s.frame(DT, t1, &mut host).blend, first_blend);
    }

    #[test]
    fn click_rules() {
        let mut s = stage();
        let t0 = Instant::now();
        let mut host = FakeHost::mounted(0.0, s.stack_range());

        assert!(s.click_card(1, t0, &mut host));
        // A receding card ignores clicks.
        assert!(!s.click_card(4, t0, &mut host));
        assert_eq!(s.mode(), InteractionMode::Viewing(1));
        // Clicking the open card closes it.
        assert!(s.click_card(1, t0, &mut host));
        assert_eq!(s.mode(), InteractionMode::Browsing);
        assert!(!s.click_background(t0, &mut host));
        assert!(!s.open(99, t0, &mut host));
    }

    #[test]
    fn hover_is_ignored_while_viewing() {
        let mut s = stage();
        let t0 = Instant::now();
        let mut host = FakeHost::mounted(0.0, s.stack_range());
        s.pointer_over(Some(2));
        assert_eq!(s.hovered(), Some(2));
        s.pointer_over(Some(3));
        assert_eq!(s.hovered(), Some(3));

        s.open(0, t0, &mut host);
        s.pointer_over(Some(2));
        assert_eq!(s.hovered(), None);
    }

    #[test]
    fn select_jumps_while_browsing_and_switches_while_viewing() {
        let mut s = stage();
        let t0 = Instant::now();
        let mut host = FakeHost::mounted(0.0, s.stack_range());

        let jump = s.select(3, t0, &mut host).unwrap();
        assert_eq!(jump.progress, s.geometry().progress_for_index(3));
        assert_eq!(host.last_scroll_to, Some(jump.offset));

        s.open(1, t0, &mut host);
        assert!(s.select(4, t0, &mut host).is_none());
        assert_eq!(s.mode(), InteractionMode::Viewing(4));
    }

    #[test]
    fn nan_never_reaches_a_pose() {
        let mut s = stage();
        let t0 = Instant::now();
        let mut host = FakeHost::mounted(f32::NAN, f32::NAN);
        for dt in [DT, 0.0, -1.0, f32::NAN, f32::INFINITY, DT] {
            let out = s.frame(dt, t0, &mut host);
            assert!(out.progress.is_finite());
            assert!(out.cards.iter().all(|c| c.pose.is_finite()));
        }
    }

    #[test]
    fn snaps_to_the_nearest_section_after_scrolling_stops() {
        let mut s = stage();
        let t0 = Instant::now();
        let mut host = FakeHost::mounted(0.0, s.stack_range());
        s.open(0, t0, &mut host);

        let range = s.detail_range(0);
        host.metrics = Some(ScrollMetrics {
            offset: 0.4 * range,
            range,
        });
        let t1 = t0 + Duration::from_millis(200);
        s.note_scroll(t1);
        s.frame(DT, t1, &mut host);
        assert_eq!(host.last_scroll_to, None);

        s.frame(DT, t1 + Duration::from_millis(400), &mut host);
        let snapped = host.last_scroll_to.unwrap();
        assert!((snapped - 0.5 * range).abs() < 1e-3);
    }
}
