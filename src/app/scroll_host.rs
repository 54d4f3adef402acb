//! Virtual scroll container: the terminal's stand-in for a page scroller.
//!
//! Offsets and ranges are measured in terminal rows.  Programmatic scrolls
//! ease toward their target.  A remount (new content height) is queued and
//! only reported once `apply_remount` or `tick` has run.

use crate::core::damp::Damped;
use crate::core::progress::{ScrollHost, ScrollMetrics};

/// Ease time for smooth scrolls, in seconds.
const SMOOTH_TIME: f32 = 0.12;
/// Snap to the target once closer than this many rows.
const SETTLE_ROWS: f32 = 0.05;

#[derive(Debug, Clone, Default)]
pub struct VirtualScroll {
    mounted: bool,
    range: f32,
    offset: Damped,
    target: Option<f32>,
    pending_remount: Option<(f32, f32)>,
}

impl VirtualScroll {
    /// An unmounted container; reports no metrics until the first remount
    /// has been applied.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> f32 {
        self.offset.value
    }

    #[cfg(test)]
    pub fn is_animating(&self) -> bool {
        self.target.is_some() || self.pending_remount.is_some()
    }

    /// User scroll input (wheel, arrow keys), in rows.
    pub fn scroll_by(&mut self, delta: f32) {
        if !self.mounted || !delta.is_finite() {
            return;
        }
        let base = self.target.unwrap_or(self.offset.value);
        self.target = Some(self.clamp(base + delta));
    }

    /// Apply a queued remount, if any.  Returns `true` when one was applied.
    pub fn apply_remount(&mut self) -> bool {
        let Some((range, offset)) = self.pending_remount.take() else {
            return false;
        };
        self.mounted = true;
        self.range = if range.is_finite() { range.max(0.0) } else { 0.0 };
        self.offset = Damped::new(self.clamp(offset));
        self.target = None;
        tracing::trace!(range = self.range, offset = self.offset.value, "scroll container remounted");
        true
    }

    /// Advance animations by `dt` seconds.  A queued remount takes the whole
    /// tick.
    pub fn tick(&mut self, dt: f32) {
        if self.apply_remount() {
            return;
        }
        let Some(target) = self.target else {
            return;
        };
        self.offset.step(target, SMOOTH_TIME, dt);
        if (self.offset.value - target).abs() < SETTLE_ROWS {
            self.offset.snap(target);
            self.target = None;
        }
    }

    fn clamp(&self, offset: f32) -> f32 {
        if offset.is_finite() {
            offset.clamp(0.0, self.range)
        } else {
            0.0
        }
    }
}

impl ScrollHost for VirtualScroll {
    fn scroll_metrics(&self) -> Option<ScrollMetrics> {
        self.mounted.then(|| ScrollMetrics {
            offset: self.offset.value,
            range: self.range,
        })
    }

    fn smooth_scroll_to(&mut self, offset: f32) {
        if self.mounted {
            self.target = Some(self.clamp(offset));
        }
    }

    fn remount(&mut self, range: f32, offset: f32) {
        self.pending_remount = Some((range, offset));
    }
}
