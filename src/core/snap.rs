//! Snap-to-section after scrolling stops.
//!
//! A timed state machine rather than a timer callback: scroll input arms a
//! deadline, and the frame loop polls it with the current time.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapState {
    Idle,
    Armed { deadline: Instant },
}

#[derive(Debug, Clone)]
pub struct SectionSnap {
    settle: Duration,
    state: SnapState,
}

impl SectionSnap {
    /// A zero `settle` disables snapping.
    pub fn new(settle: Duration) -> Self {
        Self {
            settle,
            state: SnapState::Idle,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> SnapState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        !self.settle.is_zero()
    }

    /// Scroll input happened; (re)start the settle countdown.
    pub fn note_scroll(&mut self, now: Instant) {
        if self.is_enabled() {
            self.state = SnapState::Armed {
                deadline: now + self.settle,
            };
        }
    }

    pub fn cancel(&mut self) {
        self.state = SnapState::Idle;
    }

    /// Fires once after the deadline, returning the progress of the section
    /// nearest to `progress`, or `None` when already there.
    pub fn poll(&mut self, now: Instant, progress: f32, sections: usize) -> Option<f32> {
        let SnapState::Armed { deadline } = self.state else {
            return None;
        };
        if now < deadline {
            return None;
        }
        self.state = SnapState::Idle;
        if sections <= 1 || !progress.is_finite() {
            return None;
        }
        let last = (sections - 1) as f32;
        let nearest = (progress.clamp(0.0, 1.0) * last).round() / last;
        if (nearest - progress).abs() < 1e-3 {
            None
        } else {
            Some(nearest)
        }
    }
}
