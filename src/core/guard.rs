//! Mode transition guard.
//!
//! When the mounted scroll range changes, the outgoing container can keep
//! publishing its old progress for a frame or two.  The guard opens a short
//! window during which readers get a fixed substitute value instead.
//!
//! Windows are identified by a monotonically increasing [`TransitionId`];
//! beginning a new one supersedes whatever window was open.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransitionId(u64);

#[derive(Debug, Clone, Copy)]
struct Window {
    id: TransitionId,
    deadline: Instant,
    substitute: f32,
}

#[derive(Debug, Clone)]
pub struct TransitionGuard {
    settle: Duration,
    next_id: u64,
    window: Option<Window>,
}

impl TransitionGuard {
    pub fn new(settle: Duration) -> Self {
        Self {
            settle,
            next_id: 0,
            window: None,
        }
    }

    /// Open a window that reports `substitute` until `now + settle`.
    pub fn begin(&mut self, substitute: f32, now: Instant) -> TransitionId {
        self.next_id += 1;
        let id = TransitionId(self.next_id);
        if let Some(prev) = self.window {
            tracing::trace!(superseded = prev.id.0, by = id.0, "transition window superseded");
        }
        self.window = Some(Window {
            id,
            deadline: now + self.settle,
            substitute: if substitute.is_finite() { substitute } else { 0.0 },
        });
        id
    }

    /// Id of the window currently holding the lock, if any.
    pub fn active(&self, now: Instant) -> Option<TransitionId> {
        self.window.filter(|w| now < w.deadline).map(|w| w.id)
    }

    pub fn is_locked(&self, now: Instant) -> bool {
        self.active(now).is_some()
    }

    /// The progress consumers should use this frame.
    pub fn filter(&self, progress: f32, now: Instant) -> f32 {
        match self.window {
            Some(w) if now < w.deadline => w.substitute,
            _ => progress,
        }
    }

    /// Drop an expired window.  Returns the id that just closed, once.
    pub fn expire(&mut self, now: Instant) -> Option<TransitionId> {
        match self.window {
            Some(w) if now >= w.deadline => {
                self.window = None;
                Some(w.id)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTLE: Duration = Duration::from_millis(100);

    #[test]
    fn substitutes_inside_the_window_only() {
        let t0 = Instant::now();
        let mut guard = TransitionGuard::new(SETTLE);
        assert_eq!(guard.filter(0.8, t0), 0.8);

        guard.begin(0.0, t0);
        assert_eq!(guard.filter(0.8, t0), 0.0);
        assert_eq!(guard.filter(0.8, t0 + Duration::from_millis(99)), 0.0);
        assert_eq!(guard.filter(0.8, t0 + SETTLE), 0.8);
    }

    #[test]
    fn newer_transition_supersedes_older() {
        let t0 = Instant::now();
        let mut guard = TransitionGuard::new(SETTLE);
        let first = guard.begin(0.0, t0);
        let second = guard.begin(0.4, t0 + Duration::from_millis(60));
        assert!(second > first);

        // Past the first deadline, still inside the second.
        let t = t0 + Duration::from_millis(130);
        assert_eq!(guard.active(t), Some(second));
        assert_eq!(guard.filter(0.9, t), 0.4);
        assert_eq!(guard.expire(t), None);

        let done = t0 + Duration::from_millis(160);
        assert!(!guard.is_locked(done));
        assert_eq!(guard.expire(done), Some(second));
        assert_eq!(guard.expire(done), None);
    }

    #[test]
    fn rapid_transitions_never_deadlock() {
        let t0 = Instant::now();
        let mut guard = TransitionGuard::new(SETTLE);
        for i in 0..50 {
            guard.begin(0.0, t0 + Duration::from_millis(i));
        }
        assert!(!guard.is_locked(t0 + Duration::from_millis(49) + SETTLE));
    }
}
