//! Scroll progress bridge: samples the host scroll container once per frame
//! and publishes a normalized `[0, 1]` value.
//!
//! The value lives in a lock-free cell with exactly one writer
//! ([`ProgressWriter`], owned by the bridge) and any number of readers
//! ([`ProgressReader`]).  The writer is deliberately not `Clone`.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use super::remap::progress_for_offset;

// ───────────────────────────────────────── host contract ─────

/// Snapshot of the host scroll container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Rows scrolled from the top.
    pub offset: f32,
    /// Total scrollable travel in rows (content height minus viewport).
    pub range: f32,
}

/// The scroll container collaborator.  Anything that can report its
/// position and animate to an absolute offset qualifies.
pub trait ScrollHost {
    /// Current metrics, or `None` while the container is not mounted.
    fn scroll_metrics(&self) -> Option<ScrollMetrics>;

    /// Smoothly animate to an absolute offset.
    fn smooth_scroll_to(&mut self, offset: f32);

    /// Replace the mounted range (mode change).  The host may apply this
    /// lazily; until it does, it keeps reporting the outgoing range.
    fn remount(&mut self, range: f32, offset: f32);
}

// ───────────────────────────────────────── cell ──────────────

/// Write half of the progress cell.
#[derive(Debug)]
pub struct ProgressWriter {
    cell: Arc<AtomicU32>,
}

impl Default for ProgressWriter {
    fn default() -> Self {
        progress_cell().0
    }
}

/// Read half of the progress cell.
#[derive(Debug, Clone)]
pub struct ProgressReader {
    cell: Arc<AtomicU32>,
}

/// Create a connected writer/reader pair starting at progress 0.
pub fn progress_cell() -> (ProgressWriter, ProgressReader) {
    let cell = Arc::new(AtomicU32::new(0f32.to_bits()));
    (
        ProgressWriter {
            cell: Arc::clone(&cell),
        },
        ProgressReader { cell },
    )
}

impl ProgressWriter {
    fn publish(&self, progress: f32) {
        self.cell.store(progress.to_bits(), Ordering::Release);
    }

    /// A reader attached to this writer's cell.
    pub fn reader(&self) -> ProgressReader {
        ProgressReader {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl ProgressReader {
    pub fn get(&self) -> f32 {
        f32::from_bits(self.cell.load(Ordering::Acquire))
    }
}

// ───────────────────────────────────────── bridge ────────────

/// Per-frame sampler from the host container into the progress cell.
#[derive(Debug, Default)]
pub struct ProgressBridge {
    writer: ProgressWriter,
}

impl ProgressBridge {
    pub fn new() -> Self {
        let (writer, _) = progress_cell();
        Self { writer }
    }

    /// Sample the host and publish.  Returns `false` (and writes nothing)
    /// when the host is unmounted or reports a zero range, so a remount
    /// never snaps progress through `0 / 0`.
    pub fn sample(&self, host: &dyn ScrollHost) -> bool {
        let Some(metrics) = host.scroll_metrics() else {
            return false;
        };
        if !metrics.offset.is_finite() || !metrics.range.is_finite() || metrics.range <= 0.0 {
            return false;
        }
        self.writer
            .publish(progress_for_offset(metrics.offset, metrics.range));
        true
    }

    /// Force a value (used when the stage resets progress on a mode change).
    pub fn reset_to(&self, progress: f32) {
        let p = if progress.is_finite() { progress.clamp(0.0, 1.0) } else { 0.0 };
        self.writer.publish(p);
    }

    pub fn reader(&self) -> ProgressReader {
        self.writer.reader()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal in-memory host for exercising consumers of [`ScrollHost`].
    #[derive(Debug, Default)]
    pub(crate) struct FakeHost {
        pub metrics: Option<ScrollMetrics>,
        pub last_scroll_to: Option<f32>,
        pub last_remount: Option<(f32, f32)>,
    }

    impl FakeHost {
        pub fn mounted(offset: f32, range: f32) -> Self {
            Self {
                metrics: Some(ScrollMetrics { offset, range }),
                ..Self::default()
            }
        }
    }

    impl ScrollHost for FakeHost {
        fn scroll_metrics(&self) -> Option<ScrollMetrics> {
            self.metrics
        }

        fn smooth_scroll_to(&mut self, offset: f32) {
            self.last_scroll_to = Some(offset);
        }

        fn remount(&mut self, range: f32, offset: f32) {
            self.last_remount = Some((range, offset));
        }
    }

    #[test]
    fn publishes_clamped_progress() {
        let bridge = ProgressBridge::new();
        let reader = bridge.reader();
        assert!(bridge.sample(&FakeHost::mounted(30.0, 120.0)));
        assert!((reader.get() - 0.25).abs() < 1e-6);

        assert!(bridge.sample(&FakeHost::mounted(500.0, 120.0)));
        assert_eq!(reader.get(), 1.0);
    }

    #[test]
    fn idles_while_host_is_unmounted() {
        let bridge = ProgressBridge::new();
        let reader = bridge.reader();
        bridge.sample(&FakeHost::mounted(60.0, 120.0));

        assert!(!bridge.sample(&FakeHost::default()));
        assert!(!bridge.sample(&FakeHost::mounted(0.0, 0.0)));
        assert!(!bridge.sample(&FakeHost::mounted(f32::NAN, 10.0)));
        assert!((reader.get() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn every_reader_sees_the_same_value() {
        let bridge = ProgressBridge::new();
        let reader = bridge.reader();
        let other = reader.clone();
        let third = bridge.reader();
        bridge.reset_to(0.75);
        assert_eq!(reader.get(), 0.75);
        assert_eq!(other.get(), 0.75);
        assert_eq!(third.get(), 0.75);

        bridge.reset_to(f32::INFINITY);
        assert_eq!(reader.get(), 0.0);
    }
}
