//! Navigation indicator: which card is "in focus" while browsing, and the
//! jump command that scrolls a chosen card into focus.

use super::progress::ScrollHost;
use super::remap::{offset_for_progress, StackGeometry};

/// Nearest card to the viewport centre at `progress`, clamped to the stack.
pub fn derive_active_index(progress: f32, geometry: &StackGeometry) -> usize {
    if geometry.item_count == 0 {
        return 0;
    }
    let last = geometry.item_count - 1;
    let progress = if progress.is_finite() { progress } else { 0.0 };
    let estimate = geometry.index_estimate(progress).round();
    if !estimate.is_finite() || estimate <= 0.0 {
        0
    } else {
        (estimate as usize).min(last)
    }
}

/// What a jump asked the host to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpTarget {
    pub index: usize,
    pub progress: f32,
    pub offset: f32,
}

/// Command the host to smooth-scroll so card `index` is centred.
///
/// This is the one place the engine writes to the host's scroll position.
/// Returns `None` (and does nothing) while the host is not mounted.
pub fn jump_to(index: usize, geometry: &StackGeometry, host: &mut dyn ScrollHost) -> Option<JumpTarget> {
    let metrics = host.scroll_metrics()?;
    if !metrics.range.is_finite() || metrics.range <= 0.0 {
        return None;
    }
    let index = index.min(geometry.item_count.saturating_sub(1));
    let progress = geometry.progress_for_index(index);
    let offset = offset_for_progress(progress, metrics.range);
    tracing::debug!(index, progress, offset, "jump to card");
    host.smooth_scroll_to(offset);
    Some(JumpTarget {
        index,
        progress,
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progress::tests::FakeHost;
    use crate::core::progress::{ProgressBridge, ScrollMetrics};

    #[test]
    fn basic_browse_scenario() {
        let g = StackGeometry::new(5, 1.5, 0.0);
        assert_eq!(derive_active_index(0.0, &g), 0);
        assert_eq!(derive_active_index(1.0, &g), 4);
        assert_eq!(derive_active_index(0.5, &g), 2);
    }

    #[test]
    fn padding_does_not_change_the_scenario() {
        let g = StackGeometry::new(5, 1.5, 0.6);
        assert_eq!(derive_active_index(0.0, &g), 0);
        assert_eq!(derive_active_index(1.0, &g), 4);
        assert_eq!(derive_active_index(0.5, &g), 2);
    }

    #[test]
    fn never_leaves_the_stack() {
        let g = StackGeometry::new(7, 1.2, 0.6);
        for p in [-0.5f32, -10.0, 1.7, 42.0, f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let i = derive_active_index(p, &g);
            assert!(i < 7, "progress {p} gave {i}");
        }
        for step in 0..=200 {
            let p = -0.5 + step as f32 * 0.01;
            assert!(derive_active_index(p, &g) < 7);
        }
        assert_eq!(derive_active_index(0.3, &StackGeometry::new(0, 1.2, 0.6)), 0);
    }

    #[test]
    fn jump_then_read() {
        let g = StackGeometry::new(6, 1.2, 0.6);
        let mut host = FakeHost::mounted(0.0, 300.0);

        let target = jump_to(3, &g, &mut host).unwrap();
        assert_eq!(target.progress, g.progress_for_index(3));
        assert_eq!(host.last_scroll_to, Some(target.offset));

        // The host finishes its animation; the next sample agrees.
        host.metrics = Some(ScrollMetrics {
            offset: target.offset,
            range: 300.0,
        });
        let bridge = ProgressBridge::new();
        bridge.sample(&host);
        assert!((bridge.reader().get() - target.progress).abs() < 1e-4);
        assert_eq!(derive_active_index(bridge.reader().get(), &g), 3);
    }

    #[test]
    fn jump_is_a_no_op_without_a_host() {
        let g = StackGeometry::new(6, 1.2, 0.6);
        let mut host = FakeHost::default();
        assert!(jump_to(2, &g, &mut host).is_none());
        assert!(host.last_scroll_to.is_none());

        let mut flat = FakeHost::mounted(0.0, 0.0);
        assert!(jump_to(2, &g, &mut flat).is_none());
    }
}
