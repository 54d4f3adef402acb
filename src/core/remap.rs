//! Coordinate mapping between scroll pixels, normalized progress, and the
//! group-local stack offset.
//!
//! Three spaces are in play:
//!
//! * **scroll offset**: rows scrolled in the host container, `0..=range`.
//! * **progress**: the offset normalized to `[0, 1]`.
//! * **group y**: where the stack group sits so a given card is centred.
//!
//! Card `i` rests at `y = i * gap` inside the group, so the group has to sit
//! at `-i * gap` for that card to be on screen centre.  Progress 0 centres
//! card 0 and progress 1 centres the last card.  `edge_padding` is split
//! across both ends so the scroll range overshoots each end card slightly.

/// Guards every division by a scroll range.
pub const RANGE_EPSILON: f32 = 1e-6;

/// Stack dimensions shared by the layout and the navigation indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackGeometry {
    pub item_count: usize,
    pub gap: f32,
    pub edge_padding: f32,
}

impl StackGeometry {
    pub fn new(item_count: usize, gap: f32, edge_padding: f32) -> Self {
        Self {
            item_count,
            gap,
            edge_padding,
        }
    }

    /// Group y at progress 0.
    pub fn start_y(&self) -> f32 {
        self.edge_padding
    }

    /// Group y at progress 1.
    pub fn end_y(&self) -> f32 {
        let last = self.item_count.saturating_sub(1) as f32;
        -last * self.gap - self.edge_padding
    }

    /// Resting y of card `index` inside the group.
    pub fn stack_offset_for_index(&self, index: usize) -> f32 {
        index as f32 * self.gap
    }

    /// Affine progress → group y.
    pub fn group_y_for_progress(&self, progress: f32) -> f32 {
        let (start, end) = (self.start_y(), self.end_y());
        start + progress * (end - start)
    }

    /// Inverse of [`group_y_for_progress`](Self::group_y_for_progress) for a
    /// card slot: the progress at which card `index` is centred.
    pub fn progress_for_index(&self, index: usize) -> f32 {
        let span = self.end_y() - self.start_y();
        if span.abs() < RANGE_EPSILON {
            return 0.0;
        }
        let target_group_y = -self.stack_offset_for_index(index);
        ((target_group_y - self.start_y()) / span).clamp(0.0, 1.0)
    }

    /// Continuous (fractional) card index centred at `progress`.
    pub fn index_estimate(&self, progress: f32) -> f32 {
        if self.gap.abs() < RANGE_EPSILON {
            return 0.0;
        }
        -self.group_y_for_progress(progress) / self.gap
    }
}

/// Progress → absolute scroll offset for a container with `range` rows of
/// scrollable travel.
pub fn offset_for_progress(progress: f32, range: f32) -> f32 {
    progress.clamp(0.0, 1.0) * range.max(0.0)
}

/// Absolute scroll offset → progress.  A zero or negative range maps to 0
/// instead of dividing by zero.
pub fn progress_for_offset(offset: f32, range: f32) -> f32 {
    if !offset.is_finite() || !range.is_finite() || range <= RANGE_EPSILON {
        return 0.0;
    }
    (offset / range.max(RANGE_EPSILON)).clamp(0.0, 1.0)
}
