//! Viewport virtualization math.
//!
//! Only the rows inside the visible window (plus overscan) are ever
//! materialized; the rest of the result set is represented by reserved
//! scroll height. The math is a pure function of scroll state so it can be
//! unit-tested away from any rendering surface.

/// Extra rows materialized beyond each viewport edge to mask scroll latency.
pub const DEFAULT_OVERSCAN: usize = 10;

// ---------------------------------------------------------------------------
// RowWindow — the materialized slice
// ---------------------------------------------------------------------------

/// Half-open row range `[start, end)` into the matched result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    pub start: usize,
    pub end: usize,
}

impl RowWindow {
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.end <= self.start
    }

    #[must_use]
    pub fn contains(self, position: usize) -> bool {
        position >= self.start && position < self.end
    }
}

// ---------------------------------------------------------------------------
// Pure window math
// ---------------------------------------------------------------------------

/// Compute the materialized window:
/// `clamp([floor(S/H) - O, ceil((S+V)/H) + O], 0, total_count)`.
#[must_use]
pub fn visible_window(
    scroll_offset: u64,
    total_count: usize,
    row_height: u32,
    viewport_height: u32,
    overscan: usize,
) -> RowWindow {
    if total_count == 0 || row_height == 0 {
        return RowWindow { start: 0, end: 0 };
    }
    let height = u64::from(row_height);
    let first_visible = (scroll_offset / height) as usize;
    let bottom = scroll_offset + u64::from(viewport_height);
    let last_visible = (bottom.div_ceil(height)) as usize;

    let start = first_visible.saturating_sub(overscan).min(total_count);
    let end = last_visible.saturating_add(overscan).min(total_count);
    RowWindow { start, end }
}

/// Total scroll height reserved for the full result set, independent of how
/// many rows are materialized.
#[must_use]
pub fn reserved_height(total_count: usize, row_height: u32) -> u64 {
    total_count as u64 * u64::from(row_height)
}

/// Greatest useful scroll offset: the reserved height minus one viewport,
/// floored at zero.
#[must_use]
pub fn max_scroll(total_count: usize, row_height: u32, viewport_height: u32) -> u64 {
    reserved_height(total_count, row_height).saturating_sub(u64::from(viewport_height))
}

// ---------------------------------------------------------------------------
// ScrollState — clamped offset with result-change reset
// ---------------------------------------------------------------------------

/// Scroll offset tied to a filter-result generation.
///
/// Any change to the matched set resets the offset to the top: filtering
/// never preserves scroll position relative to the prior result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    offset: u64,
    seen_generation: u64,
}

impl ScrollState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Jump to an absolute offset, clamped to `max`.
    pub fn scroll_to(&mut self, offset: u64, max: u64) {
        self.offset = offset.min(max);
    }

    /// Move by a signed delta, clamped to `[0, max]`.
    pub fn scroll_by(&mut self, delta: i64, max: u64) {
        let next = if delta.is_negative() {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.offset.saturating_add(delta.unsigned_abs())
        };
        self.offset = next.min(max);
    }

    /// Observe the current result generation; on change, reset to the top.
    /// Returns `true` when a reset happened.
    pub fn sync_generation(&mut self, generation: u64) -> bool {
        if generation == self.seen_generation {
            return false;
        }
        self.seen_generation = generation;
        self.offset = 0;
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
