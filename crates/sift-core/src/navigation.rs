//! Jump-to-line resolution against the filtered result set.
//!
//! Navigation intents arrive from other subsystems (search-result or
//! pattern-occurrence click-through) as 1-based line numbers. A target that
//! the active filter excludes resolves to nothing and the caller leaves the
//! scroll untouched: the jump is a silent no-op, never an error.

use crate::virtual_window::max_scroll;

/// A navigation request from another subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavIntent {
    /// File the intent refers to; intents for other files are ignored.
    pub path: String,
    /// 1-based line number in the original file.
    pub line_number: usize,
}

/// Scroll offset that brings a 1-based line number into view, or `None`
/// when the line is absent from the matched set (or the number is zero).
///
/// The matched set is strictly increasing, so position lookup is a binary
/// search over stable line indices.
#[must_use]
pub fn scroll_offset_for_line(
    line_number: usize,
    matched: &[usize],
    row_height: u32,
) -> Option<u64> {
    let target_index = line_number.checked_sub(1)?;
    let position = matched.binary_search(&target_index).ok()?;
    Some(position as u64 * u64::from(row_height))
}

/// Same lookup, clamped so the jump target never overshoots the scrollable
/// range of the current result set.
#[must_use]
pub fn clamped_jump_offset(
    line_number: usize,
    matched: &[usize],
    row_height: u32,
    viewport_height: u32,
) -> Option<u64> {
    let offset = scroll_offset_for_line(line_number, matched, row_height)?;
    Some(offset.min(max_scroll(matched.len(), row_height, viewport_height)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
