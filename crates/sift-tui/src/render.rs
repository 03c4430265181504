//! Plain-text frame assembly.
//!
//! Turns a [`ViewSnapshot`] into terminal rows. Pure string work so frames
//! can be asserted in tests; the runtime only prints what comes out of here.

use crate::app::{ViewSnapshot, ViewerMode};

/// Assemble the full frame: status strip, input strip, then one viewport of
/// content rows. The snapshot's rows include overscan on both sides; the
/// rows above `first_visible` are skipped so the frame starts exactly at
/// the scroll position.
#[must_use]
pub fn render_frame(snapshot: &ViewSnapshot, width: usize) -> Vec<String> {
    let content_rows = usize::from(snapshot.viewport_rows);
    let skip = snapshot.first_visible.saturating_sub(snapshot.window.start);

    let mut out = Vec::with_capacity(content_rows + 2);
    out.push(clip(&status_line(snapshot), width));
    out.push(clip(&input_line(snapshot), width));
    for row in snapshot.rows.iter().skip(skip).take(content_rows) {
        out.push(clip(&format!("{:>7}  {}", row.line_number, row.text), width));
    }
    while out.len() < content_rows + 2 {
        out.push(String::new());
    }
    out
}

/// Top strip: file, match counts, and transient state.
#[must_use]
pub fn status_line(snapshot: &ViewSnapshot) -> String {
    let mut line = format!(
        "{}  {}/{} matched",
        snapshot.file_label, snapshot.matched_count, snapshot.total_count
    );
    if snapshot.filtering_pending {
        line.push_str("  [filtering...]");
    }
    if snapshot.relax_hint {
        line.push_str("  no matches, relax the query");
    }
    if let Some(note) = &snapshot.status_note {
        line.push_str("  ");
        line.push_str(note);
    }
    line
}

/// Second strip: the active prompt, or key hints while browsing.
#[must_use]
pub fn input_line(snapshot: &ViewSnapshot) -> String {
    match snapshot.mode {
        ViewerMode::Browse => {
            if snapshot.query_input.trim().is_empty() {
                "/ query   g goto   e export   q quit".to_owned()
            } else {
                format!("query: {}   / edit   q quit", snapshot.query_input)
            }
        }
        ViewerMode::QueryEdit => {
            let mut line = format!("query> {}", snapshot.query_input);
            if !snapshot.suggestions.is_empty() {
                line.push_str("   [");
                line.push_str(&snapshot.suggestions.join(" "));
                line.push(']');
            }
            line
        }
        ViewerMode::JumpPrompt => format!("goto line> {}", snapshot.jump_input),
    }
}

fn clip(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    text.chars().take(width).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SnapshotRow;
    use sift_core::virtual_window::RowWindow;

    fn snapshot() -> ViewSnapshot {
        ViewSnapshot {
            mode: ViewerMode::Browse,
            query_input: String::new(),
            jump_input: String::new(),
            file_label: "svc.log".to_owned(),
            total_count: 100,
            matched_count: 40,
            window: RowWindow { start: 0, end: 2 },
            first_visible: 0,
            viewport_rows: 5,
            rows: vec![
                SnapshotRow {
                    line_number: 1,
                    text: "alpha".to_owned(),
                },
                SnapshotRow {
                    line_number: 6,
                    text: "beta".to_owned(),
                },
            ],
            filtering_pending: false,
            relax_hint: false,
            suggestions: Vec::new(),
            status_note: None,
        }
    }

    #[test]
    fn status_line_shows_counts() {
        assert_eq!(status_line(&snapshot()), "svc.log  40/100 matched");
    }

    #[test]
    fn status_line_flags_pending_and_relax_states() {
        let mut snap = snapshot();
        snap.filtering_pending = true;
        assert!(status_line(&snap).contains("[filtering...]"));

        snap.filtering_pending = false;
        snap.matched_count = 0;
        snap.relax_hint = true;
        assert!(status_line(&snap).contains("relax the query"));
    }

    #[test]
    fn input_line_tracks_the_mode() {
        let mut snap = snapshot();
        assert!(input_line(&snap).contains("/ query"));

        snap.mode = ViewerMode::QueryEdit;
        snap.query_input = "level:err".to_owned();
        assert_eq!(input_line(&snap), "query> level:err");

        snap.mode = ViewerMode::JumpPrompt;
        snap.jump_input = "42".to_owned();
        assert_eq!(input_line(&snap), "goto line> 42");
    }

    #[test]
    fn query_edit_appends_suggestions() {
        let mut snap = snapshot();
        snap.mode = ViewerMode::QueryEdit;
        snap.query_input = "lev".to_owned();
        snap.suggestions = vec!["level:".to_owned()];
        assert_eq!(input_line(&snap), "query> lev   [level:]");
    }

    #[test]
    fn browse_with_an_active_query_shows_it() {
        let mut snap = snapshot();
        snap.query_input = "level:error".to_owned();
        assert!(input_line(&snap).starts_with("query: level:error"));
    }

    #[test]
    fn frame_pads_to_the_content_height() {
        let frame = render_frame(&snapshot(), 80);
        assert_eq!(frame.len(), 7);
        assert!(frame[2].contains("alpha"));
        assert!(frame[3].contains("beta"));
        assert_eq!(frame[6], "");
    }

    #[test]
    fn rows_carry_right_aligned_line_numbers() {
        let frame = render_frame(&snapshot(), 80);
        assert_eq!(frame[2], "      1  alpha");
        assert_eq!(frame[3], "      6  beta");
    }

    #[test]
    fn overscan_rows_above_the_scroll_position_are_skipped() {
        let mut snap = snapshot();
        // Window materialized two rows of overscan above the visible top.
        snap.window = RowWindow { start: 3, end: 5 };
        snap.first_visible = 5;
        let frame = render_frame(&snap, 80);
        // Both materialized rows are overscan; nothing is drawn.
        assert_eq!(frame[2], "");

        snap.first_visible = 4;
        let frame = render_frame(&snap, 80);
        assert!(frame[2].contains("beta"));
    }

    #[test]
    fn frame_clips_to_the_width() {
        let frame = render_frame(&snapshot(), 10);
        assert!(frame.iter().all(|row| row.chars().count() <= 10));
    }
}
