//! Viewer application state.
//!
//! `ViewerApp` is a pure state machine: commands go in, a render snapshot
//! comes out. Keystrokes in query-edit mode feed the engine's debounce
//! timeline; the scan itself only runs when `tick_at` observes a passed
//! deadline. No terminal types leak in here, which keeps every flow
//! testable without a TTY.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use sift_core::export::{build_match_export, default_basename, epoch_millis_now, write_text_export};
use sift_core::filter_pipeline::FilterPipeline;
use sift_core::navigation::{clamped_jump_offset, NavIntent};
use sift_core::source::LineSource;
use sift_core::virtual_window::{max_scroll, visible_window, RowWindow, ScrollState, DEFAULT_OVERSCAN};

use crate::query_hints::{suggestions, MAX_SUGGESTIONS};

// ---------------------------------------------------------------------------
// Modes and commands
// ---------------------------------------------------------------------------

/// Input mode the viewer is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewerMode {
    #[default]
    Browse,
    QueryEdit,
    JumpPrompt,
}

/// One operator action, already translated from raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerCommand {
    OpenQueryEdit,
    OpenJumpPrompt,
    /// Leave the active overlay and return to browsing.
    CloseOverlay,
    /// Character input routed to the active overlay.
    InputChar(char),
    InputBackspace,
    /// Clear the whole query (query-edit mode).
    ClearQuery,
    /// Resolve the jump prompt against the filtered set.
    SubmitJump,
    ScrollLineUp,
    ScrollLineDown,
    PageUp,
    PageDown,
    JumpTop,
    JumpBottom,
    /// Write all matched lines to the export directory.
    ExportMatches,
    Resize { viewport_rows: u16 },
    Quit,
}

// ---------------------------------------------------------------------------
// Config and snapshot
// ---------------------------------------------------------------------------

/// Geometry and export settings for the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    /// Height of one rendered row in scroll units.
    pub row_height: u32,
    /// Rows of log content visible at once.
    pub viewport_rows: u16,
    /// Extra rows materialized beyond each viewport edge.
    pub overscan: usize,
    /// Directory match exports are written to.
    pub export_dir: PathBuf,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            row_height: 1,
            viewport_rows: 40,
            overscan: DEFAULT_OVERSCAN,
            export_dir: PathBuf::from("."),
        }
    }
}

/// One materialized row: original line number plus raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRow {
    /// 1-based line number in the loaded file.
    pub line_number: usize,
    pub text: String,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub mode: ViewerMode,
    pub query_input: String,
    pub jump_input: String,
    pub file_label: String,
    pub total_count: usize,
    pub matched_count: usize,
    /// Materialized slice of the matched set, overscan included.
    pub window: RowWindow,
    /// Matched-set position of the first row actually on screen; rows
    /// between `window.start` and here are overscan and are not drawn.
    pub first_visible: usize,
    /// Rows of log content the terminal shows at once.
    pub viewport_rows: u16,
    pub rows: Vec<SnapshotRow>,
    /// A recompute is scheduled but has not fired yet.
    pub filtering_pending: bool,
    /// Zero matches under a non-blank query: hint the operator to relax it.
    pub relax_hint: bool,
    pub suggestions: Vec<String>,
    pub status_note: Option<String>,
}

// ---------------------------------------------------------------------------
// ViewerApp
// ---------------------------------------------------------------------------

/// The viewer's full mutable state.
#[derive(Debug, Default)]
pub struct ViewerApp {
    pipeline: FilterPipeline,
    scroll: ScrollState,
    mode: ViewerMode,
    jump_input: String,
    config: ViewerConfig,
    status_note: Option<String>,
    quitting: bool,
}

impl ViewerApp {
    #[must_use]
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Fetch a file through a provider and load it into the engine.
    pub fn load_path(&mut self, source: &dyn LineSource, path: &str) -> Result<(), String> {
        let payload = source
            .fetch(path)
            .map_err(|err| format!("load {path}: {err}"))?;
        self.pipeline.load(path, payload);
        let _ = self.scroll.sync_generation(self.pipeline.generation());
        Ok(())
    }

    #[must_use]
    pub fn mode(&self) -> ViewerMode {
        self.mode
    }

    #[must_use]
    pub fn quitting(&self) -> bool {
        self.quitting
    }

    #[must_use]
    pub fn pipeline(&self) -> &FilterPipeline {
        &self.pipeline
    }

    fn viewport_height(&self) -> u32 {
        u32::from(self.config.viewport_rows) * self.config.row_height
    }

    fn max_scroll_now(&self) -> u64 {
        max_scroll(
            self.pipeline.result().matched_count,
            self.config.row_height,
            self.viewport_height(),
        )
    }

    /// Apply one command. Returns `true` when the frame needs a redraw.
    pub fn apply_at(&mut self, command: ViewerCommand, now: Instant) -> bool {
        self.status_note = None;
        match command {
            ViewerCommand::Quit => {
                self.quitting = true;
                true
            }
            ViewerCommand::OpenQueryEdit => {
                self.mode = ViewerMode::QueryEdit;
                true
            }
            ViewerCommand::OpenJumpPrompt => {
                self.mode = ViewerMode::JumpPrompt;
                self.jump_input.clear();
                true
            }
            ViewerCommand::CloseOverlay => {
                self.mode = ViewerMode::Browse;
                self.jump_input.clear();
                true
            }
            ViewerCommand::InputChar(ch) => self.input_char_at(ch, now),
            ViewerCommand::InputBackspace => self.input_backspace_at(now),
            ViewerCommand::ClearQuery => {
                if self.mode == ViewerMode::QueryEdit {
                    self.pipeline.set_query_input_at("", now);
                    true
                } else {
                    false
                }
            }
            ViewerCommand::SubmitJump => self.submit_jump(),
            ViewerCommand::ScrollLineUp => self.scroll_by(-i64::from(self.config.row_height)),
            ViewerCommand::ScrollLineDown => self.scroll_by(i64::from(self.config.row_height)),
            ViewerCommand::PageUp => self.scroll_by(-i64::from(self.viewport_height())),
            ViewerCommand::PageDown => self.scroll_by(i64::from(self.viewport_height())),
            ViewerCommand::JumpTop => {
                self.scroll.scroll_to(0, self.max_scroll_now());
                true
            }
            ViewerCommand::JumpBottom => {
                let max = self.max_scroll_now();
                self.scroll.scroll_to(max, max);
                true
            }
            ViewerCommand::ExportMatches => {
                self.export_matches();
                true
            }
            ViewerCommand::Resize { viewport_rows } => {
                self.config.viewport_rows = viewport_rows.max(1);
                self.scroll
                    .scroll_to(self.scroll.offset(), self.max_scroll_now());
                true
            }
        }
    }

    fn input_char_at(&mut self, ch: char, now: Instant) -> bool {
        match self.mode {
            ViewerMode::QueryEdit => {
                let mut text = self.pipeline.query_input().to_owned();
                text.push(ch);
                self.pipeline.set_query_input_at(&text, now);
                true
            }
            ViewerMode::JumpPrompt => {
                if ch.is_ascii_digit() {
                    self.jump_input.push(ch);
                    true
                } else {
                    false
                }
            }
            ViewerMode::Browse => false,
        }
    }

    fn input_backspace_at(&mut self, now: Instant) -> bool {
        match self.mode {
            ViewerMode::QueryEdit => {
                let mut text = self.pipeline.query_input().to_owned();
                if text.pop().is_none() {
                    return false;
                }
                self.pipeline.set_query_input_at(&text, now);
                true
            }
            ViewerMode::JumpPrompt => self.jump_input.pop().is_some(),
            ViewerMode::Browse => false,
        }
    }

    fn submit_jump(&mut self) -> bool {
        if self.mode != ViewerMode::JumpPrompt {
            return false;
        }
        let line_number = self.jump_input.parse::<usize>().unwrap_or(0);
        self.mode = ViewerMode::Browse;
        self.jump_input.clear();
        self.jump_to_line(line_number);
        true
    }

    /// Scroll to a 1-based line number if the active filter retains it.
    /// A filtered-out or out-of-range target is a silent no-op.
    pub fn jump_to_line(&mut self, line_number: usize) {
        let Some(offset) = clamped_jump_offset(
            line_number,
            self.pipeline.matched_indices(),
            self.config.row_height,
            self.viewport_height(),
        ) else {
            return;
        };
        self.scroll.scroll_to(offset, self.max_scroll_now());
    }

    /// Honor a navigation intent from another subsystem. Intents for files
    /// other than the loaded one are ignored.
    pub fn handle_intent(&mut self, intent: &NavIntent) -> bool {
        let matches_load = self
            .pipeline
            .loaded_file()
            .is_some_and(|file| file.path == intent.path);
        if !matches_load {
            return false;
        }
        let before = self.scroll.offset();
        self.jump_to_line(intent.line_number);
        self.scroll.offset() != before
    }

    fn scroll_by(&mut self, delta: i64) -> bool {
        let before = self.scroll.offset();
        self.scroll.scroll_by(delta, self.max_scroll_now());
        self.scroll.offset() != before
    }

    fn export_matches(&mut self) {
        let export = build_match_export(self.pipeline.store(), self.pipeline.result());
        let path = self
            .pipeline
            .loaded_file()
            .map(|file| file.path.clone())
            .unwrap_or_default();
        let basename = default_basename(&path, epoch_millis_now());
        match write_text_export(&self.config.export_dir, &basename, &export) {
            Ok(written) => {
                self.status_note = Some(format!(
                    "exported {} lines to {}",
                    export.line_count,
                    written.display()
                ));
            }
            Err(err) => {
                self.status_note = Some(format!("export failed: {err}"));
            }
        }
    }

    /// Advance the engine's debounce timeline; reset the viewport when the
    /// published result changed. Returns `true` when a redraw is needed.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        let recomputed = self.pipeline.tick_at(now);
        let reset = self.scroll.sync_generation(self.pipeline.generation());
        recomputed || reset
    }

    /// Event-loop timeout hint from the pending debounce deadline.
    #[must_use]
    pub fn poll_timeout_at(&self, now: Instant) -> Option<Duration> {
        self.pipeline.poll_timeout_at(now)
    }

    /// Materialize the current frame.
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        let result = self.pipeline.result();
        let window = visible_window(
            self.scroll.offset(),
            result.matched_count,
            self.config.row_height,
            self.viewport_height(),
            self.config.overscan,
        );
        let rows = result.matched[window.start..window.end]
            .iter()
            .filter_map(|&index| {
                self.pipeline.line(index).map(|line| SnapshotRow {
                    line_number: index + 1,
                    text: line.raw.clone(),
                })
            })
            .collect();

        let query_input = self.pipeline.query_input().to_owned();
        let relax_hint = result.matched_count == 0 && !query_input.trim().is_empty();
        let first_visible = ((self.scroll.offset() / u64::from(self.config.row_height.max(1)))
            as usize)
            .min(result.matched_count);

        ViewSnapshot {
            mode: self.mode,
            jump_input: self.jump_input.clone(),
            file_label: self
                .pipeline
                .loaded_file()
                .map(|file| file.path.clone())
                .unwrap_or_else(|| "(no file)".to_owned()),
            total_count: result.total_count,
            matched_count: result.matched_count,
            window,
            first_visible,
            viewport_rows: self.config.viewport_rows,
            rows,
            filtering_pending: self.pipeline.recompute_pending(),
            relax_hint,
            suggestions: self.current_suggestions(&query_input),
            status_note: self.status_note.clone(),
            query_input,
        }
    }

    fn current_suggestions(&self, query_input: &str) -> Vec<String> {
        if self.mode != ViewerMode::QueryEdit || !self.pipeline.structured_affordances() {
            return Vec::new();
        }
        let token = query_input.rsplit(' ').next().unwrap_or("");
        suggestions(self.pipeline.catalog(), token, MAX_SUGGESTIONS)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
