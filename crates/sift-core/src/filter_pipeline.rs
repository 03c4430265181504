//! Debounced filter recomputation over the loaded file.
//!
//! Keystrokes do not filter directly: each input change (re)schedules a
//! single cancellable deadline, and the full-file linear scan runs only once
//! the input has been quiescent for the debounce window. The scan is the
//! dominant latency source on large files, which is exactly why its
//! O(total lines) cost is decoupled from O(viewport) render cost downstream.
//! Consumers always observe either the previous complete result or the new
//! one, never a partially-computed set.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::field_catalog::{build_catalog, CatalogSummary};
use crate::line_store::{LineStore, LoadedFile, LogLine};
use crate::query::{evaluate, parse_query, QueryAst};
use crate::record::RecordCache;
use crate::source::SourcePayload;

/// Quiescence window between the last keystroke and the recompute.
pub const DEBOUNCE_QUIESCENCE: Duration = Duration::from_millis(300);

// ---------------------------------------------------------------------------
// FilterResult — one complete recompute
// ---------------------------------------------------------------------------

/// The outcome of one full scan: matched line indices in file order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterResult {
    /// Strictly increasing indices into the line store.
    pub matched: Vec<usize>,
    /// Lines in the file at scan time.
    pub total_count: usize,
    /// Convenience mirror of `matched.len()`.
    pub matched_count: usize,
}

/// Display summary published alongside the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub total_count: usize,
    pub matched_count: usize,
}

impl FilterResult {
    fn match_all(total_count: usize) -> Self {
        Self {
            matched: (0..total_count).collect(),
            total_count,
            matched_count: total_count,
        }
    }

    #[must_use]
    pub fn summary(&self) -> FilterSummary {
        FilterSummary {
            total_count: self.total_count,
            matched_count: self.matched_count,
        }
    }
}

/// Run one full linear scan. `None` (blank query) short-circuits to
/// all-lines without invoking the evaluator at all.
#[must_use]
pub fn run_filter(
    store: &LineStore,
    cache: &mut RecordCache,
    ast: Option<&QueryAst>,
) -> FilterResult {
    let Some(ast) = ast else {
        return FilterResult::match_all(store.len());
    };

    let mut matched = Vec::new();
    for line in store.lines() {
        if evaluate(ast, line, cache) {
            matched.push(line.index);
        }
    }
    let matched_count = matched.len();
    FilterResult {
        matched,
        total_count: store.len(),
        matched_count,
    }
}

// ---------------------------------------------------------------------------
// QueryDebounce — the single cancellable deadline
// ---------------------------------------------------------------------------

/// Cancellable scheduled recompute on one logical timeline.
///
/// `schedule` replaces any pending deadline, so two recomputations can never
/// overlap: at most one fire is pending, and `take_fire_at` consumes it.
/// All methods take an explicit `now` so behavior is testable without
/// sleeping.
#[derive(Debug, Clone)]
pub struct QueryDebounce {
    quiescence: Duration,
    deadline: Option<Instant>,
}

impl QueryDebounce {
    #[must_use]
    pub fn new(quiescence: Duration) -> Self {
        Self {
            // A zero window would fire before the event loop can observe it.
            quiescence: quiescence.max(Duration::from_millis(1)),
            deadline: None,
        }
    }

    /// Cancel any pending deadline and schedule a new one.
    pub fn schedule_at(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiescence);
    }

    /// Drop the pending deadline without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a recompute is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the deadline if it has passed. Returns `true` at most once
    /// per scheduled deadline.
    pub fn take_fire_at(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time remaining until the pending deadline, for event-loop timeouts.
    /// `None` when nothing is pending.
    #[must_use]
    pub fn due_in(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

impl Default for QueryDebounce {
    fn default() -> Self {
        Self::new(DEBOUNCE_QUIESCENCE)
    }
}

// ---------------------------------------------------------------------------
// FilterPipeline — store + cache + catalog + debounce + result
// ---------------------------------------------------------------------------

/// Owns the loaded file and everything derived from it, and orchestrates the
/// debounced recompute cycle.
#[derive(Debug, Default)]
pub struct FilterPipeline {
    store: LineStore,
    cache: RecordCache,
    catalog: CatalogSummary,
    debounce: QueryDebounce,
    query_input: String,
    active_ast: Option<QueryAst>,
    result: FilterResult,
    generation: u64,
}

impl FilterPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a file: wholesale line replacement, a fresh record cache, a new
    /// catalog, and an immediate recompute under the active query text. Any
    /// pending debounce is cancelled since the recompute below already sees
    /// the latest input.
    pub fn load(&mut self, path: &str, payload: SourcePayload) {
        let file = LoadedFile::stamp(
            path,
            payload.byte_size,
            payload.lines.len(),
            payload.structured_hint,
        );
        self.store.replace(file, payload.lines);
        self.cache = RecordCache::new();
        self.catalog = build_catalog(&self.store, &mut self.cache);
        self.debounce.cancel();
        self.recompute();
    }

    /// Record a query-input change and (re)schedule the debounce deadline.
    /// Each keystroke cancels any pending recompute by replacing it.
    pub fn set_query_input_at(&mut self, text: &str, now: Instant) {
        self.query_input = text.to_owned();
        self.debounce.schedule_at(now);
    }

    /// Fire at most one pending recompute whose deadline has passed.
    /// Returns `true` when a recompute ran.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        if !self.debounce.take_fire_at(now) {
            return false;
        }
        self.recompute();
        true
    }

    fn recompute(&mut self) {
        self.active_ast = parse_query(&self.query_input);
        let next = run_filter(&self.store, &mut self.cache, self.active_ast.as_ref());
        // The viewport resets on result changes; an identical recompute
        // (same query, unchanged file) keeps the generation stable.
        if next.matched != self.result.matched || next.total_count != self.result.total_count {
            self.generation = self.generation.wrapping_add(1);
        }
        self.result = next;
    }

    /// Event-loop timeout: time until the pending recompute is due.
    #[must_use]
    pub fn poll_timeout_at(&self, now: Instant) -> Option<Duration> {
        self.debounce.due_in(now)
    }

    /// Whether a recompute is scheduled but has not fired.
    #[must_use]
    pub fn recompute_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// The complete current result (previous one until a recompute lands).
    #[must_use]
    pub fn result(&self) -> &FilterResult {
        &self.result
    }

    /// Full matched index set, for exporters and the window manager.
    #[must_use]
    pub fn matched_indices(&self) -> &[usize] {
        &self.result.matched
    }

    /// Monotonic counter bumped whenever the published result changes.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current query text as last typed.
    #[must_use]
    pub fn query_input(&self) -> &str {
        &self.query_input
    }

    /// Line lookup by stable index.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&LogLine> {
        self.store.get(index)
    }

    /// The underlying store (read-only).
    #[must_use]
    pub fn store(&self) -> &LineStore {
        &self.store
    }

    /// Catalog from the load-time sample pass.
    #[must_use]
    pub fn catalog(&self) -> &CatalogSummary {
        &self.catalog
    }

    /// Metadata for the loaded file.
    #[must_use]
    pub fn loaded_file(&self) -> Option<&LoadedFile> {
        self.store.loaded_file()
    }

    /// Whether query-builder affordances should be offered: the upstream
    /// hint wins when present, otherwise the sampled classification.
    #[must_use]
    pub fn structured_affordances(&self) -> bool {
        self.loaded_file()
            .and_then(|file| file.structured_hint)
            .unwrap_or_else(|| self.catalog.is_structured())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
