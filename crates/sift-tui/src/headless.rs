//! One-shot filter reports for scripted use.
//!
//! `sift-tui --filter <query> <path>` runs the engine without a terminal
//! and prints a JSON summary, so shell pipelines and CI checks can reuse
//! the exact interactive semantics.

use std::time::Instant;

use serde::Serialize;

use sift_core::filter_pipeline::{FilterPipeline, DEBOUNCE_QUIESCENCE};
use sift_core::source::LineSource;

/// JSON-serializable outcome of one headless filter run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterReport {
    pub path: String,
    pub query: String,
    pub total_count: usize,
    pub matched_count: usize,
    pub structured: bool,
    /// Matched 1-based line numbers, capped at `line_number_cap`.
    pub line_numbers: Vec<usize>,
    /// True when `line_numbers` was truncated.
    pub truncated: bool,
}

/// Cap on line numbers embedded in a report.
pub const LINE_NUMBER_CAP: usize = 1_000;

/// Load `path` through the provider, apply `query`, and summarize.
pub fn filter_report(
    source: &dyn LineSource,
    path: &str,
    query: &str,
) -> Result<FilterReport, String> {
    let payload = source
        .fetch(path)
        .map_err(|err| format!("load {path}: {err}"))?;

    let mut pipeline = FilterPipeline::new();
    pipeline.load(path, payload);

    // Drive the debounce timeline to completion synchronously.
    let now = Instant::now();
    pipeline.set_query_input_at(query, now);
    let _ = pipeline.tick_at(now + DEBOUNCE_QUIESCENCE);

    let result = pipeline.result();
    let truncated = result.matched_count > LINE_NUMBER_CAP;
    Ok(FilterReport {
        path: path.to_owned(),
        query: query.to_owned(),
        total_count: result.total_count,
        matched_count: result.matched_count,
        structured: pipeline.structured_affordances(),
        line_numbers: result
            .matched
            .iter()
            .take(LINE_NUMBER_CAP)
            .map(|index| index + 1)
            .collect(),
        truncated,
    })
}

/// Render a report as pretty JSON for stdout.
pub fn report_json(report: &FilterReport) -> Result<String, String> {
    serde_json::to_string_pretty(report).map_err(|err| format!("encode report: {err}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::source::MemorySource;

    fn source() -> MemorySource {
        let mut source = MemorySource::new();
        source.insert(
            "svc.log",
            vec![
                r#"{"level":"error","status":502,"svc":"edge","host":"a","seq":0}"#.to_owned(),
                r#"{"level":"info","status":200,"svc":"edge","host":"a","seq":1}"#.to_owned(),
                "plain error text".to_owned(),
            ],
        );
        source
    }

    #[test]
    fn report_summarizes_the_filtered_set() {
        let report = filter_report(&source(), "svc.log", "level:error").unwrap_or_else(|err| {
            panic!("report failed: {err}");
        });
        assert_eq!(report.total_count, 3);
        assert_eq!(report.matched_count, 1);
        assert_eq!(report.line_numbers, vec![1]);
        assert!(!report.truncated);
        assert!(report.structured);
    }

    #[test]
    fn blank_query_reports_every_line() {
        let report = filter_report(&source(), "svc.log", "").unwrap_or_else(|err| {
            panic!("report failed: {err}");
        });
        assert_eq!(report.matched_count, 3);
        assert_eq!(report.line_numbers, vec![1, 2, 3]);
    }

    #[test]
    fn unknown_path_surfaces_the_provider_error() {
        let err = filter_report(&source(), "ghost.log", "x").err().unwrap_or_default();
        assert!(err.contains("ghost.log"));
    }

    #[test]
    fn long_results_are_capped_and_flagged() {
        let mut source = MemorySource::new();
        source.insert(
            "big.log",
            (0..LINE_NUMBER_CAP + 50).map(|i| format!("line {i}")).collect(),
        );
        let report = filter_report(&source, "big.log", "line").unwrap_or_else(|err| {
            panic!("report failed: {err}");
        });
        assert_eq!(report.matched_count, LINE_NUMBER_CAP + 50);
        assert_eq!(report.line_numbers.len(), LINE_NUMBER_CAP);
        assert!(report.truncated);
    }

    #[test]
    fn report_encodes_as_json() {
        let report = filter_report(&source(), "svc.log", "error").unwrap_or_else(|err| {
            panic!("report failed: {err}");
        });
        let json = report_json(&report).unwrap_or_default();
        assert!(json.contains("\"matched_count\": 2"));
        assert!(json.contains("\"query\": \"error\""));
    }
}
