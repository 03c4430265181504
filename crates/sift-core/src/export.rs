//! Export of the full matched line set.
//!
//! The filter publishes every matched index, not just the visible window,
//! precisely so "download all matches" never re-runs the scan. This module
//! assembles that text payload and writes it out.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::filter_pipeline::FilterResult;
use crate::line_store::LineStore;

/// Assembled export payload: matched raw lines in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchExport {
    pub text: String,
    pub line_count: usize,
}

/// Collect every matched raw line, newline-terminated, in original order.
#[must_use]
pub fn build_match_export(store: &LineStore, result: &FilterResult) -> MatchExport {
    let mut text = String::new();
    let mut line_count = 0;
    for &index in &result.matched {
        if let Some(line) = store.get(index) {
            text.push_str(&line.raw);
            text.push('\n');
            line_count += 1;
        }
    }
    MatchExport { text, line_count }
}

#[must_use]
pub fn epoch_millis_now() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis())
        .unwrap_or(0)
}

/// Reduce a path or label to a filename-safe slug.
#[must_use]
pub fn slugify(value: &str) -> String {
    let mut out = String::new();
    let mut pending_dash = false;
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    if out.is_empty() {
        "matches".to_owned()
    } else {
        out
    }
}

/// Default basename for an export of the given source path.
#[must_use]
pub fn default_basename(source_path: &str, epoch_ms: u128) -> String {
    format!("sift-matches-{}-{epoch_ms}", slugify(source_path))
}

/// Write the payload as `<basename>.txt` under `dir`. Returns the full path.
pub fn write_text_export(
    dir: &Path,
    basename: &str,
    export: &MatchExport,
) -> std::io::Result<PathBuf> {
    let path = dir.join(format!("{basename}.txt"));
    fs::write(&path, &export.text)?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_store::LoadedFile;

    fn store_with(lines: &[&str]) -> LineStore {
        let mut store = LineStore::new();
        store.replace(
            LoadedFile::stamp("svc.log", 0, lines.len(), None),
            lines.iter().map(|l| (*l).to_owned()).collect(),
        );
        store
    }

    fn result_for(matched: Vec<usize>, total: usize) -> FilterResult {
        let matched_count = matched.len();
        FilterResult {
            matched,
            total_count: total,
            matched_count,
        }
    }

    #[test]
    fn export_collects_matched_lines_in_order() {
        let store = store_with(&["zero", "one", "two", "three"]);
        let export = build_match_export(&store, &result_for(vec![1, 3], 4));
        assert_eq!(export.text, "one\nthree\n");
        assert_eq!(export.line_count, 2);
    }

    #[test]
    fn empty_result_exports_empty_text() {
        let store = store_with(&["a"]);
        let export = build_match_export(&store, &result_for(Vec::new(), 1));
        assert!(export.text.is_empty());
        assert_eq!(export.line_count, 0);
    }

    #[test]
    fn stale_indices_are_skipped() {
        let store = store_with(&["a"]);
        let export = build_match_export(&store, &result_for(vec![0, 9], 1));
        assert_eq!(export.text, "a\n");
        assert_eq!(export.line_count, 1);
    }

    #[test]
    fn slugify_flattens_paths() {
        assert_eq!(slugify("/var/log/app.log"), "var-log-app-log");
        assert_eq!(slugify("Already-Clean"), "already-clean");
        assert_eq!(slugify("///"), "matches");
    }

    #[test]
    fn default_basename_embeds_slug_and_epoch() {
        assert_eq!(
            default_basename("/tmp/svc.log", 1_700_000_000_000),
            "sift-matches-tmp-svc-log-1700000000000"
        );
    }

    #[test]
    fn write_text_export_creates_the_file() {
        let dir = tempfile::tempdir().ok();
        let Some(dir) = dir else {
            panic!("tempdir unavailable");
        };
        let store = store_with(&["keep me"]);
        let export = build_match_export(&store, &result_for(vec![0], 1));

        let written = write_text_export(dir.path(), "sift-matches-test-1", &export).ok();
        let Some(path) = written else {
            panic!("export write failed");
        };
        assert_eq!(
            fs::read_to_string(&path).unwrap_or_default(),
            "keep me\n"
        );
        assert!(path.ends_with("sift-matches-test-1.txt"));
    }
}
