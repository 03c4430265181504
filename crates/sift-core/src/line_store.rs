//! In-memory line model for one loaded log file.
//!
//! A file's lines are replaced wholesale on load; the zero-based `index` of
//! a [`LogLine`] is its stable identity for the lifetime of that load and is
//! the key every downstream cache and result set is built on.

use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// LogLine — a single raw log line
// ---------------------------------------------------------------------------

/// A single raw log line with its stable position in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Zero-based position in the loaded file (stable identity).
    pub index: usize,
    /// The raw text of the line, preserved exactly as received.
    pub raw: String,
}

// ---------------------------------------------------------------------------
// LoadedFile — metadata for the current load
// ---------------------------------------------------------------------------

/// Metadata describing the file currently held by a [`LineStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedFile {
    /// Path (or logical name) the lines were fetched from.
    pub path: String,
    /// Size of the source content in bytes.
    pub byte_size: u64,
    /// Number of lines in the load.
    pub line_count: usize,
    /// When the load completed.
    pub loaded_at: DateTime<Utc>,
    /// Optional upstream hint that the file is structured (key/value lines).
    pub structured_hint: Option<bool>,
}

impl LoadedFile {
    /// Stamp metadata for a load completing now.
    #[must_use]
    pub fn stamp(
        path: &str,
        byte_size: u64,
        line_count: usize,
        structured_hint: Option<bool>,
    ) -> Self {
        Self {
            path: path.to_owned(),
            byte_size,
            line_count,
            loaded_at: Utc::now(),
            structured_hint,
        }
    }
}

// ---------------------------------------------------------------------------
// LineStore — the wholesale-replaced line container
// ---------------------------------------------------------------------------

/// Ordered container of the loaded file's lines.
///
/// There is no incremental mutation: `replace` swaps the entire contents and
/// metadata in one step, which is what keeps line indices stable for every
/// consumer between loads.
#[derive(Debug, Clone, Default)]
pub struct LineStore {
    lines: Vec<LogLine>,
    loaded: Option<LoadedFile>,
}

impl LineStore {
    /// Create an empty store (no file loaded).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the full contents with a new load, assigning fresh indices.
    pub fn replace(&mut self, file: LoadedFile, raw_lines: Vec<String>) {
        self.lines = raw_lines
            .into_iter()
            .enumerate()
            .map(|(index, raw)| LogLine { index, raw })
            .collect();
        self.loaded = Some(file);
    }

    /// Drop the current load entirely.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.loaded = None;
    }

    /// Number of lines in the current load.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no lines are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Look up a line by stable index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LogLine> {
        self.lines.get(index)
    }

    /// All lines in file order.
    #[must_use]
    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    /// Metadata for the current load, if any.
    #[must_use]
    pub fn loaded_file(&self) -> Option<&LoadedFile> {
        self.loaded.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(lines: &[&str]) -> LineStore {
        let mut store = LineStore::new();
        store.replace(
            LoadedFile::stamp("app.log", 64, lines.len(), None),
            lines.iter().map(|l| (*l).to_owned()).collect(),
        );
        store
    }

    #[test]
    fn empty_store() {
        let store = LineStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.loaded_file().is_none());
        assert!(store.get(0).is_none());
    }

    #[test]
    fn replace_assigns_sequential_indices() {
        let store = store_with(&["first", "second", "third"]);
        assert_eq!(store.len(), 3);
        for (expected, line) in store.lines().iter().enumerate() {
            assert_eq!(line.index, expected);
        }
        assert_eq!(store.get(1).map(|l| l.raw.as_str()), Some("second"));
    }

    #[test]
    fn replace_preserves_raw_text_exactly() {
        let store = store_with(&["  padded  ", "", "\ttabbed"]);
        assert_eq!(store.get(0).map(|l| l.raw.as_str()), Some("  padded  "));
        assert_eq!(store.get(1).map(|l| l.raw.as_str()), Some(""));
        assert_eq!(store.get(2).map(|l| l.raw.as_str()), Some("\ttabbed"));
    }

    #[test]
    fn replace_swaps_wholesale() {
        let mut store = LineStore::new();
        store.replace(
            LoadedFile::stamp("a.log", 10, 2, None),
            vec!["a0".to_owned(), "a1".to_owned()],
        );
        store.replace(
            LoadedFile::stamp("b.log", 5, 1, Some(true)),
            vec!["b0".to_owned()],
        );

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).map(|l| l.raw.as_str()), Some("b0"));
        let loaded = store.loaded_file();
        assert_eq!(loaded.map(|f| f.path.as_str()), Some("b.log"));
        assert_eq!(loaded.and_then(|f| f.structured_hint), Some(true));
    }

    #[test]
    fn clear_drops_lines_and_metadata() {
        let mut store = store_with(&["only"]);
        store.clear();
        assert!(store.is_empty());
        assert!(store.loaded_file().is_none());
    }

    #[test]
    fn stamp_records_counts() {
        let file = LoadedFile::stamp("big.log", 1 << 20, 4096, Some(false));
        assert_eq!(file.byte_size, 1 << 20);
        assert_eq!(file.line_count, 4096);
        assert_eq!(file.structured_hint, Some(false));
    }
}
