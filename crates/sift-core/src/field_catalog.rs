//! Per-file field catalog inferred from a bounded sample pass.
//!
//! The catalog drives query-builder affordances (field and value
//! suggestions) only; it never affects filtering correctness. It is built
//! once per file load over a bounded prefix so huge files stay cheap, and is
//! never incrementally merged.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::line_store::LineStore;
use crate::record::{FieldScalar, RecordCache};

/// Sample pass upper bound: the catalog never reads past this many lines.
pub const CATALOG_SAMPLE_LIMIT: usize = 1_000;

/// Per-field cap on deduplicated sample values.
pub const MAX_SAMPLE_VALUES: usize = 20;

/// Structured-line ratio above which a sampled file counts as structured.
pub const STRUCTURED_RATIO_THRESHOLD: f64 = 0.2;

/// Distinct field names required beyond the ratio test (a "handful").
pub const STRUCTURED_MIN_FIELDS: usize = 4;

// ---------------------------------------------------------------------------
// FieldInfo — inferred schema for one field
// ---------------------------------------------------------------------------

/// Inferred scalar type of a field across the sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldType {
    String,
    Number,
    Boolean,
}

/// Inferred schema entry for a single field name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldInfo {
    pub name: String,
    pub inferred_type: FieldType,
    /// How many sampled lines carried this field.
    pub occurrence_count: usize,
    /// Deduplicated canonical values in first-seen order, capped at
    /// [`MAX_SAMPLE_VALUES`].
    pub sample_values: Vec<String>,
}

// ---------------------------------------------------------------------------
// CatalogSummary — the per-load catalog plus classification
// ---------------------------------------------------------------------------

/// Catalog built by one sample pass, with the structured classification.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogSummary {
    fields: BTreeMap<String, FieldInfo>,
    sampled_lines: usize,
    structured_lines: usize,
}

impl CatalogSummary {
    /// Schema entry for a field name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.get(name)
    }

    /// All entries in field-name order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldInfo> {
        self.fields.values()
    }

    /// Number of distinct field names seen in the sample.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Lines examined by the sample pass.
    #[must_use]
    pub fn sampled_lines(&self) -> usize {
        self.sampled_lines
    }

    /// Sampled lines that decoded to a structured record.
    #[must_use]
    pub fn structured_lines(&self) -> usize {
        self.structured_lines
    }

    /// Fraction of sampled lines that were structured.
    #[must_use]
    pub fn structured_ratio(&self) -> f64 {
        if self.sampled_lines == 0 {
            return 0.0;
        }
        self.structured_lines as f64 / self.sampled_lines as f64
    }

    /// Whether the sampled file classifies as structured: the ratio clears
    /// [`STRUCTURED_RATIO_THRESHOLD`] and more than [`STRUCTURED_MIN_FIELDS`]
    /// distinct fields were seen. Gates suggestion affordances only.
    #[must_use]
    pub fn is_structured(&self) -> bool {
        self.structured_ratio() > STRUCTURED_RATIO_THRESHOLD
            && self.fields.len() > STRUCTURED_MIN_FIELDS
    }
}

// ---------------------------------------------------------------------------
// build_catalog — the one sample pass per load
// ---------------------------------------------------------------------------

struct FieldStats {
    occurrences: usize,
    str_count: usize,
    num_count: usize,
    bool_count: usize,
    samples: Vec<String>,
}

impl FieldStats {
    fn new() -> Self {
        Self {
            occurrences: 0,
            str_count: 0,
            num_count: 0,
            bool_count: 0,
            samples: Vec::new(),
        }
    }

    fn observe(&mut self, value: &FieldScalar) {
        self.occurrences += 1;
        match value {
            FieldScalar::Str(_) => self.str_count += 1,
            FieldScalar::Num(_) => self.num_count += 1,
            FieldScalar::Bool(_) => self.bool_count += 1,
        }
        let canonical = value.canonical();
        if self.samples.len() < MAX_SAMPLE_VALUES && !self.samples.contains(&canonical) {
            self.samples.push(canonical);
        }
    }

    /// Most frequent scalar type; ties break String > Number > Boolean.
    fn inferred_type(&self) -> FieldType {
        if self.str_count >= self.num_count && self.str_count >= self.bool_count {
            FieldType::String
        } else if self.num_count >= self.bool_count {
            FieldType::Number
        } else {
            FieldType::Boolean
        }
    }
}

/// Build the catalog for the current load by sampling a bounded prefix
/// (`min(CATALOG_SAMPLE_LIMIT, line_count)` lines). Warms the record cache
/// for the sampled prefix as a side effect.
#[must_use]
pub fn build_catalog(store: &LineStore, cache: &mut RecordCache) -> CatalogSummary {
    let sample_size = store.len().min(CATALOG_SAMPLE_LIMIT);
    let mut stats: BTreeMap<String, FieldStats> = BTreeMap::new();
    let mut structured_lines = 0;

    for line in &store.lines()[..sample_size] {
        let Some(record) = cache.record(line) else {
            continue;
        };
        structured_lines += 1;
        for (name, value) in record.entries() {
            stats
                .entry(name.to_owned())
                .or_insert_with(FieldStats::new)
                .observe(value);
        }
    }

    let fields = stats
        .into_iter()
        .map(|(name, field_stats)| {
            let info = FieldInfo {
                name: name.clone(),
                inferred_type: field_stats.inferred_type(),
                occurrence_count: field_stats.occurrences,
                sample_values: field_stats.samples,
            };
            (name, info)
        })
        .collect();

    CatalogSummary {
        fields,
        sampled_lines: sample_size,
        structured_lines,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_store::LoadedFile;

    fn store_of(lines: Vec<String>) -> LineStore {
        let mut store = LineStore::new();
        let count = lines.len();
        store.replace(LoadedFile::stamp("sample.log", 0, count, None), lines);
        store
    }

    fn catalog_of(lines: Vec<String>) -> CatalogSummary {
        let store = store_of(lines);
        let mut cache = RecordCache::new();
        build_catalog(&store, &mut cache)
    }

    #[test]
    fn empty_store_yields_empty_catalog() {
        let summary = catalog_of(Vec::new());
        assert_eq!(summary.field_count(), 0);
        assert_eq!(summary.sampled_lines(), 0);
        assert!(!summary.is_structured());
    }

    #[test]
    fn sample_pass_is_bounded_by_the_limit() {
        let lines: Vec<String> = (0..CATALOG_SAMPLE_LIMIT + 500)
            .map(|i| format!(r#"{{"seq":{i}}}"#))
            .collect();
        let summary = catalog_of(lines);
        assert_eq!(summary.sampled_lines(), CATALOG_SAMPLE_LIMIT);
        assert_eq!(summary.structured_lines(), CATALOG_SAMPLE_LIMIT);
    }

    #[test]
    fn occurrence_counts_and_types_are_inferred() {
        let summary = catalog_of(vec![
            r#"{"level":"info","status":200}"#.to_owned(),
            r#"{"level":"warn","status":502,"cached":false}"#.to_owned(),
            "plain line".to_owned(),
        ]);

        let level = summary.field("level");
        assert_eq!(level.map(|f| f.occurrence_count), Some(2));
        assert_eq!(level.map(|f| f.inferred_type), Some(FieldType::String));

        let status = summary.field("status");
        assert_eq!(status.map(|f| f.inferred_type), Some(FieldType::Number));

        let cached = summary.field("cached");
        assert_eq!(cached.map(|f| f.inferred_type), Some(FieldType::Boolean));
    }

    #[test]
    fn mixed_type_fields_pick_the_most_frequent() {
        let summary = catalog_of(vec![
            r#"{"port":8080}"#.to_owned(),
            r#"{"port":9090}"#.to_owned(),
            r#"{"port":"disabled"}"#.to_owned(),
        ]);
        assert_eq!(
            summary.field("port").map(|f| f.inferred_type),
            Some(FieldType::Number)
        );
    }

    #[test]
    fn type_tie_breaks_toward_string() {
        let summary = catalog_of(vec![
            r#"{"mode":"fast"}"#.to_owned(),
            r#"{"mode":2}"#.to_owned(),
        ]);
        assert_eq!(
            summary.field("mode").map(|f| f.inferred_type),
            Some(FieldType::String)
        );
    }

    #[test]
    fn sample_values_deduplicate_and_cap() {
        let mut lines: Vec<String> = (0..30).map(|i| format!(r#"{{"code":{i}}}"#)).collect();
        lines.push(r#"{"code":0}"#.to_owned());
        let summary = catalog_of(lines);

        let samples = summary
            .field("code")
            .map(|f| f.sample_values.clone())
            .unwrap_or_default();
        assert_eq!(samples.len(), MAX_SAMPLE_VALUES);
        // First-seen order, duplicate "0" not re-added.
        assert_eq!(samples.first().map(String::as_str), Some("0"));
        assert_eq!(samples.iter().filter(|v| v.as_str() == "0").count(), 1);
    }

    #[test]
    fn structured_classification_needs_ratio_and_field_variety() {
        // High ratio but only two distinct fields: not structured.
        let summary = catalog_of(vec![
            r#"{"a":1,"b":2}"#.to_owned(),
            r#"{"a":3,"b":4}"#.to_owned(),
        ]);
        assert!(summary.structured_ratio() > STRUCTURED_RATIO_THRESHOLD);
        assert!(!summary.is_structured());

        // Five distinct fields and all lines structured: structured.
        let summary = catalog_of(vec![
            r#"{"a":1,"b":2,"c":3,"d":4,"e":5}"#.to_owned(),
        ]);
        assert!(summary.is_structured());
    }

    #[test]
    fn mostly_plain_files_are_not_structured() {
        let mut lines: Vec<String> = (0..9).map(|i| format!("plain {i}")).collect();
        lines.push(r#"{"a":1,"b":2,"c":3,"d":4,"e":5}"#.to_owned());
        let summary = catalog_of(lines);
        assert!((summary.structured_ratio() - 0.1).abs() < f64::EPSILON);
        assert!(!summary.is_structured());
    }

    #[test]
    fn decode_failures_do_not_count_as_structured() {
        let summary = catalog_of(vec![
            "{broken".to_owned(),
            r#"{"ok":1}"#.to_owned(),
        ]);
        assert_eq!(summary.structured_lines(), 1);
    }
}
