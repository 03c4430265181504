//! Lazy structured-field extraction with per-line memoization.
//!
//! A line is only ever decoded once: the first field lookup against an index
//! stores either the decoded record or a permanent `None` (for plain-text
//! lines and malformed JSON alike). The cache is the engine's one piece of
//! shared mutable state; it is invalidated by constructing a fresh instance
//! on file load, never by partial eviction.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::line_store::LogLine;

// ---------------------------------------------------------------------------
// FieldScalar — a single extracted field value
// ---------------------------------------------------------------------------

/// Scalar value of one structured field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldScalar {
    Str(String),
    Num(f64),
    Bool(bool),
}

impl FieldScalar {
    /// Canonical string form used for equality comparisons.
    ///
    /// Integral finite numbers render without a fractional part so a query
    /// literal like `502` equals the JSON number `502`.
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
            Self::Num(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
        }
    }

    /// Numeric view for ordering comparators. Strings are parsed leniently;
    /// booleans never coerce.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Num(n) => Some(*n),
            Self::Str(s) => s.trim().parse::<f64>().ok(),
            Self::Bool(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ParsedRecord — the structured view of one line
// ---------------------------------------------------------------------------

/// Decoded key/value view of a structured line.
///
/// Only top-level scalar members are retained; nested objects and arrays are
/// dropped (the line stays reachable through raw-text search).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedRecord {
    fields: BTreeMap<String, FieldScalar>,
}

impl ParsedRecord {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldScalar> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names and values in name order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &FieldScalar)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// ---------------------------------------------------------------------------
// decode_record — one-shot structured decode
// ---------------------------------------------------------------------------

/// Decode a raw line into a record, or `None` when the line is not
/// structured or fails to decode. Decode is only attempted when the trimmed
/// line starts with `{`.
#[must_use]
pub fn decode_record(raw: &str) -> Option<ParsedRecord> {
    let trimmed = raw.trim();
    if !trimmed.starts_with('{') {
        return None;
    }
    let value: Value = serde_json::from_str(trimmed).ok()?;
    let object = value.as_object()?;

    let mut fields = BTreeMap::new();
    for (name, member) in object {
        let scalar = match member {
            Value::String(s) => FieldScalar::Str(s.clone()),
            Value::Bool(b) => FieldScalar::Bool(*b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => FieldScalar::Num(f),
                None => continue,
            },
            Value::Null | Value::Array(_) | Value::Object(_) => continue,
        };
        fields.insert(name.clone(), scalar);
    }
    Some(ParsedRecord { fields })
}

// ---------------------------------------------------------------------------
// RecordCache — write-once-per-key memoization
// ---------------------------------------------------------------------------

/// Per-index memo of decode results, keyed by stable line index.
///
/// Entries are write-once: a decode failure is cached as a permanent `None`
/// and is never retried. Cache contents survive query changes; a file swap
/// replaces the whole instance.
#[derive(Debug, Clone, Default)]
pub struct RecordCache {
    records: HashMap<usize, Option<ParsedRecord>>,
}

impl RecordCache {
    /// Fresh, empty cache for a new file load.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The structured record for a line, decoding and memoizing on first
    /// access. `None` means (and will always mean) "no structured fields".
    pub fn record(&mut self, line: &LogLine) -> Option<&ParsedRecord> {
        self.records
            .entry(line.index)
            .or_insert_with(|| decode_record(&line.raw))
            .as_ref()
    }

    /// Number of indices decoded so far.
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.records.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
