//! Catalog-driven query suggestions.
//!
//! Offered only for files that classify as structured; suggestions are an
//! affordance for building `field:value` terms and never affect filtering.

use sift_core::field_catalog::CatalogSummary;

/// Cap on suggestions surfaced at once.
pub const MAX_SUGGESTIONS: usize = 8;

/// Rank completions for the token under the cursor.
///
/// An empty token lists the most common fields; a bare prefix narrows the
/// field list; once a colon is present, completions come from the field's
/// sampled values. Fields rank by occurrence count, then name.
#[must_use]
pub fn suggestions(catalog: &CatalogSummary, token: &str, limit: usize) -> Vec<String> {
    match token.find(':') {
        Some(colon) => value_suggestions(catalog, &token[..colon], &token[colon + 1..], limit),
        None => field_suggestions(catalog, token, limit),
    }
}

fn field_suggestions(catalog: &CatalogSummary, prefix: &str, limit: usize) -> Vec<String> {
    let prefix = prefix.to_ascii_lowercase();
    let mut candidates: Vec<_> = catalog
        .fields()
        .filter(|info| info.name.to_ascii_lowercase().starts_with(&prefix))
        .collect();
    candidates.sort_by(|a, b| {
        b.occurrence_count
            .cmp(&a.occurrence_count)
            .then_with(|| a.name.cmp(&b.name))
    });
    candidates
        .into_iter()
        .take(limit)
        .map(|info| format!("{}:", info.name))
        .collect()
}

fn value_suggestions(
    catalog: &CatalogSummary,
    field: &str,
    value_prefix: &str,
    limit: usize,
) -> Vec<String> {
    let Some(info) = catalog.field(field) else {
        return Vec::new();
    };
    let prefix = value_prefix.to_ascii_lowercase();
    info.sample_values
        .iter()
        .filter(|value| value.to_ascii_lowercase().starts_with(&prefix))
        .take(limit)
        .map(|value| format!("{field}:{value}"))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
