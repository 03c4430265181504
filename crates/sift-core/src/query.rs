//! Log query language: parsing and per-line evaluation.
//!
//! ## Syntax
//!
//! | Form             | Meaning                                          |
//! |------------------|--------------------------------------------------|
//! | `word`           | Substring match on raw text (case-insensitive)   |
//! | `field:value`    | Field equality against the decoded record        |
//! | `field:!=value`  | Field inequality (missing field satisfies it)    |
//! | `field:>n` etc.  | Numeric comparison (`>`, `>=`, `<`, `<=`)        |
//! | `NOT expr`       | Boolean negation (leading prefix)                |
//! | `a AND b`        | Conjunction                                      |
//! | `a OR b`         | Disjunction (lowest precedence)                  |
//!
//! Parsing is a fixed-priority split over the raw string: the input is split
//! on literal `" OR "` first, each side then on `" AND "`, then a leading
//! `"NOT "` is peeled, then `field:value`, and anything left is a free-text
//! leaf. `a AND b OR c` therefore groups as `Or([And([a, b]), c])`. This is
//! a deliberate quirk kept for compatibility: there is no grouping or
//! quoting, and an input that strays from the grammar degrades to a text
//! leaf rather than being refused.

use crate::line_store::LogLine;
use crate::record::RecordCache;

// ---------------------------------------------------------------------------
// Query AST
// ---------------------------------------------------------------------------

/// A parsed query expression.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryAst {
    /// Case-insensitive substring match on the raw line text.
    Text(String),
    /// Comparison against a structured field.
    Field {
        name: String,
        op: FieldOp,
        value: String,
    },
    /// All children must match.
    And(Vec<QueryAst>),
    /// At least one child must match.
    Or(Vec<QueryAst>),
    /// Child must not match.
    Not(Box<QueryAst>),
}

/// Comparator selected by the optional relational prefix on a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a query string. `None` means match-everything (blank or
/// whitespace-only input); parsing itself never fails.
#[must_use]
pub fn parse_query(input: &str) -> Option<QueryAst> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(parse_expr(trimmed))
}

fn parse_expr(text: &str) -> QueryAst {
    // Lowest precedence first: a top-level `" OR "` split makes OR the
    // outermost combinator, so AND binds tighter.
    if text.contains(" OR ") {
        let children = text
            .split(" OR ")
            .map(|part| parse_expr(part.trim()))
            .collect();
        return QueryAst::Or(children);
    }

    if text.contains(" AND ") {
        let children = text
            .split(" AND ")
            .map(|part| parse_expr(part.trim()))
            .collect();
        return QueryAst::And(children);
    }

    if let Some(rest) = text.strip_prefix("NOT ") {
        return QueryAst::Not(Box::new(parse_expr(rest.trim())));
    }

    if let Some(leaf) = parse_field_leaf(text) {
        return leaf;
    }

    QueryAst::Text(text.to_owned())
}

fn parse_field_leaf(text: &str) -> Option<QueryAst> {
    let colon = text.find(':')?;
    if colon == 0 {
        // No field name before the colon: treat the whole token as text.
        return None;
    }
    let name = text[..colon].to_owned();
    let value = &text[colon + 1..];

    let (op, literal) = if let Some(rest) = value.strip_prefix(">=") {
        (FieldOp::Gte, rest)
    } else if let Some(rest) = value.strip_prefix("<=") {
        (FieldOp::Lte, rest)
    } else if let Some(rest) = value.strip_prefix("!=") {
        (FieldOp::Neq, rest)
    } else if let Some(rest) = value.strip_prefix('>') {
        (FieldOp::Gt, rest)
    } else if let Some(rest) = value.strip_prefix('<') {
        (FieldOp::Lt, rest)
    } else {
        (FieldOp::Eq, value)
    };

    Some(QueryAst::Field {
        name,
        op,
        value: literal.to_owned(),
    })
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate a query against one line. Pure given the AST and cache contents;
/// the cache fills lazily on first field lookup per line.
pub fn evaluate(ast: &QueryAst, line: &LogLine, cache: &mut RecordCache) -> bool {
    match ast {
        QueryAst::Text(needle) => {
            let needle = needle.to_ascii_lowercase();
            line.raw.to_ascii_lowercase().contains(&needle)
        }
        QueryAst::Field { name, op, value } => eval_field(name, *op, value, line, cache),
        QueryAst::And(children) => children.iter().all(|c| evaluate(c, line, cache)),
        QueryAst::Or(children) => children.iter().any(|c| evaluate(c, line, cache)),
        QueryAst::Not(child) => !evaluate(child, line, cache),
    }
}

fn eval_field(name: &str, op: FieldOp, value: &str, line: &LogLine, cache: &mut RecordCache) -> bool {
    // A missing record or missing field resolves to false for every
    // comparator except Neq: absence satisfies "not equal".
    let actual = match cache.record(line).and_then(|record| record.get(name)) {
        Some(scalar) => scalar.clone(),
        None => return op == FieldOp::Neq,
    };

    match op {
        FieldOp::Eq => actual.canonical().eq_ignore_ascii_case(value),
        FieldOp::Neq => !actual.canonical().eq_ignore_ascii_case(value),
        FieldOp::Gt | FieldOp::Gte | FieldOp::Lt | FieldOp::Lte => {
            // Both operands must coerce to numbers; otherwise the comparison
            // is false, never an error.
            let (Some(left), Ok(right)) = (actual.as_number(), value.trim().parse::<f64>()) else {
                return false;
            };
            match op {
                FieldOp::Gt => left > right,
                FieldOp::Gte => left >= right,
                FieldOp::Lt => left < right,
                FieldOp::Lte => left <= right,
                FieldOp::Eq | FieldOp::Neq => false,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
