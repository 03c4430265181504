//! sift-core: interactive log query engine and virtualization math.
//!
//! The pipeline, leaf to root: raw lines land in a [`line_store::LineStore`],
//! structured fields are extracted lazily through a
//! [`record::RecordCache`], queries parse and evaluate in [`query`], a
//! bounded sample pass builds the [`field_catalog`], and the
//! [`filter_pipeline::FilterPipeline`] debounces recomputation over the
//! whole file. [`virtual_window`] turns scroll state into the materialized
//! row slice and [`navigation`] resolves jump intents against the matched
//! set. The engine performs no I/O; lines arrive through the
//! [`source::LineSource`] seam.

pub mod export;
pub mod field_catalog;
pub mod filter_pipeline;
pub mod line_store;
pub mod navigation;
pub mod query;
pub mod record;
pub mod source;
pub mod virtual_window;

pub use filter_pipeline::{FilterPipeline, FilterResult, DEBOUNCE_QUIESCENCE};
pub use line_store::{LineStore, LogLine};
pub use query::{parse_query, QueryAst};
pub use source::{LineSource, SourceError, SourcePayload};
pub use virtual_window::{visible_window, RowWindow, ScrollState, DEFAULT_OVERSCAN};
