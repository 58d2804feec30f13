//! solde-finance: statement records, from text lines to a reconciled balance series

pub mod amount;
pub mod dedup;
pub mod noise;
pub mod parser;
pub mod pipeline;
pub mod reconcile;

pub use dedup::{Deduplicator, deduplicate};
pub use noise::filter_on_source_column;
pub use parser::RecordParser;
pub use pipeline::{BatchReport, DocumentFailure, DocumentValues, Extractor, extract_file};
pub use reconcile::{records_to_values, resolve_partial_date};
