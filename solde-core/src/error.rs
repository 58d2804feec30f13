//! Error taxonomy shared by every stage of the extraction pipeline.

use std::fmt;

use thiserror::Error;

pub type Result<T, E = ExtractError> = std::result::Result<T, E>;

/// Which end of a record sequence lacks its account total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    First,
    Last,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::First => f.write_str("first"),
            Boundary::Last => f.write_str("last"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("unknown stream filter: {0}")]
    UnsupportedFilter(String),

    #[error("could not tokenize stream after {parsed} instructions: {reason}")]
    Tokenize {
        reason: String,
        /// Instructions read before the failure.
        parsed: usize,
        /// Complete stream bytes, kept for inspection.
        raw: Vec<u8>,
    },

    #[error("could not parse total line: {0}")]
    MalformedTotal(String),

    #[error("{0} record of the report is not an account total")]
    MissingBoundaryTotal(Boundary),

    #[error("running total does not match account record {line:?}: {stated} != {running}")]
    TotalMismatch {
        line: String,
        stated: i64,
        running: i64,
    },

    #[error("balance overflows at {0:?}")]
    AmountOverflow(String),

    #[error("operation without an account record: {0:?}")]
    OrphanChange(String),

    #[error("invalid date {date:?}: {reason}")]
    InvalidDate { date: String, reason: String },

    #[error("invalid layout: {0}")]
    Layout(String),

    #[error("document error: {0}")]
    Document(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// Raw bytes of the stream that failed to tokenize, if any.
    pub fn raw_stream(&self) -> Option<&[u8]> {
        match self {
            ExtractError::Tokenize { raw, .. } => Some(raw),
            _ => None,
        }
    }
}
