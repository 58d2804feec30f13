//! Cross-page deduplication.
//!
//! Statements repeat entries carried over to an overflow page; within one
//! document an entry with the same date, label and amount is the same entry.

use std::collections::HashSet;

use solde_core::Record;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RecordKey {
    date: Option<String>,
    source: String,
    amount: Option<i64>,
}

impl RecordKey {
    fn of(record: &Record) -> Self {
        Self {
            date: record.date.clone(),
            source: record.source.clone(),
            amount: record.amount,
        }
    }
}

/// Accumulates the pages of one document in order, keeping first occurrences.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<RecordKey>,
    records: Vec<Record>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page's records, returning how many were already known.
    pub fn push_page(&mut self, page: Vec<Record>) -> usize {
        let mut dropped = 0;
        for record in page {
            if self.seen.insert(RecordKey::of(&record)) {
                self.records.push(record);
            } else {
                dropped += 1;
            }
        }
        if dropped > 0 {
            debug!(dropped, "duplicate records");
        }
        dropped
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

/// Merge per-page record lists, dropping repeated entries.
pub fn deduplicate(pages: Vec<Vec<Record>>) -> Vec<Record> {
    let mut dedup = Deduplicator::new();
    for page in pages {
        dedup.push_page(page);
    }
    dedup.into_records()
}
