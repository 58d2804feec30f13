//! Turn reconstructed statement lines into records.
//!
//! Two kinds of lines matter. Account totals look like
//!
//! ```text
//! SOLDE CREDITEUR AU 31.12.2020                         1.234,56
//! ```
//!
//! and account changes may span several lines:
//!
//! ```text
//! 26.02 PRLV SEPA EDF
//!       CLIENTS PARTICULIERS
//!       ECH/260221                          42,17
//! ```
//!
//! Every line becomes a possibly partial record; lines without their own date
//! are folded into the record opened before them.

use regex::Regex;
use solde_core::{ExtractError, Layout, Record, RecordKind, Result};
use solde_ingest::Line;
use solde_ingest::lines::join_fragments;
use tracing::debug;

use crate::amount::{strip_amount, strip_date};

/// Line parser for one statement layout
#[derive(Debug, Clone)]
pub struct RecordParser {
    layout: Layout,
    total_re: Regex,
}

impl RecordParser {
    pub fn new(layout: Layout) -> Result<Self> {
        let total_re = Regex::new(&layout.total_pattern)
            .map_err(|e| ExtractError::Layout(format!("total_pattern: {e}")))?;
        if total_re.captures_len() < 2 {
            return Err(ExtractError::Layout(
                "total_pattern must capture the date in group 1".to_string(),
            ));
        }
        Ok(Self { layout, total_re })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Parse an account total line, `None` if the line is not one.
    pub fn parse_total_line(&self, line: &Line) -> Result<Option<Record>> {
        let Some(caps) = self.total_re.captures(&line.text) else {
            return Ok(None);
        };
        let Some(date) = caps.get(1) else {
            return Ok(None);
        };
        let (rest, amount) = strip_amount(&line.fragments, &self.layout)
            .ok_or_else(|| ExtractError::MalformedTotal(line.text.clone()))?;
        Ok(Some(Record::total(date.as_str(), join_fragments(rest), amount)))
    }

    /// Parse an account change line. The result may only carry some of the
    /// fields; `None` means the line is an amount summary and carries nothing.
    pub fn parse_change_line(&self, line: &Line) -> Option<Record> {
        let mut record = Record::change();
        let mut fragments = line.fragments.as_slice();
        if let Some((rest, date)) = strip_date(fragments) {
            record.date = Some(date);
            fragments = rest;
        }
        if let Some((rest, amount)) = strip_amount(fragments, &self.layout) {
            record.amount = Some(amount);
            fragments = rest;
        }
        if strip_amount(fragments, &self.layout).is_some() {
            debug!(line = %line.text, "skipping summary line");
            return None;
        }
        if let Some(first) = fragments.first() {
            record.source = join_fragments(fragments);
            record.source_column = Some(first.column);
        }
        Some(record)
    }

    /// Parse the lines of one content stream, top to bottom.
    pub fn parse_records(&self, lines: &[Line]) -> Result<Vec<Record>> {
        let mut records: Vec<Record> = Vec::new();
        for line in lines {
            if has_prefix(&line.text, &self.layout.skip_prefixes) {
                continue;
            }
            if has_prefix(&line.text, &self.layout.stop_prefixes) {
                break;
            }
            let record = match self.parse_total_line(line)? {
                Some(total) => total,
                None => match self.parse_change_line(line) {
                    Some(change) => change,
                    None => continue,
                },
            };
            if record.date.is_some() {
                records.push(record);
            } else if let Some(open) = records.last_mut() {
                self.merge(open, record);
            }
        }
        Ok(records)
    }

    /// Fold a dateless continuation record into the record it continues.
    fn merge(&self, open: &mut Record, next: Record) {
        if let Some(amount) = next.amount {
            if open.amount.is_none() {
                open.amount = Some(amount);
            }
        }
        let Some(column) = next.source_column else {
            return;
        };
        match open.source_column {
            Some(open_column) if self.layout.same_column(open_column, column) => {
                open.append_source(&next.source);
            }
            // A change opened by a bare date takes the first label it gets.
            None if open.kind == RecordKind::Change => {
                open.source = next.source;
                open.source_column = Some(column);
            }
            _ => {}
        }
    }
}

fn has_prefix(text: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|p| text.starts_with(p.as_str()))
}
