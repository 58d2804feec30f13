//! Transaction candidates recovered from statement lines.

use serde::{Deserialize, Serialize};

/// Whether a record states the account balance or changes it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    #[serde(rename = "total")]
    Total,
    #[serde(rename = "change")]
    Change,
}

/// A parsed statement line, possibly partial.
///
/// Total records always carry an amount and a `dd.mm.yyyy` date. Change
/// records carry a `dd.mm` date once complete, but a single statement line may
/// only provide some of the fields; the missing ones are filled by merging
/// the following lines into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub kind: RecordKind,
    /// Date text as printed, format depends on `kind`
    pub date: Option<String>,
    /// Entry label, accumulated over continuation lines
    pub source: String,
    /// Horizontal position of the label, never set on totals
    pub source_column: Option<f64>,
    /// Signed amount in minor units
    pub amount: Option<i64>,
}

impl Record {
    pub fn total(date: impl Into<String>, source: impl Into<String>, amount: i64) -> Self {
        Self {
            kind: RecordKind::Total,
            date: Some(date.into()),
            source: source.into(),
            source_column: None,
            amount: Some(amount),
        }
    }

    /// An empty change record, to be filled field by field
    pub fn change() -> Self {
        Self {
            kind: RecordKind::Change,
            date: None,
            source: String::new(),
            source_column: None,
            amount: None,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>, column: f64) -> Self {
        self.source = source.into();
        self.source_column = Some(column);
        self
    }

    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn is_total(&self) -> bool {
        self.kind == RecordKind::Total
    }

    /// Append continuation text to the label.
    pub fn append_source(&mut self, more: &str) {
        if more.is_empty() {
            return;
        }
        if !self.source.is_empty() {
            self.source.push(' ');
        }
        self.source.push_str(more);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_has_no_column() {
        let r = Record::total("31.12.2020", "SOLDE AU 31.12.2020", 123_456);
        assert!(r.is_total());
        assert_eq!(r.source_column, None);
        assert_eq!(r.amount, Some(123_456));
    }

    #[test]
    fn test_append_source_joins_with_space() {
        let mut r = Record::change().with_date("05.03").with_source("PRLV SEPA", 80.0);
        r.append_source("EDF CLIENTS");
        r.append_source("");
        assert_eq!(r.source, "PRLV SEPA EDF CLIENTS");

        let mut empty = Record::change();
        empty.append_source("CARTE");
        assert_eq!(empty.source, "CARTE");
    }

    #[test]
    fn test_zero_amount_is_distinct_from_missing() {
        let r = Record::change().with_amount(0);
        assert_eq!(r.amount, Some(0));
        assert_eq!(Record::change().amount, None);
    }
}
