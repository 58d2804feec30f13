//! Document level extraction and batch folding.

use std::path::{Path, PathBuf};

use solde_core::{ExtractError, Layout, Record, Result, Value};
use solde_ingest::{GraphNode, PageSource, PdfDocument, page_lines};
use tracing::{debug, info};

use crate::dedup::Deduplicator;
use crate::noise::filter_on_source_column;
use crate::parser::RecordParser;
use crate::reconcile::records_to_values;

/// Runs the whole extraction for one statement layout.
#[derive(Debug, Clone)]
pub struct Extractor {
    parser: RecordParser,
}

impl Extractor {
    pub fn new(layout: Layout) -> Result<Self> {
        Ok(Self {
            parser: RecordParser::new(layout)?,
        })
    }

    /// Records of one page, filtered on the page's label column.
    pub fn page_records<N: GraphNode>(&self, page: &N) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        for lines in page_lines(page)? {
            records.extend(self.parser.parse_records(&lines)?);
        }
        Ok(filter_on_source_column(records, self.parser.layout()))
    }

    /// Records of a whole document, pages in order, duplicates removed.
    pub fn document_records<D: PageSource>(&self, doc: &D) -> Result<Vec<Record>> {
        let mut dedup = Deduplicator::new();
        for index in 0..doc.page_count() {
            let page = doc.page(index)?;
            let records = self.page_records(&page)?;
            debug!(page = index + 1, records = records.len(), "page records");
            dedup.push_page(records);
        }
        Ok(dedup.into_records())
    }

    pub fn document_values<D: PageSource>(&self, doc: &D) -> Result<Vec<Value>> {
        records_to_values(self.document_records(doc)?)
    }

    /// Open a statement file and extract its balance series.
    pub fn file_values(&self, path: &Path) -> Result<Vec<Value>> {
        let doc = PdfDocument::open(path)?;
        let values = self.document_values(&doc)?;
        info!(file = %path.display(), values = values.len(), "extracted statement");
        Ok(values)
    }
}

/// Extract one statement file with the given layout.
pub fn extract_file(path: &Path, layout: &Layout) -> Result<Vec<Value>> {
    Extractor::new(layout.clone())?.file_values(path)
}

/// Values extracted from one document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentValues {
    pub path: PathBuf,
    pub values: Vec<Value>,
}

#[derive(Debug)]
pub struct DocumentFailure {
    pub path: PathBuf,
    pub error: ExtractError,
}

/// Outcome of a multi-document run. One failing document never hides the
/// others' values.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub documents: Vec<DocumentValues>,
    pub failures: Vec<DocumentFailure>,
}

impl BatchReport {
    /// Fold per-document results, keeping their order.
    pub fn fold<I>(results: I) -> Self
    where
        I: IntoIterator<Item = (PathBuf, Result<Vec<Value>>)>,
    {
        results
            .into_iter()
            .fold(Self::default(), |mut report, (path, result)| {
                match result {
                    Ok(values) => report.documents.push(DocumentValues { path, values }),
                    Err(error) => report.failures.push(DocumentFailure { path, error }),
                }
                report
            })
    }

    /// Values of every successful document, in input order.
    pub fn values(&self) -> Vec<Value> {
        self.documents.iter().flat_map(|d| d.values.iter().cloned()).collect()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn value(day: u32, v: i64) -> Value {
        Value {
            date: NaiveDate::from_ymd_opt(2021, 1, day).unwrap(),
            source: format!("OP {day}"),
            value: v,
        }
    }

    #[test]
    fn test_fold_keeps_successes_and_order() {
        let report = BatchReport::fold(vec![
            (PathBuf::from("a.pdf"), Ok(vec![value(1, 10), value(2, 20)])),
            (
                PathBuf::from("b.pdf"),
                Err(ExtractError::MissingBoundaryTotal(solde_core::Boundary::First)),
            ),
            (PathBuf::from("c.pdf"), Ok(vec![value(3, 30)])),
        ]);
        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, PathBuf::from("b.pdf"));
        let balances: Vec<i64> = report.values().iter().map(|v| v.value).collect();
        assert_eq!(balances, vec![10, 20, 30]);
        assert_eq!(report.documents[1].path, PathBuf::from("c.pdf"));
    }

    #[test]
    fn test_empty_batch_succeeds() {
        let report = BatchReport::fold(Vec::new());
        assert!(report.is_success());
        assert!(report.values().is_empty());
    }

    #[test]
    fn test_missing_file_is_a_document_failure() {
        let err = extract_file(Path::new("/nonexistent/releve.pdf"), &Layout::default()).unwrap_err();
        assert!(matches!(err, ExtractError::Document(_)));
    }

    #[test]
    fn test_invalid_layout_fails_before_opening() {
        let layout = Layout {
            total_pattern: "(".to_string(),
            ..Layout::default()
        };
        let err = extract_file(Path::new("/nonexistent/releve.pdf"), &layout).unwrap_err();
        assert!(matches!(err, ExtractError::Layout(_)));
    }
}
