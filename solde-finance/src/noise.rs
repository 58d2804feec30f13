//! Drop change records whose label is not in the page's label column.
//!
//! Text that only looks like an account change (headers, page furniture)
//! rarely starts in the same column as real entries, so the most common label
//! column on a page wins. Columns are compared with the layout's tolerance,
//! the same way multi-line entries are merged.

use solde_core::{Layout, Record};
use tracing::debug;

/// Most common source column. A column joins the first group it is within
/// tolerance of. On ties the group reaching the top count first wins.
pub fn dominant_column(records: &[Record], layout: &Layout) -> Option<f64> {
    let mut groups: Vec<(f64, usize)> = Vec::new();
    let mut best: Option<(f64, usize)> = None;
    for column in records.iter().filter_map(|r| r.source_column) {
        let i = match groups.iter().position(|(c, _)| layout.same_column(*c, column)) {
            Some(i) => i,
            None => {
                groups.push((column, 0));
                groups.len() - 1
            }
        };
        groups[i].1 += 1;
        let (c, n) = groups[i];
        if best.is_none_or(|(_, max)| n > max) {
            best = Some((c, n));
        }
    }
    best.map(|(column, _)| column)
}

/// Keep records without a source column and those in the dominant column.
pub fn filter_on_source_column(records: Vec<Record>, layout: &Layout) -> Vec<Record> {
    let dominant = dominant_column(&records, layout);
    let before = records.len();
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|r| match (r.source_column, dominant) {
            (None, _) => true,
            (Some(column), Some(d)) => layout.same_column(column, d),
            (Some(_), None) => false,
        })
        .collect();
    if kept.len() != before {
        debug!(dropped = before - kept.len(), ?dominant, "filtered off-column records");
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(source: &str, column: f64) -> Record {
        Record::change().with_date("01.03").with_source(source, column).with_amount(-100)
    }

    #[test]
    fn test_majority_column_kept() {
        let records = vec![
            Record::total("28.02.2021", "SOLDE AU 28.02.2021", 10_000),
            change("A", 100.0),
            change("B", 100.0),
            change("NOISE", 250.0),
            change("C", 100.0),
        ];
        let kept = filter_on_source_column(records, &Layout::default());
        let sources: Vec<&str> = kept.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(sources, vec!["SOLDE AU 28.02.2021", "A", "B", "C"]);
    }

    #[test]
    fn test_tie_goes_to_first_to_reach_count() {
        let records = vec![change("A", 250.0), change("B", 100.0), change("C", 100.0), change("D", 250.0)];
        assert_eq!(dominant_column(&records, &Layout::default()), Some(100.0));

        let records = vec![change("A", 250.0), change("B", 100.0)];
        assert_eq!(dominant_column(&records, &Layout::default()), Some(250.0));
    }

    #[test]
    fn test_column_tolerance() {
        let layout = Layout {
            column_tolerance: 0.5,
            ..Layout::default()
        };
        let records = vec![
            change("A", 80.0),
            change("B", 80.4),
            change("NOISE", 120.0),
            change("C", 79.8),
            change("NOISE", 120.0),
        ];
        assert_eq!(dominant_column(&records, &layout), Some(80.0));
        let kept = filter_on_source_column(records.clone(), &layout);
        let sources: Vec<&str> = kept.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(sources, vec!["A", "B", "C"]);

        // Exact comparison splits the label column, so the repeated noise wins.
        let kept = filter_on_source_column(records, &Layout::default());
        assert!(kept.iter().all(|r| r.source == "NOISE"));
    }

    #[test]
    fn test_records_without_column_survive() {
        let records = vec![Record::change().with_date("01.03").with_amount(5), change("A", 100.0)];
        assert_eq!(filter_on_source_column(records, &Layout::default()).len(), 2);
    }

    #[test]
    fn test_empty() {
        assert!(filter_on_source_column(Vec::new(), &Layout::default()).is_empty());
        assert_eq!(dominant_column(&[], &Layout::default()), None);
    }
}
