//! Layout constants of the statement format.
//!
//! Statement lines carry no labels: amounts, dates and descriptions are told
//! apart by their position on the page and a few fixed phrases. All of those
//! assumptions live here so a layout variant only needs a config change.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Amounts starting left of this column are debits (negative)
    pub credit_column: f64,
    /// Max distance between two label columns considered the same column
    pub column_tolerance: f64,
    /// Account total line; capture group 1 is the `dd.mm.yyyy` date
    pub total_pattern: String,
    /// Lines starting with one of these end the stream (legal footer)
    pub stop_prefixes: Vec<String>,
    /// Lines starting with one of these are ignored
    pub skip_prefixes: Vec<String>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            credit_column: 500.0,
            column_tolerance: 0.0,
            total_pattern: r"^SOLDE\s+.*(\d{2}\.\d{2}\.\d{4})".to_string(),
            stop_prefixes: vec![
                "BNP PARIBAS SA : capital de".to_string(),
                "Montant de votre autorisation".to_string(),
            ],
            skip_prefixes: vec!["TOTAL DES MONTANTS".to_string()],
        }
    }
}

impl Layout {
    /// Whether two label columns belong to the same column.
    pub fn same_column(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.column_tolerance
    }

    /// Sign of an amount whose first fragment sits at `column`.
    pub fn is_debit_column(&self, column: f64) -> bool {
        column < self.credit_column
    }
}
