//! Replay account changes between stated totals and date every balance.

use chrono::{Datelike, NaiveDate};
use solde_core::{Boundary, ExtractError, Record, Result, Value};
use tracing::warn;

const FULL_DATE: &str = "%d.%m.%Y";

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, FULL_DATE).map_err(|e| ExtractError::InvalidDate {
        date: text.to_string(),
        reason: e.to_string(),
    })
}

/// Date a `dd.mm` change relative to the previous entry. Changes never go
/// back in time, so a date earlier than `previous` belongs to the next year.
pub fn resolve_partial_date(partial: &str, previous: NaiveDate) -> Result<NaiveDate> {
    let date = parse_date(&format!("{partial}.{}", previous.year()))?;
    if date < previous {
        return parse_date(&format!("{partial}.{}", previous.year() + 1));
    }
    Ok(date)
}

/// Convert a document's records into its balance series.
///
/// The sequence must start and end with an account total. Changes are
/// applied to a running balance, and every intermediate total must match it.
pub fn records_to_values(records: Vec<Record>) -> Result<Vec<Value>> {
    match records.first() {
        Some(first) if first.is_total() => {}
        _ => return Err(ExtractError::MissingBoundaryTotal(Boundary::First)),
    }
    match records.last() {
        Some(last) if records.len() >= 2 && last.is_total() => {}
        _ => return Err(ExtractError::MissingBoundaryTotal(Boundary::Last)),
    }

    let mut running = records[0].amount.unwrap_or_default();
    let mut values: Vec<Value> = Vec::with_capacity(records.len());
    for record in records {
        let date = if record.is_total() {
            let stated = record
                .amount
                .ok_or_else(|| ExtractError::MalformedTotal(record.source.clone()))?;
            if stated != running {
                return Err(ExtractError::TotalMismatch {
                    line: record.source,
                    stated,
                    running,
                });
            }
            parse_date(record.date.as_deref().unwrap_or_default())?
        } else {
            let Some(previous) = values.last().map(|v| v.date) else {
                return Err(ExtractError::OrphanChange(record.source));
            };
            match record.amount {
                Some(amount) => {
                    running = running
                        .checked_add(amount)
                        .ok_or_else(|| ExtractError::AmountOverflow(record.source.clone()))?;
                }
                None => warn!(source = %record.source, "change without amount"),
            }
            let partial = record.date.as_deref().ok_or_else(|| ExtractError::InvalidDate {
                date: String::new(),
                reason: format!("change {:?} has no date", record.source),
            })?;
            resolve_partial_date(partial, previous)?
        };
        values.push(Value {
            date,
            source: record.source,
            value: running,
        });
    }
    Ok(values)
}
