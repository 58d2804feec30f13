//! Fragment level grammar for dates and amounts.
//!
//! Statement text is shown in small pieces, so `1.234,56` arrives as the five
//! fragments `1` `.` `234` `,` `56` and `13.06` as `13` `.` `06`.

use solde_core::Layout;
use solde_ingest::Fragment;

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Strip a trailing amount like `123,45` or `12.345,67`.
///
/// Returns the remaining fragments and the amount in minor units, negative
/// when its first fragment sits in the debit column.
pub fn strip_amount<'f>(fragments: &'f [Fragment], layout: &Layout) -> Option<(&'f [Fragment], i64)> {
    let n = fragments.len();
    if n < 3 {
        return None;
    }
    let (units, comma, cents) = (&fragments[n - 3].text, &fragments[n - 2].text, &fragments[n - 1].text);
    if !is_digits(units) || comma != "," || !is_digits(cents) || cents.len() != 2 {
        return None;
    }
    let mut consumed = 3;
    let mut digits = format!("{units}{cents}");
    if n > 4 && fragments[n - 4].text == "." && is_digits(&fragments[n - 5].text) {
        digits.insert_str(0, &fragments[n - 5].text);
        consumed = 5;
    }
    let mut amount: i64 = digits.parse().ok()?;
    let rest = &fragments[..n - consumed];
    if layout.is_debit_column(fragments[n - consumed].column) {
        amount = -amount;
    }
    Some((rest, amount))
}

/// Strip a leading `dd.mm` date.
pub fn strip_date(fragments: &[Fragment]) -> Option<(&[Fragment], String)> {
    let [day, dot, month, rest @ ..] = fragments else {
        return None;
    };
    if !is_digits(&day.text) || dot.text != "." || !is_digits(&month.text) {
        return None;
    }
    Some((rest, format!("{}.{}", day.text, month.text)))
}
