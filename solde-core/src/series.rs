//! Post-processing of a reconciled series: dropping operations by label.

use regex::Regex;

use crate::value::Value;

/// Label matcher built from an ignore file.
///
/// Each non-empty line not starting with `#` is a regular expression; a label
/// matches when any of them matches part of it.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    re: Option<Regex>,
}

impl IgnoreRules {
    pub fn parse(text: &str) -> Result<Self, regex::Error> {
        let rules: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .collect();
        if rules.is_empty() {
            return Ok(Self::default());
        }
        let re = Regex::new(&format!("(?:{})", rules.join("|")))?;
        Ok(Self { re: Some(re) })
    }

    pub fn is_empty(&self) -> bool {
        self.re.is_none()
    }

    pub fn matches(&self, source: &str) -> bool {
        self.re.as_ref().is_some_and(|re| re.is_match(source))
    }
}

/// Remove matched values and shift the following balances as if the removed
/// operations had never happened. Each kept value keeps the delta it had
/// relative to its original predecessor.
pub fn filter_values(values: &[Value], rules: &IgnoreRules) -> Vec<Value> {
    let mut kept: Vec<Value> = Vec::with_capacity(values.len());
    for (i, v) in values.iter().enumerate() {
        if rules.matches(&v.source) {
            continue;
        }
        let mut v = v.clone();
        if let Some(last) = kept.last() {
            let delta = v.value - values[i - 1].value;
            v.value = last.value + delta;
        }
        kept.push(v);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn value(day: u32, source: &str, value: i64) -> Value {
        Value {
            date: NaiveDate::from_ymd_opt(2021, 3, day).unwrap(),
            source: source.to_string(),
            value,
        }
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let rules = IgnoreRules::parse("# transfers between own accounts\n\n  VIR INTERNE  \nEPARGNE\n").unwrap();
        assert!(rules.matches("VIR INTERNE VERS LIVRET"));
        assert!(rules.matches("VERSEMENT EPARGNE"));
        assert!(!rules.matches("CARTE X1234"));
    }

    #[test]
    fn test_no_rules_match_nothing() {
        let rules = IgnoreRules::parse("# nothing\n").unwrap();
        assert!(rules.is_empty());
        assert!(!rules.matches(""));
        assert!(!rules.matches("anything"));
    }

    #[test]
    fn test_invalid_rule_is_an_error() {
        assert!(IgnoreRules::parse("VIR (").is_err());
    }

    #[test]
    fn test_filter_values_rebases_following_balances() {
        let values = vec![
            value(1, "SOLDE", 10_000),
            value(2, "VIR INTERNE", 5_000),
            value(3, "CARTE", 4_000),
            value(4, "SALAIRE", 14_000),
        ];
        let rules = IgnoreRules::parse("VIR INTERNE").unwrap();
        let kept = filter_values(&values, &rules);
        let balances: Vec<i64> = kept.iter().map(|v| v.value).collect();
        assert_eq!(balances, vec![10_000, 9_000, 19_000]);
        assert_eq!(kept[1].source, "CARTE");
    }

    #[test]
    fn test_filter_values_dropping_first() {
        let values = vec![value(1, "VIR INTERNE", 100), value(2, "CARTE", 50)];
        let kept = filter_values(&values, &IgnoreRules::parse("VIR").unwrap());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].value, 50);
    }
}
