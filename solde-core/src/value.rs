//! Points of the reconciled balance series

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Account balance after applying the operation described by `source`.
/// `value` is in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    pub date: NaiveDate,
    pub source: String,
    pub value: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let v = Value {
            date: NaiveDate::from_ymd_opt(2021, 1, 2).unwrap(),
            source: "CARTE X1234".to_string(),
            value: -1250,
        };
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"date":"2021-01-02","source":"CARTE X1234","value":-1250}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
