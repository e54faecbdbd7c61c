//! A single history record.

use serde::{Deserialize, Serialize};

use crate::calculator::CalcResult;

/// An evaluated expression and its result.
///
/// Serialized as a two-element array `["expr", "result"]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct HistoryEntry {
    /// The expression as the user submitted it.
    pub expression: String,
    /// The formatted result.
    pub result: String,
}

impl HistoryEntry {
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
        }
    }

    /// Build an entry from a successful calculation. Errors are never recorded.
    pub fn from_calc_result(result: &CalcResult) -> Option<Self> {
        match result {
            CalcResult::Success {
                expression,
                display_result,
                ..
            } => Some(Self::new(expression.clone(), display_result.clone())),
            CalcResult::Error { .. } => None,
        }
    }

    /// One-line rendering for lists.
    pub fn label(&self) -> String {
        format!("{} = {}", self.expression, self.result)
    }
}

impl From<(String, String)> for HistoryEntry {
    fn from((expression, result): (String, String)) -> Self {
        Self { expression, result }
    }
}

impl From<HistoryEntry> for (String, String) {
    fn from(entry: HistoryEntry) -> Self {
        (entry.expression, entry.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_pair() {
        let entry = HistoryEntry::new("2+2", "4.00000000000000");
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"["2+2","4.00000000000000"]"#);

        let parsed: HistoryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn test_from_calc_result_skips_errors() {
        let ok = CalcResult::evaluate("1+1");
        assert_eq!(
            HistoryEntry::from_calc_result(&ok),
            Some(HistoryEntry::new("1+1", "2.00000000000000"))
        );

        let err = CalcResult::evaluate("1/0");
        assert_eq!(HistoryEntry::from_calc_result(&err), None);
    }

    #[test]
    fn test_label() {
        assert_eq!(HistoryEntry::new("2^3", "8").label(), "2^3 = 8");
    }
}
