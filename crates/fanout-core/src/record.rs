//! Flat records: an ordered map of field name to scalar.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single field value. Nested arrays or objects are rejected on parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl Scalar {
    /// Text used for a CSV cell. Null renders as an empty cell.
    pub fn to_cell(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => n.to_string(),
            Scalar::String(s) => s.clone(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{:?}", s),
            Scalar::Null => f.write_str("null"),
            other => f.write_str(&other.to_cell()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// One record. Field order is kept from the source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, Scalar>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and literals.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.0.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Scalar)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Scalar)>>(iter: I) -> Self {
        Record(iter.into_iter().collect())
    }
}

/// Parses a JSON array of flat objects.
pub fn parse_records(json: &str) -> Result<Vec<Record>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_objects_in_field_order() {
        let records =
            parse_records(r#"[{"name": "a", "priority": "high", "n": 3, "ok": true, "x": null}]"#)
                .unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.fields().collect::<Vec<_>>(), ["name", "priority", "n", "ok", "x"]);
        assert_eq!(r.get("priority"), Some(&Scalar::from("high")));
        assert_eq!(r.get("n"), Some(&Scalar::from(3)));
        assert_eq!(r.get("ok"), Some(&Scalar::Bool(true)));
        assert_eq!(r.get("x"), Some(&Scalar::Null));
    }

    #[test]
    fn rejects_nested_values() {
        assert!(parse_records(r#"[{"tags": ["a", "b"]}]"#).is_err());
        assert!(parse_records(r#"[{"inner": {"k": 1}}]"#).is_err());
    }

    #[test]
    fn rejects_non_array_documents() {
        assert!(parse_records(r#"{"priority": "high"}"#).is_err());
        assert!(parse_records("[1, 2]").is_err());
    }

    #[test]
    fn cell_rendering() {
        assert_eq!(Scalar::Null.to_cell(), "");
        assert_eq!(Scalar::from(1).to_cell(), "1");
        assert_eq!(Scalar::from(false).to_cell(), "false");
        assert_eq!(Scalar::from("Done").to_cell(), "Done");
    }

    #[test]
    fn string_and_number_are_distinct() {
        assert_ne!(Scalar::from("1"), Scalar::from(1));
    }
}
