//! Typed access to one vendor plan object
//!
//! Every vendor reports its plan as nested JSON objects. [`Fragment`] wraps one
//! such object together with the dialect it came from, so that a missing or
//! mistyped field turns into a [`PlanError::MalformedInput`] naming the vendor
//! and the field.

use crate::dialect::Dialect;
use crate::error::{PlanError, Result};
use serde_json::{Map, Value};

/// A borrowed vendor plan object
#[derive(Debug, Clone, Copy)]
pub struct Fragment<'a> {
    object: &'a Map<String, Value>,
    dialect: Dialect,
}

impl<'a> Fragment<'a> {
    /// Wraps a JSON value, failing unless it is an object
    pub fn new(value: &'a Value, dialect: Dialect) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| PlanError::malformed(dialect, "expected a plan object"))?;
        Ok(Self { object, dialect })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn contains(&self, key: &str) -> bool {
        self.object.contains_key(key)
    }

    /// Returns true if any of `keys` is present
    pub fn contains_any(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.contains(key))
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.object.get(key)
    }

    pub fn required(&self, key: &str) -> Result<&'a Value> {
        self.get(key)
            .ok_or_else(|| PlanError::missing_field(self.dialect, key))
    }

    /// Returns the nested object stored under `key`
    pub fn object(&self, key: &str) -> Result<Fragment<'a>> {
        Fragment::new(self.required(key)?, self.dialect)
            .map_err(|_| self.wrong_type(key, "an object"))
    }

    /// Returns the nested object under `key`, ignoring values of any other shape
    ///
    /// Older DuckDB releases print `extra_info` as a text block.
    pub fn structured(&self, key: &str) -> Option<Fragment<'a>> {
        self.object.get(key).and_then(|value| Fragment::new(value, self.dialect).ok())
    }

    pub fn str(&self, key: &str) -> Result<&'a str> {
        self.required(key)?
            .as_str()
            .ok_or_else(|| self.wrong_type(key, "a string"))
    }

    pub fn opt_str(&self, key: &str) -> Result<Option<&'a str>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.str(key).map(Some),
        }
    }

    pub fn i64(&self, key: &str) -> Result<i64> {
        self.required(key)?
            .as_i64()
            .ok_or_else(|| self.wrong_type(key, "an integer"))
    }

    pub fn array(&self, key: &str) -> Result<&'a [Value]> {
        self.required(key)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.wrong_type(key, "an array"))
    }

    pub fn opt_array(&self, key: &str) -> Result<Option<&'a [Value]>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.array(key).map(Some),
        }
    }

    /// Reads a row count
    ///
    /// Vendors disagree on how they print row counts: integers, floats and
    /// strings like `"~1200"` all occur.
    pub fn cardinality(&self, key: &str) -> Result<u64> {
        let value = self.required(key)?;
        to_cardinality(value).ok_or_else(|| self.wrong_type(key, "a row count"))
    }

    pub fn opt_cardinality(&self, key: &str) -> Result<Option<u64>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.cardinality(key).map(Some),
        }
    }

    /// Reads a vendor-specific semantic tag, accepting strings and numbers
    pub fn tag(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(_) => Err(self.wrong_type(key, "a scalar")),
        }
    }

    /// Copies the object without the given keys
    pub fn without(&self, keys: &[&str]) -> Value {
        let stripped = self
            .object
            .iter()
            .filter(|(key, _)| !keys.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect::<Map<String, Value>>();
        Value::Object(stripped)
    }

    pub fn malformed(&self, message: impl Into<String>) -> PlanError {
        PlanError::malformed(self.dialect, message)
    }

    fn wrong_type(&self, key: &str, expected: &str) -> PlanError {
        self.malformed(format!("field `{key}` is not {expected}"))
    }
}

/// Converts a vendor row count into a cardinality
pub(crate) fn to_cardinality(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.round() as u64)
        }),
        Value::String(s) => {
            let digits = s.trim().trim_start_matches('~').trim();
            digits.parse::<u64>().ok().or_else(|| {
                digits
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.round() as u64)
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_cardinality_accepts_vendor_spellings() {
        assert_eq!(to_cardinality(&json!(42)), Some(42));
        assert_eq!(to_cardinality(&json!(41.6)), Some(42));
        assert_eq!(to_cardinality(&json!("1200")), Some(1200));
        assert_eq!(to_cardinality(&json!("~1200")), Some(1200));
        assert_eq!(to_cardinality(&json!(-3)), None);
        assert_eq!(to_cardinality(&json!("many")), None);
        assert_eq!(to_cardinality(&json!(null)), None);
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let value = json!({"operator": "tablescan"});
        let fragment = Fragment::new(&value, Dialect::Umbra).unwrap();

        let err = fragment.str("tablename").unwrap_err();
        assert!(err.is_malformed_input());
        assert!(err.to_string().contains("tablename"));
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let value = json!({"operatorId": "seven"});
        let fragment = Fragment::new(&value, Dialect::Hyper).unwrap();

        assert!(fragment.i64("operatorId").unwrap_err().is_malformed_input());
    }

    #[test]
    fn test_non_object_is_rejected() {
        let value = json!([1, 2, 3]);
        assert!(Fragment::new(&value, Dialect::DuckDb).is_err());
    }

    #[test]
    fn test_without_strips_child_keys() {
        let value = json!({"operator": "join", "left": {}, "right": {}, "type": "inner"});
        let fragment = Fragment::new(&value, Dialect::Umbra).unwrap();

        assert_eq!(
            fragment.without(&["left", "right"]),
            json!({"operator": "join", "type": "inner"})
        );
    }

    #[test]
    fn test_structured_skips_text_blocks() {
        let value = json!({"extra_info": "Top 10", "nested": {"Table": "nation"}});
        let fragment = Fragment::new(&value, Dialect::DuckDb).unwrap();

        assert!(fragment.structured("extra_info").is_none());
        assert!(fragment.structured("missing").is_none());
        let nested = fragment.structured("nested").unwrap();
        assert_eq!(nested.str("Table").unwrap(), "nation");
    }

    #[test]
    fn test_tag_accepts_numbers() {
        let value = json!({"source": 12, "behavior": "inner"});
        let fragment = Fragment::new(&value, Dialect::Umbra).unwrap();

        assert_eq!(fragment.tag("source").unwrap(), Some("12".to_string()));
        assert_eq!(fragment.tag("behavior").unwrap(), Some("inner".to_string()));
        assert_eq!(fragment.tag("missing").unwrap(), None);
    }
}
