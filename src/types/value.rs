//! Candidate values fed into the validation pipeline.
//!
//! Composite values (arrays and objects) live behind an [`Arc`], which gives
//! every composite a stable identity. The cache keys on that identity, see
//! [`CacheKey`](crate::cache::CacheKey).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Map type used by object values.
pub type Map = BTreeMap<String, Value>;

/// JSON-like value.
///
/// Equality (`==`) is structural. Instance identity is available through
/// [`Value::same_instance`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Arc<Vec<Value>>),
    Object(Arc<Map>),
}

impl Value {
    /// Builds an object value from key/value pairs.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(Arc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Builds an array value.
    pub fn array<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Array(Arc::new(items.into_iter().collect()))
    }

    /// Parses JSON text into a value.
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<serde_json::Value>(text).map(Value::from)
    }

    /// True for arrays and objects.
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a key on an object value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Whether both values are the same instance.
    ///
    /// Composites compare by pointer, primitives by value.
    pub fn same_instance(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => {
                false
            }
            (a, b) => a == b,
        }
    }

    /// Deep copy that shares no composite with `self`.
    ///
    /// Mutating the copy (for example via [`Arc::make_mut`]) is never visible
    /// through the original.
    pub fn detached(&self) -> Value {
        match self {
            Value::Array(items) => Value::Array(Arc::new(items.iter().map(Value::detached).collect())),
            Value::Object(map) => Value::Object(Arc::new(
                map.iter().map(|(k, v)| (k.clone(), v.detached())).collect(),
            )),
            primitive => primitive.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::Value::from(self.clone()))
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::array(items.into_iter().map(Value::from)),
            serde_json::Value::Object(map) => {
                Value::object(map.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => number_to_json(n),
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(items) => serde_json::Value::Array(
                items.iter().cloned().map(serde_json::Value::from).collect(),
            ),
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v.clone())))
                    .collect(),
            ),
        }
    }
}

/// Integral numbers inside the safe integer range print without a fraction.
fn number_to_json(n: f64) -> serde_json::Value {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Arc::new(items))
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(Arc::new(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_text() {
        let value = Value::from_json_str(r#"{"a":"x","n":[1,2.5,null]}"#).unwrap();

        assert_eq!(value.get("a"), Some(&Value::from("x")));
        let n = value.get("n").and_then(Value::as_array).unwrap();
        assert_eq!(n, &[Value::from(1), Value::from(2.5), Value::Null]);
    }

    #[test]
    fn test_display_is_json() {
        let value = Value::object([("a", Value::from(1)), ("b", Value::from(1.5))]);
        assert_eq!(value.to_string(), r#"{"a":1,"b":1.5}"#);
    }

    #[test]
    fn test_same_instance() {
        let a = Value::object([("k", Value::from("v"))]);
        let alias = a.clone();
        let twin = Value::object([("k", Value::from("v"))]);

        assert!(a.same_instance(&alias));
        assert!(!a.same_instance(&twin));
        assert_eq!(a, twin);

        assert!(Value::from("x").same_instance(&Value::from("x")));
        assert!(!Value::from(1).same_instance(&Value::from("1")));
    }

    #[test]
    fn test_detached_is_independent() {
        let original = Value::object([("list", Value::array([Value::from(1)]))]);
        let mut copy = original.detached();

        assert_eq!(original, copy);
        assert!(!original.same_instance(&copy));

        if let Value::Object(map) = &mut copy {
            Arc::make_mut(map).insert("x".to_string(), Value::from("y"));
        }

        assert_ne!(original, copy);
        assert!(original.get("x").is_none());
    }

    #[test]
    fn test_serde_roundtrip_through_json() {
        let value: Value = serde_json::from_str(r#"[true,"s",{"z":0}]"#).unwrap();
        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(text, r#"[true,"s",{"z":0}]"#);
    }
}
