use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A dynamically typed property value
///
/// Primitives are held inline. Composites are shared behind an `Arc` so that a holder and
/// its observers can see the same list or record without copying it, and so that change
/// detection can compare them by identity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Arc<Vec<Value>>),
    Record(Arc<BTreeMap<String, Value>>),
}

impl Value {
    /// Change detection comparison used by `Bindable::set`.
    ///
    /// Primitives compare by value. Lists and records compare by identity, so replacing a
    /// list with a structurally equal copy is still a change, while writing back the same
    /// shared list is not.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b),
            (Value::Record(a), Value::Record(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn list(items: impl IntoIterator<Item = impl Into<Value>>) -> Self { Value::List(Arc::new(items.into_iter().map(Into::into).collect())) }

    pub fn record<K: Into<String>, V: Into<Value>>(fields: impl IntoIterator<Item = (K, V)>) -> Self {
        Value::Record(Arc::new(fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect()))
    }

    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a field of a record value
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record(fields) => fields.get(name),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Record(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self { Value::Bool(value) }
}
impl From<i32> for Value {
    fn from(value: i32) -> Self { Value::Integer(value as i64) }
}
impl From<i64> for Value {
    fn from(value: i64) -> Self { Value::Integer(value) }
}
impl From<u32> for Value {
    fn from(value: u32) -> Self { Value::Integer(value as i64) }
}
impl From<f64> for Value {
    fn from(value: f64) -> Self { Value::Float(value) }
}
impl From<&str> for Value {
    fn from(value: &str) -> Self { Value::String(value.to_string()) }
}
impl From<String> for Value {
    fn from(value: String) -> Self { Value::String(value) }
}
impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self { Value::List(Arc::new(value)) }
}
impl From<Arc<Vec<Value>>> for Value {
    fn from(value: Arc<Vec<Value>>) -> Self { Value::List(value) }
}
impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self { Value::Record(Arc::new(value)) }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self { value.map(Into::into).unwrap_or(Value::Null) }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            // integers outside i64 are kept as their decimal text rather than rounded to f64
            serde_json::Value::Number(n) => match (n.as_i64(), n.is_f64().then(|| n.as_f64()).flatten()) {
                (Some(i), _) => Value::Integer(i),
                (None, Some(x)) => Value::Float(x),
                (None, None) => Value::String(n.to_string()),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::list(items),
            serde_json::Value::Object(fields) => Value::record(fields),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives_compare_by_value() {
        assert!(Value::from(3).same(&Value::Integer(3)));
        assert!(Value::from("Concerts").same(&Value::from("Concerts".to_string())));
        assert!(!Value::from(3).same(&Value::Float(3.0)));
        assert!(Value::Null.same(&Value::Null));
    }

    #[test]
    fn test_composites_compare_by_identity() {
        let list = Value::list(["a", "b"]);
        let copy = Value::list(["a", "b"]);
        assert!(list.same(&list.clone()));
        assert!(!list.same(&copy));
        // structural equality is still available
        assert_eq!(list, copy);
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!([{ "name": "Concerts", "rank": 1 }, { "name": "Sports", "rank": 2.5 }]);
        let value = Value::from(json);
        let items = value.as_list().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].field("name").and_then(Value::as_str), Some("Concerts"));
        assert_eq!(items[0].field("rank"), Some(&Value::Integer(1)));
        assert_eq!(items[1].field("rank"), Some(&Value::Float(2.5)));
    }

    #[test]
    fn test_from_json_large_integers_keep_precision() {
        let value = Value::from(serde_json::json!({ "big": u64::MAX, "max": i64::MAX, "min": i64::MIN }));
        assert_eq!(value.field("big"), Some(&Value::String("18446744073709551615".to_string())));
        assert_eq!(value.field("max"), Some(&Value::Integer(i64::MAX)));
        assert_eq!(value.field("min"), Some(&Value::Integer(i64::MIN)));
        // a text-backed number compares by value, so re-reading the same data is not a change
        assert!(value.field("big").unwrap().same(&Value::from(serde_json::json!(u64::MAX))));
    }

    #[test]
    fn test_display() {
        let value = Value::list([Value::record([("name", "Comedy Night")]), Value::from(7)]);
        assert_eq!(value.to_string(), "[{name: Comedy Night}, 7]");
    }
}
