//! Persistent state tree.
//!
//! A [`StateValue`] is a JSON-shaped value whose containers live behind
//! `Arc`s. Cloning is O(1) and a cloned tree shares every branch with its
//! source, so snapshots taken before a dispatch stay valid after it.
//!
//! Two notions of equality are exposed:
//!
//! - `==` is structural: two trees are equal when they hold the same data.
//! - [`StateValue::same`] is identity: containers compare by pointer, scalars
//!   by value. This is the comparison used for change detection.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// Ordered mapping used for object nodes and record attributes.
pub type StateMap = BTreeMap<String, StateValue>;

/// An immutable node of the application state tree.
#[derive(Clone, Default)]
pub enum StateValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(Arc<str>),
    Array(Arc<Vec<StateValue>>),
    Object(Arc<StateMap>),
}

/// Shape tag of a [`StateValue`], used in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateValue {
    /// Wrap a map into an object node.
    pub fn object(map: StateMap) -> Self {
        StateValue::Object(Arc::new(map))
    }

    /// An object node with no keys.
    pub fn empty_object() -> Self {
        StateValue::Object(Arc::new(StateMap::new()))
    }

    /// Wrap a vector into an array node.
    pub fn array(items: Vec<StateValue>) -> Self {
        StateValue::Array(Arc::new(items))
    }

    /// Identity comparison.
    ///
    /// Arrays and objects are the same only when they are the very same
    /// allocation. Scalars are the same when their values are equal.
    pub fn same(&self, other: &StateValue) -> bool {
        match (self, other) {
            (StateValue::Null, StateValue::Null) => true,
            (StateValue::Bool(a), StateValue::Bool(b)) => a == b,
            (StateValue::Number(a), StateValue::Number(b)) => a == b,
            (StateValue::String(a), StateValue::String(b)) => a == b,
            (StateValue::Array(a), StateValue::Array(b)) => Arc::ptr_eq(a, b),
            (StateValue::Object(a), StateValue::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Identity comparison over optional values; two absent values are the same.
    pub fn same_opt(a: Option<&StateValue>, b: Option<&StateValue>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => a.same(b),
            _ => false,
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            StateValue::Null => ValueKind::Null,
            StateValue::Bool(_) => ValueKind::Bool,
            StateValue::Number(_) => ValueKind::Number,
            StateValue::String(_) => ValueKind::String,
            StateValue::Array(_) => ValueKind::Array,
            StateValue::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, StateValue::Null)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, StateValue::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, StateValue::Array(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StateValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            StateValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            StateValue::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StateValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StateValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[StateValue]> {
        match self {
            StateValue::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&StateMap> {
        match self {
            StateValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key of an object node. Any other node yields `None`.
    pub fn get(&self, key: &str) -> Option<&StateValue> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Look up an element of an array node. Any other node yields `None`.
    pub fn at(&self, index: usize) -> Option<&StateValue> {
        self.as_array().and_then(|items| items.get(index))
    }

    /// Deep-copy into a plain `serde_json::Value`.
    pub fn to_json(&self) -> Value {
        match self {
            StateValue::Null => Value::Null,
            StateValue::Bool(b) => Value::Bool(*b),
            StateValue::Number(n) => Value::Number(n.clone()),
            StateValue::String(s) => Value::String(s.to_string()),
            StateValue::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            StateValue::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl PartialEq for StateValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StateValue::Array(a), StateValue::Array(b)) => Arc::ptr_eq(a, b) || a == b,
            (StateValue::Object(a), StateValue::Object(b)) => Arc::ptr_eq(a, b) || a == b,
            _ => self.same(other),
        }
    }
}

impl PartialEq<Value> for StateValue {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (StateValue::Null, Value::Null) => true,
            (StateValue::Bool(a), Value::Bool(b)) => a == b,
            (StateValue::Number(a), Value::Number(b)) => a == b,
            (StateValue::String(a), Value::String(b)) => **a == **b,
            (StateValue::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
            }
            (StateValue::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|other| v == other))
            }
            _ => false,
        }
    }
}

impl fmt::Debug for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Serialize for StateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StateValue::Null => serializer.serialize_unit(),
            StateValue::Bool(b) => serializer.serialize_bool(*b),
            StateValue::Number(n) => n.serialize(serializer),
            StateValue::String(s) => serializer.serialize_str(s),
            StateValue::Array(items) => serializer.collect_seq(items.iter()),
            StateValue::Object(map) => serializer.collect_map(map.iter()),
        }
    }
}

impl<'de> Deserialize<'de> for StateValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(StateValue::from)
    }
}

impl From<Value> for StateValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => StateValue::Null,
            Value::Bool(b) => StateValue::Bool(b),
            Value::Number(n) => StateValue::Number(n),
            Value::String(s) => StateValue::String(s.into()),
            Value::Array(items) => {
                StateValue::array(items.into_iter().map(StateValue::from).collect())
            }
            Value::Object(map) => StateValue::object(
                map.into_iter()
                    .map(|(k, v)| (k, StateValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for StateValue {
    fn from(value: &Value) -> Self {
        StateValue::from(value.clone())
    }
}

impl From<StateValue> for Value {
    fn from(value: StateValue) -> Self {
        value.to_json()
    }
}

impl From<bool> for StateValue {
    fn from(b: bool) -> Self {
        StateValue::Bool(b)
    }
}

impl From<i32> for StateValue {
    fn from(n: i32) -> Self {
        StateValue::Number(n.into())
    }
}

impl From<i64> for StateValue {
    fn from(n: i64) -> Self {
        StateValue::Number(n.into())
    }
}

impl From<u64> for StateValue {
    fn from(n: u64) -> Self {
        StateValue::Number(n.into())
    }
}

/// Non-finite floats have no JSON representation and become `Null`.
impl From<f64> for StateValue {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(StateValue::Null, StateValue::Number)
    }
}

impl From<&str> for StateValue {
    fn from(s: &str) -> Self {
        StateValue::String(s.into())
    }
}

impl From<String> for StateValue {
    fn from(s: String) -> Self {
        StateValue::String(s.into())
    }
}

impl From<Vec<StateValue>> for StateValue {
    fn from(items: Vec<StateValue>) -> Self {
        StateValue::array(items)
    }
}

impl From<StateMap> for StateValue {
    fn from(map: StateMap) -> Self {
        StateValue::object(map)
    }
}

impl<T: Into<StateValue>> From<Option<T>> for StateValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(StateValue::Null, Into::into)
    }
}

impl FromIterator<(String, StateValue)> for StateValue {
    fn from_iter<I: IntoIterator<Item = (String, StateValue)>>(iter: I) -> Self {
        StateValue::object(iter.into_iter().collect())
    }
}

impl FromIterator<StateValue> for StateValue {
    fn from_iter<I: IntoIterator<Item = StateValue>>(iter: I) -> Self {
        StateValue::array(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_roundtrip_preserves_structure() {
        let source = json!({"songs": [{"id": 1, "title": "So What"}], "flag": true});
        let value = StateValue::from(source.clone());
        assert_eq!(value.to_json(), source);
        assert_eq!(value, source);
    }

    #[test]
    fn clone_shares_containers() {
        let value = StateValue::from(json!({"a": {"b": 1}}));
        let copy = value.clone();
        assert!(value.same(&copy));
        assert!(value.get("a").unwrap().same(copy.get("a").unwrap()));
    }

    #[test]
    fn structurally_equal_trees_are_not_the_same() {
        let a = StateValue::from(json!({"x": [1, 2]}));
        let b = StateValue::from(json!({"x": [1, 2]}));
        assert_eq!(a, b);
        assert!(!a.same(&b));
    }

    #[test]
    fn scalars_are_same_by_value() {
        assert!(StateValue::from(3).same(&StateValue::from(3)));
        assert!(StateValue::from("x").same(&StateValue::from("x")));
        assert!(StateValue::Null.same(&StateValue::Null));
        assert!(!StateValue::from(3).same(&StateValue::from("3")));
    }

    #[test]
    fn same_opt_treats_two_absent_values_as_same() {
        let v = StateValue::from(1);
        assert!(StateValue::same_opt(None, None));
        assert!(!StateValue::same_opt(Some(&v), None));
        assert!(StateValue::same_opt(Some(&v), Some(&v)));
    }

    #[test]
    fn accessors_reject_other_shapes() {
        let value = StateValue::from(json!({"n": 5, "s": "hi", "list": [true]}));
        assert_eq!(value.get("n").and_then(StateValue::as_i64), Some(5));
        assert_eq!(value.get("s").and_then(StateValue::as_str), Some("hi"));
        assert_eq!(
            value.get("list").and_then(|l| l.at(0)).and_then(StateValue::as_bool),
            Some(true)
        );
        assert!(value.get("s").unwrap().as_object().is_none());
        assert!(StateValue::from(4).get("n").is_none());
        assert_eq!(value.kind(), ValueKind::Object);
    }

    #[test]
    fn non_finite_float_becomes_null() {
        assert!(StateValue::from(f64::NAN).is_null());
        assert_eq!(StateValue::from(1.5).as_f64(), Some(1.5));
    }

    #[test]
    fn serde_uses_plain_json_shape() {
        let value = StateValue::from(json!({"b": [1, null], "a": "x"}));
        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(text, r#"{"a":"x","b":[1,null]}"#);
        let back: StateValue = serde_json::from_str(&text).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn collect_into_object_and_array() {
        let obj: StateValue = vec![("k".to_string(), StateValue::from(1))]
            .into_iter()
            .collect();
        assert_eq!(obj, json!({"k": 1}));
        let arr: StateValue = (1..=3).map(|n: i64| StateValue::from(n)).collect();
        assert_eq!(arr, json!([1, 2, 3]));
    }
}
