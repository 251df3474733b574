//! The runtime value universe (`spec.md` §3.1) and its total helper
//! functions (§4.2).

use std::cmp::Ordering;
use std::fmt::Write as _;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::callable::Callable;

/// The closed tagged union of runtime values.
///
/// Iterators are deliberately *not* a distinct variant: per the design note
/// in `spec.md` §9 ("Iterators are plain dicts by design"), `range`,
/// `repeat`, and `.first` all build an ordinary [`Value::Dict`] with the
/// reserved `value`/`done`/`next` fields, so every dict-field-access rule
/// in §4.7 applies to them uniformly with no special-cased dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Null,
    String(String),
    Number(f64),
    Bool(bool),
    List(Vec<Value>),
    Dict(IndexMap<String, Value>),
    Tuple(Tuple),
    Vector(Vector),
    Callable(Callable),
}

/// The spread operator's unpacked-argument container: positional xor named,
/// never both (`spec.md` §3.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Tuple {
    Positional(Vec<Value>),
    Named(IndexMap<String, Value>),
}

impl Tuple {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Positional(v) => v.is_empty(),
            Self::Named(m) => m.is_empty(),
        }
    }
}

/// A tagged numeric array supporting the vector-similarity operations named
/// in `spec.md` §3.1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vector {
    pub model: String,
    pub data: Vec<f64>,
}

impl Vector {
    pub fn new(model: impl Into<String>, data: Vec<f64>) -> Self {
        Self { model: model.into(), data }
    }

    fn check_dims(&self, other: &Vector) -> Result<(), String> {
        if self.data.len() != other.data.len() {
            Err(format!("vector dimension mismatch: {} != {}", self.data.len(), other.data.len()))
        } else {
            Ok(())
        }
    }

    pub fn dot(&self, other: &Vector) -> Result<f64, String> {
        self.check_dims(other)?;
        Ok(self.data.iter().zip(&other.data).map(|(a, b)| a * b).sum())
    }

    pub fn l2_norm(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    pub fn cosine_similarity(&self, other: &Vector) -> Result<f64, String> {
        let dot = self.dot(other)?;
        let denom = self.l2_norm() * other.l2_norm();
        Ok(if denom == 0.0 { 0.0 } else { dot / denom })
    }

    pub fn euclidean_distance(&self, other: &Vector) -> Result<f64, String> {
        self.check_dims(other)?;
        Ok(self.data.iter().zip(&other.data).map(|(a, b)| (a - b).powi(2)).sum::<f64>().sqrt())
    }

    pub fn normalize(&self) -> Vector {
        let norm = self.l2_norm();
        let data = if norm == 0.0 { self.data.clone() } else { self.data.iter().map(|v| v / norm).collect() };
        Vector::new(self.model.clone(), data)
    }
}

/// Reserved field names for iterator-shaped dicts (`spec.md` §3.1, §9).
pub const ITER_VALUE: &str = "value";
pub const ITER_DONE: &str = "done";
pub const ITER_NEXT: &str = "next";

/// Builds an iterator-shaped dict: `{ value?, done, next }`.
pub fn make_iterator(value: Option<Value>, done: bool, next: Callable) -> Value {
    let mut dict = IndexMap::new();
    if let Some(v) = value {
        dict.insert(ITER_VALUE.to_owned(), v);
    }
    dict.insert(ITER_DONE.to_owned(), Value::Bool(done));
    dict.insert(ITER_NEXT.to_owned(), Value::Callable(next));
    Value::Dict(dict)
}

pub fn is_iterator_shaped(dict: &IndexMap<String, Value>) -> bool {
    dict.contains_key(ITER_DONE) && dict.contains_key(ITER_NEXT)
}

/// Reserved dict keys that cannot be used as literal entry names (§4.5.3).
pub const RESERVED_DICT_KEYS: [&str; 3] = ["keys", "values", "entries"];

/// `inferType` (§4.2): a total function from value to type name.
/// Every callable variant reports as `closure`.
pub fn infer_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "bool",
        Value::List(_) => "list",
        Value::Dict(_) => "dict",
        Value::Tuple(_) => "tuple",
        Value::Vector(_) => "vector",
        Value::Callable(_) => "closure",
    }
}

/// `isTruthy` (§4.2).
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0,
        Value::String(s) => !s.is_empty(),
        Value::List(l) => !l.is_empty(),
        Value::Dict(d) => !d.is_empty(),
        Value::Tuple(t) => !t.is_empty(),
        Value::Vector(_) => true,
        Value::Callable(_) => true,
    }
}

/// `formatValue` (§4.2): stable and injective for primitives.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => format_number(*n),
        Value::Bool(b) => b.to_string(),
        Value::List(_) | Value::Dict(_) => canonical_json(value),
        Value::Tuple(t) => format_tuple(t),
        Value::Vector(v) => format!("vector<{}>[{}]", v.model, v.data.iter().map(|d| format_number(*d)).collect::<Vec<_>>().join(", ")),
        Value::Callable(c) => c.format_value(),
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".to_owned() } else { "-Infinity".to_owned() }
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        let mut s = format!("{n}");
        if !s.contains('.') && !s.contains('e') {
            let _ = write!(s, ".0");
        }
        s
    }
}

fn format_tuple(tuple: &Tuple) -> String {
    let mut out = String::from("*[");
    match tuple {
        Tuple::Positional(values) => {
            for (i, v) in values.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&format_value(v));
            }
        }
        Tuple::Named(map) => {
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{k}: {}", format_value(v));
            }
        }
    }
    out.push(']');
    out
}

/// Canonical JSON rendering used both by `formatValue` for lists/dicts and
/// by the `json` builtin.
pub fn canonical_json(value: &Value) -> String {
    to_json_value(value).to_string()
}

pub fn to_json_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Number(n) => serde_json::Number::from_f64(*n).map_or(serde_json::Value::Null, serde_json::Value::Number),
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::List(items) => serde_json::Value::Array(items.iter().map(to_json_value).collect()),
        Value::Dict(map) => {
            let mut obj = serde_json::Map::new();
            for (k, v) in map {
                obj.insert(k.clone(), to_json_value(v));
            }
            serde_json::Value::Object(obj)
        }
        Value::Tuple(t) => match t {
            Tuple::Positional(values) => serde_json::Value::Array(values.iter().map(to_json_value).collect()),
            Tuple::Named(map) => {
                let mut obj = serde_json::Map::new();
                for (k, v) in map {
                    obj.insert(k.clone(), to_json_value(v));
                }
                serde_json::Value::Object(obj)
            }
        },
        Value::Vector(v) => serde_json::Value::Array(v.data.iter().map(|d| serde_json::json!(d)).collect()),
        Value::Callable(c) => serde_json::Value::String(c.format_value()),
    }
}

pub fn from_json_value(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => Value::List(items.iter().map(from_json_value).collect()),
        serde_json::Value::Object(map) => {
            let mut dict = IndexMap::new();
            for (k, v) in map {
                dict.insert(k.clone(), from_json_value(v));
            }
            Value::Dict(dict)
        }
    }
}

/// `deepEquals` (§4.2): structural recursion on lists/dicts, entry-set
/// comparison for tuples, and the callable-equality rule (§3.2) for
/// closures.
pub fn deep_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::List(x), Value::List(y)) => x.len() == y.len() && x.iter().zip(y).all(|(a, b)| deep_equals(a, b)),
        (Value::Dict(x), Value::Dict(y)) => {
            x.len() == y.len() && x.iter().all(|(k, v)| y.get(k).is_some_and(|bv| deep_equals(v, bv)))
        }
        (Value::Tuple(x), Value::Tuple(y)) => tuple_equals(x, y),
        (Value::Vector(x), Value::Vector(y)) => x == y,
        (Value::Callable(x), Value::Callable(y)) => x == y,
        _ => false,
    }
}

fn tuple_equals(a: &Tuple, b: &Tuple) -> bool {
    match (a, b) {
        (Tuple::Positional(x), Tuple::Positional(y)) => x.len() == y.len() && x.iter().zip(y).all(|(a, b)| deep_equals(a, b)),
        (Tuple::Named(x), Tuple::Named(y)) => x.len() == y.len() && x.iter().all(|(k, v)| y.get(k).is_some_and(|bv| deep_equals(v, bv))),
        _ => false,
    }
}

/// Ordering used by `<`/`>`/`<=`/`>=` when both sides are numbers; falls
/// back to lexicographic comparison of `formatValue` otherwise (§4.10).
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        _ => format_value(a).cmp(&format_value(b)),
    }
}
