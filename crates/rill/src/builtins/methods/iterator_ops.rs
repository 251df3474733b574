//! `.iter()` and `.first`: wrap a dict, list, or string into the iterator
//! protocol (§3.1 "iterator").

use crate::collections::sequence_iterator;
use crate::context::HostMethod;
use crate::error::RuntimeError;
use crate::value::{infer_type, Value};

pub fn all() -> Vec<HostMethod> {
    vec![register_iter(), register_first()]
}

fn materialize(receiver: &Value, method: &str, location: crate::ast::Span) -> Result<Vec<Value>, RuntimeError> {
    match receiver {
        Value::List(items) => Ok(items.clone()),
        Value::String(s) => Ok(s.chars().map(|c| Value::String(c.to_string())).collect()),
        Value::Dict(dict) => Ok(dict
            .iter()
            .map(|(k, v)| {
                let mut entry = indexmap::IndexMap::new();
                entry.insert("key".to_owned(), Value::String(k.clone()));
                entry.insert("value".to_owned(), v.clone());
                Value::Dict(entry)
            })
            .collect()),
        other => Err(RuntimeError::type_error(format!(".{method} is not defined for {}", infer_type(other)), Some(location))),
    }
}

fn register_iter() -> HostMethod {
    super::runtime("iter", super::rc_fn(|r, _a, _c, loc| Ok(sequence_iterator(materialize(r, "iter", loc)?))))
}

/// `.first`: an iterator dict positioned at the sequence's first element,
/// same protocol as `.iter()` (§3.1).
fn register_first() -> HostMethod {
    super::runtime("first", super::rc_fn(|r, _a, _c, loc| Ok(sequence_iterator(materialize(r, "first", loc)?))))
}
