//! Pure value-level collection operations shared between the evaluator's
//! pipe-only operators (enumerate `@<>`, slice `/<…>`) and the built-in
//! functions/methods that expose the same behavior under a callable name
//! (`enumerate()`, `range()`, `repeat()`, `.iter()`, `.first`).

use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::Span;
use crate::callable::{Callable, RuntimeCallable};
use crate::error::{RillResult, RuntimeError};
use crate::value::{infer_type, make_iterator, Value};

/// `@<>` / `enumerate()` (§4.5.8): lists become `[{index, value}, …]`;
/// dicts become `[{index, key, value}, …]` with keys sorted ascending for
/// deterministic iteration (§8 invariant 8); any other input is a type
/// error.
pub fn enumerate_value(value: &Value, location: Span) -> RillResult<Value> {
    match value {
        Value::List(items) => Ok(Value::List(
            items
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    let mut entry = IndexMap::new();
                    entry.insert("index".to_owned(), Value::Number(i as f64));
                    entry.insert("value".to_owned(), v.clone());
                    Value::Dict(entry)
                })
                .collect(),
        )),
        Value::Dict(dict) => {
            let mut keys: Vec<&String> = dict.keys().collect();
            keys.sort();
            Ok(Value::List(
                keys.into_iter()
                    .enumerate()
                    .map(|(i, k)| {
                        let mut entry = IndexMap::new();
                        entry.insert("index".to_owned(), Value::Number(i as f64));
                        entry.insert("key".to_owned(), Value::String(k.clone()));
                        entry.insert("value".to_owned(), dict[k].clone());
                        Value::Dict(entry)
                    })
                    .collect(),
            ))
        }
        other => Err(RuntimeError::type_error(format!("cannot enumerate a {}", infer_type(other)), Some(location))),
    }
}

/// Normalizes and clamps slice bounds, then enumerates the indices to
/// include, following `spec.md` §4.5.7 exactly.
pub fn slice_indices(len: usize, start: Option<f64>, stop: Option<f64>, step: f64, location: Span) -> RillResult<Vec<usize>> {
    if step == 0.0 {
        return Err(RuntimeError::type_error("slice step cannot be 0", Some(location)));
    }
    let len_i = len as i64;
    let normalize = |v: f64| -> i64 {
        let v = v as i64;
        if v < 0 { v + len_i } else { v }
    };
    let (default_start, default_stop) = if step > 0.0 { (0, len_i) } else { (len_i - 1, -1) };
    let mut start_i = start.map_or(default_start, normalize);
    let mut stop_i = stop.map_or(default_stop, normalize);
    if step > 0.0 {
        start_i = start_i.clamp(0, len_i);
        stop_i = stop_i.clamp(0, len_i);
    } else {
        start_i = start_i.clamp(-1, len_i - 1);
        stop_i = stop_i.clamp(-1, len_i - 1);
    }
    let mut indices = Vec::new();
    let step_i = step as i64;
    let mut cur = start_i;
    if step > 0.0 {
        while cur < stop_i {
            if cur >= 0 && cur < len_i {
                indices.push(cur as usize);
            }
            cur += step_i;
        }
    } else {
        while cur > stop_i {
            if cur >= 0 && cur < len_i {
                indices.push(cur as usize);
            }
            cur += step_i;
        }
    }
    Ok(indices)
}

fn number_closure(name: &'static str, f: impl Fn(&[Value], &crate::context::Context, Span) -> RillResult<Value> + 'static) -> Callable {
    Callable::Runtime(Rc::new(RuntimeCallable { name: name.to_owned(), func: Rc::new(f), is_property: false, bound_dict: None }))
}

/// Builds the iterator `range(start, stop, step)` produces: a fresh
/// iterator-shaped dict per step, recursively constructing the next one
/// when `next` is invoked (functional iterator, no interior mutability
/// needed since every state transition is a new immutable `Value`).
pub fn range_iterator(current: f64, stop: f64, step: f64) -> Value {
    let done = if step > 0.0 { current >= stop } else { current <= stop };
    let next = number_closure("range.next", move |_args, _ctx, _loc| Ok(range_iterator(current + step, stop, step)));
    if done {
        make_iterator(None, true, next)
    } else {
        make_iterator(Some(Value::Number(current)), false, next)
    }
}

/// Builds the iterator `repeat(value, count?)` produces. `count = None`
/// repeats forever.
pub fn repeat_iterator(value: Value, remaining: Option<i64>) -> Value {
    let done = remaining == Some(0);
    let next_value = value.clone();
    let next_remaining = remaining.map(|r| r - 1);
    let next = number_closure("repeat.next", move |_args, _ctx, _loc| Ok(repeat_iterator(next_value.clone(), next_remaining)));
    if done {
        make_iterator(None, true, next)
    } else {
        make_iterator(Some(value), false, next)
    }
}

/// Builds a sequential iterator over an already-materialized list of
/// values, used by `.iter()` / `.first` over lists, strings (codepoints),
/// and dicts (entries).
pub fn sequence_iterator(values: Vec<Value>) -> Value {
    build_sequence_iterator(Rc::new(values), 0)
}

fn build_sequence_iterator(values: Rc<Vec<Value>>, index: usize) -> Value {
    let done = index >= values.len();
    let next_values = values.clone();
    let next = number_closure("sequence.next", move |_args, _ctx, _loc| Ok(build_sequence_iterator(next_values.clone(), index + 1)));
    if done {
        make_iterator(None, true, next)
    } else {
        make_iterator(Some(values[index].clone()), false, next)
    }
}
