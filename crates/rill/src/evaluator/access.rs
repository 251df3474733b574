//! Variable access chains (§4.7): field, variable-key, computed,
//! bracketed index, alternatives, annotation reflection, existence check,
//! trailing default.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{AccessLink, Span, VariableBase, VariableRef};
use crate::callable::Callable;
use crate::context::Context;
use crate::error::RuntimeError;
use crate::value::{format_value, infer_type, Value};

use super::{pipe, EvalResult, Flow};

const ZERO_SPAN: Span = Span { start: 0, end: 0 };

pub fn eval_variable_ref(var_ref: &VariableRef, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    let mut current = match &var_ref.base {
        VariableBase::Pipe => ctx.borrow().pipe_value.clone(),
        VariableBase::Named(name) => ctx.borrow().get_variable(name).ok_or_else(|| Flow::Error(RuntimeError::undefined_variable(name, Some(ZERO_SPAN))))?,
    };
    for (i, link) in var_ref.chain.iter().enumerate() {
        // A miss (absent key, out-of-range index, undefined annotation) is
        // only tolerated as `Null` when a later `Default` in the same chain
        // stands ready to recover it; otherwise it is a hard error (§4.7).
        let allow_missing = var_ref.chain[i + 1..].iter().any(|l| matches!(l, AccessLink::Default(_)));
        current = match link {
            AccessLink::Default(expr) => {
                if matches!(current, Value::Null) {
                    pipe::eval_pipe_chain(expr, ctx)?
                } else {
                    current
                }
            }
            AccessLink::Existence { field, type_check } => {
                let present = field_access(&current, field, ctx, true)?;
                let ok = !matches!(present, Value::Null)
                    && match type_check {
                        Some(t) => infer_type(&present) == t,
                        None => true,
                    };
                Value::Bool(ok)
            }
            AccessLink::Field(name) => field_access(&current, name, ctx, allow_missing)?,
            AccessLink::VariableKey(name) => {
                let key = ctx.borrow().get_variable(name).ok_or_else(|| Flow::Error(RuntimeError::undefined_variable(name, Some(ZERO_SPAN))))?;
                match key {
                    Value::String(s) => field_access(&current, &s, ctx, allow_missing)?,
                    other => return Err(Flow::Error(RuntimeError::type_error(format!("variable key must be a string, got {}", infer_type(&other)), Some(ZERO_SPAN)))),
                }
            }
            AccessLink::Computed(expr) => {
                let key = pipe::eval_pipe_chain(expr, ctx)?;
                bracket_access(&current, key, ctx, allow_missing)?
            }
            AccessLink::Index(expr) => {
                let key = pipe::eval_pipe_chain(expr, ctx)?;
                bracket_access(&current, key, ctx, allow_missing)?
            }
            AccessLink::Alternatives(names) => {
                let mut result = Value::Null;
                for name in names {
                    let v = field_access(&current, name, ctx, true)?;
                    if !matches!(v, Value::Null) {
                        result = v;
                        break;
                    }
                }
                result
            }
            AccessLink::Annotation(name) => annotation_reflection(&current, name, allow_missing)?,
        };
    }
    Ok(current)
}

/// Property-style callables found during field access are auto-invoked
/// with the containing dict as receiver via `boundDict` (§4.7, §3.2).
///
/// A missing key is `Null` only when `allow_missing` says a later `Default`
/// (or an `Existence`/`Alternatives` probe) is ready to absorb it; otherwise
/// it is `RUNTIME_PROPERTY_NOT_FOUND`.
fn field_access(current: &Value, name: &str, ctx: &Rc<RefCell<Context>>, allow_missing: bool) -> EvalResult {
    match current {
        Value::Dict(map) => match map.get(name) {
            Some(Value::Callable(c)) if c.is_property() => super::invoke_callable(c, vec![], ctx, ZERO_SPAN),
            Some(v) => Ok(v.clone()),
            None if allow_missing => Ok(Value::Null),
            None => Err(Flow::Error(RuntimeError::property_not_found(format!("field '{name}' not found"), Some(ZERO_SPAN)))),
        },
        Value::Null => Ok(Value::Null),
        other => Err(Flow::Error(RuntimeError::type_error(format!("cannot access field '{name}' on a {}", infer_type(other)), Some(ZERO_SPAN)))),
    }
}

fn bracket_access(current: &Value, key: Value, ctx: &Rc<RefCell<Context>>, allow_missing: bool) -> EvalResult {
    match (current, &key) {
        (Value::List(items), Value::Number(n)) => list_index(items, *n, allow_missing),
        (Value::Dict(_), Value::String(s)) => field_access(current, s, ctx, allow_missing),
        (Value::Dict(_), other) => field_access(current, &format_value(other), ctx, allow_missing),
        (Value::Null, _) => Ok(Value::Null),
        _ => Err(Flow::Error(RuntimeError::type_error(format!("cannot index a {} with a {}", infer_type(current), infer_type(&key)), Some(ZERO_SPAN)))),
    }
}

fn list_index(items: &[Value], n: f64, allow_missing: bool) -> EvalResult {
    let mut idx = n.trunc() as i64;
    if idx < 0 {
        idx += items.len() as i64;
    }
    if idx < 0 || idx as usize >= items.len() {
        if allow_missing {
            return Ok(Value::Null);
        }
        return Err(Flow::Error(RuntimeError::property_not_found(format!("index {idx} out of range for list of length {}", items.len()), Some(ZERO_SPAN))));
    }
    Ok(items[idx as usize].clone())
}

fn annotation_reflection(current: &Value, name: &str, allow_missing: bool) -> EvalResult {
    match current {
        Value::Callable(Callable::Script(sc)) => match sc.annotations.get(name).cloned() {
            Some(v) => Ok(v),
            None if allow_missing => Ok(Value::Null),
            None => Err(Flow::Error(RuntimeError::undefined_annotation(name, Some(ZERO_SPAN)))),
        },
        Value::Callable(_) if allow_missing => Ok(Value::Null),
        Value::Callable(_) => Err(Flow::Error(RuntimeError::undefined_annotation(name, Some(ZERO_SPAN)))),
        other => Err(Flow::Error(RuntimeError::type_error(format!("cannot reflect annotation '^{name}' on a {}", infer_type(other)), Some(ZERO_SPAN)))),
    }
}
