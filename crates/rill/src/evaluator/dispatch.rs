//! Pipe targets (§4.5.4) and dict/list dispatch (§4.5.9).

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{PipeTarget, Primary, Span};
use crate::callable::Callable;
use crate::context::Context;
use crate::error::RuntimeError;
use crate::value::{deep_equals, infer_type, Value};

use super::{destructure, pipe, primary, slice, spread, EvalResult, Flow};

const ZERO_SPAN: Span = Span { start: 0, end: 0 };

pub fn eval_pipe_target(target: &PipeTarget, input: Value, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    match target {
        PipeTarget::Primary(p) => eval_primary_target(p, input, ctx),
        PipeTarget::Invoke(args) => {
            let callable = match &input {
                Value::Callable(c) => c.clone(),
                other => {
                    return Err(Flow::Error(RuntimeError::type_error(format!("cannot invoke a {}", infer_type(other)), Some(ZERO_SPAN))));
                }
            };
            let evaluated = pipe::eval_args(args, ctx)?;
            super::invoke_callable(&callable, evaluated, ctx, ZERO_SPAN)
        }
        PipeTarget::ParallelSpread(target_primary) => spread::parallel_spread(&input, target_primary, ctx),
        PipeTarget::ParallelFilter(predicate) => spread::parallel_filter(&input, predicate, ctx),
        PipeTarget::SequentialSpread(target_primary) => spread::sequential_spread(&input, target_primary, ctx),
        PipeTarget::Destructure(pattern) => destructure::apply_destructure(pattern, input, ctx).map_err(Flow::Error),
        PipeTarget::Slice(spec) => slice::eval_slice(spec, &input, ctx),
        PipeTarget::Enumerate => crate::collections::enumerate_value(&input, ZERO_SPAN).map_err(Flow::Error),
        PipeTarget::Spread => spread::bare_spread(&input, ZERO_SPAN).map_err(Flow::Error),
    }
}

/// A `Primary` pipe target dispatches when it is (or resolves to) a dict or
/// list; otherwise it is evaluated as an ordinary primary (§4.5.9).
fn eval_primary_target(p: &Primary, input: Value, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    match p {
        Primary::DictLiteral(_) | Primary::TupleLiteral(_) | Primary::Variable(_) => {
            let table = primary::eval_primary(p, ctx)?;
            match &table {
                Value::Dict(_) => dict_dispatch(&table, &input, ctx),
                Value::List(_) => list_dispatch(&table, &input),
                other => Ok(other.clone()),
            }
        }
        _ => primary::eval_primary(p, ctx),
    }
}

fn dict_dispatch(dict_value: &Value, input: &Value, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    let Value::Dict(map) = dict_value else { unreachable!() };
    let mut matched = None;
    for (key, value) in map {
        if key == "default" {
            continue;
        }
        if deep_equals(input, &Value::String(key.clone())) {
            matched = Some(value.clone());
            break;
        }
    }
    let matched = match matched.or_else(|| map.get("default").cloned()) {
        Some(v) => v,
        None => return Err(Flow::Error(RuntimeError::property_not_found(format!("no dispatch entry matches {}", crate::value::format_value(input)), Some(ZERO_SPAN)))),
    };
    invoke_dispatch_value(matched, input, ctx)
}

fn list_dispatch(list_value: &Value, input: &Value) -> EvalResult {
    let Value::List(items) = list_value else { unreachable!() };
    let n = match input {
        Value::Number(n) => *n,
        other => return Err(Flow::Error(RuntimeError::type_error(format!("list dispatch requires a number, got {}", infer_type(other)), Some(ZERO_SPAN)))),
    };
    let mut idx = n.trunc() as i64;
    if idx < 0 {
        idx += items.len() as i64;
    }
    if idx < 0 || idx as usize >= items.len() {
        return Err(Flow::Error(RuntimeError::property_not_found(format!("index {idx} out of range for list of length {}", items.len()), Some(ZERO_SPAN))));
    }
    Ok(items[idx as usize].clone())
}

/// Auto-invokes a matched dict entry that is a callable (§4.5.9), rejecting
/// script callables with user-declared parameters.
fn invoke_dispatch_value(matched: Value, input: &Value, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    let Value::Callable(callable) = &matched else {
        return Ok(matched);
    };
    if callable.is_property() {
        return super::invoke_callable(callable, vec![], ctx, ZERO_SPAN);
    }
    if let Callable::Script(sc) = callable {
        let first_is_implicit = sc.params.first().is_some_and(|p| p.name == "$");
        if !first_is_implicit {
            return Err(Flow::Error(RuntimeError::type_error("script callable with user parameters cannot be used as a dispatch target", Some(ZERO_SPAN))));
        }
    }
    super::invoke_callable(callable, vec![input.clone()], ctx, ZERO_SPAN)
}
