//! Spread semantics (§4.5.5): bare spread, parallel spread/filter,
//! sequential spread.
//!
//! The spec's "launch then await as a batch" wording describes a
//! suspension model this crate does not need: every host function here is
//! synchronous, so "parallel" spread runs its element calls one after
//! another while still preserving output order exactly as a truly
//! concurrent implementation would observe it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Primary, Span};
use crate::context::Context;
use crate::error::RuntimeError;
use crate::value::{infer_type, is_truthy, Tuple, Value};

use super::{control, primary, EvalResult, Flow};

const ZERO_SPAN: Span = Span { start: 0, end: 0 };

/// Bare spread `*x` (§4.5.5): list → positional tuple, dict → named tuple.
pub fn bare_spread(value: &Value, location: Span) -> Result<Value, RuntimeError> {
    match value {
        Value::List(items) => Ok(Value::Tuple(Tuple::Positional(items.clone()))),
        Value::Dict(map) => Ok(Value::Tuple(Tuple::Named(map.clone()))),
        other => Err(RuntimeError::type_error(format!("cannot spread a {}", infer_type(other)), Some(location))),
    }
}

pub fn parallel_spread(input: &Value, target: &Primary, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    let target_value = primary::eval_primary(target, ctx)?;
    match (input, &target_value) {
        (Value::List(xs), Value::List(fs)) => {
            if xs.len() != fs.len() {
                return Err(Flow::Error(RuntimeError::type_error(
                    format!("parallel spread length mismatch: {} inputs, {} targets", xs.len(), fs.len()),
                    Some(ZERO_SPAN),
                )));
            }
            let mut out = Vec::with_capacity(xs.len());
            for (x, f) in xs.iter().zip(fs.iter()) {
                out.push(invoke_target(f, x.clone(), ctx, ZERO_SPAN)?);
            }
            Ok(Value::List(out))
        }
        (Value::List(xs), _) => {
            let mut out = Vec::with_capacity(xs.len());
            for x in xs {
                out.push(invoke_target(&target_value, x.clone(), ctx, ZERO_SPAN)?);
            }
            Ok(Value::List(out))
        }
        (_, Value::List(fs)) => {
            let mut out = Vec::with_capacity(fs.len());
            for f in fs {
                out.push(invoke_target(f, input.clone(), ctx, ZERO_SPAN)?);
            }
            Ok(Value::List(out))
        }
        (_, _) => Ok(Value::List(vec![invoke_target(&target_value, input.clone(), ctx, ZERO_SPAN)?])),
    }
}

pub fn parallel_filter(input: &Value, predicate: &Primary, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    let Value::List(items) = input else {
        return Err(Flow::Error(RuntimeError::type_error(format!("parallel filter requires a list input, got {}", infer_type(input)), Some(ZERO_SPAN))));
    };
    let saved = ctx.borrow().pipe_value.clone();
    let mut out = Vec::new();
    for item in items {
        ctx.borrow_mut().pipe_value = item.clone();
        let keep = eval_predicate(predicate, item, ctx)?;
        if is_truthy(&keep) {
            out.push(item.clone());
        }
    }
    ctx.borrow_mut().pipe_value = saved;
    Ok(Value::List(out))
}

fn eval_predicate(predicate: &Primary, item: &Value, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    match predicate {
        Primary::Block(block) => control::eval_block_expression(block, ctx),
        Primary::Variable(_) => match primary::eval_primary(predicate, ctx)? {
            Value::Callable(c) => super::invoke_callable(&c, vec![item.clone()], ctx, ZERO_SPAN),
            other => Ok(other),
        },
        _ => primary::eval_primary(predicate, ctx),
    }
}

pub fn sequential_spread(input: &Value, target: &Primary, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    let target_value = primary::eval_primary(target, ctx)?;
    let Value::List(fs) = &target_value else {
        return Err(Flow::Error(RuntimeError::type_error(format!("sequential spread requires a list target, got {}", infer_type(&target_value)), Some(ZERO_SPAN))));
    };
    let mut value = input.clone();
    for f in fs {
        value = invoke_target(f, value, ctx, ZERO_SPAN)?;
    }
    Ok(value)
}

/// Unifies callable dispatch with by-name lookup against `functions`
/// (§4.5.5 "invoke target by callable or name").
fn invoke_target(target_value: &Value, arg: Value, ctx: &Rc<RefCell<Context>>, location: Span) -> EvalResult {
    match target_value {
        Value::Callable(c) => super::invoke_callable(c, vec![arg], ctx, location),
        Value::String(name) => {
            let func = ctx.borrow().functions.get(name).map(|hf| hf.func.clone());
            match func {
                Some(f) => f(&[arg], &ctx.borrow(), location).map_err(Flow::Error),
                None => Err(Flow::Error(RuntimeError::undefined_function(name, Some(location)))),
            }
        }
        other => Err(Flow::Error(RuntimeError::type_error(format!("cannot invoke a {}", infer_type(other)), Some(location)))),
    }
}
