//! The expression evaluator (`spec.md` §4.5–§4.11): the largest layer,
//! responsible for every primary, pipe target, spread/destructure/slice/
//! enumerate operator, dict/list dispatch, control-flow signal, and the
//! boolean/comparison/arithmetic sub-evaluators.

mod access;
mod arithmetic;
mod boolean;
mod call;
mod control;
mod destructure;
mod dispatch;
mod interpolation;
mod pipe;
mod primary;
mod slice;
mod spread;

pub use pipe::eval_pipe_chain;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::ast::Span;
use crate::callable::{Callable, Param};
use crate::context::Context;
use crate::error::RuntimeError;
use crate::value::{infer_type, Value};

/// Non-local control transfer: a plain error, or the two signals `break`
/// and `return` unwind through the evaluator as (§4.6.2, §9 design note).
#[derive(Debug, Clone)]
pub enum Flow {
    Error(RuntimeError),
    Break(Value),
    Return(Value),
}

impl From<RuntimeError> for Flow {
    fn from(e: RuntimeError) -> Self {
        Flow::Error(e)
    }
}

pub type EvalResult = Result<Value, Flow>;

/// Runs a thunk with `ctx`'s pipe value swapped in, restoring the original
/// afterward regardless of outcome (§3.3 invariant 5, §8 invariant 3).
pub fn with_pipe_value<T>(ctx: &Rc<RefCell<Context>>, value: Value, f: impl FnOnce() -> Result<T, Flow>) -> Result<T, Flow> {
    let saved = std::mem::replace(&mut ctx.borrow_mut().pipe_value, value);
    let result = f();
    ctx.borrow_mut().pipe_value = saved;
    result
}

pub fn current_pipe_value(ctx: &Rc<RefCell<Context>>) -> Value {
    ctx.borrow().pipe_value.clone()
}

/// `invokeCallable` (§4.3): the evaluator's single entry point for calling
/// any of the three callable variants.
pub fn invoke_callable(callable: &Callable, args: Vec<Value>, ctx: &Rc<RefCell<Context>>, location: Span) -> EvalResult {
    ctx.borrow().check_abort(Some(location))?;
    match callable {
        Callable::Script(sc) => {
            let bound = bind_call_args(&sc.params, args)?;
            let pipe_value = sc.bound_dict.as_ref().map(|b| (**b).clone()).unwrap_or(Value::Null);
            let (frame, _guard) = Context::call_frame(&sc.defining_scope, pipe_value)?;
            for (name, value) in bound {
                frame.borrow_mut().set_variable(&name, value, None)?;
            }
            control::eval_block_catching_return(&sc.body, &frame)
        }
        Callable::Runtime(rc) => {
            let args = prepend_bound_dict(rc.bound_dict.as_deref(), args);
            call_host(&rc.name, rc.func.clone(), None, args, ctx, location)
        }
        Callable::Application(ac) => {
            let args = prepend_bound_dict(ac.bound_dict.as_deref(), args);
            call_host(&ac.name, ac.func.clone(), ac.params.as_deref(), args, ctx, location)
        }
    }
}

fn prepend_bound_dict(bound_dict: Option<&Value>, args: Vec<Value>) -> Vec<Value> {
    if let Some(dict) = bound_dict {
        if args.is_empty() {
            return vec![dict.clone()];
        }
    }
    args
}

/// Host calls share the typed-parameter validation and timeout-guard path
/// (§4.3.3, §4.9.1, §4.11).
fn call_host(name: &str, func: crate::callable::HostFn, params: Option<&[Param]>, args: Vec<Value>, ctx: &Rc<RefCell<Context>>, location: Span) -> EvalResult {
    if let Some(params) = params {
        if !params.is_empty() {
            validate_typed_args(params, &args, location)?;
        }
    }
    let (observability, timeout) = {
        let c = ctx.borrow();
        (c.observability.clone(), c.timeout)
    };
    observability.on_function_call(name, &args, location);
    let start = Instant::now();
    let result = func(&args, &ctx.borrow(), location);
    let duration = start.elapsed();
    match &result {
        Ok(v) => observability.on_function_return(name, v, duration),
        Err(e) => observability.on_error(e),
    }
    if let Some(budget) = timeout {
        if duration > budget {
            return Err(Flow::Error(RuntimeError::Timeout { function_name: name.to_owned(), ms: budget.as_millis() as u64, location: Some(location) }));
        }
    }
    result.map_err(Flow::Error)
}

/// Same contract as [`call_host`] but for a host method, which carries a
/// leading `receiver` value (§4.9.3, §6).
pub(super) fn call_host_method(
    name: &str,
    func: crate::callable::HostMethodFn,
    params: Option<&[Param]>,
    receiver: &Value,
    args: Vec<Value>,
    ctx: &Rc<RefCell<Context>>,
    location: Span,
) -> EvalResult {
    if let Some(params) = params {
        if !params.is_empty() {
            validate_typed_args(params, &args, location)?;
        }
    }
    let (observability, timeout) = {
        let c = ctx.borrow();
        (c.observability.clone(), c.timeout)
    };
    observability.on_function_call(name, &args, location);
    let start = Instant::now();
    let result = func(receiver, &args, &ctx.borrow(), location);
    let duration = start.elapsed();
    match &result {
        Ok(v) => observability.on_function_return(name, v, duration),
        Err(e) => observability.on_error(e),
    }
    if let Some(budget) = timeout {
        if duration > budget {
            return Err(Flow::Error(RuntimeError::Timeout { function_name: name.to_owned(), ms: budget.as_millis() as u64, location: Some(location) }));
        }
    }
    result.map_err(Flow::Error)
}

/// Validates application-callable arguments positionally against declared
/// types, only when `params` is a non-empty list (§3.2, §9 Open Question).
fn validate_typed_args(params: &[Param], args: &[Value], location: Span) -> Result<(), RuntimeError> {
    for (i, p) in params.iter().enumerate() {
        if let Some(expected) = &p.type_annotation {
            if let Some(arg) = args.get(i) {
                let actual = infer_type(arg);
                if actual != expected {
                    return Err(RuntimeError::type_error(format!("argument {i} ('{}') expected {expected}, got {actual}", p.name), Some(location)));
                }
            }
        }
    }
    Ok(())
}

/// Script-callable argument binding (§4.3.2a/b): one-tuple unpack, or
/// positional binding with type validation and defaults.
fn bind_call_args(params: &[Param], args: Vec<Value>) -> Result<Vec<(String, Value)>, RuntimeError> {
    if args.len() == 1 {
        if let Value::Tuple(tuple) = &args[0] {
            return bind_tuple_args(params, tuple);
        }
    }
    bind_positional_args(params, args)
}

fn bind_tuple_args(params: &[Param], tuple: &crate::value::Tuple) -> Result<Vec<(String, Value)>, RuntimeError> {
    match tuple {
        crate::value::Tuple::Positional(values) => bind_positional_args(params, values.clone()),
        crate::value::Tuple::Named(map) => {
            for key in map.keys() {
                if !params.iter().any(|p| &p.name == key) {
                    return Err(RuntimeError::type_error(format!("unknown named argument '{key}'"), None));
                }
            }
            let mut bound = Vec::with_capacity(params.len());
            for p in params {
                if let Some(v) = map.get(&p.name) {
                    validate_value_type(p, v)?;
                    bound.push((p.name.clone(), v.clone()));
                } else if let Some(default) = &p.default {
                    bound.push((p.name.clone(), default.clone()));
                } else {
                    return Err(RuntimeError::type_error(format!("missing required argument '{}'", p.name), None));
                }
            }
            Ok(bound)
        }
    }
}

fn bind_positional_args(params: &[Param], args: Vec<Value>) -> Result<Vec<(String, Value)>, RuntimeError> {
    if args.len() > params.len() {
        return Err(RuntimeError::type_error(format!("too many arguments: expected at most {}, got {}", params.len(), args.len()), None));
    }
    let mut bound = Vec::with_capacity(params.len());
    for (i, p) in params.iter().enumerate() {
        let value = match args.get(i) {
            Some(v) => {
                validate_value_type(p, v)?;
                v.clone()
            }
            None => p.default.clone().ok_or_else(|| RuntimeError::type_error(format!("missing required argument '{}'", p.name), None))?,
        };
        bound.push((p.name.clone(), value));
    }
    Ok(bound)
}

/// Validates against the param's declared type, or failing that the type
/// inferred from its default (§4.3.2b).
fn validate_value_type(param: &Param, value: &Value) -> Result<(), RuntimeError> {
    let expected = param.type_annotation.as_deref().or_else(|| param.default.as_ref().map(infer_type));
    if let Some(expected) = expected {
        let actual = infer_type(value);
        if actual != expected {
            return Err(RuntimeError::type_error(format!("parameter '{}' expected {expected}, got {actual}", param.name), None));
        }
    }
    Ok(())
}
