//! Function and method dispatch (§4.9): host function calls, variable
//! calls, and method dispatch shared by postfix and bare method calls.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{PipeChain, Span};
use crate::callable::Callable;
use crate::context::Context;
use crate::error::RuntimeError;
use crate::value::{infer_type, Value};

use super::{pipe, EvalResult, Flow};

const ZERO_SPAN: Span = Span { start: 0, end: 0 };

/// Host function call (§4.9.1): implicit pipe-first argument when no
/// explicit arguments are given and the pipe value is non-null.
pub fn eval_function_call(name: &str, args: &[PipeChain], ctx: &Rc<RefCell<Context>>) -> EvalResult {
    let host_fn = { ctx.borrow().functions.get(name).cloned() };
    let host_fn = match host_fn {
        Some(f) => f,
        None => return Err(Flow::Error(RuntimeError::undefined_function(name, Some(ZERO_SPAN)))),
    };
    let mut evaluated = pipe::eval_args(args, ctx)?;
    if evaluated.is_empty() {
        let pipe_value = ctx.borrow().pipe_value.clone();
        if !matches!(pipe_value, Value::Null) {
            evaluated.push(pipe_value);
        }
    }
    super::call_host(&host_fn.name, host_fn.func.clone(), host_fn.params.as_deref(), evaluated, ctx, ZERO_SPAN)
}

/// Variable call `$fn(args)` (§4.9.2).
pub fn eval_variable_call(name: &str, args: &[PipeChain], ctx: &Rc<RefCell<Context>>) -> EvalResult {
    let callable_value = ctx.borrow().get_variable(name).ok_or_else(|| Flow::Error(RuntimeError::undefined_variable(name, Some(ZERO_SPAN))))?;
    let Value::Callable(callable) = callable_value else {
        return Err(Flow::Error(RuntimeError::type_error(format!("${name} is not callable, got {}", infer_type(&callable_value)), Some(ZERO_SPAN))));
    };
    let mut evaluated = pipe::eval_args(args, ctx)?;
    if evaluated.is_empty() {
        let pipe_value = ctx.borrow().pipe_value.clone();
        let pipe_usable = !matches!(pipe_value, Value::Null | Value::Callable(_));
        if pipe_usable {
            if let Callable::Script(sc) = &callable {
                if sc.params.first().is_some_and(|p| p.default.is_none()) {
                    evaluated.push(pipe_value);
                }
            }
        }
    }
    super::invoke_callable(&callable, evaluated, ctx, ZERO_SPAN)
}

/// Method dispatch (§4.9.3): dict-entry callable first, then the host
/// method table. A callable receiver is rejected outright.
pub fn dispatch_method(name: &str, receiver: Value, args: Vec<Value>, ctx: &Rc<RefCell<Context>>, location: Span) -> EvalResult {
    if matches!(receiver, Value::Callable(_)) {
        return Err(Flow::Error(RuntimeError::type_error(format!("method '.{name}' cannot be called on a closure; invoke it with ->() first"), Some(location))));
    }
    if let Value::Dict(map) = &receiver {
        if let Some(Value::Callable(c)) = map.get(name) {
            return super::invoke_callable(c, args, ctx, location);
        }
    }
    let host_method = { ctx.borrow().methods.get(name).cloned() };
    match host_method {
        Some(m) => super::call_host_method(&m.name, m.func.clone(), m.params.as_deref(), &receiver, args, ctx, location),
        None => Err(Flow::Error(RuntimeError::undefined_method(name, Some(location)))),
    }
}
