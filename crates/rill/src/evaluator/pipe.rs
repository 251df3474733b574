//! Pipe chains and postfix expressions (§4.5.1, §4.5.2).

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{MethodCallSuffix, PipeChain, Postfix, Terminator};
use crate::context::Context;
use crate::error::RuntimeError;
use crate::value::Value;

use super::{call, primary, EvalResult, Flow};

/// Evaluates a full pipe chain: head postfix, then each pipe target in
/// order, then the chain's own terminator if present.
pub fn eval_pipe_chain(chain: &PipeChain, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    let mut value = eval_postfix(&chain.head, ctx)?;
    for target in &chain.targets {
        ctx.borrow_mut().pipe_value = value.clone();
        value = super::dispatch::eval_pipe_target(target, value, ctx)?;
    }
    apply_terminator(chain.terminator.as_ref(), value, ctx, chain.span.start)
}

pub fn apply_terminator(terminator: Option<&Terminator>, value: Value, ctx: &Rc<RefCell<Context>>, location: usize) -> EvalResult {
    let span = crate::ast::Span::new(location, location);
    match terminator {
        None => Ok(value),
        Some(Terminator::Capture { name, type_annotation }) => {
            ctx.borrow_mut().set_variable(name, value.clone(), type_annotation.as_deref()).map_err(Flow::Error)?;
            ctx.borrow().observability.on_capture(name, &value);
            let _ = span;
            Ok(value)
        }
        Some(Terminator::Break) => Err(Flow::Break(value)),
        Some(Terminator::Return) => Err(Flow::Return(value)),
    }
}

/// Evaluates the primary, then folds each `.method(args)` call left to
/// right (§4.5.2, §4.9.3).
pub fn eval_postfix(postfix: &Postfix, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    let mut value = primary::eval_primary(&postfix.primary, ctx)?;
    for suffix in &postfix.method_calls {
        value = eval_method_suffix(suffix, value, ctx)?;
    }
    Ok(value)
}

fn eval_method_suffix(suffix: &MethodCallSuffix, receiver: Value, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    if matches!(receiver, Value::Callable(_)) {
        return Err(Flow::Error(RuntimeError::type_error(
            format!("method '.{}' cannot be called on a closure; invoke it with ->() first", suffix.name),
            Some(suffix.span),
        )));
    }
    let args = eval_args(&suffix.args, ctx)?;
    call::dispatch_method(&suffix.name, receiver, args, ctx, suffix.span)
}

pub fn eval_args(args: &[PipeChain], ctx: &Rc<RefCell<Context>>) -> Result<Vec<Value>, Flow> {
    let saved = ctx.borrow().pipe_value.clone();
    let mut out = Vec::with_capacity(args.len());
    for a in args {
        ctx.borrow_mut().pipe_value = saved.clone();
        out.push(eval_pipe_chain(a, ctx)?);
    }
    ctx.borrow_mut().pipe_value = saved;
    Ok(out)
}
