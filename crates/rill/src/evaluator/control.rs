//! Control flow (§4.6.2): conditionals, while/do-while/for loops, and
//! block-expressions — the boundaries `BreakSignal`/`ReturnSignal` unwind
//! through.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Block, Conditional, ForLoop, Span, Statement, WhileLoop};
use crate::context::Context;
use crate::error::RuntimeError;
use crate::value::{infer_type, is_truthy, Value};

use super::{boolean, pipe, primary, EvalResult, Flow};

const ZERO_SPAN: Span = Span { start: 0, end: 0 };

pub fn eval_conditional(cond: &Conditional, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    let c = boolean::eval_bool_expr(&cond.condition, ctx)?;
    if is_truthy(&c) {
        primary::eval_primary(&cond.then_branch, ctx)
    } else {
        match &cond.else_branch {
            Some(branch) => primary::eval_primary(branch, ctx),
            None => Ok(Value::Null),
        }
    }
}

fn as_usize(value: Value) -> Result<usize, Flow> {
    match value {
        Value::Number(n) => Ok(n.max(0.0) as usize),
        other => Err(Flow::Error(RuntimeError::type_error(format!("maxIterations must be a number, got {}", infer_type(&other)), Some(ZERO_SPAN)))),
    }
}

pub fn eval_while(loop_node: &WhileLoop, ctx: &Rc<RefCell<Context>>, is_do_while: bool) -> EvalResult {
    let max_iterations = match &loop_node.max_iterations {
        Some(expr) => Some(as_usize(pipe::eval_pipe_chain(expr, ctx)?)?),
        None => None,
    };
    let mut last = Value::Null;
    let mut count = 0usize;

    if is_do_while {
        ctx.borrow().check_abort(None).map_err(Flow::Error)?;
        match primary::eval_primary(&loop_node.body, ctx) {
            Ok(v) => last = v,
            Err(Flow::Break(v)) => return Ok(v),
            Err(e) => return Err(e),
        }
        count += 1;
    }

    loop {
        if max_iterations.is_some_and(|max| count >= max) {
            break;
        }
        ctx.borrow().check_abort(None).map_err(Flow::Error)?;
        let condition = boolean::eval_bool_expr(&loop_node.condition, ctx)?;
        if !is_truthy(&condition) {
            break;
        }
        match primary::eval_primary(&loop_node.body, ctx) {
            Ok(v) => last = v,
            Err(Flow::Break(v)) => return Ok(v),
            Err(e) => return Err(e),
        }
        count += 1;
    }
    Ok(last)
}

pub fn eval_for(for_node: &ForLoop, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    let input = ctx.borrow().pipe_value.clone();
    let elements: Vec<Value> = match &input {
        Value::List(items) => items.clone(),
        Value::String(s) => s.chars().map(|c| Value::String(c.to_string())).collect(),
        other => vec![other.clone()],
    };
    let mut out = Vec::with_capacity(elements.len());
    for element in elements {
        ctx.borrow().check_abort(None).map_err(Flow::Error)?;
        ctx.borrow_mut().pipe_value = element;
        match primary::eval_primary(&for_node.body, ctx) {
            Ok(v) => out.push(v),
            Err(Flow::Break(v)) => {
                ctx.borrow_mut().pipe_value = input;
                return Ok(v);
            }
            Err(e) => return Err(e),
        }
    }
    ctx.borrow_mut().pipe_value = input;
    Ok(Value::List(out))
}

/// Evaluates a block as a new lexical scope, catching `ReturnSignal`
/// (§4.6.2).
pub fn eval_block_expression(block: &Block, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    let child = Context::child(ctx);
    catch_return(run_statements(&block.statements, &child))
}

/// A script callable's body *is* its call frame's block-expression
/// boundary; no extra scope nesting is needed (§4.3.2d).
pub fn eval_block_catching_return(block: &Block, frame: &Rc<RefCell<Context>>) -> EvalResult {
    catch_return(run_statements(&block.statements, frame))
}

fn catch_return(result: EvalResult) -> EvalResult {
    match result {
        Err(Flow::Return(v)) => Ok(v),
        other => other,
    }
}

fn run_statements(statements: &[Statement], ctx: &Rc<RefCell<Context>>) -> EvalResult {
    let mut last = Value::Null;
    for stmt in statements {
        last = pipe::eval_pipe_chain(&stmt.expr, ctx)?;
        ctx.borrow_mut().pipe_value = last.clone();
    }
    Ok(last)
}
