//! The execution driver (§4.1): `execute` runs a whole script to
//! completion, `Stepper` exposes the same per-statement contract one step
//! at a time for hosts that want to interleave their own work between
//! statements.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

use crate::ast::Script;
use crate::context::Context;
use crate::error::RillResult;
use crate::evaluator::{self, Flow};
use crate::value::Value;

/// The result of a completed run: the last statement's value (or `null`
/// for an empty script) plus a flattened snapshot of every variable bound
/// during execution.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub value: Value,
    pub variables: HashMap<String, Value>,
}

/// Runs every statement in `script` in order against `ctx`.
///
/// A stray `break`/`return` that escapes every statement (one not caught
/// by an enclosing loop or block-expression) is treated as an early exit
/// with that signal's value, matching how a top-level `return` behaves in
/// the teacher's own REPL session loop.
pub fn execute(script: &Script, ctx: Rc<RefCell<Context>>) -> RillResult<Outcome> {
    let mut stepper = Stepper::new(script, ctx);
    while !stepper.done {
        stepper.step()?;
    }
    Ok(stepper.into_outcome())
}

/// An iterator-shaped controller over a script's statements (§4.1).
pub struct Stepper<'a> {
    script: &'a Script,
    pub context: Rc<RefCell<Context>>,
    pub index: usize,
    pub total: usize,
    pub done: bool,
    result: Value,
}

impl<'a> Stepper<'a> {
    pub fn new(script: &'a Script, context: Rc<RefCell<Context>>) -> Self {
        let total = script.statements.len();
        Stepper { script, context, index: 0, total, done: total == 0, result: Value::Null }
    }

    /// Evaluates the next statement, following the eight-point contract.
    pub fn step(&mut self) -> RillResult<Value> {
        let ctx = &self.context;
        let stmt = &self.script.statements[self.index];

        ctx.borrow().check_abort(Some(stmt.span))?;
        ctx.borrow().observability.on_step_start(self.index);

        let start = Instant::now();
        let outcome = evaluator::eval_pipe_chain(&stmt.expr, ctx);

        let (value, terminal) = match outcome {
            Ok(v) => (v, false),
            Err(Flow::Break(v)) | Err(Flow::Return(v)) => (v, true),
            Err(Flow::Error(e)) => {
                ctx.borrow().observability.on_error(&e);
                return Err(e);
            }
        };

        ctx.borrow_mut().pipe_value = value.clone();
        let check = ctx.borrow().check_auto_exception(&value, Some(stmt.span));
        if let Err(e) = check {
            ctx.borrow().observability.on_error(&e);
            return Err(e);
        }

        let duration = start.elapsed();
        ctx.borrow().observability.on_step_end(self.index, &value, duration);

        self.result = value.clone();
        self.index += 1;
        if terminal || self.index >= self.total {
            self.done = true;
        }
        Ok(value)
    }

    pub fn get_result(&self) -> &Value {
        &self.result
    }

    fn into_outcome(self) -> Outcome {
        let variables = Context::variables_snapshot(&self.context);
        Outcome { value: self.result, variables }
    }
}
