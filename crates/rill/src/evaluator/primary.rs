//! Primary expressions (§4.5.3).

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::{DictEntryValue, DictKey, DictLiteral, Primary};
use crate::callable::{Callable, Param, ScriptCallable};
use crate::context::Context;
use crate::error::RuntimeError;
use crate::value::{Value, RESERVED_DICT_KEYS};

use super::{access, arithmetic, call, control, interpolation, pipe, spread, EvalResult, Flow};

pub fn eval_primary(primary: &Primary, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    match primary {
        Primary::StringLiteral(template) => interpolation::eval_string_template(template, ctx),
        Primary::NumberLiteral(n) => Ok(Value::Number(*n)),
        Primary::BoolLiteral(b) => Ok(Value::Bool(*b)),
        Primary::NullLiteral => Ok(Value::Null),
        Primary::TupleLiteral(elements) => {
            let mut items = Vec::with_capacity(elements.len());
            for e in elements {
                items.push(pipe::eval_pipe_chain(e, ctx)?);
            }
            Ok(Value::List(items))
        }
        Primary::DictLiteral(dict) => eval_dict_literal(dict, ctx),
        Primary::ClosureLiteral(closure) => eval_closure_literal(closure, ctx),
        Primary::Variable(var_ref) => access::eval_variable_ref(var_ref, ctx),
        Primary::FunctionCall { name, args } => call::eval_function_call(name, args, ctx),
        Primary::VariableCall { name, args } => call::eval_variable_call(name, args, ctx),
        Primary::BareMethodCall { name, args } => {
            let receiver = ctx.borrow().pipe_value.clone();
            let evaluated = pipe::eval_args(args, ctx)?;
            call::dispatch_method(name, receiver, evaluated, ctx, crate::ast::Span::new(0, 0))
        }
        Primary::Conditional(cond) => control::eval_conditional(cond, ctx),
        Primary::While(loop_node) => control::eval_while(loop_node, ctx, false),
        Primary::DoWhile(loop_node) => control::eval_while(loop_node, ctx, true),
        Primary::For(for_node) => control::eval_for(for_node, ctx),
        Primary::Block(block) => control::eval_block_expression(block, ctx),
        Primary::Grouped(grouped) => eval_grouped(grouped, ctx),
        Primary::Spread(inner) => {
            let value = pipe::eval_pipe_chain(inner, ctx)?;
            spread::bare_spread(&value, crate::ast::Span::new(0, 0)).map_err(Flow::Error)
        }
    }
}

fn eval_grouped(grouped: &crate::ast::Grouped, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    let mut value = arithmetic::eval_arith_expr(&grouped.head, ctx)?;
    for target in &grouped.targets {
        ctx.borrow_mut().pipe_value = value.clone();
        value = super::dispatch::eval_pipe_target(target, value, ctx)?;
    }
    pipe::apply_terminator(grouped.terminator.as_ref(), value, ctx, 0)
}

/// Dict literal construction (§4.6.3): evaluate entries, forbid reserved
/// names, then back-bind every callable entry's `boundDict`.
fn eval_dict_literal(dict: &DictLiteral, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    let mut entries: IndexMap<String, Value> = IndexMap::new();
    let mut default_value = None;
    for entry in &dict.entries {
        let value = eval_dict_entry_value(&entry.value, ctx)?;
        for key in &entry.keys {
            match key {
                DictKey::Literal(name) => {
                    if RESERVED_DICT_KEYS.contains(&name.as_str()) {
                        return Err(Flow::Error(RuntimeError::type_error(format!("'{name}' is a reserved dict key"), None)));
                    }
                    entries.insert(name.clone(), value.clone());
                }
                DictKey::Default => default_value = Some(value.clone()),
            }
        }
    }
    if let Some(default_expr) = &dict.default_value {
        default_value = Some(pipe::eval_pipe_chain(default_expr, ctx)?);
    }
    if let Some(default) = default_value {
        entries.insert("default".to_owned(), default);
    }

    let finalized = Value::Dict(entries.clone());
    let mut rebound = IndexMap::with_capacity(entries.len());
    for (k, v) in entries {
        let bound = if let Value::Callable(c) = &v { Value::Callable(c.with_bound_dict(finalized.clone())) } else { v };
        rebound.insert(k, bound);
    }
    Ok(Value::Dict(rebound))
}

fn eval_dict_entry_value(value: &DictEntryValue, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    match value {
        DictEntryValue::Closure(closure) => eval_closure_literal(closure, ctx),
        DictEntryValue::Block(block) => Ok(block_closure(block.clone(), ctx)),
        DictEntryValue::Expr(expr) => pipe::eval_pipe_chain(expr, ctx),
    }
}

/// Wraps a bare `{ ... }` dict value as a single-implicit-`$`-parameter
/// closure (a "block-closure", §4.6.3).
fn block_closure(body: crate::ast::Block, ctx: &Rc<RefCell<Context>>) -> Value {
    let params = vec![Param { name: "$".to_owned(), type_annotation: None, default: None }];
    Value::Callable(Callable::Script(Rc::new(ScriptCallable {
        params,
        body,
        defining_scope: ctx.clone(),
        annotations: IndexMap::new(),
        is_property: false,
        bound_dict: None,
    })))
}

fn eval_closure_literal(closure: &crate::ast::ClosureLiteral, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    let mut params = Vec::with_capacity(closure.params.len());
    for p in &closure.params {
        let default = p.default.as_ref().map(|d| pipe::eval_pipe_chain(d, ctx)).transpose()?;
        params.push(Param { name: p.name.clone(), type_annotation: p.type_annotation.clone(), default });
    }
    let mut annotations = IndexMap::new();
    for (name, expr) in &closure.annotations {
        annotations.insert(name.clone(), pipe::eval_pipe_chain(expr, ctx)?);
    }
    let is_property = params.is_empty();
    Ok(Value::Callable(Callable::Script(Rc::new(ScriptCallable {
        params,
        body: closure.body.clone(),
        defining_scope: ctx.clone(),
        annotations,
        is_property,
        bound_dict: None,
    }))))
}
