//! Arithmetic sub-evaluator (§4.10): binary `+ - * / %` over numbers,
//! unary minus, division/modulo-by-zero errors.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{ArithExpr, ArithOp, Span};
use crate::context::Context;
use crate::error::RuntimeError;
use crate::value::{infer_type, Value};

use super::{pipe, EvalResult, Flow};

const ZERO_SPAN: Span = Span { start: 0, end: 0 };

pub fn eval_arith_expr(expr: &ArithExpr, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    match expr {
        ArithExpr::Value(postfix) => pipe::eval_postfix(postfix, ctx),
        ArithExpr::Unary { op, expr } => {
            let v = as_number(eval_arith_expr(expr, ctx)?)?;
            match op {
                ArithOp::Neg | ArithOp::Sub => Ok(Value::Number(-v)),
                _ => Ok(Value::Number(v)),
            }
        }
        ArithExpr::Binary { left, op, right } => {
            let l = as_number(eval_arith_expr(left, ctx)?)?;
            let r = as_number(eval_arith_expr(right, ctx)?)?;
            apply_binary(l, *op, r)
        }
    }
}

fn as_number(value: Value) -> Result<f64, Flow> {
    match value {
        Value::Number(n) => Ok(n),
        other => Err(Flow::Error(RuntimeError::type_error(format!("expected a number, got {}", infer_type(&other)), Some(ZERO_SPAN)))),
    }
}

fn apply_binary(l: f64, op: ArithOp, r: f64) -> EvalResult {
    match op {
        ArithOp::Add => Ok(Value::Number(l + r)),
        ArithOp::Sub => Ok(Value::Number(l - r)),
        ArithOp::Mul => Ok(Value::Number(l * r)),
        ArithOp::Div => {
            if r == 0.0 {
                return Err(Flow::Error(RuntimeError::type_error("division by zero", Some(ZERO_SPAN))));
            }
            Ok(Value::Number(l / r))
        }
        ArithOp::Mod => {
            if r == 0.0 {
                return Err(Flow::Error(RuntimeError::type_error("modulo by zero", Some(ZERO_SPAN))));
            }
            Ok(Value::Number(l % r))
        }
        ArithOp::Neg => Ok(Value::Number(-l)),
    }
}
