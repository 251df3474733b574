//! Boolean and comparison sub-evaluators (§4.10).

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{BoolExpr, CmpOp, Comparison};
use crate::context::Context;
use crate::value::{compare_values, deep_equals, is_truthy, Value};

use super::{arithmetic, EvalResult};

pub fn eval_bool_expr(expr: &BoolExpr, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    match expr {
        BoolExpr::Or(a, b) => {
            let left = eval_bool_expr(a, ctx)?;
            if is_truthy(&left) {
                Ok(left)
            } else {
                eval_bool_expr(b, ctx)
            }
        }
        BoolExpr::And(a, b) => {
            let left = eval_bool_expr(a, ctx)?;
            if is_truthy(&left) {
                eval_bool_expr(b, ctx)
            } else {
                Ok(left)
            }
        }
        BoolExpr::Not(a) => Ok(Value::Bool(!is_truthy(&eval_bool_expr(a, ctx)?))),
        BoolExpr::Comparison(cmp) => eval_comparison(cmp, ctx),
    }
}

/// A comparison with no operator degenerates to `isTruthy(left)` (§4.10).
fn eval_comparison(cmp: &Comparison, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    let left = arithmetic::eval_arith_expr(&cmp.left, ctx)?;
    match (&cmp.op, &cmp.right) {
        (Some(op), Some(right_expr)) => {
            let right = arithmetic::eval_arith_expr(right_expr, ctx)?;
            Ok(Value::Bool(apply_cmp(&left, *op, &right)))
        }
        _ => Ok(Value::Bool(is_truthy(&left))),
    }
}

fn apply_cmp(left: &Value, op: CmpOp, right: &Value) -> bool {
    match op {
        CmpOp::Eq => deep_equals(left, right),
        CmpOp::Ne => !deep_equals(left, right),
        CmpOp::Lt => compare_values(left, right).is_lt(),
        CmpOp::Gt => compare_values(left, right).is_gt(),
        CmpOp::Le => compare_values(left, right).is_le(),
        CmpOp::Ge => compare_values(left, right).is_ge(),
    }
}
