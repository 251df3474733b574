//! Slice `/<start:stop:step>` (§4.5.7).

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Span, SliceSpec};
use crate::collections::slice_indices;
use crate::context::Context;
use crate::error::RuntimeError;
use crate::value::{infer_type, Value};

use super::{arithmetic, EvalResult, Flow};

const ZERO_SPAN: Span = Span { start: 0, end: 0 };

fn as_number(value: Value, label: &str) -> Result<f64, Flow> {
    match value {
        Value::Number(n) => Ok(n),
        other => Err(Flow::Error(RuntimeError::type_error(format!("slice {label} must be a number, got {}", infer_type(&other)), Some(ZERO_SPAN)))),
    }
}

pub fn eval_slice(spec: &SliceSpec, input: &Value, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    let start = match &spec.start {
        Some(e) => Some(as_number(arithmetic::eval_arith_expr(e, ctx)?, "start")?),
        None => None,
    };
    let stop = match &spec.stop {
        Some(e) => Some(as_number(arithmetic::eval_arith_expr(e, ctx)?, "stop")?),
        None => None,
    };
    let step = match &spec.step {
        Some(e) => as_number(arithmetic::eval_arith_expr(e, ctx)?, "step")?,
        None => 1.0,
    };
    match input {
        Value::List(items) => {
            let idxs = slice_indices(items.len(), start, stop, step, ZERO_SPAN).map_err(Flow::Error)?;
            Ok(Value::List(idxs.into_iter().map(|i| items[i].clone()).collect()))
        }
        Value::String(s) => {
            let chars: Vec<char> = s.chars().collect();
            let idxs = slice_indices(chars.len(), start, stop, step, ZERO_SPAN).map_err(Flow::Error)?;
            Ok(Value::String(idxs.into_iter().map(|i| chars[i]).collect()))
        }
        other => Err(Flow::Error(RuntimeError::type_error(format!("slice requires a list or string, got {}", infer_type(other)), Some(ZERO_SPAN)))),
    }
}
