//! `enumerate(x)`, `range(start, stop, step?)`, `repeat(value, count?)`:
//! the three builtin entry points into the functional iterator protocol
//! implemented in [`crate::collections`].

use crate::collections::{enumerate_value, range_iterator, repeat_iterator};
use crate::context::HostFunction;
use crate::error::RuntimeError;
use crate::value::Value;

pub fn register_enumerate() -> HostFunction {
    super::runtime(
        "enumerate",
        super::rc_fn(|args, _ctx, location| {
            let value = args.first().ok_or_else(|| RuntimeError::type_error("enumerate() requires one argument", Some(location)))?;
            enumerate_value(value, location)
        }),
    )
}

fn as_number(value: &Value, label: &str, location: crate::ast::Span) -> Result<f64, RuntimeError> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(RuntimeError::type_error(format!("{label} must be a number, got {}", crate::value::infer_type(other)), Some(location))),
    }
}

pub fn register_range() -> HostFunction {
    super::runtime(
        "range",
        super::rc_fn(|args, _ctx, location| {
            let start = args.first().map(|v| as_number(v, "range start", location)).transpose()?.unwrap_or(0.0);
            let stop = args.get(1).ok_or_else(|| RuntimeError::type_error("range() requires a stop value", Some(location)))?;
            let stop = as_number(stop, "range stop", location)?;
            let step = args.get(2).map(|v| as_number(v, "range step", location)).transpose()?.unwrap_or(1.0);
            if step == 0.0 {
                return Err(RuntimeError::type_error("range() step cannot be 0", Some(location)));
            }
            Ok(range_iterator(start, stop, step))
        }),
    )
}

pub fn register_repeat() -> HostFunction {
    super::runtime(
        "repeat",
        super::rc_fn(|args, _ctx, location| {
            let value = args.first().cloned().ok_or_else(|| RuntimeError::type_error("repeat() requires a value", Some(location)))?;
            let count = match args.get(1) {
                Some(Value::Number(n)) => Some(*n as i64),
                Some(Value::Null) | None => None,
                Some(other) => {
                    return Err(RuntimeError::type_error(format!("repeat() count must be a number, got {}", crate::value::infer_type(other)), Some(location)))
                }
            };
            Ok(repeat_iterator(value, count))
        }),
    )
}
