//! `.length`, `.toString`, `.toNumber`, `.toBool`: the universal conversion
//! and sizing methods available on every value (§3.1 value model).

use crate::context::HostMethod;
use crate::error::RuntimeError;
use crate::value::{format_value, is_truthy, Value};

pub fn all() -> Vec<HostMethod> {
    vec![register_length(), register_to_string(), register_to_number(), register_to_bool()]
}

fn register_length() -> HostMethod {
    super::runtime(
        "length",
        super::rc_fn(|receiver, _args, _ctx, location| match receiver {
            Value::String(s) => Ok(Value::Number(s.chars().count() as f64)),
            Value::List(l) => Ok(Value::Number(l.len() as f64)),
            Value::Dict(d) => Ok(Value::Number(d.len() as f64)),
            Value::Tuple(crate::value::Tuple::Positional(v)) => Ok(Value::Number(v.len() as f64)),
            Value::Tuple(crate::value::Tuple::Named(m)) => Ok(Value::Number(m.len() as f64)),
            Value::Vector(v) => Ok(Value::Number(v.data.len() as f64)),
            other => Err(RuntimeError::type_error(format!("{} has no length", crate::value::infer_type(other)), Some(location))),
        }),
    )
}

fn register_to_string() -> HostMethod {
    super::runtime("toString", super::rc_fn(|receiver, _args, _ctx, _location| Ok(Value::String(format_value(receiver)))))
}

fn register_to_number() -> HostMethod {
    super::runtime(
        "toNumber",
        super::rc_fn(|receiver, _args, _ctx, location| match receiver {
            Value::Number(n) => Ok(Value::Number(*n)),
            Value::Bool(b) => Ok(Value::Number(if *b { 1.0 } else { 0.0 })),
            Value::String(s) => s.trim().parse::<f64>().map(Value::Number).map_err(|_| RuntimeError::type_error(format!("cannot convert '{s}' to a number"), Some(location))),
            other => Err(RuntimeError::type_error(format!("cannot convert {} to a number", crate::value::infer_type(other)), Some(location))),
        }),
    )
}

fn register_to_bool() -> HostMethod {
    super::runtime("toBool", super::rc_fn(|receiver, _args, _ctx, _location| Ok(Value::Bool(is_truthy(receiver)))))
}
