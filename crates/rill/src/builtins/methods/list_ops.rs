//! `.contains`: membership test, shared across strings (substring), lists
//! (deep-equals element search), and dicts (key presence).

use crate::context::HostMethod;
use crate::error::RuntimeError;
use crate::value::{deep_equals, infer_type, Value};

pub fn all() -> Vec<HostMethod> {
    vec![register_contains()]
}

fn register_contains() -> HostMethod {
    super::runtime(
        "contains",
        super::rc_fn(|receiver, args, _ctx, location| {
            let needle = args.first().ok_or_else(|| RuntimeError::type_error(".contains requires one argument", Some(location)))?;
            match receiver {
                Value::String(s) => match needle {
                    Value::String(n) => Ok(Value::Bool(s.contains(n.as_str()))),
                    other => Err(RuntimeError::type_error(format!(".contains on a string requires a string argument, got {}", infer_type(other)), Some(location))),
                },
                Value::List(items) => Ok(Value::Bool(items.iter().any(|v| deep_equals(v, needle)))),
                Value::Dict(dict) => match needle {
                    Value::String(key) => Ok(Value::Bool(dict.contains_key(key))),
                    other => Err(RuntimeError::type_error(format!(".contains on a dict requires a string key, got {}", infer_type(other)), Some(location))),
                },
                other => Err(RuntimeError::type_error(format!(".contains is not defined for {}", infer_type(other)), Some(location))),
            }
        }),
    )
}
