//! String operator methods: `.upper`, `.lower`, `.trim`, `.split`, `.join`,
//! `.replace`, `.contains`, `.startsWith`, `.endsWith`.

use crate::context::HostMethod;
use crate::error::RuntimeError;
use crate::value::Value;

pub fn all() -> Vec<HostMethod> {
    vec![register_upper(), register_lower(), register_trim(), register_split(), register_join(), register_replace(), register_starts_with(), register_ends_with()]
}

fn as_str<'a>(value: &'a Value, method: &str, location: crate::ast::Span) -> Result<&'a str, RuntimeError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(RuntimeError::type_error(format!(".{method} requires a string receiver, got {}", crate::value::infer_type(other)), Some(location))),
    }
}

fn arg_str<'a>(args: &'a [Value], index: usize, method: &str, location: crate::ast::Span) -> Result<&'a str, RuntimeError> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(RuntimeError::type_error(format!(".{method} argument {index} must be a string, got {}", crate::value::infer_type(other)), Some(location))),
        None => Err(RuntimeError::type_error(format!(".{method} requires argument {index}"), Some(location))),
    }
}

fn register_upper() -> HostMethod {
    super::runtime("upper", super::rc_fn(|r, _a, _c, loc| Ok(Value::String(as_str(r, "upper", loc)?.to_uppercase()))))
}

fn register_lower() -> HostMethod {
    super::runtime("lower", super::rc_fn(|r, _a, _c, loc| Ok(Value::String(as_str(r, "lower", loc)?.to_lowercase()))))
}

fn register_trim() -> HostMethod {
    super::runtime("trim", super::rc_fn(|r, _a, _c, loc| Ok(Value::String(as_str(r, "trim", loc)?.trim().to_owned()))))
}

fn register_split() -> HostMethod {
    super::runtime(
        "split",
        super::rc_fn(|r, a, _c, loc| {
            let s = as_str(r, "split", loc)?;
            let sep = arg_str(a, 0, "split", loc)?;
            let parts = if sep.is_empty() {
                s.chars().map(|c| Value::String(c.to_string())).collect()
            } else {
                s.split(sep).map(|p| Value::String(p.to_owned())).collect()
            };
            Ok(Value::List(parts))
        }),
    )
}

fn register_join() -> HostMethod {
    super::runtime(
        "join",
        super::rc_fn(|r, a, _c, loc| {
            let sep = arg_str(a, 0, "join", loc)?;
            match r {
                Value::List(items) => {
                    let strs: Vec<String> = items.iter().map(crate::value::format_value).collect();
                    Ok(Value::String(strs.join(sep)))
                }
                other => Err(RuntimeError::type_error(format!(".join requires a list receiver, got {}", crate::value::infer_type(other)), Some(loc))),
            }
        }),
    )
}

fn register_replace() -> HostMethod {
    super::runtime(
        "replace",
        super::rc_fn(|r, a, _c, loc| {
            let s = as_str(r, "replace", loc)?;
            let from = arg_str(a, 0, "replace", loc)?;
            let to = arg_str(a, 1, "replace", loc)?;
            Ok(Value::String(s.replace(from, to)))
        }),
    )
}

fn register_starts_with() -> HostMethod {
    super::runtime("startsWith", super::rc_fn(|r, a, _c, loc| Ok(Value::Bool(as_str(r, "startsWith", loc)?.starts_with(arg_str(a, 0, "startsWith", loc)?)))))
}

fn register_ends_with() -> HostMethod {
    super::runtime("endsWith", super::rc_fn(|r, a, _c, loc| Ok(Value::Bool(as_str(r, "endsWith", loc)?.ends_with(arg_str(a, 0, "endsWith", loc)?)))))
}
