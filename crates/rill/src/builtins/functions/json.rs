//! `json(x)`: serializes non-string values to canonical JSON, parses string
//! values back to a `Value`. This single overloaded direction is what makes
//! the round-trip law in `spec.md` §8 ("`json ∘ parse-json` is identity on
//! values produced by `json`") hold without a second named builtin.

use crate::context::HostFunction;
use crate::error::RuntimeError;
use crate::value::{canonical_json, from_json_value, Value};

pub fn register() -> HostFunction {
    super::runtime(
        "json",
        super::rc_fn(|args, _ctx, location| {
            let value = args.first().ok_or_else(|| RuntimeError::type_error("json() requires one argument", Some(location)))?;
            match value {
                Value::String(s) => {
                    let parsed: serde_json::Value = serde_json::from_str(s)
                        .map_err(|e| RuntimeError::type_error(format!("invalid json: {e}"), Some(location)))?;
                    Ok(from_json_value(&parsed))
                }
                Value::Callable(_) => Err(RuntimeError::type_error("json() cannot serialize a closure", Some(location))),
                other => Ok(Value::String(canonical_json(other))),
            }
        }),
    )
}
