//! `type(x) -> string`, the inferred type name (§4.2).

use crate::context::HostFunction;
use crate::error::RuntimeError;
use crate::value::{infer_type, Value};

pub fn register() -> HostFunction {
    super::runtime(
        "type",
        super::rc_fn(|args, _ctx, location| {
            let v = args.first().ok_or_else(|| RuntimeError::type_error("type() requires one argument", Some(location)))?;
            Ok(Value::String(infer_type(v).to_owned()))
        }),
    )
}
