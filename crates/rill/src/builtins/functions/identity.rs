//! `identity(x) -> x`.

use crate::context::HostFunction;
use crate::error::RuntimeError;
use crate::value::Value;

pub fn register() -> HostFunction {
    super::runtime(
        "identity",
        super::rc_fn(|args, _ctx, location| args.first().cloned().ok_or_else(|| missing_arg(location))),
    )
}

fn missing_arg(location: crate::ast::Span) -> RuntimeError {
    RuntimeError::type_error("identity() requires one argument", Some(location))
}
