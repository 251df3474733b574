//! `tool(name, *args)`: dynamic dispatch into the host function table by
//! name, used to reach extension-namespaced functions (`namespace::name`,
//! §6) from script code without a dedicated call syntax per namespace.

use crate::context::HostFunction;
use crate::error::RuntimeError;
use crate::value::Value;

pub fn register() -> HostFunction {
    super::runtime(
        "tool",
        super::rc_fn(|args, ctx, location| {
            let name = match args.first() {
                Some(Value::String(s)) => s.clone(),
                Some(other) => {
                    return Err(RuntimeError::type_error(
                        format!("tool() name must be a string, got {}", crate::value::infer_type(other)),
                        Some(location),
                    ))
                }
                None => return Err(RuntimeError::type_error("tool() requires a function name", Some(location))),
            };
            let func = ctx
                .functions
                .get(&name)
                .map(|hf: &HostFunction| hf.func.clone())
                .ok_or_else(|| RuntimeError::undefined_function(&name, Some(location)))?;
            func(&args[1..], ctx, location)
        }),
    )
}
