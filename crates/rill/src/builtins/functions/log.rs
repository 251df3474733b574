//! `log(x) -> x`, forwarding to the context's required `onLog` callback and
//! passing the value through unchanged so it composes in a pipe chain
//! (`spec.md` §8 scenario 1).

use crate::context::HostFunction;
use crate::value::Value;

pub fn register() -> HostFunction {
    super::runtime(
        "log",
        super::rc_fn(|args, ctx, _location| {
            let value = args.first().cloned().unwrap_or(Value::Null);
            (ctx.callbacks.on_log)(&value);
            ctx.observability.on_log_event(&value);
            Ok(value)
        }),
    )
}
