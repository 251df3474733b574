//! The eight generic built-in functions named in `spec.md` §2.

mod identity;
mod json;
mod log;
mod range_repeat;
mod tool;
mod type_of;

use std::rc::Rc;

use crate::context::{FunctionKind, HostFunction};

pub fn all() -> Vec<HostFunction> {
    vec![
        identity::register(),
        type_of::register(),
        log::register(),
        json::register(),
        range_repeat::register_enumerate(),
        range_repeat::register_range(),
        range_repeat::register_repeat(),
        tool::register(),
    ]
}

/// Helper used by every registration function below: runtime built-ins
/// carry no param list and skip validation entirely (§3.2).
pub(super) fn runtime(name: &str, func: crate::callable::HostFn) -> HostFunction {
    HostFunction { name: name.to_owned(), kind: FunctionKind::Runtime, params: None, func }
}

pub(super) fn rc_fn<F>(f: F) -> crate::callable::HostFn
where
    F: Fn(&[crate::value::Value], &crate::context::Context, crate::ast::Span) -> crate::error::RillResult<crate::value::Value> + 'static,
{
    Rc::new(f)
}
