//! The fixed host method table (§2 row "Built-ins"): length, conversions,
//! string operators, list membership, vector ops, and iterator
//! constructors. One file per family, mirroring `builtins/functions/`.

mod comparisons;
mod convert;
mod iterator_ops;
mod list_ops;
mod string_ops;
mod vector_ops;

use std::rc::Rc;

use crate::context::{FunctionKind, HostMethod};

pub fn all() -> Vec<HostMethod> {
    let mut methods = Vec::new();
    methods.extend(comparisons::all());
    methods.extend(convert::all());
    methods.extend(string_ops::all());
    methods.extend(list_ops::all());
    methods.extend(vector_ops::all());
    methods.extend(iterator_ops::all());
    methods
}

pub(super) fn runtime(name: &str, func: crate::callable::HostMethodFn) -> HostMethod {
    HostMethod { name: name.to_owned(), kind: FunctionKind::Runtime, params: None, func }
}

pub(super) fn rc_fn<F>(f: F) -> crate::callable::HostMethodFn
where
    F: Fn(&crate::value::Value, &[crate::value::Value], &crate::context::Context, crate::ast::Span) -> crate::error::RillResult<crate::value::Value> + 'static,
{
    Rc::new(f)
}
