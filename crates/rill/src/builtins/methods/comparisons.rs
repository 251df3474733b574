//! Comparison methods (§2 built-ins row): `.equals`/`.compare`, the method
//! surface over the same `deepEquals`/`compareValues` helpers the
//! `==`/`<` operators use (§4.10).

use std::cmp::Ordering;

use crate::context::HostMethod;
use crate::value::{compare_values, deep_equals, Value};

pub fn all() -> Vec<HostMethod> {
    vec![register_equals(), register_compare()]
}

fn register_equals() -> HostMethod {
    super::runtime(
        "equals",
        super::rc_fn(|receiver, args, _ctx, location| {
            let other = arg(args, location)?;
            Ok(Value::Bool(deep_equals(receiver, other)))
        }),
    )
}

/// Returns `-1`/`0`/`1`, matching the ordering `<`/`>` use: numeric when
/// both sides are numbers, else lexicographic on `formatValue`.
fn register_compare() -> HostMethod {
    super::runtime(
        "compare",
        super::rc_fn(|receiver, args, _ctx, location| {
            let other = arg(args, location)?;
            let n = match compare_values(receiver, other) {
                Ordering::Less => -1.0,
                Ordering::Equal => 0.0,
                Ordering::Greater => 1.0,
            };
            Ok(Value::Number(n))
        }),
    )
}

fn arg(args: &[Value], location: crate::ast::Span) -> crate::error::RillResult<&Value> {
    args.first().ok_or_else(|| crate::error::RuntimeError::type_error("expected one argument", Some(location)))
}
