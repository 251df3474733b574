//! Vector similarity methods (§3.1): `.dot`, `.cosineSimilarity`,
//! `.euclideanDistance`, `.normalize`, `.norm`. Dimension mismatches
//! surface as a runtime type error (`Vector::check_dims`).

use crate::context::HostMethod;
use crate::error::RuntimeError;
use crate::value::{infer_type, Value, Vector};

pub fn all() -> Vec<HostMethod> {
    vec![register_dot(), register_cosine_similarity(), register_euclidean_distance(), register_normalize(), register_norm()]
}

fn as_vector<'a>(value: &'a Value, method: &str, location: crate::ast::Span) -> Result<&'a Vector, RuntimeError> {
    match value {
        Value::Vector(v) => Ok(v),
        other => Err(RuntimeError::type_error(format!(".{method} requires a vector receiver, got {}", infer_type(other)), Some(location))),
    }
}

fn arg_vector<'a>(args: &'a [Value], method: &str, location: crate::ast::Span) -> Result<&'a Vector, RuntimeError> {
    match args.first() {
        Some(Value::Vector(v)) => Ok(v),
        Some(other) => Err(RuntimeError::type_error(format!(".{method} requires a vector argument, got {}", infer_type(other)), Some(location))),
        None => Err(RuntimeError::type_error(format!(".{method} requires one argument"), Some(location))),
    }
}

fn register_dot() -> HostMethod {
    super::runtime(
        "dot",
        super::rc_fn(|r, a, _c, loc| {
            let this = as_vector(r, "dot", loc)?;
            let other = arg_vector(a, "dot", loc)?;
            this.dot(other).map(Value::Number).map_err(|e| RuntimeError::type_error(e, Some(loc)))
        }),
    )
}

fn register_cosine_similarity() -> HostMethod {
    super::runtime(
        "cosineSimilarity",
        super::rc_fn(|r, a, _c, loc| {
            let this = as_vector(r, "cosineSimilarity", loc)?;
            let other = arg_vector(a, "cosineSimilarity", loc)?;
            this.cosine_similarity(other).map(Value::Number).map_err(|e| RuntimeError::type_error(e, Some(loc)))
        }),
    )
}

fn register_euclidean_distance() -> HostMethod {
    super::runtime(
        "euclideanDistance",
        super::rc_fn(|r, a, _c, loc| {
            let this = as_vector(r, "euclideanDistance", loc)?;
            let other = arg_vector(a, "euclideanDistance", loc)?;
            this.euclidean_distance(other).map(Value::Number).map_err(|e| RuntimeError::type_error(e, Some(loc)))
        }),
    )
}

fn register_normalize() -> HostMethod {
    super::runtime("normalize", super::rc_fn(|r, _a, _c, loc| Ok(Value::Vector(as_vector(r, "normalize", loc)?.normalize()))))
}

fn register_norm() -> HostMethod {
    super::runtime("norm", super::rc_fn(|r, _a, _c, loc| Ok(Value::Number(as_vector(r, "norm", loc)?.l2_norm()))))
}
