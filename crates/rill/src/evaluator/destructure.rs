//! Destructure `:<…>` (§4.5.6): positional or keyed binding, always
//! passing the original input through unchanged.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{DestructureElement, DestructurePattern};
use crate::context::Context;
use crate::error::RuntimeError;
use crate::value::{infer_type, Value};

pub fn apply_destructure(pattern: &DestructurePattern, input: Value, ctx: &Rc<RefCell<Context>>) -> Result<Value, RuntimeError> {
    let first_key = pattern.elements.iter().find(|e| !matches!(e, DestructureElement::Skip));
    match first_key {
        Some(DestructureElement::Keyed { .. }) => bind_keyed(pattern, &input, ctx)?,
        _ => bind_positional(pattern, &input, ctx)?,
    }
    Ok(input)
}

fn bind_positional(pattern: &DestructurePattern, input: &Value, ctx: &Rc<RefCell<Context>>) -> Result<(), RuntimeError> {
    let Value::List(items) = input else {
        return Err(RuntimeError::type_error(format!("positional destructure requires a list, got {}", infer_type(input)), None));
    };
    if items.len() != pattern.elements.len() {
        return Err(RuntimeError::type_error(format!("destructure length mismatch: pattern has {} elements, value has {}", pattern.elements.len(), items.len()), None));
    }
    for (element, value) in pattern.elements.iter().zip(items) {
        match element {
            DestructureElement::Skip => {}
            DestructureElement::Positional { name, type_annotation } => {
                ctx.borrow_mut().set_variable(name, value.clone(), type_annotation.as_deref())?;
            }
            DestructureElement::Keyed { .. } => {
                return Err(RuntimeError::type_error("cannot mix positional and keyed destructure elements", None));
            }
            DestructureElement::Nested(nested) => {
                bind_positional(nested, value, ctx)?;
            }
        }
    }
    Ok(())
}

fn bind_keyed(pattern: &DestructurePattern, input: &Value, ctx: &Rc<RefCell<Context>>) -> Result<(), RuntimeError> {
    let Value::Dict(map) = input else {
        return Err(RuntimeError::type_error(format!("keyed destructure requires a dict, got {}", infer_type(input)), None));
    };
    for element in &pattern.elements {
        match element {
            DestructureElement::Skip => {}
            DestructureElement::Keyed { key, name, type_annotation } => {
                let value = map.get(key).cloned().ok_or_else(|| RuntimeError::property_not_found(format!("missing key '{key}' in keyed destructure"), None))?;
                ctx.borrow_mut().set_variable(name, value, type_annotation.as_deref())?;
            }
            DestructureElement::Positional { .. } => {
                return Err(RuntimeError::type_error("cannot mix positional and keyed destructure elements", None));
            }
            DestructureElement::Nested(_) => {
                return Err(RuntimeError::type_error("nested patterns are not permitted inside a keyed destructure", None));
            }
        }
    }
    Ok(())
}
