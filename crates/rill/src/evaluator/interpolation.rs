//! String interpolation (§4.8): literal parts pass through verbatim,
//! embedded expressions are evaluated against a saved/restored pipe value
//! and formatted via `format_value`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{StringPart, StringTemplate};
use crate::context::Context;
use crate::value::{format_value, Value};

use super::{pipe, EvalResult};

pub fn eval_string_template(template: &StringTemplate, ctx: &Rc<RefCell<Context>>) -> EvalResult {
    if template.parts.len() == 1 {
        if let StringPart::Literal(s) = &template.parts[0] {
            return Ok(Value::String(s.clone()));
        }
    }
    let mut out = String::new();
    for part in &template.parts {
        match part {
            StringPart::Literal(s) => out.push_str(s),
            StringPart::Expr(expr) => {
                let value = pipe::eval_pipe_chain(expr, ctx)?;
                out.push_str(&format_value(&value));
            }
        }
    }
    Ok(Value::String(out))
}
