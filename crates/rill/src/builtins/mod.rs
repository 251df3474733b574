//! The fixed set of generic built-in functions and methods (`spec.md` §2,
//! §4.10 excluded — arithmetic/comparison live in the evaluator).
//!
//! One file per concern, grounded in the teacher's `builtins/` directory
//! (one file per Python builtin such as `abs.rs`, `len.rs`, `zip.rs`).

mod functions;
mod methods;

use indexmap::IndexMap;

use crate::context::{HostFunction, HostMethod};

/// Registers the fixed built-in function table. Host functions passed to
/// [`crate::context::ContextConfig`] are layered on top by name, overriding
/// same-named built-ins (§6).
pub fn function_table() -> IndexMap<String, HostFunction> {
    let mut table = IndexMap::new();
    for f in functions::all() {
        table.insert(f.name.clone(), f);
    }
    table
}

/// Registers the fixed built-in method table. Host methods are appended
/// after these, by name (§6).
pub fn method_table() -> IndexMap<String, HostMethod> {
    let mut table = IndexMap::new();
    for m in methods::all() {
        table.insert(m.name.clone(), m);
    }
    table
}
