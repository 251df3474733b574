//! Extension namespacing (§6): rewrites a named bundle of host functions
//! to `namespace::name` and separates its `dispose` hook from the function
//! table the runtime consumes. The runtime itself never calls `dispose`;
//! it is handed back to the host for lifecycle management.

use crate::context::HostFunction;
use crate::error::{RillResult, RuntimeError};

/// A named bundle of host functions plus an optional teardown hook, before
/// namespacing (`namespace_extension`) folds it into `ContextConfig.functions`.
pub struct ExtensionSource {
    pub namespace: String,
    pub functions: Vec<HostFunction>,
    pub dispose: Option<Box<dyn FnOnce()>>,
}

/// The result of namespacing an [`ExtensionSource`]: a function table ready
/// for `ContextConfig.functions`, plus the separated `dispose` hook.
pub struct Extension {
    pub functions: Vec<HostFunction>,
    pub dispose: Option<Box<dyn FnOnce()>>,
}

fn is_valid_namespace(namespace: &str) -> bool {
    !namespace.is_empty() && namespace.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Validates `source.namespace` against `[A-Za-z0-9_-]+`, rewrites every
/// function's name to `namespace::name`, and separates `dispose` from the
/// function table.
pub fn namespace_extension(source: ExtensionSource) -> RillResult<Extension> {
    if !is_valid_namespace(&source.namespace) {
        return Err(RuntimeError::invalid_namespace(&source.namespace));
    }
    let functions = source
        .functions
        .into_iter()
        .map(|mut f| {
            f.name = format!("{}::{}", source.namespace, f.name);
            f
        })
        .collect();
    Ok(Extension { functions, dispose: source.dispose })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FunctionKind;
    use std::rc::Rc;

    fn stub(name: &str) -> HostFunction {
        HostFunction { name: name.to_owned(), kind: FunctionKind::Application, params: None, func: Rc::new(|_a, _c, _l| Ok(crate::value::Value::Null)) }
    }

    #[test]
    fn rewrites_names_under_the_namespace() {
        let ext = namespace_extension(ExtensionSource { namespace: "geo".to_owned(), functions: vec![stub("distance")], dispose: None }).unwrap();
        assert_eq!(ext.functions[0].name, "geo::distance");
    }

    #[test]
    fn rejects_a_namespace_with_invalid_characters() {
        let err = namespace_extension(ExtensionSource { namespace: "geo!".to_owned(), functions: vec![], dispose: None }).unwrap_err();
        assert_eq!(err.code(), "RUNTIME_INVALID_NAMESPACE");
    }

    #[test]
    fn separates_dispose_without_calling_it() {
        let called = Rc::new(std::cell::Cell::new(false));
        let flag = called.clone();
        let dispose: Box<dyn FnOnce()> = Box::new(move || flag.set(true));
        let ext = namespace_extension(ExtensionSource { namespace: "geo".to_owned(), functions: vec![], dispose: Some(dispose) }).unwrap();
        assert!(!called.get());
        assert!(ext.dispose.is_some());
    }
}
