//! The callable model (`spec.md` §3.2): three variants sharing one
//! invocation surface, with the `boundDict` late-binding back-pointer and
//! the structural/reference equality split the spec requires.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::Block;
use crate::context::Context;
use crate::error::RillResult;
use crate::value::Value;

/// A single formal parameter: name, optional declared type, optional
/// pre-evaluated default value.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub type_annotation: Option<String>,
    pub default: Option<Value>,
}

/// Host-function / host-method signature (§6). Read-only `ctx`; hosts may
/// only reach the world through registered callbacks.
pub type HostFn = Rc<dyn Fn(&[Value], &Context, crate::ast::Span) -> RillResult<Value>>;
pub type HostMethodFn = Rc<dyn Fn(&Value, &[Value], &Context, crate::ast::Span) -> RillResult<Value>>;

/// A script callable: `(params) { body }`, parsed from source.
#[derive(Clone)]
pub struct ScriptCallable {
    pub params: Vec<Param>,
    pub body: Block,
    /// The scope this closure was defined in, captured *by reference* so a
    /// later assignment to a captured name is visible to later invocations
    /// (`spec.md` §9 "Defining-scope capture by reference").
    pub defining_scope: Rc<std::cell::RefCell<Context>>,
    pub annotations: IndexMap<String, Value>,
    pub is_property: bool,
    pub bound_dict: Option<Box<Value>>,
}

impl fmt::Debug for ScriptCallable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptCallable").field("params", &self.params).field("is_property", &self.is_property).finish()
    }
}

/// An internal built-in: untyped params, no validation, reference equality.
#[derive(Clone)]
pub struct RuntimeCallable {
    pub name: String,
    pub func: HostFn,
    pub is_property: bool,
    pub bound_dict: Option<Box<Value>>,
}

impl fmt::Debug for RuntimeCallable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeCallable").field("name", &self.name).finish()
    }
}

/// A host-registered callable: optional typed params, validated by position
/// only when `params` is a non-empty list (`spec.md` §9 Open Question #2).
#[derive(Clone)]
pub struct ApplicationCallable {
    pub name: String,
    pub params: Option<Vec<Param>>,
    pub func: HostFn,
    pub is_property: bool,
    pub bound_dict: Option<Box<Value>>,
}

impl fmt::Debug for ApplicationCallable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationCallable").field("name", &self.name).field("params", &self.params).finish()
    }
}

/// The three callable variants sharing one envelope (§3.2).
#[derive(Debug, Clone)]
pub enum Callable {
    Script(Rc<ScriptCallable>),
    Runtime(Rc<RuntimeCallable>),
    Application(Rc<ApplicationCallable>),
}

impl Callable {
    pub fn is_property(&self) -> bool {
        match self {
            Self::Script(c) => c.is_property,
            Self::Runtime(c) => c.is_property,
            Self::Application(c) => c.is_property,
        }
    }

    pub fn bound_dict(&self) -> Option<&Value> {
        match self {
            Self::Script(c) => c.bound_dict.as_deref(),
            Self::Runtime(c) => c.bound_dict.as_deref(),
            Self::Application(c) => c.bound_dict.as_deref(),
        }
    }

    /// Clones this callable with `boundDict` installed, as happens once per
    /// entry at dict-literal finalization (§4.6.3). Each callable entry
    /// gets its *own* independent clone, never a shared one.
    pub fn with_bound_dict(&self, dict: Value) -> Callable {
        match self {
            Self::Script(c) => {
                let mut inner = (**c).clone();
                inner.bound_dict = Some(Box::new(dict));
                Self::Script(Rc::new(inner))
            }
            Self::Runtime(c) => {
                let mut inner = (**c).clone();
                inner.bound_dict = Some(Box::new(dict));
                Self::Runtime(Rc::new(inner))
            }
            Self::Application(c) => {
                let mut inner = (**c).clone();
                inner.bound_dict = Some(Box::new(dict));
                Self::Application(Rc::new(inner))
            }
        }
    }

    /// `(params) { ... }` rendering used by `formatValue` (§4.2).
    pub fn format_value(&self) -> String {
        let params = match self {
            Self::Script(c) => c.params.iter().map(|p| p.name.clone()).collect::<Vec<_>>().join(", "),
            Self::Runtime(_) | Self::Application(_) => String::new(),
        };
        format!("({params}) {{ ... }}")
    }

    pub fn params(&self) -> Option<&[Param]> {
        match self {
            Self::Script(c) => Some(&c.params),
            Self::Runtime(_) => None,
            Self::Application(c) => c.params.as_deref(),
        }
    }
}

impl PartialEq for Callable {
    /// Structural equality for script callables (same params, AST-structural
    /// body, same defining scope *by reference*, same annotations);
    /// reference equality for runtime/application callables (§3.2).
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Script(a), Self::Script(b)) => {
                a.params == b.params
                    && a.body == b.body
                    && Rc::ptr_eq(&a.defining_scope, &b.defining_scope)
                    && a.annotations == b.annotations
            }
            (Self::Runtime(a), Self::Runtime(b)) => Rc::ptr_eq(a, b),
            (Self::Application(a), Self::Application(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
