//! The runtime context (`spec.md` §3.3): a parent-chain scope tree plus the
//! host surface (function/method tables, callbacks, observability,
//! auto-exceptions, timeout, abort signal).

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use indexmap::IndexMap;

use crate::ast::Span;
use crate::builtins;
use crate::callable::{HostFn, HostMethodFn, Param};
use crate::error::{RillResult, RuntimeError, RuntimeErrorKind};
use crate::observability::{NoopObservability, Observability};
use crate::value::{infer_type, Value};

/// Distinguishes whether typed-parameter validation runs at all: runtime
/// built-ins never validate; application callables validate only when
/// `params` is `Some` and non-empty (`spec.md` §9 Open Question #2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Runtime,
    Application,
}

/// A registered host function (§6).
#[derive(Clone)]
pub struct HostFunction {
    pub name: String,
    pub kind: FunctionKind,
    pub params: Option<Vec<Param>>,
    pub func: HostFn,
}

/// A registered host method (§6): same contract, plus a leading receiver.
#[derive(Clone)]
pub struct HostMethod {
    pub name: String,
    pub kind: FunctionKind,
    pub params: Option<Vec<Param>>,
    pub func: HostMethodFn,
}

/// Required `onLog` plus whatever else a host wants to wire up.
pub struct Callbacks {
    pub on_log: Box<dyn Fn(&Value)>,
}

/// An external cooperative-cancellation handle (§3.3, §4.11, §5).
pub trait AbortSignal {
    fn aborted(&self) -> bool;
}

/// Host-supplied configuration accepted by the context constructor (§6).
pub struct ContextConfig {
    pub variables: HashMap<String, Value>,
    pub functions: Vec<HostFunction>,
    pub methods: Vec<HostMethod>,
    pub on_log: Box<dyn Fn(&Value)>,
    pub observability: Rc<dyn Observability>,
    pub auto_exceptions: Vec<String>,
    pub timeout: Option<Duration>,
    pub signal: Option<Rc<dyn AbortSignal>>,
    pub max_recursion_depth: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            variables: HashMap::new(),
            functions: Vec::new(),
            methods: Vec::new(),
            on_log: Box::new(|_| {}),
            observability: Rc::new(NoopObservability),
            auto_exceptions: Vec::new(),
            timeout: None,
            signal: None,
            max_recursion_depth: crate::DEFAULT_MAX_RECURSION_DEPTH,
        }
    }
}

/// RAII recursion-depth accounting shared across an entire evaluation
/// (`spec.md` §5 ambient hardening; grounded in the teacher's
/// `check_recursion_depth`). Dropping the guard always restores the
/// counter, even when an error unwinds through it.
pub struct RecursionGuard {
    counter: Rc<Cell<usize>>,
}

impl Drop for RecursionGuard {
    fn drop(&mut self) {
        self.counter.set(self.counter.get() - 1);
    }
}

/// One node in the parent-chain scope tree.
pub struct Context {
    variables: HashMap<String, Value>,
    variable_types: HashMap<String, &'static str>,
    pub pipe_value: Value,
    pub functions: Rc<IndexMap<String, HostFunction>>,
    pub methods: Rc<IndexMap<String, HostMethod>>,
    pub callbacks: Rc<Callbacks>,
    pub observability: Rc<dyn Observability>,
    pub auto_exceptions: Rc<Vec<regex::Regex>>,
    pub timeout: Option<Duration>,
    pub signal: Option<Rc<dyn AbortSignal>>,
    pub max_recursion_depth: usize,
    recursion_depth: Rc<Cell<usize>>,
    parent: Option<Rc<RefCell<Context>>>,
}

impl Context {
    /// Builds the root context, compiling `autoExceptions` patterns eagerly
    /// (`RUNTIME_INVALID_PATTERN` on a bad regex, per §6).
    pub fn new_root(config: ContextConfig) -> RillResult<Rc<RefCell<Context>>> {
        let mut functions = builtins::function_table();
        for f in config.functions {
            functions.insert(f.name.clone(), f);
        }
        let mut methods = builtins::method_table();
        for m in config.methods {
            methods.insert(m.name.clone(), m);
        }
        let mut auto_exceptions = Vec::with_capacity(config.auto_exceptions.len());
        for source in config.auto_exceptions {
            let re = regex::Regex::new(&source).map_err(|e| RuntimeError::invalid_pattern(&source, &e.to_string()))?;
            auto_exceptions.push(re);
        }

        let mut variable_types = HashMap::new();
        for (name, value) in &config.variables {
            variable_types.insert(name.clone(), infer_type(value));
        }

        let ctx = Context {
            variables: config.variables,
            variable_types,
            pipe_value: Value::Null,
            functions: Rc::new(functions),
            methods: Rc::new(methods),
            callbacks: Rc::new(Callbacks { on_log: config.on_log }),
            observability: config.observability,
            auto_exceptions: Rc::new(auto_exceptions),
            timeout: config.timeout,
            signal: config.signal,
            max_recursion_depth: config.max_recursion_depth,
            recursion_depth: Rc::new(Cell::new(0)),
            parent: None,
        };
        Ok(Rc::new(RefCell::new(ctx)))
    }

    /// A nested scope for a block/loop/conditional body: fresh bindings,
    /// shared host surface, `parent` set so lookups and the anti-shadowing
    /// check (invariant 3) walk up to `self`.
    pub fn child(self_rc: &Rc<RefCell<Context>>) -> Rc<RefCell<Context>> {
        let me = self_rc.borrow();
        let child = Context {
            variables: HashMap::new(),
            variable_types: HashMap::new(),
            pipe_value: me.pipe_value.clone(),
            functions: me.functions.clone(),
            methods: me.methods.clone(),
            callbacks: me.callbacks.clone(),
            observability: me.observability.clone(),
            auto_exceptions: me.auto_exceptions.clone(),
            timeout: me.timeout,
            signal: me.signal.clone(),
            max_recursion_depth: me.max_recursion_depth,
            recursion_depth: me.recursion_depth.clone(),
            parent: Some(self_rc.clone()),
        };
        drop(me);
        Rc::new(RefCell::new(child))
    }

    /// A fresh call frame for a script-callable invocation (§4.3.2c): the
    /// new context's variables *start from a clone of the defining scope's
    /// flattened variables*, not a parent link, so later reassignment of a
    /// captured name (made through the defining scope, by reference) is
    /// visible on the *next* call without retaining today's snapshot.
    pub fn call_frame(defining_scope: &Rc<RefCell<Context>>, pipe_value: Value) -> RillResult<(Rc<RefCell<Context>>, RecursionGuard)> {
        let scope = defining_scope.borrow();
        let (variables, variable_types) = flatten(defining_scope);
        let counter = scope.recursion_depth.clone();
        let depth = counter.get();
        if depth >= scope.max_recursion_depth {
            return Err(RuntimeError::type_error(format!("maximum recursion depth exceeded ({depth})"), None));
        }
        counter.set(depth + 1);
        let frame = Context {
            variables,
            variable_types,
            pipe_value,
            functions: scope.functions.clone(),
            methods: scope.methods.clone(),
            callbacks: scope.callbacks.clone(),
            observability: scope.observability.clone(),
            auto_exceptions: scope.auto_exceptions.clone(),
            timeout: scope.timeout,
            signal: scope.signal.clone(),
            max_recursion_depth: scope.max_recursion_depth,
            recursion_depth: counter.clone(),
            parent: None,
        };
        drop(scope);
        Ok((Rc::new(RefCell::new(frame)), RecursionGuard { counter }))
    }

    /// Invariant 1: walk `parent` until the name is found.
    pub fn get_variable(&self, name: &str) -> Option<Value> {
        if let Some(v) = self.variables.get(name) {
            return Some(v.clone());
        }
        self.parent.as_ref().and_then(|p| p.borrow().get_variable(name))
    }

    pub fn get_variable_type(&self, name: &str) -> Option<&'static str> {
        if let Some(t) = self.variable_types.get(name) {
            return Some(*t);
        }
        self.parent.as_ref().and_then(|p| p.borrow().get_variable_type(name))
    }

    fn ancestor_has(&self, name: &str) -> bool {
        self.parent.as_ref().is_some_and(|p| {
            let p = p.borrow();
            p.variables.contains_key(name) || p.ancestor_has(name)
        })
    }

    /// Invariants 2 and 3: first assignment in a scope locks the type;
    /// subsequent assignments in the *same* scope must match; a child scope
    /// may not introduce a name that shadows an ancestor.
    pub fn set_variable(&mut self, name: &str, value: Value, explicit_type: Option<&str>) -> RillResult<()> {
        let inferred = infer_type(&value);
        if let Some(explicit) = explicit_type {
            if explicit != inferred {
                return Err(RuntimeError::type_error(
                    format!("cannot assign {inferred} value to ${name}: declared type is {explicit}"),
                    None,
                ));
            }
        }
        if let Some(&locked) = self.variable_types.get(name) {
            if locked != inferred {
                return Err(RuntimeError::type_error(
                    format!("${name} is locked to type {locked}, cannot assign {inferred} value"),
                    None,
                ));
            }
        } else if self.ancestor_has(name) {
            return Err(RuntimeError::type_error(format!("${name} shadows a binding in an enclosing scope"), None));
        } else {
            self.variable_types.insert(name.to_owned(), explicit_type.map_or(inferred, |_| inferred));
        }
        self.variables.insert(name.to_owned(), value);
        Ok(())
    }

    pub fn check_abort(&self, location: Option<Span>) -> RillResult<()> {
        if self.signal.as_ref().is_some_and(|s| s.aborted()) {
            return Err(RuntimeError::Abort { location });
        }
        Ok(())
    }

    /// Flattened snapshot of every binding visible from `self_rc`, root to
    /// leaf, for the driver's final `{ value, variables }` result (§4.1).
    pub fn variables_snapshot(self_rc: &Rc<RefCell<Context>>) -> HashMap<String, Value> {
        flatten(self_rc).0
    }

    /// Runs the `autoExceptions` check against a string pipe value (§4.4).
    pub fn check_auto_exception(&self, value: &Value, location: Option<Span>) -> RillResult<()> {
        if let Value::String(s) = value {
            for pattern in self.auto_exceptions.iter() {
                if pattern.is_match(s) {
                    return Err(RuntimeError::AutoException { pattern_source: pattern.as_str().to_owned(), value: s.clone(), location });
                }
            }
        }
        Ok(())
    }
}

/// Collects every ancestor's bindings into one flat map, root-to-leaf so
/// closer scopes win, for closure-call snapshotting (§4.3.2c).
fn flatten(scope: &Rc<RefCell<Context>>) -> (HashMap<String, Value>, HashMap<String, &'static str>) {
    let mut chain = Vec::new();
    let mut cur = Some(scope.clone());
    while let Some(c) = cur {
        let borrowed = c.borrow();
        chain.push(c.clone());
        cur = borrowed.parent.clone();
    }
    let mut variables = HashMap::new();
    let mut variable_types = HashMap::new();
    for ctx_rc in chain.into_iter().rev() {
        let ctx = ctx_rc.borrow();
        for (k, v) in &ctx.variables {
            variables.insert(k.clone(), v.clone());
        }
        for (k, t) in &ctx.variable_types {
            variable_types.insert(k.clone(), *t);
        }
    }
    (variables, variable_types)
}
