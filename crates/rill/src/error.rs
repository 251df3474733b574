//! The runtime's single tagged error family.
//!
//! Modeled on `exception_private.rs` / `resource.rs` in the teacher: a plain
//! enum with a hand-written `Display` and `std::error::Error` impl rather
//! than a `thiserror`-derived one, since the teacher's own dependency graph
//! never reaches for that crate.

use std::fmt;

use indexmap::IndexMap;

use crate::ast::Span;
use crate::value::Value;

/// Stable error codes, grouped by origin as described in `spec.md` §7.
/// Only the `R` (runtime) group has concrete variants here — lexer and
/// parser codes (`L`, `P`) belong to the out-of-scope front end, and `C`
/// (compiler/configuration) is reserved for host-side configuration errors
/// such as [`RuntimeErrorKind::InvalidPattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    UndefinedVariable,
    UndefinedFunction,
    UndefinedMethod,
    UndefinedAnnotation,
    Type,
    PropertyNotFound,
    InvalidPattern,
    InvalidNamespace,
}

impl RuntimeErrorKind {
    /// The stable code string a host can match on.
    pub fn code(self) -> &'static str {
        match self {
            Self::UndefinedVariable => "RUNTIME_UNDEFINED_VARIABLE",
            Self::UndefinedFunction => "RUNTIME_UNDEFINED_FUNCTION",
            Self::UndefinedMethod => "RUNTIME_UNDEFINED_METHOD",
            Self::UndefinedAnnotation => "RUNTIME_UNDEFINED_ANNOTATION",
            Self::Type => "RUNTIME_TYPE_ERROR",
            Self::PropertyNotFound => "RUNTIME_PROPERTY_NOT_FOUND",
            Self::InvalidPattern => "RUNTIME_INVALID_PATTERN",
            Self::InvalidNamespace => "RUNTIME_INVALID_NAMESPACE",
        }
    }
}

/// The single error family produced by the runtime (§7).
///
/// `Runtime` carries the documented runtime codes; `Timeout`, `Abort`, and
/// `AutoException` are the three sibling kinds the spec calls out as
/// extending the family with their own semantics rather than a generic
/// message.
#[derive(Debug, Clone)]
pub enum RuntimeError {
    Runtime {
        kind: RuntimeErrorKind,
        message: String,
        location: Option<Span>,
        detail: Option<IndexMap<String, Value>>,
    },
    Timeout {
        function_name: String,
        ms: u64,
        location: Option<Span>,
    },
    Abort {
        location: Option<Span>,
    },
    AutoException {
        pattern_source: String,
        value: String,
        location: Option<Span>,
    },
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, message: impl Into<String>, location: Option<Span>) -> Self {
        Self::Runtime { kind, message: message.into(), location, detail: None }
    }

    pub fn with_detail(mut self, key: &str, value: Value) -> Self {
        if let Self::Runtime { detail, .. } = &mut self {
            detail.get_or_insert_with(IndexMap::new).insert(key.to_owned(), value);
        }
        self
    }

    pub fn undefined_variable(name: &str, location: Option<Span>) -> Self {
        Self::new(RuntimeErrorKind::UndefinedVariable, format!("undefined variable '${name}'"), location)
    }

    pub fn undefined_function(name: &str, location: Option<Span>) -> Self {
        Self::new(RuntimeErrorKind::UndefinedFunction, format!("undefined function '{name}'"), location)
    }

    pub fn undefined_method(name: &str, location: Option<Span>) -> Self {
        Self::new(RuntimeErrorKind::UndefinedMethod, format!("undefined method '.{name}'"), location)
    }

    pub fn undefined_annotation(name: &str, location: Option<Span>) -> Self {
        Self::new(RuntimeErrorKind::UndefinedAnnotation, format!("undefined annotation '^{name}'"), location)
    }

    pub fn type_error(message: impl Into<String>, location: Option<Span>) -> Self {
        Self::new(RuntimeErrorKind::Type, message, location)
    }

    pub fn property_not_found(message: impl Into<String>, location: Option<Span>) -> Self {
        Self::new(RuntimeErrorKind::PropertyNotFound, message, location)
    }

    pub fn invalid_pattern(source: &str, reason: &str) -> Self {
        Self::new(RuntimeErrorKind::InvalidPattern, format!("invalid autoException pattern '{source}': {reason}"), None)
    }

    pub fn invalid_namespace(namespace: &str) -> Self {
        Self::new(RuntimeErrorKind::InvalidNamespace, format!("extension namespace '{namespace}' must match [A-Za-z0-9_-]+"), None)
    }

    /// The stable code string, shared across the sibling kinds.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Runtime { kind, .. } => kind.code(),
            Self::Timeout { .. } => "RUNTIME_TIMEOUT",
            Self::Abort { .. } => "RUNTIME_ABORT",
            Self::AutoException { .. } => "RUNTIME_AUTO_EXCEPTION",
        }
    }

    pub fn location(&self) -> Option<Span> {
        match self {
            Self::Runtime { location, .. }
            | Self::Timeout { location, .. }
            | Self::Abort { location }
            | Self::AutoException { location, .. } => *location,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Runtime { message, .. } => write!(f, "{message}"),
            Self::Timeout { function_name, ms, .. } => {
                write!(f, "call to '{function_name}' timed out after {ms}ms")
            }
            Self::Abort { .. } => write!(f, "execution aborted"),
            Self::AutoException { pattern_source, value, .. } => {
                write!(f, "auto-exception: value '{value}' matched pattern /{pattern_source}/")
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

pub type RillResult<T> = Result<T, RuntimeError>;
