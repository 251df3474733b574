//! Observability hooks (`spec.md` §3.3, §6).
//!
//! Modeled directly on the teacher's `tracer.rs`: a trait with one method
//! per event, a [`NoopObservability`] default that the optimizer can erase
//! entirely, and a human-readable [`StderrObservability`] for local
//! debugging. This *is* the crate's logging story — the teacher never pulls
//! in `log`/`tracing` either, preferring a typed hook trait the host
//! controls.

use std::time::Duration;

use crate::ast::Span;
use crate::value::Value;

/// Observability hook points fired by the driver and evaluator.
///
/// All methods have empty default bodies, so a host only overrides the
/// events it cares about.
pub trait Observability {
    fn on_step_start(&self, _index: usize) {}
    fn on_step_end(&self, _index: usize, _value: &Value, _duration: Duration) {}
    fn on_capture(&self, _name: &str, _value: &Value) {}
    fn on_function_call(&self, _name: &str, _args: &[Value], _location: Span) {}
    fn on_function_return(&self, _name: &str, _value: &Value, _duration: Duration) {}
    fn on_error(&self, _error: &crate::error::RuntimeError) {}
    fn on_log_event(&self, _value: &Value) {}
}

/// Zero-cost default: every hook is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObservability;

impl Observability for NoopObservability {}

/// Human-readable execution trace to stderr, for local debugging.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrObservability;

impl Observability for StderrObservability {
    fn on_step_start(&self, index: usize) {
        eprintln!("[rill] step {index} start");
    }

    fn on_step_end(&self, index: usize, value: &Value, duration: Duration) {
        eprintln!("[rill] step {index} end -> {} ({duration:?})", crate::value::format_value(value));
    }

    fn on_capture(&self, name: &str, value: &Value) {
        eprintln!("[rill] capture ${name} = {}", crate::value::format_value(value));
    }

    fn on_function_call(&self, name: &str, args: &[Value], _location: Span) {
        eprintln!("[rill] call {name}({} args)", args.len());
    }

    fn on_function_return(&self, name: &str, value: &Value, duration: Duration) {
        eprintln!("[rill] {name} -> {} ({duration:?})", crate::value::format_value(value));
    }

    fn on_error(&self, error: &crate::error::RuntimeError) {
        eprintln!("[rill] error: {error}");
    }

    fn on_log_event(&self, value: &Value) {
        eprintln!("[rill] log: {}", crate::value::format_value(value));
    }
}
