mod support;

use pretty_assertions::assert_eq;
use rill::ast::{ArithOp, CmpOp, PipeTarget, Primary};
use rill::{execute, Context, ContextConfig, Value};
use support::*;

fn run(stmts: Vec<rill::ast::Statement>) -> rill::Outcome {
    let ctx = Context::new_root(ContextConfig::default()).unwrap();
    execute(&script(stmts), ctx).unwrap()
}

#[test]
fn capture_binds_a_variable_and_locks_its_type() {
    let outcome = run(vec![stmt(capture(num(5.0), "x")), stmt(func_call("type", vec![var_named("x")]))]);
    assert_eq!(outcome.value, Value::String("number".to_owned()));
    assert_eq!(outcome.variables.get("x"), Some(&Value::Number(5.0)));
}

#[test]
fn reassigning_a_locked_variable_with_a_different_type_is_an_error() {
    let ctx = Context::new_root(ContextConfig::default()).unwrap();
    let prog = script(vec![stmt(capture(num(1.0), "x")), stmt(capture(plain_string("one"), "x"))]);
    let err = execute(&prog, ctx).unwrap_err();
    assert_eq!(err.code(), "RUNTIME_TYPE_ERROR");
}

#[test]
fn arithmetic_respects_precedence_via_explicit_tree_shape() {
    // (2 + 3) * 4 == 20
    let expr = arith_bin(arith_bin(arith_num(2.0), ArithOp::Add, arith_num(3.0)), ArithOp::Mul, arith_num(4.0));
    let grouped = Primary::Grouped(rill::ast::Grouped { head: Box::new(expr), targets: vec![], terminator: None });
    let outcome = run(vec![stmt(chain(grouped))]);
    assert_eq!(outcome.value, Value::Number(20.0));
}

#[test]
fn division_by_zero_is_a_type_error() {
    let expr = arith_bin(arith_num(1.0), ArithOp::Div, arith_num(0.0));
    let grouped = Primary::Grouped(rill::ast::Grouped { head: Box::new(expr), targets: vec![], terminator: None });
    let ctx = Context::new_root(ContextConfig::default()).unwrap();
    let err = execute(&script(vec![stmt(chain(grouped))]), ctx).unwrap_err();
    assert_eq!(err.code(), "RUNTIME_TYPE_ERROR");
}

#[test]
fn comparison_without_an_operator_degenerates_to_truthy() {
    let expr = bool_truthy(arith_num(0.0));
    let cond = rill::ast::Conditional { condition: Box::new(expr), then_branch: Box::new(Primary::NumberLiteral(1.0)), else_branch: Some(Box::new(Primary::NumberLiteral(2.0))) };
    let outcome = run(vec![stmt(chain(Primary::Conditional(cond)))]);
    assert_eq!(outcome.value, Value::Number(2.0));
}

#[test]
fn greater_than_on_numbers_is_numeric_not_lexicographic() {
    let expr = bool_cmp(arith_num(9.0), CmpOp::Gt, arith_num(10.0));
    let cond = rill::ast::Conditional { condition: Box::new(expr), then_branch: Box::new(Primary::BoolLiteral(true)), else_branch: Some(Box::new(Primary::BoolLiteral(false))) };
    let outcome = run(vec![stmt(chain(Primary::Conditional(cond)))]);
    assert_eq!(outcome.value, Value::Bool(false));
}

#[test]
fn string_interpolation_formats_embedded_expressions() {
    let template = rill::ast::StringTemplate {
        parts: vec![
            rill::ast::StringPart::Literal("count: ".to_owned()),
            rill::ast::StringPart::Expr(Box::new(num(3.0))),
        ],
    };
    let outcome = run(vec![stmt(chain(Primary::StringLiteral(template)))]);
    assert_eq!(outcome.value, Value::String("count: 3".to_owned()));
}

#[test]
fn empty_script_yields_null() {
    let outcome = run(vec![]);
    assert_eq!(outcome.value, Value::Null);
}

#[test]
fn pipe_value_flows_between_statements() {
    // 5 -> :> $x   then the pipe value from the previous statement is 5
    let first = stmt(capture(num(5.0), "x"));
    let second = stmt(chain(Primary::Variable(rill::ast::VariableRef { base: rill::ast::VariableBase::Pipe, chain: vec![] })));
    let outcome = run(vec![first, second]);
    assert_eq!(outcome.value, Value::Number(5.0));
}

#[test]
fn list_slice_uses_python_style_bounds() {
    let list = list_literal(vec![num(1.0), num(2.0), num(3.0), num(4.0)]);
    let slice_target = PipeTarget::Slice(rill::ast::SliceSpec { start: Some(Box::new(arith_num(1.0))), stop: Some(Box::new(arith_num(3.0))), step: None });
    let outcome = run(vec![stmt(chain_with(list, vec![slice_target], None))]);
    assert_eq!(outcome.value, Value::List(vec![Value::Number(2.0), Value::Number(3.0)]));
}

#[test]
fn a_stray_top_level_return_halts_the_script_early() {
    // "a" -> return ; "b"   -- the second statement never runs
    let outcome = run(vec![stmt(ret(plain_string("a"))), stmt(plain_string("b"))]);
    assert_eq!(outcome.value, Value::String("a".to_owned()));
}

#[test]
fn a_stray_top_level_break_halts_the_script_early() {
    let outcome = run(vec![stmt(brk(plain_string("a"))), stmt(plain_string("b"))]);
    assert_eq!(outcome.value, Value::String("a".to_owned()));
}

#[test]
fn enumerate_pairs_list_elements_with_their_index() {
    let list = list_literal(vec![plain_string("a"), plain_string("b")]);
    let outcome = run(vec![stmt(chain_with(list, vec![PipeTarget::Enumerate], None))]);
    let Value::List(items) = outcome.value else { panic!("expected a list") };
    assert_eq!(items.len(), 2);
    let Value::Dict(first) = &items[0] else { panic!("expected a dict") };
    assert_eq!(first.get("index"), Some(&Value::Number(0.0)));
    assert_eq!(first.get("value"), Some(&Value::String("a".to_owned())));
}
