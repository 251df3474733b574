mod support;

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use rill::ast::{AccessLink, DictEntryValue, DictKey, PipeTarget, Primary, VariableBase, VariableRef};
use rill::context::{FunctionKind, HostFunction, HostMethod};
use rill::value::Vector;
use rill::{execute, Context, ContextConfig, Value};
use support::*;

fn run(stmts: Vec<rill::ast::Statement>) -> rill::Outcome {
    let ctx = Context::new_root(ContextConfig::default()).unwrap();
    execute(&script(stmts), ctx).unwrap()
}

#[test]
fn tool_dispatches_to_a_registered_host_function_by_name() {
    let double = HostFunction {
        name: "double".to_owned(),
        kind: FunctionKind::Runtime,
        params: None,
        func: Rc::new(|args, _ctx, loc| match args.first() {
            Some(Value::Number(n)) => Ok(Value::Number(n * 2.0)),
            _ => Err(rill::RuntimeError::type_error("double() requires a number", Some(loc))),
        }),
    };
    let config = ContextConfig { functions: vec![double], ..ContextConfig::default() };
    let ctx = Context::new_root(config).unwrap();
    let call = func_call("tool", vec![plain_string("double"), num(21.0)]);
    let outcome = execute(&script(vec![stmt(call)]), ctx).unwrap();
    assert_eq!(outcome.value, Value::Number(42.0));
}

#[test]
fn a_host_function_that_overruns_the_timeout_raises_a_timeout_error() {
    let slow = HostFunction {
        name: "slow".to_owned(),
        kind: FunctionKind::Runtime,
        params: None,
        func: Rc::new(|_args, _ctx, _loc| {
            std::thread::sleep(Duration::from_millis(20));
            Ok(Value::Null)
        }),
    };
    let config = ContextConfig { functions: vec![slow], timeout: Some(Duration::from_millis(1)), ..ContextConfig::default() };
    let ctx = Context::new_root(config).unwrap();
    let err = execute(&script(vec![stmt(func_call("slow", vec![]))]), ctx).unwrap_err();
    assert_eq!(err.code(), "RUNTIME_TIMEOUT");
}

#[test]
fn a_string_result_matching_an_auto_exception_pattern_raises() {
    let config = ContextConfig { auto_exceptions: vec!["^ERROR:".to_owned()], ..ContextConfig::default() };
    let ctx = Context::new_root(config).unwrap();
    let err = execute(&script(vec![stmt(plain_string("ERROR: disk full"))]), ctx).unwrap_err();
    assert_eq!(err.code(), "RUNTIME_AUTO_EXCEPTION");
}

#[test]
fn a_non_matching_string_passes_through_auto_exceptions_untouched() {
    let config = ContextConfig { auto_exceptions: vec!["^ERROR:".to_owned()], ..ContextConfig::default() };
    let ctx = Context::new_root(config).unwrap();
    let outcome = execute(&script(vec![stmt(plain_string("all good"))]), ctx).unwrap();
    assert_eq!(outcome.value, Value::String("all good".to_owned()));
}

#[test]
fn a_host_function_registered_under_a_built_in_name_overrides_it() {
    let shim = HostFunction {
        name: "type".to_owned(),
        kind: FunctionKind::Runtime,
        params: None,
        func: Rc::new(|_args, _ctx, _loc| Ok(Value::String("shimmed".to_owned()))),
    };
    let config = ContextConfig { functions: vec![shim], ..ContextConfig::default() };
    let ctx = Context::new_root(config).unwrap();
    let outcome = execute(&script(vec![stmt(func_call("type", vec![num(1.0)]))]), ctx).unwrap();
    assert_eq!(outcome.value, Value::String("shimmed".to_owned()));
}

#[test]
fn a_host_method_registered_under_a_built_in_name_overrides_it() {
    let shim = HostMethod {
        name: "upper".to_owned(),
        kind: FunctionKind::Runtime,
        params: None,
        func: Rc::new(|_receiver, _args, _ctx, _loc| Ok(Value::String("shimmed".to_owned()))),
    };
    let config = ContextConfig { methods: vec![shim], ..ContextConfig::default() };
    let ctx = Context::new_root(config).unwrap();
    let call = chain(Primary::BareMethodCall { name: "upper".to_owned(), args: vec![] });
    let first = stmt(plain_string("hi"));
    let second = stmt(call);
    let outcome = execute(&script(vec![first, second]), ctx).unwrap();
    assert_eq!(outcome.value, Value::String("shimmed".to_owned()));
}

#[test]
fn range_produces_a_lazy_stepwise_iterator_dict() {
    let outcome = run(vec![stmt(func_call("range", vec![num(0.0), num(2.0)]))]);
    let Value::Dict(iter) = outcome.value else { panic!("expected a dict") };
    assert_eq!(iter.get("value"), Some(&Value::Number(0.0)));
    assert_eq!(iter.get("done"), Some(&Value::Bool(false)));
    assert!(matches!(iter.get("next"), Some(Value::Callable(_))));
}

#[test]
fn repeat_with_a_count_of_zero_is_immediately_done() {
    let outcome = run(vec![stmt(func_call("repeat", vec![plain_string("x"), num(0.0)]))]);
    let Value::Dict(iter) = outcome.value else { panic!("expected a dict") };
    assert_eq!(iter.get("done"), Some(&Value::Bool(true)));
    assert_eq!(iter.get("value"), None);
}

#[test]
fn enumerate_function_matches_the_pipe_target_form() {
    let list = list_literal(vec![plain_string("a")]);
    let via_function = run(vec![stmt(func_call("enumerate", vec![chain(list)]))]);
    let Value::List(items) = via_function.value else { panic!("expected a list") };
    let Value::Dict(first) = &items[0] else { panic!("expected a dict") };
    assert_eq!(first.get("index"), Some(&Value::Number(0.0)));
    assert_eq!(first.get("value"), Some(&Value::String("a".to_owned())));
}

fn vector_ctx() -> std::rc::Rc<std::cell::RefCell<Context>> {
    // vectors have no literal syntax; a host binds them as variables
    let mut variables = std::collections::HashMap::new();
    variables.insert("a".to_owned(), Value::Vector(Vector::new("test", vec![1.0, 2.0, 3.0])));
    variables.insert("b".to_owned(), Value::Vector(Vector::new("test", vec![4.0, 5.0, 6.0])));
    let config = ContextConfig { variables, ..ContextConfig::default() };
    Context::new_root(config).unwrap()
}

#[test]
fn vector_dot_matches_its_arithmetic_definition() {
    let dot_chain = rill::ast::PipeChain { head: method(postfix(named("a")), "dot", vec![var_named("b")]), targets: vec![], terminator: None, span: sp() };
    let outcome = execute(&script(vec![stmt(dot_chain)]), vector_ctx()).unwrap();
    assert_eq!(outcome.value, Value::Number(32.0));
}

#[test]
fn vector_norm_matches_its_arithmetic_definition() {
    let norm_chain = rill::ast::PipeChain { head: method(postfix(named("a")), "norm", vec![]), targets: vec![], terminator: None, span: sp() };
    let outcome = execute(&script(vec![stmt(norm_chain)]), vector_ctx()).unwrap();
    let expected_norm = (1.0_f64 * 1.0 + 2.0 * 2.0 + 3.0 * 3.0).sqrt();
    assert_eq!(outcome.value, Value::Number(expected_norm));
}

#[test]
fn string_methods_chain_left_to_right() {
    // "  Hello World  " -> .trim() .lower() .split(" ") .join("-")
    let mut p = postfix(Primary::StringLiteral(rill::ast::StringTemplate {
        parts: vec![rill::ast::StringPart::Literal("  Hello World  ".to_owned())],
    }));
    p = method(p, "trim", vec![]);
    p = method(p, "lower", vec![]);
    p = method(p, "split", vec![plain_string(" ")]);
    p = method(p, "join", vec![plain_string("-")]);
    let chain = rill::ast::PipeChain { head: p, targets: vec![], terminator: None, span: sp() };
    let outcome = run(vec![stmt(chain)]);
    assert_eq!(outcome.value, Value::String("hello-world".to_owned()));
}

#[test]
fn contains_checks_membership_across_string_list_and_dict() {
    let mut entries = IndexMap::new();
    entries.insert("k".to_owned(), DictEntryValue::Expr(Box::new(num(1.0))));
    let dict = dict_literal(vec![dict_entry(vec![DictKey::Literal("k".to_owned())], entries.remove("k").unwrap())], None);

    let str_check = chain(Primary::BareMethodCall { name: "contains".to_owned(), args: vec![plain_string("ell")] });
    let list_check = chain(Primary::BareMethodCall { name: "contains".to_owned(), args: vec![num(2.0)] });
    let dict_check = chain(Primary::BareMethodCall { name: "contains".to_owned(), args: vec![plain_string("k")] });

    let string_outcome = run(vec![stmt(plain_string("hello")), stmt(str_check)]);
    assert_eq!(string_outcome.value, Value::Bool(true));

    let list_outcome = run(vec![stmt(chain(list_literal(vec![num(1.0), num(2.0)]))), stmt(list_check)]);
    assert_eq!(list_outcome.value, Value::Bool(true));

    let dict_outcome = run(vec![stmt(chain(dict)), stmt(dict_check)]);
    assert_eq!(dict_outcome.value, Value::Bool(true));
}

#[test]
fn iter_and_first_expose_the_iterator_protocol_over_a_list() {
    let list = list_literal(vec![num(10.0), num(20.0)]);
    let first = chain(Primary::BareMethodCall { name: "first".to_owned(), args: vec![] });
    let outcome = run(vec![stmt(chain(list)), stmt(first)]);
    let Value::Dict(iter) = outcome.value else { panic!("expected a dict") };
    assert_eq!(iter.get("value"), Some(&Value::Number(10.0)));
    assert_eq!(iter.get("done"), Some(&Value::Bool(false)));
    assert!(matches!(iter.get("next"), Some(Value::Callable(_))));
}

#[test]
fn bare_spread_unpacks_a_list_into_a_positional_tuple() {
    let list = chain(list_literal(vec![num(1.0), num(2.0)]));
    let outcome = run(vec![stmt(chain_with(Primary::Spread(Box::new(list)), vec![], None))]);
    let Value::Tuple(rill::value::Tuple::Positional(items)) = outcome.value else { panic!("expected a positional tuple") };
    assert_eq!(items, vec![Value::Number(1.0), Value::Number(2.0)]);
}

#[test]
fn parallel_spread_applies_a_single_closure_to_every_element() {
    // [1, 2, 3] -> ~ (n) { n * 10 }
    let list = list_literal(vec![num(1.0), num(2.0), num(3.0)]);
    let times_ten = arith_bin(
        arith_val(Primary::Variable(VariableRef { base: VariableBase::Named("n".to_owned()), chain: vec![] })),
        rill::ast::ArithOp::Mul,
        arith_num(10.0),
    );
    let grouped = Primary::Grouped(rill::ast::Grouped { head: Box::new(times_ten), targets: vec![], terminator: None });
    let body = block(vec![stmt(chain(grouped))]);
    let doubler = closure(vec![param("n")], body);
    let target = PipeTarget::ParallelSpread(Box::new(doubler));
    let outcome = run(vec![stmt(chain_with(list, vec![target], None))]);
    assert_eq!(outcome.value, Value::List(vec![Value::Number(10.0), Value::Number(20.0), Value::Number(30.0)]));
}

#[test]
fn parallel_filter_keeps_only_truthy_elements() {
    // [1, 2, 3, 4] -> ~? { $ -> > 2 }
    let list = list_literal(vec![num(1.0), num(2.0), num(3.0), num(4.0)]);
    let gt_two = bool_cmp(arith_val(Primary::Variable(VariableRef { base: VariableBase::Pipe, chain: vec![] })), rill::ast::CmpOp::Gt, arith_num(2.0));
    let predicate_body = block(vec![stmt(chain(Primary::Conditional(rill::ast::Conditional {
        condition: Box::new(gt_two),
        then_branch: Box::new(Primary::BoolLiteral(true)),
        else_branch: Some(Box::new(Primary::BoolLiteral(false))),
    })))]);
    let predicate = Primary::Block(predicate_body);
    let outcome = run(vec![stmt(chain_with(list, vec![PipeTarget::ParallelFilter(Box::new(predicate))], None))]);
    assert_eq!(outcome.value, Value::List(vec![Value::Number(3.0), Value::Number(4.0)]));
}

#[test]
fn sequential_spread_threads_the_value_through_each_closure_in_order() {
    // 1 -> @ [(n){n+1}, (n){n*10}]
    let add_one_body = block(vec![stmt(chain(arith_closure_primary(rill::ast::ArithOp::Add, 1.0)))]);
    let times_ten_body = block(vec![stmt(chain(arith_closure_primary(rill::ast::ArithOp::Mul, 10.0)))]);
    let steps = list_literal(vec![chain(closure(vec![param("n")], add_one_body)), chain(closure(vec![param("n")], times_ten_body))]);
    let outcome = run(vec![stmt(chain_with(Primary::NumberLiteral(1.0), vec![PipeTarget::SequentialSpread(Box::new(steps))], None))]);
    assert_eq!(outcome.value, Value::Number(20.0));
}

fn arith_closure_primary(op: rill::ast::ArithOp, rhs: f64) -> Primary {
    let expr = arith_bin(arith_val(Primary::Variable(VariableRef { base: VariableBase::Named("n".to_owned()), chain: vec![] })), op, arith_num(rhs));
    Primary::Grouped(rill::ast::Grouped { head: Box::new(expr), targets: vec![], terminator: None })
}

#[test]
fn existence_check_reports_whether_a_dict_field_is_present_and_non_null() {
    let mut entries = IndexMap::new();
    entries.insert("name".to_owned(), DictEntryValue::Expr(Box::new(plain_string("rill"))));
    let dict = dict_literal(vec![dict_entry(vec![DictKey::Literal("name".to_owned())], entries.remove("name").unwrap())], None);
    let present = chain(Primary::Variable(VariableRef {
        base: VariableBase::Pipe,
        chain: vec![AccessLink::Existence { field: "name".to_owned(), type_check: None }],
    }));
    let missing = chain(Primary::Variable(VariableRef {
        base: VariableBase::Pipe,
        chain: vec![AccessLink::Existence { field: "age".to_owned(), type_check: None }],
    }));
    let present_outcome = run(vec![stmt(chain(dict.clone())), stmt(present)]);
    assert_eq!(present_outcome.value, Value::Bool(true));
    let missing_outcome = run(vec![stmt(chain(dict)), stmt(missing)]);
    assert_eq!(missing_outcome.value, Value::Bool(false));
}

#[test]
fn annotation_reflection_reads_a_closures_declared_annotation() {
    // (n) ^doc("squares a number") { n * n }
    let body = block(vec![stmt(chain(arith_closure_square()))]);
    let mut closure_primary = closure(vec![param("n")], body);
    if let Primary::ClosureLiteral(c) = &mut closure_primary {
        c.annotations.push(("doc".to_owned(), plain_string("squares a number")));
    }
    let reflect = chain(Primary::Variable(VariableRef { base: VariableBase::Pipe, chain: vec![AccessLink::Annotation("doc".to_owned())] }));
    let outcome = run(vec![stmt(chain(closure_primary)), stmt(reflect)]);
    assert_eq!(outcome.value, Value::String("squares a number".to_owned()));
}

fn arith_closure_square() -> Primary {
    let n = || arith_val(Primary::Variable(VariableRef { base: VariableBase::Named("n".to_owned()), chain: vec![] }));
    let expr = arith_bin(n(), rill::ast::ArithOp::Mul, n());
    Primary::Grouped(rill::ast::Grouped { head: Box::new(expr), targets: vec![], terminator: None })
}

#[test]
fn a_bare_block_dict_value_becomes_a_single_dollar_param_closure_on_dispatch() {
    // a bare `{ $ }` dict value is wrapped into a one-param closure bound
    // to "$"; dispatch calls it with the matched key as that argument
    let echoes_its_argument = Primary::Variable(VariableRef { base: VariableBase::Named("$".to_owned()), chain: vec![] });
    let body = block(vec![stmt(chain(echoes_its_argument))]);
    let entries = vec![dict_entry(vec![DictKey::Literal("go".to_owned())], DictEntryValue::Block(body))];
    let table = dict_literal(entries, None);
    let go = Primary::StringLiteral(rill::ast::StringTemplate { parts: vec![rill::ast::StringPart::Literal("go".to_owned())] });
    let outcome = run(vec![stmt(chain_with(go, vec![PipeTarget::Primary(table)], None))]);
    assert_eq!(outcome.value, Value::String("go".to_owned()));
}

#[test]
fn a_dict_entry_callable_is_invoked_as_a_method_before_falling_back_to_built_ins() {
    // { shout: (n) { n } } -> .shout("hi")
    let body = block(vec![stmt(chain(Primary::Variable(VariableRef { base: VariableBase::Named("n".to_owned()), chain: vec![] })))]);
    let shout = closure(vec![param("n")], body);
    let entries = vec![dict_entry(vec![DictKey::Literal("shout".to_owned())], DictEntryValue::Closure(match shout {
        Primary::ClosureLiteral(c) => c,
        _ => unreachable!(),
    }))];
    let table = dict_literal(entries, None);
    let call = chain(Primary::BareMethodCall { name: "shout".to_owned(), args: vec![plain_string("hi")] });
    let outcome = run(vec![stmt(chain(table)), stmt(call)]);
    assert_eq!(outcome.value, Value::String("hi".to_owned()));
}

#[test]
fn a_missing_dict_field_with_no_trailing_default_is_an_error() {
    let dict = dict_literal(vec![], None);
    let miss = chain(Primary::Variable(VariableRef { base: VariableBase::Pipe, chain: vec![AccessLink::Field("missing".to_owned())] }));
    let ctx = Context::new_root(ContextConfig::default()).unwrap();
    let err = execute(&script(vec![stmt(chain(dict)), stmt(miss)]), ctx).unwrap_err();
    assert_eq!(err.code(), "RUNTIME_PROPERTY_NOT_FOUND");
}

#[test]
fn a_trailing_default_recovers_a_missing_dict_field() {
    // { }.missing ?? "fallback"
    let dict = dict_literal(vec![], None);
    let access = chain(Primary::Variable(VariableRef {
        base: VariableBase::Pipe,
        chain: vec![AccessLink::Field("missing".to_owned()), AccessLink::Default(Box::new(plain_string("fallback")))],
    }));
    let outcome = run(vec![stmt(chain(dict)), stmt(access)]);
    assert_eq!(outcome.value, Value::String("fallback".to_owned()));
}

#[test]
fn an_out_of_range_index_with_no_trailing_default_is_an_error() {
    let list = list_literal(vec![num(1.0)]);
    let oob = chain(Primary::Variable(VariableRef {
        base: VariableBase::Pipe,
        chain: vec![AccessLink::Index(Box::new(num(5.0)))],
    }));
    let ctx = Context::new_root(ContextConfig::default()).unwrap();
    let err = execute(&script(vec![stmt(chain(list)), stmt(oob)]), ctx).unwrap_err();
    assert_eq!(err.code(), "RUNTIME_PROPERTY_NOT_FOUND");
}

#[test]
fn a_trailing_default_recovers_an_out_of_range_index() {
    // [1] /[5] ?? "fallback"
    let list = list_literal(vec![num(1.0)]);
    let access = chain(Primary::Variable(VariableRef {
        base: VariableBase::Pipe,
        chain: vec![AccessLink::Index(Box::new(num(5.0))), AccessLink::Default(Box::new(plain_string("fallback")))],
    }));
    let outcome = run(vec![stmt(chain(list)), stmt(access)]);
    assert_eq!(outcome.value, Value::String("fallback".to_owned()));
}
