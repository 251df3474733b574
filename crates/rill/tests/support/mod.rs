//! Small AST builders shared across the integration tests. Rill's parser
//! is out of scope for this crate (`spec.md` §1), so tests construct the
//! `ast::Script` shapes a host's own front end would otherwise produce.
#![allow(dead_code)]

use rill::ast::*;

pub fn sp() -> Span {
    Span::new(0, 0)
}

pub fn script(statements: Vec<Statement>) -> Script {
    Script { statements }
}

pub fn stmt(expr: PipeChain) -> Statement {
    Statement { expr, span: sp() }
}

pub fn chain(primary: Primary) -> PipeChain {
    chain_with(primary, vec![], None)
}

pub fn chain_with(primary: Primary, targets: Vec<PipeTarget>, terminator: Option<Terminator>) -> PipeChain {
    PipeChain { head: postfix(primary), targets, terminator, span: sp() }
}

pub fn postfix(primary: Primary) -> Postfix {
    Postfix { primary: Box::new(primary), method_calls: vec![], span: sp() }
}

pub fn method(postfix: Postfix, name: &str, args: Vec<PipeChain>) -> Postfix {
    let mut p = postfix;
    p.method_calls.push(MethodCallSuffix { name: name.to_owned(), args, span: sp() });
    p
}

pub fn capture(expr: PipeChain, name: &str) -> PipeChain {
    let mut c = expr;
    c.terminator = Some(Terminator::Capture { name: name.to_owned(), type_annotation: None });
    c
}

pub fn brk(expr: PipeChain) -> PipeChain {
    let mut c = expr;
    c.terminator = Some(Terminator::Break);
    c
}

pub fn ret(expr: PipeChain) -> PipeChain {
    let mut c = expr;
    c.terminator = Some(Terminator::Return);
    c
}

pub fn num(n: f64) -> PipeChain {
    chain(Primary::NumberLiteral(n))
}

pub fn boolean(b: bool) -> PipeChain {
    chain(Primary::BoolLiteral(b))
}

pub fn null() -> PipeChain {
    chain(Primary::NullLiteral)
}

pub fn plain_string(s: &str) -> PipeChain {
    chain(str_primary(s))
}

pub fn str_primary(s: &str) -> Primary {
    Primary::StringLiteral(StringTemplate { parts: vec![StringPart::Literal(s.to_owned())] })
}

pub fn var_named(name: &str) -> PipeChain {
    chain(Primary::Variable(VariableRef { base: VariableBase::Named(name.to_owned()), chain: vec![] }))
}

/// A bare `$name` reference as a `Primary`, for embedding inside a larger
/// expression tree (arithmetic operands, method receivers) rather than as a
/// whole pipe-chain statement.
pub fn named(name: &str) -> Primary {
    Primary::Variable(VariableRef { base: VariableBase::Named(name.to_owned()), chain: vec![] })
}

pub fn var_field(name: &str, field: &str) -> PipeChain {
    chain(Primary::Variable(VariableRef { base: VariableBase::Named(name.to_owned()), chain: vec![AccessLink::Field(field.to_owned())] }))
}

/// `$` alone: the current pipe value.
pub fn pipe_value() -> PipeChain {
    chain(Primary::Variable(VariableRef { base: VariableBase::Pipe, chain: vec![] }))
}

pub fn func_call(name: &str, args: Vec<PipeChain>) -> PipeChain {
    chain(Primary::FunctionCall { name: name.to_owned(), args })
}

pub fn var_call(name: &str, args: Vec<PipeChain>) -> PipeChain {
    chain(Primary::VariableCall { name: name.to_owned(), args })
}

pub fn bare_method(name: &str, args: Vec<PipeChain>) -> PipeChain {
    chain(Primary::BareMethodCall { name: name.to_owned(), args })
}

pub fn arith_val(primary: Primary) -> ArithExpr {
    ArithExpr::Value(Box::new(postfix(primary)))
}

pub fn arith_num(n: f64) -> ArithExpr {
    arith_val(Primary::NumberLiteral(n))
}

pub fn arith_bin(left: ArithExpr, op: ArithOp, right: ArithExpr) -> ArithExpr {
    ArithExpr::Binary { left: Box::new(left), op, right: Box::new(right) }
}

pub fn bool_cmp(left: ArithExpr, op: CmpOp, right: ArithExpr) -> BoolExpr {
    BoolExpr::Comparison(Comparison { left, op: Some(op), right: Some(right) })
}

pub fn bool_truthy(value: ArithExpr) -> BoolExpr {
    BoolExpr::Comparison(Comparison { left: value, op: None, right: None })
}

pub fn block(statements: Vec<Statement>) -> Block {
    Block { statements }
}

pub fn closure(params: Vec<ParamNode>, body: Block) -> Primary {
    Primary::ClosureLiteral(ClosureLiteral { params, body, annotations: vec![] })
}

pub fn param(name: &str) -> ParamNode {
    ParamNode { name: name.to_owned(), type_annotation: None, default: None }
}

pub fn param_default(name: &str, default: PipeChain) -> ParamNode {
    ParamNode { name: name.to_owned(), type_annotation: None, default: Some(default) }
}

pub fn dict_entry(keys: Vec<DictKey>, value: DictEntryValue) -> DictEntryNode {
    DictEntryNode { keys, value }
}

pub fn dict_literal(entries: Vec<DictEntryNode>, default_value: Option<PipeChain>) -> Primary {
    Primary::DictLiteral(DictLiteral { entries, default_value: default_value.map(Box::new) })
}

pub fn list_literal(elements: Vec<PipeChain>) -> Primary {
    Primary::TupleLiteral(elements)
}
