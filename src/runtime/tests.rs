//! Unit tests for the runtime: values, the call stack and the interpreter.

use crate::{
    ast::expressions::{BinaryOp, UnaryOp},
    errors::errors::{Error, ErrorImpl, Phase},
    lexer::lexer::tokenize,
    parser::parser::parse,
    semantic::analyzer::analyze,
};

use super::{
    call_stack::{ActivationRecord, CallStack, RecordKind},
    interpreter::interpret,
    value::Value,
};

fn execute(source: &str) -> Result<(String, ActivationRecord), Error> {
    let program = parse(tokenize(source)?)?;
    analyze(&program)?;

    let mut out = Vec::new();
    let memory = interpret(&program, &mut out)?;
    Ok((String::from_utf8(out).unwrap(), memory))
}

fn output(source: &str) -> String {
    execute(source).unwrap().0
}

#[test]
fn test_integer_arithmetic() {
    let seven = Value::Integer(7);
    let two = Value::Integer(2);

    assert_eq!(seven.apply_binary(BinaryOp::Add, &two).unwrap(), Value::Integer(9));
    assert_eq!(seven.apply_binary(BinaryOp::Subtract, &two).unwrap(), Value::Integer(5));
    assert_eq!(seven.apply_binary(BinaryOp::Multiply, &two).unwrap(), Value::Integer(14));
    assert_eq!(seven.apply_binary(BinaryOp::Divide, &two).unwrap(), Value::Integer(3));
    assert_eq!(seven.apply_binary(BinaryOp::Modulo, &two).unwrap(), Value::Integer(1));
}

#[test]
fn test_mixed_arithmetic_promotes() {
    let result = Value::Integer(1).apply_binary(BinaryOp::Add, &Value::Real(0.5));

    assert_eq!(result.unwrap(), Value::Real(1.5));
    assert_eq!(
        Value::Real(7.0).apply_binary(BinaryOp::Divide, &Value::Integer(2)).unwrap(),
        Value::Real(3.5)
    );
}

#[test]
fn test_string_concatenation() {
    let result = Value::Str(String::from("ab")).apply_binary(BinaryOp::Add, &Value::Str(String::from("cd")));

    assert_eq!(result.unwrap(), Value::Str(String::from("abcd")));
}

#[test]
fn test_invalid_operands() {
    let error = Value::Str(String::from("a"))
        .apply_binary(BinaryOp::Multiply, &Value::Integer(2))
        .unwrap_err();

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::InvalidOperands {
            operator: String::from("*"),
            left: String::from("STRING"),
            right: String::from("INTEGER"),
        }
    );
    assert_eq!(error.phase(), Phase::Runtime);

    let error = Value::Bool(true).apply_unary(UnaryOp::Minus).unwrap_err();
    assert!(matches!(error.get_impl(), ErrorImpl::InvalidOperand { .. }));
}

#[test]
fn test_division_by_zero_and_overflow() {
    let error = Value::Integer(1)
        .apply_binary(BinaryOp::Divide, &Value::Integer(0))
        .unwrap_err();
    assert_eq!(error.get_impl(), &ErrorImpl::DivisionByZero);

    let error = Value::Integer(1)
        .apply_binary(BinaryOp::Modulo, &Value::Integer(0))
        .unwrap_err();
    assert_eq!(error.get_impl(), &ErrorImpl::DivisionByZero);

    let error = Value::Integer(i64::MAX)
        .apply_binary(BinaryOp::Add, &Value::Integer(1))
        .unwrap_err();
    assert_eq!(error.get_impl(), &ErrorImpl::IntegerOverflow);

    let error = Value::Integer(i64::MIN).apply_unary(UnaryOp::Minus).unwrap_err();
    assert_eq!(error.get_impl(), &ErrorImpl::IntegerOverflow);
}

#[test]
fn test_comparisons() {
    let less = |left: Value, right: Value| left.apply_binary(BinaryOp::Less, &right).unwrap();

    assert_eq!(less(Value::Integer(1), Value::Integer(2)), Value::Bool(true));
    assert_eq!(less(Value::Real(2.5), Value::Integer(2)), Value::Bool(false));
    assert_eq!(
        less(Value::Str(String::from("abc")), Value::Str(String::from("abd"))),
        Value::Bool(true)
    );
    assert_eq!(
        Value::Integer(3).apply_binary(BinaryOp::GreaterEquals, &Value::Integer(3)).unwrap(),
        Value::Bool(true)
    );
    assert!(Value::Bool(true)
        .apply_binary(BinaryOp::Less, &Value::Integer(1))
        .is_err());
}

#[test]
fn test_strict_equality() {
    assert!(Value::Integer(2).strict_equals(&Value::Real(2.0)));
    assert!(!Value::Integer(1).strict_equals(&Value::Bool(true)));
    assert!(!Value::Str(String::from("1")).strict_equals(&Value::Integer(1)));
    assert!(Value::Array(vec![Value::Integer(1)]).strict_equals(&Value::Array(vec![Value::Integer(1)])));
    assert!(Value::Null.strict_equals(&Value::Null));
}

#[test]
fn test_truthiness() {
    assert!(Value::Integer(3).is_truthy());
    assert!(!Value::Integer(0).is_truthy());
    assert!(!Value::Real(0.0).is_truthy());
    assert!(Value::Str(String::from("x")).is_truthy());
    assert!(!Value::Str(String::new()).is_truthy());
    assert!(Value::Array(vec![]).is_truthy());
    assert!(!Value::Null.is_truthy());
    assert_eq!(Value::Integer(0).apply_unary(UnaryOp::Not).unwrap(), Value::Bool(true));
}

#[test]
fn test_indexing() {
    let array = Value::Array(vec![Value::Integer(10), Value::Integer(20)]);

    assert_eq!(array.index(&Value::Integer(1)), Value::Integer(20));
    assert_eq!(array.index(&Value::Integer(2)), Value::Null);
    assert_eq!(array.index(&Value::Integer(-1)), Value::Null);
    assert_eq!(
        Value::Str(String::from("héllo")).index(&Value::Integer(1)),
        Value::Str(String::from("é"))
    );
    assert_eq!(Value::Integer(5).index(&Value::Integer(0)), Value::Null);
}

#[test]
fn test_value_display() {
    assert_eq!(Value::Real(2.5).to_string(), "2.5");
    assert_eq!(
        Value::Array(vec![Value::Integer(1), Value::Str(String::from("a"))]).to_string(),
        "[1, a]"
    );
    assert_eq!(Value::Null.to_string(), "null");
    assert_eq!(Value::Bool(false).to_string(), "false");
}

#[test]
fn test_call_stack_lookup_walks_by_level() {
    let mut stack = CallStack::new();

    let mut global = ActivationRecord::new("global", RecordKind::Program, 1);
    global.set("g", Value::Integer(1));
    stack.push(global);

    let mut caller = ActivationRecord::new("caller", RecordKind::Function, 2);
    caller.set("c", Value::Integer(2));
    stack.push(caller);

    // Declared at level 1, so it runs at level 2 and only sees record 1 below it
    let mut callee = ActivationRecord::new("callee", RecordKind::Function, 2);
    callee.set("own", Value::Integer(3));
    stack.push(callee);

    assert_eq!(stack.lookup("own"), Some(&Value::Integer(3)));
    assert_eq!(stack.lookup("g"), Some(&Value::Integer(1)));
    assert_eq!(stack.lookup("c"), None);
    assert_eq!(stack.len(), 3);

    stack.pop();
    assert_eq!(stack.peek().map(|record| record.name.as_str()), Some("caller"));
}

#[test]
fn test_empty_call_stack() {
    let mut stack = CallStack::new();

    assert!(stack.is_empty());
    assert!(stack.peek().is_none());
    assert!(stack.pop().is_none());
    assert!(stack.lookup("x").is_none());
}

#[test]
fn test_activation_record_display() {
    let mut record = ActivationRecord::new("global", RecordKind::Program, 1);
    record.set("x", Value::Integer(5));

    let rendered = record.to_string();
    assert!(rendered.starts_with("1: PROGRAM global\n"));
    assert!(rendered.contains("  x"));
    assert!(rendered.trim_end().ends_with(": 5"));
}

#[test]
fn test_interpret_print() {
    assert_eq!(output("let x = 5\nprint x"), "5\n");
    assert_eq!(output("print \"a\" + \"b\""), "ab\n");
    assert_eq!(output("print [1, 2][1] * 3"), "6\n");
}

#[test]
fn test_global_record_survives() {
    let (_, memory) = execute("let a = 1\nlet b\nb = a + 1").unwrap();

    assert_eq!(memory.kind, RecordKind::Program);
    assert_eq!(memory.nesting_level, 1);
    assert_eq!(memory.get("a"), Some(&Value::Integer(1)));
    assert_eq!(memory.get("b"), Some(&Value::Integer(2)));
}

#[test]
fn test_uninitialised_declaration_is_null() {
    let (out, memory) = execute("let nothing\nprint nothing").unwrap();

    assert_eq!(out, "null\n");
    assert_eq!(memory.get("nothing"), Some(&Value::Null));
}

#[test]
fn test_return_leaves_loop() {
    let source = "function first_over(limit: integer) {
  let i = 0
  while (true) repeat
    i = i + 1
    if (i * i > limit) then
      return i
    endif
  endwhile
}
print first_over(10)";

    assert_eq!(output(source), "4\n");
}

#[test]
fn test_function_without_return_yields_null() {
    assert_eq!(output("function f() {\n  let a = 1\n}\nprint f()"), "null\n");
}

#[test]
fn test_assignment_in_function_is_local() {
    let source = "let x = 1
function f() {
  x = 99
  return x
}
print f()
print x";

    assert_eq!(output(source), "99\n1\n");
}

#[test]
fn test_runtime_error_stops_execution() {
    let error = execute("print 1\nprint 1 / 0\nprint 2").unwrap_err();

    assert_eq!(error.get_impl(), &ErrorImpl::DivisionByZero);
}
