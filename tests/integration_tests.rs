//! Integration tests for end-to-end execution.
//!
//! These tests run complete programs through tokenization, parsing,
//! semantic analysis and interpretation, capturing printed output.

use interpreter::{
    errors::errors::{Error, ErrorImpl, Phase},
    parse, run,
    runtime::value::Value,
    tokenize, Execution,
};

fn run_source(source: &str) -> Result<(String, Execution), Error> {
    let mut out = Vec::new();
    let execution = run(source, &mut out)?;
    Ok((String::from_utf8(out).unwrap(), execution))
}

fn output(source: &str) -> String {
    run_source(source).unwrap().0
}

fn failure(source: &str) -> (Error, String) {
    let mut out = Vec::new();
    let error = run(source, &mut out).unwrap_err();
    (error, String::from_utf8(out).unwrap())
}

#[test]
fn test_print_variable() {
    assert_eq!(output("let x = 5\nprint x"), "5\n");
}

#[test]
fn test_declared_type_mismatch() {
    let (error, out) = failure("let x : integer\nx = 3.5");

    assert_eq!(error.phase(), Phase::Semantic);
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::AssignmentTypeMismatch {
            name: String::from("x"),
            expected: String::from("INTEGER"),
            received: String::from("REAL"),
        }
    );
    assert!(out.is_empty());
}

#[test]
fn test_function_call() {
    let source = "function add(a: integer, b: integer) { return a + b }\nprint add(2,3)";

    assert_eq!(output(source), "5\n");
}

#[test]
fn test_if_else() {
    assert_eq!(
        output("if (1 < 2) then print \"yes\" else print \"no\" endif"),
        "yes\n"
    );
    assert_eq!(
        output("if (2 < 1) then print \"yes\" else print \"no\" endif"),
        "no\n"
    );
}

#[test]
fn test_else_if_chain() {
    let source = "function grade(score: integer) {
  if (score >= 90) then
    return \"A\"
  else if (score >= 80) then
    return \"B\"
  else
    return \"C\"
  endif
}
print grade(95)
print grade(85)
print grade(10)";

    assert_eq!(output(source), "A\nB\nC\n");
}

#[test]
fn test_while_loop() {
    let source = "let i = 0
while (i < 3) repeat
  print i
  i = i + 1
endwhile";

    assert_eq!(output(source), "0\n1\n2\n");
}

#[test]
fn test_until_loop() {
    let source = "let n = 3
until (n == 0) repeat
  print n
  n = n - 1
enduntil";

    assert_eq!(output(source), "3\n2\n1\n");
}

#[test]
fn test_logical_operators_evaluate_both_sides() {
    let source = "function bump() {
  print \"bumped\"
  return 1
}
print false and bump() == 1
print true or bump() == 1";

    assert_eq!(output(source), "bumped\nfalse\nbumped\ntrue\n");
}

#[test]
fn test_undefined_function_stops_before_running() {
    let (error, out) = failure("print \"before\"\nfoo()");

    assert_eq!(error.phase(), Phase::Semantic);
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::UndefinedFunction {
            name: String::from("foo"),
        }
    );
    assert!(out.is_empty());
}

#[test]
fn test_top_level_return() {
    let (error, _) = failure("let x = 1\nreturn x");

    assert_eq!(error.get_impl(), &ErrorImpl::ReturnOutsideFunction);
}

#[test]
fn test_recursion() {
    let source = "function fact(n: integer) {
  if (n <= 1) then
    return 1
  endif
  return n * fact(n - 1)
}
print fact(10)";

    assert_eq!(output(source), "3628800\n");
}

#[test]
fn test_nested_function_reads_enclosing_local() {
    let source = "function outer() {
  let v = 7
  function inner() {
    return v * 2
  }
  return inner()
}
print outer()";

    assert_eq!(output(source), "14\n");
}

#[test]
fn test_bare_call_value_ends_block() {
    assert_eq!(output("function f() {\n  return 1\n}\nf()\nprint 2"), "");

    let source = "function inner() {
  return 5
}
function outer() {
  inner()
  return 1
}
print outer()";
    assert_eq!(output(source), "5\n");

    // A call that yields nothing lets the block carry on
    assert_eq!(output("function noop() {\n  let a = 1\n}\nnoop()\nprint 2"), "2\n");
}

#[test]
fn test_names_resolve_through_call_stack() {
    // `inner` runs at level 3 and reads level 2 from the bottom of the
    // stack, which is the first `outer` call rather than the one that
    // defined it.
    let source = "function outer(n: integer) {
  function inner() {
    return n
  }
  if (n > 1) then
    return outer(n - 1)
  endif
  return inner()
}
print outer(3)";

    assert_eq!(output(source), "3\n");
}

#[test]
fn test_arguments_evaluate_in_caller() {
    let source = "function twice(v: integer) {
  return v * 2
}
function apply(v: integer) {
  return twice(v + 1)
}
print apply(4)";

    assert_eq!(output(source), "10\n");
}

#[test]
fn test_arrays_and_strings() {
    let source = "let xs = [10, 20, 30]
print xs[1]
print xs[5]
let word = 'hello'
print word[0] + word[4]
print xs";

    assert_eq!(output(source), "20\nnull\nho\n[10, 20, 30]\n");
}

#[test]
fn test_real_arithmetic() {
    assert_eq!(output("print 7 / 2\nprint 7.0 / 2.0\nprint 1.5 * 2.0"), "3\n3.5\n3\n");
}

#[test]
fn test_not_operator() {
    assert_eq!(output("print not true\nprint not 0"), "false\ntrue\n");
}

#[test]
fn test_comments() {
    let source = "// leading comment
let a = 1 /* inline */ + 2
/* multi
   line */
print a // trailing";

    assert_eq!(output(source), "3\n");
}

#[test]
fn test_runtime_error_after_output() {
    let (error, out) = failure("print 1\nprint 10 % 0");

    assert_eq!(error.phase(), Phase::Runtime);
    assert_eq!(error.get_impl(), &ErrorImpl::DivisionByZero);
    assert_eq!(out, "1\n");
}

#[test]
fn test_lexer_error_position() {
    let (error, _) = failure("let a = 1\nlet b = a $ 2");

    assert_eq!(error.get_error_name(), "LexerError");
    assert_eq!(error.to_string(), "lexer error at line 2, column 10: unexpected character '$'");
}

#[test]
fn test_parser_error() {
    let (error, _) = failure("let = 5");

    assert_eq!(error.phase(), Phase::Parser);
    assert_eq!(error.get_error_name(), "UnexpectedTokenError");
}

#[test]
fn test_execution_exposes_memory_and_symbols() {
    let (_, execution) = run_source("let total = 2 + 3\nfunction f() {\n  return 1\n}").unwrap();

    assert_eq!(execution.memory.get("total"), Some(&Value::Integer(5)));
    assert!(execution.memory.get("f").is_none());

    let globals = execution.globals().unwrap();
    assert!(globals.get("total").is_some());
    assert!(globals.get("f").is_some());
}

#[test]
fn test_ast_serializes_to_json() {
    let (_, execution) = run_source("let x = [1, 2]\nprint x[0]").unwrap();
    let json = serde_json::to_value(&execution.program).unwrap();

    let first = &json["body"]["body"][0]["VarDecl"];
    assert_eq!(first["identifier"], "x");
    assert_eq!(first["assigned_value"]["Array"]["elements"][1]["Literal"]["Integer"], 2);
}

#[test]
fn test_pretty_printed_program_reparses() {
    let source = "let i = 0
function step(v: integer) {
  return (v + 1) * 2 - -1
}
while (i < 20 and i > -1) repeat
  i = step(i)
  print i
endwhile";

    let program = parse(tokenize(source).unwrap()).unwrap();
    let printed = program.to_string();
    assert_eq!(parse(tokenize(&printed).unwrap()).unwrap(), program);

    assert_eq!(output(source), output(&printed));
}
