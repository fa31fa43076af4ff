//! Unit tests for the parser module.
//!
//! This module contains tests for parsing including:
//! - Statements (declarations, assignments, calls, print, control flow)
//! - Function declarations and parameters
//! - Expression precedence and associativity
//! - Pretty printing back to source
//! - Error cases

use crate::{
    ast::{
        ast::Program,
        expressions::{BinaryOp, Expr, Literal, LogicalOp, UnaryOp},
        statements::{ElseBody, Stmt},
        types::Type,
    },
    errors::errors::ErrorImpl,
    lexer::lexer::tokenize,
    Position,
};

use super::parser::parse;

fn parse_source(source: &str) -> Program {
    parse(tokenize(source).unwrap()).unwrap()
}

/// The expression of a single `print` statement.
fn printed(source: &str) -> Expr {
    let program = parse_source(&format!("print {}", source));
    match program.body.body.into_iter().next() {
        Some(Stmt::Print(print)) => print.expression,
        other => panic!("expected print statement, got {:?}", other),
    }
}

#[test]
fn test_parse_var_decl() {
    let program = parse_source("let x : integer = 5\nlet y\nlet z = \"s\"");

    assert_eq!(program.body.body.len(), 3);
    let Stmt::VarDecl(x) = &program.body.body[0] else {
        panic!("expected variable declaration");
    };
    assert_eq!(x.identifier, "x");
    assert_eq!(x.explicit_type, Some(Type::Integer));
    assert_eq!(x.assigned_value, Some(Expr::Literal(Literal::Integer(5))));

    let Stmt::VarDecl(y) = &program.body.body[1] else {
        panic!("expected variable declaration");
    };
    assert!(y.explicit_type.is_none());
    assert!(y.assigned_value.is_none());
}

#[test]
fn test_blank_lines_are_dropped() {
    let program = parse_source("\n\nlet a = 1\n\n\nprint a\n");

    assert_eq!(program.body.body.len(), 2);
}

#[test]
fn test_empty_program() {
    assert!(parse_source("").body.body.is_empty());
    assert!(parse_source("// nothing\n").body.body.is_empty());
}

#[test]
fn test_parse_assignment_and_call_stmt() {
    let program = parse_source("x = 1\nf(1, 2)\ng()");

    assert!(matches!(&program.body.body[0], Stmt::Assign(assign) if assign.identifier == "x"));
    let Stmt::Expression(call) = &program.body.body[1] else {
        panic!("expected call statement");
    };
    let Expr::Call(call) = &call.expression else {
        panic!("expected call expression");
    };
    assert_eq!(call.callee, "f");
    assert_eq!(call.arguments.len(), 2);
    assert!(call.resolved.borrow().is_none());

    assert!(matches!(
        &program.body.body[2],
        Stmt::Expression(stmt) if matches!(&stmt.expression, Expr::Call(call) if call.arguments.is_empty())
    ));
}

#[test]
fn test_parse_function_decl() {
    let program = parse_source("function add(a: integer, b: real) {\n  return a + b\n}");

    let Stmt::FnDecl(decl) = &program.body.body[0] else {
        panic!("expected function declaration");
    };
    assert_eq!(decl.identifier, "add");
    assert_eq!(decl.parameters.len(), 2);
    assert_eq!(decl.parameters[0].name, "a");
    assert_eq!(decl.parameters[0].param_type, Type::Integer);
    assert_eq!(decl.parameters[1].param_type, Type::Real);
    assert_eq!(decl.body.body.len(), 1);
    assert!(matches!(decl.body.body[0], Stmt::Return(_)));
    assert_eq!(*decl.resolved_return_type.borrow(), Type::Null);
}

#[test]
fn test_parse_if_on_one_line() {
    let program = parse_source("if (1 < 2) then print \"yes\" else print \"no\" endif");

    let Stmt::If(if_stmt) = &program.body.body[0] else {
        panic!("expected if statement");
    };
    assert_eq!(if_stmt.then_body.body.len(), 1);
    assert!(matches!(&if_stmt.else_body, Some(ElseBody::Else(block)) if block.body.len() == 1));
}

#[test]
fn test_parse_else_if_chain() {
    let source = "if (x == 1) then\n  print 1\nelse if (x == 2) then\n  print 2\nelse\n  print 3\nendif";
    let program = parse_source(source);

    let Stmt::If(if_stmt) = &program.body.body[0] else {
        panic!("expected if statement");
    };
    let Some(ElseBody::ElseIf(else_if)) = &if_stmt.else_body else {
        panic!("expected else-if");
    };
    assert!(matches!(else_if.else_body, Some(ElseBody::Else(_))));
}

#[test]
fn test_parse_loops() {
    let program = parse_source(
        "while (i < 3) repeat\n  i = i + 1\nendwhile\nuntil (i == 0) repeat\n  i = i - 1\nenduntil",
    );

    assert!(matches!(&program.body.body[0], Stmt::While(w) if w.body.body.len() == 1));
    assert!(matches!(&program.body.body[1], Stmt::Until(u) if u.body.body.len() == 1));
}

#[test]
fn test_multiplication_binds_tighter() {
    let Expr::Binary(sum) = printed("1 + 2 * 3") else {
        panic!("expected binary expression");
    };
    assert_eq!(sum.operator, BinaryOp::Add);
    assert!(matches!(*sum.right, Expr::Binary(ref product) if product.operator == BinaryOp::Multiply));
}

#[test]
fn test_arithmetic_is_left_associative() {
    let Expr::Binary(outer) = printed("10 - 4 - 3") else {
        panic!("expected binary expression");
    };
    assert_eq!(*outer.right, Expr::Literal(Literal::Integer(3)));
    assert!(matches!(*outer.left, Expr::Binary(ref inner) if inner.operator == BinaryOp::Subtract));
}

#[test]
fn test_logical_is_right_associative() {
    let Expr::Logical(outer) = printed("a or b or c") else {
        panic!("expected logical expression");
    };
    assert_eq!(outer.operator, LogicalOp::Or);
    assert!(matches!(*outer.left, Expr::Symbol(ref symbol) if symbol.name == "a"));
    assert!(matches!(*outer.right, Expr::Logical(_)));
}

#[test]
fn test_and_binds_tighter_than_or() {
    let Expr::Logical(outer) = printed("a and b or c") else {
        panic!("expected logical expression");
    };
    assert_eq!(outer.operator, LogicalOp::Or);
    assert!(matches!(*outer.left, Expr::Logical(ref inner) if inner.operator == LogicalOp::And));
}

#[test]
fn test_comparison_sides_are_sums() {
    let Expr::Binary(cmp) = printed("a + 1 <= b * 2") else {
        panic!("expected comparison");
    };
    assert_eq!(cmp.operator, BinaryOp::LessEquals);
    assert!(matches!(*cmp.left, Expr::Binary(ref left) if left.operator == BinaryOp::Add));
}

#[test]
fn test_prefix_and_member() {
    let Expr::Unary(neg) = printed("-x") else {
        panic!("expected unary expression");
    };
    assert_eq!(neg.operator, UnaryOp::Minus);

    assert!(matches!(printed("not done"), Expr::Unary(ref not) if not.operator == UnaryOp::Not));

    let Expr::Member(member) = printed("grid[1][2]") else {
        panic!("expected member expression");
    };
    assert!(matches!(*member.object, Expr::Member(_)));
    assert_eq!(*member.index, Expr::Literal(Literal::Integer(2)));
}

#[test]
fn test_array_literal() {
    let Expr::Array(array) = printed("[1, \"two\", 3.5, []]") else {
        panic!("expected array literal");
    };
    assert_eq!(array.elements.len(), 4);
    assert_eq!(array.elements[2], Expr::Literal(Literal::Real(3.5)));
    assert!(matches!(array.elements[3], Expr::Array(ref inner) if inner.elements.is_empty()));
}

#[test]
fn test_grouping_reenters_at_sum() {
    let Expr::Binary(product) = printed("(1 + 2) * 3") else {
        panic!("expected binary expression");
    };
    assert_eq!(product.operator, BinaryOp::Multiply);

    let error = parse(tokenize("print (1 < 2)").unwrap()).unwrap_err();
    assert!(matches!(error.get_impl(), ErrorImpl::UnexpectedToken { .. }));
}

#[test]
fn test_comparisons_do_not_chain() {
    let error = parse(tokenize("print a < b < c").unwrap()).unwrap_err();

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::UnexpectedToken {
            found: String::from("Less"),
            expected: String::from("EOF"),
        }
    );
}

#[test]
fn test_missing_endif() {
    let error = parse(tokenize("if (x) then\n  print x\n").unwrap()).unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedTokenError");
    assert!(matches!(
        error.get_impl(),
        ErrorImpl::UnexpectedToken { found, expected } if found == "EOF" && expected == "EndIf"
    ));
}

#[test]
fn test_error_position() {
    let error = parse(tokenize("let a = 1\nlet = 2").unwrap()).unwrap_err();

    assert_eq!(error.get_position(), &Position { line: 2, column: 4 });
}

#[test]
fn test_bad_parameter_type() {
    let error = parse(tokenize("function f(a: thing) { return a }").unwrap()).unwrap_err();

    assert!(matches!(
        error.get_impl(),
        ErrorImpl::UnexpectedToken { found, .. } if found == "Identifier"
    ));
}

#[test]
fn test_missing_operand() {
    let error = parse(tokenize("print 1 +").unwrap()).unwrap_err();

    assert!(matches!(
        error.get_impl(),
        ErrorImpl::UnexpectedToken { found, expected } if found == "EOF" && expected == "expression"
    ));
}

#[test]
fn test_pretty_print_round_trip() {
    let source = "let total : integer = 0
let names = ['a \"b\"', \"c\"]
function weigh(n: integer, scale: real) {
  if (n % 2 == 0) then
    return -(n + 1) * scale
  else if (not n) then
    return 0.5
  else
    return n - (2 - 1)
  endif
}
until (total >= 10 or total < 0 and weigh(total, 1.0) > 2) repeat
  total = total + (1 + names[0][1]) * 2
  print weigh(total, 2.0)
  print -(names[1]) + -names[0][1]
enduntil
while (false) repeat
endwhile
";
    let program = parse_source(source);
    let printed = program.to_string();
    let reparsed = parse_source(&printed);

    assert_eq!(program, reparsed);
    assert_eq!(printed, reparsed.to_string());
}

#[test]
fn test_prefix_operator_over_index_keeps_parentheses() {
    let negated_element = printed("-(a[0])");
    assert!(matches!(&negated_element, Expr::Unary(unary) if matches!(*unary.operand, Expr::Member(_))));
    assert_eq!(negated_element.to_string(), "-(a[0])");

    let indexed_negation = printed("-a[0]");
    assert!(matches!(&indexed_negation, Expr::Member(member) if matches!(*member.object, Expr::Unary(_))));
    assert_eq!(indexed_negation.to_string(), "-a[0]");

    let program = parse_source("let a = [5]\nprint -(a[0])\nprint not (a[0])[0]");
    assert_eq!(parse_source(&program.to_string()), program);
}

#[test]
fn test_pretty_print_format() {
    let program = parse_source("let x:integer=1+2*3\nif (x<2) then print x endif");

    assert_eq!(
        program.to_string(),
        "let x : integer = 1 + 2 * 3\nif (x < 2) then\n  print x\nendif\n"
    );
}
