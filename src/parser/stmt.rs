use crate::{
    ast::{
        expressions::Expr,
        statements::{
            AssignStmt, BlockStmt, ElseBody, ExpressionStmt, FnDeclStmt, IfStmt, Parameter,
            PrintStmt, ReturnStmt, Stmt, UntilStmt, VarDeclStmt, WhileStmt,
        },
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::expr::{parse_call_expr, parse_expr},
};

use super::{parser::Parser, types::parse_type};

/// Parses one statement. Tokens that start no statement (newlines, block
/// terminators such as `endif` or `}`) yield a null statement, which the
/// caller drops.
pub fn parse_stmt(parser: &mut Parser) -> Result<Option<Stmt>, Error> {
    match parser.get_stmt_handler(parser.current_token_kind()) {
        Some(handler) => Ok(Some(handler(parser)?)),
        None => Ok(None),
    }
}

/// `block := statement { NEWLINE statement }`
pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let mut body = Vec::new();

    if let Some(stmt) = parse_stmt(parser)? {
        body.push(stmt);
    }

    while parser.current_token_kind() == TokenKind::Newline {
        parser.advance();
        if let Some(stmt) = parse_stmt(parser)? {
            body.push(stmt);
        }
    }

    Ok(BlockStmt { body })
}

/// A call when the identifier is directly followed by `(`, otherwise an assignment.
pub fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if parser.peek_token_kind() == TokenKind::OpenParen {
        let expression = parse_call_expr(parser)?;
        return Ok(Stmt::Expression(ExpressionStmt { expression }));
    }

    let identifier = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser)?;

    Ok(Stmt::Assign(AssignStmt {
        identifier: identifier.value.to_string(),
        value,
        position: identifier.position.into(),
    }))
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();

    let identifier = parser.expect(TokenKind::Identifier)?;

    let explicit_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser)?)
    } else {
        None
    };

    let assigned_value = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        Some(parse_expr(parser)?)
    } else {
        None
    };

    Ok(Stmt::VarDecl(VarDeclStmt {
        identifier: identifier.value.to_string(),
        explicit_type,
        assigned_value,
        position: identifier.position.into(),
    }))
}

pub fn parse_print_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();
    let expression = parse_expr(parser)?;

    Ok(Stmt::Print(PrintStmt { expression }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.advance().position.into();
    let value = parse_expr(parser)?;

    Ok(Stmt::Return(ReturnStmt { value, position }))
}

/// `"(" expr ")"` as used by `if`, `while` and `until`.
fn parse_condition(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(condition)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let if_stmt = parse_if_clause(parser)?;
    parser.expect(TokenKind::EndIf)?;

    Ok(Stmt::If(if_stmt))
}

/// `IF "(" expr ")" THEN block [ELSE (ifClause | block)]`, without the
/// closing `endif`: an else-if chain shares the outermost one.
fn parse_if_clause(parser: &mut Parser) -> Result<IfStmt, Error> {
    parser.expect(TokenKind::If)?;
    let condition = parse_condition(parser)?;
    parser.expect(TokenKind::Then)?;
    let then_body = parse_block(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        if parser.current_token_kind() == TokenKind::If {
            Some(ElseBody::ElseIf(Box::new(parse_if_clause(parser)?)))
        } else {
            Some(ElseBody::Else(parse_block(parser)?))
        }
    } else {
        None
    };

    Ok(IfStmt {
        condition,
        then_body,
        else_body,
    })
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();
    let condition = parse_condition(parser)?;
    parser.expect(TokenKind::Repeat)?;
    let body = parse_block(parser)?;
    parser.expect(TokenKind::EndWhile)?;

    Ok(Stmt::While(WhileStmt { condition, body }))
}

pub fn parse_until_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();
    let condition = parse_condition(parser)?;
    parser.expect(TokenKind::Repeat)?;
    let body = parse_block(parser)?;
    parser.expect(TokenKind::EndUntil)?;

    Ok(Stmt::Until(UntilStmt { condition, body }))
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();

    let identifier = parser.expect(TokenKind::Identifier)?;
    let parameters = parse_param_list(parser)?;

    parser.expect(TokenKind::OpenCurly)?;
    let body = parse_block(parser)?;
    parser.expect(TokenKind::CloseCurly)?;

    Ok(Stmt::FnDecl(FnDeclStmt::new(
        identifier.value.to_string(),
        parameters,
        body,
        identifier.position.into(),
    )))
}

/// `"(" [ param { "," param } ] ")"` where `param := ID ":" type`
fn parse_param_list(parser: &mut Parser) -> Result<Vec<Parameter>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();
    if parser.current_token_kind() != TokenKind::CloseParen {
        parameters.push(parse_param(parser)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            parameters.push(parse_param(parser)?);
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(parameters)
}

fn parse_param(parser: &mut Parser) -> Result<Parameter, Error> {
    let name = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::Colon)?;
    let param_type = parse_type(parser)?;

    Ok(Parameter {
        name: name.value.to_string(),
        param_type,
        position: name.position.into(),
    })
}
