use crate::{
    ast::{
        ast::SourcePosition,
        expressions::{
            ArrayExpr, BinaryExpr, BinaryOp, CallExpr, Expr, Literal, LogicalExpr, LogicalOp,
            MemberExpr, SymbolExpr, UnaryExpr, UnaryOp,
        },
    },
    errors::errors::Error,
    lexer::tokens::{TokenKind, TokenValue},
    Position,
};

use super::parser::Parser;

pub fn parse_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parse_or_expr(parser)
}

/// `orExpr := andExpr [OR orExpr]`
///
/// Recurses on the right, so `a or b or c` groups as `a or (b or c)`.
pub fn parse_or_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let left = parse_and_expr(parser)?;

    if parser.current_token_kind() != TokenKind::Or {
        return Ok(left);
    }

    parser.advance();
    let right = parse_or_expr(parser)?;

    Ok(Expr::Logical(LogicalExpr {
        left: Box::new(left),
        operator: LogicalOp::Or,
        right: Box::new(right),
    }))
}

/// `andExpr := cmpExpr [AND andExpr]`
pub fn parse_and_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let left = parse_comparison_expr(parser)?;

    if parser.current_token_kind() != TokenKind::And {
        return Ok(left);
    }

    parser.advance();
    let right = parse_and_expr(parser)?;

    Ok(Expr::Logical(LogicalExpr {
        left: Box::new(left),
        operator: LogicalOp::And,
        right: Box::new(right),
    }))
}

/// `cmpExpr := sum [cmpOp sum]`. At most one comparison; `a < b < c` is
/// left for the caller to reject.
pub fn parse_comparison_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let left = parse_sum_expr(parser)?;

    let operator = match parser.current_token_kind() {
        TokenKind::Equals => BinaryOp::Equals,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::LessEquals => BinaryOp::LessEquals,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::GreaterEquals => BinaryOp::GreaterEquals,
        _ => return Ok(left),
    };

    let position = parser.advance().position;
    let right = parse_sum_expr(parser)?;

    Ok(binary(left, operator, right, position))
}

pub fn parse_sum_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let mut left = parse_term_expr(parser)?;

    loop {
        let operator = match parser.current_token_kind() {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Dash => BinaryOp::Subtract,
            _ => return Ok(left),
        };

        let position = parser.advance().position;
        let right = parse_term_expr(parser)?;
        left = binary(left, operator, right, position);
    }
}

pub fn parse_term_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let mut left = parse_member_expr(parser)?;

    loop {
        let operator = match parser.current_token_kind() {
            TokenKind::Star => BinaryOp::Multiply,
            TokenKind::Slash => BinaryOp::Divide,
            TokenKind::Percent => BinaryOp::Modulo,
            _ => return Ok(left),
        };

        let position = parser.advance().position;
        let right = parse_member_expr(parser)?;
        left = binary(left, operator, right, position);
    }
}

/// `memberExpr := factor { "[" expr "]" }`
pub fn parse_member_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let mut object = parse_factor(parser)?;

    while parser.current_token_kind() == TokenKind::OpenBracket {
        parser.advance();
        let index = parse_expr(parser)?;
        parser.expect(TokenKind::CloseBracket)?;

        object = Expr::Member(MemberExpr {
            object: Box::new(object),
            index: Box::new(index),
        });
    }

    Ok(object)
}

pub fn parse_factor(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.get_nud_handler(parser.current_token_kind()) {
        Some(handler) => handler(parser),
        None => Err(parser.unexpected("expression")),
    }
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator = match parser.advance().kind {
        TokenKind::Plus => UnaryOp::Plus,
        TokenKind::Dash => UnaryOp::Minus,
        _ => UnaryOp::Not,
    };
    let operand = parse_factor(parser)?;

    Ok(Expr::Unary(UnaryExpr {
        operator,
        operand: Box::new(operand),
    }))
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let literal = match &parser.current_token().value {
        TokenValue::Integer(value) => Literal::Integer(*value),
        TokenValue::Real(value) => Literal::Real(*value),
        TokenValue::Boolean(value) => Literal::Boolean(*value),
        TokenValue::Str(value) if parser.current_token_kind() == TokenKind::StringConst => {
            Literal::String(value.clone())
        }
        _ => return Err(parser.unexpected("literal")),
    };

    parser.advance();
    Ok(Expr::Literal(literal))
}

/// `"(" sum ")"`: parentheses re-enter at `sum`, so comparisons and
/// logical operators cannot appear directly inside them.
pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_sum_expr(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_array_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let elements = parse_expr_list(parser, TokenKind::CloseBracket)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(Expr::Array(ArrayExpr { elements }))
}

/// A call when the identifier is directly followed by `(`, otherwise a reference.
pub fn parse_symbol_expr(parser: &mut Parser) -> Result<Expr, Error> {
    if parser.peek_token_kind() == TokenKind::OpenParen {
        return parse_call_expr(parser);
    }

    let token = parser.expect(TokenKind::Identifier)?;
    Ok(Expr::Symbol(SymbolExpr {
        name: token.value.to_string(),
        position: token.position.into(),
    }))
}

/// `ID "(" [ expr { "," expr } ] ")"`
pub fn parse_call_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let callee = parser.expect(TokenKind::Identifier)?;

    parser.expect(TokenKind::OpenParen)?;
    let arguments = parse_expr_list(parser, TokenKind::CloseParen)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Call(CallExpr::new(
        callee.value.to_string(),
        arguments,
        callee.position.into(),
    )))
}

/// `[ expr { "," expr } ]`, stopping before `close`.
fn parse_expr_list(parser: &mut Parser, close: TokenKind) -> Result<Vec<Expr>, Error> {
    let mut exprs = Vec::new();

    if parser.current_token_kind() != close {
        exprs.push(parse_expr(parser)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            exprs.push(parse_expr(parser)?);
        }
    }

    Ok(exprs)
}

fn binary(left: Expr, operator: BinaryOp, right: Expr, position: Position) -> Expr {
    Expr::Binary(BinaryExpr {
        left: Box::new(left),
        operator,
        right: Box::new(right),
        position: SourcePosition(position),
    })
}
