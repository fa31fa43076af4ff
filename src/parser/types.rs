use crate::{ast::types::Type, errors::errors::Error, lexer::tokens::TokenKind};

use super::parser::Parser;

/// `type := INTEGER | STRING | REAL | BOOLEAN`
pub fn parse_type(parser: &mut Parser) -> Result<Type, Error> {
    let ty = match parser.current_token_kind() {
        TokenKind::Integer => Type::Integer,
        TokenKind::String => Type::String,
        TokenKind::Real => Type::Real,
        TokenKind::Boolean => Type::Boolean,
        _ => return Err(parser.unexpected("a type such as string, integer, real or boolean")),
    };

    parser.advance();
    Ok(ty)
}
