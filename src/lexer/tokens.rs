use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Position;

lazy_static! {
    /// Keyword spellings are the lower-cased token kind names.
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("begin", TokenKind::Begin);
        map.insert("print", TokenKind::Print);
        map.insert("let", TokenKind::Let);
        map.insert("if", TokenKind::If);
        map.insert("then", TokenKind::Then);
        map.insert("else", TokenKind::Else);
        map.insert("endif", TokenKind::EndIf);
        map.insert("while", TokenKind::While);
        map.insert("endwhile", TokenKind::EndWhile);
        map.insert("until", TokenKind::Until);
        map.insert("enduntil", TokenKind::EndUntil);
        map.insert("repeat", TokenKind::Repeat);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("null", TokenKind::Null);
        map.insert("string", TokenKind::String);
        map.insert("integer", TokenKind::Integer);
        map.insert("real", TokenKind::Real);
        map.insert("boolean", TokenKind::Boolean);
        map.insert("and", TokenKind::And);
        map.insert("or", TokenKind::Or);
        map.insert("not", TokenKind::Not);
        map.insert("function", TokenKind::Function);
        map.insert("return", TokenKind::Return);
        map.insert("end", TokenKind::End);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    IntegerConst,
    RealConst,
    StringConst,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Colon,
    Comma,
    Newline,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    Begin,
    Print,
    Let,
    If,
    Then,
    Else,
    EndIf,
    While,
    EndWhile,
    Until,
    EndUntil,
    Repeat,
    True,
    False,
    Null,
    String,
    Integer,
    Real,
    Boolean,
    And,
    Or,
    Not,
    Function,
    Return,
    End,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Newline => write!(f, "Newline (\\n)"),
            _ => write!(f, "{:?}", self),
        }
    }
}

/// Literal payload carried by a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Str(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Null,
}

impl Display for TokenValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenValue::Str(value) => write!(f, "{}", value),
            TokenValue::Integer(value) => write!(f, "{}", value),
            TokenValue::Real(value) => write!(f, "{}", value),
            TokenValue::Boolean(value) => write!(f, "{}", value),
            TokenValue::Null => write!(f, "null"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub position: Position,
    pub length: usize,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    /// Source text that lexes back to this token.
    pub fn lexeme(&self) -> String {
        match (&self.kind, &self.value) {
            (TokenKind::EOF, _) => String::new(),
            (TokenKind::StringConst, TokenValue::Str(content)) => {
                if content.contains('"') {
                    format!("'{}'", content)
                } else {
                    format!("\"{}\"", content)
                }
            }
            (TokenKind::RealConst, TokenValue::Real(value)) => {
                let text = value.to_string();
                if text.contains('.') {
                    text
                } else {
                    format!("{}.0", text)
                }
            }
            (_, value) => value.to_string(),
        }
    }
}
