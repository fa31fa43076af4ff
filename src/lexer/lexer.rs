use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::{errors::errors::{Error, ErrorImpl}, Position, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, TokenValue, RESERVED_LOOKUP};

/// Builds the token for a match, or `None` when the match is skipped.
pub type RegexHandler = fn(&Lexer, &str) -> Result<Option<Token>, Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

impl RegexPattern {
    fn new(pattern: &str, handler: RegexHandler) -> Self {
        RegexPattern {
            regex: Regex::new(&format!("^(?:{})", pattern)).unwrap(),
            handler,
        }
    }
}

lazy_static! {
    // Tried in order; two-character operators precede their one-character prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern::new("[ \\t\\r]+", skip_handler),
        RegexPattern::new("[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        RegexPattern::new("[0-9]+(\\.[0-9]*)?", number_handler),
        RegexPattern::new("/\\*(?s:.*?)(\\*/|\\z)", skip_handler),
        RegexPattern::new("//[^\\n]*", skip_handler),
        RegexPattern::new("\"[^\"]*\"?", string_handler),
        RegexPattern::new("'[^']*'?", string_handler),
        RegexPattern::new("==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        RegexPattern::new("<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        RegexPattern::new(">=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        RegexPattern::new("=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        RegexPattern::new("<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        RegexPattern::new(">", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        RegexPattern::new("\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        RegexPattern::new("-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        RegexPattern::new("\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        RegexPattern::new("/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        RegexPattern::new("%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
        RegexPattern::new("\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        RegexPattern::new("\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        RegexPattern::new("\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        RegexPattern::new("\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        RegexPattern::new("\\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")),
        RegexPattern::new("\\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")),
        RegexPattern::new(",", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        RegexPattern::new(":", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        RegexPattern::new("\\n", MK_DEFAULT_HANDLER!(TokenKind::Newline, "\n")),
    ];
}

/// Streaming tokenizer over a source string.
///
/// Line and column are tracked for error reporting only: consuming a
/// newline bumps the line and resets the column to 0.
pub struct Lexer {
    source: String,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Lexer {
        Lexer {
            source: String::from(source),
            pos: 0,
            line: 1,
            column: 0,
        }
    }

    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn advance_over(&mut self, matched: &str) {
        for c in matched.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        self.pos += matched.len();
    }

    /// Returns the next token, or an EOF token once the input is exhausted.
    /// Calling again after EOF keeps returning EOF.
    pub fn next_token(&mut self) -> Result<Token, Error> {
        while !self.at_eof() {
            let remainder = self.remainder();
            let found = PATTERNS.iter().find_map(|pattern| {
                pattern
                    .regex
                    .find(remainder)
                    .map(|m| (pattern.handler, m.as_str().to_string()))
            });

            let Some((handler, matched)) = found else {
                return Err(Error::new(
                    ErrorImpl::UnexpectedCharacter { character: self.at().unwrap_or('\0') },
                    self.position(),
                ));
            };

            let token = handler(self, &matched)?;
            self.advance_over(&matched);

            if let Some(token) = token {
                trace!(kind = %token.kind, value = %token.value, "token");
                return Ok(token);
            }
        }

        Ok(MK_TOKEN!(TokenKind::EOF, TokenValue::Null, self.position(), 0))
    }
}

fn skip_handler(_lexer: &Lexer, _matched: &str) -> Result<Option<Token>, Error> {
    Ok(None)
}

fn number_handler(lexer: &Lexer, matched: &str) -> Result<Option<Token>, Error> {
    let parse_error = || {
        Error::new(ErrorImpl::NumberParseError { token: String::from(matched) }, lexer.position())
    };

    let (kind, value) = if matched.contains('.') {
        let value = matched.parse::<f64>().map_err(|_| parse_error())?;
        // Too large for a real; the literal would otherwise become infinity
        if !value.is_finite() {
            return Err(parse_error());
        }
        (TokenKind::RealConst, TokenValue::Real(value))
    } else {
        let value = matched.parse::<i64>().map_err(|_| parse_error())?;
        (TokenKind::IntegerConst, TokenValue::Integer(value))
    };

    Ok(Some(MK_TOKEN!(kind, value, lexer.position(), matched.len())))
}

fn string_handler(lexer: &Lexer, matched: &str) -> Result<Option<Token>, Error> {
    let mut chars = matched.chars();
    let delimiter = chars.next().unwrap_or('"');
    let body = chars.as_str();
    // An unterminated string runs to the end of input.
    let content = body.strip_suffix(delimiter).unwrap_or(body);

    Ok(Some(MK_TOKEN!(
        TokenKind::StringConst,
        TokenValue::Str(String::from(content)),
        lexer.position(),
        content.chars().count()
    )))
}

fn symbol_handler(lexer: &Lexer, matched: &str) -> Result<Option<Token>, Error> {
    let kind = RESERVED_LOOKUP
        .get(matched)
        .copied()
        .unwrap_or(TokenKind::Identifier);

    let value = match kind {
        TokenKind::True => TokenValue::Boolean(true),
        TokenKind::False => TokenValue::Boolean(false),
        _ => TokenValue::Str(String::from(matched)),
    };

    Ok(Some(MK_TOKEN!(kind, value, lexer.position(), matched.len())))
}

/// Lexes the whole source, returning every token up to and including EOF.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source);
    let mut tokens = vec![];

    loop {
        let token = lex.next_token()?;
        let done = token.kind == TokenKind::EOF;
        tokens.push(token);

        if done {
            return Ok(tokens);
        }
    }
}
