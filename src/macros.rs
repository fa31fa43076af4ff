//! Utility macros for the interpreter.
//!
//! This module defines helper macros used by the lexer:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default lexer handler for fixed-spelling tokens
//!
//! These macros reduce boilerplate in the lexer pattern table.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's TokenValue
/// * `$position` - Line and column of the token's first character
/// * `$length` - Length of the token's source text in characters
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::IntegerConst, TokenValue::Integer(42), position, 2);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $position:expr, $length:expr) => {
        Token {
            kind: $kind,
            value: $value,
            position: $position,
            length: $length,
        }
    };
}

/// Creates a default lexer handler for operators and punctuation.
///
/// Generates a handler function that emits a token of the given kind whose
/// value is the literal spelling. The lexer advances past the match itself.
///
/// # Arguments
///
/// * `$kind` - The TokenKind to create
/// * `$value` - The literal spelling (also used for the token length)
///
/// # Example
///
/// ```ignore
/// RegexPattern::new("\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+"))
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &Lexer, _matched: &str| -> Result<Option<Token>, Error> {
            Ok(Some(MK_TOKEN!(
                $kind,
                TokenValue::Str(String::from($value)),
                lexer.position(),
                $value.chars().count()
            )))
        }
    };
}
