use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// Pipeline stage an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lexer,
    Parser,
    Semantic,
    Runtime,
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Lexer => write!(f, "lexer"),
            Phase::Parser => write!(f, "parser"),
            Phase::Semantic => write!(f, "semantic"),
            Phase::Runtime => write!(f, "runtime"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    /// An error with no meaningful source location, such as a runtime error.
    pub fn unpositioned(error_impl: ErrorImpl) -> Self {
        Error::new(error_impl, Position::null())
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn phase(&self) -> Phase {
        match &self.internal_error {
            ErrorImpl::UnexpectedCharacter { .. } | ErrorImpl::NumberParseError { .. } => {
                Phase::Lexer
            }
            ErrorImpl::UnexpectedToken { .. } => Phase::Parser,
            ErrorImpl::DuplicateIdentifier { .. }
            | ErrorImpl::TypeMismatch { .. }
            | ErrorImpl::AssignmentTypeMismatch { .. }
            | ErrorImpl::UndefinedSymbol { .. }
            | ErrorImpl::UndefinedFunction { .. }
            | ErrorImpl::ArgumentCountMismatch { .. }
            | ErrorImpl::UnknownType { .. }
            | ErrorImpl::ReturnOutsideFunction => Phase::Semantic,
            ErrorImpl::InvalidOperands { .. }
            | ErrorImpl::InvalidOperand { .. }
            | ErrorImpl::DivisionByZero
            | ErrorImpl::IntegerOverflow
            | ErrorImpl::UnresolvedName { .. }
            | ErrorImpl::FunctionBodyUnavailable { .. }
            | ErrorImpl::EmptyCallStack
            | ErrorImpl::OutputError { .. } => Phase::Runtime,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnexpectedCharacter { .. } => "LexerError",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedTokenError",
            ErrorImpl::DuplicateIdentifier { .. } => "DuplicateIdentifier",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::AssignmentTypeMismatch { .. } => "AssignmentTypeMismatch",
            ErrorImpl::UndefinedSymbol { .. } => "UndefinedSymbol",
            ErrorImpl::UndefinedFunction { .. } => "UndefinedFunction",
            ErrorImpl::ArgumentCountMismatch { .. } => "ArgumentCountMismatch",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::ReturnOutsideFunction => "ReturnOutsideFunction",
            ErrorImpl::InvalidOperands { .. } => "InvalidOperands",
            ErrorImpl::InvalidOperand { .. } => "InvalidOperand",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::IntegerOverflow => "IntegerOverflow",
            ErrorImpl::UnresolvedName { .. } => "UnresolvedName",
            ErrorImpl::FunctionBodyUnavailable { .. } => "FunctionBodyUnavailable",
            ErrorImpl::EmptyCallStack => "EmptyCallStack",
            ErrorImpl::OutputError { .. } => "OutputError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnexpectedCharacter { .. } => ErrorTip::None,
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it outside the supported range?",
                token
            )),
            ErrorImpl::UnexpectedToken { found, expected } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, expected `{}`",
                found, expected
            )),
            ErrorImpl::DuplicateIdentifier { name } => ErrorTip::Suggestion(format!(
                "`{}` is already declared in this scope",
                name
            )),
            ErrorImpl::TypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::AssignmentTypeMismatch {
                name,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` has type `{}`, cannot assign `{}`",
                name, expected, received
            )),
            ErrorImpl::UndefinedSymbol { name } => {
                ErrorTip::Suggestion(format!("Symbol `{}` not declared", name))
            }
            ErrorImpl::UndefinedFunction { name } => {
                ErrorTip::Suggestion(format!("Function `{}` not declared", name))
            }
            ErrorImpl::ArgumentCountMismatch {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` expects {} arguments, received {}",
                function, expected, received
            )),
            ErrorImpl::UnknownType { name } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", name))
            }
            ErrorImpl::ReturnOutsideFunction => ErrorTip::Suggestion(String::from(
                "`return` is only allowed inside a function body",
            )),
            ErrorImpl::DivisionByZero => ErrorTip::None,
            ErrorImpl::IntegerOverflow => ErrorTip::Suggestion(String::from(
                "Use real numbers for values outside the integer range",
            )),
            ErrorImpl::InvalidOperands { .. }
            | ErrorImpl::InvalidOperand { .. }
            | ErrorImpl::UnresolvedName { .. }
            | ErrorImpl::FunctionBodyUnavailable { .. }
            | ErrorImpl::EmptyCallStack
            | ErrorImpl::OutputError { .. } => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.position.is_null() {
            write!(f, "{} error: {}", self.phase(), self.internal_error)
        } else {
            write!(
                f,
                "{} error at {}: {}",
                self.phase(),
                self.position,
                self.internal_error
            )
        }
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unexpected character {character:?}")]
    UnexpectedCharacter { character: char },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("unexpected token {found:?}, expected {expected:?}")]
    UnexpectedToken { found: String, expected: String },
    #[error("duplicate identifier {name:?} found")]
    DuplicateIdentifier { name: String },
    #[error("types do not match: expected {expected}, received {received}")]
    TypeMismatch { expected: String, received: String },
    #[error("cannot assign {received} to {name:?} of type {expected}")]
    AssignmentTypeMismatch {
        name: String,
        expected: String,
        received: String,
    },
    #[error("symbol {name:?} not found")]
    UndefinedSymbol { name: String },
    #[error("function {name:?} is not defined")]
    UndefinedFunction { name: String },
    #[error("function {function:?} expects {expected} arguments, received {received}")]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("unknown type {name} found")]
    UnknownType { name: String },
    #[error("cannot have a return statement outside of a function")]
    ReturnOutsideFunction,
    #[error("cannot apply {operator} to {left} and {right}")]
    InvalidOperands {
        operator: String,
        left: String,
        right: String,
    },
    #[error("cannot apply {operator} to {operand}")]
    InvalidOperand { operator: String, operand: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    IntegerOverflow,
    #[error("name {name:?} is not bound in any live activation record")]
    UnresolvedName { name: String },
    #[error("body of function {name:?} is no longer available")]
    FunctionBodyUnavailable { name: String },
    #[error("no activation record left on the call stack")]
    EmptyCallStack,
    #[error("failed to write output: {message}")]
    OutputError { message: String },
}
