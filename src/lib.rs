#![allow(clippy::module_inception)]

use std::{fmt::Display, io::Write};

use serde::Serialize;

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorTip},
    runtime::call_stack::ActivationRecord,
    semantic::symbols::{Scope, SymbolTable},
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod runtime;
pub mod semantic;

extern crate regex;

pub use lexer::lexer::tokenize;
pub use parser::parser::parse;
pub use runtime::interpreter::interpret;
pub use semantic::analyzer::analyze;

/// Source location: 1-based line, 0-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Placeholder for errors with no source location.
    pub fn null() -> Self {
        Position { line: 0, column: 0 }
    }

    pub fn is_null(&self) -> bool {
        self.line == 0
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Everything a successful run leaves behind.
#[derive(Debug)]
pub struct Execution {
    pub program: Program,
    pub symbols: SymbolTable,
    /// The global activation record as it was when the program finished.
    pub memory: ActivationRecord,
}

impl Execution {
    pub fn globals(&self) -> Option<&Scope> {
        self.symbols.global()
    }
}

/// Lexes, parses, analyzes and interprets `source`, printing to `out`.
/// Stops at the first error; nothing runs unless analysis succeeded.
pub fn run<W: Write>(source: &str, out: &mut W) -> Result<Execution, Error> {
    let tokens = tokenize(source)?;
    let program = parse(tokens)?;
    let symbols = analyze(&program)?;
    let memory = interpret(&program, out)?;

    Ok(Execution {
        program,
        symbols,
        memory,
    })
}

pub fn get_line_at_position(source: &str, position: &Position) -> Option<String> {
    if position.is_null() {
        return None;
    }

    source
        .split('\n')
        .nth(position.line - 1)
        .map(|line| line.trim_end_matches('\r').to_string())
}

/// Renders an error with the offending line and a caret under the column.
pub fn format_error(error: &Error, source: &str, file: &str) -> String {
    /*
        Error: LexerError
        -> main.prog
           |
         2 | let a = #
           |         ^
        lexer error at line 2, column 8: unexpected character '#'
    */

    let mut output = match error.get_tip() {
        ErrorTip::None => format!("Error: {}\n", error.get_error_name()),
        tip => format!("Error: {} ({})\n", error.get_error_name(), tip),
    };
    output.push_str(&format!("-> {}\n", file));

    let position = error.get_position();
    if let Some(line_text) = get_line_at_position(source, position) {
        let line_string = position.line.to_string();
        let padding = line_string.len() + 2;
        let caret = position.column + 1;

        output.push_str(&format!("{:>padding$}\n", "|"));
        output.push_str(&format!("{} | {}\n", line_string, line_text));
        output.push_str(&format!("{:>padding$} {:>caret$}\n", "|", "^"));
    }

    output.push_str(&format!("{}\n", error));
    output
}
