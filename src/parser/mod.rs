//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the recursive descent parser that transforms a
//! stream of tokens into an Abstract Syntax Tree. It handles:
//!
//! - Statement parsing (declarations, functions, control flow, print)
//! - Expression parsing with a fixed precedence ladder:
//!   `or` < `and` < one comparison < `+ -` < `* / %` < indexing < factor
//! - Type parsing for declarations and parameters
//!
//! `or` and `and` are right-associative by recursion, comparisons do not
//! chain, and parentheses re-enter the grammar at the additive level.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
