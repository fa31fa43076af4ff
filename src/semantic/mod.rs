//! Semantic analysis module.
//!
//! Walks the parsed program with a chain of nested scopes and:
//!
//! - Declares variables, parameters and functions, rejecting duplicates
//! - Infers variable types from their initializers or first assignment
//! - Checks operand and assignment compatibility
//! - Records each function's return type and links every call to its
//!   function symbol for the interpreter

pub mod analyzer;
pub mod symbols;
