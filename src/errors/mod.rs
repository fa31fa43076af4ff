//! Error types and error handling for the interpreter.
//!
//! This module defines the single error type shared by every pipeline
//! phase. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for the lexer, parser, analyzer and runtime
//! - The phase each error belongs to
//! - Helpful error messages and suggestions

pub mod errors;
