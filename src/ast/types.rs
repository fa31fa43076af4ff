//! Type system definitions for the AST.
//!
//! This module defines the types the language knows about:
//!
//! - Primitive types (integers, reals, strings, booleans)
//! - Arrays, carrying the statically known type of each element
//! - `Null`, the placeholder for a type that is not known yet
//!
//! Types appear in the AST as declared annotations (`let x : integer`,
//! function parameters) and as annotations the semantic analyzer attaches
//! after inference.

use std::fmt::Display;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Type {
    Integer,
    Real,
    String,
    Boolean,
    Array(Vec<Type>),
    /// Not known yet; fixed by the first assignment.
    Null,
}

impl Type {
    /// Upper-case name, also the name of the builtin type symbol.
    pub fn name(&self) -> &'static str {
        match self {
            Type::Integer => "INTEGER",
            Type::Real => "REAL",
            Type::String => "STRING",
            Type::Boolean => "BOOLEAN",
            Type::Array(_) => "ARRAY",
            Type::Null => "NULL",
        }
    }

    /// Spelling used in source annotations. Only declarable types have one.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            Type::Integer => Some("integer"),
            Type::Real => Some("real"),
            Type::String => Some("string"),
            Type::Boolean => Some("boolean"),
            Type::Array(_) | Type::Null => None,
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Type::Null
    }

    /// Types match by name; array element types are not compared.
    pub fn same_kind(&self, other: &Type) -> bool {
        self.name() == other.name()
    }

    /// Builtin types seeded into the global scope.
    pub fn builtins() -> Vec<Type> {
        vec![
            Type::Integer,
            Type::Real,
            Type::Boolean,
            Type::String,
            Type::Array(vec![]),
        ]
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
