//! Runtime module: the tree-walking interpreter.
//!
//! - `value`: dynamically typed runtime values and their operators
//! - `call_stack`: activation records and the stack that holds them
//! - `interpreter`: statement execution and expression evaluation

pub mod call_stack;
pub mod interpreter;
pub mod value;

#[cfg(test)]
mod tests;
