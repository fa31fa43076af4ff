use std::{cell::RefCell, fmt::Display, rc::Rc};

use serde::Serialize;

use crate::semantic::symbols::FunctionSymbol;

use super::ast::SourcePosition;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Binary(BinaryExpr),
    Logical(LogicalExpr),
    Unary(UnaryExpr),
    Call(CallExpr),
    Member(MemberExpr),
    Array(ArrayExpr),
    Literal(Literal),
    Symbol(SymbolExpr),
}

/// Arithmetic and relational operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
}

impl BinaryOp {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Equals
                | BinaryOp::Less
                | BinaryOp::LessEquals
                | BinaryOp::Greater
                | BinaryOp::GreaterEquals
        )
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Equals => "==",
            BinaryOp::Less => "<",
            BinaryOp::LessEquals => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEquals => ">=",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogicalOp {
    And,
    Or,
}

impl Display for LogicalOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicalOp::And => write!(f, "and"),
            LogicalOp::Or => write!(f, "or"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Plus => write!(f, "+"),
            UnaryOp::Minus => write!(f, "-"),
            UnaryOp::Not => write!(f, "not"),
        }
    }
}

/// Binary Expression
/// Arithmetic or a single (non-chaining) comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: BinaryOp,
    pub right: Box<Expr>,
    /// Position of the operator.
    pub position: SourcePosition,
}

/// Logical Expression
/// `and` / `or`. Both operands are always evaluated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalExpr {
    pub left: Box<Expr>,
    pub operator: LogicalOp,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryExpr {
    pub operator: UnaryOp,
    pub operand: Box<Expr>,
}

/// Call Expression
///
/// `resolved` is filled in by the semantic analyzer; the interpreter runs
/// the call through it and never looks the callee up by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallExpr {
    pub callee: String,
    pub arguments: Vec<Expr>,
    pub position: SourcePosition,
    #[serde(skip)]
    pub resolved: RefCell<Option<Rc<RefCell<FunctionSymbol>>>>,
}

impl CallExpr {
    pub fn new(callee: String, arguments: Vec<Expr>, position: SourcePosition) -> Self {
        CallExpr {
            callee,
            arguments,
            position,
            resolved: RefCell::new(None),
        }
    }
}

/// Member Expression
/// Indexing into an array or a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberExpr {
    pub object: Box<Expr>,
    pub index: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayExpr {
    pub elements: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Integer(i64),
    Real(f64),
    String(String),
    Boolean(bool),
}

/// Symbol Expression
/// A bare identifier reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolExpr {
    pub name: String,
    pub position: SourcePosition,
}
