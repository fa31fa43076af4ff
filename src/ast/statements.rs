use std::{cell::RefCell, rc::Rc};

use serde::Serialize;

use super::{ast::SourcePosition, expressions::Expr, types::Type};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    VarDecl(VarDeclStmt),
    FnDecl(FnDeclStmt),
    Assign(AssignStmt),
    Expression(ExpressionStmt),
    Print(PrintStmt),
    Return(ReturnStmt),
    If(IfStmt),
    While(WhileStmt),
    Until(UntilStmt),
}

/// `let name [: type] [= value]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarDeclStmt {
    pub identifier: String,
    pub explicit_type: Option<Type>,
    pub assigned_value: Option<Expr>,
    pub position: SourcePosition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub param_type: Type,
    pub position: SourcePosition,
}

/// Function Declaration
///
/// The body is shared with the function's symbol so calls can run it.
/// `resolved_return_type` is set by the semantic analyzer from the
/// function's `return` statements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FnDeclStmt {
    pub identifier: String,
    pub parameters: Vec<Parameter>,
    pub body: Rc<BlockStmt>,
    pub position: SourcePosition,
    pub resolved_return_type: RefCell<Type>,
}

impl FnDeclStmt {
    pub fn new(
        identifier: String,
        parameters: Vec<Parameter>,
        body: BlockStmt,
        position: SourcePosition,
    ) -> Self {
        FnDeclStmt {
            identifier,
            parameters,
            body: Rc::new(body),
            position,
            resolved_return_type: RefCell::new(Type::Null),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignStmt {
    pub identifier: String,
    pub value: Expr,
    pub position: SourcePosition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionStmt {
    pub expression: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintStmt {
    pub expression: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStmt {
    pub value: Expr,
    /// Position of the `return` keyword.
    pub position: SourcePosition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: BlockStmt,
    pub else_body: Option<ElseBody>,
}

/// `else if (...)` chains nest as another `IfStmt`; a final `else` is a block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ElseBody {
    ElseIf(Box<IfStmt>),
    Else(BlockStmt),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UntilStmt {
    pub condition: Expr,
    pub body: BlockStmt,
}
