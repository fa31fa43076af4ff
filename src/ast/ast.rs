use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::Position;

use super::{
    expressions::{BinaryOp, Expr, Literal, LogicalOp, UnaryOp},
    statements::{BlockStmt, ElseBody, IfStmt, Stmt},
};

/// Where a node starts in the source.
///
/// Every pair of positions compares equal, so two trees are equal when
/// their shape and contents are, wherever they were parsed from.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct SourcePosition(pub Position);

impl SourcePosition {
    pub fn get(&self) -> Position {
        self.0
    }
}

impl PartialEq for SourcePosition {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl From<Position> for SourcePosition {
    fn from(position: Position) -> Self {
        SourcePosition(position)
    }
}

/// Root of the tree: the top-level statement list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub body: BlockStmt,
}

// Pretty printing. The output is source text that parses back to the same tree.

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_block(f, &self.body, 0)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_expr(f, self, 0)
    }
}

fn write_block(f: &mut Formatter<'_>, block: &BlockStmt, indent: usize) -> fmt::Result {
    for stmt in &block.body {
        write_stmt(f, stmt, indent)?;
    }
    Ok(())
}

fn write_stmt(f: &mut Formatter<'_>, stmt: &Stmt, indent: usize) -> fmt::Result {
    let pad = "  ".repeat(indent);

    match stmt {
        Stmt::VarDecl(decl) => {
            write!(f, "{}let {}", pad, decl.identifier)?;
            if let Some(keyword) = decl.explicit_type.as_ref().and_then(|ty| ty.keyword()) {
                write!(f, " : {}", keyword)?;
            }
            if let Some(value) = &decl.assigned_value {
                write!(f, " = {}", value)?;
            }
            writeln!(f)
        }
        Stmt::FnDecl(decl) => {
            let params = decl
                .parameters
                .iter()
                .map(|param| format!("{}: {}", param.name, param.param_type.keyword().unwrap_or("")))
                .collect::<Vec<String>>()
                .join(", ");
            writeln!(f, "{}function {}({}) {{", pad, decl.identifier, params)?;
            write_block(f, &decl.body, indent + 1)?;
            writeln!(f, "{}}}", pad)
        }
        Stmt::Assign(assign) => writeln!(f, "{}{} = {}", pad, assign.identifier, assign.value),
        Stmt::Expression(stmt) => writeln!(f, "{}{}", pad, stmt.expression),
        Stmt::Print(print) => writeln!(f, "{}print {}", pad, print.expression),
        Stmt::Return(ret) => writeln!(f, "{}return {}", pad, ret.value),
        Stmt::If(if_stmt) => {
            write!(f, "{}", pad)?;
            write_if(f, if_stmt, indent)?;
            writeln!(f, "{}endif", pad)
        }
        Stmt::While(while_stmt) => {
            writeln!(f, "{}while ({}) repeat", pad, while_stmt.condition)?;
            write_block(f, &while_stmt.body, indent + 1)?;
            writeln!(f, "{}endwhile", pad)
        }
        Stmt::Until(until) => {
            writeln!(f, "{}until ({}) repeat", pad, until.condition)?;
            write_block(f, &until.body, indent + 1)?;
            writeln!(f, "{}enduntil", pad)
        }
    }
}

// One `endif` closes the whole else-if chain, so it is written by the caller.
fn write_if(f: &mut Formatter<'_>, if_stmt: &IfStmt, indent: usize) -> fmt::Result {
    let pad = "  ".repeat(indent);

    writeln!(f, "if ({}) then", if_stmt.condition)?;
    write_block(f, &if_stmt.then_body, indent + 1)?;

    match &if_stmt.else_body {
        Some(ElseBody::ElseIf(next)) => {
            write!(f, "{}else ", pad)?;
            write_if(f, next, indent)
        }
        Some(ElseBody::Else(block)) => {
            writeln!(f, "{}else", pad)?;
            write_block(f, block, indent + 1)
        }
        None => Ok(()),
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Logical(logical) => match logical.operator {
            LogicalOp::Or => 1,
            LogicalOp::And => 2,
        },
        Expr::Binary(binary) => match binary.operator {
            op if op.is_comparison() => 3,
            BinaryOp::Add | BinaryOp::Subtract => 4,
            _ => 5,
        },
        Expr::Member(_) => 6,
        // Factors, including prefix operators, which bind a factor only
        _ => 7,
    }
}

fn write_expr(f: &mut Formatter<'_>, expr: &Expr, min_precedence: u8) -> fmt::Result {
    // Parentheses re-enter the grammar at `sum`, which is the only level
    // the parser can ever produce inside them.
    if precedence(expr) < min_precedence {
        write!(f, "(")?;
        write_expr(f, expr, 0)?;
        return write!(f, ")");
    }

    match expr {
        Expr::Logical(logical) => {
            let level = precedence(expr);
            write_expr(f, &logical.left, level + 1)?;
            write!(f, " {} ", logical.operator)?;
            write_expr(f, &logical.right, level)
        }
        Expr::Binary(binary) => {
            let level = precedence(expr);
            let (left, right) = if binary.operator.is_comparison() {
                (4, 4)
            } else {
                (level, level + 1)
            };
            write_expr(f, &binary.left, left)?;
            write!(f, " {} ", binary.operator)?;
            write_expr(f, &binary.right, right)
        }
        Expr::Unary(unary) => {
            match unary.operator {
                UnaryOp::Not => write!(f, "not ")?,
                op => write!(f, "{}", op)?,
            }
            write_expr(f, &unary.operand, 7)
        }
        Expr::Call(call) => {
            write!(f, "{}(", call.callee)?;
            write_list(f, &call.arguments)?;
            write!(f, ")")
        }
        Expr::Member(member) => {
            write_expr(f, &member.object, 6)?;
            write!(f, "[{}]", member.index)
        }
        Expr::Array(array) => {
            write!(f, "[")?;
            write_list(f, &array.elements)?;
            write!(f, "]")
        }
        Expr::Literal(literal) => match literal {
            Literal::Integer(value) => write!(f, "{}", value),
            Literal::Real(value) => {
                let text = value.to_string();
                if text.contains('.') {
                    write!(f, "{}", text)
                } else {
                    write!(f, "{}.0", text)
                }
            }
            Literal::String(value) if value.contains('"') => write!(f, "'{}'", value),
            Literal::String(value) => write!(f, "\"{}\"", value),
            Literal::Boolean(value) => write!(f, "{}", value),
        },
        Expr::Symbol(symbol) => write!(f, "{}", symbol.name),
    }
}

fn write_list(f: &mut Formatter<'_>, exprs: &[Expr]) -> fmt::Result {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write_expr(f, expr, 0)?;
    }
    Ok(())
}
