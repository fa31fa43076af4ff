use std::{cell::RefCell, rc::Rc};

use tracing::debug;

use crate::{
    ast::{
        ast::Program,
        expressions::{Expr, Literal, LogicalExpr, UnaryOp},
        statements::{BlockStmt, ElseBody, FnDeclStmt, IfStmt, Stmt, VarDeclStmt},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::symbols::{FunctionSymbol, Symbol, SymbolTable, VarSymbol};

#[derive(Debug, Default)]
pub struct SemanticAnalyzer {
    pub table: SymbolTable,
    /// Functions whose bodies are being analyzed, innermost last.
    functions: Vec<Rc<RefCell<FunctionSymbol>>>,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        SemanticAnalyzer::default()
    }

    fn enter_scope(&mut self, name: &str) {
        self.table.enter_scope(name);
        debug!(scope = name, level = self.table.current_level(), "enter scope");
    }

    fn leave_scope(&mut self) {
        if let Some(scope) = self.table.current_scope() {
            debug!(scope = %scope.name, level = scope.level, "leave scope\n{}", scope);
        }
        self.table.exit_scope();
    }

    fn lookup_type(&self, ty: &Type, position: Position) -> Result<Type, Error> {
        match self.table.lookup(ty.name(), false) {
            Some(Symbol::BuiltinType(builtin)) if builtin.same_kind(ty) => Ok(ty.clone()),
            _ => Err(Error::new(
                ErrorImpl::UnknownType {
                    name: ty.to_string(),
                },
                position,
            )),
        }
    }

    fn declare(&mut self, symbol: Symbol, position: Position) -> Result<(), Error> {
        let name = symbol.name();
        if self.table.lookup(&name, true).is_some() {
            return Err(Error::new(ErrorImpl::DuplicateIdentifier { name }, position));
        }

        self.table.insert(symbol);
        Ok(())
    }

    /// True for a call to a function whose body is still being analyzed
    /// and has not returned a typed value yet, such as a recursive call
    /// placed before the function's first `return`. Its type is checked
    /// against nothing.
    fn is_pending_call(&self, expr: &Expr) -> bool {
        let Expr::Call(call) = expr else {
            return false;
        };

        call.resolved.borrow().as_ref().is_some_and(|function| {
            !function.borrow().return_type.is_known()
                && self.functions.iter().any(|open| Rc::ptr_eq(open, function))
        })
    }
}

fn type_mismatch(expected: &Type, received: &Type, position: Position) -> Error {
    Error::new(
        ErrorImpl::TypeMismatch {
            expected: expected.to_string(),
            received: received.to_string(),
        },
        position,
    )
}

/// Infers the static type of an expression, checking its operands on the way.
pub fn analyze_expr(analyzer: &mut SemanticAnalyzer, expr: &Expr) -> Result<Type, Error> {
    match expr {
        Expr::Literal(literal) => Ok(match literal {
            Literal::Integer(_) => Type::Integer,
            Literal::Real(_) => Type::Real,
            Literal::String(_) => Type::String,
            Literal::Boolean(_) => Type::Boolean,
        }),
        Expr::Symbol(symbol) => match analyzer.table.lookup(&symbol.name, false) {
            Some(found) => Ok(found.symbol_type()),
            None => Err(Error::new(
                ErrorImpl::UndefinedSymbol {
                    name: symbol.name.clone(),
                },
                symbol.position.get(),
            )),
        },
        Expr::Array(array) => {
            let mut elements = Vec::with_capacity(array.elements.len());
            for element in &array.elements {
                elements.push(analyze_expr(analyzer, element)?);
            }

            Ok(Type::Array(elements))
        }
        Expr::Member(member) => {
            let object = analyze_expr(analyzer, &member.object)?;
            analyze_expr(analyzer, &member.index)?;

            Ok(match object {
                // A literal index picks the element's own type
                Type::Array(elements) => match member.index.as_ref() {
                    Expr::Literal(Literal::Integer(index)) => usize::try_from(*index)
                        .ok()
                        .and_then(|index| elements.get(index).cloned())
                        .unwrap_or(Type::Null),
                    _ => Type::Null,
                },
                Type::String => Type::String,
                _ => Type::Null,
            })
        }
        Expr::Unary(unary) => {
            let operand = analyze_expr(analyzer, &unary.operand)?;
            match unary.operator {
                UnaryOp::Not => Ok(Type::Boolean),
                UnaryOp::Plus | UnaryOp::Minus => Ok(operand),
            }
        }
        Expr::Binary(binary) => {
            let left = analyze_expr(analyzer, &binary.left)?;
            let right = analyze_expr(analyzer, &binary.right)?;

            if analyzer.is_pending_call(&binary.left) {
                return Ok(right);
            }
            if !left.same_kind(&right) && !analyzer.is_pending_call(&binary.right) {
                return Err(type_mismatch(&left, &right, binary.position.get()));
            }

            Ok(left)
        }
        Expr::Logical(LogicalExpr { left, right, .. }) => {
            analyze_expr(analyzer, left)?;
            analyze_expr(analyzer, right)?;

            Ok(Type::Boolean)
        }
        Expr::Call(call) => {
            for argument in &call.arguments {
                analyze_expr(analyzer, argument)?;
            }

            let function = match analyzer.table.lookup(&call.callee, false) {
                Some(Symbol::Function(function)) => Rc::clone(function),
                _ => {
                    return Err(Error::new(
                        ErrorImpl::UndefinedFunction {
                            name: call.callee.clone(),
                        },
                        call.position.get(),
                    ))
                }
            };

            let expected = function.borrow().formal_params.len();
            if expected != call.arguments.len() {
                return Err(Error::new(
                    ErrorImpl::ArgumentCountMismatch {
                        function: call.callee.clone(),
                        expected,
                        received: call.arguments.len(),
                    },
                    call.position.get(),
                ));
            }

            let return_type = function.borrow().return_type.clone();
            *call.resolved.borrow_mut() = Some(function);

            Ok(return_type)
        }
    }
}

fn analyze_var_decl(analyzer: &mut SemanticAnalyzer, decl: &VarDeclStmt) -> Result<(), Error> {
    let inferred = match &decl.assigned_value {
        Some(value) => Some(analyze_expr(analyzer, value)?),
        None => None,
    };

    let position = decl.position.get();
    let var_type = match (&decl.explicit_type, &decl.assigned_value, inferred) {
        (Some(declared), Some(value), Some(inferred)) => {
            let declared = analyzer.lookup_type(declared, position)?;
            if !declared.same_kind(&inferred) && !analyzer.is_pending_call(value) {
                return Err(type_mismatch(&declared, &inferred, position));
            }
            declared
        }
        (Some(declared), _, _) => analyzer.lookup_type(declared, position)?,
        (None, _, Some(inferred)) => inferred,
        (None, _, None) => Type::Null,
    };

    analyzer.declare(
        Symbol::Var(VarSymbol {
            name: decl.identifier.clone(),
            var_type,
        }),
        position,
    )
}

fn analyze_fn_decl(analyzer: &mut SemanticAnalyzer, decl: &FnDeclStmt) -> Result<(), Error> {
    let function = Rc::new(RefCell::new(FunctionSymbol::new(
        decl.identifier.clone(),
        analyzer.table.current_level(),
    )));
    function.borrow_mut().body = Rc::downgrade(&decl.body);

    // Declared before the body is visited so the function can call itself
    analyzer.declare(Symbol::Function(Rc::clone(&function)), decl.position.get())?;

    analyzer.enter_scope(&decl.identifier);

    for parameter in &decl.parameters {
        let position = parameter.position.get();
        let param = VarSymbol {
            name: parameter.name.clone(),
            var_type: analyzer.lookup_type(&parameter.param_type, position)?,
        };
        analyzer.declare(Symbol::Var(param.clone()), position)?;
        function.borrow_mut().formal_params.push(param);
    }

    analyzer.functions.push(Rc::clone(&function));
    analyze_block(analyzer, &decl.body)?;
    analyzer.functions.pop();

    analyzer.leave_scope();

    *decl.resolved_return_type.borrow_mut() = function.borrow().return_type.clone();

    Ok(())
}

fn analyze_if(analyzer: &mut SemanticAnalyzer, if_stmt: &IfStmt) -> Result<(), Error> {
    analyze_expr(analyzer, &if_stmt.condition)?;
    analyze_block(analyzer, &if_stmt.then_body)?;

    match &if_stmt.else_body {
        Some(ElseBody::ElseIf(else_if)) => analyze_if(analyzer, else_if),
        Some(ElseBody::Else(block)) => analyze_block(analyzer, block),
        None => Ok(()),
    }
}

pub fn analyze_stmt(analyzer: &mut SemanticAnalyzer, stmt: &Stmt) -> Result<(), Error> {
    match stmt {
        Stmt::VarDecl(decl) => analyze_var_decl(analyzer, decl),
        Stmt::FnDecl(decl) => analyze_fn_decl(analyzer, decl),
        Stmt::Assign(assign) => {
            let value = analyze_expr(analyzer, &assign.value)?;
            let pending = analyzer.is_pending_call(&assign.value);
            let position = assign.position.get();

            match analyzer.table.lookup_mut(&assign.identifier) {
                None => Err(Error::new(
                    ErrorImpl::UndefinedSymbol {
                        name: assign.identifier.clone(),
                    },
                    position,
                )),
                // First assignment fixes a type left open by the declaration
                Some(Symbol::Var(var)) if !var.var_type.is_known() => {
                    var.var_type = value;
                    Ok(())
                }
                Some(Symbol::Var(var)) if pending || var.var_type.same_kind(&value) => Ok(()),
                Some(symbol) => Err(Error::new(
                    ErrorImpl::AssignmentTypeMismatch {
                        name: assign.identifier.clone(),
                        expected: symbol.symbol_type().to_string(),
                        received: value.to_string(),
                    },
                    position,
                )),
            }
        }
        Stmt::Expression(stmt) => analyze_expr(analyzer, &stmt.expression).map(|_| ()),
        Stmt::Print(stmt) => analyze_expr(analyzer, &stmt.expression).map(|_| ()),
        Stmt::Return(stmt) => {
            let function = match analyzer.functions.last() {
                Some(function) => Rc::clone(function),
                None => {
                    return Err(Error::new(
                        ErrorImpl::ReturnOutsideFunction,
                        stmt.position.get(),
                    ))
                }
            };

            let value = analyze_expr(analyzer, &stmt.value)?;
            if value.is_known() {
                function.borrow_mut().return_type = value;
            }

            Ok(())
        }
        Stmt::If(if_stmt) => analyze_if(analyzer, if_stmt),
        Stmt::While(while_stmt) => {
            analyze_expr(analyzer, &while_stmt.condition)?;
            analyze_block(analyzer, &while_stmt.body)
        }
        Stmt::Until(until_stmt) => {
            analyze_expr(analyzer, &until_stmt.condition)?;
            analyze_block(analyzer, &until_stmt.body)
        }
    }
}

pub fn analyze_block(analyzer: &mut SemanticAnalyzer, block: &BlockStmt) -> Result<(), Error> {
    for stmt in &block.body {
        analyze_stmt(analyzer, stmt)?;
    }

    Ok(())
}

/// Checks a whole program, annotating its calls and function declarations.
/// Returns the symbol table, whose global scope stays inspectable.
pub fn analyze(program: &Program) -> Result<SymbolTable, Error> {
    let mut analyzer = SemanticAnalyzer::new();

    analyzer.enter_scope("global");
    for builtin in Type::builtins() {
        analyzer.table.insert(Symbol::BuiltinType(builtin));
    }

    analyze_block(&mut analyzer, &program.body)?;
    analyzer.leave_scope();

    Ok(analyzer.table)
}
