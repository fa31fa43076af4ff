use std::{io::Write, rc::Rc};

use tracing::debug;

use crate::{
    ast::{
        ast::Program,
        expressions::{CallExpr, Expr, LogicalOp},
        statements::{BlockStmt, ElseBody, IfStmt, Stmt},
    },
    errors::errors::{Error, ErrorImpl},
};

use super::{
    call_stack::{ActivationRecord, CallStack, RecordKind},
    value::Value,
};

/// Tree-walking evaluator over an analyzed program.
///
/// Statements evaluate to `Some(value)` when a `return` ran inside them or
/// a bare call statement produced a value; blocks and loops hand that value
/// straight up to the enclosing call.
pub struct Interpreter<'a, W: Write> {
    pub call_stack: CallStack,
    out: &'a mut W,
}

impl<'a, W: Write> Interpreter<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        Interpreter {
            call_stack: CallStack::new(),
            out,
        }
    }

    fn push_record(&mut self, record: ActivationRecord) {
        debug!(record = %record.name, level = record.nesting_level, "push activation record");
        self.call_stack.push(record);
    }

    fn pop_record(&mut self) -> Option<ActivationRecord> {
        let record = self.call_stack.pop();
        if let Some(record) = &record {
            debug!(record = %record.name, level = record.nesting_level, "pop activation record\n{}", record);
        }
        record
    }

    fn store(&mut self, name: &str, value: Value) {
        if let Some(record) = self.call_stack.peek_mut() {
            record.set(name, value);
        }
    }

    /// Runs the program and returns its global record as it was at exit.
    pub fn run(&mut self, program: &Program) -> Result<ActivationRecord, Error> {
        self.push_record(ActivationRecord::new("global", RecordKind::Program, 1));
        self.execute_block(&program.body)?;

        self.pop_record()
            .ok_or_else(|| Error::unpositioned(ErrorImpl::EmptyCallStack))
    }

    pub fn execute_block(&mut self, block: &BlockStmt) -> Result<Option<Value>, Error> {
        for stmt in &block.body {
            if let Some(value) = self.execute_stmt(stmt)? {
                return Ok(Some(value));
            }
        }

        Ok(None)
    }

    fn execute_if(&mut self, if_stmt: &IfStmt) -> Result<Option<Value>, Error> {
        if self.evaluate(&if_stmt.condition)?.is_truthy() {
            return self.execute_block(&if_stmt.then_body);
        }

        match &if_stmt.else_body {
            Some(ElseBody::ElseIf(else_if)) => self.execute_if(else_if),
            Some(ElseBody::Else(block)) => self.execute_block(block),
            None => Ok(None),
        }
    }

    pub fn execute_stmt(&mut self, stmt: &Stmt) -> Result<Option<Value>, Error> {
        match stmt {
            Stmt::FnDecl(_) => Ok(None),
            Stmt::VarDecl(decl) => {
                let value = match &decl.assigned_value {
                    Some(value) => self.evaluate(value)?,
                    None => Value::Null,
                };
                self.store(&decl.identifier, value);
                Ok(None)
            }
            Stmt::Assign(assign) => {
                let value = self.evaluate(&assign.value)?;
                self.store(&assign.identifier, value);
                Ok(None)
            }
            // A bare call that yields a value ends the enclosing block like a `return`
            Stmt::Expression(stmt) => match self.evaluate(&stmt.expression)? {
                Value::Null => Ok(None),
                value => Ok(Some(value)),
            },
            Stmt::Print(stmt) => {
                let value = self.evaluate(&stmt.expression)?;
                writeln!(self.out, "{}", value).map_err(|err| {
                    Error::unpositioned(ErrorImpl::OutputError {
                        message: err.to_string(),
                    })
                })?;
                Ok(None)
            }
            Stmt::Return(stmt) => Ok(Some(self.evaluate(&stmt.value)?)),
            Stmt::If(if_stmt) => self.execute_if(if_stmt),
            Stmt::While(while_stmt) => {
                while self.evaluate(&while_stmt.condition)?.is_truthy() {
                    if let Some(value) = self.execute_block(&while_stmt.body)? {
                        return Ok(Some(value));
                    }
                }
                Ok(None)
            }
            Stmt::Until(until_stmt) => {
                while !self.evaluate(&until_stmt.condition)?.is_truthy() {
                    if let Some(value) = self.execute_block(&until_stmt.body)? {
                        return Ok(Some(value));
                    }
                }
                Ok(None)
            }
        }
    }

    fn call(&mut self, call: &CallExpr) -> Result<Value, Error> {
        let function = call.resolved.borrow().clone().ok_or_else(|| {
            Error::unpositioned(ErrorImpl::UndefinedFunction {
                name: call.callee.clone(),
            })
        })?;

        let (name, params, nesting_level, body) = {
            let function = function.borrow();
            let params = function
                .formal_params
                .iter()
                .map(|param| param.name.clone())
                .collect::<Vec<String>>();
            (
                function.name.clone(),
                params,
                function.scope_level + 1,
                function.body.upgrade(),
            )
        };
        let body: Rc<BlockStmt> = body.ok_or_else(|| {
            Error::unpositioned(ErrorImpl::FunctionBodyUnavailable { name: name.clone() })
        })?;

        // Arguments see the caller's record, not the new one
        let mut record = ActivationRecord::new(&name, RecordKind::Function, nesting_level);
        for (param, argument) in params.iter().zip(&call.arguments) {
            let value = self.evaluate(argument)?;
            record.set(param, value);
        }

        self.push_record(record);
        let result = self.execute_block(&body);
        self.pop_record();

        Ok(result?.unwrap_or(Value::Null))
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value, Error> {
        match expr {
            Expr::Literal(literal) => Ok(Value::from(literal)),
            Expr::Symbol(symbol) => self.call_stack.lookup(&symbol.name).cloned().ok_or_else(|| {
                Error::new(
                    ErrorImpl::UnresolvedName {
                        name: symbol.name.clone(),
                    },
                    symbol.position.get(),
                )
            }),
            Expr::Array(array) => {
                let mut elements = Vec::with_capacity(array.elements.len());
                for element in &array.elements {
                    elements.push(self.evaluate(element)?);
                }
                Ok(Value::Array(elements))
            }
            Expr::Member(member) => {
                let object = self.evaluate(&member.object)?;
                let index = self.evaluate(&member.index)?;
                Ok(object.index(&index))
            }
            Expr::Unary(unary) => self.evaluate(&unary.operand)?.apply_unary(unary.operator),
            Expr::Binary(binary) => {
                let left = self.evaluate(&binary.left)?;
                let right = self.evaluate(&binary.right)?;
                left.apply_binary(binary.operator, &right)
            }
            // Both sides always run
            Expr::Logical(logical) => {
                let left = self.evaluate(&logical.left)?.is_truthy();
                let right = self.evaluate(&logical.right)?.is_truthy();
                Ok(Value::Bool(match logical.operator {
                    LogicalOp::And => left && right,
                    LogicalOp::Or => left || right,
                }))
            }
            Expr::Call(call) => self.call(call),
        }
    }
}

/// Runs an analyzed program, printing to `out`. Returns the global record.
pub fn interpret<W: Write>(program: &Program, out: &mut W) -> Result<ActivationRecord, Error> {
    Interpreter::new(out).run(program)
}
