//! Symbols and the scope chain used by the semantic analyzer.
//!
//! Scopes live in an arena owned by the [`SymbolTable`]; each scope refers
//! to its enclosing scope by id, so the global scope survives the analysis
//! and can be inspected afterwards.

use std::{
    cell::RefCell,
    collections::HashMap,
    fmt::{self, Debug, Display, Formatter},
    rc::{Rc, Weak},
};

use crate::ast::{statements::BlockStmt, types::Type};

#[derive(Debug, Clone, PartialEq)]
pub struct VarSymbol {
    pub name: String,
    pub var_type: Type,
}

/// A declared function.
///
/// The return type starts as `Null` and is filled in from the function's
/// `return` statements. `body` points at the declaration's block, which the
/// AST owns.
pub struct FunctionSymbol {
    pub name: String,
    pub return_type: Type,
    pub formal_params: Vec<VarSymbol>,
    /// Level of the scope the function was declared in.
    pub scope_level: usize,
    pub body: Weak<BlockStmt>,
}

impl FunctionSymbol {
    pub fn new(name: String, scope_level: usize) -> Self {
        FunctionSymbol {
            name,
            return_type: Type::Null,
            formal_params: Vec::new(),
            scope_level,
            body: Weak::new(),
        }
    }
}

// The body is left out: it can reach calls that point back at this symbol.
impl Debug for FunctionSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionSymbol")
            .field("name", &self.name)
            .field("return_type", &self.return_type)
            .field("formal_params", &self.formal_params)
            .field("scope_level", &self.scope_level)
            .finish()
    }
}

impl PartialEq for FunctionSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.return_type == other.return_type
            && self.formal_params == other.formal_params
            && self.scope_level == other.scope_level
    }
}

#[derive(Debug, Clone)]
pub enum Symbol {
    BuiltinType(Type),
    Var(VarSymbol),
    Function(Rc<RefCell<FunctionSymbol>>),
}

impl Symbol {
    pub fn name(&self) -> String {
        match self {
            Symbol::BuiltinType(ty) => String::from(ty.name()),
            Symbol::Var(var) => var.name.clone(),
            Symbol::Function(function) => function.borrow().name.clone(),
        }
    }

    /// The type an expression naming this symbol has.
    pub fn symbol_type(&self) -> Type {
        match self {
            Symbol::BuiltinType(ty) => ty.clone(),
            Symbol::Var(var) => var.var_type.clone(),
            Symbol::Function(function) => function.borrow().return_type.clone(),
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::BuiltinType(ty) => write!(f, "{} : <BUILTIN>", ty),
            Symbol::Var(var) => write!(f, "{} : <{}>", var.name, var.var_type),
            Symbol::Function(function) => {
                let function = function.borrow();
                let params = function
                    .formal_params
                    .iter()
                    .map(|param| format!("{}: {}", param.name, param.var_type))
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "{}({}) : <{}>", function.name, params, function.return_type)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

/// One scope: a name to symbol mapping plus the link to its enclosing scope.
#[derive(Debug)]
pub struct Scope {
    pub name: String,
    /// 1 for the global scope.
    pub level: usize,
    pub enclosing: Option<ScopeId>,
    symbols: HashMap<String, Symbol>,
    order: Vec<String>,
}

impl Scope {
    fn new(name: &str, level: usize, enclosing: Option<ScopeId>) -> Self {
        Scope {
            name: String::from(name),
            level,
            enclosing,
            symbols: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn insert(&mut self, symbol: Symbol) {
        let name = symbol.name();
        if self.symbols.insert(name.clone(), symbol).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Symbols in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.order.iter().filter_map(|name| self.symbols.get(name))
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "SCOPE {} (level {})", self.name, self.level)?;
        for symbol in self.symbols() {
            writeln!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

/// Arena of scopes with a cursor on the current one.
#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    current: Option<ScopeId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Opens a scope one level below the current one and makes it current.
    pub fn enter_scope(&mut self, name: &str) -> ScopeId {
        let level = self.current_level() + 1;
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(name, level, self.current));
        self.current = Some(id);
        id
    }

    /// Makes the enclosing scope current again. The closed scope stays in the arena.
    pub fn exit_scope(&mut self) {
        if let Some(id) = self.current {
            self.current = self.scopes[id.0].enclosing;
        }
    }

    pub fn current_scope(&self) -> Option<&Scope> {
        self.current.map(|id| &self.scopes[id.0])
    }

    /// Level of the current scope, 0 when no scope is open.
    pub fn current_level(&self) -> usize {
        self.current_scope().map(|scope| scope.level).unwrap_or(0)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    /// The first scope opened, i.e. the global scope.
    pub fn global(&self) -> Option<&Scope> {
        self.scopes.first()
    }

    pub fn insert(&mut self, symbol: Symbol) {
        if let Some(id) = self.current {
            self.scopes[id.0].insert(symbol);
        }
    }

    /// Resolves `name` in the current scope, then outward through the
    /// enclosing scopes unless `current_scope_only` is set.
    pub fn lookup(&self, name: &str, current_scope_only: bool) -> Option<&Symbol> {
        let id = self.resolve(name, current_scope_only)?;
        self.scopes[id.0].get(name)
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        let id = self.resolve(name, false)?;
        self.scopes[id.0].symbols.get_mut(name)
    }

    fn resolve(&self, name: &str, current_scope_only: bool) -> Option<ScopeId> {
        let mut scope_id = self.current;
        while let Some(id) = scope_id {
            let scope = &self.scopes[id.0];
            if scope.symbols.contains_key(name) {
                return Some(id);
            }
            if current_scope_only {
                return None;
            }
            scope_id = scope.enclosing;
        }
        None
    }
}
