// Copyright 2025-2026 Neil Henderson
//
//! The `symbol_table` module defines the [SymbolTable] type and its related types.

use std::collections::HashMap;

use crate::core::SourceLocation;

use super::types::{ClassHierarchy, Type};

/// The kind of a lexical scope.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Class,
    Block,
}

/// A function parameter symbol.
#[derive(Debug, Clone)]
pub struct ParameterSymbol {
    pub name: String,
    pub data_type: Type,
    pub slot: usize, // Zero-based position in the parameter list.
    pub loc: SourceLocation,
}

/// A function or method symbol.
#[derive(Debug, Clone)]
pub struct FunctionSymbol {
    pub name: String,
    pub params: Vec<ParameterSymbol>,
    pub return_type: Type,
    pub enclosing_class: Option<String>,
    pub loc: SourceLocation,
}

impl FunctionSymbol {
    /// The function's type when referenced as a value.
    pub fn signature(&self) -> Type {
        Type::Function {
            params: self.params.iter().map(|p| p.data_type.clone()).collect(),
            return_type: Box::new(self.return_type.clone()),
        }
    }
}

/// A class symbol: its own fields and methods, plus the name of its parent class.
///
/// Inherited members are not flattened into the symbol; lookups walk the parent chain through the
/// table's class registry.
#[derive(Debug, Clone)]
pub struct ClassSymbol {
    pub name: String,
    pub parent: Option<String>,
    pub fields: Vec<(String, Type)>, // Declaration order.
    pub methods: HashMap<String, FunctionSymbol>,
    pub loc: SourceLocation,
}

impl ClassSymbol {
    /// The type of the class's own field `name`, if declared directly on this class.
    pub fn own_field(&self, name: &str) -> Option<&Type> {
        self.fields.iter().find(|(f, _)| f == name).map(|(_, t)| t)
    }

    /// The class's own method `name`, if declared directly on this class.
    pub fn own_method(&self, name: &str) -> Option<&FunctionSymbol> {
        self.methods.get(name)
    }
}

/// A named entry in a scope.
#[derive(Debug, Clone)]
pub enum Symbol {
    Variable { name: String, unique_name: String, data_type: Type, is_const: bool, initialized: bool, loc: SourceLocation },
    Parameter(ParameterSymbol),
    Function(FunctionSymbol),
    Class(ClassSymbol),
    Builtin { name: String, signature: Type },
}

impl Symbol {
    /// The symbol's declared name.
    pub fn name(&self) -> &str {
        match self {
            Symbol::Variable { name, .. } => name,
            Symbol::Parameter(param) => &param.name,
            Symbol::Function(func) => &func.name,
            Symbol::Class(class) => &class.name,
            Symbol::Builtin { name, .. } => name,
        }
    }

    /// The symbol's type when referenced in an expression.
    pub fn value_type(&self) -> Type {
        match self {
            Symbol::Variable { data_type, .. } => data_type.clone(),
            Symbol::Parameter(param) => param.data_type.clone(),
            Symbol::Function(func) => func.signature(),
            Symbol::Class(class) => Type::Class(class.name.clone()),
            Symbol::Builtin { signature, .. } => signature.clone(),
        }
    }

    /// The source location of the symbol's declaration.
    pub fn loc(&self) -> SourceLocation {
        match self {
            Symbol::Variable { loc, .. } => *loc,
            Symbol::Parameter(param) => param.loc,
            Symbol::Function(func) => func.loc,
            Symbol::Class(class) => class.loc,
            Symbol::Builtin { .. } => SourceLocation::none(),
        }
    }
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    symbols: HashMap<String, Symbol>,
    parent: Option<usize>,
    owner: Option<String>,          // Function or class name for Function/Class scopes.
    expected_return: Option<Type>,  // Function scopes only.
}

/// The Symbol Table: a stack of lexical scopes over an arena that outlives the stack.
///
/// Scopes are pushed during checking and popped on exit, but their frames stay in the arena so the
/// TAC generator can resolve classes and functions after analysis has finished. Class symbols are
/// additionally registered in a flat, name-keyed registry that backs nominal member lookups.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    stack: Vec<usize>,
    classes: HashMap<String, ClassSymbol>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Creates a new symbol table holding only the global scope and the `print` builtin.
    pub fn new() -> Self {
        let global = Scope {
            kind: ScopeKind::Global,
            symbols: HashMap::new(),
            parent: None,
            owner: None,
            expected_return: Some(Type::Void), // Top-level statements form the void entry function.
        };

        let mut table = Self { scopes: vec![global], stack: vec![0], classes: HashMap::new() };

        let print_signature = Type::Function { params: vec![Type::Null], return_type: Box::new(Type::Void) };
        let _ = table.declare(Symbol::Builtin { name: "print".to_string(), signature: print_signature });

        table
    }

    /// Pushes a new scope of the given kind onto the stack.
    pub fn push(&mut self, kind: ScopeKind) {
        self.push_scope(kind, None, None);
    }

    /// Pushes a function scope recording the function's name and expected return type.
    pub fn push_function(&mut self, name: &str, expected_return: Type) {
        self.push_scope(ScopeKind::Function, Some(name.to_string()), Some(expected_return));
    }

    /// Pushes a class scope recording the class name.
    pub fn push_class(&mut self, name: &str) {
        self.push_scope(ScopeKind::Class, Some(name.to_string()), None);
    }

    fn push_scope(&mut self, kind: ScopeKind, owner: Option<String>, expected_return: Option<Type>) {
        let parent = self.stack.last().copied();
        self.scopes.push(Scope { kind, symbols: HashMap::new(), parent, owner, expected_return });
        self.stack.push(self.scopes.len() - 1);
    }

    /// Pops the current scope. The frame stays in the arena for later resolution.
    pub fn pop(&mut self) {
        debug_assert!(self.stack.len() > 1, "Cannot pop the global scope");
        self.stack.pop();
    }

    /// Declares a symbol in the current scope.
    ///
    /// Returns `Ok` if the symbol was added, or `Err(&Symbol)` with the existing symbol if the name is
    /// already bound in the current scope.
    pub fn declare(&mut self, symbol: Symbol) -> Result<(), &Symbol> {
        if let Symbol::Class(class) = &symbol {
            self.classes.entry(class.name.clone()).or_insert_with(|| class.clone());
        }

        let scope_index = *self.stack.last().expect("Scope stack is never empty");
        let scope = &mut self.scopes[scope_index];

        let name = symbol.name().to_string();
        if scope.symbols.contains_key(&name) {
            return Err(&self.scopes[scope_index].symbols[&name]);
        }

        scope.symbols.insert(name, symbol);
        Ok(())
    }

    /// Returns the binding for `name`, walking outward from the current scope.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        let mut scope_index = self.stack.last().copied();
        while let Some(index) = scope_index {
            let scope = &self.scopes[index];
            if let Some(symbol) = scope.symbols.get(name) {
                return Some(symbol);
            }
            scope_index = scope.parent;
        }
        None
    }

    /// Returns the binding for `name` in the current scope only.
    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        let scope_index = *self.stack.last().expect("Scope stack is never empty");
        self.scopes[scope_index].symbols.get(name)
    }

    /// The name of the nearest enclosing function scope, if any.
    pub fn current_function(&self) -> Option<&str> {
        self.walk_for(ScopeKind::Function).and_then(|scope| scope.owner.as_deref())
    }

    /// The name of the nearest enclosing class scope, if any.
    pub fn current_class(&self) -> Option<&str> {
        self.walk_for(ScopeKind::Class).and_then(|scope| scope.owner.as_deref())
    }

    /// The expected return type at the current position. Top-level code returns `void`.
    pub fn current_expected_return(&self) -> &Type {
        self.walk_with(|scope| scope.expected_return.as_ref()).expect("Global scope records a return type")
    }

    fn walk_for(&self, kind: ScopeKind) -> Option<&Scope> {
        self.walk_with(|scope| if scope.kind == kind { Some(scope) } else { None })
    }

    fn walk_with<'a, T>(&'a self, mut select: impl FnMut(&'a Scope) -> Option<T>) -> Option<T> {
        let mut scope_index = self.stack.last().copied();
        while let Some(index) = scope_index {
            let scope = &self.scopes[index];
            if let Some(found) = select(scope) {
                return Some(found);
            }
            scope_index = scope.parent;
        }
        None
    }

    /// The registered class named `name`.
    pub fn class(&self, name: &str) -> Option<&ClassSymbol> {
        self.classes.get(name)
    }

    /// Resolves field `field` on class `class`, walking the parent chain. Returns the field's type.
    pub fn resolve_field(&self, class: &str, field: &str) -> Option<&Type> {
        self.walk_class_chain(class, |c| c.own_field(field))
    }

    /// Resolves method `method` on class `class`, walking the parent chain.
    ///
    /// Returns the name of the class that defines the method together with the method symbol, so call
    /// sites can name the defining class.
    pub fn resolve_method(&self, class: &str, method: &str) -> Option<(&str, &FunctionSymbol)> {
        self.walk_class_chain(class, |c| c.own_method(method).map(|m| (c.name.as_str(), m)))
    }

    fn walk_class_chain<'a, T>(&'a self, class: &str, mut select: impl FnMut(&'a ClassSymbol) -> Option<T>) -> Option<T> {
        let mut seen: Vec<&str> = Vec::new();
        let mut current = self.classes.get(class);
        while let Some(symbol) = current {
            if let Some(found) = select(symbol) {
                return Some(found);
            }
            if seen.contains(&symbol.name.as_str()) {
                return None; // Cyclic parent chain; diagnosed during checking.
            }
            seen.push(&symbol.name);
            current = symbol.parent.as_deref().and_then(|p| self.classes.get(p));
        }
        None
    }
}

impl ClassHierarchy for SymbolTable {
    fn parent_of(&self, class: &str) -> Option<&str> {
        self.classes.get(class).and_then(|c| c.parent.as_deref())
    }
}
