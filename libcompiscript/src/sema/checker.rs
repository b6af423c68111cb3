// Copyright 2025-2026 Neil Henderson
//
//! The `checker` module defines [SemanticChecker], which walks the parse tree and validates
//! declarations and statements.

use std::collections::HashMap;

use crate::compiler_driver::{Diagnostic, DiagnosticCode, Driver};
use crate::core::SourceLocation;
use crate::parser::{
    AstBlock, AstClassDeclaration, AstClassMember, AstExpression, AstFunctionDeclaration, AstNodeId, AstProgram,
    AstStatement, AstSwitchCase, AstTypeName, AstVariableDeclaration,
};

use super::Analysis;
use super::return_paths;
use super::symbol_table::{ClassSymbol, FunctionSymbol, ParameterSymbol, ScopeKind, Symbol, SymbolTable};
use super::types::{self, Type};

/// One entry of the loop/switch stack. A `switch` pushes a frame that `break` may target but
/// `continue` must skip.
pub(super) struct LoopFrame {
    pub(super) allows_continue: bool,
}

/// The semantic checker walks the parse tree, maintains the scoped symbol table, computes types, and
/// emits diagnostics. It never aborts: every error is recorded and checking continues with a
/// recovery type.
pub struct SemanticChecker {
    pub(super) symbols: SymbolTable,
    pub(super) node_types: HashMap<AstNodeId, Type>,
    pub(super) resolved_names: HashMap<AstNodeId, String>,
    pub(super) loop_stack: Vec<LoopFrame>,

    // One map per enclosing function (the global entry included): how many bindings of each declared
    // name exist so far, used to mint unique storage names for shadowing declarations.
    name_counters: Vec<HashMap<String, usize>>,
}

impl Default for SemanticChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticChecker {
    /// Creates a new semantic checker.
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            node_types: HashMap::new(),
            resolved_names: HashMap::new(),
            loop_stack: Vec::new(),
            name_counters: vec![HashMap::new()],
        }
    }

    /// Consumes the checker and returns the analysis result for the TAC generator.
    pub fn into_analysis(self) -> Analysis {
        Analysis { symbols: self.symbols, node_types: self.node_types, resolved_names: self.resolved_names }
    }

    /// Checks a whole program: a declaration pass over the top-level statements, then a body pass in
    /// source order.
    pub fn check_program(&mut self, program: &AstProgram, driver: &mut Driver) {
        self.collect_declarations(&program.0, driver);

        for stmt in &program.0 {
            self.check_statement(stmt, driver);
        }
    }

    pub(super) fn error(&self, driver: &mut Driver, code: DiagnosticCode, message: String, loc: SourceLocation) {
        driver.add_diagnostic(Diagnostic::error(code, message, loc));
    }

    // ---------------------------------------------------------------------------------------------
    // Declaration pass
    // ---------------------------------------------------------------------------------------------

    /// Collects the function and class declarations of one scope so that forward references and
    /// mutual recursion resolve. Classes are collected first so function signatures can name them.
    /// Variable declarations are not hoisted.
    fn collect_declarations(&mut self, stmts: &[AstStatement], driver: &mut Driver) {
        for stmt in stmts {
            if let AstStatement::ClassDecl(decl) = stmt {
                self.collect_class(decl, driver);
            }
        }

        for stmt in stmts {
            if let AstStatement::FuncDecl(decl) = stmt {
                let symbol = self.build_function_symbol(decl, None);
                self.declare(Symbol::Function(symbol), driver, decl.loc);
            }
        }
    }

    fn collect_class(&mut self, decl: &AstClassDeclaration, driver: &mut Driver) {
        let mut fields: Vec<(String, Type)> = Vec::new();
        let mut methods: HashMap<String, FunctionSymbol> = HashMap::new();

        for member in &decl.members {
            match member {
                AstClassMember::Field(field) => {
                    let duplicate = fields.iter().any(|(name, _)| name == &field.name) || methods.contains_key(&field.name);
                    if duplicate {
                        self.error(
                            driver,
                            DiagnosticCode::DuplicateSymbol,
                            format!("duplicate member '{}' in class '{}'", field.name, decl.name),
                            field.loc,
                        );
                        continue;
                    }

                    fields.push((field.name.clone(), self.resolve_type_name(&field.declared_type)));
                }

                AstClassMember::Method(method) => {
                    let duplicate =
                        fields.iter().any(|(name, _)| name == &method.name) || methods.contains_key(&method.name);
                    if duplicate {
                        self.error(
                            driver,
                            DiagnosticCode::DuplicateSymbol,
                            format!("duplicate member '{}' in class '{}'", method.name, decl.name),
                            method.loc,
                        );
                        continue;
                    }

                    methods.insert(method.name.clone(), self.build_function_symbol(method, Some(&decl.name)));
                }
            }
        }

        let symbol = ClassSymbol { name: decl.name.clone(), parent: decl.parent.clone(), fields, methods, loc: decl.loc };
        self.declare(Symbol::Class(symbol), driver, decl.loc);
    }

    fn build_function_symbol(&self, decl: &AstFunctionDeclaration, enclosing_class: Option<&str>) -> FunctionSymbol {
        let params = decl
            .params
            .iter()
            .enumerate()
            .map(|(slot, param)| ParameterSymbol {
                name: param.name.clone(),
                data_type: self.resolve_type_name(&param.declared_type),
                slot,
                loc: param.loc,
            })
            .collect();

        // A constructor never returns a value, whatever the declaration says; the declaration-site
        // check rejects an explicit return type.
        let return_type = if decl.name == "constructor" {
            Type::Void
        } else {
            decl.return_type.as_ref().map_or(Type::Void, |t| self.resolve_type_name(t))
        };

        FunctionSymbol {
            name: decl.name.clone(),
            params,
            return_type,
            enclosing_class: enclosing_class.map(str::to_string),
            loc: decl.loc,
        }
    }

    fn declare(&mut self, symbol: Symbol, driver: &mut Driver, loc: SourceLocation) {
        let name = symbol.name().to_string();
        if self.symbols.declare(symbol).is_err() {
            self.error(driver, DiagnosticCode::DuplicateSymbol, format!("redeclaration of '{name}'"), loc);
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Type name resolution
    // ---------------------------------------------------------------------------------------------

    /// Resolves a declared type without diagnostics. Unknown names resolve nominally to a class
    /// type, so signatures collected during the declaration pass may reference classes declared
    /// later in the same scope.
    pub(super) fn resolve_type_name(&self, type_name: &AstTypeName) -> Type {
        match type_name {
            AstTypeName::Named(name) => match name.as_str() {
                "integer" => Type::Int,
                "float" => Type::Float,
                "boolean" => Type::Bool,
                "string" => Type::String,
                "void" => Type::Void,
                class_name => Type::Class(class_name.to_string()),
            },
            AstTypeName::Array(elem) => Type::Array(Box::new(self.resolve_type_name(elem))),
        }
    }

    /// Resolves a declared type and diagnoses class names that never resolve to a class.
    fn validate_type_name(&mut self, type_name: &AstTypeName, loc: SourceLocation, driver: &mut Driver) -> Type {
        let resolved = self.resolve_type_name(type_name);

        let mut named = &resolved;
        while let Type::Array(elem) = named {
            named = elem;
        }

        if let Type::Class(class_name) = named
            && self.symbols.class(class_name).is_none()
        {
            self.error(driver, DiagnosticCode::UnknownSymbol, format!("unknown type '{class_name}'"), loc);
        }

        resolved
    }

    // ---------------------------------------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------------------------------------

    pub(super) fn check_statement(&mut self, stmt: &AstStatement, driver: &mut Driver) {
        match stmt {
            AstStatement::VarDecl(decl) => self.check_var_decl(decl, driver),
            AstStatement::FuncDecl(decl) => self.check_function_body(decl, driver),
            AstStatement::ClassDecl(decl) => self.check_class_body(decl, driver),

            AstStatement::Expression(expr) => {
                self.check_expression(expr, driver);
            }

            AstStatement::Print { arg, .. } => {
                // `print` accepts a value of any type.
                self.check_expression(arg, driver);
            }

            AstStatement::Block(block) => self.check_block(block, driver),

            AstStatement::If { condition, then_block, else_block, .. } => {
                self.check_condition(condition, "if", driver);
                self.check_block(then_block, driver);
                if let Some(else_block) = else_block {
                    self.check_block(else_block, driver);
                }
            }

            AstStatement::While { condition, body, .. } => {
                self.check_condition(condition, "while", driver);
                self.loop_stack.push(LoopFrame { allows_continue: true });
                self.check_block(body, driver);
                self.loop_stack.pop();
            }

            AstStatement::DoWhile { body, condition, .. } => {
                self.loop_stack.push(LoopFrame { allows_continue: true });
                self.check_block(body, driver);
                self.loop_stack.pop();
                self.check_condition(condition, "do-while", driver);
            }

            AstStatement::For { init, condition, step, body, .. } => {
                // The loop variable lives in a fresh scope enclosing the body.
                self.symbols.push(ScopeKind::Block);
                if let Some(init) = init {
                    self.check_statement(init, driver);
                }
                if let Some(condition) = condition {
                    self.check_condition(condition, "for", driver);
                }
                if let Some(step) = step {
                    self.check_statement(step, driver);
                }
                self.loop_stack.push(LoopFrame { allows_continue: true });
                self.check_block(body, driver);
                self.loop_stack.pop();
                self.symbols.pop();
            }

            AstStatement::Foreach { node_id, binding, iterable, body, loc } => {
                self.check_foreach(*node_id, binding, iterable, body, *loc, driver)
            }

            AstStatement::Switch { scrutinee, cases, default, .. } => {
                self.check_switch(scrutinee, cases, default.as_deref(), driver)
            }

            AstStatement::Break { loc } => {
                if self.loop_stack.is_empty() {
                    self.error(
                        driver,
                        DiagnosticCode::UnboundBreakContinue,
                        "'break' outside of a loop or switch".to_string(),
                        *loc,
                    );
                }
            }

            AstStatement::Continue { loc } => {
                if !self.loop_stack.iter().any(|frame| frame.allows_continue) {
                    self.error(
                        driver,
                        DiagnosticCode::UnboundBreakContinue,
                        "'continue' outside of a loop".to_string(),
                        *loc,
                    );
                }
            }

            AstStatement::Return { value, loc } => self.check_return(value.as_ref(), *loc, driver),

            AstStatement::Assign { target, value, loc } => self.check_assignment(target, value, *loc, driver),
        }
    }

    fn check_block(&mut self, block: &AstBlock, driver: &mut Driver) {
        self.symbols.push(ScopeKind::Block);
        self.collect_declarations(&block.0, driver);
        for stmt in &block.0 {
            self.check_statement(stmt, driver);
        }
        self.symbols.pop();
    }

    fn check_condition(&mut self, condition: &AstExpression, what: &str, driver: &mut Driver) {
        let cond_type = self.check_expression(condition, driver);
        if cond_type != Type::Bool {
            self.error(
                driver,
                DiagnosticCode::NotBoolean,
                format!("the {what} condition must be boolean, found {cond_type}"),
                condition.loc(),
            );
        }
    }

    fn check_var_decl(&mut self, decl: &AstVariableDeclaration, driver: &mut Driver) {
        let declared = decl.declared_type.as_ref().map(|t| self.validate_type_name(t, decl.loc, driver));
        let init_type = decl.initializer.as_ref().map(|e| self.check_expression(e, driver));

        if decl.is_const && decl.initializer.is_none() {
            self.error(
                driver,
                DiagnosticCode::TypeMismatch,
                format!("const '{}' requires an initializer", decl.name),
                decl.loc,
            );
        }

        if let (Some(declared), Some(init_type)) = (&declared, &init_type)
            && !types::assignable(init_type, declared, &self.symbols)
        {
            self.error(
                driver,
                DiagnosticCode::TypeMismatch,
                format!("cannot assign {init_type} to {declared}"),
                decl.initializer.as_ref().map_or(decl.loc, AstExpression::loc),
            );
        }

        let var_type = declared.or(init_type).unwrap_or(Type::Int);

        let unique_name = self.unique_name_for(&decl.name);
        self.resolved_names.insert(decl.node_id, unique_name.clone());
        self.node_types.insert(decl.node_id, var_type.clone());

        self.declare(
            Symbol::Variable {
                name: decl.name.clone(),
                unique_name,
                data_type: var_type,
                is_const: decl.is_const,
                initialized: decl.initializer.is_some(),
                loc: decl.loc,
            },
            driver,
            decl.loc,
        );
    }

    /// Mints a storage name for a new binding: the declared name for the first binding in the
    /// enclosing function, suffixed (`x.1`, `x.2`, ...) for shadowing re-bindings.
    fn unique_name_for(&mut self, name: &str) -> String {
        let counters = self.name_counters.last_mut().expect("There is always a function-level counter map");
        let count = counters.entry(name.to_string()).or_insert(0);
        let unique = if *count == 0 { name.to_string() } else { format!("{name}.{count}") };
        *count += 1;
        unique
    }

    fn check_function_body(&mut self, decl: &AstFunctionDeclaration, driver: &mut Driver) {
        for param in &decl.params {
            self.validate_type_name(&param.declared_type, param.loc, driver);
        }
        if let Some(return_type) = &decl.return_type {
            self.validate_type_name(return_type, decl.loc, driver);
        }

        // The symbol was declared during the scope's declaration pass; methods resolve through the
        // enclosing class instead.
        let enclosing_class = self.symbols.current_class().map(str::to_string);
        let return_type = match &enclosing_class {
            Some(class) => match self.symbols.resolve_method(class, &decl.name) {
                Some((_, method)) => method.return_type.clone(),
                None => decl.return_type.as_ref().map_or(Type::Void, |t| self.resolve_type_name(t)),
            },
            None => {
                if decl.name == "constructor" {
                    Type::Void
                } else {
                    decl.return_type.as_ref().map_or(Type::Void, |t| self.resolve_type_name(t))
                }
            }
        };

        self.name_counters.push(HashMap::new());
        self.symbols.push_function(&decl.name, return_type.clone());

        for (slot, param) in decl.params.iter().enumerate() {
            let data_type = self.resolve_type_name(&param.declared_type);
            self.unique_name_for(&param.name);
            self.declare(
                Symbol::Parameter(ParameterSymbol { name: param.name.clone(), data_type, slot, loc: param.loc }),
                driver,
                param.loc,
            );
        }

        self.collect_declarations(&decl.body.0, driver);
        for stmt in &decl.body.0 {
            self.check_statement(stmt, driver);
        }

        self.symbols.pop();
        self.name_counters.pop();

        if return_type != Type::Void && !return_paths::block_must_return(&decl.body.0) {
            self.error(
                driver,
                DiagnosticCode::MissingReturn,
                format!("function '{}' does not return a value on every path", decl.name),
                decl.loc,
            );
        }
    }

    fn check_class_body(&mut self, decl: &AstClassDeclaration, driver: &mut Driver) {
        if let Some(parent) = &decl.parent {
            match self.symbols.lookup(parent) {
                Some(Symbol::Class(_)) => self.check_inheritance_cycle(decl, driver),
                Some(_) => self.error(
                    driver,
                    DiagnosticCode::TypeMismatch,
                    format!("'{parent}' is not a class"),
                    decl.loc,
                ),
                None => self.error(
                    driver,
                    DiagnosticCode::UnknownSymbol,
                    format!("unknown parent class '{parent}'"),
                    decl.loc,
                ),
            }
        }

        for member in &decl.members {
            match member {
                AstClassMember::Field(field) => {
                    self.validate_type_name(&field.declared_type, field.loc, driver);
                }
                AstClassMember::Method(method) => self.check_method_declaration(decl, method, driver),
            }
        }

        self.symbols.push_class(&decl.name);
        for member in &decl.members {
            if let AstClassMember::Method(method) = member {
                self.check_function_body(method, driver);
            }
        }
        self.symbols.pop();
    }

    fn check_inheritance_cycle(&mut self, decl: &AstClassDeclaration, driver: &mut Driver) {
        let mut seen: Vec<&str> = vec![&decl.name];
        let mut current = decl.parent.as_deref();

        while let Some(class) = current {
            if class == decl.name {
                self.error(
                    driver,
                    DiagnosticCode::TypeMismatch,
                    format!("cyclic inheritance chain for class '{}'", decl.name),
                    decl.loc,
                );
                return;
            }
            if seen.contains(&class) {
                return; // The cycle is reported on the class that closes it.
            }
            seen.push(class);
            current = self.symbols.class(class).and_then(|c| c.parent.as_deref());
        }
    }

    fn check_method_declaration(&mut self, class: &AstClassDeclaration, method: &AstFunctionDeclaration, driver: &mut Driver) {
        if method.name == "constructor" {
            if let Some(return_type) = &method.return_type
                && *return_type != AstTypeName::Named("void".to_string())
            {
                self.error(
                    driver,
                    DiagnosticCode::TypeMismatch,
                    format!("constructor of class '{}' cannot declare a return type", class.name),
                    method.loc,
                );
            }
            return;
        }

        // Overriding a parent method is permitted when the signatures are compatible.
        let Some(parent) = &class.parent else { return };
        let Some((parent_class, parent_method)) = self.symbols.resolve_method(parent, &method.name) else { return };

        let parent_class = parent_class.to_string();
        let parent_params: Vec<Type> = parent_method.params.iter().map(|p| p.data_type.clone()).collect();
        let parent_return = parent_method.return_type.clone();

        let own_params: Vec<Type> = method.params.iter().map(|p| self.resolve_type_name(&p.declared_type)).collect();
        let own_return = method.return_type.as_ref().map_or(Type::Void, |t| self.resolve_type_name(t));

        let compatible = own_params == parent_params && types::assignable(&own_return, &parent_return, &self.symbols);
        if !compatible {
            self.error(
                driver,
                DiagnosticCode::TypeMismatch,
                format!("method '{}' overrides '{parent_class}.{}' with an incompatible signature", method.name, method.name),
                method.loc,
            );
        }
    }

    fn check_foreach(
        &mut self,
        node_id: AstNodeId,
        binding: &str,
        iterable: &AstExpression,
        body: &AstBlock,
        loc: SourceLocation,
        driver: &mut Driver,
    ) {
        let iterable_type = self.check_expression(iterable, driver);
        let element_type = match iterable_type {
            Type::Array(elem) => *elem,
            other => {
                self.error(
                    driver,
                    DiagnosticCode::TypeMismatch,
                    format!("foreach requires an array, found {other}"),
                    iterable.loc(),
                );
                Type::Int
            }
        };

        self.symbols.push(ScopeKind::Block);

        let unique_name = self.unique_name_for(binding);
        self.resolved_names.insert(node_id, unique_name.clone());
        self.declare(
            Symbol::Variable {
                name: binding.to_string(),
                unique_name,
                data_type: element_type,
                is_const: false,
                initialized: true,
                loc,
            },
            driver,
            loc,
        );

        self.loop_stack.push(LoopFrame { allows_continue: true });
        self.check_block(body, driver);
        self.loop_stack.pop();

        self.symbols.pop();
    }

    fn check_switch(
        &mut self,
        scrutinee: &AstExpression,
        cases: &[AstSwitchCase],
        default: Option<&[AstStatement]>,
        driver: &mut Driver,
    ) {
        let scrutinee_type = self.check_expression(scrutinee, driver);

        // A switch is a valid target for `break` but not for `continue`.
        self.loop_stack.push(LoopFrame { allows_continue: false });

        for case in cases {
            if !case.value.is_literal() {
                self.error(
                    driver,
                    DiagnosticCode::TypeMismatch,
                    "case value must be a compile-time literal".to_string(),
                    case.value.loc(),
                );
            }

            let case_type = self.check_expression(&case.value, driver);
            if !types::equality_compatible(&case_type, &scrutinee_type, &self.symbols) {
                self.error(
                    driver,
                    DiagnosticCode::TypeMismatch,
                    format!("case value of type {case_type} cannot be compared with {scrutinee_type}"),
                    case.value.loc(),
                );
            }

            self.symbols.push(ScopeKind::Block);
            self.collect_declarations(&case.body, driver);
            for stmt in &case.body {
                self.check_statement(stmt, driver);
            }
            self.symbols.pop();
        }

        if let Some(stmts) = default {
            self.symbols.push(ScopeKind::Block);
            self.collect_declarations(stmts, driver);
            for stmt in stmts {
                self.check_statement(stmt, driver);
            }
            self.symbols.pop();
        }

        self.loop_stack.pop();
    }

    fn check_return(&mut self, value: Option<&AstExpression>, loc: SourceLocation, driver: &mut Driver) {
        let expected = self.symbols.current_expected_return().clone();

        match value {
            Some(expr) => {
                let value_type = self.check_expression(expr, driver);
                if expected == Type::Void {
                    self.error(
                        driver,
                        DiagnosticCode::TypeMismatch,
                        format!("cannot return a value of type {value_type} from a void function"),
                        expr.loc(),
                    );
                } else if !types::assignable(&value_type, &expected, &self.symbols) {
                    self.error(
                        driver,
                        DiagnosticCode::TypeMismatch,
                        format!("expected return type {expected}, found {value_type}"),
                        expr.loc(),
                    );
                }
            }
            None => {
                if expected != Type::Void {
                    self.error(
                        driver,
                        DiagnosticCode::TypeMismatch,
                        format!("missing return value of type {expected}"),
                        loc,
                    );
                }
            }
        }
    }

    fn check_assignment(&mut self, target: &AstExpression, value: &AstExpression, loc: SourceLocation, driver: &mut Driver) {
        match target {
            AstExpression::Identifier { node_id, name, loc: target_loc } => {
                enum Target {
                    Missing,
                    NotAssignable,
                    Const,
                    Ok(Type, String),
                }

                let target_info = match self.symbols.lookup(name) {
                    None => Target::Missing,
                    Some(Symbol::Variable { is_const: true, .. }) => Target::Const,
                    Some(Symbol::Variable { data_type, unique_name, .. }) => {
                        Target::Ok(data_type.clone(), unique_name.clone())
                    }
                    Some(Symbol::Parameter(param)) => Target::Ok(param.data_type.clone(), param.name.clone()),
                    Some(_) => Target::NotAssignable,
                };

                match target_info {
                    Target::Missing => {
                        self.error(
                            driver,
                            DiagnosticCode::UnknownSymbol,
                            format!("'{name}' is not declared"),
                            *target_loc,
                        );
                        self.check_expression(value, driver);
                    }
                    Target::Const => {
                        self.error(
                            driver,
                            DiagnosticCode::AssignToConst,
                            format!("cannot assign to const '{name}'"),
                            *target_loc,
                        );
                        self.check_expression(value, driver);
                    }
                    Target::NotAssignable => {
                        self.error(
                            driver,
                            DiagnosticCode::InvalidLValue,
                            format!("'{name}' is not assignable"),
                            *target_loc,
                        );
                        self.check_expression(value, driver);
                    }
                    Target::Ok(target_type, unique_name) => {
                        self.resolved_names.insert(*node_id, unique_name);
                        let value_type = self.check_expression(value, driver);
                        if !types::assignable(&value_type, &target_type, &self.symbols) {
                            self.error(
                                driver,
                                DiagnosticCode::TypeMismatch,
                                format!("cannot assign {value_type} to {target_type}"),
                                value.loc(),
                            );
                        }
                    }
                }
            }

            AstExpression::Member { object, member, loc: target_loc, .. } => {
                let object_type = self.check_expression(object, driver);
                let value_type = self.check_expression(value, driver);

                match object_type {
                    Type::Class(class_name) => match self.symbols.resolve_field(&class_name, member) {
                        Some(field_type) => {
                            let field_type = field_type.clone();
                            if !types::assignable(&value_type, &field_type, &self.symbols) {
                                self.error(
                                    driver,
                                    DiagnosticCode::TypeMismatch,
                                    format!("cannot assign {value_type} to field '{member}' of type {field_type}"),
                                    value.loc(),
                                );
                            }
                        }
                        None => {
                            if self.symbols.resolve_method(&class_name, member).is_some() {
                                self.error(
                                    driver,
                                    DiagnosticCode::InvalidLValue,
                                    format!("cannot assign to method '{member}'"),
                                    *target_loc,
                                );
                            } else {
                                self.error(
                                    driver,
                                    DiagnosticCode::UnknownMember,
                                    format!("class '{class_name}' has no member '{member}'"),
                                    *target_loc,
                                );
                            }
                        }
                    },
                    other => self.error(
                        driver,
                        DiagnosticCode::TypeMismatch,
                        format!("property assignment on non-class type {other}"),
                        *target_loc,
                    ),
                }
            }

            AstExpression::Index { array, index, .. } => {
                let array_type = self.check_expression(array, driver);
                let index_type = self.check_expression(index, driver);
                let value_type = self.check_expression(value, driver);

                if index_type != Type::Int {
                    self.error(
                        driver,
                        DiagnosticCode::TypeMismatch,
                        format!("array index must be integer, found {index_type}"),
                        index.loc(),
                    );
                }

                match array_type {
                    Type::Array(element_type) => {
                        if !types::assignable(&value_type, &element_type, &self.symbols) {
                            self.error(
                                driver,
                                DiagnosticCode::TypeMismatch,
                                format!("cannot store {value_type} into {element_type}[]"),
                                value.loc(),
                            );
                        }
                    }
                    other => self.error(
                        driver,
                        DiagnosticCode::TypeMismatch,
                        format!("cannot index into {other}"),
                        array.loc(),
                    ),
                }
            }

            _ => {
                self.error(driver, DiagnosticCode::InvalidLValue, "expression is not assignable".to_string(), loc);
                self.check_expression(value, driver);
            }
        }
    }
}
