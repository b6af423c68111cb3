// Copyright 2025-2026 Neil Henderson
//
//! The `expr` module defines the expression typing rules of the semantic checker.

use crate::compiler_driver::{DiagnosticCode, Driver};
use crate::core::SourceLocation;
use crate::parser::{AstBinaryOp, AstExpression, AstLiteral, AstUnaryOp};

use super::checker::SemanticChecker;
use super::symbol_table::Symbol;
use super::types::{self, Type};

impl SemanticChecker {
    /// Computes the type of an expression, records it in the node-type table, and returns it.
    ///
    /// Every rule is total: on a violation a diagnostic is emitted and a recovery type is returned
    /// so checking continues.
    pub(super) fn check_expression(&mut self, expr: &AstExpression, driver: &mut Driver) -> Type {
        let expr_type = self.expression_type(expr, driver);
        self.node_types.insert(expr.id(), expr_type.clone());
        expr_type
    }

    fn expression_type(&mut self, expr: &AstExpression, driver: &mut Driver) -> Type {
        match expr {
            AstExpression::Literal { value, .. } => match value {
                AstLiteral::Int(_) => Type::Int,
                AstLiteral::Float(_) => Type::Float,
                AstLiteral::Str(_) => Type::String,
                AstLiteral::Bool(_) => Type::Bool,
                AstLiteral::Null => Type::Null,
            },

            AstExpression::Identifier { node_id, name, loc } => match self.symbols.lookup(name) {
                Some(symbol) => {
                    let resolved = match symbol {
                        Symbol::Variable { unique_name, .. } => Some(unique_name.clone()),
                        Symbol::Parameter(param) => Some(param.name.clone()),
                        _ => None,
                    };
                    let value_type = symbol.value_type();
                    if let Some(unique_name) = resolved {
                        self.resolved_names.insert(*node_id, unique_name);
                    }
                    value_type
                }
                None => {
                    self.error(driver, DiagnosticCode::UnknownSymbol, format!("'{name}' is not declared"), *loc);
                    Type::Null
                }
            },

            AstExpression::This { loc, .. } => match self.symbols.current_class() {
                Some(class) => Type::Class(class.to_string()),
                None => {
                    self.error(
                        driver,
                        DiagnosticCode::UnknownSymbol,
                        "'this' is only valid inside a method".to_string(),
                        *loc,
                    );
                    Type::Null
                }
            },

            AstExpression::Unary { op, operand, .. } => {
                let operand_type = self.check_expression(operand, driver);
                match op {
                    AstUnaryOp::Negate => {
                        if operand_type.is_numeric() {
                            operand_type
                        } else {
                            self.error(
                                driver,
                                DiagnosticCode::NotNumeric,
                                format!("unary '-' requires a numeric operand, found {operand_type}"),
                                operand.loc(),
                            );
                            Type::Int
                        }
                    }
                    AstUnaryOp::LogicalNot => {
                        if operand_type != Type::Bool {
                            self.error(
                                driver,
                                DiagnosticCode::NotBoolean,
                                format!("unary '!' requires a boolean operand, found {operand_type}"),
                                operand.loc(),
                            );
                        }
                        Type::Bool
                    }
                }
            }

            AstExpression::Binary { op, lhs, rhs, loc, .. } => self.binary_type(*op, lhs, rhs, *loc, driver),

            AstExpression::Ternary { condition, then_value, else_value, loc, .. } => {
                let condition_type = self.check_expression(condition, driver);
                if condition_type != Type::Bool {
                    self.error(
                        driver,
                        DiagnosticCode::NotBoolean,
                        format!("the ternary condition must be boolean, found {condition_type}"),
                        condition.loc(),
                    );
                }

                let then_type = self.check_expression(then_value, driver);
                let else_type = self.check_expression(else_value, driver);

                match types::join(&then_type, &else_type, &self.symbols) {
                    Some(joined) => joined,
                    None => {
                        self.error(
                            driver,
                            DiagnosticCode::TypeMismatch,
                            format!("ternary branches have incompatible types {then_type} and {else_type}"),
                            *loc,
                        );
                        then_type
                    }
                }
            }

            AstExpression::Call { callee, args, loc, .. } => self.call_type(callee, args, *loc, driver),

            AstExpression::Member { object, member, loc, .. } => {
                let object_type = self.check_expression(object, driver);
                match object_type {
                    Type::Class(class_name) => {
                        if let Some(field_type) = self.symbols.resolve_field(&class_name, member) {
                            field_type.clone()
                        } else if self.symbols.resolve_method(&class_name, member).is_some() {
                            // The IR has no closure values, so a method reference only makes sense
                            // as the callee of a call.
                            self.error(
                                driver,
                                DiagnosticCode::TypeMismatch,
                                format!("method '{member}' must be called"),
                                *loc,
                            );
                            Type::Null
                        } else {
                            self.error(
                                driver,
                                DiagnosticCode::UnknownMember,
                                format!("class '{class_name}' has no member '{member}'"),
                                *loc,
                            );
                            Type::Null
                        }
                    }
                    other => {
                        self.error(
                            driver,
                            DiagnosticCode::TypeMismatch,
                            format!("member access on non-class type {other}"),
                            object.loc(),
                        );
                        Type::Null
                    }
                }
            }

            AstExpression::Index { array, index, .. } => {
                let array_type = self.check_expression(array, driver);
                let index_type = self.check_expression(index, driver);

                if index_type != Type::Int {
                    self.error(
                        driver,
                        DiagnosticCode::TypeMismatch,
                        format!("array index must be integer, found {index_type}"),
                        index.loc(),
                    );
                }

                match array_type {
                    Type::Array(element_type) => *element_type,
                    other => {
                        self.error(
                            driver,
                            DiagnosticCode::TypeMismatch,
                            format!("cannot index into {other}"),
                            array.loc(),
                        );
                        Type::Null
                    }
                }
            }

            AstExpression::New { class_name, args, loc, .. } => self.new_type(class_name, args, *loc, driver),

            AstExpression::ArrayLiteral { elements, .. } => {
                let Some(first) = elements.first() else {
                    return Type::Array(Box::new(Type::Null)); // Empty literal; storable into any array.
                };

                let first_type = self.check_expression(first, driver);
                for element in &elements[1..] {
                    let element_type = self.check_expression(element, driver);
                    if element_type != first_type {
                        self.error(
                            driver,
                            DiagnosticCode::TypeMismatch,
                            format!("array literal has mixed element types {first_type} and {element_type}"),
                            element.loc(),
                        );
                    }
                }

                Type::Array(Box::new(first_type))
            }
        }
    }

    fn binary_type(
        &mut self,
        op: AstBinaryOp,
        lhs: &AstExpression,
        rhs: &AstExpression,
        loc: SourceLocation,
        driver: &mut Driver,
    ) -> Type {
        if matches!(op, AstBinaryOp::LogicalAnd | AstBinaryOp::LogicalOr) {
            for operand in [lhs, rhs] {
                let operand_type = self.check_expression(operand, driver);
                if operand_type != Type::Bool {
                    self.error(
                        driver,
                        DiagnosticCode::NotBoolean,
                        format!("operator '{op}' requires boolean operands, found {operand_type}"),
                        operand.loc(),
                    );
                }
            }
            return Type::Bool;
        }

        let lhs_type = self.check_expression(lhs, driver);
        let rhs_type = self.check_expression(rhs, driver);

        if op.is_arithmetic() {
            // `+` doubles as string concatenation; the conversion of the other side to a string is
            // the backend's concern.
            if op == AstBinaryOp::Add && (lhs_type == Type::String || rhs_type == Type::String) {
                if !lhs_type.is_primitive() || !rhs_type.is_primitive() {
                    self.error(
                        driver,
                        DiagnosticCode::TypeMismatch,
                        format!("operator '+' cannot concatenate {lhs_type} and {rhs_type}"),
                        loc,
                    );
                }
                return Type::String;
            }

            return match types::promote_numeric(&lhs_type, &rhs_type) {
                Some(promoted) => promoted,
                None => {
                    self.error(
                        driver,
                        DiagnosticCode::NotNumeric,
                        format!("operator '{op}' requires numeric operands, found {lhs_type} and {rhs_type}"),
                        loc,
                    );
                    if lhs_type == Type::Float || rhs_type == Type::Float { Type::Float } else { Type::Int }
                }
            };
        }

        if op.is_relational() {
            if types::unify_relational(&lhs_type, &rhs_type).is_none() {
                self.error(
                    driver,
                    DiagnosticCode::NotComparable,
                    format!("operator '{op}' cannot compare {lhs_type} and {rhs_type}"),
                    loc,
                );
            }
            return Type::Bool;
        }

        debug_assert!(op.is_equality());
        if !types::equality_compatible(&lhs_type, &rhs_type, &self.symbols) {
            self.error(
                driver,
                DiagnosticCode::TypeMismatch,
                format!("operator '{op}' cannot compare {lhs_type} and {rhs_type}"),
                loc,
            );
        }
        Type::Bool
    }

    fn call_type(
        &mut self,
        callee: &AstExpression,
        args: &[AstExpression],
        loc: SourceLocation,
        driver: &mut Driver,
    ) -> Type {
        match callee {
            AstExpression::Identifier { node_id, name, loc: callee_loc } => {
                match self.symbols.lookup(name) {
                    Some(Symbol::Function(function)) => {
                        let function = function.clone();
                        self.node_types.insert(callee.id(), function.signature());
                        let params: Vec<Type> = function.params.iter().map(|p| p.data_type.clone()).collect();
                        self.check_call_args(&format!("function '{name}'"), &params, args, loc, driver);
                        function.return_type
                    }

                    Some(Symbol::Builtin { .. }) => {
                        if args.len() != 1 {
                            self.error(
                                driver,
                                DiagnosticCode::ArityMismatch,
                                format!("'{name}' expects 1 argument, found {}", args.len()),
                                loc,
                            );
                        }
                        for arg in args {
                            self.check_expression(arg, driver); // Any type is printable.
                        }
                        Type::Void
                    }

                    Some(symbol) => {
                        let value_type = symbol.value_type();
                        let resolved = match symbol {
                            Symbol::Variable { unique_name, .. } => Some(unique_name.clone()),
                            Symbol::Parameter(param) => Some(param.name.clone()),
                            _ => None,
                        };
                        if let Some(unique_name) = resolved {
                            self.resolved_names.insert(*node_id, unique_name);
                        }
                        self.node_types.insert(callee.id(), value_type.clone());

                        match value_type {
                            Type::Function { params, return_type } => {
                                self.check_call_args(&format!("'{name}'"), &params, args, loc, driver);
                                *return_type
                            }
                            other => {
                                self.error(
                                    driver,
                                    DiagnosticCode::TypeMismatch,
                                    format!("'{name}' of type {other} is not callable"),
                                    *callee_loc,
                                );
                                self.check_args_only(args, driver);
                                Type::Null
                            }
                        }
                    }

                    None => {
                        self.error(
                            driver,
                            DiagnosticCode::UnknownSymbol,
                            format!("'{name}' is not declared"),
                            *callee_loc,
                        );
                        self.check_args_only(args, driver);
                        Type::Null
                    }
                }
            }

            AstExpression::Member { object, member, loc: callee_loc, .. } => {
                let object_type = self.check_expression(object, driver);
                match object_type {
                    Type::Class(class_name) => match self.symbols.resolve_method(&class_name, member) {
                        Some((_, method)) => {
                            let method = method.clone();
                            let params: Vec<Type> = method.params.iter().map(|p| p.data_type.clone()).collect();
                            self.check_call_args(&format!("method '{class_name}.{member}'"), &params, args, loc, driver);
                            method.return_type
                        }
                        None => {
                            self.error(
                                driver,
                                DiagnosticCode::UnknownMember,
                                format!("class '{class_name}' has no method '{member}'"),
                                *callee_loc,
                            );
                            self.check_args_only(args, driver);
                            Type::Null
                        }
                    },
                    other => {
                        self.error(
                            driver,
                            DiagnosticCode::TypeMismatch,
                            format!("method call on non-class type {other}"),
                            object.loc(),
                        );
                        self.check_args_only(args, driver);
                        Type::Null
                    }
                }
            }

            other => {
                let callee_type = self.check_expression(other, driver);
                match callee_type {
                    Type::Function { params, return_type } => {
                        self.check_call_args("the callee", &params, args, loc, driver);
                        *return_type
                    }
                    _ => {
                        self.error(
                            driver,
                            DiagnosticCode::TypeMismatch,
                            format!("expression of type {callee_type} is not callable"),
                            other.loc(),
                        );
                        self.check_args_only(args, driver);
                        Type::Null
                    }
                }
            }
        }
    }

    fn new_type(&mut self, class_name: &str, args: &[AstExpression], loc: SourceLocation, driver: &mut Driver) -> Type {
        match self.symbols.lookup(class_name) {
            Some(Symbol::Class(_)) => {}
            Some(_) => {
                self.error(driver, DiagnosticCode::TypeMismatch, format!("'{class_name}' is not a class"), loc)
            }
            None => self.error(
                driver,
                DiagnosticCode::UnknownSymbol,
                format!("class '{class_name}' is not declared"),
                loc,
            ),
        }

        let arg_types: Vec<Type> = args.iter().map(|arg| self.check_expression(arg, driver)).collect();

        match self.symbols.resolve_method(class_name, "constructor") {
            Some((_, constructor)) => {
                let params: Vec<Type> = constructor.params.iter().map(|p| p.data_type.clone()).collect();

                if params.len() != arg_types.len() {
                    self.error(
                        driver,
                        DiagnosticCode::BadConstructor,
                        format!(
                            "constructor of class '{class_name}' expects {} argument(s), found {}",
                            params.len(),
                            arg_types.len()
                        ),
                        loc,
                    );
                } else {
                    for (index, (arg_type, param)) in arg_types.iter().zip(&params).enumerate() {
                        if !types::assignable(arg_type, param, &self.symbols) {
                            self.error(
                                driver,
                                DiagnosticCode::BadConstructor,
                                format!(
                                    "constructor argument {} of class '{class_name}': cannot pass {arg_type} as {param}",
                                    index + 1
                                ),
                                args[index].loc(),
                            );
                        }
                    }
                }
            }
            None => {
                // No declared or inherited constructor: the class is default-constructible.
                if !args.is_empty() {
                    self.error(
                        driver,
                        DiagnosticCode::BadConstructor,
                        format!("class '{class_name}' has no constructor but was given {} argument(s)", args.len()),
                        loc,
                    );
                }
            }
        }

        Type::Class(class_name.to_string())
    }

    fn check_call_args(
        &mut self,
        what: &str,
        params: &[Type],
        args: &[AstExpression],
        loc: SourceLocation,
        driver: &mut Driver,
    ) {
        if params.len() != args.len() {
            self.error(
                driver,
                DiagnosticCode::ArityMismatch,
                format!("{what} expects {} argument(s), found {}", params.len(), args.len()),
                loc,
            );
            self.check_args_only(args, driver);
            return;
        }

        for (index, (arg, param)) in args.iter().zip(params).enumerate() {
            let arg_type = self.check_expression(arg, driver);
            if !types::assignable(&arg_type, param, &self.symbols) {
                self.error(
                    driver,
                    DiagnosticCode::TypeMismatch,
                    format!("argument {} of {what}: cannot pass {arg_type} as {param}", index + 1),
                    arg.loc(),
                );
            }
        }
    }

    fn check_args_only(&mut self, args: &[AstExpression], driver: &mut Driver) {
        for arg in args {
            self.check_expression(arg, driver);
        }
    }
}
