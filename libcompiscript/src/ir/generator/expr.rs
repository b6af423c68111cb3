// Copyright 2025-2026 Neil Henderson
//
//! The `expr` module lowers AST expressions into TAC, including the short-circuit shapes for the
//! logical operators and the ternary operator.

use crate::ICE;
use crate::parser::{AstBinaryOp, AstExpression, AstLiteral, AstUnaryOp};
use crate::sema::types::Type;

use super::super::tac::{TacBinaryOp, TacInstruction, TacLiteral, TacOperand, TacUnaryOp};
use super::{FunctionCx, TacGenerator};

impl TacGenerator<'_> {
    /// Lowers an expression, returning the operand that holds its value.
    ///
    /// Literals and resolved names are returned directly without materialization; compound
    /// expressions evaluate left-to-right into fresh temporaries.
    pub(super) fn lower_expression(&mut self, expr: &AstExpression, cx: &mut FunctionCx) -> TacOperand {
        match expr {
            AstExpression::Literal { value, .. } => TacOperand::Literal(lower_literal(value)),

            AstExpression::Identifier { node_id, name, .. } => {
                match self.analysis.resolved_names.get(node_id) {
                    Some(local) => TacOperand::Local(local.clone()),
                    // Not a variable: a free function (or class) referenced as a value.
                    None => TacOperand::Global(name.clone()),
                }
            }

            AstExpression::This { .. } => TacOperand::Local("this".to_string()),

            AstExpression::Unary { op, operand, .. } => {
                let a = self.lower_expression(operand, cx);
                let dst = cx.emitter.new_temp();
                let op = match op {
                    AstUnaryOp::Negate => TacUnaryOp::Negate,
                    AstUnaryOp::LogicalNot => TacUnaryOp::LogicalNot,
                };
                cx.emitter.emit(TacInstruction::Unary { op, a, dst: dst.clone() });
                dst
            }

            AstExpression::Binary { op: AstBinaryOp::LogicalAnd, lhs, rhs, .. } => {
                self.lower_logical_and(lhs, rhs, cx)
            }
            AstExpression::Binary { op: AstBinaryOp::LogicalOr, lhs, rhs, .. } => {
                self.lower_logical_or(lhs, rhs, cx)
            }

            AstExpression::Binary { op, lhs, rhs, .. } => {
                let a = self.lower_expression(lhs, cx);
                let b = self.lower_expression(rhs, cx);
                let dst = cx.emitter.new_temp();
                cx.emitter.emit(TacInstruction::Binary { op: lower_binary_op(*op), a, b, dst: dst.clone() });
                dst
            }

            AstExpression::Ternary { condition, then_value, else_value, .. } => {
                self.lower_ternary(condition, then_value, else_value, cx)
            }

            AstExpression::Call { callee, args, .. } => self.lower_call(expr, callee, args, cx),

            AstExpression::Member { object, member, .. } => {
                let object = self.lower_expression(object, cx);
                let dst = cx.emitter.new_temp();
                cx.emitter.emit(TacInstruction::GetField { object, field: member.clone(), dst: dst.clone() });
                dst
            }

            AstExpression::Index { array, index, .. } => {
                let array = self.lower_expression(array, cx);
                let index = self.lower_expression(index, cx);
                let dst = cx.emitter.new_temp();
                cx.emitter.emit(TacInstruction::ArrayLoad { array, index, dst: dst.clone() });
                dst
            }

            AstExpression::New { class_name, args, .. } => self.lower_new(class_name, args, cx),

            AstExpression::ArrayLiteral { elements, .. } => {
                let element_type = match self.node_type(expr.id()) {
                    Type::Array(element_type) => element_type.to_string(),
                    other => ICE!("Array literal typed as {other}"),
                };

                let dst = cx.emitter.new_temp();
                cx.emitter.emit(TacInstruction::NewArray {
                    element_type,
                    size: TacOperand::Literal(TacLiteral::Int(elements.len() as i64)),
                    dst: dst.clone(),
                });

                for (index, element) in elements.iter().enumerate() {
                    let value = self.lower_expression(element, cx);
                    cx.emitter.emit(TacInstruction::ArrayStore {
                        array: dst.clone(),
                        index: TacOperand::Literal(TacLiteral::Int(index as i64)),
                        value,
                    });
                }

                dst
            }
        }
    }

    /// `E1 && E2`: `E2` is evaluated only on the paths where `E1` is true.
    fn lower_logical_and(&mut self, lhs: &AstExpression, rhs: &AstExpression, cx: &mut FunctionCx) -> TacOperand {
        let dst = cx.emitter.new_temp();
        let false_label = cx.emitter.new_label();
        let end_label = cx.emitter.new_label();

        let a = self.lower_expression(lhs, cx);
        cx.emitter.emit(TacInstruction::IfFalse { cond: a, label: false_label.clone() });

        let b = self.lower_expression(rhs, cx);
        cx.emitter.emit(TacInstruction::Move { src: b, dst: dst.clone() });
        cx.emitter.emit(TacInstruction::Goto { label: end_label.clone() });

        cx.emitter.emit(TacInstruction::Label { name: false_label });
        cx.emitter.emit(TacInstruction::Move {
            src: TacOperand::Literal(TacLiteral::Bool(false)),
            dst: dst.clone(),
        });

        cx.emitter.emit(TacInstruction::Label { name: end_label });
        dst
    }

    /// `E1 || E2`, symmetric to `&&` with the branch sense inverted.
    fn lower_logical_or(&mut self, lhs: &AstExpression, rhs: &AstExpression, cx: &mut FunctionCx) -> TacOperand {
        let dst = cx.emitter.new_temp();
        let true_label = cx.emitter.new_label();
        let end_label = cx.emitter.new_label();

        let a = self.lower_expression(lhs, cx);
        cx.emitter.emit(TacInstruction::IfGoto { cond: a, label: true_label.clone() });

        let b = self.lower_expression(rhs, cx);
        cx.emitter.emit(TacInstruction::Move { src: b, dst: dst.clone() });
        cx.emitter.emit(TacInstruction::Goto { label: end_label.clone() });

        cx.emitter.emit(TacInstruction::Label { name: true_label });
        cx.emitter.emit(TacInstruction::Move {
            src: TacOperand::Literal(TacLiteral::Bool(true)),
            dst: dst.clone(),
        });

        cx.emitter.emit(TacInstruction::Label { name: end_label });
        dst
    }

    /// `c ? a : b`, the same shape as an `if`/`else` writing both branches into one result temp.
    fn lower_ternary(
        &mut self,
        condition: &AstExpression,
        then_value: &AstExpression,
        else_value: &AstExpression,
        cx: &mut FunctionCx,
    ) -> TacOperand {
        let dst = cx.emitter.new_temp();
        let else_label = cx.emitter.new_label();
        let end_label = cx.emitter.new_label();

        let cond = self.lower_expression(condition, cx);
        cx.emitter.emit(TacInstruction::IfFalse { cond, label: else_label.clone() });

        let then_result = self.lower_expression(then_value, cx);
        cx.emitter.emit(TacInstruction::Move { src: then_result, dst: dst.clone() });
        cx.emitter.emit(TacInstruction::Goto { label: end_label.clone() });

        cx.emitter.emit(TacInstruction::Label { name: else_label });
        let else_result = self.lower_expression(else_value, cx);
        cx.emitter.emit(TacInstruction::Move { src: else_result, dst: dst.clone() });

        cx.emitter.emit(TacInstruction::Label { name: end_label });
        dst
    }

    fn lower_call(
        &mut self,
        call: &AstExpression,
        callee: &AstExpression,
        args: &[AstExpression],
        cx: &mut FunctionCx,
    ) -> TacOperand {
        let is_void = *self.node_type(call.id()) == Type::Void;

        match callee {
            AstExpression::Member { object, member, .. } => {
                // Pass the receiver as the leading argument, then resolve the defining class so the
                // call names an emitted function.
                let receiver = self.lower_expression(object, cx);
                cx.emitter.emit(TacInstruction::Param { value: receiver });
                self.lower_args(args, cx);

                let class_name = match self.node_type(object.id()) {
                    Type::Class(class_name) => class_name.clone(),
                    other => ICE!("Method call receiver typed as {other}"),
                };
                let defining = self
                    .analysis
                    .symbols
                    .resolve_method(&class_name, member)
                    .map_or(class_name, |(defining, _)| defining.to_string());

                self.emit_call(format!("{defining}.{member}"), args.len() + 1, is_void, cx)
            }

            AstExpression::Identifier { node_id, name, .. } => {
                match self.analysis.resolved_names.get(node_id) {
                    // A variable or parameter holding a function reference: call through it.
                    Some(local) => {
                        let function = format!("%{local}");
                        self.lower_args(args, cx);
                        self.emit_call(function, args.len(), is_void, cx)
                    }
                    None if name == "print" => {
                        // The builtin lowers to the dedicated instruction.
                        let value = self.lower_expression(&args[0], cx);
                        cx.emitter.emit(TacInstruction::Print { value });
                        TacOperand::Literal(TacLiteral::Void)
                    }
                    None => {
                        self.lower_args(args, cx);
                        self.emit_call(name.clone(), args.len(), is_void, cx)
                    }
                }
            }

            other => {
                // A computed callee, e.g. a ternary selecting between function references.
                let function = self.lower_expression(other, cx);
                self.lower_args(args, cx);
                self.emit_call(function.to_string(), args.len(), is_void, cx)
            }
        }
    }

    /// Evaluates the arguments left-to-right, emitting each `param` directly after its argument.
    fn lower_args(&mut self, args: &[AstExpression], cx: &mut FunctionCx) {
        for arg in args {
            let value = self.lower_expression(arg, cx);
            cx.emitter.emit(TacInstruction::Param { value });
        }
    }

    fn emit_call(&mut self, function: String, arg_count: usize, is_void: bool, cx: &mut FunctionCx) -> TacOperand {
        let dst = if is_void { None } else { Some(cx.emitter.new_temp()) };
        cx.emitter.emit(TacInstruction::Call { function, arg_count, dst: dst.clone() });
        dst.unwrap_or(TacOperand::Literal(TacLiteral::Void))
    }

    fn lower_new(&mut self, class_name: &str, args: &[AstExpression], cx: &mut FunctionCx) -> TacOperand {
        let dst = cx.emitter.new_temp();
        cx.emitter.emit(TacInstruction::New { class_name: class_name.to_string(), dst: dst.clone() });

        // Without a declared or inherited constructor the object is complete as allocated.
        let constructor =
            self.analysis.symbols.resolve_method(class_name, "constructor").map(|(defining, _)| defining.to_string());

        if let Some(defining) = constructor {
            cx.emitter.emit(TacInstruction::Param { value: dst.clone() });
            self.lower_args(args, cx);
            cx.emitter.emit(TacInstruction::Call {
                function: format!("{defining}.constructor"),
                arg_count: args.len() + 1,
                dst: None,
            });
        }

        dst
    }
}

fn lower_literal(literal: &AstLiteral) -> TacLiteral {
    match literal {
        AstLiteral::Int(value) => TacLiteral::Int(*value),
        AstLiteral::Float(value) => TacLiteral::Float(*value),
        AstLiteral::Str(value) => TacLiteral::Str(value.clone()),
        AstLiteral::Bool(value) => TacLiteral::Bool(*value),
        AstLiteral::Null => TacLiteral::Null,
    }
}

#[rustfmt::skip]
fn lower_binary_op(op: AstBinaryOp) -> TacBinaryOp {
    match op {
        AstBinaryOp::Add                  => TacBinaryOp::Add,
        AstBinaryOp::Subtract             => TacBinaryOp::Subtract,
        AstBinaryOp::Multiply             => TacBinaryOp::Multiply,
        AstBinaryOp::Divide               => TacBinaryOp::Divide,
        AstBinaryOp::Remainder            => TacBinaryOp::Remainder,
        AstBinaryOp::EqualTo              => TacBinaryOp::EqualTo,
        AstBinaryOp::NotEqualTo           => TacBinaryOp::NotEqualTo,
        AstBinaryOp::LessThan             => TacBinaryOp::LessThan,
        AstBinaryOp::GreaterThan          => TacBinaryOp::GreaterThan,
        AstBinaryOp::LessThanOrEqualTo    => TacBinaryOp::LessThanOrEqualTo,
        AstBinaryOp::GreaterThanOrEqualTo => TacBinaryOp::GreaterThanOrEqualTo,
        AstBinaryOp::LogicalAnd | AstBinaryOp::LogicalOr => ICE!("Logical operators lower via short-circuit shapes"),
    }
}
