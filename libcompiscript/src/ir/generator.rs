// Copyright 2025-2026 Neil Henderson
//
//! The `generator` module lowers the checked parse tree into TAC.
//!
//! The generator walks the same tree as the checker and assumes its input is well-formed: every
//! violation it could observe was already diagnosed, so inconsistencies here are internal errors.

mod expr;

use std::collections::HashMap;

use crate::ICE;
use crate::parser::{
    AstBlock, AstClassDeclaration, AstClassMember, AstExpression, AstFunctionDeclaration, AstNodeId, AstProgram,
    AstStatement, AstSwitchCase,
};
use crate::sema::Analysis;
use crate::sema::types::Type;

use super::emitter::Emitter;
use super::tac::{TacBinaryOp, TacFunction, TacInstruction, TacLiteral, TacOperand, TacProgram};

/// One entry of the generator's loop stack. A `switch` pushes a frame without a continue label, so
/// `continue` resolves past it to the innermost loop.
struct LoopLabels {
    continue_label: Option<String>,
    break_label: String,
    continue_taken: bool,
    break_taken: bool,
}

/// Per-function lowering state.
struct FunctionCx {
    emitter: Emitter,
    loop_stack: Vec<LoopLabels>,

    // Known constant lengths of array-valued locals, keyed by storage name. Used to bound the
    // desugared `foreach` loop without a runtime length call.
    array_lengths: HashMap<String, usize>,
}

impl FunctionCx {
    fn new(function: TacFunction) -> Self {
        Self { emitter: Emitter::new(function), loop_stack: Vec::new(), array_lengths: HashMap::new() }
    }
}

/// Lowers a checked program to TAC.
///
/// Declared functions and methods are emitted in source order; top-level statements collect into a
/// trailing `main` entry function when any exist.
pub fn generate(program: &AstProgram, analysis: &Analysis) -> TacProgram {
    TacGenerator { analysis, program: TacProgram::new() }.run(program)
}

struct TacGenerator<'a> {
    analysis: &'a Analysis,
    program: TacProgram,
}

impl TacGenerator<'_> {
    fn run(mut self, program: &AstProgram) -> TacProgram {
        let mut entry = FunctionCx::new(TacFunction::new("main", Vec::new(), "void"));
        let mut has_top_level_statements = false;

        for stmt in &program.0 {
            match stmt {
                AstStatement::FuncDecl(decl) => self.generate_function(decl, None),
                AstStatement::ClassDecl(decl) => self.generate_class(decl),
                other => {
                    has_top_level_statements = true;
                    self.lower_statement(other, &mut entry);
                }
            }
        }

        if has_top_level_statements {
            self.program.add(entry.emitter.function);
        }

        self.program
    }

    fn generate_class(&mut self, decl: &AstClassDeclaration) {
        for member in &decl.members {
            if let AstClassMember::Method(method) = member {
                self.generate_function(method, Some(&decl.name));
            }
        }
    }

    fn generate_function(&mut self, decl: &AstFunctionDeclaration, class: Option<&str>) {
        let name = match class {
            Some(class) => format!("{class}.{}", decl.name),
            None => decl.name.clone(),
        };

        // Methods receive their object as a leading implicit parameter.
        let mut params: Vec<String> = Vec::new();
        if class.is_some() {
            params.push("this".to_string());
        }
        params.extend(decl.params.iter().map(|p| p.name.clone()));

        let return_type = if decl.name == "constructor" {
            "void".to_string()
        } else {
            decl.return_type.as_ref().map_or_else(|| "void".to_string(), |t| t.to_string())
        };

        let mut cx = FunctionCx::new(TacFunction::new(name, params, return_type));
        for stmt in &decl.body.0 {
            self.lower_statement(stmt, &mut cx);
        }

        self.program.add(cx.emitter.function);
    }

    // ---------------------------------------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------------------------------------

    fn lower_statement(&mut self, stmt: &AstStatement, cx: &mut FunctionCx) {
        match stmt {
            AstStatement::VarDecl(decl) => {
                cx.emitter.function.locals_count += 1;
                let name = self.storage_name(decl.node_id, &decl.name);

                let value = match &decl.initializer {
                    Some(init) => {
                        let value = self.lower_expression(init, cx);
                        self.track_array_length(&name, init, cx);
                        value
                    }
                    None => TacOperand::Literal(default_literal(self.node_type(decl.node_id))),
                };

                cx.emitter.emit(TacInstruction::Move { src: value, dst: TacOperand::Local(name) });
            }

            AstStatement::FuncDecl(decl) => self.generate_function(decl, None),
            AstStatement::ClassDecl(decl) => self.generate_class(decl),

            AstStatement::Expression(expr) => {
                self.lower_expression(expr, cx);
            }

            AstStatement::Print { arg, .. } => {
                let value = self.lower_expression(arg, cx);
                cx.emitter.emit(TacInstruction::Print { value });
            }

            AstStatement::Block(block) => {
                for stmt in &block.0 {
                    self.lower_statement(stmt, cx);
                }
            }

            AstStatement::If { condition, then_block, else_block, .. } => {
                let cond = self.lower_expression(condition, cx);

                match else_block {
                    None => {
                        let end_label = cx.emitter.new_label();
                        cx.emitter.emit(TacInstruction::IfFalse { cond, label: end_label.clone() });
                        self.lower_statements(&then_block.0, cx);
                        cx.emitter.emit(TacInstruction::Label { name: end_label });
                    }
                    Some(else_block) => {
                        let else_label = cx.emitter.new_label();
                        cx.emitter.emit(TacInstruction::IfFalse { cond, label: else_label.clone() });
                        self.lower_statements(&then_block.0, cx);

                        // A terminal then-branch needs no jump over the else-branch, and then nothing
                        // targets the end label at all.
                        let end_label = if cx.emitter.last_is_terminal() {
                            None
                        } else {
                            let label = cx.emitter.new_label();
                            cx.emitter.emit(TacInstruction::Goto { label: label.clone() });
                            Some(label)
                        };

                        cx.emitter.emit(TacInstruction::Label { name: else_label });
                        self.lower_statements(&else_block.0, cx);

                        if let Some(end_label) = end_label {
                            cx.emitter.emit(TacInstruction::Label { name: end_label });
                        }
                    }
                }
            }

            AstStatement::While { condition, body, .. } => {
                let test_label = cx.emitter.new_label();
                let end_label = cx.emitter.new_label();

                cx.emitter.emit(TacInstruction::Label { name: test_label.clone() });
                let cond = self.lower_expression(condition, cx);
                cx.emitter.emit(TacInstruction::IfFalse { cond, label: end_label.clone() });

                cx.loop_stack.push(LoopLabels {
                    continue_label: Some(test_label.clone()),
                    break_label: end_label.clone(),
                    continue_taken: false,
                    break_taken: false,
                });
                self.lower_statements(&body.0, cx);
                cx.loop_stack.pop();

                if !cx.emitter.last_is_terminal() {
                    cx.emitter.emit(TacInstruction::Goto { label: test_label });
                }
                cx.emitter.emit(TacInstruction::Label { name: end_label });
            }

            AstStatement::DoWhile { body, condition, .. } => {
                let top_label = cx.emitter.new_label();
                let cond_label = cx.emitter.new_label();
                let end_label = cx.emitter.new_label();

                cx.emitter.emit(TacInstruction::Label { name: top_label.clone() });

                cx.loop_stack.push(LoopLabels {
                    continue_label: Some(cond_label.clone()),
                    break_label: end_label.clone(),
                    continue_taken: false,
                    break_taken: false,
                });
                self.lower_statements(&body.0, cx);
                let frame = cx.loop_stack.pop().expect("Loop frame pushed above");

                if frame.continue_taken || !cx.emitter.last_is_terminal() {
                    if frame.continue_taken {
                        cx.emitter.emit(TacInstruction::Label { name: cond_label });
                    }
                    let cond = self.lower_expression(condition, cx);
                    cx.emitter.emit(TacInstruction::IfGoto { cond, label: top_label });
                }

                if frame.break_taken {
                    cx.emitter.emit(TacInstruction::Label { name: end_label });
                }
            }

            AstStatement::For { init, condition, step, body, .. } => {
                if let Some(init) = init {
                    self.lower_statement(init, cx);
                }

                let top_label = cx.emitter.new_label();
                let continue_label = cx.emitter.new_label();
                let end_label = cx.emitter.new_label();

                cx.emitter.emit(TacInstruction::Label { name: top_label.clone() });

                // An absent condition is an unconditional `#true`; nothing needs to be emitted.
                if let Some(condition) = condition {
                    let cond = self.lower_expression(condition, cx);
                    cx.emitter.emit(TacInstruction::IfFalse { cond, label: end_label.clone() });
                }

                cx.loop_stack.push(LoopLabels {
                    continue_label: Some(continue_label.clone()),
                    break_label: end_label.clone(),
                    continue_taken: false,
                    break_taken: false,
                });
                self.lower_statements(&body.0, cx);
                cx.loop_stack.pop();

                cx.emitter.emit(TacInstruction::Label { name: continue_label });
                if let Some(step) = step {
                    self.lower_statement(step, cx);
                }
                if !cx.emitter.last_is_terminal() {
                    cx.emitter.emit(TacInstruction::Goto { label: top_label });
                }
                cx.emitter.emit(TacInstruction::Label { name: end_label });
            }

            AstStatement::Foreach { node_id, binding, iterable, body, .. } => {
                self.lower_foreach(*node_id, binding, iterable, body, cx)
            }

            AstStatement::Switch { scrutinee, cases, default, .. } => {
                self.lower_switch(scrutinee, cases, default.as_deref(), cx)
            }

            AstStatement::Break { .. } => {
                let frame = match cx.loop_stack.last_mut() {
                    Some(frame) => frame,
                    None => ICE!("'break' outside of a loop survived checking"),
                };
                frame.break_taken = true;
                let label = frame.break_label.clone();
                cx.emitter.emit(TacInstruction::Goto { label });
            }

            AstStatement::Continue { .. } => {
                let frame = match cx.loop_stack.iter_mut().rev().find(|f| f.continue_label.is_some()) {
                    Some(frame) => frame,
                    None => ICE!("'continue' outside of a loop survived checking"),
                };
                frame.continue_taken = true;
                let label = frame.continue_label.clone().expect("Frame was selected for its continue label");
                cx.emitter.emit(TacInstruction::Goto { label });
            }

            AstStatement::Return { value, .. } => {
                let value = value.as_ref().map(|expr| self.lower_expression(expr, cx));
                cx.emitter.emit(TacInstruction::Ret { value });
            }

            AstStatement::Assign { target, value, .. } => self.lower_assignment(target, value, cx),
        }
    }

    fn lower_statements(&mut self, stmts: &[AstStatement], cx: &mut FunctionCx) {
        for stmt in stmts {
            self.lower_statement(stmt, cx);
        }
    }

    fn lower_assignment(&mut self, target: &AstExpression, value: &AstExpression, cx: &mut FunctionCx) {
        match target {
            AstExpression::Identifier { node_id, name, .. } => {
                let local = self.storage_name(*node_id, name);
                let src = self.lower_expression(value, cx);
                self.track_array_length(&local, value, cx);
                cx.emitter.emit(TacInstruction::Move { src, dst: TacOperand::Local(local) });
            }

            AstExpression::Member { object, member, .. } => {
                let object = self.lower_expression(object, cx);
                let src = self.lower_expression(value, cx);
                cx.emitter.emit(TacInstruction::SetField { object, field: member.clone(), value: src });
            }

            AstExpression::Index { array, index, .. } => {
                let array = self.lower_expression(array, cx);
                let index = self.lower_expression(index, cx);
                let src = self.lower_expression(value, cx);
                cx.emitter.emit(TacInstruction::ArrayStore { array, index, value: src });
            }

            _ => ICE!("Invalid assignment target survived checking"),
        }
    }

    fn lower_foreach(
        &mut self,
        node_id: AstNodeId,
        binding: &str,
        iterable: &AstExpression,
        body: &AstBlock,
        cx: &mut FunctionCx,
    ) {
        let array = self.lower_expression(iterable, cx);

        // Bound the loop with the tracked constant length where known, otherwise ask the runtime.
        let length = match self.known_length(iterable, cx) {
            Some(length) => TacOperand::Literal(TacLiteral::Int(length as i64)),
            None => {
                cx.emitter.emit(TacInstruction::Param { value: array.clone() });
                let length = cx.emitter.new_temp();
                cx.emitter.emit(TacInstruction::Call {
                    function: "len".to_string(),
                    arg_count: 1,
                    dst: Some(length.clone()),
                });
                length
            }
        };

        let index = cx.emitter.new_aux_local("i");
        let element = self.storage_name(node_id, binding);
        cx.emitter.function.locals_count += 1;

        cx.emitter.emit(TacInstruction::Move {
            src: TacOperand::Literal(TacLiteral::Int(0)),
            dst: index.clone(),
        });

        let test_label = cx.emitter.new_label();
        let continue_label = cx.emitter.new_label();
        let end_label = cx.emitter.new_label();

        cx.emitter.emit(TacInstruction::Label { name: test_label.clone() });
        let cond = cx.emitter.new_temp();
        cx.emitter.emit(TacInstruction::Binary {
            op: TacBinaryOp::LessThan,
            a: index.clone(),
            b: length,
            dst: cond.clone(),
        });
        cx.emitter.emit(TacInstruction::IfFalse { cond, label: end_label.clone() });

        let element_value = cx.emitter.new_temp();
        cx.emitter.emit(TacInstruction::ArrayLoad { array, index: index.clone(), dst: element_value.clone() });
        cx.emitter.emit(TacInstruction::Move { src: element_value, dst: TacOperand::Local(element) });

        cx.loop_stack.push(LoopLabels {
            continue_label: Some(continue_label.clone()),
            break_label: end_label.clone(),
            continue_taken: false,
            break_taken: false,
        });
        self.lower_statements(&body.0, cx);
        cx.loop_stack.pop();

        cx.emitter.emit(TacInstruction::Label { name: continue_label });
        let next = cx.emitter.new_temp();
        cx.emitter.emit(TacInstruction::Binary {
            op: TacBinaryOp::Add,
            a: index.clone(),
            b: TacOperand::Literal(TacLiteral::Int(1)),
            dst: next.clone(),
        });
        cx.emitter.emit(TacInstruction::Move { src: next, dst: index });
        cx.emitter.emit(TacInstruction::Goto { label: test_label });
        cx.emitter.emit(TacInstruction::Label { name: end_label });
    }

    fn lower_switch(
        &mut self,
        scrutinee: &AstExpression,
        cases: &[AstSwitchCase],
        default: Option<&[AstStatement]>,
        cx: &mut FunctionCx,
    ) {
        let scrutinee_op = self.lower_expression(scrutinee, cx);

        let case_labels: Vec<String> = cases.iter().map(|_| cx.emitter.new_label()).collect();
        let default_label = default.map(|_| cx.emitter.new_label());
        let end_label = cx.emitter.new_label();
        let mut end_referenced = false;

        // Compare-and-branch chain over the case values.
        for (case, label) in cases.iter().zip(&case_labels) {
            let case_value = self.lower_expression(&case.value, cx);
            let cond = cx.emitter.new_temp();
            cx.emitter.emit(TacInstruction::Binary {
                op: TacBinaryOp::EqualTo,
                a: scrutinee_op.clone(),
                b: case_value,
                dst: cond.clone(),
            });
            cx.emitter.emit(TacInstruction::IfGoto { cond, label: label.clone() });
        }

        match &default_label {
            Some(label) => cx.emitter.emit(TacInstruction::Goto { label: label.clone() }),
            None => {
                cx.emitter.emit(TacInstruction::Goto { label: end_label.clone() });
                end_referenced = true;
            }
        }

        cx.loop_stack.push(LoopLabels {
            continue_label: None,
            break_label: end_label.clone(),
            continue_taken: false,
            break_taken: false,
        });

        // Fall-through between cases is not emitted: a case that does not end in a terminal
        // instruction jumps to the end explicitly.
        for (case, label) in cases.iter().zip(&case_labels) {
            cx.emitter.emit(TacInstruction::Label { name: label.clone() });
            self.lower_statements(&case.body, cx);
            if !cx.emitter.last_is_terminal() {
                cx.emitter.emit(TacInstruction::Goto { label: end_label.clone() });
                end_referenced = true;
            }
        }

        if let (Some(stmts), Some(label)) = (default, default_label) {
            cx.emitter.emit(TacInstruction::Label { name: label });
            self.lower_statements(stmts, cx);
        }

        let frame = cx.loop_stack.pop().expect("Switch frame pushed above");
        if frame.break_taken || end_referenced {
            cx.emitter.emit(TacInstruction::Label { name: end_label });
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Analysis lookups
    // ---------------------------------------------------------------------------------------------

    fn node_type(&self, node_id: AstNodeId) -> &Type {
        match self.analysis.node_types.get(&node_id) {
            Some(node_type) => node_type,
            None => ICE!("No type recorded for node {node_id}"),
        }
    }

    /// The storage name sema assigned to this binding or reference.
    fn storage_name(&self, node_id: AstNodeId, declared_name: &str) -> String {
        self.analysis.resolved_names.get(&node_id).cloned().unwrap_or_else(|| declared_name.to_string())
    }

    /// Records or invalidates the tracked constant length of an array-valued local.
    fn track_array_length(&self, local: &str, value: &AstExpression, cx: &mut FunctionCx) {
        match value {
            AstExpression::ArrayLiteral { elements, .. } => {
                cx.array_lengths.insert(local.to_string(), elements.len());
            }
            AstExpression::Identifier { node_id, name, .. } => {
                let source = self.storage_name(*node_id, name);
                match cx.array_lengths.get(&source).copied() {
                    Some(length) => {
                        cx.array_lengths.insert(local.to_string(), length);
                    }
                    None => {
                        cx.array_lengths.remove(local);
                    }
                }
            }
            _ => {
                cx.array_lengths.remove(local);
            }
        }
    }

    fn known_length(&self, iterable: &AstExpression, cx: &FunctionCx) -> Option<usize> {
        match iterable {
            AstExpression::ArrayLiteral { elements, .. } => Some(elements.len()),
            AstExpression::Identifier { node_id, name, .. } => {
                cx.array_lengths.get(&self.storage_name(*node_id, name)).copied()
            }
            _ => None,
        }
    }
}

/// The stored default for a declaration without an initializer.
fn default_literal(var_type: &Type) -> TacLiteral {
    match var_type {
        Type::Int => TacLiteral::Int(0),
        Type::Float => TacLiteral::Float(0.0),
        Type::Bool => TacLiteral::Bool(false),
        Type::String => TacLiteral::Str(String::new()),
        _ => TacLiteral::Null,
    }
}
