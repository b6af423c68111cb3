// Copyright 2025-2026 Neil Henderson

//! Builders and helpers for constructing parse trees the way the external parser would, plus
//! structural validators over generated TAC.

use std::collections::HashSet;

use libcompiscript::compiler_driver::{self, DiagnosticCode, Driver, DriverError};
use libcompiscript::core::SourceLocation;
use libcompiscript::ir::{TacInstruction, TacOperand, TacProgram};
use libcompiscript::parser::*;

// -------------------------------------------------------------------------------------------------
// Expression builders
// -------------------------------------------------------------------------------------------------

pub fn int(value: i64) -> AstExpression {
    AstExpression::Literal { node_id: AstNodeId::new(), value: AstLiteral::Int(value), loc: SourceLocation::none() }
}

pub fn float(value: f64) -> AstExpression {
    AstExpression::Literal { node_id: AstNodeId::new(), value: AstLiteral::Float(value), loc: SourceLocation::none() }
}

pub fn string(value: &str) -> AstExpression {
    AstExpression::Literal {
        node_id: AstNodeId::new(),
        value: AstLiteral::Str(value.to_string()),
        loc: SourceLocation::none(),
    }
}

pub fn boolean(value: bool) -> AstExpression {
    AstExpression::Literal { node_id: AstNodeId::new(), value: AstLiteral::Bool(value), loc: SourceLocation::none() }
}

pub fn null() -> AstExpression {
    AstExpression::Literal { node_id: AstNodeId::new(), value: AstLiteral::Null, loc: SourceLocation::none() }
}

pub fn ident(name: &str) -> AstExpression {
    AstExpression::Identifier { node_id: AstNodeId::new(), name: name.to_string(), loc: SourceLocation::none() }
}

pub fn this() -> AstExpression {
    AstExpression::This { node_id: AstNodeId::new(), loc: SourceLocation::none() }
}

pub fn unary(op: AstUnaryOp, operand: AstExpression) -> AstExpression {
    AstExpression::Unary { node_id: AstNodeId::new(), op, operand: Box::new(operand), loc: SourceLocation::none() }
}

pub fn binary(op: AstBinaryOp, lhs: AstExpression, rhs: AstExpression) -> AstExpression {
    AstExpression::Binary {
        node_id: AstNodeId::new(),
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
        loc: SourceLocation::none(),
    }
}

pub fn ternary(condition: AstExpression, then_value: AstExpression, else_value: AstExpression) -> AstExpression {
    AstExpression::Ternary {
        node_id: AstNodeId::new(),
        condition: Box::new(condition),
        then_value: Box::new(then_value),
        else_value: Box::new(else_value),
        loc: SourceLocation::none(),
    }
}

pub fn call(callee: AstExpression, args: Vec<AstExpression>) -> AstExpression {
    AstExpression::Call { node_id: AstNodeId::new(), callee: Box::new(callee), args, loc: SourceLocation::none() }
}

pub fn member(object: AstExpression, name: &str) -> AstExpression {
    AstExpression::Member {
        node_id: AstNodeId::new(),
        object: Box::new(object),
        member: name.to_string(),
        loc: SourceLocation::none(),
    }
}

pub fn index(array: AstExpression, idx: AstExpression) -> AstExpression {
    AstExpression::Index {
        node_id: AstNodeId::new(),
        array: Box::new(array),
        index: Box::new(idx),
        loc: SourceLocation::none(),
    }
}

pub fn new_object(class_name: &str, args: Vec<AstExpression>) -> AstExpression {
    AstExpression::New {
        node_id: AstNodeId::new(),
        class_name: class_name.to_string(),
        args,
        loc: SourceLocation::none(),
    }
}

pub fn array_literal(elements: Vec<AstExpression>) -> AstExpression {
    AstExpression::ArrayLiteral { node_id: AstNodeId::new(), elements, loc: SourceLocation::none() }
}

// -------------------------------------------------------------------------------------------------
// Type and statement builders
// -------------------------------------------------------------------------------------------------

pub fn ty(name: &str) -> AstTypeName {
    AstTypeName::Named(name.to_string())
}

pub fn array_ty(elem: AstTypeName) -> AstTypeName {
    AstTypeName::Array(Box::new(elem))
}

pub fn let_decl(name: &str, declared_type: Option<AstTypeName>, initializer: Option<AstExpression>) -> AstStatement {
    AstStatement::VarDecl(AstVariableDeclaration {
        node_id: AstNodeId::new(),
        name: name.to_string(),
        is_const: false,
        declared_type,
        initializer,
        loc: SourceLocation::none(),
    })
}

pub fn const_decl(name: &str, declared_type: Option<AstTypeName>, initializer: Option<AstExpression>) -> AstStatement {
    AstStatement::VarDecl(AstVariableDeclaration {
        node_id: AstNodeId::new(),
        name: name.to_string(),
        is_const: true,
        declared_type,
        initializer,
        loc: SourceLocation::none(),
    })
}

pub fn assign(target: AstExpression, value: AstExpression) -> AstStatement {
    AstStatement::Assign { target, value, loc: SourceLocation::none() }
}

pub fn expr_stmt(expr: AstExpression) -> AstStatement {
    AstStatement::Expression(expr)
}

pub fn print(arg: AstExpression) -> AstStatement {
    AstStatement::Print { arg, loc: SourceLocation::none() }
}

pub fn block(stmts: Vec<AstStatement>) -> AstStatement {
    AstStatement::Block(AstBlock(stmts))
}

pub fn if_stmt(condition: AstExpression, then_block: Vec<AstStatement>, else_block: Option<Vec<AstStatement>>) -> AstStatement {
    AstStatement::If {
        condition,
        then_block: AstBlock(then_block),
        else_block: else_block.map(AstBlock),
        loc: SourceLocation::none(),
    }
}

pub fn while_stmt(condition: AstExpression, body: Vec<AstStatement>) -> AstStatement {
    AstStatement::While { condition, body: AstBlock(body), loc: SourceLocation::none() }
}

pub fn do_while(body: Vec<AstStatement>, condition: AstExpression) -> AstStatement {
    AstStatement::DoWhile { body: AstBlock(body), condition, loc: SourceLocation::none() }
}

pub fn for_stmt(
    init: Option<AstStatement>,
    condition: Option<AstExpression>,
    step: Option<AstStatement>,
    body: Vec<AstStatement>,
) -> AstStatement {
    AstStatement::For {
        init: init.map(Box::new),
        condition,
        step: step.map(Box::new),
        body: AstBlock(body),
        loc: SourceLocation::none(),
    }
}

pub fn foreach(binding: &str, iterable: AstExpression, body: Vec<AstStatement>) -> AstStatement {
    AstStatement::Foreach {
        node_id: AstNodeId::new(),
        binding: binding.to_string(),
        iterable,
        body: AstBlock(body),
        loc: SourceLocation::none(),
    }
}

pub fn switch(
    scrutinee: AstExpression,
    cases: Vec<(AstExpression, Vec<AstStatement>)>,
    default: Option<Vec<AstStatement>>,
) -> AstStatement {
    AstStatement::Switch {
        scrutinee,
        cases: cases
            .into_iter()
            .map(|(value, body)| AstSwitchCase { value, body, loc: SourceLocation::none() })
            .collect(),
        default,
        loc: SourceLocation::none(),
    }
}

pub fn break_stmt() -> AstStatement {
    AstStatement::Break { loc: SourceLocation::none() }
}

pub fn continue_stmt() -> AstStatement {
    AstStatement::Continue { loc: SourceLocation::none() }
}

pub fn ret(value: Option<AstExpression>) -> AstStatement {
    AstStatement::Return { value, loc: SourceLocation::none() }
}

pub fn param(name: &str, declared_type: AstTypeName) -> AstParameter {
    AstParameter { name: name.to_string(), declared_type, loc: SourceLocation::none() }
}

pub fn func_decl(
    name: &str,
    params: Vec<AstParameter>,
    return_type: Option<AstTypeName>,
    body: Vec<AstStatement>,
) -> AstStatement {
    AstStatement::FuncDecl(function(name, params, return_type, body))
}

pub fn function(
    name: &str,
    params: Vec<AstParameter>,
    return_type: Option<AstTypeName>,
    body: Vec<AstStatement>,
) -> AstFunctionDeclaration {
    AstFunctionDeclaration {
        node_id: AstNodeId::new(),
        name: name.to_string(),
        params,
        return_type,
        body: AstBlock(body),
        loc: SourceLocation::none(),
    }
}

pub fn field(name: &str, declared_type: AstTypeName) -> AstClassMember {
    AstClassMember::Field(AstFieldDeclaration {
        node_id: AstNodeId::new(),
        name: name.to_string(),
        declared_type,
        loc: SourceLocation::none(),
    })
}

pub fn method(
    name: &str,
    params: Vec<AstParameter>,
    return_type: Option<AstTypeName>,
    body: Vec<AstStatement>,
) -> AstClassMember {
    AstClassMember::Method(function(name, params, return_type, body))
}

pub fn class_decl(name: &str, parent: Option<&str>, members: Vec<AstClassMember>) -> AstStatement {
    AstStatement::ClassDecl(AstClassDeclaration {
        node_id: AstNodeId::new(),
        name: name.to_string(),
        parent: parent.map(str::to_string),
        members,
        loc: SourceLocation::none(),
    })
}

// -------------------------------------------------------------------------------------------------
// Compilation helpers
// -------------------------------------------------------------------------------------------------

pub fn compile(stmts: Vec<AstStatement>) -> (Driver, Result<TacProgram, DriverError>) {
    let program = AstProgram(stmts);
    let mut driver = Driver::new();
    let result = compiler_driver::compile(&program, &mut driver);
    (driver, result)
}

/// Compiles statements that are expected to be well-formed and returns the TAC text.
pub fn compile_to_text(stmts: Vec<AstStatement>) -> String {
    let (driver, result) = compile(stmts);
    match result {
        Ok(program) => program.dump(),
        Err(_) => {
            let mut rendered = Vec::new();
            driver.print_diagnostics_to_buffer(&mut rendered);
            panic!("Expected a clean compile, got diagnostics:\n{}", String::from_utf8_lossy(&rendered));
        }
    }
}

/// Compiles statements that are expected to fail and returns the error codes in emission order.
pub fn compile_expecting_errors(stmts: Vec<AstStatement>) -> Vec<DiagnosticCode> {
    let (driver, result) = compile(stmts);
    assert!(result.is_err(), "Expected the compile to fail");
    driver.diagnostics().iter().map(|d| d.code()).collect()
}

/// The instruction lines of the named `.func` block, trimmed of indentation.
pub fn function_body(dump: &str, name: &str) -> Vec<String> {
    let header = format!(".func {name}(");
    let mut lines = dump.lines().skip_while(|line| !line.starts_with(&header));
    assert!(lines.next().is_some(), "No function '{name}' in:\n{dump}");

    lines
        .skip(1) // .locals
        .take_while(|line| *line != ".endfunc")
        .map(|line| line.trim_start().to_string())
        .collect()
}

// -------------------------------------------------------------------------------------------------
// Structural validators
// -------------------------------------------------------------------------------------------------

fn source_operands(instruction: &TacInstruction) -> Vec<&TacOperand> {
    match instruction {
        TacInstruction::Binary { a, b, .. } => vec![a, b],
        TacInstruction::Unary { a, .. } => vec![a],
        TacInstruction::Move { src, .. } => vec![src],
        TacInstruction::IfGoto { cond, .. } | TacInstruction::IfFalse { cond, .. } => vec![cond],
        TacInstruction::Param { value } | TacInstruction::Print { value } => vec![value],
        TacInstruction::Ret { value } => value.iter().collect(),
        TacInstruction::GetField { object, .. } => vec![object],
        TacInstruction::SetField { object, value, .. } => vec![object, value],
        TacInstruction::NewArray { size, .. } => vec![size],
        TacInstruction::ArrayLoad { array, index, .. } => vec![array, index],
        TacInstruction::ArrayStore { array, index, value } => vec![array, index, value],
        _ => Vec::new(),
    }
}

fn destination(instruction: &TacInstruction) -> Option<&TacOperand> {
    match instruction {
        TacInstruction::Binary { dst, .. }
        | TacInstruction::Unary { dst, .. }
        | TacInstruction::Move { dst, .. }
        | TacInstruction::New { dst, .. }
        | TacInstruction::GetField { dst, .. }
        | TacInstruction::NewArray { dst, .. }
        | TacInstruction::ArrayLoad { dst, .. } => Some(dst),
        TacInstruction::Call { dst, .. } => dst.as_ref(),
        _ => None,
    }
}

/// Every temp read by an instruction was assigned by an earlier instruction in the same function.
pub fn assert_no_ghost_temps(program: &TacProgram) {
    for function in &program.functions {
        let mut assigned: HashSet<usize> = HashSet::new();
        for instruction in &function.instructions {
            for operand in source_operands(instruction) {
                if let TacOperand::Temp(temp) = operand {
                    assert!(
                        assigned.contains(temp),
                        "t{temp} read before assignment in '{}': {instruction}",
                        function.name
                    );
                }
            }
            if let Some(TacOperand::Temp(temp)) = destination(instruction) {
                assigned.insert(*temp);
            }
        }
    }
}

/// Every label is defined exactly once and every jump targets a defined label.
pub fn assert_labels_consistent(program: &TacProgram) {
    for function in &program.functions {
        let mut defined: HashSet<&str> = HashSet::new();
        for instruction in &function.instructions {
            if let TacInstruction::Label { name } = instruction {
                assert!(defined.insert(name), "Label '{name}' defined twice in '{}'", function.name);
            }
        }

        for instruction in &function.instructions {
            let target = match instruction {
                TacInstruction::Goto { label }
                | TacInstruction::IfGoto { label, .. }
                | TacInstruction::IfFalse { label, .. } => Some(label),
                _ => None,
            };
            if let Some(target) = target {
                assert!(defined.contains(target.as_str()), "Jump to undefined label '{target}' in '{}'", function.name);
            }
        }
    }
}
