// Copyright 2025-2026 Neil Henderson

//! Tests for warning diagnostics: warnings never suppress TAC generation.

use libcompiscript::compiler_driver::{DiagnosticCode, Severity};
use libcompiscript::parser::AstBinaryOp;

use crate::support::*;

#[test]
fn statements_after_a_return_are_dead_code() {
    let (driver, result) = compile(vec![func_decl(
        "f",
        vec![],
        Some(ty("integer")),
        vec![ret(Some(int(1))), print(int(2))],
    )]);

    assert!(result.is_ok(), "Warnings alone must not fail the compile");
    assert_eq!(driver.warning_count(), 1);

    let warning = &driver.diagnostics()[0];
    assert_eq!(warning.code(), DiagnosticCode::DeadCode);
    assert_eq!(warning.severity(), Severity::Warning);
}

#[test]
fn statements_after_break_are_dead_code() {
    let (driver, result) = compile(vec![while_stmt(
        boolean(true),
        vec![break_stmt(), print(int(1))],
    )]);

    assert!(result.is_ok());
    assert_eq!(driver.warning_count(), 1);
    assert_eq!(driver.diagnostics()[0].code(), DiagnosticCode::DeadCode);
}

#[test]
fn every_dead_statement_is_flagged() {
    let (driver, result) = compile(vec![func_decl(
        "f",
        vec![],
        Some(ty("integer")),
        vec![ret(Some(int(1))), print(int(2)), print(int(3)), print(int(4))],
    )]);

    assert!(result.is_ok());
    assert_eq!(driver.warning_count(), 3);
}

#[test]
fn dead_code_inside_both_branches_of_an_if() {
    let (driver, result) = compile(vec![func_decl(
        "pick",
        vec![param("flag", ty("boolean"))],
        Some(ty("integer")),
        vec![if_stmt(
            ident("flag"),
            vec![ret(Some(int(1))), print(int(9))],
            Some(vec![ret(Some(int(0)))]),
        )],
    )]);

    assert!(result.is_ok());
    assert_eq!(driver.warning_count(), 1);
    assert_eq!(driver.diagnostics()[0].code(), DiagnosticCode::DeadCode);
}

#[test]
fn reachable_code_is_not_flagged() {
    let (driver, result) = compile(vec![
        let_decl("n", Some(ty("integer")), Some(int(0))),
        while_stmt(
            binary(AstBinaryOp::LessThan, ident("n"), int(3)),
            vec![assign(ident("n"), binary(AstBinaryOp::Add, ident("n"), int(1)))],
        ),
        print(ident("n")),
    ]);

    assert!(result.is_ok());
    assert_eq!(driver.warning_count(), 0);
}
