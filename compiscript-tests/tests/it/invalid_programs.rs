// Copyright 2025-2026 Neil Henderson

//! Tests for ill-formed programs: diagnostics are collected in order and no TAC is produced.

use libcompiscript::compiler_driver::{DiagnosticCode, DriverError};
use libcompiscript::parser::AstBinaryOp;

use crate::support::*;

#[test]
fn three_errors_and_no_tac() {
    // const y: string = 42;  -> TypeMismatch
    // z = 5;                 -> UnknownSymbol
    // break;                 -> UnboundBreakContinue
    let (driver, result) = compile(vec![
        const_decl("y", Some(ty("string")), Some(int(42))),
        assign(ident("z"), int(5)),
        break_stmt(),
    ]);

    assert_eq!(result.err(), Some(DriverError::CompilerFailed(3)));
    assert_eq!(driver.error_count(), 3);

    let codes: Vec<DiagnosticCode> = driver.diagnostics().iter().map(|d| d.code()).collect();
    assert_eq!(
        codes,
        vec![DiagnosticCode::TypeMismatch, DiagnosticCode::UnknownSymbol, DiagnosticCode::UnboundBreakContinue]
    );
}

#[test]
fn assigning_to_a_const_binding() {
    let codes = compile_expecting_errors(vec![
        const_decl("limit", Some(ty("integer")), Some(int(10))),
        assign(ident("limit"), int(11)),
    ]);
    assert_eq!(codes, vec![DiagnosticCode::AssignToConst]);
}

#[test]
fn assigning_to_a_non_lvalue() {
    let codes = compile_expecting_errors(vec![assign(int(1), int(2))]);
    assert_eq!(codes, vec![DiagnosticCode::InvalidLValue]);
}

#[test]
fn unknown_members_and_bad_constructors() {
    let codes = compile_expecting_errors(vec![
        class_decl(
            "Point",
            None,
            vec![
                field("x", ty("integer")),
                method("constructor", vec![param("x0", ty("integer"))], None, vec![assign(
                    member(this(), "x"),
                    ident("x0"),
                )]),
            ],
        ),
        let_decl("p", Some(ty("Point")), Some(new_object("Point", vec![int(1), int(2)]))),
        print(member(ident("p"), "y")),
    ]);

    assert_eq!(codes, vec![DiagnosticCode::BadConstructor, DiagnosticCode::UnknownMember]);
}

#[test]
fn constructor_argument_types_are_checked() {
    let codes = compile_expecting_errors(vec![
        class_decl(
            "Point",
            None,
            vec![
                field("x", ty("integer")),
                method("constructor", vec![param("x0", ty("integer"))], None, vec![assign(
                    member(this(), "x"),
                    ident("x0"),
                )]),
            ],
        ),
        let_decl("p", Some(ty("Point")), Some(new_object("Point", vec![string("one")]))),
    ]);

    assert_eq!(codes, vec![DiagnosticCode::BadConstructor]);
}

#[test]
fn missing_return_suppresses_tac() {
    let (driver, result) = compile(vec![func_decl(
        "broken",
        vec![param("n", ty("integer"))],
        Some(ty("integer")),
        vec![while_stmt(
            binary(AstBinaryOp::GreaterThan, ident("n"), int(0)),
            vec![ret(Some(ident("n")))],
        )],
    )]);

    assert!(result.is_err());
    assert!(driver.diagnostics().iter().any(|d| d.code() == DiagnosticCode::MissingReturn));
}

#[test]
fn arity_and_argument_types() {
    let double = || {
        func_decl("double", vec![param("n", ty("integer"))], Some(ty("integer")), vec![ret(Some(binary(
            AstBinaryOp::Multiply,
            ident("n"),
            int(2),
        )))])
    };

    let codes = compile_expecting_errors(vec![double(), expr_stmt(call(ident("double"), vec![]))]);
    assert_eq!(codes, vec![DiagnosticCode::ArityMismatch]);

    let codes = compile_expecting_errors(vec![double(), expr_stmt(call(ident("double"), vec![boolean(true)]))]);
    assert_eq!(codes, vec![DiagnosticCode::TypeMismatch]);
}

#[test]
fn cyclic_inheritance_is_rejected() {
    let codes = compile_expecting_errors(vec![
        class_decl("A", Some("B"), vec![]),
        class_decl("B", Some("A"), vec![]),
    ]);

    // Each class closes the cycle from its own declaration.
    assert!(codes.iter().all(|code| *code == DiagnosticCode::TypeMismatch));
    assert!(!codes.is_empty());
}

#[test]
fn incompatible_override_is_rejected() {
    let codes = compile_expecting_errors(vec![
        class_decl(
            "Animal",
            None,
            vec![method("speak", vec![], Some(ty("integer")), vec![ret(Some(int(0)))])],
        ),
        class_decl(
            "Dog",
            Some("Animal"),
            vec![method("speak", vec![], Some(ty("string")), vec![ret(Some(string("woof")))])],
        ),
    ]);

    assert_eq!(codes, vec![DiagnosticCode::TypeMismatch]);
}

#[test]
fn this_outside_a_method() {
    let codes = compile_expecting_errors(vec![print(this())]);
    assert_eq!(codes, vec![DiagnosticCode::UnknownSymbol]);
}

#[test]
fn continue_inside_a_switch_needs_an_outer_loop() {
    let codes = compile_expecting_errors(vec![
        let_decl("x", Some(ty("integer")), Some(int(1))),
        switch(ident("x"), vec![(int(1), vec![continue_stmt()])], None),
    ]);
    assert_eq!(codes, vec![DiagnosticCode::UnboundBreakContinue]);

    // Inside a loop the same switch is fine: `continue` resolves past the switch frame.
    let (driver, result) = compile(vec![
        let_decl("x", Some(ty("integer")), Some(int(1))),
        while_stmt(
            binary(AstBinaryOp::LessThan, ident("x"), int(3)),
            vec![
                assign(ident("x"), binary(AstBinaryOp::Add, ident("x"), int(1))),
                switch(ident("x"), vec![(int(1), vec![continue_stmt()])], None),
            ],
        ),
    ]);
    assert!(!driver.has_error_diagnostics());
    assert!(result.is_ok());
}

#[test]
fn heterogeneous_array_literals() {
    let codes = compile_expecting_errors(vec![let_decl(
        "a",
        Some(array_ty(ty("integer"))),
        Some(array_literal(vec![int(1), string("two")])),
    )]);
    assert_eq!(codes, vec![DiagnosticCode::TypeMismatch]);
}
