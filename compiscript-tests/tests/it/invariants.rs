// Copyright 2025-2026 Neil Henderson

//! Program-level laws over generated TAC: operand and label well-formedness, determinism, peephole
//! idempotence, and const immutability.

use libcompiscript::compiler_driver::{self, Driver};
use libcompiscript::ir::{TacInstruction, TacOperand, peephole};
use libcompiscript::parser::{AstBinaryOp, AstProgram, AstStatement};

use crate::support::*;

/// A program exercising most lowering shapes: classes, arrays, loops, switch, short-circuit.
fn exercise_program() -> Vec<AstStatement> {
    vec![
        class_decl(
            "Counter",
            None,
            vec![
                field("v", ty("integer")),
                method("constructor", vec![param("s", ty("integer"))], None, vec![assign(
                    member(this(), "v"),
                    ident("s"),
                )]),
                method(
                    "inc",
                    vec![],
                    Some(ty("integer")),
                    vec![
                        assign(member(this(), "v"), binary(AstBinaryOp::Add, member(this(), "v"), int(1))),
                        ret(Some(member(this(), "v"))),
                    ],
                ),
            ],
        ),
        func_decl(
            "classify",
            vec![param("n", ty("integer"))],
            Some(ty("integer")),
            vec![
                switch(
                    ident("n"),
                    vec![(int(0), vec![ret(Some(int(100)))]), (int(1), vec![break_stmt()])],
                    Some(vec![ret(Some(int(-1)))]),
                ),
                ret(Some(ternary(
                    binary(
                        AstBinaryOp::LogicalAnd,
                        binary(AstBinaryOp::GreaterThan, ident("n"), int(0)),
                        binary(AstBinaryOp::LessThan, ident("n"), int(10)),
                    ),
                    int(1),
                    int(0),
                ))),
            ],
        ),
        let_decl("c", Some(ty("Counter")), Some(new_object("Counter", vec![int(5)]))),
        let_decl("a", Some(array_ty(ty("integer"))), Some(array_literal(vec![int(1), int(2), int(3)]))),
        foreach("x", ident("a"), vec![print(call(member(ident("c"), "inc"), vec![])), print(ident("x"))]),
        print(call(ident("classify"), vec![int(4)])),
    ]
}

#[test]
fn no_ghost_temps() {
    let (_, result) = compile(exercise_program());
    let program = result.expect("Clean compile");
    assert_no_ghost_temps(&program);
}

#[test]
fn labels_are_unique_and_targets_defined() {
    let (_, result) = compile(exercise_program());
    let program = result.expect("Clean compile");
    assert_labels_consistent(&program);
}

#[test]
fn generation_is_deterministic() {
    let (_, first) = compile(exercise_program());
    let (_, second) = compile(exercise_program());

    // Fresh trees with fresh node ids must produce byte-identical text.
    assert_eq!(first.expect("Clean compile").dump(), second.expect("Clean compile").dump());
}

#[test]
fn peephole_is_idempotent_on_whole_programs() {
    let (_, result) = compile(exercise_program());
    let mut program = result.expect("Clean compile");

    let once = program.dump();
    peephole::run(&mut program);
    assert_eq!(once, program.dump());
}

#[test]
fn const_bindings_are_never_written_after_initialization() {
    let program = AstProgram(vec![
        const_decl("k", Some(ty("integer")), Some(int(3))),
        let_decl("n", Some(ty("integer")), Some(binary(AstBinaryOp::Multiply, ident("k"), int(2)))),
        print(ident("n")),
    ]);

    let mut driver = Driver::new();
    let tac = compiler_driver::compile(&program, &mut driver).expect("Clean compile");

    let writes_to_k = tac.functions[0]
        .instructions
        .iter()
        .filter(|instruction| {
            matches!(
                instruction,
                TacInstruction::Move { dst: TacOperand::Local(name), .. } if name == "k"
            )
        })
        .count();

    // Exactly the initializing store, nothing else.
    assert_eq!(writes_to_k, 1);
}

#[test]
fn functions_are_emitted_in_source_order_with_main_last() {
    let (_, result) = compile(exercise_program());
    let program = result.expect("Clean compile");

    let names: Vec<&str> = program.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["Counter.constructor", "Counter.inc", "classify", "main"]);
}

#[test]
fn a_program_with_only_declarations_has_no_entry_function() {
    let (_, result) = compile(vec![func_decl("f", vec![], None, vec![ret(None)])]);
    let program = result.expect("Clean compile");

    let names: Vec<&str> = program.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["f"]);
}
