// Copyright 2025-2026 Neil Henderson
//
//! The `peephole` module applies local rewrites over adjacent TAC instructions.
//!
//! Three rules run to a fixpoint per function:
//!
//! 1. `goto L` immediately followed by `label L:` deletes the `goto`.
//! 2. `ifFalse t goto L1; goto L2; label L1:` fuses into `if t goto L2`.
//! 3. A `move` into a temporary that is never read afterwards is deleted.
//!
//! Rule 3 deletes a move only when its destination temp is read nowhere in the whole function, so it
//! stays sound across loop back-edges and the two-writer result temps of the short-circuit shapes.
//! The pass is idempotent.

use std::collections::HashSet;

use super::tac::{TacFunction, TacInstruction, TacOperand, TacProgram};

/// Runs the peephole pass over every function of the program.
pub fn run(program: &mut TacProgram) {
    for function in &mut program.functions {
        run_function(function);
    }
}

fn run_function(function: &mut TacFunction) {
    loop {
        let mut changed = false;
        changed |= remove_jumps_to_next(function);
        changed |= fuse_branch_over_goto(function);
        changed |= remove_dead_temp_moves(function);
        if !changed {
            break;
        }
    }
}

/// Rule 1: delete `goto L` when the next instruction is `label L:`.
fn remove_jumps_to_next(function: &mut TacFunction) -> bool {
    let instructions = &mut function.instructions;
    let mut changed = false;
    let mut index = 0;

    while index + 1 < instructions.len() {
        let redundant = matches!(
            (&instructions[index], &instructions[index + 1]),
            (TacInstruction::Goto { label }, TacInstruction::Label { name }) if label == name
        );

        if redundant {
            instructions.remove(index);
            changed = true;
        } else {
            index += 1;
        }
    }

    changed
}

/// Rule 2: fuse `ifFalse t goto L1; goto L2; label L1:` into `if t goto L2; label L1:`.
fn fuse_branch_over_goto(function: &mut TacFunction) -> bool {
    let instructions = &mut function.instructions;
    let mut changed = false;
    let mut index = 0;

    while index + 2 < instructions.len() {
        let fusable = matches!(
            (&instructions[index], &instructions[index + 1], &instructions[index + 2]),
            (
                TacInstruction::IfFalse { label: branch_target, .. },
                TacInstruction::Goto { label: goto_target },
                TacInstruction::Label { name },
            ) if branch_target == name && goto_target != name
        );

        if fusable {
            let TacInstruction::Goto { label: goto_target } = instructions.remove(index + 1) else {
                unreachable!("Matched above");
            };
            let TacInstruction::IfFalse { cond, .. } = instructions[index].clone() else {
                unreachable!("Matched above");
            };
            instructions[index] = TacInstruction::IfGoto { cond, label: goto_target };
            changed = true;
        }

        index += 1;
    }

    changed
}

/// Rule 3: delete `move x, tN` when `tN` is never read.
fn remove_dead_temp_moves(function: &mut TacFunction) -> bool {
    let mut read_temps: HashSet<usize> = HashSet::new();
    for instruction in &function.instructions {
        collect_read_temps(instruction, &mut read_temps);
    }

    let before = function.instructions.len();
    function.instructions.retain(|instruction| match instruction {
        TacInstruction::Move { dst: TacOperand::Temp(index), .. } => read_temps.contains(index),
        _ => true,
    });

    function.instructions.len() != before
}

fn collect_read_temps(instruction: &TacInstruction, read: &mut HashSet<usize>) {
    let mut source = |operand: &TacOperand| {
        if let TacOperand::Temp(index) = operand {
            read.insert(*index);
        }
    };

    match instruction {
        TacInstruction::Binary { a, b, .. } => {
            source(a);
            source(b);
        }
        TacInstruction::Unary { a, .. } => source(a),
        TacInstruction::Move { src, .. } => source(src),
        TacInstruction::IfGoto { cond, .. } | TacInstruction::IfFalse { cond, .. } => source(cond),
        TacInstruction::Param { value } | TacInstruction::Print { value } => source(value),
        TacInstruction::Call { function, .. } => {
            // A call through a temporary names it textually, e.g. `call t3, 1`.
            if let Some(index) = function.strip_prefix('t').and_then(|rest| rest.parse::<usize>().ok()) {
                read.insert(index);
            }
        }
        TacInstruction::Ret { value: Some(value) } => source(value),
        TacInstruction::GetField { object, .. } => source(object),
        TacInstruction::SetField { object, value, .. } => {
            source(object);
            source(value);
        }
        TacInstruction::NewArray { size, .. } => source(size),
        TacInstruction::ArrayLoad { array, index, .. } => {
            source(array);
            source(index);
        }
        TacInstruction::ArrayStore { array, index, value } => {
            source(array);
            source(index);
            source(value);
        }
        TacInstruction::Label { .. }
        | TacInstruction::Goto { .. }
        | TacInstruction::Ret { value: None }
        | TacInstruction::New { .. } => {}
    }
}
