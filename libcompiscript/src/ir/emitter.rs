// Copyright 2025-2026 Neil Henderson
//
//! The `emitter` module defines [Emitter], which appends instructions to a function under
//! construction and provisions its temporaries and labels.

use super::tac::{TacFunction, TacInstruction, TacOperand};

/// Builds one [TacFunction], owning its temp and label counters.
///
/// Counters are per-function and monotonically increasing, so identical input trees always produce
/// identical operand and label names. Temporaries are single-assignment; loop indexes synthesized by
/// the generator use auxiliary locals instead.
#[derive(Debug)]
pub struct Emitter {
    pub function: TacFunction,
    next_temp: usize,
    next_label: usize,
    next_aux: usize,
}

impl Emitter {
    /// Creates an emitter for a new, empty function.
    pub fn new(function: TacFunction) -> Self {
        Self { function, next_temp: 0, next_label: 0, next_aux: 0 }
    }

    /// Returns a fresh temporary operand.
    pub fn new_temp(&mut self) -> TacOperand {
        let temp = TacOperand::Temp(self.next_temp);
        self.next_temp += 1;
        temp
    }

    /// Returns a fresh label name `L{n}`.
    pub fn new_label(&mut self) -> String {
        self.new_label_hinted("L")
    }

    /// Returns a fresh label name with the given hint prefix, e.g. `Lret0`.
    pub fn new_label_hinted(&mut self, hint: &str) -> String {
        let label = format!("{hint}{}", self.next_label);
        self.next_label += 1;
        label
    }

    /// Returns a fresh auxiliary local, used for synthesized mutable slots such as `foreach` indexes.
    /// The leading dot keeps the name disjoint from every source identifier.
    pub fn new_aux_local(&mut self, hint: &str) -> TacOperand {
        let local = TacOperand::Local(format!(".{hint}{}", self.next_aux));
        self.next_aux += 1;
        self.function.locals_count += 1;
        local
    }

    /// Appends an instruction to the function.
    pub fn emit(&mut self, instruction: TacInstruction) {
        self.function.instructions.push(instruction);
    }

    /// Is the most recently emitted instruction terminal? Used to suppress fall-through emission.
    pub fn last_is_terminal(&self) -> bool {
        self.function.instructions.last().is_some_and(TacInstruction::is_terminal)
    }
}
