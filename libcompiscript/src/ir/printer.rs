// Copyright 2025-2026 Neil Henderson
//
//! The `printer` module renders TAC programs in the textual format consumed by downstream backends.
//!
//! One function per `.func ... .endfunc` block, instructions one per line with a two-space indent.
//! This text is the sole contract with consumers such as the MIPS backend.

use std::fmt;

use super::tac::{TacFunction, TacProgram};

impl fmt::Display for TacFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".func {}(", self.name)?;
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        writeln!(f, ") : {}", self.return_type)?;

        writeln!(f, "  .locals {}", self.locals_count)?;

        for instruction in &self.instructions {
            writeln!(f, "  {instruction}")?;
        }

        write!(f, ".endfunc")
    }
}

impl fmt::Display for TacProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, function) in self.functions.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
                writeln!(f)?;
            }
            write!(f, "{function}")?;
        }
        writeln!(f)
    }
}
