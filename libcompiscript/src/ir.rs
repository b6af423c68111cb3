// Copyright 2025-2026 Neil Henderson
//
//! The `ir` module defines the Three-Address Code intermediate representation and the lowering from
//! the checked parse tree into it.

pub mod peephole;
pub mod tac;

mod emitter;
mod generator;
mod printer;


pub use emitter::Emitter;
pub use generator::generate;
pub use tac::{TacFunction, TacInstruction, TacLiteral, TacOperand, TacProgram};
