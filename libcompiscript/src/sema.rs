// Copyright 2025-2026 Neil Henderson
//
//! The `sema` module is responsible for semantic analysis of the parse tree produced by the parser.
//!
//! The checker walks the tree twice per scope: a declaration pass collects function and class
//! signatures so forward references and mutual recursion resolve, then a body pass type-checks
//! statements and expressions in source order. After checking, a return-path pass verifies that every
//! non-void function returns on all paths and warns about unreachable statements.

pub mod symbol_table;
pub mod types;

mod checker;
mod expr;
mod return_paths;


pub use checker::SemanticChecker;
pub use return_paths::{block_must_return, statement_must_return};

use std::collections::HashMap;

use crate::compiler_driver::Driver;
use crate::parser::{AstNodeId, AstProgram};

use symbol_table::SymbolTable;
use types::Type;

/// The result of semantic analysis, consumed by the TAC generator.
///
/// The parse tree itself is never mutated; analysis records everything the generator needs in side
/// tables keyed by node id.
#[derive(Debug)]
pub struct Analysis {
    /// The symbol table. Its scope frames persist so classes and functions resolve after checking.
    pub symbols: SymbolTable,

    /// The resolved type of every expression node (and of each variable declaration).
    pub node_types: HashMap<AstNodeId, Type>,

    /// The function-unique storage name for every resolved variable reference and declaration.
    /// Shadowing declarations receive suffixed names (`x`, `x.1`, ...) so each binding gets its own
    /// storage slot in the generated TAC.
    pub resolved_names: HashMap<AstNodeId, String>,
}

/// Analyzes the parse tree, recording diagnostics on the driver.
///
/// All errors are collected; the checker never stops at the first. The caller decides whether to
/// continue to TAC generation by inspecting [Driver::has_error_diagnostics].
pub fn analyze(program: &AstProgram, driver: &mut Driver) -> Analysis {
    let mut checker = SemanticChecker::new();
    checker.check_program(program, driver);

    return_paths::warn_unreachable(&program.0, driver);

    checker.into_analysis()
}
