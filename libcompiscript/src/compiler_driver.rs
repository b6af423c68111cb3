// Copyright 2025-2026 Neil Henderson
//
//! The `compiler_driver` module orchestrates the compilation stages.
//!
//! The pipeline is synchronous and single-threaded: the checker walks the parse tree and records
//! diagnostics on the [Driver]; if no errors were emitted, the TAC generator lowers the tree and the
//! peephole pass cleans up the result. The CLI collaborator owns file I/O and maps
//! [Driver::exit_code] / [DriverError] onto process exit codes.

mod diagnostics;
mod driver;

pub use diagnostics::{Diagnostic, DiagnosticCode, Severity};
pub use driver::Driver;

use thiserror::Error;

use crate::ir::{self, TacProgram};
use crate::parser::AstProgram;
use crate::sema;

/// An error returned by the compiler driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// Semantic analysis emitted one or more errors; see the driver's diagnostics.
    #[error("compilation failed with {0} error(s)")]
    CompilerFailed(usize),
}

/// Compiles a parse tree to a TAC program.
///
/// Diagnostics accumulate on the `driver` in emission order. When any error diagnostic exists after
/// checking, TAC generation is skipped and `DriverError::CompilerFailed` is returned; warnings alone
/// do not fail the compile.
pub fn compile(program: &AstProgram, driver: &mut Driver) -> Result<TacProgram, DriverError> {
    let analysis = sema::analyze(program, driver);

    if driver.has_error_diagnostics() {
        return Err(DriverError::CompilerFailed(driver.error_count()));
    }

    let mut tac = ir::generate(program, &analysis);
    ir::peephole::run(&mut tac);

    Ok(tac)
}
