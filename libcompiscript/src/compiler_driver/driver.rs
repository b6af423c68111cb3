// Copyright 2025-2026 Neil Henderson
//
//! The `driver` module defines `Driver`, which collects diagnostics across a single compile.

use std::io::Write;

use super::diagnostics::{Diagnostic, Severity};

/// The compiler driver.
///
/// A driver lives for exactly one compile. Every stage appends its diagnostics here in emission
/// order; no stage ever aborts on the first error.
#[derive(Debug, Default)]
pub struct Driver {
    diagnostics: Vec<Diagnostic>,
}

impl Driver {
    /// Creates a new compiler driver.
    pub fn new() -> Self {
        Self { diagnostics: Vec::new() }
    }

    /// Adds a diagnostic (error or warning).
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// All diagnostics, in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Are there any error diagnostics?
    pub fn has_error_diagnostics(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity() == Severity::Error)
    }

    /// The number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity() == Severity::Error).count()
    }

    /// The number of warning diagnostics.
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity() == Severity::Warning).count()
    }

    /// The process exit code for this compile: `0` on success, `1` when semantic errors were emitted.
    pub fn exit_code(&self) -> u8 {
        if self.has_error_diagnostics() { 1 } else { 0 }
    }

    /// Prints all diagnostics to `stderr`, in emission order.
    pub fn print_diagnostics(&self) {
        self.print_diagnostics_to_buffer(std::io::stderr());
    }

    /// Prints all diagnostics to the given `buffer`, in emission order.
    pub fn print_diagnostics_to_buffer(&self, mut buffer: impl Write) {
        for diagnostic in &self.diagnostics {
            let _ = writeln!(buffer, "{diagnostic}");
        }
    }
}
