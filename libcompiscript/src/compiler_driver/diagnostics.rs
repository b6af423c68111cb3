// Copyright 2025-2026 Neil Henderson
//
//! The `diagnostics` module defines the errors and warnings emitted by the compiler.

use std::fmt;

use crate::core::SourceLocation;

/// The severity of a diagnostic.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

/// The stable code identifying a diagnostic.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DiagnosticCode {
    UnknownSymbol,
    DuplicateSymbol,
    TypeMismatch,
    NotNumeric,
    NotBoolean,
    NotComparable,
    AssignToConst,
    InvalidLValue,
    ArityMismatch,
    UnknownMember,
    MissingReturn,
    UnboundBreakContinue,
    DeadCode,
    BadConstructor,
}

impl DiagnosticCode {
    /// The string representation of the code.
    #[rustfmt::skip]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::UnknownSymbol        => "UnknownSymbol",
            DiagnosticCode::DuplicateSymbol      => "DuplicateSymbol",
            DiagnosticCode::TypeMismatch         => "TypeMismatch",
            DiagnosticCode::NotNumeric           => "NotNumeric",
            DiagnosticCode::NotBoolean           => "NotBoolean",
            DiagnosticCode::NotComparable        => "NotComparable",
            DiagnosticCode::AssignToConst        => "AssignToConst",
            DiagnosticCode::InvalidLValue        => "InvalidLValue",
            DiagnosticCode::ArityMismatch        => "ArityMismatch",
            DiagnosticCode::UnknownMember        => "UnknownMember",
            DiagnosticCode::MissingReturn        => "MissingReturn",
            DiagnosticCode::UnboundBreakContinue => "UnboundBreakContinue",
            DiagnosticCode::DeadCode             => "DeadCode",
            DiagnosticCode::BadConstructor       => "BadConstructor",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A diagnostic emitted by the compiler.
#[derive(Debug)]
pub struct Diagnostic {
    severity: Severity,
    code: DiagnosticCode,
    message: String,
    loc: SourceLocation,
}

impl Diagnostic {
    /// Creates an error diagnostic with the given code, message, and source location.
    pub fn error(code: DiagnosticCode, message: String, loc: SourceLocation) -> Self {
        Self { severity: Severity::Error, code, message, loc }
    }

    /// Creates a warning diagnostic with the given code, message, and source location.
    pub fn warning(code: DiagnosticCode, message: String, loc: SourceLocation) -> Self {
        Self { severity: Severity::Warning, code, message, loc }
    }

    /// The severity of the diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The diagnostic's stable code.
    pub fn code(&self) -> DiagnosticCode {
        self.code
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The source location the diagnostic refers to.
    pub fn loc(&self) -> SourceLocation {
        self.loc
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };

        if self.loc.is_none() {
            write!(f, "{severity}[{}]: {}", self.code, self.message)
        } else {
            write!(f, "{severity}[{}]: {} ({})", self.code, self.message, self.loc)
        }
    }
}
