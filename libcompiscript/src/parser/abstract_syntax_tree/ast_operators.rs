// Copyright 2025-2026 Neil Henderson
//
//! The `ast_operators` module defines the unary and binary operators of the Compiscript grammar.

use std::fmt;

/// Unary operator.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AstUnaryOp {
    Negate,     // -a
    LogicalNot, // !a
}

impl fmt::Display for AstUnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstUnaryOp::Negate => write!(f, "-"),
            AstUnaryOp::LogicalNot => write!(f, "!"),
        }
    }
}

/// Binary operator.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AstBinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    EqualTo,
    NotEqualTo,
    LessThan,
    GreaterThan,
    LessThanOrEqualTo,
    GreaterThanOrEqualTo,
    LogicalAnd,
    LogicalOr,
}

impl AstBinaryOp {
    /// Is this `+ - * / %`?
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            AstBinaryOp::Add
                | AstBinaryOp::Subtract
                | AstBinaryOp::Multiply
                | AstBinaryOp::Divide
                | AstBinaryOp::Remainder
        )
    }

    /// Is this `< <= > >=`?
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            AstBinaryOp::LessThan
                | AstBinaryOp::GreaterThan
                | AstBinaryOp::LessThanOrEqualTo
                | AstBinaryOp::GreaterThanOrEqualTo
        )
    }

    /// Is this `==` or `!=`?
    pub fn is_equality(&self) -> bool {
        matches!(self, AstBinaryOp::EqualTo | AstBinaryOp::NotEqualTo)
    }
}

#[rustfmt::skip]
impl fmt::Display for AstBinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstBinaryOp::Add                  => write!(f, "+"),
            AstBinaryOp::Subtract             => write!(f, "-"),
            AstBinaryOp::Multiply             => write!(f, "*"),
            AstBinaryOp::Divide               => write!(f, "/"),
            AstBinaryOp::Remainder            => write!(f, "%"),
            AstBinaryOp::EqualTo              => write!(f, "=="),
            AstBinaryOp::NotEqualTo           => write!(f, "!="),
            AstBinaryOp::LessThan             => write!(f, "<"),
            AstBinaryOp::GreaterThan          => write!(f, ">"),
            AstBinaryOp::LessThanOrEqualTo    => write!(f, "<="),
            AstBinaryOp::GreaterThanOrEqualTo => write!(f, ">="),
            AstBinaryOp::LogicalAnd           => write!(f, "&&"),
            AstBinaryOp::LogicalOr            => write!(f, "||"),
        }
    }
}
