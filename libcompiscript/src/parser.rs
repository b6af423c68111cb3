// Copyright 2025-2026 Neil Henderson
//
//! The `parser` module defines the Compiscript parse tree.
//!
//! Parsing itself is performed by the external grammar-driven parser, which constructs this tree and
//! hands it to [crate::compiler_driver::compile]. The compiler stages in this crate only ever walk the
//! tree; they never mutate it.

mod abstract_syntax_tree;

pub use abstract_syntax_tree::*;
