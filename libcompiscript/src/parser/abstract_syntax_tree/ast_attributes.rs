// Copyright 2025-2026 Neil Henderson
//
//! The `ast_attributes` module defines the [AstNodeId] type.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::ICE;

/// A unique identifier for an AST node.
///
/// The parser stamps every expression (and every declaration that introduces a name) with a node id.
/// Semantic analysis keys its side tables — resolved types and unique names — by node id, so the tree
/// itself stays immutable across stages.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AstNodeId(u32);

impl fmt::Display for AstNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for AstNodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl AstNodeId {
    /// Creates a new, unique `AstNodeId`.
    pub fn new() -> Self {
        static NEXT_ID: AtomicU32 = AtomicU32::new(1);

        let next_id = NEXT_ID.fetch_add(1, Ordering::SeqCst);

        if next_id == u32::MAX {
            ICE!("Exhausted node ids");
        }

        Self(next_id)
    }
}
