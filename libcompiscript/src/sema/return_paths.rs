// Copyright 2025-2026 Neil Henderson
//
//! The `return_paths` module computes the must-return predicate over statement blocks and warns
//! about unreachable statements.

use crate::compiler_driver::{Diagnostic, DiagnosticCode, Driver};
use crate::parser::{AstClassMember, AstStatement};

/// Does every control-flow exit of this statement end in a `return`?
///
/// The predicate is structural: `while`/`for`/`foreach` never must-return because their condition
/// may be false on entry, while `do-while` must-returns when its body does (the body always runs).
/// A `switch` must-returns only when a `default` exists and every arm must-returns.
pub fn statement_must_return(stmt: &AstStatement) -> bool {
    match stmt {
        AstStatement::Return { .. } => true,

        AstStatement::Block(block) => block_must_return(&block.0),

        AstStatement::If { then_block, else_block, .. } => match else_block {
            Some(else_block) => block_must_return(&then_block.0) && block_must_return(&else_block.0),
            None => false,
        },

        AstStatement::DoWhile { body, .. } => block_must_return(&body.0),

        AstStatement::Switch { cases, default, .. } => match default {
            Some(default) => {
                cases.iter().all(|case| block_must_return(&case.body)) && block_must_return(default)
            }
            None => false,
        },

        _ => false,
    }
}

/// Does this statement sequence must-return? True when any statement in it must-returns; the
/// statements after the first such one are unreachable.
pub fn block_must_return(stmts: &[AstStatement]) -> bool {
    stmts.iter().any(statement_must_return)
}

/// Walks the whole tree and warns about every statement that follows a terminal one in its block.
pub fn warn_unreachable(stmts: &[AstStatement], driver: &mut Driver) {
    let mut terminal_seen = false;

    for stmt in stmts {
        if terminal_seen {
            driver.add_diagnostic(Diagnostic::warning(
                DiagnosticCode::DeadCode,
                "unreachable statement".to_string(),
                stmt.loc(),
            ));
            continue;
        }

        warn_unreachable_inside(stmt, driver);

        if is_terminal(stmt) {
            terminal_seen = true;
        }
    }
}

/// A statement after which the rest of the block cannot execute.
fn is_terminal(stmt: &AstStatement) -> bool {
    statement_must_return(stmt) || matches!(stmt, AstStatement::Break { .. } | AstStatement::Continue { .. })
}

fn warn_unreachable_inside(stmt: &AstStatement, driver: &mut Driver) {
    match stmt {
        AstStatement::Block(block) => warn_unreachable(&block.0, driver),

        AstStatement::If { then_block, else_block, .. } => {
            warn_unreachable(&then_block.0, driver);
            if let Some(else_block) = else_block {
                warn_unreachable(&else_block.0, driver);
            }
        }

        AstStatement::While { body, .. }
        | AstStatement::DoWhile { body, .. }
        | AstStatement::For { body, .. }
        | AstStatement::Foreach { body, .. } => warn_unreachable(&body.0, driver),

        AstStatement::Switch { cases, default, .. } => {
            for case in cases {
                warn_unreachable(&case.body, driver);
            }
            if let Some(default) = default {
                warn_unreachable(default, driver);
            }
        }

        AstStatement::FuncDecl(decl) => warn_unreachable(&decl.body.0, driver),

        AstStatement::ClassDecl(decl) => {
            for member in &decl.members {
                if let AstClassMember::Method(method) = member {
                    warn_unreachable(&method.body.0, driver);
                }
            }
        }

        _ => {}
    }
}
