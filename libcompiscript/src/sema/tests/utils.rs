// Copyright 2025-2026 Neil Henderson

//! Builders for constructing parse trees in sema unit tests.

use crate::compiler_driver::{DiagnosticCode, Driver};
use crate::core::SourceLocation;
use crate::parser::{
    AstBinaryOp, AstBlock, AstExpression, AstFunctionDeclaration, AstLiteral, AstNodeId, AstParameter, AstProgram,
    AstStatement, AstTypeName, AstVariableDeclaration,
};
use crate::sema::{self, Analysis};

pub fn lit_int(value: i64) -> AstExpression {
    AstExpression::Literal { node_id: AstNodeId::new(), value: AstLiteral::Int(value), loc: SourceLocation::none() }
}

pub fn lit_str(value: &str) -> AstExpression {
    AstExpression::Literal {
        node_id: AstNodeId::new(),
        value: AstLiteral::Str(value.to_string()),
        loc: SourceLocation::none(),
    }
}

pub fn lit_bool(value: bool) -> AstExpression {
    AstExpression::Literal { node_id: AstNodeId::new(), value: AstLiteral::Bool(value), loc: SourceLocation::none() }
}

pub fn ident(name: &str) -> AstExpression {
    AstExpression::Identifier { node_id: AstNodeId::new(), name: name.to_string(), loc: SourceLocation::none() }
}

pub fn binary(op: AstBinaryOp, lhs: AstExpression, rhs: AstExpression) -> AstExpression {
    AstExpression::Binary {
        node_id: AstNodeId::new(),
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
        loc: SourceLocation::none(),
    }
}

pub fn named_type(name: &str) -> AstTypeName {
    AstTypeName::Named(name.to_string())
}

pub fn let_decl(name: &str, declared_type: Option<AstTypeName>, initializer: Option<AstExpression>) -> AstStatement {
    AstStatement::VarDecl(AstVariableDeclaration {
        node_id: AstNodeId::new(),
        name: name.to_string(),
        is_const: false,
        declared_type,
        initializer,
        loc: SourceLocation::none(),
    })
}

pub fn const_decl(name: &str, declared_type: Option<AstTypeName>, initializer: Option<AstExpression>) -> AstStatement {
    AstStatement::VarDecl(AstVariableDeclaration {
        node_id: AstNodeId::new(),
        name: name.to_string(),
        is_const: true,
        declared_type,
        initializer,
        loc: SourceLocation::none(),
    })
}

pub fn assign(name: &str, value: AstExpression) -> AstStatement {
    AstStatement::Assign { target: ident(name), value, loc: SourceLocation::none() }
}

pub fn ret(value: Option<AstExpression>) -> AstStatement {
    AstStatement::Return { value, loc: SourceLocation::none() }
}

pub fn if_stmt(condition: AstExpression, then_block: Vec<AstStatement>, else_block: Option<Vec<AstStatement>>) -> AstStatement {
    AstStatement::If {
        condition,
        then_block: AstBlock(then_block),
        else_block: else_block.map(AstBlock),
        loc: SourceLocation::none(),
    }
}

pub fn while_stmt(condition: AstExpression, body: Vec<AstStatement>) -> AstStatement {
    AstStatement::While { condition, body: AstBlock(body), loc: SourceLocation::none() }
}

pub fn func_decl(
    name: &str,
    params: Vec<(&str, AstTypeName)>,
    return_type: Option<AstTypeName>,
    body: Vec<AstStatement>,
) -> AstStatement {
    AstStatement::FuncDecl(AstFunctionDeclaration {
        node_id: AstNodeId::new(),
        name: name.to_string(),
        params: params
            .into_iter()
            .map(|(param_name, declared_type)| AstParameter {
                name: param_name.to_string(),
                declared_type,
                loc: SourceLocation::none(),
            })
            .collect(),
        return_type,
        body: AstBlock(body),
        loc: SourceLocation::none(),
    })
}

/// Runs semantic analysis over the statements and returns the driver and analysis result.
pub fn analyze(stmts: Vec<AstStatement>) -> (Driver, Analysis) {
    let program = AstProgram(stmts);
    let mut driver = Driver::new();
    let analysis = sema::analyze(&program, &mut driver);
    (driver, analysis)
}

/// The codes of all diagnostics recorded on the driver, in emission order.
pub fn diagnostic_codes(driver: &Driver) -> Vec<DiagnosticCode> {
    driver.diagnostics().iter().map(|d| d.code()).collect()
}
