// Copyright 2025-2026 Neil Henderson
//
//! The `tac` module defines the types of the Three-Address Code intermediate representation.

use std::fmt;

/// A literal operand value.
#[derive(Debug, Clone, PartialEq)]
pub enum TacLiteral {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Null,
    Void, // The unit result of a void call used in value position.
}

impl fmt::Display for TacLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TacLiteral::Int(value) => write!(f, "#{value}"),
            TacLiteral::Float(value) => {
                // Keep a decimal point so a float literal never reads as an integer one.
                let text = format!("{value}");
                if text.contains('.') || text.contains('e') || text.contains("inf") || text.contains("NaN") {
                    write!(f, "#{text}")
                } else {
                    write!(f, "#{text}.0")
                }
            }
            TacLiteral::Str(value) => {
                write!(f, "#\"")?;
                for ch in value.chars() {
                    match ch {
                        '\\' => write!(f, "\\\\")?,
                        '"' => write!(f, "\\\"")?,
                        other => write!(f, "{other}")?,
                    }
                }
                write!(f, "\"")
            }
            TacLiteral::Bool(true) => write!(f, "#true"),
            TacLiteral::Bool(false) => write!(f, "#false"),
            TacLiteral::Null => write!(f, "#null"),
            TacLiteral::Void => write!(f, "#void"),
        }
    }
}

/// An instruction operand.
///
/// The textual encoding uses a single-character prefix discriminator: `tN` for temporaries, `%name`
/// for locals and parameters, `@NAME` for globals, and `#lit` for literals.
#[derive(Debug, Clone, PartialEq)]
pub enum TacOperand {
    Temp(usize),
    Local(String),
    Global(String),
    Literal(TacLiteral),
}

impl fmt::Display for TacOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TacOperand::Temp(index) => write!(f, "t{index}"),
            TacOperand::Local(name) => write!(f, "%{name}"),
            TacOperand::Global(name) => write!(f, "@{name}"),
            TacOperand::Literal(literal) => write!(f, "{literal}"),
        }
    }
}

impl TacOperand {
    /// Is this operand a temporary?
    pub fn is_temp(&self) -> bool {
        matches!(self, TacOperand::Temp(_))
    }

    /// Is this operand a literal?
    pub fn is_literal(&self) -> bool {
        matches!(self, TacOperand::Literal(_))
    }
}

/// Binary operator, spelled as in the source.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TacBinaryOp {
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
}

#[rustfmt::skip]
impl fmt::Display for TacBinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TacBinaryOp::Add                  => write!(f, "+"),
            TacBinaryOp::Subtract             => write!(f, "-"),
            TacBinaryOp::Multiply             => write!(f, "*"),
            TacBinaryOp::Divide               => write!(f, "/"),
            TacBinaryOp::Remainder            => write!(f, "%"),
            TacBinaryOp::EqualTo              => write!(f, "=="),
            TacBinaryOp::NotEqualTo           => write!(f, "!="),
            TacBinaryOp::LessThan             => write!(f, "<"),
            TacBinaryOp::GreaterThan          => write!(f, ">"),
            TacBinaryOp::LessThanOrEqualTo    => write!(f, "<="),
            TacBinaryOp::GreaterThanOrEqualTo => write!(f, ">="),
        }
    }
}

/// Unary operator.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TacUnaryOp {
    Negate,
    LogicalNot,
}

impl fmt::Display for TacUnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TacUnaryOp::Negate => write!(f, "neg"),
            TacUnaryOp::LogicalNot => write!(f, "not"),
        }
    }
}

/// A TAC instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum TacInstruction {
    Binary { op: TacBinaryOp, a: TacOperand, b: TacOperand, dst: TacOperand },
    Unary { op: TacUnaryOp, a: TacOperand, dst: TacOperand },
    Move { src: TacOperand, dst: TacOperand },
    Label { name: String },
    Goto { label: String },
    IfGoto { cond: TacOperand, label: String },
    IfFalse { cond: TacOperand, label: String },
    Param { value: TacOperand },
    Call { function: String, arg_count: usize, dst: Option<TacOperand> },
    Ret { value: Option<TacOperand> },
    New { class_name: String, dst: TacOperand },
    GetField { object: TacOperand, field: String, dst: TacOperand },
    SetField { object: TacOperand, field: String, value: TacOperand },
    NewArray { element_type: String, size: TacOperand, dst: TacOperand },
    ArrayLoad { array: TacOperand, index: TacOperand, dst: TacOperand },
    ArrayStore { array: TacOperand, index: TacOperand, value: TacOperand },
    Print { value: TacOperand },
}

impl TacInstruction {
    /// Is this a terminal instruction, after which fall-through emission is suppressed?
    pub fn is_terminal(&self) -> bool {
        match self {
            TacInstruction::Goto { .. } | TacInstruction::Ret { .. } => true,
            TacInstruction::IfGoto { cond, .. } => *cond == TacOperand::Literal(TacLiteral::Bool(true)),
            _ => false,
        }
    }
}

impl fmt::Display for TacInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TacInstruction::Binary { op, a, b, dst } => write!(f, "{dst} = {a} {op} {b}"),
            TacInstruction::Unary { op, a, dst } => write!(f, "{dst} = {op} {a}"),
            TacInstruction::Move { src, dst } => write!(f, "move {src}, {dst}"),
            TacInstruction::Label { name } => write!(f, "label {name}:"),
            TacInstruction::Goto { label } => write!(f, "goto {label}"),
            TacInstruction::IfGoto { cond, label } => write!(f, "if {cond} goto {label}"),
            TacInstruction::IfFalse { cond, label } => write!(f, "ifFalse {cond} goto {label}"),
            TacInstruction::Param { value } => write!(f, "param {value}"),
            TacInstruction::Call { function, arg_count, dst: Some(dst) } => {
                write!(f, "call {function}, {arg_count} -> {dst}")
            }
            TacInstruction::Call { function, arg_count, dst: None } => write!(f, "call {function}, {arg_count}"),
            TacInstruction::Ret { value: Some(value) } => write!(f, "ret {value}"),
            TacInstruction::Ret { value: None } => write!(f, "ret"),
            TacInstruction::New { class_name, dst } => write!(f, "{dst} = new {class_name}"),
            TacInstruction::GetField { object, field, dst } => write!(f, "{dst} = getf {object}, \"{field}\""),
            TacInstruction::SetField { object, field, value } => write!(f, "setf {object}, \"{field}\", {value}"),
            TacInstruction::NewArray { element_type, size, dst } => write!(f, "{dst} = newarr {element_type}, {size}"),
            TacInstruction::ArrayLoad { array, index, dst } => write!(f, "{dst} = aload {array}, {index}"),
            TacInstruction::ArrayStore { array, index, value } => write!(f, "astore {array}, {index}, {value}"),
            TacInstruction::Print { value } => write!(f, "print {value}"),
        }
    }
}

/// A function in the TAC program.
#[derive(Debug)]
pub struct TacFunction {
    pub name: String,
    pub params: Vec<String>,
    pub return_type: String, // Nominal type name, e.g. "integer" or "void".
    pub locals_count: usize,
    pub instructions: Vec<TacInstruction>,
}

impl TacFunction {
    /// Creates a new, empty TAC function.
    pub fn new(name: impl Into<String>, params: Vec<String>, return_type: impl Into<String>) -> Self {
        Self { name: name.into(), params, return_type: return_type.into(), locals_count: 0, instructions: Vec::new() }
    }
}

/// An ordered list of TAC functions: the declared functions and methods in source order, then the
/// entry function for top-level statements if any exist.
#[derive(Debug, Default)]
pub struct TacProgram {
    pub functions: Vec<TacFunction>,
}

impl TacProgram {
    /// Creates an empty TAC program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a function to the program.
    pub fn add(&mut self, function: TacFunction) {
        self.functions.push(function);
    }

    /// Renders the program in the textual TAC format.
    pub fn dump(&self) -> String {
        format!("{self}")
    }
}
