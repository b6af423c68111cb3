// Copyright 2025-2026 Neil Henderson
//
//! The `types` module defines the Compiscript type universe and its compatibility predicates.

use std::fmt;

/// A Compiscript type.
///
/// Primitives compare by tag, arrays by element type, and classes by name only. Class members and
/// parents live in the symbol table, not in the type itself, so type values stay cheap to clone and
/// inheritance chains cannot form ownership cycles.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Int,
    Float,
    Bool,
    String,
    Null,
    Void,
    Array(Box<Type>),
    Class(String),
    Function { params: Vec<Type>, return_type: Box<Type> },
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "integer"),
            Type::Float => write!(f, "float"),
            Type::Bool => write!(f, "boolean"),
            Type::String => write!(f, "string"),
            Type::Null => write!(f, "null"),
            Type::Void => write!(f, "void"),
            Type::Array(elem) => write!(f, "{elem}[]"),
            Type::Class(name) => write!(f, "{name}"),
            Type::Function { params, return_type } => {
                write!(f, "fn(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, "): {return_type}")
            }
        }
    }
}

impl Type {
    /// Is this `integer` or `float`?
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    /// Can this type be compared with `< <= > >=`?
    pub fn is_comparable_ordered(&self) -> bool {
        matches!(self, Type::Int | Type::Float | Type::String)
    }

    /// Is this a reference type, i.e. one that `null` can bind to?
    pub fn is_reference(&self) -> bool {
        matches!(self, Type::Array(_) | Type::Class(_))
    }

    /// Is this one of the primitive types?
    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Int | Type::Float | Type::Bool | Type::String | Type::Null | Type::Void)
    }
}

/// Access to the class inheritance graph, implemented by the symbol table.
pub trait ClassHierarchy {
    /// The declared parent of `class`, if any.
    fn parent_of(&self, class: &str) -> Option<&str>;
}

/// Does class `derived` transitively extend class `base`?
///
/// Walks the parent chain by name. The walk is bounded by the number of distinct parents seen, so a
/// cyclic chain (diagnosed separately) cannot loop forever.
pub fn extends(derived: &str, base: &str, classes: &dyn ClassHierarchy) -> bool {
    let mut seen = vec![derived];
    let mut current = derived;
    while let Some(parent) = classes.parent_of(current) {
        if parent == base {
            return true;
        }
        if seen.contains(&parent) {
            return false;
        }
        seen.push(parent);
        current = parent;
    }
    false
}

/// May a value of type `from` be stored where a `to` is expected?
///
/// True when the types are identical, when an `integer` widens to `float`, when `null` binds to a
/// reference type, or when `from` is a class transitively extending the class `to`. An empty array
/// literal has type `null[]` and is storable into any array.
pub fn assignable(from: &Type, to: &Type, classes: &dyn ClassHierarchy) -> bool {
    if from == to {
        return true;
    }

    match (from, to) {
        (Type::Int, Type::Float) => true,
        (Type::Null, other) => other.is_reference(),
        (Type::Array(from_elem), Type::Array(_)) => **from_elem == Type::Null,
        (Type::Class(derived), Type::Class(base)) => extends(derived, base, classes),
        _ => false,
    }
}

/// The common type of a numeric binary operation, or `None` when either side is non-numeric.
///
/// Promotion is eager: any mixed `integer`/`float` pair yields `float`.
pub fn promote_numeric(lhs: &Type, rhs: &Type) -> Option<Type> {
    if !lhs.is_numeric() || !rhs.is_numeric() {
        return None;
    }

    if *lhs == Type::Float || *rhs == Type::Float { Some(Type::Float) } else { Some(Type::Int) }
}

/// The result type of a relational comparison (`< <= > >=`), or `None` when the operands are not an
/// ordered, mutually comparable pair. Numeric operands mix under promotion; strings compare only with
/// strings.
pub fn unify_relational(lhs: &Type, rhs: &Type) -> Option<Type> {
    if !lhs.is_comparable_ordered() || !rhs.is_comparable_ordered() {
        return None;
    }

    match (lhs, rhs) {
        (Type::String, Type::String) => Some(Type::Bool),
        (Type::String, _) | (_, Type::String) => None,
        _ => Some(Type::Bool),
    }
}

/// May `==` / `!=` compare these operands?
///
/// Both sides must share a promoted domain, or one must be `null` with the other a reference type.
pub fn equality_compatible(lhs: &Type, rhs: &Type, classes: &dyn ClassHierarchy) -> bool {
    if lhs == rhs {
        return true;
    }

    if promote_numeric(lhs, rhs).is_some() {
        return true;
    }

    match (lhs, rhs) {
        (Type::Null, other) | (other, Type::Null) => other.is_reference(),
        (Type::Class(a), Type::Class(b)) => extends(a, b, classes) || extends(b, a, classes),
        _ => false,
    }
}

/// The join of two mutually assignable types, used for the ternary operator.
pub fn join(lhs: &Type, rhs: &Type, classes: &dyn ClassHierarchy) -> Option<Type> {
    if lhs == rhs {
        return Some(lhs.clone());
    }

    if let Some(promoted) = promote_numeric(lhs, rhs) {
        return Some(promoted);
    }

    if assignable(lhs, rhs, classes) {
        return Some(rhs.clone());
    }
    if assignable(rhs, lhs, classes) {
        return Some(lhs.clone());
    }

    None
}
