use std::fmt;

use crate::Name;

/// Types, as written in a declaration or as computed by inference.
///
/// Type nodes are values: they own their component types directly and have
/// no children in the arena.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Float,
    Bool,
    Char,
    Str,
    Void,
    /// Not known or not decidable; never an error.
    Unknown,
    Pointer(Box<Type>),
    Reference(Box<Type>),
    Array(Box<Type>),
    List(Box<Type>),
    Set(Box<Type>),
    Dict(Box<Type>, Box<Type>),
    Tuple(Vec<Type>),
    User(Name),
    Generic { name: Name, args: Vec<Type> },
}

impl Type {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Type::Unknown)
    }

    /// The wider of two numeric types, `None` if either is not numeric.
    pub fn wider(&self, other: &Type) -> Option<Type> {
        match (self, other) {
            (Type::Int, Type::Int) => Some(Type::Int),
            (Type::Float | Type::Int, Type::Float) | (Type::Float, Type::Int) => Some(Type::Float),
            _ => None,
        }
    }

    /// Element type of an indexable container.
    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Array(item) | Type::List(item) | Type::Pointer(item) => Some(item),
            Type::Dict(_, value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => f.write_str("int"),
            Type::Float => f.write_str("float"),
            Type::Bool => f.write_str("bool"),
            Type::Char => f.write_str("char"),
            Type::Str => f.write_str("string"),
            Type::Void => f.write_str("void"),
            Type::Unknown => f.write_str("unknown"),
            Type::Pointer(inner) => write!(f, "*{inner}"),
            Type::Reference(inner) => write!(f, "&{inner}"),
            Type::Array(inner) => write!(f, "[{inner}]"),
            Type::List(inner) => write!(f, "list<{inner}>"),
            Type::Set(inner) => write!(f, "set<{inner}>"),
            Type::Dict(key, value) => write!(f, "dict<{key}, {value}>"),
            Type::Tuple(items) => {
                f.write_str("(")?;
                write_list(f, items)?;
                f.write_str(")")
            }
            Type::Generic { name, args } => {
                write!(f, "{name}<")?;
                write_list(f, args)?;
                f.write_str(">")
            }
            Type::User(name) => write!(f, "{name}"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Type]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
