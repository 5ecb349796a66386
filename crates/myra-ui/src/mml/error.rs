use std::fmt;

use myra_mml::ParseError;

/// Error raised while loading markup into an object tree.
#[derive(Debug, Clone, PartialEq)]
pub enum MmlError {
    /// A child tag names neither a property of its parent nor a known type.
    UnresolvedTag { tag: String },
    /// An attribute could not be converted to its property's value kind.
    InvalidValue { property: String, value: String, expected: String },
    /// The slot exists but cannot be assigned.
    ReadOnly { property: String },
    /// The constructed child is not a type the slot accepts.
    IncompatibleChild { parent: String, property: String, child: String },
    /// A type-named child was given to an object that holds no children.
    NotAContainer { parent: String, child: String },
    Parse(ParseError),
}

impl fmt::Display for MmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MmlError::UnresolvedTag { tag } => write!(f, "could not resolve tag '{tag}'"),
            MmlError::InvalidValue { property, value, expected } => {
                write!(f, "invalid value {value:?} for {property}: expected {expected}")
            }
            MmlError::ReadOnly { property } => write!(f, "property {property} is read-only"),
            MmlError::IncompatibleChild { parent, property, child } => {
                write!(f, "{parent}.{property} cannot hold a {child}")
            }
            MmlError::NotAContainer { parent, child } => {
                write!(f, "{parent} cannot contain child {child}")
            }
            MmlError::Parse(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for MmlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MmlError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for MmlError {
    fn from(e: ParseError) -> Self {
        MmlError::Parse(e)
    }
}
