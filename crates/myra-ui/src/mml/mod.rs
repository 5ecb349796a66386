//! Reflection-driven serialization between object trees and MML markup.
//!
//! Types describe their properties once ([`Describe`]); the save and load
//! contexts walk those tables. Simple properties map to attributes, composite
//! properties whose type belongs to an allowed family map to child elements,
//! and type-named children attach through the parent's [`ParentRole`].

pub mod context;
pub mod error;
pub mod load;
pub mod reflect;
pub mod registry;
pub mod save;
pub mod value;

pub use context::{classify, PropertyKind, PROJECT_FAMILIES};
pub use error::MmlError;
pub use load::{LoadConfig, LoadContext, ObjectCreator};
pub use reflect::{
    downcast, properties_of, Describe, ParentRole, PropertyMeta, Reflect, Slot, TypeInfo, TypeRef, ValueType,
};
pub use registry::{Constructor, TypeRegistry};
pub use save::{has_default_value, SaveConfig, SaveContext, SerializePredicate};
pub use value::{format_value, parse_value, MmlEnum, SimpleType, Value};
