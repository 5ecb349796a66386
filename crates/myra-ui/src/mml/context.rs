use crate::mml::reflect::{PropertyMeta, TypeRef, ValueType};

/// Families a project serializes as nested elements.
pub const PROJECT_FAMILIES: &[&str] = &["Item", "ExportOptions", "Proportion"];

/// How a property is written.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PropertyKind {
    /// Written as an attribute.
    Simple,
    /// Written as child elements.
    Complex,
    /// Not written at all.
    Skipped,
}

/// Splits `meta` into simple, complex or skipped against the allowed `families`.
///
/// Every property falls into exactly one class. Composites whose declared
/// type belongs to no allowed family are skipped.
pub fn classify(meta: &PropertyMeta, families: &[&str]) -> PropertyKind {
    if meta.ignored {
        return PropertyKind::Skipped;
    }
    match meta.value_type {
        ValueType::Simple { .. } => PropertyKind::Simple,
        ValueType::Object(ty) | ValueType::List(ty) => {
            if is_serializable(ty, families) {
                PropertyKind::Complex
            } else {
                log::trace!("skipping {} of type {}: not serializable", meta.name, ty.name);
                PropertyKind::Skipped
            }
        }
    }
}

pub fn is_serializable(ty: TypeRef, families: &[&str]) -> bool {
    ty.families.iter().any(|f| families.contains(f))
}
