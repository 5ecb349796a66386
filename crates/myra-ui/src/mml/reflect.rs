use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::mml::error::MmlError;
use crate::mml::value::{SimpleType, Value};
use crate::widget::Widget;

// ── Declared types ────────────────────────────────────────────────────────

/// Static name and families of a property's declared element type.
///
/// Families stand in for the interfaces a type implements. A composite
/// property is serialized when one of its families is on the context's
/// allow-list.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: &'static str,
    pub families: &'static [&'static str],
}

impl TypeRef {
    pub const fn new(name: &'static str, families: &'static [&'static str]) -> Self {
        Self { name, families }
    }

    pub const fn of<T: Describe>() -> Self {
        Self { name: T::TYPE_NAME, families: T::FAMILIES }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValueType {
    Simple { kind: SimpleType, nullable: bool },
    Object(TypeRef),
    List(TypeRef),
}

/// How a loaded value reaches its slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Slot {
    /// A fresh value is constructed and assigned.
    Settable,
    /// The collection is read-only; loaded items are appended to it.
    Appendable,
    /// The object is read-only; it is loaded where it stands.
    InPlace,
}

/// Which property receives children named by type rather than by property.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParentRole {
    /// An ordered, appendable collection.
    Items(&'static str),
    /// A single content slot.
    Content(&'static str),
    /// The project root slot.
    Root(&'static str),
    Leaf,
}

impl ParentRole {
    pub fn property(self) -> Option<&'static str> {
        match self {
            ParentRole::Items(name) | ParentRole::Content(name) | ParentRole::Root(name) => Some(name),
            ParentRole::Leaf => None,
        }
    }
}

/// Type-erased description of one property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMeta {
    pub name: &'static str,
    pub value_type: ValueType,
    pub slot: Slot,
    /// Compiled-in default. Values equal to it are not saved.
    pub default: Option<Value>,
    /// Slash-separated path of the matching style value. A leading `/`
    /// starts at the stylesheet instead of the widget's style entry.
    pub style_path: Option<&'static str>,
    /// Excluded from markup altogether.
    pub ignored: bool,
}

// ── Typed property tables ─────────────────────────────────────────────────

type GetObject<T> = fn(&T) -> Option<&dyn Reflect>;
type GetObjectMut<T> = fn(&mut T) -> Option<&mut dyn Reflect>;
type SetObject<T> = fn(&mut T, Box<dyn Reflect>) -> Option<()>;

enum Accessor<T> {
    Simple {
        get: fn(&T) -> Value,
        set: fn(&mut T, Value) -> Option<()>,
    },
    Object {
        get: GetObject<T>,
        get_mut: GetObjectMut<T>,
        set: Option<SetObject<T>>,
    },
    List {
        items: fn(&T) -> Vec<&dyn Reflect>,
        append: SetObject<T>,
        clear: Option<fn(&mut T)>,
    },
}

struct Property<T> {
    meta: PropertyMeta,
    accessor: Accessor<T>,
}

/// Property table for `T`, built once through the chained registration calls.
///
/// Setters return `None` when handed a value of the wrong kind or a child of
/// the wrong type.
pub struct TypeInfo<T> {
    props: Vec<Property<T>>,
}

impl<T: 'static> TypeInfo<T> {
    pub fn new() -> Self {
        Self { props: Vec::new() }
    }

    fn push(mut self, meta: PropertyMeta, accessor: Accessor<T>) -> Self {
        self.props.push(Property { meta, accessor });
        self
    }

    fn meta(name: &'static str, value_type: ValueType, slot: Slot) -> PropertyMeta {
        PropertyMeta { name, value_type, slot, default: None, style_path: None, ignored: false }
    }

    pub fn simple(
        self,
        name: &'static str,
        kind: SimpleType,
        get: fn(&T) -> Value,
        set: fn(&mut T, Value) -> Option<()>,
    ) -> Self {
        let vt = ValueType::Simple { kind, nullable: false };
        self.push(Self::meta(name, vt, Slot::Settable), Accessor::Simple { get, set })
    }

    /// A simple property that may be empty (`Value::Null`).
    pub fn nullable(
        self,
        name: &'static str,
        kind: SimpleType,
        get: fn(&T) -> Value,
        set: fn(&mut T, Value) -> Option<()>,
    ) -> Self {
        let vt = ValueType::Simple { kind, nullable: true };
        self.push(Self::meta(name, vt, Slot::Settable), Accessor::Simple { get, set })
    }

    /// An object property assigned through `set`.
    pub fn object(
        self,
        name: &'static str,
        ty: TypeRef,
        get: GetObject<T>,
        get_mut: GetObjectMut<T>,
        set: SetObject<T>,
    ) -> Self {
        let accessor = Accessor::Object { get, get_mut, set: Some(set) };
        self.push(Self::meta(name, ValueType::Object(ty), Slot::Settable), accessor)
    }

    /// A read-only object property, loaded in place.
    pub fn object_in_place(
        self,
        name: &'static str,
        ty: TypeRef,
        get: GetObject<T>,
        get_mut: GetObjectMut<T>,
    ) -> Self {
        let accessor = Accessor::Object { get, get_mut, set: None };
        self.push(Self::meta(name, ValueType::Object(ty), Slot::InPlace), accessor)
    }

    /// A read-only collection; loading appends to it.
    pub fn list(
        self,
        name: &'static str,
        ty: TypeRef,
        items: fn(&T) -> Vec<&dyn Reflect>,
        append: SetObject<T>,
    ) -> Self {
        let accessor = Accessor::List { items, append, clear: None };
        self.push(Self::meta(name, ValueType::List(ty), Slot::Appendable), accessor)
    }

    /// A replaceable collection; loading clears it first.
    pub fn settable_list(
        self,
        name: &'static str,
        ty: TypeRef,
        items: fn(&T) -> Vec<&dyn Reflect>,
        append: SetObject<T>,
        clear: fn(&mut T),
    ) -> Self {
        let accessor = Accessor::List { items, append, clear: Some(clear) };
        self.push(Self::meta(name, ValueType::List(ty), Slot::Settable), accessor)
    }

    // Modifiers apply to the most recently registered property.

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        if let Some(p) = self.props.last_mut() {
            p.meta.default = Some(value.into());
        }
        self
    }

    pub fn style_path(mut self, path: &'static str) -> Self {
        if let Some(p) = self.props.last_mut() {
            p.meta.style_path = Some(path);
        }
        self
    }

    pub fn ignored(mut self) -> Self {
        if let Some(p) = self.props.last_mut() {
            p.meta.ignored = true;
        }
        self
    }

    /// Appends every property of `base`, e.g. the shared widget properties.
    pub fn inherit(mut self, base: TypeInfo<T>) -> Self {
        self.props.extend(base.props);
        self
    }

    /// Replaces the default of an inherited property.
    pub fn override_default(mut self, name: &str, value: impl Into<Value>) -> Self {
        if let Some(p) = self.props.iter_mut().find(|p| p.meta.name == name) {
            p.meta.default = Some(value.into());
        }
        self
    }

    fn find(&self, name: &str) -> Option<&Property<T>> {
        self.props.iter().find(|p| p.meta.name == name)
    }
}

impl<T: 'static> Default for TypeInfo<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Describe ──────────────────────────────────────────────────────────────

/// Implemented by every type that takes part in markup.
///
/// A blanket impl turns each `Describe` type into an object-safe [`Reflect`].
pub trait Describe: Any + Sized {
    /// Tag name used in markup and type resolution.
    const TYPE_NAME: &'static str;
    const FAMILIES: &'static [&'static str] = &[];
    const PARENT_ROLE: ParentRole = ParentRole::Leaf;

    fn describe() -> TypeInfo<Self>;

    /// Tag name of this instance, for types registered under several names.
    fn runtime_type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    /// Style the instance was given, if it is styleable.
    fn style_name_of(&self) -> Option<&str> {
        None
    }

    fn boxed_widget(self: Box<Self>) -> Result<Box<dyn Widget>, Box<Self>> {
        Err(self)
    }

    fn widget_ref(&self) -> Option<&dyn Widget> {
        None
    }

    fn widget_mut(&mut self) -> Option<&mut dyn Widget> {
        None
    }
}

struct Described<T> {
    info: TypeInfo<T>,
    metas: Rc<[PropertyMeta]>,
}

thread_local! {
    static TABLES: RefCell<HashMap<TypeId, Rc<dyn Any>>> = RefCell::new(HashMap::new());
}

/// Property table of `T`, built on first use and cached per thread.
fn described<T: Describe>() -> Rc<Described<T>> {
    let id = TypeId::of::<T>();
    let cached = TABLES.with(|t| t.borrow().get(&id).cloned());
    if let Some(table) = cached.and_then(|any| any.downcast::<Described<T>>().ok()) {
        return table;
    }

    let info = T::describe();
    let metas: Rc<[PropertyMeta]> = info.props.iter().map(|p| p.meta.clone()).collect();
    let table = Rc::new(Described { info, metas });
    TABLES.with(|t| t.borrow_mut().insert(id, Rc::clone(&table) as Rc<dyn Any>));
    table
}

/// Property descriptions of `T` without needing an instance.
pub fn properties_of<T: Describe>() -> Rc<[PropertyMeta]> {
    Rc::clone(&described::<T>().metas)
}

// ── Reflect ───────────────────────────────────────────────────────────────

/// Object-safe view of a [`Describe`] type, used by the save and load contexts.
pub trait Reflect: Any {
    fn type_name(&self) -> &'static str;
    fn families(&self) -> &'static [&'static str];
    fn parent_role(&self) -> ParentRole;
    fn style_name(&self) -> Option<&str>;
    fn properties(&self) -> Rc<[PropertyMeta]>;

    /// Current value of a simple property.
    fn get_value(&self, name: &str) -> Option<Value>;
    fn set_value(&mut self, name: &str, value: Value) -> Result<(), MmlError>;

    fn object(&self, name: &str) -> Option<&dyn Reflect>;
    fn object_mut(&mut self, name: &str) -> Option<&mut dyn Reflect>;
    fn set_object(&mut self, name: &str, value: Box<dyn Reflect>) -> Result<(), MmlError>;

    fn items(&self, name: &str) -> Vec<&dyn Reflect>;
    fn append(&mut self, name: &str, item: Box<dyn Reflect>) -> Result<(), MmlError>;
    fn clear_items(&mut self, name: &str) -> Result<(), MmlError>;

    fn as_reflect(&self) -> &dyn Reflect;
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn into_widget(self: Box<Self>) -> Result<Box<dyn Widget>, Box<dyn Reflect>>;
    fn as_widget(&self) -> Option<&dyn Widget>;
    fn as_widget_mut(&mut self) -> Option<&mut dyn Widget>;
}

impl<T: Describe> Reflect for T {
    fn type_name(&self) -> &'static str {
        self.runtime_type_name()
    }

    fn families(&self) -> &'static [&'static str] {
        T::FAMILIES
    }

    fn parent_role(&self) -> ParentRole {
        T::PARENT_ROLE
    }

    fn style_name(&self) -> Option<&str> {
        self.style_name_of()
    }

    fn properties(&self) -> Rc<[PropertyMeta]> {
        properties_of::<T>()
    }

    fn get_value(&self, name: &str) -> Option<Value> {
        match described::<T>().info.find(name)?.accessor {
            Accessor::Simple { get, .. } => Some(get(self)),
            _ => None,
        }
    }

    fn set_value(&mut self, name: &str, value: Value) -> Result<(), MmlError> {
        let table = described::<T>();
        let Some(prop) = table.info.find(name) else {
            return Err(MmlError::ReadOnly { property: name.to_string() });
        };
        match (&prop.accessor, &prop.meta.value_type) {
            (Accessor::Simple { set, .. }, ValueType::Simple { kind, .. }) => {
                let shown = format!("{value:?}");
                set(self, value).ok_or_else(|| MmlError::InvalidValue {
                    property: name.to_string(),
                    value: shown,
                    expected: kind.describe(),
                })
            }
            _ => Err(MmlError::ReadOnly { property: name.to_string() }),
        }
    }

    fn object(&self, name: &str) -> Option<&dyn Reflect> {
        match described::<T>().info.find(name)?.accessor {
            Accessor::Object { get, .. } => get(self),
            _ => None,
        }
    }

    fn object_mut(&mut self, name: &str) -> Option<&mut dyn Reflect> {
        match described::<T>().info.find(name)?.accessor {
            Accessor::Object { get_mut, .. } => get_mut(self),
            _ => None,
        }
    }

    fn set_object(&mut self, name: &str, value: Box<dyn Reflect>) -> Result<(), MmlError> {
        let table = described::<T>();
        let child = value.type_name();
        match table.info.find(name).map(|p| &p.accessor) {
            Some(Accessor::Object { set: Some(set), .. }) => {
                set(self, value).ok_or_else(|| incompatible(self, name, child))
            }
            _ => Err(MmlError::ReadOnly { property: name.to_string() }),
        }
    }

    fn items(&self, name: &str) -> Vec<&dyn Reflect> {
        match described::<T>().info.find(name).map(|p| &p.accessor) {
            Some(Accessor::List { items, .. }) => items(self),
            _ => Vec::new(),
        }
    }

    fn append(&mut self, name: &str, item: Box<dyn Reflect>) -> Result<(), MmlError> {
        let table = described::<T>();
        let child = item.type_name();
        match table.info.find(name).map(|p| &p.accessor) {
            Some(Accessor::List { append, .. }) => {
                append(self, item).ok_or_else(|| incompatible(self, name, child))
            }
            _ => Err(MmlError::ReadOnly { property: name.to_string() }),
        }
    }

    fn clear_items(&mut self, name: &str) -> Result<(), MmlError> {
        match described::<T>().info.find(name).map(|p| &p.accessor) {
            Some(Accessor::List { clear: Some(clear), .. }) => {
                clear(self);
                Ok(())
            }
            _ => Err(MmlError::ReadOnly { property: name.to_string() }),
        }
    }

    fn as_reflect(&self) -> &dyn Reflect {
        self
    }

    fn as_reflect_mut(&mut self) -> &mut dyn Reflect {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn into_widget(self: Box<Self>) -> Result<Box<dyn Widget>, Box<dyn Reflect>> {
        self.boxed_widget().map_err(|b| b as Box<dyn Reflect>)
    }

    fn as_widget(&self) -> Option<&dyn Widget> {
        self.widget_ref()
    }

    fn as_widget_mut(&mut self) -> Option<&mut dyn Widget> {
        self.widget_mut()
    }
}

fn incompatible<T: Describe>(parent: &T, property: &str, child: &str) -> MmlError {
    MmlError::IncompatibleChild {
        parent: parent.runtime_type_name().to_string(),
        property: property.to_string(),
        child: child.to_string(),
    }
}

/// Unboxes `item` as a `T`, for use inside setters.
pub fn downcast<T: Any>(item: Box<dyn Reflect>) -> Option<T> {
    item.into_any().downcast::<T>().ok().map(|b| *b)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        x: i32,
        label: Option<String>,
        children: Vec<Point>,
    }

    impl Describe for Point {
        const TYPE_NAME: &'static str = "Point";
        const FAMILIES: &'static [&'static str] = &["Item"];
        const PARENT_ROLE: ParentRole = ParentRole::Items("Children");

        fn describe() -> TypeInfo<Self> {
            TypeInfo::<Self>::new()
                .simple("X", SimpleType::Int, |p| p.x.into(), |p, v| {
                    p.x = v.as_int()?;
                    Some(())
                })
                .default_value(0)
                .nullable("Label", SimpleType::String, |p| p.label.clone().into(), |p, v| {
                    p.label = match v {
                        Value::Null => None,
                        v => Some(v.into_string()?),
                    };
                    Some(())
                })
                .list(
                    "Children",
                    TypeRef::of::<Point>(),
                    |p| p.children.iter().map(|c| c as &dyn Reflect).collect(),
                    |p, item| {
                        p.children.push(downcast::<Point>(item)?);
                        Some(())
                    },
                )
        }
    }

    fn point(x: i32) -> Point {
        Point { x, label: None, children: Vec::new() }
    }

    #[test]
    fn table_is_memoized_per_type() {
        let a = properties_of::<Point>();
        let b = point(1).properties();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 3);
        assert_eq!(a[0].default, Some(Value::Int(0)));
    }

    #[test]
    fn simple_values_through_dyn() {
        let mut p = point(3);
        let r: &mut dyn Reflect = &mut p;
        assert_eq!(r.get_value("X"), Some(Value::Int(3)));
        r.set_value("X", Value::Int(7)).unwrap();
        r.set_value("Label", Value::from("hi")).unwrap();
        assert_eq!(p.x, 7);
        assert_eq!(p.label.as_deref(), Some("hi"));
    }

    #[test]
    fn wrong_kind_is_invalid_value() {
        let mut p = point(0);
        let err = p.set_value("X", Value::Bool(true)).unwrap_err();
        assert!(matches!(err, MmlError::InvalidValue { .. }));
        assert!(matches!(p.set_value("Nope", Value::Null), Err(MmlError::ReadOnly { .. })));
    }

    #[test]
    fn list_append_checks_type() {
        let mut p = point(0);
        p.append("Children", Box::new(point(5))).unwrap();
        assert_eq!(p.items("Children").len(), 1);
        assert_eq!(p.children[0].x, 5);

        struct Other;
        impl Describe for Other {
            const TYPE_NAME: &'static str = "Other";
            fn describe() -> TypeInfo<Self> { TypeInfo::<Self>::new() }
        }
        let err = p.append("Children", Box::new(Other)).unwrap_err();
        assert_eq!(
            err,
            MmlError::IncompatibleChild {
                parent: "Point".into(),
                property: "Children".into(),
                child: "Other".into(),
            }
        );
        assert!(p.clear_items("Children").is_err());
    }

    #[test]
    fn non_widgets_stay_reflect() {
        let boxed: Box<dyn Reflect> = Box::new(point(2));
        let back = boxed.into_widget().err().unwrap();
        assert_eq!(back.type_name(), "Point");
        assert_eq!(back.parent_role(), ParentRole::Items("Children"));
    }
}
