use myra_engine::paint::Color;

/// Kind of a simple (attribute) property.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SimpleType {
    Bool,
    Int,
    Float,
    String,
    Color,
    /// Enumeration with the listed variant names.
    Enum(&'static [&'static str]),
}

impl SimpleType {
    pub fn describe(&self) -> String {
        match self {
            SimpleType::Bool => "True or False".to_string(),
            SimpleType::Int => "an integer".to_string(),
            SimpleType::Float => "a number".to_string(),
            SimpleType::String => "a string".to_string(),
            SimpleType::Color => "a color name or #RRGGBBAA".to_string(),
            SimpleType::Enum(names) => format!("one of {}", names.join(", ")),
        }
    }
}

/// A simple property value. `Null` is an empty nullable property.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i32),
    Float(f32),
    String(String),
    Color(Color),
    Enum(&'static str),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Non-negative integers, for indices and spans.
    pub fn as_usize(&self) -> Option<usize> {
        self.as_int().and_then(|i| usize::try_from(i).ok())
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f32),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Value::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_enum<E: MmlEnum>(&self) -> Option<E> {
        match self {
            Value::Enum(name) => E::from_name(name),
            _ => None,
        }
    }

    /// `Some(None)` for `Null`, `Some(Some(i))` for an int, `None` otherwise.
    pub fn as_opt_int(&self) -> Option<Option<i32>> {
        match self {
            Value::Null => Some(None),
            v => v.as_int().map(Some),
        }
    }

    pub fn as_opt_color(&self) -> Option<Option<Color>> {
        match self {
            Value::Null => Some(None),
            v => v.as_color().map(Some),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(i32::try_from(v).unwrap_or(i32::MAX))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Color> for Value {
    fn from(v: Color) -> Self {
        Value::Color(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// An enum usable as a simple property, written by variant name.
///
/// Implemented by [`mml_enum!`](crate::mml_enum).
pub trait MmlEnum: Copy + 'static {
    const VARIANTS: &'static [&'static str];

    fn name(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self>;
}

/// Declares an enum whose variants round-trip through markup by name.
///
/// ```rust
/// myra_ui::mml_enum! {
///     #[derive(Default)]
///     pub enum Dock { #[default] Left, Right }
/// }
///
/// use myra_ui::mml::MmlEnum;
/// assert_eq!(Dock::from_name("Right"), Some(Dock::Right));
/// assert_eq!(Dock::VARIANTS, &["Left", "Right"]);
/// ```
#[macro_export]
macro_rules! mml_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident { $($(#[$vmeta:meta])* $variant:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
        $vis enum $name { $($(#[$vmeta])* $variant),+ }

        impl $crate::mml::MmlEnum for $name {
            const VARIANTS: &'static [&'static str] = &[$(stringify!($variant)),+];

            fn name(self) -> &'static str {
                match self { $(Self::$variant => stringify!($variant)),+ }
            }

            fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($variant) => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl From<$name> for $crate::mml::Value {
            fn from(v: $name) -> Self {
                $crate::mml::Value::Enum($crate::mml::MmlEnum::name(v))
            }
        }
    };
}

/// Markup text for `value`; `None` for `Null`.
///
/// Booleans are `True`/`False`, numbers use their invariant form, enums
/// their variant name, and colors their name when they have one.
pub fn format_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::Bool(b) => (if *b { "True" } else { "False" }).to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => s.clone(),
        Value::Color(c) => c.to_string(),
        Value::Enum(name) => name.to_string(),
    };
    Some(text)
}

/// Converts markup text to a value of `kind`.
pub fn parse_value(kind: SimpleType, text: &str) -> Option<Value> {
    match kind {
        SimpleType::Bool => {
            let t = text.trim();
            if t.eq_ignore_ascii_case("true") {
                Some(Value::Bool(true))
            } else if t.eq_ignore_ascii_case("false") {
                Some(Value::Bool(false))
            } else {
                None
            }
        }
        SimpleType::Int => text.trim().parse().ok().map(Value::Int),
        SimpleType::Float => text.trim().parse().ok().map(Value::Float),
        SimpleType::String => Some(Value::String(text.to_string())),
        SimpleType::Color => text.parse::<Color>().ok().map(Value::Color),
        SimpleType::Enum(names) => names.iter().find(|n| **n == text).map(|n| Value::Enum(*n)),
    }
}
