use std::collections::HashMap;
use std::rc::Rc;

use crate::mml::reflect::{Describe, Reflect};
use crate::style::Stylesheet;

/// How a registered type is built.
#[derive(Copy, Clone)]
pub enum Constructor {
    Plain(fn() -> Box<dyn Reflect>),
    /// Widgets that take their initial look from a stylesheet.
    Styled(fn(&Rc<Stylesheet>) -> Box<dyn Reflect>),
}

#[derive(Copy, Clone)]
struct Entry {
    name: &'static str,
    families: &'static [&'static str],
    ctor: Constructor,
}

/// Tag name to constructor map used to resolve type-named elements.
#[derive(Default)]
pub struct TypeRegistry {
    entries: HashMap<&'static str, Entry>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &'static str, families: &'static [&'static str], ctor: Constructor) {
        self.entries.insert(name, Entry { name, families, ctor });
    }

    /// Registers `T` under its own type name with a `Default` constructor.
    pub fn register_default<T: Describe + Default>(&mut self) {
        self.register(T::TYPE_NAME, T::FAMILIES, Constructor::Plain(|| Box::new(T::default()) as Box<dyn Reflect>));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn families(&self, name: &str) -> Option<&'static [&'static str]> {
        self.entries.get(name).map(|e| e.families)
    }

    /// Canonical name for `tag`, after the legacy remap.
    pub fn resolve(&self, tag: &str, legacy: &HashMap<String, String>) -> Option<&'static str> {
        let name = match legacy.get(tag) {
            Some(renamed) => {
                log::debug!("legacy tag {tag} read as {renamed}");
                renamed.as_str()
            }
            None => tag,
        };
        self.entries.get(name).map(|e| e.name)
    }

    /// Builds a registered type. Styled types get `stylesheet`, or a default one.
    pub fn create(&self, name: &str, stylesheet: Option<&Rc<Stylesheet>>) -> Option<Box<dyn Reflect>> {
        let entry = self.entries.get(name)?;
        Some(match entry.ctor {
            Constructor::Plain(f) => f(),
            Constructor::Styled(f) => match stylesheet {
                Some(s) => f(s),
                None => f(&Rc::new(Stylesheet::default())),
            },
        })
    }
}
