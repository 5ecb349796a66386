use std::collections::HashMap;
use std::rc::Rc;

use myra_mml::Element;

use crate::mml::context::{classify, PropertyKind};
use crate::mml::error::MmlError;
use crate::mml::reflect::{ParentRole, PropertyMeta, Reflect, Slot, ValueType};
use crate::mml::registry::TypeRegistry;
use crate::mml::value::parse_value;

/// Builds an empty object for a resolved type name.
pub type ObjectCreator = Box<dyn Fn(&str) -> Option<Box<dyn Reflect>>>;

pub struct LoadConfig {
    /// Families whose composites are read from child elements.
    pub serializable_families: Vec<&'static str>,
    /// Scope that type-named elements resolve in.
    pub registry: Rc<TypeRegistry>,
    pub object_creator: ObjectCreator,
    /// Renamed types, old tag to new tag. Applied before resolution.
    pub legacy_names: HashMap<String, String>,
}

impl LoadConfig {
    /// Config whose factory builds registered types with their defaults.
    pub fn new(serializable_families: Vec<&'static str>, registry: Rc<TypeRegistry>) -> Self {
        let factory = Rc::clone(&registry);
        Self {
            serializable_families,
            registry,
            object_creator: Box::new(move |name| factory.create(name, None)),
            legacy_names: HashMap::new(),
        }
    }
}

/// Fills an object tree from a markup tree.
pub struct LoadContext {
    config: LoadConfig,
}

impl LoadContext {
    pub fn new(config: LoadConfig) -> Self {
        Self { config }
    }

    /// Loads `el` into `obj`. Attributes set simple properties; child elements
    /// either name a complex property or a type to attach through the parent role.
    pub fn load(&self, obj: &mut dyn Reflect, el: &Element) -> Result<(), MmlError> {
        self.read(obj, el).inspect_err(|e| log::warn!("failed to load <{}>: {e}", el.name))
    }

    /// Resolves the root tag, builds it and loads it.
    pub fn load_new(&self, el: &Element) -> Result<Box<dyn Reflect>, MmlError> {
        let name = self.resolve(&el.name)?;
        let mut obj = self.create(name, &el.name)?;
        self.load(obj.as_mut(), el)?;
        Ok(obj)
    }

    fn resolve(&self, tag: &str) -> Result<&'static str, MmlError> {
        self.config
            .registry
            .resolve(tag, &self.config.legacy_names)
            .ok_or_else(|| MmlError::UnresolvedTag { tag: tag.to_string() })
    }

    fn create(&self, name: &str, tag: &str) -> Result<Box<dyn Reflect>, MmlError> {
        (self.config.object_creator)(name).ok_or_else(|| MmlError::UnresolvedTag { tag: tag.to_string() })
    }

    fn read(&self, obj: &mut dyn Reflect, el: &Element) -> Result<(), MmlError> {
        let families = &self.config.serializable_families;
        let props = obj.properties();

        for attr in &el.attributes {
            let meta = props
                .iter()
                .find(|m| m.name == attr.name && classify(m, families) == PropertyKind::Simple);
            let Some(meta) = meta else {
                log::trace!("{} has no property {}", obj.type_name(), attr.name);
                continue;
            };
            let ValueType::Simple { kind, .. } = meta.value_type else { continue };
            let value = parse_value(kind, &attr.value).ok_or_else(|| MmlError::InvalidValue {
                property: meta.name.to_string(),
                value: attr.value.clone(),
                expected: kind.describe(),
            })?;
            obj.set_value(meta.name, value)?;
        }

        for child in &el.children {
            let meta = props
                .iter()
                .find(|m| m.name == child.name && classify(m, families) == PropertyKind::Complex);
            match meta {
                Some(meta) => self.read_property(obj, meta, child)?,
                None => self.read_typed_child(obj, child)?,
            }
        }
        Ok(())
    }

    fn read_property(&self, obj: &mut dyn Reflect, meta: &PropertyMeta, el: &Element) -> Result<(), MmlError> {
        match meta.value_type {
            ValueType::List(ty) => {
                if meta.slot == Slot::Settable {
                    obj.clear_items(meta.name)?;
                }
                for item_el in &el.children {
                    // Items carry their runtime type; fall back to the declared one.
                    let name = self.resolve(&item_el.name).unwrap_or(ty.name);
                    let mut item = self.create(name, &item_el.name)?;
                    self.read(item.as_mut(), item_el)?;
                    obj.append(meta.name, item)?;
                }
            }
            ValueType::Object(ty) => match meta.slot {
                Slot::InPlace => {
                    let target = obj
                        .object_mut(meta.name)
                        .ok_or_else(|| MmlError::ReadOnly { property: meta.name.to_string() })?;
                    self.read(target, el)?;
                }
                Slot::Settable | Slot::Appendable => {
                    let mut value = self.create(ty.name, ty.name)?;
                    self.read(value.as_mut(), el)?;
                    obj.set_object(meta.name, value)?;
                }
            },
            ValueType::Simple { .. } => {}
        }
        Ok(())
    }

    fn read_typed_child(&self, obj: &mut dyn Reflect, el: &Element) -> Result<(), MmlError> {
        let name = self.resolve(&el.name)?;
        let mut item = self.create(name, &el.name)?;
        self.read(item.as_mut(), el)?;

        match obj.parent_role() {
            ParentRole::Items(property) => obj.append(property, item),
            ParentRole::Content(property) | ParentRole::Root(property) => obj.set_object(property, item),
            ParentRole::Leaf => Err(MmlError::NotAContainer {
                parent: obj.type_name().to_string(),
                child: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mml::context::PROJECT_FAMILIES;
    use crate::mml::save::{SaveConfig, SaveContext};
    use crate::widget::Widget;
    use crate::widgets::{register_all, Grid, ImageTextButton, Label, ProportionType, Window};
    use myra_mml::parse_str;

    fn context(legacy: &[(&str, &str)]) -> LoadContext {
        let mut reg = TypeRegistry::new();
        register_all(&mut reg);
        let mut config = LoadConfig::new(PROJECT_FAMILIES.to_vec(), Rc::new(reg));
        config.legacy_names = legacy.iter().map(|(a, b)| (a.to_string(), b.to_string())).collect();
        LoadContext::new(config)
    }

    fn load(src: &str, legacy: &[(&str, &str)]) -> Result<Box<dyn Reflect>, MmlError> {
        let doc = parse_str(src).unwrap();
        context(legacy).load_new(&doc.root)
    }

    #[test]
    fn attributes_and_typed_children() {
        let obj = load(
            r#"<Grid ColumnSpacing="4">
                 <ColumnsProportions><Proportion Type="Fill" /></ColumnsProportions>
                 <Label Text="a" GridRow="1" />
               </Grid>"#,
            &[],
        )
        .unwrap();
        let grid = obj.as_any().downcast_ref::<Grid>().unwrap();
        assert_eq!(grid.column_spacing, 4);
        assert_eq!(grid.columns_proportions[0].kind, ProportionType::Fill);
        assert_eq!(grid.widgets().len(), 1);
        assert_eq!(grid.widgets()[0].base().grid_row, 1);
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let err = load(r#"<Grid><Bogus /></Grid>"#, &[]).err().unwrap();
        assert_eq!(err, MmlError::UnresolvedTag { tag: "Bogus".into() });
        assert_eq!(err.to_string(), "could not resolve tag 'Bogus'");
    }

    #[test]
    fn legacy_tag_is_remapped() {
        let obj = load(r#"<Window><Button Text="OK" /></Window>"#, &[("Button", "ImageTextButton")]).unwrap();
        let window = obj.as_any().downcast_ref::<Window>().unwrap();
        let content = window.content().unwrap();
        let button = content.as_any().downcast_ref::<ImageTextButton>().unwrap();
        assert_eq!(button.text(), "OK");

        assert!(load(r#"<Window><Button /></Window>"#, &[]).is_err());
    }

    #[test]
    fn bad_attribute_value_reports_property() {
        let err = load(r#"<Label Wrap="maybe" />"#, &[]).err().unwrap();
        match err {
            MmlError::InvalidValue { property, value, .. } => {
                assert_eq!(property, "Wrap");
                assert_eq!(value, "maybe");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn leaf_rejects_typed_children() {
        let err = load(r#"<Label><Label /></Label>"#, &[]).err().unwrap();
        assert!(matches!(err, MmlError::NotAContainer { .. }));
    }

    #[test]
    fn unknown_attributes_are_ignored() {
        let obj = load(r#"<Label Text="x" Flavor="mint" />"#, &[]).unwrap();
        assert_eq!(obj.as_any().downcast_ref::<Label>().unwrap().text(), "x");
    }

    #[test]
    fn save_then_load_round_trips() {
        let src = r#"<Grid RowSpacing="2">
                       <RowsProportions><Proportion Type="Pixels" Value="20" /><Proportion /></RowsProportions>
                       <Label Text="top" TextColor="Red" />
                       <ImageTextButton Text="go" GridRow="1" />
                     </Grid>"#;
        let first = load(src, &[]).unwrap();
        let save = SaveContext::new(SaveConfig::new(PROJECT_FAMILIES.to_vec()));
        let saved = save.save(first.as_ref());

        let second = context(&[]).load_new(&saved).unwrap();
        assert_eq!(save.save(second.as_ref()), saved);

        let grid = second.as_any().downcast_ref::<Grid>().unwrap();
        assert_eq!(grid.rows_proportions.len(), 2);
        assert_eq!(grid.rows_proportions[0].value, 20.0);
        assert_eq!(grid.widgets().len(), 2);
    }
}
