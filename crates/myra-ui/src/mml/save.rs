use myra_mml::Element;

use crate::mml::context::{classify, PropertyKind};
use crate::mml::reflect::{PropertyMeta, Reflect, ValueType};
use crate::mml::value::format_value;

/// Decides whether a simple property is written.
pub type SerializePredicate = Box<dyn Fn(&dyn Reflect, &PropertyMeta) -> bool>;

pub struct SaveConfig {
    /// Families whose composites are written as child elements.
    pub serializable_families: Vec<&'static str>,
    pub should_serialize: SerializePredicate,
}

impl SaveConfig {
    /// Writes every simple property that differs from its compiled-in default.
    pub fn new(serializable_families: Vec<&'static str>) -> Self {
        Self {
            serializable_families,
            should_serialize: Box::new(|obj, meta| !has_default_value(obj, meta)),
        }
    }

    /// Writes every simple property, defaults included.
    pub fn verbose(serializable_families: Vec<&'static str>) -> Self {
        Self { serializable_families, should_serialize: Box::new(|_, _| true) }
    }
}

/// True when the current value equals the property's compiled-in default.
pub fn has_default_value(obj: &dyn Reflect, meta: &PropertyMeta) -> bool {
    match (&meta.default, obj.get_value(meta.name)) {
        (Some(default), Some(value)) => *default == value,
        _ => false,
    }
}

/// Walks an object tree into a markup tree.
pub struct SaveContext {
    config: SaveConfig,
}

impl SaveContext {
    pub fn new(config: SaveConfig) -> Self {
        Self { config }
    }

    /// Element tagged with the runtime type name of `obj`.
    pub fn save(&self, obj: &dyn Reflect) -> Element {
        let mut el = Element::new(obj.type_name());
        self.write_into(obj, &mut el);
        el
    }

    fn write_into(&self, obj: &dyn Reflect, el: &mut Element) {
        let families = &self.config.serializable_families;
        let role = obj.parent_role().property();

        for meta in obj.properties().iter() {
            match classify(meta, families) {
                PropertyKind::Skipped => {}
                PropertyKind::Simple => {
                    if !(self.config.should_serialize)(obj, meta) {
                        continue;
                    }
                    if let Some(text) = obj.get_value(meta.name).as_ref().and_then(format_value) {
                        el.set_attribute(meta.name, text);
                    }
                }
                PropertyKind::Complex => match meta.value_type {
                    ValueType::Object(_) => {
                        let Some(child) = obj.object(meta.name) else { continue };
                        if role == Some(meta.name) {
                            el.add_child(self.save(child));
                        } else {
                            let mut node = Element::new(meta.name);
                            self.write_into(child, &mut node);
                            el.add_child(node);
                        }
                    }
                    ValueType::List(_) => {
                        let items = obj.items(meta.name);
                        if items.is_empty() {
                            continue;
                        }
                        let nodes = items.into_iter().map(|item| self.save(item));
                        if role == Some(meta.name) {
                            el.children.extend(nodes);
                        } else {
                            let mut wrapper = Element::new(meta.name);
                            wrapper.children.extend(nodes);
                            el.add_child(wrapper);
                        }
                    }
                    ValueType::Simple { .. } => {}
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mml::context::PROJECT_FAMILIES;
    use crate::widgets::{Grid, Label, Proportion, ProportionType};
    use crate::widget::Widget;

    fn families() -> Vec<&'static str> {
        PROJECT_FAMILIES.to_vec()
    }

    #[test]
    fn defaults_are_suppressed() {
        let mut label = Label::new();
        label.set_text("Hi");
        let el = SaveContext::new(SaveConfig::new(families())).save(&label);
        assert_eq!(el.name, "Label");
        assert_eq!(el.attribute("Text"), Some("Hi"));
        assert_eq!(el.attribute("Wrap"), None);
        assert_eq!(el.attribute("Visible"), None);
    }

    #[test]
    fn verbose_writes_defaults() {
        let label = Label::new();
        let el = SaveContext::new(SaveConfig::verbose(families())).save(&label);
        assert_eq!(el.attribute("Wrap"), Some("False"));
        assert_eq!(el.attribute("Visible"), Some("True"));
    }

    #[test]
    fn items_unwrapped_and_lists_wrapped() {
        let mut grid = Grid::new();
        grid.columns_proportions.push(Proportion::new(ProportionType::Pixels, 40.0));
        let mut label = Label::new();
        label.base_mut().grid_column = 1;
        grid.add_widget(Box::new(label));

        let el = SaveContext::new(SaveConfig::new(families())).save(&grid);
        let names: Vec<&str> = el.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["ColumnsProportions", "Label"]);

        let cols = el.child("ColumnsProportions").unwrap();
        assert_eq!(cols.children[0].name, "Proportion");
        assert_eq!(cols.children[0].attribute("Type"), Some("Pixels"));
        assert_eq!(cols.children[0].attribute("Value"), Some("40"));
        assert_eq!(el.child("Label").unwrap().attribute("GridColumn"), Some("1"));
        assert!(el.child("RowsProportions").is_none());
    }
}
