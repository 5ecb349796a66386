//! A saved UI layout: root widget, export settings and the stylesheet it
//! was designed against.

use std::rc::Rc;

use myra_mml::{parse_str, Document};

use crate::mml::{
    has_default_value, Describe, LoadConfig, LoadContext, MmlError, ParentRole, Reflect, SaveConfig, SaveContext,
    SimpleType, TypeInfo, TypeRef, TypeRegistry, Value, PROJECT_FAMILIES,
};
use crate::style::{has_stylesheet_value, Stylesheet};
use crate::widget::{Widget, WIDGET};
use crate::widgets::{register_all, Proportion};

/// Types renamed since older project files were written.
pub const LEGACY_NAMES: &[(&str, &str)] = &[("Button", "ImageTextButton")];

/// Settings for generating code from a project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportOptions {
    pub namespace: Option<String>,
    pub class: Option<String>,
    pub output_path: Option<String>,
}

fn opt_string(v: Value) -> Option<Option<String>> {
    match v {
        Value::Null => Some(None),
        v => v.into_string().map(Some),
    }
}

impl Describe for ExportOptions {
    const TYPE_NAME: &'static str = "ExportOptions";
    const FAMILIES: &'static [&'static str] = &["ExportOptions"];

    fn describe() -> TypeInfo<Self> {
        TypeInfo::<Self>::new()
            .nullable("Namespace", SimpleType::String, |e| e.namespace.clone().into(), |e, v| {
                e.namespace = opt_string(v)?;
                Some(())
            })
            .nullable("Class", SimpleType::String, |e| e.class.clone().into(), |e, v| {
                e.class = opt_string(v)?;
                Some(())
            })
            .nullable("OutputPath", SimpleType::String, |e| e.output_path.clone().into(), |e, v| {
                e.output_path = opt_string(v)?;
                Some(())
            })
    }
}

/// Root of a `.xmmp` file.
pub struct Project {
    export_options: ExportOptions,
    pub stylesheet_path: Option<String>,
    root: Option<Box<dyn Widget>>,
    stylesheet: Rc<Stylesheet>,
}

impl Project {
    pub fn new(stylesheet: Rc<Stylesheet>) -> Self {
        Self { export_options: ExportOptions::default(), stylesheet_path: None, root: None, stylesheet }
    }

    pub fn export_options(&self) -> &ExportOptions {
        &self.export_options
    }

    pub fn export_options_mut(&mut self) -> &mut ExportOptions {
        &mut self.export_options
    }

    pub fn root(&self) -> Option<&dyn Widget> {
        self.root.as_deref()
    }

    pub fn root_mut(&mut self) -> Option<&mut Box<dyn Widget>> {
        self.root.as_mut()
    }

    pub fn set_root(&mut self, root: Option<Box<dyn Widget>>) {
        self.root = root;
    }

    pub fn stylesheet(&self) -> &Rc<Stylesheet> {
        &self.stylesheet
    }

    // ── contexts ──────────────────────────────────────────────────────────

    /// Every type a project file may name.
    pub fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        register_all(&mut registry);
        registry.register_default::<ExportOptions>();
        registry
    }

    /// Skips values equal to their default or to what `stylesheet` would give.
    pub fn create_save_config(stylesheet: &Rc<Stylesheet>) -> SaveConfig {
        let sheet = Rc::clone(stylesheet);
        SaveConfig {
            serializable_families: PROJECT_FAMILIES.to_vec(),
            should_serialize: Box::new(move |obj, meta| {
                !has_default_value(obj, meta) && !has_stylesheet_value(obj, meta, &sheet)
            }),
        }
    }

    /// Builds styled widgets from `stylesheet` and reads legacy tag names.
    pub fn create_load_config(stylesheet: Rc<Stylesheet>) -> LoadConfig {
        let registry = Rc::new(Self::registry());
        let mut config = LoadConfig::new(PROJECT_FAMILIES.to_vec(), Rc::clone(&registry));
        config.object_creator = Box::new(move |name| registry.create(name, Some(&stylesheet)));
        config.legacy_names = LEGACY_NAMES.iter().map(|(old, new)| (old.to_string(), new.to_string())).collect();
        config
    }

    // ── whole projects ────────────────────────────────────────────────────

    pub fn save(&self) -> String {
        let context = SaveContext::new(Self::create_save_config(&self.stylesheet));
        Document::new(context.save(self)).to_string()
    }

    pub fn load(data: &str, stylesheet: Rc<Stylesheet>) -> Result<Project, MmlError> {
        let doc = parse_str(data)?;
        let mut project = Project::new(Rc::clone(&stylesheet));
        let context = LoadContext::new(Self::create_load_config(stylesheet));
        context.load(&mut project, &doc.root)?;
        log::info!(
            "loaded project with root {}",
            project.root().map_or("(none)", |r| r.type_name())
        );
        Ok(project)
    }

    // ── single objects ────────────────────────────────────────────────────

    /// Loads a lone widget or proportion. `Ok(None)` when the root tag names
    /// no known type.
    pub fn load_object(data: &str, stylesheet: Rc<Stylesheet>) -> Result<Option<Box<dyn Reflect>>, MmlError> {
        let doc = parse_str(data)?;
        let config = Self::create_load_config(stylesheet);
        let tag = doc.root.name.as_str();

        let name = if tag == Proportion::TYPE_NAME {
            Some(Proportion::TYPE_NAME)
        } else {
            config.registry.resolve(tag, &config.legacy_names)
        };
        let Some(name) = name else {
            log::debug!("no type named {tag}");
            return Ok(None);
        };
        let Some(mut obj) = (config.object_creator)(name) else { return Ok(None) };

        LoadContext::new(config).load(obj.as_mut(), &doc.root)?;
        Ok(Some(obj))
    }

    pub fn save_object(&self, obj: &dyn Reflect) -> String {
        let context = SaveContext::new(Self::create_save_config(&self.stylesheet));
        context.save(obj).to_pretty_string()
    }
}

impl Describe for Project {
    const TYPE_NAME: &'static str = "Project";
    const PARENT_ROLE: ParentRole = ParentRole::Root("Root");

    fn describe() -> TypeInfo<Self> {
        TypeInfo::<Self>::new()
            .object_in_place(
                "ExportOptions",
                TypeRef::of::<ExportOptions>(),
                |p| Some(&p.export_options as &dyn Reflect),
                |p| Some(&mut p.export_options as &mut dyn Reflect),
            )
            .nullable("StylesheetPath", SimpleType::String, |p| p.stylesheet_path.clone().into(), |p, v| {
                p.stylesheet_path = opt_string(v)?;
                Some(())
            })
            .object(
                "Root",
                WIDGET,
                |p| p.root().map(|r| r.as_reflect()),
                |p| p.root_mut().map(|r| r.as_reflect_mut()),
                |p, item| {
                    p.root = Some(item.into_widget().ok()?);
                    Some(())
                },
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Grid, ImageTextButton, Label, ProportionType, Window};
    use myra_engine::paint::Color;

    fn sheet() -> Rc<Stylesheet> {
        Rc::new(Stylesheet::default())
    }

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project>
  <ExportOptions Namespace="Demo" Class="MainForm" />
  <Window Title="Main">
    <Grid ColumnSpacing="8">
      <ColumnsProportions>
        <Proportion Type="Pixels" Value="100" />
      </ColumnsProportions>
      <Label Text="Name" />
      <Button Text="OK" GridColumn="1" />
    </Grid>
  </Window>
</Project>"#;

    #[test]
    fn loads_export_options_root_and_legacy_button() {
        let project = Project::load(SAMPLE, sheet()).unwrap();
        assert_eq!(project.export_options().namespace.as_deref(), Some("Demo"));
        assert_eq!(project.export_options().output_path, None);

        let window = project.root().unwrap().as_any().downcast_ref::<Window>().unwrap();
        assert_eq!(window.title(), "Main");
        let grid = window.content().unwrap().as_any().downcast_ref::<Grid>().unwrap();
        assert_eq!(grid.columns_proportions[0].kind, ProportionType::Pixels);
        let button = grid.widgets()[1].as_any().downcast_ref::<ImageTextButton>().unwrap();
        assert_eq!(button.text(), "OK");
    }

    #[test]
    fn save_omits_stylesheet_values() {
        let project = Project::load(SAMPLE, sheet()).unwrap();
        let saved = project.save();
        assert!(!saved.contains("TitleTextColor"), "{saved}");
        assert!(!saved.contains("TextColor"), "{saved}");
        assert!(saved.contains(r#"<ImageTextButton GridColumn="1" Text="OK"/>"#), "{saved}");

        let again = Project::load(&saved, sheet()).unwrap();
        assert_eq!(again.save(), saved);
    }

    #[test]
    fn save_keeps_values_that_differ_from_style() {
        let mut project = Project::new(sheet());
        let mut label = Label::with_stylesheet(project.stylesheet());
        label.text_color = Color::rgb(1, 2, 3);
        project.set_root(Some(Box::new(label)));
        assert!(project.save().contains("TextColor="));
    }

    #[test]
    fn load_object_handles_proportion_and_unknown_tags() {
        let obj = Project::load_object(r#"<Proportion Type="Part" Value="2" />"#, sheet()).unwrap().unwrap();
        assert_eq!(obj.get_value("Value"), Some(Value::Float(2.0)));

        let button = Project::load_object(r#"<Button Text="x" />"#, sheet()).unwrap().unwrap();
        assert_eq!(button.type_name(), "ImageTextButton");

        assert!(Project::load_object("<Nope />", sheet()).unwrap().is_none());
        assert!(matches!(Project::load_object("<Nope", sheet()), Err(MmlError::Parse(_))));
    }

    #[test]
    fn save_object_writes_single_widget() {
        let project = Project::new(sheet());
        let mut label = Label::with_stylesheet(project.stylesheet());
        label.set_text("hi");
        assert_eq!(project.save_object(&label), r#"<Label Text="hi"/>"#);
    }
}
