use std::collections::HashMap;

use myra_engine::paint::Color;
use myra_engine::text::{MonospaceFont, SharedFont};

use crate::mml::{Describe, PropertyMeta, Reflect, SimpleType, TypeInfo, TypeRef};

/// Style entry used when a widget names none.
pub const DEFAULT_STYLE_NAME: &str = "default";

// ── Style types ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    pub text_color: Color,
    pub disabled_text_color: Option<Color>,
    pub background: Option<Color>,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self { text_color: Color::white(), disabled_text_color: None, background: None }
    }
}

impl Describe for LabelStyle {
    const TYPE_NAME: &'static str = "LabelStyle";

    fn describe() -> TypeInfo<Self> {
        TypeInfo::<Self>::new()
            .simple("TextColor", SimpleType::Color, |s| s.text_color.into(), |s, v| {
                s.text_color = v.as_color()?;
                Some(())
            })
            .nullable("DisabledTextColor", SimpleType::Color, |s| s.disabled_text_color.into(), |s, v| {
                s.disabled_text_color = v.as_opt_color()?;
                Some(())
            })
            .nullable("Background", SimpleType::Color, |s| s.background.into(), |s, v| {
                s.background = v.as_opt_color()?;
                Some(())
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextFieldStyle {
    pub text_color: Color,
    pub disabled_text_color: Option<Color>,
    pub focused_text_color: Option<Color>,
    pub background: Option<Color>,
}

impl Default for TextFieldStyle {
    fn default() -> Self {
        Self {
            text_color: Color::white(),
            disabled_text_color: Some(Color::rgb(128, 128, 128)),
            focused_text_color: None,
            background: Some(Color::rgb(64, 64, 64)),
        }
    }
}

impl Describe for TextFieldStyle {
    const TYPE_NAME: &'static str = "TextFieldStyle";

    fn describe() -> TypeInfo<Self> {
        TypeInfo::<Self>::new()
            .simple("TextColor", SimpleType::Color, |s| s.text_color.into(), |s, v| {
                s.text_color = v.as_color()?;
                Some(())
            })
            .nullable("DisabledTextColor", SimpleType::Color, |s| s.disabled_text_color.into(), |s, v| {
                s.disabled_text_color = v.as_opt_color()?;
                Some(())
            })
            .nullable("FocusedTextColor", SimpleType::Color, |s| s.focused_text_color.into(), |s, v| {
                s.focused_text_color = v.as_opt_color()?;
                Some(())
            })
            .nullable("Background", SimpleType::Color, |s| s.background.into(), |s, v| {
                s.background = v.as_opt_color()?;
                Some(())
            })
    }
}

/// Shared by `ImageTextButton`, `TextButton` and `ImageButton`.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonStyle {
    pub background: Option<Color>,
    pub over_background: Option<Color>,
    pub label_style: LabelStyle,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            background: Some(Color::rgb(64, 64, 64)),
            over_background: Some(Color::rgb(128, 128, 128)),
            label_style: LabelStyle::default(),
        }
    }
}

impl Describe for ButtonStyle {
    const TYPE_NAME: &'static str = "ButtonStyle";

    fn describe() -> TypeInfo<Self> {
        TypeInfo::<Self>::new()
            .nullable("Background", SimpleType::Color, |s| s.background.into(), |s, v| {
                s.background = v.as_opt_color()?;
                Some(())
            })
            .nullable("OverBackground", SimpleType::Color, |s| s.over_background.into(), |s, v| {
                s.over_background = v.as_opt_color()?;
                Some(())
            })
            .object(
                "LabelStyle",
                TypeRef::of::<LabelStyle>(),
                |s| Some(&s.label_style),
                |s| Some(&mut s.label_style),
                |s, v| {
                    s.label_style = crate::mml::downcast(v)?;
                    Some(())
                },
            )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowStyle {
    pub background: Option<Color>,
    pub title_style: LabelStyle,
}

impl Default for WindowStyle {
    fn default() -> Self {
        Self {
            background: Some(Color::rgb(32, 32, 32)),
            title_style: LabelStyle { text_color: Color::rgb(255, 215, 0), ..LabelStyle::default() },
        }
    }
}

impl Describe for WindowStyle {
    const TYPE_NAME: &'static str = "WindowStyle";

    fn describe() -> TypeInfo<Self> {
        TypeInfo::<Self>::new()
            .nullable("Background", SimpleType::Color, |s| s.background.into(), |s, v| {
                s.background = v.as_opt_color()?;
                Some(())
            })
            .object(
                "TitleStyle",
                TypeRef::of::<LabelStyle>(),
                |s| Some(&s.title_style),
                |s| Some(&mut s.title_style),
                |s, v| {
                    s.title_style = crate::mml::downcast(v)?;
                    Some(())
                },
            )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuStyle {
    pub background: Option<Color>,
    pub label_style: LabelStyle,
}

impl Default for MenuStyle {
    fn default() -> Self {
        Self { background: Some(Color::rgb(48, 48, 48)), label_style: LabelStyle::default() }
    }
}

impl Describe for MenuStyle {
    const TYPE_NAME: &'static str = "MenuStyle";

    fn describe() -> TypeInfo<Self> {
        TypeInfo::<Self>::new()
            .nullable("Background", SimpleType::Color, |s| s.background.into(), |s, v| {
                s.background = v.as_opt_color()?;
                Some(())
            })
            .object(
                "LabelStyle",
                TypeRef::of::<LabelStyle>(),
                |s| Some(&s.label_style),
                |s| Some(&mut s.label_style),
                |s, v| {
                    s.label_style = crate::mml::downcast(v)?;
                    Some(())
                },
            )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitPaneStyle {
    pub background: Option<Color>,
    pub handle_size: i32,
}

impl Default for SplitPaneStyle {
    fn default() -> Self {
        Self { background: None, handle_size: 4 }
    }
}

impl Describe for SplitPaneStyle {
    const TYPE_NAME: &'static str = "SplitPaneStyle";

    fn describe() -> TypeInfo<Self> {
        TypeInfo::<Self>::new()
            .nullable("Background", SimpleType::Color, |s| s.background.into(), |s, v| {
                s.background = v.as_opt_color()?;
                Some(())
            })
            .simple("HandleSize", SimpleType::Int, |s| s.handle_size.into(), |s, v| {
                s.handle_size = v.as_int()?;
                Some(())
            })
    }
}

// ── Stylesheet ────────────────────────────────────────────────────────────

/// Named styles per widget type, each map holding a `"default"` entry.
///
/// Widgets read their initial look from it, and saving consults it so that
/// values a widget got from its style are not written back out.
pub struct Stylesheet {
    pub label_styles: HashMap<String, LabelStyle>,
    pub text_field_styles: HashMap<String, TextFieldStyle>,
    pub button_styles: HashMap<String, ButtonStyle>,
    pub window_styles: HashMap<String, WindowStyle>,
    pub horizontal_menu_styles: HashMap<String, MenuStyle>,
    pub vertical_menu_styles: HashMap<String, MenuStyle>,
    pub horizontal_split_pane_styles: HashMap<String, SplitPaneStyle>,
    pub vertical_split_pane_styles: HashMap<String, SplitPaneStyle>,
    /// Font text widgets lay out with. Hosts usually swap in a
    /// [`ScaledFont`](myra_engine::text::ScaledFont).
    pub font: Option<SharedFont>,
}

fn with_default<S: Default>() -> HashMap<String, S> {
    HashMap::from([(DEFAULT_STYLE_NAME.to_string(), S::default())])
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self {
            label_styles: with_default(),
            text_field_styles: with_default(),
            button_styles: with_default(),
            window_styles: with_default(),
            horizontal_menu_styles: with_default(),
            vertical_menu_styles: with_default(),
            horizontal_split_pane_styles: with_default(),
            vertical_split_pane_styles: with_default(),
            font: Some(MonospaceFont::shared(8.0, 16.0)),
        }
    }
}

impl Stylesheet {
    /// Style `style_name` from the map that serves widgets tagged `type_name`.
    pub fn find_style(&self, type_name: &str, style_name: &str) -> Option<&dyn Reflect> {
        fn get<'a, S: Describe>(map: &'a HashMap<String, S>, name: &str) -> Option<&'a dyn Reflect> {
            map.get(name).map(|s| s as &dyn Reflect)
        }

        match type_name {
            "Label" => get(&self.label_styles, style_name),
            "TextField" => get(&self.text_field_styles, style_name),
            "ImageTextButton" | "TextButton" | "ImageButton" | "Button" => get(&self.button_styles, style_name),
            "Window" => get(&self.window_styles, style_name),
            "HorizontalMenu" => get(&self.horizontal_menu_styles, style_name),
            "VerticalMenu" => get(&self.vertical_menu_styles, style_name),
            "HorizontalSplitPane" => get(&self.horizontal_split_pane_styles, style_name),
            "VerticalSplitPane" => get(&self.vertical_split_pane_styles, style_name),
            _ => None,
        }
    }
}

fn default_entry<S>(map: &HashMap<String, S>) -> Option<&S> {
    map.get(DEFAULT_STYLE_NAME)
}

impl Describe for Stylesheet {
    const TYPE_NAME: &'static str = "Stylesheet";

    // The default entries, so that `/`-rooted style paths resolve.
    fn describe() -> TypeInfo<Self> {
        TypeInfo::<Self>::new()
            .object(
                "LabelStyle",
                TypeRef::of::<LabelStyle>(),
                |s| default_entry(&s.label_styles).map(|x| x as &dyn Reflect),
                |s| s.label_styles.get_mut(DEFAULT_STYLE_NAME).map(|x| x as &mut dyn Reflect),
                |s, v| {
                    s.label_styles.insert(DEFAULT_STYLE_NAME.to_string(), crate::mml::downcast(v)?);
                    Some(())
                },
            )
            .object(
                "TextFieldStyle",
                TypeRef::of::<TextFieldStyle>(),
                |s| default_entry(&s.text_field_styles).map(|x| x as &dyn Reflect),
                |s| s.text_field_styles.get_mut(DEFAULT_STYLE_NAME).map(|x| x as &mut dyn Reflect),
                |s, v| {
                    s.text_field_styles.insert(DEFAULT_STYLE_NAME.to_string(), crate::mml::downcast(v)?);
                    Some(())
                },
            )
            .object(
                "ButtonStyle",
                TypeRef::of::<ButtonStyle>(),
                |s| default_entry(&s.button_styles).map(|x| x as &dyn Reflect),
                |s| s.button_styles.get_mut(DEFAULT_STYLE_NAME).map(|x| x as &mut dyn Reflect),
                |s, v| {
                    s.button_styles.insert(DEFAULT_STYLE_NAME.to_string(), crate::mml::downcast(v)?);
                    Some(())
                },
            )
            .object(
                "WindowStyle",
                TypeRef::of::<WindowStyle>(),
                |s| default_entry(&s.window_styles).map(|x| x as &dyn Reflect),
                |s| s.window_styles.get_mut(DEFAULT_STYLE_NAME).map(|x| x as &mut dyn Reflect),
                |s, v| {
                    s.window_styles.insert(DEFAULT_STYLE_NAME.to_string(), crate::mml::downcast(v)?);
                    Some(())
                },
            )
    }
}

/// True when `obj` is a styled widget whose value for `meta` equals the one
/// its stylesheet entry supplies.
///
/// An empty style name means the default entry. The style value is found by
/// the property's style path, or by its own name when it declares none. Any
/// missing link along the way counts as "no stylesheet value".
pub fn has_stylesheet_value(obj: &dyn Reflect, meta: &PropertyMeta, stylesheet: &Stylesheet) -> bool {
    let Some(style_name) = obj.style_name() else { return false };
    let style_name = if style_name.is_empty() { DEFAULT_STYLE_NAME } else { style_name };
    let Some(style) = stylesheet.find_style(obj.type_name(), style_name) else {
        return false;
    };

    let (mut target, path) = match meta.style_path {
        Some(path) => match path.strip_prefix('/') {
            Some(rooted) => (stylesheet as &dyn Reflect, rooted),
            None => (style, path),
        },
        None => (style, meta.name),
    };

    let (parents, last) = match path.rsplit_once('/') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, path),
    };
    for part in parents.into_iter().flat_map(|p| p.split('/')) {
        match target.object(part) {
            Some(next) => target = next,
            None => return false,
        }
    }

    match (target.get_value(last), obj.get_value(meta.name)) {
        (Some(style_value), Some(value)) => style_value == value,
        _ => false,
    }
}
