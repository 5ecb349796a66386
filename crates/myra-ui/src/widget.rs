use std::rc::Rc;

use myra_engine::coords::{Rect, Vec2};
use myra_engine::input::{Key, Modifiers};
use myra_engine::paint::Color;

use crate::mml::{Describe, MmlEnum, Reflect, SimpleType, TypeInfo, TypeRef};
use crate::style::{Stylesheet, DEFAULT_STYLE_NAME};

// ── Enums ─────────────────────────────────────────────────────────────────

crate::mml_enum! {
    #[derive(Default)]
    pub enum HorizontalAlignment { #[default] Left, Center, Right, Stretch }
}

crate::mml_enum! {
    #[derive(Default)]
    pub enum VerticalAlignment { #[default] Top, Center, Bottom, Stretch }
}

crate::mml_enum! {
    pub enum Orientation { Horizontal, Vertical }
}

/// Declared element type of widget slots. Widgets belong to the `Item` family.
pub const WIDGET: TypeRef = TypeRef::new("Widget", &["Item"]);

// ── WidgetBase ────────────────────────────────────────────────────────────

/// State every widget carries: identity, placement, visibility and style.
#[derive(Clone)]
pub struct WidgetBase {
    pub id: String,
    pub style_name: String,
    /// Offsets added after alignment.
    pub left: i32,
    pub top: i32,
    /// Explicit size; `None` sizes to content.
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub grid_column: usize,
    pub grid_row: usize,
    pub grid_column_span: usize,
    pub grid_row_span: usize,
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
    pub visible: bool,
    pub enabled: bool,
    pub background: Option<Color>,
    /// Result of the last [`Widget::arrange`].
    pub bounds: Rect,
    /// Kept so that a later `StyleName` change can be applied.
    pub stylesheet: Option<Rc<Stylesheet>>,
}

impl Default for WidgetBase {
    fn default() -> Self {
        Self {
            id: String::new(),
            style_name: DEFAULT_STYLE_NAME.to_string(),
            left: 0,
            top: 0,
            width: None,
            height: None,
            grid_column: 0,
            grid_row: 0,
            grid_column_span: 1,
            grid_row_span: 1,
            horizontal_alignment: HorizontalAlignment::Left,
            vertical_alignment: VerticalAlignment::Top,
            visible: true,
            enabled: true,
            background: None,
            bounds: Rect::default(),
            stylesheet: None,
        }
    }
}

impl WidgetBase {
    pub fn stretched() -> Self {
        Self {
            horizontal_alignment: HorizontalAlignment::Stretch,
            vertical_alignment: VerticalAlignment::Stretch,
            ..Self::default()
        }
    }

    pub fn with_stylesheet(stylesheet: &Rc<Stylesheet>) -> Self {
        Self { stylesheet: Some(Rc::clone(stylesheet)), ..Self::default() }
    }
}

/// Properties shared by all widgets, with defaults read from `defaults`.
///
/// Concrete widgets start their table with this and append their own.
pub fn widget_properties<W: Widget + Describe>(defaults: &WidgetBase) -> TypeInfo<W> {
    TypeInfo::<W>::new()
        .simple("Id", SimpleType::String, |w: &W| w.base().id.clone().into(), |w, v| {
            w.base_mut().id = v.into_string()?;
            Some(())
        })
        .default_value(defaults.id.clone())
        .simple("StyleName", SimpleType::String, |w: &W| w.base().style_name.clone().into(), |w, v| {
            w.set_style_name(&v.into_string()?);
            Some(())
        })
        .default_value(defaults.style_name.clone())
        .simple("Left", SimpleType::Int, |w: &W| w.base().left.into(), |w, v| {
            w.base_mut().left = v.as_int()?;
            Some(())
        })
        .default_value(defaults.left)
        .simple("Top", SimpleType::Int, |w: &W| w.base().top.into(), |w, v| {
            w.base_mut().top = v.as_int()?;
            Some(())
        })
        .default_value(defaults.top)
        .nullable("Width", SimpleType::Int, |w: &W| w.base().width.into(), |w, v| {
            w.base_mut().width = v.as_opt_int()?;
            Some(())
        })
        .nullable("Height", SimpleType::Int, |w: &W| w.base().height.into(), |w, v| {
            w.base_mut().height = v.as_opt_int()?;
            Some(())
        })
        .simple("GridColumn", SimpleType::Int, |w: &W| w.base().grid_column.into(), |w, v| {
            w.base_mut().grid_column = v.as_usize()?;
            Some(())
        })
        .default_value(defaults.grid_column)
        .simple("GridRow", SimpleType::Int, |w: &W| w.base().grid_row.into(), |w, v| {
            w.base_mut().grid_row = v.as_usize()?;
            Some(())
        })
        .default_value(defaults.grid_row)
        .simple("GridColumnSpan", SimpleType::Int, |w: &W| w.base().grid_column_span.into(), |w, v| {
            w.base_mut().grid_column_span = v.as_usize()?.max(1);
            Some(())
        })
        .default_value(defaults.grid_column_span)
        .simple("GridRowSpan", SimpleType::Int, |w: &W| w.base().grid_row_span.into(), |w, v| {
            w.base_mut().grid_row_span = v.as_usize()?.max(1);
            Some(())
        })
        .default_value(defaults.grid_row_span)
        .simple(
            "HorizontalAlignment",
            SimpleType::Enum(HorizontalAlignment::VARIANTS),
            |w: &W| w.base().horizontal_alignment.into(),
            |w, v| {
                w.base_mut().horizontal_alignment = v.as_enum()?;
                Some(())
            },
        )
        .default_value(defaults.horizontal_alignment)
        .simple(
            "VerticalAlignment",
            SimpleType::Enum(VerticalAlignment::VARIANTS),
            |w: &W| w.base().vertical_alignment.into(),
            |w, v| {
                w.base_mut().vertical_alignment = v.as_enum()?;
                Some(())
            },
        )
        .default_value(defaults.vertical_alignment)
        .simple("Visible", SimpleType::Bool, |w: &W| w.base().visible.into(), |w, v| {
            w.base_mut().visible = v.as_bool()?;
            Some(())
        })
        .default_value(defaults.visible)
        .simple("Enabled", SimpleType::Bool, |w: &W| w.base().enabled.into(), |w, v| {
            w.base_mut().enabled = v.as_bool()?;
            Some(())
        })
        .default_value(defaults.enabled)
        .nullable("Background", SimpleType::Color, |w: &W| w.base().background.into(), |w, v| {
            w.base_mut().background = v.as_opt_color()?;
            Some(())
        })
}

// ── Widget trait ──────────────────────────────────────────────────────────

/// A node of the widget tree.
///
/// Layout is two-pass: [`measure`](Widget::measure) reports a desired size
/// for the available space, then [`arrange`](Widget::arrange) places the
/// widget inside the slot its parent gives it. Implementors only provide the
/// content passes; explicit sizes, alignment and visibility are handled here.
pub trait Widget: Reflect {
    fn base(&self) -> &WidgetBase;
    fn base_mut(&mut self) -> &mut WidgetBase;

    /// Desired size of the content within `available`.
    fn measure_content(&mut self, _available: Vec2) -> Vec2 {
        Vec2::zero()
    }

    /// Lays out children within the final `bounds`.
    fn arrange_content(&mut self, _bounds: Rect) {}

    /// Applies entry `name` of this widget's style map. Returns `false` when
    /// the stylesheet has no such entry.
    fn apply_style(&mut self, _stylesheet: &Stylesheet, _name: &str) -> bool {
        false
    }

    /// Returns `true` when the key was handled.
    fn on_key_down(&mut self, _key: Key, _mods: Modifiers) -> bool {
        false
    }

    fn on_char(&mut self, _c: char) -> bool {
        false
    }

    fn bounds(&self) -> Rect {
        self.base().bounds
    }

    fn measure(&mut self, available: Vec2) -> Vec2 {
        let base = self.base();
        if !base.visible {
            return Vec2::zero();
        }
        let (width, height) = (base.width, base.height);
        let inner = Vec2::new(
            width.map_or(available.x, |w| w as f32),
            height.map_or(available.y, |h| h as f32),
        );
        let content = self.measure_content(inner);
        Vec2::new(
            width.map_or(content.x, |w| w as f32),
            height.map_or(content.y, |h| h as f32),
        )
    }

    /// Places the widget inside `container` according to its alignment.
    fn arrange(&mut self, container: Rect) {
        if !self.base().visible {
            self.base_mut().bounds = Rect::from_origin_size(container.origin, Vec2::zero());
            return;
        }
        let desired = self.measure(container.size);
        let base = self.base();

        let (x, w) = match base.horizontal_alignment {
            HorizontalAlignment::Left => (container.left(), desired.x),
            HorizontalAlignment::Center => (container.left() + (container.size.x - desired.x) / 2.0, desired.x),
            HorizontalAlignment::Right => (container.right() - desired.x, desired.x),
            HorizontalAlignment::Stretch => {
                (container.left(), base.width.map_or(container.size.x, |w| w as f32))
            }
        };
        let (y, h) = match base.vertical_alignment {
            VerticalAlignment::Top => (container.top(), desired.y),
            VerticalAlignment::Center => (container.top() + (container.size.y - desired.y) / 2.0, desired.y),
            VerticalAlignment::Bottom => (container.bottom() - desired.y, desired.y),
            VerticalAlignment::Stretch => {
                (container.top(), base.height.map_or(container.size.y, |h| h as f32))
            }
        };

        let bounds = Rect::new(x + base.left as f32, y + base.top as f32, w, h);
        self.base_mut().bounds = bounds;
        self.arrange_content(bounds);
    }

    /// Switches to another named style and applies it when a stylesheet is attached.
    fn set_style_name(&mut self, name: &str) {
        let name = if name.is_empty() { DEFAULT_STYLE_NAME } else { name };
        self.base_mut().style_name = name.to_string();
        if let Some(sheet) = self.base().stylesheet.clone() {
            if !self.apply_style(&sheet, name) {
                log::debug!("{} has no style named {name}", self.type_name());
            }
        }
    }
}

/// Finds a widget by `id` in a subtree, depth first.
pub fn find_widget_by_id<'a>(root: &'a dyn Widget, id: &str) -> Option<&'a dyn Widget> {
    if root.base().id == id {
        return Some(root);
    }
    children_of(root).into_iter().find_map(|child| find_widget_by_id(child, id))
}

/// Direct widget children, through the parent role.
pub fn children_of(widget: &dyn Widget) -> Vec<&dyn Widget> {
    let Some(property) = widget.parent_role().property() else {
        return Vec::new();
    };
    let mut out: Vec<&dyn Widget> = Vec::new();
    if let Some(child) = widget.object(property) {
        out.extend(as_widget(child));
    }
    out.extend(widget.items(property).into_iter().filter_map(as_widget));
    out
}

fn as_widget(r: &dyn Reflect) -> Option<&dyn Widget> {
    r.as_widget()
}

/// The `Describe` methods every widget implements the same way.
macro_rules! widget_glue {
    () => {
        fn style_name_of(&self) -> Option<&str> {
            Some(&$crate::widget::Widget::base(self).style_name)
        }

        fn boxed_widget(self: Box<Self>) -> Result<Box<dyn $crate::widget::Widget>, Box<Self>> {
            Ok(self)
        }

        fn widget_ref(&self) -> Option<&dyn $crate::widget::Widget> {
            Some(self)
        }

        fn widget_mut(&mut self) -> Option<&mut dyn $crate::widget::Widget> {
            Some(self)
        }
    };
}

pub(crate) use widget_glue;
