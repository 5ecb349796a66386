use std::rc::Rc;

use myra_engine::coords::{Rect, Vec2};
use myra_engine::input::{Key, Modifiers};
use myra_engine::paint::Color;

use crate::mml::{Describe, ParentRole, SimpleType, TypeInfo};
use crate::style::{Stylesheet, DEFAULT_STYLE_NAME};
use crate::widget::{widget_glue, widget_properties, Widget, WidgetBase, WIDGET};
use crate::widgets::grid::{Grid, Proportion};
use crate::widgets::label::Label;

const TITLE: usize = 0;
const CONTENT: usize = 1;

/// A titled frame around one content widget.
///
/// Internally a two-row grid: the title label in an `Auto` row, the content
/// in a `Fill` row below it.
pub struct Window {
    base: WidgetBase,
    grid: Grid,
    is_modal: bool,
    shown: bool,
    /// Outcome of a dialog-style window; not part of markup.
    pub result: bool,
    on_closed: Option<Box<dyn FnMut()>>,
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}

impl Window {
    pub fn new() -> Self {
        Self::build(WidgetBase::default(), Label::new())
    }

    pub fn with_stylesheet(stylesheet: &Rc<Stylesheet>) -> Self {
        let mut window = Self::build(WidgetBase::with_stylesheet(stylesheet), Label::with_stylesheet(stylesheet));
        window.apply_style(stylesheet, DEFAULT_STYLE_NAME);
        window
    }

    fn build(base: WidgetBase, title: Label) -> Self {
        let mut grid = Grid::new();
        *grid.base_mut() = WidgetBase::stretched();
        grid.row_spacing = 8;
        grid.rows_proportions = vec![Proportion::auto(), Proportion::fill(1.0)];
        grid.add_widget(Box::new(title));
        Self { base, grid, is_modal: false, shown: false, result: false, on_closed: None }
    }

    fn title_label(&self) -> Option<&Label> {
        self.grid.widgets().get(TITLE)?.as_any().downcast_ref()
    }

    fn title_label_mut(&mut self) -> Option<&mut Label> {
        self.grid.widgets_mut().get_mut(TITLE)?.as_any_mut().downcast_mut()
    }

    pub fn title(&self) -> &str {
        self.title_label().map_or("", Label::text)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        if let Some(label) = self.title_label_mut() {
            label.set_text(title);
        }
    }

    pub fn title_text_color(&self) -> Color {
        self.title_label().map_or(Color::white(), |l| l.text_color)
    }

    pub fn set_title_text_color(&mut self, color: Color) {
        if let Some(label) = self.title_label_mut() {
            label.text_color = color;
        }
    }

    // ── content ───────────────────────────────────────────────────────────

    pub fn content(&self) -> Option<&dyn Widget> {
        self.grid.widgets().get(CONTENT).map(|w| w.as_ref())
    }

    pub fn content_mut(&mut self) -> Option<&mut Box<dyn Widget>> {
        self.grid.widgets_mut().get_mut(CONTENT)
    }

    /// Replaces the content, returning the previous one.
    pub fn set_content(&mut self, content: Option<Box<dyn Widget>>) -> Option<Box<dyn Widget>> {
        let old = self.grid.remove_widget(CONTENT);
        if let Some(mut widget) = content {
            widget.base_mut().grid_row = CONTENT;
            self.grid.add_widget(widget);
        }
        old
    }

    // ── showing ───────────────────────────────────────────────────────────

    pub fn is_modal(&self) -> bool {
        self.is_modal
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn show(&mut self) {
        self.shown = true;
    }

    pub fn show_modal(&mut self) {
        self.shown = true;
        self.is_modal = true;
    }

    /// Hides the window. The close handler fires only if it was shown.
    pub fn close(&mut self) {
        if !self.shown {
            return;
        }
        self.shown = false;
        if let Some(f) = self.on_closed.as_mut() {
            f();
        }
        self.is_modal = false;
    }

    /// Registers the close handler, replacing any previous one.
    pub fn on_closed(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_closed = Some(Box::new(f));
        self
    }

    pub fn set_on_closed(&mut self, f: impl FnMut() + 'static) {
        self.on_closed = Some(Box::new(f));
    }

    /// Positions the window in the middle of `desktop`.
    pub fn center_on(&mut self, desktop: Rect) {
        let size = self.measure(desktop.size);
        self.base.left = ((desktop.size.x - size.x) / 2.0) as i32;
        self.base.top = ((desktop.size.y - size.y) / 2.0) as i32;
    }
}

impl Widget for Window {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn measure_content(&mut self, available: Vec2) -> Vec2 {
        self.grid.measure(available)
    }

    fn arrange_content(&mut self, bounds: Rect) {
        self.grid.arrange(bounds);
    }

    fn apply_style(&mut self, stylesheet: &Stylesheet, name: &str) -> bool {
        let Some(style) = stylesheet.window_styles.get(name) else { return false };
        self.base.background = style.background;
        self.set_title_text_color(style.title_style.text_color);
        true
    }

    fn on_key_down(&mut self, key: Key, mods: Modifiers) -> bool {
        if key == Key::Escape {
            self.close();
            return true;
        }
        self.content_mut().is_some_and(|c| c.base().enabled && c.on_key_down(key, mods))
    }

    fn on_char(&mut self, c: char) -> bool {
        self.content_mut().is_some_and(|w| w.on_char(c))
    }
}

impl Describe for Window {
    const TYPE_NAME: &'static str = "Window";
    const FAMILIES: &'static [&'static str] = WIDGET.families;
    const PARENT_ROLE: ParentRole = ParentRole::Content("Content");

    fn describe() -> TypeInfo<Self> {
        TypeInfo::<Self>::new()
            .inherit(widget_properties(&WidgetBase::default()))
            .simple("Title", SimpleType::String, |w| w.title().into(), |w, v| {
                w.set_title(v.into_string()?);
                Some(())
            })
            .default_value("")
            .simple("TitleTextColor", SimpleType::Color, |w| w.title_text_color().into(), |w, v| {
                w.set_title_text_color(v.as_color()?);
                Some(())
            })
            .style_path("TitleStyle/TextColor")
            .simple("IsModal", SimpleType::Bool, |w| w.is_modal.into(), |w, v| {
                w.is_modal = v.as_bool()?;
                Some(())
            })
            .ignored()
            .simple("Result", SimpleType::Bool, |w| w.result.into(), |w, v| {
                w.result = v.as_bool()?;
                Some(())
            })
            .ignored()
            .object(
                "Content",
                WIDGET,
                |w| w.content().map(|c| c.as_reflect()),
                |w| w.content_mut().map(|c| c.as_reflect_mut()),
                |w, item| {
                    w.set_content(Some(item.into_widget().ok()?));
                    Some(())
                },
            )
    }

    widget_glue!();
}
