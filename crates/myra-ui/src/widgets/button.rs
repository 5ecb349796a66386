use std::rc::Rc;

use myra_engine::coords::Vec2;
use myra_engine::input::{Key, Modifiers};
use myra_engine::paint::Color;
use myra_engine::text::FormattedText;

use crate::mml::{Describe, SimpleType, TypeInfo};
use crate::style::{Stylesheet, DEFAULT_STYLE_NAME};
use crate::widget::{widget_glue, widget_properties, Widget, WidgetBase, WIDGET};

/// Clickable button with a text caption.
///
/// Markup written before the button types were merged uses the tag `Button`.
pub struct ImageTextButton {
    base: WidgetBase,
    caption: FormattedText,
    pub text_color: Color,
    pub toggleable: bool,
    pressed: bool,
    hovered: bool,
    on_click: Option<Box<dyn FnMut()>>,
}

impl Default for ImageTextButton {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageTextButton {
    pub fn new() -> Self {
        Self {
            base: WidgetBase::default(),
            caption: FormattedText::new(),
            text_color: Color::white(),
            toggleable: false,
            pressed: false,
            hovered: false,
            on_click: None,
        }
    }

    pub fn with_stylesheet(stylesheet: &Rc<Stylesheet>) -> Self {
        let mut button = Self { base: WidgetBase::with_stylesheet(stylesheet), ..Self::new() };
        button.caption.set_font(stylesheet.font.clone());
        button.apply_style(stylesheet, DEFAULT_STYLE_NAME);
        button
    }

    pub fn text(&self) -> &str {
        self.caption.text()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.caption.set_text(text);
    }

    /// Registers the click handler, replacing any previous one.
    pub fn on_click(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_click = Some(Box::new(f));
        self
    }

    pub fn set_on_click(&mut self, f: impl FnMut() + 'static) {
        self.on_click = Some(Box::new(f));
    }

    /// Fires the click handler. Toggleable buttons flip their pressed state instead.
    pub fn click(&mut self) {
        if !self.base.enabled {
            return;
        }
        if self.toggleable {
            self.pressed = !self.pressed;
            return;
        }
        if let Some(f) = self.on_click.as_mut() {
            f();
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    /// Lower-cased character following the first `_` in the caption.
    pub fn underscore_char(&self) -> Option<char> {
        let (_, rest) = self.text().split_once('_')?;
        rest.chars().next().map(|c| c.to_ascii_lowercase())
    }
}

impl Widget for ImageTextButton {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn measure_content(&mut self, _available: Vec2) -> Vec2 {
        self.caption.measure(None)
    }

    fn apply_style(&mut self, stylesheet: &Stylesheet, name: &str) -> bool {
        let Some(style) = stylesheet.button_styles.get(name) else { return false };
        self.base.background = style.background;
        self.text_color = style.label_style.text_color;
        true
    }

    fn on_key_down(&mut self, key: Key, _mods: Modifiers) -> bool {
        match key {
            Key::Enter | Key::Space => {
                self.click();
                true
            }
            _ => false,
        }
    }
}

impl Describe for ImageTextButton {
    const TYPE_NAME: &'static str = "ImageTextButton";
    const FAMILIES: &'static [&'static str] = WIDGET.families;

    fn describe() -> TypeInfo<Self> {
        TypeInfo::<Self>::new()
            .inherit(widget_properties(&WidgetBase::default()))
            .simple("Text", SimpleType::String, |b| b.text().into(), |b, v| {
                b.set_text(v.into_string()?);
                Some(())
            })
            .default_value("")
            .simple("TextColor", SimpleType::Color, |b| b.text_color.into(), |b, v| {
                b.text_color = v.as_color()?;
                Some(())
            })
            .style_path("LabelStyle/TextColor")
            .simple("Toggleable", SimpleType::Bool, |b| b.toggleable.into(), |b, v| {
                b.toggleable = v.as_bool()?;
                Some(())
            })
            .default_value(false)
    }

    widget_glue!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn click_fires_handler_when_enabled() {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let mut button = ImageTextButton::new().on_click(move || seen.set(seen.get() + 1));

        button.click();
        assert!(button.on_key_down(Key::Enter, Modifiers::NONE));
        assert_eq!(count.get(), 2);

        button.base_mut().enabled = false;
        button.click();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn toggleable_flips_pressed() {
        let mut button = ImageTextButton::new();
        button.toggleable = true;
        button.click();
        assert!(button.is_pressed());
        button.click();
        assert!(!button.is_pressed());
    }

    #[test]
    fn underscore_mnemonic() {
        let mut button = ImageTextButton::new();
        button.set_text("_File");
        assert_eq!(button.underscore_char(), Some('f'));
        button.set_text("Edit");
        assert_eq!(button.underscore_char(), None);
    }

    #[test]
    fn style_sets_caption_color() {
        let mut sheet = Stylesheet::default();
        if let Some(s) = sheet.button_styles.get_mut(DEFAULT_STYLE_NAME) {
            s.label_style.text_color = Color::rgb(0, 0, 255);
        }
        let button = ImageTextButton::with_stylesheet(&Rc::new(sheet));
        assert_eq!(button.text_color, Color::rgb(0, 0, 255));
    }
}
