use std::rc::Rc;

use myra_engine::coords::Vec2;
use myra_engine::paint::Color;
use myra_engine::text::FormattedText;

use crate::mml::{Describe, SimpleType, TypeInfo};
use crate::style::{Stylesheet, DEFAULT_STYLE_NAME};
use crate::widget::{widget_glue, widget_properties, Widget, WidgetBase, WIDGET};

/// Static text.
pub struct Label {
    base: WidgetBase,
    formatted: FormattedText,
    pub text_color: Color,
    pub disabled_text_color: Option<Color>,
    wrap: bool,
}

impl Default for Label {
    fn default() -> Self {
        Self::new()
    }
}

impl Label {
    /// Unstyled label with no font; it measures as empty until given one.
    pub fn new() -> Self {
        Self {
            base: WidgetBase::default(),
            formatted: FormattedText::new(),
            text_color: Color::white(),
            disabled_text_color: None,
            wrap: false,
        }
    }

    pub fn with_stylesheet(stylesheet: &Rc<Stylesheet>) -> Self {
        let mut label = Self { base: WidgetBase::with_stylesheet(stylesheet), ..Self::new() };
        label.formatted.set_font(stylesheet.font.clone());
        label.apply_style(stylesheet, DEFAULT_STYLE_NAME);
        label
    }

    pub fn text(&self) -> &str {
        self.formatted.text()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.formatted.set_text(text);
    }

    pub fn wrap(&self) -> bool {
        self.wrap
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    pub fn formatted_text(&mut self) -> &mut FormattedText {
        &mut self.formatted
    }

    /// Color the text is drawn with in the current state.
    pub fn current_text_color(&self) -> Color {
        match (self.base.enabled, self.disabled_text_color) {
            (false, Some(c)) => c,
            _ => self.text_color,
        }
    }
}

impl Widget for Label {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn measure_content(&mut self, available: Vec2) -> Vec2 {
        let width = (self.wrap && available.x.is_finite()).then_some(available.x);
        self.formatted.measure(width)
    }

    fn arrange_content(&mut self, bounds: myra_engine::coords::Rect) {
        self.formatted.set_width(self.wrap.then_some(bounds.size.x));
    }

    fn apply_style(&mut self, stylesheet: &Stylesheet, name: &str) -> bool {
        let Some(style) = stylesheet.label_styles.get(name) else { return false };
        self.text_color = style.text_color;
        self.disabled_text_color = style.disabled_text_color;
        self.base.background = style.background;
        true
    }
}

impl Describe for Label {
    const TYPE_NAME: &'static str = "Label";
    const FAMILIES: &'static [&'static str] = WIDGET.families;

    fn describe() -> TypeInfo<Self> {
        TypeInfo::<Self>::new()
            .inherit(widget_properties(&WidgetBase::default()))
            .simple("Text", SimpleType::String, |l| l.text().into(), |l, v| {
                l.set_text(v.into_string()?);
                Some(())
            })
            .default_value("")
            .simple("TextColor", SimpleType::Color, |l| l.text_color.into(), |l, v| {
                l.text_color = v.as_color()?;
                Some(())
            })
            .nullable("DisabledTextColor", SimpleType::Color, |l| l.disabled_text_color.into(), |l, v| {
                l.disabled_text_color = v.as_opt_color()?;
                Some(())
            })
            .simple("Wrap", SimpleType::Bool, |l| l.wrap.into(), |l, v| {
                l.wrap = v.as_bool()?;
                Some(())
            })
            .default_value(false)
    }

    widget_glue!();
}
