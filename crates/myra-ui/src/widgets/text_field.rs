use std::rc::Rc;

use myra_engine::coords::{Rect, Vec2};
use myra_engine::input::{Key, Modifiers};
use myra_engine::paint::Color;
use myra_engine::text::FormattedText;

use crate::mml::{Describe, MmlEnum, SimpleType, TypeInfo};
use crate::style::{Stylesheet, DEFAULT_STYLE_NAME};
use crate::text_edit::TextEditor;
use crate::widget::{widget_glue, widget_properties, HorizontalAlignment, VerticalAlignment, Widget, WidgetBase, WIDGET};

/// Editable text box.
///
/// Edits go through a [`TextEditor`], which keeps the undo history; the
/// [`FormattedText`] mirrors its buffer for layout and cursor geometry.
pub struct TextField {
    base: WidgetBase,
    editor: TextEditor,
    formatted: FormattedText,
    vertical_spacing: i32,
    multiline: bool,
    wrap: bool,
    pub text_color: Color,
    pub disabled_text_color: Option<Color>,
    pub focused_text_color: Option<Color>,
    pub blink_interval_ms: i32,
    pub readonly: bool,
    pub text_vertical_alignment: VerticalAlignment,
    pub focused: bool,
}

impl Default for TextField {
    fn default() -> Self {
        Self::new()
    }
}

fn field_base() -> WidgetBase {
    WidgetBase { horizontal_alignment: HorizontalAlignment::Stretch, ..WidgetBase::default() }
}

impl TextField {
    pub fn new() -> Self {
        Self {
            base: field_base(),
            editor: TextEditor::new(),
            formatted: FormattedText::new(),
            vertical_spacing: 0,
            multiline: false,
            wrap: false,
            text_color: Color::white(),
            disabled_text_color: None,
            focused_text_color: None,
            blink_interval_ms: 450,
            readonly: false,
            text_vertical_alignment: VerticalAlignment::Top,
            focused: false,
        }
    }

    pub fn with_stylesheet(stylesheet: &Rc<Stylesheet>) -> Self {
        let mut field = Self { base: WidgetBase { stylesheet: Some(Rc::clone(stylesheet)), ..field_base() }, ..Self::new() };
        field.formatted.set_font(stylesheet.font.clone());
        field.apply_style(stylesheet, DEFAULT_STYLE_NAME);
        field
    }

    // ── text ──────────────────────────────────────────────────────────────

    pub fn text(&self) -> &str {
        self.editor.text()
    }

    /// Programmatic assignment. The undo history is kept.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.with_editor(|e| {
            e.set_text(text);
            e.clamp();
        });
    }

    pub fn editor(&self) -> &TextEditor {
        &self.editor
    }

    /// Runs `f` on the editor, then brings the layout up to date.
    pub fn with_editor<R>(&mut self, f: impl FnOnce(&mut TextEditor) -> R) -> R {
        let result = f(&mut self.editor);
        self.formatted.set_text(self.editor.text());
        result
    }

    pub fn formatted_text(&mut self) -> &mut FormattedText {
        &mut self.formatted
    }

    pub fn cursor_position(&self) -> usize {
        self.editor.cursor()
    }

    pub fn set_cursor_position(&mut self, position: usize) {
        self.editor.set_cursor(position);
    }

    pub fn replace(&mut self, where_: usize, len: usize, text: &str) {
        self.with_editor(|e| e.replace(where_, len, text));
    }

    pub fn replace_all(&mut self, text: &str) {
        self.with_editor(|e| e.replace_all(text));
    }

    pub fn undo(&mut self) {
        self.with_editor(TextEditor::undo);
    }

    pub fn redo(&mut self) {
        self.with_editor(TextEditor::redo);
    }

    // ── layout options ────────────────────────────────────────────────────

    pub fn multiline(&self) -> bool {
        self.multiline
    }

    pub fn set_multiline(&mut self, value: bool) {
        self.multiline = value;
    }

    pub fn wrap(&self) -> bool {
        self.wrap
    }

    pub fn set_wrap(&mut self, value: bool) {
        self.wrap = value;
    }

    pub fn vertical_spacing(&self) -> i32 {
        self.vertical_spacing
    }

    pub fn set_vertical_spacing(&mut self, value: i32) {
        self.vertical_spacing = value;
        self.formatted.set_vertical_spacing(value as f32);
    }

    pub fn password_field(&self) -> bool {
        self.formatted.is_password()
    }

    pub fn set_password_field(&mut self, value: bool) {
        self.formatted.set_password(value);
    }

    /// Color the text is drawn with in the current state.
    pub fn current_text_color(&self) -> Color {
        if !self.base.enabled {
            if let Some(c) = self.disabled_text_color {
                return c;
            }
        }
        if self.focused {
            if let Some(c) = self.focused_text_color {
                return c;
            }
        }
        self.text_color
    }

    // ── cursor geometry ───────────────────────────────────────────────────

    /// X of the cursor relative to the text origin.
    fn cursor_x(&mut self) -> f32 {
        let cursor = self.editor.cursor();
        if let Some((_, glyph)) = self.formatted.glyph_at(cursor) {
            return glyph.bounds.left();
        }
        match cursor.checked_sub(1).and_then(|i| self.formatted.glyph_at(i)) {
            Some((_, glyph)) if glyph.character != '\n' => glyph.bounds.right(),
            _ => 0.0,
        }
    }

    /// Moves the cursor `delta` lines, to the glyph nearest its current x.
    pub fn move_line(&mut self, delta: isize) {
        let Some(line) = self.formatted.line_at(self.editor.cursor()) else { return };
        let Some(target) = line.checked_add_signed(delta) else { return };
        if target >= self.formatted.lines().len() {
            return;
        }

        let preferred = self.cursor_x();
        let new_line = &self.formatted.lines()[target];
        let count = new_line.count();
        for i in 0..count {
            let Some(glyph) = new_line.glyph(i) else { continue };
            let b = glyph.bounds;
            if b.left() <= preferred && preferred < b.right() {
                let near_left = preferred - b.left() < b.size.x / 2.0;
                let at = if near_left || i + 1 >= count { i } else { i + 1 };
                let position = new_line.line_start() + at;
                self.editor.set_cursor(position);
                return;
            }
        }
    }

    fn line_bounds(&mut self) -> Option<(usize, usize)> {
        let index = self.formatted.line_at(self.editor.cursor())?;
        let line = &self.formatted.lines()[index];
        let mut end = line.line_start() + line.count();
        if line.text().ends_with('\n') {
            end -= 1;
        }
        Some((line.line_start(), end))
    }

    // ── clipboard ─────────────────────────────────────────────────────────

    /// Copies the selection to the system clipboard.
    pub fn copy(&self) {
        if !self.editor.has_selection() {
            return;
        }
        let selected = self.editor.selected_text().to_string();
        if let Ok(mut cb) = arboard::Clipboard::new() {
            let _ = cb.set_text(selected);
        }
    }

    /// Pastes the clipboard text over the selection.
    pub fn paste_from_clipboard(&mut self) -> bool {
        let Ok(mut cb) = arboard::Clipboard::new() else { return false };
        match cb.get_text() {
            Ok(text) if !text.is_empty() => self.with_editor(|e| e.paste(&text)),
            _ => false,
        }
    }

    fn backspace(&mut self) {
        self.with_editor(|e| {
            if e.has_selection() {
                e.delete_selection();
            } else if e.cursor() > 0 {
                let at = e.cursor() - 1;
                e.delete(at, 1);
                e.set_cursor(at);
            }
        });
    }

    fn delete_forward(&mut self) {
        self.with_editor(|e| {
            if e.has_selection() {
                e.delete_selection();
            } else {
                e.delete(e.cursor(), 1);
            }
        });
    }
}

impl Widget for TextField {
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

    fn arrange_content(&mut self, bounds: Rect) {
        self.formatted.set_width(self.wrap.then_some(bounds.size.x));
    }

    fn apply_style(&mut self, stylesheet: &Stylesheet, name: &str) -> bool {
        let Some(style) = stylesheet.text_field_styles.get(name) else { return false };
        self.text_color = style.text_color;
        self.disabled_text_color = style.disabled_text_color;
        self.focused_text_color = style.focused_text_color;
        self.base.background = style.background;
        true
    }

    fn on_key_down(&mut self, key: Key, mods: Modifiers) -> bool {
        let editable = !self.readonly && self.base.enabled;
        match key {
            Key::C if mods.ctrl => self.copy(),
            Key::X if mods.ctrl && editable => {
                self.copy();
                self.with_editor(TextEditor::delete_selection);
            }
            Key::V if mods.ctrl && editable => {
                self.paste_from_clipboard();
            }
            Key::A if mods.ctrl => self.editor.select_all(),
            Key::Z if mods.ctrl && editable => self.undo(),
            Key::Y if mods.ctrl && editable => self.redo(),
            Key::Insert if editable => {
                let mode = self.editor.insert_mode();
                self.editor.set_insert_mode(!mode);
            }
            Key::ArrowLeft => self.editor.move_left(),
            Key::ArrowRight => self.editor.move_right(),
            Key::ArrowUp => self.move_line(-1),
            Key::ArrowDown => self.move_line(1),
            Key::Home => {
                if let Some((start, _)) = self.line_bounds() {
                    self.editor.set_cursor(start);
                }
            }
            Key::End => {
                if let Some((_, end)) = self.line_bounds() {
                    self.editor.set_cursor(end);
                }
            }
            Key::Backspace if editable => self.backspace(),
            Key::Delete if editable => self.delete_forward(),
            Key::Enter if editable && self.multiline => self.with_editor(TextEditor::input_newline),
            _ => return false,
        }
        true
    }

    fn on_char(&mut self, c: char) -> bool {
        if self.readonly || !self.base.enabled || c.is_control() {
            return false;
        }
        self.with_editor(|e| e.input_char(c));
        true
    }
}

impl Describe for TextField {
    const TYPE_NAME: &'static str = "TextField";
    const FAMILIES: &'static [&'static str] = WIDGET.families;

    fn describe() -> TypeInfo<Self> {
        TypeInfo::<Self>::new()
            .inherit(widget_properties(&field_base()))
            .simple("Text", SimpleType::String, |t| t.text().into(), |t, v| {
                t.set_text(v.into_string()?);
                Some(())
            })
            .default_value("")
            .simple("VerticalSpacing", SimpleType::Int, |t| t.vertical_spacing.into(), |t, v| {
                t.set_vertical_spacing(v.as_int()?);
                Some(())
            })
            .default_value(0)
            .simple("Multiline", SimpleType::Bool, |t| t.multiline.into(), |t, v| {
                t.multiline = v.as_bool()?;
                Some(())
            })
            .default_value(false)
            .simple("Wrap", SimpleType::Bool, |t| t.wrap.into(), |t, v| {
                t.wrap = v.as_bool()?;
                Some(())
            })
            .default_value(false)
            .simple("TextColor", SimpleType::Color, |t| t.text_color.into(), |t, v| {
                t.text_color = v.as_color()?;
                Some(())
            })
            .nullable("DisabledTextColor", SimpleType::Color, |t| t.disabled_text_color.into(), |t, v| {
                t.disabled_text_color = v.as_opt_color()?;
                Some(())
            })
            .nullable("FocusedTextColor", SimpleType::Color, |t| t.focused_text_color.into(), |t, v| {
                t.focused_text_color = v.as_opt_color()?;
                Some(())
            })
            .simple("BlinkIntervalInMs", SimpleType::Int, |t| t.blink_interval_ms.into(), |t, v| {
                t.blink_interval_ms = v.as_int()?;
                Some(())
            })
            .default_value(450)
            .simple("Readonly", SimpleType::Bool, |t| t.readonly.into(), |t, v| {
                t.readonly = v.as_bool()?;
                Some(())
            })
            .default_value(false)
            .simple("PasswordField", SimpleType::Bool, |t| t.password_field().into(), |t, v| {
                t.set_password_field(v.as_bool()?);
                Some(())
            })
            .default_value(false)
            .simple(
                "TextVerticalAlignment",
                SimpleType::Enum(VerticalAlignment::VARIANTS),
                |t| t.text_vertical_alignment.into(),
                |t, v| {
                    t.text_vertical_alignment = v.as_enum()?;
                    Some(())
                },
            )
            .default_value(VerticalAlignment::Top)
            .simple("CursorPosition", SimpleType::Int, |t| t.cursor_position().into(), |t, v| {
                t.set_cursor_position(v.as_usize()?);
                Some(())
            })
            .ignored()
    }

    widget_glue!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mml::{properties_of, Reflect, Value};

    fn field(text: &str) -> TextField {
        let mut f = TextField::with_stylesheet(&Rc::new(Stylesheet::default()));
        f.set_text(text);
        f
    }

    fn type_str(f: &mut TextField, s: &str) {
        for c in s.chars() {
            f.on_char(c);
        }
    }

    #[test]
    fn typing_then_ctrl_z_restores() {
        let mut f = field("");
        type_str(&mut f, "hey");
        assert_eq!(f.text(), "hey");
        assert!(f.on_key_down(Key::Z, Modifiers::CTRL));
        assert_eq!(f.text(), "he");
        assert!(f.on_key_down(Key::Y, Modifiers::CTRL));
        assert_eq!(f.text(), "hey");
    }

    #[test]
    fn backspace_and_delete() {
        let mut f = field("abc");
        f.set_cursor_position(2);
        f.on_key_down(Key::Backspace, Modifiers::NONE);
        assert_eq!((f.text(), f.cursor_position()), ("ac", 1));
        f.on_key_down(Key::Delete, Modifiers::NONE);
        assert_eq!((f.text(), f.cursor_position()), ("a", 1));
        f.on_key_down(Key::Delete, Modifiers::NONE);
        assert_eq!(f.text(), "a");
    }

    #[test]
    fn readonly_ignores_edits() {
        let mut f = field("abc");
        f.readonly = true;
        assert!(!f.on_char('x'));
        assert!(!f.on_key_down(Key::Backspace, Modifiers::NONE));
        assert_eq!(f.text(), "abc");
        assert!(f.on_key_down(Key::ArrowLeft, Modifiers::NONE));
    }

    #[test]
    fn enter_only_in_multiline() {
        let mut f = field("ab");
        f.set_cursor_position(1);
        assert!(!f.on_key_down(Key::Enter, Modifiers::NONE));
        f.set_multiline(true);
        f.on_key_down(Key::Enter, Modifiers::NONE);
        assert_eq!(f.text(), "a\nb");
        assert!(!f.on_char('\t'));
    }

    #[test]
    fn insert_key_toggles_overwrite() {
        let mut f = field("abc");
        f.set_cursor_position(0);
        f.on_key_down(Key::Insert, Modifiers::NONE);
        f.on_char('X');
        assert_eq!(f.text(), "Xbc");
        f.undo();
        assert_eq!(f.text(), "abc");
    }

    #[test]
    fn up_and_down_keep_column() {
        let mut f = field("abcd\nef\nghij");
        f.set_multiline(true);
        f.set_cursor_position(1);
        f.on_key_down(Key::ArrowDown, Modifiers::NONE);
        assert_eq!(f.cursor_position(), 6);
        f.on_key_down(Key::ArrowDown, Modifiers::NONE);
        assert_eq!(f.cursor_position(), 9);
        f.on_key_down(Key::ArrowUp, Modifiers::NONE);
        f.on_key_down(Key::ArrowUp, Modifiers::NONE);
        assert_eq!(f.cursor_position(), 1);
        f.on_key_down(Key::ArrowUp, Modifiers::NONE);
        assert_eq!(f.cursor_position(), 1);
    }

    #[test]
    fn home_and_end_stay_on_line() {
        let mut f = field("ab\ncd");
        f.set_cursor_position(4);
        f.on_key_down(Key::Home, Modifiers::NONE);
        assert_eq!(f.cursor_position(), 3);
        f.set_cursor_position(0);
        f.on_key_down(Key::End, Modifiers::NONE);
        assert_eq!(f.cursor_position(), 2);
    }

    #[test]
    fn password_masks_layout_not_text() {
        let mut f = field("secret");
        f.set_password_field(true);
        assert_eq!(f.text(), "secret");
        assert_eq!(f.formatted_text().display_text(), "******");
    }

    #[test]
    fn markup_defaults_and_ignored_cursor() {
        let props = properties_of::<TextField>();
        let get = |n: &str| props.iter().find(|m| m.name == n).cloned().unwrap();
        assert_eq!(get("BlinkIntervalInMs").default, Some(Value::Int(450)));
        assert_eq!(get("HorizontalAlignment").default, Some(Value::Enum("Stretch")));
        assert!(get("CursorPosition").ignored);

        let mut f = field("");
        f.set_value("Text", "hi".into()).unwrap();
        assert_eq!(f.formatted_text().text(), "hi");
    }
}
