use std::rc::Rc;

use crate::coords::Vec2;
use crate::text::line::{GlyphInfo, TextLine};
use crate::text::metrics::SharedFont;

/// Character substituted for every character of a password field.
pub const PASSWORD_MASK: char = '*';

/// Bounding size of `text` laid out with `font`, wrapping at `wrap_width`.
///
/// Empty text still measures one line high.
pub fn measure(text: &str, font: &SharedFont, wrap_width: Option<f32>) -> Vec2 {
    let chars: Vec<char> = text.chars().collect();
    layout(&chars, font, wrap_width, 0.0).1
}

/// Visual lines of `text` laid out with `font`, wrapping at `wrap_width`.
pub fn get_lines(text: &str, font: &SharedFont, wrap_width: Option<f32>) -> Vec<TextLine> {
    let chars: Vec<char> = text.chars().collect();
    layout(&chars, font, wrap_width, 0.0).0
}

/// `*` repeated once per character of `text`.
pub fn mask(text: &str) -> String {
    text.chars().map(|_| PASSWORD_MASK).collect()
}

fn layout(
    chars: &[char],
    font: &SharedFont,
    wrap_width: Option<f32>,
    spacing: f32,
) -> (Vec<TextLine>, Vec2) {
    let mut lines = Vec::new();
    let mut size = Vec2::zero();
    let mut pos = 0;

    while pos < chars.len() {
        let row = font.layout_row(chars, pos, wrap_width);
        if row.num_chars == 0 {
            log::debug!("layout stopped at char {pos} of {}: glyph cannot be placed", chars.len());
            break;
        }

        if !lines.is_empty() {
            size.y += spacing;
        }
        let text: String = chars[pos..pos + row.num_chars].iter().collect();
        let line_size = Vec2::new(row.width(), row.ymax);
        lines.push(TextLine::new(Rc::clone(font), text, line_size, size.y, lines.len(), pos));

        size.x = size.x.max(line_size.x);
        size.y += line_size.y;
        pos += row.num_chars;
    }

    if lines.is_empty() {
        size.y = font.line_height();
    }

    (lines, size)
}

/// A paragraph of text with lazily computed line layout.
///
/// Every setter marks the layout dirty when the value actually changes;
/// [`lines`] and [`size`] recompute before answering.
///
/// [`lines`]: FormattedText::lines
/// [`size`]: FormattedText::size
pub struct FormattedText {
    text: String,
    display_text: String,
    font: Option<SharedFont>,
    vertical_spacing: f32,
    width: Option<f32>,
    is_password: bool,

    dirty: bool,
    lines: Vec<TextLine>,
    size: Vec2,
}

impl FormattedText {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            display_text: String::new(),
            font: None,
            vertical_spacing: 0.0,
            width: None,
            is_password: false,
            dirty: true,
            lines: Vec::new(),
            size: Vec2::zero(),
        }
    }

    // ── Inputs ──────────────────────────────────────────────────────────

    pub fn text(&self) -> &str {
        &self.text
    }

    /// What is actually drawn: the text itself or its mask.
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.text {
            return;
        }
        self.text = text;
        self.update_display_text();
    }

    pub fn font(&self) -> Option<&SharedFont> {
        self.font.as_ref()
    }

    pub fn set_font(&mut self, font: Option<SharedFont>) {
        let same = match (&self.font, &font) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if !same {
            self.font = font;
            self.invalidate();
        }
    }

    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }

    pub fn set_vertical_spacing(&mut self, spacing: f32) {
        if spacing != self.vertical_spacing {
            self.vertical_spacing = spacing;
            self.invalidate();
        }
    }

    /// Wrap width; `None` lays every paragraph on one line.
    pub fn width(&self) -> Option<f32> {
        self.width
    }

    pub fn set_width(&mut self, width: Option<f32>) {
        if width != self.width {
            self.width = width;
            self.invalidate();
        }
    }

    pub fn is_password(&self) -> bool {
        self.is_password
    }

    pub fn set_password(&mut self, value: bool) {
        if value != self.is_password {
            self.is_password = value;
            self.update_display_text();
        }
    }

    fn update_display_text(&mut self) {
        self.display_text = if self.is_password { mask(&self.text) } else { self.text.clone() };
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.dirty = true;
    }

    // ── Layout ──────────────────────────────────────────────────────────

    fn update(&mut self) {
        if !self.dirty {
            return;
        }

        match &self.font {
            Some(font) => {
                let chars: Vec<char> = self.display_text.chars().collect();
                let (lines, size) = layout(&chars, font, self.width, self.vertical_spacing);
                self.lines = lines;
                self.size = size;
            }
            None => {
                self.lines = Vec::new();
                self.size = Vec2::zero();
            }
        }

        log::trace!("formatted text laid out: {} lines, {:?}", self.lines.len(), self.size);
        self.dirty = false;
    }

    pub fn lines(&mut self) -> &[TextLine] {
        self.update();
        &self.lines
    }

    pub fn size(&mut self) -> Vec2 {
        self.update();
        self.size
    }

    /// Size the current text would take at `width`. Leaves the cached layout alone.
    pub fn measure(&self, width: Option<f32>) -> Vec2 {
        match &self.font {
            Some(font) => {
                let chars: Vec<char> = self.display_text.chars().collect();
                layout(&chars, font, width, self.vertical_spacing).1
            }
            None => Vec2::zero(),
        }
    }

    /// Line index and glyph box of the character at `index` in the full text.
    pub fn glyph_at(&mut self, index: usize) -> Option<(usize, GlyphInfo)> {
        self.update();
        let line = self.lines.iter().find(|l| l.contains(index))?;
        let glyph = *line.glyph(index - line.line_start())?;
        Some((line.line_index(), glyph))
    }

    /// Index of the line holding cursor `position`.
    ///
    /// A cursor just past the last character belongs to the last line.
    pub fn line_at(&mut self, position: usize) -> Option<usize> {
        self.update();
        if let Some(line) = self.lines.iter().find(|l| l.contains(position)) {
            return Some(line.line_index());
        }
        let last = self.lines.last()?;
        (position == last.line_start() + last.count()).then(|| last.line_index())
    }
}

impl Default for FormattedText {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::metrics::{FontMetrics, MonospaceFont};

    fn mono() -> SharedFont {
        MonospaceFont::shared(10.0, 16.0)
    }

    fn formatted(text: &str) -> FormattedText {
        let mut ft = FormattedText::new();
        ft.set_font(Some(mono()));
        ft.set_text(text);
        ft
    }

    #[test]
    fn lines_concatenate_to_input() {
        let text = "the quick brown fox\njumps over\n\nthe lazy dog";
        let mut ft = formatted(text);
        ft.set_width(Some(60.0));
        let joined: String = ft.lines().iter().map(|l| l.text()).collect();
        assert_eq!(joined, text);

        let mut expected_start = 0;
        for (i, line) in ft.lines().iter().enumerate() {
            assert_eq!(line.line_index(), i);
            assert_eq!(line.line_start(), expected_start);
            expected_start += line.count();
        }
    }

    #[test]
    fn empty_text_is_one_line_high() {
        let mut ft = formatted("");
        assert!(ft.lines().is_empty());
        assert_eq!(ft.size(), Vec2::new(0.0, 16.0));
        assert_eq!(measure("", &mono(), None), Vec2::new(0.0, 16.0));
    }

    #[test]
    fn height_includes_interior_spacing() {
        let mut ft = formatted("a\nb\nc");
        ft.set_vertical_spacing(4.0);
        assert_eq!(ft.lines().len(), 3);
        assert_eq!(ft.size(), Vec2::new(10.0, 16.0 * 3.0 + 4.0 * 2.0));
        assert_eq!(ft.lines()[2].top(), 40.0);
    }

    #[test]
    fn width_is_widest_line() {
        assert_eq!(measure("ab\nabcd\nabc", &mono(), None), Vec2::new(40.0, 48.0));
    }

    #[test]
    fn wrapping_splits_at_whitespace() {
        let lines = get_lines("hello world", &mono(), Some(80.0));
        let texts: Vec<&str> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(texts, ["hello ", "world"]);
    }

    #[test]
    fn setters_only_invalidate_on_change() {
        let mut ft = formatted("abc");
        ft.size();
        assert!(!ft.dirty);
        ft.set_text("abc");
        ft.set_width(None);
        ft.set_vertical_spacing(0.0);
        assert!(!ft.dirty);
        ft.set_text("abcd");
        assert!(ft.dirty);
        assert_eq!(ft.size().x, 40.0);
    }

    #[test]
    fn password_masks_every_char() {
        let mut ft = formatted("sécret pw");
        ft.set_password(true);
        assert_eq!(ft.display_text(), "*********");
        assert_eq!(ft.display_text().chars().count(), ft.text().chars().count());
        assert_eq!(ft.text(), "sécret pw");
        ft.set_password(false);
        assert_eq!(ft.display_text(), "sécret pw");
    }

    struct NarrowStar;

    impl FontMetrics for NarrowStar {
        fn line_height(&self) -> f32 { 10.0 }
        fn advance(&self, ch: char) -> f32 {
            if ch == PASSWORD_MASK { 3.0 } else { 7.0 }
        }
    }

    #[test]
    fn password_is_measured_with_mask_glyphs() {
        let font: SharedFont = Rc::new(NarrowStar);
        let mut ft = FormattedText::new();
        ft.set_font(Some(font));
        ft.set_text("abcd");
        assert_eq!(ft.size().x, 28.0);
        ft.set_password(true);
        assert_eq!(ft.size().x, 12.0);
        assert_eq!(ft.lines()[0].text(), "****");
    }

    struct NoDigits;

    impl FontMetrics for NoDigits {
        fn line_height(&self) -> f32 { 12.0 }
        fn advance(&self, ch: char) -> f32 {
            if ch.is_ascii_digit() { -1.0 } else { 8.0 }
        }
    }

    #[test]
    fn unplaceable_char_ends_layout_early() {
        let font: SharedFont = Rc::new(NoDigits);
        let lines = get_lines("ab\n1cd", &font, None);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "ab\n");
        assert_eq!(measure("9", &font, None), Vec2::new(0.0, 12.0));
    }

    #[test]
    fn glyph_lookup_across_lines() {
        let mut ft = formatted("ab\ncde");
        let (line, glyph) = ft.glyph_at(4).unwrap();
        assert_eq!(line, 1);
        assert_eq!(glyph.index, 1);
        assert_eq!(glyph.character, 'd');
        assert_eq!(glyph.bounds.left(), 10.0);
        assert_eq!(ft.glyph_at(2).unwrap().1.bounds.size.x, 0.0);
        assert!(ft.glyph_at(6).is_none());
    }

    #[test]
    fn cursor_past_end_belongs_to_last_line() {
        let mut ft = formatted("ab\ncde");
        assert_eq!(ft.line_at(0), Some(0));
        assert_eq!(ft.line_at(2), Some(0));
        assert_eq!(ft.line_at(3), Some(1));
        assert_eq!(ft.line_at(6), Some(1));
        assert_eq!(ft.line_at(7), None);
    }

    #[test]
    fn no_font_means_no_layout() {
        let mut ft = FormattedText::new();
        ft.set_text("abc");
        assert!(ft.lines().is_empty());
        assert_eq!(ft.size(), Vec2::zero());
    }

    #[test]
    fn measure_leaves_cache_alone() {
        let mut ft = formatted("hello world");
        let before = ft.size();
        assert_eq!(ft.measure(Some(60.0)), Vec2::new(60.0, 32.0));
        assert_eq!(ft.size(), before);
    }
}
