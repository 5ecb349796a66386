use std::cell::OnceCell;
use std::fmt;

use crate::coords::{Rect, Vec2};
use crate::text::metrics::{SharedFont, NEW_LINE_WIDTH};

/// Position of one character within its line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphInfo {
    /// Character index within the line.
    pub index: usize,
    pub character: char,
    /// Bounds relative to the line origin (the line's `top` is not applied).
    pub bounds: Rect,
}

/// One laid-out visual line.
///
/// Created in bulk by a layout pass and never mutated afterwards; the next
/// pass replaces the whole set. Per-glyph boxes are built on first request.
pub struct TextLine {
    text: String,
    size: Vec2,
    top: f32,
    line_index: usize,
    line_start: usize,
    char_count: usize,
    font: SharedFont,
    glyphs: OnceCell<Vec<GlyphInfo>>,
}

impl TextLine {
    pub(crate) fn new(
        font: SharedFont,
        text: String,
        size: Vec2,
        top: f32,
        line_index: usize,
        line_start: usize,
    ) -> Self {
        let char_count = text.chars().count();
        Self { text, size, top, line_index, line_start, char_count, font, glyphs: OnceCell::new() }
    }

    /// Displayed characters of this line (masked for password text).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Vertical offset from the top of the paragraph.
    pub fn top(&self) -> f32 {
        self.top
    }

    pub fn line_index(&self) -> usize {
        self.line_index
    }

    /// Character offset of the first character within the full text.
    pub fn line_start(&self) -> usize {
        self.line_start
    }

    /// Number of characters on this line, including a trailing `\n`.
    pub fn count(&self) -> usize {
        self.char_count
    }

    /// True if the character at `position` (full-text offset) lies on this line.
    pub fn contains(&self, position: usize) -> bool {
        position >= self.line_start && position < self.line_start + self.char_count
    }

    pub fn glyphs(&self) -> &[GlyphInfo] {
        self.glyphs.get_or_init(|| {
            let height = self.font.line_height();
            let mut x = 0.0;
            self.text
                .chars()
                .enumerate()
                .map(|(index, character)| {
                    let width = if character == '\n' {
                        NEW_LINE_WIDTH
                    } else {
                        self.font.advance(character).max(0.0)
                    };
                    let bounds = Rect::new(x, 0.0, width, height);
                    x += width;
                    GlyphInfo { index, character, bounds }
                })
                .collect()
        })
    }

    /// Glyph at line-relative `index`.
    pub fn glyph(&self, index: usize) -> Option<&GlyphInfo> {
        self.glyphs().get(index)
    }
}

impl fmt::Debug for TextLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextLine")
            .field("text", &self.text)
            .field("size", &self.size)
            .field("top", &self.top)
            .field("line_index", &self.line_index)
            .field("line_start", &self.line_start)
            .finish()
    }
}
