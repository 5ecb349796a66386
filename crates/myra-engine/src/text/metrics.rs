use std::rc::Rc;

/// Width of a `\n` glyph. Line breaks occupy no horizontal space.
pub const NEW_LINE_WIDTH: f32 = 0.0;

/// Result of laying out one visual row.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RowLayout {
    /// Characters consumed by the row, including a terminating `\n`.
    /// Zero means the font could not place the first character.
    pub num_chars: usize,
    pub x0: f32,
    pub x1: f32,
    /// Row height.
    pub ymax: f32,
}

impl RowLayout {
    #[inline]
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }
}

/// Font metrics capability consumed by the text layout engine.
///
/// Implementations only answer two questions, the line height and the
/// advance of a single character. The provided [`layout_row`] is the row
/// breaker every layout pass uses.
///
/// [`layout_row`]: FontMetrics::layout_row
pub trait FontMetrics {
    /// Distance between consecutive baselines.
    fn line_height(&self) -> f32;

    /// Horizontal advance of `ch`. A negative or non-finite value means the
    /// font cannot place the character.
    fn advance(&self, ch: char) -> f32;

    /// Lays out the row starting at `chars[start]`.
    ///
    /// A row ends after a `\n`, or before the first character that would push
    /// it past `wrap_width`, backing up to just after the last whitespace in
    /// the row when there is one. A row always takes at least one placeable
    /// character so wrapping cannot stall on a glyph wider than the budget.
    fn layout_row(&self, chars: &[char], start: usize, wrap_width: Option<f32>) -> RowLayout {
        let mut x = 0.0f32;
        let mut i = start;
        let mut last_break: Option<(usize, f32)> = None;

        while i < chars.len() {
            let ch = chars[i];
            if ch == '\n' {
                x += NEW_LINE_WIDTH;
                i += 1;
                break;
            }

            let advance = self.advance(ch);
            if !advance.is_finite() || advance < 0.0 {
                break;
            }

            if let Some(budget) = wrap_width {
                if i > start && x + advance > budget {
                    if let Some((at, width)) = last_break {
                        i = at;
                        x = width;
                    }
                    break;
                }
            }

            x += advance;
            i += 1;
            if ch.is_whitespace() {
                last_break = Some((i, x));
            }
        }

        RowLayout { num_chars: i - start, x0: 0.0, x1: x, ymax: self.line_height() }
    }
}

/// Shared handle to a font. Widgets and the lines they lay out hold clones.
pub type SharedFont = Rc<dyn FontMetrics>;

/// Fixed-pitch metrics: every character advances by the same amount.
///
/// Useful for headless hosts and deterministic tests; no font file needed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MonospaceFont {
    pub advance: f32,
    pub line_height: f32,
}

impl MonospaceFont {
    pub fn new(advance: f32, line_height: f32) -> Self {
        Self { advance, line_height }
    }

    pub fn shared(advance: f32, line_height: f32) -> SharedFont {
        Rc::new(Self::new(advance, line_height))
    }
}

impl FontMetrics for MonospaceFont {
    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn advance(&self, _ch: char) -> f32 {
        self.advance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> { s.chars().collect() }

    const MONO: MonospaceFont = MonospaceFont { advance: 10.0, line_height: 16.0 };

    #[test]
    fn unbounded_row_takes_everything() {
        let text = chars("hello world");
        let row = MONO.layout_row(&text, 0, None);
        assert_eq!(row.num_chars, 11);
        assert_eq!(row.width(), 110.0);
        assert_eq!(row.ymax, 16.0);
    }

    #[test]
    fn newline_ends_row_and_has_no_width() {
        let text = chars("ab\ncd");
        let row = MONO.layout_row(&text, 0, None);
        assert_eq!(row.num_chars, 3);
        assert_eq!(row.width(), 20.0);
    }

    #[test]
    fn wrap_backs_up_to_whitespace() {
        let text = chars("hello world");
        let row = MONO.layout_row(&text, 0, Some(80.0));
        assert_eq!(row.num_chars, 6); // "hello "
        assert_eq!(row.width(), 60.0);
    }

    #[test]
    fn wrap_without_whitespace_breaks_mid_word() {
        let text = chars("abcdefgh");
        let row = MONO.layout_row(&text, 0, Some(35.0));
        assert_eq!(row.num_chars, 3);
    }

    #[test]
    fn oversized_glyph_still_placed() {
        let text = chars("abc");
        let row = MONO.layout_row(&text, 1, Some(5.0));
        assert_eq!(row.num_chars, 1);
    }

    struct NoDigits;

    impl FontMetrics for NoDigits {
        fn line_height(&self) -> f32 { 12.0 }
        fn advance(&self, ch: char) -> f32 {
            if ch.is_ascii_digit() { f32::NAN } else { 8.0 }
        }
    }

    #[test]
    fn unplaceable_glyph_stops_row() {
        let text = chars("ab1cd");
        assert_eq!(NoDigits.layout_row(&text, 0, None).num_chars, 2);
        assert_eq!(NoDigits.layout_row(&text, 2, None).num_chars, 0);
    }
}
