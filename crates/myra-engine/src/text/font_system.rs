use std::fmt;
use std::rc::Rc;

use crate::coords::Vec2;
use crate::text::formatted::measure;
use crate::text::metrics::{FontMetrics, SharedFont};

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Owns a collection of loaded fonts.
///
/// Fonts are immutable after loading. Widgets never see `fontdue` directly;
/// they receive a [`SharedFont`] bound to a pixel size from [`scaled`].
///
/// [`scaled`]: FontSystem::scaled
pub struct FontSystem {
    fonts: Vec<Rc<fontdue::Font>>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(Rc::new(font));
        log::debug!("loaded font {:?} ({} glyphs)", id, self.fonts[id.0].glyph_count());
        Ok(id)
    }

    /// Metrics for font `id` rendered at `px` pixels, if `id` is valid.
    pub fn scaled(&self, id: FontId, px: f32) -> Option<SharedFont> {
        let font = self.fonts.get(id.0)?;
        Some(Rc::new(ScaledFont { font: Rc::clone(font), px: px.max(0.01) }))
    }

    /// Bounding size of `text` laid out with font `id` at `px`.
    ///
    /// Returns `(0, px * 1.2)` for an unknown id so callers still reserve a line.
    #[must_use]
    pub fn measure_text(&self, text: &str, id: FontId, px: f32, max_width: Option<f32>) -> Vec2 {
        match self.scaled(id, px) {
            Some(font) => measure(text, &font, max_width),
            None => Vec2::new(0.0, px * 1.2),
        }
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// A `fontdue` font bound to one pixel size.
pub struct ScaledFont {
    font: Rc<fontdue::Font>,
    px: f32,
}

impl ScaledFont {
    pub fn px(&self) -> f32 {
        self.px
    }
}

impl FontMetrics for ScaledFont {
    fn line_height(&self) -> f32 {
        self.font
            .horizontal_line_metrics(self.px)
            .map(|m| m.new_line_size)
            .unwrap_or(self.px * 1.2)
    }

    fn advance(&self, ch: char) -> f32 {
        self.font.metrics(ch, self.px).advance_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_font_bytes() {
        let mut fonts = FontSystem::new();
        assert!(fonts.load_font(b"definitely not a font").is_err());
    }

    #[test]
    fn unknown_id_reserves_a_line() {
        let fonts = FontSystem::new();
        let size = fonts.measure_text("abc", FontId(3), 10.0, None);
        assert_eq!(size.x, 0.0);
        assert!((size.y - 12.0).abs() < 1e-4);
        assert!(fonts.scaled(FontId(3), 10.0).is_none());
    }
}
