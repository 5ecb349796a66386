use std::fmt;
use std::str::FromStr;

/// Straight-alpha sRGB color with 8-bit channels.
///
/// This is the color type widget properties and stylesheets carry. Markup
/// writes it by canonical name when one exists (`Red`, `CornflowerBlue`)
/// and as `#RRGGBBAA` otherwise.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Error returned when a color string is neither a known name nor valid hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color {:?}", self.0)
    }
}

impl std::error::Error for ColorParseError {}

// First entry wins when two names share a value (Aqua/Cyan, Fuchsia/Magenta).
const NAMED: &[(&str, Color)] = &[
    ("Transparent", Color::rgba(0, 0, 0, 0)),
    ("Black", Color::rgb(0, 0, 0)),
    ("White", Color::rgb(255, 255, 255)),
    ("Red", Color::rgb(255, 0, 0)),
    ("Lime", Color::rgb(0, 255, 0)),
    ("Green", Color::rgb(0, 128, 0)),
    ("Blue", Color::rgb(0, 0, 255)),
    ("Yellow", Color::rgb(255, 255, 0)),
    ("Cyan", Color::rgb(0, 255, 255)),
    ("Aqua", Color::rgb(0, 255, 255)),
    ("Magenta", Color::rgb(255, 0, 255)),
    ("Fuchsia", Color::rgb(255, 0, 255)),
    ("Gray", Color::rgb(128, 128, 128)),
    ("DarkGray", Color::rgb(169, 169, 169)),
    ("LightGray", Color::rgb(211, 211, 211)),
    ("DimGray", Color::rgb(105, 105, 105)),
    ("Silver", Color::rgb(192, 192, 192)),
    ("Maroon", Color::rgb(128, 0, 0)),
    ("Olive", Color::rgb(128, 128, 0)),
    ("Navy", Color::rgb(0, 0, 128)),
    ("Teal", Color::rgb(0, 128, 128)),
    ("Purple", Color::rgb(128, 0, 128)),
    ("Orange", Color::rgb(255, 165, 0)),
    ("Brown", Color::rgb(165, 42, 42)),
    ("Pink", Color::rgb(255, 192, 203)),
    ("Gold", Color::rgb(255, 215, 0)),
    ("CornflowerBlue", Color::rgb(100, 149, 237)),
    ("LightBlue", Color::rgb(173, 216, 230)),
    ("DarkBlue", Color::rgb(0, 0, 139)),
    ("DarkGreen", Color::rgb(0, 100, 0)),
    ("DarkRed", Color::rgb(139, 0, 0)),
    ("Orchid", Color::rgb(218, 112, 214)),
    ("Beige", Color::rgb(245, 245, 220)),
];

impl Color {
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn transparent() -> Self {
        Self::rgba(0, 0, 0, 0)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    #[inline]
    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    /// Looks up a named color, case-insensitively.
    pub fn from_name(name: &str) -> Option<Color> {
        NAMED
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, c)| *c)
    }

    /// Canonical name of this exact color, if it has one.
    pub fn name(self) -> Option<&'static str> {
        NAMED.iter().find(|(_, c)| *c == self).map(|(n, _)| *n)
    }

    /// Parses `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Result<Color, ColorParseError> {
        let err = || ColorParseError(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) || (hex.len() != 6 && hex.len() != 8) {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// `#RRGGBBAA`, upper-case.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    /// Accepts a color name or hex literal, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('#') {
            Color::from_hex(s)
        } else {
            Color::from_name(s).ok_or_else(|| ColorParseError(s.to_string()))
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => f.write_str(&self.to_hex()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_color_displays_by_name() {
        assert_eq!(Color::rgb(255, 0, 0).to_string(), "Red");
        assert_eq!(Color::transparent().to_string(), "Transparent");
    }

    #[test]
    fn unnamed_color_displays_as_hex() {
        assert_eq!(Color::rgba(1, 2, 3, 4).to_string(), "#01020304");
    }

    #[test]
    fn shared_value_prefers_first_name() {
        assert_eq!(Color::from_name("aqua").unwrap().name(), Some("Cyan"));
    }

    #[test]
    fn parse_hex_six_and_eight_digits() {
        assert_eq!("#ff8000".parse::<Color>().unwrap(), Color::rgb(255, 128, 0));
        assert_eq!("#ff800080".parse::<Color>().unwrap(), Color::rgba(255, 128, 0, 128));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("#xyz".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("NotAColor".parse::<Color>().is_err());
    }

    #[test]
    fn display_then_parse_is_identity() {
        for c in [Color::rgb(100, 149, 237), Color::rgba(10, 20, 30, 40), Color::white()] {
            assert_eq!(c.to_string().parse::<Color>().unwrap(), c);
        }
    }
}
