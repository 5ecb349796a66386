//! Text layout: font metrics, visual lines, and the lazily laid-out
//! [`FormattedText`] paragraph that text widgets own.

pub mod font_system;
pub mod formatted;
pub mod line;
pub mod metrics;

pub use font_system::{FontId, FontLoadError, FontSystem, ScaledFont};
pub use formatted::{get_lines, mask, measure, FormattedText, PASSWORD_MASK};
pub use line::{GlyphInfo, TextLine};
pub use metrics::{FontMetrics, MonospaceFont, RowLayout, SharedFont, NEW_LINE_WIDTH};
