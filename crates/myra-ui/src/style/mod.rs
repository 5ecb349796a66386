//! Stylesheets: named looks per widget type.

mod stylesheet;

pub use stylesheet::{
    has_stylesheet_value, ButtonStyle, LabelStyle, MenuStyle, SplitPaneStyle, Stylesheet, TextFieldStyle,
    WindowStyle, DEFAULT_STYLE_NAME,
};
