//! Paint model shared by widgets and stylesheets.
//!
//! Only solid colors are modelled; how a host draws them is its own concern.

pub mod color;

pub use color::{Color, ColorParseError};
