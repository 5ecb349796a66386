//! Myra engine crate.
//!
//! This crate owns the engine-facing primitives the widget layer builds on:
//! geometry, colors, key identifiers, font metrics, and the text layout
//! engine. It does not render and does not poll input devices; a host
//! integration translates its platform events into [`input::Key`] values
//! and draws whatever the layout reports.

pub mod coords;
pub mod input;
pub mod logging;
pub mod paint;
pub mod text;
