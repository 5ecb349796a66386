//! Key identifiers for widget keyboard handling.
//!
//! Public API is platform-agnostic. Hosts translate their own key events
//! into [`Key`] and [`Modifiers`] before routing them to widgets.

mod types;

pub use types::{Key, Modifiers};
