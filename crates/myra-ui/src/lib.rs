//! Myra UI: widget tree, text editing and markup serialization on top of
//! `myra-engine`.
//!
//! # Quick start
//!
//! ```rust
//! use std::rc::Rc;
//! use myra_ui::prelude::*;
//!
//! let src = r#"
//!     <Project>
//!         <Window Title="Hello">
//!             <TextField Text="type here" />
//!         </Window>
//!     </Project>
//! "#;
//!
//! let stylesheet = Rc::new(Stylesheet::default());
//! let project = Project::load(src, stylesheet).unwrap();
//! let window = project.root().unwrap();
//! assert_eq!(window.type_name(), "Window");
//!
//! // Values equal to their defaults or to the stylesheet are not written back.
//! // The window places its content in the second row of its layout grid.
//! assert!(project.save().contains(r#"<TextField GridRow="1" Text="type here"/>"#));
//! ```
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`text_edit`] | `TextEditor` and its undo/redo stacks |
//! | [`mml`] | reflection tables, save and load contexts, type registry |
//! | [`style`] | `Stylesheet` and per-widget style records |
//! | [`widget`] | `Widget` trait and shared `WidgetBase` |
//! | [`widgets`] | Grid, Label, ImageTextButton, TextField, Menu, Window, SplitPane |
//! | [`project`] | `Project`, the root of a `.xmmp` file |

pub mod mml;
pub mod project;
pub mod style;
pub mod text_edit;
pub mod widget;
pub mod widgets;

pub use project::{ExportOptions, Project};

/// The types most callers need.
pub mod prelude {
    pub use crate::mml::{Describe, MmlError, Reflect};
    pub use crate::project::{ExportOptions, Project};
    pub use crate::style::Stylesheet;
    pub use crate::text_edit::TextEditor;
    pub use crate::widget::{find_widget_by_id, HorizontalAlignment, Orientation, VerticalAlignment, Widget};
    pub use crate::widgets::{
        Grid, ImageTextButton, Label, Menu, MenuEntry, MenuItem, MenuSeparator, Proportion, ProportionType,
        SplitPane, TextField, Window,
    };

    pub use myra_engine::coords::{Rect, Vec2};
    pub use myra_engine::input::{Key, Modifiers};
    pub use myra_engine::paint::Color;
}
