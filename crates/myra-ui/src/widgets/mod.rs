pub mod button;
pub mod grid;
pub mod label;
pub mod menu;
pub mod split_pane;
pub mod text_field;
pub mod window;

pub use button::ImageTextButton;
pub use grid::{Grid, Proportion, ProportionType};
pub use label::Label;
pub use menu::{Menu, MenuEntry, MenuItem, MenuSeparator, Separator};
pub use split_pane::SplitPane;
pub use text_field::TextField;
pub use window::Window;

use std::rc::Rc;

use crate::mml::{Constructor, Describe, Reflect, TypeRegistry};
use crate::style::Stylesheet;
use crate::widget::Orientation;

fn boxed<T: Reflect>(value: T) -> Box<dyn Reflect> {
    Box::new(value)
}

fn styled(
    registry: &mut TypeRegistry,
    name: &'static str,
    families: &'static [&'static str],
    ctor: fn(&Rc<Stylesheet>) -> Box<dyn Reflect>,
) {
    registry.register(name, families, Constructor::Styled(ctor));
}

/// Registers every markup-constructible widget and model type.
pub fn register_all(registry: &mut TypeRegistry) {
    styled(registry, Label::TYPE_NAME, Label::FAMILIES, |s| boxed(Label::with_stylesheet(s)));
    styled(registry, ImageTextButton::TYPE_NAME, ImageTextButton::FAMILIES, |s| {
        boxed(ImageTextButton::with_stylesheet(s))
    });
    styled(registry, TextField::TYPE_NAME, TextField::FAMILIES, |s| boxed(TextField::with_stylesheet(s)));
    styled(registry, Window::TYPE_NAME, Window::FAMILIES, |s| boxed(Window::with_stylesheet(s)));
    styled(registry, "HorizontalMenu", Menu::FAMILIES, |s| boxed(Menu::with_stylesheet(Orientation::Horizontal, s)));
    styled(registry, "VerticalMenu", Menu::FAMILIES, |s| boxed(Menu::with_stylesheet(Orientation::Vertical, s)));
    styled(registry, "HorizontalSplitPane", SplitPane::FAMILIES, |s| {
        boxed(SplitPane::with_stylesheet(Orientation::Horizontal, s))
    });
    styled(registry, "VerticalSplitPane", SplitPane::FAMILIES, |s| {
        boxed(SplitPane::with_stylesheet(Orientation::Vertical, s))
    });

    registry.register_default::<Grid>();
    registry.register_default::<Proportion>();
    registry.register_default::<MenuItem>();
    registry.register_default::<MenuSeparator>();
}
