use std::rc::Rc;

use myra_engine::coords::{Rect, Vec2};
use myra_engine::input::{Key, Modifiers};
use myra_engine::paint::Color;

use crate::mml::{Describe, ParentRole, Reflect, SimpleType, TypeInfo, TypeRef};
use crate::style::{Stylesheet, DEFAULT_STYLE_NAME};
use crate::widget::{
    widget_glue, widget_properties, HorizontalAlignment, Orientation, VerticalAlignment, Widget, WidgetBase,
    WIDGET,
};
use crate::widgets::button::ImageTextButton;
use crate::widgets::grid::{Grid, Proportion};

/// Declared element type of menu item lists.
pub const MENU_ENTRY: TypeRef = TypeRef::new("MenuEntry", &["Item"]);

// ── Menu model ────────────────────────────────────────────────────────────

/// A selectable menu entry, possibly opening a submenu.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub text: String,
    pub color: Option<Color>,
    pub items: Vec<MenuEntry>,
}

impl MenuItem {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), ..Self::default() }
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = MenuEntry>) -> Self {
        self.items.extend(items);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuSeparator {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry {
    Item(MenuItem),
    Separator(MenuSeparator),
}

impl MenuEntry {
    pub fn id(&self) -> &str {
        match self {
            MenuEntry::Item(item) => &item.id,
            MenuEntry::Separator(sep) => &sep.id,
        }
    }

    pub fn as_item(&self) -> Option<&MenuItem> {
        match self {
            MenuEntry::Item(item) => Some(item),
            MenuEntry::Separator(_) => None,
        }
    }

    fn as_reflect(&self) -> &dyn Reflect {
        match self {
            MenuEntry::Item(item) => item,
            MenuEntry::Separator(sep) => sep,
        }
    }

    fn from_reflect(item: Box<dyn Reflect>) -> Option<Self> {
        let any = item.into_any();
        match any.downcast::<MenuItem>() {
            Ok(item) => Some(MenuEntry::Item(*item)),
            Err(any) => any.downcast::<MenuSeparator>().ok().map(|s| MenuEntry::Separator(*s)),
        }
    }
}

impl From<MenuItem> for MenuEntry {
    fn from(item: MenuItem) -> Self {
        MenuEntry::Item(item)
    }
}

impl From<MenuSeparator> for MenuEntry {
    fn from(sep: MenuSeparator) -> Self {
        MenuEntry::Separator(sep)
    }
}

fn entry_list(entries: &[MenuEntry]) -> Vec<&dyn Reflect> {
    entries.iter().map(MenuEntry::as_reflect).collect()
}

fn find_in<'a>(entries: &'a [MenuEntry], id: &str) -> Option<&'a MenuItem> {
    entries.iter().filter_map(MenuEntry::as_item).find_map(|item| {
        if item.id == id {
            Some(item)
        } else {
            find_in(&item.items, id)
        }
    })
}

impl Describe for MenuItem {
    const TYPE_NAME: &'static str = "MenuItem";
    const FAMILIES: &'static [&'static str] = MENU_ENTRY.families;
    const PARENT_ROLE: ParentRole = ParentRole::Items("Items");

    fn describe() -> TypeInfo<Self> {
        TypeInfo::<Self>::new()
            .simple("Id", SimpleType::String, |m| m.id.clone().into(), |m, v| {
                m.id = v.into_string()?;
                Some(())
            })
            .default_value("")
            .simple("Text", SimpleType::String, |m| m.text.clone().into(), |m, v| {
                m.text = v.into_string()?;
                Some(())
            })
            .default_value("")
            .nullable("Color", SimpleType::Color, |m| m.color.into(), |m, v| {
                m.color = v.as_opt_color()?;
                Some(())
            })
            .list(
                "Items",
                MENU_ENTRY,
                |m| entry_list(&m.items),
                |m, item| {
                    m.items.push(MenuEntry::from_reflect(item)?);
                    Some(())
                },
            )
    }
}

impl Describe for MenuSeparator {
    const TYPE_NAME: &'static str = "MenuSeparator";
    const FAMILIES: &'static [&'static str] = MENU_ENTRY.families;

    fn describe() -> TypeInfo<Self> {
        TypeInfo::<Self>::new()
            .simple("Id", SimpleType::String, |m| m.id.clone().into(), |m, v| {
                m.id = v.into_string()?;
                Some(())
            })
            .default_value("")
    }
}

// ── Separator widget ──────────────────────────────────────────────────────

/// Thin rule drawn between menu items.
pub struct Separator {
    base: WidgetBase,
    thickness: f32,
}

impl Default for Separator {
    fn default() -> Self {
        Self { base: WidgetBase::default(), thickness: 1.0 }
    }
}

impl Widget for Separator {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn measure_content(&mut self, _available: Vec2) -> Vec2 {
        Vec2::new(self.thickness, self.thickness)
    }
}

impl Describe for Separator {
    const TYPE_NAME: &'static str = "Separator";
    const FAMILIES: &'static [&'static str] = WIDGET.families;

    fn describe() -> TypeInfo<Self> {
        widget_properties(&WidgetBase::default())
    }

    widget_glue!();
}

// ── Menu ──────────────────────────────────────────────────────────────────

/// A horizontal menu bar or a vertical drop-down.
///
/// The item list is the model; an internal grid holds one button (or
/// separator) per entry, with one `Auto` track each. Items must be changed
/// through [`add_item`](Menu::add_item), [`insert_item`](Menu::insert_item)
/// and [`remove_item`](Menu::remove_item) so both stay in step.
pub struct Menu {
    base: WidgetBase,
    orientation: Orientation,
    items: Vec<MenuEntry>,
    grid: Grid,
    item_text_color: Color,
    hover_index: Option<usize>,
    on_item_selected: Option<Box<dyn FnMut(&MenuItem)>>,
}

impl Menu {
    pub fn new(orientation: Orientation) -> Self {
        let mut grid = Grid::new();
        *grid.base_mut() = WidgetBase::stretched();
        Self {
            base: WidgetBase::default(),
            orientation,
            items: Vec::new(),
            grid,
            item_text_color: Color::white(),
            hover_index: None,
            on_item_selected: None,
        }
    }

    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    pub fn with_stylesheet(orientation: Orientation, stylesheet: &Rc<Stylesheet>) -> Self {
        let mut menu = Self { base: WidgetBase::with_stylesheet(stylesheet), ..Self::new(orientation) };
        menu.apply_style(stylesheet, DEFAULT_STYLE_NAME);
        menu
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn items(&self) -> &[MenuEntry] {
        &self.items
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    // ── items ─────────────────────────────────────────────────────────────

    pub fn add_item(&mut self, entry: impl Into<MenuEntry>) {
        let index = self.items.len();
        self.insert_item(index, entry);
    }

    pub fn insert_item(&mut self, index: usize, entry: impl Into<MenuEntry>) {
        let entry = entry.into();
        let index = index.min(self.items.len());
        let widget = self.item_widget(&entry);

        self.tracks_mut().insert(index, Proportion::auto());
        self.grid.insert_widget(index, widget);
        self.items.insert(index, entry);
        self.update_grid_positions();
    }

    pub fn remove_item(&mut self, index: usize) -> Option<MenuEntry> {
        if index >= self.items.len() {
            return None;
        }
        let tracks = self.tracks_mut();
        if index < tracks.len() {
            tracks.remove(index);
        }
        self.grid.remove_widget(index);
        self.update_grid_positions();
        self.hover_index = None;
        Some(self.items.remove(index))
    }

    pub fn clear_items(&mut self) {
        self.items.clear();
        self.tracks_mut().clear();
        self.grid.clear_widgets();
        self.hover_index = None;
    }

    /// Depth-first search through the items and their submenus.
    pub fn find_menu_item_by_id(&self, id: &str) -> Option<&MenuItem> {
        find_in(&self.items, id)
    }

    fn tracks_mut(&mut self) -> &mut Vec<Proportion> {
        match self.orientation {
            Orientation::Horizontal => &mut self.grid.columns_proportions,
            Orientation::Vertical => &mut self.grid.rows_proportions,
        }
    }

    fn item_widget(&self, entry: &MenuEntry) -> Box<dyn Widget> {
        match entry {
            MenuEntry::Item(item) => {
                let mut button = match &self.base.stylesheet {
                    Some(sheet) => ImageTextButton::with_stylesheet(sheet),
                    None => ImageTextButton::new(),
                };
                button.base_mut().id = item.id.clone();
                button.set_text(item.text.clone());
                button.text_color = item.color.unwrap_or(self.item_text_color);
                button.toggleable = !item.items.is_empty();
                Box::new(button)
            }
            MenuEntry::Separator(sep) => {
                let mut separator = Separator::default();
                separator.base_mut().id = sep.id.clone();
                Box::new(separator)
            }
        }
    }

    fn update_grid_positions(&mut self) {
        let vertical = self.orientation == Orientation::Vertical;
        for (i, widget) in self.grid.widgets_mut().iter_mut().enumerate() {
            let base = widget.base_mut();
            if vertical {
                base.grid_column = 0;
                base.grid_row = i;
                base.horizontal_alignment = HorizontalAlignment::Stretch;
                base.vertical_alignment = VerticalAlignment::Top;
            } else {
                base.grid_column = i;
                base.grid_row = 0;
            }
        }
    }

    fn button_mut(&mut self, index: usize) -> Option<&mut ImageTextButton> {
        let widget = self.grid.widgets_mut().get_mut(index)?;
        widget.as_any_mut().downcast_mut::<ImageTextButton>()
    }

    // ── hover & selection ─────────────────────────────────────────────────

    pub fn hover_index(&self) -> Option<usize> {
        self.hover_index
    }

    pub fn set_hover_index(&mut self, index: Option<usize>) {
        if let Some(old) = self.hover_index {
            if let Some(button) = self.button_mut(old) {
                button.set_hovered(false);
            }
        }
        self.hover_index = index.filter(|&i| i < self.items.len());
        if let Some(new) = self.hover_index {
            if let Some(button) = self.button_mut(new) {
                button.set_hovered(true);
            }
        }
    }

    /// Moves the hover by `delta` buttons, wrapping around and skipping separators.
    pub fn move_hover(&mut self, delta: isize) {
        let count = self.items.len();
        if count == 0 {
            return;
        }
        let count_i = count as isize;
        let mut index = self.hover_index.map_or(if delta > 0 { -1 } else { count_i }, |i| i as isize);
        for _ in 0..=count {
            index = (index + delta).rem_euclid(count_i);
            if matches!(self.items[index as usize], MenuEntry::Item(_)) {
                self.set_hover_index(Some(index as usize));
                return;
            }
        }
    }

    /// Registers the selection handler, replacing any previous one.
    pub fn on_item_selected(mut self, f: impl FnMut(&MenuItem) + 'static) -> Self {
        self.on_item_selected = Some(Box::new(f));
        self
    }

    pub fn set_on_item_selected(&mut self, f: impl FnMut(&MenuItem) + 'static) {
        self.on_item_selected = Some(Box::new(f));
    }

    /// Activates the item at `index`. Items with a submenu toggle open;
    /// leaf items fire the selection handler.
    pub fn click_item(&mut self, index: usize) {
        let Some(MenuEntry::Item(item)) = self.items.get(index) else { return };
        if !item.items.is_empty() {
            if let Some(button) = self.button_mut(index) {
                button.click();
            }
            return;
        }
        log::debug!("menu item {:?} selected", item.id);
        if let Some(f) = self.on_item_selected.as_mut() {
            f(item);
        }
    }

    /// Clicks the first button whose underscore mnemonic is `c`.
    fn click_mnemonic(&mut self, c: char) -> bool {
        let found = self.grid.widgets().iter().position(|w| {
            w.as_any()
                .downcast_ref::<ImageTextButton>()
                .and_then(ImageTextButton::underscore_char)
                == Some(c)
        });
        match found {
            Some(index) => {
                self.click_item(index);
                true
            }
            None => false,
        }
    }
}

impl Widget for Menu {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn measure_content(&mut self, available: Vec2) -> Vec2 {
        self.grid.measure(available)
    }

    fn arrange_content(&mut self, bounds: Rect) {
        self.grid.arrange(bounds);
    }

    fn apply_style(&mut self, stylesheet: &Stylesheet, name: &str) -> bool {
        let styles = match self.orientation {
            Orientation::Horizontal => &stylesheet.horizontal_menu_styles,
            Orientation::Vertical => &stylesheet.vertical_menu_styles,
        };
        let Some(style) = styles.get(name) else { return false };
        self.base.background = style.background;
        self.item_text_color = style.label_style.text_color;

        let colors: Vec<Option<Color>> =
            self.items.iter().map(|e| e.as_item().map(|i| i.color.unwrap_or(style.label_style.text_color))).collect();
        for (index, color) in colors.into_iter().enumerate() {
            if let (Some(color), Some(button)) = (color, self.button_mut(index)) {
                button.text_color = color;
            }
        }
        true
    }

    fn on_key_down(&mut self, key: Key, mods: Modifiers) -> bool {
        let (back, forward) = match self.orientation {
            Orientation::Horizontal => (Key::ArrowLeft, Key::ArrowRight),
            Orientation::Vertical => (Key::ArrowUp, Key::ArrowDown),
        };
        match key {
            k if k == back => self.move_hover(-1),
            k if k == forward => self.move_hover(1),
            Key::Enter | Key::Space => match self.hover_index {
                Some(index) => self.click_item(index),
                None => return false,
            },
            _ if mods.any() => return false,
            _ => return key.to_char().is_some_and(|c| self.click_mnemonic(c)),
        }
        true
    }
}

impl Describe for Menu {
    const TYPE_NAME: &'static str = "Menu";
    const FAMILIES: &'static [&'static str] = WIDGET.families;
    const PARENT_ROLE: ParentRole = ParentRole::Items("Items");

    fn describe() -> TypeInfo<Self> {
        TypeInfo::<Self>::new().inherit(widget_properties(&WidgetBase::default())).list(
            "Items",
            MENU_ENTRY,
            |m| entry_list(&m.items),
            |m, item| {
                m.add_item(MenuEntry::from_reflect(item)?);
                Some(())
            },
        )
    }

    fn runtime_type_name(&self) -> &'static str {
        match self.orientation {
            Orientation::Horizontal => "HorizontalMenu",
            Orientation::Vertical => "VerticalMenu",
        }
    }

    widget_glue!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn file_menu() -> Menu {
        let mut menu = Menu::horizontal();
        menu.add_item(MenuItem::new("file", "_File").with_items([
            MenuItem::new("open", "Open").into(),
            MenuSeparator::default().into(),
            MenuItem::new("quit", "_Quit").into(),
        ]));
        menu.add_item(MenuSeparator { id: "sep".into() });
        menu.add_item(MenuItem::new("help", "_Help"));
        menu
    }

    #[test]
    fn grid_tracks_follow_items() {
        let mut menu = file_menu();
        assert_eq!(menu.grid().columns_proportions.len(), 3);
        assert_eq!(menu.grid().widgets()[2].base().grid_column, 2);

        menu.insert_item(0, MenuItem::new("edit", "Edit"));
        assert_eq!(menu.grid().widgets()[0].base().id, "edit");
        assert_eq!(menu.grid().widgets()[3].base().grid_column, 3);

        assert!(menu.remove_item(1).is_some());
        assert_eq!(menu.grid().columns_proportions.len(), 3);
        assert_eq!(menu.grid().widgets()[2].base().id, "help");
        assert_eq!(menu.grid().widgets()[2].base().grid_column, 2);
        assert!(menu.remove_item(9).is_none());
    }

    #[test]
    fn vertical_items_stack_and_stretch() {
        let mut menu = Menu::vertical();
        menu.add_item(MenuItem::new("a", "A"));
        menu.add_item(MenuItem::new("b", "B"));
        assert_eq!(menu.grid().rows_proportions.len(), 2);
        let b = menu.grid().widgets()[1].base();
        assert_eq!((b.grid_row, b.horizontal_alignment), (1, HorizontalAlignment::Stretch));
    }

    #[test]
    fn find_by_id_searches_submenus() {
        let menu = file_menu();
        assert_eq!(menu.find_menu_item_by_id("quit").map(|i| i.text.as_str()), Some("_Quit"));
        assert!(menu.find_menu_item_by_id("sep").is_none());
        assert!(menu.find_menu_item_by_id("nope").is_none());
    }

    #[test]
    fn hover_wraps_and_skips_separators() {
        let mut menu = file_menu();
        menu.move_hover(1);
        assert_eq!(menu.hover_index(), Some(0));
        menu.move_hover(1);
        assert_eq!(menu.hover_index(), Some(2));
        menu.move_hover(1);
        assert_eq!(menu.hover_index(), Some(0));
        menu.move_hover(-1);
        assert_eq!(menu.hover_index(), Some(2));

        let mut only_separators = Menu::horizontal();
        only_separators.add_item(MenuSeparator::default());
        only_separators.move_hover(1);
        assert_eq!(only_separators.hover_index(), None);
    }

    #[test]
    fn leaf_click_selects_submenu_click_toggles() {
        let picked = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&picked);
        let mut menu = file_menu().on_item_selected(move |item| sink.borrow_mut().push(item.id.clone()));

        menu.set_hover_index(Some(2));
        assert!(menu.on_key_down(Key::Enter, Modifiers::NONE));
        assert_eq!(*picked.borrow(), ["help"]);

        menu.click_item(0);
        assert_eq!(picked.borrow().len(), 1);
        assert!(menu.button_mut(0).is_some_and(|b| b.is_pressed()));
    }

    #[test]
    fn mnemonic_key_clicks_matching_item() {
        let picked = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&picked);
        let mut menu = file_menu().on_item_selected(move |item| *sink.borrow_mut() = Some(item.id.clone()));
        assert!(menu.on_key_down(Key::H, Modifiers::NONE));
        assert_eq!(picked.borrow().as_deref(), Some("help"));
        assert!(!menu.on_key_down(Key::Z, Modifiers::NONE));
        assert!(!menu.on_key_down(Key::H, Modifiers::CTRL));
    }

    #[test]
    fn runtime_name_follows_orientation() {
        assert_eq!(Menu::horizontal().type_name(), "HorizontalMenu");
        assert_eq!(Menu::vertical().type_name(), "VerticalMenu");
        let menu = file_menu();
        let items = Reflect::items(&menu, "Items");
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].type_name(), "MenuSeparator");
    }
}
