use std::rc::Rc;

use myra_engine::coords::{Rect, Vec2};
use myra_engine::input::{Key, Modifiers};

use crate::mml::{Describe, ParentRole, TypeInfo};
use crate::style::{Stylesheet, DEFAULT_STYLE_NAME};
use crate::widget::{widget_glue, widget_properties, Orientation, Widget, WidgetBase, WIDGET};
use crate::widgets::grid::{Grid, Proportion};

/// Panes separated by draggable handles.
///
/// Pane `i` occupies grid track `2 * i`; the odd tracks between panes are
/// fixed-size handles. Every pane but the last is `Part(1)`, the last is
/// `Fill(1)`, so splitter moves trade weight between neighbours.
pub struct SplitPane {
    base: WidgetBase,
    orientation: Orientation,
    grid: Grid,
    handle_size: i32,
    on_proportions_changed: Option<Box<dyn FnMut()>>,
}

impl SplitPane {
    pub fn new(orientation: Orientation) -> Self {
        let mut grid = Grid::new();
        *grid.base_mut() = WidgetBase::stretched();
        Self {
            base: WidgetBase::stretched(),
            orientation,
            grid,
            handle_size: 4,
            on_proportions_changed: None,
        }
    }

    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    pub fn with_stylesheet(orientation: Orientation, stylesheet: &Rc<Stylesheet>) -> Self {
        let base = WidgetBase { stylesheet: Some(Rc::clone(stylesheet)), ..WidgetBase::stretched() };
        let mut pane = Self { base, ..Self::new(orientation) };
        pane.apply_style(stylesheet, DEFAULT_STYLE_NAME);
        pane
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn handle_size(&self) -> i32 {
        self.handle_size
    }

    // ── panes ─────────────────────────────────────────────────────────────

    pub fn widgets(&self) -> &[Box<dyn Widget>] {
        self.grid.widgets()
    }

    pub fn add_widget(&mut self, widget: Box<dyn Widget>) {
        self.grid.add_widget(widget);
        self.reset();
    }

    pub fn insert_widget(&mut self, index: usize, widget: Box<dyn Widget>) {
        self.grid.insert_widget(index, widget);
        self.reset();
    }

    pub fn remove_widget(&mut self, index: usize) -> Option<Box<dyn Widget>> {
        let removed = self.grid.remove_widget(index);
        if removed.is_some() {
            self.reset();
        }
        removed
    }

    pub fn clear_widgets(&mut self) {
        self.grid.clear_widgets();
        self.reset();
    }

    // ── proportions ───────────────────────────────────────────────────────

    /// Registers the handler fired when pane proportions change, replacing any previous one.
    pub fn on_proportions_changed(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_proportions_changed = Some(Box::new(f));
        self
    }

    pub fn set_on_proportions_changed(&mut self, f: impl FnMut() + 'static) {
        self.on_proportions_changed = Some(Box::new(f));
    }

    fn fire_proportions_changed(&mut self) {
        if let Some(f) = self.on_proportions_changed.as_mut() {
            f();
        }
    }

    /// Grid tracks along the split axis, handles included.
    pub fn proportions(&self) -> &[Proportion] {
        match self.orientation {
            Orientation::Horizontal => &self.grid.columns_proportions,
            Orientation::Vertical => &self.grid.rows_proportions,
        }
    }

    fn proportions_mut(&mut self) -> &mut Vec<Proportion> {
        match self.orientation {
            Orientation::Horizontal => &mut self.grid.columns_proportions,
            Orientation::Vertical => &mut self.grid.rows_proportions,
        }
    }

    /// Rebuilds the tracks from the current panes and resets every split.
    pub fn reset(&mut self) {
        let count = self.grid.widgets().len();
        let handle = Proportion::pixels(self.handle_size as f32);
        let mut tracks = Vec::with_capacity((count * 2).saturating_sub(1));
        for i in 0..count {
            if i > 0 {
                tracks.push(handle);
            }
            tracks.push(if i + 1 < count { Proportion::part(1.0) } else { Proportion::fill(1.0) });
        }

        self.grid.columns_proportions.clear();
        self.grid.rows_proportions.clear();
        *self.proportions_mut() = tracks;

        let horizontal = self.orientation == Orientation::Horizontal;
        for (i, pane) in self.grid.widgets_mut().iter_mut().enumerate() {
            let base = pane.base_mut();
            base.grid_column = if horizontal { i * 2 } else { 0 };
            base.grid_row = if horizontal { 0 } else { i * 2 };
            base.grid_column_span = 1;
            base.grid_row_span = 1;
        }
        log::trace!("split pane reset with {count} panes");
        self.fire_proportions_changed();
    }

    /// Weight of pane `index`, 0 if there is no such pane.
    pub fn get_proportion(&self, index: usize) -> f32 {
        self.proportions().get(index * 2).map_or(0.0, |p| p.value)
    }

    fn pair(&self, left: usize) -> Option<(f32, f32)> {
        let props = self.proportions();
        Some((props.get(left * 2)?.value, props.get(left * 2 + 2)?.value))
    }

    /// Share of the first pane within the pair `left`, `left + 1`.
    pub fn get_splitter_position(&self, left: usize) -> f32 {
        match self.pair(left) {
            Some((a, b)) if a + b != 0.0 => a / (a + b),
            _ => 0.0,
        }
    }

    /// Redistributes the combined weight of panes `left` and `left + 1`.
    pub fn set_splitter_position(&mut self, left: usize, position: f32) {
        let Some((a, b)) = self.pair(left) else { return };
        let total = a + b;
        let first = position * total;
        let props = self.proportions_mut();
        props[left * 2].value = first;
        props[left * 2 + 2].value = total - first;
    }

    /// Moves handle `handle` so its leading edge sits `offset` pixels from
    /// the start of the pane, as during a mouse drag. Uses the track sizes
    /// of the last arrange; moves that would give the first pane a weight
    /// outside `0..=2` are ignored.
    pub fn drag_splitter(&mut self, handle: usize, offset: f32) {
        let count = self.grid.widgets().len();
        if handle + 1 >= count {
            return;
        }
        let horizontal = self.orientation == Orientation::Horizontal;
        let extent = if horizontal { self.base.bounds.size.x } else { self.base.bounds.size.y };
        if extent == 0.0 {
            return;
        }

        let handles_size = (self.handle_size * (count as i32 - 1)) as f32;
        let before: f32 = (0..handle * 2)
            .map(|i| if horizontal { self.grid.column_width(i) } else { self.grid.row_height(i) })
            .sum();
        let first = count as f32 * (offset - before) / (extent - handles_size);
        if !(0.0..=2.0).contains(&first) {
            return;
        }

        let Some((a, b)) = self.pair(handle) else { return };
        let props = self.proportions_mut();
        props[handle * 2].value = first;
        props[handle * 2 + 2].value = a + b - first;
        self.fire_proportions_changed();
    }
}

impl Widget for SplitPane {
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
            Orientation::Horizontal => &stylesheet.horizontal_split_pane_styles,
            Orientation::Vertical => &stylesheet.vertical_split_pane_styles,
        };
        let Some(style) = styles.get(name) else { return false };
        self.base.background = style.background;
        self.handle_size = style.handle_size;
        self.reset();
        true
    }

    fn on_key_down(&mut self, key: Key, mods: Modifiers) -> bool {
        self.grid.on_key_down(key, mods)
    }
}

impl Describe for SplitPane {
    const TYPE_NAME: &'static str = "SplitPane";
    const FAMILIES: &'static [&'static str] = WIDGET.families;
    const PARENT_ROLE: ParentRole = ParentRole::Items("Widgets");

    fn describe() -> TypeInfo<Self> {
        TypeInfo::<Self>::new().inherit(widget_properties(&WidgetBase::stretched())).list(
            "Widgets",
            WIDGET,
            |s| s.widgets().iter().map(|w| w.as_reflect()).collect(),
            |s, item| {
                s.add_widget(item.into_widget().ok()?);
                Some(())
            },
        )
    }

    fn runtime_type_name(&self) -> &'static str {
        match self.orientation {
            Orientation::Horizontal => "HorizontalSplitPane",
            Orientation::Vertical => "VerticalSplitPane",
        }
    }

    widget_glue!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mml::reflect::Reflect;
    use std::cell::Cell;

    use crate::widgets::grid::ProportionType;
    use crate::widgets::label::Label;

    fn three_panes() -> SplitPane {
        let mut pane = SplitPane::horizontal();
        for _ in 0..3 {
            pane.add_widget(Box::new(Label::new()));
        }
        pane
    }

    #[test]
    fn reset_lays_out_panes_and_handles() {
        let pane = three_panes();
        let kinds: Vec<ProportionType> = pane.proportions().iter().map(|p| p.kind).collect();
        use ProportionType::*;
        assert_eq!(kinds, [Part, Pixels, Part, Pixels, Fill]);
        assert_eq!(pane.proportions()[1].value, 4.0);
        assert_eq!(pane.widgets()[2].base().grid_column, 4);
    }

    #[test]
    fn splitter_position_round_trip() {
        let mut pane = three_panes();
        assert_eq!(pane.get_splitter_position(0), 0.5);
        pane.set_splitter_position(0, 0.25);
        assert_eq!(pane.get_proportion(0), 0.5);
        assert_eq!(pane.get_proportion(1), 1.5);
        assert_eq!(pane.get_splitter_position(0), 0.25);
        assert_eq!(pane.get_proportion(7), 0.0);
        assert_eq!(pane.get_splitter_position(2), 0.0);
    }

    #[test]
    fn drag_updates_weights_within_range() {
        let fired = Rc::new(Cell::new(0));
        let seen = Rc::clone(&fired);
        let mut pane = SplitPane::horizontal().on_proportions_changed(move || seen.set(seen.get() + 1));
        pane.add_widget(Box::new(Label::new()));
        pane.add_widget(Box::new(Label::new()));
        assert_eq!(fired.get(), 2);
        pane.arrange(Rect::new(0.0, 0.0, 104.0, 50.0));

        // 100px shared by two panes; a handle at 25px gives the first pane weight 0.5.
        pane.drag_splitter(0, 25.0);
        assert_eq!(pane.get_proportion(0), 0.5);
        assert_eq!(pane.get_proportion(1), 1.5);
        assert_eq!(fired.get(), 3);

        pane.drag_splitter(0, 150.0);
        assert_eq!(pane.get_proportion(0), 0.5);
        assert_eq!(fired.get(), 3);
    }

    #[test]
    fn vertical_uses_rows() {
        let mut pane = SplitPane::vertical();
        pane.add_widget(Box::new(Label::new()));
        pane.add_widget(Box::new(Label::new()));
        assert_eq!(pane.grid.rows_proportions.len(), 3);
        assert!(pane.grid.columns_proportions.is_empty());
        assert_eq!(pane.widgets()[1].base().grid_row, 2);
        assert_eq!(pane.type_name(), "VerticalSplitPane");
    }

    #[test]
    fn style_handle_size_applies() {
        let mut sheet = Stylesheet::default();
        if let Some(s) = sheet.horizontal_split_pane_styles.get_mut(DEFAULT_STYLE_NAME) {
            s.handle_size = 6;
        }
        let mut pane = SplitPane::with_stylesheet(Orientation::Horizontal, &Rc::new(sheet));
        pane.add_widget(Box::new(Label::new()));
        pane.add_widget(Box::new(Label::new()));
        assert_eq!(pane.proportions()[1], Proportion::pixels(6.0));
    }
}
