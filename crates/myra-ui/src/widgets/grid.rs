use myra_engine::coords::{Rect, Vec2};

use crate::mml::{downcast, Describe, MmlEnum, ParentRole, Reflect, SimpleType, TypeInfo, TypeRef};
use crate::widget::{widget_glue, widget_properties, Widget, WidgetBase, WIDGET};

// ── Proportion ────────────────────────────────────────────────────────────

crate::mml_enum! {
    #[derive(Default)]
    pub enum ProportionType { #[default] Auto, Part, Fill, Pixels }
}

/// Sizing rule of one grid column or row.
///
/// `Pixels` is a fixed size, `Auto` fits the largest child. `Part` and
/// `Fill` share the space left over in proportion to `value`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Proportion {
    pub kind: ProportionType,
    pub value: f32,
}

impl Default for Proportion {
    fn default() -> Self {
        Self { kind: ProportionType::Auto, value: 1.0 }
    }
}

impl Proportion {
    pub fn new(kind: ProportionType, value: f32) -> Self {
        Self { kind, value }
    }

    pub fn auto() -> Self {
        Self::default()
    }

    pub fn part(value: f32) -> Self {
        Self::new(ProportionType::Part, value)
    }

    pub fn fill(value: f32) -> Self {
        Self::new(ProportionType::Fill, value)
    }

    pub fn pixels(value: f32) -> Self {
        Self::new(ProportionType::Pixels, value)
    }
}

impl Describe for Proportion {
    const TYPE_NAME: &'static str = "Proportion";
    const FAMILIES: &'static [&'static str] = &["Proportion"];

    fn describe() -> TypeInfo<Self> {
        TypeInfo::<Self>::new()
            .simple("Type", SimpleType::Enum(ProportionType::VARIANTS), |p| p.kind.into(), |p, v| {
                p.kind = v.as_enum()?;
                Some(())
            })
            .default_value(ProportionType::Auto)
            .simple("Value", SimpleType::Float, |p| p.value.into(), |p, v| {
                p.value = v.as_float()?;
                Some(())
            })
            .default_value(1.0f32)
    }
}

/// Track sizes for one axis.
///
/// `content[i]` is the largest desired size among single-span children in
/// track `i`. When `measuring`, part tracks grow to fit their content at a
/// common size per unit of weight and fill tracks fit their content;
/// otherwise both share what `available` leaves after fixed tracks and spacing.
fn track_sizes(props: &[Proportion], content: &[f32], available: f32, spacing: f32, measuring: bool) -> Vec<f32> {
    let count = content.len().max(props.len());
    let prop = |i: usize| props.get(i).copied().unwrap_or_default();

    let mut sizes: Vec<f32> = (0..count)
        .map(|i| match prop(i).kind {
            ProportionType::Pixels => prop(i).value,
            ProportionType::Auto => content.get(i).copied().unwrap_or(0.0),
            ProportionType::Part | ProportionType::Fill => 0.0,
        })
        .collect();

    if measuring || !available.is_finite() {
        let unit = (0..count)
            .filter(|&i| prop(i).kind == ProportionType::Part && prop(i).value > 0.0)
            .map(|i| content.get(i).copied().unwrap_or(0.0) / prop(i).value)
            .fold(0.0f32, f32::max);
        for (i, size) in sizes.iter_mut().enumerate() {
            match prop(i).kind {
                ProportionType::Part => *size = unit * prop(i).value,
                ProportionType::Fill => *size = content.get(i).copied().unwrap_or(0.0),
                _ => {}
            }
        }
        return sizes;
    }

    let gaps = spacing * count.saturating_sub(1) as f32;
    let remaining = (available - gaps - sizes.iter().sum::<f32>()).max(0.0);
    let weight: f32 = (0..count)
        .filter(|&i| matches!(prop(i).kind, ProportionType::Part | ProportionType::Fill))
        .map(|i| prop(i).value.max(0.0))
        .sum();
    if weight > 0.0 {
        for (i, size) in sizes.iter_mut().enumerate() {
            if matches!(prop(i).kind, ProportionType::Part | ProportionType::Fill) {
                *size = remaining * prop(i).value.max(0.0) / weight;
            }
        }
    }
    sizes
}

fn offsets(sizes: &[f32], spacing: f32) -> Vec<f32> {
    let mut out = Vec::with_capacity(sizes.len() + 1);
    let mut at = 0.0;
    for size in sizes {
        out.push(at);
        at += size + spacing;
    }
    out.push(at - spacing);
    out
}

// ── Grid ──────────────────────────────────────────────────────────────────

/// Lays children out in columns and rows sized by [`Proportion`]s.
///
/// Tracks missing a proportion are `Auto`. A child outside the declared
/// tracks extends the grid.
pub struct Grid {
    base: WidgetBase,
    pub columns_proportions: Vec<Proportion>,
    pub rows_proportions: Vec<Proportion>,
    pub column_spacing: i32,
    pub row_spacing: i32,
    widgets: Vec<Box<dyn Widget>>,
    column_widths: Vec<f32>,
    row_heights: Vec<f32>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Self {
            base: WidgetBase::default(),
            columns_proportions: Vec::new(),
            rows_proportions: Vec::new(),
            column_spacing: 0,
            row_spacing: 0,
            widgets: Vec::new(),
            column_widths: Vec::new(),
            row_heights: Vec::new(),
        }
    }

    pub fn widgets(&self) -> &[Box<dyn Widget>] {
        &self.widgets
    }

    pub fn widgets_mut(&mut self) -> &mut Vec<Box<dyn Widget>> {
        &mut self.widgets
    }

    pub fn add_widget(&mut self, widget: Box<dyn Widget>) {
        self.widgets.push(widget);
    }

    pub fn insert_widget(&mut self, index: usize, widget: Box<dyn Widget>) {
        let index = index.min(self.widgets.len());
        self.widgets.insert(index, widget);
    }

    pub fn remove_widget(&mut self, index: usize) -> Option<Box<dyn Widget>> {
        (index < self.widgets.len()).then(|| self.widgets.remove(index))
    }

    pub fn clear_widgets(&mut self) {
        self.widgets.clear();
    }

    /// Width of column `index` after the last arrange, 0 if unknown.
    pub fn column_width(&self, index: usize) -> f32 {
        self.column_widths.get(index).copied().unwrap_or(0.0)
    }

    pub fn row_height(&self, index: usize) -> f32 {
        self.row_heights.get(index).copied().unwrap_or(0.0)
    }

    fn track_counts(&self) -> (usize, usize) {
        let visible = self.widgets.iter().filter(|w| w.base().visible);
        let (mut cols, mut rows) = (self.columns_proportions.len(), self.rows_proportions.len());
        for w in visible {
            let b = w.base();
            cols = cols.max(b.grid_column + b.grid_column_span);
            rows = rows.max(b.grid_row + b.grid_row_span);
        }
        (cols, rows)
    }

    /// Largest desired child size per track.
    fn content_sizes(&mut self, available: Vec2) -> (Vec<f32>, Vec<f32>) {
        let (cols, rows) = self.track_counts();
        let mut widths = vec![0.0f32; cols];
        let mut heights = vec![0.0f32; rows];
        for w in self.widgets.iter_mut().filter(|w| w.base().visible) {
            let size = w.measure(available);
            let b = w.base();
            if b.grid_column_span == 1 {
                widths[b.grid_column] = widths[b.grid_column].max(size.x);
            }
            if b.grid_row_span == 1 {
                heights[b.grid_row] = heights[b.grid_row].max(size.y);
            }
        }
        (widths, heights)
    }
}

impl Widget for Grid {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn measure_content(&mut self, available: Vec2) -> Vec2 {
        let (widths, heights) = self.content_sizes(available);
        let cs = self.column_spacing as f32;
        let rs = self.row_spacing as f32;
        let cols = track_sizes(&self.columns_proportions, &widths, available.x, cs, true);
        let rows = track_sizes(&self.rows_proportions, &heights, available.y, rs, true);
        Vec2::new(
            cols.iter().sum::<f32>() + cs * cols.len().saturating_sub(1) as f32,
            rows.iter().sum::<f32>() + rs * rows.len().saturating_sub(1) as f32,
        )
    }

    fn arrange_content(&mut self, bounds: Rect) {
        let (widths, heights) = self.content_sizes(bounds.size);
        let cs = self.column_spacing as f32;
        let rs = self.row_spacing as f32;
        self.column_widths = track_sizes(&self.columns_proportions, &widths, bounds.size.x, cs, false);
        self.row_heights = track_sizes(&self.rows_proportions, &heights, bounds.size.y, rs, false);

        let xs = offsets(&self.column_widths, cs);
        let ys = offsets(&self.row_heights, rs);
        for w in self.widgets.iter_mut() {
            let b = w.base();
            let (c0, c1) = (b.grid_column, b.grid_column + b.grid_column_span - 1);
            let (r0, r1) = (b.grid_row, b.grid_row + b.grid_row_span - 1);
            let (Some(&x0), Some(&y0)) = (xs.get(c0), ys.get(r0)) else { continue };
            let x1 = xs.get(c1).copied().unwrap_or(x0) + self.column_widths.get(c1).copied().unwrap_or(0.0);
            let y1 = ys.get(r1).copied().unwrap_or(y0) + self.row_heights.get(r1).copied().unwrap_or(0.0);
            let cell = Rect::new(bounds.left() + x0, bounds.top() + y0, x1 - x0, y1 - y0);
            w.arrange(cell);
        }
    }

    fn on_key_down(&mut self, key: myra_engine::input::Key, mods: myra_engine::input::Modifiers) -> bool {
        self.widgets.iter_mut().any(|w| w.base().enabled && w.on_key_down(key, mods))
    }
}

impl Describe for Grid {
    const TYPE_NAME: &'static str = "Grid";
    const FAMILIES: &'static [&'static str] = WIDGET.families;
    const PARENT_ROLE: ParentRole = ParentRole::Items("Widgets");

    fn describe() -> TypeInfo<Self> {
        TypeInfo::<Self>::new()
            .inherit(widget_properties(&WidgetBase::default()))
            .simple("ColumnSpacing", SimpleType::Int, |g| g.column_spacing.into(), |g, v| {
                g.column_spacing = v.as_int()?;
                Some(())
            })
            .default_value(0)
            .simple("RowSpacing", SimpleType::Int, |g| g.row_spacing.into(), |g, v| {
                g.row_spacing = v.as_int()?;
                Some(())
            })
            .default_value(0)
            .list(
                "ColumnsProportions",
                TypeRef::of::<Proportion>(),
                |g| g.columns_proportions.iter().map(|p| p as &dyn Reflect).collect(),
                |g, item| {
                    g.columns_proportions.push(downcast(item)?);
                    Some(())
                },
            )
            .list(
                "RowsProportions",
                TypeRef::of::<Proportion>(),
                |g| g.rows_proportions.iter().map(|p| p as &dyn Reflect).collect(),
                |g, item| {
                    g.rows_proportions.push(downcast(item)?);
                    Some(())
                },
            )
            .list(
                "Widgets",
                WIDGET,
                |g| g.widgets.iter().map(|w| w.as_reflect()).collect(),
                |g, item| {
                    g.widgets.push(item.into_widget().ok()?);
                    Some(())
                },
            )
    }

    widget_glue!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Label;

    fn sized(col: usize, row: usize, w: i32, h: i32) -> Box<dyn Widget> {
        let mut label = Label::new();
        let b = label.base_mut();
        b.grid_column = col;
        b.grid_row = row;
        b.width = Some(w);
        b.height = Some(h);
        Box::new(label)
    }

    #[test]
    fn auto_tracks_fit_content() {
        let mut grid = Grid::new();
        grid.column_spacing = 5;
        grid.add_widget(sized(0, 0, 30, 10));
        grid.add_widget(sized(1, 0, 20, 15));
        grid.add_widget(sized(1, 1, 40, 5));
        let size = grid.measure(Vec2::new(500.0, 500.0));
        assert_eq!(size, Vec2::new(30.0 + 5.0 + 40.0, 15.0 + 5.0));
    }

    #[test]
    fn fill_takes_what_is_left() {
        let mut grid = Grid::new();
        grid.base_mut().horizontal_alignment = crate::widget::HorizontalAlignment::Stretch;
        grid.columns_proportions = vec![Proportion::pixels(50.0), Proportion::fill(1.0)];
        grid.add_widget(sized(0, 0, 10, 10));
        grid.add_widget(sized(1, 0, 10, 10));
        grid.arrange(Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(grid.column_width(0), 50.0);
        assert_eq!(grid.column_width(1), 150.0);
        assert_eq!(grid.widgets()[1].bounds().left(), 50.0);
    }

    #[test]
    fn parts_share_by_weight() {
        let sizes = track_sizes(
            &[Proportion::part(1.0), Proportion::pixels(4.0), Proportion::part(3.0)],
            &[0.0, 0.0, 0.0],
            104.0,
            0.0,
            false,
        );
        assert_eq!(sizes, vec![25.0, 4.0, 75.0]);
    }

    #[test]
    fn parts_measure_at_common_unit() {
        let sizes = track_sizes(&[Proportion::part(1.0), Proportion::part(2.0)], &[10.0, 10.0], f32::INFINITY, 0.0, true);
        assert_eq!(sizes, vec![10.0, 20.0]);
    }

    #[test]
    fn children_extend_tracks() {
        let mut grid = Grid::new();
        grid.add_widget(sized(2, 3, 1, 1));
        assert_eq!(grid.track_counts(), (3, 4));
        assert!(grid.remove_widget(5).is_none());
        assert!(grid.remove_widget(0).is_some());
        assert_eq!(grid.track_counts(), (0, 0));
    }
}
