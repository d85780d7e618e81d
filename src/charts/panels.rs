//! Column and horizontal-bar panels shared by the standalone charts and the
//! dashboard.
//!
//! Category axes are segmented so tick labels sit under each group; bar
//! geometry is drawn on a secondary `f64` coordinate spanning the same
//! plotting area, one unit per category.

use super::{Canvas, GRID_COLOR, NEUTRAL_COLOR};
use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;

/// Share of a category slot covered by its bars
const SLOT_FILL: f64 = 0.7;

pub struct Bar {
    pub value: f64,
    /// Symmetric error bar half-width, in value units
    pub error: Option<f64>,
    pub color: RGBColor,
    pub value_label: String,
}

pub struct Category {
    pub label: String,
    pub bars: Vec<Bar>,
    /// Drawn above the tallest bar (significance stars)
    pub note: Option<String>,
}

/// Value axis: range `0..max`, described by `title`
pub struct ValueAxis {
    pub max: f64,
    pub title: String,
    pub percent: bool,
}

impl ValueAxis {
    pub fn rating(title: &str) -> Self {
        Self {
            max: super::RATING_MAX,
            title: title.to_string(),
            percent: false,
        }
    }

    pub fn percent(title: &str) -> Self {
        Self {
            max: 100.0,
            title: title.to_string(),
            percent: true,
        }
    }

    pub fn linear(max: f64, title: &str) -> Self {
        Self {
            max,
            title: title.to_string(),
            percent: false,
        }
    }

    fn format(&self, value: f64) -> String {
        if self.percent {
            format!("{value:.0}%")
        } else {
            format!("{value:.1}")
        }
    }
}

/// Vertical reference line across a bar-row panel
pub struct Marker {
    pub value: f64,
    pub label: String,
    /// Dash and gap lengths, in row units
    pub dash: (f64, f64),
}

pub fn font(size: u32) -> TextStyle<'static> {
    TextStyle::from(("sans-serif", size).into_font())
}

pub fn bold(size: u32) -> TextStyle<'static> {
    TextStyle::from(("sans-serif", size).into_font().style(FontStyle::Bold))
}

fn segment_label(labels: &[String], value: &SegmentValue<u32>) -> String {
    match value {
        SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

/// Segments of a dashed line from `from` to `to`, split along y
fn dashed_vertical(x: f64, from: f64, to: f64, dash: (f64, f64)) -> Vec<PathElement<(f64, f64)>> {
    let style = NEUTRAL_COLOR.mix(0.7).stroke_width(2);
    let mut segments = Vec::new();
    let mut y = from;
    while y < to {
        let end = (y + dash.0).min(to);
        segments.push(PathElement::new(vec![(x, y), (x, end)], style));
        y = end + dash.1;
    }
    segments
}

/// Grouped vertical bars, one slot per category
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn column_chart(
    area: &Canvas<'_>,
    categories: &[Category],
    axis: &ValueAxis,
    label_size: u32,
) -> Result<()> {
    if categories.is_empty() {
        return Ok(());
    }
    let count = categories.len() as u32;
    let labels: Vec<String> = categories.iter().map(|c| c.label.clone()).collect();

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .margin_top(30)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..count).into_segmented(), 0f64..axis.max)?
        .set_secondary_coord(0f64..f64::from(count), 0f64..axis.max);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .bold_line_style(&GRID_COLOR)
        .light_line_style(&WHITE)
        .x_labels(categories.len() + 1)
        .x_label_formatter(&|v| segment_label(&labels, v))
        .y_label_formatter(&|v| axis.format(*v))
        .y_desc(axis.title.as_str())
        .label_style(font(label_size + 2))
        .axis_desc_style(bold(label_size + 2))
        .draw()?;

    let value_style = bold(label_size).pos(Pos::new(HPos::Center, VPos::Bottom));
    let note_style = bold(label_size + 4).pos(Pos::new(HPos::Center, VPos::Bottom));
    let note_offset = -(label_size as i32) - 10;

    for (slot, category) in categories.iter().enumerate() {
        let bar_width = SLOT_FILL / category.bars.len().max(1) as f64;
        let left = slot as f64 + (1.0 - SLOT_FILL) / 2.0;
        let mut top = 0.0_f64;

        for (j, bar) in category.bars.iter().enumerate() {
            let x0 = left + bar_width * j as f64;
            let x1 = x0 + bar_width;
            let center = (x0 + x1) / 2.0;
            chart.draw_secondary_series(std::iter::once(Rectangle::new(
                [(x0 + 0.01, 0.0), (x1 - 0.01, bar.value)],
                bar.color.mix(0.9).filled(),
            )))?;

            let mut label_at = bar.value;
            if let Some(error) = bar.error {
                chart.draw_secondary_series(std::iter::once(ErrorBar::new_vertical(
                    center,
                    (bar.value - error).max(0.0),
                    bar.value,
                    (bar.value + error).min(axis.max),
                    BLACK.stroke_width(2),
                    10,
                )))?;
                label_at = (bar.value + error).min(axis.max);
            }
            chart.draw_secondary_series(std::iter::once(
                EmptyElement::at((center, label_at))
                    + Text::new(bar.value_label.clone(), (0, -4), value_style.clone()),
            ))?;
            top = top.max(label_at);
        }

        if let Some(note) = &category.note {
            chart.draw_secondary_series(std::iter::once(
                EmptyElement::at((slot as f64 + 0.5, top))
                    + Text::new(note.clone(), (0, note_offset), note_style.clone()),
            ))?;
        }
    }

    Ok(())
}

/// Horizontal bars, first row on top, with optional reference lines
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn bar_rows(
    area: &Canvas<'_>,
    rows: &[(String, Bar)],
    axis: &ValueAxis,
    markers: &[Marker],
    label_size: u32,
) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let count = rows.len() as u32;
    // Segment 0 is the bottom row
    let labels: Vec<String> = rows.iter().rev().map(|(label, _)| label.clone()).collect();

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .margin_top(30)
        .margin_right(40)
        .x_label_area_size(50)
        .y_label_area_size(140)
        .build_cartesian_2d(0f64..axis.max, (0u32..count).into_segmented())?
        .set_secondary_coord(0f64..axis.max, 0f64..f64::from(count));

    chart
        .configure_mesh()
        .disable_y_mesh()
        .bold_line_style(&GRID_COLOR)
        .light_line_style(&WHITE)
        .y_labels(rows.len() + 1)
        .y_label_formatter(&|v| segment_label(&labels, v))
        .x_label_formatter(&|v| axis.format(*v))
        .x_desc(axis.title.as_str())
        .label_style(font(label_size + 1))
        .axis_desc_style(bold(label_size + 2))
        .draw()?;

    let value_style = bold(label_size).pos(Pos::new(HPos::Left, VPos::Center));
    for (i, (_, bar)) in rows.iter().enumerate() {
        let bottom = (rows.len() - 1 - i) as f64;
        chart.draw_secondary_series(std::iter::once(Rectangle::new(
            [(0.0, bottom + 0.2), (bar.value, bottom + 0.8)],
            bar.color.mix(0.85).filled(),
        )))?;
        chart.draw_secondary_series(std::iter::once(
            EmptyElement::at((bar.value, bottom + 0.5))
                + Text::new(bar.value_label.clone(), (8, 0), value_style.clone()),
        ))?;
    }

    let marker_style = bold(label_size - 2)
        .color(&NEUTRAL_COLOR)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    for marker in markers {
        chart.draw_secondary_series(dashed_vertical(
            marker.value,
            0.0,
            f64::from(count),
            marker.dash,
        ))?;
        chart.draw_secondary_series(std::iter::once(
            EmptyElement::at((marker.value, f64::from(count)))
                + Text::new(marker.label.clone(), (0, -6), marker_style.clone()),
        ))?;
    }

    Ok(())
}

/// Filled box with centered bold lines, in the area's pixel space
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub fn callout(area: &Canvas<'_>, width: u32, lines: &[String], color: &RGBColor) -> Result<()> {
    let (w, h) = area.dim_in_pixel();
    let box_width = width.min(w) as i32;
    let x0 = (w as i32 - box_width) / 2;
    let (x1, y0, y1) = (x0 + box_width, 4, h as i32 - 4);
    area.draw(&Rectangle::new([(x0, y0), (x1, y1)], color.mix(0.12).filled()))?;
    area.draw(&Rectangle::new([(x0, y0), (x1, y1)], color.stroke_width(2)))?;
    text_block(area, lines, &bold(14), 1.4)
}

/// Lines centered horizontally and vertically in `area`
#[allow(
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
pub fn text_block(
    area: &Canvas<'_>,
    lines: &[String],
    style: &TextStyle<'_>,
    spacing: f64,
) -> Result<()> {
    let (w, h) = area.dim_in_pixel();
    let line_height = (style.font.get_size() * spacing) as i32;
    let block = line_height * lines.len() as i32;
    let top = (h as i32 - block) / 2 + line_height / 2;
    let centered = style.pos(Pos::new(HPos::Center, VPos::Center));
    for (i, line) in lines.iter().enumerate() {
        area.draw_text(line, &centered, (w as i32 / 2, top + line_height * i as i32))?;
    }
    Ok(())
}
