//! Panel drawing for the composite frame.
//!
//! Each function draws one region of the 1920x1080 raster: the bilingual
//! title band, the cumulative trend line, the current-month pie, the
//! rolling horizontal bars, and the footer. All panels read from the same
//! precomputed [`FrameAggregates`] — no panel recounts records.

#![allow(clippy::cast_precision_loss)]

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_bitmap::BitMapBackendError;
use sim_timelapse_incident_models::{IncidentCategory, MonthKey};
use sim_timelapse_timeline::aggregate::FrameAggregates;

use crate::text;

/// Result alias for panel drawing.
pub type DrawResult = Result<(), DrawingAreaErrorKind<BitMapBackendError>>;

/// Footer text color.
const FOOTER_GRAY: RGBColor = RGBColor(110, 110, 110);

/// Converts a category's palette triple to a plotters color.
#[must_use]
pub fn category_color(category: IncidentCategory) -> RGBColor {
    let (r, g, b) = category.color();
    RGBColor(r, g, b)
}

/// Draws the three bilingual title lines centered in the title band.
pub fn draw_title(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    current: MonthKey,
) -> DrawResult {
    let (width, _) = area.dim_in_pixel();
    let center_x = i32::try_from(width / 2).unwrap_or(0);

    let title_style = ("sans-serif", 30)
        .into_font()
        .style(FontStyle::Bold)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    let month_style = ("sans-serif", 26)
        .into_font()
        .style(FontStyle::Bold)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));

    area.draw(&Text::new(text::TITLE_EN, (center_x, 12), title_style.clone()))?;
    area.draw(&Text::new(text::TITLE_FR, (center_x, 52), title_style))?;
    area.draw(&Text::new(
        text::month_caption(current),
        (center_x, 96),
        month_style,
    ))?;

    Ok(())
}

/// Draws the cumulative monthly trend line with the current month
/// highlighted as the most recent point.
pub fn draw_trend(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    aggregates: &FrameAggregates,
) -> DrawResult {
    let points = aggregates.trend.len();
    let last_x = i32::try_from(points.saturating_sub(1)).unwrap_or(0);
    let y_max = (aggregates.trend_max().max(1) as f64) * 1.2;

    let mut chart = ChartBuilder::on(area)
        .caption(text::TREND_TITLE, ("sans-serif", 30))
        .margin(14)
        .x_label_area_size(38)
        .y_label_area_size(84)
        .build_cartesian_2d(0..last_x.max(1), 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_labels(12)
        .x_label_formatter(&|idx| {
            usize::try_from(*idx)
                .ok()
                .and_then(|i| aggregates.trend.get(i))
                .map_or_else(String::new, |p| p.key.year().to_string())
        })
        .y_desc(text::COUNT_AXIS_LABEL)
        .axis_desc_style(("sans-serif", 18))
        .label_style(("sans-serif", 14))
        .draw()?;

    chart.draw_series(LineSeries::new(
        aggregates
            .trend
            .iter()
            .enumerate()
            .map(|(i, p)| (i32::try_from(i).unwrap_or(0), p.count as f64)),
        BLUE.stroke_width(2),
    ))?;

    let current_count = aggregates.current_month_total();
    let current_y = current_count as f64;
    chart.draw_series(std::iter::once(Circle::new(
        (last_x, current_y),
        6,
        RED.filled(),
    )))?;

    let marker_label = format!(
        "{}: {} interventions",
        aggregates.current,
        text::format_count(current_count)
    );
    let marker_style = ("sans-serif", 18)
        .into_font()
        .style(FontStyle::Bold)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(std::iter::once(Text::new(
        marker_label,
        (last_x, current_y + y_max * 0.04),
        marker_style,
    )))?;

    Ok(())
}

/// Draws the current-month category pie with its bilingual legend.
///
/// An empty breakdown (no records for the frame's bucket) omits the pie
/// gracefully instead of failing the frame.
pub fn draw_breakdown(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    aggregates: &FrameAggregates,
) -> DrawResult {
    let (width, height) = area.dim_in_pixel();
    let center_x = i32::try_from(width / 2).unwrap_or(0);

    let caption_style = ("sans-serif", 26)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    area.draw(&Text::new(
        format!("{}: {}", text::BREAKDOWN_TITLE, aggregates.current),
        (center_x, 6),
        caption_style,
    ))?;

    if aggregates.breakdown.is_empty() {
        log::warn!(
            "No categories with records for {}; omitting pie",
            aggregates.current
        );
        return Ok(());
    }

    let sizes: Vec<f64> = aggregates.breakdown.iter().map(|c| c.count as f64).collect();
    let colors: Vec<RGBColor> = aggregates
        .breakdown
        .iter()
        .map(|c| category_color(c.category))
        .collect();
    // Percentages inside the slices, bilingual legend on the right; slice
    // labels stay empty.
    let labels: Vec<String> = vec![String::new(); aggregates.breakdown.len()];

    let pie_center = (
        i32::try_from(width / 4).unwrap_or(0),
        i32::try_from(height / 2).unwrap_or(0),
    );
    let radius = f64::from(height.min(width / 2)) / 2.0 - 40.0;

    let mut pie = Pie::new(&pie_center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.percentages(("sans-serif", 15).into_font().color(&WHITE));
    area.draw(&pie)?;

    let entry_height = 28;
    let legend_count = i32::try_from(aggregates.breakdown.len()).unwrap_or(0);
    let legend_x = i32::try_from(width / 2).unwrap_or(0) + 40;
    let mut legend_y =
        i32::try_from(height / 2).unwrap_or(0) - legend_count * entry_height / 2;
    let legend_style = ("sans-serif", 15).into_font().color(&BLACK);

    for entry in &aggregates.breakdown {
        area.draw(&Rectangle::new(
            [(legend_x, legend_y), (legend_x + 16, legend_y + 16)],
            category_color(entry.category).filled(),
        ))?;
        area.draw(&Text::new(
            format!(
                "{} ({})",
                entry.category.label_bilingual(),
                text::format_count(entry.count)
            ),
            (legend_x + 26, legend_y + 1),
            legend_style.clone(),
        ))?;
        legend_y += entry_height;
    }

    Ok(())
}

/// Draws the rolling-window totals as horizontal bars, ascending by count
/// so the largest category sits at the top.
pub fn draw_rolling(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    aggregates: &FrameAggregates,
) -> DrawResult {
    let bars = aggregates.rolling.len();
    if bars == 0 {
        return Ok(());
    }

    let max = aggregates
        .rolling
        .iter()
        .map(|c| c.count)
        .max()
        .unwrap_or(1)
        .max(1) as f64;

    let mut chart = ChartBuilder::on(area)
        .caption(text::ROLLING_TITLE, ("sans-serif", 28))
        .margin(14)
        .x_label_area_size(56)
        .y_label_area_size(330)
        .build_cartesian_2d(0f64..max * 1.18, (0..bars).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(bars)
        .y_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(i) => aggregates
                .rolling
                .get(*i)
                .map_or_else(String::new, |c| c.category.label_bilingual().to_string()),
            _ => String::new(),
        })
        .x_desc(text::COUNT_AXIS_LABEL)
        .axis_desc_style(("sans-serif", 16))
        .label_style(("sans-serif", 12))
        .draw()?;

    let value_style = ("sans-serif", 14)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));

    for (i, entry) in aggregates.rolling.iter().enumerate() {
        chart.draw_series(std::iter::once(Rectangle::new(
            [
                (0.0, SegmentValue::Exact(i)),
                (entry.count as f64, SegmentValue::Exact(i + 1)),
            ],
            category_color(entry.category).filled(),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            text::format_count(entry.count),
            (entry.count as f64 + max * 0.02, SegmentValue::CenterOf(i)),
            value_style.clone(),
        )))?;
    }

    Ok(())
}

/// Draws the gray footer line: generation date, data source, and the
/// fixed coverage disclaimer.
pub fn draw_footer(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    generated_on: chrono::NaiveDate,
) -> DrawResult {
    let footer = format!(
        "Created / Créé: {} | {} | {}",
        generated_on.format("%Y-%m-%d"),
        text::DATA_SOURCE,
        text::DATA_NOTE
    );
    area.draw(&Text::new(
        footer,
        (16, 10),
        ("sans-serif", 14).into_font().color(&FOOTER_GRAY),
    ))?;
    Ok(())
}
