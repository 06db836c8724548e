use std::collections::HashMap;
use std::f64::consts::TAU;

use log::debug;

use crate::config::Config;
use crate::error::ResolveError;
use crate::ir::PieChartSource;
use crate::overlap::{Interval, LabelRemover};
use crate::text_metrics::{estimate_text_width, measure_text_width};
use crate::theme::Theme;

use super::{LabelLayout, PieLayout, Side, SliceLayout, TitleLayout};

/// Point on a circle of `radius`, with angles clockwise from 12 o'clock.
pub(crate) fn polar(radius: f64, angle: f64) -> (f64, f64) {
    (radius * angle.sin(), -radius * angle.cos())
}

fn format_value(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if (rounded - rounded.round()).abs() < 0.001 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.2}", rounded)
    }
}

fn compute_slices(chart: &PieChartSource, theme: &Theme) -> Vec<SliceLayout> {
    let total = chart.total();
    let fallback_span = TAU / chart.slices.len().max(1) as f64;

    let mut color_map: HashMap<&str, usize> = HashMap::new();
    let palette = &theme.pie_colors;

    let mut slices = Vec::with_capacity(chart.slices.len());
    let mut angle = 0.0_f64;
    for (index, slice) in chart.slices.iter().enumerate() {
        let value = slice.value.max(0.0);
        let span = if total > 0.0 {
            value / total * TAU
        } else {
            fallback_span
        };
        let next_color = color_map.len();
        let color_idx = *color_map.entry(slice.label.as_str()).or_insert(next_color);
        let color = if palette.is_empty() {
            "#000000".to_string()
        } else {
            palette[color_idx % palette.len()].clone()
        };
        slices.push(SliceLayout {
            index,
            label: slice.label.clone(),
            value,
            start_angle: angle,
            end_angle: angle + span,
            color,
        });
        angle += span;
    }
    slices
}

pub fn compute_pie_layout(
    chart: &PieChartSource,
    config: &Config,
) -> Result<PieLayout, ResolveError> {
    let pie_cfg = &config.pie;
    let theme = &config.theme;

    let width = pie_cfg.width.max(pie_cfg.min_size);
    let height = pie_cfg.height.max(pie_cfg.min_size);
    let radius = (width.min(height) / 2.0 - pie_cfg.radius_margin).max(1.0);
    let inner_radius = radius * pie_cfg.inner_ratio;
    let outer_radius = radius * pie_cfg.outer_ratio;
    let centroid_radius = (inner_radius + outer_radius) / 2.0;
    let label_radius = radius * pie_cfg.label_ratio;

    let slices = compute_slices(chart, theme);

    let candidates: Vec<LabelLayout> = slices
        .iter()
        .map(|slice| {
            let mid = slice.mid_angle();
            let side = Side::of_angle(mid);
            let (_, y) = polar(label_radius, mid);
            let text = if chart.show_data {
                format!("{} [{}]", slice.label, format_value(slice.value))
            } else {
                slice.label.clone()
            };
            let text_width = if pie_cfg.measure_text {
                measure_text_width(&text, theme.font_size, &theme.font_family)
            } else {
                estimate_text_width(&text, theme.font_size)
            };
            LabelLayout {
                slice: slice.index,
                text,
                side,
                x: radius * side.sign(),
                y,
                width: text_width,
                interval: Interval::new(y, y + pie_cfg.label_height, slice.value),
                line: [
                    polar(centroid_radius, mid),
                    polar(label_radius, mid),
                    (radius * pie_cfg.line_ratio * side.sign(), y),
                ],
            }
        })
        .collect();

    let remover = LabelRemover::new(config.resolver.strategy);
    let kept = remover.retain_by_domain(&candidates, |label| label.side, |label| label.interval)?;
    let mut visible = vec![false; slices.len()];
    let labels: Vec<LabelLayout> = kept
        .into_iter()
        .inspect(|label| visible[label.slice] = true)
        .cloned()
        .collect();
    let dropped: Vec<LabelLayout> = candidates
        .into_iter()
        .filter(|candidate| !visible[candidate.slice])
        .collect();
    debug!(
        "pie layout {}x{}: {} slices, {} labels shown, {} dropped",
        width,
        height,
        slices.len(),
        labels.len(),
        dropped.len()
    );

    let widest_label = labels.iter().map(|label| label.width).fold(0.0_f64, f64::max);
    let half_width = (width / 2.0).max(radius + pie_cfg.label_padding + widest_label);
    let canvas_width = half_width * 2.0;

    let title_block = if chart.title.is_some() {
        theme.title_font_size + pie_cfg.title_margin
    } else {
        0.0
    };
    let title = chart.title.as_ref().map(|text| TitleLayout {
        x: canvas_width / 2.0,
        y: theme.title_font_size,
        text: text.clone(),
    });

    Ok(PieLayout {
        width: canvas_width,
        height: height + title_block,
        center: (canvas_width / 2.0, title_block + height / 2.0),
        radius,
        inner_radius,
        outer_radius,
        slices,
        labels,
        dropped,
        title,
    })
}
