use crate::config::RenderConfig;
use crate::layout::{LabelLayout, PieLayout, SliceLayout, polar};
use crate::theme::Theme;
use anyhow::Result;
use std::f64::consts::{PI, TAU};
use std::path::Path;

const LINE_OPACITY: f64 = 0.3;
const FULL_TURN_EPSILON: f64 = 1e-9;

pub fn render_svg(layout: &PieLayout, theme: &Theme) -> String {
    let mut svg = String::new();
    let width = layout.width;
    let height = layout.height;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    if let Some(title) = &layout.title {
        svg.push_str(&format!(
            "<text class=\"title\" x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            title.x,
            title.y,
            escape_xml(&theme.font_family),
            theme.title_font_size,
            theme.text_color,
            escape_xml(&title.text)
        ));
    }

    let (cx, cy) = layout.center;
    svg.push_str(&format!("<g transform=\"translate({cx:.2},{cy:.2})\">"));

    svg.push_str("<g class=\"slices\">");
    for slice in &layout.slices {
        if let Some(d) = slice_path(slice, layout.inner_radius, layout.outer_radius) {
            svg.push_str(&format!(
                "<path d=\"{d}\" fill=\"{}\" fill-rule=\"evenodd\" stroke=\"{}\" stroke-width=\"1\"/>",
                slice.color, theme.slice_stroke
            ));
        }
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"labels\">");
    for label in &layout.labels {
        svg.push_str(&label_svg(label, theme));
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"lines\">");
    for label in &layout.labels {
        svg.push_str(&format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\" opacity=\"{LINE_OPACITY}\"/>",
            points_attr(&label.line),
            theme.line_color
        ));
    }
    svg.push_str("</g>");

    svg.push_str("</g>");
    svg.push_str("</svg>");
    svg
}

/// Donut segment between `inner` and `outer`. Slices with no angular extent
/// produce nothing.
fn slice_path(slice: &SliceLayout, inner: f64, outer: f64) -> Option<String> {
    let span = slice.end_angle - slice.start_angle;
    if !span.is_finite() || span <= 0.0 {
        return None;
    }

    if span >= TAU - FULL_TURN_EPSILON {
        // A single arc cannot close on itself, so draw each ring as two halves.
        let mut d = ring_path(outer);
        if inner > 0.0 {
            d.push(' ');
            d.push_str(&ring_path(inner));
        }
        return Some(d);
    }

    let large_arc = if span > PI { 1 } else { 0 };
    let (x0, y0) = polar(outer, slice.start_angle);
    let (x1, y1) = polar(outer, slice.end_angle);
    let mut d = format!(
        "M {x0:.2} {y0:.2} A {outer:.2} {outer:.2} 0 {large_arc} 1 {x1:.2} {y1:.2}"
    );
    if inner > 0.0 {
        let (x2, y2) = polar(inner, slice.end_angle);
        let (x3, y3) = polar(inner, slice.start_angle);
        d.push_str(&format!(
            " L {x2:.2} {y2:.2} A {inner:.2} {inner:.2} 0 {large_arc} 0 {x3:.2} {y3:.2} Z"
        ));
    } else {
        d.push_str(" L 0 0 Z");
    }
    Some(d)
}

fn ring_path(radius: f64) -> String {
    format!(
        "M 0 {top:.2} A {radius:.2} {radius:.2} 0 1 1 0 {bottom:.2} A {radius:.2} {radius:.2} 0 1 1 0 {top:.2} Z",
        top = -radius,
        bottom = radius
    )
}

fn label_svg(label: &LabelLayout, theme: &Theme) -> String {
    format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" dy=\".35em\" text-anchor=\"{}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        label.x,
        label.y,
        label.side.text_anchor(),
        escape_xml(&theme.font_family),
        theme.font_size,
        theme.text_color,
        escape_xml(&label.text)
    )
}

fn points_attr(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
    theme: &Theme,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .map(|name| name.trim().trim_matches('"').to_string())
        .unwrap_or_else(|| "sans-serif".to_string());
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("invalid render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(
    _svg: &str,
    _output: &Path,
    _render_cfg: &RenderConfig,
    _theme: &Theme,
) -> Result<()> {
    anyhow::bail!("PNG output requires the `png` feature")
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
