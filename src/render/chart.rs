use super::escape_xml;
use crate::geometry::{RingLayout, Sector, INNER_GRADIENTS, OUTER_GRADIENTS};
use crate::report::TypeScore;
use std::fmt::Write;

pub const RING_VIEW_BOX: f64 = 400.0;

const BAR_PALETTE: [&str; 8] = [
    "#007AFF", "#1E88E5", "#42A5F5", "#64B5F6", "#81C784", "#AED581", "#FFCC02", "#FFB74D",
];

const LABEL_STYLE: &str = "font-family: sans-serif; font-weight: 600; fill: white; text-anchor: middle; dominant-baseline: central;";

fn gradient_defs(out: &mut String) {
    out.push_str("<defs>");
    for (id, start, end) in OUTER_GRADIENTS.iter().chain(INNER_GRADIENTS.iter()) {
        let _ = write!(
            out,
            r#"<linearGradient id="{id}" x1="0%" y1="0%" x2="100%" y2="100%"><stop offset="0%" stop-color="{start}"/><stop offset="100%" stop-color="{end}"/></linearGradient>"#
        );
    }
    out.push_str("</defs>");
}

fn ring_group(out: &mut String, id: &str, sectors: &[Sector], font_size: u32) {
    let _ = write!(out, r#"<g id="{id}">"#);
    for s in sectors {
        let _ = write!(
            out,
            r#"<path d="{}" fill="{}" stroke="none" class="ring-sector"/>"#,
            s.path, s.fill
        );
        let _ = write!(
            out,
            r#"<text x="{x:.3}" y="{y:.3}" style="{style} font-size: {font_size}px;" transform="rotate({r:.3}, {x:.3}, {y:.3})">{label}</text>"#,
            x = s.label_x,
            y = s.label_y,
            r = s.label_rotation,
            style = LABEL_STYLE,
            label = escape_xml(&s.label),
        );
    }
    out.push_str("</g>");
}

/// Inner SVG content of the dual-ring chart, without the outer `<svg>` element.
pub fn ring_chart_body(layout: &RingLayout, hub_radius: f64) -> String {
    let mut out = String::new();
    gradient_defs(&mut out);
    ring_group(&mut out, "outerRing", &layout.outer, 17);
    ring_group(&mut out, "innerRing", &layout.inner, 15);
    let c = RING_VIEW_BOX / 2.0;
    let _ = write!(
        out,
        r##"<circle cx="{c}" cy="{c}" r="{hub_radius}" fill="#f8f9fa" stroke="#e5e5e7" stroke-width="2"/>"##
    );
    out
}

pub fn ring_chart_svg(layout: &RingLayout, hub_radius: f64) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {v} {v}" width="{v}" height="{v}">{body}</svg>"#,
        v = RING_VIEW_BOX,
        body = ring_chart_body(layout, hub_radius)
    )
}

/// Scores sorted high to low, paired with their bar colour.
pub fn sorted_bars(scores: &[TypeScore]) -> Vec<(&TypeScore, &'static str)> {
    let mut sorted: Vec<&TypeScore> = scores.iter().collect();
    sorted.sort_by(|a, b| b.value.total_cmp(&a.value));
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, s)| (s, BAR_PALETTE[i % BAR_PALETTE.len()]))
        .collect()
}

/// Bar chart body drawn into a `width` x `height` box starting at the origin.
pub fn type_bar_chart_body(scores: &[TypeScore], width: f64, height: f64) -> String {
    let mut out = String::new();
    let axis_left = 44.0;
    let axis_bottom = height - 32.0;
    let plot_height = axis_bottom - 12.0;
    let bars = sorted_bars(scores);
    let slot = (width - axis_left) / bars.len().max(1) as f64;

    for tick in (0..=100).step_by(20) {
        let y = axis_bottom - plot_height * tick as f64 / 100.0;
        let _ = write!(
            out,
            r##"<line x1="{axis_left}" y1="{y:.2}" x2="{width}" y2="{y:.2}" stroke="#f0f0f0"/><text x="{tx}" y="{y:.2}" font-size="11" fill="#6e6e73" text-anchor="end" dominant-baseline="central">{tick}分</text>"##,
            tx = axis_left - 6.0,
        );
    }

    for (i, (score, color)) in bars.iter().enumerate() {
        let clamped = score.value.clamp(0.0, 100.0);
        let bar_height = plot_height * clamped / 100.0;
        let x = axis_left + slot * i as f64 + slot * 0.2;
        let bar_width = slot * 0.6;
        let _ = write!(
            out,
            r#"<rect x="{x:.2}" y="{y:.2}" width="{bar_width:.2}" height="{bar_height:.2}" rx="6" fill="{color}"/>"#,
            y = axis_bottom - bar_height,
        );
        let _ = write!(
            out,
            r##"<text x="{cx:.2}" y="{ly:.2}" font-size="11" fill="#1d1d1f" text-anchor="middle">{label}</text>"##,
            cx = x + bar_width / 2.0,
            ly = axis_bottom + 18.0,
            label = escape_xml(&score.label),
        );
    }

    out
}

pub fn type_bar_chart_svg(scores: &[TypeScore]) -> String {
    let (w, h) = (480.0, 320.0);
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">{}</svg>"#,
        type_bar_chart_body(scores, w, h)
    )
}
