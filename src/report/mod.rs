//! Two-panel runtime chart rendered as standalone SVG.
//!
//! The left panel plots both sort variants against dataset size, the
//! right panel plots search runtime. Points are drawn in ascending size
//! order; the report keeps processing order.

use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{BenchmarkReport, TimingSample};

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 600.0;
const PANEL_WIDTH: f64 = WIDTH / 2.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const TICKS: usize = 5;

struct Line<'a> {
    label: &'a str,
    color: &'a str,
    samples: &'a [TimingSample],
}

struct Panel<'a> {
    title: &'a str,
    offset_x: f64,
    lines: Vec<Line<'a>>,
}

/// Render the chart, or `None` when no dataset produced timings.
pub fn render_svg(report: &BenchmarkReport) -> Option<String> {
    if !report.has_data() {
        return None;
    }

    let panels = [
        Panel {
            title: "Sorting Runtime Comparison",
            offset_x: 0.0,
            lines: vec![
                Line {
                    label: "Recursive",
                    color: "#1f77b4",
                    samples: &report.series.recursive,
                },
                Line {
                    label: "Iterative",
                    color: "#d62728",
                    samples: &report.series.iterative,
                },
            ],
        },
        Panel {
            title: "Search Runtime",
            offset_x: PANEL_WIDTH,
            lines: vec![Line {
                label: "Search",
                color: "#2ca02c",
                samples: &report.series.search,
            }],
        },
    ];

    let mut svg = String::new();
    write_document(&mut svg, &panels).ok()?;
    Some(svg)
}

/// Write the chart to `path`. Returns `false` (and writes nothing)
/// when there is no data to plot.
pub fn write_chart(report: &BenchmarkReport, path: &Path) -> Result<bool> {
    let Some(svg) = render_svg(report) else {
        return Ok(false);
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(path, svg).with_context(|| format!("failed to write chart to {}", path.display()))?;
    Ok(true)
}

fn write_document(out: &mut String, panels: &[Panel<'_>]) -> fmt::Result {
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif" font-size="12">"#
    )?;
    writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
    for panel in panels {
        write_panel(out, panel)?;
    }
    writeln!(out, "</svg>")
}

fn write_panel(out: &mut String, panel: &Panel<'_>) -> fmt::Result {
    let left = panel.offset_x + MARGIN_LEFT;
    let right = panel.offset_x + PANEL_WIDTH - MARGIN_RIGHT;
    let top = MARGIN_TOP;
    let bottom = HEIGHT - MARGIN_BOTTOM;

    let all = panel.lines.iter().flat_map(|l| l.samples.iter());
    let (x_min, x_max) = padded_range(all.clone().map(|s| s.size as f64), false);
    let (y_min, y_max) = padded_range(all.map(|s| s.seconds), true);

    let sx = |x: f64| left + (x - x_min) / (x_max - x_min) * (right - left);
    let sy = |y: f64| bottom - (y - y_min) / (y_max - y_min) * (bottom - top);

    writeln!(out, r#"<g class="panel">"#)?;
    writeln!(
        out,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="16">{}</text>"#,
        (left + right) / 2.0,
        top - 20.0,
        panel.title
    )?;

    for i in 0..=TICKS {
        let t = i as f64 / TICKS as f64;
        let xv = x_min + t * (x_max - x_min);
        let yv = y_min + t * (y_max - y_min);
        let (px, py) = (sx(xv), sy(yv));

        writeln!(
            out,
            r##"<line x1="{px:.1}" y1="{top:.1}" x2="{px:.1}" y2="{bottom:.1}" stroke="#dddddd"/>"##
        )?;
        writeln!(
            out,
            r##"<line x1="{left:.1}" y1="{py:.1}" x2="{right:.1}" y2="{py:.1}" stroke="#dddddd"/>"##
        )?;
        writeln!(
            out,
            r#"<text x="{px:.1}" y="{:.1}" text-anchor="middle">{:.0}</text>"#,
            bottom + 18.0,
            xv
        )?;
        writeln!(
            out,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
            left - 6.0,
            py + 4.0,
            format_seconds(yv)
        )?;
    }

    writeln!(
        out,
        r#"<rect x="{left:.1}" y="{top:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="black"/>"#,
        right - left,
        bottom - top
    )?;
    writeln!(
        out,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">Data Size</text>"#,
        (left + right) / 2.0,
        HEIGHT - 15.0
    )?;
    let label_x = panel.offset_x + 18.0;
    let label_y = (top + bottom) / 2.0;
    writeln!(
        out,
        r#"<text x="{label_x:.1}" y="{label_y:.1}" text-anchor="middle" transform="rotate(-90 {label_x:.1} {label_y:.1})">Runtime (seconds)</text>"#
    )?;

    for (idx, line) in panel.lines.iter().enumerate() {
        let mut points: Vec<&TimingSample> = line.samples.iter().collect();
        points.sort_by_key(|s| s.size);

        let coords: Vec<String> = points
            .iter()
            .map(|s| format!("{:.1},{:.1}", sx(s.size as f64), sy(s.seconds)))
            .collect();
        writeln!(
            out,
            r#"<polyline class="series" data-label="{}" points="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
            line.label,
            coords.join(" "),
            line.color
        )?;
        for s in &points {
            writeln!(
                out,
                r#"<circle cx="{:.1}" cy="{:.1}" r="4" fill="{}"/>"#,
                sx(s.size as f64),
                sy(s.seconds),
                line.color
            )?;
        }

        let legend_y = top + 18.0 + idx as f64 * 18.0;
        writeln!(
            out,
            r#"<line x1="{:.1}" y1="{legend_y:.1}" x2="{:.1}" y2="{legend_y:.1}" stroke="{}" stroke-width="2"/>"#,
            left + 10.0,
            left + 30.0,
            line.color
        )?;
        writeln!(
            out,
            r#"<text x="{:.1}" y="{:.1}">{}</text>"#,
            left + 36.0,
            legend_y + 4.0,
            line.label
        )?;
    }

    writeln!(out, "</g>")
}

/// Axis range covering `values`; degenerate ranges are widened so
/// the scale never divides by zero. `from_zero` anchors the low end.
fn padded_range(values: impl Iterator<Item = f64>, from_zero: bool) -> (f64, f64) {
    let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if from_zero {
        lo = lo.min(0.0);
    }
    if hi - lo <= f64::EPSILON {
        let pad = if hi.abs() > 1.0 { hi.abs() * 0.1 } else { 1.0 };
        hi += pad;
        if !from_zero {
            lo -= pad;
        }
    }
    (lo, hi)
}

fn format_seconds(secs: f64) -> String {
    if secs == 0.0 {
        "0".to_string()
    } else if secs < 1e-3 {
        format!("{secs:.1e}")
    } else {
        format!("{secs:.4}")
    }
}
