use super::series::CumulativePoint;
use crate::components::escape_html;
use crate::entities::{EntityId, EntityKind};
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const POSITIVE_COLOR: &str = "#1f77b4";
const NEGATIVE_COLOR: &str = "#ff7f0e";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
}

impl ChartKind {
    pub const fn stem(self) -> &'static str {
        match self {
            Self::Line => "line_chart",
            Self::Bar => "bar_chart",
        }
    }

    pub const fn alt_text(self) -> &'static str {
        match self {
            Self::Line => "Line Chart",
            Self::Bar => "Bar Chart",
        }
    }
}

/// Directory holding rendered chart artifacts, served under `/static`.
#[derive(Debug, Clone)]
pub struct ChartStore {
    dir: PathBuf,
}

impl ChartStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for a chart, namespaced by entity kind so an employee and a
    /// team sharing an id never overwrite each other.
    pub fn artifact_name(chart: ChartKind, kind: EntityKind, id: EntityId) -> String {
        format!("{}_{}_{}.svg", kind.slug(), chart.stem(), id)
    }

    /// Writes (or overwrites) the artifact and returns its public URL.
    pub fn write(
        &self,
        chart: ChartKind,
        kind: EntityKind,
        id: EntityId,
        svg: &str,
    ) -> io::Result<String> {
        fs::create_dir_all(&self.dir)?;
        let name = Self::artifact_name(chart, kind, id);
        let path = self.dir.join(&name);
        fs::write(&path, svg)?;
        debug!(path = %path.display(), "chart written");
        Ok(format!("/static/{name}"))
    }
}

/// Two-series cumulative line chart. Points are placed by calendar date.
pub fn line_chart_svg(title: &str, points: &[CumulativePoint]) -> String {
    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

    let first = points.first().map(|p| p.date);
    let last = points.last().map(|p| p.date);
    let span_days = match (first, last) {
        (Some(first), Some(last)) => (last - first).num_days().max(1) as f64,
        _ => 1.0,
    };
    let max_value = points
        .iter()
        .map(|p| p.positive.max(p.negative))
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    let x_of = |point: &CumulativePoint| match first {
        Some(first) if points.len() > 1 => {
            MARGIN_LEFT + (point.date - first).num_days() as f64 / span_days * plot_width
        }
        _ => MARGIN_LEFT + plot_width / 2.0,
    };
    let y_of = |value: i64| MARGIN_TOP + plot_height - value as f64 / max_value * plot_height;

    let polyline = |select: fn(&CumulativePoint) -> i64| {
        points
            .iter()
            .map(|point| format!("{:.1},{:.1}", x_of(point), y_of(select(point))))
            .collect::<Vec<_>>()
            .join(" ")
    };

    let mut svg = String::new();
    open_svg(&mut svg, title);
    write_axes(&mut svg, plot_width, plot_height);

    writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12">{}</text>"#,
        MARGIN_LEFT - 6.0,
        MARGIN_TOP + 4.0,
        max_value as i64
    )
    .expect("write y max");
    writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12">0</text>"#,
        MARGIN_LEFT - 6.0,
        MARGIN_TOP + plot_height + 4.0
    )
    .expect("write y min");

    if let (Some(first), Some(last)) = (first, last) {
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
            MARGIN_LEFT,
            MARGIN_TOP + plot_height + 18.0,
            first
        )
        .expect("write first date");
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12">{}</text>"#,
            MARGIN_LEFT + plot_width,
            MARGIN_TOP + plot_height + 18.0,
            last
        )
        .expect("write last date");
    }

    for (label, color, select) in [
        ("Positive", POSITIVE_COLOR, positive_total as fn(&CumulativePoint) -> i64),
        ("Negative", NEGATIVE_COLOR, negative_total),
    ] {
        writeln!(
            svg,
            r#"<polyline class="series-{}" fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
            label.to_ascii_lowercase(),
            color,
            polyline(select)
        )
        .expect("write series");
    }

    writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="13">Date</text>"#,
        MARGIN_LEFT + plot_width / 2.0,
        HEIGHT - 16.0
    )
    .expect("write x label");
    writeln!(
        svg,
        r#"<text x="16" y="{:.1}" text-anchor="middle" font-size="13" transform="rotate(-90 16 {:.1})">Event Count</text>"#,
        MARGIN_TOP + plot_height / 2.0,
        MARGIN_TOP + plot_height / 2.0
    )
    .expect("write y label");
    write_legend(&mut svg);

    svg.push_str("</svg>\n");
    svg
}

/// Single horizontal bar on a fixed [0, 1] axis.
pub fn bar_chart_svg(title: &str, score: f64) -> String {
    let score = score.clamp(0.0, 1.0);
    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let bar_height = plot_height * 0.5;

    let mut svg = String::new();
    open_svg(&mut svg, title);
    write_axes(&mut svg, plot_width, plot_height);

    writeln!(
        svg,
        r#"<rect class="risk-bar" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="blue" data-score="{:.4}"/>"#,
        MARGIN_LEFT,
        MARGIN_TOP + (plot_height - bar_height) / 2.0,
        score * plot_width,
        bar_height,
        score
    )
    .expect("write bar");

    for tick in 0..=5_u32 {
        let fraction = f64::from(tick) / 5.0;
        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">{:.1}</text>"#,
            MARGIN_LEFT + fraction * plot_width,
            MARGIN_TOP + plot_height + 18.0,
            fraction
        )
        .expect("write tick");
    }

    svg.push_str("</svg>\n");
    svg
}

fn positive_total(point: &CumulativePoint) -> i64 {
    point.positive
}

fn negative_total(point: &CumulativePoint) -> i64 {
    point.negative
}

fn open_svg(svg: &mut String, title: &str) {
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    )
    .expect("write svg header");
    writeln!(
        svg,
        r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="white"/>"#
    )
    .expect("write background");
    writeln!(
        svg,
        r#"<text x="{:.1}" y="28" text-anchor="middle" font-size="18">{}</text>"#,
        WIDTH / 2.0,
        escape_html(title)
    )
    .expect("write title");
}

fn write_axes(svg: &mut String, plot_width: f64, plot_height: f64) {
    writeln!(
        svg,
        r#"<line x1="{x0:.1}" y1="{y1:.1}" x2="{x1:.1}" y2="{y1:.1}" stroke="black"/>"#,
        x0 = MARGIN_LEFT,
        x1 = MARGIN_LEFT + plot_width,
        y1 = MARGIN_TOP + plot_height
    )
    .expect("write x axis");
    writeln!(
        svg,
        r#"<line x1="{x0:.1}" y1="{y0:.1}" x2="{x0:.1}" y2="{y1:.1}" stroke="black"/>"#,
        x0 = MARGIN_LEFT,
        y0 = MARGIN_TOP,
        y1 = MARGIN_TOP + plot_height
    )
    .expect("write y axis");
}

fn write_legend(svg: &mut String) {
    for (offset, (label, color)) in [("Positive", POSITIVE_COLOR), ("Negative", NEGATIVE_COLOR)]
        .into_iter()
        .enumerate()
    {
        let y = MARGIN_TOP + 10.0 + offset as f64 * 18.0;
        writeln!(
            svg,
            r#"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="{color}" stroke-width="2"/><text x="{:.1}" y="{:.1}" font-size="12">{label}</text>"#,
            MARGIN_LEFT + 12.0,
            MARGIN_LEFT + 32.0,
            MARGIN_LEFT + 38.0,
            y + 4.0
        )
        .expect("write legend");
    }
}
