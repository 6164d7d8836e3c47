use super::{escape_html, Component};
use crate::entities::EntityKind;
use crate::report::{ChartSlot, NoteEntry};
use std::fmt::Write as _;

/// Report title, e.g. `Ada Byron's Employee Report`.
#[derive(Debug, Clone)]
pub struct Header<'a> {
    pub possessive_name: &'a str,
    pub kind: EntityKind,
}

impl Component for Header<'_> {
    fn render(&self) -> String {
        format!(
            "<h1>{} {} Report</h1>",
            escape_html(self.possessive_name),
            self.kind.label()
        )
    }
}

/// The line chart and risk bar chart, or their placeholder messages.
#[derive(Debug, Clone)]
pub struct Visualizations<'a> {
    pub line_chart: &'a ChartSlot,
    pub risk_chart: &'a ChartSlot,
}

impl Component for Visualizations<'_> {
    fn render(&self) -> String {
        let mut html = String::from(r#"<section class="visualizations">"#);
        for slot in [self.line_chart, self.risk_chart] {
            html.push_str(&chart_slot(slot));
        }
        html.push_str("</section>");
        html
    }
}

fn chart_slot(slot: &ChartSlot) -> String {
    match slot {
        ChartSlot::Rendered { src, alt } => format!(
            r#"<img src="{}" alt="{}">"#,
            escape_html(src),
            escape_html(alt)
        ),
        ChartSlot::NoData { message } | ChartSlot::Unavailable { message } => {
            format!(r#"<p class="chart-placeholder">{}</p>"#, escape_html(message))
        }
    }
}

/// Two-column table of notes. Renders headers with an empty body when there
/// are no notes.
#[derive(Debug, Clone)]
pub struct NotesTable<'a> {
    pub notes: &'a [NoteEntry],
}

impl Component for NotesTable<'_> {
    fn render(&self) -> String {
        let mut html = String::from(
            r#"<table class="notes-table"><thead><tr><th>Note Date</th><th>Note</th></tr></thead><tbody>"#,
        );
        for entry in self.notes {
            write!(
                html,
                "<tr><td>{}</td><td>{}</td></tr>",
                escape_html(&entry.date),
                escape_html(&entry.note)
            )
            .expect("write note row");
        }
        html.push_str("</tbody></table>");
        html
    }
}
