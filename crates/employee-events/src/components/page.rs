use super::{Component, DashboardFilters, Header, NotesTable, Visualizations};
use crate::entities::{EntityKind, EntityOption};
use crate::report::ReportPage;

const HTMX_SCRIPT: &str = r#"<script src="https://unpkg.com/htmx.org@1.9.12"></script>"#;

const STYLE: &str = r#"<style>
body { font-family: sans-serif; margin: 2rem auto; max-width: 960px; }
.visualizations { display: flex; flex-wrap: wrap; gap: 1rem; }
.visualizations img { max-width: 100%; }
.chart-placeholder { color: #666; font-style: italic; }
.notes-table { border-collapse: collapse; width: 100%; }
.notes-table th, .notes-table td { border: 1px solid #ccc; padding: 0.4rem; text-align: left; }
</style>"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n{HTMX_SCRIPT}\n{STYLE}\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

/// Entry page: only the selection form, seeded with one kind's options.
pub fn landing_page(kind: EntityKind, options: &[EntityOption]) -> String {
    let filters = DashboardFilters::new(kind, options, None).render();
    layout(
        "Employee Events Dashboard",
        &format!("<h1>Employee Events Dashboard</h1>\n{filters}"),
    )
}

pub fn report_page(page: &ReportPage) -> String {
    let selector = page.data.selector;
    let possessive = page.possessive_name();

    let header = Header {
        possessive_name: &possessive,
        kind: selector.kind,
    }
    .render();
    let filters = DashboardFilters::new(selector.kind, &page.options, Some(selector.id)).render();
    let visualizations = Visualizations {
        line_chart: &page.line_chart,
        risk_chart: &page.risk_chart,
    }
    .render();
    let notes = NotesTable {
        notes: &page.data.notes,
    }
    .render();

    layout(
        "Employee Events Dashboard",
        &format!("{header}\n{filters}\n{visualizations}\n{notes}"),
    )
}
