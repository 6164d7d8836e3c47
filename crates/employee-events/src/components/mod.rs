//! HTML fragments for the dashboard pages.
//!
//! Components render to plain strings; every value that originates in the
//! database passes through [`escape_html`].

mod filters;
mod page;
mod sections;

pub use filters::{DashboardFilters, EntityDropdown, ProfileRadio};
pub use page::{landing_page, report_page};
pub use sections::{Header, NotesTable, Visualizations};

/// Something that renders to an HTML fragment.
pub trait Component {
    fn render(&self) -> String;
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
