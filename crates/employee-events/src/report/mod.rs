//! Report assembly for a single employee or team.

mod charts;
mod series;

pub use charts::{bar_chart_svg, line_chart_svg, ChartKind, ChartStore};
pub use series::{cumulative_series, parse_event_date, CumulativePoint};

use crate::entities::{EntityCatalog, EntityId, EntityKind, EntityOption, NOTES_COLUMNS};
use crate::risk::{entity_risk, feature_rows, RiskClassifier};
use crate::store::{Frame, QueryError};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Which report to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSelector {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl ReportSelector {
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }

    /// Page path for this report, e.g. `/team/4`.
    pub fn path(&self) -> String {
        format!("/{}/{}", self.kind.slug(), self.id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("no {} found with id {id}", .kind.slug())]
    NotFound { kind: EntityKind, id: EntityId },
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("unrecognized event date '{value}'")]
    InvalidDate { value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RiskOutcome {
    Scored { probability: f64 },
    NoData,
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteEntry {
    pub date: String,
    pub note: String,
}

/// Everything fetched and computed for a report, before rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub selector: ReportSelector,
    pub display_name: String,
    pub series: Vec<CumulativePoint>,
    pub scored_rows: usize,
    pub risk: RiskOutcome,
    pub notes: Vec<NoteEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartSlot {
    Rendered { src: String, alt: &'static str },
    NoData { message: String },
    Unavailable { message: String },
}

/// A fully assembled report ready for HTML rendering.
#[derive(Debug, Clone)]
pub struct ReportPage {
    pub data: ReportData,
    pub line_chart: ChartSlot,
    pub risk_chart: ChartSlot,
    pub options: Vec<EntityOption>,
}

impl ReportPage {
    pub fn possessive_name(&self) -> String {
        possessive(&self.data.display_name)
    }
}

/// `Ada's`, or `James'` for names already ending in `s`.
pub fn possessive(name: &str) -> String {
    if name.ends_with('s') {
        format!("{name}'")
    } else {
        format!("{name}'s")
    }
}

/// Builds reports from the entity catalog and an injected classifier.
#[derive(Clone)]
pub struct ReportAssembler {
    catalog: EntityCatalog,
    classifier: Arc<dyn RiskClassifier>,
    charts: ChartStore,
}

impl std::fmt::Debug for ReportAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportAssembler")
            .field("catalog", &self.catalog)
            .field("charts", &self.charts)
            .finish_non_exhaustive()
    }
}

impl ReportAssembler {
    pub fn new(
        catalog: EntityCatalog,
        classifier: Arc<dyn RiskClassifier>,
        charts: ChartStore,
    ) -> Self {
        Self {
            catalog,
            classifier,
            charts,
        }
    }

    pub fn catalog(&self) -> &EntityCatalog {
        &self.catalog
    }

    pub fn options(&self, kind: EntityKind) -> Result<Vec<EntityOption>, QueryError> {
        self.catalog.get(kind).list()
    }

    /// Fetches the four data shapes a report needs and scores the entity.
    pub fn collect(&self, selector: ReportSelector) -> Result<ReportData, ReportError> {
        let ReportSelector { kind, id } = selector;
        let entity = self.catalog.get(kind);

        let display_name = entity
            .display_name(id)?
            .ok_or(ReportError::NotFound { kind, id })?;

        let series = cumulative_series(&entity.event_series(id)?)?;

        let features = feature_rows(&entity.model_features(id)?)?;
        let risk = match entity_risk(kind, self.classifier.as_ref(), &features) {
            Ok(Some(probability)) => RiskOutcome::Scored { probability },
            Ok(None) => RiskOutcome::NoData,
            Err(err) => {
                warn!(error = %err, kind = kind.slug(), %id, "risk scoring failed");
                RiskOutcome::Unavailable {
                    reason: err.to_string(),
                }
            }
        };

        let notes = note_entries(&entity.notes(id)?)?;

        debug!(
            kind = kind.slug(),
            %id,
            points = series.len(),
            scored_rows = features.len(),
            notes = notes.len(),
            "report data collected"
        );

        Ok(ReportData {
            selector,
            display_name,
            series,
            scored_rows: features.len(),
            risk,
            notes,
        })
    }

    /// Collects report data, writes both chart artifacts and loads the
    /// dropdown options for the page's selection form.
    pub fn assemble(&self, selector: ReportSelector) -> Result<ReportPage, ReportError> {
        let data = self.collect(selector)?;
        let ReportSelector { kind, id } = selector;

        let line_chart = if data.series.is_empty() {
            ChartSlot::NoData {
                message: format!(
                    "No data available to generate Line Chart for {} with ID {}.",
                    kind.slug(),
                    id
                ),
            }
        } else {
            let title = format!("Cumulative Events Over Time ({})", data.display_name);
            self.publish(ChartKind::Line, selector, &line_chart_svg(&title, &data.series))
        };

        let risk_chart = match &data.risk {
            RiskOutcome::Scored { probability } => {
                let title = format!("Predicted Recruitment Risk ({})", data.display_name);
                self.publish(ChartKind::Bar, selector, &bar_chart_svg(&title, *probability))
            }
            RiskOutcome::NoData => ChartSlot::NoData {
                message: format!(
                    "No data available to generate Bar Chart for {} with ID {}.",
                    kind.slug(),
                    id
                ),
            },
            RiskOutcome::Unavailable { .. } => ChartSlot::Unavailable {
                message: format!("{} not available.", ChartKind::Bar.alt_text()),
            },
        };

        let options = self.options(kind)?;

        Ok(ReportPage {
            data,
            line_chart,
            risk_chart,
            options,
        })
    }

    fn publish(&self, chart: ChartKind, selector: ReportSelector, svg: &str) -> ChartSlot {
        match self.charts.write(chart, selector.kind, selector.id, svg) {
            Ok(src) => ChartSlot::Rendered {
                src,
                alt: chart.alt_text(),
            },
            Err(err) => {
                warn!(
                    error = %err,
                    chart = chart.stem(),
                    dir = %self.charts.dir().display(),
                    "unable to write chart artifact"
                );
                ChartSlot::Unavailable {
                    message: format!("{} not available.", chart.alt_text()),
                }
            }
        }
    }
}

fn note_entries(frame: &Frame) -> Result<Vec<NoteEntry>, QueryError> {
    let [date_column, note_column] = NOTES_COLUMNS;
    let dates = frame.text_column(date_column)?;
    let notes = frame.text_column(note_column)?;
    Ok(dates
        .into_iter()
        .zip(notes)
        .map(|(date, note)| NoteEntry { date, note })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn possessive_handles_trailing_s() {
        assert_eq!(possessive("Ada Byron"), "Ada Byron's");
        assert_eq!(possessive("Chris Jones"), "Chris Jones'");
        assert_eq!(possessive("Sales"), "Sales'");
    }

    #[test]
    fn selector_paths_use_kind_slug() {
        let selector = ReportSelector::new(EntityKind::Team, EntityId::new(4));
        assert_eq!(selector.path(), "/team/4");
    }

    #[test]
    fn notes_frame_maps_to_entries() {
        let frame = Frame::empty(&NOTES_COLUMNS);
        assert!(note_entries(&frame).expect("empty notes").is_empty());
    }
}
