use chrono::{DateTime, Utc};
use employee_events::config::StorageConfig;
use employee_events::entities::EntityCatalog;
use employee_events::error::AppError;
use employee_events::report::{ChartStore, ReportAssembler, ReportData};
use employee_events::risk::LogisticModel;
use employee_events::store::QueryExecutor;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) reports: Arc<ReportAssembler>,
    pub(crate) static_dir: Arc<PathBuf>,
}

/// Loads the classifier artifact and wires the query layer to the chart
/// directory.
pub(crate) fn build_assembler(storage: &StorageConfig) -> Result<ReportAssembler, AppError> {
    let model = LogisticModel::from_path(&storage.model_path)?;
    info!(
        path = %storage.model_path.display(),
        coefficients = ?model.coefficients,
        intercept = model.intercept,
        "risk model loaded"
    );

    let catalog = EntityCatalog::new(QueryExecutor::new(&storage.database_path))?;
    Ok(ReportAssembler::new(
        catalog,
        Arc::new(model),
        ChartStore::new(&storage.static_dir),
    ))
}

/// Runs store-bound work on the blocking pool.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| AppError::Task(err.to_string()))?
}

/// JSON form of a report, shared by the API route and the CLI.
#[derive(Debug, Serialize)]
pub(crate) struct ReportSummary {
    pub(crate) generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub(crate) report: ReportData,
}

impl From<ReportData> for ReportSummary {
    fn from(report: ReportData) -> Self {
        Self {
            generated_at: Utc::now(),
            report,
        }
    }
}
