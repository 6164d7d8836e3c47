use crate::cli::{load_config, ServeArgs};
use crate::infra::{build_assembler, AppState};
use crate::routes::dashboard_router;
use axum_prometheus::PrometheusMetricLayer;
use employee_events::error::AppError;
use employee_events::store::schema;
use employee_events::telemetry;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs, database: Option<PathBuf>) -> Result<(), AppError> {
    let mut config = load_config(database)?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let reports = build_assembler(&config.storage)?;
    match schema::verify(reports.catalog().executor()) {
        Ok(missing) if missing.is_empty() => {
            info!(path = %config.storage.database_path.display(), "database schema verified");
        }
        Ok(missing) => {
            warn!(
                path = %config.storage.database_path.display(),
                ?missing,
                "database is missing required tables"
            );
        }
        Err(err) => {
            warn!(error = %err, "unable to verify database schema");
        }
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        reports: Arc::new(reports),
        static_dir: Arc::new(config.storage.static_dir.clone()),
    };

    let app = dashboard_router(app_state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "employee events dashboard ready");

    axum::serve(listener, app).await?;
    Ok(())
}
