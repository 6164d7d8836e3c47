use crate::infra::{blocking, AppState, ReportSummary};
use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Path, Query};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use employee_events::components::{landing_page, report_page, Component, EntityDropdown};
use employee_events::entities::{EntityId, EntityKind};
use employee_events::error::AppError;
use employee_events::report::ReportSelector;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io;

#[derive(Debug, Deserialize)]
pub(crate) struct DropdownQuery {
    #[serde(default)]
    pub(crate) profile_type: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct FilterForm {
    #[serde(default)]
    pub(crate) profile_type: Option<String>,
    #[serde(default)]
    pub(crate) entity: Option<String>,
}

pub(crate) fn dashboard_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing_endpoint))
        .route("/employee/:id", get(employee_report_endpoint))
        .route("/team/:id", get(team_report_endpoint))
        .route("/update_dropdown", get(update_dropdown_endpoint))
        .route("/update_data", post(update_data_endpoint))
        .route("/static/:file", get(static_file_endpoint))
        .route(
            "/api/v1/employee/:id/report",
            get(employee_summary_endpoint),
        )
        .route("/api/v1/team/:id/report", get(team_summary_endpoint))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(Extension(state))
}

fn profile_kind(raw: Option<&str>) -> Result<EntityKind, AppError> {
    raw.and_then(EntityKind::from_profile_type)
        .ok_or_else(|| AppError::bad_request("profile_type must be 'Employee' or 'Team'"))
}

pub(crate) async fn landing_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Html<String>, AppError> {
    let reports = state.reports.clone();
    let options = blocking(move || Ok(reports.options(EntityKind::Employee)?)).await?;
    Ok(Html(landing_page(EntityKind::Employee, &options)))
}

async fn render_report(
    state: AppState,
    kind: EntityKind,
    raw_id: &str,
) -> Result<Html<String>, AppError> {
    let selector = ReportSelector::new(kind, EntityId::parse(raw_id)?);
    let reports = state.reports.clone();
    let page = blocking(move || Ok(reports.assemble(selector)?)).await?;
    Ok(Html(report_page(&page)))
}

pub(crate) async fn employee_report_endpoint(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    render_report(state, EntityKind::Employee, &id).await
}

pub(crate) async fn team_report_endpoint(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    render_report(state, EntityKind::Team, &id).await
}

pub(crate) async fn update_dropdown_endpoint(
    Extension(state): Extension<AppState>,
    query: Result<Query<DropdownQuery>, QueryRejection>,
) -> Result<Html<String>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let kind = profile_kind(query.profile_type.as_deref())?;
    let reports = state.reports.clone();
    let options = blocking(move || Ok(reports.options(kind)?)).await?;
    Ok(Html(
        EntityDropdown {
            options: &options,
            selected: None,
        }
        .render(),
    ))
}

/// Accepts the url-encoded body the filters form posts. Any other encoding is
/// a bad request with the usual JSON error body.
pub(crate) async fn update_data_endpoint(
    form: Result<Form<FilterForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let kind = profile_kind(form.profile_type.as_deref())?;
    let entity = form
        .entity
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("entity is required"))?;
    let selector = ReportSelector::new(kind, EntityId::parse(entity)?);
    Ok(Redirect::to(&selector.path()))
}

fn is_servable_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

pub(crate) async fn static_file_endpoint(
    Extension(state): Extension<AppState>,
    Path(file): Path<String>,
) -> Result<Response, AppError> {
    let not_found = || {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "static file not found" })),
        )
            .into_response()
    };

    if !is_servable_name(&file) {
        return Ok(not_found());
    }

    let path = state.static_dir.join(&file);
    let bytes = match blocking(move || Ok(std::fs::read(path)?)).await {
        Ok(bytes) => bytes,
        Err(AppError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(not_found());
        }
        Err(err) => return Err(err),
    };

    let content_type = mime_guess::from_path(&file)
        .first_or_octet_stream()
        .to_string();
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
        bytes,
    )
        .into_response())
}

async fn summarize(
    state: AppState,
    kind: EntityKind,
    raw_id: &str,
) -> Result<Json<ReportSummary>, AppError> {
    let selector = ReportSelector::new(kind, EntityId::parse(raw_id)?);
    let reports = state.reports.clone();
    let data = blocking(move || Ok(reports.collect(selector)?)).await?;
    Ok(Json(ReportSummary::from(data)))
}

pub(crate) async fn employee_summary_endpoint(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReportSummary>, AppError> {
    summarize(state, EntityKind::Employee, &id).await
}

pub(crate) async fn team_summary_endpoint(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReportSummary>, AppError> {
    summarize(state, EntityKind::Team, &id).await
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
