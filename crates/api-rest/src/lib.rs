//! # API REST
//!
//! REST API implementation for Odonto.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! Uses `api-shared` for request/response bodies and `odonto-core` for chart operations. Every
//! mutating endpoint drives a [`ChartEditor`](odonto_core::ChartEditor) over the stored chart, so
//! each accepted request produces exactly one stored revision.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    ChartRes, ConditionRes, CreateChartReq, CreateChartRes, HealthRes, HealthService, HistoryRes,
    ListChartsRes, ListConditionsRes, RevisionRes, SetConditionReq, SetNotesReq, ToothRecordRes,
};
use odonto_core::{
    Author, ChartError, ChartId, ChartRevision, ChartStore, ConditionCatalog, EditorConfig,
    StoreListener, ToothNumber, ToothRecord,
};

type ApiError = (StatusCode, &'static str);

/// Application state shared across REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ChartStore>,
}

impl AppState {
    pub fn new(store: ChartStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_conditions,
        create_chart,
        list_charts,
        get_chart,
        get_tooth,
        set_condition,
        set_notes,
        chart_history,
    ),
    components(schemas(
        HealthRes,
        ConditionRes,
        ListConditionsRes,
        ToothRecordRes,
        ChartRes,
        ListChartsRes,
        CreateChartReq,
        CreateChartRes,
        SetConditionReq,
        SetNotesReq,
        RevisionRes,
        HistoryRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router, including the Swagger UI.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/conditions", get(list_conditions))
        .route("/charts", get(list_charts).post(create_chart))
        .route("/charts/:id", get(get_chart))
        .route("/charts/:id/history", get(chart_history))
        .route("/charts/:id/teeth/:tooth", get(get_tooth))
        .route("/charts/:id/teeth/:tooth/condition", put(set_condition))
        .route("/charts/:id/teeth/:tooth/notes", put(set_notes))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/conditions",
    responses(
        (status = 200, description = "Condition catalog in legend order", body = ListConditionsRes)
    )
)]
async fn list_conditions() -> Json<ListConditionsRes> {
    let conditions = ConditionCatalog::list()
        .iter()
        .map(|c| ConditionRes {
            id: c.as_str().to_string(),
            label: c.label().to_string(),
            colour: c.colour().to_string(),
        })
        .collect();
    Json(ListConditionsRes { conditions })
}

#[utoipa::path(
    post,
    path = "/charts",
    request_body = CreateChartReq,
    responses(
        (status = 200, description = "Chart created", body = CreateChartRes),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
/// Create an empty chart with an initial stored revision.
#[axum::debug_handler]
async fn create_chart(
    State(state): State<AppState>,
    Json(req): Json<CreateChartReq>,
) -> Result<Json<CreateChartRes>, ApiError> {
    let author = build_author(&req.author_name, &req.author_role, &req.author_email)?;
    match state.store.create(&author) {
        Ok(chart_id) => Ok(Json(CreateChartRes {
            chart_id: chart_id.to_string(),
        })),
        Err(e) => Err(error_response("Create chart", e)),
    }
}

#[utoipa::path(
    get,
    path = "/charts",
    responses(
        (status = 200, description = "Identifiers of stored charts", body = ListChartsRes)
    )
)]
async fn list_charts(State(state): State<AppState>) -> Json<ListChartsRes> {
    let chart_ids = state
        .store
        .list()
        .into_iter()
        .map(|id| id.to_string())
        .collect();
    Json(ListChartsRes { chart_ids })
}

#[utoipa::path(
    get,
    path = "/charts/{id}",
    params(("id" = String, Path, description = "Chart identifier (32 lowercase hex)")),
    responses(
        (status = 200, description = "Charted tooth records", body = ChartRes),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Chart not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// The stored record collection. Untouched teeth are not listed.
#[axum::debug_handler]
async fn get_chart(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<ChartRes>, ApiError> {
    let chart_id = parse_chart_id(&id)?;
    let chart = state
        .store
        .load(chart_id)
        .map_err(|e| error_response("Load chart", e))?;
    Ok(Json(chart_res(chart_id, chart.records())))
}

#[utoipa::path(
    get,
    path = "/charts/{id}/teeth/{tooth}",
    params(
        ("id" = String, Path, description = "Chart identifier"),
        ("tooth" = u8, Path, description = "FDI tooth number")
    ),
    responses(
        (status = 200, description = "Tooth record, healthy if never charted", body = ToothRecordRes),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Chart not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
async fn get_tooth(
    State(state): State<AppState>,
    AxumPath((id, tooth)): AxumPath<(String, String)>,
) -> Result<Json<ToothRecordRes>, ApiError> {
    let chart_id = parse_chart_id(&id)?;
    let tooth = parse_tooth(&tooth)?;
    let chart = state
        .store
        .load(chart_id)
        .map_err(|e| error_response("Load chart", e))?;
    Ok(Json(record_res(&chart.get_record(tooth))))
}

#[utoipa::path(
    put,
    path = "/charts/{id}/teeth/{tooth}/condition",
    params(
        ("id" = String, Path, description = "Chart identifier"),
        ("tooth" = u8, Path, description = "FDI tooth number")
    ),
    request_body = SetConditionReq,
    responses(
        (status = 200, description = "Condition applied and saved", body = ChartRes),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Chart not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
async fn set_condition(
    State(state): State<AppState>,
    AxumPath((id, tooth)): AxumPath<(String, String)>,
    Json(req): Json<SetConditionReq>,
) -> Result<Json<ChartRes>, ApiError> {
    let chart_id = parse_chart_id(&id)?;
    let tooth = parse_tooth(&tooth)?;
    let author = build_author(&req.author_name, &req.author_role, &req.author_email)?;

    let mut editor = state
        .store
        .editor(chart_id, author, EditorConfig::editable())
        .map_err(|e| error_response("Open chart", e))?;
    let records = editor
        .apply_condition(tooth, &req.condition)
        .map_err(|e| error_response("Apply condition", e))?
        .to_vec();

    check_persisted(editor.into_listener())?;
    Ok(Json(chart_res(chart_id, &records)))
}

#[utoipa::path(
    put,
    path = "/charts/{id}/teeth/{tooth}/notes",
    params(
        ("id" = String, Path, description = "Chart identifier"),
        ("tooth" = u8, Path, description = "FDI tooth number")
    ),
    request_body = SetNotesReq,
    responses(
        (status = 200, description = "Notes committed and saved", body = ChartRes),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Chart not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Select the tooth, replace its notes buffer and commit it.
#[axum::debug_handler]
async fn set_notes(
    State(state): State<AppState>,
    AxumPath((id, tooth)): AxumPath<(String, String)>,
    Json(req): Json<SetNotesReq>,
) -> Result<Json<ChartRes>, ApiError> {
    let chart_id = parse_chart_id(&id)?;
    let tooth = parse_tooth(&tooth)?;
    let author = build_author(&req.author_name, &req.author_role, &req.author_email)?;

    let mut editor = state
        .store
        .editor(chart_id, author, EditorConfig::editable())
        .map_err(|e| error_response("Open chart", e))?;
    editor.select_tooth(tooth);
    editor.edit_notes(req.notes);
    let records = editor
        .commit_notes()
        .map(<[ToothRecord]>::to_vec)
        .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))?;

    check_persisted(editor.into_listener())?;
    Ok(Json(chart_res(chart_id, &records)))
}

#[utoipa::path(
    get,
    path = "/charts/{id}/history",
    params(("id" = String, Path, description = "Chart identifier")),
    responses(
        (status = 200, description = "Stored revisions, newest first", body = HistoryRes),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Chart not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
async fn chart_history(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<HistoryRes>, ApiError> {
    let chart_id = parse_chart_id(&id)?;
    let revisions = state
        .store
        .history(chart_id)
        .map_err(|e| error_response("Chart history", e))?;
    Ok(Json(HistoryRes {
        chart_id: chart_id.to_string(),
        revisions: revisions.iter().map(revision_res).collect(),
    }))
}

fn parse_chart_id(id: &str) -> Result<ChartId, ApiError> {
    ChartId::parse(id).map_err(|e| {
        tracing::error!("Invalid chart id: {:?}", e);
        (StatusCode::BAD_REQUEST, "Invalid chart id")
    })
}

fn parse_tooth(tooth: &str) -> Result<ToothNumber, ApiError> {
    tooth.parse::<ToothNumber>().map_err(|e| {
        tracing::error!("Invalid tooth number: {:?}", e);
        (StatusCode::BAD_REQUEST, "Invalid tooth number")
    })
}

fn build_author(name: &str, role: &str, email: &str) -> Result<Author, ApiError> {
    Author::new(name, role, email).map_err(|e| {
        tracing::error!("Invalid author: {:?}", e);
        (StatusCode::BAD_REQUEST, "Invalid author")
    })
}

/// A save that failed inside the listener is reported as a server error.
fn check_persisted(mut listener: StoreListener<'_>) -> Result<(), ApiError> {
    match listener.take_error() {
        Some(e) => Err(error_response("Persist chart", e)),
        None => Ok(()),
    }
}

fn error_response(context: &str, e: ChartError) -> ApiError {
    tracing::error!("{context} error: {:?}", e);
    match e {
        ChartError::UnknownCondition(_) | ChartError::InvalidCondition(_) => {
            (StatusCode::BAD_REQUEST, "Invalid condition")
        }
        ChartError::InvalidToothNumber(_) => (StatusCode::BAD_REQUEST, "Invalid tooth number"),
        ChartError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Bad request"),
        ChartError::ChartNotFound(_) => (StatusCode::NOT_FOUND, "Chart not found"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
    }
}

fn record_res(record: &ToothRecord) -> ToothRecordRes {
    ToothRecordRes {
        tooth_number: record.tooth_number.get(),
        condition: record.condition.as_str().to_string(),
        notes: record.notes.clone(),
        surfaces: record.surfaces.clone(),
    }
}

fn chart_res(chart_id: ChartId, records: &[ToothRecord]) -> ChartRes {
    ChartRes {
        chart_id: chart_id.to_string(),
        records: records.iter().map(record_res).collect(),
    }
}

fn revision_res(rev: &ChartRevision) -> RevisionRes {
    RevisionRes {
        commit_id: rev.commit_id.clone(),
        committed_at: rev.committed_at.to_rfc3339(),
        summary: rev.summary.clone(),
        author_name: rev.author_name.clone(),
    }
}
