use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::json;

use crate::{
    MarkOutcome, PlanError, ScheduleEntry, SelectionConfig, Session, SessionError, TemplateError,
    load_template_from_reader, template_week_count,
};

#[derive(Clone)]
pub struct AppState {
    session: Arc<RwLock<Session>>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
        }
    }

    pub fn with_shared(session: Arc<RwLock<Session>>) -> Self {
        Self { session }
    }

    fn session(&self) -> Arc<RwLock<Session>> {
        self.session.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    LogWriteFailed(String),
    Internal(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<SessionError> for ApiError {
    fn from(value: SessionError) -> Self {
        match value {
            SessionError::Plan(PlanError::Expansion(err)) => ApiError::Invalid(err.to_string()),
            SessionError::Plan(PlanError::Template(err)) => ApiError::Invalid(err.to_string()),
            SessionError::NoSuchEntry(row) => {
                ApiError::NotFound(format!("schedule has no entry at row {row}"))
            }
            SessionError::Log(err) => ApiError::LogWriteFailed(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<PlanError> for ApiError {
    fn from(value: PlanError) -> Self {
        ApiError::from(SessionError::Plan(value))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::LogWriteFailed(message) => {
                (StatusCode::BAD_GATEWAY, "log_write_failed", message)
            }
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/config", get(get_config).put(update_config))
        .route("/template", post(upload_template))
        .route("/schedule", get(get_schedule))
        .route("/calendar.csv", get(download_calendar))
        .route("/entries/:row/complete", post(mark_complete))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, session: Session) -> std::io::Result<()> {
    let state = AppState::new(session);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_config(State(state): State<AppState>) -> Json<SelectionConfig> {
    let session = state.session();
    let config = {
        let guard = session.read();
        guard.config().clone()
    };
    Json(config)
}

async fn update_config(
    State(state): State<AppState>,
    Json(config): Json<SelectionConfig>,
) -> Result<Json<SelectionConfig>, ApiError> {
    if config.total_weeks == 0 {
        return Err(ApiError::invalid("total_weeks must be at least 1"));
    }
    let session = state.session();
    let current = {
        let mut guard = session.write();
        guard.set_config(config);
        guard.config().clone()
    };
    Ok(Json(current))
}

async fn upload_template(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<serde_json::Value>, ApiError> {
    let template = load_template_from_reader(body.as_bytes()).map_err(|err| match err {
        TemplateError::MissingColumn(_) | TemplateError::InvalidField { .. } => {
            ApiError::invalid(err.to_string())
        }
        other => ApiError::Internal(other.to_string()),
    })?;
    let rows = template.len();
    let weeks = template_week_count(&template);
    {
        let session = state.session();
        let mut guard = session.write();
        guard.set_template(template);
    }
    Ok(Json(json!({ "rows": rows, "weeks": weeks })))
}

#[derive(Debug, Serialize)]
struct ScheduleEntryView {
    #[serde(flatten)]
    entry: ScheduleEntry,
    completed: bool,
}

#[derive(Debug, Serialize)]
struct ScheduleView {
    entries: Vec<ScheduleEntryView>,
    warnings: Vec<String>,
    display_only: bool,
}

async fn get_schedule(State(state): State<AppState>) -> Result<Json<ScheduleView>, ApiError> {
    let session = state.session();
    let guard = session.read();
    let (schedule, warnings) = guard.schedule()?;
    let entries = schedule.entries().map_err(PlanError::from)?;
    let view = ScheduleView {
        entries: entries
            .into_iter()
            .enumerate()
            .map(|(row, entry)| {
                let completed = guard.tracker().is_logged(&entry, row);
                ScheduleEntryView { entry, completed }
            })
            .collect(),
        warnings: warnings.iter().map(ToString::to_string).collect(),
        display_only: guard.tracker().is_display_only(),
    };
    Ok(Json(view))
}

async fn download_calendar(State(state): State<AppState>) -> Result<Response, ApiError> {
    let session = state.session();
    let csv = {
        let guard = session.read();
        guard.calendar_csv()?
    };
    Ok(([(header::CONTENT_TYPE, "text/csv")], csv).into_response())
}

async fn mark_complete(
    State(state): State<AppState>,
    Path(row): Path<usize>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.session();
    let outcome = {
        let mut guard = session.write();
        guard.mark_complete_now(row)?
    };
    let status = match outcome {
        MarkOutcome::Logged => "logged",
        MarkOutcome::AlreadyLogged => "already_logged",
        MarkOutcome::DisplayOnly => "display_only",
    };
    Ok(Json(json!({ "status": status })))
}
