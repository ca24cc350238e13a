//! REST endpoints for assessment sessions.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::error::{Error, SessionError};
use crate::survey::{Answer, Profile};

use super::manager::SessionManager;
use super::views::{LegendView, PageView, QuestionView, ReportView};

/// Shared state for session routes.
#[derive(Clone)]
pub struct SessionRouteState {
    pub manager: Arc<SessionManager>,
}

/// Body of `next` and `submit`. A missing selection accepts the default.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionRequest {
    #[serde(default)]
    pub selection: Option<Answer>,
}

/// Error returned by handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(Error);

impl<E: Into<Error>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            Error::Session(SessionError::NotFound(_)) => StatusCode::NOT_FOUND,
            Error::Session(SessionError::InvalidTransition { .. })
            | Error::Session(SessionError::ReportUnavailable(_)) => StatusCode::CONFLICT,
            Error::Session(SessionError::UnknownOption { .. })
            | Error::Session(SessionError::SelectionShape { .. }) => StatusCode::BAD_REQUEST,
            Error::Llm(_) => StatusCode::BAD_GATEWAY,
            Error::Config(_) | Error::Warehouse(_) | Error::Document(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self.0, "Request rejected");
        }
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// POST /api/sessions
async fn create_session(
    State(state): State<SessionRouteState>,
) -> Result<(StatusCode, Json<PageView>), ApiError> {
    let view = state.manager.start().await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/sessions/{id}
async fn get_session(
    State(state): State<SessionRouteState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PageView>, ApiError> {
    Ok(Json(state.manager.view(id).await?))
}

/// POST /api/sessions/{id}/intake
async fn submit_intake(
    State(state): State<SessionRouteState>,
    Path(id): Path<Uuid>,
    Json(profile): Json<Profile>,
) -> Result<Json<PageView>, ApiError> {
    Ok(Json(state.manager.submit_intake(id, profile).await?))
}

/// A request without a JSON body confirms the default selection.
fn selection(body: Option<Json<SelectionRequest>>) -> Option<Answer> {
    body.and_then(|Json(body)| body.selection)
}

/// POST /api/sessions/{id}/next
async fn next_question(
    State(state): State<SessionRouteState>,
    Path(id): Path<Uuid>,
    body: Option<Json<SelectionRequest>>,
) -> Result<Json<PageView>, ApiError> {
    Ok(Json(state.manager.next(id, selection(body)).await?))
}

/// POST /api/sessions/{id}/previous
async fn previous_question(
    State(state): State<SessionRouteState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PageView>, ApiError> {
    Ok(Json(state.manager.previous(id).await?))
}

/// POST /api/sessions/{id}/submit
///
/// Records the last answer and composes the report. Generation failures
/// return 502 and leave the session on the last question.
async fn submit_assessment(
    State(state): State<SessionRouteState>,
    Path(id): Path<Uuid>,
    body: Option<Json<SelectionRequest>>,
) -> Result<Json<PageView>, ApiError> {
    Ok(Json(state.manager.submit(id, selection(body)).await?))
}

/// GET /api/sessions/{id}/report
async fn get_report(
    State(state): State<SessionRouteState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReportView>, ApiError> {
    let report = state.manager.report(id).await?;
    Ok(Json(ReportView::new(id, &report)))
}

/// GET /api/sessions/{id}/report.pdf
async fn download_report(
    State(state): State<SessionRouteState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let report = state.manager.report(id).await?;
    let document = &report.document;
    let disposition = HeaderValue::from_str(&content_disposition(&document.file_name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(document.mime())),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes.clone(),
    )
        .into_response())
}

/// GET /api/questions
async fn list_questions(State(state): State<SessionRouteState>) -> Json<Vec<QuestionView>> {
    Json(QuestionView::list(state.manager.questionnaire()))
}

/// GET /api/maturity/legend
async fn maturity_legend() -> Json<LegendView> {
    Json(LegendView::new())
}

/// GET /health
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `attachment` disposition with an ASCII fallback name and the exact
/// UTF-8 name in `filename*`.
pub fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let mut encoded = String::with_capacity(file_name.len() * 3);
    for byte in file_name.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

/// Which browser origins may call the API.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CorsOrigins {
    /// `*`: every origin.
    Any,
    List(Vec<String>),
    #[default]
    LocalhostOnly,
}

pub fn build_cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let allowed: Vec<HeaderValue> = match origins {
        CorsOrigins::Any => {
            tracing::warn!("CORS: allowing all origins");
            return CorsLayer::permissive();
        }
        CorsOrigins::List(list) => list
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(hv) => Some(hv),
                Err(e) => {
                    tracing::warn!(origin = %origin, error = %e, "CORS: invalid origin");
                    None
                }
            })
            .collect(),
        CorsOrigins::LocalhostOnly => Vec::new(),
    };

    let allowed = if allowed.is_empty() {
        tracing::info!("CORS: defaulting to localhost only");
        vec![
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:8080"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
            HeaderValue::from_static("http://127.0.0.1:8080"),
        ]
    } else {
        allowed
    };

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the session REST routes.
pub fn session_routes(state: SessionRouteState) -> Router {
    Router::new()
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", get(get_session))
        .route("/api/sessions/{id}/intake", post(submit_intake))
        .route("/api/sessions/{id}/next", post(next_question))
        .route("/api/sessions/{id}/previous", post(previous_question))
        .route("/api/sessions/{id}/submit", post(submit_assessment))
        .route("/api/sessions/{id}/report", get(get_report))
        .route("/api/sessions/{id}/report.pdf", get(download_report))
        .route("/api/questions", get(list_questions))
        .route("/api/maturity/legend", get(maturity_legend))
        .route("/health", get(health))
        .with_state(state)
}
